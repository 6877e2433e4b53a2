//! # Wallet and Explorer Services
//!
//! Application services implementing the inbound ports.
//!
//! ## Architecture
//!
//! - [`WalletService`] implements [`WalletApi`]: it owns the key loaded from
//!   a [`KeyStore`] and delegates hashing and signing to the domain layer.
//! - [`ExplorerClient`] implements [`ExplorerApi`] over a [`Transport`]:
//!   typed requests go out in envelopes with fresh crids, responses are
//!   checked for result code and type before decoding.

use crate::adapters::convert;
use crate::config::ProtocolConfig;
use crate::domain::address::Address;
use crate::domain::amount::{Amount, Currency};
use crate::domain::errors::ProtocolError;
use crate::domain::keys;
use crate::domain::transaction::{Transaction, TxInput, TxOutput};
use crate::ports::inbound::{ExplorerApi, WalletApi};
use crate::ports::outbound::{KeyStore, Transport};
use async_trait::async_trait;
use shared_crypto::{Hash256, PrivateKey, PublicKey, Signature};
use shared_types::{
    ApiRequest, CridGenerator, GetAccountRequest, GetAccountResponse, GetLedgerRequest,
    GetTransactionRequest, Ledger, RequestEnvelope, SendTransactionRequest,
};
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

/// Wallet bound to one private key.
pub struct WalletService {
    key: PrivateKey,
    public_key: PublicKey,
    address: Address,
    config: ProtocolConfig,
}

impl WalletService {
    /// Wallet for an existing key.
    pub fn from_key(key: PrivateKey, config: ProtocolConfig) -> Self {
        let public_key = key.public_key();
        let address = keys::address_from_public_key(&public_key);
        Self {
            key,
            public_key,
            address,
            config,
        }
    }

    /// Load the key from `store`, or generate one and save it there.
    pub async fn open<K: KeyStore>(store: &K, config: ProtocolConfig) -> Result<Self, ProtocolError> {
        let stored = store
            .load_private_key()
            .await
            .map_err(|e| ProtocolError::KeyStore(e.to_string()))?;

        let key = match stored {
            Some(bytes) => PrivateKey::from_bytes(bytes.as_slice())?,
            None => {
                let key = PrivateKey::generate();
                let bytes = Zeroizing::new(key.to_bytes());
                store
                    .save_private_key(&bytes)
                    .await
                    .map_err(|e| ProtocolError::KeyStore(e.to_string()))?;
                info!("Generated new wallet key");
                key
            }
        };

        let wallet = Self::from_key(key, config);
        debug!(address = %wallet.address, "Opened wallet");
        Ok(wallet)
    }

    pub fn config(&self) -> &ProtocolConfig {
        &self.config
    }

    /// Single-line transfer from this wallet to `receiver`, expiring one TTL
    /// after `now`.
    pub fn build_transfer(
        &self,
        receiver: &Address,
        currency: Currency,
        amount: Amount,
        now: i64,
    ) -> Transaction {
        Transaction::new(self.config.expiry_from(now))
            .with_input(TxInput::new(self.address.clone(), currency, amount))
            .with_output(TxOutput::new(receiver.clone(), currency, amount))
    }
}

impl WalletApi for WalletService {
    fn address(&self) -> &Address {
        &self.address
    }

    fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    fn sign_digest(&self, digest: &[u8]) -> Result<Signature, ProtocolError> {
        Ok(self.key.sign(digest, self.config.network())?)
    }

    fn sign_transaction(&self, transaction: &Transaction) -> Result<Signature, ProtocolError> {
        keys::sign_transaction(&self.key, transaction, self.config.network())
    }

    fn verify_transaction(
        &self,
        public_key: &PublicKey,
        transaction: &Transaction,
        signature: &Signature,
    ) -> Result<bool, ProtocolError> {
        keys::verify_transaction(public_key, transaction, signature, self.config.network())
    }

    fn build_send_request(
        &self,
        transaction: &Transaction,
    ) -> Result<SendTransactionRequest, ProtocolError> {
        let signature = self.sign_transaction(transaction)?;
        Ok(SendTransactionRequest {
            transaction: convert::transaction_to_api(transaction)?,
            signatures: vec![convert::signature_to_api(&self.public_key, &signature)],
        })
    }
}

/// Typed client for the node API.
pub struct ExplorerClient<T: Transport> {
    transport: T,
    crids: CridGenerator,
}

impl<T: Transport> ExplorerClient<T> {
    pub fn new(transport: T, crids: CridGenerator) -> Self {
        Self { transport, crids }
    }

    /// Send any API request and decode its response.
    ///
    /// # Errors
    /// * `ProtocolError::Transport` - The transport failed
    /// * `ProtocolError::Envelope` - Non-zero result code, wrong response
    ///   type, or an undecodable payload
    pub async fn request<R: ApiRequest + Send>(&self, request: R) -> Result<R::Response, ProtocolError> {
        let crid = self.crids.next_crid();
        let envelope = RequestEnvelope::new(request, crid.clone()).into_raw()?;

        debug!(crid = %crid, kind = R::TYPE, "Sending request");
        let response = self
            .transport
            .send_request(envelope)
            .await
            .map_err(|e| ProtocolError::Transport(e.to_string()))?;

        if !response.is_success() {
            warn!(
                crid = %crid,
                kind = %response.kind,
                result = response.result,
                "Request failed"
            );
        }
        Ok(response.into_response::<R>()?)
    }
}

#[async_trait]
impl<T: Transport> ExplorerApi for ExplorerClient<T> {
    async fn get_transaction(&self, hash: &Hash256) -> Result<Transaction, ProtocolError> {
        let requested = hash.to_base64();
        let response = self
            .request(GetTransactionRequest {
                hash: requested.clone(),
            })
            .await?;

        let returned = &response.transaction.hash;
        if !returned.is_empty() && *returned != requested {
            return Err(ProtocolError::HashMismatch {
                expected: requested,
                actual: returned.clone(),
            });
        }
        convert::transaction_from_api(&response.transaction)
    }

    async fn get_account(&self, address: &Address) -> Result<GetAccountResponse, ProtocolError> {
        self.request(GetAccountRequest {
            address: address.to_string(),
        })
        .await
    }

    async fn get_ledger(&self, height: Option<i64>) -> Result<Ledger, ProtocolError> {
        let response = self
            .request(GetLedgerRequest {
                height,
                ..GetLedgerRequest::default()
            })
            .await?;
        Ok(response.ledger)
    }

    async fn send_transaction(
        &self,
        request: SendTransactionRequest,
    ) -> Result<Hash256, ProtocolError> {
        let local = request.transaction.hash.clone();
        let response = self.request(request).await?;

        if !local.is_empty() && local != response.hash {
            warn!(local = %local, node = %response.hash, "Node reported a different hash");
        }
        Ok(Hash256::from_base64(&response.hash)?)
    }
}
