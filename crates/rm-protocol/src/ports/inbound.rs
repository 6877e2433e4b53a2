//! # Inbound Ports (Driving Ports / API)
//!
//! Traits that define the public API of the wallet and explorer services.

use crate::domain::address::Address;
use crate::domain::errors::ProtocolError;
use crate::domain::transaction::Transaction;
use async_trait::async_trait;
use shared_crypto::{Hash256, PublicKey, Signature};
use shared_types::{GetAccountResponse, Ledger, SendTransactionRequest};

/// Local wallet operations.
///
/// Implementations must be thread-safe (`Send + Sync`).
pub trait WalletApi: Send + Sync {
    /// ECDSA address of the wallet key.
    fn address(&self) -> &Address;

    /// Public key of the wallet.
    fn public_key(&self) -> &PublicKey;

    /// Sign an arbitrary digest under the configured network domain.
    fn sign_digest(&self, digest: &[u8]) -> Result<Signature, ProtocolError>;

    /// Sign the hash of a transaction.
    fn sign_transaction(&self, transaction: &Transaction) -> Result<Signature, ProtocolError>;

    /// Check a signature over a transaction against any public key.
    fn verify_transaction(
        &self,
        public_key: &PublicKey,
        transaction: &Transaction,
        signature: &Signature,
    ) -> Result<bool, ProtocolError>;

    /// Sign a transaction and wrap it with the wallet signature for sending.
    fn build_send_request(
        &self,
        transaction: &Transaction,
    ) -> Result<SendTransactionRequest, ProtocolError>;
}

/// Queries and submissions against a node.
#[async_trait]
pub trait ExplorerApi: Send + Sync {
    /// Fetch a transaction by hash, checking the returned contents hash to it.
    async fn get_transaction(&self, hash: &Hash256) -> Result<Transaction, ProtocolError>;

    /// Fetch balances and declaration of an address.
    async fn get_account(&self, address: &Address) -> Result<GetAccountResponse, ProtocolError>;

    /// Fetch a ledger by height, or the latest one.
    async fn get_ledger(&self, height: Option<i64>) -> Result<Ledger, ProtocolError>;

    /// Submit a signed transaction; returns the hash the node accepted.
    async fn send_transaction(
        &self,
        request: SendTransactionRequest,
    ) -> Result<Hash256, ProtocolError>;
}
