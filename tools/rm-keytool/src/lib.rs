//! # rm-keytool
//!
//! Developer tool over the protocol core: key generation, address
//! derivation and decoding, digest signing and verification, and
//! transaction hashing.
//!
//! Every command is a plain function here so it can be tested without the
//! command line.

use anyhow::{bail, Context, Result};
use rm_protocol::{
    address_from_public_key, signature_from_api, transaction_from_api, verify_transaction, Address,
    AddressType,
};
use serde_json::Value;
use shared_crypto::{double_sha256, Hash256, PrivateKey, PublicKey, Signature};
use shared_types::{Transaction as WireTransaction, TransactionSignature};
use tracing::debug;

/// A freshly generated key with its derived forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyReport {
    pub private_key: String,
    pub public_key: String,
    pub address: String,
}

/// What a signature covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// A 32-byte digest in base64
    Digest(String),
    /// Text, digested with double SHA-256
    Text(String),
}

impl Message {
    pub fn digest(&self) -> Result<Hash256> {
        match self {
            Message::Digest(encoded) => {
                Hash256::from_base64(encoded).context("digest must be 32 bytes of base64")
            }
            Message::Text(text) => Ok(double_sha256(text.as_bytes())),
        }
    }
}

/// Hash of a transaction and the outcome of each attached signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashReport {
    pub hash: String,
    /// Signer address and whether its signature is valid
    pub signatures: Vec<(String, bool)>,
}

pub fn keygen() -> KeyReport {
    let key = PrivateKey::generate();
    let public_key = key.public_key();
    KeyReport {
        private_key: key.to_base64(),
        address: address_from_public_key(&public_key).to_string(),
        public_key: public_key.to_base64(),
    }
}

/// Address of a public key, or of the public key of a private key.
pub fn address(public_key: Option<&str>, private_key: Option<&str>) -> Result<Address> {
    let public_key = match (public_key, private_key) {
        (Some(public), None) => PublicKey::from_base64(public).context("invalid public key")?,
        (None, Some(private)) => PrivateKey::from_base64(private)
            .context("invalid private key")?
            .public_key(),
        _ => bail!("give exactly one of a public key or a private key"),
    };
    Ok(address_from_public_key(&public_key))
}

pub fn sign(private_key: &str, message: &Message, network: &[u8]) -> Result<Signature> {
    let key = PrivateKey::from_base64(private_key).context("invalid private key")?;
    let digest = message.digest()?;
    Ok(key.sign(digest.as_bytes(), network)?)
}

pub fn verify(public_key: &str, signature: &str, message: &Message, network: &[u8]) -> Result<bool> {
    let public_key = PublicKey::from_base64(public_key).context("invalid public key")?;
    let signature = Signature::from_base64(signature).context("invalid signature")?;
    let digest = message.digest()?;
    Ok(public_key.verify(digest.as_bytes(), &signature, network))
}

/// Address type and hex payload of an encoded address.
pub fn decode_address(encoded: &str) -> Result<(AddressType, String)> {
    let address = Address::decode(encoded).with_context(|| format!("invalid address {encoded:?}"))?;
    Ok((address.kind(), hex::encode(address.payload())))
}

/// Hash a transaction given as JSON and check any attached signatures.
///
/// Accepts a bare transaction object, or an object with a `Transaction`
/// field and optional `Signatures`, as in a send request or a fetch response.
pub fn hash_transaction(json: &str, network: &[u8]) -> Result<HashReport> {
    let value: Value = serde_json::from_str(json).context("input is not JSON")?;

    let (wire, signatures): (WireTransaction, Vec<TransactionSignature>) =
        match value.get("Transaction") {
            Some(inner) => (
                serde_json::from_value(inner.clone()).context("malformed Transaction")?,
                match value.get("Signatures") {
                    Some(list) => {
                        serde_json::from_value(list.clone()).context("malformed Signatures")?
                    }
                    None => Vec::new(),
                },
            ),
            None => (
                serde_json::from_value(value).context("malformed transaction")?,
                Vec::new(),
            ),
        };

    let transaction = transaction_from_api(&wire)?;
    let hash = transaction.hash()?;
    debug!(hash = %hash, signatures = signatures.len(), "Hashed transaction");

    let mut checked = Vec::with_capacity(signatures.len());
    for signature in &signatures {
        let (public_key, signature) = signature_from_api(signature)?;
        let valid = verify_transaction(&public_key, &transaction, &signature, network)?;
        checked.push((address_from_public_key(&public_key).to_string(), valid));
    }

    Ok(HashReport {
        hash: hash.to_base64(),
        signatures: checked,
    })
}
