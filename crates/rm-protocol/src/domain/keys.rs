//! # Keys and Authorization
//!
//! Binds secp256k1 keys to addresses and transactions.
//!
//! - Address of a key: ECDSA tag + last 20 bytes of keccak-256 over the
//!   65-byte uncompressed public key (`0x04` prefix included).
//! - Authorization: the transaction hash signed under the network domain.

use crate::domain::address::{Address, AddressType};
use crate::domain::address32::PAYLOAD_SIZE;
use crate::domain::errors::ProtocolError;
use crate::domain::transaction::Transaction;
use shared_crypto::{keccak256, PrivateKey, PublicKey, Signature, HASH_SIZE};

/// Domain separator prepended to every signed digest.
pub const NETWORK: &[u8] = b"republicofminer.com";

/// Derive the ECDSA address of `public_key`.
pub fn address_from_public_key(public_key: &PublicKey) -> Address {
    let hash = keccak256(&public_key.to_bytes());
    let mut payload = [0u8; PAYLOAD_SIZE];
    payload.copy_from_slice(&hash.as_bytes()[HASH_SIZE - PAYLOAD_SIZE..]);
    Address::new(AddressType::Ecdsa, payload)
}

/// Returns true if `encoded` is the address of `public_key`.
///
/// Compares canonical (lowercase) encodings, so an uppercase rendering of the
/// right address also matches.
pub fn check_address(public_key: &PublicKey, encoded: &str) -> bool {
    match Address::decode(encoded) {
        Ok(address) => address == address_from_public_key(public_key),
        Err(_) => false,
    }
}

/// Sign the hash of `transaction` under `network`.
pub fn sign_transaction(
    key: &PrivateKey,
    transaction: &Transaction,
    network: &[u8],
) -> Result<Signature, ProtocolError> {
    let hash = transaction.hash()?;
    Ok(key.sign(hash.as_bytes(), network)?)
}

/// Check `signature` against the hash of `transaction` under `network`.
pub fn verify_transaction(
    public_key: &PublicKey,
    transaction: &Transaction,
    signature: &Signature,
    network: &[u8],
) -> Result<bool, ProtocolError> {
    let hash = transaction.hash()?;
    Ok(public_key.verify(hash.as_bytes(), signature, network))
}
