//! # ECDSA Signatures (secp256k1)
//!
//! Key handling, signing and verification for transaction authorization.
//!
//! ## Signing Input
//!
//! The signed value is `network || digest`, handed verbatim to the RFC 6979
//! prehash signer. The prehash primitive keeps the leftmost 32 bytes of that
//! buffer (SEC1 `bits2field`), which is what the network's reference
//! verifier does as well. Only those 32 bytes are bound by the signature.
//!
//! ## Wire Encoding (65 bytes)
//!
//! ```text
//! +-------+----------------+----------------+
//! | flags | r (32 bytes BE)| s (32 bytes BE)|
//! +-------+----------------+----------------+
//! ```
//!
//! `flags` bit 0 / bit 1 record that `r` / `s` has its top bit set, i.e. that
//! a signed-integer encoding would have needed a leading `0x00` which was
//! dropped. This keeps compatibility with verifiers that read the scalars as
//! signed big integers.

use crate::CryptoError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use k256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use k256::ecdsa::{Signature as EcdsaSignature, SigningKey, VerifyingKey};
use std::fmt;
use zeroize::Zeroizing;

/// Private key size in bytes.
pub const PRIVATE_KEY_SIZE: usize = 32;

/// Uncompressed SEC1 public key size (`0x04 || x || y`).
pub const PUBLIC_KEY_SIZE: usize = 65;

/// Size of one encoded signature scalar.
pub const SCALAR_SIZE: usize = 32;

/// Signature wire size: flag byte + r + s.
pub const SIGNATURE_SIZE: usize = 1 + 2 * SCALAR_SIZE;

/// Flag bit set when `r` has its most significant bit set.
pub const R_OVERFLOW_FLAG: u8 = 0x01;

/// Flag bit set when `s` has its most significant bit set.
pub const S_OVERFLOW_FLAG: u8 = 0x02;

/// secp256k1 private key.
#[derive(Clone)]
pub struct PrivateKey {
    signing_key: SigningKey,
}

impl PrivateKey {
    /// Generate a random key from the thread-local CSPRNG.
    pub fn generate() -> Self {
        let signing_key = SigningKey::random(&mut rand::thread_rng());
        Self { signing_key }
    }

    /// Create from 32 raw big-endian bytes. Zero and values >= n are rejected.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() != PRIVATE_KEY_SIZE {
            return Err(CryptoError::InvalidKeyLength {
                expected: PRIVATE_KEY_SIZE,
                actual: bytes.len(),
            });
        }
        let signing_key = SigningKey::from_slice(bytes).map_err(|_| CryptoError::InvalidPrivateKey)?;
        Ok(Self { signing_key })
    }

    /// Create from standard base64.
    pub fn from_base64(encoded: &str) -> Result<Self, CryptoError> {
        let decoded = Zeroizing::new(
            STANDARD
                .decode(encoded)
                .map_err(|e| CryptoError::InvalidBase64(e.to_string()))?,
        );
        Self::from_bytes(&decoded)
    }

    /// Get secret key bytes (for key storage).
    pub fn to_bytes(&self) -> [u8; PRIVATE_KEY_SIZE] {
        self.signing_key.to_bytes().into()
    }

    /// Secret key bytes as standard base64.
    pub fn to_base64(&self) -> String {
        let bytes = Zeroizing::new(self.to_bytes());
        STANDARD.encode(bytes.as_slice())
    }

    /// Derive the public key `d * G`.
    pub fn public_key(&self) -> PublicKey {
        PublicKey {
            verifying_key: self.signing_key.verifying_key().clone(),
        }
    }

    /// Sign `digest` under `network` (deterministic RFC 6979, low-S).
    ///
    /// Fails only when `network || digest` is shorter than 16 bytes, which the
    /// prehash signer refuses.
    pub fn sign(&self, digest: &[u8], network: &[u8]) -> Result<Signature, CryptoError> {
        let message = prepare(digest, network);
        let signature: EcdsaSignature = self
            .signing_key
            .sign_prehash(&message)
            .map_err(|e| CryptoError::SigningFailed(e.to_string()))?;
        let signature = signature.normalize_s().unwrap_or(signature);

        let bytes = signature.to_bytes();
        Signature::from_scalars(&bytes[..SCALAR_SIZE], &bytes[SCALAR_SIZE..])
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("public_key", &self.public_key())
            .finish_non_exhaustive()
    }
}

/// secp256k1 public key.
#[derive(Clone, PartialEq, Eq)]
pub struct PublicKey {
    verifying_key: VerifyingKey,
}

impl PublicKey {
    /// Parse SEC1 bytes (65-byte uncompressed or 33-byte compressed).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        let verifying_key =
            VerifyingKey::from_sec1_bytes(bytes).map_err(|_| CryptoError::InvalidPublicKey)?;
        Ok(Self { verifying_key })
    }

    /// Parse from standard base64.
    pub fn from_base64(encoded: &str) -> Result<Self, CryptoError> {
        let decoded = STANDARD
            .decode(encoded)
            .map_err(|e| CryptoError::InvalidBase64(e.to_string()))?;
        Self::from_bytes(&decoded)
    }

    /// Uncompressed SEC1 serialization (`0x04 || x || y`).
    pub fn to_bytes(&self) -> [u8; PUBLIC_KEY_SIZE] {
        let point = self.verifying_key.to_encoded_point(false);
        // Uncompressed encoding of a non-identity point is always 65 bytes
        let mut bytes = [0u8; PUBLIC_KEY_SIZE];
        bytes.copy_from_slice(point.as_bytes());
        bytes
    }

    /// Uncompressed serialization as standard base64.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(self.to_bytes())
    }

    /// Check `signature` over `digest` under `network`.
    ///
    /// Both halves of `s` are accepted; only signing is restricted to low-S.
    pub fn verify(&self, digest: &[u8], signature: &Signature, network: &[u8]) -> bool {
        let Ok(signature) = signature.to_ecdsa() else {
            return false;
        };
        let signature = signature.normalize_s().unwrap_or(signature);
        let message = prepare(digest, network);
        self.verifying_key
            .verify_prehash(&message, &signature)
            .is_ok()
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self.to_base64())
    }
}

/// Verify `signature` over `digest` under `network` against `public_key`.
pub fn verify(digest: &[u8], signature: &Signature, network: &[u8], public_key: &PublicKey) -> bool {
    public_key.verify(digest, signature, network)
}

/// ECDSA signature in the 65-byte flagged encoding.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signature {
    r: [u8; SCALAR_SIZE],
    s: [u8; SCALAR_SIZE],
}

impl Signature {
    /// Build from the natural big-endian magnitudes of `r` and `s`.
    ///
    /// Leading zero bytes are ignored, so both minimal encodings and
    /// sign-extended ones (a single `0x00` prefix) are accepted. A magnitude
    /// that still needs 33 bytes is a [`CryptoError::ScalarOverflow`].
    pub fn from_scalars(r: &[u8], s: &[u8]) -> Result<Self, CryptoError> {
        let (r, _) = encode_scalar(strip_leading_zeros(r))?;
        let (s, _) = encode_scalar(strip_leading_zeros(s))?;
        Ok(Self { r, s })
    }

    /// Decode the 65-byte wire form.
    ///
    /// The flag byte must equal the flags implied by `r` and `s`, and both
    /// scalars must lie in `[1, n-1]`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() != SIGNATURE_SIZE {
            return Err(CryptoError::InvalidSignatureLength {
                expected: SIGNATURE_SIZE,
                actual: bytes.len(),
            });
        }

        let mut r = [0u8; SCALAR_SIZE];
        let mut s = [0u8; SCALAR_SIZE];
        r.copy_from_slice(&bytes[1..=SCALAR_SIZE]);
        s.copy_from_slice(&bytes[SCALAR_SIZE + 1..]);
        let signature = Self { r, s };

        let expected = signature.flags();
        if bytes[0] != expected {
            return Err(CryptoError::SignatureFlagMismatch {
                expected,
                actual: bytes[0],
            });
        }

        signature.to_ecdsa()?;
        Ok(signature)
    }

    /// Decode from standard base64.
    pub fn from_base64(encoded: &str) -> Result<Self, CryptoError> {
        let decoded = STANDARD
            .decode(encoded)
            .map_err(|e| CryptoError::InvalidBase64(e.to_string()))?;
        Self::from_bytes(&decoded)
    }

    /// The `r` scalar, 32 bytes big-endian.
    pub fn r(&self) -> &[u8; SCALAR_SIZE] {
        &self.r
    }

    /// The `s` scalar, 32 bytes big-endian.
    pub fn s(&self) -> &[u8; SCALAR_SIZE] {
        &self.s
    }

    /// Overflow flags for the current scalars.
    pub fn flags(&self) -> u8 {
        let mut flags = 0;
        if has_sign_bit(&self.r) {
            flags |= R_OVERFLOW_FLAG;
        }
        if has_sign_bit(&self.s) {
            flags |= S_OVERFLOW_FLAG;
        }
        flags
    }

    /// 65-byte wire form.
    pub fn to_bytes(&self) -> [u8; SIGNATURE_SIZE] {
        let mut bytes = [0u8; SIGNATURE_SIZE];
        bytes[0] = self.flags();
        bytes[1..=SCALAR_SIZE].copy_from_slice(&self.r);
        bytes[SCALAR_SIZE + 1..].copy_from_slice(&self.s);
        bytes
    }

    /// Wire form as standard base64.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(self.to_bytes())
    }

    fn to_ecdsa(&self) -> Result<EcdsaSignature, CryptoError> {
        let mut bytes = [0u8; 2 * SCALAR_SIZE];
        bytes[..SCALAR_SIZE].copy_from_slice(&self.r);
        bytes[SCALAR_SIZE..].copy_from_slice(&self.s);
        EcdsaSignature::from_slice(&bytes).map_err(|_| CryptoError::InvalidSignature)
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({})", self.to_base64())
    }
}

/// Fit a natural big-endian integer into 32 bytes.
///
/// Returns the padded bytes and whether the top bit is set (the overflow
/// flag). A 33-byte representation is an explicit error rather than being
/// truncated.
pub fn encode_scalar(natural: &[u8]) -> Result<([u8; SCALAR_SIZE], bool), CryptoError> {
    let mut out = [0u8; SCALAR_SIZE];
    match natural.len() {
        SCALAR_SIZE => {
            out.copy_from_slice(natural);
            Ok((out, has_sign_bit(&out)))
        }
        len if len < SCALAR_SIZE => {
            out[SCALAR_SIZE - len..].copy_from_slice(natural);
            Ok((out, false))
        }
        len if len == SCALAR_SIZE + 1 => Err(CryptoError::ScalarOverflow),
        len => Err(CryptoError::InvalidScalarLength(len)),
    }
}

fn has_sign_bit(scalar: &[u8; SCALAR_SIZE]) -> bool {
    scalar[0] > 0x7f
}

fn strip_leading_zeros(bytes: &[u8]) -> &[u8] {
    let start = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
    &bytes[start..]
}

fn prepare(digest: &[u8], network: &[u8]) -> Vec<u8> {
    let mut message = Vec::with_capacity(network.len() + digest.len());
    message.extend_from_slice(network);
    message.extend_from_slice(digest);
    message
}
