//! # API Payloads
//!
//! JSON payloads of the node API, carried in the `data` field of an envelope.
//!
//! ## Wire Rules
//!
//! - Keys are PascalCase (`Hash`, `Expire`, `Inputs`, ...), except the short
//!   keys of [`TransactionHeader`] and [`TransactionSignature`].
//! - Hashes, secrets, public keys and signatures are standard base64.
//! - Amounts are decimals with 8 significant fractional digits.
//! - Declarations are flattened objects discriminated by a numeric `Type`.

use crate::envelope::ResponseEnvelope;
use crate::errors::EnvelopeError;
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use serde_with::{serde_as, skip_serializing_none, DefaultOnNull};
use std::collections::BTreeMap;

// =============================================================================
// REQUEST/RESPONSE PAIRING
// =============================================================================

/// A request payload paired with the response it expects.
pub trait ApiRequest: Serialize {
    /// Envelope type name of the request.
    const TYPE: &'static str;
    /// Envelope type name of the matching response.
    const RESPONSE_TYPE: &'static str;
    /// Payload of the matching response.
    type Response: DeserializeOwned;
}

macro_rules! api_request {
    ($request:ty => $response:ty, $request_name:literal, $response_name:literal) => {
        impl ApiRequest for $request {
            const TYPE: &'static str = $request_name;
            const RESPONSE_TYPE: &'static str = $response_name;
            type Response = $response;
        }
    };
}

// =============================================================================
// TRANSACTIONS
// =============================================================================

/// Declaration type codes as they appear in the `Type` field.
pub mod declaration_type {
    /// Multi-signature account declaration.
    pub const MULTI_SIGNATURE: u8 = 0;
    /// Hash-locked account declaration.
    pub const HASH_LOCK: u8 = 1;
    /// Secret revelation.
    pub const SECRET: u8 = 2;
    /// Time-locked account declaration.
    pub const TIME_LOCK: u8 = 3;
    /// Vending machine declaration.
    pub const VENDING_MACHINE: u8 = 4;
    /// Limit order declaration.
    pub const LIMIT_ORDER: u8 = 5;
    /// Delegated account declaration.
    pub const DELEGATED_ACCOUNT: u8 = 6;
}

/// Transaction as exchanged with the node.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Transaction {
    /// Base64 transaction hash; may be empty on submission.
    #[serde(default)]
    pub hash: String,
    /// Unix expiry time in seconds.
    #[serde(default)]
    pub expire: Option<i64>,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub declarations: Vec<TxDeclaration>,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub inputs: Vec<TxInput>,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub outputs: Vec<TxOutput>,
    /// Free text; omitted when empty.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
    /// Fee input; omitted when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fees: Option<TxInput>,
}

/// Input or output line of a transaction.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TxInputOutput {
    /// Encoded address.
    pub address: String,
    /// Three-letter currency symbol.
    pub currency: String,
    /// Decimal amount.
    pub amount: f64,
}

/// Transaction input.
pub type TxInput = TxInputOutput;

/// Transaction output.
pub type TxOutput = TxInputOutput;

/// Declaration attached to a transaction or an account.
#[derive(Debug, Clone, PartialEq)]
pub enum TxDeclaration {
    MultiSignature(MultiSignature),
    HashLock(HashLock),
    Secret(SecretRevelation),
    /// Any other type; the payload is not modelled and is dropped.
    Other(u8),
}

impl TxDeclaration {
    /// Numeric `Type` of this declaration.
    pub fn kind(&self) -> u8 {
        match self {
            TxDeclaration::MultiSignature(_) => declaration_type::MULTI_SIGNATURE,
            TxDeclaration::HashLock(_) => declaration_type::HASH_LOCK,
            TxDeclaration::Secret(_) => declaration_type::SECRET,
            TxDeclaration::Other(kind) => *kind,
        }
    }
}

#[derive(Serialize)]
struct Tagged<'a, T> {
    #[serde(rename = "Type")]
    kind: u8,
    #[serde(flatten)]
    body: &'a T,
}

#[derive(Serialize)]
struct TagOnly {
    #[serde(rename = "Type")]
    kind: u8,
}

impl Serialize for TxDeclaration {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let kind = self.kind();
        match self {
            TxDeclaration::MultiSignature(body) => Tagged { kind, body }.serialize(serializer),
            TxDeclaration::HashLock(body) => Tagged { kind, body }.serialize(serializer),
            TxDeclaration::Secret(body) => Tagged { kind, body }.serialize(serializer),
            TxDeclaration::Other(_) => TagOnly { kind }.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for TxDeclaration {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let kind = value
            .get("Type")
            .and_then(Value::as_u64)
            .ok_or_else(|| D::Error::missing_field("Type"))?;
        let kind = u8::try_from(kind).map_err(|_| D::Error::custom("declaration Type out of range"))?;

        let declaration = match kind {
            declaration_type::MULTI_SIGNATURE => {
                TxDeclaration::MultiSignature(serde_json::from_value(value).map_err(D::Error::custom)?)
            }
            declaration_type::HASH_LOCK => {
                TxDeclaration::HashLock(serde_json::from_value(value).map_err(D::Error::custom)?)
            }
            declaration_type::SECRET => {
                TxDeclaration::Secret(serde_json::from_value(value).map_err(D::Error::custom)?)
            }
            other => TxDeclaration::Other(other),
        };
        Ok(declaration)
    }
}

/// Secret hash algorithm codes used by [`SecretHash`].
pub mod secret_hash_type {
    /// Keccak-256.
    pub const SHA3: u8 = 0;
    /// SHA-256.
    pub const SHA256: u8 = 1;
}

/// Hash committed to by a hash lock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SecretHash {
    #[serde(rename = "Type")]
    pub kind: u8,
    pub hash: String,
}

/// Account locked until a secret is revealed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HashLock {
    pub address: String,
    pub secret_hash: SecretHash,
}

/// Reveals a secret to unlock hash-locked funds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SecretRevelation {
    /// Base64 secret.
    pub secret: String,
}

/// Account requiring `required` of `signers` to authorize spending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MultiSignature {
    pub address: String,
    #[serde(default)]
    pub signers: Vec<String>,
    pub required: i32,
}

/// Public key and signature authorizing a transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionSignature {
    /// Base64 uncompressed public key.
    #[serde(rename = "k")]
    pub public_key: String,
    /// Base64 65-byte signature.
    #[serde(rename = "s")]
    pub signature: String,
}

// =============================================================================
// LEDGERS
// =============================================================================

/// Closed ledger summary.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Ledger {
    pub height: i64,
    pub hash: String,
    pub timestamp: i64,
    pub lastledger: String,
    pub version: u8,
    pub fee_transaction_index: i32,
    #[serde(default)]
    pub transactions: Vec<TransactionHeader>,
}

/// Transaction entry inside a ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionHeader {
    #[serde(rename = "i")]
    pub index: i32,
    #[serde(rename = "h")]
    pub hash: String,
    #[serde(rename = "f")]
    pub fee: Option<f64>,
    #[serde(rename = "d")]
    pub has_declaration: bool,
}

// =============================================================================
// EXPLORER API
// =============================================================================

/// Fetch a ledger by height or hash; both empty means the latest.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetLedgerRequest {
    pub height: Option<i64>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub hash: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetLedgerResponse {
    pub ledger: Ledger,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetTransactionRequest {
    pub hash: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetTransactionResponse {
    pub transaction: Transaction,
}

/// Submit a signed transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SendTransactionRequest {
    pub transaction: Transaction,
    pub signatures: Vec<TransactionSignature>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SendTransactionResponse {
    pub hash: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetAccountRequest {
    pub address: String,
}

/// Balances per currency symbol, plus the account declaration if any.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetAccountResponse {
    pub address: String,
    #[serde(default)]
    pub balance: BTreeMap<String, f64>,
    #[serde(default)]
    pub declaration: Option<TxDeclaration>,
}

api_request!(GetLedgerRequest => GetLedgerResponse, "GetLedgerRequest", "GetLedgerResponse");
api_request!(GetTransactionRequest => GetTransactionResponse, "GetTransactionRequest", "GetTransactionResponse");
api_request!(SendTransactionRequest => SendTransactionResponse, "SendTransactionRequest", "SendTransactionResponse");
api_request!(GetAccountRequest => GetAccountResponse, "GetAccountRequest", "GetAccountResponse");

// =============================================================================
// MINING API
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetMiningTaskRequest {
    /// Miner address.
    pub address: String,
    pub resource: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetMiningTaskResponse {
    /// Absent when no task is available.
    #[serde(default)]
    pub task: Option<MiningTask>,
}

/// Proof-of-work task: find a secret whose hash matches `secret_hash` under `mask`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MiningTask {
    pub address: String,
    pub secret_hash: String,
    pub mask: String,
    pub currency: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ClaimMiningRequest {
    pub task_address: String,
    pub secret: String,
    pub receiver: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ClaimMiningResponse {
    pub transaction_hash: String,
}

api_request!(GetMiningTaskRequest => GetMiningTaskResponse, "GetMiningTaskRequest", "GetMiningTaskResponse");
api_request!(ClaimMiningRequest => ClaimMiningResponse, "ClaimMiningRequest", "ClaimMiningResponse");

// =============================================================================
// PAYLOAD CLASSIFICATION
// =============================================================================

/// Any response payload the node may send, decoded by type name.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponsePayload {
    GetLedger(GetLedgerResponse),
    GetTransaction(GetTransactionResponse),
    SendTransaction(SendTransactionResponse),
    GetAccount(GetAccountResponse),
    GetMiningTask(GetMiningTaskResponse),
    ClaimMining(ClaimMiningResponse),
}

impl ResponsePayload {
    /// Returns true if a decoder exists for `kind`.
    pub fn is_known(kind: &str) -> bool {
        matches!(
            kind,
            "GetLedgerResponse"
                | "GetTransactionResponse"
                | "SendTransactionResponse"
                | "GetAccountResponse"
                | "GetMiningTaskResponse"
                | "ClaimMiningResponse"
        )
    }

    /// Decode `data` according to the type name `kind`.
    pub fn decode(kind: &str, data: &Value) -> Result<Self, EnvelopeError> {
        fn parse<T: DeserializeOwned>(data: &Value) -> Result<T, EnvelopeError> {
            Ok(T::deserialize(data)?)
        }

        let payload = match kind {
            "GetLedgerResponse" => ResponsePayload::GetLedger(parse(data)?),
            "GetTransactionResponse" => ResponsePayload::GetTransaction(parse(data)?),
            "SendTransactionResponse" => ResponsePayload::SendTransaction(parse(data)?),
            "GetAccountResponse" => ResponsePayload::GetAccount(parse(data)?),
            "GetMiningTaskResponse" => ResponsePayload::GetMiningTask(parse(data)?),
            "ClaimMiningResponse" => ResponsePayload::ClaimMining(parse(data)?),
            other => return Err(EnvelopeError::UnknownType(other.to_string())),
        };
        Ok(payload)
    }

    /// Decode the payload of an envelope.
    pub fn from_envelope(envelope: &ResponseEnvelope) -> Result<Self, EnvelopeError> {
        Self::decode(&envelope.kind, &envelope.data)
    }
}
