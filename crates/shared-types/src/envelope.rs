//! # Request/Response Envelope
//!
//! Every message exchanged with a node is wrapped in a small JSON envelope:
//!
//! ```text
//! request:  {"type": "<RequestType>",  "data": {...}, "crid": "<id>"}
//! response: {"type": "<ResponseType>", "data": {...}, "crid": "<id>", "result": 0}
//! ```
//!
//! ## Properties
//!
//! - **Correlation**: A response carries the `crid` of the request it answers.
//! - **Notifications**: A response with an absent or empty `crid` is a push
//!   notification and answers nothing.
//! - **Result Codes**: `result == 0` is success; any other value is a failure
//!   reported by the node.

use crate::errors::EnvelopeError;
use crate::ipc::ApiRequest;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Result code for a successful response.
pub const RESULT_OK: u8 = 0;

/// Outgoing request envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestEnvelope<T> {
    /// Request type name, e.g. `GetTransactionRequest`.
    #[serde(rename = "type")]
    pub kind: String,
    /// The request payload.
    pub data: T,
    /// Correlation id echoed back by the node.
    pub crid: String,
}

impl<T: ApiRequest> RequestEnvelope<T> {
    /// Wrap a typed request, naming it by its API type.
    pub fn new(data: T, crid: impl Into<String>) -> Self {
        Self {
            kind: T::TYPE.to_string(),
            data,
            crid: crid.into(),
        }
    }
}

impl<T: Serialize> RequestEnvelope<T> {
    /// Erase the payload type so the envelope can cross a transport boundary.
    pub fn into_raw(self) -> Result<RequestEnvelope<Value>, EnvelopeError> {
        Ok(RequestEnvelope {
            kind: self.kind,
            data: serde_json::to_value(self.data)?,
            crid: self.crid,
        })
    }

    /// Serialize to a JSON text frame.
    pub fn to_json(&self) -> Result<String, EnvelopeError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Incoming response envelope with the payload left undecoded.
///
/// The payload is decoded once the type name is known, either through
/// [`ResponseEnvelope::into_response`] for a typed request or through
/// [`crate::ipc::ResponsePayload::decode`] for anything the node pushes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    /// Response type name, e.g. `GetTransactionResponse`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Raw payload.
    #[serde(default)]
    pub data: Value,
    /// Correlation id; absent or empty for notifications.
    #[serde(default)]
    pub crid: Option<String>,
    /// Result code, 0 on success.
    #[serde(default)]
    pub result: u8,
}

impl ResponseEnvelope {
    /// Parse a JSON text frame.
    pub fn from_json(text: &str) -> Result<Self, EnvelopeError> {
        Ok(serde_json::from_str(text)?)
    }

    /// The correlation id, if this response answers a request.
    pub fn crid(&self) -> Option<&str> {
        self.crid.as_deref().filter(|crid| !crid.is_empty())
    }

    /// Returns true if the node reported success.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.result == RESULT_OK
    }

    /// Returns true if this is a push notification rather than a reply.
    #[must_use]
    pub fn is_notification(&self) -> bool {
        self.crid().is_none()
    }

    /// Decode the payload as `T` without checking type or result code.
    pub fn decode_data<T: DeserializeOwned>(&self) -> Result<T, EnvelopeError> {
        Ok(T::deserialize(&self.data)?)
    }

    /// Check result code and type name, then decode the response to `R`.
    pub fn into_response<R: ApiRequest>(self) -> Result<R::Response, EnvelopeError> {
        if !self.is_success() {
            return Err(EnvelopeError::RequestFailed {
                kind: self.kind,
                result: self.result,
            });
        }
        if self.kind != R::RESPONSE_TYPE {
            return Err(EnvelopeError::UnexpectedType {
                expected: R::RESPONSE_TYPE.to_string(),
                actual: self.kind,
            });
        }
        Ok(serde_json::from_value(self.data)?)
    }
}

/// Correlation id generator producing `"{seed}-{client}-{n}"`.
///
/// `n` starts at 0 and increases by one per id. Safe to share between tasks.
#[derive(Debug)]
pub struct CridGenerator {
    seed: i64,
    client: u32,
    counter: AtomicU64,
}

impl CridGenerator {
    /// Create a generator with an explicit seed and client id.
    pub fn new(seed: i64, client: u32) -> Self {
        Self {
            seed,
            client,
            counter: AtomicU64::new(0),
        }
    }

    /// Create a generator seeded with the current Unix time in seconds.
    pub fn from_clock(client: u32) -> Self {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs() as i64)
            .unwrap_or_default();
        Self::new(seed, client)
    }

    /// Produce the next id.
    pub fn next_crid(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        format!("{}-{}-{}", self.seed, self.client, n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ipc::{GetTransactionRequest, GetTransactionResponse};
    use std::collections::HashSet;
    use std::sync::Arc;

    const CAPTURED_RESPONSE: &str = r#"{"result":0,"type":"GetTransactionResponse","data":{"Transaction":{"Hash":"zIJZB67U0gTUnGq649baM/5ylbUE1ydm5WpJ7xn2XfQ=","Expire":1556277083,"Declarations":[{"Secret":"K/w77o6eeCFUiLzq6jTzKrQAoAn8BrurFaztYzsP68s=","Type":2}],"Inputs":[{"Address":"qg64nhvuzlj2lenndj3mg89gcswkuc3axtq2v40s","Currency":"IRO","Amount":0.00000001}],"Outputs":[{"Address":"qyunuamu8u9axnx8e6y0809qup2599snluyccvd2","Currency":"IRO","Amount":0.00000001}]}},"crid":"1560396570-0"}"#;

    #[test]
    fn test_request_envelope_shape() {
        let request = GetTransactionRequest {
            hash: "abc=".to_string(),
        };
        let envelope = RequestEnvelope::new(request, "1-1-0");
        let json: Value = serde_json::from_str(&envelope.to_json().unwrap()).unwrap();

        assert_eq!(json["type"], "GetTransactionRequest");
        assert_eq!(json["crid"], "1-1-0");
        assert_eq!(json["data"]["Hash"], "abc=");
    }

    #[test]
    fn test_into_raw_keeps_header() {
        let envelope = RequestEnvelope::new(
            GetTransactionRequest {
                hash: "h".to_string(),
            },
            "7",
        );
        let raw = envelope.into_raw().unwrap();
        assert_eq!(raw.kind, "GetTransactionRequest");
        assert_eq!(raw.crid, "7");
        assert_eq!(raw.data["Hash"], "h");
    }

    #[test]
    fn test_parse_captured_response() {
        let envelope = ResponseEnvelope::from_json(CAPTURED_RESPONSE).unwrap();

        assert!(envelope.is_success());
        assert!(!envelope.is_notification());
        assert_eq!(envelope.crid(), Some("1560396570-0"));

        let response = envelope
            .into_response::<GetTransactionRequest>()
            .unwrap();
        assert_eq!(
            response.transaction.hash,
            "zIJZB67U0gTUnGq649baM/5ylbUE1ydm5WpJ7xn2XfQ="
        );
        assert_eq!(response.transaction.expire, Some(1556277083));
    }

    #[test]
    fn test_notification_detection() {
        let missing = ResponseEnvelope::from_json(r#"{"type":"X","data":{}}"#).unwrap();
        let empty = ResponseEnvelope::from_json(r#"{"type":"X","data":{},"crid":""}"#).unwrap();

        assert!(missing.is_notification());
        assert!(empty.is_notification());
        assert_eq!(empty.crid(), None);
    }

    #[test]
    fn test_failed_result_code() {
        let envelope = ResponseEnvelope::from_json(
            r#"{"type":"GetTransactionResponse","data":null,"crid":"1","result":3}"#,
        )
        .unwrap();

        assert!(!envelope.is_success());
        assert_eq!(
            envelope.into_response::<GetTransactionRequest>().unwrap_err(),
            EnvelopeError::RequestFailed {
                kind: "GetTransactionResponse".to_string(),
                result: 3
            }
        );
    }

    #[test]
    fn test_mismatched_response_type() {
        let envelope =
            ResponseEnvelope::from_json(r#"{"type":"GetLedgerResponse","data":{},"crid":"1"}"#)
                .unwrap();

        assert!(matches!(
            envelope.into_response::<GetTransactionRequest>(),
            Err(EnvelopeError::UnexpectedType { .. })
        ));
    }

    #[test]
    fn test_decode_data_untyped() {
        let envelope = ResponseEnvelope::from_json(CAPTURED_RESPONSE).unwrap();
        let response: GetTransactionResponse = envelope.decode_data().unwrap();
        assert_eq!(response.transaction.inputs.len(), 1);
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            ResponseEnvelope::from_json("{not json"),
            Err(EnvelopeError::Json(_))
        ));
    }

    #[test]
    fn test_crid_format_and_sequence() {
        let generator = CridGenerator::new(1560396570, 1);
        assert_eq!(generator.next_crid(), "1560396570-1-0");
        assert_eq!(generator.next_crid(), "1560396570-1-1");
        assert_eq!(generator.next_crid(), "1560396570-1-2");
    }

    #[test]
    fn test_crid_unique_across_threads() {
        let generator = Arc::new(CridGenerator::from_clock(2));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let generator = Arc::clone(&generator);
                std::thread::spawn(move || {
                    (0..100).map(|_| generator.next_crid()).collect::<Vec<_>>()
                })
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for crid in handle.join().unwrap() {
                assert!(seen.insert(crid));
            }
        }
        assert_eq!(seen.len(), 800);
    }
}
