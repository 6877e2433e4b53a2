//! # Test Fixtures
//!
//! A simulated node speaking the JSON envelope protocol, and the plumbing
//! that connects it to a [`FrameTransport`].
//!
//! The node accepts signed transactions, keeps balances, closes one ledger
//! per accepted transaction and pushes that ledger to the client as a
//! notification before answering.

use parking_lot::Mutex;
use rm_protocol::{
    signature_from_api, transaction_from_api, verify_transaction, Dispatch, FrameTransport,
    PendingRequests, NETWORK,
};
use serde::Serialize;
use serde_json::Value;
use shared_types::{
    GetAccountRequest, GetAccountResponse, GetLedgerResponse, GetTransactionRequest,
    GetTransactionResponse, Ledger, RequestEnvelope, ResponseEnvelope, SendTransactionRequest,
    SendTransactionResponse, Transaction as WireTransaction, TransactionHeader,
};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

/// Transaction captured from a live node, with its declared hash.
pub const CAPTURED_TRANSACTION: &str = r#"{"Hash":"zIJZB67U0gTUnGq649baM/5ylbUE1ydm5WpJ7xn2XfQ=","Expire":1556277083,"Declarations":[{"Secret":"K/w77o6eeCFUiLzq6jTzKrQAoAn8BrurFaztYzsP68s=","Type":2}],"Inputs":[{"Address":"qg64nhvuzlj2lenndj3mg89gcswkuc3axtq2v40s","Currency":"IRO","Amount":0.00000001}],"Outputs":[{"Address":"qyunuamu8u9axnx8e6y0809qup2599snluyccvd2","Currency":"IRO","Amount":0.00000001}]}"#;

/// Private key with published reference vectors.
pub const REFERENCE_KEY: &str = "7r7oFxKhhaH7UvMLpUXlcIEk0WWx7i4nw6BVnrKCmLk=";

/// Node result code for a transaction with a missing or bad signature.
pub const RESULT_REJECTED: u8 = 1;

/// Node result code for an unknown transaction.
pub const RESULT_NOT_FOUND: u8 = 2;

/// Node result code for a request type it does not serve.
pub const RESULT_UNSUPPORTED: u8 = 3;

#[derive(Default)]
struct NodeState {
    transactions: HashMap<String, WireTransaction>,
    /// Balances in base units, by address then currency symbol
    balances: HashMap<String, BTreeMap<String, i64>>,
    ledger: Ledger,
}

/// In-process stand-in for a node.
pub struct SimulatedNode {
    network: Vec<u8>,
    state: Mutex<NodeState>,
    hang_up_on: Option<&'static str>,
}

impl Default for SimulatedNode {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedNode {
    pub fn new() -> Self {
        Self {
            network: NETWORK.to_vec(),
            state: Mutex::new(NodeState::default()),
            hang_up_on: None,
        }
    }

    /// Node verifying signatures under another signing domain.
    pub fn with_network(network: &[u8]) -> Self {
        Self {
            network: network.to_vec(),
            ..Self::new()
        }
    }

    /// Node dropping the connection when it receives `kind`.
    pub fn hanging_up_on(kind: &'static str) -> Self {
        Self {
            hang_up_on: Some(kind),
            ..Self::new()
        }
    }

    /// Seed a transaction as if it had been accepted earlier.
    pub fn preload(&self, transaction: WireTransaction) {
        let mut state = self.state.lock();
        state.transactions.insert(transaction.hash.clone(), transaction);
    }

    pub fn ledger_height(&self) -> i64 {
        self.state.lock().ledger.height
    }

    /// Answer one request. Returns the frames to deliver, in order.
    pub fn handle(&self, request: &RequestEnvelope<Value>) -> Vec<ResponseEnvelope> {
        let reply_kind = request.kind.replace("Request", "Response");
        let reply = |result: u8, data: Value| ResponseEnvelope {
            kind: reply_kind.clone(),
            data,
            crid: Some(request.crid.clone()),
            result,
        };

        match request.kind.as_str() {
            "SendTransactionRequest" => match decode::<SendTransactionRequest>(&request.data) {
                Some(send) => match self.accept(&send) {
                    Some((hash, ledger)) => vec![
                        notification(ledger),
                        reply(0, to_value(&SendTransactionResponse { hash })),
                    ],
                    None => vec![reply(RESULT_REJECTED, Value::Null)],
                },
                None => vec![reply(RESULT_REJECTED, Value::Null)],
            },
            "GetTransactionRequest" => {
                let found = decode::<GetTransactionRequest>(&request.data)
                    .and_then(|get| self.state.lock().transactions.get(&get.hash).cloned());
                match found {
                    Some(transaction) => {
                        vec![reply(0, to_value(&GetTransactionResponse { transaction }))]
                    }
                    None => vec![reply(RESULT_NOT_FOUND, Value::Null)],
                }
            }
            "GetAccountRequest" => match decode::<GetAccountRequest>(&request.data) {
                Some(get) => vec![reply(0, to_value(&self.account(get.address)))],
                None => vec![reply(RESULT_REJECTED, Value::Null)],
            },
            "GetLedgerRequest" => {
                let ledger = self.state.lock().ledger.clone();
                vec![reply(0, to_value(&GetLedgerResponse { ledger }))]
            }
            _ => vec![reply(RESULT_UNSUPPORTED, Value::Null)],
        }
    }

    /// Check signatures, apply balances and close a ledger.
    fn accept(&self, send: &SendTransactionRequest) -> Option<(String, Ledger)> {
        let transaction = transaction_from_api(&send.transaction).ok()?;
        if send.signatures.is_empty() {
            return None;
        }
        for signature in &send.signatures {
            let (public_key, signature) = signature_from_api(signature).ok()?;
            if !verify_transaction(&public_key, &transaction, &signature, &self.network).ok()? {
                debug!("Simulated node rejected a signature");
                return None;
            }
        }
        let hash = transaction.hash().ok()?.to_base64();

        let mut state = self.state.lock();
        for input in transaction.inputs() {
            *state
                .balances
                .entry(input.address().to_string())
                .or_default()
                .entry(input.currency().symbol())
                .or_default() -= input.amount().units();
        }
        for output in transaction.outputs() {
            *state
                .balances
                .entry(output.address().to_string())
                .or_default()
                .entry(output.currency().symbol())
                .or_default() += output.amount().units();
        }

        let mut stored = send.transaction.clone();
        stored.hash = hash.clone();
        state.transactions.insert(hash.clone(), stored);

        let previous = std::mem::take(&mut state.ledger);
        state.ledger = Ledger {
            height: previous.height + 1,
            hash: format!("ledger-{}", previous.height + 1),
            lastledger: previous.hash,
            version: 1,
            transactions: vec![TransactionHeader {
                index: 0,
                hash: hash.clone(),
                fee: None,
                has_declaration: !send.transaction.declarations.is_empty(),
            }],
            ..Ledger::default()
        };
        Some((hash, state.ledger.clone()))
    }

    fn account(&self, address: String) -> GetAccountResponse {
        let balance = self
            .state
            .lock()
            .balances
            .get(&address)
            .map(|per_currency| {
                per_currency
                    .iter()
                    .map(|(symbol, units)| {
                        (symbol.clone(), *units as f64 / rm_protocol::UNITS_PER_COIN as f64)
                    })
                    .collect()
            })
            .unwrap_or_default();

        GetAccountResponse {
            address,
            balance,
            declaration: None,
        }
    }
}

fn decode<T: serde::de::DeserializeOwned>(data: &Value) -> Option<T> {
    T::deserialize(data).ok()
}

fn to_value<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or_default()
}

fn notification(ledger: Ledger) -> ResponseEnvelope {
    ResponseEnvelope {
        kind: "GetLedgerResponse".to_string(),
        data: to_value(&GetLedgerResponse { ledger }),
        crid: None,
        result: 0,
    }
}

/// Client side of a connection to a [`SimulatedNode`].
pub struct Connection {
    pub transport: FrameTransport,
    /// Frames the node pushed without a crid
    pub notifications: mpsc::UnboundedReceiver<ResponseEnvelope>,
    pub task: JoinHandle<()>,
}

/// Connect a [`FrameTransport`] to `node` through a background task.
///
/// The task plays both the node and the connection reader: every request
/// frame is answered, and every answer is parsed from text and dispatched
/// into the transport's pending table.
pub fn connect(node: Arc<SimulatedNode>) -> Connection {
    let (outgoing, mut requests) = mpsc::unbounded_channel::<String>();
    let (pushed, notifications) = mpsc::unbounded_channel();
    let pending = Arc::new(PendingRequests::new());
    let transport = FrameTransport::new(outgoing, Arc::clone(&pending));

    let task = tokio::spawn(async move {
        while let Some(frame) = requests.recv().await {
            let Ok(request) = serde_json::from_str::<RequestEnvelope<Value>>(&frame) else {
                continue;
            };
            if node.hang_up_on == Some(request.kind.as_str()) {
                break;
            }

            for response in node.handle(&request) {
                let Ok(text) = serde_json::to_string(&response) else {
                    continue;
                };
                if let Ok(Dispatch::Notification(envelope)) = pending.dispatch_frame(&text) {
                    let _ = pushed.send(envelope);
                }
            }
        }
        pending.close_all();
    });

    Connection {
        transport,
        notifications,
        task,
    }
}
