//! # Request Correlation
//!
//! Matches incoming response frames to the requests waiting for them.
//!
//! ## Flow
//!
//! 1. The requester calls [`PendingRequests::register`] with its crid and
//!    keeps the returned receiver.
//! 2. The request frame is written to the connection.
//! 3. The connection reader hands every incoming frame to
//!    [`PendingRequests::dispatch_frame`].
//! 4. A frame whose crid is pending completes that request; frames without a
//!    crid are notifications and go back to the reader to classify.
//!
//! [`FrameTransport`] packages this flow as a [`Transport`] over a channel of
//! outgoing text frames.

use crate::ports::outbound::{Transport, TransportError};
use parking_lot::Mutex;
use serde_json::Value;
use shared_types::{EnvelopeError, RequestEnvelope, ResponseEnvelope};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

/// Outcome of routing one response.
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatch {
    /// Handed to the waiting requester
    Delivered,
    /// No crid: a push notification for the caller to classify
    Notification(ResponseEnvelope),
    /// A crid nobody is waiting for
    UnknownCrid(ResponseEnvelope),
    /// The requester stopped waiting before the response arrived
    Abandoned,
}

/// Requests waiting for a response, keyed by crid.
#[derive(Default)]
pub struct PendingRequests {
    pending: Mutex<HashMap<String, oneshot::Sender<ResponseEnvelope>>>,
}

impl PendingRequests {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a request and get a receiver for its response.
    ///
    /// Registering a crid twice replaces the earlier waiter, whose receiver
    /// then reports a closed channel.
    pub fn register(&self, crid: impl Into<String>) -> oneshot::Receiver<ResponseEnvelope> {
        let crid = crid.into();
        let (tx, rx) = oneshot::channel();

        if self.pending.lock().insert(crid.clone(), tx).is_some() {
            warn!(crid = %crid, "Replaced pending request with the same crid");
        }
        debug!(crid = %crid, "Registered pending request");

        rx
    }

    /// Route a parsed response.
    pub fn dispatch(&self, response: ResponseEnvelope) -> Dispatch {
        let Some(crid) = response.crid().map(str::to_owned) else {
            debug!(kind = %response.kind, "Received notification");
            return Dispatch::Notification(response);
        };

        let Some(sender) = self.pending.lock().remove(&crid) else {
            warn!(crid = %crid, kind = %response.kind, "Response for unknown crid");
            return Dispatch::UnknownCrid(response);
        };

        match sender.send(response) {
            Ok(()) => {
                debug!(crid = %crid, "Completed pending request");
                Dispatch::Delivered
            }
            Err(_) => {
                debug!(crid = %crid, "Pending request receiver dropped");
                Dispatch::Abandoned
            }
        }
    }

    /// Parse a text frame and route it.
    pub fn dispatch_frame(&self, frame: &str) -> Result<Dispatch, EnvelopeError> {
        let response = ResponseEnvelope::from_json(frame).inspect_err(|e| {
            warn!(error = %e, "Dropping malformed frame");
        })?;
        Ok(self.dispatch(response))
    }

    /// Stop waiting for `crid`. Returns false if it was not pending.
    pub fn cancel(&self, crid: &str) -> bool {
        self.pending.lock().remove(crid).is_some()
    }

    /// Fail every waiter, e.g. when the connection closes.
    pub fn close_all(&self) -> usize {
        let drained: Vec<_> = self.pending.lock().drain().collect();
        if !drained.is_empty() {
            debug!(count = drained.len(), "Closed pending requests");
        }
        drained.len()
    }

    pub fn len(&self) -> usize {
        self.pending.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.lock().is_empty()
    }
}

/// [`Transport`] writing JSON frames to a channel and waiting on
/// [`PendingRequests`] for the answers.
///
/// The connection task owns the other end of the channel and feeds incoming
/// frames to [`FrameTransport::pending`].
pub struct FrameTransport {
    outgoing: mpsc::UnboundedSender<String>,
    pending: Arc<PendingRequests>,
}

impl FrameTransport {
    pub fn new(outgoing: mpsc::UnboundedSender<String>, pending: Arc<PendingRequests>) -> Self {
        Self { outgoing, pending }
    }

    /// Shared waiter table the connection reader dispatches into.
    pub fn pending(&self) -> &Arc<PendingRequests> {
        &self.pending
    }
}

#[async_trait::async_trait]
impl Transport for FrameTransport {
    async fn send_request(
        &self,
        request: RequestEnvelope<Value>,
    ) -> Result<ResponseEnvelope, TransportError> {
        let frame = request
            .to_json()
            .map_err(|e| TransportError::Send(e.to_string()))?;

        let receiver = self.pending.register(request.crid.clone());
        if self.outgoing.send(frame).is_err() {
            self.pending.cancel(&request.crid);
            return Err(TransportError::ConnectionClosed);
        }

        let response = receiver
            .await
            .map_err(|_| TransportError::ConnectionClosed)?;

        match response.crid() {
            Some(crid) if crid == request.crid => Ok(response),
            other => Err(TransportError::CridMismatch {
                expected: request.crid,
                actual: other.unwrap_or_default().to_string(),
            }),
        }
    }
}
