//! Scripted in-memory channel for tests and offline runs.

use crate::domain::response::{PrecheckResponse, ReceiptResponse, TransactionReceipt};
use crate::domain::status::Status;
use crate::domain::transaction::codec;
use crate::infrastructure::rpc::{Method, NodeChannel, TransportCode};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Instant;

type Outcome = Result<Vec<u8>, TransportCode>;

/// Replays queued outcomes per method, in order. Once a method's queue is
/// empty every further call gets the fallback outcome (`UNAVAILABLE` unless
/// set otherwise).
pub struct MockChannel {
    scripts: parking_lot::Mutex<HashMap<Method, VecDeque<Outcome>>>,
    fallback: parking_lot::Mutex<Outcome>,
    submitted: parking_lot::Mutex<Vec<(Method, Vec<u8>)>>,
    connected: AtomicBool,
    calls: AtomicU64,
}

impl MockChannel {
    pub fn new() -> Self {
        Self {
            scripts: parking_lot::Mutex::new(HashMap::new()),
            fallback: parking_lot::Mutex::new(Err(TransportCode::Unavailable)),
            submitted: parking_lot::Mutex::new(Vec::new()),
            connected: AtomicBool::new(true),
            calls: AtomicU64::new(0),
        }
    }

    pub fn push(&self, method: Method, outcome: Outcome) {
        self.scripts.lock().entry(method).or_default().push_back(outcome);
    }

    pub fn push_transport_error(&self, method: Method, code: TransportCode) {
        self.push(method, Err(code));
    }

    pub fn push_precheck(&self, status: Status) {
        self.push(Method::SubmitTransaction, encode_outcome(&PrecheckResponse::new(status)));
    }

    pub fn push_receipt(&self, header_status: Status, receipt_status: Option<Status>) {
        let response = ReceiptResponse { header_status, receipt: receipt_status.map(TransactionReceipt::with_status) };
        self.push(Method::GetReceipt, encode_outcome(&response));
    }

    pub fn set_fallback(&self, outcome: Outcome) {
        *self.fallback.lock() = outcome;
    }

    /// Answers every submission with `status` once the script runs out.
    pub fn set_fallback_precheck(&self, status: Status) {
        self.set_fallback(encode_outcome(&PrecheckResponse::new(status)));
    }

    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::Relaxed);
    }

    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }

    pub fn submitted(&self) -> Vec<(Method, Vec<u8>)> {
        self.submitted.lock().clone()
    }

    pub fn submitted_for(&self, method: Method) -> Vec<Vec<u8>> {
        self.submitted.lock().iter().filter(|(m, _)| *m == method).map(|(_, bytes)| bytes.clone()).collect()
    }
}

fn encode_outcome<T: serde::Serialize>(value: &T) -> Outcome {
    codec::encode(value).map_err(|err| TransportCode::Other(err.to_string()))
}

impl Default for MockChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeChannel for MockChannel {
    fn submit(&self, method: Method, request: &[u8], _deadline: Instant) -> Result<Vec<u8>, TransportCode> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.submitted.lock().push((method, request.to_vec()));
        let scripted = self.scripts.lock().get_mut(&method).and_then(VecDeque::pop_front);
        match scripted {
            Some(outcome) => outcome,
            None => self.fallback.lock().clone(),
        }
    }

    fn is_connected(&self, _deadline: Instant) -> bool {
        self.connected.load(Ordering::Relaxed)
    }
}
