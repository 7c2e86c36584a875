//! Request execution engine.
//!
//! Drives one request across the client's nodes: picks a node per attempt,
//! submits, classifies the answer and decides whether to return, retry or
//! fail. Request kinds plug in through [`Executable`].

use crate::application::client::Client;
use crate::domain::node::{select_node, NodeHealth};
use crate::domain::status::{classify, ExecutionState, Status};
use crate::foundation::util::time::doubled_capped;
use crate::foundation::{AccountId, LedgerError, TransactionId, DEFAULT_GRPC_DEADLINE, DEFAULT_MAX_ATTEMPTS, DEFAULT_MAX_BACKOFF, DEFAULT_MIN_BACKOFF};
use crate::infrastructure::network::{Node, ResolvedNode};
use crate::infrastructure::rpc::{Method, TransportCode};
use log::{debug, info, trace, warn};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Observes or rewrites raw bytes on their way to or from a node.
pub type ByteListener = Arc<dyn Fn(Vec<u8>) -> Vec<u8> + Send + Sync>;

/// Per-request overrides of the client's execution defaults.
#[derive(Clone, Default)]
pub struct ExecutionSettings {
    node_account_ids: Vec<AccountId>,
    max_attempts: Option<u32>,
    min_backoff: Option<Duration>,
    max_backoff: Option<Duration>,
    grpc_deadline: Option<Duration>,
    request_listener: Option<ByteListener>,
    response_listener: Option<ByteListener>,
}

impl ExecutionSettings {
    pub fn node_account_ids(&self) -> &[AccountId] {
        &self.node_account_ids
    }

    pub(crate) fn set_node_account_ids(&mut self, node_account_ids: Vec<AccountId>) {
        self.node_account_ids = node_account_ids;
    }

    pub fn max_attempts(&self) -> Option<u32> {
        self.max_attempts
    }

    pub fn set_max_attempts(&mut self, attempts: u32) -> &mut Self {
        self.max_attempts = Some(attempts);
        self
    }

    pub fn min_backoff(&self) -> Option<Duration> {
        self.min_backoff
    }

    pub fn set_min_backoff(&mut self, backoff: Duration) -> Result<&mut Self, LedgerError> {
        if self.max_backoff.is_some_and(|max| backoff > max) {
            return Err(LedgerError::InvalidArgument("minimum backoff would be larger than maximum backoff".to_string()));
        }
        self.min_backoff = Some(backoff);
        Ok(self)
    }

    pub fn max_backoff(&self) -> Option<Duration> {
        self.max_backoff
    }

    pub fn set_max_backoff(&mut self, backoff: Duration) -> Result<&mut Self, LedgerError> {
        if self.min_backoff.is_some_and(|min| backoff < min) {
            return Err(LedgerError::InvalidArgument("maximum backoff would be smaller than minimum backoff".to_string()));
        }
        self.max_backoff = Some(backoff);
        Ok(self)
    }

    pub fn grpc_deadline(&self) -> Option<Duration> {
        self.grpc_deadline
    }

    pub fn set_grpc_deadline(&mut self, deadline: Duration) -> &mut Self {
        self.grpc_deadline = Some(deadline);
        self
    }

    pub fn set_request_listener(&mut self, listener: ByteListener) -> &mut Self {
        self.request_listener = Some(listener);
        self
    }

    pub fn set_response_listener(&mut self, listener: ByteListener) -> &mut Self {
        self.response_listener = Some(listener);
        self
    }
}

impl fmt::Debug for ExecutionSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionSettings")
            .field("node_account_ids", &self.node_account_ids)
            .field("max_attempts", &self.max_attempts)
            .field("min_backoff", &self.min_backoff)
            .field("max_backoff", &self.max_backoff)
            .field("grpc_deadline", &self.grpc_deadline)
            .field("request_listener", &self.request_listener.is_some())
            .field("response_listener", &self.response_listener.is_some())
            .finish()
    }
}

/// Settings after request → client → default resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct ResolvedSettings {
    max_attempts: u32,
    min_backoff: Duration,
    max_backoff: Duration,
    grpc_deadline: Duration,
}

impl ResolvedSettings {
    fn resolve(settings: &ExecutionSettings, client: &Client) -> Self {
        let min_backoff = settings.min_backoff.or(client.min_backoff()).unwrap_or(DEFAULT_MIN_BACKOFF);
        let max_backoff = settings.max_backoff.or(client.max_backoff()).unwrap_or(DEFAULT_MAX_BACKOFF);
        Self {
            max_attempts: settings.max_attempts.or(client.max_attempts()).unwrap_or(DEFAULT_MAX_ATTEMPTS),
            min_backoff,
            // Request and client values can mix; never let the cap undercut the start.
            max_backoff: max_backoff.max(min_backoff),
            grpc_deadline: settings.grpc_deadline.or(client.grpc_deadline()).unwrap_or(DEFAULT_GRPC_DEADLINE),
        }
    }
}

/// A request kind the engine can drive.
pub trait Executable {
    /// Decoded node answer.
    type Response;
    /// What a successful execution returns to the caller.
    type Output;

    fn settings(&self) -> &ExecutionSettings;
    fn settings_mut(&mut self) -> &mut ExecutionSettings;

    /// Short name used in log lines.
    fn kind(&self) -> &'static str;

    fn method(&self) -> Method;

    /// Runs once per execution, before nodes are resolved.
    fn on_execute(&mut self, _client: &Client) -> Result<(), LedgerError> {
        Ok(())
    }

    /// Wire bytes for the envelope at `envelope_index`.
    fn build_request(&mut self, envelope_index: usize) -> Result<Vec<u8>, LedgerError>;

    fn submit(&self, node: &Node, request: &[u8], deadline: Instant) -> Result<Vec<u8>, TransportCode> {
        node.channel().submit(self.method(), request, deadline)
    }

    fn decode_response(&self, bytes: &[u8]) -> Result<Self::Response, LedgerError>;

    fn map_status(&self, response: &Self::Response) -> Status;

    /// May mutate the request (e.g. regenerate its id) before asking for a retry.
    fn determine_status(&mut self, status: Status, _client: &Client, _response: &Self::Response) -> Result<ExecutionState, LedgerError> {
        Ok(classify(status))
    }

    fn map_response(&self, response: Self::Response, node_account_id: AccountId, envelope_index: usize) -> Result<Self::Output, LedgerError>;

    /// Identity reported in precheck errors.
    fn request_id(&self) -> Option<TransactionId>;
}

/// Executes with the client's request timeout.
pub fn execute<E: Executable + ?Sized>(request: &mut E, client: &Client) -> Result<E::Output, LedgerError> {
    execute_with_timeout(request, client, client.request_timeout())
}

pub fn execute_with_timeout<E: Executable + ?Sized>(request: &mut E, client: &Client, timeout: Duration) -> Result<E::Output, LedgerError> {
    let params = ResolvedSettings::resolve(request.settings(), client);
    request.on_execute(client)?;

    if request.settings().node_account_ids().is_empty() {
        let ids = client.network().node_account_ids_for_execute();
        request.settings_mut().set_node_account_ids(ids);
    }
    let nodes = client.network().resolve(request.settings().node_account_ids())?;
    if nodes.is_empty() {
        return Err(LedgerError::uninitialized("client network has no nodes"));
    }

    let kind = request.kind();
    let started = Instant::now();
    let overall_deadline = started.checked_add(timeout);
    info!(
        "execute start kind={} request_id={} nodes={} max_attempts={} timeout_ms={}",
        kind,
        display_id(request.request_id()),
        nodes.len(),
        params.max_attempts,
        timeout.as_millis()
    );

    let mut call_backoff = params.min_backoff;
    // Last status per proxy, keyed by position in `nodes`.
    let mut statuses: HashMap<usize, Status> = HashMap::new();
    let mut attempt: u32 = 0;

    loop {
        let attempt_deadline = attempt_deadline(params.grpc_deadline, overall_deadline);
        if attempt >= params.max_attempts {
            warn!(
                "execute exhausted attempts kind={} request_id={} attempts={} elapsed_ms={}",
                kind,
                display_id(request.request_id()),
                attempt,
                started.elapsed().as_millis()
            );
            return Err(LedgerError::MaxAttemptsExceeded { max_attempts: params.max_attempts });
        }

        let Some(index) = select_node(&nodes, attempt) else {
            return Err(LedgerError::uninitialized("client network has no nodes"));
        };
        let ResolvedNode { node, envelope_index } = &nodes[index];

        if !node.is_healthy() {
            let wait = node.remaining_backoff();
            debug!("execute waiting on node backoff kind={} node={} wait_ms={}", kind, node.account_id(), wait.as_millis());
            thread::sleep(wait);
        }

        if !node.is_connected(attempt_deadline) {
            warn!("execute node not connected kind={} node={} attempt={}", kind, node.account_id(), attempt);
            node.increase_backoff();
            attempt += 1;
            continue;
        }

        let mut request_bytes = request.build_request(*envelope_index)?;
        if let Some(listener) = request.settings().request_listener.clone() {
            request_bytes = listener(request_bytes);
        }

        trace!("execute submit kind={} node={} attempt={} request_len={}", kind, node.account_id(), attempt, request_bytes.len());
        let response_bytes = match request.submit(node, &request_bytes, attempt_deadline) {
            Ok(bytes) => bytes,
            Err(code) if code.is_transient() => {
                warn!("execute transport failure kind={} node={} attempt={} code={}", kind, node.account_id(), attempt, code);
                node.increase_backoff();
                attempt += 1;
                continue;
            }
            Err(code) => {
                return Err(LedgerError::TransportError { operation: request.method().to_string(), details: code.to_string() });
            }
        };
        node.decrease_backoff();

        let response_bytes = match request.settings().response_listener.clone() {
            Some(listener) => listener(response_bytes),
            None => response_bytes,
        };
        let response = request.decode_response(&response_bytes)?;
        let status = request.map_status(&response);
        statuses.insert(index, status);

        match request.determine_status(status, client, &response)? {
            ExecutionState::ServerError => {
                let all_busy = statuses.len() == nodes.len() && statuses.values().all(|s| *s == Status::Busy);
                if !all_busy {
                    debug!("execute server error kind={} node={} status={} attempt={}", kind, node.account_id(), status, attempt);
                    attempt += 1;
                    continue;
                }
                warn!("execute every node busy kind={} backoff_ms={}", kind, call_backoff.as_millis());
                statuses.clear();
                call_backoff = wait_call_backoff(call_backoff, params.max_backoff);
            }
            ExecutionState::Retry => {
                debug!("execute retry kind={} node={} status={} backoff_ms={}", kind, node.account_id(), status, call_backoff.as_millis());
                call_backoff = wait_call_backoff(call_backoff, params.max_backoff);
            }
            ExecutionState::RequestError => {
                warn!("execute rejected kind={} node={} status={} request_id={}", kind, node.account_id(), status, display_id(request.request_id()));
                return Err(LedgerError::Precheck { status, transaction_id: request.request_id() });
            }
            ExecutionState::Success => {
                info!(
                    "execute success kind={} node={} attempts={} elapsed_ms={}",
                    kind,
                    node.account_id(),
                    attempt + 1,
                    started.elapsed().as_millis()
                );
                return request.map_response(response, node.account_id(), *envelope_index);
            }
        }
        attempt += 1;
    }
}

/// Per-attempt deadline: the gRPC deadline from now, never past the overall one.
fn attempt_deadline(grpc_deadline: Duration, overall: Option<Instant>) -> Instant {
    let now = Instant::now();
    match (now.checked_add(grpc_deadline), overall) {
        (Some(at), Some(overall)) => at.min(overall),
        (Some(at), None) => at,
        (None, Some(overall)) => overall,
        (None, None) => now,
    }
}

/// Sleeps `current`, returning the next call-level backoff.
fn wait_call_backoff(current: Duration, max: Duration) -> Duration {
    thread::sleep(current);
    doubled_capped(current, max)
}

fn display_id(id: Option<TransactionId>) -> String {
    id.map(|id| id.to_string()).unwrap_or_else(|| "none".to_string())
}

/// Runs the blocking engine on tokio's blocking pool.
pub async fn execute_async<E>(mut request: E, client: Client) -> Result<E::Output, LedgerError>
where
    E: Executable + Send + 'static,
    E::Output: Send + 'static,
{
    tokio::task::spawn_blocking(move || execute(&mut request, &client))
        .await
        .map_err(|err| LedgerError::TaskFailed(format!("execute task: {}", err)))?
}

/// Runs the engine on a dedicated thread and hands the outcome to `callback`.
pub fn execute_with_callback<E, F>(mut request: E, client: Client, callback: F) -> Result<thread::JoinHandle<()>, LedgerError>
where
    E: Executable + Send + 'static,
    F: FnOnce(Result<E::Output, LedgerError>) + Send + 'static,
{
    let kind = request.kind();
    let handle = thread::Builder::new()
        .name(format!("ledger-execute-{}", kind))
        .spawn(move || callback(execute(&mut request, &client)))
        .map_err(|err| LedgerError::TaskFailed(format!("spawn execute thread: {}", err)))?;
    Ok(handle)
}
