//! In-memory executor for tests/dev.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use serde_json::Value;

use crate::error::TransportError;
use crate::executor::{Method, Params, RequestExecutor};
use crate::request::RecordedRequest;

type Route = (Method, String);

/// Executor that replays queued responses and records every call.
///
/// - No IO
/// - Responses are queued per `(method, path)` and consumed in order
/// - A request with nothing queued fails with [`TransportError::Unscripted`]
#[derive(Debug, Default)]
pub struct ScriptedExecutor {
    responses: Mutex<HashMap<Route, VecDeque<Result<Value, TransportError>>>>,
    calls: Mutex<Vec<RecordedRequest>>,
}

impl ScriptedExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a JSON response for `method path`.
    pub fn respond(&self, method: Method, path: impl Into<String>, body: Value) -> &Self {
        self.enqueue(method, path.into(), Ok(body));
        self
    }

    /// Queue a JSON response for `GET path`.
    pub fn respond_get(&self, path: impl Into<String>, body: Value) -> &Self {
        self.respond(Method::Get, path, body)
    }

    /// Queue a JSON response for `POST path`.
    pub fn respond_post(&self, path: impl Into<String>, body: Value) -> &Self {
        self.respond(Method::Post, path, body)
    }

    /// Queue a failure for `method path`.
    pub fn fail(&self, method: Method, path: impl Into<String>, error: TransportError) -> &Self {
        self.enqueue(method, path.into(), Err(error));
        self
    }

    /// Every request seen so far, in call order.
    pub fn calls(&self) -> Vec<RecordedRequest> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|calls| calls.len()).unwrap_or_default()
    }

    /// Requests made to `path`, in call order.
    pub fn calls_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.calls()
            .into_iter()
            .filter(|call| call.path() == path)
            .collect()
    }

    /// Number of queued responses not yet consumed.
    pub fn pending(&self) -> usize {
        self.responses
            .lock()
            .map(|routes| routes.values().map(VecDeque::len).sum())
            .unwrap_or_default()
    }

    fn enqueue(&self, method: Method, path: String, response: Result<Value, TransportError>) {
        // A poisoned lock only happens after a panic in a test; dropping the script is fine.
        if let Ok(mut routes) = self.responses.lock() {
            routes.entry((method, path)).or_default().push_back(response);
        }
    }

    fn dispatch(
        &self,
        method: Method,
        path: &str,
        params: Params,
        body: Option<String>,
    ) -> Result<Value, TransportError> {
        tracing::trace!(%method, path, "scripted request");
        self.calls
            .lock()
            .map_err(|_| TransportError::Poisoned)?
            .push(RecordedRequest::new(method, path, params, body));

        let mut routes = self.responses.lock().map_err(|_| TransportError::Poisoned)?;
        routes
            .get_mut(&(method, path.to_string()))
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| {
                Err(TransportError::Unscripted {
                    method: method.to_string(),
                    path: path.to_string(),
                })
            })
    }
}

impl RequestExecutor for ScriptedExecutor {
    fn get(&self, path: &str, params: &Params) -> Result<Value, TransportError> {
        self.dispatch(Method::Get, path, params.clone(), None)
    }

    fn post(&self, path: &str, data: &Params) -> Result<Value, TransportError> {
        self.dispatch(Method::Post, path, data.clone(), None)
    }

    fn request(
        &self,
        method: Method,
        path: &str,
        data: Option<&str>,
    ) -> Result<Value, TransportError> {
        self.dispatch(method, path, Vec::new(), data.map(str::to_owned))
    }
}
