//! Executor contract consumed by the client core.

use core::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::TransportError;

/// Ordered query/form parameters.
pub type Params = Vec<(String, String)>;

/// HTTP verb for [`RequestExecutor::request`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        };
        f.write_str(verb)
    }
}

/// Performs authenticated API calls and returns parsed JSON.
///
/// ## Contract
///
/// - Paths are relative to the API root (e.g. `api/info/`); implementations own the host,
///   credentials and headers.
/// - A successful call returns the decoded JSON body, whatever its shape. API-level error
///   envelopes (`{"json": {"errors": [...]}}`) are **not** failures at this layer.
/// - Transport and authentication failures are returned as [`TransportError`]; the core
///   never interprets them.
/// - Calls block. There is no retry at the core level.
///
/// ## Thread Safety
///
/// Executors are `Send + Sync` so one executor can back several independent clients.
pub trait RequestExecutor: Send + Sync {
    /// `GET path?params`.
    fn get(&self, path: &str, params: &Params) -> Result<Value, TransportError>;

    /// `POST path` with form `data`.
    fn post(&self, path: &str, data: &Params) -> Result<Value, TransportError>;

    /// Arbitrary verb with an optional raw body (JSON-encoded by the caller).
    fn request(
        &self,
        method: Method,
        path: &str,
        data: Option<&str>,
    ) -> Result<Value, TransportError>;
}

impl<E> RequestExecutor for Arc<E>
where
    E: RequestExecutor + ?Sized,
{
    fn get(&self, path: &str, params: &Params) -> Result<Value, TransportError> {
        (**self).get(path, params)
    }

    fn post(&self, path: &str, data: &Params) -> Result<Value, TransportError> {
        (**self).post(path, data)
    }

    fn request(
        &self,
        method: Method,
        path: &str,
        data: Option<&str>,
    ) -> Result<Value, TransportError> {
        (**self).request(method, path, data)
    }
}

/// Build a [`Params`] list from string pairs.
pub fn params<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Params
where
    K: Into<String>,
    V: Into<String>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}
