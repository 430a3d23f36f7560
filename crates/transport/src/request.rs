use serde::{Deserialize, Serialize};

use crate::executor::{Method, Params};

/// A request as seen by an executor, kept for later assertions.
///
/// `params` holds query parameters for `GET` and form data for `POST`; `body` holds the
/// raw body passed to [`RequestExecutor::request`](crate::RequestExecutor::request).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedRequest {
    method: Method,
    path: String,
    params: Params,
    body: Option<String>,
}

impl RecordedRequest {
    pub fn new(method: Method, path: impl Into<String>, params: Params, body: Option<String>) -> Self {
        Self {
            method,
            path: path.into(),
            params,
            body,
        }
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Value of the first parameter named `name`.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }
}
