//! Error model shared by every thingkit crate.

use core::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::value_object::ValueObject;

/// Result type used across the client layer.
pub type ThingResult<T> = Result<T, ThingError>;

/// Opaque failure handed back by a request executor.
///
/// The core never inspects these; it only carries them to the caller.
pub type TransportFailure = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Client-level error.
///
/// Variants are grouped by the taxonomy callers usually branch on: usage errors,
/// malformed identities, server-reported API errors, client-side consistency errors and
/// transport failures.
#[derive(Debug, Error)]
pub enum ThingError {
    /// An entity was constructed with the wrong number of identity inputs.
    #[error("{0}")]
    Usage(String),

    /// An identifier failed structural validation.
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A URL did not contain a recognisable identifier.
    #[error("{message}")]
    InvalidUrl { url: String, message: String },

    /// The server reported one or more errors.
    #[error(transparent)]
    Api(#[from] RedditApiError),

    /// Expected data was absent (e.g. a refreshed comment is not in the returned tree).
    #[error("{0}")]
    Client(String),

    /// An attribute is not present, even after fetching.
    #[error("'{entity}' object has no attribute '{attribute}'")]
    MissingAttribute { entity: String, attribute: String },

    /// A payload did not have the structure a fetch or parse step needs.
    #[error("unexpected response shape: {0}")]
    UnexpectedShape(String),

    /// A configuration value could not be used.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Failure raised by the request executor, passed through untouched.
    #[error(transparent)]
    Transport(TransportFailure),
}

impl ThingError {
    pub fn usage(msg: impl Into<String>) -> Self {
        Self::Usage(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    /// Invalid URL with the default message.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        let url = url.into();
        Self::InvalidUrl {
            message: format!("Invalid URL: {url}"),
            url,
        }
    }

    /// Invalid URL with a custom message; `{}` in `template` is replaced by the URL.
    pub fn invalid_url_with(url: impl Into<String>, template: &str) -> Self {
        let url = url.into();
        Self::InvalidUrl {
            message: template.replacen("{}", &url, 1),
            url,
        }
    }

    pub fn client(msg: impl Into<String>) -> Self {
        Self::Client(msg.into())
    }

    pub fn missing_attribute(entity: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self::MissingAttribute {
            entity: entity.into(),
            attribute: attribute.into(),
        }
    }

    pub fn unexpected_shape(msg: impl Into<String>) -> Self {
        Self::UnexpectedShape(msg.into())
    }

    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    pub fn transport(err: impl Into<TransportFailure>) -> Self {
        Self::Transport(err.into())
    }

    /// Construction contract violated (TypeError-class).
    pub fn is_usage(&self) -> bool {
        matches!(self, Self::Usage(_))
    }

    /// Identity string or URL failed validation (ValueError-class).
    pub fn is_malformed_identity(&self) -> bool {
        matches!(self, Self::InvalidId(_) | Self::InvalidUrl { .. })
    }

    /// Client-side error: consistency failures and malformed URLs.
    pub fn is_client(&self) -> bool {
        matches!(self, Self::Client(_) | Self::InvalidUrl { .. })
    }

    pub fn is_missing_attribute(&self) -> bool {
        matches!(self, Self::MissingAttribute { .. })
    }

    /// The aggregated API error, if this is one.
    pub fn as_api(&self) -> Option<&RedditApiError> {
        match self {
            Self::Api(err) => Some(err),
            _ => None,
        }
    }
}

/// One error reported by the API: `(error_type, message, field)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ErrorItem {
    error_type: String,
    message: String,
    field: Option<String>,
}

impl ErrorItem {
    pub fn new(
        error_type: impl Into<String>,
        message: impl Into<String>,
        field: Option<impl Into<String>>,
    ) -> Self {
        Self {
            error_type: error_type.into(),
            message: message.into(),
            field: field.map(Into::into),
        }
    }

    pub fn error_type(&self) -> &str {
        &self.error_type
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    /// Human readable form, e.g. `BAD_SOMETHING: 'invalid something' on field 'name'`.
    pub fn error_message(&self) -> String {
        let mut msg = format!("{}: '{}'", self.error_type, self.message);
        if let Some(field) = &self.field {
            msg.push_str(&format!(" on field '{field}'"));
        }
        msg
    }
}

impl fmt::Display for ErrorItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.error_message())
    }
}

impl ValueObject for ErrorItem {}

/// All errors reported by one API error envelope.
///
/// Never empty: [`RedditApiError::new`] rejects an empty item list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedditApiError {
    items: Vec<ErrorItem>,
}

impl RedditApiError {
    pub fn new(items: Vec<ErrorItem>) -> ThingResult<Self> {
        if items.is_empty() {
            return Err(ThingError::client(
                "an API error must carry at least one error item",
            ));
        }
        Ok(Self { items })
    }

    pub fn items(&self) -> &[ErrorItem] {
        &self.items
    }

    /// The first reported item; always present.
    pub fn first(&self) -> &ErrorItem {
        &self.items[0]
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Hash for RedditApiError {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.items.hash(state);
    }
}

impl fmt::Display for RedditApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .items
            .iter()
            .map(ErrorItem::error_message)
            .collect::<Vec<_>>()
            .join("\n");
        f.write_str(&joined)
    }
}

impl std::error::Error for RedditApiError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of<T: Hash>(value: &T) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    fn bad_something() -> ErrorItem {
        ErrorItem::new("BAD_SOMETHING", "invalid something", Some("some_field"))
    }

    #[test]
    fn error_item_equality_and_hash_cover_all_fields() {
        assert_eq!(bad_something(), bad_something());
        assert_eq!(hash_of(&bad_something()), hash_of(&bad_something()));

        let other_field = ErrorItem::new("BAD_SOMETHING", "invalid something", Some("other"));
        assert_ne!(bad_something(), other_field);
    }

    #[test]
    fn error_item_message_with_and_without_field() {
        assert_eq!(
            bad_something().to_string(),
            "BAD_SOMETHING: 'invalid something' on field 'some_field'"
        );
        let no_field = ErrorItem::new("USER_REQUIRED", "Please log in to do that.", None::<String>);
        assert_eq!(no_field.error_message(), "USER_REQUIRED: 'Please log in to do that.'");
        assert_eq!(no_field.field(), None);
    }

    #[test]
    fn api_error_rejects_empty_item_list() {
        let err = RedditApiError::new(Vec::new()).unwrap_err();
        assert!(err.is_client());
    }

    #[test]
    fn api_error_keeps_every_item_in_order() {
        let second = ErrorItem::new("NO_SUBJECT", "please enter a subject", Some("subject"));
        let err = RedditApiError::new(vec![bad_something(), second.clone()]).unwrap();
        assert_eq!(err.len(), 2);
        assert_eq!(err.first(), &bad_something());
        assert_eq!(err.items()[1], second);
    }

    #[test]
    fn invalid_url_messages() {
        let err = ThingError::invalid_url("https://www.google.com");
        assert_eq!(err.to_string(), "Invalid URL: https://www.google.com");

        let err = ThingError::invalid_url_with("https://www.google.com", "Test custom {}");
        assert_eq!(err.to_string(), "Test custom https://www.google.com");
        assert!(err.is_malformed_identity());
        assert!(err.is_client());
    }

    #[test]
    fn transport_errors_display_unchanged() {
        let io = std::io::Error::new(std::io::ErrorKind::TimedOut, "socket timed out");
        let err = ThingError::transport(io);
        assert_eq!(err.to_string(), "socket timed out");
        assert!(!err.is_client());
    }
}
