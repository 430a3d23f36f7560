//! Value object trait: equality by value, not identity.
//!
//! Value objects have **no identity**; two values with the same fields are the same
//! value. The API's error items are the canonical example: `(error_type, message,
//! field)` fully describes one reported error.

/// Marker trait for value objects.
///
/// ## Value Object vs Entity
///
/// - **Value Object**: compared field by field (e.g. an `ErrorItem`)
/// - **Entity**: compared by identifier only (e.g. a comment, whatever its cached
///   attributes hold)
///
/// Value objects are immutable once built and hash consistently with their equality.
pub trait ValueObject: Clone + PartialEq + Eq + core::hash::Hash + core::fmt::Debug {}
