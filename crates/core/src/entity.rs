//! Entity trait: identity that survives lazy attribute loading.

/// Entity marker + minimal interface.
///
/// Remote things are compared by identity alone; cached attributes never take part in
/// equality.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> Self::Id;

    /// Short type name used in error messages (`Comment`, `Redditor`, ...).
    fn type_name(&self) -> &'static str;
}
