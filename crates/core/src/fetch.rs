//! Fetch lifecycle of a lazily loaded entity.

use crate::error::{ThingError, ThingResult};

/// Where an entity is in its lazy-loading lifecycle.
///
/// ```text
/// Unfetched ──(attribute miss)──▶ Fetching ──▶ Fetched
///     ▲                              │            │
///     └────────(fetch failed)────────┘   (refresh)┘──▶ Fetching
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum FetchState {
    /// Only identity attributes are known.
    #[default]
    Unfetched,
    /// A request is in flight; attribute misses must not trigger another one.
    Fetching,
    /// Server attributes have been merged.
    Fetched,
}

impl FetchState {
    pub fn is_fetched(self) -> bool {
        self == FetchState::Fetched
    }

    /// Whether an attribute miss in this state should trigger a fetch.
    pub fn should_fetch(self) -> bool {
        self == FetchState::Unfetched
    }

    /// Enter `Fetching`. Fails when a fetch is already in flight.
    ///
    /// Returns the state to restore if the fetch fails.
    pub fn begin(&mut self) -> ThingResult<FetchState> {
        match *self {
            FetchState::Fetching => Err(ThingError::client(
                "fetch already in progress for this entity",
            )),
            previous => {
                *self = FetchState::Fetching;
                Ok(previous)
            }
        }
    }

    /// Leave `Fetching` successfully.
    pub fn complete(&mut self) {
        *self = FetchState::Fetched;
    }

    /// Leave `Fetching` after a failure, restoring `previous`.
    pub fn abort(&mut self, previous: FetchState) {
        *self = previous;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unfetched_to_fetched() {
        let mut state = FetchState::default();
        assert!(state.should_fetch());

        let previous = state.begin().unwrap();
        assert_eq!(previous, FetchState::Unfetched);
        assert_eq!(state, FetchState::Fetching);
        assert!(!state.should_fetch());

        state.complete();
        assert!(state.is_fetched());
        assert!(!state.should_fetch());
    }

    #[test]
    fn failed_fetch_restores_previous_state() {
        let mut state = FetchState::Unfetched;
        let previous = state.begin().unwrap();
        state.abort(previous);
        assert_eq!(state, FetchState::Unfetched);

        let mut state = FetchState::Fetched;
        let previous = state.begin().unwrap();
        state.abort(previous);
        assert_eq!(state, FetchState::Fetched);
    }

    #[test]
    fn begin_is_not_reentrant() {
        let mut state = FetchState::Unfetched;
        state.begin().unwrap();
        assert!(state.begin().unwrap_err().is_client());
    }
}
