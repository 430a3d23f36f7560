//! Lazy attribute loading shared by every fetchable thing.
//!
//! An entity starts with its identity attributes only. The first read of any other
//! attribute runs exactly one fetch through [`LazyEntity::load`], merges the result and
//! answers from the cache from then on.

use core::cell::RefCell;

use chrono::{DateTime, TimeZone, Utc};
use serde_json::{Map, Value as JsonValue};
use thingkit_core::{AttributeStore, Entity, FetchState, ThingError, ThingId, ThingResult};
use tracing::debug;

use crate::reddit::Reddit;
use crate::value::Value;

/// Fetch state plus cached attributes of one entity.
#[derive(Debug, Clone, Default)]
pub struct EntityCore {
    state: FetchState,
    attributes: AttributeStore<Value>,
}

impl EntityCore {
    /// Shallow entity: identity attributes only.
    pub fn unfetched(attributes: AttributeStore<Value>) -> Self {
        Self {
            state: FetchState::Unfetched,
            attributes,
        }
    }

    /// Entity built from a full server payload.
    pub fn fetched(attributes: AttributeStore<Value>) -> Self {
        Self {
            state: FetchState::Fetched,
            attributes,
        }
    }

    pub fn state(&self) -> FetchState {
        self.state
    }

    pub fn attributes(&self) -> &AttributeStore<Value> {
        &self.attributes
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    pub fn set(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
        self.attributes.set(name, value)
    }

    /// Merge fetched attributes. Identity attributes already present are kept.
    pub fn merge(&mut self, fetched: AttributeStore<Value>, identity: &[&str]) {
        for (name, value) in fetched {
            if identity.contains(&name.as_str()) && self.attributes.contains(&name) {
                continue;
            }
            self.attributes.set(name, value);
        }
    }
}

/// A remote thing whose attributes are loaded on first use.
///
/// Implementors provide the cache, the identity attribute names and a type-specific
/// [`load`](LazyEntity::load). Everything else is provided.
pub trait LazyEntity: Entity<Id = ThingId> {
    fn reddit(&self) -> &Reddit;

    fn core(&self) -> &RefCell<EntityCore>;

    /// Attribute names that form the identity; a fetch never overwrites them.
    fn identity_attributes(&self) -> &'static [&'static str];

    /// Request this entity's server attributes.
    ///
    /// Runs while the entity is `Fetching`: reading uncached attributes of `self` from
    /// here fails instead of recursing.
    fn load(&self) -> ThingResult<AttributeStore<Value>>;

    fn fetch_state(&self) -> FetchState {
        self.core().borrow().state
    }

    fn is_fetched(&self) -> bool {
        self.fetch_state().is_fetched()
    }

    /// Cached value without triggering a fetch.
    fn cached(&self, name: &str) -> Option<Value> {
        self.core().borrow().get(name).cloned()
    }

    /// Snapshot of the attribute cache.
    fn attributes(&self) -> AttributeStore<Value> {
        self.core().borrow().attributes().clone()
    }

    /// Read an attribute, fetching once if this entity was never fetched.
    ///
    /// Names starting with `_` are private and never trigger a fetch.
    fn get_attribute(&self, name: &str) -> ThingResult<Value> {
        if let Some(value) = self.cached(name) {
            return Ok(value);
        }
        if name.starts_with('_') || !self.fetch_state().should_fetch() {
            return Err(ThingError::missing_attribute(self.type_name(), name));
        }

        self.fetch()?;
        self.cached(name)
            .ok_or_else(|| ThingError::missing_attribute(self.type_name(), name))
    }

    /// Store a value without fetching. Returns the previous value.
    fn set_attribute(&self, name: &str, value: Value) -> Option<Value> {
        self.core().borrow_mut().set(name, value)
    }

    /// Fetch now, whatever the current state.
    fn fetch(&self) -> ThingResult<()> {
        self.run_fetch(|| self.load())
    }

    /// Re-fetch and overwrite cached attributes.
    fn refresh(&self) -> ThingResult<()> {
        self.fetch()
    }

    /// Drive the state machine around `load`, merging its result on success.
    ///
    /// On failure the previous state is restored and the error is returned unchanged.
    fn run_fetch<F>(&self, load: F) -> ThingResult<()>
    where
        F: FnOnce() -> ThingResult<AttributeStore<Value>>,
    {
        let previous = self.core().borrow_mut().state.begin()?;
        debug!(entity = self.type_name(), id = ?self.id(), "fetching");

        match load() {
            Ok(fetched) => {
                let mut core = self.core().borrow_mut();
                core.merge(fetched, self.identity_attributes());
                core.state.complete();
                Ok(())
            }
            Err(err) => {
                debug!(entity = self.type_name(), id = ?self.id(), error = %err, "fetch failed");
                self.core().borrow_mut().state.abort(previous);
                Err(err)
            }
        }
    }

    fn get_string(&self, name: &str) -> ThingResult<String> {
        let value = self.get_attribute(name)?;
        value
            .as_str()
            .map(str::to_owned)
            .ok_or_else(|| wrong_type(self.type_name(), name, "string", &value))
    }

    fn get_i64(&self, name: &str) -> ThingResult<i64> {
        let value = self.get_attribute(name)?;
        value
            .as_i64()
            .ok_or_else(|| wrong_type(self.type_name(), name, "integer", &value))
    }

    fn get_f64(&self, name: &str) -> ThingResult<f64> {
        let value = self.get_attribute(name)?;
        value
            .as_f64()
            .ok_or_else(|| wrong_type(self.type_name(), name, "number", &value))
    }

    fn get_bool(&self, name: &str) -> ThingResult<bool> {
        let value = self.get_attribute(name)?;
        value
            .as_bool()
            .ok_or_else(|| wrong_type(self.type_name(), name, "bool", &value))
    }

    /// Epoch-seconds attribute (e.g. `created_utc`) as a UTC timestamp.
    fn get_timestamp(&self, name: &str) -> ThingResult<DateTime<Utc>> {
        let seconds = self.get_f64(name)?;
        Utc.timestamp_opt(seconds.trunc() as i64, 0)
            .single()
            .ok_or_else(|| {
                ThingError::unexpected_shape(format!(
                    "{}.{name} is not a valid timestamp: {seconds}",
                    self.type_name()
                ))
            })
    }
}

fn wrong_type(entity: &str, name: &str, expected: &str, found: &Value) -> ThingError {
    ThingError::unexpected_shape(format!(
        "{entity}.{name}: expected {expected}, found {}",
        found.type_label()
    ))
}

/// `raw["data"]` as an object.
pub(crate) fn data_object(raw: JsonValue, context: &str) -> ThingResult<Map<String, JsonValue>> {
    match raw {
        JsonValue::Object(mut map) => match map.remove("data") {
            Some(JsonValue::Object(data)) => Ok(data),
            _ => Err(ThingError::unexpected_shape(format!(
                "{context}: response has no `data` object"
            ))),
        },
        _ => Err(ThingError::unexpected_shape(format!(
            "{context}: response is not an object"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(pairs: &[(&str, &str)]) -> AttributeStore<Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), Value::from(*v)))
            .collect()
    }

    #[test]
    fn merge_keeps_identity_attributes() {
        let mut core = EntityCore::unfetched(store(&[("id", "Abc")]));
        core.merge(store(&[("id", "abc"), ("body", "hi")]), &["id"]);

        assert_eq!(core.get("id").unwrap(), "Abc");
        assert_eq!(core.get("body").unwrap(), "hi");
        assert_eq!(core.state(), FetchState::Unfetched);
    }

    #[test]
    fn merge_overwrites_other_attributes() {
        let mut core = EntityCore::fetched(store(&[("id", "x"), ("score", "1")]));
        core.merge(store(&[("score", "2")]), &["id"]);
        assert_eq!(core.get("score").unwrap(), "2");
        assert!(core.state().is_fetched());
    }

    #[test]
    fn data_object_requires_an_object() {
        let data = data_object(serde_json::json!({"data": {"name": "spez"}}), "test").unwrap();
        assert_eq!(data["name"], "spez");

        assert!(data_object(serde_json::json!({"data": []}), "test").is_err());
        assert!(data_object(serde_json::json!([1]), "test").is_err());
    }
}
