//! Things that are only ever built from server payloads.

use core::fmt;

use thingkit_core::{AttributeStore, ThingError, ThingResult};

use crate::value::Value;

/// Private message (`t4`).
#[derive(Debug, Clone)]
pub struct Message {
    attributes: AttributeStore<Value>,
}

impl Message {
    pub fn new(attributes: AttributeStore<Value>) -> Self {
        Self { attributes }
    }

    pub fn id(&self) -> Option<&str> {
        self.attributes.get("id").and_then(Value::as_str)
    }

    pub fn subject(&self) -> Option<&str> {
        self.attributes.get("subject").and_then(Value::as_str)
    }

    pub fn body(&self) -> Option<&str> {
        self.attributes.get("body").and_then(Value::as_str)
    }

    pub fn attribute(&self, name: &str) -> ThingResult<&Value> {
        self.attributes
            .get(name)
            .ok_or_else(|| ThingError::missing_attribute("Message", name))
    }
}

impl PartialEq for Message {
    fn eq(&self, other: &Self) -> bool {
        match (self.id(), other.id()) {
            (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
            _ => false,
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id().unwrap_or_default())
    }
}

/// Award shown on a redditor's profile (`t6`).
#[derive(Debug, Clone)]
pub struct Trophy {
    attributes: AttributeStore<Value>,
}

impl Trophy {
    pub fn new(attributes: AttributeStore<Value>) -> Self {
        Self { attributes }
    }

    pub fn name(&self) -> Option<&str> {
        self.attributes.get("name").and_then(Value::as_str)
    }

    pub fn description(&self) -> Option<&str> {
        self.attributes.get("description").and_then(Value::as_str)
    }

    pub fn attribute(&self, name: &str) -> ThingResult<&Value> {
        self.attributes
            .get(name)
            .ok_or_else(|| ThingError::missing_attribute("Trophy", name))
    }
}

impl PartialEq for Trophy {
    fn eq(&self, other: &Self) -> bool {
        self.name() == other.name()
    }
}

impl fmt::Display for Trophy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(pairs: &[(&str, &str)]) -> AttributeStore<Value> {
        pairs.iter().map(|(k, v)| (k.to_string(), Value::from(*v))).collect()
    }

    #[test]
    fn trophies_compare_by_name() {
        let a = Trophy::new(attrs(&[("name", "Verified Email"), ("icon_40", "a.png")]));
        let b = Trophy::new(attrs(&[("name", "Verified Email")]));
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "Verified Email");
        assert!(a.attribute("award_id").unwrap_err().is_missing_attribute());
    }

    #[test]
    fn messages_compare_by_id() {
        let a = Message::new(attrs(&[("id", "Abc"), ("subject", "hi")]));
        let b = Message::new(attrs(&[("id", "abc")]));
        assert_eq!(a, b);
        assert_eq!(a.subject(), Some("hi"));
        assert_ne!(a, Message::new(AttributeStore::new()));
    }
}
