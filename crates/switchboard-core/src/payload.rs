// ── Typed request payload access ──
//
// Request bodies arrive as loose JSON. Every read through `Payload`
// checks the runtime value against the shape the caller declared and
// produces a typed request error on mismatch, so shape validation
// happens as part of object construction rather than as a separate
// pass. `null` and absent are both "unset".

use serde_json::{Map, Value};

use crate::error::Error;

/// A JSON object wrapper with shape-checked field accessors.
#[derive(Debug, Clone, Default)]
pub struct Payload(Map<String, Value>);

fn type_error(field: &str, value: &Value, expected: &str) -> Error {
    Error::RequestType {
        field: field.to_string(),
        value: value.to_string(),
        expected: expected.to_string(),
    }
}

impl Payload {
    /// Wrap a JSON value, requiring it to be an object.
    pub fn from_value(value: Value) -> Result<Self, Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(type_error("<body>", &other, "object")),
        }
    }

    pub fn new() -> Self {
        Self(Map::new())
    }

    /// True when the field is present with a non-null value.
    pub fn has(&self, field: &str) -> bool {
        self.0.get(field).is_some_and(|v| !v.is_null())
    }

    /// Error on the first listed field that is absent or null.
    pub fn require(&self, fields: &[&str]) -> Result<(), Error> {
        for field in fields {
            if !self.has(field) {
                return Err(Error::RequestValueMissing {
                    field: (*field).to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn set(&mut self, field: &str, value: Value) {
        self.0.insert(field.to_string(), value);
    }

    /// Set the field only when it is currently unset.
    pub fn set_default(&mut self, field: &str, value: Value) {
        if !self.has(field) {
            self.0.insert(field.to_string(), value);
        }
    }

    pub fn raw(&self, field: &str) -> Option<&Value> {
        self.0.get(field).filter(|v| !v.is_null())
    }

    pub fn get_str(&self, field: &str) -> Result<Option<String>, Error> {
        match self.raw(field) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(other) => Err(type_error(field, other, "string")),
        }
    }

    pub fn get_bool(&self, field: &str) -> Result<Option<bool>, Error> {
        match self.raw(field) {
            None => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(other) => Err(type_error(field, other, "boolean")),
        }
    }

    fn get_integer(&self, field: &str) -> Result<Option<u64>, Error> {
        match self.raw(field) {
            None => Ok(None),
            Some(value) => value
                .as_u64()
                .ok_or_else(|| type_error(field, value, "integer"))
                .map(Some),
        }
    }

    pub fn get_u8(&self, field: &str) -> Result<Option<u8>, Error> {
        self.get_integer(field)?
            .map(|n| u8::try_from(n).map_err(|_| Error::request_value(field, n)))
            .transpose()
    }

    pub fn get_u16(&self, field: &str) -> Result<Option<u16>, Error> {
        self.get_integer(field)?
            .map(|n| u16::try_from(n).map_err(|_| Error::request_value(field, n)))
            .transpose()
    }

    pub fn get_u32(&self, field: &str) -> Result<Option<u32>, Error> {
        self.get_integer(field)?
            .map(|n| u32::try_from(n).map_err(|_| Error::request_value(field, n)))
            .transpose()
    }

    pub fn get_str_list(&self, field: &str) -> Result<Option<Vec<String>>, Error> {
        match self.raw(field) {
            None => Ok(None),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| match item {
                    Value::String(s) => Ok(s.clone()),
                    other => Err(type_error(field, other, "list of string")),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Some),
            Some(other) => Err(type_error(field, other, "list of string")),
        }
    }

    pub fn get_u16_list(&self, field: &str) -> Result<Option<Vec<u16>>, Error> {
        match self.raw(field) {
            None => Ok(None),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| {
                    let n = item
                        .as_u64()
                        .ok_or_else(|| type_error(field, item, "list of integer"))?;
                    u16::try_from(n).map_err(|_| Error::request_value(field, n))
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Some),
            Some(other) => Err(type_error(field, other, "list of integer")),
        }
    }

    /// A nested object field as its own payload.
    pub fn get_object(&self, field: &str) -> Result<Option<Payload>, Error> {
        match self.raw(field) {
            None => Ok(None),
            Some(Value::Object(map)) => Ok(Some(Self(map.clone()))),
            Some(other) => Err(type_error(field, other, "object")),
        }
    }

    /// A list-of-objects field as payloads.
    pub fn get_object_list(&self, field: &str) -> Result<Option<Vec<Payload>>, Error> {
        match self.raw(field) {
            None => Ok(None),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| match item {
                    Value::Object(map) => Ok(Self(map.clone())),
                    other => Err(type_error(field, other, "list of object")),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Some),
            Some(other) => Err(type_error(field, other, "list of object")),
        }
    }
}

impl From<Map<String, Value>> for Payload {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn payload(v: Value) -> Payload {
        Payload::from_value(v).unwrap()
    }

    #[test]
    fn absent_and_null_are_both_unset() {
        let p = payload(json!({"name": null}));
        assert!(!p.has("name"));
        assert!(!p.has("missing"));
        assert_eq!(p.get_str("name").unwrap(), None);
    }

    #[test]
    fn wrong_type_is_a_type_error() {
        let p = payload(json!({"id": "not-a-number"}));
        let err = p.get_u16("id").unwrap_err();
        assert!(matches!(err, Error::RequestType { .. }));
    }

    #[test]
    fn out_of_range_is_a_value_error() {
        let p = payload(json!({"id": 70000}));
        let err = p.get_u16("id").unwrap_err();
        assert!(matches!(err, Error::RequestValue { .. }));
    }

    #[test]
    fn require_names_the_missing_field() {
        let p = payload(json!({"name": "ge-0/0/1"}));
        let err = p.require(&["name", "mode"]).unwrap_err();
        assert_eq!(
            err,
            Error::RequestValueMissing {
                field: "mode".into()
            }
        );
    }

    #[test]
    fn set_default_preserves_existing() {
        let mut p = payload(json!({"admin_enabled": false}));
        p.set_default("admin_enabled", json!(true));
        p.set_default("mtu", json!(1500));
        assert_eq!(p.get_bool("admin_enabled").unwrap(), Some(false));
        assert_eq!(p.get_u32("mtu").unwrap(), Some(1500));
    }

    #[test]
    fn list_elements_are_shape_checked() {
        let p = payload(json!({"members": ["swp1", 2]}));
        assert!(p.get_str_list("members").is_err());
    }

    #[test]
    fn non_object_body_rejected() {
        assert!(Payload::from_value(json!([1, 2])).is_err());
    }
}
