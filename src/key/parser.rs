//! Raw payload parsing.

use std::marker::PhantomData;

use serde_json::{Map, Value};

use super::EphemeralKey;
use crate::{Error, Result};

/// Strategy turning a raw issuer payload into a concrete key.
///
/// Parsing is synchronous and must not have side effects; the manager only
/// commits the result once `parse` has returned.
pub trait KeyParser<K>: Send + Sync {
    fn parse(&self, raw: Option<&str>) -> Result<K>;
}

/// Key variants decoded from the issuer's JSON object.
pub trait JsonKey: EphemeralKey + Sized {
    /// Variant name used in schema errors.
    const KIND: &'static str;

    fn from_object(object: &KeyObject<'_>) -> Result<Self>;
}

/// Parse a raw issuer body into `K`.
pub fn parse_raw<K: JsonKey>(raw: Option<&str>) -> Result<K> {
    let raw = raw.ok_or(Error::NullPayload)?;

    let value: Value = serde_json::from_str(raw).map_err(|e| Error::MalformedPayload {
        detail: e.to_string(),
    })?;

    let Value::Object(map) = &value else {
        return Err(Error::MalformedPayload {
            detail: format!(
                "value of type {} cannot be converted to a JSON object",
                json_type(&value)
            ),
        });
    };

    K::from_object(&KeyObject::new(map, K::KIND))
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn whole_f64(value: &Value) -> Option<i64> {
    let float = value.as_f64()?;
    // i64::MAX as f64 rounds up to 2^63, which is already out of range.
    (float.fract() == 0.0 && float >= i64::MIN as f64 && float < i64::MAX as f64)
        .then_some(float as i64)
}

/// [`KeyParser`] for any [`JsonKey`] variant.
pub struct JsonKeyParser<K> {
    _marker: PhantomData<fn() -> K>,
}

impl<K> JsonKeyParser<K> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<K> Default for JsonKeyParser<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> std::fmt::Debug for JsonKeyParser<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonKeyParser").finish()
    }
}

impl<K: JsonKey> KeyParser<K> for JsonKeyParser<K> {
    fn parse(&self, raw: Option<&str>) -> Result<K> {
        parse_raw(raw)
    }
}

/// Required-field accessor over a decoded JSON object.
///
/// A field that is absent or has the wrong type is reported as
/// [`Error::InvalidSchema`] naming the field and the key variant.
#[derive(Clone, Copy, Debug)]
pub struct KeyObject<'a> {
    map: &'a Map<String, Value>,
    kind: &'static str,
}

impl<'a> KeyObject<'a> {
    pub fn new(map: &'a Map<String, Value>, kind: &'static str) -> Self {
        Self { map, kind }
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// Integer field; whole-valued floats such as `1501199335.0` are accepted.
    pub fn require_i64(&self, field: &'static str) -> Result<i64> {
        self.map
            .get(field)
            .and_then(|value| value.as_i64().or_else(|| whole_f64(value)))
            .ok_or_else(|| self.missing(field))
    }

    pub fn require_bool(&self, field: &'static str) -> Result<bool> {
        self.map
            .get(field)
            .and_then(Value::as_bool)
            .ok_or_else(|| self.missing(field))
    }

    pub fn require_str(&self, field: &'static str) -> Result<&'a str> {
        self.map
            .get(field)
            .and_then(Value::as_str)
            .ok_or_else(|| self.missing(field))
    }

    /// Like [`require_str`](Self::require_str) but also rejects `""`.
    pub fn require_non_empty_str(&self, field: &'static str) -> Result<&'a str> {
        self.require_str(field)
            .and_then(|s| if s.is_empty() { Err(self.missing(field)) } else { Ok(s) })
    }

    /// First object of an array field.
    pub fn require_first_object(&self, field: &'static str) -> Result<KeyObject<'a>> {
        self.map
            .get(field)
            .and_then(Value::as_array)
            .and_then(|items| items.first())
            .and_then(Value::as_object)
            .map(|map| KeyObject::new(map, self.kind))
            .ok_or_else(|| self.missing(field))
    }

    fn missing(&self, field: &'static str) -> Error {
        Error::InvalidSchema {
            field,
            kind: self.kind,
        }
    }
}
