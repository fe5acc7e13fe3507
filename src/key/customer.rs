//! Customer-scoped ephemeral key.

use secrecy::SecretString;
use serde_json::Value;

use super::{EphemeralKey, JsonKey, KeyFields, KeyObject, parse_raw};
use crate::Result;

/// Ephemeral key granting access to a single customer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CustomerEphemeralKey {
    fields: KeyFields,
}

impl CustomerEphemeralKey {
    /// Parse the raw issuer response body.
    pub fn from_raw(raw: &str) -> Result<Self> {
        parse_raw(Some(raw))
    }

    pub fn customer_id(&self) -> &str {
        &self.fields.associated_id
    }

    pub fn secret(&self) -> &SecretString {
        &self.fields.secret
    }

    pub fn created(&self) -> i64 {
        self.fields.created
    }

    pub fn livemode(&self) -> bool {
        self.fields.livemode
    }

    pub fn fields(&self) -> &KeyFields {
        &self.fields
    }

    pub fn to_json(&self) -> Value {
        self.fields.to_json()
    }
}

impl From<KeyFields> for CustomerEphemeralKey {
    fn from(fields: KeyFields) -> Self {
        Self { fields }
    }
}

impl EphemeralKey for CustomerEphemeralKey {
    fn id(&self) -> &str {
        &self.fields.id
    }

    fn expires(&self) -> i64 {
        self.fields.expires
    }
}

impl JsonKey for CustomerEphemeralKey {
    const KIND: &'static str = "CustomerEphemeralKey";

    fn from_object(object: &KeyObject<'_>) -> Result<Self> {
        KeyFields::from_object(object).map(Self::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::key::fixtures::{DEFAULT_EXPIRES, SAMPLE_KEY_RAW};
    use secrecy::ExposeSecret;

    #[test]
    fn test_parse_sample_key() {
        let key = CustomerEphemeralKey::from_raw(SAMPLE_KEY_RAW).unwrap();
        assert_eq!(key.id(), "ephkey_123");
        assert_eq!(key.expires(), DEFAULT_EXPIRES);
        assert_eq!(key.created(), 1_501_199_335);
        assert_eq!(key.customer_id(), "cus_AQsHpvKfKwJDrF");
        assert_eq!(key.secret().expose_secret(), "ek_test_123");
        assert_eq!(key.fields().object, "ephemeral_key");
        assert_eq!(key.fields().associated_type, "customer");
        assert!(!key.livemode());
    }

    #[test]
    fn test_empty_object_names_created() {
        let err = CustomerEphemeralKey::from_raw("{}").err().unwrap();
        assert_eq!(
            err.to_string(),
            "key update was passed a JSON String that was invalid: [Improperly formatted JSON \
             for ephemeral key CustomerEphemeralKey - No value for created]. The raw body from \
             the issuer's response should be passed"
        );
    }

    #[test]
    fn test_to_json_reparses_to_equal_key() {
        let key = CustomerEphemeralKey::from_raw(SAMPLE_KEY_RAW).unwrap();
        let reparsed = CustomerEphemeralKey::from_raw(&key.to_json().to_string()).unwrap();
        assert_eq!(key, reparsed);
    }

    #[test]
    fn test_not_json() {
        let err = CustomerEphemeralKey::from_raw("Not_a_JSON").err().unwrap();
        assert!(matches!(err, Error::MalformedPayload { .. }));
    }
}
