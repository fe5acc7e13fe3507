//! Fields shared by every issued ephemeral key.

use secrecy::{ExposeSecret, SecretString};
use serde_json::{Value, json};

use super::KeyObject;
use crate::Result;

const FIELD_ASSOCIATED_OBJECTS: &str = "associated_objects";
const FIELD_CREATED: &str = "created";
const FIELD_EXPIRES: &str = "expires";
const FIELD_ID: &str = "id";
const FIELD_LIVEMODE: &str = "livemode";
const FIELD_OBJECT: &str = "object";
const FIELD_SECRET: &str = "secret";
const FIELD_TYPE: &str = "type";

/// Issuer key body.
#[derive(Clone, Debug)]
pub struct KeyFields {
    /// Key identifier.
    pub id: String,
    /// Object name reported by the issuer (`ephemeral_key`).
    pub object: String,
    /// Key secret.
    pub secret: SecretString,
    /// Creation timestamp (Unix seconds).
    pub created: i64,
    /// Whether the key was issued in live mode.
    pub livemode: bool,
    /// Expiration timestamp (Unix seconds).
    pub expires: i64,
    /// Type of the object the key is scoped to.
    pub associated_type: String,
    /// Identifier of the object the key is scoped to.
    pub associated_id: String,
}

impl KeyFields {
    /// Read the common fields, failing on the first missing one.
    pub fn from_object(object: &KeyObject<'_>) -> Result<Self> {
        let created = object.require_i64(FIELD_CREATED)?;
        let expires = object.require_i64(FIELD_EXPIRES)?;
        let id = object.require_non_empty_str(FIELD_ID)?.to_string();
        let livemode = object.require_bool(FIELD_LIVEMODE)?;
        let object_name = object.require_str(FIELD_OBJECT)?.to_string();
        let secret = SecretString::from(object.require_str(FIELD_SECRET)?.to_string());

        let associated = object.require_first_object(FIELD_ASSOCIATED_OBJECTS)?;
        let associated_type = associated.require_str(FIELD_TYPE)?.to_string();
        let associated_id = associated.require_str(FIELD_ID)?.to_string();

        Ok(Self {
            id,
            object: object_name,
            secret,
            created,
            livemode,
            expires,
            associated_type,
            associated_id,
        })
    }

    pub fn to_json(&self) -> Value {
        json!({
            "id": self.id,
            "object": self.object,
            "secret": self.secret.expose_secret(),
            "created": self.created,
            "livemode": self.livemode,
            "expires": self.expires,
            "associated_objects": [{
                "type": self.associated_type,
                "id": self.associated_id,
            }],
        })
    }
}

impl PartialEq for KeyFields {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.object == other.object
            && self.secret.expose_secret() == other.secret.expose_secret()
            && self.created == other.created
            && self.livemode == other.livemode
            && self.expires == other.expires
            && self.associated_type == other.associated_type
            && self.associated_id == other.associated_id
    }
}

impl Eq for KeyFields {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use serde_json::Map;

    fn object_from(value: &Value) -> &Map<String, Value> {
        value.as_object().unwrap()
    }

    #[test]
    fn test_read_order_reports_created_first() {
        let value = json!({});
        let err = KeyFields::from_object(&KeyObject::new(object_from(&value), "Test"))
            .err()
            .unwrap();
        assert!(matches!(err, Error::InvalidSchema { field: "created", .. }));
    }

    #[test]
    fn test_missing_associated_objects() {
        let value = json!({
            "id": "ephkey_1",
            "object": "ephemeral_key",
            "secret": "ek_test",
            "created": 1,
            "livemode": false,
            "expires": 2,
        });
        let err = KeyFields::from_object(&KeyObject::new(object_from(&value), "Test"))
            .err()
            .unwrap();
        assert!(matches!(
            err,
            Error::InvalidSchema {
                field: "associated_objects",
                ..
            }
        ));
    }

    #[test]
    fn test_secret_redacted_in_debug() {
        let value = json!({
            "id": "ephkey_1",
            "object": "ephemeral_key",
            "secret": "ek_live_very_secret",
            "created": 1,
            "livemode": true,
            "expires": 2,
            "associated_objects": [{"type": "customer", "id": "cus_1"}],
        });
        let fields = KeyFields::from_object(&KeyObject::new(object_from(&value), "Test")).unwrap();
        assert!(!format!("{fields:?}").contains("ek_live_very_secret"));
        assert_eq!(fields.secret.expose_secret(), "ek_live_very_secret");
        assert_eq!(fields.to_json(), value);
    }
}
