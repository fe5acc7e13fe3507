//! Issuing-card-scoped ephemeral key.

use secrecy::SecretString;
use serde_json::Value;

use super::{EphemeralKey, JsonKey, KeyFields, KeyObject, parse_raw};
use crate::Result;

/// Ephemeral key granting access to a single issued card.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IssuingCardEphemeralKey {
    fields: KeyFields,
}

impl IssuingCardEphemeralKey {
    pub fn from_raw(raw: &str) -> Result<Self> {
        parse_raw(Some(raw))
    }

    pub fn issuing_card_id(&self) -> &str {
        &self.fields.associated_id
    }

    pub fn secret(&self) -> &SecretString {
        &self.fields.secret
    }

    pub fn fields(&self) -> &KeyFields {
        &self.fields
    }

    pub fn to_json(&self) -> Value {
        self.fields.to_json()
    }
}

impl From<KeyFields> for IssuingCardEphemeralKey {
    fn from(fields: KeyFields) -> Self {
        Self { fields }
    }
}

impl EphemeralKey for IssuingCardEphemeralKey {
    fn id(&self) -> &str {
        &self.fields.id
    }

    fn expires(&self) -> i64 {
        self.fields.expires
    }
}

impl JsonKey for IssuingCardEphemeralKey {
    const KIND: &'static str = "IssuingCardEphemeralKey";

    fn from_object(object: &KeyObject<'_>) -> Result<Self> {
        KeyFields::from_object(object).map(Self::from)
    }
}
