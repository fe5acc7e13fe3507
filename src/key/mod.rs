//! Ephemeral key types and parsing.
//!
//! The manager only relies on the [`EphemeralKey`] capabilities (an
//! identifier and an expiry). Each concrete key variant is produced by a
//! [`KeyParser`] strategy; [`JsonKeyParser`] covers every variant that
//! implements [`JsonKey`].

mod customer;
mod fields;
mod issuing_card;
mod parser;

pub use customer::CustomerEphemeralKey;
pub use fields::KeyFields;
pub use issuing_card::IssuingCardEphemeralKey;
pub use parser::{JsonKey, JsonKeyParser, KeyObject, KeyParser, parse_raw};

use chrono::{DateTime, Utc};

/// Capabilities the manager needs from an issued key.
pub trait EphemeralKey: Send + Sync + 'static {
    /// Identifier assigned by the issuer.
    fn id(&self) -> &str;

    /// Expiration timestamp (Unix seconds).
    fn expires(&self) -> i64;

    /// Get expiration as DateTime.
    fn expires_at(&self) -> DateTime<Utc> {
        let expires = self.expires();
        DateTime::from_timestamp(expires, 0).unwrap_or(if expires > 0 {
            DateTime::<Utc>::MAX_UTC
        } else {
            DateTime::<Utc>::MIN_UTC
        })
    }

    /// Check if the key is past its expiry at `now`.
    fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    pub const SAMPLE_KEY_RAW: &str = r#"{
  "id": "ephkey_123",
  "object": "ephemeral_key",
  "secret": "ek_test_123",
  "created": 1501199335,
  "livemode": false,
  "expires": 1501199335,
  "associated_objects": [{
            "type": "customer",
            "id": "cus_AQsHpvKfKwJDrF"
            }]
}"#;

    pub const ISSUING_CARD_KEY_RAW: &str = r#"{
  "id": "ephkey_456",
  "object": "ephemeral_key",
  "secret": "ek_test_456",
  "created": 1501199335,
  "livemode": true,
  "expires": 1501202935,
  "associated_objects": [{"type": "issuing.card", "id": "ic_1FOpyJ2eZvKYlo2C"}]
}"#;

    pub const DEFAULT_EXPIRES: i64 = 1_501_199_335;
}
