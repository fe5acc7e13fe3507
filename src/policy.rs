//! Refresh decision.

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};

use crate::key::EphemeralKey;

/// Whether `current` must be replaced at `now`.
///
/// A missing key always needs a refresh. Otherwise the key is due once
/// `now` reaches `expires_at - buffer`; the boundary is inclusive and keys
/// that expired long ago are treated the same as keys about to expire.
pub fn should_refresh<K>(current: Option<&K>, buffer: Duration, now: DateTime<Utc>) -> bool
where
    K: EphemeralKey + ?Sized,
{
    let Some(key) = current else {
        return true;
    };

    let buffer = TimeDelta::from_std(buffer).unwrap_or(TimeDelta::MAX);
    match key.expires_at().checked_sub_signed(buffer) {
        Some(refresh_at) => refresh_at <= now,
        None => true,
    }
}
