//! Manager configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default refresh buffer in seconds.
pub const DEFAULT_REFRESH_BUFFER_SECS: u64 = 30;

/// Environment variable overriding the refresh buffer.
pub const REFRESH_BUFFER_ENV: &str = "EPHEMERAL_KEY_REFRESH_BUFFER_SECS";

fn default_refresh_buffer_secs() -> u64 {
    DEFAULT_REFRESH_BUFFER_SECS
}

/// Configuration for an [`EphemeralKeyManager`](super::EphemeralKeyManager).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagerConfig {
    /// Seconds before expiry at which a key is treated as due.
    #[serde(default = "default_refresh_buffer_secs")]
    pub refresh_buffer_secs: u64,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            refresh_buffer_secs: DEFAULT_REFRESH_BUFFER_SECS,
        }
    }
}

impl ManagerConfig {
    /// Create configuration with defaults, then apply environment variable overrides.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(raw) = std::env::var(REFRESH_BUFFER_ENV) {
            match raw.trim().parse() {
                Ok(secs) => config.refresh_buffer_secs = secs,
                Err(e) => {
                    tracing::warn!(
                        var = REFRESH_BUFFER_ENV,
                        value = %raw,
                        error = %e,
                        "Ignoring invalid refresh buffer"
                    );
                }
            }
        }

        config
    }

    pub fn refresh_buffer_secs(mut self, secs: u64) -> Self {
        self.refresh_buffer_secs = secs;
        self
    }

    pub fn refresh_buffer(&self) -> Duration {
        Duration::from_secs(self.refresh_buffer_secs)
    }
}
