//! Builder for [`EphemeralKeyManager`].

use std::sync::Arc;
use std::time::Duration;

use super::{EphemeralKeyManager, ManagerConfig};
use crate::clock::{Clock, SystemClock};
use crate::issuer::KeyIssuer;
use crate::key::{EphemeralKey, KeyParser};
use crate::listener::KeyListener;
use crate::{Error, Result};

/// Builder for [`EphemeralKeyManager`].
///
/// The refresh buffer defaults to [`ManagerConfig::from_env`] and the clock
/// to [`SystemClock`]. Issuer, listener and parser are required.
pub struct KeyManagerBuilder<K> {
    issuer: Option<Arc<dyn KeyIssuer>>,
    listener: Option<Arc<dyn KeyListener<K>>>,
    parser: Option<Arc<dyn KeyParser<K>>>,
    clock: Option<Arc<dyn Clock>>,
    refresh_buffer: Option<Duration>,
    config: Option<ManagerConfig>,
}

impl<K> Default for KeyManagerBuilder<K> {
    fn default() -> Self {
        Self {
            issuer: None,
            listener: None,
            parser: None,
            clock: None,
            refresh_buffer: None,
            config: None,
        }
    }
}

impl<K: EphemeralKey> KeyManagerBuilder<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issuer<I: KeyIssuer + 'static>(mut self, issuer: I) -> Self {
        self.issuer = Some(Arc::new(issuer));
        self
    }

    pub fn issuer_arc(mut self, issuer: Arc<dyn KeyIssuer>) -> Self {
        self.issuer = Some(issuer);
        self
    }

    pub fn listener<L: KeyListener<K> + 'static>(mut self, listener: L) -> Self {
        self.listener = Some(Arc::new(listener));
        self
    }

    pub fn listener_arc(mut self, listener: Arc<dyn KeyListener<K>>) -> Self {
        self.listener = Some(listener);
        self
    }

    pub fn parser<P: KeyParser<K> + 'static>(mut self, parser: P) -> Self {
        self.parser = Some(Arc::new(parser));
        self
    }

    pub fn clock<C: Clock + 'static>(mut self, clock: C) -> Self {
        self.clock = Some(Arc::new(clock));
        self
    }

    /// Explicit buffer; takes precedence over [`config`](Self::config).
    pub fn refresh_buffer(mut self, buffer: Duration) -> Self {
        self.refresh_buffer = Some(buffer);
        self
    }

    pub fn config(mut self, config: ManagerConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn build(self) -> Result<EphemeralKeyManager<K>> {
        let issuer = self
            .issuer
            .ok_or_else(|| Error::Config("key issuer is required".into()))?;
        let listener = self
            .listener
            .ok_or_else(|| Error::Config("key listener is required".into()))?;
        let parser = self
            .parser
            .ok_or_else(|| Error::Config("key parser is required".into()))?;

        let refresh_buffer = self.refresh_buffer.unwrap_or_else(|| {
            self.config
                .unwrap_or_else(ManagerConfig::from_env)
                .refresh_buffer()
        });
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));

        Ok(EphemeralKeyManager::new(
            issuer,
            listener,
            parser,
            clock,
            refresh_buffer,
        ))
    }
}
