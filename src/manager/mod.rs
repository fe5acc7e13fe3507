//! Ephemeral key lifecycle management.
//!
//! ```rust,no_run
//! use ephemeral_key::{
//!     CustomerEphemeralKey, EphemeralKeyManager, FnIssuer, JsonKeyParser, ChannelListener,
//! };
//!
//! # async fn example() -> Result<(), ephemeral_key::Error> {
//! # let raw_body = String::new();
//! let issuer = FnIssuer::new(move |_context, _args, responder| {
//!     // Pass the issuer's response body through unmodified.
//!     responder.on_key_update(Some(raw_body.clone()));
//! });
//! let (listener, _events) = ChannelListener::<CustomerEphemeralKey>::new();
//!
//! let manager = EphemeralKeyManager::<CustomerEphemeralKey>::builder()
//!     .issuer(issuer)
//!     .listener(listener)
//!     .parser(JsonKeyParser::new())
//!     .build()?;
//!
//! manager.start().await;
//! manager.ensure_fresh(Some("pay"), None).await;
//! # Ok(())
//! # }
//! ```

mod builder;
mod config;

pub use builder::KeyManagerBuilder;
pub use config::{DEFAULT_REFRESH_BUFFER_SECS, ManagerConfig, REFRESH_BUFFER_ENV};

use std::sync::{Arc, RwLock};
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::Instrument;

use crate::clock::Clock;
use crate::issuer::{KeyArgs, KeyIssuer};
use crate::key::{EphemeralKey, KeyParser};
use crate::listener::KeyListener;
use crate::{Error, policy};

/// Result of a refresh request.
#[derive(Debug)]
pub enum RefreshOutcome<K> {
    /// The stored key is still outside the refresh buffer.
    Skipped,
    /// A new key was stored and the listener notified.
    Updated(Arc<K>),
    /// The cycle failed; the stored key was cleared and the listener notified.
    Failed(Error),
}

impl<K> RefreshOutcome<K> {
    pub fn is_skipped(&self) -> bool {
        matches!(self, RefreshOutcome::Skipped)
    }

    pub fn is_updated(&self) -> bool {
        matches!(self, RefreshOutcome::Updated(_))
    }

    pub fn key(&self) -> Option<&Arc<K>> {
        match self {
            RefreshOutcome::Updated(key) => Some(key),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&Error> {
        match self {
            RefreshOutcome::Failed(err) => Some(err),
            _ => None,
        }
    }
}

/// Owns the current ephemeral key and decides when to replace it.
///
/// Construction has no side effects. Call [`start`](Self::start) once the
/// listener is ready to receive the first update, then
/// [`ensure_fresh`](Self::ensure_fresh) before each use of the key.
pub struct EphemeralKeyManager<K> {
    issuer: Arc<dyn KeyIssuer>,
    listener: Arc<dyn KeyListener<K>>,
    parser: Arc<dyn KeyParser<K>>,
    clock: Arc<dyn Clock>,
    refresh_buffer: Duration,
    current: RwLock<Option<Arc<K>>>,
    cycle: Mutex<()>,
}

impl<K: EphemeralKey> EphemeralKeyManager<K> {
    pub fn new(
        issuer: Arc<dyn KeyIssuer>,
        listener: Arc<dyn KeyListener<K>>,
        parser: Arc<dyn KeyParser<K>>,
        clock: Arc<dyn Clock>,
        refresh_buffer: Duration,
    ) -> Self {
        Self {
            issuer,
            listener,
            parser,
            clock,
            refresh_buffer,
            current: RwLock::new(None),
            cycle: Mutex::new(()),
        }
    }

    pub fn builder() -> KeyManagerBuilder<K> {
        KeyManagerBuilder::new()
    }

    /// Run the first update cycle without caller context.
    ///
    /// A manager that holds no key always runs a cycle here. Calling `start`
    /// again behaves like `ensure_fresh(None, None)`, including its handling
    /// of a dropped future.
    pub async fn start(&self) -> RefreshOutcome<K> {
        self.ensure_fresh(None, None).await
    }

    /// Fetch a new key if the current one is missing or inside the refresh buffer.
    ///
    /// Cycles are serialized. A caller that waited for another cycle to finish
    /// re-evaluates the policy, so concurrent requests share one issuer call
    /// when it succeeds.
    ///
    /// Dropping the returned future while the issuer is pending still ends the
    /// cycle: the key is cleared and the listener receives
    /// [`Error::Cancelled`] with [`INTERNAL_ERROR_CODE`](crate::INTERNAL_ERROR_CODE).
    pub async fn ensure_fresh(
        &self,
        context: Option<&str>,
        args: Option<KeyArgs>,
    ) -> RefreshOutcome<K> {
        let _cycle = self.cycle.lock().await;

        if !self.should_refresh() {
            tracing::debug!(context, "Ephemeral key still fresh; refresh skipped");
            return RefreshOutcome::Skipped;
        }

        let span = tracing::info_span!(
            "ephemeral_key.update",
            issuer = self.issuer.name(),
            context,
            otel.name = "ephemeral_key.update",
        );

        self.update(context, args.as_ref()).instrument(span).await
    }

    /// The stored key, if the last cycle succeeded.
    pub fn current_key(&self) -> Option<Arc<K>> {
        self.current
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Evaluate the refresh policy against a single clock reading.
    pub fn should_refresh(&self) -> bool {
        let now = self.clock.now();
        let current = self.current_key();
        policy::should_refresh(current.as_deref(), self.refresh_buffer, now)
    }

    pub fn refresh_buffer(&self) -> Duration {
        self.refresh_buffer
    }

    async fn update(&self, context: Option<&str>, args: Option<&KeyArgs>) -> RefreshOutcome<K> {
        let guard = CancelGuard { manager: self };
        let answer = self.issuer.create_key(context, args).await;
        std::mem::forget(guard);

        let parsed = match answer {
            Ok(raw) => self.parser.parse(raw.as_deref()),
            Err(e) => Err(Error::from(e)),
        };

        match parsed {
            Ok(key) => {
                let key = Arc::new(key);
                self.store(Some(Arc::clone(&key)));
                tracing::info!(
                    key_id = key.id(),
                    expires = key.expires(),
                    "Ephemeral key updated"
                );
                self.listener.on_update(&key, context, args);
                RefreshOutcome::Updated(key)
            }
            Err(err) => {
                self.fail(&err);
                RefreshOutcome::Failed(err)
            }
        }
    }

    fn store(&self, key: Option<Arc<K>>) {
        *self.current.write().unwrap_or_else(|e| e.into_inner()) = key;
    }

    fn fail(&self, err: &Error) {
        self.store(None);
        let code = err.listener_code();
        tracing::warn!(code, error = %err, "Ephemeral key update failed");
        self.listener.on_error(code, &err.listener_message());
    }
}

/// Completes a cycle whose future was dropped while the issuer was pending.
///
/// Forgotten once the issuer answers; dropping it clears the key and reports
/// [`Error::Cancelled`].
struct CancelGuard<'a, K: EphemeralKey> {
    manager: &'a EphemeralKeyManager<K>,
}

impl<K: EphemeralKey> Drop for CancelGuard<'_, K> {
    fn drop(&mut self) {
        self.manager.fail(&Error::Cancelled);
    }
}

impl<K> std::fmt::Debug for EphemeralKeyManager<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let holding = self
            .current
            .read()
            .map(|current| current.is_some())
            .unwrap_or(false);
        f.debug_struct("EphemeralKeyManager")
            .field("issuer", &self.issuer.name())
            .field("refresh_buffer", &self.refresh_buffer)
            .field("holding_key", &holding)
            .finish_non_exhaustive()
    }
}
