//! Key issuer port.
//!
//! The issuer is the only place network I/O happens. It receives the
//! caller's context and arguments and hands back the raw, unmodified response
//! body, or a transport error with the status code and message to report.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::oneshot;

/// Caller-supplied arguments passed through to the issuer and the listener.
pub type KeyArgs = HashMap<String, Value>;

/// Result of a single issuer call.
pub type IssueResult = std::result::Result<Option<String>, IssuerError>;

/// Transport-level failure reported by the issuer.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("Key issuer failed ({code}): {message}")]
pub struct IssuerError {
    pub code: u16,
    pub message: String,
}

impl IssuerError {
    pub fn new(code: u16, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Trait for fetching raw ephemeral keys from the issuing authority.
#[async_trait]
pub trait KeyIssuer: Send + Sync {
    /// Issuer name for debugging.
    fn name(&self) -> &str {
        "issuer"
    }

    /// Request a new key. Resolves exactly once per call.
    async fn create_key(&self, context: Option<&str>, args: Option<&KeyArgs>) -> IssueResult;
}

#[async_trait]
impl<I: KeyIssuer + ?Sized> KeyIssuer for Arc<I> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn create_key(&self, context: Option<&str>, args: Option<&KeyArgs>) -> IssueResult {
        (**self).create_key(context, args).await
    }
}

/// Single-use reply handle given to callback-style issuers.
///
/// Both methods consume the responder, so at most one answer is sent.
pub struct KeyUpdateResponder {
    tx: oneshot::Sender<IssueResult>,
}

impl KeyUpdateResponder {
    /// Deliver the raw response body.
    pub fn on_key_update(self, raw: Option<String>) {
        let _ = self.tx.send(Ok(raw));
    }

    /// Deliver a transport failure.
    pub fn on_key_update_failure(self, code: u16, message: impl Into<String>) {
        let _ = self.tx.send(Err(IssuerError::new(code, message)));
    }
}

impl fmt::Debug for KeyUpdateResponder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyUpdateResponder").finish_non_exhaustive()
    }
}

/// Adapter for issuers that answer through a callback instead of a future.
///
/// The closure may answer immediately or move the responder into a task and
/// answer later. A responder dropped without an answer surfaces as a
/// transport error with code [`crate::INTERNAL_ERROR_CODE`].
pub struct FnIssuer<F> {
    name: String,
    f: F,
}

impl<F> FnIssuer<F>
where
    F: Fn(Option<&str>, Option<&KeyArgs>, KeyUpdateResponder) + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self {
            name: "fn".to_string(),
            f,
        }
    }

    pub fn named(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

#[async_trait]
impl<F> KeyIssuer for FnIssuer<F>
where
    F: Fn(Option<&str>, Option<&KeyArgs>, KeyUpdateResponder) + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn create_key(&self, context: Option<&str>, args: Option<&KeyArgs>) -> IssueResult {
        let (tx, rx) = oneshot::channel();
        (self.f)(context, args, KeyUpdateResponder { tx });

        rx.await.unwrap_or_else(|_| {
            Err(IssuerError::new(
                crate::INTERNAL_ERROR_CODE,
                format!("Key issuer '{}' dropped the request without answering", self.name),
            ))
        })
    }
}
