//! # ephemeral-key
//!
//! Lifecycle management for short-lived, server-issued ephemeral keys.
//!
//! An [`EphemeralKeyManager`] holds at most one key. It decides when that key
//! must be replaced, asks a [`KeyIssuer`] for a new raw payload, validates it
//! with a [`KeyParser`], and reports the outcome to a single [`KeyListener`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::time::Duration;
//!
//! use ephemeral_key::{
//!     ChannelListener, CustomerEphemeralKey, EphemeralKeyManager, FnIssuer, JsonKeyParser,
//!     KeyEvent,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), ephemeral_key::Error> {
//!     let issuer = FnIssuer::new(|_context, _args, responder| {
//!         // Forward the raw body returned by your backend.
//!         responder.on_key_update_failure(503, "backend unavailable");
//!     });
//!     let (listener, mut events) = ChannelListener::<CustomerEphemeralKey>::new();
//!
//!     let manager = EphemeralKeyManager::<CustomerEphemeralKey>::builder()
//!         .issuer(issuer)
//!         .listener(listener)
//!         .parser(JsonKeyParser::new())
//!         .refresh_buffer(Duration::from_secs(30))
//!         .build()?;
//!
//!     manager.start().await;
//!     if let Some(KeyEvent::Failed { code, message }) = events.recv().await {
//!         eprintln!("{code}: {message}");
//!     }
//!     Ok(())
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod clock;
pub mod issuer;
pub mod key;
pub mod listener;
pub mod manager;
pub mod policy;
pub mod prelude;
mod testing;

pub use clock::{Clock, ManualClock, SystemClock};
pub use issuer::{FnIssuer, IssueResult, IssuerError, KeyArgs, KeyIssuer, KeyUpdateResponder};
pub use key::{
    CustomerEphemeralKey, EphemeralKey, IssuingCardEphemeralKey, JsonKey, JsonKeyParser,
    KeyFields, KeyObject, KeyParser,
};
pub use listener::{ChannelListener, KeyEvent, KeyListener};
pub use manager::{EphemeralKeyManager, KeyManagerBuilder, ManagerConfig, RefreshOutcome};
pub use policy::should_refresh;

/// Code reported to listeners for failures that did not come from the issuer.
pub const INTERNAL_ERROR_CODE: u16 = 500;

/// Error type for ephemeral key operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The issuer call failed.
    #[error("Key issuer failed ({code}): {message}")]
    Transport { code: u16, message: String },

    /// The issuer answered without a payload.
    #[error("key update was called with a null value")]
    NullPayload,

    /// The payload is not a JSON object.
    #[error(
        "key update was passed a value that could not be JSON parsed: [{detail}]. \
         The raw body from the issuer's response should be passed"
    )]
    MalformedPayload { detail: String },

    /// The payload is missing a required field.
    #[error(
        "key update was passed a JSON String that was invalid: [Improperly formatted JSON \
         for ephemeral key {kind} - No value for {field}]. The raw body from the issuer's \
         response should be passed"
    )]
    InvalidSchema {
        field: &'static str,
        kind: &'static str,
    },

    /// The caller dropped the update cycle before the issuer answered.
    #[error("key update was cancelled")]
    Cancelled,

    /// Invalid or missing configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Error category for unified error handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Issuer transport failures; a later refresh may succeed
    Transport,
    /// The issuer answered with an unusable payload
    Payload,
    /// Manager setup errors
    Configuration,
}

impl Error {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Transport { .. } | Error::Cancelled => ErrorCategory::Transport,
            Error::NullPayload | Error::MalformedPayload { .. } | Error::InvalidSchema { .. } => {
                ErrorCategory::Payload
            }
            Error::Config(_) => ErrorCategory::Configuration,
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.category() == ErrorCategory::Transport
    }

    pub fn is_payload_error(&self) -> bool {
        self.category() == ErrorCategory::Payload
    }

    pub fn is_configuration_error(&self) -> bool {
        self.category() == ErrorCategory::Configuration
    }

    /// Code delivered to [`KeyListener::on_error`].
    pub fn listener_code(&self) -> u16 {
        match self {
            Error::Transport { code, .. } => *code,
            _ => INTERNAL_ERROR_CODE,
        }
    }

    /// Message delivered to [`KeyListener::on_error`]; issuer messages pass through verbatim.
    pub fn listener_message(&self) -> String {
        match self {
            Error::Transport { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

impl From<IssuerError> for Error {
    fn from(err: IssuerError) -> Self {
        Error::Transport {
            code: err.code,
            message: err.message,
        }
    }
}

/// Result type for ephemeral key operations.
pub type Result<T> = std::result::Result<T, Error>;
