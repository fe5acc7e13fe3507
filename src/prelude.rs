//! Prelude module for convenient imports.
//!
//! ```rust
//! use ephemeral_key::prelude::*;
//! ```

pub use crate::Error;
pub use crate::Result;

// Manager
pub use crate::EphemeralKeyManager;
pub use crate::KeyManagerBuilder;
pub use crate::ManagerConfig;
pub use crate::RefreshOutcome;

// Ports
pub use crate::{KeyArgs, KeyIssuer, KeyListener};

// Keys
pub use crate::{CustomerEphemeralKey, EphemeralKey, IssuingCardEphemeralKey, JsonKeyParser};

// Time
pub use crate::{Clock, ManualClock, SystemClock};
