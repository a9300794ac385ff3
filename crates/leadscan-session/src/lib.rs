//! Leadscan Session - lifecycle of the messaging session that delivers
//! extracted contacts.
//!
//! A [`Session`] is an owned object rather than process-wide status flags.
//! Its state only changes through [`SessionState::apply`], so every observer
//! sees the same legal sequence:
//!
//! ```text
//! Disconnected -> Starting -> AwaitingScan -> Connected
//!                     |             |            |
//!                     +---> Failed <+------------+
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

pub mod error;
pub mod session;
pub mod state;

pub use error::{Result, SessionError};
pub use session::Session;
pub use state::{SessionState, Trigger};
