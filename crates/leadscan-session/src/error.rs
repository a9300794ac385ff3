use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// The trigger is not accepted in the current state.
    #[error("cannot apply {trigger} while {state}")]
    InvalidTransition { state: String, trigger: String },

    /// No scan code is pending.
    #[error("no scan code available while {0}")]
    NoPendingScan(String),
}

pub type Result<T> = std::result::Result<T, SessionError>;
