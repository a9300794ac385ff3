//! Session states and the transition function.

use crate::error::{Result, SessionError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a messaging session is in its lifecycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SessionState {
    #[default]
    Disconnected,
    Starting,
    /// A scan code was issued and is waiting for the user.
    AwaitingScan { qr: String },
    Connected,
    Failed { reason: String },
}

/// Events that move a session between states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    Start,
    QrReceived(String),
    Ready,
    AuthFailure(String),
    Disconnected(String),
    InitFailed(String),
    Reset,
}

impl SessionState {
    /// Compute the state after `trigger`, rejecting transitions that make no
    /// sense from here.
    pub fn apply(&self, trigger: Trigger) -> Result<SessionState> {
        use SessionState as S;

        let next = match (self, trigger) {
            (_, Trigger::Reset) => S::Disconnected,
            (S::Disconnected | S::Failed { .. }, Trigger::Start) => S::Starting,
            (S::Starting | S::AwaitingScan { .. }, Trigger::QrReceived(qr)) => {
                S::AwaitingScan { qr }
            }
            (S::Starting | S::AwaitingScan { .. }, Trigger::Ready) => S::Connected,
            (
                S::Starting | S::AwaitingScan { .. } | S::Connected,
                Trigger::AuthFailure(reason),
            ) => S::Failed { reason },
            (S::Starting, Trigger::InitFailed(reason)) => S::Failed { reason },
            (S::Starting | S::AwaitingScan { .. } | S::Connected, Trigger::Disconnected(_)) => {
                S::Disconnected
            }
            (state, trigger) => {
                return Err(SessionError::InvalidTransition {
                    state: state.to_string(),
                    trigger: trigger.to_string(),
                })
            }
        };
        Ok(next)
    }

    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected)
    }

    /// Whether the session is doing, or waiting on, anything.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            Self::Starting | Self::AwaitingScan { .. } | Self::Connected
        )
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disconnected => write!(f, "disconnected"),
            Self::Starting => write!(f, "starting"),
            Self::AwaitingScan { .. } => write!(f, "awaiting scan"),
            Self::Connected => write!(f, "connected"),
            Self::Failed { reason } => write!(f, "failed ({reason})"),
        }
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => write!(f, "start"),
            Self::QrReceived(_) => write!(f, "qr received"),
            Self::Ready => write!(f, "ready"),
            Self::AuthFailure(_) => write!(f, "auth failure"),
            Self::Disconnected(_) => write!(f, "disconnected"),
            Self::InitFailed(_) => write!(f, "init failed"),
            Self::Reset => write!(f, "reset"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path() {
        let state = SessionState::default()
            .apply(Trigger::Start)
            .and_then(|s| s.apply(Trigger::QrReceived("qr-1".into())))
            .and_then(|s| s.apply(Trigger::QrReceived("qr-2".into())))
            .unwrap();
        assert_eq!(state, SessionState::AwaitingScan { qr: "qr-2".into() });

        let state = state.apply(Trigger::Ready).unwrap();
        assert!(state.is_connected());
    }

    #[test]
    fn test_failures() {
        let starting = SessionState::Starting;
        assert_eq!(
            starting.apply(Trigger::InitFailed("no renderer".into())).unwrap(),
            SessionState::Failed {
                reason: "no renderer".into()
            }
        );
        assert_eq!(
            SessionState::Connected
                .apply(Trigger::AuthFailure("logged out".into()))
                .unwrap(),
            SessionState::Failed {
                reason: "logged out".into()
            }
        );
    }

    #[test]
    fn test_restart_after_failure() {
        let failed = SessionState::Failed {
            reason: "x".into(),
        };
        assert_eq!(failed.apply(Trigger::Start).unwrap(), SessionState::Starting);
    }

    #[test]
    fn test_invalid_transitions() {
        for (state, trigger) in [
            (SessionState::Disconnected, Trigger::Ready),
            (SessionState::Connected, Trigger::Start),
            (SessionState::Connected, Trigger::QrReceived("qr".into())),
            (SessionState::Disconnected, Trigger::Disconnected("gone".into())),
            (SessionState::Connected, Trigger::InitFailed("x".into())),
        ] {
            let err = state.apply(trigger).unwrap_err();
            assert!(matches!(err, SessionError::InvalidTransition { .. }));
        }
    }

    #[test]
    fn test_reset_always_allowed() {
        for state in [
            SessionState::Disconnected,
            SessionState::Starting,
            SessionState::AwaitingScan { qr: "qr".into() },
            SessionState::Connected,
            SessionState::Failed { reason: "x".into() },
        ] {
            assert_eq!(state.apply(Trigger::Reset).unwrap(), SessionState::Disconnected);
        }
    }

    #[test]
    fn test_serialized_status() {
        let json = serde_json::to_value(SessionState::AwaitingScan { qr: "abc".into() }).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "awaiting_scan", "qr": "abc" }));
    }
}
