use crate::error::{Result, SessionError};
use crate::state::{SessionState, Trigger};
use tokio::sync::watch;

/// One messaging session and its observable state.
///
/// The owner drives it with [`Session::fire`]; anyone else reads it through
/// [`Session::status`] or a [`Session::subscribe`] receiver.
#[derive(Debug)]
pub struct Session {
    id: String,
    state: watch::Sender<SessionState>,
}

impl Session {
    pub fn new(id: impl Into<String>) -> Self {
        let (state, _) = watch::channel(SessionState::Disconnected);
        Self {
            id: id.into(),
            state,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Current state.
    pub fn status(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// The scan code waiting for the user, if any.
    pub fn current_qr(&self) -> Result<String> {
        match &*self.state.borrow() {
            SessionState::AwaitingScan { qr } => Ok(qr.clone()),
            other => Err(SessionError::NoPendingScan(other.to_string())),
        }
    }

    /// Apply `trigger` and return the new state. The state is left untouched
    /// when the transition is rejected.
    pub fn fire(&self, trigger: Trigger) -> Result<SessionState> {
        let mut rejected = None;
        self.state.send_if_modified(|state| match state.apply(trigger) {
            Ok(next) => {
                tracing::debug!("Session {}: {} -> {}", self.id, state, next);
                let changed = *state != next;
                *state = next;
                changed
            }
            Err(e) => {
                rejected = Some(e);
                false
            }
        });
        if let Some(e) = rejected {
            return Err(e);
        }

        let next = self.status();
        match &next {
            SessionState::Connected => tracing::info!("Session {} connected", self.id),
            SessionState::Failed { reason } => {
                tracing::warn!("Session {} failed: {}", self.id, reason);
            }
            _ => {}
        }
        Ok(next)
    }

    /// Return to `Disconnected` from any state.
    pub fn reset(&self) -> SessionState {
        self.state.send_replace(SessionState::Disconnected);
        SessionState::Disconnected
    }
}
