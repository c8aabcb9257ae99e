//! Session token state.

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::state::cell::StateCell;

/// The ephemeral token pair identifying an authenticated pagination
/// session. Empty strings mean "not yet authenticated".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionTokens {
    pub session_id: String,
    pub dl_sec_key: String,
}

impl SessionTokens {
    pub fn new(session_id: impl Into<String>, dl_sec_key: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            dl_sec_key: dl_sec_key.into(),
        }
    }

    /// True once a login has produced a session id.
    pub fn is_established(&self) -> bool {
        !self.session_id.is_empty()
    }
}

/// Shared holder for the current [`SessionTokens`], overwritten on every
/// remote response that carries fresh values.
#[derive(Debug, Default)]
pub struct SessionState {
    cell: StateCell<SessionTokens>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> SessionTokens {
        self.cell.get()
    }

    pub fn set(&self, tokens: SessionTokens) {
        self.cell.set(|current| *current = tokens);
    }

    /// Drops back to the unauthenticated state.
    pub fn clear(&self) {
        self.cell.set(|current| *current = SessionTokens::default());
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionTokens> {
        self.cell.subscribe()
    }
}
