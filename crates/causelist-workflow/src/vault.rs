//! Checkpoint bridge: one process-wide slot that carries the live session
//! across the human CAPTCHA pause.

use tokio::sync::Mutex;
use tracing::debug;

use crate::error::{Result, WorkflowError};

/// Holds at most one suspended session. The single-slot shape is the
/// explicit guard against a second workflow run starting while a browser is
/// still live.
#[derive(Default)]
pub struct SessionVault<S> {
    slot: Mutex<Option<S>>,
}

impl<S> SessionVault<S> {
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }

    /// Parks a session across the human-interaction pause.
    ///
    /// If a session is already suspended the new one is handed back in the
    /// `Err` so the caller can dispose it; silently dropping it would leak a
    /// live browser.
    pub async fn suspend(&self, session: S) -> std::result::Result<(), S> {
        let mut slot = self.slot.lock().await;
        if slot.is_some() {
            return Err(session);
        }
        *slot = Some(session);
        debug!("session suspended");
        Ok(())
    }

    /// Takes the suspended session back out. Fails with `SessionNotFound`
    /// when the slot is empty or already consumed; browser state cannot be
    /// reconstructed, so the caller must restart the whole workflow.
    pub async fn resume(&self) -> Result<S> {
        self.slot
            .lock()
            .await
            .take()
            .ok_or(WorkflowError::SessionNotFound)
    }

    pub async fn is_suspended(&self) -> bool {
        self.slot.lock().await.is_some()
    }

    /// Empties the slot, returning whatever was there so the caller can
    /// dispose it.
    pub async fn clear(&self) -> Option<S> {
        self.slot.lock().await.take()
    }
}
