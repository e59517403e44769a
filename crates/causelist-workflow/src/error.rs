//! Workflow error types.

use crate::session::Stage;
use causelist_browser::BrowserError;

#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Browser(#[from] BrowserError),

    #[error("no enabled court option with a real value is available")]
    NoSelectableCourt,

    #[error("no suspended session found; restart the workflow from the beginning")]
    SessionNotFound,

    #[error("a session is already suspended; finish or clear it before starting another")]
    SessionAlreadyActive,

    #[error("session is in stage {actual:?}, expected {expected:?}")]
    WrongStage { expected: Stage, actual: Stage },
}

pub type Result<T> = std::result::Result<T, WorkflowError>;
