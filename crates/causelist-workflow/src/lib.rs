//! The interactive cause-list acquisition workflow.
//!
//! A single run walks the eCourts cause-list form through its cascading
//! dropdowns, parks the live browser session across the human CAPTCHA solve,
//! then submits the chosen case type and extracts the results table. The
//! browser is disposed exactly once per session, on every exit path.

pub mod error;
pub mod extract;
pub mod locators;
pub mod sequencer;
pub mod session;
pub mod vault;

pub use error::WorkflowError;
pub use extract::{CauseListTable, NO_DATA_SENTINEL, extract_cause_list};
pub use sequencer::{SequencerConfig, begin, resume};
pub use session::{CaseType, CauseListRequest, Session, Stage};
pub use vault::SessionVault;
