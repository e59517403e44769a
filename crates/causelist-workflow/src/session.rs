//! The single mutable unit of work: one browser, one request, one stage.

use std::fmt;
use std::str::FromStr;

use causelist_browser::{Driver, Locator};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::locators;

/// User inputs captured at workflow start.
///
/// Jurisdiction names must match the portal's option labels exactly; the
/// date string is passed through in `dd-mm-yyyy` form without validation,
/// so bad values surface downstream as element or result failures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CauseListRequest {
    pub state: String,
    pub district: String,
    /// Zero-based ordinal into the court-complex dropdown.
    pub complex_index: usize,
    pub date: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseType {
    Criminal,
    Civil,
}

impl CaseType {
    /// The submit button differs per case type.
    pub fn submit_locator(self) -> Locator {
        match self {
            CaseType::Criminal => locators::SUBMIT_CRIMINAL,
            CaseType::Civil => locators::SUBMIT_CIVIL,
        }
    }
}

impl fmt::Display for CaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaseType::Criminal => write!(f, "criminal"),
            CaseType::Civil => write!(f, "civil"),
        }
    }
}

impl FromStr for CaseType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cri" | "criminal" => Ok(CaseType::Criminal),
            "civ" | "civil" => Ok(CaseType::Civil),
            other => Err(format!("unknown case type '{other}', expected criminal or civil")),
        }
    }
}

/// Workflow stage. Strictly sequential; the machine is built for a single
/// forward traversal, never replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Start,
    PopupDismissed,
    StateSelected,
    DistrictSelected,
    ComplexSelected,
    CourtSelected,
    DateEntered,
    AwaitingCaptcha,
    CaseTypeSubmitted,
    ResultsReady,
    Done,
}

/// One workflow session. Exclusively owns its browser driver for its whole
/// lifetime; the driver is disposed when the session ends, successfully or
/// not.
#[derive(Debug)]
pub struct Session<D> {
    pub(crate) driver: D,
    id: Uuid,
    created_at: DateTime<Utc>,
    pub(crate) stage: Stage,
    request: CauseListRequest,
    pub(crate) case_type: Option<CaseType>,
}

impl<D: Driver> Session<D> {
    pub(crate) fn new(driver: D, request: CauseListRequest) -> Self {
        Self {
            driver,
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            stage: Stage::Start,
            request,
            case_type: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn request(&self) -> &CauseListRequest {
        &self.request
    }

    pub fn case_type(&self) -> Option<CaseType> {
        self.case_type
    }

    /// Abandons the session, shutting its browser down. For the normal
    /// paths `begin`/`resume` already dispose; this is for callers holding
    /// a session they can no longer continue.
    pub async fn dispose(mut self) -> crate::error::Result<()> {
        self.driver.dispose().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_type_parses_short_and_long_forms() {
        assert_eq!("cri".parse::<CaseType>().unwrap(), CaseType::Criminal);
        assert_eq!("Criminal".parse::<CaseType>().unwrap(), CaseType::Criminal);
        assert_eq!("civ".parse::<CaseType>().unwrap(), CaseType::Civil);
        assert_eq!(" CIVIL ".parse::<CaseType>().unwrap(), CaseType::Civil);
        assert!("other".parse::<CaseType>().is_err());
    }

    #[test]
    fn case_type_picks_its_own_submit_button() {
        assert_ne!(
            CaseType::Criminal.submit_locator(),
            CaseType::Civil.submit_locator()
        );
    }
}
