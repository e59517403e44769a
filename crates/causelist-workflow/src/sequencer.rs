//! The form sequencer: walks the cascading dropdowns up to the CAPTCHA
//! checkpoint, and resumes past it after the human solve.

use std::time::Duration;

use causelist_browser::{Driver, Locator, SelectOption, WaitMode};
use tracing::{debug, info, warn};

use crate::error::{Result, WorkflowError};
use crate::extract::{CauseListTable, extract_cause_list};
use crate::locators;
use crate::session::{CaseType, CauseListRequest, Session, Stage};

/// Portal URL plus every pacing knob of the run. Defaults match the portal's
/// observed behaviour; tests zero the pacing.
#[derive(Debug, Clone)]
pub struct SequencerConfig {
    pub portal_url: String,
    /// Hard ceiling for every required element wait.
    pub step_timeout: Duration,
    /// Short best-effort window for the introductory popup.
    pub popup_timeout: Duration,
    /// Pause after each dropdown selection, giving dependent dropdowns a
    /// chance to reload.
    pub settle: Duration,
    /// Manual-poll retries for dependent dropdown population. The portal
    /// exposes no loading-complete signal; "more than one option" is the
    /// readiness heuristic.
    pub option_retries: u32,
    pub option_retry_pause: Duration,
    /// Grace sleep after a missed results-table wait.
    pub results_grace: Duration,
    /// Final pause before capturing the page source.
    pub final_settle: Duration,
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            portal_url: locators::PORTAL_URL.to_string(),
            step_timeout: causelist_browser::STEP_TIMEOUT,
            popup_timeout: Duration::from_secs(5),
            settle: Duration::from_secs(2),
            option_retries: 3,
            option_retry_pause: Duration::from_secs(2),
            results_grace: Duration::from_secs(10),
            final_settle: Duration::from_secs(3),
        }
    }
}

impl SequencerConfig {
    /// All pacing zeroed; the step sequence is unchanged.
    pub fn immediate(portal_url: impl Into<String>) -> Self {
        Self {
            portal_url: portal_url.into(),
            step_timeout: Duration::ZERO,
            popup_timeout: Duration::ZERO,
            settle: Duration::ZERO,
            option_retries: 1,
            option_retry_pause: Duration::ZERO,
            results_grace: Duration::ZERO,
            final_settle: Duration::ZERO,
        }
    }
}

/// Drives the form up to the CAPTCHA checkpoint and returns the suspended
/// session. Any required-element failure disposes the browser before the
/// error propagates.
pub async fn begin<D: Driver>(
    driver: D,
    request: CauseListRequest,
    config: &SequencerConfig,
) -> Result<Session<D>> {
    let mut session = Session::new(driver, request);
    info!(session_id = %session.id(), "starting cause list acquisition");

    match fill_form(&mut session, config).await {
        Ok(()) => {
            info!(
                session_id = %session.id(),
                "form filled; solve the CAPTCHA in the live browser, then resume"
            );
            Ok(session)
        }
        Err(err) => {
            if let Err(dispose_err) = session.driver.dispose().await {
                warn!(error = %dispose_err, "failed to dispose browser after setup failure");
            }
            Err(err)
        }
    }
}

/// Submits the case-type choice, waits out the results table, extracts it,
/// and disposes the browser. Consumes the session: the machine is not built
/// for replay.
pub async fn resume<D: Driver>(
    mut session: Session<D>,
    case_type: CaseType,
    config: &SequencerConfig,
) -> Result<CauseListTable> {
    if session.stage() != Stage::AwaitingCaptcha {
        let err = WorkflowError::WrongStage {
            expected: Stage::AwaitingCaptcha,
            actual: session.stage(),
        };
        if let Err(dispose_err) = session.driver.dispose().await {
            warn!(error = %dispose_err, "failed to dispose browser after stage mismatch");
        }
        return Err(err);
    }

    session.case_type = Some(case_type);
    let outcome = submit_and_extract(&mut session, case_type, config).await;
    if let Err(dispose_err) = session.driver.dispose().await {
        warn!(error = %dispose_err, "failed to dispose browser after run");
    }
    outcome
}

async fn fill_form<D: Driver>(session: &mut Session<D>, config: &SequencerConfig) -> Result<()> {
    let request = session.request().clone();

    session.driver.open(&config.portal_url).await?;

    // Best-effort: the portal shows an introductory overlay on some days.
    let dismissed = session
        .driver
        .click_if_present(locators::POPUP_CLOSE, config.popup_timeout)
        .await?;
    if dismissed {
        info!("dismissed introductory popup");
    } else {
        info!("no introductory popup; continuing");
    }
    session.stage = Stage::PopupDismissed;

    session
        .driver
        .select_by_label(locators::STATE_SELECT, &request.state)
        .await?;
    session.stage = Stage::StateSelected;
    info!(state = %request.state, "state selected");
    tokio::time::sleep(config.settle).await;

    await_dropdown_population(&session.driver, locators::DISTRICT_SELECT, config).await?;
    session
        .driver
        .select_by_label(locators::DISTRICT_SELECT, &request.district)
        .await?;
    session.stage = Stage::DistrictSelected;
    info!(district = %request.district, "district selected");
    tokio::time::sleep(config.settle).await;

    await_dropdown_population(&session.driver, locators::COMPLEX_SELECT, config).await?;
    session
        .driver
        .select_by_index(locators::COMPLEX_SELECT, request.complex_index)
        .await?;
    session.stage = Stage::ComplexSelected;
    info!(ordinal = request.complex_index, "court complex selected");
    tokio::time::sleep(config.settle).await;

    let options = session.driver.options(locators::COURT_SELECT).await?;
    for option in &options {
        debug!(
            index = option.index,
            text = %option.text,
            value = %option.value,
            disabled = option.disabled,
            "court option"
        );
    }
    let court_index = first_eligible_court(&options).ok_or(WorkflowError::NoSelectableCourt)?;
    session
        .driver
        .select_by_index(locators::COURT_SELECT, court_index)
        .await?;
    session.stage = Stage::CourtSelected;
    info!(
        index = court_index,
        court = %options[court_index].text,
        "court selected"
    );

    session
        .driver
        .type_text(locators::DATE_INPUT, &request.date)
        .await?;
    session.stage = Stage::DateEntered;
    info!(date = %request.date, "cause list date entered");

    session.stage = Stage::AwaitingCaptcha;
    Ok(())
}

async fn submit_and_extract<D: Driver>(
    session: &mut Session<D>,
    case_type: CaseType,
    config: &SequencerConfig,
) -> Result<CauseListTable> {
    session.driver.click(case_type.submit_locator()).await?;
    session.stage = Stage::CaseTypeSubmitted;
    info!(%case_type, "case type submitted");

    let appeared = session
        .driver
        .wait_for(locators::RESULTS_PANEL, WaitMode::BestEffort, config.step_timeout)
        .await?;
    if !appeared {
        // A rejected CAPTCHA and a slow render look identical from here;
        // proceeding yields at worst a sentinel document instead of
        // discarding a mostly-successful session.
        warn!(
            grace = ?config.results_grace,
            "results table not seen in time; sleeping grace period and extracting anyway"
        );
        tokio::time::sleep(config.results_grace).await;
    }
    tokio::time::sleep(config.final_settle).await;
    session.stage = Stage::ResultsReady;

    let html = session.driver.page_source().await?;
    let table = extract_cause_list(&html);
    session.stage = Stage::Done;
    info!(
        rows = table.rows().len(),
        sentinel = table.is_sentinel(),
        "cause list extracted"
    );
    Ok(table)
}

/// Dependent dropdowns repopulate asynchronously with no completion signal.
/// Poll a fixed number of times for more than the placeholder option, then
/// proceed regardless; a genuinely empty dropdown fails at selection time.
async fn await_dropdown_population<D: Driver>(
    driver: &D,
    locator: Locator,
    config: &SequencerConfig,
) -> Result<()> {
    for attempt in 0..config.option_retries {
        let options = driver.options(locator).await?;
        if options.len() > 1 {
            return Ok(());
        }
        debug!(attempt, target = %locator.describe(), "dropdown not yet populated");
        tokio::time::sleep(config.option_retry_pause).await;
    }
    warn!(target = %locator.describe(), "dropdown still sparse after retries; proceeding");
    Ok(())
}

/// First court option past the placeholder that is enabled and carries a
/// real value. The option list is portal-populated and drifts, so a fixed
/// ordinal is never trusted here.
fn first_eligible_court(options: &[SelectOption]) -> Option<usize> {
    options
        .iter()
        .skip(1)
        .find(|option| option.is_eligible())
        .map(|option| option.index)
}
