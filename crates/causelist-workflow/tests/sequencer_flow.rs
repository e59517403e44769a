//! End-to-end sequencer runs against a scripted driver.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use causelist_browser::{BrowserError, Driver, Locator, SelectOption, WaitMode};
use causelist_workflow::{
    CaseType, CauseListRequest, SequencerConfig, Stage, WorkflowError, begin, locators, resume,
};

#[derive(Debug, Default)]
struct MockState {
    calls: Mutex<Vec<String>>,
    district_polls: AtomicUsize,
    /// Number of sparse responses before the district dropdown populates.
    district_sparse_polls: usize,
    court_options: Vec<SelectOption>,
    results_present: bool,
    page_html: String,
    fail_on_select_label: Option<String>,
    disposed: AtomicBool,
}

impl MockState {
    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[derive(Debug)]
struct MockDriver {
    state: Arc<MockState>,
}

fn option(index: usize, text: &str, value: &str, disabled: bool) -> SelectOption {
    SelectOption {
        index,
        text: text.to_string(),
        value: value.to_string(),
        disabled,
    }
}

fn many_options() -> Vec<SelectOption> {
    vec![
        option(0, "Select", "", false),
        option(1, "First", "1", false),
        option(2, "Second", "2", false),
    ]
}

#[async_trait]
impl Driver for MockDriver {
    async fn open(&self, url: &str) -> Result<(), BrowserError> {
        self.state.record(format!("open {url}"));
        Ok(())
    }

    async fn click(&self, locator: Locator) -> Result<(), BrowserError> {
        self.state.record(format!("click {}", locator.describe()));
        Ok(())
    }

    async fn click_if_present(
        &self,
        locator: Locator,
        _timeout: Duration,
    ) -> Result<bool, BrowserError> {
        self.state
            .record(format!("click_if_present {}", locator.describe()));
        // The introductory popup never shows in these runs.
        Ok(false)
    }

    async fn select_by_label(&self, locator: Locator, label: &str) -> Result<(), BrowserError> {
        if self.state.fail_on_select_label.as_deref() == Some(label) {
            return Err(BrowserError::ElementNotFound {
                target: locator.describe(),
                waited: Duration::ZERO,
            });
        }
        self.state
            .record(format!("select_by_label {} {label}", locator.describe()));
        Ok(())
    }

    async fn select_by_index(&self, locator: Locator, index: usize) -> Result<(), BrowserError> {
        self.state
            .record(format!("select_by_index {} {index}", locator.describe()));
        Ok(())
    }

    async fn options(&self, locator: Locator) -> Result<Vec<SelectOption>, BrowserError> {
        self.state.record(format!("options {}", locator.describe()));
        if locator == locators::DISTRICT_SELECT {
            let polls = self.state.district_polls.fetch_add(1, Ordering::SeqCst);
            if polls < self.state.district_sparse_polls {
                return Ok(vec![option(0, "Select district", "", false)]);
            }
            return Ok(many_options());
        }
        if locator == locators::COURT_SELECT {
            return Ok(self.state.court_options.clone());
        }
        Ok(many_options())
    }

    async fn type_text(&self, locator: Locator, text: &str) -> Result<(), BrowserError> {
        self.state
            .record(format!("type_text {} {text}", locator.describe()));
        Ok(())
    }

    async fn wait_for(
        &self,
        locator: Locator,
        _mode: WaitMode,
        _timeout: Duration,
    ) -> Result<bool, BrowserError> {
        self.state.record(format!("wait_for {}", locator.describe()));
        Ok(self.state.results_present)
    }

    async fn page_source(&self) -> Result<String, BrowserError> {
        Ok(self.state.page_html.clone())
    }

    async fn dispose(&mut self) -> Result<(), BrowserError> {
        self.state.disposed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

fn request() -> CauseListRequest {
    CauseListRequest {
        state: "Telangana".to_string(),
        district: "Hyderabad".to_string(),
        complex_index: 1,
        date: "14-10-2025".to_string(),
    }
}

fn config() -> SequencerConfig {
    SequencerConfig::immediate("https://portal.test/causelist")
}

fn court_options_with_one_eligible() -> Vec<SelectOption> {
    vec![
        option(0, "Select court", "", true),
        option(1, "Court I", "3", true),
        option(2, "Spl. Court for CBI Cases", "5", false),
    ]
}

const RESULTS_HTML: &str = r#"
    <div id="CL_result_div"><table id="dispTable">
        <tr><th>Sr No</th><th>Case No</th><th>Parties</th><th>Advocate</th></tr>
        <tr><td>1</td><td>CC 12/2025</td><td>State vs A</td><td>B. Rao</td></tr>
        <tr><td>2</td><td>CC 13/2025</td><td>State vs C</td><td>D. Rao</td></tr>
    </table></div>
"#;

#[tokio::test]
async fn full_run_extracts_the_results_table() {
    let state = Arc::new(MockState {
        court_options: court_options_with_one_eligible(),
        results_present: true,
        page_html: RESULTS_HTML.to_string(),
        ..Default::default()
    });
    let driver = MockDriver {
        state: state.clone(),
    };

    let session = begin(driver, request(), &config()).await.unwrap();
    assert_eq!(session.stage(), Stage::AwaitingCaptcha);

    let calls = state.calls();
    assert_eq!(calls[0], "open https://portal.test/causelist");
    assert!(calls.contains(&"select_by_label id=sess_state_code Telangana".to_string()));
    assert!(calls.contains(&"select_by_label id=sess_dist_code Hyderabad".to_string()));
    assert!(calls.contains(&"select_by_index id=court_complex_code 1".to_string()));
    // First eligible court option, never the disabled one before it.
    assert!(calls.contains(&"select_by_index id=CL_court_no 2".to_string()));
    assert!(calls.contains(&"type_text id=causelist_date 14-10-2025".to_string()));
    assert!(!state.disposed.load(Ordering::SeqCst));

    let table = resume(session, CaseType::Criminal, &config()).await.unwrap();
    assert_eq!(table.rows().len(), 3);
    assert_eq!(table.rows()[1][1], "CC 12/2025");
    assert!(!table.is_sentinel());
    assert!(state.disposed.load(Ordering::SeqCst));

    let calls = state.calls();
    assert!(
        calls
            .iter()
            .any(|call| call.starts_with("click xpath=") && call.contains("'cri'"))
    );
}

#[tokio::test]
async fn civil_choice_clicks_the_civil_button() {
    let state = Arc::new(MockState {
        court_options: court_options_with_one_eligible(),
        results_present: true,
        page_html: RESULTS_HTML.to_string(),
        ..Default::default()
    });
    let driver = MockDriver {
        state: state.clone(),
    };

    let session = begin(driver, request(), &config()).await.unwrap();
    resume(session, CaseType::Civil, &config()).await.unwrap();

    let calls = state.calls();
    assert!(
        calls
            .iter()
            .any(|call| call.starts_with("click xpath=") && call.contains("'civ'"))
    );
}

#[tokio::test]
async fn missing_results_table_degrades_to_sentinel() {
    let state = Arc::new(MockState {
        court_options: court_options_with_one_eligible(),
        results_present: false,
        page_html: "<html><body>Invalid Captcha</body></html>".to_string(),
        ..Default::default()
    });
    let driver = MockDriver {
        state: state.clone(),
    };

    let session = begin(driver, request(), &config()).await.unwrap();
    let table = resume(session, CaseType::Criminal, &config()).await.unwrap();

    assert!(table.is_sentinel());
    assert_eq!(table.rows().len(), 1);
    assert!(state.disposed.load(Ordering::SeqCst));
}

#[tokio::test]
async fn no_selectable_court_is_fatal_and_disposes_the_browser() {
    let state = Arc::new(MockState {
        court_options: vec![option(0, "Select court", "", true), option(1, "Court", "", false)],
        ..Default::default()
    });
    let driver = MockDriver {
        state: state.clone(),
    };

    let err = begin(driver, request(), &config()).await.unwrap_err();
    assert!(matches!(err, WorkflowError::NoSelectableCourt));
    assert!(state.disposed.load(Ordering::SeqCst));
}

#[tokio::test]
async fn setup_failure_disposes_the_browser() {
    let state = Arc::new(MockState {
        court_options: court_options_with_one_eligible(),
        fail_on_select_label: Some("Hyderabad".to_string()),
        ..Default::default()
    });
    let driver = MockDriver {
        state: state.clone(),
    };

    let err = begin(driver, request(), &config()).await.unwrap_err();
    assert!(matches!(err, WorkflowError::Browser(_)));
    assert!(state.disposed.load(Ordering::SeqCst));
}

#[tokio::test]
async fn district_dropdown_is_polled_until_populated() {
    let state = Arc::new(MockState {
        court_options: court_options_with_one_eligible(),
        results_present: true,
        page_html: RESULTS_HTML.to_string(),
        district_sparse_polls: 2,
        ..Default::default()
    });
    let driver = MockDriver {
        state: state.clone(),
    };

    let mut config = config();
    config.option_retries = 3;

    begin(driver, request(), &config).await.unwrap();
    // Two sparse polls, then the populated snapshot.
    assert!(state.district_polls.load(Ordering::SeqCst) >= 3);
}
