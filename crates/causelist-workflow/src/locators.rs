//! Fixed locator table for the eCourts cause-list page.
//!
//! One entry per logical form field. Not user-configurable; a schema change
//! on the portal means updating this table, never the sequencer.

use causelist_browser::Locator;

pub const PORTAL_URL: &str = "https://services.ecourts.gov.in/ecourtindia_v6/?p=cause_list/index";

/// Introductory overlay close button. Dismissal is best-effort.
pub const POPUP_CLOSE: Locator =
    Locator::XPath("//button[contains(@class, 'close') or @aria-label='Close' or text()='×']");

pub const STATE_SELECT: Locator = Locator::Id("sess_state_code");
pub const DISTRICT_SELECT: Locator = Locator::Id("sess_dist_code");
pub const COMPLEX_SELECT: Locator = Locator::Id("court_complex_code");
pub const COURT_SELECT: Locator = Locator::Id("CL_court_no");
pub const DATE_INPUT: Locator = Locator::Id("causelist_date");

pub const SUBMIT_CRIMINAL: Locator =
    Locator::XPath("//button[contains(@onclick, \"submit_causelist('cri')\")]");
pub const SUBMIT_CIVIL: Locator =
    Locator::XPath("//button[contains(@onclick, \"submit_causelist('civ')\")]");

/// The server-rendered results area; used only as the readiness signal.
pub const RESULTS_PANEL: Locator = Locator::XPath("//div[@id='CL_result_div']//table");

/// Element id of the results table inside the captured markup.
pub const RESULTS_TABLE_ID: &str = "dispTable";
