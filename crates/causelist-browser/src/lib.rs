//! WebDriver session driver for the causelist workflow.
//!
//! This crate owns the one live browser per run. It exposes:
//! - Element locators (strategy + identifier)
//! - A bounded polling wait policy with an explicit required/best-effort split
//! - A session driver over a remote WebDriver (Chrome via chromedriver)
//! - The `Driver` trait the workflow layer is written against

use std::future::Future;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thirtyfour::components::SelectElement;
use thirtyfour::prelude::*;
use tracing::{debug, warn};

/// Per-step timeout for every required element wait.
pub const STEP_TIMEOUT: Duration = Duration::from_secs(25);

/// Interval between polls of the live page.
pub const POLL_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Debug, thiserror::Error)]
pub enum BrowserError {
    #[error("element not found within {waited:?}: {target}")]
    ElementNotFound { target: String, waited: Duration },

    #[error("webdriver error: {0}")]
    WebDriver(#[from] WebDriverError),

    #[error("browser session already disposed")]
    Disposed,
}

pub type Result<T> = std::result::Result<T, BrowserError>;

/// A portal element address: lookup strategy plus identifier.
///
/// Pure data; the workflow crate holds one fixed table of these per logical
/// form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locator {
    Id(&'static str),
    XPath(&'static str),
    Css(&'static str),
}

impl Locator {
    pub fn by(&self) -> By {
        match *self {
            Locator::Id(id) => By::Id(id),
            Locator::XPath(xpath) => By::XPath(xpath),
            Locator::Css(css) => By::Css(css),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Locator::Id(id) => format!("id={id}"),
            Locator::XPath(xpath) => format!("xpath={xpath}"),
            Locator::Css(css) => format!("css={css}"),
        }
    }
}

/// Whether a wait failure aborts the step or degrades to "absent".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitMode {
    /// Timeout is a hard `ElementNotFound`.
    Required,
    /// Timeout yields `None`; the caller decides how to degrade.
    BestEffort,
}

/// One `<option>` of a portal dropdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectOption {
    pub index: usize,
    pub text: String,
    pub value: String,
    pub disabled: bool,
}

impl SelectOption {
    /// Enabled and carrying a real value, i.e. actually selectable.
    pub fn is_eligible(&self) -> bool {
        !self.disabled && !self.value.trim().is_empty()
    }
}

/// Polls `probe` at a fixed interval until it yields a value or `timeout`
/// elapses. This is the only sanctioned way to observe asynchronous page
/// state; no caller may assume instantaneous DOM updates.
///
/// The probe always runs at least once, so a zero timeout still observes the
/// current page state.
pub async fn poll_until<T, F, Fut>(
    target: &str,
    timeout: Duration,
    interval: Duration,
    mode: WaitMode,
    mut probe: F,
) -> Result<Option<T>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<T>>>,
{
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(found) = probe().await? {
            return Ok(Some(found));
        }
        if Instant::now() >= deadline {
            return match mode {
                WaitMode::Required => Err(BrowserError::ElementNotFound {
                    target: target.to_string(),
                    waited: timeout,
                }),
                WaitMode::BestEffort => {
                    debug!(target, ?timeout, "best-effort wait elapsed without a match");
                    Ok(None)
                }
            };
        }
        tokio::time::sleep(interval).await;
    }
}

/// Operations the form sequencer needs from a browser.
///
/// `SessionDriver` is the real implementation; tests script a mock against
/// this trait.
#[async_trait]
pub trait Driver: Send {
    async fn open(&self, url: &str) -> Result<()>;

    /// Waits for the element, then clicks it.
    async fn click(&self, locator: Locator) -> Result<()>;

    /// Clicks the element if it shows up within `timeout`; absence is not an
    /// error. Returns whether a click happened.
    async fn click_if_present(&self, locator: Locator, timeout: Duration) -> Result<bool>;

    /// Selects a dropdown option by its exact visible label.
    async fn select_by_label(&self, locator: Locator, label: &str) -> Result<()>;

    /// Selects a dropdown option by zero-based ordinal.
    async fn select_by_index(&self, locator: Locator, index: usize) -> Result<()>;

    /// Snapshot of the dropdown's current `<option>` elements.
    async fn options(&self, locator: Locator) -> Result<Vec<SelectOption>>;

    /// Clears the field, then types `text` into it.
    async fn type_text(&self, locator: Locator, text: &str) -> Result<()>;

    /// Waits for the element per `mode`. Returns whether it appeared.
    async fn wait_for(&self, locator: Locator, mode: WaitMode, timeout: Duration) -> Result<bool>;

    /// Raw markup of the current page.
    async fn page_source(&self) -> Result<String>;

    /// Shuts the browser down. Idempotent; must run on every exit path.
    async fn dispose(&mut self) -> Result<()>;
}

/// Owns one remote WebDriver session for the lifetime of a workflow run.
pub struct SessionDriver {
    driver: Option<WebDriver>,
}

impl SessionDriver {
    /// Connects to a running chromedriver/selenium endpoint and starts a
    /// Chrome session.
    pub async fn connect(webdriver_url: &str, headless: bool) -> Result<Self> {
        let mut caps = DesiredCapabilities::chrome();
        if headless {
            caps.add_chrome_arg("--headless")?;
        }
        caps.add_chrome_arg("--no-sandbox")?;
        caps.add_chrome_arg("--disable-dev-shm-usage")?;
        caps.add_chrome_arg("--window-size=1920,1080")?;

        let driver = WebDriver::new(webdriver_url, caps).await?;
        debug!(webdriver_url, headless, "webdriver session started");

        Ok(Self {
            driver: Some(driver),
        })
    }

    fn driver(&self) -> Result<&WebDriver> {
        self.driver.as_ref().ok_or(BrowserError::Disposed)
    }

    /// Resolves `locator` through the wait policy.
    async fn resolve(
        &self,
        locator: Locator,
        mode: WaitMode,
        timeout: Duration,
    ) -> Result<Option<WebElement>> {
        let driver = self.driver()?;
        let target = locator.describe();
        poll_until(&target, timeout, POLL_INTERVAL, mode, move || async move {
            match driver.find(locator.by()).await {
                Ok(element) => Ok(Some(element)),
                Err(_) => Ok(None),
            }
        })
        .await
    }

    /// Resolves a required element with the fixed per-step timeout.
    async fn require(&self, locator: Locator) -> Result<WebElement> {
        let found = self.resolve(locator, WaitMode::Required, STEP_TIMEOUT).await?;
        // Required mode either yields an element or errors out above.
        found.ok_or(BrowserError::ElementNotFound {
            target: locator.describe(),
            waited: STEP_TIMEOUT,
        })
    }
}

#[async_trait]
impl Driver for SessionDriver {
    async fn open(&self, url: &str) -> Result<()> {
        self.driver()?.goto(url).await?;
        debug!(url, "navigated");
        Ok(())
    }

    async fn click(&self, locator: Locator) -> Result<()> {
        let element = self.require(locator).await?;
        element.click().await?;
        Ok(())
    }

    async fn click_if_present(&self, locator: Locator, timeout: Duration) -> Result<bool> {
        match self.resolve(locator, WaitMode::BestEffort, timeout).await? {
            Some(element) => {
                element.click().await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn select_by_label(&self, locator: Locator, label: &str) -> Result<()> {
        let element = self.require(locator).await?;
        let select = SelectElement::new(&element).await?;
        select.select_by_exact_text(label).await?;
        Ok(())
    }

    async fn select_by_index(&self, locator: Locator, index: usize) -> Result<()> {
        let element = self.require(locator).await?;
        let select = SelectElement::new(&element).await?;
        select.select_by_index(index as u32).await?;
        Ok(())
    }

    async fn options(&self, locator: Locator) -> Result<Vec<SelectOption>> {
        let element = self.require(locator).await?;
        let mut options = Vec::new();
        for (index, option) in element
            .find_all(By::Tag("option"))
            .await?
            .into_iter()
            .enumerate()
        {
            let text = option.text().await?.trim().to_string();
            let value = option.attr("value").await?.unwrap_or_default();
            let disabled = option.attr("disabled").await?.is_some();
            options.push(SelectOption {
                index,
                text,
                value,
                disabled,
            });
        }
        Ok(options)
    }

    async fn type_text(&self, locator: Locator, text: &str) -> Result<()> {
        let element = self.require(locator).await?;
        element.clear().await?;
        element.send_keys(text).await?;
        Ok(())
    }

    async fn wait_for(&self, locator: Locator, mode: WaitMode, timeout: Duration) -> Result<bool> {
        Ok(self.resolve(locator, mode, timeout).await?.is_some())
    }

    async fn page_source(&self) -> Result<String> {
        Ok(self.driver()?.source().await?)
    }

    async fn dispose(&mut self) -> Result<()> {
        if let Some(driver) = self.driver.take() {
            if let Err(err) = driver.quit().await {
                warn!(error = %err, "webdriver quit failed");
                return Err(err.into());
            }
            debug!("webdriver session disposed");
        }
        Ok(())
    }
}
