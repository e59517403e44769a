use std::path::PathBuf;

use causelist_workflow::CaseType;
use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "causelist")]
#[command(version, about = "Fetch a court cause list into a formatted PDF")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the interactive cause list fetch
    Fetch(FetchArgs),

    /// Show the resolved configuration
    Config,
}

#[derive(Args)]
pub struct FetchArgs {
    /// State name, exactly as the portal labels it
    #[arg(long, default_value = "Telangana")]
    pub state: String,

    /// District name, exactly as the portal labels it
    #[arg(long, default_value = "Hyderabad")]
    pub district: String,

    /// Zero-based ordinal into the court-complex dropdown
    #[arg(long, default_value_t = 1)]
    pub complex_index: usize,

    /// Cause list date, dd-mm-yyyy (passed through unvalidated)
    #[arg(long)]
    pub date: String,

    /// criminal or civil; prompted for after the CAPTCHA when omitted
    #[arg(long)]
    pub case_type: Option<CaseType>,

    /// WebDriver endpoint (a running chromedriver)
    #[arg(long, env = "CAUSELIST_WEBDRIVER_URL")]
    pub webdriver_url: Option<String>,

    /// Run the browser headless. The CAPTCHA must be solved in the browser
    /// window, so this is only useful against a remote/debug setup.
    #[arg(long)]
    pub headless: bool,

    /// Output PDF path
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
