//! The interactive fetch flow: form fill, CAPTCHA pause, submission,
//! rendering. One session, one browser, one document per pass.

use std::io::Write;

use anyhow::{Context, Result};
use causelist_browser::SessionDriver;
use causelist_workflow::{
    CaseType, CauseListRequest, SequencerConfig, Session, SessionVault, WorkflowError, begin,
    resume,
};
use colored::Colorize;
use tracing::warn;

use crate::cli::FetchArgs;
use crate::config::CliConfig;

type LiveSession = Session<SessionDriver>;

pub async fn run_fetch(args: FetchArgs, config: &CliConfig) -> Result<()> {
    let vault: SessionVault<LiveSession> = SessionVault::new();
    let sequencer_config = SequencerConfig::default();

    let webdriver_url = config.webdriver_url(args.webdriver_url.as_deref());
    let headless = config.headless(args.headless);
    let output = config.output_path(args.output.as_deref());

    loop {
        let request = CauseListRequest {
            state: args.state.clone(),
            district: args.district.clone(),
            complex_index: args.complex_index,
            date: args.date.clone(),
        };

        println!(
            "{} Connecting to the browser...",
            "Step 1/4:".cyan().bold()
        );
        let driver = SessionDriver::connect(&webdriver_url, headless)
            .await
            .context("could not start a webdriver session")?;

        println!(
            "{} Filling the cause list form ({} / {} / complex {} / {})...",
            "Step 2/4:".cyan().bold(),
            request.state,
            request.district,
            request.complex_index,
            request.date
        );
        let session = begin(driver, request, &sequencer_config).await?;

        if let Err(rejected) = vault.suspend(session).await {
            // A second live session would race the first over the browser.
            rejected.dispose().await.ok();
            return Err(WorkflowError::SessionAlreadyActive.into());
        }

        println!();
        println!(
            "{}",
            "Solve the CAPTCHA in the browser window, then press Enter here to continue..."
                .yellow()
                .bold()
        );
        read_line()?;

        let session = vault.resume().await?;
        let case_type = match args.case_type {
            Some(case_type) => case_type,
            None => prompt_case_type()?,
        };

        println!(
            "{} Submitting the {} cause list...",
            "Step 3/4:".cyan().bold(),
            case_type
        );
        let table = resume(session, case_type, &sequencer_config).await?;
        if table.is_sentinel() {
            println!(
                "{}",
                "No rows came back; the document will say 'No Data Found'. An invalid CAPTCHA looks the same as an empty day."
                    .yellow()
            );
        }

        println!("{} Rendering the PDF...", "Step 4/4:".cyan().bold());
        causelist_report::render_table(table.rows(), &output)
            .with_context(|| format!("could not write {}", output.display()))?;
        println!(
            "{} Cause list saved to {}",
            "Done:".green().bold(),
            output.display().to_string().bold()
        );

        if !prompt_yes_no("Run the fetch again with the same inputs? [y/N] ")? {
            break;
        }
        // Restart clears all session state.
        if let Some(stale) = vault.clear().await {
            warn!("clearing a stale suspended session");
            stale.dispose().await.ok();
        }
    }

    Ok(())
}

fn read_line() -> Result<String> {
    let mut buf = String::new();
    std::io::stdin()
        .read_line(&mut buf)
        .context("could not read from stdin")?;
    Ok(buf)
}

fn prompt_case_type() -> Result<CaseType> {
    loop {
        print!("Case type [criminal/civil]: ");
        std::io::stdout().flush()?;
        match read_line()?.parse::<CaseType>() {
            Ok(case_type) => return Ok(case_type),
            Err(err) => eprintln!("{} {err}", "Invalid:".red()),
        }
    }
}

fn prompt_yes_no(question: &str) -> Result<bool> {
    print!("{question}");
    std::io::stdout().flush()?;
    let answer = read_line()?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}
