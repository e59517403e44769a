mod cli;
mod config;
mod error;
mod wizard;

use clap::Parser;
use cli::{Cli, Commands};
use colored::Colorize;
use config::CliConfig;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let config = CliConfig::load();

    let result = match cli.command {
        Commands::Fetch(args) => wizard::run_fetch(args, &config).await,
        Commands::Config => {
            show_config(&config);
            Ok(())
        }
    };

    if let Err(err) = result {
        error::handle_error(err);
    }
}

fn show_config(config: &CliConfig) {
    let path = CliConfig::default_path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "<unavailable>".to_string());
    println!("{} {}", "Config file:".bold(), path.dimmed());
    println!("{} {}", "WebDriver:".bold(), config.webdriver_url(None));
    println!("{} {}", "Headless:".bold(), config.headless(false));
    println!(
        "{} {}",
        "Output:".bold(),
        config.output_path(None).display()
    );
}
