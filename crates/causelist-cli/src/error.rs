use colored::Colorize;

pub fn handle_error(err: anyhow::Error) -> ! {
    eprintln!("{} {}", "Error:".red().bold(), err);

    let msg = err.to_string().to_lowercase();

    if msg.contains("connection refused") || msg.contains("webdriver") {
        eprintln!("\n{}", "Suggestion:".yellow().bold());
        eprintln!("  Make sure chromedriver is running:");
        eprintln!("  {} chromedriver --port=9515", "$".dimmed());
    }

    if msg.contains("no enabled court option") {
        eprintln!("\n{}", "Suggestion:".yellow().bold());
        eprintln!("  The selected court complex has no court with eligible sessions.");
        eprintln!("  Try another --complex-index or another date.");
    }

    if msg.contains("no suspended session") {
        eprintln!("\n{}", "Suggestion:".yellow().bold());
        eprintln!("  The browser session was lost; restart the whole workflow:");
        eprintln!("  {} causelist fetch --date <dd-mm-yyyy>", "$".dimmed());
    }

    if msg.contains("element not found") {
        eprintln!("\n{}", "Suggestion:".yellow().bold());
        eprintln!("  The portal may be slow or its layout may have changed.");
        eprintln!("  Check the inputs match the portal's labels exactly and retry.");
    }

    std::process::exit(1);
}
