//! Auth command - test and explain UTS authentication

use crate::cli::style::{Stylize, check, spinner_style};
use crate::cli::{GlobalOptions, credentials, load_config};
use anstream::println;
use indicatif::ProgressBar;
use skr_client::auth::UTS_API_KEY_VAR;
use skr_client::config::ClientConfig;
use skr_client::error::Result;
use skr_client::ticket::{CasTicketGranter, TicketProvider};
use skr_client::types::ServiceTarget;
use std::time::Duration;

/// Obtain a credential and exchange it for a batch service ticket
pub async fn run_auth_test(global: &GlobalOptions<'_>) -> Result<()> {
    let config = load_config(global)?;
    let provider = credentials(&config, global)?;
    let credential = provider.obtain()?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(spinner_style());
    spinner.set_message("Requesting a service ticket from UTS...");
    spinner.enable_steady_tick(Duration::from_millis(80));

    let service_url = config.service_url(ServiceTarget::BatchValidation);
    let tickets = TicketProvider::new(
        Box::new(CasTicketGranter::new(&config)?),
        credential,
        service_url,
        config.ticket_timeout(),
    );
    let result = tickets.acquire().await;
    spinner.finish_and_clear();
    let ticket = result?;

    println!("{} Service ticket issued", check());
    println!("  {} {:?}", "Credential source:".muted(), provider.source());
    println!("  {} {}", "Service:".muted(), service_url.accent());
    println!(
        "  {} {}",
        "Issued at:".muted(),
        ticket.issued_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    Ok(())
}

/// Print setup instructions
pub fn run_auth_setup() {
    println!("{}", "UTS Authentication Setup".emphasis());
    println!();
    println!("{}", "Step 1: Get a UTS API key".muted());
    println!("  Sign in at {}", "https://uts.nlm.nih.gov/uts/".accent());
    println!("  Copy the API key from your profile page");
    println!();
    println!("{}", "Option 1: Environment variable (recommended)".emphasis());
    println!("  export {}=<your-api-key>", UTS_API_KEY_VAR.accent());
    println!("  export {}=env", "SKRAPI_CREDENTIALS".accent());
    println!();
    println!("{}", "Option 2: Command line".emphasis());
    println!("  skr --api-key <your-api-key> batch ...");
    println!();
    println!("{}", "Option 3: Terminal prompt".emphasis());
    println!(
        "  The default; use {} to be asked for username and password",
        "--credentials console-password".accent()
    );
    println!();
    match ClientConfig::default_path() {
        Some(path) => println!(
            "{} {}",
            "Config file:".muted(),
            path.display().to_string().accent()
        ),
        None => println!("{}", "No config directory on this system".muted()),
    }
    println!("  {}", "credentials = \"env\"".muted());
    println!("  {}", "ticket_timeout_secs = 300".muted());
}

/// Wrapper for auth commands
pub async fn run_auth(action: &str, global: &GlobalOptions<'_>) -> Result<()> {
    match action {
        "test" => run_auth_test(global).await,
        "setup" => {
            run_auth_setup();
            Ok(())
        }
        _ => {
            println!(
                "{}",
                format!("Unknown action: {action}. Use 'test' or 'setup'.").muted()
            );
            Ok(())
        }
    }
}
