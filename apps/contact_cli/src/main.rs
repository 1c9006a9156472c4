use std::{process::ExitCode, time::Duration};

use anyhow::Result;
use clap::Parser;
use client_core::{ContactForm, HttpContactTransport, SubmissionOutcome, SUCCESS_MESSAGE};
use shared::contact::{BudgetRange, FieldKey};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Send a contact request through the relay")]
struct Args {
    #[arg(long, env = "CONTACT_RELAY_URL", default_value = "http://127.0.0.1:8787")]
    relay_url: String,
    #[arg(long)]
    name: String,
    #[arg(long)]
    email: String,
    #[arg(long, default_value = "")]
    company: String,
    /// One of the budget labels shown on the form; empty leaves it unselected.
    #[arg(long, default_value = "")]
    budget: String,
    #[arg(long)]
    message: String,
    /// Agree to the privacy policy.
    #[arg(long)]
    agree: bool,
    #[arg(long, default_value_t = 10)]
    timeout_secs: u64,
}

/// An empty budget means "not selected"; anything else must be one of the form's labels.
fn check_budget(raw: &str) -> Result<Option<BudgetRange>, String> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    BudgetRange::from_label(raw).map(Some).ok_or_else(|| {
        let labels: Vec<_> = BudgetRange::ALL.iter().map(|range| range.label()).collect();
        format!("unknown budget '{raw}', expected one of: {}", labels.join(", "))
    })
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();
    let args = Args::parse();

    if let Err(problem) = check_budget(&args.budget) {
        eprintln!("{problem}; nothing was sent");
        return Ok(ExitCode::from(2));
    }

    let transport =
        HttpContactTransport::new(&args.relay_url, Duration::from_secs(args.timeout_secs))?;
    let form = ContactForm::new(transport);
    form.update_field(FieldKey::Name, args.name);
    form.update_field(FieldKey::Email, args.email);
    form.update_field(FieldKey::Company, args.company);
    form.update_field(FieldKey::Budget, args.budget);
    form.update_field(FieldKey::Message, args.message);
    form.update_field(FieldKey::Privacy, args.agree);

    form.submit().await;

    match form.outcome() {
        SubmissionOutcome::Succeeded => {
            println!("{SUCCESS_MESSAGE}");
            Ok(ExitCode::SUCCESS)
        }
        SubmissionOutcome::Failed { message, .. } => {
            eprintln!("{message}");
            Ok(ExitCode::FAILURE)
        }
        other => {
            eprintln!("unexpected form state: {other:?}");
            Ok(ExitCode::FAILURE)
        }
    }
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
