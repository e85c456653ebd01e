//! Rich terminal output formatting

use crate::check::{Evaluation, SkipReason};
use crate::models::{CheckResult, CheckStatus, StoredCertificate};
use console::{style, StyledObject};

/// Print section header
pub fn print_header(title: &str) {
    println!();
    println!("{}", style(format!("━━━ {} ━━━", title)).cyan().bold());
    println!();
}

fn styled_status(status: CheckStatus) -> StyledObject<String> {
    let text = format!("{} {}", status.icon(), status);
    match status {
        CheckStatus::Tofu => style(text).blue().bold(),
        CheckStatus::Stored => style(text).green().bold(),
        CheckStatus::Changed => style(text).red().bold(),
        CheckStatus::Error => style(text).magenta().bold(),
    }
}

/// Print the outcome of one evaluation
pub fn print_evaluation(evaluation: &Evaluation) {
    match evaluation {
        Evaluation::Checked(result) => print_result(result),
        Evaluation::Skipped(reason) => print_skipped(reason),
        Evaluation::Failed { host, error } => {
            print_result(&CheckResult::error(host.clone()));
            print_error(&error.to_string());
        }
    }
}

/// Print a check result with its changed fields
pub fn print_result(result: &CheckResult) {
    println!("{}  {}", styled_status(result.status), result.summary());

    if result.changes.is_empty() {
        return;
    }

    println!();
    for (field, change) in &result.changes {
        println!("  {}", style(field.label()).bold());
        println!("    {} {}", style("pinned:").dim(), change.stored);
        println!("    {} {}", style("got:   ").dim(), style(&change.got).yellow());
    }
    println!();
    print_warning("The pinned certificate was kept. Verify the new certificate before trusting it.");
}

fn print_skipped(reason: &SkipReason) {
    println!("{} Not checked: {}", style("–").dim(), reason);
}

/// Print all pinned hosts
pub fn print_pins(pins: &[StoredCertificate]) {
    print_header("Pinned Certificates");

    if pins.is_empty() {
        print_info("No certificates pinned yet");
        return;
    }

    let width = pins.iter().map(|p| p.host.len()).max().unwrap_or(0);
    for pin in pins {
        println!(
            "{:width$}  {}  {}",
            style(&pin.host).yellow(),
            style(pin.last_seen.format("%Y-%m-%d %H:%M:%S UTC")).dim(),
            pin.record.subject,
            width = width
        );
    }
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", style("✓").green().bold(), message);
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", style("✗").red().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", style("!").yellow().bold(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{} {}", style("ℹ").blue(), message);
}
