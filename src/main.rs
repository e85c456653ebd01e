//! cert-watch - trust-on-first-use certificate pinning
//!
//! This tool provides functionality for:
//! - Checking a server certificate against the pin stored for its host
//! - Listing and removing pins
//! - Testing hosts against the ignore patterns

use cert_watch::certificate::load_records;
use cert_watch::check::{ConnectionEvaluator, ConnectionMonitor};
use cert_watch::cli::{CheckArgs, Cli, Commands};
use cert_watch::config::{load_config, Settings, SettingsHandle};
use cert_watch::filter::is_ignored;
use cert_watch::models::{CheckStatus, ConnectionEvent, SecurityInfo, TabId};
use cert_watch::output::{
    print_evaluation, print_info, print_json, print_pins, print_pins_json, print_success,
    print_warning,
};
use cert_watch::store::{CertificateStore, JsonFileStore};
use cert_watch::tabs::MemoryTabs;
use cert_watch::Result;
use clap::Parser;
use console::style;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const EXIT_ERROR: i32 = 1;
const EXIT_CHANGED: i32 = 2;

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run().await {
        Ok(0) => {}
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            std::process::exit(EXIT_ERROR);
        }
    }
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();

    if cli.no_color {
        console::set_colors_enabled(false);
    }

    let settings = load_config(cli.config.as_deref())?;
    let store_path = cli
        .store
        .clone()
        .unwrap_or_else(|| settings.store_path.clone());

    match cli.command {
        Commands::Check(ref args) => run_check(args, settings, store_path, cli.json).await,
        Commands::Hosts => {
            let store = JsonFileStore::open(&store_path)?;
            let pins = store.list()?;
            if cli.json {
                print_pins_json(&pins)?;
            } else {
                print_pins(&pins);
            }
            Ok(0)
        }
        Commands::Forget(ref args) => {
            let store = JsonFileStore::open(&store_path)?;
            if store.remove(&args.host)? {
                print_success(&format!("Removed pin for {}", args.host));
            } else {
                print_info(&format!("No pin stored for {}", args.host));
            }
            Ok(0)
        }
        Commands::Ignored(ref args) => {
            if is_ignored(&args.host, &settings.ignored_domains) {
                print_success(&format!("{} is ignored", args.host));
            } else {
                print_info(&format!("{} is monitored", args.host));
            }
            Ok(0)
        }
    }
}

async fn run_check(
    args: &CheckArgs,
    settings: Settings,
    store_path: PathBuf,
    json: bool,
) -> Result<i32> {
    let certificates = load_records(&args.cert)?;
    if certificates.len() != 1 {
        tracing::warn!(
            "{} holds {} certificates, the check expects exactly one",
            args.cert.display(),
            certificates.len()
        );
    }

    let store = Arc::new(JsonFileStore::open(&store_path)?);
    let tabs = Arc::new(MemoryTabs::new());
    let tab = TabId(1);
    tabs.navigate(tab, args.tab_url.as_deref().unwrap_or(&args.url));

    let evaluator = ConnectionEvaluator::new(SettingsHandle::new(settings), store, tabs);
    let monitor = ConnectionMonitor::new(evaluator);

    let event = ConnectionEvent::new(args.url.clone(), Some(tab));
    let info = SecurityInfo::new(args.state.into(), certificates);

    let evaluation = match monitor.on_connection(event, async { info }).await {
        Some(handle) => ConnectionMonitor::join(handle).await,
        None => return Ok(0),
    };

    if json {
        print_json(&evaluation)?;
    } else {
        print_evaluation(&evaluation);
        if evaluation.is_skipped() {
            print_warning("No certificate was pinned or compared");
        }
    }

    Ok(match evaluation.result().map(|r| r.status) {
        Some(CheckStatus::Changed) => EXIT_CHANGED,
        Some(CheckStatus::Error) => EXIT_ERROR,
        _ => 0,
    })
}
