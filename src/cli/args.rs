//! CLI argument definitions using clap

use crate::models::SecurityState;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cert-watch")]
#[command(version)]
#[command(about = "Trust-on-first-use certificate pinning", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Settings file (TOML)
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Certificate store file, overrides the configured path
    #[arg(long, value_name = "FILE", global = true)]
    pub store: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check a connection's certificate against its pin
    Check(CheckArgs),

    /// List pinned hosts
    Hosts,

    /// Remove the pin of a host
    Forget(ForgetArgs),

    /// Test whether a host is exempt from pinning
    Ignored(IgnoredArgs),
}

/// Security state given on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StateArg {
    Secure,
    Weak,
    Broken,
    Insecure,
}

impl From<StateArg> for SecurityState {
    fn from(state: StateArg) -> Self {
        match state {
            StateArg::Secure => SecurityState::Secure,
            StateArg::Weak => SecurityState::Weak,
            StateArg::Broken => SecurityState::Broken,
            StateArg::Insecure => SecurityState::Insecure,
        }
    }
}

#[derive(Args)]
pub struct CheckArgs {
    /// URL of the connection, e.g. https://example.com/
    #[arg(required = true)]
    pub url: String,

    /// Certificate presented by the server (PEM or DER)
    #[arg(required = true, value_name = "CERT_FILE")]
    pub cert: PathBuf,

    /// Security state of the connection
    #[arg(long, value_enum, default_value = "secure")]
    pub state: StateArg,

    /// URL shown in the requesting tab, defaults to the connection URL
    #[arg(long, value_name = "URL")]
    pub tab_url: Option<String>,
}

#[derive(Args)]
pub struct ForgetArgs {
    /// Host whose pin is removed
    #[arg(required = true)]
    pub host: String,
}

#[derive(Args)]
pub struct IgnoredArgs {
    /// Host to test against the ignore patterns
    #[arg(required = true)]
    pub host: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_check() {
        let cli = Cli::try_parse_from([
            "cert-watch",
            "--json",
            "check",
            "https://example.com/",
            "cert.pem",
            "--state",
            "weak",
        ])
        .unwrap();

        assert!(cli.json);
        match cli.command {
            Commands::Check(args) => {
                assert_eq!(args.url, "https://example.com/");
                assert_eq!(args.state, StateArg::Weak);
                assert!(args.tab_url.is_none());
            }
            _ => panic!("expected check command"),
        }
    }
}
