//! JSON output formatter

use crate::check::Evaluation;
use crate::models::{CheckResult, StoredCertificate};
use crate::utils::Result;
use serde::Serialize;

/// JSON-serializable evaluation outcome
#[derive(Serialize)]
pub struct JsonOutput {
    /// `checked`, `skipped` or `failed`
    pub outcome: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<CheckResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl From<&Evaluation> for JsonOutput {
    fn from(evaluation: &Evaluation) -> Self {
        match evaluation {
            Evaluation::Checked(result) => JsonOutput {
                outcome: "checked",
                result: Some(result.clone()),
                reason: None,
            },
            Evaluation::Skipped(reason) => JsonOutput {
                outcome: "skipped",
                result: None,
                reason: Some(reason.to_string()),
            },
            Evaluation::Failed { error, .. } => JsonOutput {
                outcome: "failed",
                result: evaluation.result(),
                reason: Some(error.to_string()),
            },
        }
    }
}

/// Print an evaluation as JSON to stdout
pub fn print_json(evaluation: &Evaluation) -> Result<()> {
    let json = serde_json::to_string_pretty(&JsonOutput::from(evaluation))?;
    println!("{}", json);
    Ok(())
}

/// Print pinned certificates as JSON to stdout
pub fn print_pins_json(pins: &[StoredCertificate]) -> Result<()> {
    let json = serde_json::to_string_pretty(pins)?;
    println!("{}", json);
    Ok(())
}
