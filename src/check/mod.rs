//! Certificate pinning checks
//!
//! This module provides:
//! - Field-by-field comparison of an observed certificate with its pin
//! - Classification into TOFU / STORED / CHANGED / ERROR with the matching
//!   store update
//! - Per-connection evaluation under the monitoring policy
//! - Two-phase dispatch of connection events onto the runtime

pub mod classifier;
pub mod comparator;
pub mod evaluator;
pub mod host;
pub mod monitor;

pub use classifier::{classify, resolve, Classification};
pub use comparator::{compare_certificates, Comparison};
pub use evaluator::{ConnectionEvaluator, Evaluation, SkipReason};
pub use host::{connection_host, tab_host};
pub use monitor::ConnectionMonitor;
