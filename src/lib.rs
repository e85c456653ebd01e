//! cert-watch library
//!
//! Trust-on-first-use certificate pinning for TLS connections:
//! - The first certificate seen for a host is pinned
//! - Later certificates are compared field by field with the pin
//! - Changes in checked fields are reported, other drift is adopted
//! - Hosts can be exempted with wildcard patterns
//!
//! # Usage
//!
//! ```rust,ignore
//! use cert_watch::check::ConnectionEvaluator;
//! use cert_watch::config::{Settings, SettingsHandle};
//! use cert_watch::models::{ConnectionEvent, SecurityInfo, SecurityState, TabId};
//! use cert_watch::store::MemoryStore;
//! use cert_watch::tabs::MemoryTabs;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let evaluator = ConnectionEvaluator::new(
//!         SettingsHandle::new(Settings::default()),
//!         Arc::new(MemoryStore::new()),
//!         Arc::new(MemoryTabs::new()),
//!     );
//!     let event = ConnectionEvent::new("https://example.com/", Some(TabId(1)));
//!     let info = SecurityInfo::new(SecurityState::Secure, certificates);
//!     let evaluation = evaluator.check_connection(&event, &info).await;
//! }
//! ```

pub mod certificate;
pub mod check;
pub mod cli;
pub mod config;
pub mod filter;
pub mod models;
pub mod output;
pub mod store;
pub mod tabs;
pub mod utils;

// Re-export commonly used types
pub use check::{ConnectionEvaluator, ConnectionMonitor, Evaluation, SkipReason};
pub use cli::Cli;
pub use config::{Settings, SettingsHandle};
pub use models::{CertField, CertificateRecord, CheckResult, CheckStatus};
pub use utils::{Result, ToolkitError};
