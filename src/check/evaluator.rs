//! Per-connection evaluation
//!
//! [`ConnectionEvaluator::evaluate`] walks one connection through the
//! policy gates (enabled, tab, domain mode, ignore list, security state)
//! and, if it survives them, classifies its certificate under the host's
//! lock. It never returns an error: failures become
//! [`Evaluation::Failed`], which still yields an ERROR result.

use super::classifier::{classify, resolve};
use super::host::{connection_host, recoverable_host, tab_host};
use crate::config::{CertChecksMode, SettingsHandle};
use crate::filter::is_ignored;
use crate::models::{CheckResult, ConnectionEvent, SecurityInfo, SecurityState, TabId};
use crate::store::{CertificateStore, HostLocks};
use crate::tabs::TabRegistry;
use crate::utils::EvaluationError;
use chrono::Utc;
use std::fmt;
use std::sync::Arc;

/// Why a connection was not evaluated
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Monitoring is switched off
    Disabled,
    /// The request does not belong to a tab
    NoTab,
    /// Domain mode and the connection goes to another host than the tab's
    OtherDomain { tab_host: String },
    /// Domain mode and the tab's host cannot be determined
    TabHostUnavailable,
    /// The host matches an ignore pattern
    Ignored,
    /// The connection is not secured
    NotMonitored(SecurityState),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Disabled => write!(f, "monitoring disabled"),
            SkipReason::NoTab => write!(f, "request not made in a tab"),
            SkipReason::OtherDomain { tab_host } => {
                write!(f, "request from tab with host {}", tab_host)
            }
            SkipReason::TabHostUnavailable => write!(f, "tab host unavailable"),
            SkipReason::Ignored => write!(f, "domain ignored"),
            SkipReason::NotMonitored(state) => write!(f, "security state {}", state),
        }
    }
}

/// Outcome of evaluating one connection
#[derive(Debug)]
pub enum Evaluation {
    /// The certificate was classified
    Checked(CheckResult),
    /// A policy gate excluded the connection
    Skipped(SkipReason),
    /// Evaluation failed; `host` is the best-effort host
    Failed {
        host: String,
        error: EvaluationError,
    },
}

impl Evaluation {
    /// The result to record, if any
    pub fn result(&self) -> Option<CheckResult> {
        match self {
            Evaluation::Checked(result) => Some(result.clone()),
            Evaluation::Skipped(_) => None,
            Evaluation::Failed { host, .. } => Some(CheckResult::error(host.clone())),
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Evaluation::Skipped(_))
    }
}

/// Evaluates connections against pinned certificates
#[derive(Clone)]
pub struct ConnectionEvaluator {
    settings: SettingsHandle,
    store: Arc<dyn CertificateStore>,
    tabs: Arc<dyn TabRegistry>,
    locks: Arc<HostLocks>,
}

impl ConnectionEvaluator {
    pub fn new(
        settings: SettingsHandle,
        store: Arc<dyn CertificateStore>,
        tabs: Arc<dyn TabRegistry>,
    ) -> Self {
        Self {
            settings,
            store,
            tabs,
            locks: Arc::new(HostLocks::new()),
        }
    }

    pub fn settings(&self) -> &SettingsHandle {
        &self.settings
    }

    pub fn store(&self) -> &Arc<dyn CertificateStore> {
        &self.store
    }

    /// Evaluate one connection without recording the result
    pub async fn evaluate(&self, event: &ConnectionEvent, info: &SecurityInfo) -> Evaluation {
        let settings = self.settings.snapshot();
        if !settings.enabled {
            return Evaluation::Skipped(SkipReason::Disabled);
        }

        let host = match connection_host(&event.url) {
            Ok(host) => host,
            Err(error) => {
                return Evaluation::Failed {
                    host: recoverable_host(&event.url),
                    error,
                }
            }
        };

        let tab = match event.tab_id {
            Some(tab) => tab,
            None => {
                tracing::debug!("Request to {} not made in a tab", event.url);
                return Evaluation::Skipped(SkipReason::NoTab);
            }
        };

        if settings.cert_checks == CertChecksMode::Domain {
            match self.tabs.tab_url(tab).as_deref().and_then(tab_host) {
                Some(page_host) if page_host == host => {}
                Some(page_host) => {
                    tracing::debug!(
                        "Ignoring request to {} from tab with host {} (setting is domain)",
                        host,
                        page_host
                    );
                    return Evaluation::Skipped(SkipReason::OtherDomain {
                        tab_host: page_host,
                    });
                }
                None => {
                    tracing::debug!("Ignoring request to {}: host of tab {} unknown", host, tab);
                    return Evaluation::Skipped(SkipReason::TabHostUnavailable);
                }
            }
        }

        if is_ignored(&host, &settings.ignored_domains) {
            return Evaluation::Skipped(SkipReason::Ignored);
        }

        if !info.state.is_monitored() {
            return Evaluation::Skipped(SkipReason::NotMonitored(info.state));
        }

        let _guard = self.locks.acquire(&host).await;

        let stored = match self.store.get(&host) {
            Ok(stored) => stored,
            Err(e) => {
                return Evaluation::Failed {
                    host,
                    error: e.into(),
                }
            }
        };

        let classification = classify(&info.certificates, stored, &settings.checked_fields);
        match resolve(&host, classification, self.store.as_ref(), Utc::now()) {
            Ok(result) => {
                tracing::debug!("{} {}", host, result.status);
                Evaluation::Checked(result)
            }
            Err(e) => Evaluation::Failed {
                host,
                error: e.into(),
            },
        }
    }

    /// Evaluate one connection and record its result in the owning tab
    pub async fn check_connection(&self, event: &ConnectionEvent, info: &SecurityInfo) -> Evaluation {
        let evaluation = self.evaluate(event, info).await;

        if let Evaluation::Failed { host, error } = &evaluation {
            tracing::warn!("Error during connection checking of {:?}: {}", host, error);
        }

        if let (Some(result), Some(tab)) = (evaluation.result(), event.tab_id) {
            self.record(tab, result);
        }

        evaluation
    }

    fn record(&self, tab: TabId, result: CheckResult) {
        self.tabs.append_result(tab, result);
        self.tabs.refresh_indicator(tab);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::models::certificate::fixtures;
    use crate::models::{CertField, CheckStatus};
    use crate::store::{JsonFileStore, MemoryStore};
    use crate::tabs::MemoryTabs;
    use crate::utils::StoreError;

    struct Harness {
        evaluator: ConnectionEvaluator,
        store: Arc<MemoryStore>,
        tabs: Arc<MemoryTabs>,
    }

    fn harness(settings: Settings) -> Harness {
        let store = Arc::new(MemoryStore::new());
        let tabs = Arc::new(MemoryTabs::new());
        tabs.navigate(TabId(1), "https://example.com/");
        let evaluator =
            ConnectionEvaluator::new(SettingsHandle::new(settings), store.clone(), tabs.clone());
        Harness {
            evaluator,
            store,
            tabs,
        }
    }

    fn secure() -> SecurityInfo {
        SecurityInfo::new(SecurityState::Secure, vec![fixtures::record()])
    }

    fn event(url: &str) -> ConnectionEvent {
        ConnectionEvent::new(url, Some(TabId(1)))
    }

    #[tokio::test]
    async fn test_first_connection_is_tofu() {
        let h = harness(Settings::default());
        let evaluation = h
            .evaluator
            .check_connection(&event("https://example.com/"), &secure())
            .await;

        let result = evaluation.result().unwrap();
        assert_eq!(result.status, CheckStatus::Tofu);
        assert_eq!(result.host, "example.com");
        assert!(h.store.get("example.com").unwrap().is_some());
        assert_eq!(h.tabs.results(TabId(1)), vec![result]);
        assert_eq!(h.tabs.indicator(TabId(1)), Some(CheckStatus::Tofu));
    }

    #[tokio::test]
    async fn test_disabled_skips_everything() {
        let h = harness(Settings {
            enabled: false,
            ..Settings::default()
        });
        let evaluation = h.evaluator.evaluate(&event("not a url"), &secure()).await;
        assert!(matches!(evaluation, Evaluation::Skipped(SkipReason::Disabled)));
    }

    #[tokio::test]
    async fn test_unassociated_request_is_skipped() {
        let h = harness(Settings::default());
        let event = ConnectionEvent::new("https://example.com/", None);

        let evaluation = h.evaluator.check_connection(&event, &secure()).await;

        assert!(matches!(evaluation, Evaluation::Skipped(SkipReason::NoTab)));
        assert!(h.store.list().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_domain_mode_skips_third_party() {
        let h = harness(Settings {
            cert_checks: CertChecksMode::Domain,
            ..Settings::default()
        });

        let evaluation = h
            .evaluator
            .check_connection(&event("https://cdn.example.net/lib.js"), &secure())
            .await;
        assert!(matches!(
            evaluation,
            Evaluation::Skipped(SkipReason::OtherDomain { ref tab_host }) if tab_host == "example.com"
        ));

        let evaluation = h
            .evaluator
            .check_connection(&event("https://example.com/app.js"), &secure())
            .await;
        assert!(matches!(evaluation, Evaluation::Checked(_)));
    }

    #[tokio::test]
    async fn test_domain_mode_with_unknown_tab_is_skipped() {
        let h = harness(Settings {
            cert_checks: CertChecksMode::Domain,
            ..Settings::default()
        });
        let event = ConnectionEvent::new("https://example.com/", Some(TabId(42)));

        let evaluation = h.evaluator.check_connection(&event, &secure()).await;

        assert!(matches!(
            evaluation,
            Evaluation::Skipped(SkipReason::TabHostUnavailable)
        ));
        assert!(h.tabs.results(TabId(42)).is_empty());
    }

    #[tokio::test]
    async fn test_ignored_domain() {
        let h = harness(Settings {
            ignored_domains: vec!["*.com".to_string()],
            ..Settings::default()
        });
        let evaluation = h
            .evaluator
            .evaluate(&event("https://example.com/"), &secure())
            .await;
        assert!(matches!(evaluation, Evaluation::Skipped(SkipReason::Ignored)));
    }

    #[tokio::test]
    async fn test_insecure_connection_not_monitored() {
        let h = harness(Settings::default());
        let info = SecurityInfo::new(SecurityState::Broken, vec![fixtures::record()]);

        let evaluation = h
            .evaluator
            .evaluate(&event("https://example.com/"), &info)
            .await;

        assert!(matches!(
            evaluation,
            Evaluation::Skipped(SkipReason::NotMonitored(SecurityState::Broken))
        ));
    }

    #[tokio::test]
    async fn test_weak_connection_is_monitored() {
        let h = harness(Settings::default());
        let info = SecurityInfo::new(SecurityState::Weak, vec![fixtures::record()]);

        let evaluation = h
            .evaluator
            .evaluate(&event("https://example.com/"), &info)
            .await;

        assert_eq!(evaluation.result().unwrap().status, CheckStatus::Tofu);
    }

    #[tokio::test]
    async fn test_unparseable_url_records_error() {
        let h = harness(Settings::default());
        let evaluation = h
            .evaluator
            .check_connection(&event("example.com/no-scheme"), &secure())
            .await;

        assert!(matches!(
            evaluation,
            Evaluation::Failed {
                error: EvaluationError::UrlParse { .. },
                ..
            }
        ));
        let results = h.tabs.results(TabId(1));
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].status, CheckStatus::Error);
        assert_eq!(results[0].host, "");
        assert_eq!(h.tabs.indicator(TabId(1)), Some(CheckStatus::Error));
    }

    #[tokio::test]
    async fn test_store_failure_records_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "").unwrap();
        let store = Arc::new(JsonFileStore::open(blocker.join("pins.json")).unwrap());
        let tabs = Arc::new(MemoryTabs::new());
        tabs.navigate(TabId(1), "https://example.com/");
        let evaluator = ConnectionEvaluator::new(
            SettingsHandle::new(Settings::default()),
            store.clone(),
            tabs.clone(),
        );

        let evaluation = evaluator
            .check_connection(&event("https://example.com/"), &secure())
            .await;

        assert!(matches!(
            evaluation,
            Evaluation::Failed {
                ref host,
                error: EvaluationError::Store(StoreError::WriteFailed { .. }),
            } if host == "example.com"
        ));
        assert!(store.list().unwrap().is_empty());
        let results = tabs.results(TabId(1));
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].host, "example.com");
        assert_eq!(results[0].status, CheckStatus::Error);
        assert_eq!(tabs.indicator(TabId(1)), Some(CheckStatus::Error));
    }

    #[tokio::test]
    async fn test_changed_certificate_is_reported() {
        let h = harness(Settings::default());
        h.store
            .put("example.com", &fixtures::record(), Utc::now())
            .unwrap();

        let mut observed = fixtures::record();
        observed.subject_public_key_info_digest = "new-key".to_string();
        let info = SecurityInfo::new(SecurityState::Secure, vec![observed]);

        let result = h
            .evaluator
            .check_connection(&event("https://example.com/"), &info)
            .await
            .result()
            .unwrap();

        assert_eq!(result.status, CheckStatus::Changed);
        assert_eq!(
            result.changes.keys().copied().collect::<Vec<_>>(),
            vec![CertField::SubjectPublicKeyInfoDigest]
        );
        assert_eq!(
            h.store.get("example.com").unwrap().unwrap().record,
            fixtures::record()
        );
        assert_eq!(h.tabs.indicator(TabId(1)), Some(CheckStatus::Changed));
    }
}
