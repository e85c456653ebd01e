//! Tab registry
//!
//! Check results are collected per tab and summarised into a single
//! status indicator for that tab.

use crate::models::{CheckResult, CheckStatus, TabId};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// Tabs known to the monitor
pub trait TabRegistry: Send + Sync {
    /// URL currently shown in the tab
    fn tab_url(&self, tab: TabId) -> Option<String>;

    /// Record a check result for the tab
    fn append_result(&self, tab: TabId, result: CheckResult);

    /// Recompute the tab's indicator after its results changed
    fn refresh_indicator(&self, tab: TabId);
}

/// State tracked for one tab
#[derive(Debug, Clone, Default)]
pub struct TabState {
    pub url: Option<String>,
    pub results: Vec<CheckResult>,
    pub indicator: Option<CheckStatus>,
}

impl TabState {
    /// Most severe status among the tab's results
    pub fn worst_status(&self) -> Option<CheckStatus> {
        self.results
            .iter()
            .map(|r| r.status)
            .max_by_key(|status| status.severity())
    }
}

/// Tab registry kept in process memory
#[derive(Debug, Default)]
pub struct MemoryTabs {
    tabs: Mutex<HashMap<TabId, TabState>>,
}

impl MemoryTabs {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<TabId, TabState>> {
        match self.tabs.lock() {
            Ok(tabs) => tabs,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Show `url` in the tab, discarding the results of the previous page
    pub fn navigate(&self, tab: TabId, url: impl Into<String>) {
        let mut tabs = self.lock();
        let state = tabs.entry(tab).or_default();
        state.url = Some(url.into());
        state.results.clear();
        state.indicator = None;
    }

    /// Forget a closed tab
    pub fn close(&self, tab: TabId) {
        self.lock().remove(&tab);
    }

    /// Results recorded for the tab
    pub fn results(&self, tab: TabId) -> Vec<CheckResult> {
        self.lock()
            .get(&tab)
            .map(|state| state.results.clone())
            .unwrap_or_default()
    }

    /// Current indicator of the tab
    pub fn indicator(&self, tab: TabId) -> Option<CheckStatus> {
        self.lock().get(&tab).and_then(|state| state.indicator)
    }
}

impl TabRegistry for MemoryTabs {
    fn tab_url(&self, tab: TabId) -> Option<String> {
        self.lock().get(&tab).and_then(|state| state.url.clone())
    }

    fn append_result(&self, tab: TabId, result: CheckResult) {
        self.lock().entry(tab).or_default().results.push(result);
    }

    fn refresh_indicator(&self, tab: TabId) {
        if let Some(state) = self.lock().get_mut(&tab) {
            state.indicator = state.worst_status();
            tracing::debug!("Tab {} indicator: {:?}", tab, state.indicator);
        }
    }
}
