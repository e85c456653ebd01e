//! Monitoring policy settings
//!
//! Defines which certificate fields are pinned, which hosts are exempt,
//! and which connections of a tab are checked.

use crate::models::CertField;
use crate::utils::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// Which connections of a tab are evaluated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CertChecksMode {
    /// Every secured connection, including sub-resources
    #[default]
    All,
    /// Only connections to the host shown in the tab
    Domain,
}

fn default_enabled() -> bool {
    true
}

fn default_checked_fields() -> Vec<CertField> {
    CertField::ALL.to_vec()
}

fn default_store_path() -> PathBuf {
    PathBuf::from("cert-watch-store.json")
}

/// Application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_checked_fields")]
    pub checked_fields: Vec<CertField>,
    #[serde(default)]
    pub ignored_domains: Vec<String>,
    #[serde(default)]
    pub cert_checks: CertChecksMode,
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enabled: true,
            checked_fields: default_checked_fields(),
            ignored_domains: Vec::new(),
            cert_checks: CertChecksMode::All,
            store_path: default_store_path(),
        }
    }
}

impl Settings {
    /// Load settings from the default config file
    pub fn load_default() -> Result<Self, ConfigError> {
        let config_path = Path::new("config/default.toml");
        if config_path.exists() {
            Self::load_from_file(config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load settings from a specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        Self::from_toml(&content)
    }

    /// Parse settings from TOML text
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let settings: Settings = toml::from_str(content).map_err(|e| ConfigError::ParseError {
            message: e.to_string(),
        })?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let unique: BTreeSet<CertField> = self.checked_fields.iter().copied().collect();
        if unique.len() != self.checked_fields.len() {
            return Err(ConfigError::InvalidValue {
                key: "checked_fields".to_string(),
                message: "fields must not repeat".to_string(),
            });
        }
        Ok(())
    }
}

/// Shared, replaceable settings
///
/// Readers take a snapshot so one evaluation always sees a single
/// consistent policy even if the settings are replaced concurrently.
#[derive(Debug, Clone, Default)]
pub struct SettingsHandle {
    inner: Arc<RwLock<Arc<Settings>>>,
}

impl SettingsHandle {
    pub fn new(settings: Settings) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(settings))),
        }
    }

    /// Current settings
    pub fn snapshot(&self) -> Arc<Settings> {
        match self.inner.read() {
            Ok(guard) => Arc::clone(&*guard),
            Err(poisoned) => Arc::clone(&*poisoned.into_inner()),
        }
    }

    /// Replace the settings for subsequent evaluations
    pub fn replace(&self, settings: Settings) {
        let mut guard = match self.inner.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = Arc::new(settings);
    }
}
