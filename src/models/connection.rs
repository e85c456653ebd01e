//! Connection events delivered by the network layer

use super::certificate::CertificateRecord;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a browser tab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TabId(pub u64);

impl TabId {
    /// Convert a raw platform tab id, where negative values mean the
    /// request does not belong to a tab
    pub fn from_raw(raw: i64) -> Option<TabId> {
        u64::try_from(raw).ok().map(TabId)
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Security state reported for a connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecurityState {
    Secure,
    Weak,
    Broken,
    Insecure,
    #[serde(other)]
    Unknown,
}

impl SecurityState {
    /// Whether connections in this state are checked against pins
    pub fn is_monitored(&self) -> bool {
        matches!(self, SecurityState::Secure | SecurityState::Weak)
    }
}

impl fmt::Display for SecurityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SecurityState::Secure => write!(f, "secure"),
            SecurityState::Weak => write!(f, "weak"),
            SecurityState::Broken => write!(f, "broken"),
            SecurityState::Insecure => write!(f, "insecure"),
            SecurityState::Unknown => write!(f, "unknown"),
        }
    }
}

impl FromStr for SecurityState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "secure" => Ok(SecurityState::Secure),
            "weak" => Ok(SecurityState::Weak),
            "broken" => Ok(SecurityState::Broken),
            "insecure" => Ok(SecurityState::Insecure),
            "unknown" => Ok(SecurityState::Unknown),
            other => Err(format!("unknown security state '{}'", other)),
        }
    }
}

/// Security information retrieved for a connection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityInfo {
    pub state: SecurityState,
    /// Certificates presented by the server, already reduced to records
    #[serde(default)]
    pub certificates: Vec<CertificateRecord>,
}

impl SecurityInfo {
    pub fn new(state: SecurityState, certificates: Vec<CertificateRecord>) -> Self {
        Self {
            state,
            certificates,
        }
    }
}

/// A connection observed by the network layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionEvent {
    pub url: String,
    /// Owning tab, `None` for requests made outside any tab
    pub tab_id: Option<TabId>,
    /// Response served from cache, no TLS handshake took place
    #[serde(default)]
    pub from_cache: bool,
}

impl ConnectionEvent {
    pub fn new(url: impl Into<String>, tab_id: Option<TabId>) -> Self {
        Self {
            url: url.into(),
            tab_id,
            from_cache: false,
        }
    }
}
