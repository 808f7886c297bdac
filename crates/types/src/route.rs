//! Short-link routes.
//!
//! A route maps a short name to a target URL. The listing service sends
//! routes as [`RawRoute`]s; clients work with [`Route`].
//!
//! # Example JSON
//!
//! ```json
//! {
//!   "name": "docs",
//!   "url": "https://example.com/documentation",
//!   "source_host": "go",
//!   "time": "2024-03-01T12:30:00.123456789Z"
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A route as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRoute {
    pub name: String,

    pub url: String,

    /// Host the service is reachable under, empty when not configured
    #[serde(default)]
    pub source_host: String,

    /// Creation time (RFC 3339)
    #[serde(default)]
    pub time: Option<DateTime<Utc>>,
}

/// A short name and the URL it points to.
///
/// Identity is the name. Duplicates across pages are passed through as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub name: String,

    pub url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_host: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<DateTime<Utc>>,
}

impl Route {
    /// A route with no metadata.
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            source_host: None,
            time: None,
        }
    }

    /// A name with no URL assigned yet.
    pub fn unassigned(name: impl Into<String>) -> Self {
        Self::new(name, "")
    }

    /// Whether the name currently points anywhere.
    pub fn is_assigned(&self) -> bool {
        !self.url.is_empty()
    }

    /// The short link for this route under the given service host.
    pub fn short_url(&self, host: &str) -> String {
        format!("{}/{}", host.trim_end_matches('/'), self.name)
    }
}

impl From<RawRoute> for Route {
    fn from(raw: RawRoute) -> Self {
        Self {
            name: raw.name,
            url: raw.url,
            source_host: Some(raw.source_host).filter(|host| !host.is_empty()),
            time: raw.time,
        }
    }
}
