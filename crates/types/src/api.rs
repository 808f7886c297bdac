//! Request and response bodies of the go-links HTTP API.
//!
//! Every `/api/url*` response carries an `ok` flag; failures put a message
//! in `error`. `/api/config` is the one endpoint without the envelope.

use serde::{Deserialize, Serialize};

use crate::route::RawRoute;

/// Message used when the service reports a failure without one.
pub const DEFAULT_ERROR_MESSAGE: &str = "Oof. Something went sideways.";

/// Response of `GET /api/urls/`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoutesResponse {
    pub ok: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// `null` when the page is empty
    #[serde(default)]
    pub routes: Option<Vec<RawRoute>>,

    /// Cursor for the next page, empty on the last page
    #[serde(default)]
    pub next: String,
}

/// Response of `GET`, `POST` and `DELETE /api/url/{name}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RouteResponse {
    pub ok: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<RawRoute>,
}

/// Bare error envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub ok: bool,

    #[serde(default)]
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: error.into(),
        }
    }
}

/// Body of `POST /api/url/{name}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateRoute {
    pub url: String,
}

/// Response of `GET /api/config`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Host short links are served from (e.g. `go`)
    #[serde(default)]
    pub host: String,
}

/// Pick the message to surface for a failed envelope.
pub fn error_message(error: Option<String>) -> String {
    error
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| DEFAULT_ERROR_MESSAGE.to_string())
}
