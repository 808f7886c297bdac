//! Shared types for go-links clients.
//!
//! - [`Route`] - a short name and its target URL
//! - [`RoutesResponse`], [`RouteResponse`] - API envelopes
//! - [`ServiceConfig`] - service-wide settings from `/api/config`

pub mod api;
pub mod route;

pub use api::{
    DEFAULT_ERROR_MESSAGE, ErrorResponse, RouteResponse, RoutesResponse, ServiceConfig,
    UpdateRoute, error_message,
};
pub use route::{RawRoute, Route};

/// Paging limits enforced by the listing service.
pub mod defaults {
    /// Page size used when none is requested
    pub const PAGE_SIZE: u32 = 100;

    /// Largest page size the service accepts
    pub const MAX_PAGE_SIZE: u32 = 10_000;

    /// Port the service listens on by default
    pub const PORT: u16 = 8067;
}
