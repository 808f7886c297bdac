//! golinks SDK
//!
//! Typed client for a go-links service, the small HTTP API that maps short
//! names to URLs.
//!
//! # Overview
//!
//! - [`LinksClient`] - one method per API call
//! - [`RouteStream`] - every route of the service, fetched lazily page by
//!   page and replayable to any number of consumers
//!
//! # Quick Start
//!
//! ## Listing Routes
//!
//! ```ignore
//! use futures::StreamExt;
//! use golinks_sdk::{ClientConfig, LinksClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = LinksClient::new(ClientConfig::new("http://go.example"))?;
//!     let host = client.get_config().await?.host;
//!
//!     let routes = client.all_routes();
//!
//!     // Attachments started at any time see the same routes in the same
//!     // order; each page is requested once.
//!     let mut first = routes.attach();
//!     while let Some(route) = first.next().await {
//!         let route = route?;
//!         println!("{} -> {}", route.short_url(&host), route.url);
//!     }
//!
//!     // Replayed from the buffer, no requests
//!     let count = routes.attach().count().await;
//!     println!("{} routes", count);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Editing Routes
//!
//! ```ignore
//! let route = client.post_route("docs", "https://docs.example.com").await?;
//! let route = client.get_route("docs").await?;
//! client.delete_route("docs").await?;
//! ```
//!
//! # Errors
//!
//! A failed page shows up as one `Err` item on every attachment waiting for
//! it. Routes already read stay buffered; polling the attachment again
//! retries the same page.

pub mod client;
pub mod error;
pub mod types;

#[cfg(test)]
mod test;

// Re-export main types at crate root
pub use client::{LinksClient, RoutePages, RouteStream};
pub use error::{ApiError, Result};
pub use golinks_stream::{Attachment, Cursor, FetchFailed, Page, PageSource, Phase, ReplayStream};
pub use types::{ClientConfig, Route, ServiceConfig, defaults};
