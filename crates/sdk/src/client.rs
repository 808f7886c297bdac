use std::time::Duration;

use golinks_stream::{Cursor, Page, PageSource, ReplayStream};
use golinks_types::{RouteResponse, RoutesResponse, UpdateRoute, error_message};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::{debug, info};
use url::Url;

use crate::{
    error::{ApiError, Result},
    types::{ClientConfig, Route, ServiceConfig},
};

/// Every route of a service, fetched page by page and replayable.
pub type RouteStream = ReplayStream<RoutePages>;

/// Client for a go-links service
///
/// Each method performs exactly one HTTP request. Nothing is cached and
/// nothing is retried; callers decide what to do with an error.
///
/// # Example
///
/// ```ignore
/// use futures::TryStreamExt;
/// use golinks_sdk::{ClientConfig, LinksClient};
///
/// let client = LinksClient::new(ClientConfig::new("http://go.example"))?;
///
/// let routes = client.all_routes();
/// let all: Vec<_> = routes.attach().try_collect().await?;
///
/// let docs = client.get_route("docs").await?;
/// ```
#[derive(Debug, Clone)]
pub struct LinksClient {
    /// Configuration
    config: ClientConfig,

    /// Endpoint, always ending in `/`
    base: Url,

    /// HTTP client, pooled across requests
    http_client: reqwest::Client,
}

impl LinksClient {
    /// Create a client for the configured endpoint
    pub fn new(config: ClientConfig) -> Result<Self> {
        let mut base = Url::parse(&config.endpoint)?;
        if base.cannot_be_a_base() {
            return Err(ApiError::InvalidEndpoint(config.endpoint.clone()));
        }
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self {
            config,
            base,
            http_client,
        })
    }

    /// Get the configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Build the listing URL for one page
    fn routes_url(&self, cursor: &Cursor, page_size: u32) -> Result<Url> {
        let mut url = self.base.join("api/urls/")?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("cursor", cursor.as_str());
            query.append_pair("limit", &page_size.to_string());
            if self.config.include_generated_names {
                query.append_pair("include-generated-names", "true");
            }
        }
        Ok(url)
    }

    /// Build the URL of a single route
    fn route_url(&self, name: &str) -> Result<Url> {
        let mut url = self.base.join("api/url/")?;
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidEndpoint(self.config.endpoint.clone()))?
            .pop_if_empty()
            .push(name);
        Ok(url)
    }

    /// Fetch one page of routes
    ///
    /// An empty `cursor` requests the first page. The returned page's `next`
    /// cursor is empty when there are no more pages; a page may be empty
    /// and still have a next cursor.
    pub async fn fetch_page(&self, cursor: &Cursor, page_size: u32) -> Result<Page<Route>> {
        let url = self.routes_url(cursor, page_size)?;
        debug!(url = %url, cursor = %cursor, limit = page_size, "Fetching routes page");

        let response = self.http_client.get(url).send().await?;
        let RoutesResponse {
            ok,
            error,
            routes,
            next,
        } = decode(response).await?;

        if !ok {
            return Err(ApiError::Service(error_message(error)));
        }

        let routes: Vec<Route> = routes
            .unwrap_or_default()
            .into_iter()
            .map(Route::from)
            .collect();

        debug!(routes = routes.len(), next = %next, "Fetched routes page");
        Ok(Page::new(routes, next))
    }

    /// Walk every route of the service
    ///
    /// Returns a fresh coordinator; pages are only requested once some
    /// attachment reads past what is buffered. Keep the returned stream for
    /// as long as the dataset is needed and attach to it as often as required.
    pub fn all_routes(&self) -> RouteStream {
        ReplayStream::new(self.pages())
    }

    /// The page source behind [`LinksClient::all_routes`]
    pub fn pages(&self) -> RoutePages {
        RoutePages {
            client: self.clone(),
            page_size: self.config.page_size,
        }
    }

    /// Get a route by name
    ///
    /// A name that does not exist yet comes back with an empty URL.
    pub async fn get_route(&self, name: &str) -> Result<Route> {
        let url = self.route_url(name)?;
        debug!(name = %name, url = %url, "Fetching route");

        let response = self.http_client.get(url).send().await?;
        let route = route_from_response(response).await?;

        Ok(route.unwrap_or_else(|| Route::unassigned(name)))
    }

    /// Point a name at a URL
    pub async fn post_route(&self, name: &str, target: &str) -> Result<Route> {
        let url = self.route_url(name)?;
        debug!(name = %name, url = %url, "Saving route");

        let response = self
            .http_client
            .post(url)
            .json(&UpdateRoute {
                url: target.to_string(),
            })
            .send()
            .await?;
        let route = route_from_response(response)
            .await?
            .unwrap_or_else(|| Route::new(name, target));

        info!(name = %route.name, url = %route.url, "Route saved");
        Ok(route)
    }

    /// Delete a route
    pub async fn delete_route(&self, name: &str) -> Result<Route> {
        let url = self.route_url(name)?;
        debug!(name = %name, url = %url, "Deleting route");

        let response = self.http_client.delete(url).send().await?;
        if !response.status().is_success() {
            return Err(ApiError::Service("Failed to delete route".to_string()));
        }

        info!(name = %name, "Route deleted");
        Ok(Route::unassigned(name))
    }

    /// Get service-wide settings
    pub async fn get_config(&self) -> Result<ServiceConfig> {
        let url = self.base.join("api/config")?;
        debug!(url = %url, "Fetching service config");

        let response = self.http_client.get(url).send().await?;
        decode(response).await
    }
}

/// Paged listing of every route, one request per page
#[derive(Debug, Clone)]
pub struct RoutePages {
    client: LinksClient,
    page_size: u32,
}

impl RoutePages {
    /// Override the page size for this walk
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.clamp(1, golinks_types::defaults::MAX_PAGE_SIZE);
        self
    }
}

impl PageSource for RoutePages {
    type Item = Route;
    type Error = ApiError;

    fn fetch_page(&self, cursor: &Cursor) -> impl Future<Output = Result<Page<Route>>> + Send {
        self.client.fetch_page(cursor, self.page_size)
    }
}

/// Decode a JSON body whatever the status; the service reports failures
/// in the body.
async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    let body = response.bytes().await?;

    serde_json::from_slice(&body).map_err(|e| ApiError::Protocol(format!("HTTP {}: {}", status, e)))
}

/// Unwrap a single-route envelope. `None` means the name is not defined.
async fn route_from_response(response: reqwest::Response) -> Result<Option<Route>> {
    if response.status() == StatusCode::NOT_FOUND {
        return Ok(None);
    }

    let RouteResponse { ok, error, route } = decode(response).await?;
    match route {
        Some(route) if ok => Ok(Some(route.into())),
        _ => Err(ApiError::Service(error_message(error))),
    }
}
