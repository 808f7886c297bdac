// Re-export shared types from golinks-types
pub use golinks_types::{Route, ServiceConfig, defaults};

/// Configuration for a go-links client
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Base URL of the go-links service
    pub endpoint: String,

    /// Routes requested per page when listing
    pub page_size: u32,

    /// Include generated (`:xyz`) names when listing
    pub include_generated_names: bool,

    /// Request timeout (milliseconds)
    pub timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: format!("http://localhost:{}", defaults::PORT),
            page_size: defaults::PAGE_SIZE,
            include_generated_names: false,
            timeout_ms: 30_000,
        }
    }
}

impl ClientConfig {
    /// Create a new configuration with the given endpoint
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Default::default()
        }
    }

    /// Set the page size, clamped to what the service accepts
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.clamp(1, defaults::MAX_PAGE_SIZE);
        self
    }

    /// Include generated names when listing
    pub fn with_generated_names(mut self, include: bool) -> Self {
        self.include_generated_names = include;
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }
}
