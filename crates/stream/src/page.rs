//! Cursor-based pagination primitives.

use std::{fmt, sync::Arc};

use serde::{Deserialize, Serialize};

/// Opaque resume token handed out by a paged API.
///
/// The empty cursor means "start of sequence" when supplied as input and
/// "no more pages" when returned as output. Cursors are only round-tripped,
/// never parsed or compared for order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor(String);

impl Cursor {
    /// The cursor that requests the first page.
    pub fn start() -> Self {
        Self(String::new())
    }

    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// True for the start cursor (as input) or the terminal cursor (as output).
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for Cursor {
    fn from(token: String) -> Self {
        Self(token)
    }
}

impl From<&str> for Cursor {
    fn from(token: &str) -> Self {
        Self(token.to_string())
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One fetched batch of items plus the cursor to resume after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// Items in source order
    pub items: Vec<T>,
    /// Resume point for the next page; empty when this is the last page
    pub next: Cursor,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, next: impl Into<Cursor>) -> Self {
        Self {
            items,
            next: next.into(),
        }
    }

    /// Whether this page terminates the sequence.
    ///
    /// Only the cursor decides termination: a page with no items but a
    /// non-empty cursor must still be followed.
    pub fn is_last(&self) -> bool {
        self.next.is_empty()
    }
}

/// A remote listing that can be walked one page at a time.
///
/// Every call to [`PageSource::fetch_page`] is one request against the
/// source. Implementations hold no state across pages and never retry.
pub trait PageSource: Send + Sync + 'static {
    type Item: Clone + Send + Sync + 'static;
    type Error: std::error::Error + Send + Sync + 'static;

    fn fetch_page(
        &self,
        cursor: &Cursor,
    ) -> impl Future<Output = Result<Page<Self::Item>, Self::Error>> + Send;
}

impl<S: PageSource> PageSource for Arc<S> {
    type Item = S::Item;
    type Error = S::Error;

    fn fetch_page(
        &self,
        cursor: &Cursor,
    ) -> impl Future<Output = Result<Page<Self::Item>, Self::Error>> + Send {
        (**self).fetch_page(cursor)
    }
}
