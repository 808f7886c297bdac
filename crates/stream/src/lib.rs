//! Replayable paginated streams
//!
//! Walks a cursor-paginated source once and lets any number of consumers
//! iterate over the result, each from its own beginning.
//!
//! # Features
//!
//! - **Single cursor walk**: pages are fetched in order, one at a time, and never twice
//! - **Replay support**: items already fetched are replayed to late consumers without I/O
//! - **Shared waits**: consumers at the live edge all wait on the same in-flight fetch
//! - **Caller-driven retry**: a failed fetch is reported to every waiter and retried on the next pull
//!
//! # Example
//!
//! ```rust,ignore
//! use futures::TryStreamExt;
//! use golinks_stream::{Cursor, Page, PageSource, ReplayStream};
//!
//! struct Numbers;
//!
//! impl PageSource for Numbers {
//!     type Item = u32;
//!     type Error = std::io::Error;
//!
//!     async fn fetch_page(&self, cursor: &Cursor) -> Result<Page<u32>, Self::Error> {
//!         Ok(match cursor.as_str() {
//!             "" => Page::new(vec![1, 2], "2"),
//!             _ => Page::new(vec![3], ""),
//!         })
//!     }
//! }
//!
//! let numbers = ReplayStream::new(Numbers);
//! let all: Vec<u32> = numbers.attach().try_collect().await?;
//! assert_eq!(all, vec![1, 2, 3]);
//! ```
//!
//! # Ordering
//!
//! A page is appended to the buffer before any waiter is released, and
//! the next page is only requested after that append. Each attachment
//! yields buffer entries in append order with no gaps or repeats.

pub mod page;
pub mod replay;

// Re-export commonly used items
pub use page::{Cursor, Page, PageSource};
pub use replay::{Attachment, FetchFailed, Phase, ReplayStream};
