//! Replay broadcast over a paged source.
//!
//! A [`ReplayStream`] walks a [`PageSource`] forward exactly once and keeps
//! every item it has seen in an append-only buffer. Any number of
//! [`Attachment`]s can consume the walk, each from its own beginning:
//! buffered items are replayed without I/O, and attachments that reach the
//! live edge all wait on the same in-flight page fetch.

use std::{
    fmt,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};

use futures::{
    future::{BoxFuture, FutureExt, Shared},
    ready,
    stream::{FusedStream, Stream},
};
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::page::{Cursor, Page, PageSource};

/// A failed page fetch attempt.
///
/// The same failure is handed to every attachment that was waiting on the
/// attempt. The buffer is left exactly as it was before the attempt.
#[derive(Debug, thiserror::Error)]
#[error("Failed to fetch page {page} (attempt {attempt}): {error}")]
pub struct FetchFailed<E> {
    /// Zero-based index of the page that could not be fetched
    pub page: usize,
    /// Consecutive failed attempts for this page
    pub attempt: u32,
    /// Error reported by the page source
    #[source]
    pub error: Arc<E>,
}

impl<E> Clone for FetchFailed<E> {
    fn clone(&self) -> Self {
        Self {
            page: self.page,
            attempt: self.attempt,
            error: Arc::clone(&self.error),
        }
    }
}

/// Coordinator state as seen from outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No fetch outstanding, more pages remain
    Idle,

    /// One page fetch is in flight
    Draining,

    /// The last fetch attempt failed; the next pull at the live edge retries it
    Failed { attempt: u32 },

    /// A page with an empty cursor was appended; the buffer is complete
    Done,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Idle => write!(f, "idle"),
            Phase::Draining => write!(f, "draining"),
            Phase::Failed { attempt } => write!(f, "failed (attempt {})", attempt),
            Phase::Done => write!(f, "done"),
        }
    }
}

type Resolution<E> = Result<(), FetchFailed<E>>;
type InFlight<E> = Shared<BoxFuture<'static, Resolution<E>>>;

enum Drive<E> {
    Idle,
    Draining(InFlight<E>),
    Failed { attempt: u32 },
    Done,
}

/// Everything the coordinator owns, guarded by one lock.
struct Log<T, E> {
    /// Append-only; never shrinks or reorders
    buffer: Vec<T>,
    /// Cursor for the next page to fetch
    cursor: Cursor,
    drive: Drive<E>,
    pages: usize,
    fetches: usize,
    failures: u32,
}

/// One shared, replayable walk over a [`PageSource`].
///
/// Cloning the handle is cheap and shares the same walk. Create one per
/// logical dataset and drop it when the dataset is no longer needed.
///
/// # Example
///
/// ```ignore
/// use futures::TryStreamExt;
/// use golinks_stream::ReplayStream;
///
/// let routes = ReplayStream::new(source);
///
/// // Each consumer sees the whole sequence; pages are fetched once.
/// let first: Vec<_> = routes.attach().try_collect().await?;
/// let again: Vec<_> = routes.attach().try_collect().await?;
/// assert_eq!(first, again);
/// ```
pub struct ReplayStream<S: PageSource> {
    source: Arc<S>,
    log: Arc<Mutex<Log<S::Item, S::Error>>>,
}

impl<S: PageSource> Clone for ReplayStream<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            log: Arc::clone(&self.log),
        }
    }
}

impl<S: PageSource> fmt::Debug for ReplayStream<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReplayStream")
            .field("phase", &self.phase())
            .field("buffered", &self.buffered())
            .field("pages", &self.pages())
            .finish()
    }
}

impl<S: PageSource> ReplayStream<S> {
    /// Create a walk that starts at the first page.
    pub fn new(source: S) -> Self {
        Self::resume_from(source, Cursor::start())
    }

    /// Create a walk that starts at the given cursor.
    pub fn resume_from(source: S, cursor: Cursor) -> Self {
        Self {
            source: Arc::new(source),
            log: Arc::new(Mutex::new(Log {
                buffer: Vec::new(),
                cursor,
                drive: Drive::Idle,
                pages: 0,
                fetches: 0,
                failures: 0,
            })),
        }
    }

    /// Attach a new consumer.
    ///
    /// The attachment starts at the beginning of the buffer, whatever
    /// other attachments have already consumed.
    pub fn attach(&self) -> Attachment<S> {
        debug!(buffered = self.buffered(), phase = %self.phase(), "Attaching consumer");
        Attachment {
            stream: self.clone(),
            index: 0,
            waiting: None,
            finished: false,
        }
    }

    pub fn phase(&self) -> Phase {
        match self.log.lock().drive {
            Drive::Idle => Phase::Idle,
            Drive::Draining(_) => Phase::Draining,
            Drive::Failed { attempt } => Phase::Failed { attempt },
            Drive::Done => Phase::Done,
        }
    }

    /// Whether the final page has been appended.
    pub fn is_done(&self) -> bool {
        matches!(self.log.lock().drive, Drive::Done)
    }

    /// Number of items buffered so far.
    pub fn buffered(&self) -> usize {
        self.log.lock().buffer.len()
    }

    /// Number of pages successfully appended.
    pub fn pages(&self) -> usize {
        self.log.lock().pages
    }

    /// Number of fetch attempts issued, successful or not.
    pub fn fetches(&self) -> usize {
        self.log.lock().fetches
    }

    /// Copy of every item buffered so far, in order.
    pub fn snapshot(&self) -> Vec<S::Item> {
        self.log.lock().buffer.clone()
    }

    fn step(&self, index: usize) -> Step<S::Item, S::Error> {
        let mut log = self.log.lock();

        if let Some(item) = log.buffer.get(index) {
            return Step::Item(item.clone());
        }

        match &log.drive {
            Drive::Done => return Step::End,
            Drive::Draining(fetch) => return Step::Wait(fetch.clone()),
            Drive::Idle | Drive::Failed { .. } => {}
        }

        Step::Wait(self.drive(&mut log))
    }

    /// Start the fetch for the next page. Must be called with the log locked.
    fn drive(&self, log: &mut Log<S::Item, S::Error>) -> InFlight<S::Error> {
        let page = log.pages;
        let cursor = log.cursor.clone();
        let source = Arc::clone(&self.source);
        let target = Arc::downgrade(&self.log);

        log.fetches += 1;
        debug!(page, cursor = %cursor, "Fetching next page");

        let fetch = async move {
            let result = source.fetch_page(&cursor).await;
            match target.upgrade() {
                Some(log) => resolve(&*log, result),
                // Nobody is left to observe the result.
                None => Ok(()),
            }
        }
        .boxed()
        .shared();

        log.drive = Drive::Draining(fetch.clone());
        fetch
    }
}

/// Apply the outcome of the in-flight fetch.
///
/// Runs exactly once per attempt, inside the shared fetch future, so the
/// buffer is updated before any waiter observes completion.
fn resolve<T, E: fmt::Display>(
    log: &Mutex<Log<T, E>>,
    result: Result<Page<T>, E>,
) -> Resolution<E> {
    let mut log = log.lock();
    let page = log.pages;

    match result {
        Ok(Page { items, next }) => {
            let count = items.len();
            log.buffer.extend(items);
            log.pages += 1;
            log.failures = 0;

            if next.is_empty() {
                log.drive = Drive::Done;
                info!(
                    pages = log.pages,
                    items = log.buffer.len(),
                    "Paged sequence complete"
                );
            } else {
                debug!(page, items = count, next = %next, "Page appended");
                log.cursor = next;
                log.drive = Drive::Idle;
            }

            Ok(())
        }
        Err(error) => {
            log.failures += 1;
            let attempt = log.failures;
            warn!(page, attempt, error = %error, "Page fetch failed");
            log.drive = Drive::Failed { attempt };

            Err(FetchFailed {
                page,
                attempt,
                error: Arc::new(error),
            })
        }
    }
}

enum Step<T, E> {
    Item(T),
    Wait(InFlight<E>),
    End,
}

/// One consumer of a [`ReplayStream`].
///
/// Yields `Ok(item)` for every item of the sequence, in order, then ends.
/// An `Err` does not end the attachment: polling again retries the failed
/// page from the last successful cursor. Dropping an attachment never
/// cancels a fetch other attachments may be waiting on.
pub struct Attachment<S: PageSource> {
    stream: ReplayStream<S>,
    /// Index of the next buffer entry to yield
    index: usize,
    waiting: Option<InFlight<S::Error>>,
    finished: bool,
}

impl<S: PageSource> Attachment<S> {
    /// Number of items yielded so far.
    pub fn position(&self) -> usize {
        self.index
    }

    /// The coordinator this attachment reads from.
    pub fn stream(&self) -> &ReplayStream<S> {
        &self.stream
    }
}

impl<S: PageSource> Stream for Attachment<S> {
    type Item = Result<S::Item, FetchFailed<S::Error>>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        loop {
            if this.finished {
                return Poll::Ready(None);
            }

            if let Some(fetch) = this.waiting.as_mut() {
                let resolution = ready!(fetch.poll_unpin(cx));
                this.waiting = None;
                if let Err(failed) = resolution {
                    return Poll::Ready(Some(Err(failed)));
                }
            }

            match this.stream.step(this.index) {
                Step::Item(item) => {
                    this.index += 1;
                    return Poll::Ready(Some(Ok(item)));
                }
                Step::End => {
                    this.finished = true;
                    return Poll::Ready(None);
                }
                Step::Wait(fetch) => {
                    debug!(position = this.index, "Waiting at live edge");
                    this.waiting = Some(fetch);
                }
            }
        }
    }
}

impl<S: PageSource> FusedStream for Attachment<S> {
    fn is_terminated(&self) -> bool {
        self.finished
    }
}
