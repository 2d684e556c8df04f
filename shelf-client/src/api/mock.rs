//! Mock search backend for testing.
//!
//! Allows queueing pages, delaying or failing responses, and capturing
//! issued calls for verification.

use super::{ApiError, SearchApi};
use async_trait::async_trait;
use shelf_types::{SearchPage, SearchSort};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A search call captured by [`MockSearchApi`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedSearch {
    /// Query text that was searched.
    pub query: String,
    /// Requested sort order.
    pub sort: SearchSort,
    /// Requested page number.
    pub page: u32,
    /// Requested page size.
    pub size: u32,
}

/// Mock search backend for testing.
///
/// Responses are served from a queue in FIFO order; an exhausted queue
/// serves the blank page. Clones share state, so a test can keep a handle
/// for assertions after handing the mock to a pipeline.
#[derive(Debug, Default)]
pub struct MockSearchApi {
    inner: Arc<Mutex<MockSearchApiInner>>,
}

#[derive(Debug, Default)]
struct MockSearchApiInner {
    queue: VecDeque<QueuedPage>,
    calls: Vec<RecordedSearch>,
    fail_next: Option<String>,
}

#[derive(Debug)]
struct QueuedPage {
    page: SearchPage,
    delay: Option<Duration>,
}

impl MockSearchApi {
    /// Create a new mock backend with an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a page to be returned by the next unanswered `search()` call.
    pub fn queue_page(&self, page: SearchPage) {
        let mut inner = self.inner.lock().unwrap();
        inner.queue.push_back(QueuedPage { page, delay: None });
    }

    /// Queue a page whose response is held back for `delay`.
    ///
    /// Used to keep a request in flight while the test changes the query,
    /// exercising the stale-response guard.
    pub fn queue_page_delayed(&self, page: SearchPage, delay: Duration) {
        let mut inner = self.inner.lock().unwrap();
        inner.queue.push_back(QueuedPage {
            page,
            delay: Some(delay),
        });
    }

    /// Cause the next `search()` call to fail with the given message.
    pub fn fail_next_search(&self, error: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail_next = Some(error.to_string());
    }

    /// All calls issued so far, in order.
    pub fn calls(&self) -> Vec<RecordedSearch> {
        let inner = self.inner.lock().unwrap();
        inner.calls.clone()
    }

    /// Number of calls issued so far.
    pub fn call_count(&self) -> usize {
        let inner = self.inner.lock().unwrap();
        inner.calls.len()
    }

    /// The most recent call, if any.
    pub fn last_call(&self) -> Option<RecordedSearch> {
        let inner = self.inner.lock().unwrap();
        inner.calls.last().cloned()
    }

    /// Clear all state (queue, recorded calls, forced failure).
    pub fn reset(&self) {
        let mut inner = self.inner.lock().unwrap();
        *inner = MockSearchApiInner::default();
    }
}

impl Clone for MockSearchApi {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[async_trait]
impl SearchApi for MockSearchApi {
    async fn search(
        &self,
        query: &str,
        sort: SearchSort,
        page: u32,
        size: u32,
    ) -> Result<SearchPage, ApiError> {
        let outcome = {
            let mut inner = self.inner.lock().unwrap();
            inner.calls.push(RecordedSearch {
                query: query.to_string(),
                sort,
                page,
                size,
            });
            match inner.fail_next.take() {
                Some(message) => Err(message),
                None => Ok(inner.queue.pop_front()),
            }
        };

        match outcome {
            Err(message) => Err(ApiError::Transport(message)),
            Ok(Some(QueuedPage { page, delay })) => {
                if let Some(delay) = delay {
                    tokio::time::sleep(delay).await;
                }
                Ok(page)
            }
            Ok(None) => Ok(SearchPage::empty()),
        }
    }
}
