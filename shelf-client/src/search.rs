//! The search pipeline controller.
//!
//! [`SearchController`] owns the search screen's state and interprets the
//! actions produced by the pure state machine in `shelf-core`:
//!
//! - `RestartDebounce` becomes a sleeping task that reports back when the
//!   window elapses; superseded timers are recognized by their stale
//!   generation and dropped
//! - `Fetch` becomes a network call followed by a favorite lookup, fed
//!   back as `PageLoaded` or `FetchFailed`
//! - `Emit` forwards one-shot signals to the presentation layer
//!
//! In-flight requests are never aborted when the query changes; their late
//! results are simply dropped by the generation check when they land.

use crate::api::SearchApi;
use crate::repository::FavoriteRepository;
use crate::store::FavoriteStore;
use shelf_core::merge::favorite_isbn_set;
use shelf_core::search::{SearchAction, SearchEvent, SearchSignal, SearchState};
use shelf_types::{Book, SearchSort};
use std::sync::{Arc, Mutex as StdMutex, PoisonError};
use std::time::Duration;
use tokio::sync::{mpsc, watch, Mutex};

/// Tuning knobs for the search pipeline.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// How long the query must be stable before a search is issued.
    pub debounce: Duration,
    /// Page size requested from the search backend.
    pub page_size: u32,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(500),
            page_size: 20,
        }
    }
}

/// Controller for the search screen.
///
/// Must be created inside a tokio runtime: it spawns tasks for debounce
/// windows, fetches and the favorite-broadcast subscription.
pub struct SearchController<A, R> {
    runtime: Arc<SearchRuntime<A, R>>,
}

struct SearchRuntime<A, R> {
    api: A,
    store: Arc<FavoriteStore<R>>,
    state: Mutex<SearchState>,
    state_tx: watch::Sender<SearchState>,
    signals_tx: mpsc::UnboundedSender<SearchSignal>,
    signals_rx: StdMutex<Option<mpsc::UnboundedReceiver<SearchSignal>>>,
    options: SearchOptions,
}

impl<A, R> SearchController<A, R>
where
    A: SearchApi + 'static,
    R: FavoriteRepository + 'static,
{
    /// Create a controller and subscribe it to the store's broadcast.
    pub fn new(api: A, store: Arc<FavoriteStore<R>>, options: SearchOptions) -> Self {
        let (state_tx, _) = watch::channel(SearchState::new());
        let (signals_tx, signals_rx) = mpsc::unbounded_channel();
        let mut favorites_rx = store.favorites();

        let runtime = Arc::new(SearchRuntime {
            api,
            store,
            state: Mutex::new(SearchState::new()),
            state_tx,
            signals_tx,
            signals_rx: StdMutex::new(Some(signals_rx)),
            options,
        });

        // Follow the favorite broadcast for as long as the controller
        // lives. The first pass applies the current set (level-triggered
        // subscription); later passes apply each change.
        let weak = Arc::downgrade(&runtime);
        tokio::spawn(async move {
            loop {
                let favorite_isbns = {
                    let favorites = favorites_rx.borrow_and_update();
                    favorite_isbn_set(&favorites)
                };
                let Some(runtime) = weak.upgrade() else {
                    break;
                };
                SearchRuntime::apply(&runtime, SearchEvent::FavoritesChanged { favorite_isbns })
                    .await;
                drop(runtime);
                if favorites_rx.changed().await.is_err() {
                    break;
                }
            }
        });

        Self { runtime }
    }

    /// Record a query edit; the search itself runs after the debounce
    /// window, and only if no further edit restarts it.
    pub async fn set_query(&self, query: impl Into<String>) {
        SearchRuntime::apply(&self.runtime, SearchEvent::QueryChanged(query.into())).await;
    }

    /// Change the sort order; debounced like a query edit.
    pub async fn set_sort(&self, sort: SearchSort) {
        SearchRuntime::apply(&self.runtime, SearchEvent::SortChanged(sort)).await;
    }

    /// Request the next page. A no-op while loading or on the last page.
    pub async fn load_more(&self) {
        SearchRuntime::apply(&self.runtime, SearchEvent::LoadMoreRequested).await;
    }

    /// Report that the user tapped a book; emits an open-detail signal.
    pub async fn select(&self, book: Book) {
        SearchRuntime::apply(&self.runtime, SearchEvent::BookSelected(book)).await;
    }

    /// Subscribe to the screen state.
    pub fn state(&self) -> watch::Receiver<SearchState> {
        self.runtime.state_tx.subscribe()
    }

    /// Snapshot of the current screen state.
    pub fn current(&self) -> SearchState {
        self.runtime.state_tx.borrow().clone()
    }

    /// Take the one-shot signal stream. Yields `Some` exactly once.
    pub fn take_signals(&self) -> Option<mpsc::UnboundedReceiver<SearchSignal>> {
        self.runtime
            .signals_rx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}

impl<A, R> SearchRuntime<A, R>
where
    A: SearchApi + 'static,
    R: FavoriteRepository + 'static,
{
    /// Run one transition to completion, then execute its actions.
    ///
    /// The state lock is held only for the transition itself; actions run
    /// in spawned tasks, so a slow fetch never blocks the next event.
    async fn apply(runtime: &Arc<Self>, event: SearchEvent) {
        let actions = {
            let mut state = runtime.state.lock().await;
            let (next, actions) = std::mem::take(&mut *state).on_event(event);
            *state = next;
            runtime.state_tx.send_replace(state.clone());
            actions
        };

        for action in actions {
            Self::execute(runtime, action);
        }
    }

    fn execute(runtime: &Arc<Self>, action: SearchAction) {
        match action {
            SearchAction::RestartDebounce { generation } => {
                let runtime = Arc::clone(runtime);
                tokio::spawn(async move {
                    tokio::time::sleep(runtime.options.debounce).await;
                    // If the query changed meanwhile, this generation is
                    // stale and the machine drops the event.
                    Self::apply(&runtime, SearchEvent::DebounceElapsed { generation }).await;
                });
            }
            SearchAction::Fetch {
                query,
                sort,
                page,
                generation,
            } => {
                let runtime = Arc::clone(runtime);
                tokio::spawn(async move {
                    Self::fetch(&runtime, query, sort, page, generation).await;
                });
            }
            SearchAction::Emit(signal) => {
                let _ = runtime.signals_tx.send(signal);
            }
        }
    }

    async fn fetch(runtime: &Arc<Self>, query: String, sort: SearchSort, page: u32, generation: u64) {
        let event = match runtime
            .api
            .search(&query, sort, page, runtime.options.page_size)
            .await
        {
            Ok(result) => {
                let isbns: Vec<String> = result.books.iter().map(|b| b.isbn.clone()).collect();
                match runtime.store.favorite_isbns_among(&isbns).await {
                    Ok(favorite_isbns) => SearchEvent::PageLoaded {
                        generation,
                        page: result,
                        favorite_isbns,
                    },
                    Err(error) => {
                        tracing::warn!(%error, "favorite lookup failed during merge");
                        SearchEvent::FetchFailed {
                            generation,
                            message: error.to_string(),
                        }
                    }
                }
            }
            Err(error) => {
                tracing::warn!(%error, query = %query, page, "search request failed");
                SearchEvent::FetchFailed {
                    generation,
                    message: error.to_string(),
                }
            }
        };

        Self::apply(runtime, event).await;
    }
}
