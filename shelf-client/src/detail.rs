//! The detail screen controller.
//!
//! Thin wrapper over [`DetailState`]: shows one book and keeps its
//! favorite flag in sync with the store broadcast, so a toggle made on any
//! other screen is reflected here without a refetch.

use shelf_core::detail::DetailState;
use shelf_core::merge::favorite_isbn_set;
use shelf_types::Book;
use std::sync::{Arc, Mutex as StdMutex, PoisonError};
use tokio::sync::watch;

/// Controller for the book detail screen.
///
/// Must be created inside a tokio runtime: it spawns the subscription to
/// the favorite broadcast.
pub struct DetailController {
    shared: Arc<DetailShared>,
}

struct DetailShared {
    state: StdMutex<DetailState>,
    state_tx: watch::Sender<DetailState>,
}

impl DetailController {
    /// Create a controller following the given favorite broadcast.
    pub fn new(mut favorites: watch::Receiver<Vec<Book>>) -> Self {
        let (state_tx, _) = watch::channel(DetailState::new());
        let shared = Arc::new(DetailShared {
            state: StdMutex::new(DetailState::new()),
            state_tx,
        });

        let weak = Arc::downgrade(&shared);
        tokio::spawn(async move {
            loop {
                let favorite_isbns = {
                    let snapshot = favorites.borrow_and_update();
                    favorite_isbn_set(&snapshot)
                };
                let Some(shared) = weak.upgrade() else {
                    break;
                };
                shared.update(|state| state.on_favorites_changed(&favorite_isbns));
                drop(shared);
                if favorites.changed().await.is_err() {
                    break;
                }
            }
        });

        Self { shared }
    }

    /// Show a book.
    pub fn show(&self, book: Book) {
        self.shared.update(|state| state.set_book(book));
    }

    /// Subscribe to the screen state.
    pub fn state(&self) -> watch::Receiver<DetailState> {
        self.shared.state_tx.subscribe()
    }

    /// Snapshot of the current screen state.
    pub fn current(&self) -> DetailState {
        self.shared.state_tx.borrow().clone()
    }
}

impl DetailShared {
    fn update(&self, mutate: impl FnOnce(&mut DetailState)) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        mutate(&mut state);
        self.state_tx.send_replace(state.clone());
    }
}
