//! The favorite store.
//!
//! Single source of truth for favorite membership. Every successful change
//! is broadcast to all subscribers through a `watch` channel, so the
//! search list, the favorites list and the detail screen re-derive their
//! favorite overlays from one authoritative set.

use crate::repository::{FavoriteRepository, StoreError};
use shelf_types::Book;
use std::collections::HashSet;
use std::sync::{Mutex as StdMutex, PoisonError};
use tokio::sync::{mpsc, watch, Mutex};

/// One-shot signals emitted by the store to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreSignal {
    /// A load or toggle failed against the persistence backend; show a
    /// dismissible notification.
    PersistenceFailed {
        /// Human-readable message, never empty.
        message: String,
    },
}

/// Authoritative favorite set, persisted through a [`FavoriteRepository`]
/// and broadcast to all screens.
///
/// The broadcast is level-triggered: a new subscriber observes the current
/// set immediately via [`watch::Receiver::borrow`], then follows changes.
///
/// A toggle persists FIRST and only mutates (and broadcasts) the in-memory
/// set when persistence succeeded, so a failed write never leaves the
/// screens showing a favorite that was not saved.
pub struct FavoriteStore<R> {
    repo: R,
    state: Mutex<Vec<Book>>,
    favorites_tx: watch::Sender<Vec<Book>>,
    signals_tx: mpsc::UnboundedSender<StoreSignal>,
    signals_rx: StdMutex<Option<mpsc::UnboundedReceiver<StoreSignal>>>,
}

impl<R: FavoriteRepository> FavoriteStore<R> {
    /// Create a store over the given repository. The set is empty until
    /// [`load`](Self::load) is called.
    pub fn new(repo: R) -> Self {
        let (favorites_tx, _) = watch::channel(Vec::new());
        let (signals_tx, signals_rx) = mpsc::unbounded_channel();
        Self {
            repo,
            state: Mutex::new(Vec::new()),
            favorites_tx,
            signals_tx,
            signals_rx: StdMutex::new(Some(signals_rx)),
        }
    }

    /// Read the persisted favorite set into memory and broadcast it.
    ///
    /// On failure the in-memory set is left as it was and a
    /// [`StoreSignal::PersistenceFailed`] is emitted.
    pub async fn load(&self) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        match self.repo.get_all().await {
            Ok(favorites) => {
                tracing::debug!(count = favorites.len(), "favorites loaded");
                *state = favorites;
                self.favorites_tx.send_replace(state.clone());
                Ok(())
            }
            Err(error) => {
                tracing::warn!(%error, "loading favorites failed");
                self.signal_failure(&error);
                Err(error)
            }
        }
    }

    /// Toggle favorite membership for `book`, keyed by its ISBN.
    ///
    /// Adds the book (flagged as a favorite) when absent, removes it when
    /// present. On persistence failure nothing changes in memory, a
    /// [`StoreSignal::PersistenceFailed`] is emitted and the error is
    /// returned.
    pub async fn toggle(&self, book: &Book) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        let currently_favorite = state.iter().any(|b| b.isbn == book.isbn);

        let result = if currently_favorite {
            self.repo.remove(&book.isbn).await
        } else {
            self.repo.upsert(&book.clone().with_favorite(true)).await
        };

        if let Err(error) = result {
            tracing::warn!(%error, isbn = %book.isbn, "favorite toggle failed");
            self.signal_failure(&error);
            return Err(error);
        }

        if currently_favorite {
            state.retain(|b| b.isbn != book.isbn);
        } else {
            state.push(book.clone().with_favorite(true));
        }
        self.favorites_tx.send_replace(state.clone());
        Ok(())
    }

    /// Subscribe to the favorite set.
    ///
    /// The receiver's current value is the set as of subscription;
    /// `changed()` resolves on every subsequent toggle or load.
    pub fn favorites(&self) -> watch::Receiver<Vec<Book>> {
        self.favorites_tx.subscribe()
    }

    /// Snapshot of the current favorite set.
    pub fn current(&self) -> Vec<Book> {
        self.favorites_tx.borrow().clone()
    }

    /// Which of `isbns` are currently favorited, read from the repository
    /// so a page-sized merge never loads the whole table.
    pub async fn favorite_isbns_among(
        &self,
        isbns: &[String],
    ) -> Result<HashSet<String>, StoreError> {
        let favorites = self.repo.get_by_isbns(isbns).await?;
        Ok(favorites.into_iter().map(|b| b.isbn).collect())
    }

    /// Take the one-shot signal stream. Yields `Some` exactly once.
    pub fn take_signals(&self) -> Option<mpsc::UnboundedReceiver<StoreSignal>> {
        self.signals_rx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    fn signal_failure(&self, error: &StoreError) {
        let message = error.to_string();
        let message = if message.trim().is_empty() {
            "something went wrong".to_string()
        } else {
            message
        };
        let _ = self.signals_tx.send(StoreSignal::PersistenceFailed { message });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MemoryFavorites;

    fn book(isbn: &str, title: &str) -> Book {
        Book {
            isbn: isbn.to_string(),
            title: title.to_string(),
            authors: vec![],
            publisher: String::new(),
            publication_date: String::new(),
            price: 20000,
            sale_price: 0,
            thumbnail: String::new(),
            description: String::new(),
            is_favorite: false,
        }
    }

    #[tokio::test]
    async fn load_populates_and_broadcasts() {
        let repo = MemoryFavorites::new();
        repo.seed(vec![book("111", "Kotlin")]);
        let store = FavoriteStore::new(repo);

        store.load().await.unwrap();

        let current = store.current();
        assert_eq!(current.len(), 1);
        assert!(current[0].is_favorite);
    }

    #[tokio::test]
    async fn toggle_round_trip_restores_membership() {
        let store = FavoriteStore::new(MemoryFavorites::new());
        store.load().await.unwrap();
        let subject = book("111", "Kotlin");

        store.toggle(&subject).await.unwrap();
        assert_eq!(store.current().len(), 1);
        assert!(store.current()[0].is_favorite);

        store.toggle(&subject).await.unwrap();
        assert!(store.current().is_empty());
    }

    #[tokio::test]
    async fn toggle_forces_the_favorite_flag() {
        let store = FavoriteStore::new(MemoryFavorites::new());
        // The flag on the incoming book is an overlay snapshot; membership
        // is decided by the store, not by the flag.
        let unflagged = book("111", "Kotlin");
        assert!(!unflagged.is_favorite);

        store.toggle(&unflagged).await.unwrap();
        assert!(store.current()[0].is_favorite);
    }

    #[tokio::test]
    async fn failed_persistence_changes_nothing() {
        let repo = MemoryFavorites::new();
        let store = FavoriteStore::new(repo.clone());
        store.load().await.unwrap();
        let mut signals = store.take_signals().unwrap();

        repo.fail_next_write("disk full");
        let result = store.toggle(&book("111", "Kotlin")).await;

        assert!(result.is_err());
        assert!(store.current().is_empty());
        assert!(repo.is_empty());

        let signal = signals.try_recv().unwrap();
        let StoreSignal::PersistenceFailed { message } = signal;
        assert!(message.contains("disk full"));
    }

    #[tokio::test]
    async fn late_subscribers_observe_the_current_set() {
        let store = FavoriteStore::new(MemoryFavorites::new());
        store.load().await.unwrap();
        store.toggle(&book("111", "Kotlin")).await.unwrap();

        // Subscribed after the toggle, sees it anyway.
        let rx = store.favorites();
        assert_eq!(rx.borrow().len(), 1);
    }

    #[tokio::test]
    async fn toggles_wake_subscribers() {
        let store = FavoriteStore::new(MemoryFavorites::new());
        store.load().await.unwrap();
        let mut rx = store.favorites();

        store.toggle(&book("111", "Kotlin")).await.unwrap();

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().len(), 1);
    }

    #[tokio::test]
    async fn favorite_isbns_among_reads_the_subset() {
        let repo = MemoryFavorites::new();
        repo.seed(vec![book("111", "Kotlin"), book("222", "Android")]);
        let store = FavoriteStore::new(repo);
        store.load().await.unwrap();

        let set = store
            .favorite_isbns_among(&["222".to_string(), "999".to_string()])
            .await
            .unwrap();

        assert!(set.contains("222"));
        assert!(!set.contains("111"));
        assert!(!set.contains("999"));
    }

    #[tokio::test]
    async fn signals_can_only_be_taken_once() {
        let store = FavoriteStore::new(MemoryFavorites::new());
        assert!(store.take_signals().is_some());
        assert!(store.take_signals().is_none());
    }
}
