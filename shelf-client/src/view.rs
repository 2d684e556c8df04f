//! The favorites screen controller.
//!
//! Subscribes to the favorite store's broadcast and re-derives the
//! displayed list in full on every input change - a store update, a query
//! edit, a sort change or a price filter. All derivation logic lives in
//! `shelf-core`; this controller only owns the state and the subscription.

use shelf_core::view::FavoriteViewState;
use shelf_types::{Book, FavoriteSortKey, SortDirection};
use std::sync::{Arc, Mutex as StdMutex, PoisonError};
use tokio::sync::{mpsc, watch};

/// One-shot signals emitted by the favorites screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewSignal {
    /// The user asked to open a book's detail view.
    OpenDetail(Book),
}

/// Controller for the favorites screen.
///
/// Must be created inside a tokio runtime: it spawns the subscription to
/// the favorite broadcast.
pub struct FavoritesViewController {
    shared: Arc<ViewShared>,
}

struct ViewShared {
    state: StdMutex<FavoriteViewState>,
    state_tx: watch::Sender<FavoriteViewState>,
    signals_tx: mpsc::UnboundedSender<ViewSignal>,
    signals_rx: StdMutex<Option<mpsc::UnboundedReceiver<ViewSignal>>>,
}

impl FavoritesViewController {
    /// Create a controller following the given favorite broadcast.
    pub fn new(mut favorites: watch::Receiver<Vec<Book>>) -> Self {
        let (state_tx, _) = watch::channel(FavoriteViewState::new());
        let (signals_tx, signals_rx) = mpsc::unbounded_channel();

        let shared = Arc::new(ViewShared {
            state: StdMutex::new(FavoriteViewState::new()),
            state_tx,
            signals_tx,
            signals_rx: StdMutex::new(Some(signals_rx)),
        });

        // Seed from the current set, then follow changes for as long as
        // the controller lives.
        let weak = Arc::downgrade(&shared);
        tokio::spawn(async move {
            loop {
                let snapshot = favorites.borrow_and_update().clone();
                let Some(shared) = weak.upgrade() else {
                    break;
                };
                shared.update(|state| state.set_favorites(snapshot));
                drop(shared);
                if favorites.changed().await.is_err() {
                    break;
                }
            }
        });

        Self { shared }
    }

    /// Change the free-text filter.
    pub fn set_query(&self, query: impl Into<String>) {
        let query = query.into();
        self.shared.update(|state| state.set_query(query));
    }

    /// Change the sort key and direction.
    pub fn set_sort(&self, sort_by: FavoriteSortKey, direction: SortDirection) {
        self.shared.update(|state| state.set_sort(sort_by, direction));
    }

    /// Apply an inclusive effective-price range filter.
    pub fn set_price_filter(&self, min_price: i64, max_price: i64) {
        self.shared
            .update(|state| state.set_price_filter(min_price, max_price));
    }

    /// Remove the price filter.
    pub fn clear_price_filter(&self) {
        self.shared.update(|state| state.clear_price_filter());
    }

    /// Report that the user tapped a book; emits an open-detail signal.
    pub fn select(&self, book: Book) {
        let _ = self.shared.signals_tx.send(ViewSignal::OpenDetail(book));
    }

    /// Subscribe to the screen state.
    pub fn state(&self) -> watch::Receiver<FavoriteViewState> {
        self.shared.state_tx.subscribe()
    }

    /// Snapshot of the current screen state.
    pub fn current(&self) -> FavoriteViewState {
        self.shared.state_tx.borrow().clone()
    }

    /// Take the one-shot signal stream. Yields `Some` exactly once.
    pub fn take_signals(&self) -> Option<mpsc::UnboundedReceiver<ViewSignal>> {
        self.shared
            .signals_rx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}

impl ViewShared {
    fn update(&self, mutate: impl FnOnce(&mut FavoriteViewState)) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        mutate(&mut state);
        self.state_tx.send_replace(state.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MemoryFavorites;
    use crate::store::FavoriteStore;
    use std::time::Duration;

    fn book(isbn: &str, title: &str, price: i64, sale_price: i64) -> Book {
        Book {
            isbn: isbn.to_string(),
            title: title.to_string(),
            authors: vec![],
            publisher: String::new(),
            publication_date: String::new(),
            price,
            sale_price,
            thumbnail: String::new(),
            description: String::new(),
            is_favorite: true,
        }
    }

    async fn store_with(books: Vec<Book>) -> FavoriteStore<MemoryFavorites> {
        let repo = MemoryFavorites::new();
        repo.seed(books);
        let store = FavoriteStore::new(repo);
        store.load().await.unwrap();
        store
    }

    #[tokio::test(start_paused = true)]
    async fn follows_the_store_broadcast() {
        let store = store_with(vec![book("1", "Kotlin", 20000, 0)]).await;
        let view = FavoritesViewController::new(store.favorites());
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert_eq!(view.current().books.len(), 1);

        store.toggle(&book("2", "Android", 25000, 0)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert_eq!(view.current().books.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn filters_and_sorts_the_broadcast_set() {
        let store = store_with(vec![
            book("1", "Kotlin", 20000, 15000),
            book("2", "Android", 25000, 0),
        ])
        .await;
        let view = FavoritesViewController::new(store.favorites());
        tokio::time::sleep(Duration::from_millis(10)).await;

        view.set_price_filter(10000, 20000);
        let derived = view.current();
        assert_eq!(derived.books.len(), 1);
        assert_eq!(derived.books[0].title, "Kotlin");

        view.clear_price_filter();
        view.set_sort(FavoriteSortKey::Price, SortDirection::Descending);
        let derived = view.current();
        assert_eq!(derived.books[0].title, "Android");
    }

    #[tokio::test(start_paused = true)]
    async fn query_filter_applies_to_the_latest_set() {
        let store = store_with(vec![book("1", "Kotlin", 20000, 0)]).await;
        let view = FavoritesViewController::new(store.favorites());
        tokio::time::sleep(Duration::from_millis(10)).await;

        view.set_query("android");
        assert!(view.current().books.is_empty());

        store.toggle(&book("2", "Android", 25000, 0)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;

        let derived = view.current();
        assert_eq!(derived.books.len(), 1);
        assert_eq!(derived.books[0].title, "Android");
    }

    #[tokio::test(start_paused = true)]
    async fn selecting_a_book_signals_open_detail() {
        let store = store_with(vec![]).await;
        let view = FavoritesViewController::new(store.favorites());
        let mut signals = view.take_signals().unwrap();

        view.select(book("1", "Kotlin", 20000, 0));

        match signals.try_recv().unwrap() {
            ViewSignal::OpenDetail(selected) => assert_eq!(selected.isbn, "1"),
        }
    }
}
