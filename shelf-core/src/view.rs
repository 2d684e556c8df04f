//! Favorites view derivation.
//!
//! The favorites screen filters and sorts the unfiltered favorite set by a
//! free-text query, an inclusive effective-price range, and a sort
//! key/direction. The displayed list is always re-derived in full from the
//! original set plus the current view parameters - never patched
//! incrementally - so it cannot drift out of sync with its inputs.

use shelf_types::{Book, FavoriteSortKey, SortDirection};

/// State of the favorites screen.
///
/// `books` is the derived list; every mutator re-derives it from
/// `original` and the current parameters.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FavoriteViewState {
    /// The unfiltered favorite set, as broadcast by the favorite store.
    pub original: Vec<Book>,
    /// Free-text filter. Blank matches everything.
    pub query: String,
    /// Sort key.
    pub sort_by: FavoriteSortKey,
    /// Sort direction.
    pub direction: SortDirection,
    /// Lower bound of the effective-price filter, inclusive.
    pub min_price: Option<i64>,
    /// Upper bound of the effective-price filter, inclusive.
    pub max_price: Option<i64>,
    /// The derived, displayed list.
    pub books: Vec<Book>,
}

impl FavoriteViewState {
    /// Create an empty view.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the unfiltered favorite set.
    pub fn set_favorites(&mut self, favorites: Vec<Book>) {
        self.original = favorites;
        self.refresh();
    }

    /// Change the free-text filter.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.refresh();
    }

    /// Change the sort key and direction.
    pub fn set_sort(&mut self, sort_by: FavoriteSortKey, direction: SortDirection) {
        self.sort_by = sort_by;
        self.direction = direction;
        self.refresh();
    }

    /// Apply an inclusive effective-price range filter.
    pub fn set_price_filter(&mut self, min_price: i64, max_price: i64) {
        self.min_price = Some(min_price);
        self.max_price = Some(max_price);
        self.refresh();
    }

    /// Remove the price filter.
    pub fn clear_price_filter(&mut self) {
        self.min_price = None;
        self.max_price = None;
        self.refresh();
    }

    fn refresh(&mut self) {
        self.books = derive_view(
            &self.original,
            &self.query,
            self.sort_by,
            self.direction,
            self.min_price,
            self.max_price,
        );
    }
}

/// Derive the displayed favorites list from the unfiltered set and the
/// current view parameters.
///
/// Filters by case-insensitive substring match of `query` against title,
/// any author, or publisher (blank matches all), then by effective price
/// within `[min_price, max_price]` inclusive (a no-op unless both bounds
/// are set), then sorts. The sort is stable: ties preserve the prior
/// relative order.
pub fn derive_view(
    original: &[Book],
    query: &str,
    sort_by: FavoriteSortKey,
    direction: SortDirection,
    min_price: Option<i64>,
    max_price: Option<i64>,
) -> Vec<Book> {
    let mut books: Vec<Book> = original
        .iter()
        .filter(|book| matches_query(book, query))
        .filter(|book| matches_price(book, min_price, max_price))
        .cloned()
        .collect();

    books.sort_by(|a, b| {
        let ordering = match sort_by {
            FavoriteSortKey::Title => a.title.cmp(&b.title),
            FavoriteSortKey::Price => a.effective_price().cmp(&b.effective_price()),
        };
        match direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });

    books
}

fn matches_query(book: &Book, query: &str) -> bool {
    if query.trim().is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    book.title.to_lowercase().contains(&needle)
        || book
            .authors
            .iter()
            .any(|author| author.to_lowercase().contains(&needle))
        || book.publisher.to_lowercase().contains(&needle)
}

fn matches_price(book: &Book, min_price: Option<i64>, max_price: Option<i64>) -> bool {
    let (Some(min), Some(max)) = (min_price, max_price) else {
        return true;
    };
    let price = book.effective_price();
    min <= price && price <= max
}
