//! Detail view state.
//!
//! The detail screen shows one book. Its favorite flag is re-derived from
//! the broadcast favorite set, like every other screen, so a toggle made
//! anywhere in the app is reflected here too.

use shelf_types::Book;
use std::collections::HashSet;

/// State of the book detail screen.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DetailState {
    /// The displayed book, if one has been selected.
    pub book: Option<Book>,
    /// Whether the displayed book is currently favorited.
    pub is_favorite: bool,
}

impl DetailState {
    /// Create an empty detail state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Show a book, seeding the favorite flag from its overlay.
    pub fn set_book(&mut self, book: Book) {
        self.is_favorite = book.is_favorite;
        self.book = Some(book);
    }

    /// Re-derive the favorite flag from the current favorite ISBN set.
    pub fn on_favorites_changed(&mut self, favorite_isbns: &HashSet<String>) {
        let Some(book) = &self.book else {
            return;
        };
        self.is_favorite = favorite_isbns.contains(&book.isbn);
    }
}
