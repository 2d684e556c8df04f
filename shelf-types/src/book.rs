//! The book value type.

use serde::{Deserialize, Serialize};

/// An immutable book value.
///
/// Books are identified by ISBN across the whole system: two books with the
/// same ISBN are the same logical entity regardless of other field
/// differences. Instances are created by deserializing remote search
/// responses or persisted favorite records, and are never mutated in place.
///
/// The `is_favorite` flag is a derived overlay, not authoritative state.
/// Authoritative favorite membership lives in the favorite store; any flag
/// on a `Book` obtained from search or a favorites view is a snapshot that
/// must be refreshed via the merge step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Unique identifier. Never empty.
    pub isbn: String,
    /// Book title.
    pub title: String,
    /// Authors, in the order reported by the source.
    pub authors: Vec<String>,
    /// Publisher name.
    pub publisher: String,
    /// Publication date as an ISO-8601-like string. May be malformed.
    pub publication_date: String,
    /// List price. Always >= 0.
    pub price: i64,
    /// Sale price. Zero or negative means "no sale".
    pub sale_price: i64,
    /// Cover thumbnail URL.
    pub thumbnail: String,
    /// Free-text description.
    pub description: String,
    /// Derived favorite overlay flag. See the type-level docs.
    #[serde(default)]
    pub is_favorite: bool,
}

impl Book {
    /// The price a buyer actually pays: the sale price when one is set,
    /// otherwise the list price.
    ///
    /// Always recomputed, never stored independently.
    pub fn effective_price(&self) -> i64 {
        if self.sale_price > 0 {
            self.sale_price
        } else {
            self.price
        }
    }

    /// Return a copy with the favorite overlay flag set to `favorite`.
    pub fn with_favorite(mut self, favorite: bool) -> Self {
        self.is_favorite = favorite;
        self
    }
}
