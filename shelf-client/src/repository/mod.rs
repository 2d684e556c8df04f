//! Favorite persistence layer.
//!
//! Provides durable storage for the favorited-book set, keyed by ISBN.
//! The [`FavoriteStore`](crate::FavoriteStore) is the only caller; screens
//! never touch the repository directly.

mod memory;
mod sqlite;

pub use memory::MemoryFavorites;
pub use sqlite::SqliteFavorites;

use async_trait::async_trait;
use shelf_types::Book;
use thiserror::Error;

/// Persistence errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The underlying database failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored record could not be decoded.
    #[error("corrupt record: {0}")]
    CorruptRecord(String),

    /// A non-database backend failed.
    #[error("storage failure: {0}")]
    Backend(String),
}

/// Trait for favorite persistence backends.
///
/// Backends hold only favorited books; a stored row IS a favorite.
#[async_trait]
pub trait FavoriteRepository: Send + Sync {
    /// Read the complete favorite set.
    ///
    /// Order is unspecified but stable within a single read.
    async fn get_all(&self) -> Result<Vec<Book>, StoreError>;

    /// Read the subset of favorites whose ISBN is in `isbns`.
    ///
    /// Lets callers annotate a page of search results without loading the
    /// whole table.
    async fn get_by_isbns(&self, isbns: &[String]) -> Result<Vec<Book>, StoreError>;

    /// Insert or replace a favorite, keyed by ISBN.
    async fn upsert(&self, book: &Book) -> Result<(), StoreError>;

    /// Delete the favorite with the given ISBN, if present.
    async fn remove(&self, isbn: &str) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<StoreError>();
    }
}
