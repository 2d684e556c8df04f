//! In-memory favorite storage for testing.
//!
//! Allows seeding records and forcing the next read or write to fail.

use super::{FavoriteRepository, StoreError};
use async_trait::async_trait;
use shelf_types::Book;
use std::sync::{Arc, Mutex};

/// In-memory favorite storage for testing.
///
/// Clones share state, so a test can keep a handle for seeding and fault
/// injection after handing the repository to a store.
#[derive(Debug, Default)]
pub struct MemoryFavorites {
    inner: Arc<Mutex<MemoryFavoritesInner>>,
}

#[derive(Debug, Default)]
struct MemoryFavoritesInner {
    books: Vec<Book>,
    fail_next_read: Option<String>,
    fail_next_write: Option<String>,
}

impl MemoryFavorites {
    /// Create an empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the stored set with `books`, flagged as favorites.
    pub fn seed(&self, books: Vec<Book>) {
        let mut inner = self.inner.lock().unwrap();
        inner.books = books.into_iter().map(|b| b.with_favorite(true)).collect();
    }

    /// Cause the next read to fail with the given message.
    pub fn fail_next_read(&self, error: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail_next_read = Some(error.to_string());
    }

    /// Cause the next write to fail with the given message.
    pub fn fail_next_write(&self, error: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail_next_write = Some(error.to_string());
    }

    /// Number of stored favorites.
    pub fn len(&self) -> usize {
        let inner = self.inner.lock().unwrap();
        inner.books.len()
    }

    /// Whether the repository is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Clone for MemoryFavorites {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[async_trait]
impl FavoriteRepository for MemoryFavorites {
    async fn get_all(&self) -> Result<Vec<Book>, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(error) = inner.fail_next_read.take() {
            return Err(StoreError::Backend(error));
        }
        Ok(inner.books.clone())
    }

    async fn get_by_isbns(&self, isbns: &[String]) -> Result<Vec<Book>, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(error) = inner.fail_next_read.take() {
            return Err(StoreError::Backend(error));
        }
        Ok(inner
            .books
            .iter()
            .filter(|b| isbns.contains(&b.isbn))
            .cloned()
            .collect())
    }

    async fn upsert(&self, book: &Book) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(error) = inner.fail_next_write.take() {
            return Err(StoreError::Backend(error));
        }
        match inner.books.iter_mut().find(|b| b.isbn == book.isbn) {
            Some(existing) => *existing = book.clone(),
            None => inner.books.push(book.clone()),
        }
        Ok(())
    }

    async fn remove(&self, isbn: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(error) = inner.fail_next_write.take() {
            return Err(StoreError::Backend(error));
        }
        inner.books.retain(|b| b.isbn != isbn);
        Ok(())
    }
}
