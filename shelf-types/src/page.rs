//! One page of remote search results.

use crate::Book;
use serde::{Deserialize, Serialize};

/// A single page of search results, as returned by one fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchPage {
    /// Books in this page, in server order.
    pub books: Vec<Book>,
    /// Whether the server reports no further pages.
    pub is_last_page: bool,
    /// 1-based page number this page was fetched as.
    pub current_page: u32,
    /// Total matching documents reported by the server.
    pub total_count: u64,
    /// Documents the server is willing to page through.
    pub pageable_count: u64,
}

impl SearchPage {
    /// The page shown for a blank query: no books, nothing further to load.
    pub fn empty() -> Self {
        Self {
            books: Vec::new(),
            is_last_page: true,
            current_page: 1,
            total_count: 0,
            pageable_count: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_page_is_terminal() {
        let page = SearchPage::empty();
        assert!(page.books.is_empty());
        assert!(page.is_last_page);
        assert_eq!(page.current_page, 1);
        assert_eq!(page.total_count, 0);
        assert_eq!(page.pageable_count, 0);
    }
}
