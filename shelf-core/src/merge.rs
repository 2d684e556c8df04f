//! Favorite-status merge.
//!
//! The favorite store is the single source of truth for favorite
//! membership. Search results carry `is_favorite` only as a derived
//! overlay; this module recomputes that overlay from the authoritative
//! ISBN set.

use shelf_types::Book;
use std::collections::HashSet;

/// Overlay favorite membership onto a list of books.
///
/// Each output book is the input book with `is_favorite` overwritten to
/// whether its ISBN appears in `favorite_isbns`. Order and all other
/// fields are preserved exactly.
///
/// Pure and idempotent: `annotate_favorites(annotate_favorites(l, s), s)`
/// equals `annotate_favorites(l, s)`.
pub fn annotate_favorites(books: Vec<Book>, favorite_isbns: &HashSet<String>) -> Vec<Book> {
    books
        .into_iter()
        .map(|book| {
            let favorite = favorite_isbns.contains(&book.isbn);
            book.with_favorite(favorite)
        })
        .collect()
}

/// Collect the ISBN set of a favorites list.
pub fn favorite_isbn_set(favorites: &[Book]) -> HashSet<String> {
    favorites.iter().map(|book| book.isbn.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(isbn: &str, favorite: bool) -> Book {
        Book {
            isbn: isbn.to_string(),
            title: format!("Title {isbn}"),
            authors: vec!["Author".to_string()],
            publisher: "Publisher".to_string(),
            publication_date: "2023-01-01".to_string(),
            price: 20000,
            sale_price: 0,
            thumbnail: String::new(),
            description: String::new(),
            is_favorite: favorite,
        }
    }

    #[test]
    fn overlays_membership() {
        let favorites: HashSet<String> = ["111".to_string()].into_iter().collect();
        let merged = annotate_favorites(vec![book("111", false), book("222", true)], &favorites);

        assert!(merged[0].is_favorite);
        assert!(!merged[1].is_favorite);
    }

    #[test]
    fn preserves_order_and_other_fields() {
        let favorites: HashSet<String> = ["222".to_string()].into_iter().collect();
        let input = vec![book("111", false), book("222", false), book("333", false)];
        let titles: Vec<String> = input.iter().map(|b| b.title.clone()).collect();

        let merged = annotate_favorites(input, &favorites);

        let merged_titles: Vec<String> = merged.iter().map(|b| b.title.clone()).collect();
        assert_eq!(merged_titles, titles);
        assert_eq!(merged[1].price, 20000);
    }

    #[test]
    fn merge_is_idempotent() {
        let favorites: HashSet<String> = ["111".to_string(), "333".to_string()]
            .into_iter()
            .collect();
        let input = vec![book("111", false), book("222", true), book("333", false)];

        let once = annotate_favorites(input, &favorites);
        let twice = annotate_favorites(once.clone(), &favorites);

        assert_eq!(once, twice);
    }

    #[test]
    fn insertion_order_of_the_favorite_set_is_irrelevant() {
        let mut forward = HashSet::new();
        forward.insert("111".to_string());
        forward.insert("222".to_string());
        let mut backward = HashSet::new();
        backward.insert("222".to_string());
        backward.insert("111".to_string());

        let input = vec![book("111", false), book("222", false), book("333", true)];
        assert_eq!(
            annotate_favorites(input.clone(), &forward),
            annotate_favorites(input, &backward)
        );
    }

    #[test]
    fn empty_set_clears_every_flag() {
        let merged = annotate_favorites(vec![book("111", true), book("222", true)], &HashSet::new());
        assert!(merged.iter().all(|b| !b.is_favorite));
    }

    #[test]
    fn favorite_isbn_set_collects_ids() {
        let set = favorite_isbn_set(&[book("111", true), book("222", true)]);
        assert!(set.contains("111"));
        assert!(set.contains("222"));
        assert_eq!(set.len(), 2);
    }
}
