//! The `favorites` subcommands.

use super::{build_api, open_store, print_book};
use anyhow::{Context, Result};
use shelf_client::{Config, SearchApi};
use shelf_core::view::derive_view;
use shelf_types::{FavoriteSortKey, SearchSort, SortDirection};

/// Print the favorites list, filtered and sorted like the favorites screen.
pub async fn list(
    config: &Config,
    query: Option<String>,
    sort_by: FavoriteSortKey,
    direction: SortDirection,
    min_price: Option<i64>,
    max_price: Option<i64>,
) -> Result<()> {
    let store = open_store(config).await?;

    // A half-open range from the command line is completed with the
    // configured slider bounds, the way the filter dialog would.
    let (min_price, max_price) = match (min_price, max_price) {
        (None, None) => (None, None),
        (min, max) => (
            Some(min.unwrap_or(0)),
            Some(max.unwrap_or(config.view.price_ceiling)),
        ),
    };

    let books = derive_view(
        &store.current(),
        query.as_deref().unwrap_or(""),
        sort_by,
        direction,
        min_price,
        max_price,
    );

    if books.is_empty() {
        println!("no favorites match");
        return Ok(());
    }

    for (index, book) in books.iter().enumerate() {
        print_book(index, book);
    }
    println!("\n{} favorite(s)", books.len());

    Ok(())
}

/// Toggle favorite status for one book.
///
/// A book that is already a favorite is removed using its stored record.
/// Adding a new favorite needs the full book, so `--query` is required to
/// find it through the search backend first.
pub async fn toggle(config: &Config, isbn: &str, query: Option<&str>) -> Result<()> {
    let store = open_store(config).await?;

    let existing = store.current().into_iter().find(|b| b.isbn == isbn);
    let removing = existing.is_some();

    let book = match existing {
        Some(book) => book,
        None => {
            let query = query
                .context("book is not a favorite yet; pass --query to find it via search")?;
            let api = build_api(config)?;
            let page = api
                .search(query, SearchSort::Accuracy, 1, config.search.page_size)
                .await
                .context("searching for the book to favorite")?;
            page.books
                .into_iter()
                .find(|b| b.isbn == isbn)
                .with_context(|| format!("isbn {isbn} not found in results for {query:?}"))?
        }
    };

    store.toggle(&book).await.context("persisting the toggle")?;

    if removing {
        println!("removed favorite: {}", book.title);
    } else {
        println!("added favorite: {}", book.title);
    }

    Ok(())
}
