//! Command implementations.

pub mod favorites;
pub mod search;

use anyhow::{Context, Result};
use shelf_client::{Config, FavoriteStore, KakaoSearchApi, SqliteFavorites};
use shelf_core::format::{format_publication_date, format_sale_price};
use shelf_types::Book;
use std::sync::Arc;

/// Open the configured favorites database and load it into a store.
pub async fn open_store(config: &Config) -> Result<Arc<FavoriteStore<SqliteFavorites>>> {
    let repo = SqliteFavorites::new(&config.favorites.database)
        .await
        .with_context(|| {
            format!(
                "opening favorites database {}",
                config.favorites.database.display()
            )
        })?;
    let store = Arc::new(FavoriteStore::new(repo));
    store.load().await.context("loading favorites")?;
    Ok(store)
}

/// Build the remote search backend, requiring a configured API key.
pub fn build_api(config: &Config) -> Result<KakaoSearchApi> {
    anyhow::ensure!(
        !config.api.api_key.is_empty(),
        "no API key configured; set SHELF_API_KEY or [api] api_key in the config file"
    );
    Ok(KakaoSearchApi::new(&config.api.base_url, &config.api.api_key))
}

/// Print one book as a two-line list entry.
pub fn print_book(index: usize, book: &Book) {
    let marker = if book.is_favorite { "★" } else { " " };
    println!(
        "{:>3}. {} {} — {} ({})",
        index + 1,
        marker,
        book.title,
        book.authors.join(", "),
        book.publisher
    );
    println!(
        "       {} | {} | isbn {}",
        format_sale_price(book.sale_price, book.price),
        format_publication_date(&book.publication_date),
        book.isbn
    );
}
