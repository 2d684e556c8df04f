//! Kakao book search backend.
//!
//! One GET per page against the `v3/search/book` endpoint, authenticated
//! with a REST API key. The wire payload is a `documents` array plus a
//! `meta` block with pagination bounds.

use super::{ApiError, SearchApi};
use async_trait::async_trait;
use serde::Deserialize;
use shelf_types::{Book, SearchPage, SearchSort};

/// HTTP search backend for the Kakao book search API.
#[derive(Debug, Clone)]
pub struct KakaoSearchApi {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl KakaoSearchApi {
    /// Create a backend for the given base URL and REST API key.
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }
}

#[async_trait]
impl SearchApi for KakaoSearchApi {
    async fn search(
        &self,
        query: &str,
        sort: SearchSort,
        page: u32,
        size: u32,
    ) -> Result<SearchPage, ApiError> {
        let url = format!("{}/v3/search/book", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("query", query.to_string()),
                ("sort", sort.as_str().to_string()),
                ("page", page.to_string()),
                ("size", size.to_string()),
            ])
            .header("Authorization", format!("KakaoAK {}", self.api_key))
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status.as_u16()));
        }

        let payload: SearchResponse = response
            .json()
            .await
            .map_err(|e| ApiError::MalformedResponse(e.to_string()))?;

        tracing::debug!(query, page, count = payload.documents.len(), "search page fetched");
        Ok(payload.into_page(page))
    }
}

/// Wire shape of a search response.
#[derive(Debug, Deserialize)]
struct SearchResponse {
    meta: Meta,
    documents: Vec<BookDocument>,
}

#[derive(Debug, Deserialize)]
struct Meta {
    total_count: u64,
    pageable_count: u64,
    is_end: bool,
}

#[derive(Debug, Deserialize)]
struct BookDocument {
    isbn: String,
    title: String,
    authors: Vec<String>,
    publisher: String,
    datetime: String,
    price: i64,
    sale_price: i64,
    thumbnail: String,
    contents: String,
}

impl SearchResponse {
    fn into_page(self, page: u32) -> SearchPage {
        SearchPage {
            books: self.documents.into_iter().map(BookDocument::into_book).collect(),
            is_last_page: self.meta.is_end,
            current_page: page,
            total_count: self.meta.total_count,
            pageable_count: self.meta.pageable_count,
        }
    }
}

impl BookDocument {
    fn into_book(self) -> Book {
        Book {
            isbn: self.isbn,
            title: self.title,
            authors: self.authors,
            publisher: self.publisher,
            publication_date: self.datetime,
            price: self.price,
            sale_price: self.sale_price,
            thumbnail: self.thumbnail,
            description: self.contents,
            is_favorite: false,
        }
    }
}
