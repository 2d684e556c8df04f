//! Remote search API abstraction.
//!
//! This module provides a pluggable search backend that abstracts the
//! remote book search endpoint (HTTP for production, mock for testing).
//!
//! # Design
//!
//! The trait is one call per page: `search()` fetches a single page of
//! results and returns it unannotated. Favorite overlays are applied
//! downstream by the pipeline, and the engine performs no retries - a
//! failed request surfaces as [`ApiError`] and the pipeline decides what
//! to do with it.
//!
//! Implementations are never called with a blank query; the pipeline
//! short-circuits blank input to [`SearchPage::empty`] without touching
//! the network.
//!
//! [`SearchPage::empty`]: shelf_types::SearchPage::empty

mod kakao;
mod mock;

pub use kakao::KakaoSearchApi;
pub use mock::{MockSearchApi, RecordedSearch};

use async_trait::async_trait;
use shelf_types::{SearchPage, SearchSort};
use thiserror::Error;

/// Remote search errors.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response.
    #[error("request failed: {0}")]
    Transport(String),

    /// The server answered with a non-success status.
    #[error("server returned status {0}")]
    Status(u16),

    /// The response body could not be decoded.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

/// Trait for fetching pages of book search results.
#[async_trait]
pub trait SearchApi: Send + Sync {
    /// Fetch one page of results for `query`.
    ///
    /// `page` is 1-based; `size` is the page size to request. The sort
    /// token is passed through to the backend verbatim.
    async fn search(
        &self,
        query: &str,
        sort: SearchSort,
        page: u32,
        size: u32,
    ) -> Result<SearchPage, ApiError>;
}
