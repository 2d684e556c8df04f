//! Ordering types for search requests and the favorites view.

use serde::{Deserialize, Serialize};

/// Sort order for remote search requests.
///
/// Serialized to the wire tokens the remote API expects; the tokens are
/// passed through verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SearchSort {
    /// Best match first (the remote default).
    #[default]
    Accuracy,
    /// Most recently published first.
    Latest,
}

impl SearchSort {
    /// The query-parameter token for this sort order.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Accuracy => "accuracy",
            Self::Latest => "recency",
        }
    }
}

/// Sort key for the favorites view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FavoriteSortKey {
    /// Sort by title.
    #[default]
    Title,
    /// Sort by effective price.
    Price,
}

/// Sort direction for the favorites view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortDirection {
    /// Smallest first.
    #[default]
    Ascending,
    /// Largest first.
    Descending,
}
