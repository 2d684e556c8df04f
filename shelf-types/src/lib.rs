//! # shelf-types
//!
//! Value types for the Shelf book search client.
//!
//! This crate provides the foundational types used across all Shelf crates:
//! - [`Book`] - Immutable book value, identified by ISBN
//! - [`SearchPage`] - One page of remote search results with pagination metadata
//! - [`SearchSort`], [`FavoriteSortKey`], [`SortDirection`] - Ordering types

#![warn(missing_docs)]
#![warn(clippy::all)]

mod book;
mod page;
mod sort;

pub use book::Book;
pub use page::SearchPage;
pub use sort::{FavoriteSortKey, SearchSort, SortDirection};
