//! # shelf-client
//!
//! Search and favorites pipelines for the Shelf book search client.
//!
//! This is the I/O layer of Shelf. It wires the pure logic from
//! `shelf-core` to the outside world:
//!
//! - **Remote search**: the [`SearchApi`] trait with an HTTP implementation
//!   ([`KakaoSearchApi`]) and a mock for tests
//! - **Persistence**: the [`FavoriteRepository`] trait with a SQLite
//!   implementation and an in-memory mock
//! - **Broadcast**: [`FavoriteStore`], the single source of truth for
//!   favorite membership, broadcasting every change to all screens
//! - **Pipelines**: [`SearchController`], [`FavoritesViewController`] and
//!   [`DetailController`], which own their screen's state and interpret the
//!   core's actions (debounce timers, fetches, signal emission)
//!
//! # Architecture
//!
//! ```text
//! UI → SearchController → SearchApi → network
//!          ↓                   ↑
//!     shelf-core          FavoriteStore ←→ FavoriteRepository → disk
//!  (pure state machine)        ↓ (watch broadcast)
//!              FavoritesViewController, DetailController
//! ```
//!
//! Each pipeline's state has a single owner behind one mutex; transitions
//! run to completion before the next event is processed, and all I/O
//! happens outside the lock in spawned tasks.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod api;
pub mod config;
pub mod detail;
pub mod repository;
pub mod search;
pub mod store;
pub mod view;

pub use api::{ApiError, KakaoSearchApi, MockSearchApi, SearchApi};
pub use config::{Config, ConfigError};
pub use detail::DetailController;
pub use repository::{FavoriteRepository, MemoryFavorites, SqliteFavorites, StoreError};
pub use search::{SearchController, SearchOptions};
pub use store::{FavoriteStore, StoreSignal};
pub use view::{FavoritesViewController, ViewSignal};
