//! # shelf-cli
//!
//! CLI front-end for the Shelf book search client.
//!
//! ## Commands
//!
//! - `search`: Search books and print favorite-annotated results
//! - `favorites list`: Show the favorites list, filtered and sorted
//! - `favorites toggle`: Toggle favorite status for a book
//!
//! ## Example
//!
//! ```bash
//! # Search (API key from the environment)
//! SHELF_API_KEY=... shelf search "kotlin" --sort latest --pages 2
//!
//! # Favorite the second result
//! SHELF_API_KEY=... shelf favorites toggle 9788966262281 --query "kotlin"
//!
//! # Inspect favorites under 20,000
//! shelf favorites list --sort price --max-price 20000
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use shelf_client::Config;
use shelf_types::{FavoriteSortKey, SearchSort, SortDirection};
use std::path::{Path, PathBuf};

mod commands;

use commands::{favorites, search};

/// CLI front-end for the Shelf book search client.
#[derive(Parser, Debug)]
#[command(name = "shelf")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the configuration file
    #[arg(long, global = true, default_value = "shelf.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Search books and print favorite-annotated results
    Search {
        /// Query text
        query: String,

        /// Sort order
        #[arg(long, value_enum, default_value = "accuracy")]
        sort: SortArg,

        /// How many pages to load
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },

    /// Inspect and edit the favorites list
    Favorites {
        #[command(subcommand)]
        command: FavoritesCommands,
    },
}

#[derive(Subcommand, Debug)]
enum FavoritesCommands {
    /// Show the favorites list, filtered and sorted
    List {
        /// Filter by title, author or publisher
        #[arg(long)]
        query: Option<String>,

        /// Sort key
        #[arg(long, value_enum, default_value = "title")]
        sort: SortKeyArg,

        /// Sort descending instead of ascending
        #[arg(long)]
        desc: bool,

        /// Lower effective-price bound, inclusive
        #[arg(long)]
        min_price: Option<i64>,

        /// Upper effective-price bound, inclusive
        #[arg(long)]
        max_price: Option<i64>,
    },

    /// Toggle favorite status for a book
    Toggle {
        /// ISBN of the book
        isbn: String,

        /// Search query used to find the book when it is not yet a favorite
        #[arg(long)]
        query: Option<String>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum SortArg {
    /// Best match first
    Accuracy,
    /// Most recently published first
    Latest,
}

impl From<SortArg> for SearchSort {
    fn from(value: SortArg) -> Self {
        match value {
            SortArg::Accuracy => SearchSort::Accuracy,
            SortArg::Latest => SearchSort::Latest,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum SortKeyArg {
    /// Sort by title
    Title,
    /// Sort by effective price
    Price,
}

impl From<SortKeyArg> for FavoriteSortKey {
    fn from(value: SortKeyArg) -> Self {
        match value {
            SortKeyArg::Title => FavoriteSortKey::Title,
            SortKeyArg::Price => FavoriteSortKey::Price,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    match cli.command {
        Commands::Search { query, sort, pages } => {
            search::run(&config, &query, sort.into(), pages).await
        }
        Commands::Favorites { command } => match command {
            FavoritesCommands::List {
                query,
                sort,
                desc,
                min_price,
                max_price,
            } => {
                let direction = if desc {
                    SortDirection::Descending
                } else {
                    SortDirection::Ascending
                };
                favorites::list(&config, query, sort.into(), direction, min_price, max_price).await
            }
            FavoritesCommands::Toggle { isbn, query } => {
                favorites::toggle(&config, &isbn, query.as_deref()).await
            }
        },
    }
}

/// Load the config file when present, fall back to defaults otherwise,
/// and let the environment override the API key.
fn load_config(path: &Path) -> Result<Config> {
    let mut config = if path.exists() {
        Config::from_file(path).with_context(|| format!("loading {}", path.display()))?
    } else {
        Config::default()
    };

    if let Ok(key) = std::env::var("SHELF_API_KEY") {
        config.api.api_key = key;
    }

    Ok(config)
}
