//! SQLite favorite storage backend.

use super::{FavoriteRepository, StoreError};
use async_trait::async_trait;
use shelf_types::Book;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use std::path::Path;
use std::str::FromStr;

/// SQLite-backed favorite storage.
///
/// Uses WAL mode for concurrent reads/writes. Rows in the `favorites`
/// table are the favorite set; there is no membership flag to keep in
/// sync. Author lists are stored as a JSON array string.
#[derive(Clone)]
pub struct SqliteFavorites {
    pool: SqlitePool,
}

impl SqliteFavorites {
    /// Open (or create) a favorites database at the given path.
    pub async fn new(path: &Path) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(path.to_str().unwrap_or("shelf.db"))
            .map_err(StoreError::Database)?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
            .busy_timeout(std::time::Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await
            .map_err(StoreError::Database)?;

        let storage = Self { pool };
        storage.run_migrations().await?;
        Ok(storage)
    }

    /// Create an in-memory favorites database (for testing).
    pub async fn in_memory() -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(":memory:").map_err(StoreError::Database)?;

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(StoreError::Database)?;

        let storage = Self { pool };
        storage.run_migrations().await?;
        Ok(storage)
    }

    async fn run_migrations(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS favorites (
                isbn TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                authors TEXT NOT NULL,
                publisher TEXT NOT NULL,
                publication_date TEXT NOT NULL,
                price INTEGER NOT NULL,
                sale_price INTEGER NOT NULL,
                thumbnail TEXT NOT NULL,
                description TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(StoreError::Database)?;

        Ok(())
    }
}

#[async_trait]
impl FavoriteRepository for SqliteFavorites {
    async fn get_all(&self) -> Result<Vec<Book>, StoreError> {
        let rows = sqlx::query(
            "SELECT isbn, title, authors, publisher, publication_date, \
             price, sale_price, thumbnail, description \
             FROM favorites ORDER BY rowid",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(StoreError::Database)?;

        rows.iter().map(row_to_book).collect()
    }

    async fn get_by_isbns(&self, isbns: &[String]) -> Result<Vec<Book>, StoreError> {
        if isbns.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; isbns.len()].join(", ");
        let sql = format!(
            "SELECT isbn, title, authors, publisher, publication_date, \
             price, sale_price, thumbnail, description \
             FROM favorites WHERE isbn IN ({placeholders}) ORDER BY rowid"
        );

        let mut query = sqlx::query(&sql);
        for isbn in isbns {
            query = query.bind(isbn);
        }

        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(StoreError::Database)?;

        rows.iter().map(row_to_book).collect()
    }

    async fn upsert(&self, book: &Book) -> Result<(), StoreError> {
        let authors = serde_json::to_string(&book.authors)
            .map_err(|e| StoreError::CorruptRecord(e.to_string()))?;

        sqlx::query(
            "INSERT OR REPLACE INTO favorites \
             (isbn, title, authors, publisher, publication_date, \
              price, sale_price, thumbnail, description) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&book.isbn)
        .bind(&book.title)
        .bind(&authors)
        .bind(&book.publisher)
        .bind(&book.publication_date)
        .bind(book.price)
        .bind(book.sale_price)
        .bind(&book.thumbnail)
        .bind(&book.description)
        .execute(&self.pool)
        .await
        .map_err(StoreError::Database)?;

        Ok(())
    }

    async fn remove(&self, isbn: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM favorites WHERE isbn = ?")
            .bind(isbn)
            .execute(&self.pool)
            .await
            .map_err(StoreError::Database)?;

        Ok(())
    }
}

fn row_to_book(row: &SqliteRow) -> Result<Book, StoreError> {
    let authors_json: String = row.try_get("authors").map_err(StoreError::Database)?;
    let authors: Vec<String> = serde_json::from_str(&authors_json)
        .map_err(|e| StoreError::CorruptRecord(format!("authors column: {e}")))?;

    Ok(Book {
        isbn: row.try_get("isbn").map_err(StoreError::Database)?,
        title: row.try_get("title").map_err(StoreError::Database)?,
        authors,
        publisher: row.try_get("publisher").map_err(StoreError::Database)?,
        publication_date: row
            .try_get("publication_date")
            .map_err(StoreError::Database)?,
        price: row.try_get("price").map_err(StoreError::Database)?,
        sale_price: row.try_get("sale_price").map_err(StoreError::Database)?,
        thumbnail: row.try_get("thumbnail").map_err(StoreError::Database)?,
        description: row.try_get("description").map_err(StoreError::Database)?,
        // Every stored row is a favorite.
        is_favorite: true,
    })
}
