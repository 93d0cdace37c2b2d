//! Connection pool and table management.

use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use tracing::info;

use crate::error::Result;
use crate::schema;

pub const MEMORY_URL: &str = "sqlite::memory:";

/// Main database handle.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
    url: String,
}

impl Database {
    /// Open a pool on `url`. In-memory databases are per-connection in
    /// SQLite, so they always get a single connection.
    pub async fn open(url: &str, max_connections: u32) -> Result<Self> {
        let memory = is_memory_url(url);
        let max_connections = if memory { 1 } else { max_connections.max(1) };

        let mut options = SqlitePoolOptions::new().max_connections(max_connections);
        if memory {
            // Dropping the only connection would drop the data with it
            options = options.idle_timeout(None).max_lifetime(None);
        }
        let pool = options.connect(url).await?;

        info!(url = url, max_connections, "Opened history database");
        Ok(Self { pool, url: url.to_string() })
    }

    /// Fresh, initialized in-memory database.
    pub async fn in_memory() -> Result<Self> {
        let db = Self::open(MEMORY_URL, 1).await?;
        db.initialize().await?;
        Ok(db)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create tables and indexes if they don't exist.
    pub async fn initialize(&self) -> Result<()> {
        sqlx::query(schema::CREATE_ANALYSES).execute(&self.pool).await?;
        sqlx::query(schema::CREATE_ANALYSES_INDEX).execute(&self.pool).await?;
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
        info!(url = %self.url, "Closed history database");
    }
}

fn is_memory_url(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}
