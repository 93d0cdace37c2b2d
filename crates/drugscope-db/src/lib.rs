//! drugscope database layer
//!
//! Append-only history of completed analyses, kept in SQLite.
//!
//! # Example
//!
//! ```rust,no_run
//! use drugscope_db::{Database, HistoryRepository, HistoryStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::open("sqlite://drugscope.db?mode=rwc", 5).await?;
//!     db.initialize().await?;
//!
//!     let history = HistoryRepository::new(std::sync::Arc::new(db));
//!     for record in history.list().await? {
//!         println!("{} {}", record.drug_name, record.cid);
//!     }
//!     Ok(())
//! }
//! ```

pub mod database;
pub mod error;
pub mod history;
mod schema;

pub use database::Database;
pub use error::{DbError, Result};
pub use history::{HistoryRepository, HistoryStore, Stored};
