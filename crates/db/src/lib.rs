//! Record store for BookList.
//!
//! Turns record schemas into tables, enforces field width and type when rows
//! are written, assigns keys, and keeps every row in SQLite.

pub mod error;
pub mod module;
pub mod record;
pub mod repository;
pub mod sqlite;
pub mod store;
pub mod validate;

pub use error::{StoreError, StoreResult};
pub use module::DbModule;
pub use record::{Persisted, Record, RecordId};
pub use repository::Repository;
pub use sqlite::SqliteStore;
pub use store::{Row, Store};
