use async_trait::async_trait;
use serde_json::{Map, Value};

use booklist_kernel::RecordSchema;

use crate::error::StoreResult;
use crate::record::RecordId;

/// A stored row: the record's fields keyed by name.
pub type Row = Map<String, Value>;

/// Persistence collaborator contract.
///
/// Tables exist only after their schema has been registered. Writes are
/// validated against that schema; reads return rows exactly as written.
#[async_trait]
pub trait Store: Send + Sync {
    /// Register a record schema, creating its table.
    ///
    /// Registering an identical schema twice is a no-op.
    async fn register(&self, schema: RecordSchema) -> StoreResult<()>;

    /// Schema registered under `table`, if any
    async fn schema(&self, table: &str) -> Option<RecordSchema>;

    /// Validate and insert a row, returning the key assigned to it
    async fn insert_row(&self, table: &str, row: Row) -> StoreResult<RecordId>;

    async fn get_row(&self, table: &str, id: RecordId) -> StoreResult<Option<Row>>;

    /// Validate and replace an existing row
    async fn update_row(&self, table: &str, id: RecordId, row: Row) -> StoreResult<()>;

    /// Remove a row, returning whether it existed
    async fn delete_row(&self, table: &str, id: RecordId) -> StoreResult<bool>;

    /// All rows of a table in key order
    async fn list_rows(&self, table: &str) -> StoreResult<Vec<(RecordId, Row)>>;
}
