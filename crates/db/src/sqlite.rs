//! SQLite-backed record store.
//!
//! Each registered schema becomes one table with an `AUTOINCREMENT` integer
//! key followed by one `NOT NULL` column per field. Rows are validated before
//! every write; every write is committed before the call returns.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use rusqlite::types::Value as SqlValue;
use rusqlite::{params_from_iter, Connection, OptionalExtension};
use serde_json::Value;
use tokio::sync::Mutex;

use booklist_kernel::{FieldKind, RecordSchema};

use crate::error::{StoreError, StoreResult};
use crate::record::RecordId;
use crate::store::{Row, Store};
use crate::validate::validate_row;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

struct Inner {
    conn: Connection,
    schemas: BTreeMap<&'static str, RecordSchema>,
}

impl Inner {
    fn schema(&self, table: &str) -> StoreResult<RecordSchema> {
        self.schemas
            .get(table)
            .copied()
            .ok_or_else(|| StoreError::UnknownTable {
                table: table.to_string(),
            })
    }
}

/// Store over a single SQLite connection.
pub struct SqliteStore {
    inner: Mutex<Inner>,
}

impl SqliteStore {
    /// Open (or create) a database file, creating parent directories.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        let started_at = Instant::now();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        // Reads the file header, so a damaged file fails here rather than later.
        let mode: String = conn.query_row("PRAGMA journal_mode = WAL;", [], |row| row.get(0))?;

        tracing::info!(
            path = %path.display(),
            journal_mode = %mode,
            duration_ms = started_at.elapsed().as_millis() as u64,
            "database opened"
        );
        Ok(Self::from_connection(conn))
    }

    /// Open a private in-memory database, discarded when the store is dropped.
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        tracing::info!("in-memory database opened");
        Ok(Self::from_connection(conn))
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            inner: Mutex::new(Inner {
                conn,
                schemas: BTreeMap::new(),
            }),
        }
    }

    /// Run SQLite's quick integrity check.
    pub async fn integrity_check(&self) -> StoreResult<()> {
        let inner = self.inner.lock().await;
        let report: String = inner
            .conn
            .query_row("PRAGMA quick_check;", [], |row| row.get(0))?;
        if report != "ok" {
            return Err(StoreError::Corrupt { report });
        }
        Ok(())
    }

    /// Fold the write-ahead log back into the main database file.
    pub async fn checkpoint(&self) -> StoreResult<()> {
        let inner = self.inner.lock().await;
        inner
            .conn
            .query_row("PRAGMA wal_checkpoint(TRUNCATE);", [], |_| Ok(()))
            .optional()?;
        Ok(())
    }

    #[cfg(test)]
    async fn execute_raw(&self, sql: &str) -> StoreResult<()> {
        self.inner.lock().await.conn.execute_batch(sql)?;
        Ok(())
    }
}

fn quote(identifier: &str) -> String {
    format!("\"{}\"", identifier.replace('"', "\"\""))
}

fn column_type(kind: FieldKind) -> &'static str {
    match kind {
        FieldKind::Integer => "INTEGER",
        FieldKind::Text { .. } | FieldKind::Date | FieldKind::Url { .. } => "TEXT",
    }
}

fn create_table_sql(schema: &RecordSchema) -> String {
    let mut columns = vec!["id INTEGER PRIMARY KEY AUTOINCREMENT".to_string()];
    columns.extend(
        schema
            .fields
            .iter()
            .map(|field| format!("{} {} NOT NULL", quote(field.name), column_type(field.kind))),
    );
    format!(
        "CREATE TABLE IF NOT EXISTS {} (\n    {}\n);",
        quote(schema.table),
        columns.join(",\n    ")
    )
}

fn column_list(schema: &RecordSchema) -> String {
    schema
        .fields
        .iter()
        .map(|field| quote(field.name))
        .collect::<Vec<_>>()
        .join(", ")
}

/// An existing table must have exactly the columns the schema would create.
fn check_columns(conn: &Connection, schema: &RecordSchema) -> StoreResult<()> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({});", quote(schema.table)))?;
    let actual = stmt
        .query_map([], |row| Ok((row.get::<_, String>(1)?, row.get::<_, String>(2)?)))?
        .collect::<Result<Vec<_>, _>>()?;

    let mut expected = vec![("id".to_string(), "INTEGER".to_string())];
    expected.extend(
        schema
            .fields
            .iter()
            .map(|field| (field.name.to_string(), column_type(field.kind).to_string())),
    );

    if actual != expected {
        return Err(StoreError::SchemaConflict {
            table: schema.table.to_string(),
        });
    }
    Ok(())
}

/// Key the next insert into `table` will receive.
fn next_key(conn: &Connection, table: &str) -> StoreResult<i64> {
    let highest: i64 = conn.query_row(
        &format!(
            "SELECT MAX(
                COALESCE((SELECT seq FROM sqlite_sequence WHERE name = ?1), 0),
                COALESCE((SELECT MAX(id) FROM {}), 0)
            );",
            quote(table)
        ),
        [table],
        |row| row.get(0),
    )?;

    highest
        .checked_add(1)
        .ok_or_else(|| StoreError::KeySpaceExhausted {
            table: table.to_string(),
        })
}

fn to_sql_values(schema: &RecordSchema, row: &Row) -> StoreResult<Vec<SqlValue>> {
    schema
        .fields
        .iter()
        .map(|field| {
            let value = row.get(field.name);
            let converted = match field.kind {
                FieldKind::Integer => value.and_then(Value::as_i64).map(SqlValue::Integer),
                FieldKind::Text { .. } | FieldKind::Date | FieldKind::Url { .. } => value
                    .and_then(Value::as_str)
                    .map(|text| SqlValue::Text(text.to_string())),
            };
            converted.ok_or_else(|| StoreError::InvalidData(format!(
                "{}.{} cannot be stored as {}",
                schema.table,
                field.name,
                column_type(field.kind)
            )))
        })
        .collect()
}

/// Read the schema's fields from `row`, starting at column `offset`.
fn read_row(schema: &RecordSchema, row: &rusqlite::Row<'_>, offset: usize) -> rusqlite::Result<Row> {
    let mut fields = Row::new();
    for (index, field) in schema.fields.iter().enumerate() {
        let value = match field.kind {
            FieldKind::Integer => Value::from(row.get::<_, i64>(offset + index)?),
            FieldKind::Text { .. } | FieldKind::Date | FieldKind::Url { .. } => {
                Value::String(row.get::<_, String>(offset + index)?)
            }
        };
        fields.insert(field.name.to_string(), value);
    }
    Ok(fields)
}

#[async_trait]
impl Store for SqliteStore {
    async fn register(&self, schema: RecordSchema) -> StoreResult<()> {
        let mut guard = self.inner.lock().await;
        let inner = &mut *guard;

        if let Some(existing) = inner.schemas.get(schema.table) {
            if *existing == schema {
                return Ok(());
            }
            return Err(StoreError::SchemaConflict {
                table: schema.table.to_string(),
            });
        }

        inner.conn.execute_batch(&create_table_sql(&schema))?;
        check_columns(&inner.conn, &schema)?;

        tracing::debug!(
            table = schema.table,
            fields = ?schema.field_names(),
            "record schema registered"
        );
        inner.schemas.insert(schema.table, schema);
        Ok(())
    }

    async fn schema(&self, table: &str) -> Option<RecordSchema> {
        self.inner.lock().await.schema(table).ok()
    }

    async fn insert_row(&self, table: &str, row: Row) -> StoreResult<RecordId> {
        let inner = self.inner.lock().await;
        let schema = inner.schema(table)?;

        validate_row(&schema, &row)?;
        let values = to_sql_values(&schema, &row)?;
        next_key(&inner.conn, table)?;

        let placeholders = (1..=values.len())
            .map(|index| format!("?{index}"))
            .collect::<Vec<_>>()
            .join(", ");
        inner.conn.execute(
            &format!(
                "INSERT INTO {} ({}) VALUES ({});",
                quote(table),
                column_list(&schema),
                placeholders
            ),
            params_from_iter(values),
        )?;

        let id = RecordId(inner.conn.last_insert_rowid());
        tracing::debug!(table, %id, "row inserted");
        Ok(id)
    }

    async fn get_row(&self, table: &str, id: RecordId) -> StoreResult<Option<Row>> {
        let inner = self.inner.lock().await;
        let schema = inner.schema(table)?;

        let row = inner
            .conn
            .query_row(
                &format!(
                    "SELECT {} FROM {} WHERE id = ?1;",
                    column_list(&schema),
                    quote(table)
                ),
                [id.0],
                |row| read_row(&schema, row, 0),
            )
            .optional()?;
        Ok(row)
    }

    async fn update_row(&self, table: &str, id: RecordId, row: Row) -> StoreResult<()> {
        let inner = self.inner.lock().await;
        let schema = inner.schema(table)?;

        validate_row(&schema, &row)?;
        let mut values = to_sql_values(&schema, &row)?;
        values.push(SqlValue::Integer(id.0));

        let assignments = schema
            .fields
            .iter()
            .enumerate()
            .map(|(index, field)| format!("{} = ?{}", quote(field.name), index + 1))
            .collect::<Vec<_>>()
            .join(", ");
        let changed = inner.conn.execute(
            &format!(
                "UPDATE {} SET {} WHERE id = ?{};",
                quote(table),
                assignments,
                values.len()
            ),
            params_from_iter(values),
        )?;

        if changed == 0 {
            return Err(StoreError::NotFound {
                table: table.to_string(),
                id,
            });
        }
        tracing::debug!(table, %id, "row updated");
        Ok(())
    }

    async fn delete_row(&self, table: &str, id: RecordId) -> StoreResult<bool> {
        let inner = self.inner.lock().await;
        inner.schema(table)?;

        let changed = inner
            .conn
            .execute(&format!("DELETE FROM {} WHERE id = ?1;", quote(table)), [id.0])?;
        tracing::debug!(table, %id, existed = changed > 0, "row deleted");
        Ok(changed > 0)
    }

    async fn list_rows(&self, table: &str) -> StoreResult<Vec<(RecordId, Row)>> {
        let inner = self.inner.lock().await;
        let schema = inner.schema(table)?;

        let mut stmt = inner.conn.prepare(&format!(
            "SELECT id, {} FROM {} ORDER BY id;",
            column_list(&schema),
            quote(table)
        ))?;
        let rows = stmt
            .query_map([], |row| Ok((RecordId(row.get(0)?), read_row(&schema, row, 1)?)))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}
