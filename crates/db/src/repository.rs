use std::marker::PhantomData;
use std::sync::Arc;

use serde_json::Value;

use crate::error::{StoreError, StoreResult};
use crate::record::{Persisted, Record, RecordId};
use crate::store::{Row, Store};

/// Typed CRUD access to the table of one record type.
pub struct Repository<T> {
    store: Arc<dyn Store>,
    _record: PhantomData<fn() -> T>,
}

impl<T> Clone for Repository<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            _record: PhantomData,
        }
    }
}

impl<T: Record> Repository<T> {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            store,
            _record: PhantomData,
        }
    }

    fn table(&self) -> &'static str {
        T::SCHEMA.table
    }

    /// Persist a new record and return it with its assigned key
    pub async fn create(&self, record: T) -> StoreResult<Persisted<T>> {
        let id = self.store.insert_row(self.table(), encode(&record)?).await?;
        Ok(Persisted { id, record })
    }

    pub async fn get(&self, id: RecordId) -> StoreResult<Option<Persisted<T>>> {
        match self.store.get_row(self.table(), id).await? {
            Some(row) => Ok(Some(Persisted {
                id,
                record: decode(row)?,
            })),
            None => Ok(None),
        }
    }

    /// Write the current field values of an already persisted record
    pub async fn save(&self, persisted: &Persisted<T>) -> StoreResult<()> {
        self.store
            .update_row(self.table(), persisted.id, encode(&persisted.record)?)
            .await
    }

    /// Delete a record, returning whether it existed
    pub async fn delete(&self, id: RecordId) -> StoreResult<bool> {
        self.store.delete_row(self.table(), id).await
    }

    /// Every record of this type in key order
    pub async fn all(&self) -> StoreResult<Vec<Persisted<T>>> {
        self.store
            .list_rows(self.table())
            .await?
            .into_iter()
            .map(|(id, row)| {
                Ok(Persisted {
                    id,
                    record: decode(row)?,
                })
            })
            .collect()
    }

    pub async fn count(&self) -> StoreResult<usize> {
        Ok(self.store.list_rows(self.table()).await?.len())
    }
}

fn encode<T: Record>(record: &T) -> StoreResult<Row> {
    match serde_json::to_value(record)? {
        Value::Object(row) => Ok(row),
        _ => Err(StoreError::NotAnObject),
    }
}

fn decode<T: Record>(row: Row) -> StoreResult<T> {
    Ok(serde_json::from_value(Value::Object(row))?)
}
