use std::fmt;

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use booklist_kernel::RecordSchema;

/// Primary key assigned by the store, unique within one table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub i64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A statically typed record definition the store can map to and from rows.
///
/// The serialized form of the record must be a JSON object whose keys are
/// exactly the fields listed in [`Record::SCHEMA`].
pub trait Record: Serialize + DeserializeOwned + Send + Sync {
    const SCHEMA: RecordSchema;
}

/// A record together with the key the store assigned to it.
#[derive(Debug, Clone, PartialEq)]
pub struct Persisted<T> {
    pub id: RecordId,
    pub record: T,
}

impl<T> std::ops::Deref for Persisted<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.record
    }
}

impl<T> std::ops::DerefMut for Persisted<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.record
    }
}
