use std::sync::Arc;

use booklist_db::{Persisted, Record, RecordId, Repository, SqliteStore, Store, StoreError};
use booklist_kernel::{FieldDef, RecordSchema};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Pen {
    colour: String,
    length_mm: i32,
}

impl Record for Pen {
    const SCHEMA: RecordSchema = RecordSchema {
        table: "pen",
        fields: &[FieldDef::text("colour", 8), FieldDef::integer("length_mm")],
    };
}

fn pen(colour: &str, length_mm: i32) -> Pen {
    Pen {
        colour: colour.to_string(),
        length_mm,
    }
}

async fn pens() -> Repository<Pen> {
    let store = Arc::new(SqliteStore::open_in_memory().unwrap());
    store.register(Pen::SCHEMA).await.unwrap();
    Repository::new(store)
}

#[tokio::test]
async fn create_then_get_returns_equal_record() {
    let repo = pens().await;
    let created = repo.create(pen("blue", 140)).await.unwrap();

    let loaded = repo.get(created.id).await.unwrap().unwrap();
    assert_eq!(loaded, created);
    assert_eq!(loaded.colour, "blue");
}

#[tokio::test]
async fn save_writes_assigned_fields() {
    let repo = pens().await;
    let mut created = repo.create(pen("blue", 140)).await.unwrap();

    created.colour = "red".to_string();
    repo.save(&created).await.unwrap();

    let loaded = repo.get(created.id).await.unwrap().unwrap();
    assert_eq!(loaded.record, pen("red", 140));
}

#[tokio::test]
async fn save_after_delete_is_not_found() {
    let repo = pens().await;
    let created = repo.create(pen("blue", 140)).await.unwrap();

    assert!(repo.delete(created.id).await.unwrap());
    assert!(repo.get(created.id).await.unwrap().is_none());

    let err = repo.save(&created).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound { .. }));
}

#[tokio::test]
async fn all_lists_in_key_order() {
    let repo = pens().await;
    repo.create(pen("blue", 140)).await.unwrap();
    repo.create(pen("green", 120)).await.unwrap();

    let all = repo.all().await.unwrap();
    let ids: Vec<RecordId> = all.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![RecordId(1), RecordId(2)]);
    assert_eq!(repo.count().await.unwrap(), 2);
}

#[tokio::test]
async fn invalid_record_is_rejected_by_store() {
    let repo = pens().await;
    let err = repo.create(pen("turquoise", 140)).await.unwrap_err();
    assert_eq!(err.field(), Some("colour"));
    assert_eq!(repo.count().await.unwrap(), 0);
}

#[tokio::test]
async fn unregistered_record_type_fails() {
    let repo: Repository<Pen> = Repository::new(Arc::new(SqliteStore::open_in_memory().unwrap()));
    let err = repo.create(pen("blue", 140)).await.unwrap_err();
    assert!(matches!(err, StoreError::UnknownTable { .. }));
}

#[test]
fn persisted_derefs_to_record() {
    let persisted = Persisted {
        id: RecordId(7),
        record: pen("black", 100),
    };
    assert_eq!(persisted.length_mm, 100);
    assert_eq!(persisted.id.to_string(), "7");
}
