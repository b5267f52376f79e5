use kasen_core::store::port::{KvStore, KvStoreExt};
use kasen_store::{FileStore, MemStore};
use serde::{Deserialize, Serialize};
use tempfile::tempdir;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Note {
    id: String,
    price: f64,
}

async fn exercise(store: &dyn KvStore) -> anyhow::Result<()> {
    assert!(store.get_raw("missing").await?.is_none());

    let notes = vec![
        Note {
            id: "a".to_string(),
            price: 1.25,
        },
        Note {
            id: "b".to_string(),
            price: 2.5,
        },
    ];
    store.set("drawings:EUR/USD:5m", &notes).await?;
    let loaded: Option<Vec<Note>> = store.get("drawings:EUR/USD:5m").await?;
    assert_eq!(loaded, Some(notes));

    store.set_raw("drawings:EUR/USD:5m", "[]".to_string()).await?;
    assert_eq!(store.get_raw("drawings:EUR/USD:5m").await?.as_deref(), Some("[]"));

    store.del("drawings:EUR/USD:5m").await?;
    store.del("drawings:EUR/USD:5m").await?;
    assert!(store.get_raw("drawings:EUR/USD:5m").await?.is_none());
    Ok(())
}

#[tokio::test]
async fn test_mem_store_contract() -> anyhow::Result<()> {
    exercise(&MemStore::new()).await
}

#[tokio::test]
async fn test_file_store_contract() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let store = FileStore::with_root(dir.path().join("kv"))?;
    exercise(&store).await
}

#[tokio::test]
async fn test_file_store_survives_reopen() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let root = dir.path().join("kv");
    FileStore::with_root(&root)?
        .set_raw("k", "{\"v\":1}".to_string())
        .await?;

    let reopened = FileStore::with_root(&root)?;
    assert_eq!(reopened.get_raw("k").await?.as_deref(), Some("{\"v\":1}"));
    Ok(())
}

#[tokio::test]
async fn test_bad_json_is_deserialize_error() -> anyhow::Result<()> {
    let store = MemStore::new();
    store.set_raw("k", "nope".to_string()).await?;
    let result: Result<Option<Note>, _> = store.get("k").await;
    assert!(result.is_err());
    Ok(())
}
