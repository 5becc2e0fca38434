//! # IndexedDB snapshot store — browser-side persistence
//!
//! [`IdbStore`] is the [`SnapshotStore`] used on the **web platform**. It keeps
//! offline recipe snapshots in the browser's IndexedDB via [`rexie`], so a saved
//! recipe stays readable with no network at all.
//!
//! ## Database schema
//!
//! | IndexedDB database | Version | Object store | Key | Value |
//! |--------------------|---------|--------------|-----|-------|
//! | `"recipe-box-offline"` | 1 | `"recipes"` | recipe id | JSON text of an [`OfflineRecipe`] |
//!
//! Keys are out-of-line. Values are stored as JSON strings rather than structured
//! clones so the flattened recipe fields decode exactly like the native
//! [`crate::FileStore`] files. Title ordering happens in
//! [`OfflineCache::list_all`](crate::OfflineCache::list_all), not via an index.
//!
//! ## Connection management
//!
//! `IdbStore` is a zero-size `Copy` handle that opens a fresh [`Rexie`]
//! connection on every operation; the browser caches the underlying connection.
//! IndexedDB failures surface as [`StoreError::Backend`].

use rexie::{ObjectStore as RexieObjectStore, Rexie, TransactionMode};
use wasm_bindgen::JsValue;

use crate::error::{StoreError, StoreResult};
use crate::offline::{OfflineRecipe, SnapshotStore};

const DB_NAME: &str = "recipe-box-offline";
const DB_VERSION: u32 = 1;
const RECIPES_STORE: &str = "recipes";

fn backend(err: rexie::Error) -> StoreError {
    StoreError::Backend(err.to_string())
}

fn decode(value: JsValue) -> StoreResult<OfflineRecipe> {
    let json = value
        .as_string()
        .ok_or_else(|| StoreError::Backend("stored snapshot is not a string".into()))?;
    Ok(serde_json::from_str(&json)?)
}

/// IndexedDB-backed snapshot store for the web platform.
#[derive(Clone, Copy, Debug, Default)]
pub struct IdbStore;

impl IdbStore {
    pub fn new() -> Self {
        Self
    }

    async fn open_db(&self) -> StoreResult<Rexie> {
        Rexie::builder(DB_NAME)
            .version(DB_VERSION)
            .add_object_store(RexieObjectStore::new(RECIPES_STORE))
            .build()
            .await
            .map_err(backend)
    }
}

impl SnapshotStore for IdbStore {
    async fn get(&self, id: &str) -> StoreResult<Option<OfflineRecipe>> {
        let db = self.open_db().await?;
        let tx = db
            .transaction(&[RECIPES_STORE], TransactionMode::ReadOnly)
            .map_err(backend)?;
        let store = tx.store(RECIPES_STORE).map_err(backend)?;

        let value = store.get(JsValue::from_str(id)).await.map_err(backend)?;
        match value {
            Some(v) if !v.is_undefined() && !v.is_null() => Ok(Some(decode(v)?)),
            _ => Ok(None),
        }
    }

    async fn put(&self, snapshot: &OfflineRecipe) -> StoreResult<()> {
        let json = serde_json::to_string(snapshot)?;
        let db = self.open_db().await?;
        let tx = db
            .transaction(&[RECIPES_STORE], TransactionMode::ReadWrite)
            .map_err(backend)?;
        let store = tx.store(RECIPES_STORE).map_err(backend)?;

        let key = JsValue::from_str(&snapshot.recipe.id);
        store
            .put(&JsValue::from_str(&json), Some(&key))
            .await
            .map_err(backend)?;
        tx.done().await.map_err(backend)?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        let db = self.open_db().await?;
        let tx = db
            .transaction(&[RECIPES_STORE], TransactionMode::ReadWrite)
            .map_err(backend)?;
        let store = tx.store(RECIPES_STORE).map_err(backend)?;

        store.delete(JsValue::from_str(id)).await.map_err(backend)?;
        tx.done().await.map_err(backend)?;
        Ok(())
    }

    async fn get_all(&self) -> StoreResult<Vec<OfflineRecipe>> {
        let db = self.open_db().await?;
        let tx = db
            .transaction(&[RECIPES_STORE], TransactionMode::ReadOnly)
            .map_err(backend)?;
        let store = tx.store(RECIPES_STORE).map_err(backend)?;

        store
            .get_all(None, None)
            .await
            .map_err(backend)?
            .into_iter()
            .map(decode)
            .collect()
    }
}
