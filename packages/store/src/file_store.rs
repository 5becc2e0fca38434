//! # Filesystem-backed local store
//!
//! [`FileStore`] persists offline recipe snapshots and small key-value items to
//! the local filesystem. It is the native counterpart of `IdbStore` plus
//! `LocalStorage`, so saved recipes and preferences survive app restarts.
//!
//! ## Layout
//!
//! ```text
//! <base_dir>/
//! ├── recipes/
//! │   └── <recipe_id>.json   # one OfflineRecipe per file
//! └── kv/
//!     └── <key>              # raw string value
//! ```
//!
//! Names are escaped by [`file_safe`]: ASCII letters, digits and `-` pass
//! through, every other byte becomes `_` plus two hex digits. `_` only ever
//! starts an escape, so distinct ids never share a file.
//!
//! ## Platform data directories
//!
//! Callers usually pass `dirs::data_dir().join("recipe-box")`:
//!
//! | Platform | Path |
//! |----------|------|
//! | macOS | `~/Library/Application Support/recipe-box/` |
//! | Linux | `~/.local/share/recipe-box/` |
//! | Windows | `C:\Users\<user>\AppData\Roaming\recipe-box\` |

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::StoreResult;
use crate::local::KeyValueStore;
use crate::offline::{OfflineRecipe, SnapshotStore};

/// Filesystem-backed snapshot and key-value store.
#[derive(Clone, Debug)]
pub struct FileStore {
    base: PathBuf,
}

impl FileStore {
    pub fn new(base: PathBuf) -> Self {
        Self { base }
    }

    fn recipes_dir(&self) -> PathBuf {
        self.base.join("recipes")
    }

    fn recipe_path(&self, id: &str) -> PathBuf {
        self.recipes_dir().join(format!("{}.json", file_safe(id)))
    }

    fn item_path(&self, key: &str) -> PathBuf {
        self.base.join("kv").join(file_safe(key))
    }
}

fn file_safe(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for byte in name.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' {
            out.push(char::from(byte));
        } else {
            out.push('_');
            out.push_str(&hex::encode([byte]));
        }
    }
    out
}

fn read_optional(path: &Path) -> StoreResult<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(s) => Ok(Some(s)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn remove_optional(path: &Path) -> StoreResult<()> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

fn write_creating_dirs(path: &Path, contents: &str) -> StoreResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, contents)?;
    Ok(())
}

impl SnapshotStore for FileStore {
    async fn get(&self, id: &str) -> StoreResult<Option<OfflineRecipe>> {
        match read_optional(&self.recipe_path(id))? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    async fn put(&self, snapshot: &OfflineRecipe) -> StoreResult<()> {
        let json = serde_json::to_string(snapshot)?;
        write_creating_dirs(&self.recipe_path(&snapshot.recipe.id), &json)
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        remove_optional(&self.recipe_path(id))
    }

    async fn get_all(&self) -> StoreResult<Vec<OfflineRecipe>> {
        let entries = match std::fs::read_dir(self.recipes_dir()) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut out = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let json = std::fs::read_to_string(&path)?;
            out.push(serde_json::from_str(&json)?);
        }
        Ok(out)
    }
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> StoreResult<Option<String>> {
        read_optional(&self.item_path(key))
    }

    fn set_item(&self, key: &str, value: &str) -> StoreResult<()> {
        write_creating_dirs(&self.item_path(key), value)
    }

    fn remove_item(&self, key: &str) -> StoreResult<()> {
        remove_optional(&self.item_path(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::tests::{ingredient, recipe, step};
    use crate::offline::OfflineCache;

    fn temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "recipe_box_{tag}_{}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    #[tokio::test]
    async fn test_file_store_survives_reopen() {
        let dir = temp_dir("snapshots");

        let cache = OfflineCache::new(FileStore::new(dir.clone()));
        cache
            .save(
                &recipe("r1", "Chili"),
                &[ingredient("r1", "Beans", 0)],
                &[step("r1", 1, "Simmer")],
                &[],
            )
            .await
            .unwrap();
        assert!(dir.join("recipes").join("r1.json").exists());

        // Re-open from same directory
        let cache2 = OfflineCache::new(FileStore::new(dir.clone()));
        let all = cache2.list_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].title(), "Chili");
        assert_eq!(all[0].ingredients[0].name, "Beans");

        cache2.remove("r1").await.unwrap();
        cache2.remove("r1").await.unwrap();
        assert!(cache2.get("r1").await.unwrap().is_none());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_file_safe_is_reversible() {
        assert_eq!(file_safe("r1"), "r1");
        assert_eq!(file_safe("a.b"), "a_2eb");
        assert_eq!(file_safe("a_b"), "a_5fb");
        assert_eq!(file_safe("../x"), "_2e_2e_2fx");
        assert_ne!(file_safe("a_2eb"), file_safe("a.b"));
    }

    #[tokio::test]
    async fn test_similar_ids_keep_separate_snapshots() {
        let dir = temp_dir("similar_ids");
        let cache = OfflineCache::new(FileStore::new(dir.clone()));

        cache.save(&recipe("a.b", "First"), &[], &[], &[]).await.unwrap();
        cache.save(&recipe("a_b", "Second"), &[], &[], &[]).await.unwrap();

        let first = cache.get("a.b").await.unwrap().unwrap();
        assert_eq!((first.id(), first.title()), ("a.b", "First"));
        let second = cache.get("a_b").await.unwrap().unwrap();
        assert_eq!((second.id(), second.title()), ("a_b", "Second"));
        assert_eq!(cache.list_all().await.unwrap().len(), 2);

        cache.remove("a.b").await.unwrap();
        assert!(!cache.exists("a.b").await.unwrap());
        assert!(cache.exists("a_b").await.unwrap());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_get_rejects_snapshot_under_wrong_name() {
        let dir = temp_dir("wrong_name");
        let store = FileStore::new(dir.clone());
        let cache = OfflineCache::new(store.clone());
        let saved = cache.save(&recipe("r2", "Stew"), &[], &[], &[]).await.unwrap();

        let json = serde_json::to_string(&saved).unwrap();
        write_creating_dirs(&store.recipe_path("r3"), &json).unwrap();

        assert!(cache.get("r3").await.unwrap().is_none());
        assert!(!cache.exists("r3").await.unwrap());
        assert_eq!(cache.get("r2").await.unwrap().unwrap().title(), "Stew");

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_list_all_on_missing_dir_is_empty() {
        let dir = temp_dir("empty");
        let cache = OfflineCache::new(FileStore::new(dir));
        assert!(cache.list_all().await.unwrap().is_empty());
    }

    #[test]
    fn test_key_value_items() {
        let dir = temp_dir("kv");
        let store = FileStore::new(dir.clone());

        assert_eq!(store.get_item("recipe-box-remember-me").unwrap(), None);
        store.set_item("recipe-box-remember-me", "true").unwrap();
        assert_eq!(
            store.get_item("recipe-box-remember-me").unwrap().as_deref(),
            Some("true")
        );
        store.remove_item("recipe-box-remember-me").unwrap();
        store.remove_item("recipe-box-remember-me").unwrap();
        assert_eq!(store.get_item("recipe-box-remember-me").unwrap(), None);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
