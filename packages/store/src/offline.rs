//! # Offline cache — whole-recipe snapshots for disconnected reading
//!
//! [`OfflineCache`] keeps one denormalised [`OfflineRecipe`] per recipe id in a
//! local durable store that survives restarts and network loss. It is a manual,
//! user-triggered one-way mirror of the remote tables: nothing is synced back and
//! nothing expires on its own.
//!
//! ## [`SnapshotStore`] trait
//!
//! The async backend interface: `get`/`put`/`delete` keyed by recipe id plus
//! `get_all`. Implementations live in sibling modules ([`crate::memory`],
//! [`crate::file_store`], and `crate::idb` on the web). Every backend only
//! needs per-key atomic put/delete; concurrent save/remove of the same id is not
//! coordinated (last operation wins).
//!
//! ## Operations
//!
//! | Method | Semantics |
//! |--------|-----------|
//! | [`save`](OfflineCache::save) | Full replace of the snapshot for `recipe.id`, stamped with the current time. |
//! | [`get`](OfflineCache::get) | `Ok(None)` when absent. |
//! | [`remove`](OfflineCache::remove) | Idempotent delete. |
//! | [`list_all`](OfflineCache::list_all) | Every snapshot, ordered by title, then id. |
//! | [`exists`](OfflineCache::exists) | Presence check for the save/unsave toggle. |
//!
//! Storage failures propagate as [`StoreError`]; callers log them and keep their
//! pre-operation state.

use serde::{Deserialize, Serialize};

use crate::error::StoreResult;
use crate::models::{AuthorInfo, CookingNote, Ingredient, Instruction, Recipe, RecipeImage};

/// The recipe view a snapshot is taken from: scalar row plus display joins.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecipeSnapshotSource {
    #[serde(flatten)]
    pub recipe: Recipe,
    #[serde(default)]
    pub author: Option<AuthorInfo>,
    #[serde(default)]
    pub images: Vec<RecipeImage>,
}

/// A locally persisted, denormalised copy of one recipe.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OfflineRecipe {
    #[serde(flatten)]
    pub recipe: Recipe,
    #[serde(default)]
    pub author: Option<AuthorInfo>,
    #[serde(default)]
    pub images: Vec<RecipeImage>,
    pub ingredients: Vec<Ingredient>,
    pub instructions: Vec<Instruction>,
    #[serde(default)]
    pub notes: Vec<CookingNote>,
    /// Capture time, milliseconds since the Unix epoch.
    pub saved_at: i64,
}

impl OfflineRecipe {
    pub fn id(&self) -> &str {
        &self.recipe.id
    }

    pub fn title(&self) -> &str {
        &self.recipe.title
    }
}

/// Async key-value backend for offline snapshots, keyed by recipe id.
pub trait SnapshotStore {
    fn get(
        &self,
        id: &str,
    ) -> impl std::future::Future<Output = StoreResult<Option<OfflineRecipe>>>;
    fn put(
        &self,
        snapshot: &OfflineRecipe,
    ) -> impl std::future::Future<Output = StoreResult<()>>;
    fn delete(
        &self,
        id: &str,
    ) -> impl std::future::Future<Output = StoreResult<()>>;
    fn get_all(&self) -> impl std::future::Future<Output = StoreResult<Vec<OfflineRecipe>>>;
}

/// Offline recipe cache backed by a [`SnapshotStore`].
#[derive(Clone, Debug)]
pub struct OfflineCache<S: SnapshotStore> {
    store: S,
}

impl<S: SnapshotStore> OfflineCache<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Save (or overwrite) the snapshot for `recipe`, stamped with the current time.
    pub async fn save(
        &self,
        recipe: &RecipeSnapshotSource,
        ingredients: &[Ingredient],
        instructions: &[Instruction],
        notes: &[CookingNote],
    ) -> StoreResult<OfflineRecipe> {
        self.save_at(recipe, ingredients, instructions, notes, current_millis())
            .await
    }

    /// Same as [`save`](Self::save) with an explicit capture time.
    pub async fn save_at(
        &self,
        recipe: &RecipeSnapshotSource,
        ingredients: &[Ingredient],
        instructions: &[Instruction],
        notes: &[CookingNote],
        saved_at: i64,
    ) -> StoreResult<OfflineRecipe> {
        let snapshot = OfflineRecipe {
            recipe: recipe.recipe.clone(),
            author: recipe.author.clone(),
            images: recipe.images.clone(),
            ingredients: ingredients.to_vec(),
            instructions: instructions.to_vec(),
            notes: notes.to_vec(),
            saved_at,
        };
        self.store.put(&snapshot).await?;
        tracing::debug!(recipe_id = %snapshot.recipe.id, "saved recipe offline");
        Ok(snapshot)
    }

    /// The snapshot saved for `id`. A stored record that belongs to another
    /// recipe is treated as absent.
    pub async fn get(&self, id: &str) -> StoreResult<Option<OfflineRecipe>> {
        match self.store.get(id).await? {
            Some(snapshot) if snapshot.recipe.id != id => {
                tracing::warn!(
                    recipe_id = %id,
                    stored_id = %snapshot.recipe.id,
                    "ignoring offline snapshot stored under another id"
                );
                Ok(None)
            }
            other => Ok(other),
        }
    }

    pub async fn remove(&self, id: &str) -> StoreResult<()> {
        self.store.delete(id).await?;
        tracing::debug!(recipe_id = %id, "removed offline recipe");
        Ok(())
    }

    /// All snapshots ordered by title; equal titles fall back to id order.
    pub async fn list_all(&self) -> StoreResult<Vec<OfflineRecipe>> {
        let mut all = self.store.get_all().await?;
        all.sort_by(|a, b| {
            a.recipe
                .title
                .cmp(&b.recipe.title)
                .then_with(|| a.recipe.id.cmp(&b.recipe.id))
        });
        Ok(all)
    }

    pub async fn exists(&self, id: &str) -> StoreResult<bool> {
        Ok(self.get(id).await?.is_some())
    }
}

/// Current time in milliseconds since the Unix epoch.
pub fn current_millis() -> i64 {
    #[cfg(all(target_arch = "wasm32", feature = "web"))]
    {
        js_sys::Date::now() as i64
    }
    #[cfg(not(all(target_arch = "wasm32", feature = "web")))]
    {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or(0)
    }
}
