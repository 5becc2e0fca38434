use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::StoreResult;
use crate::local::KeyValueStore;
use crate::offline::{OfflineRecipe, SnapshotStore};

/// In-memory snapshot and key-value store for tests and native fallback.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    recipes: Arc<Mutex<HashMap<String, OfflineRecipe>>>,
    items: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl SnapshotStore for MemoryStore {
    async fn get(&self, id: &str) -> StoreResult<Option<OfflineRecipe>> {
        Ok(lock(&self.recipes).get(id).cloned())
    }

    async fn put(&self, snapshot: &OfflineRecipe) -> StoreResult<()> {
        lock(&self.recipes).insert(snapshot.recipe.id.clone(), snapshot.clone());
        Ok(())
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        lock(&self.recipes).remove(id);
        Ok(())
    }

    async fn get_all(&self) -> StoreResult<Vec<OfflineRecipe>> {
        Ok(lock(&self.recipes).values().cloned().collect())
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(lock(&self.items).get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> StoreResult<()> {
        lock(&self.items).insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> StoreResult<()> {
        lock(&self.items).remove(key);
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::{CookingNote, Ingredient, Instruction, Recipe, RecipeCategory, Visibility};
    use crate::offline::{OfflineCache, RecipeSnapshotSource};

    pub(crate) fn recipe(id: &str, title: &str) -> RecipeSnapshotSource {
        RecipeSnapshotSource {
            recipe: Recipe {
                id: id.to_string(),
                author_id: Some("u1".into()),
                household_id: "h1".into(),
                parent_recipe_id: None,
                title: title.to_string(),
                description: None,
                category: RecipeCategory::Cooking,
                visibility: Visibility::Household,
                prep_time_minutes: Some(10),
                cook_time_minutes: None,
                servings: 4,
                source_url: None,
                created_at: "2024-01-01T00:00:00Z".into(),
                updated_at: "2024-01-01T00:00:00Z".into(),
            },
            author: None,
            images: vec![],
        }
    }

    pub(crate) fn ingredient(recipe_id: &str, name: &str, order: i32) -> Ingredient {
        Ingredient {
            id: format!("{recipe_id}-ing-{order}"),
            recipe_id: recipe_id.to_string(),
            name: name.to_string(),
            qty_imperial: Some(2.0),
            unit_imperial: None,
            qty_metric: None,
            unit_metric: None,
            sort_order: order,
            notes: None,
        }
    }

    pub(crate) fn step(recipe_id: &str, n: u32, content: &str) -> Instruction {
        Instruction {
            id: format!("{recipe_id}-step-{n}"),
            recipe_id: recipe_id.to_string(),
            step_number: n,
            content: content.to_string(),
            duration_minutes: None,
            temperature: None,
            image: None,
        }
    }

    #[tokio::test]
    async fn test_save_then_get() {
        let cache = OfflineCache::new(MemoryStore::new());
        let r = recipe("r1", "Pancakes");

        assert!(!cache.exists("r1").await.unwrap());
        cache
            .save(
                &r,
                &[ingredient("r1", "Flour", 0), ingredient("r1", "Egg", 1)],
                &[step("r1", 1, "Mix")],
                &[],
            )
            .await
            .unwrap();

        let got = cache.get("r1").await.unwrap().unwrap();
        assert_eq!(got.title(), "Pancakes");
        assert_eq!(got.ingredients.len(), 2);
        assert_eq!(got.ingredients[1].name, "Egg");
        assert_eq!(got.instructions[0].content, "Mix");
        assert!(got.saved_at > 0);
        assert!(cache.exists("r1").await.unwrap());
    }

    #[tokio::test]
    async fn test_save_overwrites_previous_snapshot() {
        let cache = OfflineCache::new(MemoryStore::new());
        let mut r = recipe("r1", "Pancakes");
        cache.save_at(&r, &[], &[], &[], 1).await.unwrap();

        r.recipe.title = "Fluffy Pancakes".into();
        let note = CookingNote {
            id: "n1".into(),
            recipe_id: "r1".into(),
            user_id: "u1".into(),
            cooked_on: "2024-02-01".into(),
            multiplier: 2.0,
            rating: Some(5),
            notes: None,
            photo_url: None,
            created_at: String::new(),
        };
        cache.save_at(&r, &[], &[], &[note], 2).await.unwrap();

        let all = cache.list_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].title(), "Fluffy Pancakes");
        assert_eq!(all[0].notes.len(), 1);
        assert_eq!(all[0].saved_at, 2);
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let cache = OfflineCache::new(MemoryStore::new());
        cache.save(&recipe("r1", "Soup"), &[], &[], &[]).await.unwrap();

        cache.remove("r1").await.unwrap();
        cache.remove("r1").await.unwrap();
        cache.remove("never-saved").await.unwrap();

        assert!(cache.get("r1").await.unwrap().is_none());
        assert!(cache.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_all_ordered_by_title_then_id() {
        let cache = OfflineCache::new(MemoryStore::new());
        cache.save(&recipe("r3", "Waffles"), &[], &[], &[]).await.unwrap();
        cache.save(&recipe("r2", "Bread"), &[], &[], &[]).await.unwrap();
        cache.save(&recipe("r1", "Bread"), &[], &[], &[]).await.unwrap();

        let ids: Vec<String> = cache
            .list_all()
            .await
            .unwrap()
            .iter()
            .map(|s| s.id().to_string())
            .collect();
        assert_eq!(ids, vec!["r1", "r2", "r3"]);
    }

    #[test]
    fn test_key_value_roundtrip() {
        let store = MemoryStore::new();
        assert_eq!(store.get_item("k").unwrap(), None);
        store.set_item("k", "v").unwrap();
        assert_eq!(store.get_item("k").unwrap().as_deref(), Some("v"));
        store.remove_item("k").unwrap();
        assert_eq!(store.get_item("k").unwrap(), None);
    }
}
