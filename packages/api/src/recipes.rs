//! # Recipe reads and writes
//!
//! Lists, detail loads, create/update/delete, variations, favorites and
//! cooking notes, all expressed over a [`Gateway`]. Joins are separate
//! queries stitched together here rather than embedded selects.
//!
//! [`load_recipe_or_offline`] is the one place remote and local data meet: a
//! failed remote load falls back to the offline snapshot, if one exists.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use store::models::{
    attach_step_images, main_image, AuthorInfo, CookingNote, ImageRef, Ingredient, Instruction,
    Recipe, RecipeCategory, RecipeImage,
};
use store::{OfflineCache, OfflineRecipe, RecipeSnapshotSource, SnapshotStore};

use crate::draft::RecipeDraft;
use crate::error::{ApiError, ApiResult};
use crate::gateway::Gateway;
use crate::models::HouseholdMember;

/// A row of the recipe list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecipeSummary {
    #[serde(flatten)]
    pub recipe: Recipe,
    #[serde(default)]
    pub author: Option<AuthorInfo>,
    /// URL of the main image, when the recipe has one.
    #[serde(default)]
    pub display_image: Option<String>,
}

/// Everything the detail page renders.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecipeDetail {
    #[serde(flatten)]
    pub recipe: Recipe,
    #[serde(default)]
    pub author: Option<AuthorInfo>,
    #[serde(default)]
    pub images: Vec<RecipeImage>,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub instructions: Vec<Instruction>,
}

impl RecipeDetail {
    pub fn main_image(&self) -> Option<&RecipeImage> {
        main_image(&self.images)
    }

    pub fn snapshot_source(&self) -> RecipeSnapshotSource {
        RecipeSnapshotSource {
            recipe: self.recipe.clone(),
            author: self.author.clone(),
            images: self.images.clone(),
        }
    }

    pub fn from_offline(snapshot: OfflineRecipe) -> (Self, Vec<CookingNote>) {
        let detail = Self {
            recipe: snapshot.recipe,
            author: snapshot.author,
            images: snapshot.images,
            ingredients: snapshot.ingredients,
            instructions: snapshot.instructions,
        };
        (detail, snapshot.notes)
    }
}

/// Where a loaded recipe came from.
#[derive(Clone, Debug, PartialEq)]
pub enum LoadedRecipe {
    Remote(RecipeDetail),
    Offline {
        detail: RecipeDetail,
        notes: Vec<CookingNote>,
        saved_at: i64,
    },
}

impl LoadedRecipe {
    pub fn detail(&self) -> &RecipeDetail {
        match self {
            LoadedRecipe::Remote(detail) => detail,
            LoadedRecipe::Offline { detail, .. } => detail,
        }
    }

    pub fn is_offline(&self) -> bool {
        matches!(self, LoadedRecipe::Offline { .. })
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(RecipeCategory),
}

impl CategoryFilter {
    pub fn matches(&self, category: RecipeCategory) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(c) => *c == category,
        }
    }

    /// `"all"` or a category wire name.
    pub fn parse(s: &str) -> Self {
        RecipeCategory::parse(s).map_or(CategoryFilter::All, CategoryFilter::Only)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RecipeFilter {
    pub search: String,
    pub category: CategoryFilter,
    pub favorites_only: bool,
}

/// Apply the list page filters. Search matches title or description,
/// ignoring case.
pub fn filter_recipes<'a>(
    recipes: &'a [RecipeSummary],
    filter: &RecipeFilter,
    favorites: &HashSet<String>,
) -> Vec<&'a RecipeSummary> {
    let needle = filter.search.trim().to_lowercase();
    recipes
        .iter()
        .filter(|s| {
            needle.is_empty()
                || s.recipe.title.to_lowercase().contains(&needle)
                || s.recipe
                    .description
                    .as_deref()
                    .is_some_and(|d| d.to_lowercase().contains(&needle))
        })
        .filter(|s| filter.category.matches(s.recipe.category))
        .filter(|s| !filter.favorites_only || favorites.contains(&s.recipe.id))
        .collect()
}

async fn fetch_authors(
    gateway: &impl Gateway,
    ids: impl IntoIterator<Item = String>,
) -> ApiResult<HashMap<String, AuthorInfo>> {
    let ids: HashSet<String> = ids.into_iter().collect();
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let authors: Vec<AuthorInfo> = gateway
        .from("users")
        .select("id,display_name")
        .in_list("id", ids)
        .fetch()
        .await?;
    Ok(authors.into_iter().map(|a| (a.id.clone(), a)).collect())
}

/// Every recipe visible to the caller, newest first.
pub async fn list_recipes(gateway: &impl Gateway) -> ApiResult<Vec<RecipeSummary>> {
    let recipes: Vec<Recipe> = gateway
        .from("recipes")
        .order("created_at", false)
        .fetch()
        .await?;
    let main_images: Vec<RecipeImage> = gateway
        .from("recipe_images")
        .is_null("instruction_id")
        .fetch()
        .await?;
    let authors = fetch_authors(gateway, recipes.iter().filter_map(|r| r.author_id.clone())).await?;

    Ok(recipes
        .into_iter()
        .map(|recipe| {
            let display_image = main_images
                .iter()
                .find(|img| img.recipe_id == recipe.id)
                .map(|img| img.url.clone());
            let author = recipe
                .author_id
                .as_ref()
                .and_then(|id| authors.get(id).cloned());
            RecipeSummary {
                recipe,
                author,
                display_image,
            }
        })
        .collect())
}

pub async fn load_recipe_detail(gateway: &impl Gateway, id: &str) -> ApiResult<RecipeDetail> {
    let recipe: Recipe = gateway.from("recipes").eq("id", id).single().await?;

    let author = match &recipe.author_id {
        Some(author_id) => {
            gateway
                .from("users")
                .select("id,display_name")
                .eq("id", author_id.as_str())
                .maybe_single::<AuthorInfo>()
                .await?
        }
        None => None,
    };

    let images: Vec<RecipeImage> = match gateway.from("recipe_images").eq("recipe_id", id).fetch().await {
        Ok(images) => images,
        Err(e) => {
            tracing::warn!(recipe_id = %id, "failed to load recipe images: {e}");
            Vec::new()
        }
    };

    let ingredients: Vec<Ingredient> = gateway
        .from("ingredients")
        .eq("recipe_id", id)
        .order("sort_order", true)
        .fetch()
        .await?;
    let mut instructions: Vec<Instruction> = gateway
        .from("instructions")
        .eq("recipe_id", id)
        .order("step_number", true)
        .fetch()
        .await?;
    attach_step_images(&mut instructions, &images);

    Ok(RecipeDetail {
        recipe,
        author,
        images,
        ingredients,
        instructions,
    })
}

/// Load from the remote store, falling back to the offline snapshot when the
/// remote load fails. With no snapshot the remote error is returned.
pub async fn load_recipe_or_offline<S: SnapshotStore>(
    gateway: &impl Gateway,
    cache: &OfflineCache<S>,
    id: &str,
) -> ApiResult<LoadedRecipe> {
    let err = match load_recipe_detail(gateway, id).await {
        Ok(detail) => return Ok(LoadedRecipe::Remote(detail)),
        Err(err) => err,
    };
    tracing::warn!(recipe_id = %id, "remote load failed, trying offline copy: {err}");

    match cache.get(id).await {
        Ok(Some(snapshot)) => {
            let saved_at = snapshot.saved_at;
            let (detail, notes) = RecipeDetail::from_offline(snapshot);
            Ok(LoadedRecipe::Offline {
                detail,
                notes,
                saved_at,
            })
        }
        Ok(None) => Err(err),
        Err(cache_err) => {
            tracing::error!(recipe_id = %id, "offline lookup failed: {cache_err}");
            Err(err)
        }
    }
}

/// Snapshot a loaded recipe, with its notes, into the offline cache.
pub async fn save_offline<S: SnapshotStore>(
    cache: &OfflineCache<S>,
    detail: &RecipeDetail,
    notes: &[CookingNote],
) -> ApiResult<OfflineRecipe> {
    Ok(cache
        .save(
            &detail.snapshot_source(),
            &detail.ingredients,
            &detail.instructions,
            notes,
        )
        .await?)
}

fn blank_to_null(s: &str) -> Value {
    match s.trim() {
        "" => Value::Null,
        s => Value::String(s.to_string()),
    }
}

fn scalar_fields(draft: &RecipeDraft) -> Value {
    json!({
        "title": draft.title.trim(),
        "description": blank_to_null(&draft.description),
        "category": draft.category,
        "visibility": draft.visibility,
        "prep_time_minutes": draft.prep_time_minutes,
        "cook_time_minutes": draft.cook_time_minutes,
        "servings": draft.servings,
        "source_url": blank_to_null(&draft.source_url),
    })
}

fn image_row(recipe_id: &str, instruction_id: Option<&str>, image: &ImageRef, caption: Option<String>) -> Value {
    json!({
        "recipe_id": recipe_id,
        "instruction_id": instruction_id,
        "url": image.url,
        "storage_path": image.storage_path,
        "caption": caption,
        "order_index": 0,
    })
}

/// Insert ingredients, instructions and image rows for `recipe_id`.
async fn write_children(gateway: &impl Gateway, recipe_id: &str, draft: &RecipeDraft) -> ApiResult<()> {
    if let Some(image) = &draft.main_image {
        gateway
            .from("recipe_images")
            .insert::<_, Value>(&image_row(recipe_id, None, image, None))
            .await?;
    }

    let ingredients: Vec<Value> = draft
        .ingredients
        .iter()
        .enumerate()
        .map(|(i, ing)| {
            json!({
                "recipe_id": recipe_id,
                "name": ing.name.trim(),
                "qty_imperial": ing.qty_imperial,
                "unit_imperial": ing.unit_imperial,
                "qty_metric": ing.qty_metric,
                "unit_metric": ing.unit_metric,
                "notes": ing.notes.as_deref().map(blank_to_null).unwrap_or(Value::Null),
                "sort_order": i,
            })
        })
        .collect();
    gateway
        .from("ingredients")
        .insert_many::<_, Value>(&ingredients)
        .await?;

    let instructions: Vec<Value> = draft
        .instructions
        .iter()
        .enumerate()
        .map(|(i, inst)| {
            json!({
                "recipe_id": recipe_id,
                "step_number": i + 1,
                "content": inst.content.trim(),
                "duration_minutes": inst.duration_minutes,
                "temperature": inst.temperature.as_deref().map(blank_to_null).unwrap_or(Value::Null),
            })
        })
        .collect();
    let inserted: Vec<Instruction> = gateway
        .from("instructions")
        .insert_many(&instructions)
        .await?;

    let step_images: Vec<Value> = inserted
        .iter()
        .zip(&draft.instructions)
        .filter_map(|(row, inst)| {
            inst.image.as_ref().map(|image| {
                image_row(
                    recipe_id,
                    Some(&row.id),
                    image,
                    Some(format!("Step {}", row.step_number)),
                )
            })
        })
        .collect();
    gateway
        .from("recipe_images")
        .insert_many::<_, Value>(&step_images)
        .await?;
    Ok(())
}

/// Create a recipe in the author's household.
pub async fn create_recipe(gateway: &impl Gateway, author_id: &str, draft: &RecipeDraft) -> ApiResult<Recipe> {
    draft.validate()?;
    let membership: Option<HouseholdMember> = gateway
        .from("household_members")
        .eq("user_id", author_id)
        .maybe_single()
        .await?;
    let membership =
        membership.ok_or_else(|| ApiError::Validation("Could not find your household".into()))?;

    let mut row = scalar_fields(draft);
    row["author_id"] = json!(author_id);
    row["household_id"] = json!(membership.household_id);
    row["parent_recipe_id"] = json!(draft.parent_recipe_id);
    let recipe: Recipe = gateway.from("recipes").insert(&row).await?;

    write_children(gateway, &recipe.id, draft).await?;
    tracing::info!(recipe_id = %recipe.id, "created recipe");
    Ok(recipe)
}

/// Replace a recipe's scalars and all of its ingredients, instructions and images.
pub async fn update_recipe(gateway: &impl Gateway, id: &str, draft: &RecipeDraft) -> ApiResult<()> {
    draft.validate()?;
    let mut patch = scalar_fields(draft);
    patch["updated_at"] = json!(chrono::Utc::now().to_rfc3339());
    let updated = gateway.from("recipes").eq("id", id).update(&patch).await?;
    if updated == 0 {
        return Err(ApiError::NotFound);
    }

    for table in ["ingredients", "instructions", "recipe_images"] {
        gateway.from(table).eq("recipe_id", id).delete().await?;
    }
    write_children(gateway, id, draft).await?;
    tracing::info!(recipe_id = %id, "updated recipe");
    Ok(())
}

pub async fn delete_recipe(gateway: &impl Gateway, id: &str) -> ApiResult<()> {
    gateway.from("recipes").eq("id", id).delete().await?;
    tracing::info!(recipe_id = %id, "deleted recipe");
    Ok(())
}

/// Starting draft for a variation of `parent_id`. Images are not inherited.
pub async fn load_variant_template(gateway: &impl Gateway, parent_id: &str) -> ApiResult<RecipeDraft> {
    let parent = load_recipe_detail(gateway, parent_id).await?;
    let mut draft = RecipeDraft::from_detail(&parent);
    draft.title = format!("{} (Variation)", parent.recipe.title);
    draft.parent_recipe_id = Some(parent.recipe.id);
    draft.main_image = None;
    for inst in &mut draft.instructions {
        inst.image = None;
    }
    Ok(draft)
}

#[derive(Deserialize)]
struct FavoriteRef {
    recipe_id: String,
}

pub async fn favorite_ids(gateway: &impl Gateway, user_id: &str) -> ApiResult<HashSet<String>> {
    let rows: Vec<FavoriteRef> = gateway
        .from("user_favorites")
        .select("recipe_id")
        .eq("user_id", user_id)
        .fetch()
        .await?;
    Ok(rows.into_iter().map(|r| r.recipe_id).collect())
}

pub async fn is_favorite(gateway: &impl Gateway, user_id: &str, recipe_id: &str) -> ApiResult<bool> {
    let row: Option<Value> = gateway
        .from("user_favorites")
        .select("id")
        .eq("user_id", user_id)
        .eq("recipe_id", recipe_id)
        .maybe_single()
        .await?;
    Ok(row.is_some())
}

/// Flip the favorite flag and return the new state.
pub async fn toggle_favorite(gateway: &impl Gateway, user_id: &str, recipe_id: &str) -> ApiResult<bool> {
    if is_favorite(gateway, user_id, recipe_id).await? {
        gateway
            .from("user_favorites")
            .eq("user_id", user_id)
            .eq("recipe_id", recipe_id)
            .delete()
            .await?;
        Ok(false)
    } else {
        gateway
            .from("user_favorites")
            .insert::<_, Value>(&json!({ "user_id": user_id, "recipe_id": recipe_id }))
            .await?;
        Ok(true)
    }
}

pub async fn list_cooking_notes(gateway: &impl Gateway, recipe_id: &str) -> ApiResult<Vec<CookingNote>> {
    gateway
        .from("cooking_notes")
        .eq("recipe_id", recipe_id)
        .order("cooked_on", false)
        .fetch()
        .await
}

/// Form input for a "cooked it" entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewCookingNote {
    /// `YYYY-MM-DD`
    pub cooked_on: String,
    pub multiplier: f64,
    pub rating: Option<u8>,
    pub notes: Option<String>,
}

impl NewCookingNote {
    /// Today's date, single batch, no rating.
    pub fn today() -> Self {
        Self {
            cooked_on: chrono::Utc::now().date_naive().to_string(),
            multiplier: 1.0,
            rating: None,
            notes: None,
        }
    }
}

pub async fn add_cooking_note(
    gateway: &impl Gateway,
    recipe_id: &str,
    user_id: &str,
    note: &NewCookingNote,
) -> ApiResult<CookingNote> {
    if note.rating.is_some_and(|r| !(1..=5).contains(&r)) {
        return Err(ApiError::Validation("Rating must be between 1 and 5".into()));
    }
    if note.multiplier <= 0.0 {
        return Err(ApiError::Validation("Multiplier must be positive".into()));
    }
    if chrono::NaiveDate::parse_from_str(&note.cooked_on, "%Y-%m-%d").is_err() {
        return Err(ApiError::Validation("Invalid date".into()));
    }
    gateway
        .from("cooking_notes")
        .insert(&json!({
            "recipe_id": recipe_id,
            "user_id": user_id,
            "cooked_on": note.cooked_on,
            "multiplier": note.multiplier,
            "rating": note.rating,
            "notes": note.notes.as_deref().map(blank_to_null).unwrap_or(Value::Null),
        }))
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::{IngredientDraft, InstructionDraft};
    use crate::gateway::MemoryGateway;
    use store::models::Unit;
    use store::MemoryStore;

    async fn seeded() -> MemoryGateway {
        let gateway = MemoryGateway::new();
        gateway
            .insert(
                "users",
                vec![json!({ "id": "u1", "email": "ada@example.com", "display_name": "Ada" })],
            )
            .await
            .unwrap();
        gateway
            .insert(
                "household_members",
                vec![json!({ "household_id": "h1", "user_id": "u1", "role": "owner" })],
            )
            .await
            .unwrap();
        gateway
    }

    fn image(name: &str) -> ImageRef {
        ImageRef {
            url: format!("https://cdn.example.com/{name}"),
            storage_path: name.to_string(),
        }
    }

    fn soup_draft() -> RecipeDraft {
        RecipeDraft {
            title: "Tomato Soup".into(),
            description: "Weeknight soup".into(),
            main_image: Some(image("main.jpg")),
            ingredients: vec![
                IngredientDraft {
                    name: "Tomatoes".into(),
                    qty_imperial: Some(2.0),
                    unit_imperial: Some(Unit::Lb),
                    ..Default::default()
                },
                IngredientDraft {
                    name: "Salt".into(),
                    unit_imperial: Some(Unit::ToTaste),
                    ..Default::default()
                },
            ],
            instructions: vec![
                InstructionDraft {
                    content: "Roast the tomatoes".into(),
                    image: Some(image("roast.jpg")),
                    ..Default::default()
                },
                InstructionDraft {
                    content: "Blend".into(),
                    ..Default::default()
                },
            ],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_then_load_detail() {
        let gateway = seeded().await;
        let recipe = create_recipe(&gateway, "u1", &soup_draft()).await.unwrap();
        assert_eq!(recipe.household_id, "h1");
        assert_eq!(recipe.author_id.as_deref(), Some("u1"));

        let detail = load_recipe_detail(&gateway, &recipe.id).await.unwrap();
        assert_eq!(detail.author.as_ref().unwrap().name(), "Ada");
        assert_eq!(detail.main_image().unwrap().storage_path, "main.jpg");

        let names: Vec<_> = detail.ingredients.iter().map(|i| (i.sort_order, i.name.as_str())).collect();
        assert_eq!(names, vec![(0, "Tomatoes"), (1, "Salt")]);

        assert_eq!(detail.instructions[0].step_number, 1);
        assert_eq!(detail.instructions[0].image.as_ref().unwrap().storage_path, "roast.jpg");
        assert_eq!(detail.instructions[1].step_number, 2);
        assert!(detail.instructions[1].image.is_none());

        let step_image = detail.images.iter().find(|img| !img.is_main()).unwrap();
        assert_eq!(step_image.caption.as_deref(), Some("Step 1"));
    }

    #[tokio::test]
    async fn test_create_requires_household() {
        let gateway = MemoryGateway::new();
        let err = create_recipe(&gateway, "nobody", &soup_draft()).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
        assert!(gateway.rows("recipes").is_empty());
    }

    #[tokio::test]
    async fn test_update_replaces_children() {
        let gateway = seeded().await;
        let recipe = create_recipe(&gateway, "u1", &soup_draft()).await.unwrap();

        let mut draft = RecipeDraft::from_detail(&load_recipe_detail(&gateway, &recipe.id).await.unwrap());
        draft.title = "Roasted Tomato Soup".into();
        draft.move_instruction(1, 0);
        draft.remove_ingredient(1);
        draft.main_image = None;
        update_recipe(&gateway, &recipe.id, &draft).await.unwrap();

        let detail = load_recipe_detail(&gateway, &recipe.id).await.unwrap();
        assert_eq!(detail.recipe.title, "Roasted Tomato Soup");
        assert!(!detail.recipe.updated_at.is_empty());
        assert_eq!(detail.ingredients.len(), 1);
        assert_eq!(detail.instructions[0].content, "Blend");
        assert_eq!(detail.instructions[1].image.as_ref().unwrap().storage_path, "roast.jpg");
        assert!(detail.main_image().is_none());
        assert_eq!(gateway.rows("recipe_images").len(), 1);
        assert_eq!(gateway.rows("instructions").len(), 2);
    }

    #[tokio::test]
    async fn test_update_missing_recipe() {
        let gateway = seeded().await;
        assert!(matches!(
            update_recipe(&gateway, "missing", &soup_draft()).await,
            Err(ApiError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_list_recipes_newest_first_with_display_image() {
        let gateway = seeded().await;
        gateway
            .insert(
                "recipes",
                vec![
                    json!({ "id": "old", "household_id": "h1", "author_id": "u1", "title": "Old", "servings": 2, "created_at": "2024-01-01T00:00:00Z" }),
                    json!({ "id": "new", "household_id": "h1", "title": "New", "servings": 2, "created_at": "2024-06-01T00:00:00Z" }),
                ],
            )
            .await
            .unwrap();
        gateway
            .insert(
                "recipe_images",
                vec![
                    json!({ "recipe_id": "old", "instruction_id": null, "url": "https://cdn/old.jpg", "storage_path": "old.jpg" }),
                    json!({ "recipe_id": "new", "instruction_id": "i9", "url": "https://cdn/step.jpg", "storage_path": "step.jpg" }),
                ],
            )
            .await
            .unwrap();

        let list = list_recipes(&gateway).await.unwrap();
        let ids: Vec<_> = list.iter().map(|s| s.recipe.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "old"]);
        assert!(list[0].display_image.is_none());
        assert_eq!(list[1].display_image.as_deref(), Some("https://cdn/old.jpg"));
        assert_eq!(list[1].author.as_ref().unwrap().name(), "Ada");
    }

    #[tokio::test]
    async fn test_offline_fallback() {
        let gateway = seeded().await;
        let cache = OfflineCache::new(MemoryStore::new());
        let recipe = create_recipe(&gateway, "u1", &soup_draft()).await.unwrap();

        let remote = load_recipe_or_offline(&gateway, &cache, &recipe.id).await.unwrap();
        assert!(!remote.is_offline());
        let saved = remote.detail().clone();
        save_offline(&cache, &saved, &[]).await.unwrap();

        gateway.set_offline(true);
        let loaded = load_recipe_or_offline(&gateway, &cache, &recipe.id).await.unwrap();
        assert!(loaded.is_offline());
        assert_eq!(loaded.detail(), &saved);
        assert_eq!(loaded.detail().ingredients, saved.ingredients);
        assert_eq!(loaded.detail().instructions, saved.instructions);
        let names: Vec<&str> = loaded.detail().ingredients.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["Tomatoes", "Salt"]);
        let steps: Vec<&str> = loaded.detail().instructions.iter().map(|i| i.content.as_str()).collect();
        assert_eq!(steps, ["Roast the tomatoes", "Blend"]);

        let err = load_recipe_or_offline(&gateway, &cache, "never-saved").await.unwrap_err();
        assert!(matches!(err, ApiError::Network(_)));
    }

    #[tokio::test]
    async fn test_variant_template() {
        let gateway = seeded().await;
        let parent = create_recipe(&gateway, "u1", &soup_draft()).await.unwrap();
        let draft = load_variant_template(&gateway, &parent.id).await.unwrap();
        assert_eq!(draft.title, "Tomato Soup (Variation)");
        assert_eq!(draft.parent_recipe_id.as_deref(), Some(parent.id.as_str()));
        assert_eq!(draft.ingredients.len(), 2);
        assert!(draft.main_image.is_none());
        assert!(draft.instructions.iter().all(|i| i.image.is_none()));

        let child = create_recipe(&gateway, "u1", &draft).await.unwrap();
        assert_eq!(child.parent_recipe_id, Some(parent.id));
    }

    #[tokio::test]
    async fn test_toggle_favorite() {
        let gateway = seeded().await;
        assert!(toggle_favorite(&gateway, "u1", "r1").await.unwrap());
        assert!(is_favorite(&gateway, "u1", "r1").await.unwrap());
        assert_eq!(favorite_ids(&gateway, "u1").await.unwrap(), HashSet::from(["r1".to_string()]));
        assert!(!toggle_favorite(&gateway, "u1", "r1").await.unwrap());
        assert!(favorite_ids(&gateway, "u1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cooking_notes() {
        let gateway = seeded().await;
        for date in ["2024-03-01", "2024-05-01"] {
            let note = NewCookingNote {
                cooked_on: date.into(),
                rating: Some(4),
                ..NewCookingNote::today()
            };
            add_cooking_note(&gateway, "r1", "u1", &note).await.unwrap();
        }
        let notes = list_cooking_notes(&gateway, "r1").await.unwrap();
        assert_eq!(notes[0].cooked_on, "2024-05-01");
        assert_eq!(notes.len(), 2);

        let bad = NewCookingNote {
            rating: Some(6),
            ..NewCookingNote::today()
        };
        assert!(matches!(
            add_cooking_note(&gateway, "r1", "u1", &bad).await,
            Err(ApiError::Validation(_))
        ));
    }

    fn summary(id: &str, title: &str, description: Option<&str>, category: RecipeCategory) -> RecipeSummary {
        RecipeSummary {
            recipe: Recipe {
                id: id.into(),
                author_id: None,
                household_id: "h1".into(),
                parent_recipe_id: None,
                title: title.into(),
                description: description.map(str::to_string),
                category,
                visibility: Default::default(),
                prep_time_minutes: None,
                cook_time_minutes: None,
                servings: 4,
                source_url: None,
                created_at: String::new(),
                updated_at: String::new(),
            },
            author: None,
            display_image: None,
        }
    }

    #[test]
    fn test_filter_recipes() {
        let recipes = vec![
            summary("a", "Sourdough", Some("Crusty loaf"), RecipeCategory::Baking),
            summary("b", "Lemonade", None, RecipeCategory::Beverage),
            summary("c", "Stew", Some("Hearty and CRUSTY bread on the side"), RecipeCategory::Cooking),
        ];
        let favorites = HashSet::from(["c".to_string()]);

        let ids = |filter: &RecipeFilter| -> Vec<String> {
            filter_recipes(&recipes, filter, &favorites)
                .iter()
                .map(|s| s.recipe.id.clone())
                .collect()
        };

        let mut filter = RecipeFilter {
            search: "crusty".into(),
            ..Default::default()
        };
        assert_eq!(ids(&filter), vec!["a", "c"]);

        filter.category = CategoryFilter::parse("baking");
        assert_eq!(ids(&filter), vec!["a"]);

        filter.category = CategoryFilter::parse("all");
        filter.favorites_only = true;
        assert_eq!(ids(&filter), vec!["c"]);

        assert_eq!(ids(&RecipeFilter::default()).len(), 3);
    }
}
