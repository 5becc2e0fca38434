//! # Domain models for recipes and their parts
//!
//! Row shapes of the hosted recipe tables, as the client consumes them. They are
//! `Serialize + Deserialize` so the same types decode gateway responses, cross the
//! server/client boundary, and get embedded in offline snapshots.
//!
//! | Type | Table / role |
//! |------|--------------|
//! | [`Recipe`] | `recipes` row: scalar fields only. |
//! | [`Ingredient`] | `ingredients` row, ordered by `sort_order`. |
//! | [`Instruction`] | `instructions` row, ordered by `step_number`. Carries its step image when loaded for display. |
//! | [`CookingNote`] | `cooking_notes` row: a "cooked it" log entry. |
//! | [`RecipeImage`] | `recipe_images` row. The main image has no `instruction_id`. |
//! | [`AuthorInfo`] | `users` projection shown as the recipe author. |
//!
//! Identifiers and server timestamps stay as strings so the types work unchanged
//! in WASM.

use serde::{Deserialize, Serialize};

/// Recipe category.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecipeCategory {
    #[default]
    Cooking,
    Baking,
    Beverage,
    Other,
}

impl RecipeCategory {
    pub const ALL: [RecipeCategory; 4] = [
        RecipeCategory::Cooking,
        RecipeCategory::Baking,
        RecipeCategory::Beverage,
        RecipeCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RecipeCategory::Cooking => "cooking",
            RecipeCategory::Baking => "baking",
            RecipeCategory::Beverage => "beverage",
            RecipeCategory::Other => "other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == s)
    }
}

/// Per-recipe access tier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Private,
    #[default]
    Household,
    Followers,
    Public,
}

impl Visibility {
    pub const ALL: [Visibility; 4] = [
        Visibility::Private,
        Visibility::Household,
        Visibility::Followers,
        Visibility::Public,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Private => "private",
            Visibility::Household => "household",
            Visibility::Followers => "followers",
            Visibility::Public => "public",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.as_str() == s)
    }
}

/// Measurement unit for an ingredient quantity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    Tsp,
    Tbsp,
    Cup,
    FlOz,
    Pint,
    Quart,
    Gallon,
    Oz,
    Lb,
    Ml,
    L,
    G,
    Kg,
    Pinch,
    Dash,
    Piece,
    Whole,
    Slice,
    Clove,
    Sprig,
    Leaf,
    ToTaste,
    AsNeeded,
}

impl Unit {
    pub const IMPERIAL: [Unit; 9] = [
        Unit::Tsp,
        Unit::Tbsp,
        Unit::Cup,
        Unit::FlOz,
        Unit::Pint,
        Unit::Quart,
        Unit::Gallon,
        Unit::Oz,
        Unit::Lb,
    ];

    pub const METRIC: [Unit; 4] = [Unit::Ml, Unit::L, Unit::G, Unit::Kg];

    pub const OTHER: [Unit; 10] = [
        Unit::Pinch,
        Unit::Dash,
        Unit::Piece,
        Unit::Whole,
        Unit::Slice,
        Unit::Clove,
        Unit::Sprig,
        Unit::Leaf,
        Unit::ToTaste,
        Unit::AsNeeded,
    ];

    /// Wire name, as stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Tsp => "tsp",
            Unit::Tbsp => "tbsp",
            Unit::Cup => "cup",
            Unit::FlOz => "fl_oz",
            Unit::Pint => "pint",
            Unit::Quart => "quart",
            Unit::Gallon => "gallon",
            Unit::Oz => "oz",
            Unit::Lb => "lb",
            Unit::Ml => "ml",
            Unit::L => "l",
            Unit::G => "g",
            Unit::Kg => "kg",
            Unit::Pinch => "pinch",
            Unit::Dash => "dash",
            Unit::Piece => "piece",
            Unit::Whole => "whole",
            Unit::Slice => "slice",
            Unit::Clove => "clove",
            Unit::Sprig => "sprig",
            Unit::Leaf => "leaf",
            Unit::ToTaste => "to_taste",
            Unit::AsNeeded => "as_needed",
        }
    }

    /// Label shown next to a quantity.
    pub fn label(&self) -> &'static str {
        match self {
            Unit::FlOz => "fl oz",
            Unit::ToTaste => "to taste",
            Unit::AsNeeded => "as needed",
            other => other.as_str(),
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::IMPERIAL
            .into_iter()
            .chain(Self::METRIC)
            .chain(Self::OTHER)
            .find(|u| u.as_str() == s)
    }
}

/// A `recipes` row.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: String,
    #[serde(default)]
    pub author_id: Option<String>,
    pub household_id: String,
    #[serde(default)]
    pub parent_recipe_id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: RecipeCategory,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub prep_time_minutes: Option<u32>,
    #[serde(default)]
    pub cook_time_minutes: Option<u32>,
    pub servings: u32,
    #[serde(default)]
    pub source_url: Option<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

/// An `ingredients` row.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: String,
    pub recipe_id: String,
    pub name: String,
    #[serde(default)]
    pub qty_imperial: Option<f64>,
    #[serde(default)]
    pub unit_imperial: Option<Unit>,
    #[serde(default)]
    pub qty_metric: Option<f64>,
    #[serde(default)]
    pub unit_metric: Option<Unit>,
    pub sort_order: i32,
    #[serde(default)]
    pub notes: Option<String>,
}

/// An `instructions` row.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    pub id: String,
    pub recipe_id: String,
    pub step_number: u32,
    pub content: String,
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    #[serde(default)]
    pub temperature: Option<String>,
    /// Step image, attached client-side from `recipe_images`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageRef>,
}

/// A `cooking_notes` row.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CookingNote {
    pub id: String,
    pub recipe_id: String,
    pub user_id: String,
    /// Calendar date, `YYYY-MM-DD`.
    pub cooked_on: String,
    pub multiplier: f64,
    #[serde(default)]
    pub rating: Option<u8>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub created_at: String,
}

/// A `recipe_images` row.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecipeImage {
    pub id: String,
    pub recipe_id: String,
    #[serde(default)]
    pub instruction_id: Option<String>,
    pub url: String,
    pub storage_path: String,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub order_index: i32,
    #[serde(default)]
    pub created_at: String,
}

impl RecipeImage {
    pub fn is_main(&self) -> bool {
        self.instruction_id.is_none()
    }

    pub fn to_ref(&self) -> ImageRef {
        ImageRef {
            url: self.url.clone(),
            storage_path: self.storage_path.clone(),
        }
    }
}

/// An uploaded image: public URL plus object-storage path.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    pub url: String,
    pub storage_path: String,
}

/// Author projection joined onto a recipe.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AuthorInfo {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

impl AuthorInfo {
    pub fn name(&self) -> &str {
        self.display_name.as_deref().unwrap_or("Unknown")
    }
}

/// Pick the main image (no linked instruction) out of a recipe's images.
pub fn main_image(images: &[RecipeImage]) -> Option<&RecipeImage> {
    images.iter().find(|img| img.is_main())
}

/// Attach step images to their instructions by `instruction_id`.
pub fn attach_step_images(instructions: &mut [Instruction], images: &[RecipeImage]) {
    for inst in instructions.iter_mut() {
        inst.image = images
            .iter()
            .find(|img| img.instruction_id.as_deref() == Some(inst.id.as_str()))
            .map(RecipeImage::to_ref);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_wire_names() {
        assert_eq!(serde_json::to_string(&Unit::FlOz).unwrap(), "\"fl_oz\"");
        assert_eq!(Unit::parse("to_taste"), Some(Unit::ToTaste));
        assert_eq!(Unit::ToTaste.label(), "to taste");
        assert_eq!(Unit::parse("bucket"), None);
    }

    #[test]
    fn test_recipe_decodes_with_missing_optionals() {
        let recipe: Recipe = serde_json::from_value(serde_json::json!({
            "id": "r1",
            "household_id": "h1",
            "title": "Soup",
            "servings": 4,
            "category": "beverage",
            "visibility": "public"
        }))
        .unwrap();
        assert_eq!(recipe.category, RecipeCategory::Beverage);
        assert_eq!(recipe.visibility, Visibility::Public);
        assert!(recipe.description.is_none());
    }

    #[test]
    fn test_attach_step_images() {
        let mut instructions = vec![Instruction {
            id: "i1".into(),
            recipe_id: "r1".into(),
            step_number: 1,
            content: "Boil".into(),
            duration_minutes: None,
            temperature: None,
            image: None,
        }];
        let images = vec![
            RecipeImage {
                id: "img0".into(),
                recipe_id: "r1".into(),
                instruction_id: None,
                url: "https://cdn/main.jpg".into(),
                storage_path: "main.jpg".into(),
                caption: None,
                order_index: 0,
                created_at: String::new(),
            },
            RecipeImage {
                id: "img1".into(),
                recipe_id: "r1".into(),
                instruction_id: Some("i1".into()),
                url: "https://cdn/step.jpg".into(),
                storage_path: "step.jpg".into(),
                caption: Some("Step 1".into()),
                order_index: 0,
                created_at: String::new(),
            },
        ];

        attach_step_images(&mut instructions, &images);
        assert_eq!(instructions[0].image.as_ref().unwrap().storage_path, "step.jpg");
        assert_eq!(main_image(&images).unwrap().id, "img0");
    }
}
