//! Editor model for the new/edit recipe forms.
//!
//! Ingredients and instructions are reordered with explicit index moves, so
//! buttons, keyboard shortcuts and drag handles all funnel into the same
//! operations. Instruction step numbers are renumbered `1..=n` after every
//! structural change.

use serde::{Deserialize, Serialize};
use store::models::{ImageRef, Ingredient, Instruction, RecipeCategory, Unit, Visibility};

use crate::error::{ApiError, ApiResult};
use crate::recipes::RecipeDetail;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct IngredientDraft {
    pub name: String,
    pub qty_imperial: Option<f64>,
    pub unit_imperial: Option<Unit>,
    pub qty_metric: Option<f64>,
    pub unit_metric: Option<Unit>,
    pub notes: Option<String>,
}

impl From<&Ingredient> for IngredientDraft {
    fn from(ing: &Ingredient) -> Self {
        Self {
            name: ing.name.clone(),
            qty_imperial: ing.qty_imperial,
            unit_imperial: ing.unit_imperial,
            qty_metric: ing.qty_metric,
            unit_metric: ing.unit_metric,
            notes: ing.notes.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InstructionDraft {
    pub step_number: u32,
    pub content: String,
    pub duration_minutes: Option<u32>,
    pub temperature: Option<String>,
    pub image: Option<ImageRef>,
}

impl From<&Instruction> for InstructionDraft {
    fn from(inst: &Instruction) -> Self {
        Self {
            step_number: inst.step_number,
            content: inst.content.clone(),
            duration_minutes: inst.duration_minutes,
            temperature: inst.temperature.clone(),
            image: inst.image.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeDraft {
    pub title: String,
    pub description: String,
    pub category: RecipeCategory,
    pub visibility: Visibility,
    pub prep_time_minutes: Option<u32>,
    pub cook_time_minutes: Option<u32>,
    pub servings: u32,
    pub source_url: String,
    pub parent_recipe_id: Option<String>,
    pub main_image: Option<ImageRef>,
    pub ingredients: Vec<IngredientDraft>,
    pub instructions: Vec<InstructionDraft>,
}

impl Default for RecipeDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            category: RecipeCategory::Cooking,
            visibility: Visibility::Household,
            prep_time_minutes: None,
            cook_time_minutes: None,
            servings: 4,
            source_url: String::new(),
            parent_recipe_id: None,
            main_image: None,
            ingredients: Vec::new(),
            instructions: Vec::new(),
        }
    }
}

impl RecipeDraft {
    /// Pre-fill the edit form from a loaded recipe.
    pub fn from_detail(detail: &RecipeDetail) -> Self {
        let r = &detail.recipe;
        Self {
            title: r.title.clone(),
            description: r.description.clone().unwrap_or_default(),
            category: r.category,
            visibility: r.visibility,
            prep_time_minutes: r.prep_time_minutes,
            cook_time_minutes: r.cook_time_minutes,
            servings: r.servings,
            source_url: r.source_url.clone().unwrap_or_default(),
            parent_recipe_id: r.parent_recipe_id.clone(),
            main_image: detail.main_image().map(|img| img.to_ref()),
            ingredients: detail.ingredients.iter().map(IngredientDraft::from).collect(),
            instructions: detail.instructions.iter().map(InstructionDraft::from).collect(),
        }
    }

    pub fn validate(&self) -> ApiResult<()> {
        if self.title.trim().is_empty() {
            return Err(ApiError::Validation("Title is required".into()));
        }
        if self.servings == 0 {
            return Err(ApiError::Validation("Servings must be at least 1".into()));
        }
        Ok(())
    }

    pub fn add_ingredient(&mut self) {
        self.ingredients.push(IngredientDraft::default());
    }

    pub fn add_instruction(&mut self) {
        self.instructions.push(InstructionDraft {
            step_number: self.instructions.len() as u32 + 1,
            ..Default::default()
        });
    }

    pub fn move_ingredient(&mut self, from: usize, to: usize) -> bool {
        move_item(&mut self.ingredients, from, to)
    }

    pub fn remove_ingredient(&mut self, index: usize) -> Option<IngredientDraft> {
        remove_item(&mut self.ingredients, index)
    }

    pub fn move_instruction(&mut self, from: usize, to: usize) -> bool {
        let moved = move_item(&mut self.instructions, from, to);
        renumber(&mut self.instructions);
        moved
    }

    pub fn remove_instruction(&mut self, index: usize) -> Option<InstructionDraft> {
        let removed = remove_item(&mut self.instructions, index);
        renumber(&mut self.instructions);
        removed
    }
}

/// Move the element at `from` so it ends up at index `to`. Out-of-range
/// indices leave the list untouched and return `false`.
pub fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) -> bool {
    if from >= items.len() || to >= items.len() || from == to {
        return false;
    }
    let item = items.remove(from);
    items.insert(to, item);
    true
}

pub fn move_up<T>(items: &mut Vec<T>, index: usize) -> bool {
    index > 0 && move_item(items, index, index - 1)
}

pub fn move_down<T>(items: &mut Vec<T>, index: usize) -> bool {
    move_item(items, index, index + 1)
}

pub fn remove_item<T>(items: &mut Vec<T>, index: usize) -> Option<T> {
    (index < items.len()).then(|| items.remove(index))
}

pub fn renumber(instructions: &mut [InstructionDraft]) {
    for (i, inst) in instructions.iter_mut().enumerate() {
        inst.step_number = i as u32 + 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn steps(contents: &[&str]) -> RecipeDraft {
        let mut draft = RecipeDraft::default();
        for c in contents {
            draft.add_instruction();
            draft.instructions.last_mut().unwrap().content = c.to_string();
        }
        draft
    }

    fn contents(draft: &RecipeDraft) -> Vec<(u32, &str)> {
        draft
            .instructions
            .iter()
            .map(|i| (i.step_number, i.content.as_str()))
            .collect()
    }

    #[test]
    fn test_move_instruction_renumbers() {
        let mut draft = steps(&["chop", "fry", "serve"]);
        assert!(draft.move_instruction(2, 0));
        assert_eq!(contents(&draft), vec![(1, "serve"), (2, "chop"), (3, "fry")]);

        assert!(move_down(&mut draft.instructions, 0));
        renumber(&mut draft.instructions);
        assert_eq!(contents(&draft), vec![(1, "chop"), (2, "serve"), (3, "fry")]);
    }

    #[test]
    fn test_remove_instruction_renumbers() {
        let mut draft = steps(&["chop", "fry", "serve"]);
        let removed = draft.remove_instruction(0).unwrap();
        assert_eq!(removed.content, "chop");
        assert_eq!(contents(&draft), vec![(1, "fry"), (2, "serve")]);
        assert!(draft.remove_instruction(5).is_none());
    }

    #[test]
    fn test_moves_at_bounds_are_noops() {
        let mut items = vec!['a', 'b', 'c'];
        assert!(!move_up(&mut items, 0));
        assert!(!move_down(&mut items, 2));
        assert!(!move_item(&mut items, 1, 7));
        assert_eq!(items, vec!['a', 'b', 'c']);

        assert!(move_up(&mut items, 2));
        assert_eq!(items, vec!['a', 'c', 'b']);
    }

    #[test]
    fn test_validate() {
        let mut draft = RecipeDraft::default();
        assert!(draft.validate().is_err());
        draft.title = "Soup".into();
        assert!(draft.validate().is_ok());
        draft.servings = 0;
        assert!(draft.validate().is_err());
    }
}
