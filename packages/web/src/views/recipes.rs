use dioxus::prelude::*;
use ui::views::{EditRecipeView, NewRecipeView, RecipeDetailView, RecipeListView};

#[component]
pub fn Recipes() -> Element {
    rsx! { RecipeListView {} }
}

/// `variant_of` arrives as an empty string when the query is absent.
#[component]
pub fn NewRecipe(variant_of: String) -> Element {
    let variant_of = Some(variant_of).filter(|id| !id.is_empty());
    rsx! { NewRecipeView { variant_of } }
}

#[component]
pub fn RecipeDetail(id: String) -> Element {
    rsx! { RecipeDetailView { id } }
}

#[component]
pub fn EditRecipe(id: String) -> Element {
    rsx! { EditRecipeView { id } }
}
