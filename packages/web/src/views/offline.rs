use dioxus::prelude::*;
use ui::views::{OfflineRecipeView, OfflineRecipesView};

#[component]
pub fn OfflineRecipes() -> Element {
    rsx! { OfflineRecipesView {} }
}

#[component]
pub fn OfflineRecipe(id: String) -> Element {
    rsx! { OfflineRecipeView { id } }
}
