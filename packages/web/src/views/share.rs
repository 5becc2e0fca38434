use dioxus::prelude::*;
use ui::views::SharedRecipeView;

/// Public page behind a share link; no sign-in needed.
#[component]
pub fn SharedRecipe(token: String) -> Element {
    rsx! { SharedRecipeView { token } }
}
