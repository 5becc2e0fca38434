use api::draft::RecipeDraft;
use api::recipes::{create_recipe, load_variant_template};
use dioxus::prelude::*;

use crate::auth::{use_session, RequireAuth};
use crate::backend::use_backend;
use crate::components::{RecipeForm, Spinner};
use crate::BackLink;

/// Create a recipe, or a variation of `variant_of` prefilled from its parent.
#[component]
pub fn NewRecipeView(variant_of: Option<String>) -> Element {
    rsx! {
        RequireAuth { NewRecipe { variant_of } }
    }
}

#[component]
fn NewRecipe(variant_of: Option<String>) -> Element {
    let backend = use_backend();
    let session = use_session();
    let mut draft = use_signal(RecipeDraft::default);
    let mut parent_title = use_signal(|| Option::<String>::None);
    let mut loading_parent = use_signal(|| variant_of.is_some());
    let mut saving = use_signal(|| false);
    let mut error = use_signal(|| Option::<String>::None);

    {
        let backend = backend.clone();
        let variant_of = variant_of.clone();
        use_future(move || {
            let backend = backend.clone();
            let variant_of = variant_of.clone();
            async move {
                let Some(parent_id) = variant_of else { return };
                match load_variant_template(&backend.gateway, &parent_id).await {
                    Ok(template) => {
                        parent_title.set(Some(
                            template.title.trim_end_matches(" (Variation)").to_string(),
                        ));
                        draft.set(template);
                    }
                    Err(e) => {
                        tracing::warn!(%parent_id, "failed to load parent recipe: {e}");
                        error.set(Some("Could not load the original recipe.".into()));
                    }
                }
                loading_parent.set(false);
            }
        });
    }

    let handle_submit = move |_| {
        let Some(user) = session.peek().user().cloned() else { return };
        let backend = backend.clone();
        spawn(async move {
            saving.set(true);
            error.set(None);
            let payload = draft();
            match create_recipe(&backend.gateway, &user.id, &payload).await {
                Ok(recipe) => {
                    navigator().push(format!("/recipes/{}", recipe.id));
                }
                Err(e) => {
                    tracing::warn!("failed to create recipe: {e}");
                    error.set(Some(e.to_string()));
                    saving.set(false);
                }
            }
        });
    };

    if loading_parent() {
        return rsx! {
            div {
                class: "page-loading",
                Spinner { size: 32 }
                p { class: "muted", "Loading parent recipe..." }
            }
        };
    }

    let heading = if variant_of.is_some() { "Create Recipe Variation" } else { "Create New Recipe" };

    rsx! {
        main {
            class: "page page--narrow",
            BackLink { to: "/recipes", label: "Back to Recipes" }
            h1 { "{heading}" }
            if let Some(title) = parent_title() {
                p { class: "muted", "Variation of: {title}" }
            }
            if let Some(err) = error() {
                div { class: "alert alert--error", "{err}" }
            }
            RecipeForm {
                draft,
                submit_label: "Create Recipe",
                busy_label: "Creating...",
                busy: saving(),
                on_submit: handle_submit,
                on_cancel: move |_| navigator().go_back(),
            }
        }
    }
}
