use api::draft::RecipeDraft;
use api::recipes::{load_recipe_detail, update_recipe};
use dioxus::prelude::*;

use crate::auth::{use_session, RequireAuth};
use crate::backend::use_backend;
use crate::components::{RecipeForm, Spinner};
use crate::views::RecipeNotFound;
use crate::BackLink;

#[derive(Clone, Copy, PartialEq)]
enum Loading {
    Pending,
    Ready,
    Missing,
    Forbidden,
}

#[component]
pub fn EditRecipeView(id: String) -> Element {
    rsx! {
        RequireAuth { EditRecipe { id } }
    }
}

#[component]
fn EditRecipe(id: String) -> Element {
    let backend = use_backend();
    let session = use_session();
    let mut draft = use_signal(RecipeDraft::default);
    let mut state = use_signal(|| Loading::Pending);
    let mut saving = use_signal(|| false);
    let mut error = use_signal(|| Option::<String>::None);

    {
        let backend = backend.clone();
        let id = id.clone();
        use_future(move || {
            let backend = backend.clone();
            let id = id.clone();
            async move {
                match load_recipe_detail(&backend.gateway, &id).await {
                    Ok(detail) => {
                        let user_id = session.peek().user().map(|u| u.id.clone());
                        if user_id.is_none() || detail.recipe.author_id != user_id {
                            state.set(Loading::Forbidden);
                            return;
                        }
                        draft.set(RecipeDraft::from_detail(&detail));
                        state.set(Loading::Ready);
                    }
                    Err(e) => {
                        tracing::warn!(recipe_id = %id, "failed to load recipe for editing: {e}");
                        state.set(Loading::Missing);
                    }
                }
            }
        });
    }

    let detail_href = format!("/recipes/{id}");

    let handle_submit = {
        let id = id.clone();
        let detail_href = detail_href.clone();
        move |_| {
            let backend = backend.clone();
            let id = id.clone();
            let detail_href = detail_href.clone();
            spawn(async move {
                saving.set(true);
                error.set(None);
                let payload = draft();
                match update_recipe(&backend.gateway, &id, &payload).await {
                    Ok(()) => {
                        navigator().push(detail_href);
                    }
                    Err(e) => {
                        tracing::warn!(recipe_id = %id, "failed to update recipe: {e}");
                        error.set(Some(e.to_string()));
                        saving.set(false);
                    }
                }
            });
        }
    };

    match state() {
        Loading::Pending => rsx! {
            div { class: "page-loading", Spinner { size: 32 } }
        },
        Loading::Missing => rsx! {
            RecipeNotFound {
                message: "The recipe you're trying to edit doesn't exist.",
                back_to: "/recipes",
                back_label: "Back to Recipes",
            }
        },
        Loading::Forbidden => rsx! {
            RecipeNotFound {
                message: "Only the author can edit this recipe.",
                back_to: detail_href,
                back_label: "Back to Recipe",
            }
        },
        Loading::Ready => {
            let cancel_href = detail_href.clone();
            rsx! {
                main {
                    class: "page page--narrow",
                    BackLink { to: detail_href, label: "Back to Recipe" }
                    h1 { "Edit Recipe" }
                    if let Some(err) = error() {
                        div { class: "alert alert--error", "{err}" }
                    }
                    RecipeForm {
                        draft,
                        submit_label: "Save Changes",
                        busy_label: "Saving...",
                        busy: saving(),
                        on_submit: handle_submit,
                        on_cancel: move |_| {
                            navigator().push(cancel_href.clone());
                        },
                    }
                }
            }
        }
    }
}
