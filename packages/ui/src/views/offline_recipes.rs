//! Recipes saved on this device, readable without a session.

use api::scaling::format_time;
use api::RecipeDetail;
use dioxus::prelude::*;
use store::OfflineRecipe;

use crate::backend::use_backend;
use crate::components::{ScaleControl, Spinner};
use crate::dates::format_saved_at;
use crate::icons::{FaClock, FaTrash, FaUsers, FaWifi};
use crate::views::{RecipeBody, RecipeNotFound};
use crate::{BackLink, Icon};

#[component]
pub fn OfflineRecipesView() -> Element {
    let backend = use_backend();
    let mut version = use_signal(|| 0u32);

    let recipes = {
        let backend = backend.clone();
        use_resource(move || {
            let backend = backend.clone();
            let _ = version();
            async move {
                backend.cache.list_all().await.unwrap_or_else(|e| {
                    tracing::warn!("failed to list offline recipes: {e}");
                    Vec::new()
                })
            }
        })
    };

    let remove = use_callback(move |id: String| {
        let backend = backend.clone();
        spawn(async move {
            match backend.cache.remove(&id).await {
                Ok(()) => version += 1,
                Err(e) => tracing::warn!(recipe_id = %id, "failed to remove offline copy: {e}"),
            }
        });
    });

    rsx! {
        header {
            class: "navbar",
            BackLink { to: "/recipes", label: "Back to Online Recipes" }
            span {
                class: "badge badge--warning",
                Icon { icon: FaWifi, width: 12, height: 12 }
                " Offline Mode"
            }
        }
        main {
            class: "page",
            h1 { "Saved for Offline" }
            match recipes.read_unchecked().clone() {
                None => rsx! {
                    div { class: "page-loading", Spinner { size: 32 } }
                },
                Some(list) if list.is_empty() => rsx! {
                    div {
                        class: "card empty-state",
                        Icon { icon: FaWifi, width: 32, height: 32 }
                        h3 { "No Offline Recipes" }
                        p {
                            class: "muted",
                            "Save recipes for shopping by clicking the \"Save for Shopping\" button on any recipe detail page."
                        }
                    }
                },
                Some(list) => rsx! {
                    div {
                        class: "recipe-grid",
                        for recipe in list {
                            OfflineCard { key: "{recipe.id()}", recipe, on_remove: remove }
                        }
                    }
                },
            }
        }
    }
}

#[component]
fn OfflineCard(recipe: OfflineRecipe, on_remove: EventHandler<String>) -> Element {
    let id = recipe.id().to_string();
    let total = format_time(Some(
        recipe.recipe.prep_time_minutes.unwrap_or(0) + recipe.recipe.cook_time_minutes.unwrap_or(0),
    ));
    let saved = format_saved_at(recipe.saved_at);

    rsx! {
        div {
            class: "recipe-card",
            Link {
                to: format!("/offline/{id}"),
                class: "recipe-card__link",
                div {
                    class: "recipe-card__placeholder",
                    span { class: "badge badge--success", "Offline Ready" }
                }
                div {
                    class: "recipe-card__body",
                    h3 { "{recipe.title()}" }
                    div {
                        class: "recipe-card__meta muted small",
                        if let Some(total) = total {
                            span {
                                Icon { icon: FaClock, width: 12, height: 12 }
                                " {total}"
                            }
                        }
                        span {
                            Icon { icon: FaUsers, width: 12, height: 12 }
                            " {recipe.recipe.servings}"
                        }
                    }
                    p { class: "muted tiny", "Saved {saved}" }
                }
            }
            button {
                class: "icon-btn icon-btn--danger recipe-card__remove",
                title: "Remove offline copy",
                onclick: move |_| on_remove.call(id.clone()),
                Icon { icon: FaTrash, width: 14, height: 14 }
            }
        }
    }
}

/// One offline snapshot, rendered without touching the network.
#[component]
pub fn OfflineRecipeView(id: ReadSignal<String>) -> Element {
    let backend = use_backend();
    let scale = use_signal(|| 1.0f64);

    let snapshot = use_resource(move || {
        let backend = backend.clone();
        let recipe_id = id();
        async move {
            backend.cache.get(&recipe_id).await.unwrap_or_else(|e| {
                tracing::warn!(%recipe_id, "offline lookup failed: {e}");
                None
            })
        }
    });

    let snapshot = match snapshot.read_unchecked().clone() {
        None => {
            return rsx! {
                div { class: "page-loading", Spinner { size: 32 } }
            };
        }
        Some(None) => {
            return rsx! {
                RecipeNotFound {
                    message: "This recipe is not saved on this device.",
                    back_to: "/offline",
                    back_label: "Back to Offline Recipes",
                }
            };
        }
        Some(Some(snapshot)) => snapshot,
    };

    let saved = format_saved_at(snapshot.saved_at);
    let (detail, _notes) = RecipeDetail::from_offline(snapshot);

    rsx! {
        main {
            class: "page page--narrow",
            BackLink { to: "/offline", label: "Back to Offline Recipes" }
            div {
                class: "alert alert--warning media",
                Icon { icon: FaWifi, width: 16, height: 16 }
                span { "Offline copy saved {saved}." }
            }
            RecipeBody {
                detail,
                scale: scale(),
                controls: rsx! {
                    div { class: "recipe__controls", ScaleControl { scale } }
                },
            }
        }
    }
}
