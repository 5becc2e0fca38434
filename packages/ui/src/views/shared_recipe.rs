use api::sharing::get_shared_recipe;
use dioxus::prelude::*;

use crate::backend::use_backend;
use crate::components::{ScaleControl, Spinner};
use crate::icons::FaBookOpen;
use crate::views::{RecipeBody, RecipeNotFound};
use crate::Icon;

/// Public, read-only view of a recipe reached through a share link.
/// Needs no session.
#[component]
pub fn SharedRecipeView(token: ReadSignal<String>) -> Element {
    let backend = use_backend();
    let scale = use_signal(|| 1.0f64);

    let recipe = use_resource(move || {
        let backend = backend.clone();
        let token = token();
        async move {
            get_shared_recipe(&backend.gateway, &token).await.unwrap_or_else(|e| {
                tracing::warn!("shared recipe lookup failed: {e}");
                None
            })
        }
    });

    let detail = match recipe.read_unchecked().clone() {
        None => {
            return rsx! {
                div { class: "page-loading", Spinner { size: 32 } }
            };
        }
        Some(None) => {
            return rsx! {
                RecipeNotFound {
                    message: "This share link might be invalid or has been revoked by the owner.",
                    back_to: "/",
                    back_label: "Go to Home",
                }
            };
        }
        Some(Some(detail)) => detail,
    };

    rsx! {
        header {
            class: "navbar",
            Link {
                to: "/",
                class: "navbar__brand",
                Icon { icon: FaBookOpen, width: 20, height: 20 }
                span { "Recipe Box" }
            }
            Link { to: "/login", class: "btn btn--primary btn--sm", "Log in to Save" }
        }
        main {
            class: "page page--narrow",
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
