use api::RecipeDetail;
use dioxus::prelude::*;
use store::models::CookingNote;

use crate::backend::use_backend;
use crate::icons::{FaCheck, FaDownload, FaRotate};
use crate::Icon;

/// Save or drop the offline snapshot of a loaded recipe.
#[component]
pub fn OfflineControl(detail: RecipeDetail, notes: Vec<CookingNote>) -> Element {
    let backend = use_backend();
    let mut saved = use_signal(|| false);
    let mut loading = use_signal(|| true);
    let mut error = use_signal(|| Option::<&'static str>::None);

    {
        let backend = backend.clone();
        let id = detail.recipe.id.clone();
        use_resource(move || {
            let backend = backend.clone();
            let id = id.clone();
            async move {
                match backend.cache.exists(&id).await {
                    Ok(exists) => saved.set(exists),
                    Err(e) => tracing::warn!(recipe_id = %id, "offline lookup failed: {e}"),
                }
                loading.set(false);
            }
        });
    }

    let toggle = move |_| {
        let backend = backend.clone();
        let detail = detail.clone();
        let notes = notes.clone();
        spawn(async move {
            loading.set(true);
            error.set(None);
            let result = if saved() {
                backend
                    .cache
                    .remove(&detail.recipe.id)
                    .await
                    .map(|_| false)
                    .map_err(api::ApiError::from)
            } else {
                api::recipes::save_offline(&backend.cache, &detail, &notes)
                    .await
                    .map(|_| true)
            };
            match result {
                Ok(now) => saved.set(now),
                Err(e) => {
                    tracing::error!(recipe_id = %detail.recipe.id, "failed to update offline status: {e}");
                    error.set(Some("Failed to update offline status. Please try again."));
                }
            }
            loading.set(false);
        });
    };

    let (class, title) = if saved() {
        ("pill pill--saved", "Saved for offline use")
    } else {
        ("pill", "Save for shopping offline")
    };

    rsx! {
        button {
            class: "{class}",
            title: "{title}",
            disabled: loading(),
            onclick: toggle,
            if loading() {
                span { class: "spinner", Icon { icon: FaRotate, width: 14, height: 14 } }
            } else if saved() {
                Icon { icon: FaCheck, width: 14, height: 14 }
                span { "Saved Offline" }
            } else {
                Icon { icon: FaDownload, width: 14, height: 14 }
                span { "Save for Shopping" }
            }
        }
        if let Some(err) = error() {
            span { class: "error-text small", "{err}" }
        }
    }
}
