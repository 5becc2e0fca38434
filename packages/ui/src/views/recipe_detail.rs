use api::recipes::{delete_recipe, list_cooking_notes, load_recipe_or_offline};
use api::LoadedRecipe;
use dioxus::prelude::*;
use store::models::CookingNote;

use crate::auth::{use_session, RequireAuth};
use crate::backend::use_backend;
use crate::components::{CookingNoteModal, FavoriteButton, OfflineControl, ScaleControl, ShareModal, Spinner};
use crate::dates::{format_day, format_saved_at};
use crate::icons::{FaCodeBranch, FaPenToSquare, FaShareNodes, FaStar, FaTrash, FaWifi};
use crate::views::{RecipeBody, RecipeNotFound};
use crate::{BackLink, Icon};

#[component]
pub fn RecipeDetailView(id: String) -> Element {
    rsx! {
        RequireAuth { RecipeDetailPage { id } }
    }
}

#[component]
fn RecipeDetailPage(id: ReadSignal<String>) -> Element {
    let backend = use_backend();
    let session = use_session();
    let scale = use_signal(|| 1.0f64);
    let mut show_note_modal = use_signal(|| false);
    let mut show_share_modal = use_signal(|| false);
    let mut confirm_delete = use_signal(|| false);
    let mut deleting = use_signal(|| false);
    let mut notes_version = use_signal(|| 0u32);

    let loaded = {
        let backend = backend.clone();
        use_resource(move || {
            let backend = backend.clone();
            let recipe_id = id();
            async move {
                load_recipe_or_offline(&backend.gateway, &backend.cache, &recipe_id)
                    .await
                    .map_err(|e| e.to_string())
            }
        })
    };

    let notes = {
        let backend = backend.clone();
        use_resource(move || {
            let backend = backend.clone();
            let recipe_id = id();
            let _ = notes_version();
            let offline_notes = match &*loaded.read() {
                Some(Ok(LoadedRecipe::Offline { notes, .. })) => Some(notes.clone()),
                _ => None,
            };
            async move {
                if let Some(notes) = offline_notes {
                    return notes;
                }
                list_cooking_notes(&backend.gateway, &recipe_id).await.unwrap_or_else(|e| {
                    tracing::warn!(%recipe_id, "failed to load cooking notes: {e}");
                    Vec::new()
                })
            }
        })
    };

    let loaded_value = loaded.read_unchecked().clone();
    let loaded = match loaded_value {
        None => {
            return rsx! {
                div { class: "page-loading", Spinner { size: 32 } }
            };
        }
        Some(Err(e)) => {
            tracing::warn!(recipe_id = %id.peek(), "recipe unavailable: {e}");
            return rsx! {
                RecipeNotFound {
                    message: "The recipe you're looking for doesn't exist or you don't have access to it.",
                    back_to: "/recipes",
                    back_label: "Back to Recipes",
                }
            };
        }
        Some(Ok(loaded)) => loaded,
    };

    let detail = loaded.detail().clone();
    let saved_at = match &loaded {
        LoadedRecipe::Offline { saved_at, .. } => Some(*saved_at),
        LoadedRecipe::Remote(_) => None,
    };
    let is_offline = loaded.is_offline();
    let note_list: Vec<CookingNote> = notes.read_unchecked().clone().unwrap_or_default();
    let user_id = session().user().map(|u| u.id.clone());
    let is_author = !is_offline && user_id.is_some() && detail.recipe.author_id == user_id;
    let recipe_id = detail.recipe.id.clone();
    let title = detail.recipe.title.clone();

    let handle_delete = {
        let backend = backend.clone();
        let recipe_id = recipe_id.clone();
        move |_| {
            if !confirm_delete() {
                confirm_delete.set(true);
                return;
            }
            let backend = backend.clone();
            let recipe_id = recipe_id.clone();
            spawn(async move {
                deleting.set(true);
                match delete_recipe(&backend.gateway, &recipe_id).await {
                    Ok(()) => {
                        if let Err(e) = backend.cache.remove(&recipe_id).await {
                            tracing::warn!(%recipe_id, "failed to drop offline copy: {e}");
                        }
                        navigator().push("/recipes");
                    }
                    Err(e) => {
                        tracing::error!(%recipe_id, "failed to delete recipe: {e}");
                        deleting.set(false);
                        confirm_delete.set(false);
                    }
                }
            });
        }
    };

    let actions = rsx! {
        if !is_offline {
            FavoriteButton { recipe_id: recipe_id.clone() }
        }
        if is_author {
            button {
                class: "icon-btn",
                title: "Share",
                onclick: move |_| show_share_modal.set(true),
                Icon { icon: FaShareNodes, width: 16, height: 16 }
            }
            Link {
                to: format!("/recipes/{recipe_id}/edit"),
                class: "icon-btn",
                title: "Edit",
                Icon { icon: FaPenToSquare, width: 16, height: 16 }
            }
            button {
                class: if confirm_delete() { "btn btn--danger btn--sm" } else { "icon-btn icon-btn--danger" },
                title: "Delete",
                disabled: deleting(),
                onclick: handle_delete,
                if confirm_delete() {
                    if deleting() { "Deleting..." } else { "Confirm Delete" }
                } else {
                    Icon { icon: FaTrash, width: 16, height: 16 }
                }
            }
        }
    };

    let controls = rsx! {
        div {
            class: "recipe__controls",
            ScaleControl { scale }
            OfflineControl { detail: detail.clone(), notes: note_list.clone() }
        }
    };

    rsx! {
        main {
            class: "page page--narrow",
            div {
                class: "page-header",
                BackLink { to: "/recipes", label: "Back to Recipes" }
                if !is_offline {
                    Link {
                        to: format!("/recipes/new?variant_of={recipe_id}"),
                        class: "btn btn--outline btn--sm",
                        Icon { icon: FaCodeBranch, width: 14, height: 14 }
                        "Create Variation"
                    }
                }
            }

            if let Some(saved_at) = saved_at {
                div {
                    class: "alert alert--warning media",
                    Icon { icon: FaWifi, width: 16, height: 16 }
                    span { "You're viewing an offline copy saved {format_saved_at(saved_at)}. Changes made since then won't show." }
                }
            }

            RecipeBody { detail: detail.clone(), scale: scale(), actions, controls }

            section {
                class: "card stack",
                div {
                    class: "page-header",
                    h2 { "Cooking Notes" }
                    if !is_offline {
                        button {
                            class: "btn btn--primary btn--sm",
                            onclick: move |_| show_note_modal.set(true),
                            "+ Add Note"
                        }
                    }
                }
                if note_list.is_empty() {
                    p { class: "muted", "No cooking notes yet. Try this recipe and log your experience!" }
                } else {
                    for note in note_list {
                        NoteEntry { key: "{note.id}", note }
                    }
                }
            }
        }

        if show_note_modal() {
            CookingNoteModal {
                recipe_id: recipe_id.clone(),
                on_close: move |_| show_note_modal.set(false),
                on_saved: move |_| notes_version += 1,
            }
        }
        if show_share_modal() {
            ShareModal {
                recipe_id: recipe_id.clone(),
                recipe_title: title,
                on_close: move |_| show_share_modal.set(false),
            }
        }
    }
}

#[component]
fn NoteEntry(note: CookingNote) -> Element {
    let rating = note.rating.unwrap_or(0);
    rsx! {
        div {
            class: "note-entry",
            div {
                class: "note-entry__header",
                strong { "{format_day(&note.cooked_on)}" }
                if note.multiplier != 1.0 {
                    span { class: "badge", "{note.multiplier}x scaled" }
                }
                if rating > 0 {
                    span {
                        class: "stars",
                        for star in 1..=5u8 {
                            span {
                                key: "{star}",
                                class: if star <= rating { "star star--on" } else { "star" },
                                Icon { icon: FaStar, width: 12, height: 12 }
                            }
                        }
                    }
                }
            }
            if let Some(text) = note.notes.as_ref() {
                p { class: "small", "{text}" }
            }
        }
    }
}
