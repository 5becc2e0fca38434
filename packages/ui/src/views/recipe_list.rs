use std::collections::HashSet;

use api::recipes::{favorite_ids, filter_recipes, list_recipes, CategoryFilter, RecipeFilter};
use api::RecipeSummary;
use dioxus::prelude::*;
use store::models::RecipeCategory;

use crate::auth::{use_session, RequireAuth, SignOutButton};
use crate::backend::use_backend;
use crate::components::{RecipeCard, Spinner, ViewMode};
use crate::icons::{FaBorderAll, FaGlobe, FaGear, FaHeart, FaList, FaMagnifyingGlass, FaPlus, FaSquare, FaWifi};
use crate::{Icon, Navbar};

#[derive(Clone, PartialEq)]
struct ListData {
    recipes: Vec<RecipeSummary>,
    favorites: HashSet<String>,
}

#[component]
pub fn RecipeListView() -> Element {
    rsx! {
        RequireAuth { RecipeList {} }
    }
}

#[component]
fn RecipeList() -> Element {
    let backend = use_backend();
    let session = use_session();
    let mut search = use_signal(String::new);
    let mut category = use_signal(CategoryFilter::default);
    let mut favorites_only = use_signal(|| false);
    let mut view_mode = use_signal({
        let backend = backend.clone();
        move || ViewMode::load(&backend.prefs)
    });

    let data = {
        let backend = backend.clone();
        use_resource(move || {
            let backend = backend.clone();
            let user_id = session().user().map(|u| u.id.clone());
            async move {
                let recipes = list_recipes(&backend.gateway).await.map_err(|e| e.to_string())?;
                let favorites = match user_id {
                    Some(id) => favorite_ids(&backend.gateway, &id).await.unwrap_or_else(|e| {
                        tracing::warn!("failed to load favorites: {e}");
                        HashSet::new()
                    }),
                    None => HashSet::new(),
                };
                Ok::<_, String>(ListData { recipes, favorites })
            }
        })
    };

    use_effect(move || view_mode().save(&backend.prefs));

    let filter = RecipeFilter {
        search: search(),
        category: category(),
        favorites_only: favorites_only(),
    };
    let has_filters = !filter.search.trim().is_empty() || filter.category != CategoryFilter::All;
    let mode = view_mode();

    let body = match &*data.read_unchecked() {
        None => rsx! {
            div {
                class: "page-loading",
                Spinner { size: 32 }
                p { class: "muted", "Loading recipes..." }
            }
        },
        Some(Err(e)) => rsx! {
            div { class: "alert alert--error", "Failed to load recipes: {e}" }
        },
        Some(Ok(list)) => {
            let visible: Vec<RecipeSummary> = filter_recipes(&list.recipes, &filter, &list.favorites)
                .into_iter()
                .cloned()
                .collect();
            let count = visible.len();
            if visible.is_empty() {
                let (title, message) = if filter.favorites_only {
                    ("No Favorites Yet", "Start favoriting recipes to see them here!")
                } else if has_filters {
                    ("No Recipes Found", "Try adjusting your search or filters.")
                } else {
                    ("No Recipes Yet", "Get started by adding your first recipe!")
                };
                rsx! {
                    div {
                        class: "empty-state card",
                        h3 { "{title}" }
                        p { class: "muted", "{message}" }
                        if !filter.favorites_only && !has_filters {
                            Link {
                                to: "/recipes/new",
                                class: "btn btn--primary",
                                Icon { icon: FaPlus, width: 14, height: 14 }
                                "Add Recipe"
                            }
                        }
                    }
                }
            } else {
                let grid_class = match mode {
                    ViewMode::Grid => "recipe-grid",
                    ViewMode::Card => "recipe-grid recipe-grid--wide",
                    ViewMode::List => "recipe-list",
                };
                rsx! {
                    p { class: "muted small", if count == 1 { "1 recipe" } else { "{count} recipes" } }
                    div {
                        class: grid_class,
                        for summary in visible {
                            RecipeCard { key: "{summary.recipe.id}", summary, mode }
                        }
                    }
                }
            }
        }
    };

    rsx! {
        Navbar {
            Link {
                to: "/community",
                class: "navbar__link",
                Icon { icon: FaGlobe, width: 16, height: 16 }
                span { "Community" }
            }
            Link {
                to: "/offline",
                class: "navbar__link",
                Icon { icon: FaWifi, width: 16, height: 16 }
                span { "Offline Recipes" }
            }
            Link {
                to: "/settings",
                class: "navbar__link",
                Icon { icon: FaGear, width: 16, height: 16 }
                span { "Settings" }
            }
            SignOutButton { class: "navbar__link" }
        }

        main {
            class: "page",
            div {
                class: "page-header",
                h1 { "My Recipes" }
                Link {
                    to: "/recipes/new",
                    class: "btn btn--primary",
                    Icon { icon: FaPlus, width: 14, height: 14 }
                    "Add Recipe"
                }
            }

            div {
                class: "card toolbar",
                div {
                    class: "search",
                    Icon { icon: FaMagnifyingGlass, width: 14, height: 14 }
                    input {
                        r#type: "search",
                        class: "input",
                        placeholder: "Search recipes...",
                        value: "{search}",
                        oninput: move |e| search.set(e.value()),
                    }
                }
                select {
                    class: "input",
                    onchange: move |e| category.set(CategoryFilter::parse(&e.value())),
                    option { value: "all", selected: category() == CategoryFilter::All, "All Categories" }
                    for c in RecipeCategory::ALL {
                        option {
                            key: "{c.as_str()}",
                            value: "{c.as_str()}",
                            selected: category() == CategoryFilter::Only(c),
                            "{category_name(c)}"
                        }
                    }
                }
                button {
                    class: if favorites_only() { "btn btn--favorite btn--active" } else { "btn btn--outline" },
                    onclick: move |_| favorites_only.toggle(),
                    Icon { icon: FaHeart, width: 14, height: 14 }
                    if favorites_only() { "Show All" } else { "Favorites Only" }
                }
                div {
                    class: "view-toggle",
                    button {
                        class: if mode == ViewMode::Grid { "icon-btn icon-btn--active" } else { "icon-btn" },
                        title: "Grid view",
                        onclick: move |_| view_mode.set(ViewMode::Grid),
                        Icon { icon: FaBorderAll, width: 14, height: 14 }
                    }
                    button {
                        class: if mode == ViewMode::Card { "icon-btn icon-btn--active" } else { "icon-btn" },
                        title: "Card view",
                        onclick: move |_| view_mode.set(ViewMode::Card),
                        Icon { icon: FaSquare, width: 14, height: 14 }
                    }
                    button {
                        class: if mode == ViewMode::List { "icon-btn icon-btn--active" } else { "icon-btn" },
                        title: "List view",
                        onclick: move |_| view_mode.set(ViewMode::List),
                        Icon { icon: FaList, width: 14, height: 14 }
                    }
                }
            }

            {body}
        }
    }
}

fn category_name(category: RecipeCategory) -> &'static str {
    match category {
        RecipeCategory::Cooking => "Cooking",
        RecipeCategory::Baking => "Baking",
        RecipeCategory::Beverage => "Beverages",
        RecipeCategory::Other => "Other",
    }
}
