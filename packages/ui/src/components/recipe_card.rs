use api::scaling::format_time;
use api::RecipeSummary;
use dioxus::prelude::*;
use serde::{Deserialize, Serialize};
use store::KeyValueStore;

use crate::components::FavoriteButton;
use crate::icons::{FaClock, FaUsers, FaUtensils};
use crate::Icon;

const VIEW_MODE_KEY: &str = "recipe-box-view-mode";

/// Layout of the recipe list, remembered across visits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    #[default]
    Grid,
    Card,
    List,
}

impl ViewMode {
    pub fn load(store: &impl KeyValueStore) -> Self {
        match store.get_item(VIEW_MODE_KEY) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_default(),
            Ok(None) => Self::default(),
            Err(e) => {
                tracing::warn!("failed to read view mode: {e}");
                Self::default()
            }
        }
    }

    pub fn save(self, store: &impl KeyValueStore) {
        let result = serde_json::to_string(&self)
            .map_err(store::StoreError::from)
            .and_then(|raw| store.set_item(VIEW_MODE_KEY, &raw));
        if let Err(e) = result {
            tracing::warn!("failed to save view mode: {e}");
        }
    }
}

#[component]
pub fn RecipeCard(summary: RecipeSummary, mode: ViewMode) -> Element {
    let recipe = &summary.recipe;
    let href = format!("/recipes/{}", recipe.id);
    let total = format_time(Some(
        recipe.prep_time_minutes.unwrap_or(0) + recipe.cook_time_minutes.unwrap_or(0),
    ));
    let author = summary.author.as_ref().map_or("Unknown", |a| a.name()).to_string();
    let description = recipe.description.clone().filter(|d| !d.is_empty());
    let class = match mode {
        ViewMode::Grid => "recipe-card",
        ViewMode::Card => "recipe-card recipe-card--large",
        ViewMode::List => "recipe-row",
    };

    if mode == ViewMode::List {
        return rsx! {
            div {
                class: "{class}",
                Link {
                    to: href.clone(),
                    class: "recipe-row__link",
                    span { class: "recipe-row__title", "{recipe.title}" }
                    span { class: "badge", "{recipe.category.as_str()}" }
                    if let Some(total) = total {
                        span { class: "muted small", Icon { icon: FaClock, width: 12, height: 12 } " {total}" }
                    }
                    span { class: "muted small", "By {author}" }
                }
                FavoriteButton { recipe_id: recipe.id.clone() }
            }
        };
    }

    rsx! {
        div {
            class: "{class}",
            Link {
                to: href.clone(),
                class: "recipe-card__image",
                if let Some(url) = summary.display_image.clone() {
                    img { src: "{url}", alt: "{recipe.title}" }
                } else {
                    div {
                        class: "recipe-card__placeholder",
                        Icon { icon: FaUtensils, width: 48, height: 48 }
                    }
                }
                div {
                    class: "recipe-card__favorite",
                    FavoriteButton { recipe_id: recipe.id.clone() }
                }
            }
            Link {
                to: href,
                class: "recipe-card__body",
                div {
                    class: "recipe-card__heading",
                    h3 { "{recipe.title}" }
                    span { class: "badge", "{recipe.category.as_str()}" }
                }
                if let Some(description) = description {
                    p { class: "recipe-card__description", "{description}" }
                }
                div {
                    class: "recipe-card__meta",
                    if let Some(total) = total {
                        span { Icon { icon: FaClock, width: 14, height: 14 } " {total}" }
                    }
                    span { Icon { icon: FaUsers, width: 14, height: 14 } " {recipe.servings} servings" }
                }
                div { class: "recipe-card__author", "By {author}" }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use store::MemoryStore;

    #[test]
    fn test_view_mode_persists() {
        let prefs = MemoryStore::new();
        assert_eq!(ViewMode::load(&prefs), ViewMode::Grid);

        ViewMode::List.save(&prefs);
        assert_eq!(prefs.get_item(VIEW_MODE_KEY).unwrap().as_deref(), Some("\"list\""));
        assert_eq!(ViewMode::load(&prefs), ViewMode::List);

        prefs.set_item(VIEW_MODE_KEY, "nonsense").unwrap();
        assert_eq!(ViewMode::load(&prefs), ViewMode::Grid);
    }
}
