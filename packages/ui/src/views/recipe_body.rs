use api::scaling::{format_quantity, format_time, scaled_servings};
use api::RecipeDetail;
use dioxus::prelude::*;
use store::models::{Ingredient, RecipeCategory, Unit};

use crate::icons::{FaClock, FaTemperatureHalf, FaUsers, FaUtensils};
use crate::Icon;

fn measure(qty: Option<f64>, unit: Option<Unit>, scale: f64) -> Option<String> {
    let qty = format_quantity(qty, scale);
    let unit = unit.map(|u| u.label()).unwrap_or_default();
    let text = format!("{qty} {unit}").trim().to_string();
    (!text.is_empty()).then_some(text)
}

/// The primary and alternate measures of an ingredient at `scale`. Baking
/// recipes lead with metric, everything else with imperial.
pub(crate) fn ingredient_measures(
    ingredient: &Ingredient,
    scale: f64,
    metric_first: bool,
) -> (Option<String>, Option<String>) {
    let imperial = measure(ingredient.qty_imperial, ingredient.unit_imperial, scale);
    let metric = measure(ingredient.qty_metric, ingredient.unit_metric, scale);
    let (primary, alternate) = if metric_first { (metric, imperial) } else { (imperial, metric) };
    match primary {
        Some(p) => (Some(p), alternate),
        None => (alternate, None),
    }
}

/// Title block, ingredients and steps of a recipe at the given scale.
///
/// `actions` renders beside the title and `controls` between the header
/// and the ingredient list.
#[component]
pub(crate) fn RecipeBody(
    detail: RecipeDetail,
    scale: f64,
    actions: Option<Element>,
    controls: Option<Element>,
) -> Element {
    let recipe = &detail.recipe;
    let main_image = detail.main_image().map(|img| img.url.clone());
    let metric_first = recipe.category == RecipeCategory::Baking;
    let prep = format_time(recipe.prep_time_minutes);
    let cook = format_time(recipe.cook_time_minutes);
    let servings = scaled_servings(recipe.servings, scale);
    let author = detail.author.as_ref().map(|a| a.name().to_string());
    let description = recipe.description.clone().filter(|d| !d.is_empty());
    let source = recipe.source_url.clone().filter(|s| !s.is_empty());

    rsx! {
        article {
            class: "card recipe",
            if let Some(url) = main_image {
                img { class: "recipe__hero", src: "{url}", alt: "{recipe.title}" }
            }
            div {
                class: "recipe__header",
                div {
                    h1 { "{recipe.title}" }
                    if let Some(author) = author {
                        p { class: "muted small", "By {author}" }
                    }
                }
                div { class: "recipe__actions", {actions} }
            }
            if let Some(description) = description {
                p { class: "recipe__description", "{description}" }
            }
            div {
                class: "recipe__meta",
                if let Some(prep) = prep {
                    span {
                        Icon { icon: FaClock, width: 14, height: 14 }
                        " Prep: {prep}"
                    }
                }
                if let Some(cook) = cook {
                    span {
                        Icon { icon: FaClock, width: 14, height: 14 }
                        " Cook: {cook}"
                    }
                }
                span {
                    Icon { icon: FaUsers, width: 14, height: 14 }
                    " {servings} servings"
                    if scale != 1.0 {
                        span { class: "muted", " ({scale}x scaled)" }
                    }
                }
                span { class: "badge", "{recipe.category.as_str()}" }
            }
            if let Some(source) = source {
                a {
                    class: "small",
                    href: "{source}",
                    target: "_blank",
                    rel: "noopener noreferrer",
                    "Original source →"
                }
            }

            {controls}

            section {
                class: "recipe__section",
                h2 { "Ingredients" }
                if detail.ingredients.is_empty() {
                    p { class: "muted", "No ingredients listed" }
                } else {
                    ul {
                        class: "ingredient-list",
                        for ingredient in detail.ingredients.iter() {
                            {
                                let (primary, alternate) = ingredient_measures(ingredient, scale, metric_first);
                                rsx! {
                                    li {
                                        key: "{ingredient.id}",
                                        if let Some(primary) = primary {
                                            strong { "{primary} " }
                                        }
                                        span { "{ingredient.name}" }
                                        if let Some(alternate) = alternate {
                                            span { class: "muted small", " ({alternate})" }
                                        }
                                        if let Some(notes) = ingredient.notes.as_ref().filter(|n| !n.is_empty()) {
                                            span { class: "muted small", ", {notes}" }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }

            section {
                class: "recipe__section",
                h2 { "Instructions" }
                ol {
                    class: "step-list",
                    for step in detail.instructions.iter() {
                        li {
                            key: "{step.id}",
                            span { class: "step-list__number", "{step.step_number}" }
                            div {
                                p { "{step.content}" }
                                div {
                                    class: "step-list__meta muted small",
                                    if let Some(time) = format_time(step.duration_minutes) {
                                        span {
                                            Icon { icon: FaClock, width: 12, height: 12 }
                                            " {time}"
                                        }
                                    }
                                    if let Some(temp) = step.temperature.as_ref().filter(|t| !t.is_empty()) {
                                        span {
                                            Icon { icon: FaTemperatureHalf, width: 12, height: 12 }
                                            " {temp}"
                                        }
                                    }
                                }
                                if let Some(image) = step.image.as_ref() {
                                    img { class: "step-list__image", src: "{image.url}", alt: "Step {step.step_number}" }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Placeholder shown when a recipe could not be loaded.
#[component]
pub(crate) fn RecipeNotFound(
    #[props(into)] message: String,
    #[props(into)] back_to: String,
    #[props(into)] back_label: String,
) -> Element {
    rsx! {
        div {
            class: "page centered",
            div {
                class: "card empty-state",
                Icon { icon: FaUtensils, width: 40, height: 40 }
                h2 { "Recipe not found" }
                p { class: "muted", "{message}" }
                Link { to: back_to, class: "btn btn--primary", "{back_label}" }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flour() -> Ingredient {
        Ingredient {
            id: "i1".into(),
            recipe_id: "r1".into(),
            name: "flour".into(),
            qty_imperial: Some(2.0),
            unit_imperial: Some(Unit::Cup),
            qty_metric: Some(250.0),
            unit_metric: Some(Unit::G),
            sort_order: 0,
            notes: None,
        }
    }

    #[test]
    fn test_measures_follow_category() {
        let (primary, alternate) = ingredient_measures(&flour(), 1.0, false);
        assert_eq!(primary.as_deref(), Some("2 cup"));
        assert_eq!(alternate.as_deref(), Some("250 g"));

        let (primary, alternate) = ingredient_measures(&flour(), 0.5, true);
        assert_eq!(primary.as_deref(), Some("125 g"));
        assert_eq!(alternate.as_deref(), Some("1 cup"));
    }

    #[test]
    fn test_missing_primary_falls_back() {
        let mut eggs = flour();
        eggs.qty_metric = None;
        eggs.unit_metric = None;
        eggs.qty_imperial = Some(3.0);
        eggs.unit_imperial = Some(Unit::Whole);

        let (primary, alternate) = ingredient_measures(&eggs, 2.0, true);
        assert_eq!(primary.as_deref(), Some("6 whole"));
        assert_eq!(alternate, None);

        let mut salt = flour();
        salt.qty_imperial = None;
        salt.unit_imperial = Some(Unit::ToTaste);
        salt.qty_metric = None;
        salt.unit_metric = None;
        let (primary, _) = ingredient_measures(&salt, 1.0, false);
        assert_eq!(primary.as_deref(), Some("to taste"));
    }
}
