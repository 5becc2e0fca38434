//! The recipe editor shared by the new and edit pages.

use api::draft::RecipeDraft;
use dioxus::prelude::*;
use store::models::{RecipeCategory, Visibility};

use crate::components::{field_value, parse_field, ImageUpload, IngredientInput, InstructionInput};

fn category_label(category: RecipeCategory) -> &'static str {
    match category {
        RecipeCategory::Cooking => "Cooking",
        RecipeCategory::Baking => "Baking",
        RecipeCategory::Beverage => "Beverage",
        RecipeCategory::Other => "Other",
    }
}

fn visibility_label(visibility: Visibility) -> &'static str {
    match visibility {
        Visibility::Private => "Private (Only Me)",
        Visibility::Household => "Household (Members Only)",
        Visibility::Followers => "Followers (Members + Followers)",
        Visibility::Public => "Public (Everyone)",
    }
}

#[component]
pub fn RecipeForm(
    mut draft: Signal<RecipeDraft>,
    #[props(into)] submit_label: String,
    #[props(into)] busy_label: String,
    busy: bool,
    on_submit: EventHandler<()>,
    on_cancel: EventHandler<()>,
) -> Element {
    let current = draft();
    let unit_hint = if current.category == RecipeCategory::Baking {
        "Defaults to metric units"
    } else {
        "Defaults to imperial units"
    };

    rsx! {
        form {
            class: "card stack",
            onsubmit: move |evt: FormEvent| {
                evt.prevent_default();
                on_submit.call(());
            },

            h2 { class: "section-title", "Basic Information" }

            div {
                label { r#for: "title", class: "field-label", "Recipe Title *" }
                input {
                    id: "title",
                    r#type: "text",
                    class: "input",
                    required: true,
                    placeholder: "e.g., Grandma's Chocolate Chip Cookies",
                    value: "{current.title}",
                    oninput: move |e| draft.write().title = e.value(),
                }
            }

            div {
                span { class: "field-label", "Recipe Photo" }
                ImageUpload {
                    value: current.main_image.clone(),
                    on_change: move |image| draft.write().main_image = image,
                }
            }

            div {
                label { r#for: "description", class: "field-label", "Description" }
                textarea {
                    id: "description",
                    class: "input",
                    rows: "3",
                    placeholder: "What makes this recipe special?",
                    value: "{current.description}",
                    oninput: move |e| draft.write().description = e.value(),
                }
            }

            div {
                class: "three-columns",
                div {
                    label { r#for: "category", class: "field-label", "Category *" }
                    select {
                        id: "category",
                        class: "input",
                        value: "{current.category.as_str()}",
                        onchange: move |e| {
                            if let Some(category) = RecipeCategory::parse(&e.value()) {
                                draft.write().category = category;
                            }
                        },
                        for category in RecipeCategory::ALL {
                            option {
                                key: "{category.as_str()}",
                                value: "{category.as_str()}",
                                selected: category == current.category,
                                "{category_label(category)}"
                            }
                        }
                    }
                    p { class: "muted tiny", "{unit_hint}" }
                }
                div {
                    label { r#for: "visibility", class: "field-label", "Visibility" }
                    select {
                        id: "visibility",
                        class: "input",
                        value: "{current.visibility.as_str()}",
                        onchange: move |e| {
                            if let Some(visibility) = Visibility::parse(&e.value()) {
                                draft.write().visibility = visibility;
                            }
                        },
                        for visibility in Visibility::ALL {
                            option {
                                key: "{visibility.as_str()}",
                                value: "{visibility.as_str()}",
                                selected: visibility == current.visibility,
                                "{visibility_label(visibility)}"
                            }
                        }
                    }
                }
                div {
                    label { r#for: "servings", class: "field-label", "Servings *" }
                    input {
                        id: "servings",
                        r#type: "number",
                        min: "1",
                        class: "input",
                        required: true,
                        value: "{current.servings}",
                        oninput: move |e| draft.write().servings = parse_field(&e.value()).unwrap_or(0),
                    }
                }
            }

            div {
                class: "two-columns",
                div {
                    label { r#for: "prep-time", class: "field-label", "Prep Time (minutes)" }
                    input {
                        id: "prep-time",
                        r#type: "number",
                        min: "0",
                        class: "input",
                        value: "{field_value(current.prep_time_minutes)}",
                        oninput: move |e| draft.write().prep_time_minutes = parse_field(&e.value()),
                    }
                }
                div {
                    label { r#for: "cook-time", class: "field-label", "Cook Time (minutes)" }
                    input {
                        id: "cook-time",
                        r#type: "number",
                        min: "0",
                        class: "input",
                        value: "{field_value(current.cook_time_minutes)}",
                        oninput: move |e| draft.write().cook_time_minutes = parse_field(&e.value()),
                    }
                }
            }

            div {
                label { r#for: "source-url", class: "field-label", "Source URL (Optional)" }
                input {
                    id: "source-url",
                    r#type: "url",
                    class: "input",
                    placeholder: "https://example.com/recipe",
                    value: "{current.source_url}",
                    oninput: move |e| draft.write().source_url = e.value(),
                }
            }

            hr {}
            IngredientInput { draft }
            hr {}
            InstructionInput { draft }

            div {
                class: "button-row",
                button {
                    r#type: "button",
                    class: "btn btn--outline grow",
                    onclick: move |_| on_cancel.call(()),
                    "Cancel"
                }
                button {
                    r#type: "submit",
                    class: "btn btn--primary grow",
                    disabled: busy,
                    if busy { "{busy_label}" } else { "{submit_label}" }
                }
            }
        }
    }
}
