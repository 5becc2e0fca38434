use api::draft::{IngredientDraft, RecipeDraft};
use dioxus::prelude::*;
use store::models::Unit;

use crate::components::{field_value, parse_field};
use crate::icons::{FaArrowDown, FaArrowUp, FaXmark};
use crate::Icon;

#[derive(Clone, Copy, PartialEq)]
enum System {
    Imperial,
    Metric,
}

#[component]
fn UnitSelect(value: Option<Unit>, system: System, on_change: EventHandler<Option<Unit>>) -> Element {
    let (group_label, units): (&str, &[Unit]) = match system {
        System::Imperial => ("Volume", &Unit::IMPERIAL),
        System::Metric => ("Weight/Volume", &Unit::METRIC),
    };
    let selected = value.map(|u| u.as_str()).unwrap_or("");

    rsx! {
        select {
            class: "input",
            value: "{selected}",
            onchange: move |e| on_change.call(Unit::parse(&e.value())),
            option { value: "", "Unit" }
            optgroup {
                label: "{group_label}",
                for unit in units.iter() {
                    option { key: "{unit.as_str()}", value: "{unit.as_str()}", selected: Some(*unit) == value, "{unit.label()}" }
                }
            }
            optgroup {
                label: "Count",
                for unit in Unit::OTHER.iter() {
                    option { key: "{unit.as_str()}", value: "{unit.as_str()}", selected: Some(*unit) == value, "{unit.label()}" }
                }
            }
        }
    }
}

fn edit(mut draft: Signal<RecipeDraft>, index: usize, f: impl FnOnce(&mut IngredientDraft)) {
    if let Some(ingredient) = draft.write().ingredients.get_mut(index) {
        f(ingredient);
    }
}

/// Ingredient list editor. Baking recipes lead with metric quantities.
#[component]
pub fn IngredientInput(mut draft: Signal<RecipeDraft>) -> Element {
    let metric_first = draft().category == store::models::RecipeCategory::Baking;
    let (imperial_label, metric_label) = if metric_first {
        ("Imperial (Optional)", "Quantity (Primary)")
    } else {
        ("Quantity (Primary)", "Metric (Optional)")
    };
    let ingredients = draft().ingredients;
    let count = ingredients.len();

    rsx! {
        div {
            class: "stack",
            div {
                class: "section-header",
                span { class: "field-label", "Ingredients" }
                button {
                    r#type: "button",
                    class: "btn btn--link",
                    onclick: move |_| draft.write().add_ingredient(),
                    "+ Add Ingredient"
                }
            }

            for (index, ingredient) in ingredients.into_iter().enumerate() {
                div {
                    key: "{index}",
                    class: "editor-row",
                    div {
                        class: "editor-row__line",
                        div {
                            class: "reorder",
                            button {
                                r#type: "button",
                                class: "icon-btn",
                                title: "Move up",
                                disabled: index == 0,
                                onclick: move |_| {
                                    if index > 0 {
                                        draft.write().move_ingredient(index, index - 1);
                                    }
                                },
                                Icon { icon: FaArrowUp, width: 12, height: 12 }
                            }
                            button {
                                r#type: "button",
                                class: "icon-btn",
                                title: "Move down",
                                disabled: index + 1 == count,
                                onclick: move |_| {
                                    draft.write().move_ingredient(index, index + 1);
                                },
                                Icon { icon: FaArrowDown, width: 12, height: 12 }
                            }
                        }
                        input {
                            r#type: "text",
                            class: "input grow",
                            required: true,
                            placeholder: "Ingredient name",
                            value: "{ingredient.name}",
                            oninput: move |e| edit(draft, index, |i| i.name = e.value()),
                        }
                        button {
                            r#type: "button",
                            class: "icon-btn icon-btn--danger",
                            title: "Remove",
                            onclick: move |_| {
                                draft.write().remove_ingredient(index);
                            },
                            Icon { icon: FaXmark, width: 14, height: 14 }
                        }
                    }
                    div {
                        class: "two-columns",
                        div {
                            span { class: "field-label small", "{imperial_label}" }
                            div {
                                class: "button-row",
                                input {
                                    r#type: "number",
                                    step: "any",
                                    class: "input qty",
                                    placeholder: "Qty",
                                    value: "{field_value(ingredient.qty_imperial)}",
                                    oninput: move |e| edit(draft, index, |i| i.qty_imperial = parse_field(&e.value())),
                                }
                                UnitSelect {
                                    value: ingredient.unit_imperial,
                                    system: System::Imperial,
                                    on_change: move |u| edit(draft, index, |i| i.unit_imperial = u),
                                }
                            }
                        }
                        div {
                            span { class: "field-label small", "{metric_label}" }
                            div {
                                class: "button-row",
                                input {
                                    r#type: "number",
                                    step: "any",
                                    class: "input qty",
                                    placeholder: "Qty",
                                    value: "{field_value(ingredient.qty_metric)}",
                                    oninput: move |e| edit(draft, index, |i| i.qty_metric = parse_field(&e.value())),
                                }
                                UnitSelect {
                                    value: ingredient.unit_metric,
                                    system: System::Metric,
                                    on_change: move |u| edit(draft, index, |i| i.unit_metric = u),
                                }
                            }
                        }
                    }
                    input {
                        r#type: "text",
                        class: "input small",
                        placeholder: "Notes (optional, e.g., 'finely chopped')",
                        value: "{ingredient.notes.clone().unwrap_or_default()}",
                        oninput: move |e| {
                            let text = e.value();
                            edit(draft, index, |i| i.notes = (!text.is_empty()).then_some(text));
                        },
                    }
                }
            }

            if count == 0 {
                p { class: "empty-hint", "No ingredients yet. Click \"Add Ingredient\" to get started." }
            }
        }
    }
}
