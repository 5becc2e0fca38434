use api::draft::{InstructionDraft, RecipeDraft};
use dioxus::prelude::*;

use crate::components::{field_value, parse_field, ImageUpload};
use crate::icons::{FaArrowDown, FaArrowUp, FaXmark};
use crate::Icon;

fn edit(mut draft: Signal<RecipeDraft>, index: usize, f: impl FnOnce(&mut InstructionDraft)) {
    if let Some(step) = draft.write().instructions.get_mut(index) {
        f(step);
    }
}

/// Step list editor. Steps stay numbered 1..n through moves and removals.
#[component]
pub fn InstructionInput(mut draft: Signal<RecipeDraft>) -> Element {
    let instructions = draft().instructions;
    let count = instructions.len();

    rsx! {
        div {
            class: "stack",
            div {
                class: "section-header",
                span { class: "field-label", "Instructions" }
                button {
                    r#type: "button",
                    class: "btn btn--link",
                    onclick: move |_| draft.write().add_instruction(),
                    "+ Add Step"
                }
            }

            for (index, step) in instructions.into_iter().enumerate() {
                div {
                    key: "{index}",
                    class: "editor-row",
                    div {
                        class: "editor-row__line",
                        div {
                            class: "reorder",
                            span { class: "step-number", "{step.step_number}." }
                            button {
                                r#type: "button",
                                class: "icon-btn",
                                title: "Move up",
                                disabled: index == 0,
                                onclick: move |_| {
                                    if index > 0 {
                                        draft.write().move_instruction(index, index - 1);
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
                                    draft.write().move_instruction(index, index + 1);
                                },
                                Icon { icon: FaArrowDown, width: 12, height: 12 }
                            }
                        }
                        div {
                            class: "stack grow",
                            textarea {
                                class: "input",
                                rows: "4",
                                required: true,
                                placeholder: "Describe this step...",
                                value: "{step.content}",
                                oninput: move |e| edit(draft, index, |s| s.content = e.value()),
                            }
                            div {
                                class: "button-row",
                                label { class: "small muted", "Time:" }
                                input {
                                    r#type: "number",
                                    class: "input qty",
                                    placeholder: "mins",
                                    value: "{field_value(step.duration_minutes)}",
                                    oninput: move |e| edit(draft, index, |s| s.duration_minutes = parse_field(&e.value())),
                                }
                                label { class: "small muted", "Temp:" }
                                input {
                                    r#type: "text",
                                    class: "input temp",
                                    placeholder: "350°F",
                                    value: "{step.temperature.clone().unwrap_or_default()}",
                                    oninput: move |e| {
                                        let text = e.value();
                                        edit(draft, index, |s| s.temperature = (!text.is_empty()).then_some(text));
                                    },
                                }
                            }
                            ImageUpload {
                                value: step.image.clone(),
                                prompt: "Add a photo of this step",
                                on_change: move |image| edit(draft, index, |s| s.image = image),
                            }
                        }
                        button {
                            r#type: "button",
                            class: "icon-btn icon-btn--danger",
                            title: "Remove",
                            onclick: move |_| {
                                draft.write().remove_instruction(index);
                            },
                            Icon { icon: FaXmark, width: 14, height: 14 }
                        }
                    }
                }
            }

            if count == 0 {
                p { class: "empty-hint", "No instructions yet. Click \"Add Step\" to get started." }
            }
        }
    }
}
