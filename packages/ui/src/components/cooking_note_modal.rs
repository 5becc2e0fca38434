use api::recipes::{add_cooking_note, NewCookingNote};
use api::scaling::{scale_label, SCALE_OPTIONS};
use dioxus::prelude::*;

use crate::auth::use_session;
use crate::backend::use_backend;
use crate::icons::{FaStar, FaXmark};
use crate::views::ModalOverlay;
use crate::Icon;

/// Form for logging that a recipe was cooked.
#[component]
pub fn CookingNoteModal(recipe_id: String, on_close: EventHandler<()>, on_saved: EventHandler<()>) -> Element {
    let backend = use_backend();
    let session = use_session();
    let mut note = use_signal(NewCookingNote::today);
    let mut saving = use_signal(|| false);
    let mut error = use_signal(|| Option::<String>::None);

    let handle_submit = move |evt: FormEvent| {
        evt.prevent_default();
        let Some(user) = session.peek().user().cloned() else { return };
        let backend = backend.clone();
        let recipe_id = recipe_id.clone();
        spawn(async move {
            saving.set(true);
            error.set(None);
            let draft = note();
            match add_cooking_note(&backend.gateway, &recipe_id, &user.id, &draft).await {
                Ok(_) => {
                    on_saved.call(());
                    on_close.call(());
                }
                Err(e) => {
                    tracing::warn!("failed to save cooking note: {e}");
                    error.set(Some(e.to_string()));
                }
            }
            saving.set(false);
        });
    };

    let current = note();
    let rating = current.rating.unwrap_or(0);

    rsx! {
        ModalOverlay {
            on_close: move |_| on_close.call(()),
            div {
                class: "modal-body",
                div {
                    class: "modal-header",
                    h2 { "Add Cooking Note" }
                    button {
                        class: "icon-btn",
                        onclick: move |_| on_close.call(()),
                        Icon { icon: FaXmark, width: 16, height: 16 }
                    }
                }

                if let Some(err) = error() {
                    div { class: "alert alert--error", "{err}" }
                }

                form {
                    class: "stack",
                    onsubmit: handle_submit,

                    div {
                        label { r#for: "cooked-on", class: "field-label", "Date Cooked *" }
                        input {
                            id: "cooked-on",
                            r#type: "date",
                            class: "input",
                            required: true,
                            value: "{current.cooked_on}",
                            oninput: move |e| note.write().cooked_on = e.value(),
                        }
                    }

                    div {
                        span { class: "field-label", "Recipe Scaled" }
                        div {
                            class: "button-row",
                            for option in SCALE_OPTIONS {
                                button {
                                    key: "{option}",
                                    r#type: "button",
                                    class: if current.multiplier == option { "scale-btn scale-btn--active" } else { "scale-btn" },
                                    onclick: move |_| note.write().multiplier = option,
                                    "{scale_label(option)}"
                                }
                            }
                        }
                    }

                    div {
                        span { class: "field-label", "Rating" }
                        div {
                            class: "button-row",
                            for star in 1..=5u8 {
                                button {
                                    key: "{star}",
                                    r#type: "button",
                                    class: if star <= rating { "star star--on" } else { "star" },
                                    onclick: move |_| {
                                        let mut n = note.write();
                                        n.rating = if n.rating == Some(star) { None } else { Some(star) };
                                    },
                                    Icon { icon: FaStar, width: 24, height: 24 }
                                }
                            }
                        }
                    }

                    div {
                        label { r#for: "note-text", class: "field-label", "Notes" }
                        textarea {
                            id: "note-text",
                            class: "input",
                            rows: "4",
                            placeholder: "What did you think? Any modifications or tips?",
                            value: "{current.notes.clone().unwrap_or_default()}",
                            oninput: move |e| {
                                let text = e.value();
                                note.write().notes = (!text.trim().is_empty()).then_some(text);
                            },
                        }
                    }

                    div {
                        class: "button-row",
                        button {
                            r#type: "button",
                            class: "btn btn--outline",
                            onclick: move |_| on_close.call(()),
                            "Cancel"
                        }
                        button {
                            r#type: "submit",
                            class: "btn btn--primary",
                            disabled: saving(),
                            if saving() { "Saving..." } else { "Save Note" }
                        }
                    }
                }
            }
        }
    }
}
