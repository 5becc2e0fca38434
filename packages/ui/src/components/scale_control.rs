use api::scaling::{scale_label, SCALE_OPTIONS};
use dioxus::prelude::*;

/// Batch multiplier picker for the detail page.
#[component]
pub fn ScaleControl(mut scale: Signal<f64>) -> Element {
    rsx! {
        div {
            class: "scale-control",
            span { class: "scale-control__label", "Scale Recipe" }
            div {
                class: "scale-control__options",
                for option in SCALE_OPTIONS {
                    button {
                        key: "{option}",
                        class: if scale() == option { "scale-btn scale-btn--active" } else { "scale-btn" },
                        onclick: move |_| scale.set(option),
                        "{scale_label(option)}"
                    }
                }
            }
        }
    }
}
