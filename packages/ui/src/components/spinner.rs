use dioxus::prelude::*;

use crate::icons::FaSpinner;
use crate::Icon;

#[component]
pub fn Spinner(#[props(default = 24)] size: u32) -> Element {
    rsx! {
        span {
            class: "spinner",
            Icon { icon: FaSpinner, width: size, height: size }
        }
    }
}
