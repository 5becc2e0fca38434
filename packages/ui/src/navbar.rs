use dioxus::prelude::*;

use crate::icons::FaBookOpen;
use crate::Icon;

/// Top bar with the app mark on the left and `children` on the right.
#[component]
pub fn Navbar(children: Element) -> Element {
    rsx! {
        header {
            class: "navbar",
            Link {
                to: "/recipes",
                class: "navbar__brand",
                Icon { icon: FaBookOpen, width: 20, height: 20 }
                span { "Recipe Box" }
            }
            nav {
                class: "navbar__links",
                {children}
            }
        }
    }
}

/// A "back" link used at the top of detail-style pages.
#[component]
pub fn BackLink(#[props(into)] to: String, #[props(into)] label: String) -> Element {
    rsx! {
        Link {
            to,
            class: "back-link",
            Icon { icon: crate::icons::FaArrowLeft, width: 14, height: 14 }
            span { "{label}" }
        }
    }
}
