use api::auth::AuthBackend;
use dioxus::prelude::*;

use crate::backend::use_backend;
use crate::icons::{FaBookOpen, FaHeart, FaMobileScreen, FaUsers};
use crate::Icon;

/// Landing page. Signed-in visitors are sent straight to their recipes.
#[component]
pub fn HomeView() -> Element {
    let backend = use_backend();

    use_future(move || {
        let backend = backend.clone();
        async move {
            if cfg!(feature = "server") {
                return;
            }
            match backend.auth.get_session().await {
                Ok(Some(_)) => {
                    navigator().replace("/recipes");
                }
                Ok(None) => {}
                Err(e) => tracing::debug!("no stored session: {e}"),
            }
        }
    });

    rsx! {
        div {
            class: "hero",
            Icon { icon: FaBookOpen, width: 56, height: 56, class: "hero__mark" }
            h1 { "Virtual Recipe Box" }
            p {
                class: "hero__lead",
                "Preserve your family's favorite recipes. Share them with your household, \
                 scale them for any crowd and keep them handy in the kitchen, even offline."
            }
            div {
                class: "button-row centered",
                Link { to: "/signup", class: "btn btn--primary btn--lg", "Get Started" }
                Link { to: "/login", class: "btn btn--outline btn--lg", "Sign In" }
            }
            div {
                class: "three-columns features",
                Feature {
                    icon: rsx! { Icon { icon: FaUsers, width: 28, height: 28 } },
                    title: "Household Sharing",
                    body: "Invite family members and build a shared recipe collection together.",
                }
                Feature {
                    icon: rsx! { Icon { icon: FaMobileScreen, width: 28, height: 28 } },
                    title: "Works Offline",
                    body: "Save recipes for the grocery store or a kitchen with no signal.",
                }
                Feature {
                    icon: rsx! { Icon { icon: FaHeart, width: 28, height: 28 } },
                    title: "Cooking Notes",
                    body: "Rate each attempt and remember what you changed.",
                }
            }
        }
    }
}

#[component]
fn Feature(icon: Element, title: &'static str, body: &'static str) -> Element {
    rsx! {
        div {
            class: "card feature",
            {icon}
            h3 { "{title}" }
            p { class: "muted small", "{body}" }
        }
    }
}
