//! This crate contains all shared UI for the workspace.

use dioxus::prelude::*;

// Re-export icon library
pub use dioxus_free_icons::Icon;
pub mod icons {
    pub use dioxus_free_icons::icons::fa_solid_icons::*;
}
pub mod outline_icons {
    pub use dioxus_free_icons::icons::fa_regular_icons::*;
}

mod backend;
pub use backend::{use_backend, Backend};

mod auth;
pub use auth::{use_session, use_session_controller, AuthProvider, RequireAuth, SignOutButton};

mod reauth_modal;
pub use reauth_modal::ReauthModal;

mod navbar;
pub use navbar::{BackLink, Navbar};

pub mod components;
mod dates;
pub mod views;

pub const STYLES_CSS: Asset = asset!("/assets/styles.css");

/// Write `text` to the system clipboard through the page.
pub(crate) fn copy_to_clipboard(text: &str) {
    let js = format!(
        "navigator.clipboard.writeText({})",
        serde_json::Value::String(text.to_string())
    );
    document::eval(&js);
}

/// Sleep on whichever timer the platform has.
pub(crate) async fn sleep(duration: std::time::Duration) {
    #[cfg(target_arch = "wasm32")]
    gloo_timers::future::sleep(duration).await;
    #[cfg(not(target_arch = "wasm32"))]
    tokio::time::sleep(duration).await;
}

/// `window.location.origin` in the browser, empty elsewhere.
pub(crate) fn page_origin() -> String {
    #[cfg(target_arch = "wasm32")]
    {
        web_sys::window()
            .and_then(|w| w.location().origin().ok())
            .unwrap_or_default()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        String::new()
    }
}
