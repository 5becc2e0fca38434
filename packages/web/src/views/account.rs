//! Sign-in, sign-up and settings pages.

use dioxus::prelude::*;
use ui::views::{LoginView, SettingsView, SignupView};

#[component]
pub fn Login() -> Element {
    rsx! { LoginView {} }
}

#[component]
pub fn Signup() -> Element {
    rsx! { SignupView {} }
}

#[component]
pub fn Settings() -> Element {
    rsx! { SettingsView {} }
}
