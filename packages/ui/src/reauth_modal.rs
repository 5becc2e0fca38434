//! Blocking prompt shown when the session could not be refreshed silently.

use api::session;
use dioxus::prelude::*;

use crate::auth::use_session_controller;
use crate::backend::use_backend;
use crate::icons::{FaFingerprint, FaLock, FaXmark};
use crate::views::ModalOverlay;
use crate::Icon;

#[component]
pub fn ReauthModal(email: String, on_declined: EventHandler<()>) -> Element {
    let backend = use_backend();
    let controller = use_session_controller();
    let mut password = use_signal(String::new);
    let mut error = use_signal(|| Option::<String>::None);
    let mut loading = use_signal(|| false);
    let biometric_available = backend.biometric.has_credential();

    let decline = {
        let controller = controller.clone();
        move || {
            session::decline_reauth(&controller);
            on_declined.call(());
        }
    };

    let handle_biometric = {
        let backend = backend.clone();
        let controller = controller.clone();
        move |_| {
            let backend = backend.clone();
            let controller = controller.clone();
            spawn(async move {
                loading.set(true);
                error.set(None);
                if let Err(e) =
                    session::reauthenticate_with_biometric(&controller, &backend.auth, &backend.biometric)
                        .await
                {
                    error.set(Some(e.to_string()));
                }
                loading.set(false);
            });
        }
    };

    let handle_password = move |evt: FormEvent| {
        evt.prevent_default();
        let backend = backend.clone();
        let controller = controller.clone();
        spawn(async move {
            loading.set(true);
            error.set(None);
            match session::reauthenticate_with_password(&controller, &backend.auth, &password()).await {
                Ok(()) => password.set(String::new()),
                Err(e) => error.set(Some(e.to_string())),
            }
            loading.set(false);
        });
    };

    let decline_overlay = decline.clone();
    let decline_close = decline.clone();
    let decline_offline = decline;

    rsx! {
        ModalOverlay {
            on_close: move |_| decline_overlay(),
            div {
                class: "modal-body",
                div {
                    class: "modal-header",
                    h2 { "Session Expired" }
                    button {
                        class: "icon-btn",
                        onclick: move |_| decline_close(),
                        Icon { icon: FaXmark, width: 16, height: 16 }
                    }
                }
                p { class: "muted", "Your session has expired. Please re-authenticate to continue." }
                if !email.is_empty() {
                    p { class: "muted small", "Signed in as {email}" }
                }

                if let Some(err) = error() {
                    div { class: "alert alert--error", "{err}" }
                }

                if biometric_available {
                    button {
                        class: "btn btn--primary btn--block",
                        disabled: loading(),
                        onclick: handle_biometric,
                        Icon { icon: FaFingerprint, width: 16, height: 16 }
                        if loading() { "Authenticating..." } else { "Use Biometric" }
                    }
                    div { class: "divider", span { "or" } }
                }

                form {
                    onsubmit: handle_password,
                    label { r#for: "reauth-password", class: "field-label", "Password" }
                    div {
                        class: "input-with-icon",
                        Icon { icon: FaLock, width: 14, height: 14 }
                        input {
                            id: "reauth-password",
                            r#type: "password",
                            class: "input",
                            required: true,
                            placeholder: "Enter your password",
                            value: "{password}",
                            oninput: move |e| password.set(e.value()),
                        }
                    }
                    button {
                        r#type: "submit",
                        class: "btn btn--dark btn--block",
                        disabled: loading(),
                        if loading() { "Signing in..." } else { "Sign In" }
                    }
                }

                button {
                    class: "btn btn--link btn--block",
                    onclick: move |_| decline_offline(),
                    "Access Offline Recipes"
                }
            }
        }
    }
}
