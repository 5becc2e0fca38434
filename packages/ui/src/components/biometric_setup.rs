use dioxus::prelude::*;

use crate::auth::use_session;
use crate::backend::use_backend;
use crate::icons::{FaCircleCheck, FaCircleXmark, FaFingerprint};
use crate::Icon;

#[derive(Clone, Copy, PartialEq)]
enum Support {
    Checking,
    Unsupported,
    NoAuthenticator,
    Ready,
}

/// Enable or disable the device's biometric re-auth shortcut.
#[component]
pub fn BiometricSetup() -> Element {
    let backend = use_backend();
    let session = use_session();
    let mut support = use_signal(|| Support::Checking);
    let mut enabled = use_signal(|| false);
    let mut registering = use_signal(|| false);
    let mut error = use_signal(|| Option::<String>::None);
    let mut success = use_signal(|| Option::<&'static str>::None);

    {
        let backend = backend.clone();
        use_future(move || {
            let backend = backend.clone();
            async move {
                if !backend.biometric.is_supported() {
                    support.set(Support::Unsupported);
                } else if !backend.biometric.is_platform_authenticator_available().await {
                    support.set(Support::NoAuthenticator);
                } else {
                    enabled.set(backend.biometric.has_credential());
                    support.set(Support::Ready);
                }
            }
        });
    }

    let handle_register = {
        let backend = backend.clone();
        move |_| {
            let Some(user) = session.peek().user().cloned() else { return };
            let backend = backend.clone();
            spawn(async move {
                registering.set(true);
                error.set(None);
                success.set(None);
                let email = user.email.clone().unwrap_or_default();
                match backend.biometric.register(&user.id, &email).await {
                    Ok(credential) => {
                        tracing::info!(device = %credential.device_name, "biometric credential registered");
                        enabled.set(true);
                        success.set(Some("Biometric authentication enabled successfully!"));
                    }
                    Err(e) => error.set(Some(e.to_string())),
                }
                registering.set(false);
            });
        }
    };

    let handle_remove = move |_| {
        error.set(None);
        match backend.biometric.remove() {
            Ok(()) => {
                enabled.set(false);
                success.set(Some("Biometric authentication disabled"));
            }
            Err(e) => error.set(Some(e.to_string())),
        }
    };

    match support() {
        Support::Checking => rsx! {
            div { class: "card centered", crate::components::Spinner {} }
        },
        Support::Unsupported | Support::NoAuthenticator => {
            let reason = if support() == Support::Unsupported {
                "Your browser does not support biometric authentication."
            } else {
                "No biometric authenticator (fingerprint/face ID) detected on this device."
            };
            rsx! {
                div {
                    class: "card card--muted media",
                    Icon { icon: FaCircleXmark, width: 20, height: 20 }
                    div {
                        h3 { "Biometric Authentication Unavailable" }
                        p { class: "muted small", "{reason}" }
                    }
                }
            }
        }
        Support::Ready => rsx! {
            div {
                class: "card stack",
                div {
                    class: "media",
                    Icon { icon: FaFingerprint, width: 24, height: 24 }
                    div {
                        h3 { "Biometric Authentication" }
                        p { class: "muted small", "Use fingerprint or face ID for quick and secure sign-in" }
                    }
                }
                if let Some(err) = error() {
                    div { class: "alert alert--error", "{err}" }
                }
                if let Some(msg) = success() {
                    div { class: "alert alert--success", "{msg}" }
                }
                if enabled() {
                    div {
                        class: "status status--ok",
                        Icon { icon: FaCircleCheck, width: 16, height: 16 }
                        span { "Biometric authentication is enabled" }
                    }
                    button {
                        class: "btn btn--outline-danger btn--block",
                        onclick: handle_remove,
                        "Disable Biometric Authentication"
                    }
                } else {
                    button {
                        class: "btn btn--primary btn--block",
                        disabled: registering(),
                        onclick: handle_register,
                        Icon { icon: FaFingerprint, width: 16, height: 16 }
                        if registering() { "Setting up..." } else { "Enable Biometric Authentication" }
                    }
                }
            }
        },
    }
}
