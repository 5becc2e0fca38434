use api::auth::AuthBackend;
use api::session;
use dioxus::prelude::*;
use store::SessionPreference;

use crate::auth::use_session_controller;
use crate::backend::use_backend;
use crate::icons::{FaBookOpen, FaFingerprint, FaLock};
use crate::Icon;

#[component]
pub fn LoginView() -> Element {
    let backend = use_backend();
    let controller = use_session_controller();
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut remember_me = use_signal(|| false);
    let mut loading = use_signal(|| false);
    let mut error = use_signal(|| Option::<String>::None);
    let has_biometric = use_hook({
        let backend = backend.clone();
        move || backend.biometric.has_credential()
    });

    let handle_submit = {
        let backend = backend.clone();
        move |evt: FormEvent| {
            evt.prevent_default();
            let backend = backend.clone();
            let controller = controller.clone();
            spawn(async move {
                loading.set(true);
                error.set(None);
                if let Err(e) = SessionPreference::save(&backend.prefs, remember_me()) {
                    tracing::warn!("failed to store session preference: {e}");
                }
                match session::sign_in(&controller, &backend.auth, &email(), &password()).await {
                    Ok(_) => {
                        navigator().push("/recipes");
                    }
                    Err(e) => {
                        tracing::info!("sign-in rejected: {e}");
                        error.set(Some(e.to_string()));
                    }
                }
                loading.set(false);
            });
        }
    };

    // No passkey sign-in yet: the shortcut only resumes a session that is still valid.
    let handle_biometric = move |_| {
        let backend = backend.clone();
        spawn(async move {
            error.set(None);
            match backend.auth.get_session().await {
                Ok(Some(_)) => {
                    navigator().push("/recipes");
                }
                Ok(None) | Err(_) => error.set(Some(
                    "Please sign in with password once to re-enable biometric access.".into(),
                )),
            }
        });
    };

    rsx! {
        div {
            class: "auth-page",
            div {
                class: "auth-page__brand",
                Icon { icon: FaBookOpen, width: 40, height: 40 }
                h1 { "Welcome Back" }
                p { class: "muted", "Sign in to access your recipes" }
            }
            div {
                class: "card stack",
                if let Some(err) = error() {
                    div { class: "alert alert--error", "{err}" }
                }
                form {
                    class: "stack",
                    onsubmit: handle_submit,
                    div {
                        label { r#for: "email", class: "field-label", "Email" }
                        input {
                            id: "email",
                            r#type: "email",
                            class: "input",
                            required: true,
                            placeholder: "you@example.com",
                            value: "{email}",
                            oninput: move |e| email.set(e.value()),
                        }
                    }
                    div {
                        label { r#for: "password", class: "field-label", "Password" }
                        input {
                            id: "password",
                            r#type: "password",
                            class: "input",
                            required: true,
                            value: "{password}",
                            oninput: move |e| password.set(e.value()),
                        }
                    }
                    label {
                        class: "checkbox",
                        input {
                            r#type: "checkbox",
                            checked: remember_me(),
                            onchange: move |e| remember_me.set(e.checked()),
                        }
                        span { "Remember me for 60 days" }
                    }
                    button {
                        r#type: "submit",
                        class: "btn btn--primary btn--block",
                        disabled: loading(),
                        if loading() {
                            crate::components::Spinner { size: 16 }
                            "Signing in..."
                        } else {
                            Icon { icon: FaLock, width: 14, height: 14 }
                            "Sign In"
                        }
                    }
                }
                if has_biometric {
                    div { class: "divider", span { "or" } }
                    button {
                        r#type: "button",
                        class: "btn btn--outline btn--block",
                        onclick: handle_biometric,
                        Icon { icon: FaFingerprint, width: 16, height: 16 }
                        "Sign in with Biometrics"
                    }
                }
                p {
                    class: "muted small centered",
                    "Don't have an account? "
                    Link { to: "/signup", "Sign up" }
                }
            }
        }
    }
}
