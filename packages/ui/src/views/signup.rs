use api::session;
use api::signup::MIN_PASSWORD_LEN;
use api::SignupRequest;
use dioxus::prelude::*;

use crate::auth::use_session_controller;
use crate::backend::use_backend;
use crate::icons::{FaBookOpen, FaHouse, FaUsers};
use crate::Icon;

/// Account creation: either start a new household or join one by invite code.
#[component]
pub fn SignupView() -> Element {
    let backend = use_backend();
    let controller = use_session_controller();
    let mut display_name = use_signal(String::new);
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut household_name = use_signal(String::new);
    let mut invite_code = use_signal(String::new);
    let mut joining = use_signal(|| false);
    let mut loading = use_signal(|| false);
    let mut error = use_signal(|| Option::<String>::None);

    let handle_submit = move |evt: FormEvent| {
        evt.prevent_default();
        let backend = backend.clone();
        let controller = controller.clone();
        spawn(async move {
            loading.set(true);
            error.set(None);
            let request = SignupRequest {
                email: email(),
                password: password(),
                display_name: display_name(),
                household_name: (!joining()).then(|| household_name()),
                invite_code: joining().then(|| invite_code().trim().to_uppercase()),
            };
            match api::signup(request).await {
                Ok(outcome) => {
                    tracing::info!(user_id = %outcome.user_id, role = outcome.role.as_str(), "account created");
                    match session::sign_in(&controller, &backend.auth, &email(), &password()).await {
                        Ok(_) => {
                            navigator().push("/recipes");
                        }
                        Err(e) => error.set(Some(e.to_string())),
                    }
                }
                Err(e) => {
                    tracing::warn!("signup failed: {e}");
                    error.set(Some(e.to_string()));
                }
            }
            loading.set(false);
        });
    };

    rsx! {
        div {
            class: "auth-page",
            div {
                class: "auth-page__brand",
                Icon { icon: FaBookOpen, width: 40, height: 40 }
                h1 { "Create Account" }
                p { class: "muted", "Start your family recipe collection" }
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
                        label { r#for: "display-name", class: "field-label", "Your Name" }
                        input {
                            id: "display-name",
                            r#type: "text",
                            class: "input",
                            required: true,
                            placeholder: "John Doe",
                            value: "{display_name}",
                            oninput: move |e| display_name.set(e.value()),
                        }
                    }
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
                            minlength: "{MIN_PASSWORD_LEN}",
                            value: "{password}",
                            oninput: move |e| password.set(e.value()),
                        }
                        p { class: "muted tiny", "At least {MIN_PASSWORD_LEN} characters" }
                    }

                    div {
                        class: "segmented",
                        button {
                            r#type: "button",
                            class: if !joining() { "segmented__option segmented__option--active" } else { "segmented__option" },
                            onclick: move |_| joining.set(false),
                            Icon { icon: FaHouse, width: 14, height: 14 }
                            "Create Household"
                        }
                        button {
                            r#type: "button",
                            class: if joining() { "segmented__option segmented__option--active" } else { "segmented__option" },
                            onclick: move |_| joining.set(true),
                            Icon { icon: FaUsers, width: 14, height: 14 }
                            "Join Household"
                        }
                    }

                    if joining() {
                        div {
                            label { r#for: "invite-code", class: "field-label", "Invite Code" }
                            input {
                                id: "invite-code",
                                r#type: "text",
                                class: "input mono",
                                required: true,
                                placeholder: "ABC12345",
                                value: "{invite_code}",
                                oninput: move |e| invite_code.set(e.value()),
                            }
                            p { class: "muted tiny", "Ask a household member for their invite code" }
                        }
                    } else {
                        div {
                            label { r#for: "household-name", class: "field-label", "Household Name" }
                            input {
                                id: "household-name",
                                r#type: "text",
                                class: "input",
                                required: true,
                                placeholder: "The Smith Family",
                                value: "{household_name}",
                                oninput: move |e| household_name.set(e.value()),
                            }
                        }
                    }

                    button {
                        r#type: "submit",
                        class: "btn btn--primary btn--block",
                        disabled: loading(),
                        if loading() { "Creating account..." } else { "Create Account" }
                    }
                }
                p {
                    class: "muted small centered",
                    "Already have an account? "
                    Link { to: "/login", "Sign in" }
                }
            }
        }
    }
}
