use api::sharing::{create_share_link, get_share_token, revoke_share_link, share_url};
use dioxus::prelude::*;

use crate::auth::use_session;
use crate::backend::use_backend;
use crate::icons::{FaCheck, FaCopy, FaGlobe, FaLink, FaTrash, FaXmark};
use crate::views::ModalOverlay;
use crate::{page_origin, Icon};

#[component]
pub fn ShareModal(recipe_id: String, recipe_title: String, on_close: EventHandler<()>) -> Element {
    let backend = use_backend();
    let session = use_session();
    let mut token = use_signal(|| Option::<String>::None);
    let mut loading = use_signal(|| true);
    let mut copied = use_signal(|| false);
    let mut confirm_revoke = use_signal(|| false);
    let mut error = use_signal(|| Option::<&'static str>::None);

    {
        let backend = backend.clone();
        let recipe_id = recipe_id.clone();
        use_resource(move || {
            let backend = backend.clone();
            let recipe_id = recipe_id.clone();
            async move {
                match get_share_token(&backend.gateway, &recipe_id).await {
                    Ok(t) => token.set(t),
                    Err(e) => {
                        tracing::warn!("failed to load share link: {e}");
                        error.set(Some("Failed to load share settings"));
                    }
                }
                loading.set(false);
            }
        });
    }

    let handle_create = {
        let backend = backend.clone();
        let recipe_id = recipe_id.clone();
        move |_| {
            let Some(user) = session.peek().user().cloned() else {
                error.set(Some("You must be logged in"));
                return;
            };
            let backend = backend.clone();
            let recipe_id = recipe_id.clone();
            spawn(async move {
                loading.set(true);
                error.set(None);
                match create_share_link(&backend.gateway, &recipe_id, &user.id).await {
                    Ok(t) => token.set(Some(t)),
                    Err(e) => {
                        tracing::warn!("failed to create share link: {e}");
                        error.set(Some("Failed to create share link"));
                    }
                }
                loading.set(false);
            });
        }
    };

    let handle_revoke = move |_| {
        if !confirm_revoke() {
            confirm_revoke.set(true);
            return;
        }
        let backend = backend.clone();
        let recipe_id = recipe_id.clone();
        spawn(async move {
            loading.set(true);
            error.set(None);
            match revoke_share_link(&backend.gateway, &recipe_id).await {
                Ok(()) => token.set(None),
                Err(e) => {
                    tracing::warn!("failed to revoke share link: {e}");
                    error.set(Some("Failed to revoke link"));
                }
            }
            confirm_revoke.set(false);
            loading.set(false);
        });
    };

    let url = token().map(|t| share_url(&page_origin(), &t));

    rsx! {
        ModalOverlay {
            on_close: move |_| on_close.call(()),
            div {
                class: "modal-body",
                div {
                    class: "modal-header",
                    div {
                        class: "modal-title",
                        Icon { icon: FaGlobe, width: 18, height: 18 }
                        h2 { "Share Recipe" }
                    }
                    button {
                        class: "icon-btn",
                        onclick: move |_| on_close.call(()),
                        Icon { icon: FaXmark, width: 16, height: 16 }
                    }
                }
                p {
                    class: "muted",
                    "Create a public link for "
                    strong { "{recipe_title}" }
                    ". Anyone with this link can view the recipe, regardless of their login status."
                }

                if let Some(err) = error() {
                    div { class: "alert alert--error", "{err}" }
                }

                match url {
                    None if loading() => rsx! {
                        div { class: "centered", crate::components::Spinner {} }
                    },
                    None => rsx! {
                        button {
                            class: "btn btn--blue btn--block",
                            disabled: loading(),
                            onclick: handle_create,
                            Icon { icon: FaLink, width: 16, height: 16 }
                            "Create Public Link"
                        }
                        p { class: "muted small centered", "The link will be active until you revoke it." }
                    },
                    Some(url) => {
                        let copy_url = url.clone();
                        rsx! {
                            label { class: "field-label", "Public Link" }
                            div {
                                class: "button-row",
                                input { class: "input input--readonly", readonly: true, value: "{url}" }
                                button {
                                    class: if copied() { "btn btn--success" } else { "btn btn--muted" },
                                    onclick: move |_| {
                                        crate::copy_to_clipboard(&copy_url);
                                        copied.set(true);
                                        spawn(async move {
                                            crate::sleep(std::time::Duration::from_secs(2)).await;
                                            copied.set(false);
                                        });
                                    },
                                    if copied() {
                                        Icon { icon: FaCheck, width: 14, height: 14 }
                                        "Copied!"
                                    } else {
                                        Icon { icon: FaCopy, width: 14, height: 14 }
                                        "Copy"
                                    }
                                }
                            }
                            div {
                                class: "modal-footer",
                                if confirm_revoke() {
                                    span { class: "muted small", "The existing link will stop working immediately." }
                                }
                                button {
                                    class: "btn btn--danger-link",
                                    disabled: loading(),
                                    onclick: handle_revoke,
                                    Icon { icon: FaTrash, width: 14, height: 14 }
                                    if confirm_revoke() { "Confirm Revoke" } else { "Revoke Link" }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
