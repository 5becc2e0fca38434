//! Session context and hooks for the UI.

use std::rc::Rc;

use api::session::{self, SessionController, SessionState};
use dioxus::prelude::*;

use crate::backend::{use_backend, Backend};
use crate::components::Spinner;
use crate::reauth_modal::ReauthModal;

/// Fires `dioxus.send(true)` whenever the page becomes visible again.
const VISIBILITY_JS: &str = r#"(function() {
    document.addEventListener('visibilitychange', function() {
        if (document.visibilityState === 'visible') { dioxus.send(true); }
    });
})();"#;

/// Get the current session state.
/// Returns a signal that updates on sign-in, sign-out and re-auth prompts.
pub fn use_session() -> Signal<SessionState> {
    use_context::<Signal<SessionState>>()
}

pub fn use_session_controller() -> SessionController {
    use_context::<SessionController>()
}

/// Provider component that owns the backend and the session controller.
///
/// Must sit inside the router: declining re-authentication navigates to
/// `/offline`.
#[component]
pub fn AuthProvider(children: Element) -> Element {
    let backend = use_context_provider(|| Rc::new(Backend::from_compiled()));
    let controller = use_context_provider(SessionController::new);
    let mut session_state = use_signal(|| controller.state());
    use_context_provider(|| session_state);

    // Mirror controller transitions into the signal for as long as we're mounted
    {
        let controller = controller.clone();
        use_hook(move || {
            Rc::new(controller.subscribe(move |state| session_state.set(state.clone())))
        });
    }

    // Initial session, then the refresh timer
    {
        let backend = backend.clone();
        let controller = controller.clone();
        use_future(move || {
            let backend = backend.clone();
            let controller = controller.clone();
            async move {
                if cfg!(feature = "server") {
                    return;
                }
                session::start(&controller, &backend.auth).await;
                loop {
                    let delay = session::poll(&controller, &backend.auth).await;
                    crate::sleep(delay).await;
                }
            }
        });
    }

    // Re-check when the tab comes back to the foreground
    {
        let backend = backend.clone();
        let controller = controller.clone();
        use_future(move || {
            let backend = backend.clone();
            let controller = controller.clone();
            async move {
                if cfg!(feature = "server") {
                    return;
                }
                let mut eval = document::eval(VISIBILITY_JS);
                while let Ok(true) = eval.recv::<bool>().await {
                    session::check_on_visible(&controller, &backend.auth).await;
                }
            }
        });
    }

    let reauth_user = match session_state() {
        SessionState::ReauthRequired(user) => Some(user),
        _ => None,
    };

    rsx! {
        {children}
        if let Some(user) = reauth_user {
            ReauthModal {
                email: user.email.unwrap_or_default(),
                on_declined: move |_| {
                    navigator().push("/offline");
                },
            }
        }
    }
}

/// Render `children` only for a settled, signed-in session. Signed-out users
/// are sent to `/login`.
#[component]
pub fn RequireAuth(children: Element) -> Element {
    let session = use_session();

    use_effect(move || {
        if session() == SessionState::Unauthenticated {
            navigator().replace("/login");
        }
    });

    match session() {
        SessionState::Unknown => rsx! {
            div { class: "page-loading", Spinner {} }
        },
        SessionState::Unauthenticated => rsx! {},
        SessionState::Authenticated(_) | SessionState::ReauthRequired(_) => rsx! { {children} },
    }
}

/// Button to sign the current user out.
#[component]
pub fn SignOutButton(
    #[props(default = "Sign Out".to_string())] label: String,
    #[props(default = "".to_string())] class: String,
) -> Element {
    let backend = use_backend();
    let controller = use_session_controller();

    let onclick = move |_| {
        let backend = backend.clone();
        let controller = controller.clone();
        async move {
            if let Err(e) = session::sign_out(&controller, &backend.auth).await {
                tracing::warn!("sign-out request failed: {e}");
            }
            navigator().push("/login");
        }
    };

    rsx! {
        button {
            class: "{class}",
            onclick: onclick,
            "{label}"
        }
    }
}
