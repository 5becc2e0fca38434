use dioxus::prelude::*;

use crate::auth::use_session;
use crate::backend::use_backend;
use crate::icons::FaHeart;
use crate::outline_icons::FaHeart as FaHeartOutline;
use crate::Icon;

/// Heart toggle for one recipe. Renders nothing useful until a user is known.
#[component]
pub fn FavoriteButton(recipe_id: String, #[props(default)] class: String) -> Element {
    let backend = use_backend();
    let session = use_session();
    let mut is_favorite = use_signal(|| false);
    let mut loading = use_signal(|| false);

    {
        let backend = backend.clone();
        let recipe_id = recipe_id.clone();
        use_resource(move || {
            let backend = backend.clone();
            let recipe_id = recipe_id.clone();
            let user = session().user().cloned();
            async move {
                let Some(user) = user else { return };
                match api::recipes::is_favorite(&backend.gateway, &user.id, &recipe_id).await {
                    Ok(fav) => is_favorite.set(fav),
                    Err(e) => tracing::warn!("failed to check favorite status: {e}"),
                }
            }
        });
    }

    let toggle = move |evt: Event<MouseData>| {
        evt.prevent_default();
        evt.stop_propagation();
        let Some(user) = session.peek().user().cloned() else { return };
        if loading() {
            return;
        }
        let backend = backend.clone();
        let recipe_id = recipe_id.clone();
        spawn(async move {
            loading.set(true);
            match api::recipes::toggle_favorite(&backend.gateway, &user.id, &recipe_id).await {
                Ok(now) => is_favorite.set(now),
                Err(e) => tracing::warn!("failed to toggle favorite: {e}"),
            }
            loading.set(false);
        });
    };

    let title = if is_favorite() { "Remove from favorites" } else { "Add to favorites" };
    let state = if is_favorite() { "favorite favorite--on" } else { "favorite" };

    rsx! {
        button {
            class: "{state} {class}",
            disabled: loading(),
            title: "{title}",
            onclick: toggle,
            if is_favorite() {
                Icon { icon: FaHeart, width: 20, height: 20 }
            } else {
                Icon { icon: FaHeartOutline, width: 20, height: 20 }
            }
        }
    }
}
