use api::community::{follow, followed_households, is_following, search_households, FollowedHousehold};
use api::models::Household;
use dioxus::prelude::*;

use crate::auth::{use_session, RequireAuth};
use crate::backend::use_backend;
use crate::components::Spinner;
use crate::icons::{FaMagnifyingGlass, FaUserMinus, FaUserPlus, FaUsers};
use crate::{BackLink, Icon};

#[component]
pub fn CommunityView() -> Element {
    rsx! {
        RequireAuth { Community {} }
    }
}

#[component]
fn Community() -> Element {
    let backend = use_backend();
    let session = use_session();
    let mut query = use_signal(String::new);
    let mut results = use_signal(Vec::<Household>::new);
    let mut searching = use_signal(|| false);
    let mut following = use_signal(Vec::<FollowedHousehold>::new);
    let mut loading_follows = use_signal(|| true);
    let mut busy_id = use_signal(|| Option::<String>::None);
    let mut error = use_signal(|| Option::<String>::None);

    {
        let backend = backend.clone();
        use_future(move || {
            let backend = backend.clone();
            async move {
                let Some(user_id) = session.peek().user().map(|u| u.id.clone()) else { return };
                match followed_households(&backend.gateway, &user_id).await {
                    Ok(list) => following.set(list),
                    Err(e) => tracing::warn!("failed to load follows: {e}"),
                }
                loading_follows.set(false);
            }
        });
    }

    let handle_search = {
        let backend = backend.clone();
        move |evt: FormEvent| {
            evt.prevent_default();
            if query().trim().is_empty() {
                return;
            }
            let backend = backend.clone();
            spawn(async move {
                searching.set(true);
                match search_households(&backend.gateway, &query()).await {
                    Ok(found) => results.set(found),
                    Err(e) => {
                        tracing::warn!("household search failed: {e}");
                        error.set(Some(e.to_string()));
                    }
                }
                searching.set(false);
            });
        }
    };

    // Follow or unfollow, then refresh the followed list.
    let toggle_follow = use_callback(move |household: Household| {
        let Some(user_id) = session.peek().user().map(|u| u.id.clone()) else { return };
        let backend = backend.clone();
        spawn(async move {
            busy_id.set(Some(household.id.clone()));
            error.set(None);
            let result = if is_following(&following.peek(), &household.id) {
                api::community::unfollow(&backend.gateway, &user_id, &household.id).await
            } else {
                follow(&backend.gateway, &user_id, &household.id).await.map(|_| ())
            };
            match result {
                Ok(()) => match followed_households(&backend.gateway, &user_id).await {
                    Ok(list) => following.set(list),
                    Err(e) => tracing::warn!("failed to reload follows: {e}"),
                },
                Err(e) => {
                    tracing::warn!(household_id = %household.id, "follow change failed: {e}");
                    error.set(Some(e.to_string()));
                }
            }
            busy_id.set(None);
        });
    });

    let user_id = session().user().map(|u| u.id.clone());

    rsx! {
        main {
            class: "page page--narrow stack",
            BackLink { to: "/recipes", label: "Back to Recipes" }
            div {
                h1 { "Community" }
                p { class: "muted", "Find and follow other households to see their shared recipes." }
            }

            if let Some(err) = error() {
                div { class: "alert alert--error", "{err}" }
            }

            section {
                class: "card stack",
                h2 { class: "section-title", "Find Households" }
                form {
                    class: "button-row",
                    onsubmit: handle_search,
                    input {
                        r#type: "search",
                        class: "input grow",
                        placeholder: "Search by household name...",
                        value: "{query}",
                        oninput: move |e| query.set(e.value()),
                    }
                    button {
                        r#type: "submit",
                        class: "btn btn--primary",
                        disabled: searching(),
                        if searching() {
                            Spinner { size: 14 }
                        } else {
                            Icon { icon: FaMagnifyingGlass, width: 14, height: 14 }
                        }
                        "Search"
                    }
                }
                if !results().is_empty() {
                    h3 { class: "muted small", "Results" }
                    ul {
                        class: "household-list",
                        for household in results() {
                            HouseholdRow {
                                key: "{household.id}",
                                household: household.clone(),
                                following: is_following(&following(), &household.id),
                                own: user_id.as_deref() == Some(household.owner_id.as_str()),
                                busy: busy_id().as_deref() == Some(household.id.as_str()),
                                on_toggle: toggle_follow,
                            }
                        }
                    }
                }
            }

            section {
                class: "card stack",
                h2 { class: "section-title", "Households You Follow" }
                if loading_follows() {
                    div { class: "centered", Spinner {} }
                } else if following().is_empty() {
                    div {
                        class: "empty-state",
                        Icon { icon: FaUsers, width: 32, height: 32 }
                        p { "Not following anyone yet" }
                        p { class: "muted small", "Search above to find households to follow!" }
                    }
                } else {
                    ul {
                        class: "household-list",
                        for followed in following() {
                            HouseholdRow {
                                key: "{followed.follow_id}",
                                household: followed.household.clone(),
                                following: true,
                                own: false,
                                busy: busy_id().as_deref() == Some(followed.household.id.as_str()),
                                on_toggle: toggle_follow,
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn HouseholdRow(
    household: Household,
    following: bool,
    own: bool,
    busy: bool,
    on_toggle: EventHandler<Household>,
) -> Element {
    let target = household.clone();
    rsx! {
        li {
            class: "household-row",
            div {
                class: "media",
                span { class: "avatar", Icon { icon: FaUsers, width: 16, height: 16 } }
                strong { "{household.name}" }
            }
            if own {
                span { class: "badge", "Your household" }
            } else {
                button {
                    class: if following { "btn btn--outline btn--sm" } else { "btn btn--primary btn--sm" },
                    disabled: busy,
                    onclick: move |_| on_toggle.call(target.clone()),
                    if busy {
                        Spinner { size: 14 }
                    } else if following {
                        Icon { icon: FaUserMinus, width: 14, height: 14 }
                        "Unfollow"
                    } else {
                        Icon { icon: FaUserPlus, width: 14, height: 14 }
                        "Follow"
                    }
                }
            }
        }
    }
}
