use api::households::{load_household_info, load_profile};
use api::{HouseholdInfo, HouseholdRole, UserProfile};
use dioxus::prelude::*;

use crate::auth::{use_session, RequireAuth, SignOutButton};
use crate::backend::use_backend;
use crate::components::{BiometricSetup, Spinner};
use crate::icons::{FaCheck, FaCopy, FaHouse, FaUser};
use crate::{BackLink, Icon};

#[derive(Clone, PartialEq)]
struct Account {
    profile: Option<UserProfile>,
    household: Option<HouseholdInfo>,
}

#[component]
pub fn SettingsView() -> Element {
    rsx! {
        RequireAuth { Settings {} }
    }
}

#[component]
fn Settings() -> Element {
    let backend = use_backend();
    let session = use_session();

    let account = use_resource(move || {
        let backend = backend.clone();
        let user_id = session().user().map(|u| u.id.clone());
        async move {
            let user_id = user_id?;
            let profile = load_profile(&backend.gateway, &user_id).await.unwrap_or_else(|e| {
                tracing::warn!("failed to load profile: {e}");
                None
            });
            let household = match load_household_info(&backend.gateway, &user_id).await {
                Ok(info) => Some(info),
                Err(e) => {
                    tracing::warn!("failed to load household: {e}");
                    None
                }
            };
            Some(Account { profile, household })
        }
    });

    let email = session().user().and_then(|u| u.email.clone()).unwrap_or_default();

    rsx! {
        main {
            class: "page page--narrow stack",
            BackLink { to: "/recipes", label: "Back to Recipes" }
            h1 { "Settings" }

            match account.read_unchecked().clone() {
                Some(Some(Account { profile, household })) => rsx! {
                    ProfileSection { profile, email }
                    HouseholdSection { household }
                },
                _ => rsx! {
                    div { class: "card centered", Spinner {} }
                },
            }

            section {
                class: "stack",
                h2 { class: "section-title", "Security" }
                BiometricSetup {}
            }

            SignOutButton { class: "btn btn--outline-danger btn--block" }
        }
    }
}

#[component]
fn ProfileSection(profile: Option<UserProfile>, email: String) -> Element {
    let name = profile.as_ref().map(|p| p.name().to_string()).unwrap_or_else(|| email.clone());
    rsx! {
        section {
            class: "card stack",
            h2 {
                class: "section-title media",
                Icon { icon: FaUser, width: 16, height: 16 }
                "Profile"
            }
            dl {
                class: "details",
                dt { "Display Name" }
                dd { "{name}" }
                dt { "Email" }
                dd { "{email}" }
            }
        }
    }
}

#[component]
fn HouseholdSection(household: Option<HouseholdInfo>) -> Element {
    let mut copied = use_signal(|| false);

    let Some(household) = household else {
        return rsx! {
            section {
                class: "card",
                p { class: "muted", "Could not load household information." }
            }
        };
    };
    let can_invite = matches!(household.role, HouseholdRole::Owner | HouseholdRole::Admin);

    rsx! {
        section {
            class: "card stack",
            h2 {
                class: "section-title media",
                Icon { icon: FaHouse, width: 16, height: 16 }
                "Household"
            }
            dl {
                class: "details",
                dt { "Household Name" }
                dd { "{household.name}" }
                dt { "Members" }
                dd { "{household.member_count}" }
                dt { "Your Role" }
                dd { class: "capitalize", "{household.role.as_str()}" }
            }
            if can_invite {
                div {
                    span { class: "field-label", "Invite Code" }
                    match household.invite_code.clone() {
                        Some(invite) => {
                            let copy_code = invite.clone();
                            rsx! {
                                div {
                                    class: "button-row",
                                    code { class: "invite-code", "{invite}" }
                                    button {
                                        class: "icon-btn",
                                        title: "Copy to clipboard",
                                        onclick: move |_| {
                                            crate::copy_to_clipboard(&copy_code);
                                            copied.set(true);
                                            spawn(async move {
                                                crate::sleep(std::time::Duration::from_secs(2)).await;
                                                copied.set(false);
                                            });
                                        },
                                        if copied() {
                                            Icon { icon: FaCheck, width: 14, height: 14 }
                                        } else {
                                            Icon { icon: FaCopy, width: 14, height: 14 }
                                        }
                                    }
                                }
                            }
                        }
                        None => rsx! {
                            p { class: "muted small", "No invite code has been generated for this household." }
                        },
                    }
                    p { class: "muted tiny", "Share this code with family members to let them join your household." }
                }
            } else {
                p { class: "muted small", "Only household owners can view the invite code." }
            }
        }
    }
}
