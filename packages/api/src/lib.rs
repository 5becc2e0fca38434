//! # API crate: backend access and client logic for Recipe Box
//!
//! Everything the views need that is not rendering lives here: the hosted
//! table gateway, the auth client and session controller, and the recipe,
//! household, sharing and upload operations built on top of them. The one
//! server function, `signup`, is also defined here.
//!
//! ## Modules
//!
//! | Module | Feature gate | Purpose |
//! |--------|-------------|---------|
//! | [`auth`] | — | Password sign-in, refresh and sign-out; admin user creation |
//! | [`config`] | — | Backend URL and keys from the environment or compile time |
//! | [`community`] | — | Household search, follow and unfollow |
//! | [`draft`] | — | Editable recipe model with list reordering |
//! | [`gateway`] | — | Typed PostgREST queries, with an in-memory double |
//! | [`households`] | — | Settings-page household and profile lookups |
//! | [`models`] | — | User, household and social table rows |
//! | [`recipes`] | — | Recipe list/detail/create/update/delete, favorites, cooking notes |
//! | [`scaling`] | — | Quantity scaling and time formatting |
//! | [`service`] | `server` | Lazily built service-role clients |
//! | [`session`] | — | Session state machine and its drivers |
//! | [`sharing`] | — | Share tokens and public recipe lookup |
//! | [`signup`] | — | Account + household creation |
//! | [`storage`] | — | Image upload to object storage |
//!
//! ## Server functions exposed here
//!
//! `signup` is compiled twice: with the real service-role logic behind
//! `#[cfg(feature = "server")]`, and as a client stub that forwards the call
//! over HTTP.

use dioxus::prelude::*;

pub mod auth;
pub mod community;
pub mod config;
pub mod draft;
pub mod error;
pub mod gateway;
pub mod households;
pub mod models;
pub mod recipes;
pub mod scaling;
#[cfg(feature = "server")]
pub mod service;
pub mod session;
pub mod sharing;
pub mod signup;
pub mod storage;
mod token;

pub use config::BackendConfig;
pub use error::{ApiError, ApiResult};
pub use models::{HouseholdInfo, HouseholdRole, UserProfile};
pub use recipes::{LoadedRecipe, RecipeDetail, RecipeSummary};
pub use session::{SessionController, SessionEvent, SessionState};
pub use signup::{SignupOutcome, SignupRequest};

/// Create an account and put it in a household, joining by invite code or
/// creating a new one.
#[cfg(feature = "server")]
#[post("/api/signup")]
pub async fn signup(request: SignupRequest) -> Result<SignupOutcome, ServerFnError> {
    let clients = service::service_clients()
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))?;

    signup::create_user_and_household(&clients.gateway, &clients.admin, request)
        .await
        .map_err(|e| {
            tracing::warn!("signup failed: {e}");
            ServerFnError::new(e.to_string())
        })
}

#[cfg(not(feature = "server"))]
#[post("/api/signup")]
pub async fn signup(request: SignupRequest) -> Result<SignupOutcome, ServerFnError> {
    Err(ServerFnError::new("Server only"))
}
