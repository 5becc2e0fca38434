//! # Auth client
//!
//! Password sign-in, silent refresh and sign-out against the hosted auth service,
//! plus the privileged admin user creation used by signup.
//!
//! | Type | Role |
//! |------|------|
//! | [`AuthBackend`] | End-user session operations. |
//! | [`AdminAuth`] | Service-role user creation (server only in production). |
//! | [`RestAuth`] | GoTrue implementation; persists the session in a [`store::KeyValueStore`]. |
//! | [`RestAdminAuth`] | GoTrue admin endpoint with the service-role key. |
//! | [`MemoryAuth`] | In-process implementation of both traits for tests. |
//!
//! Sign-in records a session deadline derived from the stored
//! [`store::SessionPreference`]: one day, or sixty days with "remember me". Past
//! the deadline a refresh fails, which the session controller turns into a
//! re-authentication prompt.

mod memory;
mod rest;

pub use memory::MemoryAuth;
pub use rest::{RestAdminAuth, RestAuth, AUTH_TOKEN_KEY};

use serde::{Deserialize, Serialize};

use crate::error::ApiResult;

/// The authenticated user as the auth service reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// A signed-in session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    /// Access-token expiry, seconds since the Unix epoch.
    pub expires_at: i64,
    pub user: AuthUser,
    /// Hard deadline from the remember-me preference; refreshes stop after it.
    #[serde(default)]
    pub not_after: Option<i64>,
}

impl Session {
    pub fn expires_in(&self, now_secs: i64) -> i64 {
        self.expires_at - now_secs
    }
}

pub fn now_secs() -> i64 {
    store::current_millis() / 1000
}

pub trait AuthBackend {
    /// Locally known session, without contacting the server.
    fn get_session(&self) -> impl std::future::Future<Output = ApiResult<Option<Session>>>;
    fn refresh_session(&self) -> impl std::future::Future<Output = ApiResult<Session>>;
    fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> impl std::future::Future<Output = ApiResult<Session>>;
    fn sign_out(&self) -> impl std::future::Future<Output = ApiResult<()>>;
    /// Ask the server who the current access token belongs to.
    fn get_user(&self) -> impl std::future::Future<Output = ApiResult<Option<AuthUser>>>;
}

pub trait AdminAuth {
    /// Create an auto-confirmed user.
    fn create_user(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> impl std::future::Future<Output = ApiResult<AuthUser>>;
}
