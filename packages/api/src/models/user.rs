//! # User profile
//!
//! [`UserProfile`] is the `users` table row created at signup, keyed by the auth
//! user's id. It is `Serialize + Deserialize + PartialEq` so it can cross the
//! server/client boundary unchanged. [`UserProfile::name`] falls back to the email
//! address when no display name was given.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub created_at: String,
}

impl UserProfile {
    pub fn name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.email)
    }
}
