//! Persisted "remember me" preference, read at sign-in to pick a token lifetime.

use serde::{Deserialize, Serialize};

use crate::error::StoreResult;
use crate::local::KeyValueStore;

pub const SESSION_PREFERENCE_KEY: &str = "recipe-box-remember-me";

const SHORT_SESSION_SECS: u64 = 24 * 60 * 60;
const LONG_SESSION_SECS: u64 = 60 * 24 * 60 * 60;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionDuration {
    #[default]
    Short,
    Long,
}

impl SessionDuration {
    /// Session lifetime in seconds: one day or sixty days.
    pub fn as_secs(&self) -> u64 {
        match self {
            SessionDuration::Short => SHORT_SESSION_SECS,
            SessionDuration::Long => LONG_SESSION_SECS,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionPreference {
    pub remember_me: bool,
    pub duration: SessionDuration,
}

impl SessionPreference {
    pub fn from_remember_me(remember_me: bool) -> Self {
        Self {
            remember_me,
            duration: if remember_me {
                SessionDuration::Long
            } else {
                SessionDuration::Short
            },
        }
    }

    /// Read the stored preference. Missing or unparseable data reads as the default.
    pub fn load(store: &impl KeyValueStore) -> Self {
        match store.get_item(SESSION_PREFERENCE_KEY) {
            Ok(Some(json)) => serde_json::from_str(&json).unwrap_or_else(|e| {
                tracing::warn!("ignoring unreadable session preference: {e}");
                Self::default()
            }),
            Ok(None) => Self::default(),
            Err(e) => {
                tracing::warn!("failed to read session preference: {e}");
                Self::default()
            }
        }
    }

    pub fn save(store: &impl KeyValueStore, remember_me: bool) -> StoreResult<Self> {
        let pref = Self::from_remember_me(remember_me);
        store.set_item(SESSION_PREFERENCE_KEY, &serde_json::to_string(&pref)?)?;
        Ok(pref)
    }

    pub fn clear(store: &impl KeyValueStore) -> StoreResult<()> {
        store.remove_item(SESSION_PREFERENCE_KEY)
    }
}
