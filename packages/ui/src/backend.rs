//! Shared backend constructor for all platforms.
//!
//! One [`Backend`] is built per app instance and provided as context by
//! [`crate::AuthProvider`]. Its local stores depend on the target:
//! - **Web** (WASM + `web` feature): `localStorage`, IndexedDB and WebAuthn
//! - **Native**: a [`store::FileStore`] under the platform data directory and
//!   no platform authenticator

use std::rc::Rc;

use api::auth::RestAuth;
use api::gateway::RestGateway;
use api::storage::RestStorage;
use api::BackendConfig;
use dioxus::prelude::*;
use store::{BiometricAuth, OfflineCache};

#[cfg(all(target_arch = "wasm32", feature = "web"))]
mod platform {
    pub type Kv = store::LocalStorage;
    pub type Snapshots = store::IdbStore;
    pub type Authenticator = store::webauthn::WebAuthenticator;

    pub fn kv() -> Kv {
        store::LocalStorage
    }

    pub fn snapshots() -> Snapshots {
        store::IdbStore::new()
    }

    pub fn authenticator() -> Authenticator {
        store::webauthn::WebAuthenticator
    }
}

#[cfg(not(all(target_arch = "wasm32", feature = "web")))]
mod platform {
    use std::path::PathBuf;

    pub type Kv = store::FileStore;
    pub type Snapshots = store::FileStore;
    pub type Authenticator = store::NoAuthenticator;

    /// `<data_dir>/recipe-box`, or the working directory when there is none.
    fn data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("recipe-box")
    }

    pub fn kv() -> Kv {
        store::FileStore::new(data_dir())
    }

    pub fn snapshots() -> Snapshots {
        store::FileStore::new(data_dir())
    }

    pub fn authenticator() -> Authenticator {
        store::NoAuthenticator
    }
}

pub use platform::{Authenticator, Kv, Snapshots};

const FALLBACK_URL: &str = "http://127.0.0.1:54321";

/// Every client a view needs, wired to one shared access token.
pub struct Backend {
    pub gateway: RestGateway,
    pub auth: RestAuth<Kv>,
    pub storage: RestStorage,
    pub cache: OfflineCache<Snapshots>,
    pub biometric: BiometricAuth<Authenticator, Kv>,
    /// Preferences: remember-me and the list view mode.
    pub prefs: Kv,
    pub config: BackendConfig,
}

impl Backend {
    pub fn new(config: BackendConfig) -> Self {
        let gateway = RestGateway::new(config.clone());
        let token = gateway.access_token();
        Self {
            auth: RestAuth::new(config.clone(), platform::kv(), token.clone()),
            storage: RestStorage::new(config.clone(), token),
            cache: OfflineCache::new(platform::snapshots()),
            biometric: BiometricAuth::new(platform::authenticator(), platform::kv()),
            prefs: platform::kv(),
            gateway,
            config,
        }
    }

    /// Build from the compile-time configuration.
    pub fn from_compiled() -> Self {
        let config = BackendConfig::compiled().unwrap_or_else(|e| {
            tracing::error!("backend not configured ({e}), using {FALLBACK_URL}");
            BackendConfig::new(FALLBACK_URL, "")
        });
        Self::new(config)
    }
}

/// The app's backend. Panics outside an [`crate::AuthProvider`].
pub fn use_backend() -> Rc<Backend> {
    use_context::<Rc<Backend>>()
}
