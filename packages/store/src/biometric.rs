//! # Biometric credential helper
//!
//! [`BiometricAuth`] wraps a device's platform authenticator (fingerprint, face
//! unlock) for quick re-authentication. It registers one device-bound credential,
//! remembers its descriptor in a [`KeyValueStore`] under
//! [`CREDENTIAL_STORAGE_KEY`], and later asks the platform for an assertion
//! against it.
//!
//! The assertion is trusted locally and never sent to a server for verification.
//! A successful [`authenticate`](BiometricAuth::authenticate) is a local UX gate in
//! front of a silent token refresh, not an authentication boundary.
//!
//! The platform itself sits behind [`PlatformAuthenticator`]; the web binding is
//! `crate::webauthn::WebAuthenticator`.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::local::KeyValueStore;
use crate::offline::current_millis;

pub const CREDENTIAL_STORAGE_KEY: &str = "recipe-box-webauthn-credentials";
pub const RELYING_PARTY_NAME: &str = "Virtual Recipe Box";

/// COSE algorithm ids: ES256, RS256.
pub const PUBLIC_KEY_ALGORITHMS: [i32; 2] = [-7, -257];
pub const PROMPT_TIMEOUT_MS: u32 = 60_000;

/// Stored descriptor of the registered credential.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BiometricCredential {
    pub id: String,
    /// Raw credential id, standard base64.
    pub public_key: String,
    pub device_name: String,
    pub created_at: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum BiometricError {
    #[error("Biometric authentication is not supported on this device")]
    Unsupported,
    #[error("Biometric authentication was cancelled")]
    Cancelled,
    #[error("No biometric credential found. Please set up biometric authentication first.")]
    NoCredential,
    #[error("Biometric authentication failed: {0}")]
    Failed(String),
    #[error("Failed to store biometric credential: {0}")]
    Storage(#[from] StoreError),
}

/// Error reported by a platform authenticator call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformError {
    /// The user dismissed the prompt or it timed out.
    NotAllowed,
    Other(String),
}

impl From<PlatformError> for BiometricError {
    fn from(err: PlatformError) -> Self {
        match err {
            PlatformError::NotAllowed => BiometricError::Cancelled,
            PlatformError::Other(msg) => BiometricError::Failed(msg),
        }
    }
}

/// Options for creating a platform credential.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreationOptions {
    pub challenge: [u8; 32],
    pub rp_name: String,
    pub user_id: String,
    pub user_name: String,
    pub algorithms: Vec<i32>,
    pub timeout_ms: u32,
}

/// A freshly created credential.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreatedCredential {
    pub id: String,
    pub raw_id: Vec<u8>,
}

/// Options for requesting an assertion against one known credential.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssertionOptions {
    pub challenge: [u8; 32],
    pub allow_credential: Vec<u8>,
    pub timeout_ms: u32,
}

/// The device's credential API.
///
/// Every request requires a platform attachment and user verification.
pub trait PlatformAuthenticator {
    /// Whether the credential API exists at all.
    fn is_supported(&self) -> bool;
    fn is_platform_authenticator_available(
        &self,
    ) -> impl std::future::Future<Output = Result<bool, PlatformError>>;
    fn create(
        &self,
        options: &CreationOptions,
    ) -> impl std::future::Future<Output = Result<CreatedCredential, PlatformError>>;
    /// Resolves once the platform produced an assertion.
    fn get(
        &self,
        options: &AssertionOptions,
    ) -> impl std::future::Future<Output = Result<(), PlatformError>>;
    /// Human-readable label for the current device.
    fn device_name(&self) -> String;
}

/// Coarse device label derived from a browser user-agent string.
pub fn device_name_from_user_agent(ua: &str) -> &'static str {
    if ua.contains("iPhone") {
        "iPhone"
    } else if ua.contains("iPad") {
        "iPad"
    } else if ua.contains("Android") {
        "Android Device"
    } else if ua.contains("Mac") {
        "Mac"
    } else if ua.contains("Windows") {
        "Windows PC"
    } else {
        "This Device"
    }
}

/// Stand-in for targets without a credential API, such as desktop builds and
/// server rendering. Reports itself unsupported.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoAuthenticator;

impl PlatformAuthenticator for NoAuthenticator {
    fn is_supported(&self) -> bool {
        false
    }

    async fn is_platform_authenticator_available(&self) -> Result<bool, PlatformError> {
        Ok(false)
    }

    async fn create(&self, _options: &CreationOptions) -> Result<CreatedCredential, PlatformError> {
        Err(PlatformError::Other("no platform authenticator".into()))
    }

    async fn get(&self, _options: &AssertionOptions) -> Result<(), PlatformError> {
        Err(PlatformError::Other("no platform authenticator".into()))
    }

    fn device_name(&self) -> String {
        "This Device".into()
    }
}

fn random_challenge() -> [u8; 32] {
    rand::random()
}

pub struct BiometricAuth<P: PlatformAuthenticator, K: KeyValueStore> {
    platform: P,
    storage: K,
}

impl<P: PlatformAuthenticator, K: KeyValueStore> BiometricAuth<P, K> {
    pub fn new(platform: P, storage: K) -> Self {
        Self { platform, storage }
    }

    pub fn is_supported(&self) -> bool {
        self.platform.is_supported()
    }

    pub async fn is_platform_authenticator_available(&self) -> bool {
        if !self.platform.is_supported() {
            return false;
        }
        match self.platform.is_platform_authenticator_available().await {
            Ok(available) => available,
            Err(e) => {
                tracing::warn!("platform authenticator probe failed: {e:?}");
                false
            }
        }
    }

    /// Register a credential for `user_id`, replacing any stored descriptor.
    pub async fn register(
        &self,
        user_id: &str,
        email: &str,
    ) -> Result<BiometricCredential, BiometricError> {
        if !self.platform.is_supported() {
            return Err(BiometricError::Unsupported);
        }

        let options = CreationOptions {
            challenge: random_challenge(),
            rp_name: RELYING_PARTY_NAME.to_string(),
            user_id: user_id.to_string(),
            user_name: email.to_string(),
            algorithms: PUBLIC_KEY_ALGORITHMS.to_vec(),
            timeout_ms: PROMPT_TIMEOUT_MS,
        };
        let created = self.platform.create(&options).await?;

        let credential = BiometricCredential {
            id: created.id,
            public_key: BASE64.encode(&created.raw_id),
            device_name: self.platform.device_name(),
            created_at: current_millis(),
        };
        self.storage.set_item(
            CREDENTIAL_STORAGE_KEY,
            &serde_json::to_string(&credential).map_err(StoreError::from)?,
        )?;
        tracing::info!(device = %credential.device_name, "registered biometric credential");
        Ok(credential)
    }

    /// Ask the platform for an assertion against the stored credential.
    pub async fn authenticate(&self) -> Result<bool, BiometricError> {
        if !self.platform.is_supported() {
            return Err(BiometricError::Unsupported);
        }
        let credential = self.credential()?.ok_or(BiometricError::NoCredential)?;
        let raw_id = BASE64
            .decode(&credential.public_key)
            .map_err(|e| BiometricError::Failed(format!("corrupt credential id: {e}")))?;

        let options = AssertionOptions {
            challenge: random_challenge(),
            allow_credential: raw_id,
            timeout_ms: PROMPT_TIMEOUT_MS,
        };
        self.platform.get(&options).await?;
        Ok(true)
    }

    pub fn credential(&self) -> Result<Option<BiometricCredential>, BiometricError> {
        let Some(json) = self.storage.get_item(CREDENTIAL_STORAGE_KEY)? else {
            return Ok(None);
        };
        Ok(serde_json::from_str(&json).map_err(StoreError::from)?)
    }

    pub fn has_credential(&self) -> bool {
        match self.credential() {
            Ok(c) => c.is_some(),
            Err(e) => {
                tracing::warn!("failed to read biometric credential: {e}");
                false
            }
        }
    }

    pub fn remove(&self) -> Result<(), BiometricError> {
        self.storage.remove_item(CREDENTIAL_STORAGE_KEY)?;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::MemoryStore;

    /// Scripted platform authenticator.
    #[derive(Default)]
    pub(crate) struct FakeAuthenticator {
        pub unsupported: bool,
        pub dismiss: bool,
        pub last_assertion: RefCell<Option<AssertionOptions>>,
    }

    impl PlatformAuthenticator for FakeAuthenticator {
        fn is_supported(&self) -> bool {
            !self.unsupported
        }

        async fn is_platform_authenticator_available(&self) -> Result<bool, PlatformError> {
            Err(PlatformError::Other("probe exploded".into()))
        }

        async fn create(&self, options: &CreationOptions) -> Result<CreatedCredential, PlatformError> {
            if self.dismiss {
                return Err(PlatformError::NotAllowed);
            }
            assert_eq!(options.rp_name, RELYING_PARTY_NAME);
            assert_eq!(options.algorithms, vec![-7, -257]);
            Ok(CreatedCredential {
                id: format!("cred-{}", options.user_id),
                raw_id: vec![0xde, 0xad, 0xbe, 0xef],
            })
        }

        async fn get(&self, options: &AssertionOptions) -> Result<(), PlatformError> {
            if self.dismiss {
                return Err(PlatformError::NotAllowed);
            }
            *self.last_assertion.borrow_mut() = Some(options.clone());
            Ok(())
        }

        fn device_name(&self) -> String {
            "Test Device".into()
        }
    }

    #[tokio::test]
    async fn test_register_then_remove() {
        let auth = BiometricAuth::new(FakeAuthenticator::default(), MemoryStore::new());
        assert!(!auth.has_credential());

        let cred = auth.register("u1", "cook@example.com").await.unwrap();
        assert_eq!(cred.id, "cred-u1");
        assert_eq!(cred.public_key, "3q2+7w==");
        assert_eq!(cred.device_name, "Test Device");
        assert!(auth.has_credential());

        let stored: serde_json::Value = serde_json::from_str(
            &auth.storage.get_item(CREDENTIAL_STORAGE_KEY).unwrap().unwrap(),
        )
        .unwrap();
        assert_eq!(stored["publicKey"], "3q2+7w==");
        assert_eq!(stored["deviceName"], "Test Device");
        assert!(stored["createdAt"].is_i64());

        auth.remove().unwrap();
        assert!(!auth.has_credential());
    }

    #[tokio::test]
    async fn test_authenticate_uses_stored_credential() {
        let auth = BiometricAuth::new(FakeAuthenticator::default(), MemoryStore::new());
        assert!(matches!(auth.authenticate().await, Err(BiometricError::NoCredential)));

        auth.register("u1", "cook@example.com").await.unwrap();
        assert!(auth.authenticate().await.unwrap());

        let sent = auth.platform.last_assertion.borrow().clone().unwrap();
        assert_eq!(sent.allow_credential, vec![0xde, 0xad, 0xbe, 0xef]);
    }

    #[tokio::test]
    async fn test_dismissed_prompt_is_cancelled() {
        let platform = FakeAuthenticator { dismiss: true, ..Default::default() };
        let auth = BiometricAuth::new(platform, MemoryStore::new());
        assert!(matches!(
            auth.register("u1", "cook@example.com").await,
            Err(BiometricError::Cancelled)
        ));
        assert!(!auth.has_credential());
    }

    #[test]
    fn test_device_name_from_user_agent() {
        assert_eq!(
            device_name_from_user_agent("Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X)"),
            "iPhone"
        );
        assert_eq!(device_name_from_user_agent("Mozilla/5.0 (Linux; Android 14)"), "Android Device");
        assert_eq!(device_name_from_user_agent("curl/8.0"), "This Device");
    }

    #[tokio::test]
    async fn test_probes_fail_closed() {
        let auth = BiometricAuth::new(FakeAuthenticator::default(), MemoryStore::new());
        assert!(auth.is_supported());
        assert!(!auth.is_platform_authenticator_available().await);

        let platform = FakeAuthenticator { unsupported: true, ..Default::default() };
        let auth = BiometricAuth::new(platform, MemoryStore::new());
        assert!(!auth.is_supported());
        assert!(matches!(
            auth.register("u1", "cook@example.com").await,
            Err(BiometricError::Unsupported)
        ));
    }

    #[tokio::test]
    async fn test_no_authenticator() {
        let auth = BiometricAuth::new(NoAuthenticator, MemoryStore::new());
        assert!(!auth.is_supported());
        assert!(!auth.is_platform_authenticator_available().await);
        assert!(matches!(auth.authenticate().await, Err(BiometricError::Unsupported)));
    }
}
