//! GoTrue-backed auth clients.

use reqwest::{Method, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::json;
use store::{KeyValueStore, SessionPreference};

use super::{now_secs, AdminAuth, AuthBackend, AuthUser, Session};
use crate::config::BackendConfig;
use crate::error::{error_message, ApiError, ApiResult};
use crate::gateway::AccessToken;

/// Local key holding the serialised [`Session`].
pub const AUTH_TOKEN_KEY: &str = "recipe-box-auth-token";

const DEFAULT_TOKEN_LIFETIME_SECS: i64 = 3600;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    expires_at: Option<i64>,
    user: AuthUser,
}

impl TokenResponse {
    fn into_session(self, not_after: Option<i64>) -> Session {
        let expires_at = self.expires_at.unwrap_or_else(|| {
            now_secs() + self.expires_in.unwrap_or(DEFAULT_TOKEN_LIFETIME_SECS)
        });
        Session {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at,
            user: self.user,
            not_after,
        }
    }
}

async fn check(resp: Response) -> ApiResult<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(ApiError::Status {
        status: status.as_u16(),
        message: error_message(&body),
    })
}

/// End-user auth client. The session lives in `storage` under [`AUTH_TOKEN_KEY`]
/// and its access token is mirrored into the gateway's [`AccessToken`].
pub struct RestAuth<K: KeyValueStore> {
    client: reqwest::Client,
    config: BackendConfig,
    storage: K,
    token: AccessToken,
}

impl<K: KeyValueStore> RestAuth<K> {
    pub fn new(config: BackendConfig, storage: K, token: AccessToken) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
            storage,
            token,
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, self.config.endpoint(path))
            .header("apikey", &self.config.anon_key)
    }

    /// The persisted session. An unreadable record is logged, dropped and
    /// reported as no session.
    fn stored_session(&self) -> ApiResult<Option<Session>> {
        let Some(json) = self.storage.get_item(AUTH_TOKEN_KEY)? else {
            return Ok(None);
        };
        match serde_json::from_str(&json) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                tracing::warn!("discarding unreadable stored session: {e}");
                if let Err(e) = self.storage.remove_item(AUTH_TOKEN_KEY) {
                    tracing::warn!("failed to remove stored session: {e}");
                }
                Ok(None)
            }
        }
    }

    fn persist(&self, session: &Session) -> ApiResult<()> {
        self.storage
            .set_item(AUTH_TOKEN_KEY, &serde_json::to_string(session)?)?;
        self.set_token(Some(session.access_token.clone()));
        Ok(())
    }

    fn clear(&self) -> ApiResult<()> {
        self.set_token(None);
        self.storage.remove_item(AUTH_TOKEN_KEY)?;
        Ok(())
    }

    fn set_token(&self, value: Option<String>) {
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = value;
    }
}

impl<K: KeyValueStore> AuthBackend for RestAuth<K> {
    async fn get_session(&self) -> ApiResult<Option<Session>> {
        let session = self.stored_session()?;
        if let Some(s) = &session {
            self.set_token(Some(s.access_token.clone()));
        }
        Ok(session)
    }

    async fn refresh_session(&self) -> ApiResult<Session> {
        let current = self.stored_session()?.ok_or(ApiError::Unauthenticated)?;
        if current.not_after.is_some_and(|deadline| now_secs() >= deadline) {
            tracing::info!("session passed its remember-me deadline");
            self.clear()?;
            return Err(ApiError::Unauthenticated);
        }

        let resp = self
            .request(Method::POST, "auth/v1/token?grant_type=refresh_token")
            .json(&json!({ "refresh_token": current.refresh_token }))
            .send()
            .await?;
        let tokens: TokenResponse = check(resp).await?.json().await?;
        let session = tokens.into_session(current.not_after);
        self.persist(&session)?;
        Ok(session)
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> ApiResult<Session> {
        let preference = SessionPreference::load(&self.storage);
        let resp = self
            .request(Method::POST, "auth/v1/token?grant_type=password")
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;
        let tokens: TokenResponse = check(resp).await?.json().await?;

        let not_after = now_secs() + preference.duration.as_secs() as i64;
        let session = tokens.into_session(Some(not_after));
        self.persist(&session)?;
        tracing::info!(user_id = %session.user.id, "signed in");
        Ok(session)
    }

    async fn sign_out(&self) -> ApiResult<()> {
        let session = self.stored_session()?;
        self.clear()?;
        if let Some(session) = session {
            let resp = self
                .request(Method::POST, "auth/v1/logout")
                .bearer_auth(&session.access_token)
                .send()
                .await?;
            if let Err(e) = check(resp).await {
                tracing::warn!("remote sign-out failed: {e}");
            }
        }
        Ok(())
    }

    async fn get_user(&self) -> ApiResult<Option<AuthUser>> {
        let Some(session) = self.stored_session()? else {
            return Ok(None);
        };
        let resp = self
            .request(Method::GET, "auth/v1/user")
            .bearer_auth(&session.access_token)
            .send()
            .await?;
        if resp.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Ok(None);
        }
        Ok(Some(check(resp).await?.json().await?))
    }
}

/// Service-role client for the admin user endpoint.
pub struct RestAdminAuth {
    client: reqwest::Client,
    config: BackendConfig,
    service_role_key: String,
}

impl RestAdminAuth {
    pub fn new(config: BackendConfig, service_role_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
            service_role_key,
        }
    }
}

impl AdminAuth for RestAdminAuth {
    async fn create_user(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> ApiResult<AuthUser> {
        let resp = self
            .client
            .post(self.config.endpoint("auth/v1/admin/users"))
            .header("apikey", &self.service_role_key)
            .bearer_auth(&self.service_role_key)
            .json(&json!({
                "email": email,
                "password": password,
                "email_confirm": true,
                "user_metadata": { "display_name": display_name },
            }))
            .send()
            .await?;
        Ok(check(resp).await?.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use store::MemoryStore;

    fn session(not_after: Option<i64>) -> Session {
        Session {
            access_token: "jwt".into(),
            refresh_token: "refresh".into(),
            expires_at: now_secs() + 3600,
            user: AuthUser {
                id: "u1".into(),
                email: Some("cook@example.com".into()),
            },
            not_after,
        }
    }

    fn client(storage: MemoryStore) -> (RestAuth<MemoryStore>, AccessToken) {
        let token = AccessToken::default();
        let auth = RestAuth::new(
            BackendConfig::new("http://127.0.0.1:9", "anon"),
            storage,
            token.clone(),
        );
        (auth, token)
    }

    #[tokio::test]
    async fn test_get_session_restores_token() {
        let storage = MemoryStore::new();
        storage
            .set_item(AUTH_TOKEN_KEY, &serde_json::to_string(&session(None)).unwrap())
            .unwrap();
        let (auth, token) = client(storage);

        let restored = auth.get_session().await.unwrap().unwrap();
        assert_eq!(restored.user.id, "u1");
        assert_eq!(token.read().unwrap().as_deref(), Some("jwt"));
    }

    #[tokio::test]
    async fn test_refresh_past_deadline_signs_out_locally() {
        let storage = MemoryStore::new();
        storage
            .set_item(
                AUTH_TOKEN_KEY,
                &serde_json::to_string(&session(Some(now_secs() - 1))).unwrap(),
            )
            .unwrap();
        let (auth, token) = client(storage.clone());

        assert!(matches!(
            auth.refresh_session().await,
            Err(ApiError::Unauthenticated)
        ));
        assert!(storage.get_item(AUTH_TOKEN_KEY).unwrap().is_none());
        assert!(token.read().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_corrupt_stored_session_reads_as_signed_out() {
        let storage = MemoryStore::new();
        storage.set_item(AUTH_TOKEN_KEY, "{\"access_token\":").unwrap();
        let (auth, token) = client(storage.clone());

        assert!(auth.get_session().await.unwrap().is_none());
        assert!(token.read().unwrap().is_none());
        assert!(storage.get_item(AUTH_TOKEN_KEY).unwrap().is_none());
        assert!(matches!(
            auth.refresh_session().await,
            Err(ApiError::Unauthenticated)
        ));
    }

    #[tokio::test]
    async fn test_refresh_without_session_is_unauthenticated() {
        let (auth, _) = client(MemoryStore::new());
        assert!(matches!(
            auth.refresh_session().await,
            Err(ApiError::Unauthenticated)
        ));
        assert!(auth.get_user().await.unwrap().is_none());
    }

    #[test]
    fn test_token_response_computes_expiry() {
        let tokens: TokenResponse = serde_json::from_value(json!({
            "access_token": "a",
            "refresh_token": "r",
            "expires_in": 60,
            "user": { "id": "u1", "email": "cook@example.com" }
        }))
        .unwrap();
        let before = now_secs();
        let session = tokens.into_session(None);
        assert!(session.expires_at >= before + 60);
        assert_eq!(session.user.email.as_deref(), Some("cook@example.com"));
    }
}
