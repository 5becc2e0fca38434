use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::{now_secs, AdminAuth, AuthBackend, AuthUser, Session};
use crate::error::{ApiError, ApiResult};

const TOKEN_LIFETIME_SECS: i64 = 3600;

#[derive(Debug, Default)]
struct Inner {
    /// Keyed by lowercased email.
    users: HashMap<String, (AuthUser, String)>,
    session: Option<Session>,
    refresh_fails: bool,
    issued: u64,
}

/// In-process auth service for tests. Cloning shares state.
#[derive(Clone, Debug, Default)]
pub struct MemoryAuth {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryAuth {
    pub fn new() -> Self {
        Self::default()
    }

    fn inner(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Drop the current session, as if the stored token vanished.
    pub fn expire_session(&self) {
        self.inner().session = None;
    }

    /// Make every subsequent refresh fail.
    pub fn set_refresh_failure(&self, fails: bool) {
        self.inner().refresh_fails = fails;
    }

    pub fn set_expires_at(&self, expires_at: i64) {
        if let Some(s) = self.inner().session.as_mut() {
            s.expires_at = expires_at;
        }
    }

    pub fn current_session(&self) -> Option<Session> {
        self.inner().session.clone()
    }

    fn issue(inner: &mut Inner, user: AuthUser) -> Session {
        inner.issued += 1;
        let session = Session {
            access_token: format!("access-{}", inner.issued),
            refresh_token: format!("refresh-{}", inner.issued),
            expires_at: now_secs() + TOKEN_LIFETIME_SECS,
            user,
            not_after: None,
        };
        inner.session = Some(session.clone());
        session
    }
}

impl AuthBackend for MemoryAuth {
    async fn get_session(&self) -> ApiResult<Option<Session>> {
        Ok(self.inner().session.clone())
    }

    async fn refresh_session(&self) -> ApiResult<Session> {
        let mut inner = self.inner();
        let Some(current) = inner.session.clone() else {
            return Err(ApiError::Unauthenticated);
        };
        if inner.refresh_fails {
            return Err(ApiError::Status {
                status: 400,
                message: "Invalid Refresh Token".into(),
            });
        }
        Ok(Self::issue(&mut inner, current.user))
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> ApiResult<Session> {
        let mut inner = self.inner();
        let user = match inner.users.get(&email.to_lowercase()) {
            Some((user, stored)) if stored == password => user.clone(),
            _ => {
                return Err(ApiError::Status {
                    status: 400,
                    message: "Invalid login credentials".into(),
                })
            }
        };
        inner.refresh_fails = false;
        Ok(Self::issue(&mut inner, user))
    }

    async fn sign_out(&self) -> ApiResult<()> {
        self.inner().session = None;
        Ok(())
    }

    async fn get_user(&self) -> ApiResult<Option<AuthUser>> {
        Ok(self.inner().session.as_ref().map(|s| s.user.clone()))
    }
}

impl AdminAuth for MemoryAuth {
    async fn create_user(
        &self,
        email: &str,
        password: &str,
        _display_name: &str,
    ) -> ApiResult<AuthUser> {
        let mut inner = self.inner();
        let key = email.to_lowercase();
        if inner.users.contains_key(&key) {
            return Err(ApiError::Status {
                status: 422,
                message: "User already registered".into(),
            });
        }
        let user = AuthUser {
            id: uuid::Uuid::new_v4().to_string(),
            email: Some(email.to_string()),
        };
        inner.users.insert(key, (user.clone(), password.to_string()));
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sign_in_and_refresh() {
        let auth = MemoryAuth::new();
        let user = auth.create_user("cook@example.com", "secret1", "Cook").await.unwrap();

        assert!(auth.sign_in_with_password("cook@example.com", "wrong").await.is_err());
        let session = auth
            .sign_in_with_password("Cook@Example.com", "secret1")
            .await
            .unwrap();
        assert_eq!(session.user, user);

        let refreshed = auth.refresh_session().await.unwrap();
        assert_ne!(refreshed.access_token, session.access_token);

        auth.set_refresh_failure(true);
        assert!(auth.refresh_session().await.is_err());

        auth.sign_out().await.unwrap();
        assert!(auth.get_session().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_user_rejected() {
        let auth = MemoryAuth::new();
        auth.create_user("cook@example.com", "secret1", "Cook").await.unwrap();
        assert!(matches!(
            auth.create_user("cook@example.com", "secret2", "Cook").await,
            Err(ApiError::Status { status: 422, .. })
        ));
    }
}
