//! # Session and re-authentication controller
//!
//! The client's view of "am I signed in" is a small state machine. Events from
//! the auth client (initial load, sign-in, refresh outcome, sign-out) and from
//! the re-auth prompt drive it through [`transition`]; the UI subscribes to the
//! resulting [`SessionState`] through a [`SessionController`].
//!
//! ```text
//!            InitialSession(Some)            TokenRefreshed(None) | RefreshFailed
//! Unknown ───────────────────▶ Authenticated ───────────────────────────▶ ReauthRequired
//!    │                          ▲        ▲  TokenRefreshed(Some) | Reauthenticated │
//!    │ InitialSession(None)     │        └───────────────────────────────────────┘
//!    ▼                SignedIn  │                                          │ ReauthDeclined
//! Unauthenticated ◀─────────────┴──────────── SignedOut (from any) ◀───────┘
//! ```
//!
//! ## Driver
//!
//! The async functions at the bottom of this module talk to an [`AuthBackend`]
//! and dispatch the outcome. Nothing retries on its own: the UI calls
//! [`check_on_visible`] when the app returns to the foreground and [`poll`] on a
//! timer whose period comes from [`next_check_interval`].

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::{Rc, Weak};
use std::time::Duration;

use store::{BiometricAuth, KeyValueStore, PlatformAuthenticator};

use crate::auth::{now_secs, AuthBackend, AuthUser, Session};
use crate::error::{ApiError, ApiResult};

pub const CHECK_INTERVAL: Duration = Duration::from_secs(5 * 60);
pub const EXPIRING_CHECK_INTERVAL: Duration = Duration::from_secs(60);
const EXPIRING_WINDOW_SECS: i64 = 10 * 60;
const REFRESH_WINDOW_SECS: i64 = 5 * 60;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Unknown,
    Authenticated(AuthUser),
    Unauthenticated,
    /// The token could not be refreshed silently; the user must act.
    ReauthRequired(AuthUser),
}

impl SessionState {
    pub fn user(&self) -> Option<&AuthUser> {
        match self {
            SessionState::Authenticated(u) | SessionState::ReauthRequired(u) => Some(u),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    InitialSession(Option<AuthUser>),
    SignedIn(AuthUser),
    SignedOut,
    TokenRefreshed(Option<AuthUser>),
    RefreshFailed,
    Reauthenticated(AuthUser),
    ReauthDeclined,
}

/// Pure state transition. Pairs not listed leave the state unchanged.
pub fn transition(state: &SessionState, event: &SessionEvent) -> SessionState {
    use SessionEvent as E;
    use SessionState as S;

    match (state, event) {
        (S::Unknown, E::InitialSession(Some(u))) => S::Authenticated(u.clone()),
        (S::Unknown, E::InitialSession(None)) => S::Unauthenticated,
        (_, E::SignedIn(u)) => S::Authenticated(u.clone()),
        (_, E::SignedOut) => S::Unauthenticated,
        (S::Authenticated(u), E::TokenRefreshed(None) | E::RefreshFailed) => {
            S::ReauthRequired(u.clone())
        }
        (S::Authenticated(_) | S::ReauthRequired(_), E::TokenRefreshed(Some(u))) => {
            S::Authenticated(u.clone())
        }
        (S::ReauthRequired(_), E::Reauthenticated(u)) => S::Authenticated(u.clone()),
        (S::ReauthRequired(_), E::ReauthDeclined) => S::Unauthenticated,
        (current, _) => current.clone(),
    }
}

type Callback = Rc<RefCell<dyn FnMut(&SessionState)>>;

struct Shared {
    state: RefCell<SessionState>,
    next_id: Cell<u64>,
    subscribers: RefCell<Vec<(u64, Callback)>>,
    /// States not yet delivered to subscribers, oldest first.
    pending: RefCell<VecDeque<SessionState>>,
    notifying: Cell<bool>,
}

/// Observable holder of the current [`SessionState`]. Cloning shares the store.
///
/// A dispatch made from inside a subscriber applies its transition at once and
/// queues the resulting state; the outermost dispatch delivers every queued
/// state, in order, to every subscriber.
#[derive(Clone)]
pub struct SessionController {
    inner: Rc<Shared>,
}

impl Default for SessionController {
    fn default() -> Self {
        Self::new()
    }
}

/// Keeps a subscriber registered until dropped.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    inner: Weak<Shared>,
    id: u64,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let Some(inner) = self.inner.upgrade() else { return };
        let removed: Vec<(u64, Callback)> = {
            let mut subscribers = inner.subscribers.borrow_mut();
            let (removed, kept) = std::mem::take(&mut *subscribers)
                .into_iter()
                .partition(|(id, _)| *id == self.id);
            *subscribers = kept;
            removed
        };
        // Callbacks may own subscriptions themselves; release them unborrowed.
        drop(removed);
    }
}

impl SessionController {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(Shared {
                state: RefCell::new(SessionState::Unknown),
                next_id: Cell::new(0),
                subscribers: RefCell::new(Vec::new()),
                pending: RefCell::new(VecDeque::new()),
                notifying: Cell::new(false),
            }),
        }
    }

    pub fn state(&self) -> SessionState {
        self.inner.state.borrow().clone()
    }

    pub fn subscribe(&self, callback: impl FnMut(&SessionState) + 'static) -> Subscription {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);
        self.inner
            .subscribers
            .borrow_mut()
            .push((id, Rc::new(RefCell::new(callback))));
        Subscription {
            inner: Rc::downgrade(&self.inner),
            id,
        }
    }

    /// Apply `event` and notify every still-registered subscriber.
    pub fn dispatch(&self, event: SessionEvent) -> SessionState {
        let next = {
            let mut state = self.inner.state.borrow_mut();
            let next = transition(&state, &event);
            if next != *state {
                tracing::debug!(?event, from = ?state, to = ?next, "session transition");
            }
            *state = next.clone();
            next
        };
        self.inner.pending.borrow_mut().push_back(next.clone());

        if self.inner.notifying.replace(true) {
            return next;
        }
        loop {
            let Some(delivered) = self.inner.pending.borrow_mut().pop_front() else { break };
            let callbacks: Vec<(u64, Callback)> = self.inner.subscribers.borrow().clone();
            for (id, callback) in callbacks {
                let registered = self
                    .inner
                    .subscribers
                    .borrow()
                    .iter()
                    .any(|(sid, _)| *sid == id);
                if registered {
                    let mut f = callback.borrow_mut();
                    f(&delivered);
                }
            }
        }
        self.inner.notifying.set(false);
        next
    }
}

/// True once the access token expires within five minutes.
pub fn should_refresh(expires_at: i64, now: i64) -> bool {
    expires_at - now < REFRESH_WINDOW_SECS
}

/// Delay until the next foreground check: every minute once the token is
/// within ten minutes of expiry, every five minutes otherwise.
pub fn next_check_interval(expires_at: Option<i64>, now: i64) -> Duration {
    match expires_at {
        Some(at) if at - now < EXPIRING_WINDOW_SECS => EXPIRING_CHECK_INTERVAL,
        _ => CHECK_INTERVAL,
    }
}

/// Load the persisted session once and settle the initial state.
pub async fn start(controller: &SessionController, auth: &impl AuthBackend) -> SessionState {
    let user = match auth.get_session().await {
        Ok(session) => session.map(|s| s.user),
        Err(e) => {
            tracing::warn!("failed to read initial session: {e}");
            None
        }
    };
    controller.dispatch(SessionEvent::InitialSession(user))
}

/// Foreground check: re-read the session and try a silent refresh.
pub async fn check_on_visible(controller: &SessionController, auth: &impl AuthBackend) {
    if !controller.state().is_authenticated() {
        return;
    }
    match auth.get_session().await {
        Ok(Some(_)) => refresh(controller, auth).await,
        Ok(None) => {
            controller.dispatch(SessionEvent::RefreshFailed);
        }
        Err(e) => {
            tracing::warn!("session lookup failed: {e}");
            controller.dispatch(SessionEvent::RefreshFailed);
        }
    }
}

async fn refresh(controller: &SessionController, auth: &impl AuthBackend) {
    match auth.refresh_session().await {
        Ok(session) => {
            controller.dispatch(SessionEvent::TokenRefreshed(Some(session.user)));
        }
        Err(e) => {
            tracing::warn!("silent refresh failed: {e}");
            controller.dispatch(SessionEvent::RefreshFailed);
        }
    }
}

/// Timer tick: refresh when the token is about to expire. Returns the delay
/// until the next tick.
pub async fn poll(controller: &SessionController, auth: &impl AuthBackend) -> Duration {
    if !controller.state().is_authenticated() {
        return CHECK_INTERVAL;
    }
    let now = now_secs();
    let session = match auth.get_session().await {
        Ok(Some(session)) => session,
        Ok(None) | Err(_) => {
            controller.dispatch(SessionEvent::RefreshFailed);
            return CHECK_INTERVAL;
        }
    };
    if !should_refresh(session.expires_at, now) {
        return next_check_interval(Some(session.expires_at), now);
    }

    refresh(controller, auth).await;
    match auth.get_session().await {
        Ok(Some(s)) if controller.state().is_authenticated() => {
            next_check_interval(Some(s.expires_at), now)
        }
        _ => CHECK_INTERVAL,
    }
}

pub async fn sign_in(
    controller: &SessionController,
    auth: &impl AuthBackend,
    email: &str,
    password: &str,
) -> ApiResult<Session> {
    let session = auth.sign_in_with_password(email, password).await?;
    controller.dispatch(SessionEvent::SignedIn(session.user.clone()));
    Ok(session)
}

pub async fn sign_out(controller: &SessionController, auth: &impl AuthBackend) -> ApiResult<()> {
    let result = auth.sign_out().await;
    controller.dispatch(SessionEvent::SignedOut);
    result
}

/// Re-submit the stored user's email with `password`.
pub async fn reauthenticate_with_password(
    controller: &SessionController,
    auth: &impl AuthBackend,
    password: &str,
) -> ApiResult<()> {
    let email = controller
        .state()
        .user()
        .and_then(|u| u.email.clone())
        .ok_or_else(|| ApiError::Validation("No user email found".into()))?;
    let session = auth.sign_in_with_password(&email, password).await?;
    controller.dispatch(SessionEvent::Reauthenticated(session.user));
    Ok(())
}

/// Local biometric gate followed by a silent refresh.
pub async fn reauthenticate_with_biometric<P, K>(
    controller: &SessionController,
    auth: &impl AuthBackend,
    biometric: &BiometricAuth<P, K>,
) -> ApiResult<()>
where
    P: PlatformAuthenticator,
    K: KeyValueStore,
{
    if !biometric.authenticate().await? {
        return Err(ApiError::Unauthenticated);
    }
    let session = auth.refresh_session().await?;
    controller.dispatch(SessionEvent::Reauthenticated(session.user));
    Ok(())
}

pub fn decline_reauth(controller: &SessionController) -> SessionState {
    controller.dispatch(SessionEvent::ReauthDeclined)
}

#[cfg(test)]
mod tests {

    use store::biometric::{
        AssertionOptions, CreatedCredential, CreationOptions, PlatformError,
    };
    use store::MemoryStore;

    use super::*;
    use crate::auth::{AdminAuth, MemoryAuth};

    fn user(id: &str) -> AuthUser {
        AuthUser {
            id: id.to_string(),
            email: Some(format!("{id}@example.com")),
        }
    }

    #[test]
    fn test_transition_table() {
        use SessionEvent as E;
        use SessionState as S;
        let u = user("u1");

        assert_eq!(
            transition(&S::Unknown, &E::InitialSession(Some(u.clone()))),
            S::Authenticated(u.clone())
        );
        assert_eq!(transition(&S::Unknown, &E::InitialSession(None)), S::Unauthenticated);
        assert_eq!(
            transition(&S::Unauthenticated, &E::SignedIn(u.clone())),
            S::Authenticated(u.clone())
        );
        assert_eq!(
            transition(&S::ReauthRequired(u.clone()), &E::SignedOut),
            S::Unauthenticated
        );
        assert_eq!(
            transition(&S::Authenticated(u.clone()), &E::TokenRefreshed(None)),
            S::ReauthRequired(u.clone())
        );
        assert_eq!(
            transition(&S::Authenticated(u.clone()), &E::RefreshFailed),
            S::ReauthRequired(u.clone())
        );
        assert_eq!(
            transition(&S::ReauthRequired(u.clone()), &E::TokenRefreshed(Some(u.clone()))),
            S::Authenticated(u.clone())
        );
        assert_eq!(
            transition(&S::ReauthRequired(u.clone()), &E::Reauthenticated(u.clone())),
            S::Authenticated(u.clone())
        );
        assert_eq!(
            transition(&S::ReauthRequired(u.clone()), &E::ReauthDeclined),
            S::Unauthenticated
        );

        // Unlisted pairs are no-ops
        assert_eq!(transition(&S::Unauthenticated, &E::RefreshFailed), S::Unauthenticated);
        assert_eq!(
            transition(&S::Authenticated(u.clone()), &E::InitialSession(None)),
            S::Authenticated(u.clone())
        );
        assert_eq!(transition(&S::Unknown, &E::ReauthDeclined), S::Unknown);
    }

    #[test]
    fn test_dropped_subscription_stops_notifications() {
        let controller = SessionController::new();
        let calls = Rc::new(Cell::new(0));

        let counter = calls.clone();
        let sub = controller.subscribe(move |_| counter.set(counter.get() + 1));
        controller.dispatch(SessionEvent::InitialSession(None));
        assert_eq!(calls.get(), 1);

        drop(sub);
        controller.dispatch(SessionEvent::SignedIn(user("u1")));
        assert_eq!(calls.get(), 1);
        assert!(controller.state().is_authenticated());
    }

    #[test]
    fn test_dispatch_from_subscriber_reaches_every_subscriber() {
        let controller = SessionController::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mirrored = Rc::new(RefCell::new(SessionState::Unknown));

        // A failed refresh right after sign-in, reported from inside the callback
        let inner_controller = controller.clone();
        let log = seen.clone();
        let _refresher = controller.subscribe(move |state| {
            log.borrow_mut().push(state.clone());
            if state.is_authenticated() {
                inner_controller.dispatch(SessionEvent::RefreshFailed);
            }
        });
        let mirror = mirrored.clone();
        let _mirror = controller.subscribe(move |state| *mirror.borrow_mut() = state.clone());

        let returned = controller.dispatch(SessionEvent::SignedIn(user("u1")));

        assert_eq!(returned, SessionState::Authenticated(user("u1")));
        assert_eq!(controller.state(), SessionState::ReauthRequired(user("u1")));
        assert_eq!(
            *seen.borrow(),
            vec![
                SessionState::Authenticated(user("u1")),
                SessionState::ReauthRequired(user("u1")),
            ]
        );
        assert_eq!(*mirrored.borrow(), SessionState::ReauthRequired(user("u1")));
    }

    #[test]
    fn test_subscription_dropped_during_notification_is_removed() {
        let controller = SessionController::new();
        let calls = Rc::new(Cell::new(0));
        let slot: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

        let counter = calls.clone();
        let own = slot.clone();
        let sub = controller.subscribe(move |_| {
            counter.set(counter.get() + 1);
            own.borrow_mut().take();
        });
        *slot.borrow_mut() = Some(sub);

        controller.dispatch(SessionEvent::InitialSession(None));
        assert_eq!(calls.get(), 1);
        assert!(controller.inner.subscribers.borrow().is_empty());

        controller.dispatch(SessionEvent::SignedIn(user("u1")));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_check_intervals() {
        let now = 1_000_000;
        assert!(should_refresh(now + 60, now));
        assert!(!should_refresh(now + 3600, now));
        assert_eq!(next_check_interval(Some(now + 300), now), EXPIRING_CHECK_INTERVAL);
        assert_eq!(next_check_interval(Some(now + 3600), now), CHECK_INTERVAL);
        assert_eq!(next_check_interval(None, now), CHECK_INTERVAL);
    }

    async fn signed_in() -> (SessionController, MemoryAuth) {
        let auth = MemoryAuth::new();
        auth.create_user("cook@example.com", "secret1", "Cook").await.unwrap();
        auth.sign_in_with_password("cook@example.com", "secret1").await.unwrap();
        let controller = SessionController::new();
        start(&controller, &auth).await;
        (controller, auth)
    }

    #[tokio::test]
    async fn test_start_without_session() {
        let controller = SessionController::new();
        let state = start(&controller, &MemoryAuth::new()).await;
        assert_eq!(state, SessionState::Unauthenticated);
    }

    #[tokio::test]
    async fn test_visible_check_refreshes_or_requires_reauth() {
        let (controller, auth) = signed_in().await;
        assert!(controller.state().is_authenticated());

        check_on_visible(&controller, &auth).await;
        assert!(controller.state().is_authenticated());

        auth.set_refresh_failure(true);
        check_on_visible(&controller, &auth).await;
        assert!(matches!(controller.state(), SessionState::ReauthRequired(_)));

        // Re-auth with the password restores the session
        assert!(reauthenticate_with_password(&controller, &auth, "nope").await.is_err());
        assert!(matches!(controller.state(), SessionState::ReauthRequired(_)));
        reauthenticate_with_password(&controller, &auth, "secret1").await.unwrap();
        assert!(controller.state().is_authenticated());
    }

    #[tokio::test]
    async fn test_missing_session_requires_reauth_and_decline_signs_out() {
        let (controller, auth) = signed_in().await;
        auth.expire_session();

        check_on_visible(&controller, &auth).await;
        let SessionState::ReauthRequired(u) = controller.state() else {
            panic!("expected ReauthRequired");
        };
        assert_eq!(u.email.as_deref(), Some("cook@example.com"));

        assert_eq!(decline_reauth(&controller), SessionState::Unauthenticated);
    }

    #[tokio::test]
    async fn test_poll_refreshes_expiring_token() {
        let (controller, auth) = signed_in().await;
        let before = auth.current_session().unwrap().access_token;

        let delay = poll(&controller, &auth).await;
        assert_eq!(delay, CHECK_INTERVAL);
        assert_eq!(auth.current_session().unwrap().access_token, before);

        auth.set_expires_at(now_secs() + 60);
        poll(&controller, &auth).await;
        assert_ne!(auth.current_session().unwrap().access_token, before);
        assert!(controller.state().is_authenticated());
    }

    struct AlwaysYes;

    impl PlatformAuthenticator for AlwaysYes {
        fn is_supported(&self) -> bool {
            true
        }
        async fn is_platform_authenticator_available(&self) -> Result<bool, PlatformError> {
            Ok(true)
        }
        async fn create(&self, _: &CreationOptions) -> Result<CreatedCredential, PlatformError> {
            Ok(CreatedCredential {
                id: "cred".into(),
                raw_id: vec![1, 2, 3],
            })
        }
        async fn get(&self, _: &AssertionOptions) -> Result<(), PlatformError> {
            Ok(())
        }
        fn device_name(&self) -> String {
            "Test Device".into()
        }
    }

    #[tokio::test]
    async fn test_biometric_reauth() {
        let (controller, auth) = signed_in().await;
        auth.set_refresh_failure(true);
        check_on_visible(&controller, &auth).await;

        let biometric = BiometricAuth::new(AlwaysYes, MemoryStore::new());
        let err = reauthenticate_with_biometric(&controller, &auth, &biometric).await;
        assert!(matches!(
            err,
            Err(ApiError::Biometric(store::BiometricError::NoCredential))
        ));

        biometric.register("u1", "cook@example.com").await.unwrap();
        auth.set_refresh_failure(false);
        reauthenticate_with_biometric(&controller, &auth, &biometric)
            .await
            .unwrap();
        assert!(controller.state().is_authenticated());
    }
}
