//! Auth domain container: the session identity state machine.
//!
//! Initial state is derived synchronously from whatever credential snapshot
//! survives in durable storage, so a "possibly authenticated" view can render
//! before any network round-trip.

use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;

use crate::client::SessionStatus;
use crate::error::ApiError;
use crate::models::{Credentials, NewUser, User};
use crate::services::AuthService;

/// The session identity states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStatus {
    Anonymous,
    Authenticating,
    Authenticated,
    /// An identity-bearing operation failed; treated as "not authenticated",
    /// not as a transient error.
    AuthFailed,
}

/// Snapshot of the auth domain.
#[derive(Debug, Clone)]
pub struct AuthState {
    pub user: Option<User>,
    pub token: Option<String>,
    pub status: AuthStatus,
    pub loading: bool,
    pub error: Option<String>,
}

impl AuthState {
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.status == AuthStatus::Authenticated
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.is_authenticated() && self.user.as_ref().is_some_and(User::is_admin)
    }
}

/// Reducer event for the auth container.
#[derive(Debug, Clone)]
pub enum AuthEvent {
    /// Login or register dispatched.
    Authenticating,
    Authenticated { user: User, token: String },
    /// Refresh or logout dispatched; identity unchanged while in flight.
    Refreshing,
    Refreshed(User),
    /// An identity-bearing operation failed: all identity state is cleared.
    IdentityRejected(String),
    LoggedOut,
    /// The transport wiped the session after a 401.
    SessionExpired,
    ErrorCleared,
}

impl AuthState {
    /// Apply one deterministic reducer transition.
    pub fn apply(&mut self, event: AuthEvent) {
        match event {
            AuthEvent::Authenticating => {
                self.loading = true;
                self.error = None;
                self.status = AuthStatus::Authenticating;
            }
            AuthEvent::Authenticated { user, token } => {
                self.loading = false;
                self.error = None;
                self.user = Some(user);
                self.token = Some(token);
                self.status = AuthStatus::Authenticated;
            }
            AuthEvent::Refreshing => {
                self.loading = true;
            }
            AuthEvent::Refreshed(user) => {
                self.loading = false;
                self.error = None;
                self.user = Some(user);
                self.status = AuthStatus::Authenticated;
            }
            AuthEvent::IdentityRejected(message) => {
                self.loading = false;
                self.error = Some(message);
                self.user = None;
                self.token = None;
                self.status = AuthStatus::AuthFailed;
            }
            AuthEvent::LoggedOut | AuthEvent::SessionExpired => {
                self.loading = false;
                self.error = None;
                self.user = None;
                self.token = None;
                self.status = AuthStatus::Anonymous;
            }
            AuthEvent::ErrorCleared => {
                self.error = None;
            }
        }
    }
}

/// State container for the auth domain.
#[derive(Debug)]
pub struct AuthStore {
    service: AuthService,
    session: watch::Receiver<SessionStatus>,
    state: Mutex<AuthState>,
}

impl AuthStore {
    /// Build the container, deriving the initial state from durable storage.
    #[must_use]
    pub fn new(service: AuthService, session: watch::Receiver<SessionStatus>) -> Self {
        let token = service.stored_token();
        let user = service.stored_user();
        let status = if token.is_some() {
            AuthStatus::Authenticated
        } else {
            AuthStatus::Anonymous
        };
        let state = AuthState {
            user,
            token,
            status,
            loading: false,
            error: None,
        };

        Self {
            service,
            session,
            state: Mutex::new(state),
        }
    }

    /// A cloned snapshot of the current state. A session expiry published by
    /// the transport (401 during any domain call) is folded in first, so
    /// `is_authenticated()` is false as soon as the wipe happened.
    #[must_use]
    pub fn state(&self) -> AuthState {
        self.absorb_session_expiry();
        self.lock().clone()
    }

    pub fn clear_error(&self) {
        self.lock().apply(AuthEvent::ErrorCleared);
    }

    /// Log in; success stores identity in memory and durable storage.
    ///
    /// # Errors
    ///
    /// The normalized error; failure clears all identity state.
    pub async fn login(&self, credentials: &Credentials) -> Result<User, ApiError> {
        self.dispatch(AuthEvent::Authenticating);
        match self.service.login(credentials).await {
            Ok(auth) => {
                self.dispatch(AuthEvent::Authenticated {
                    user: auth.user.clone(),
                    token: auth.access_token,
                });
                Ok(auth.user)
            }
            Err(e) => {
                self.dispatch(AuthEvent::IdentityRejected(e.to_string()));
                Err(e)
            }
        }
    }

    /// Register and log in with the submitted credentials.
    ///
    /// # Errors
    ///
    /// The normalized error; failure clears all identity state.
    pub async fn register(&self, new_user: &NewUser) -> Result<User, ApiError> {
        self.dispatch(AuthEvent::Authenticating);
        match self.service.register(new_user).await {
            Ok(auth) => {
                self.dispatch(AuthEvent::Authenticated {
                    user: auth.user.clone(),
                    token: auth.access_token,
                });
                Ok(auth.user)
            }
            Err(e) => {
                self.dispatch(AuthEvent::IdentityRejected(e.to_string()));
                Err(e)
            }
        }
    }

    /// Log out. The remote call is best-effort; local identity clearing is
    /// unconditional.
    pub async fn logout(&self) {
        self.dispatch(AuthEvent::Refreshing);
        self.service.logout().await;
        self.dispatch(AuthEvent::LoggedOut);
    }

    /// Revalidate the session by fetching the signed-in user.
    ///
    /// # Errors
    ///
    /// The normalized error; failure clears all identity state.
    pub async fn refresh_current_user(&self) -> Result<User, ApiError> {
        self.dispatch(AuthEvent::Refreshing);
        match self.service.current_user().await {
            Ok(user) => {
                self.dispatch(AuthEvent::Refreshed(user.clone()));
                Ok(user)
            }
            Err(e) => {
                self.dispatch(AuthEvent::IdentityRejected(e.to_string()));
                Err(e)
            }
        }
    }

    fn absorb_session_expiry(&self) {
        if *self.session.borrow() == SessionStatus::Expired {
            let mut state = self.lock();
            // Only an authenticated session can expire; a failed login keeps
            // its own error state.
            if state.status == AuthStatus::Authenticated {
                state.apply(AuthEvent::SessionExpired);
            }
        }
    }

    fn dispatch(&self, event: AuthEvent) {
        self.lock().apply(event);
    }

    fn lock(&self) -> MutexGuard<'_, AuthState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
