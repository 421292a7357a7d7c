//! Authentication and account operations.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::client::ApiClient;
use crate::credentials::CredentialStore;
use crate::error::ApiError;
use crate::models::{
    Acknowledgement, AuthResponse, Credentials, ListEnvelope, NewUser, Post, User, UserUpdate,
};

/// Façade over the `/user` endpoints. Sole owner of credential persistence:
/// a successful login stores the token and user snapshot, logout and session
/// wipes remove them.
#[derive(Debug, Clone)]
pub struct AuthService {
    client: Arc<ApiClient>,
    credentials: Arc<CredentialStore>,
}

impl AuthService {
    #[must_use]
    pub fn new(client: Arc<ApiClient>, credentials: Arc<CredentialStore>) -> Self {
        Self {
            client,
            credentials,
        }
    }

    /// Log in and persist the returned token and user snapshot.
    ///
    /// # Errors
    ///
    /// Returns the normalized error; the caller treats it as "not
    /// authenticated".
    pub async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, ApiError> {
        let auth: AuthResponse = self.client.post("/user/login", credentials).await?;
        debug!(user_id = auth.user.id, "Logged in");
        self.persist(&auth);
        self.client.mark_session_active();
        Ok(auth)
    }

    /// Register a new account, then log in with the submitted credentials.
    ///
    /// # Errors
    ///
    /// Returns the normalized error from either the registration or the
    /// follow-up login call.
    pub async fn register(&self, new_user: &NewUser) -> Result<AuthResponse, ApiError> {
        let _: Acknowledgement = self.client.post("/user/register", new_user).await?;
        self.login(&Credentials {
            email: new_user.email.clone(),
            password: new_user.password.clone(),
        })
        .await
    }

    /// Log out. The remote call is best-effort; local credential clearing is
    /// unconditional even when the call fails.
    pub async fn logout(&self) {
        if let Err(e) = self
            .client
            .post::<Acknowledgement, _>("/user/logout", &serde_json::json!({}))
            .await
        {
            warn!(error = %e, "Remote logout failed, clearing local session anyway");
        }
        self.credentials.clear();
    }

    /// Fetch the signed-in user and refresh the stored snapshot.
    ///
    /// # Errors
    ///
    /// Returns the normalized error; the caller treats it as "not
    /// authenticated".
    pub async fn current_user(&self) -> Result<User, ApiError> {
        let user: User = self.client.get("/user/me").await?;
        if let Err(e) = self.credentials.store_user(&user) {
            warn!(error = %e, "Failed to refresh persisted user snapshot");
        }
        self.client.mark_session_active();
        Ok(user)
    }

    /// The user snapshot surviving in durable storage, if any.
    #[must_use]
    pub fn stored_user(&self) -> Option<User> {
        self.credentials.user()
    }

    /// The bearer token surviving in durable storage, if any.
    #[must_use]
    pub fn stored_token(&self) -> Option<String> {
        self.credentials.token()
    }

    /// Fetch a user account by id.
    ///
    /// # Errors
    ///
    /// Returns the normalized error for any failure.
    pub async fn user_by_id(&self, id: i64) -> Result<User, ApiError> {
        self.client.get(&format!("/user/{id}")).await
    }

    /// Fetch the posts authored by a user.
    ///
    /// # Errors
    ///
    /// Returns the normalized error for any failure.
    pub async fn user_posts(&self, id: i64) -> Result<Vec<Post>, ApiError> {
        let envelope: ListEnvelope<Post> = self.client.get(&format!("/user/{id}/posts")).await?;
        Ok(envelope.into_parts().0)
    }

    /// Update a user account.
    ///
    /// # Errors
    ///
    /// Returns the normalized error for any failure.
    pub async fn update_user(&self, id: i64, update: &UserUpdate) -> Result<User, ApiError> {
        self.client.put(&format!("/user/{id}"), update).await
    }

    /// Delete a user account.
    ///
    /// # Errors
    ///
    /// Returns the normalized error for any failure.
    pub async fn delete_user(&self, id: i64) -> Result<(), ApiError> {
        self.client.delete(&format!("/user/{id}")).await
    }

    /// List every account (admin only).
    ///
    /// # Errors
    ///
    /// Returns the normalized error for any failure.
    pub async fn all_users(&self) -> Result<Vec<User>, ApiError> {
        let envelope: ListEnvelope<User> = self.client.get("/user/all").await?;
        Ok(envelope.into_parts().0)
    }

    fn persist(&self, auth: &AuthResponse) {
        if let Err(e) = self.credentials.store_token(&auth.access_token) {
            warn!(error = %e, "Failed to persist bearer token");
        }
        if let Err(e) = self.credentials.store_user(&auth.user) {
            warn!(error = %e, "Failed to persist user snapshot");
        }
    }
}
