//! User administration and profile operations.

use std::sync::Arc;

use serde::Serialize;

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::models::{ListEnvelope, ProfileUpdate, Role, SystemStats, User, UserProfile};

/// Body of the role-change endpoint.
#[derive(Debug, Serialize)]
struct RoleUpdate {
    role: Role,
}

/// Façade over the `/users` administration endpoints and `/admin/stats`.
#[derive(Debug, Clone)]
pub struct UserService {
    client: Arc<ApiClient>,
}

impl UserService {
    #[must_use]
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// List all user accounts.
    ///
    /// # Errors
    ///
    /// Returns the normalized error for any failure.
    pub async fn list(&self) -> Result<Vec<User>, ApiError> {
        let envelope: ListEnvelope<User> = self.client.get("/users").await?;
        Ok(envelope.into_parts().0)
    }

    /// Fetch a single user account.
    ///
    /// # Errors
    ///
    /// Returns the normalized error for any failure.
    pub async fn get(&self, id: i64) -> Result<User, ApiError> {
        self.client.get(&format!("/users/{id}")).await
    }

    /// Change a user's role.
    ///
    /// # Errors
    ///
    /// Returns the normalized error for any failure.
    pub async fn update_role(&self, id: i64, role: Role) -> Result<User, ApiError> {
        self.client
            .patch(&format!("/users/{id}/role"), &RoleUpdate { role })
            .await
    }

    /// Toggle a user's active flag.
    ///
    /// # Errors
    ///
    /// Returns the normalized error for any failure.
    pub async fn toggle_active(&self, id: i64) -> Result<User, ApiError> {
        self.client
            .patch_empty(&format!("/users/{id}/toggle-active"))
            .await
    }

    /// Fetch a user's profile with activity counters.
    ///
    /// # Errors
    ///
    /// Returns the normalized error for any failure.
    pub async fn profile(&self, id: i64) -> Result<UserProfile, ApiError> {
        self.client.get(&format!("/users/{id}/profile")).await
    }

    /// Update a user's profile fields.
    ///
    /// # Errors
    ///
    /// Returns the normalized error for any failure.
    pub async fn update_profile(
        &self,
        id: i64,
        update: &ProfileUpdate,
    ) -> Result<UserProfile, ApiError> {
        self.client
            .patch(&format!("/users/{id}/profile"), update)
            .await
    }

    /// Aggregate counters for the admin dashboard.
    ///
    /// # Errors
    ///
    /// Returns the normalized error for any failure.
    pub async fn system_stats(&self) -> Result<SystemStats, ApiError> {
        self.client.get("/admin/stats").await
    }
}
