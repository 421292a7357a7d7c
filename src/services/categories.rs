//! Category operations.

use std::sync::Arc;

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::models::{Category, CategoryPayload, ListEnvelope};

/// Façade over the `/categories` endpoints.
#[derive(Debug, Clone)]
pub struct CategoryService {
    client: Arc<ApiClient>,
}

impl CategoryService {
    #[must_use]
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// List all categories with their embedded subcategories.
    ///
    /// # Errors
    ///
    /// Returns the normalized error for any failure.
    pub async fn list(&self) -> Result<Vec<Category>, ApiError> {
        let envelope: ListEnvelope<Category> = self.client.get("/categories").await?;
        Ok(envelope.into_parts().0)
    }

    /// Fetch a single category.
    ///
    /// # Errors
    ///
    /// Returns the normalized error for any failure.
    pub async fn get(&self, id: i64) -> Result<Category, ApiError> {
        self.client.get(&format!("/categories/{id}")).await
    }

    /// Create a category.
    ///
    /// # Errors
    ///
    /// Returns the normalized error for any failure.
    pub async fn create(&self, payload: &CategoryPayload) -> Result<Category, ApiError> {
        self.client.post("/categories", payload).await
    }

    /// Update a category.
    ///
    /// # Errors
    ///
    /// Returns the normalized error for any failure.
    pub async fn update(&self, id: i64, payload: &CategoryPayload) -> Result<Category, ApiError> {
        self.client.put(&format!("/categories/{id}"), payload).await
    }

    /// Delete a category.
    ///
    /// # Errors
    ///
    /// Returns the normalized error for any failure.
    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.client.delete(&format!("/categories/{id}")).await
    }
}
