//! Vehicle taxonomy operations: brands, models, generations.

use std::sync::Arc;

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::models::{
    Brand, BrandPayload, Generation, GenerationPayload, ListEnvelope, Model, ModelPayload,
};

/// Façade over the `/brands`, `/models` and `/generations` endpoints.
#[derive(Debug, Clone)]
pub struct CarService {
    client: Arc<ApiClient>,
}

impl CarService {
    #[must_use]
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    // ── Brands ──────────────────────────────────────────────────────────

    /// List all brands.
    ///
    /// # Errors
    ///
    /// Returns the normalized error for any failure.
    pub async fn brands(&self) -> Result<Vec<Brand>, ApiError> {
        let envelope: ListEnvelope<Brand> = self.client.get("/brands").await?;
        Ok(envelope.into_parts().0)
    }

    /// Fetch a single brand.
    ///
    /// # Errors
    ///
    /// Returns the normalized error for any failure.
    pub async fn brand(&self, id: i64) -> Result<Brand, ApiError> {
        self.client.get(&format!("/brands/{id}")).await
    }

    /// List the models of a brand.
    ///
    /// # Errors
    ///
    /// Returns the normalized error for any failure.
    pub async fn brand_models(&self, id: i64) -> Result<Vec<Model>, ApiError> {
        let envelope: ListEnvelope<Model> = self.client.get(&format!("/brands/{id}/models")).await?;
        Ok(envelope.into_parts().0)
    }

    /// Create a brand.
    ///
    /// # Errors
    ///
    /// Returns the normalized error for any failure.
    pub async fn create_brand(&self, payload: &BrandPayload) -> Result<Brand, ApiError> {
        self.client.post("/brands", payload).await
    }

    /// Update a brand.
    ///
    /// # Errors
    ///
    /// Returns the normalized error for any failure.
    pub async fn update_brand(&self, id: i64, payload: &BrandPayload) -> Result<Brand, ApiError> {
        self.client.put(&format!("/brands/{id}"), payload).await
    }

    /// Delete a brand.
    ///
    /// # Errors
    ///
    /// Returns the normalized error for any failure.
    pub async fn delete_brand(&self, id: i64) -> Result<(), ApiError> {
        self.client.delete(&format!("/brands/{id}")).await
    }

    // ── Models ──────────────────────────────────────────────────────────

    /// List all models.
    ///
    /// # Errors
    ///
    /// Returns the normalized error for any failure.
    pub async fn models(&self) -> Result<Vec<Model>, ApiError> {
        let envelope: ListEnvelope<Model> = self.client.get("/models").await?;
        Ok(envelope.into_parts().0)
    }

    /// Fetch a single model.
    ///
    /// # Errors
    ///
    /// Returns the normalized error for any failure.
    pub async fn model(&self, id: i64) -> Result<Model, ApiError> {
        self.client.get(&format!("/models/{id}")).await
    }

    /// List the generations of a model.
    ///
    /// # Errors
    ///
    /// Returns the normalized error for any failure.
    pub async fn model_generations(&self, id: i64) -> Result<Vec<Generation>, ApiError> {
        let envelope: ListEnvelope<Generation> =
            self.client.get(&format!("/models/{id}/generations")).await?;
        Ok(envelope.into_parts().0)
    }

    /// Create a model.
    ///
    /// # Errors
    ///
    /// Returns the normalized error for any failure.
    pub async fn create_model(&self, payload: &ModelPayload) -> Result<Model, ApiError> {
        self.client.post("/models", payload).await
    }

    /// Update a model.
    ///
    /// # Errors
    ///
    /// Returns the normalized error for any failure.
    pub async fn update_model(&self, id: i64, payload: &ModelPayload) -> Result<Model, ApiError> {
        self.client.put(&format!("/models/{id}"), payload).await
    }

    /// Delete a model.
    ///
    /// # Errors
    ///
    /// Returns the normalized error for any failure.
    pub async fn delete_model(&self, id: i64) -> Result<(), ApiError> {
        self.client.delete(&format!("/models/{id}")).await
    }

    // ── Generations ─────────────────────────────────────────────────────

    /// List all generations.
    ///
    /// # Errors
    ///
    /// Returns the normalized error for any failure.
    pub async fn generations(&self) -> Result<Vec<Generation>, ApiError> {
        let envelope: ListEnvelope<Generation> = self.client.get("/generations").await?;
        Ok(envelope.into_parts().0)
    }

    /// Fetch a single generation.
    ///
    /// # Errors
    ///
    /// Returns the normalized error for any failure.
    pub async fn generation(&self, id: i64) -> Result<Generation, ApiError> {
        self.client.get(&format!("/generations/{id}")).await
    }

    /// Create a generation. The production year range is validated before
    /// any network call.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidInput`] when the year range is inverted,
    /// otherwise the normalized error for any transport failure.
    pub async fn create_generation(
        &self,
        payload: &GenerationPayload,
    ) -> Result<Generation, ApiError> {
        payload.validate()?;
        self.client.post("/generations", payload).await
    }

    /// Update a generation. The production year range is validated before
    /// any network call.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidInput`] when the year range is inverted,
    /// otherwise the normalized error for any transport failure.
    pub async fn update_generation(
        &self,
        id: i64,
        payload: &GenerationPayload,
    ) -> Result<Generation, ApiError> {
        payload.validate()?;
        self.client.put(&format!("/generations/{id}"), payload).await
    }

    /// Delete a generation.
    ///
    /// # Errors
    ///
    /// Returns the normalized error for any failure.
    pub async fn delete_generation(&self, id: i64) -> Result<(), ApiError> {
        self.client.delete(&format!("/generations/{id}")).await
    }
}
