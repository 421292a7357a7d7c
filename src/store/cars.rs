//! Cars domain container: the brand/model/generation taxonomy.
//!
//! Besides the flat collections, this container owns two keyed secondary
//! caches (`brand_models`, `model_generations`). They are populated lazily by
//! the `ensure_*` operations, which issue a fetch only when no entry exists
//! and none is in flight, and are explicitly evicted whenever a mutation
//! touches the corresponding child collection, so a populated entry is never
//! left stale by a sibling top-level mutation.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::ApiError;
use crate::models::{Brand, BrandPayload, Generation, GenerationPayload, Model, ModelPayload};
use crate::services::CarService;

/// Snapshot of the cars domain.
#[derive(Debug, Clone, Default)]
pub struct CarsState {
    pub brands: Vec<Brand>,
    pub models: Vec<Model>,
    pub generations: Vec<Generation>,
    /// Models keyed by brand id, independently fetched and explicitly
    /// evicted on model mutations.
    pub brand_models: HashMap<i64, Vec<Model>>,
    /// Generations keyed by model id, same lifecycle as `brand_models`.
    pub model_generations: HashMap<i64, Vec<Generation>>,
    pub loading: bool,
    pub error: Option<String>,
    pending_brand_models: HashSet<i64>,
    pending_model_generations: HashSet<i64>,
}

impl CarsState {
    /// Whether a children fetch for this brand is currently in flight.
    #[must_use]
    pub fn brand_models_pending(&self, brand_id: i64) -> bool {
        self.pending_brand_models.contains(&brand_id)
    }

    /// Whether a children fetch for this model is currently in flight.
    #[must_use]
    pub fn model_generations_pending(&self, model_id: i64) -> bool {
        self.pending_model_generations.contains(&model_id)
    }
}

/// Reducer event for the cars container.
#[derive(Debug, Clone)]
pub enum CarsEvent {
    Requested,
    Failed(String),
    BrandsLoaded(Vec<Brand>),
    ModelsLoaded(Vec<Model>),
    GenerationsLoaded(Vec<Generation>),
    BrandModelsRequested(i64),
    BrandModelsLoaded { brand_id: i64, models: Vec<Model> },
    BrandModelsFailed { brand_id: i64, message: String },
    ModelGenerationsRequested(i64),
    ModelGenerationsLoaded { model_id: i64, generations: Vec<Generation> },
    ModelGenerationsFailed { model_id: i64, message: String },
    BrandCreated(Brand),
    BrandUpdated(Brand),
    BrandDeleted(i64),
    ModelCreated(Model),
    ModelUpdated(Model),
    ModelDeleted(i64),
    GenerationCreated(Generation),
    GenerationUpdated(Generation),
    GenerationDeleted(i64),
    ErrorCleared,
}

impl CarsState {
    /// Apply one deterministic reducer transition.
    #[allow(clippy::too_many_lines)]
    pub fn apply(&mut self, event: CarsEvent) {
        match event {
            CarsEvent::Requested => {
                self.loading = true;
                self.error = None;
            }
            CarsEvent::Failed(message) => {
                self.loading = false;
                self.error = Some(message);
            }
            CarsEvent::BrandsLoaded(brands) => {
                self.loading = false;
                self.error = None;
                self.brands = brands;
            }
            CarsEvent::ModelsLoaded(models) => {
                self.loading = false;
                self.error = None;
                self.models = models;
            }
            CarsEvent::GenerationsLoaded(generations) => {
                self.loading = false;
                self.error = None;
                self.generations = generations;
            }
            CarsEvent::BrandModelsRequested(brand_id) => {
                self.pending_brand_models.insert(brand_id);
            }
            CarsEvent::BrandModelsLoaded { brand_id, models } => {
                self.pending_brand_models.remove(&brand_id);
                self.error = None;
                self.brand_models.insert(brand_id, models);
            }
            CarsEvent::BrandModelsFailed { brand_id, message } => {
                self.pending_brand_models.remove(&brand_id);
                self.error = Some(message);
            }
            CarsEvent::ModelGenerationsRequested(model_id) => {
                self.pending_model_generations.insert(model_id);
            }
            CarsEvent::ModelGenerationsLoaded {
                model_id,
                generations,
            } => {
                self.pending_model_generations.remove(&model_id);
                self.error = None;
                self.model_generations.insert(model_id, generations);
            }
            CarsEvent::ModelGenerationsFailed { model_id, message } => {
                self.pending_model_generations.remove(&model_id);
                self.error = Some(message);
            }
            CarsEvent::BrandCreated(brand) => {
                self.loading = false;
                self.error = None;
                replace_or_append(&mut self.brands, brand, |b| b.id);
            }
            CarsEvent::BrandUpdated(brand) => {
                self.loading = false;
                self.error = None;
                if let Some(existing) = self.brands.iter_mut().find(|b| b.id == brand.id) {
                    *existing = brand;
                }
            }
            CarsEvent::BrandDeleted(id) => {
                self.loading = false;
                self.error = None;
                self.brands.retain(|b| b.id != id);
                self.brand_models.remove(&id);
            }
            CarsEvent::ModelCreated(model) => {
                self.loading = false;
                self.error = None;
                self.brand_models.remove(&model.car_brand_id);
                replace_or_append(&mut self.models, model, |m| m.id);
            }
            CarsEvent::ModelUpdated(model) => {
                self.loading = false;
                self.error = None;
                // The model may have moved between brands; evict every entry
                // that held it plus the entry of its current brand.
                self.brand_models
                    .retain(|_, models| !models.iter().any(|m| m.id == model.id));
                self.brand_models.remove(&model.car_brand_id);
                if let Some(existing) = self.models.iter_mut().find(|m| m.id == model.id) {
                    *existing = model;
                }
            }
            CarsEvent::ModelDeleted(id) => {
                self.loading = false;
                self.error = None;
                self.models.retain(|m| m.id != id);
                self.brand_models
                    .retain(|_, models| !models.iter().any(|m| m.id == id));
                self.model_generations.remove(&id);
            }
            CarsEvent::GenerationCreated(generation) => {
                self.loading = false;
                self.error = None;
                self.model_generations.remove(&generation.car_model_id);
                replace_or_append(&mut self.generations, generation, |g| g.id);
            }
            CarsEvent::GenerationUpdated(generation) => {
                self.loading = false;
                self.error = None;
                self.model_generations
                    .retain(|_, generations| !generations.iter().any(|g| g.id == generation.id));
                self.model_generations.remove(&generation.car_model_id);
                if let Some(existing) = self
                    .generations
                    .iter_mut()
                    .find(|g| g.id == generation.id)
                {
                    *existing = generation;
                }
            }
            CarsEvent::GenerationDeleted(id) => {
                self.loading = false;
                self.error = None;
                self.generations.retain(|g| g.id != id);
                self.model_generations
                    .retain(|_, generations| !generations.iter().any(|g| g.id == id));
            }
            CarsEvent::ErrorCleared => {
                self.error = None;
            }
        }
    }
}

/// Append an entity, or replace it in place when its id is already present.
fn replace_or_append<T>(list: &mut Vec<T>, entity: T, id: impl Fn(&T) -> i64) {
    let entity_id = id(&entity);
    if let Some(existing) = list.iter_mut().find(|e| id(e) == entity_id) {
        *existing = entity;
    } else {
        list.push(entity);
    }
}

/// State container for the cars domain.
#[derive(Debug)]
pub struct CarsStore {
    service: CarService,
    state: Mutex<CarsState>,
}

impl CarsStore {
    #[must_use]
    pub fn new(service: CarService) -> Self {
        Self {
            service,
            state: Mutex::new(CarsState::default()),
        }
    }

    /// A cloned snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> CarsState {
        self.lock().clone()
    }

    pub fn clear_error(&self) {
        self.lock().apply(CarsEvent::ErrorCleared);
    }

    // ── Flat collections ────────────────────────────────────────────────

    /// Fetch all brands, replacing the list wholesale.
    ///
    /// # Errors
    ///
    /// The normalized error, also recorded in the container.
    pub async fn fetch_brands(&self) -> Result<Vec<Brand>, ApiError> {
        self.dispatch(CarsEvent::Requested);
        match self.service.brands().await {
            Ok(brands) => {
                self.dispatch(CarsEvent::BrandsLoaded(brands.clone()));
                Ok(brands)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Fetch all models, replacing the list wholesale.
    ///
    /// # Errors
    ///
    /// The normalized error, also recorded in the container.
    pub async fn fetch_models(&self) -> Result<Vec<Model>, ApiError> {
        self.dispatch(CarsEvent::Requested);
        match self.service.models().await {
            Ok(models) => {
                self.dispatch(CarsEvent::ModelsLoaded(models.clone()));
                Ok(models)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Fetch all generations, replacing the list wholesale.
    ///
    /// # Errors
    ///
    /// The normalized error, also recorded in the container.
    pub async fn fetch_generations(&self) -> Result<Vec<Generation>, ApiError> {
        self.dispatch(CarsEvent::Requested);
        match self.service.generations().await {
            Ok(generations) => {
                self.dispatch(CarsEvent::GenerationsLoaded(generations.clone()));
                Ok(generations)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    // ── Keyed secondary caches ──────────────────────────────────────────

    /// Make sure a brand's model list is cached. Issues exactly one request
    /// when the entry is absent; issues none when it exists or a fetch for
    /// this brand is already in flight.
    ///
    /// # Errors
    ///
    /// The normalized error, also recorded in the container.
    pub async fn ensure_brand_models(&self, brand_id: i64) -> Result<(), ApiError> {
        {
            let mut state = self.lock();
            if state.brand_models.contains_key(&brand_id)
                || state.brand_models_pending(brand_id)
            {
                return Ok(());
            }
            state.apply(CarsEvent::BrandModelsRequested(brand_id));
        }

        match self.service.brand_models(brand_id).await {
            Ok(models) => {
                self.dispatch(CarsEvent::BrandModelsLoaded { brand_id, models });
                Ok(())
            }
            Err(e) => {
                self.dispatch(CarsEvent::BrandModelsFailed {
                    brand_id,
                    message: e.to_string(),
                });
                Err(e)
            }
        }
    }

    /// Make sure a model's generation list is cached. Same contract as
    /// [`ensure_brand_models`](CarsStore::ensure_brand_models).
    ///
    /// # Errors
    ///
    /// The normalized error, also recorded in the container.
    pub async fn ensure_model_generations(&self, model_id: i64) -> Result<(), ApiError> {
        {
            let mut state = self.lock();
            if state.model_generations.contains_key(&model_id)
                || state.model_generations_pending(model_id)
            {
                return Ok(());
            }
            state.apply(CarsEvent::ModelGenerationsRequested(model_id));
        }

        match self.service.model_generations(model_id).await {
            Ok(generations) => {
                self.dispatch(CarsEvent::ModelGenerationsLoaded {
                    model_id,
                    generations,
                });
                Ok(())
            }
            Err(e) => {
                self.dispatch(CarsEvent::ModelGenerationsFailed {
                    model_id,
                    message: e.to_string(),
                });
                Err(e)
            }
        }
    }

    // ── Brand CRUD (admin only) ─────────────────────────────────────────

    /// Create a brand.
    ///
    /// # Errors
    ///
    /// The normalized error, also recorded in the container.
    pub async fn create_brand(&self, payload: &BrandPayload) -> Result<Brand, ApiError> {
        self.dispatch(CarsEvent::Requested);
        match self.service.create_brand(payload).await {
            Ok(brand) => {
                self.dispatch(CarsEvent::BrandCreated(brand.clone()));
                Ok(brand)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Update a brand.
    ///
    /// # Errors
    ///
    /// The normalized error, also recorded in the container.
    pub async fn update_brand(&self, id: i64, payload: &BrandPayload) -> Result<Brand, ApiError> {
        self.dispatch(CarsEvent::Requested);
        match self.service.update_brand(id, payload).await {
            Ok(brand) => {
                self.dispatch(CarsEvent::BrandUpdated(brand.clone()));
                Ok(brand)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Delete a brand; its cached model list is evicted with it.
    ///
    /// # Errors
    ///
    /// The normalized error, also recorded in the container.
    pub async fn delete_brand(&self, id: i64) -> Result<(), ApiError> {
        self.dispatch(CarsEvent::Requested);
        match self.service.delete_brand(id).await {
            Ok(()) => {
                self.dispatch(CarsEvent::BrandDeleted(id));
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    // ── Model CRUD (admin only) ─────────────────────────────────────────

    /// Create a model; the owning brand's cached model list is evicted.
    ///
    /// # Errors
    ///
    /// The normalized error, also recorded in the container.
    pub async fn create_model(&self, payload: &ModelPayload) -> Result<Model, ApiError> {
        self.dispatch(CarsEvent::Requested);
        match self.service.create_model(payload).await {
            Ok(model) => {
                self.dispatch(CarsEvent::ModelCreated(model.clone()));
                Ok(model)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Update a model; every cached model list that held it is evicted.
    ///
    /// # Errors
    ///
    /// The normalized error, also recorded in the container.
    pub async fn update_model(&self, id: i64, payload: &ModelPayload) -> Result<Model, ApiError> {
        self.dispatch(CarsEvent::Requested);
        match self.service.update_model(id, payload).await {
            Ok(model) => {
                self.dispatch(CarsEvent::ModelUpdated(model.clone()));
                Ok(model)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Delete a model; stale cache entries are evicted.
    ///
    /// # Errors
    ///
    /// The normalized error, also recorded in the container.
    pub async fn delete_model(&self, id: i64) -> Result<(), ApiError> {
        self.dispatch(CarsEvent::Requested);
        match self.service.delete_model(id).await {
            Ok(()) => {
                self.dispatch(CarsEvent::ModelDeleted(id));
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    // ── Generation CRUD (admin only) ────────────────────────────────────

    /// Create a generation. The year range is validated before any network
    /// call; the owning model's cached generation list is evicted.
    ///
    /// # Errors
    ///
    /// The normalized error, also recorded in the container.
    pub async fn create_generation(
        &self,
        payload: &GenerationPayload,
    ) -> Result<Generation, ApiError> {
        self.dispatch(CarsEvent::Requested);
        match self.service.create_generation(payload).await {
            Ok(generation) => {
                self.dispatch(CarsEvent::GenerationCreated(generation.clone()));
                Ok(generation)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Update a generation. The year range is validated before any network
    /// call; stale cache entries are evicted.
    ///
    /// # Errors
    ///
    /// The normalized error, also recorded in the container.
    pub async fn update_generation(
        &self,
        id: i64,
        payload: &GenerationPayload,
    ) -> Result<Generation, ApiError> {
        self.dispatch(CarsEvent::Requested);
        match self.service.update_generation(id, payload).await {
            Ok(generation) => {
                self.dispatch(CarsEvent::GenerationUpdated(generation.clone()));
                Ok(generation)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Delete a generation; stale cache entries are evicted.
    ///
    /// # Errors
    ///
    /// The normalized error, also recorded in the container.
    pub async fn delete_generation(&self, id: i64) -> Result<(), ApiError> {
        self.dispatch(CarsEvent::Requested);
        match self.service.delete_generation(id).await {
            Ok(()) => {
                self.dispatch(CarsEvent::GenerationDeleted(id));
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    fn dispatch(&self, event: CarsEvent) {
        self.lock().apply(event);
    }

    fn fail(&self, error: ApiError) -> ApiError {
        self.dispatch(CarsEvent::Failed(error.to_string()));
        error
    }

    fn lock(&self) -> MutexGuard<'_, CarsState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
