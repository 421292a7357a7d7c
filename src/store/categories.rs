//! Categories domain container.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::ApiError;
use crate::models::{Category, CategoryPayload};
use crate::services::CategoryService;

/// Snapshot of the categories domain.
#[derive(Debug, Clone, Default)]
pub struct CategoriesState {
    pub categories: Vec<Category>,
    pub current_category: Option<Category>,
    pub loading: bool,
    pub error: Option<String>,
}

/// Reducer event for the categories container.
#[derive(Debug, Clone)]
pub enum CategoriesEvent {
    Requested,
    Failed(String),
    ListLoaded(Vec<Category>),
    CategoryLoaded(Category),
    Created(Category),
    Updated(Category),
    Deleted(i64),
    ErrorCleared,
    CurrentCategoryCleared,
}

impl CategoriesState {
    /// Apply one deterministic reducer transition.
    pub fn apply(&mut self, event: CategoriesEvent) {
        match event {
            CategoriesEvent::Requested => {
                self.loading = true;
                self.error = None;
            }
            CategoriesEvent::Failed(message) => {
                self.loading = false;
                self.error = Some(message);
            }
            CategoriesEvent::ListLoaded(categories) => {
                self.loading = false;
                self.error = None;
                self.categories = categories;
            }
            CategoriesEvent::CategoryLoaded(category) => {
                self.loading = false;
                self.error = None;
                self.current_category = Some(category);
            }
            CategoriesEvent::Created(category) => {
                self.loading = false;
                self.error = None;
                if let Some(existing) = self.categories.iter_mut().find(|c| c.id == category.id) {
                    *existing = category;
                } else {
                    self.categories.push(category);
                }
            }
            CategoriesEvent::Updated(category) => {
                self.loading = false;
                self.error = None;
                if let Some(existing) = self.categories.iter_mut().find(|c| c.id == category.id) {
                    *existing = category.clone();
                }
                if self
                    .current_category
                    .as_ref()
                    .is_some_and(|c| c.id == category.id)
                {
                    self.current_category = Some(category);
                }
            }
            CategoriesEvent::Deleted(id) => {
                self.loading = false;
                self.error = None;
                self.categories.retain(|c| c.id != id);
                if self.current_category.as_ref().is_some_and(|c| c.id == id) {
                    self.current_category = None;
                }
            }
            CategoriesEvent::ErrorCleared => {
                self.error = None;
            }
            CategoriesEvent::CurrentCategoryCleared => {
                self.current_category = None;
            }
        }
    }
}

/// State container for the categories domain.
#[derive(Debug)]
pub struct CategoriesStore {
    service: CategoryService,
    state: Mutex<CategoriesState>,
}

impl CategoriesStore {
    #[must_use]
    pub fn new(service: CategoryService) -> Self {
        Self {
            service,
            state: Mutex::new(CategoriesState::default()),
        }
    }

    /// A cloned snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> CategoriesState {
        self.lock().clone()
    }

    pub fn clear_error(&self) {
        self.lock().apply(CategoriesEvent::ErrorCleared);
    }

    pub fn clear_current_category(&self) {
        self.lock().apply(CategoriesEvent::CurrentCategoryCleared);
    }

    /// Fetch all categories, replacing the list wholesale.
    ///
    /// # Errors
    ///
    /// The normalized error, also recorded in the container.
    pub async fn fetch_categories(&self) -> Result<Vec<Category>, ApiError> {
        self.dispatch(CategoriesEvent::Requested);
        match self.service.list().await {
            Ok(categories) => {
                self.dispatch(CategoriesEvent::ListLoaded(categories.clone()));
                Ok(categories)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Fetch a single category into the current-category slot.
    ///
    /// # Errors
    ///
    /// The normalized error, also recorded in the container.
    pub async fn fetch_category(&self, id: i64) -> Result<Category, ApiError> {
        self.dispatch(CategoriesEvent::Requested);
        match self.service.get(id).await {
            Ok(category) => {
                self.dispatch(CategoriesEvent::CategoryLoaded(category.clone()));
                Ok(category)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Create a category (admin only).
    ///
    /// # Errors
    ///
    /// The normalized error, also recorded in the container.
    pub async fn create_category(&self, payload: &CategoryPayload) -> Result<Category, ApiError> {
        self.dispatch(CategoriesEvent::Requested);
        match self.service.create(payload).await {
            Ok(category) => {
                self.dispatch(CategoriesEvent::Created(category.clone()));
                Ok(category)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Update a category (admin only).
    ///
    /// # Errors
    ///
    /// The normalized error, also recorded in the container.
    pub async fn update_category(
        &self,
        id: i64,
        payload: &CategoryPayload,
    ) -> Result<Category, ApiError> {
        self.dispatch(CategoriesEvent::Requested);
        match self.service.update(id, payload).await {
            Ok(category) => {
                self.dispatch(CategoriesEvent::Updated(category.clone()));
                Ok(category)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Delete a category (admin only).
    ///
    /// # Errors
    ///
    /// The normalized error, also recorded in the container.
    pub async fn delete_category(&self, id: i64) -> Result<(), ApiError> {
        self.dispatch(CategoriesEvent::Requested);
        match self.service.delete(id).await {
            Ok(()) => {
                self.dispatch(CategoriesEvent::Deleted(id));
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    fn dispatch(&self, event: CategoriesEvent) {
        self.lock().apply(event);
    }

    fn fail(&self, error: ApiError) -> ApiError {
        self.dispatch(CategoriesEvent::Failed(error.to_string()));
        error
    }

    fn lock(&self) -> MutexGuard<'_, CategoriesState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
