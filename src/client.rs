//! Transport client for the backend REST API.
//!
//! A single `reqwest` client with bearer-token injection and centralized
//! error normalization. Every failure is turned into one tagged
//! [`ApiError`](crate::error::ApiError) here; no other component inspects raw
//! responses.

use std::sync::Arc;

use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::config::Config;
use crate::credentials::CredentialStore;
use crate::error::{ApiError, ErrorBody};

/// Whether the current session is still usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Active,
    /// A 401 arrived; persisted credentials have been wiped and the user must
    /// be routed to the login entry point.
    Expired,
}

/// HTTP client for the forum backend.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    credentials: Arc<CredentialStore>,
    session_tx: watch::Sender<SessionStatus>,
}

impl ApiClient {
    /// Create a client from configuration.
    #[must_use]
    pub fn new(config: &Config, credentials: Arc<CredentialStore>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .expect("Failed to build HTTP client");
        let (session_tx, _) = watch::channel(SessionStatus::Active);

        Self {
            http,
            base_url: config.api_base_url.clone(),
            credentials,
            session_tx,
        }
    }

    /// Subscribe to session-status changes. The receiver flips to
    /// [`SessionStatus::Expired`] when a 401 forces a session wipe; the view
    /// layer observes it to navigate to login.
    #[must_use]
    pub fn session(&self) -> watch::Receiver<SessionStatus> {
        self.session_tx.subscribe()
    }

    /// Mark the session active again after a successful re-authentication.
    pub(crate) fn mark_session_active(&self) {
        self.session_tx.send_replace(SessionStatus::Active);
    }

    /// GET a JSON resource.
    ///
    /// # Errors
    ///
    /// Returns the normalized [`ApiError`] for any failure.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let request = self.http.get(self.url(path));
        self.decode(path, self.dispatch(path, request).await?).await
    }

    /// GET a JSON resource with query parameters.
    ///
    /// # Errors
    ///
    /// Returns the normalized [`ApiError`] for any failure.
    pub async fn get_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let request = self.http.get(self.url(path)).query(query);
        self.decode(path, self.dispatch(path, request).await?).await
    }

    /// POST a JSON body and decode the JSON response.
    ///
    /// # Errors
    ///
    /// Returns the normalized [`ApiError`] for any failure.
    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let request = self.http.post(self.url(path)).json(body);
        self.decode(path, self.dispatch(path, request).await?).await
    }

    /// PUT a JSON body and decode the JSON response.
    ///
    /// # Errors
    ///
    /// Returns the normalized [`ApiError`] for any failure.
    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let request = self.http.put(self.url(path)).json(body);
        self.decode(path, self.dispatch(path, request).await?).await
    }

    /// PATCH a JSON body and decode the JSON response.
    ///
    /// # Errors
    ///
    /// Returns the normalized [`ApiError`] for any failure.
    pub async fn patch<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let request = self.http.patch(self.url(path)).json(body);
        self.decode(path, self.dispatch(path, request).await?).await
    }

    /// PATCH without a request body.
    ///
    /// # Errors
    ///
    /// Returns the normalized [`ApiError`] for any failure.
    pub async fn patch_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let request = self.http.patch(self.url(path));
        self.decode(path, self.dispatch(path, request).await?).await
    }

    /// DELETE a resource, discarding the acknowledgement body.
    ///
    /// # Errors
    ///
    /// Returns the normalized [`ApiError`] for any failure.
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.dispatch(path, self.http.delete(self.url(path))).await?;
        Ok(())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Attach credentials, send, and normalize every failure.
    async fn dispatch(&self, path: &str, request: RequestBuilder) -> Result<Response, ApiError> {
        let request = match self.credentials.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                debug!(path, "Request timed out");
                ApiError::Timeout
            } else {
                debug!(path, error = %e, "Request failed without a response");
                ApiError::Network
            }
        })?;

        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            // Hard session event: wipe persisted credentials and publish the
            // expiry signal. Happens exactly once per failing call, no retry.
            warn!(path, "Session rejected with 401, clearing credentials");
            self.credentials.clear();
            self.session_tx.send_replace(SessionStatus::Expired);
            return Err(ApiError::Unauthorized);
        }

        if !status.is_success() {
            let body: ErrorBody = response.json().await.unwrap_or_default();
            let error = ApiError::from_response(status, &body);
            debug!(path, status = status.as_u16(), error = %error, "Request failed");
            return Err(error);
        }

        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(
        &self,
        path: &str,
        response: Response,
    ) -> Result<T, ApiError> {
        response.json().await.map_err(|e| {
            warn!(path, error = %e, "Failed to decode response body");
            ApiError::Decode
        })
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}
