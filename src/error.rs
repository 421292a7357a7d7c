//! Normalized failure taxonomy for backend calls.
//!
//! The transport client builds an [`ApiError`] exactly once per failing call;
//! its `Display` output is the single human-readable message every caller
//! surfaces. Callers never re-derive error text from raw responses.

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

use crate::constants::messages;

/// Which uniqueness constraint a conflict failure violated.
///
/// The backend reports constraint violations through documented error codes
/// (`users_name_unique`, `users_email_unique`, `unique_violation`), carried in
/// the error body's `code` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictKind {
    Username,
    Email,
    Other,
}

impl ConflictKind {
    /// Fixed friendly message for this conflict.
    #[must_use]
    pub fn message(&self) -> &'static str {
        match self {
            Self::Username => messages::USERNAME_TAKEN,
            Self::Email => messages::EMAIL_TAKEN,
            Self::Other => messages::CONFLICT,
        }
    }
}

/// A normalized backend failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// No response was received (connection refused, DNS failure, ...).
    #[error("{}", messages::NETWORK)]
    Network,

    /// The fixed request timeout elapsed before a response arrived.
    /// Surfaced with the same message as [`ApiError::Network`].
    #[error("{}", messages::NETWORK)]
    Timeout,

    /// 401: the session was rejected. The transport has already wiped the
    /// persisted credentials and published the session-expired signal.
    #[error("{}", messages::SESSION_EXPIRED)]
    Unauthorized,

    /// 422: the first field-level message from the structured validation map.
    #[error("{message}")]
    Validation { field: String, message: String },

    /// A uniqueness constraint was violated.
    #[error("{}", .0.message())]
    Conflict(ConflictKind),

    /// The backend reported a database failure.
    #[error("{}", messages::DATABASE_ERROR)]
    Database,

    /// Any other 4xx/5xx; `message` is the server-provided text when present,
    /// otherwise the generic fallback.
    #[error("{message}")]
    Server { status: u16, message: String },

    /// A success response carried a body the client could not decode.
    #[error("{}", messages::SERVER_ERROR)]
    Decode,

    /// Client-side validation rejected the input before any network call.
    #[error("{0}")]
    InvalidInput(String),
}

/// Error body shape returned by the backend.
///
/// Validation failures (422) carry a per-field `errors` map; other failures
/// carry a `message` or `error` field, optionally with a machine-readable
/// `code`.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    pub message: Option<String>,
    pub error: Option<String>,
    pub code: Option<String>,
    pub errors: Option<serde_json::Map<String, serde_json::Value>>,
}

impl ApiError {
    /// Normalize a non-401 failure response into a tagged variant.
    ///
    /// Derivation priority: first field-level validation message, recognized
    /// conflict code, database-error code, server-provided `message`/`error`
    /// text, generic fallback.
    pub(crate) fn from_response(status: StatusCode, body: &ErrorBody) -> Self {
        if status == StatusCode::UNPROCESSABLE_ENTITY {
            if let Some(errors) = &body.errors {
                if let Some((field, value)) = errors.iter().next() {
                    let message = first_message(value)
                        .or_else(|| body.message.clone())
                        .unwrap_or_else(|| messages::VALIDATION_ERROR.to_string());
                    return Self::Validation {
                        field: field.clone(),
                        message,
                    };
                }
            }
        }

        match body.code.as_deref() {
            Some("users_name_unique") => return Self::Conflict(ConflictKind::Username),
            Some("users_email_unique") => return Self::Conflict(ConflictKind::Email),
            Some("unique_violation") => return Self::Conflict(ConflictKind::Other),
            Some("database_error") => return Self::Database,
            _ => {}
        }

        let message = body
            .message
            .clone()
            .or_else(|| body.error.clone())
            .unwrap_or_else(|| messages::SERVER_ERROR.to_string());

        Self::Server {
            status: status.as_u16(),
            message,
        }
    }
}

/// First message out of a validation map entry (an array of strings).
fn first_message(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Array(items) => items
            .first()
            .and_then(serde_json::Value::as_str)
            .map(ToString::to_string),
        serde_json::Value::String(s) => Some(s.clone()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(json: &str) -> ErrorBody {
        serde_json::from_str(json).expect("invalid test body")
    }

    #[test]
    fn test_validation_picks_first_field_message() {
        let err = ApiError::from_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            &body(r#"{"message":"The given data was invalid.","errors":{"email":["email must be valid"],"password":["too short"]}}"#),
        );
        assert_eq!(
            err,
            ApiError::Validation {
                field: "email".to_string(),
                message: "email must be valid".to_string(),
            }
        );
        assert_eq!(err.to_string(), "email must be valid");
    }

    #[test]
    fn test_validation_falls_back_to_body_message() {
        let err = ApiError::from_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            &body(r#"{"message":"invalid","errors":{"email":[]}}"#),
        );
        assert_eq!(
            err,
            ApiError::Validation {
                field: "email".to_string(),
                message: "invalid".to_string(),
            }
        );
    }

    #[test]
    fn test_conflict_codes() {
        let err = ApiError::from_response(
            StatusCode::CONFLICT,
            &body(r#"{"message":"duplicate key","code":"users_name_unique"}"#),
        );
        assert_eq!(err, ApiError::Conflict(ConflictKind::Username));
        assert_eq!(err.to_string(), crate::constants::messages::USERNAME_TAKEN);

        let err = ApiError::from_response(
            StatusCode::CONFLICT,
            &body(r#"{"code":"users_email_unique"}"#),
        );
        assert_eq!(err, ApiError::Conflict(ConflictKind::Email));

        let err =
            ApiError::from_response(StatusCode::CONFLICT, &body(r#"{"code":"unique_violation"}"#));
        assert_eq!(err, ApiError::Conflict(ConflictKind::Other));
    }

    #[test]
    fn test_database_code() {
        let err = ApiError::from_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            &body(r#"{"code":"database_error","message":"SQLSTATE[23505]"}"#),
        );
        assert_eq!(err, ApiError::Database);
    }

    #[test]
    fn test_server_message_surfaced_verbatim() {
        let err = ApiError::from_response(
            StatusCode::NOT_FOUND,
            &body(r#"{"message":"Post not found"}"#),
        );
        assert_eq!(err.to_string(), "Post not found");
    }

    #[test]
    fn test_error_field_used_when_message_absent() {
        let err = ApiError::from_response(
            StatusCode::BAD_REQUEST,
            &body(r#"{"error":"bad request body"}"#),
        );
        assert_eq!(err.to_string(), "bad request body");
    }

    #[test]
    fn test_empty_body_falls_back_to_generic() {
        let err = ApiError::from_response(StatusCode::INTERNAL_SERVER_ERROR, &ErrorBody::default());
        assert_eq!(
            err.to_string(),
            crate::constants::messages::SERVER_ERROR.to_string()
        );
    }

    #[test]
    fn test_identical_bodies_normalize_identically() {
        let a = ApiError::from_response(
            StatusCode::CONFLICT,
            &body(r#"{"code":"users_name_unique"}"#),
        );
        let b = ApiError::from_response(
            StatusCode::CONFLICT,
            &body(r#"{"code":"users_name_unique"}"#),
        );
        assert_eq!(a, b);
    }
}
