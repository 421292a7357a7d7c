//! Shared constants used across the client core.

/// Name of the persisted bearer-token entry.
pub const AUTH_TOKEN_ENTRY: &str = "forum_auth_token";

/// Name of the persisted user-snapshot entry.
pub const USER_SNAPSHOT_ENTRY: &str = "forum_user_data";

/// Lifetime of persisted credential entries, in days.
pub const CREDENTIAL_TTL_DAYS: i64 = 7;

/// Fixed friendly messages surfaced for normalized failures.
///
/// The transport client is the single point of truth for error-message
/// derivation; no other component builds display text from raw responses.
pub mod messages {
    /// No response was received from the server.
    pub const NETWORK: &str = "No connection to the server";
    /// Generic server-side failure with no usable message in the body.
    pub const SERVER_ERROR: &str = "A server error occurred";
    /// 422 body carried no usable field message.
    pub const VALIDATION_ERROR: &str = "Submitted data failed validation";
    /// Username uniqueness conflict.
    pub const USERNAME_TAKEN: &str = "That username is already taken";
    /// Email uniqueness conflict.
    pub const EMAIL_TAKEN: &str = "That email address is already in use";
    /// Some other uniqueness constraint was violated.
    pub const CONFLICT: &str = "The submitted data is already in use by another user";
    /// Backend reported a database failure.
    pub const DATABASE_ERROR: &str = "A database error occurred";
    /// The session was rejected and has been cleared.
    pub const SESSION_EXPIRED: &str = "Your session has expired, please log in again";
}
