//! Stateless façades mapping domain operations to backend endpoints.
//!
//! One façade per domain, one method per endpoint. Façades perform no caching
//! and no retries; each call returns the unwrapped payload or the transport's
//! normalized error. The auth façade additionally owns credential
//! persistence.

pub mod auth;
pub mod cars;
pub mod categories;
pub mod posts;
pub mod users;

pub use auth::AuthService;
pub use cars::CarService;
pub use categories::CategoryService;
pub use posts::PostService;
pub use users::UserService;
