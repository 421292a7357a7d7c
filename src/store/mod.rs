//! Normalized per-domain state containers.
//!
//! Each container owns one domain's cached entity collections plus its
//! request-lifecycle flags, and is mutated exclusively by reducer events
//! applied under the container's own lock: the single writer path. Views
//! read cloned snapshots and dispatch operations; every operation resolves
//! through the requested, succeeded, failed lifecycle, records failures in
//! the container's error field, and also returns the outcome to the caller
//! so a view can show transient per-action feedback independent of the
//! global loading flag.
//!
//! Containers are constructor-injected (no ambient singletons) so tests can
//! instantiate isolated instances.

pub mod auth;
pub mod cars;
pub mod categories;
pub mod posts;

pub use auth::{AuthState, AuthStatus, AuthStore};
pub use cars::{CarsState, CarsStore};
pub use categories::{CategoriesState, CategoriesStore};
pub use posts::{PostsState, PostsStore};
