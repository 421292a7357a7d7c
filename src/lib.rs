//! Motoforum client core.
//!
//! The non-presentational core of a client application for a moderated
//! automotive discussion forum: a typed transport client over the backend
//! REST API, stateless domain service façades, and normalized per-domain
//! state containers driven by a requested/succeeded/failed request
//! lifecycle. The view layer consumes read-only state snapshots, dispatches
//! operations, and follows the route guard's decisions.

pub mod client;
pub mod config;
pub mod constants;
pub mod credentials;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;
