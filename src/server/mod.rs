//! HTTP server
//!
//! `ServerBuilder` wires the store, identity provider and configuration
//! into an [`AppState`] and mounts every route on it.

pub mod builder;
pub mod handlers;
pub mod host;
pub mod router;

pub use builder::ServerBuilder;
pub use host::AppState;
pub use router::build_router;
