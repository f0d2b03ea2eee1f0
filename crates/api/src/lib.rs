//! HTTP API layer for chirp.
//!
//! This crate provides the JSON REST API:
//!
//! - **Endpoints**: signup/login, users, messages, following, likes
//! - **Extractors**: request-scoped authentication
//! - **Middleware**: bearer-token session resolution
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
