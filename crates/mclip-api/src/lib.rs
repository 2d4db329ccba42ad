//! Axum HTTP API for the clip pipeline.
//!
//! This crate provides:
//! - `POST /api/clip`: transcribe a local video and render its key moments
//! - Health and Prometheus metrics endpoints
//! - Request ids, request logging, CORS and a global rate limit

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
