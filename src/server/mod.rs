//! Axum-based HTTP server for the painvestex service.
//!
//! # Components
//!
//! - `handlers`: the `/medical` question endpoint plus `/health` and `/metrics`.
//! - `middleware`: request ID tracking.
//! - `routes`: the router that ties everything together.
//!
//! Author: kelexine (<https://github.com/kelexine>)

mod handlers;
mod middleware;
mod routes;

pub use handlers::{parse_question, HealthResponse, HealthStatus, MedicalRequest, MedicalResponse};
pub use routes::{create_router, AppState, MAX_BODY_BYTES};
