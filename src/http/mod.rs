//! HTTP surface
//!
//! Thin axum layer over the job registry and pipeline executor: submit a job,
//! query its externally visible status, delete it, health check.

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
