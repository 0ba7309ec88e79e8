//! HTTP routes.

pub mod health;
pub mod visits;

pub use health::{HealthResponse, health_routes};
pub use visits::{VisitsResponse, session_routes};
