//! HTTP API for Habla, a Spanish practice app.
//!
//! Learners work through lessons one question at a time; answers are graded by
//! [`habla_grading`] with its accent-tolerant matching rules.

pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod jobs;
pub mod lesson;
pub mod metrics;
pub mod middleware;
pub mod practice;
pub mod router;
pub mod state;
pub mod tracing;
pub mod validation;

pub use config::ApiConfig;
pub use state::{ApiState, AuthConfig};
