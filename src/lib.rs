//! Civic Connect department router
//!
//! Routes citizen grievances to the government department responsible for
//! them. The core is a deterministic keyword rule engine (`routing`); around
//! it sit grievance intake and storage, an optional external AI second
//! opinion, and an axum HTTP API.

pub mod ai;
pub mod api;
pub mod config;
pub mod error;
pub mod grievances;
pub mod logging;
pub mod metrics;
pub mod routing;

pub use config::Config;
pub use error::{Result, RouterError};
pub use routing::{DepartmentId, DepartmentRouter, Suggestion};
