//! Grievance intake and storage
//!
//! Submissions are validated, routed to a department (manual choice, AI
//! verdict, or keyword router, in that order of precedence) and stored
//! behind the `GrievanceStore` trait.

pub mod handlers;
pub mod intake;
pub mod models;
pub mod store;

pub use handlers::GrievancesState;
pub use intake::IntakeService;
pub use models::{
    AssignmentSource, Grievance, GrievanceCategory, GrievanceFilter, GrievancePriority,
    GrievanceStats, GrievanceStatus, GrievanceSubmission, GrievanceUpdate, Location,
};
pub use store::{GrievanceStore, InMemoryGrievanceStore};
