//! User domain entities.

pub mod model;
pub mod seniority;

pub use model::User;
pub use seniority::SeniorityType;
