//! Firm (tenant) domain entities.

pub mod model;
pub mod policy;

pub use model::Firm;
pub use policy::{FirmPolicy, PolicyRule};
