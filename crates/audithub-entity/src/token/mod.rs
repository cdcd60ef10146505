//! Refresh token domain entities.

pub mod application;
pub mod model;

pub use application::ApplicationType;
pub use model::{NewRefreshToken, RefreshToken};
