//! Concrete sqlx-backed implementations of the persistence traits.

pub mod audit;
pub mod firm;
pub mod permission;
pub mod token;
pub mod user;

pub use audit::AuditRepository;
pub use firm::FirmRepository;
pub use permission::PermissionRepository;
pub use token::TokenRepository;
pub use user::UserRepository;
