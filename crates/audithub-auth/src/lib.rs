//! # audithub-auth
//!
//! Authentication, session control, and permission resolution
//! for the AuditHub platform.
//!
//! ## Modules
//!
//! - `jwt` — signed access/refresh token creation and validation
//! - `password` — bcrypt password hashing and policy enforcement
//! - `session` — session lifecycle (login, refresh, logout, password
//!   change, heartbeat) and the stale-token sweep
//! - `rbac` — layered permission resolution (roles ∪ custom grants,
//!   with firm policy fallback)
//! - `store` — persistence traits consumed by the core, plus in-memory
//!   implementations for tests and single-node development

pub mod jwt;
pub mod password;
pub mod rbac;
pub mod session;
pub mod store;

pub use jwt::{AccessClaims, JwtDecoder, JwtEncoder, RefreshClaims};
pub use password::{PasswordHasher, PasswordValidator};
pub use rbac::{PermissionResolver, PermissionSource};
pub use session::{LoginResult, SessionManager, TokenSweeper};
pub use store::{FirmStore, PermissionStore, TokenStore, UserStore};
