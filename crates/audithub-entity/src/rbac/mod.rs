//! RBAC domain entities: roles, permissions, and resolved grant graphs.

pub mod grants;
pub mod permission;
pub mod role;

pub use grants::{RoleGrant, UserGrants};
pub use permission::Permission;
pub use role::Role;
