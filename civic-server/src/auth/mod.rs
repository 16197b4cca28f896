//! Authentication and authorization
//!
//! - [`JwtService`] - token issue and validation
//! - [`CurrentUser`] - caller context decoded from the token
//! - [`require_auth`] - authentication middleware
//! - [`policy`] - role × operation matrix and department resolution
//! - [`password`] - Argon2 hashing

pub mod extractor;
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod permissions;
pub mod policy;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::{require_auth, require_operation};
pub use policy::{Operation, authorize};
