//! Identity resolution for protected routes.
//!
//! A bearer JWT (or the legacy `auth-token` header) is decoded into an
//! [`AuthUser`] which handlers read from the request extensions.

pub mod jwt;
pub mod middleware;

pub use jwt::{Claims, JwtKeys};
pub use middleware::{require_auth, AuthUser};
