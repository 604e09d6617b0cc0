//! `gamehub-auth`: authentication/authorization boundary.
//!
//! This crate is intentionally decoupled from HTTP: it verifies bearer tokens,
//! turns claims into a [`Principal`], and answers role questions. The API crate
//! decides what a failure means on the wire.

pub mod authorize;
pub mod claims;
pub mod jwt;
pub mod principal;
pub mod roles;

pub use authorize::{authorize_role, AuthzError};
pub use claims::{validate_claims, JwtClaims, TokenValidationError};
pub use jwt::{Hs256JwtValidator, JwtValidator};
pub use principal::{IdentityError, Principal};
pub use roles::Role;
