//! # auth-adapters
//!
//! `SessionResolver` implementations. Passwords, email verification and
//! session issuance belong to the identity provider; these adapters only
//! turn a bearer credential back into a `Session`.

pub mod static_tokens;

#[cfg(feature = "auth-jwt")]
pub mod jwt;

pub use static_tokens::StaticSessionResolver;

#[cfg(feature = "auth-jwt")]
pub use jwt::{JwtClaims, JwtSessionResolver};
