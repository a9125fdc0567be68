//! Auth domain - bearer token issuing and verification
//!
//! Responsibilities:
//! - JWT signing and verification (HS256, issuer-checked)

pub mod jwt;

pub use jwt::{Claims, JwtService};
