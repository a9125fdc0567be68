// Common types and utilities shared across the application

pub mod auth;
pub mod fiscal_year;

pub use auth::{ErrorKind, Gate, GateDeps, Identity, Predicate};
pub use fiscal_year::FiscalYear;
