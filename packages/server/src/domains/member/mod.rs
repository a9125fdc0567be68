//! Member domain - registration, profiles and the roster
//!
//! Architecture:
//!   route handler → actions (views) / models (writes)

pub mod actions;
pub mod data;
pub mod models;

// Re-export commonly used types
pub use data::MemberData;
pub use models::member::Member;
