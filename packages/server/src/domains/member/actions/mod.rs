//! Member domain actions - business logic functions
//!
//! Actions are async functions called directly from route handlers once the
//! route's gate has passed.

pub mod queries;

pub use queries::{get_approved_members, get_member_data, get_member_detail, get_roster};
