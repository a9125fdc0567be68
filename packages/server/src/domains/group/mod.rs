//! Group domain - named sub-groups of members managed by admins

pub mod data;
pub mod models;

pub use models::group::{GroupMembership, MemberGroup};
