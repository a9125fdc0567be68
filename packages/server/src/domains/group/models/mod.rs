pub mod group;

pub use group::{GroupMembership, MemberGroup};
