//! Kernel module - server infrastructure and dependencies.

pub mod member_directory;
pub mod test_dependencies;
pub mod traits;

pub use member_directory::{PgMemberDirectory, TimedDirectory};
pub use test_dependencies::InMemoryDirectory;
pub use traits::*;
