pub mod officer;

pub use officer::{Officer, PayeeRow};
