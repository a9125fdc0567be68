//! Officer domain - admin grants held by members

pub mod models;

pub use models::officer::Officer;
