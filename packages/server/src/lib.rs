// Club roster API - core library
//
// Members self-register, officers approve registrations, track dues and
// manage groups. Every route is guarded by an ordered authorization gate
// (see common::auth).

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
