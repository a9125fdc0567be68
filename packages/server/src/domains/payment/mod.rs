//! Payment domain - yearly dues and their confirmation

pub mod models;

pub use models::payment::{Payment, PaymentState};
