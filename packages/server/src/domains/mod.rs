// Business domains
pub mod auth;
pub mod group;
pub mod member;
pub mod officer;
pub mod payment;
