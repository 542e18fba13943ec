//! Core business logic for follows-rs.

pub mod services;

pub use services::*;
