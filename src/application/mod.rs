//! Application layer
//!
//! This layer contains use cases that turn raw transport input into domain
//! value objects and hand them to the domain services.

pub mod auth;
pub mod company;
