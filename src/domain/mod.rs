pub mod auth;
pub mod company;
pub mod context;
pub mod transaction;

// Re-export auth module for easier access
pub use auth::*;
pub use context::RequestContext;
pub use transaction::{TransactionManager, UnitOfWork};
