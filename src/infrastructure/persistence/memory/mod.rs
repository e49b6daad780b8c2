//! In-memory storage backend implementing the same ports as Postgres.

pub mod database;
pub mod repositories;
#[cfg(test)]
pub(crate) mod test_support;

pub use database::{MemoryConnection, MemoryDatabase, MemoryState};
pub use repositories::{
  MemoryCompanyRepository, MemoryCredentialRepository, MemoryDepartmentRepository,
  MemoryRightsRepository, MemoryUserRepository,
};
