use async_trait::async_trait;

use super::entities::{Company, CompanyManager, Department};
use crate::domain::auth::errors::RepositoryError;

/// Company persistence. `C` is the connection type of the backend.
#[async_trait]
pub trait CompanyRepository<C: Send>: Send + Sync {
  async fn create(&self, conn: &mut C, company: Company) -> Result<Company, RepositoryError>;
}

#[async_trait]
pub trait DepartmentRepository<C: Send>: Send + Sync {
  async fn create(&self, conn: &mut C, department: Department)
  -> Result<Department, RepositoryError>;
}

/// Administrator rights records
#[async_trait]
pub trait RightsRepository<C: Send>: Send + Sync {
  /// Returns `RepositoryError::NotFound` when the user or the company does
  /// not exist.
  async fn grant_company_admin(
    &self,
    conn: &mut C,
    manager: CompanyManager,
  ) -> Result<CompanyManager, RepositoryError>;
}
