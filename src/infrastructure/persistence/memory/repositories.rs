use async_trait::async_trait;
use uuid::Uuid;

use super::database::MemoryConnection;
use crate::domain::auth::{
  entities::{Credential, User},
  errors::RepositoryError,
  ports::{CredentialRepository, UserRepository},
  value_objects::Email,
};
use crate::domain::company::{
  entities::{Company, CompanyManager, Department},
  ports::{CompanyRepository, DepartmentRepository, RightsRepository},
};

/// In-memory implementation of the UserRepository trait
#[derive(Debug, Default)]
pub struct MemoryUserRepository;

impl MemoryUserRepository {
  pub fn new() -> Self {
    Self
  }
}

#[async_trait]
impl UserRepository<MemoryConnection> for MemoryUserRepository {
  async fn create(&self, conn: &mut MemoryConnection, user: User) -> Result<User, RepositoryError> {
    let tables = conn.tables();
    if tables.users.iter().any(|u| u.email == user.email) {
      return Err(RepositoryError::DuplicateKey(format!(
        "users.email {}",
        user.email
      )));
    }
    tables.users.push(user.clone());
    Ok(user)
  }

  async fn find_by_email(
    &self,
    conn: &mut MemoryConnection,
    email: &Email,
  ) -> Result<Option<User>, RepositoryError> {
    Ok(
      conn
        .tables()
        .users
        .iter()
        .find(|u| u.email == email.as_str())
        .cloned(),
    )
  }

  async fn update_company(
    &self,
    conn: &mut MemoryConnection,
    user_id: Uuid,
    company_id: Uuid,
    department_id: Uuid,
  ) -> Result<User, RepositoryError> {
    let user = conn
      .tables()
      .users
      .iter_mut()
      .find(|u| u.id == user_id)
      .ok_or(RepositoryError::NotFound)?;
    user.assign_to_company(company_id, department_id);
    Ok(user.clone())
  }
}

/// Credentials derived from the rights records
#[derive(Debug, Default)]
pub struct MemoryCredentialRepository;

impl MemoryCredentialRepository {
  pub fn new() -> Self {
    Self
  }
}

#[async_trait]
impl CredentialRepository<MemoryConnection> for MemoryCredentialRepository {
  async fn find_by_user(
    &self,
    conn: &mut MemoryConnection,
    user_id: Uuid,
  ) -> Result<Vec<Credential>, RepositoryError> {
    Ok(
      conn
        .tables()
        .company_managers
        .iter()
        .filter(|m| m.user_id == user_id)
        .map(|m| Credential::company_admin(m.user_id, m.company_id))
        .collect(),
    )
  }
}

#[derive(Debug, Default)]
pub struct MemoryCompanyRepository;

impl MemoryCompanyRepository {
  pub fn new() -> Self {
    Self
  }
}

#[async_trait]
impl CompanyRepository<MemoryConnection> for MemoryCompanyRepository {
  async fn create(
    &self,
    conn: &mut MemoryConnection,
    company: Company,
  ) -> Result<Company, RepositoryError> {
    conn.tables().companies.push(company.clone());
    Ok(company)
  }
}

#[derive(Debug, Default)]
pub struct MemoryDepartmentRepository;

impl MemoryDepartmentRepository {
  pub fn new() -> Self {
    Self
  }
}

#[async_trait]
impl DepartmentRepository<MemoryConnection> for MemoryDepartmentRepository {
  async fn create(
    &self,
    conn: &mut MemoryConnection,
    department: Department,
  ) -> Result<Department, RepositoryError> {
    let tables = conn.tables();
    if !tables.companies.iter().any(|c| c.id == department.company_id) {
      return Err(RepositoryError::NotFound);
    }
    tables.departments.push(department.clone());
    Ok(department)
  }
}

#[derive(Debug, Default)]
pub struct MemoryRightsRepository;

impl MemoryRightsRepository {
  pub fn new() -> Self {
    Self
  }
}

#[async_trait]
impl RightsRepository<MemoryConnection> for MemoryRightsRepository {
  async fn grant_company_admin(
    &self,
    conn: &mut MemoryConnection,
    manager: CompanyManager,
  ) -> Result<CompanyManager, RepositoryError> {
    let tables = conn.tables();
    // Same reference checks as the foreign keys of company_managers
    if !tables.users.iter().any(|u| u.id == manager.user_id)
      || !tables.companies.iter().any(|c| c.id == manager.company_id)
    {
      return Err(RepositoryError::NotFound);
    }
    if tables
      .company_managers
      .iter()
      .any(|m| m.user_id == manager.user_id && m.company_id == manager.company_id)
    {
      return Err(RepositoryError::DuplicateKey(
        "company_managers (user_id, company_id)".to_string(),
      ));
    }
    tables.company_managers.push(manager.clone());
    Ok(manager)
  }
}
