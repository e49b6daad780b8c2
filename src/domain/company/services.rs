use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

use crate::domain::auth::{errors::RepositoryError, ports::UserRepository};
use crate::domain::context::RequestContext;
use crate::domain::transaction::{TransactionManager, UnitOfWork};

use super::{
  entities::{Company, CompanyManager, Department},
  errors::CompanyError,
  ports::{CompanyRepository, DepartmentRepository, RightsRepository},
  value_objects::CompanyName,
};

/// Company service implementing core business logic
pub struct CompanyService<M: TransactionManager> {
  tx_manager: Arc<M>,
  company_repo: Arc<dyn CompanyRepository<M::Connection>>,
  department_repo: Arc<dyn DepartmentRepository<M::Connection>>,
  rights_repo: Arc<dyn RightsRepository<M::Connection>>,
  user_repo: Arc<dyn UserRepository<M::Connection>>,
}

impl<M: TransactionManager> CompanyService<M> {
  pub fn new(
    tx_manager: Arc<M>,
    company_repo: Arc<dyn CompanyRepository<M::Connection>>,
    department_repo: Arc<dyn DepartmentRepository<M::Connection>>,
    rights_repo: Arc<dyn RightsRepository<M::Connection>>,
    user_repo: Arc<dyn UserRepository<M::Connection>>,
  ) -> Self {
    Self {
      tx_manager,
      company_repo,
      department_repo,
      rights_repo,
      user_repo,
    }
  }

  /// Create new company with the requesting user as its administrator.
  ///
  /// Writes the company, its "Head" department, the admin rights record and
  /// the user's company association in one transaction. Nothing is kept
  /// unless all four writes and the commit succeed.
  pub async fn add_company(
    &self,
    ctx: &RequestContext,
    name: CompanyName,
    requester_id: Uuid,
  ) -> Result<Company, CompanyError> {
    async move {
      let mut uow = UnitOfWork::begin(self.tx_manager.as_ref())
        .await
        .map_err(|e| {
          tracing::error!(error = %e, "Failed to begin transaction");
          e
        })?;

      let company = self
        .company_repo
        .create(uow.connection()?, Company::new(name))
        .await
        .map_err(|e| {
          tracing::error!(user_id = %requester_id, error = %e, "Failed to insert company");
          e
        })?;

      let department = self
        .department_repo
        .create(uow.connection()?, Department::head(company.id))
        .await
        .map_err(|e| {
          tracing::error!(company_id = %company.id, error = %e, "Failed to insert head department");
          e
        })?;

      match self
        .rights_repo
        .grant_company_admin(
          uow.connection()?,
          CompanyManager::new(requester_id, company.id),
        )
        .await
      {
        Ok(_) => {}
        Err(RepositoryError::NotFound) => {
          tracing::warn!(user_id = %requester_id, "Requesting user does not exist");
          return Err(CompanyError::UserNotFound);
        }
        Err(e) => {
          tracing::error!(
            company_id = %company.id,
            user_id = %requester_id,
            error = %e,
            "Failed to grant company admin rights"
          );
          return Err(e.into());
        }
      }

      match self
        .user_repo
        .update_company(uow.connection()?, requester_id, company.id, department.id)
        .await
      {
        Ok(_) => {}
        Err(RepositoryError::NotFound) => {
          tracing::warn!(user_id = %requester_id, "Requesting user does not exist");
          return Err(CompanyError::UserNotFound);
        }
        Err(e) => {
          tracing::error!(user_id = %requester_id, error = %e, "Failed to update user company");
          return Err(e.into());
        }
      }

      uow.commit().await.map_err(|e| {
        tracing::error!(company_id = %company.id, error = %e, "Failed to commit company creation");
        e
      })?;

      tracing::info!(
        company_id = %company.id,
        department_id = %department.id,
        user_id = %requester_id,
        "Company created"
      );
      Ok(company)
    }
    .instrument(ctx.span("add_company"))
    .await
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use async_trait::async_trait;

  use crate::domain::auth::entities::{NewUser, User};
  use crate::domain::auth::value_objects::{Email, PersonName};
  use crate::infrastructure::persistence::memory::test_support::{FailOn, FailingTransactions};
  use crate::infrastructure::persistence::memory::{
    MemoryCompanyRepository, MemoryConnection, MemoryDatabase, MemoryDepartmentRepository,
    MemoryRightsRepository, MemoryUserRepository,
  };

  /// Store that fails every write
  struct FailingStore;

  fn injected() -> RepositoryError {
    RepositoryError::DatabaseError("injected failure".to_string())
  }

  #[async_trait]
  impl CompanyRepository<MemoryConnection> for FailingStore {
    async fn create(
      &self,
      _conn: &mut MemoryConnection,
      _company: Company,
    ) -> Result<Company, RepositoryError> {
      Err(injected())
    }
  }

  #[async_trait]
  impl DepartmentRepository<MemoryConnection> for FailingStore {
    async fn create(
      &self,
      _conn: &mut MemoryConnection,
      _department: Department,
    ) -> Result<Department, RepositoryError> {
      Err(injected())
    }
  }

  #[async_trait]
  impl RightsRepository<MemoryConnection> for FailingStore {
    async fn grant_company_admin(
      &self,
      _conn: &mut MemoryConnection,
      _manager: CompanyManager,
    ) -> Result<CompanyManager, RepositoryError> {
      Err(injected())
    }
  }

  #[async_trait]
  impl UserRepository<MemoryConnection> for FailingStore {
    async fn create(
      &self,
      _conn: &mut MemoryConnection,
      _user: User,
    ) -> Result<User, RepositoryError> {
      Err(injected())
    }

    async fn find_by_email(
      &self,
      _conn: &mut MemoryConnection,
      _email: &Email,
    ) -> Result<Option<User>, RepositoryError> {
      Err(injected())
    }

    async fn update_company(
      &self,
      _conn: &mut MemoryConnection,
      _user_id: Uuid,
      _company_id: Uuid,
      _department_id: Uuid,
    ) -> Result<User, RepositoryError> {
      Err(injected())
    }
  }

  #[derive(Clone, Copy)]
  enum FailAt {
    Nothing,
    Company,
    Department,
    Rights,
    UserPatch,
  }

  fn service(db: &Arc<MemoryDatabase>, fail_at: FailAt) -> CompanyService<MemoryDatabase> {
    let company_repo: Arc<dyn CompanyRepository<MemoryConnection>> = match fail_at {
      FailAt::Company => Arc::new(FailingStore),
      _ => Arc::new(MemoryCompanyRepository::new()),
    };
    let department_repo: Arc<dyn DepartmentRepository<MemoryConnection>> = match fail_at {
      FailAt::Department => Arc::new(FailingStore),
      _ => Arc::new(MemoryDepartmentRepository::new()),
    };
    let rights_repo: Arc<dyn RightsRepository<MemoryConnection>> = match fail_at {
      FailAt::Rights => Arc::new(FailingStore),
      _ => Arc::new(MemoryRightsRepository::new()),
    };
    let user_repo: Arc<dyn UserRepository<MemoryConnection>> = match fail_at {
      FailAt::UserPatch => Arc::new(FailingStore),
      _ => Arc::new(MemoryUserRepository::new()),
    };

    CompanyService::new(
      db.clone(),
      company_repo,
      department_repo,
      rights_repo,
      user_repo,
    )
  }

  async fn seed_user(db: &MemoryDatabase) -> Uuid {
    let user = User::new(
      NewUser {
        first_name: PersonName::new("A").unwrap(),
        last_name: PersonName::new("B").unwrap(),
        email: Email::new("a@b.com").unwrap(),
      },
      "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHQ$aGFzaA".to_string(),
    );
    let id = user.id;
    db.seed_user(user).await;
    id
  }

  #[tokio::test]
  async fn test_add_company_writes_all_four_records() {
    let db = Arc::new(MemoryDatabase::new());
    let user_id = seed_user(&db).await;
    let companies = service(&db, FailAt::Nothing);
    let ctx = RequestContext::detached();

    let company = companies
      .add_company(&ctx, CompanyName::new("Acme").unwrap(), user_id)
      .await
      .unwrap();

    let state = db.snapshot().await;
    assert_eq!(state.companies, vec![company.clone()]);
    assert_eq!(company.name, "Acme");

    assert_eq!(state.departments.len(), 1);
    let department = &state.departments[0];
    assert_eq!(department.name, "Head");
    assert_eq!(department.company_id, company.id);

    assert_eq!(state.company_managers.len(), 1);
    assert_eq!(state.company_managers[0].user_id, user_id);
    assert_eq!(state.company_managers[0].company_id, company.id);

    let user = &state.users[0];
    assert_eq!(user.company_id, Some(company.id));
    assert_eq!(user.department_id, Some(department.id));
  }

  #[tokio::test]
  async fn test_add_company_is_atomic_under_failure_at_each_step() {
    for fail_at in [
      FailAt::Company,
      FailAt::Department,
      FailAt::Rights,
      FailAt::UserPatch,
    ] {
      let db = Arc::new(MemoryDatabase::new());
      let user_id = seed_user(&db).await;
      let companies = service(&db, fail_at);
      let ctx = RequestContext::detached();

      let result = companies
        .add_company(&ctx, CompanyName::new("Acme").unwrap(), user_id)
        .await;

      assert!(matches!(
        result,
        Err(CompanyError::Repository(RepositoryError::DatabaseError(_)))
      ));

      let state = db.snapshot().await;
      assert!(state.companies.is_empty());
      assert!(state.departments.is_empty());
      assert!(state.company_managers.is_empty());
      assert_eq!(state.users[0].company_id, None);
      assert_eq!(state.users[0].department_id, None);
    }
  }

  #[tokio::test]
  async fn test_add_company_for_unknown_user() {
    let db = Arc::new(MemoryDatabase::new());
    let companies = service(&db, FailAt::Nothing);
    let ctx = RequestContext::detached();

    let result = companies
      .add_company(&ctx, CompanyName::new("Acme").unwrap(), Uuid::new_v4())
      .await;

    assert!(matches!(result, Err(CompanyError::UserNotFound)));
    let state = db.snapshot().await;
    assert!(state.companies.is_empty());
    assert!(state.departments.is_empty());
    assert!(state.company_managers.is_empty());
  }

  #[tokio::test]
  async fn test_user_can_create_second_company() {
    let db = Arc::new(MemoryDatabase::new());
    let user_id = seed_user(&db).await;
    let companies = service(&db, FailAt::Nothing);
    let ctx = RequestContext::detached();

    companies
      .add_company(&ctx, CompanyName::new("First").unwrap(), user_id)
      .await
      .unwrap();
    let second = companies
      .add_company(&ctx, CompanyName::new("Second").unwrap(), user_id)
      .await
      .unwrap();

    let state = db.snapshot().await;
    assert_eq!(state.companies.len(), 2);
    assert_eq!(state.departments.len(), 2);
    assert_eq!(state.company_managers.len(), 2);
    assert_eq!(state.users[0].company_id, Some(second.id));
  }

  #[tokio::test]
  async fn test_add_company_fails_when_transaction_cannot_begin_or_commit() {
    for fail_on in [FailOn::Begin, FailOn::Commit] {
      let db = Arc::new(MemoryDatabase::new());
      let user_id = seed_user(&db).await;
      let companies = CompanyService::new(
        Arc::new(FailingTransactions::new((*db).clone(), fail_on)),
        Arc::new(MemoryCompanyRepository::new()),
        Arc::new(MemoryDepartmentRepository::new()),
        Arc::new(MemoryRightsRepository::new()),
        Arc::new(MemoryUserRepository::new()),
      );
      let ctx = RequestContext::detached();

      let result = companies
        .add_company(&ctx, CompanyName::new("Acme").unwrap(), user_id)
        .await;

      assert!(
        matches!(
          result,
          Err(CompanyError::Repository(RepositoryError::TransactionFailed(_)))
        ),
        "{:?}",
        fail_on
      );
      let state = db.snapshot().await;
      assert!(state.companies.is_empty());
      assert!(state.departments.is_empty());
      assert!(state.company_managers.is_empty());
      assert_eq!(state.users[0].company_id, None);
    }
  }
}
