use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::company::{CompanyError, CompanyName, CompanyService};
use crate::domain::context::RequestContext;
use crate::domain::transaction::TransactionManager;

#[derive(Debug, Clone)]
pub struct AddCompanyCommand {
  pub name: String,
  /// Authenticated user creating the company
  pub requester_id: Uuid,
}

#[derive(Debug, Clone)]
pub struct AddCompanyResponse {
  pub company_id: Uuid,
  pub name: String,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

pub struct AddCompanyUseCase<M: TransactionManager> {
  company_service: Arc<CompanyService<M>>,
}

impl<M: TransactionManager> AddCompanyUseCase<M> {
  pub fn new(company_service: Arc<CompanyService<M>>) -> Self {
    Self { company_service }
  }

  pub async fn execute(
    &self,
    ctx: &RequestContext,
    command: AddCompanyCommand,
  ) -> Result<AddCompanyResponse, CompanyError> {
    let name = CompanyName::new(command.name)?;
    let company = self
      .company_service
      .add_company(ctx, name, command.requester_id)
      .await?;

    Ok(AddCompanyResponse {
      company_id: company.id,
      name: company.name,
      created_at: company.created_at,
      updated_at: company.updated_at,
    })
  }
}
