use actix_web::{HttpRequest, HttpResponse, web};
use std::sync::Arc;
use validator::Validate;

use crate::{
  adapters::http::{
    dtos::{CompanyResponse, CreateCompanyRequest},
    errors::ApiError,
    middleware::{AuthUser, RequestIdExt},
  },
  application::company::{AddCompanyCommand, AddCompanyUseCase},
  domain::transaction::TransactionManager,
};

/// Create new company owned by the authenticated user
/// POST /api/v1/companies
pub async fn add_company_handler<M: TransactionManager>(
  request: web::Json<CreateCompanyRequest>,
  use_case: web::Data<Arc<AddCompanyUseCase<M>>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;

  let user = http_req.authenticated_user()?;

  let command = AddCompanyCommand {
    name: request.into_inner().name,
    requester_id: user.user_id,
  };

  let response = use_case
    .execute(&http_req.request_context(), command)
    .await?;

  Ok(HttpResponse::Created().json(CompanyResponse {
    id: response.company_id,
    name: response.name,
    created_at: response.created_at,
    updated_at: response.updated_at,
  }))
}
