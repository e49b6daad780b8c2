use actix_web::{HttpRequest, HttpResponse, web};
use std::sync::Arc;
use validator::Validate;

use crate::adapters::http::{
  dtos::{AuthResponse, SignInRequest, SignUpRequest},
  errors::ApiError,
  middleware::RequestIdExt,
};
use crate::application::auth::{
  SignInUserCommand, SignInUserUseCase, SignUpUserCommand, SignUpUserUseCase,
};
use crate::domain::transaction::TransactionManager;

/// Handler for signing in
///
/// POST /api/v1/auth/sign-in
/// Body: SignInRequest (JSON)
/// Response: AuthResponse (JSON) with status 200
pub async fn sign_in_handler<M: TransactionManager>(
  request: web::Json<SignInRequest>,
  use_case: web::Data<Arc<SignInUserUseCase<M>>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;

  let request = request.into_inner();
  let command = SignInUserCommand {
    email: request.email,
    password: request.password,
  };

  let response = use_case
    .execute(&http_req.request_context(), command)
    .await?;

  Ok(HttpResponse::Ok().json(AuthResponse {
    user: response.user,
    token: response.token,
  }))
}

/// Handler for user registration
///
/// POST /api/v1/auth/sign-up
/// Body: SignUpRequest (JSON)
/// Response: AuthResponse (JSON) with status 201
pub async fn sign_up_handler<M: TransactionManager>(
  request: web::Json<SignUpRequest>,
  use_case: web::Data<Arc<SignUpUserUseCase<M>>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;

  let request = request.into_inner();
  let command = SignUpUserCommand {
    first_name: request.first_name,
    last_name: request.last_name,
    email: request.email,
    password: request.password,
  };

  let response = use_case
    .execute(&http_req.request_context(), command)
    .await?;

  Ok(HttpResponse::Created().json(AuthResponse {
    user: response.user,
    token: response.token,
  }))
}
