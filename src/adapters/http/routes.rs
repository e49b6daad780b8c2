use actix_web::web;
use std::sync::Arc;

use crate::application::auth::{SignInUserUseCase, SignUpUserUseCase};
use crate::application::company::AddCompanyUseCase;
use crate::domain::transaction::TransactionManager;

use super::handlers::auth::{sign_in_handler, sign_up_handler};
use super::handlers::company::add_company_handler;

/// Configure authentication routes
///
/// Mounts the public authentication endpoints under the provided scope
/// (e.g., /api/v1/auth).
///
/// # Routes
///
/// - POST /sign-in - Verify credentials and issue a token
/// - POST /sign-up - Create an account and issue a token
///
/// # Example
///
/// ```no_run
/// use actix_web::{App, web};
/// # use std::sync::Arc;
/// # use thingrepo::adapters::http::routes::configure_auth_routes;
/// # use thingrepo::application::auth::{SignInUserUseCase, SignUpUserUseCase};
/// # use thingrepo::infrastructure::persistence::memory::MemoryDatabase;
/// # fn build(
/// #   sign_in: Arc<SignInUserUseCase<MemoryDatabase>>,
/// #   sign_up: Arc<SignUpUserUseCase<MemoryDatabase>>,
/// # ) {
/// App::new().service(
///   web::scope("/api/v1/auth")
///     .configure(|cfg| configure_auth_routes(cfg, sign_in.clone(), sign_up.clone())),
/// );
/// # }
/// ```
pub fn configure_auth_routes<M: TransactionManager>(
  cfg: &mut web::ServiceConfig,
  sign_in_use_case: Arc<SignInUserUseCase<M>>,
  sign_up_use_case: Arc<SignUpUserUseCase<M>>,
) {
  cfg
    .app_data(web::Data::new(sign_in_use_case))
    .app_data(web::Data::new(sign_up_use_case))
    .route("/sign-in", web::post().to(sign_in_handler::<M>))
    .route("/sign-up", web::post().to(sign_up_handler::<M>));
}

/// Configure company routes
///
/// Must be mounted behind `AuthMiddleware`.
///
/// # Routes
///
/// - POST "" - Create a company owned by the authenticated user
pub fn configure_company_routes<M: TransactionManager>(
  cfg: &mut web::ServiceConfig,
  add_company_use_case: Arc<AddCompanyUseCase<M>>,
) {
  cfg
    .app_data(web::Data::new(add_company_use_case))
    .route("", web::post().to(add_company_handler::<M>));
}
