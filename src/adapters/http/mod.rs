pub mod dtos;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod routes;

// Re-export commonly used types
pub use dtos::{
  AuthResponse, CompanyResponse, CreateCompanyRequest, ErrorResponse, SignInRequest, SignUpRequest,
};
pub use errors::ApiError;
pub use handlers::auth::{sign_in_handler, sign_up_handler};
pub use handlers::company::add_company_handler;
pub use handlers::health_check;
pub use middleware::{
  AuthMiddleware, AuthUser, AuthenticatedUser, RequestId, RequestIdExt, RequestIdMiddleware,
};
pub use routes::{configure_auth_routes, configure_company_routes};
