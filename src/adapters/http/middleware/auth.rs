use actix_web::{
  Error, HttpMessage,
  body::EitherBody,
  dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
  error::ResponseError,
};
use futures_util::future::LocalBoxFuture;
use std::{
  future::{Ready, ready},
  rc::Rc,
  sync::Arc,
};
use uuid::Uuid;

use crate::{
  adapters::http::errors::ApiError,
  domain::auth::{entities::Credential, ports::TokenIssuer},
};

/// Identity taken from a verified session token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
  pub user_id: Uuid,
  pub credentials: Vec<Credential>,
}

/// Authentication middleware that validates bearer tokens and attaches the
/// caller's identity to the request
///
/// Tokens are checked by the `TokenIssuer` without a database round trip.
/// Requests without a valid token get 401 Unauthorized.
pub struct AuthMiddleware {
  token_issuer: Arc<dyn TokenIssuer>,
}

impl AuthMiddleware {
  pub fn new(token_issuer: Arc<dyn TokenIssuer>) -> Self {
    Self { token_issuer }
  }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
  S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
  S::Future: 'static,
  B: 'static,
{
  type Response = ServiceResponse<EitherBody<B>>;
  type Error = Error;
  type Transform = AuthMiddlewareService<S>;
  type InitError = ();
  type Future = Ready<Result<Self::Transform, Self::InitError>>;

  fn new_transform(&self, service: S) -> Self::Future {
    ready(Ok(AuthMiddlewareService {
      service: Rc::new(service),
      token_issuer: self.token_issuer.clone(),
    }))
  }
}

pub struct AuthMiddlewareService<S> {
  service: Rc<S>,
  token_issuer: Arc<dyn TokenIssuer>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
  S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
  S::Future: 'static,
  B: 'static,
{
  type Response = ServiceResponse<EitherBody<B>>;
  type Error = Error;
  type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

  forward_ready!(service);

  fn call(&self, req: ServiceRequest) -> Self::Future {
    let service = Rc::clone(&self.service);
    let token_issuer = self.token_issuer.clone();

    Box::pin(async move {
      let token = match extract_bearer_token(&req) {
        Ok(token) => token,
        Err(e) => {
          let (request, _) = req.into_parts();
          let response = e.error_response().map_into_right_body();
          return Ok(ServiceResponse::new(request, response));
        }
      };

      let claims = match token_issuer.verify(&token).await {
        Ok(claims) => claims,
        Err(e) => {
          tracing::warn!(error = %e, path = %req.path(), "Rejected session token");
          let (request, _) = req.into_parts();
          let response = ApiError::Unauthorized
            .error_response()
            .map_into_right_body();
          return Ok(ServiceResponse::new(request, response));
        }
      };

      tracing::debug!(
        user_id = %claims.sub,
        expires_at = ?claims.expires_at(),
        "Authenticated request"
      );

      req.extensions_mut().insert(AuthenticatedUser {
        user_id: claims.sub,
        credentials: claims.credentials,
      });

      let res = service.call(req).await?;
      Ok(res.map_into_left_body())
    })
  }
}

/// Extract bearer token from Authorization header
fn extract_bearer_token(req: &ServiceRequest) -> Result<String, ApiError> {
  req
    .headers()
    .get("Authorization")
    .and_then(|h| h.to_str().ok())
    .and_then(|s| s.strip_prefix("Bearer "))
    .filter(|s| !s.is_empty())
    .map(|s| s.to_string())
    .ok_or(ApiError::Unauthorized)
}

/// Extension trait to extract the authenticated user from a request
pub trait AuthUser {
  /// Returns `ApiError::Unauthorized` when the request did not pass
  /// through `AuthMiddleware`.
  fn authenticated_user(&self) -> Result<AuthenticatedUser, ApiError>;
}

impl AuthUser for actix_web::HttpRequest {
  fn authenticated_user(&self) -> Result<AuthenticatedUser, ApiError> {
    let user = self.extensions().get::<AuthenticatedUser>().cloned();

    if user.is_none() {
      tracing::warn!(
        "Authenticated user missing from request extensions for path {}",
        self.path()
      );
    }

    user.ok_or(ApiError::Unauthorized)
  }
}
