use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use thiserror::Error;

use crate::domain::auth::errors::AuthError;
use crate::domain::company::CompanyError;

use super::dtos::ErrorResponse;

/// Failure of an API request, rendered as `{error, message}` JSON
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("{0}")]
  Validation(String),

  #[error("Invalid email or password")]
  InvalidCredentials,

  #[error("Invalid or missing authorization token")]
  Unauthorized,

  #[error("User not found")]
  UserNotFound,

  #[error("An account with this email already exists")]
  EmailTaken,

  /// Details are logged, never returned
  #[error("An internal server error occurred")]
  Internal(String),
}

impl ApiError {
  /// Machine-readable code placed in the `error` field
  pub fn code(&self) -> &'static str {
    match self {
      ApiError::Validation(_) => "validation_error",
      ApiError::InvalidCredentials => "invalid_credentials",
      ApiError::Unauthorized => "invalid_token",
      ApiError::UserNotFound => "user_not_found",
      ApiError::EmailTaken => "email_already_exists",
      ApiError::Internal(_) => "internal_error",
    }
  }
}

impl ResponseError for ApiError {
  fn status_code(&self) -> StatusCode {
    match self {
      ApiError::Validation(_) => StatusCode::BAD_REQUEST,
      ApiError::InvalidCredentials | ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
      ApiError::UserNotFound => StatusCode::NOT_FOUND,
      ApiError::EmailTaken => StatusCode::CONFLICT,
      ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    if let ApiError::Internal(details) = self {
      tracing::error!(details = %details, "Request failed with internal error");
    }

    HttpResponse::build(self.status_code()).json(ErrorResponse {
      error: self.code().to_string(),
      message: self.to_string(),
    })
  }
}

impl From<AuthError> for ApiError {
  fn from(error: AuthError) -> Self {
    match error {
      AuthError::InvalidCredentials => ApiError::InvalidCredentials,
      AuthError::UserNotFound => ApiError::UserNotFound,
      AuthError::UserAlreadyExists => ApiError::EmailTaken,
      AuthError::ValueObject(e) => ApiError::Validation(e.to_string()),
      AuthError::Token(_) => ApiError::Unauthorized,
      // Email conflicts already arrive as UserAlreadyExists
      AuthError::Repository(e) => ApiError::Internal(e.to_string()),
      AuthError::Hash(e) => ApiError::Internal(e.to_string()),
    }
  }
}

impl From<CompanyError> for ApiError {
  fn from(error: CompanyError) -> Self {
    match error {
      CompanyError::UserNotFound => ApiError::UserNotFound,
      CompanyError::Validation(e) => ApiError::Validation(e.to_string()),
      CompanyError::Repository(e) => ApiError::Internal(e.to_string()),
    }
  }
}

/// Joins field messages in a stable order
impl From<validator::ValidationErrors> for ApiError {
  fn from(errors: validator::ValidationErrors) -> Self {
    let mut messages: Vec<String> = errors
      .field_errors()
      .into_iter()
      .flat_map(|(field, errors)| {
        errors.iter().map(move |error| match &error.message {
          Some(message) => message.to_string(),
          None => format!("Invalid field: {}", field),
        })
      })
      .collect();
    messages.sort();

    ApiError::Validation(messages.join(", "))
  }
}
