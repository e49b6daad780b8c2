use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::domain::auth::entities::UserProfile;

/// Request for signing in
#[derive(Clone, Deserialize, Validate)]
pub struct SignInRequest {
  #[validate(email(message = "Invalid email format"))]
  pub email: String,

  #[validate(length(min = 1, max = 128, message = "Password is required"))]
  pub password: String,
}

/// Request for user registration
#[derive(Clone, Deserialize, Validate)]
pub struct SignUpRequest {
  #[validate(length(
    min = 1,
    max = 255,
    message = "First name must be between 1 and 255 characters"
  ))]
  pub first_name: String,

  #[validate(length(
    min = 1,
    max = 255,
    message = "Last name must be between 1 and 255 characters"
  ))]
  pub last_name: String,

  #[validate(email(message = "Invalid email format"))]
  pub email: String,

  #[validate(length(
    min = 8,
    max = 128,
    message = "Password must be between 8 and 128 characters"
  ))]
  pub password: String,
}

/// Request for creating a company
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCompanyRequest {
  #[validate(length(
    min = 1,
    max = 255,
    message = "Company name must be between 1 and 255 characters"
  ))]
  pub name: String,
}

/// Response of sign-in and sign-up: the user profile plus the session token
#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
  #[serde(flatten)]
  pub user: UserProfile,

  /// Session token; empty when it could not be issued
  pub token: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompanyResponse {
  pub id: Uuid,
  pub name: String,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// Standard error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
  /// Error type/code
  pub error: String,

  /// Human-readable error message
  pub message: String,
}
