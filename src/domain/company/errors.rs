use thiserror::Error;

use crate::domain::auth::errors::RepositoryError;

#[derive(Debug, Error)]
pub enum CompanyError {
  #[error("User not found")]
  UserNotFound,

  #[error("Repository error: {0}")]
  Repository(#[from] RepositoryError),

  #[error("Validation error: {0}")]
  Validation(#[from] ValidationError),
}

#[derive(Debug, Error)]
pub enum ValidationError {
  #[error("Company name must be at least {min} characters")]
  CompanyNameTooShort { min: usize },

  #[error("Company name must be at most {max} characters")]
  CompanyNameTooLong { max: usize },
}
