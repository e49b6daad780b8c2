use std::sync::Arc;

use crate::domain::auth::entities::{NewUser, SignInResponse};
use crate::domain::auth::errors::AuthError;
use crate::domain::auth::services::AuthService;
use crate::domain::auth::value_objects::{Email, Password, PersonName};
use crate::domain::context::RequestContext;
use crate::domain::transaction::TransactionManager;

/// Command for registering a new user
#[derive(Clone)]
pub struct SignUpUserCommand {
  pub first_name: String,
  pub last_name: String,
  pub email: String,
  /// Plain text password, hashed before it is stored
  pub password: String,
}

/// Use case for registering a new user
pub struct SignUpUserUseCase<M: TransactionManager> {
  auth_service: Arc<AuthService<M>>,
}

impl<M: TransactionManager> SignUpUserUseCase<M> {
  pub fn new(auth_service: Arc<AuthService<M>>) -> Self {
    Self { auth_service }
  }

  /// Executes the sign-up use case
  ///
  /// # Errors
  /// Returns `AuthError` if validation fails or the email is already registered
  pub async fn execute(
    &self,
    ctx: &RequestContext,
    command: SignUpUserCommand,
  ) -> Result<SignInResponse, AuthError> {
    let profile = NewUser {
      first_name: PersonName::new(command.first_name)?,
      last_name: PersonName::new(command.last_name)?,
      email: Email::new(command.email)?,
    };
    let password = Password::new(command.password)?;

    self.auth_service.sign_up(ctx, profile, password).await
  }
}
