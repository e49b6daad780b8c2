use std::sync::Arc;

use crate::domain::auth::entities::SignInResponse;
use crate::domain::auth::errors::AuthError;
use crate::domain::auth::services::AuthService;
use crate::domain::auth::value_objects::{Email, Password};
use crate::domain::context::RequestContext;
use crate::domain::transaction::TransactionManager;

/// Command for signing a user in
#[derive(Clone)]
pub struct SignInUserCommand {
  pub email: String,
  /// Plain text password
  pub password: String,
}

/// Use case for signing a user in
pub struct SignInUserUseCase<M: TransactionManager> {
  auth_service: Arc<AuthService<M>>,
}

impl<M: TransactionManager> SignInUserUseCase<M> {
  pub fn new(auth_service: Arc<AuthService<M>>) -> Self {
    Self { auth_service }
  }

  /// Executes the sign-in use case
  ///
  /// # Errors
  /// Returns `AuthError` if the email is malformed, the user does not exist
  /// or the password does not match
  pub async fn execute(
    &self,
    ctx: &RequestContext,
    command: SignInUserCommand,
  ) -> Result<SignInResponse, AuthError> {
    let email = Email::new(command.email)?;
    // Policy checks only apply when choosing a password
    let password = Password::for_verification(command.password)?;

    self.auth_service.sign_in(ctx, email, password).await
  }
}
