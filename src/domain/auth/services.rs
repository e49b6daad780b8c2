use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

use super::entities::{NewUser, SignInResponse, User};
use super::errors::{AuthError, HashError, RepositoryError};
use super::ports::{CredentialRepository, PasswordHasher, TokenIssuer, UserRepository};
use super::value_objects::{Email, Password, PasswordHash};
use crate::domain::context::RequestContext;
use crate::domain::transaction::{TransactionManager, UnitOfWork};

/// Authentication service: sign-in and sign-up orchestration
pub struct AuthService<M: TransactionManager> {
  tx_manager: Arc<M>,
  user_repo: Arc<dyn UserRepository<M::Connection>>,
  credential_repo: Arc<dyn CredentialRepository<M::Connection>>,
  password_hasher: Arc<dyn PasswordHasher>,
  token_issuer: Arc<dyn TokenIssuer>,
}

impl<M: TransactionManager> AuthService<M> {
  /// Creates a new instance of AuthService
  pub fn new(
    tx_manager: Arc<M>,
    user_repo: Arc<dyn UserRepository<M::Connection>>,
    credential_repo: Arc<dyn CredentialRepository<M::Connection>>,
    password_hasher: Arc<dyn PasswordHasher>,
    token_issuer: Arc<dyn TokenIssuer>,
  ) -> Self {
    Self {
      tx_manager,
      user_repo,
      credential_repo,
      password_hasher,
      token_issuer,
    }
  }

  /// Authenticates a user and issues a session token
  ///
  /// # Errors
  /// - `AuthError::UserNotFound` if no user has this email
  /// - `AuthError::InvalidCredentials` if the password does not match
  ///
  /// A failure to issue the token is logged and yields an empty token.
  pub async fn sign_in(
    &self,
    ctx: &RequestContext,
    email: Email,
    password: Password,
  ) -> Result<SignInResponse, AuthError> {
    async move {
      // The connection goes back to the pool before the password check
      let user = {
        let mut conn = self.tx_manager.acquire().await?;
        self
          .user_repo
          .find_by_email(&mut *conn, &email)
          .await
          .map_err(|e| {
            tracing::error!(email = %email, error = %e, "Failed to load user");
            e
          })?
      }
      .ok_or_else(|| {
        tracing::warn!(email = %email, "Sign-in for unknown email");
        AuthError::UserNotFound
      })?;

      let stored_hash = PasswordHash::from_hash(user.password_hash.as_str()).map_err(|_| {
        tracing::error!(user_id = %user.id, "Stored password hash is malformed");
        AuthError::Hash(HashError::InvalidFormat)
      })?;

      if !self.password_hasher.verify(&password, &stored_hash).await? {
        tracing::warn!(user_id = %user.id, "Invalid password");
        return Err(AuthError::InvalidCredentials);
      }

      let token = match self.tx_manager.acquire().await {
        Ok(mut conn) => self.token_or_empty(&mut *conn, user.id).await,
        Err(e) => {
          tracing::error!(user_id = %user.id, error = %e, "Failed to generate token");
          String::new()
        }
      };

      tracing::info!(user_id = %user.id, "User signed in");
      Ok(SignInResponse {
        user: user.profile(),
        token,
      })
    }
    .instrument(ctx.span("sign_in"))
    .await
  }

  /// Registers a new user and issues a session token
  ///
  /// The user row is written inside a transaction that is rolled back on
  /// every failure before the commit.
  ///
  /// # Errors
  /// - `AuthError::Hash` if the password cannot be hashed
  /// - `AuthError::UserAlreadyExists` if the email is taken
  /// - `AuthError::Repository` for transaction and storage failures
  pub async fn sign_up(
    &self,
    ctx: &RequestContext,
    profile: NewUser,
    password: Password,
  ) -> Result<SignInResponse, AuthError> {
    async move {
      let password_hash = self.password_hasher.hash(&password).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to hash password");
        e
      })?;

      let mut uow = UnitOfWork::begin(self.tx_manager.as_ref())
        .await
        .map_err(|e| {
          tracing::error!(error = %e, "Failed to begin transaction");
          e
        })?;

      let email = profile.email.clone();
      let user = User::new(profile, password_hash.into_inner());
      let created = match self.user_repo.create(uow.connection()?, user).await {
        Ok(user) => user,
        Err(RepositoryError::DuplicateKey(_)) => {
          tracing::warn!(email = %email, "Sign-up with an email that is already registered");
          return Err(AuthError::UserAlreadyExists);
        }
        Err(e) => {
          tracing::error!(email = %email, error = %e, "Failed to insert user");
          return Err(e.into());
        }
      };

      let token = self.token_or_empty(uow.connection()?, created.id).await;
      let response = SignInResponse {
        user: created.profile(),
        token,
      };

      uow.commit().await.map_err(|e| {
        tracing::error!(user_id = %created.id, error = %e, "Failed to commit sign-up");
        e
      })?;

      tracing::info!(user_id = %created.id, "User signed up");
      Ok(response)
    }
    .instrument(ctx.span("sign_up"))
    .await
  }

  /// Issues a token, falling back to an empty token when issuing fails
  async fn token_or_empty(&self, conn: &mut M::Connection, user_id: Uuid) -> String {
    match self.generate_token_for_user(conn, user_id).await {
      Ok(token) => token,
      Err(e) => {
        tracing::error!(user_id = %user_id, error = %e, "Failed to generate token");
        String::new()
      }
    }
  }

  async fn generate_token_for_user(
    &self,
    conn: &mut M::Connection,
    user_id: Uuid,
  ) -> Result<String, AuthError> {
    let credentials = self.credential_repo.find_by_user(conn, user_id).await?;
    let token = self.token_issuer.issue(user_id, &credentials).await?;
    Ok(token)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use async_trait::async_trait;

  use crate::domain::auth::entities::{Credential, CredentialRole};
  use crate::domain::auth::errors::TokenError;
  use crate::domain::auth::ports::TokenClaims;
  use crate::domain::auth::value_objects::PersonName;
  use crate::infrastructure::persistence::memory::test_support::{FailOn, FailingTransactions};
  use crate::infrastructure::persistence::memory::{
    MemoryConnection, MemoryCredentialRepository, MemoryDatabase, MemoryUserRepository,
  };
  use crate::infrastructure::security::{Argon2PasswordHasher, JwtTokenIssuer};
  use std::time::Duration;

  const SECRET: &str = "test-secret";

  struct FailingTokenIssuer;

  #[async_trait]
  impl TokenIssuer for FailingTokenIssuer {
    async fn issue(&self, _user_id: Uuid, _credentials: &[Credential]) -> Result<String, TokenError> {
      Err(TokenError::IssueFailed("signing key unavailable".to_string()))
    }

    async fn verify(&self, _token: &str) -> Result<TokenClaims, TokenError> {
      Err(TokenError::Invalid("unsupported".to_string()))
    }
  }

  struct FailingUserRepository;

  #[async_trait]
  impl UserRepository<MemoryConnection> for FailingUserRepository {
    async fn create(
      &self,
      _conn: &mut MemoryConnection,
      _user: User,
    ) -> Result<User, RepositoryError> {
      Err(RepositoryError::DatabaseError("disk full".to_string()))
    }

    async fn find_by_email(
      &self,
      _conn: &mut MemoryConnection,
      _email: &Email,
    ) -> Result<Option<User>, RepositoryError> {
      Err(RepositoryError::ConnectionFailed("Pool timed out".to_string()))
    }

    async fn update_company(
      &self,
      _conn: &mut MemoryConnection,
      _user_id: Uuid,
      _company_id: Uuid,
      _department_id: Uuid,
    ) -> Result<User, RepositoryError> {
      Err(RepositoryError::NotFound)
    }
  }

  fn service_with(
    db: &Arc<MemoryDatabase>,
    user_repo: Arc<dyn UserRepository<MemoryConnection>>,
    token_issuer: Arc<dyn TokenIssuer>,
  ) -> AuthService<MemoryDatabase> {
    AuthService::new(
      db.clone(),
      user_repo,
      Arc::new(MemoryCredentialRepository::new()),
      Arc::new(Argon2PasswordHasher::new().unwrap()),
      token_issuer,
    )
  }

  fn service(db: &Arc<MemoryDatabase>) -> AuthService<MemoryDatabase> {
    service_with(
      db,
      Arc::new(MemoryUserRepository::new()),
      Arc::new(JwtTokenIssuer::new(SECRET, 3600)),
    )
  }

  fn profile(email: &str) -> NewUser {
    NewUser {
      first_name: PersonName::new("A").unwrap(),
      last_name: PersonName::new("B").unwrap(),
      email: Email::new(email).unwrap(),
    }
  }

  fn password() -> Password {
    Password::new("Secret123").unwrap()
  }

  #[tokio::test]
  async fn test_sign_up_returns_profile_and_token() {
    let db = Arc::new(MemoryDatabase::new());
    let auth = service(&db);
    let ctx = RequestContext::detached();

    let response = auth
      .sign_up(&ctx, profile("a@b.com"), password())
      .await
      .unwrap();

    assert_eq!(response.user.email, "a@b.com");
    assert_eq!(response.user.first_name, "A");
    assert!(!response.token.is_empty());

    let claims = JwtTokenIssuer::new(SECRET, 3600)
      .verify(&response.token)
      .await
      .unwrap();
    assert_eq!(claims.sub, response.user.id);
  }

  #[tokio::test]
  async fn test_sign_up_stores_verifiable_hash() {
    let db = Arc::new(MemoryDatabase::new());
    let auth = service(&db);
    let ctx = RequestContext::detached();

    auth
      .sign_up(&ctx, profile("hash@example.com"), password())
      .await
      .unwrap();

    let users = db.snapshot().await.users;
    assert_eq!(users.len(), 1);
    let stored = &users[0].password_hash;
    assert_ne!(stored, "Secret123");
    assert!(stored.starts_with("$argon2id$"));

    let hasher = Argon2PasswordHasher::new().unwrap();
    let hash = PasswordHash::from_hash(stored.as_str()).unwrap();
    assert!(hasher.verify(&password(), &hash).await.unwrap());
  }

  #[tokio::test]
  async fn test_sign_up_duplicate_email_fails_without_write() {
    let db = Arc::new(MemoryDatabase::new());
    let auth = service(&db);
    let ctx = RequestContext::detached();

    auth
      .sign_up(&ctx, profile("a@b.com"), password())
      .await
      .unwrap();

    let result = auth.sign_up(&ctx, profile("a@b.com"), password()).await;

    assert!(matches!(result, Err(AuthError::UserAlreadyExists)));
    assert_eq!(db.snapshot().await.users.len(), 1);
  }

  #[tokio::test]
  async fn test_sign_up_storage_failure_propagates() {
    let db = Arc::new(MemoryDatabase::new());
    let auth = service_with(
      &db,
      Arc::new(FailingUserRepository),
      Arc::new(JwtTokenIssuer::new(SECRET, 3600)),
    );
    let ctx = RequestContext::detached();

    let result = auth.sign_up(&ctx, profile("a@b.com"), password()).await;

    assert!(matches!(
      result,
      Err(AuthError::Repository(RepositoryError::DatabaseError(_)))
    ));
    assert!(db.snapshot().await.users.is_empty());
  }

  #[tokio::test]
  async fn test_sign_up_with_failing_token_issuer_returns_empty_token() {
    let db = Arc::new(MemoryDatabase::new());
    let auth = service_with(
      &db,
      Arc::new(MemoryUserRepository::new()),
      Arc::new(FailingTokenIssuer),
    );
    let ctx = RequestContext::detached();

    let response = auth
      .sign_up(&ctx, profile("a@b.com"), password())
      .await
      .unwrap();

    assert!(response.token.is_empty());
    // The user is still committed
    assert_eq!(db.snapshot().await.users.len(), 1);
  }

  #[tokio::test]
  async fn test_sign_in_with_valid_credentials() {
    let db = Arc::new(MemoryDatabase::new());
    let auth = service(&db);
    let ctx = RequestContext::detached();

    let signed_up = auth
      .sign_up(&ctx, profile("a@b.com"), password())
      .await
      .unwrap();

    let response = auth
      .sign_in(&ctx, Email::new("A@B.com").unwrap(), password())
      .await
      .unwrap();

    assert_eq!(response.user, signed_up.user);
    assert!(!response.token.is_empty());
  }

  #[tokio::test]
  async fn test_sign_in_unknown_email() {
    let db = Arc::new(MemoryDatabase::new());
    let auth = service(&db);
    let ctx = RequestContext::detached();

    let result = auth
      .sign_in(&ctx, Email::new("nobody@example.com").unwrap(), password())
      .await;

    assert!(matches!(result, Err(AuthError::UserNotFound)));
  }

  #[tokio::test]
  async fn test_sign_in_wrong_password_does_not_leak_hash() {
    let db = Arc::new(MemoryDatabase::new());
    let auth = service(&db);
    let ctx = RequestContext::detached();

    auth
      .sign_up(&ctx, profile("a@b.com"), password())
      .await
      .unwrap();
    let stored = db.snapshot().await.users[0].password_hash.clone();

    let error = auth
      .sign_in(
        &ctx,
        Email::new("a@b.com").unwrap(),
        Password::for_verification("Wrong1234").unwrap(),
      )
      .await
      .unwrap_err();

    assert!(matches!(error, AuthError::InvalidCredentials));
    assert!(!error.to_string().contains(&stored));
    assert!(!format!("{:?}", error).contains(&stored));
  }

  #[tokio::test]
  async fn test_sign_in_store_failure_propagates() {
    let db = Arc::new(MemoryDatabase::new());
    let auth = service_with(
      &db,
      Arc::new(FailingUserRepository),
      Arc::new(JwtTokenIssuer::new(SECRET, 3600)),
    );
    let ctx = RequestContext::detached();

    let result = auth
      .sign_in(&ctx, Email::new("a@b.com").unwrap(), password())
      .await;

    assert!(matches!(
      result,
      Err(AuthError::Repository(RepositoryError::ConnectionFailed(_)))
    ));
  }

  #[tokio::test]
  async fn test_sign_in_with_failing_token_issuer_returns_empty_token() {
    let db = Arc::new(MemoryDatabase::new());
    let ctx = RequestContext::detached();
    service(&db)
      .sign_up(&ctx, profile("a@b.com"), password())
      .await
      .unwrap();

    let auth = service_with(
      &db,
      Arc::new(MemoryUserRepository::new()),
      Arc::new(FailingTokenIssuer),
    );
    let response = auth
      .sign_in(&ctx, Email::new("a@b.com").unwrap(), password())
      .await
      .unwrap();

    assert_eq!(response.user.email, "a@b.com");
    assert!(response.token.is_empty());
  }

  #[tokio::test]
  async fn test_sign_in_token_carries_credentials() {
    let db = Arc::new(MemoryDatabase::new());
    let auth = service(&db);
    let ctx = RequestContext::detached();

    let signed_up = auth
      .sign_up(&ctx, profile("a@b.com"), password())
      .await
      .unwrap();
    let company_id = Uuid::new_v4();
    db.seed_company_manager(signed_up.user.id, company_id).await;

    let response = auth
      .sign_in(&ctx, Email::new("a@b.com").unwrap(), password())
      .await
      .unwrap();
    let claims = JwtTokenIssuer::new(SECRET, 3600)
      .verify(&response.token)
      .await
      .unwrap();

    assert_eq!(claims.credentials.len(), 1);
    assert_eq!(claims.credentials[0].role, CredentialRole::CompanyAdmin);
    assert_eq!(claims.credentials[0].company_id, company_id);
  }

  /// Hasher that needs the storage backend while it verifies a password
  struct BackendCheckingHasher {
    inner: Argon2PasswordHasher,
    db: Arc<MemoryDatabase>,
  }

  #[async_trait]
  impl PasswordHasher for BackendCheckingHasher {
    async fn hash(&self, password: &Password) -> Result<PasswordHash, HashError> {
      self.inner.hash(password).await
    }

    async fn verify(
      &self,
      password: &Password,
      hashed_password: &PasswordHash,
    ) -> Result<bool, HashError> {
      let conn = tokio::time::timeout(Duration::from_millis(500), self.db.acquire())
        .await
        .map_err(|_| HashError::VerificationFailed("storage busy during verify".to_string()))?
        .map_err(|e| HashError::VerificationFailed(e.to_string()))?;
      drop(conn);
      self.inner.verify(password, hashed_password).await
    }
  }

  #[tokio::test]
  async fn test_sign_in_releases_connection_before_password_check() {
    let db = Arc::new(MemoryDatabase::new());
    let ctx = RequestContext::detached();
    service(&db)
      .sign_up(&ctx, profile("a@b.com"), password())
      .await
      .unwrap();

    let auth = AuthService::new(
      db.clone(),
      Arc::new(MemoryUserRepository::new()),
      Arc::new(MemoryCredentialRepository::new()),
      Arc::new(BackendCheckingHasher {
        inner: Argon2PasswordHasher::new().unwrap(),
        db: db.clone(),
      }),
      Arc::new(JwtTokenIssuer::new(SECRET, 3600)),
    );

    let response = auth
      .sign_in(&ctx, Email::new("a@b.com").unwrap(), password())
      .await
      .unwrap();

    assert!(!response.token.is_empty());
  }

  fn service_on(transactions: FailingTransactions) -> AuthService<FailingTransactions> {
    AuthService::new(
      Arc::new(transactions),
      Arc::new(MemoryUserRepository::new()),
      Arc::new(MemoryCredentialRepository::new()),
      Arc::new(Argon2PasswordHasher::new().unwrap()),
      Arc::new(JwtTokenIssuer::new(SECRET, 3600)),
    )
  }

  #[tokio::test]
  async fn test_sign_up_fails_when_transaction_cannot_begin_or_commit() {
    for fail_on in [FailOn::Begin, FailOn::Commit] {
      let db = MemoryDatabase::new();
      let auth = service_on(FailingTransactions::new(db.clone(), fail_on));
      let ctx = RequestContext::detached();

      let result = auth.sign_up(&ctx, profile("a@b.com"), password()).await;

      assert!(
        matches!(
          result,
          Err(AuthError::Repository(RepositoryError::TransactionFailed(_)))
        ),
        "{:?}",
        fail_on
      );
      assert!(db.snapshot().await.users.is_empty());
    }
  }
}
