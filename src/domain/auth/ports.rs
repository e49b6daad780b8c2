use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::entities::{Credential, User};
use super::errors::{HashError, RepositoryError, TokenError};
use super::value_objects::{Email, Password, PasswordHash};

/// Repository trait for user persistence operations
///
/// `C` is the connection type of the storage backend.
#[async_trait]
pub trait UserRepository<C: Send>: Send + Sync {
  /// Inserts a new user. A taken email is reported as
  /// `RepositoryError::DuplicateKey`.
  async fn create(&self, conn: &mut C, user: User) -> Result<User, RepositoryError>;

  /// Finds a user by their email address
  async fn find_by_email(&self, conn: &mut C, email: &Email)
  -> Result<Option<User>, RepositoryError>;

  /// Points the user at a company and department.
  /// Returns `RepositoryError::NotFound` when the user does not exist.
  async fn update_company(
    &self,
    conn: &mut C,
    user_id: Uuid,
    company_id: Uuid,
    department_id: Uuid,
  ) -> Result<User, RepositoryError>;
}

/// Read access to the permission records of a user
#[async_trait]
pub trait CredentialRepository<C: Send>: Send + Sync {
  async fn find_by_user(&self, conn: &mut C, user_id: Uuid)
  -> Result<Vec<Credential>, RepositoryError>;
}

/// Service trait for password hashing operations
#[async_trait]
pub trait PasswordHasher: Send + Sync {
  /// Hashes a plain text password
  async fn hash(&self, password: &Password) -> Result<PasswordHash, HashError>;

  /// Verifies a plain text password against a hashed password.
  /// A mismatch is `Ok(false)`; errors mean the hash could not be checked.
  async fn verify(
    &self,
    password: &Password,
    hashed_password: &PasswordHash,
  ) -> Result<bool, HashError>;
}

/// Claims embedded into a session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
  /// Subject (user id)
  pub sub: Uuid,
  pub credentials: Vec<Credential>,
  /// Issued at (Unix timestamp)
  pub iat: i64,
  /// Expiry (Unix timestamp)
  pub exp: i64,
}

impl TokenClaims {
  pub fn expires_at(&self) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(self.exp, 0)
  }
}

/// Issues and checks session tokens
#[async_trait]
pub trait TokenIssuer: Send + Sync {
  /// Produces a signed token for a user and their credentials
  async fn issue(&self, user_id: Uuid, credentials: &[Credential]) -> Result<String, TokenError>;

  /// Checks signature and expiry and returns the embedded claims
  async fn verify(&self, token: &str) -> Result<TokenClaims, TokenError>;
}
