use argon2::PasswordHash as Argon2PasswordHash;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use validator::ValidateEmail;
use zeroize::Zeroizing;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ValueObjectError {
  #[error("Invalid email format: {0}")]
  InvalidEmail(String),

  #[error("Password is required")]
  PasswordMissing,

  #[error("Password is too short (minimum 8 characters)")]
  PasswordTooShort,

  #[error("Password is too long (maximum 128 characters)")]
  PasswordTooLong,

  #[error("Password must contain at least one digit")]
  PasswordMissingDigit,

  #[error("Password must contain at least one uppercase letter")]
  PasswordMissingUppercase,

  #[error("Password must contain at least one lowercase letter")]
  PasswordMissingLowercase,

  #[error("Invalid password hash format")]
  InvalidPasswordHash,

  #[error("Name must be between 1 and {max} characters")]
  InvalidName { max: usize },
}

// ============================================================================
// Email Value Object
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Email(String);

impl Email {
  /// Creates a new Email after validation
  pub fn new(email: impl Into<String>) -> Result<Self, ValueObjectError> {
    let email = email.into();

    if !email.validate_email() {
      return Err(ValueObjectError::InvalidEmail(email));
    }

    // Normalize to lowercase
    Ok(Self(email.to_lowercase()))
  }

  /// Returns the email as a string slice
  pub fn as_str(&self) -> &str {
    &self.0
  }

  /// Consumes self and returns the inner String
  pub fn into_inner(self) -> String {
    self.0
  }
}

impl fmt::Display for Email {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

// ============================================================================
// PersonName Value Object
// ============================================================================

/// First or last name of a user, trimmed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonName(String);

impl PersonName {
  const MAX_LENGTH: usize = 255;

  pub fn new(name: impl Into<String>) -> Result<Self, ValueObjectError> {
    let name = name.into().trim().to_string();

    if name.is_empty() || name.chars().count() > Self::MAX_LENGTH {
      return Err(ValueObjectError::InvalidName {
        max: Self::MAX_LENGTH,
      });
    }

    Ok(Self(name))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  pub fn into_inner(self) -> String {
    self.0
  }
}

// ============================================================================
// Password Value Object (Plain Password - Never Stored)
// ============================================================================

/// Plain text password. The buffer is wiped when dropped.
#[derive(Clone)]
pub struct Password(Zeroizing<String>);

impl Password {
  const MIN_LENGTH: usize = 8;
  const MAX_LENGTH: usize = 128;

  /// Creates a new Password enforcing the sign-up policy:
  /// 8..=128 characters with at least one digit, one uppercase and one
  /// lowercase letter
  pub fn new(password: impl Into<String>) -> Result<Self, ValueObjectError> {
    let password = Zeroizing::new(password.into());

    if password.len() < Self::MIN_LENGTH {
      return Err(ValueObjectError::PasswordTooShort);
    }

    if password.len() > Self::MAX_LENGTH {
      return Err(ValueObjectError::PasswordTooLong);
    }

    if !password.chars().any(|c| c.is_ascii_digit()) {
      return Err(ValueObjectError::PasswordMissingDigit);
    }

    if !password.chars().any(char::is_uppercase) {
      return Err(ValueObjectError::PasswordMissingUppercase);
    }

    if !password.chars().any(char::is_lowercase) {
      return Err(ValueObjectError::PasswordMissingLowercase);
    }

    Ok(Self(password))
  }

  /// Wraps a password supplied for verification only.
  ///
  /// The policy is not applied so accounts created under an older policy can
  /// still sign in.
  pub fn for_verification(password: impl Into<String>) -> Result<Self, ValueObjectError> {
    let password = Zeroizing::new(password.into());

    if password.is_empty() {
      return Err(ValueObjectError::PasswordMissing);
    }

    if password.len() > Self::MAX_LENGTH {
      return Err(ValueObjectError::PasswordTooLong);
    }

    Ok(Self(password))
  }

  /// Returns the password as a string slice (use with caution)
  pub fn as_str(&self) -> &str {
    self.0.as_str()
  }
}

// Implement Debug without exposing the password
impl fmt::Debug for Password {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("Password(***)")
  }
}

// ============================================================================
// PasswordHash Value Object (Argon2id Hash)
// ============================================================================

#[derive(Clone, Serialize, Deserialize)]
pub struct PasswordHash(String);

impl PasswordHash {
  /// Creates a new PasswordHash from an existing hash string
  pub fn from_hash(hash: impl Into<String>) -> Result<Self, ValueObjectError> {
    let hash = hash.into();

    // Validate it's a proper PHC hash string
    Argon2PasswordHash::new(&hash).map_err(|_| ValueObjectError::InvalidPasswordHash)?;

    Ok(Self(hash))
  }

  /// Returns the hash as a string slice
  pub fn as_str(&self) -> &str {
    &self.0
  }

  /// Consumes self and returns the inner String
  pub fn into_inner(self) -> String {
    self.0
  }
}

// The hash is never written to logs or error messages
impl fmt::Debug for PasswordHash {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("PasswordHash(***)")
  }
}
