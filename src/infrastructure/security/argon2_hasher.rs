use argon2::{
  Algorithm, Argon2, Params, Version,
  password_hash::{
    self, PasswordHash as PhcString, PasswordHasher as _, PasswordVerifier, SaltString,
  },
};
use async_trait::async_trait;
use zeroize::Zeroizing;

use crate::domain::auth::errors::HashError;
use crate::domain::auth::ports::PasswordHasher;
use crate::domain::auth::value_objects::{Password, PasswordHash};

/// Argon2id (m=19456 KiB, t=2, p=1), PHC string output.
///
/// Hashing runs on the blocking thread pool so request workers are not
/// stalled for the duration of a hash.
#[derive(Clone)]
pub struct Argon2PasswordHasher {
  argon2: Argon2<'static>,
}

impl Argon2PasswordHasher {
  const M_COST_KIB: u32 = 19_456;
  const T_COST: u32 = 2;
  const P_COST: u32 = 1;

  pub fn new() -> Result<Self, HashError> {
    let params = Params::new(Self::M_COST_KIB, Self::T_COST, Self::P_COST, None)
      .map_err(|e| HashError::HashingFailed(format!("argon2 params: {}", e)))?;

    Ok(Self {
      argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
    })
  }

  async fn run_blocking<T, F>(&self, job: F) -> Result<T, HashError>
  where
    T: Send + 'static,
    F: FnOnce(Argon2<'static>) -> Result<T, HashError> + Send + 'static,
  {
    let argon2 = self.argon2.clone();
    tokio::task::spawn_blocking(move || job(argon2))
      .await
      .map_err(|e| HashError::HashingFailed(format!("hashing task aborted: {}", e)))?
  }
}

#[async_trait]
impl PasswordHasher for Argon2PasswordHasher {
  async fn hash(&self, password: &Password) -> Result<PasswordHash, HashError> {
    let plain = Zeroizing::new(password.as_str().to_owned());

    let phc = self
      .run_blocking(move |argon2| {
        let salt = SaltString::generate(&mut rand::rngs::OsRng);
        argon2
          .hash_password(plain.as_bytes(), &salt)
          .map(|hash| hash.to_string())
          .map_err(|e| HashError::HashingFailed(e.to_string()))
      })
      .await?;

    PasswordHash::from_hash(phc).map_err(|_| HashError::InvalidFormat)
  }

  async fn verify(
    &self,
    password: &Password,
    hashed_password: &PasswordHash,
  ) -> Result<bool, HashError> {
    let plain = Zeroizing::new(password.as_str().to_owned());
    let stored = hashed_password.as_str().to_owned();

    self
      .run_blocking(move |argon2| {
        let parsed = PhcString::new(&stored).map_err(|_| HashError::InvalidFormat)?;
        match argon2.verify_password(plain.as_bytes(), &parsed) {
          Ok(()) => Ok(true),
          Err(password_hash::Error::Password) => Ok(false),
          Err(e) => Err(HashError::VerificationFailed(e.to_string())),
        }
      })
      .await
  }
}
