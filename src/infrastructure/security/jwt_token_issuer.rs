use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use crate::domain::auth::entities::Credential;
use crate::domain::auth::errors::TokenError;
use crate::domain::auth::ports::{TokenClaims, TokenIssuer};

/// HS256 JWT issuer
pub struct JwtTokenIssuer {
  encoding_key: EncodingKey,
  decoding_key: DecodingKey,
  ttl_seconds: i64,
}

impl JwtTokenIssuer {
  pub fn new(secret: &str, ttl_seconds: i64) -> Self {
    Self {
      encoding_key: EncodingKey::from_secret(secret.as_bytes()),
      decoding_key: DecodingKey::from_secret(secret.as_bytes()),
      ttl_seconds,
    }
  }
}

#[async_trait]
impl TokenIssuer for JwtTokenIssuer {
  async fn issue(&self, user_id: Uuid, credentials: &[Credential]) -> Result<String, TokenError> {
    let now = Utc::now().timestamp();
    let claims = TokenClaims {
      sub: user_id,
      credentials: credentials.to_vec(),
      iat: now,
      exp: now + self.ttl_seconds,
    };

    encode(&Header::default(), &claims, &self.encoding_key)
      .map_err(|e| TokenError::IssueFailed(e.to_string()))
  }

  async fn verify(&self, token: &str) -> Result<TokenClaims, TokenError> {
    let data = decode::<TokenClaims>(token, &self.decoding_key, &Validation::default())?;
    Ok(data.claims)
  }
}
