use async_trait::async_trait;
use sqlx::{Connection, FromRow, PgConnection};
use uuid::Uuid;

use crate::domain::auth::{
  entities::Credential, errors::RepositoryError, ports::CredentialRepository,
};

#[derive(Debug, FromRow)]
struct CredentialRow {
  user_id: Uuid,
  company_id: Uuid,
}

/// Reads credentials from the rights records in company_managers
#[derive(Debug, Default)]
pub struct PostgresCredentialRepository;

impl PostgresCredentialRepository {
  pub fn new() -> Self {
    Self
  }
}

#[async_trait]
impl CredentialRepository<PgConnection> for PostgresCredentialRepository {
  async fn find_by_user(
    &self,
    conn: &mut PgConnection,
    user_id: Uuid,
  ) -> Result<Vec<Credential>, RepositoryError> {
    // Savepoint inside an open transaction: a failed read must not abort it
    let mut savepoint = conn.begin().await?;

    let fetched = sqlx::query_as::<_, CredentialRow>(
      r#"
            SELECT user_id, company_id
            FROM company_managers
            WHERE user_id = $1
            ORDER BY created_at ASC
            "#,
    )
    .bind(user_id)
    .fetch_all(&mut *savepoint)
    .await;

    let rows = match fetched {
      Ok(rows) => {
        savepoint.commit().await?;
        rows
      }
      Err(e) => {
        savepoint.rollback().await?;
        return Err(e.into());
      }
    };

    Ok(
      rows
        .into_iter()
        .map(|row| Credential::company_admin(row.user_id, row.company_id))
        .collect(),
    )
  }
}
