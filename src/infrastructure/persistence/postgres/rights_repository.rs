use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgConnection};
use uuid::Uuid;

use crate::domain::auth::errors::RepositoryError;
use crate::domain::company::{CompanyManager, RightsRepository};

#[derive(Debug, FromRow)]
struct CompanyManagerRow {
  user_id: Uuid,
  company_id: Uuid,
  created_at: DateTime<Utc>,
}

impl From<CompanyManagerRow> for CompanyManager {
  fn from(row: CompanyManagerRow) -> Self {
    CompanyManager {
      user_id: row.user_id,
      company_id: row.company_id,
      created_at: row.created_at,
    }
  }
}

/// PostgreSQL store for the company_managers table
#[derive(Debug, Default)]
pub struct PostgresRightsRepository;

impl PostgresRightsRepository {
  pub fn new() -> Self {
    Self
  }
}

#[async_trait]
impl RightsRepository<PgConnection> for PostgresRightsRepository {
  async fn grant_company_admin(
    &self,
    conn: &mut PgConnection,
    manager: CompanyManager,
  ) -> Result<CompanyManager, RepositoryError> {
    let row = sqlx::query_as::<_, CompanyManagerRow>(
      r#"
            INSERT INTO company_managers (user_id, company_id, created_at)
            VALUES ($1, $2, $3)
            RETURNING user_id, company_id, created_at
            "#,
    )
    .bind(manager.user_id)
    .bind(manager.company_id)
    .bind(manager.created_at)
    .fetch_one(&mut *conn)
    .await?;

    Ok(row.into())
  }
}
