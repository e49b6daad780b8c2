use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgConnection};
use uuid::Uuid;

use crate::domain::auth::errors::RepositoryError;
use crate::domain::company::{Company, CompanyRepository};

#[derive(Debug, FromRow)]
struct CompanyRow {
  id: Uuid,
  name: String,
  created_at: DateTime<Utc>,
  updated_at: DateTime<Utc>,
}

impl From<CompanyRow> for Company {
  fn from(row: CompanyRow) -> Self {
    Company {
      id: row.id,
      name: row.name,
      created_at: row.created_at,
      updated_at: row.updated_at,
    }
  }
}

#[derive(Debug, Default)]
pub struct PostgresCompanyRepository;

impl PostgresCompanyRepository {
  pub fn new() -> Self {
    Self
  }
}

#[async_trait]
impl CompanyRepository<PgConnection> for PostgresCompanyRepository {
  async fn create(
    &self,
    conn: &mut PgConnection,
    company: Company,
  ) -> Result<Company, RepositoryError> {
    let row = sqlx::query_as::<_, CompanyRow>(
      r#"
            INSERT INTO companies (id, name, created_at, updated_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, created_at, updated_at
            "#,
    )
    .bind(company.id)
    .bind(&company.name)
    .bind(company.created_at)
    .bind(company.updated_at)
    .fetch_one(&mut *conn)
    .await?;

    Ok(row.into())
  }
}
