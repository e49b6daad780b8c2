use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgConnection};
use uuid::Uuid;

use crate::domain::auth::errors::RepositoryError;
use crate::domain::company::{Department, DepartmentRepository};

#[derive(Debug, FromRow)]
struct DepartmentRow {
  id: Uuid,
  company_id: Uuid,
  name: String,
  created_at: DateTime<Utc>,
  updated_at: DateTime<Utc>,
}

impl From<DepartmentRow> for Department {
  fn from(row: DepartmentRow) -> Self {
    Department {
      id: row.id,
      company_id: row.company_id,
      name: row.name,
      created_at: row.created_at,
      updated_at: row.updated_at,
    }
  }
}

#[derive(Debug, Default)]
pub struct PostgresDepartmentRepository;

impl PostgresDepartmentRepository {
  pub fn new() -> Self {
    Self
  }
}

#[async_trait]
impl DepartmentRepository<PgConnection> for PostgresDepartmentRepository {
  async fn create(
    &self,
    conn: &mut PgConnection,
    department: Department,
  ) -> Result<Department, RepositoryError> {
    let row = sqlx::query_as::<_, DepartmentRow>(
      r#"
            INSERT INTO departments (id, company_id, name, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, company_id, name, created_at, updated_at
            "#,
    )
    .bind(department.id)
    .bind(department.company_id)
    .bind(&department.name)
    .bind(department.created_at)
    .bind(department.updated_at)
    .fetch_one(&mut *conn)
    .await?;

    Ok(row.into())
  }
}
