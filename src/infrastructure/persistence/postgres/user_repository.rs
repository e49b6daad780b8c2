use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgConnection;
use uuid::Uuid;

use crate::domain::auth::{
  entities::User, errors::RepositoryError, ports::UserRepository, value_objects::Email,
};

/// PostgreSQL implementation of the UserRepository trait
#[derive(Debug, Default)]
pub struct PostgresUserRepository;

impl PostgresUserRepository {
  /// Creates a new instance of PostgresUserRepository
  pub fn new() -> Self {
    Self
  }
}

/// Database row structure for users table
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
  id: Uuid,
  first_name: String,
  last_name: String,
  email: String,
  password_hash: String,
  image_url: Option<String>,
  email_is_validated: bool,
  vacation_time_start: Option<DateTime<Utc>>,
  vacation_time_end: Option<DateTime<Utc>>,
  company_id: Option<Uuid>,
  department_id: Option<Uuid>,
  created_at: DateTime<Utc>,
  updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
  fn from(row: UserRow) -> Self {
    User {
      id: row.id,
      first_name: row.first_name,
      last_name: row.last_name,
      email: row.email,
      password_hash: row.password_hash,
      image_url: row.image_url,
      email_is_validated: row.email_is_validated,
      vacation_time_start: row.vacation_time_start,
      vacation_time_end: row.vacation_time_end,
      company_id: row.company_id,
      department_id: row.department_id,
      created_at: row.created_at,
      updated_at: row.updated_at,
    }
  }
}

#[async_trait]
impl UserRepository<PgConnection> for PostgresUserRepository {
  async fn create(&self, conn: &mut PgConnection, user: User) -> Result<User, RepositoryError> {
    let result = sqlx::query_as::<_, UserRow>(
      r#"
            INSERT INTO users (
                id,
                first_name,
                last_name,
                email,
                password_hash,
                image_url,
                email_is_validated,
                vacation_time_start,
                vacation_time_end,
                company_id,
                department_id,
                created_at,
                updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING
                id,
                first_name,
                last_name,
                email,
                password_hash,
                image_url,
                email_is_validated,
                vacation_time_start,
                vacation_time_end,
                company_id,
                department_id,
                created_at,
                updated_at
            "#,
    )
    .bind(user.id)
    .bind(&user.first_name)
    .bind(&user.last_name)
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(&user.image_url)
    .bind(user.email_is_validated)
    .bind(user.vacation_time_start)
    .bind(user.vacation_time_end)
    .bind(user.company_id)
    .bind(user.department_id)
    .bind(user.created_at)
    .bind(user.updated_at)
    .fetch_one(&mut *conn)
    .await?;

    Ok(result.into())
  }

  async fn find_by_email(
    &self,
    conn: &mut PgConnection,
    email: &Email,
  ) -> Result<Option<User>, RepositoryError> {
    let result = sqlx::query_as::<_, UserRow>(
      r#"
            SELECT
                id,
                first_name,
                last_name,
                email,
                password_hash,
                image_url,
                email_is_validated,
                vacation_time_start,
                vacation_time_end,
                company_id,
                department_id,
                created_at,
                updated_at
            FROM users
            WHERE email = $1
            "#,
    )
    .bind(email.as_str())
    .fetch_optional(&mut *conn)
    .await?;

    Ok(result.map(User::from))
  }

  async fn update_company(
    &self,
    conn: &mut PgConnection,
    user_id: Uuid,
    company_id: Uuid,
    department_id: Uuid,
  ) -> Result<User, RepositoryError> {
    let result = sqlx::query_as::<_, UserRow>(
      r#"
            UPDATE users
            SET
                company_id = $2,
                department_id = $3,
                updated_at = NOW()
            WHERE id = $1
            RETURNING
                id,
                first_name,
                last_name,
                email,
                password_hash,
                image_url,
                email_is_validated,
                vacation_time_start,
                vacation_time_end,
                company_id,
                department_id,
                created_at,
                updated_at
            "#,
    )
    .bind(user_id)
    .bind(company_id)
    .bind(department_id)
    .fetch_optional(&mut *conn)
    .await?;

    result.map(User::from).ok_or(RepositoryError::NotFound)
  }
}
