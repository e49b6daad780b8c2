use async_trait::async_trait;
use sqlx::{PgConnection, PgPool, Postgres, pool::PoolConnection};

use crate::domain::auth::errors::RepositoryError;
use crate::domain::transaction::TransactionManager;

/// PostgreSQL transaction manager backed by the sqlx pool.
///
/// A `sqlx::Transaction` that is dropped without commit issues a rollback
/// when its connection returns to the pool.
#[derive(Clone)]
pub struct PostgresTransactionManager {
  pool: PgPool,
}

impl PostgresTransactionManager {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl TransactionManager for PostgresTransactionManager {
  type Connection = PgConnection;
  type Transaction = sqlx::Transaction<'static, Postgres>;
  type Pooled = PoolConnection<Postgres>;

  async fn acquire(&self) -> Result<Self::Pooled, RepositoryError> {
    Ok(self.pool.acquire().await?)
  }

  async fn begin(&self) -> Result<Self::Transaction, RepositoryError> {
    self
      .pool
      .begin()
      .await
      .map_err(|e| RepositoryError::TransactionFailed(format!("begin: {}", e)))
  }

  async fn commit(&self, tx: Self::Transaction) -> Result<(), RepositoryError> {
    tx.commit()
      .await
      .map_err(|e| RepositoryError::TransactionFailed(format!("commit: {}", e)))
  }

  async fn rollback(&self, tx: Self::Transaction) -> Result<(), RepositoryError> {
    tx.rollback()
      .await
      .map_err(|e| RepositoryError::TransactionFailed(format!("rollback: {}", e)))
  }
}
