//! Transaction manager over `MemoryDatabase` that fails on demand

use async_trait::async_trait;

use super::database::{MemoryConnection, MemoryDatabase};
use crate::domain::auth::errors::RepositoryError;
use crate::domain::transaction::TransactionManager;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FailOn {
  Begin,
  Commit,
}

pub(crate) struct FailingTransactions {
  db: MemoryDatabase,
  fail_on: FailOn,
}

impl FailingTransactions {
  /// Shares the tables of `db`
  pub(crate) fn new(db: MemoryDatabase, fail_on: FailOn) -> Self {
    Self { db, fail_on }
  }
}

#[async_trait]
impl TransactionManager for FailingTransactions {
  type Connection = MemoryConnection;
  type Transaction = Box<MemoryConnection>;
  type Pooled = Box<MemoryConnection>;

  async fn acquire(&self) -> Result<Self::Pooled, RepositoryError> {
    self.db.acquire().await
  }

  async fn begin(&self) -> Result<Self::Transaction, RepositoryError> {
    if self.fail_on == FailOn::Begin {
      return Err(RepositoryError::TransactionFailed(
        "begin: connection reset".to_string(),
      ));
    }
    self.db.begin().await
  }

  async fn commit(&self, tx: Self::Transaction) -> Result<(), RepositoryError> {
    if self.fail_on == FailOn::Commit {
      // The server dropped the transaction
      self.db.rollback(tx).await?;
      return Err(RepositoryError::TransactionFailed(
        "commit: connection reset".to_string(),
      ));
    }
    self.db.commit(tx).await
  }

  async fn rollback(&self, tx: Self::Transaction) -> Result<(), RepositoryError> {
    self.db.rollback(tx).await
  }
}
