//! Transaction port shared by every workflow that writes more than one row.
//!
//! Repositories never open connections themselves: each operation receives
//! the connection it runs on, which is either a pooled connection from
//! [`TransactionManager::acquire`] or the connection of an open
//! [`UnitOfWork`].

use async_trait::async_trait;
use std::ops::DerefMut;

use super::auth::errors::RepositoryError;

/// Hands out connections and controls transactions for one storage backend
#[async_trait]
pub trait TransactionManager: Send + Sync + 'static {
  /// Connection type repositories of this backend operate on
  type Connection: Send + 'static;

  /// Open transaction. Dropping it without commit rolls it back.
  type Transaction: DerefMut<Target = Self::Connection> + Send;

  /// Connection checked out of the pool, outside any transaction
  type Pooled: DerefMut<Target = Self::Connection> + Send;

  /// Checks out a connection for reads and single-statement writes
  async fn acquire(&self) -> Result<Self::Pooled, RepositoryError>;

  /// Opens a new transaction
  async fn begin(&self) -> Result<Self::Transaction, RepositoryError>;

  /// Commits a transaction
  async fn commit(&self, tx: Self::Transaction) -> Result<(), RepositoryError>;

  /// Rolls a transaction back
  async fn rollback(&self, tx: Self::Transaction) -> Result<(), RepositoryError>;
}

/// Scoped transaction handle.
///
/// Every exit path that does not reach [`UnitOfWork::commit`] rolls the
/// transaction back when the guard is dropped.
pub struct UnitOfWork<'a, M: TransactionManager> {
  manager: &'a M,
  tx: Option<M::Transaction>,
}

impl<'a, M: TransactionManager> UnitOfWork<'a, M> {
  /// Begins a transaction on `manager`
  pub async fn begin(manager: &'a M) -> Result<Self, RepositoryError> {
    let tx = manager.begin().await?;
    Ok(Self {
      manager,
      tx: Some(tx),
    })
  }

  /// Connection of the open transaction
  pub fn connection(&mut self) -> Result<&mut M::Connection, RepositoryError> {
    self
      .tx
      .as_deref_mut()
      .ok_or_else(|| RepositoryError::TransactionFailed("transaction already finished".into()))
  }

  /// Commits the transaction, consuming the guard
  pub async fn commit(mut self) -> Result<(), RepositoryError> {
    match self.tx.take() {
      Some(tx) => self.manager.commit(tx).await,
      None => Err(RepositoryError::TransactionFailed(
        "transaction already finished".into(),
      )),
    }
  }

  /// Rolls the transaction back explicitly, consuming the guard
  pub async fn rollback(mut self) -> Result<(), RepositoryError> {
    match self.tx.take() {
      Some(tx) => self.manager.rollback(tx).await,
      None => Ok(()),
    }
  }
}

impl<M: TransactionManager> Drop for UnitOfWork<'_, M> {
  fn drop(&mut self) {
    if let Some(tx) = self.tx.take() {
      tracing::debug!("Rolling back uncommitted transaction");
      drop(tx);
    }
  }
}
