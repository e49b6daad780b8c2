use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use crate::domain::auth::{entities::User, errors::RepositoryError};
use crate::domain::company::entities::{Company, CompanyManager, Department};
use crate::domain::transaction::TransactionManager;

/// Tables of the in-memory backend
#[derive(Debug, Clone, Default)]
pub struct MemoryState {
  pub users: Vec<User>,
  pub companies: Vec<Company>,
  pub departments: Vec<Department>,
  pub company_managers: Vec<CompanyManager>,
}

/// In-memory storage backend.
///
/// A single lock guards all tables, so connections and transactions are
/// serialized. A transaction keeps a copy of the tables taken at `begin` and
/// restores it unless it is committed.
#[derive(Clone, Default)]
pub struct MemoryDatabase {
  state: Arc<Mutex<MemoryState>>,
}

impl MemoryDatabase {
  pub fn new() -> Self {
    Self::default()
  }

  /// Copy of the committed tables
  pub async fn snapshot(&self) -> MemoryState {
    self.state.lock().await.clone()
  }

  /// Inserts a user outside of any workflow
  pub async fn seed_user(&self, user: User) {
    self.state.lock().await.users.push(user);
  }

  /// Inserts a rights record outside of any workflow
  pub async fn seed_company_manager(&self, user_id: Uuid, company_id: Uuid) {
    self
      .state
      .lock()
      .await
      .company_managers
      .push(CompanyManager::new(user_id, company_id));
  }
}

/// Exclusive handle on the tables
pub struct MemoryConnection {
  state: OwnedMutexGuard<MemoryState>,
  rollback_to: Option<MemoryState>,
}

impl MemoryConnection {
  pub(super) fn tables(&mut self) -> &mut MemoryState {
    &mut self.state
  }
}

impl Drop for MemoryConnection {
  fn drop(&mut self) {
    if let Some(snapshot) = self.rollback_to.take() {
      *self.state = snapshot;
    }
  }
}

#[async_trait]
impl TransactionManager for MemoryDatabase {
  type Connection = MemoryConnection;
  type Transaction = Box<MemoryConnection>;
  type Pooled = Box<MemoryConnection>;

  async fn acquire(&self) -> Result<Self::Pooled, RepositoryError> {
    let state = self.state.clone().lock_owned().await;
    Ok(Box::new(MemoryConnection {
      state,
      rollback_to: None,
    }))
  }

  async fn begin(&self) -> Result<Self::Transaction, RepositoryError> {
    let state = self.state.clone().lock_owned().await;
    let snapshot = state.clone();
    Ok(Box::new(MemoryConnection {
      state,
      rollback_to: Some(snapshot),
    }))
  }

  async fn commit(&self, mut tx: Self::Transaction) -> Result<(), RepositoryError> {
    tx.rollback_to = None;
    Ok(())
  }

  async fn rollback(&self, tx: Self::Transaction) -> Result<(), RepositoryError> {
    drop(tx);
    Ok(())
  }
}
