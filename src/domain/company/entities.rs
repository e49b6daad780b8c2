use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::value_objects::{CompanyName, HEAD_DEPARTMENT_NAME};

/// Company entity representing a business organization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
  pub id: Uuid,
  pub name: String,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl Company {
  /// Create new company (for creation)
  pub fn new(name: CompanyName) -> Self {
    let now = Utc::now();
    Self {
      id: Uuid::new_v4(),
      name: name.into_inner(),
      created_at: now,
      updated_at: now,
    }
  }
}

/// Department of a company
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
  pub id: Uuid,
  pub company_id: Uuid,
  pub name: String,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl Department {
  /// The "Head" department every company starts with
  pub fn head(company_id: Uuid) -> Self {
    let now = Utc::now();
    Self {
      id: Uuid::new_v4(),
      company_id,
      name: HEAD_DEPARTMENT_NAME.to_string(),
      created_at: now,
      updated_at: now,
    }
  }
}

/// Rights record granting a user administrator rights over a company
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyManager {
  pub user_id: Uuid,
  pub company_id: Uuid,
  pub created_at: DateTime<Utc>,
}

impl CompanyManager {
  pub fn new(user_id: Uuid, company_id: Uuid) -> Self {
    Self {
      user_id,
      company_id,
      created_at: Utc::now(),
    }
  }
}
