use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::value_objects::{Email, PersonName};

/// Profile data supplied when a user signs up
#[derive(Debug, Clone)]
pub struct NewUser {
  pub first_name: PersonName,
  pub last_name: PersonName,
  pub email: Email,
}

/// User entity representing a user in the system
#[derive(Debug, Clone, Serialize)]
pub struct User {
  /// Unique identifier for the user
  pub id: Uuid,
  pub first_name: String,
  pub last_name: String,
  /// User's email address (unique)
  pub email: String,
  /// Hashed password using Argon2
  #[serde(skip_serializing)]
  pub password_hash: String,
  pub image_url: Option<String>,
  /// Whether the user's email has been verified
  pub email_is_validated: bool,
  pub vacation_time_start: Option<DateTime<Utc>>,
  pub vacation_time_end: Option<DateTime<Utc>>,
  /// Company the user belongs to, set when the user creates a company
  pub company_id: Option<Uuid>,
  /// Department inside `company_id`
  pub department_id: Option<Uuid>,
  /// Timestamp when the user was created
  pub created_at: DateTime<Utc>,
  /// Timestamp when the user was last updated
  pub updated_at: DateTime<Utc>,
}

impl User {
  /// Creates a new user from sign-up data and an already hashed password
  pub fn new(profile: NewUser, password_hash: String) -> Self {
    let now = Utc::now();
    Self {
      id: Uuid::new_v4(),
      first_name: profile.first_name.into_inner(),
      last_name: profile.last_name.into_inner(),
      email: profile.email.into_inner(),
      password_hash,
      image_url: None,
      email_is_validated: false,
      vacation_time_start: None,
      vacation_time_end: None,
      company_id: None,
      department_id: None,
      created_at: now,
      updated_at: now,
    }
  }

  /// Associates the user with a company and one of its departments
  pub fn assign_to_company(&mut self, company_id: Uuid, department_id: Uuid) {
    self.company_id = Some(company_id);
    self.department_id = Some(department_id);
    self.updated_at = Utc::now();
  }

  /// Returns the public view of the user, without the password hash
  pub fn profile(&self) -> UserProfile {
    UserProfile {
      id: self.id,
      first_name: self.first_name.clone(),
      last_name: self.last_name.clone(),
      email: self.email.clone(),
      image_url: self.image_url.clone(),
      email_is_validated: self.email_is_validated,
      vacation_time_start: self.vacation_time_start,
      vacation_time_end: self.vacation_time_end,
      company_id: self.company_id,
      department_id: self.department_id,
    }
  }
}

/// User data that is safe to hand back to callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
  pub id: Uuid,
  pub first_name: String,
  pub last_name: String,
  pub email: String,
  pub image_url: Option<String>,
  pub email_is_validated: bool,
  pub vacation_time_start: Option<DateTime<Utc>>,
  pub vacation_time_end: Option<DateTime<Utc>>,
  pub company_id: Option<Uuid>,
  pub department_id: Option<Uuid>,
}

/// Result of a successful sign-in or sign-up
#[derive(Debug, Clone)]
pub struct SignInResponse {
  pub user: UserProfile,
  /// Session token; empty when issuing it failed
  pub token: String,
}

/// Permission kinds carried by credentials
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialRole {
  /// Administrator of a company
  CompanyAdmin,
}

/// Permission record scoped to a user, embedded into session tokens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
  pub user_id: Uuid,
  pub role: CredentialRole,
  pub company_id: Uuid,
}

impl Credential {
  pub fn company_admin(user_id: Uuid, company_id: Uuid) -> Self {
    Self {
      user_id,
      role: CredentialRole::CompanyAdmin,
      company_id,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn new_user() -> NewUser {
    NewUser {
      first_name: PersonName::new("Ada").unwrap(),
      last_name: PersonName::new("Lovelace").unwrap(),
      email: Email::new("Ada@Example.com").unwrap(),
    }
  }

  #[test]
  fn test_user_creation() {
    let user = User::new(new_user(), "hashed_password".to_string());

    assert_eq!(user.email, "ada@example.com");
    assert_eq!(user.first_name, "Ada");
    assert!(!user.email_is_validated);
    assert!(user.company_id.is_none());
    assert!(user.department_id.is_none());
  }

  #[test]
  fn test_assign_to_company() {
    let mut user = User::new(new_user(), "hashed_password".to_string());
    let company_id = Uuid::new_v4();
    let department_id = Uuid::new_v4();

    user.assign_to_company(company_id, department_id);

    assert_eq!(user.company_id, Some(company_id));
    assert_eq!(user.department_id, Some(department_id));
  }

  #[test]
  fn test_serialized_user_omits_password_hash() {
    let user = User::new(new_user(), "secret_hash".to_string());
    let json = serde_json::to_string(&user).unwrap();

    assert!(!json.contains("secret_hash"));
    assert!(!json.contains("password_hash"));
  }

  #[test]
  fn test_credential_serializes_role_in_snake_case() {
    let credential = Credential::company_admin(Uuid::new_v4(), Uuid::new_v4());
    let json = serde_json::to_value(&credential).unwrap();

    assert_eq!(json["role"], "company_admin");
  }
}
