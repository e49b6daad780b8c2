use super::errors::ValidationError;

/// Name of the department created together with every company
pub const HEAD_DEPARTMENT_NAME: &str = "Head";

/// Company name value object with validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyName(String);

impl CompanyName {
  const MAX_LENGTH: usize = 255;

  pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
    let name = name.into().trim().to_string();

    if name.is_empty() {
      return Err(ValidationError::CompanyNameTooShort { min: 1 });
    }

    if name.chars().count() > Self::MAX_LENGTH {
      return Err(ValidationError::CompanyNameTooLong {
        max: Self::MAX_LENGTH,
      });
    }

    Ok(Self(name))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  pub fn into_inner(self) -> String {
    self.0
  }
}
