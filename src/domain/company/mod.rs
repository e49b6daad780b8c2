pub mod entities;
pub mod errors;
pub mod ports;
pub mod services;
pub mod value_objects;

pub use entities::{Company, CompanyManager, Department};
pub use errors::{CompanyError, ValidationError};
pub use ports::{CompanyRepository, DepartmentRepository, RightsRepository};
pub use services::CompanyService;
pub use value_objects::{CompanyName, HEAD_DEPARTMENT_NAME};
