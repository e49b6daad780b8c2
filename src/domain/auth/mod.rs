pub mod entities;
pub mod errors;
pub mod ports;
pub mod services;
pub mod value_objects;

// Re-export commonly used types
pub use entities::{Credential, CredentialRole, NewUser, SignInResponse, User, UserProfile};
pub use errors::{AuthError, HashError, RepositoryError, TokenError};
pub use ports::{CredentialRepository, PasswordHasher, TokenClaims, TokenIssuer, UserRepository};
pub use services::AuthService;
pub use value_objects::{Email, Password, PasswordHash, PersonName, ValueObjectError};
