pub mod company_repository;
pub mod credential_repository;
pub mod department_repository;
pub mod rights_repository;
pub mod transaction_manager;
pub mod user_repository;

pub use company_repository::PostgresCompanyRepository;
pub use credential_repository::PostgresCredentialRepository;
pub use department_repository::PostgresDepartmentRepository;
pub use rights_repository::PostgresRightsRepository;
pub use transaction_manager::PostgresTransactionManager;
pub use user_repository::PostgresUserRepository;
