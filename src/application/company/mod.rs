pub mod add_company;

pub use add_company::{AddCompanyCommand, AddCompanyResponse, AddCompanyUseCase};
