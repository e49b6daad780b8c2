//! Authentication use cases

mod sign_in_user;
mod sign_up_user;

pub use sign_in_user::{SignInUserCommand, SignInUserUseCase};
pub use sign_up_user::{SignUpUserCommand, SignUpUserUseCase};
