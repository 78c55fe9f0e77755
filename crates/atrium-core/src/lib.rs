pub mod config;
pub mod error;
pub mod models;
pub mod validation;

pub use config::AppConfig;
pub use error::{AppError, FieldFailure};
pub use models::{NewUser, Role, User, UserCredentials};
pub use validation::{Validate, ensure_valid};
