pub mod config;
pub mod database;
pub mod user_repository;

pub use config::DatabaseConfig;
pub use database::Database;
pub use user_repository::UserRepository;
