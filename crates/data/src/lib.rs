pub mod database;

pub use database::DatabaseClient;
