// library system: book catalog over SQLite

pub mod books;
pub mod config;
pub mod csrf;
pub mod error;
pub mod export;
pub mod pages;
pub mod routes;
pub mod sql;
pub mod types;

pub use config::Config;
pub use error::{AppError, Result};
pub use routes::{router, ServerState};
pub use sql::Db;
