pub mod config;
pub mod db;
pub mod migrate;
pub mod observability;

pub use config::Config;
pub use db::{create_pool, create_read_pool, create_write_pool};
