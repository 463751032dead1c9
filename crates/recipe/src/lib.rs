mod cache;
mod command;
#[cfg(test)]
mod fixtures;
mod flatten;
mod memory;
mod sqlite;
mod write;

pub use cache::*;
pub use command::Command;
pub use flatten::*;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use write::*;
