pub mod kv;
pub mod memory;
pub mod sqlite;

pub use kv::KeyValueStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
