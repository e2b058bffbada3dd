pub mod client;
pub mod memory;
pub mod sqlite;

pub use client::AccountStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

#[cfg(test)]
pub use client::MockAccountStore;
