//! Key-value backend implementations.

mod memory;
mod redb;

pub use self::redb::RedbKv;
pub use memory::MemoryKv;
