/// In-memory persistence adapters
mod in_memory_repository;

pub use in_memory_repository::{ComponentRow, InMemoryRepository};
