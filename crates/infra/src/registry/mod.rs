//! Registry adapters (student directory, course catalog, certificates).

pub mod in_memory;

pub use in_memory::InMemoryRegistry;
