//! In-memory adapters for dry runs and tests.

pub mod filesystem;

pub use filesystem::MemoryFileSystem;
