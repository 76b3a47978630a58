//! Port traits defining external boundaries.
//!
//! The generator touches the outside world only through the filesystem.
//! Implementations live in `src/adapters/`.

pub mod filesystem;

pub use filesystem::FileSystem;
