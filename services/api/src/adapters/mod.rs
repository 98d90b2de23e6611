//! services/api/src/adapters/mod.rs
//!
//! Concrete implementations of the core crate's ports.

pub mod fs_store;
pub mod local_source;

pub use fs_store::FileAssetStore;
pub use local_source::LocalAssetSource;
