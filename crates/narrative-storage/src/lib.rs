//! # narrative-storage
//!
//! Storage abstraction layer for the narrative backend using RocksDB.
//!
//! This crate provides the storage interface, the RocksDB implementation
//! and a lease pool that scopes store access to a single request.

#![warn(clippy::all)]

pub mod column_families;
pub mod errors;
pub mod pool;
pub mod rocksdb_impl;
pub mod traits;

pub use column_families::*;
pub use errors::{Result, StorageError};
pub use pool::{StorageLease, StoragePool};
pub use rocksdb_impl::RocksDbStorage;
pub use traits::Storage;
