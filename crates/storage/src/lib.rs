//! Storage abstraction and implementations for Growth.
//!
//! This crate provides a trait-based storage interface with a JSON file
//! reference implementation. It is the data-access layer that resolves which
//! tasks, metrics and habits are linked to a goal.

#![warn(missing_docs)]

pub mod trait_;
pub mod json_storage;

pub use trait_::{Storage, StorageError, Result};
pub use json_storage::JsonStorage;
