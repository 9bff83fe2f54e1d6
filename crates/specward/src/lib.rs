//! specward library.
//!
//! This library exposes internal modules for testing purposes.
//! The main entry point is the `specward` binary.

pub mod report;
pub mod store;

pub use store::{SpecStore, StoreError};
