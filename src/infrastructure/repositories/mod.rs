//! Repository Implementations
//!
//! Concrete implementations of domain repository ports.

mod layer_store;

pub use layer_store::{FsLayerStore, FsPendingLayer, StoreLock};
