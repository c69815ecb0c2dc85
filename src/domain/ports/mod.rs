//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Infrastructure layer provides concrete implementations.

pub mod build_events;
pub mod command_runner;
pub mod entry_launcher;
pub mod layer_store;

pub use build_events::{BuildEvent, BuildEventSink, NoopEventSink};
pub use command_runner::{CommandRunner, Invocation, RunOutcome, RunnerError};
pub use entry_launcher::EntryLauncher;
pub use layer_store::{LayerStore, LockMode, PendingLayer, StoreError, StoreResult};
