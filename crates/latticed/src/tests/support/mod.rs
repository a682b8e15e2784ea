//! Test harness utilities for the bootstrap behavioural suites.

mod registry;
mod reporter;
mod world;

pub use registry::ScriptedRegistry;
pub use reporter::{BootEvent, RecordingBootReporter};
pub use world::{RecordingParker, RecordingSink, WorkerWorld};
