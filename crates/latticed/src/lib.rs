//! Bootstrap layer of the lattice distributed compute runtime.
//!
//! One binary serves three roles, selected by configuration. A foreground
//! `main` binds its dependencies and returns control to the invoker. A
//! `worker` first claims its work directory, binds the same dependencies,
//! signals readiness to whoever launched it, and parks for the rest of the
//! process lifetime. A `daemonizer` spawns a worker in the background, waits
//! for that signal, reports it, and exits.
//!
//! The dependency order is fixed: registry clients for the anchor, durable,
//! and issue namespaces, the node-local process executor, the transport
//! endpoint, and the execution runtime on top of it. Only then are the
//! configured anchors registered, each under the transport's reachable
//! address, so discovery can never hand out an address that is not yet live.
//! Every failure along the way is fatal; this layer retries nothing.

mod bootstrap;
mod dispatch;
mod handshake;
mod launcher;
mod lockfile;
mod placeholder;
mod report;
mod telemetry;

pub use bootstrap::{BootMode, BootstrapError, Node, bootstrap_with};
pub use dispatch::{DaemonizerError, ForeverParker, Parker, WorkerError, dispatch, run};
pub use handshake::{
    HandshakeError, InheritedChannelSink, ReadinessReport, ReadySink, read_report, write_report,
};
pub use launcher::{LaunchError, WORKER_BINARY_ENV, daemonize};
pub use lockfile::{LockError, WorkDirLock};
pub use report::{BootReporter, StructuredBootReporter};
pub use telemetry::{TelemetryError, TelemetryHandle};

#[cfg(test)]
mod tests;
