//! Structured reporting of bootstrap lifecycle events.

use camino::Utf8Path;

use lattice_cluster::Namespace;

use crate::bootstrap::BootstrapError;

/// Observer trait used to surface bootstrap progress to telemetry sinks.
pub trait BootReporter: Send + Sync {
    /// Invoked when the bootstrap sequence begins.
    fn bootstrap_starting(&self);

    /// Invoked after the worker claims its work-directory lock.
    fn lock_acquired(&self, path: &Utf8Path);

    /// Invoked after a registry client is bound.
    fn registry_bound(&self, namespace: Namespace);

    /// Invoked once the transport endpoint is live.
    fn transport_open(&self, port: u16, reachable: &str);

    /// Invoked after each anchor registration.
    fn anchor_registered(&self, name: &str);

    /// Invoked when the whole sequence completes.
    fn bootstrap_succeeded(&self, port: u16, reachable: &str);

    /// Invoked when any step fails.
    fn bootstrap_failed(&self, error: &BootstrapError);

    /// Invoked after a worker's readiness message is on the wire.
    fn ready_signalled(&self, pid: u32, port: u16);
}

/// Default reporter that records lifecycle events using `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StructuredBootReporter;

impl StructuredBootReporter {
    /// Builds a new reporter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

const REPORT_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::boot");

impl BootReporter for StructuredBootReporter {
    fn bootstrap_starting(&self) {
        tracing::info!(target: REPORT_TARGET, event = "bootstrap_starting", "starting node bootstrap");
    }

    fn lock_acquired(&self, path: &Utf8Path) {
        tracing::info!(
            target: REPORT_TARGET,
            event = "lock_acquired",
            file = %path,
            "work directory claimed"
        );
    }

    fn registry_bound(&self, namespace: Namespace) {
        tracing::info!(
            target: REPORT_TARGET,
            event = "registry_bound",
            namespace = %namespace,
            "registry client bound"
        );
    }

    fn transport_open(&self, port: u16, reachable: &str) {
        tracing::info!(
            target: REPORT_TARGET,
            event = "transport_open",
            port,
            reachable,
            "transport endpoint open"
        );
    }

    fn anchor_registered(&self, name: &str) {
        tracing::info!(
            target: REPORT_TARGET,
            event = "anchor_registered",
            anchor = name,
            "anchor registered"
        );
    }

    fn bootstrap_succeeded(&self, port: u16, reachable: &str) {
        tracing::info!(
            target: REPORT_TARGET,
            event = "bootstrap_succeeded",
            port,
            reachable,
            "node bootstrap completed"
        );
    }

    fn bootstrap_failed(&self, error: &BootstrapError) {
        tracing::error!(
            target: REPORT_TARGET,
            event = "bootstrap_failed",
            error = %error,
            "node bootstrap failed"
        );
    }

    fn ready_signalled(&self, pid: u32, port: u16) {
        tracing::info!(
            target: REPORT_TARGET,
            event = "ready_signalled",
            pid,
            port,
            "readiness handed to launcher"
        );
    }
}
