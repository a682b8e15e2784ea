//! Test double for [`BootReporter`] recording structured events in order.

use std::sync::Mutex;

use camino::{Utf8Path, Utf8PathBuf};

use lattice_cluster::Namespace;

use crate::bootstrap::BootstrapError;
use crate::report::BootReporter;

/// Lifecycle events tracked during scenarios, in emission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootEvent {
    Starting,
    LockAcquired(Utf8PathBuf),
    RegistryBound(Namespace),
    TransportOpen { port: u16, reachable: String },
    AnchorRegistered(String),
    Succeeded,
    Failed(String),
    ReadySignalled { pid: u32, port: u16 },
}

/// Records boot events for assertions.
#[derive(Debug, Default)]
pub struct RecordingBootReporter {
    events: Mutex<Vec<BootEvent>>,
}

impl RecordingBootReporter {
    /// Captures a copy of the recorded events.
    pub fn events(&self) -> Vec<BootEvent> {
        self.events
            .lock()
            .expect("boot reporter mutex poisoned")
            .clone()
    }

    fn record(&self, event: BootEvent) {
        self.events
            .lock()
            .expect("boot reporter mutex poisoned")
            .push(event);
    }
}

impl BootReporter for RecordingBootReporter {
    fn bootstrap_starting(&self) {
        self.record(BootEvent::Starting);
    }

    fn lock_acquired(&self, path: &Utf8Path) {
        self.record(BootEvent::LockAcquired(path.to_path_buf()));
    }

    fn registry_bound(&self, namespace: Namespace) {
        self.record(BootEvent::RegistryBound(namespace));
    }

    fn transport_open(&self, port: u16, reachable: &str) {
        self.record(BootEvent::TransportOpen {
            port,
            reachable: reachable.to_owned(),
        });
    }

    fn anchor_registered(&self, name: &str) {
        self.record(BootEvent::AnchorRegistered(name.to_owned()));
    }

    fn bootstrap_succeeded(&self, port: u16, reachable: &str) {
        let _ = (port, reachable);
        self.record(BootEvent::Succeeded);
    }

    fn bootstrap_failed(&self, error: &BootstrapError) {
        self.record(BootEvent::Failed(error.to_string()));
    }

    fn ready_signalled(&self, pid: u32, port: u16) {
        self.record(BootEvent::ReadySignalled { pid, port });
    }
}
