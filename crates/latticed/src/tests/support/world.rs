//! Worker-run world wiring every injectable collaborator to a recording
//! double, over a throwaway work directory.

use std::io;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use camino::Utf8PathBuf;
use tempfile::TempDir;

use lattice_cluster::TcpTransportFactory;
use lattice_config::Config;

use crate::dispatch::{Parker, WorkerError, run_worker_with};
use crate::handshake::{HandshakeError, ReadinessReport, ReadySink};
use crate::placeholder::IdleRuntimeBinder;

use super::registry::ScriptedRegistry;
use super::reporter::RecordingBootReporter;

/// Sink capturing readiness messages, with a scriptable write failure.
#[derive(Clone, Default)]
pub struct RecordingSink {
    sent: Arc<Mutex<Vec<ReadinessReport>>>,
    fail: Arc<AtomicBool>,
}

impl RecordingSink {
    /// Scripts the next send to fail like a broken pipe.
    pub fn fail_next(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }

    /// Reports sent so far.
    pub fn sent(&self) -> Vec<ReadinessReport> {
        self.sent.lock().expect("sink mutex poisoned").clone()
    }
}

impl ReadySink for RecordingSink {
    fn send(&self, report: ReadinessReport) -> Result<(), HandshakeError> {
        if self.fail.swap(false, Ordering::SeqCst) {
            return Err(HandshakeError::Write {
                source: io::Error::new(io::ErrorKind::BrokenPipe, "scripted channel failure"),
            });
        }
        self.sent.lock().expect("sink mutex poisoned").push(report);
        Ok(())
    }
}

/// Parker that records invocations instead of blocking.
#[derive(Clone, Default)]
pub struct RecordingParker {
    parks: Arc<AtomicUsize>,
}

impl RecordingParker {
    /// Number of times the worker parked.
    pub fn parks(&self) -> usize {
        self.parks.load(Ordering::SeqCst)
    }
}

impl Parker for RecordingParker {
    fn park(&self) {
        self.parks.fetch_add(1, Ordering::SeqCst);
    }
}

/// Collaborators and scratch state for one worker scenario.
pub struct WorkerWorld {
    scratch: TempDir,
    pub config: Config,
    pub registry: ScriptedRegistry,
    pub reporter: Arc<RecordingBootReporter>,
    pub sink: RecordingSink,
    pub parker: RecordingParker,
    pub result: Option<Result<(), WorkerError>>,
}

impl WorkerWorld {
    pub fn new() -> Self {
        let scratch = TempDir::new().expect("create scratch directory");
        let root = Utf8PathBuf::from_path_buf(scratch.path().to_path_buf())
            .expect("scratch path should be UTF-8");
        let config = Config {
            work_dir: root.join("work"),
            sandbox_dir: root.join("sandbox"),
            bind_addr: String::from("127.0.0.1:0"),
            anchors: vec![String::from("svc/a"), String::from("svc/b")],
            ..Config::default()
        };
        Self {
            scratch,
            config,
            registry: ScriptedRegistry::default(),
            reporter: Arc::new(RecordingBootReporter::default()),
            sink: RecordingSink::default(),
            parker: RecordingParker::default(),
            result: None,
        }
    }

    /// Replaces the configured anchor list.
    pub fn set_anchors(&mut self, csv: &str) {
        self.config.anchors = csv.split(',').map(str::to_owned).collect();
    }

    /// Runs the worker sequence with every double injected.
    pub fn run_worker(&mut self) {
        let result = run_worker_with(
            &self.config,
            &self.registry,
            &TcpTransportFactory::new(),
            &IdleRuntimeBinder,
            self.reporter.as_ref(),
            &self.sink,
            &self.parker,
        );
        self.result = Some(result);
    }

    /// Path of the lock file the worker should have created.
    pub fn lock_path(&self) -> std::path::PathBuf {
        self.scratch
            .path()
            .join("work")
            .join(lattice_config::LOCK_FILE_NAME)
    }

    pub fn last_error(&self) -> Option<&WorkerError> {
        self.result.as_ref()?.as_ref().err()
    }
}
