//! Node bootstrap orchestration.
//!
//! Bootstrap is a strictly ordered sequence of fallible binds: the worker
//! lock, three registry clients (anchor, durable, issue), the local process
//! executor, the transport endpoint, the runtime, and finally the anchor
//! registrations. Steps never run concurrently or out of order, and the
//! first failure wins: nothing already bound is rolled back, because process
//! exit is the only cleanup this layer performs. In particular no anchor is
//! ever advertised before the transport endpoint it names is live.

use thiserror::Error;

use lattice_cluster::{
    ExecutorError, Namespace, ProcessExecutor, RegistrationError, RegistryClient, RegistryError,
    RegistryProvider, RuntimeBinder, RuntimeError, Transport, TransportError, TransportFactory,
};
use lattice_config::{Config, IdentityError, WorkPaths, WorkPathsError};

use crate::lockfile::{LockError, WorkDirLock};
use crate::report::BootReporter;

/// Which bootstrap sequence to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootMode {
    /// Foreground node: no lock, no readiness signal, no park.
    Main,
    /// Background worker: claims the work directory before binding anything.
    Worker,
}

/// Errors surfaced during bootstrap, one variant per failing step.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// The work directory could not be prepared.
    #[error("work directory preparation failed: {source}")]
    WorkDir {
        #[from]
        source: WorkPathsError,
    },
    /// The worker lock could not be claimed.
    #[error("worker lock acquisition failed: {source}")]
    Lock {
        #[from]
        source: LockError,
    },
    /// A registry client failed to bind.
    #[error("registry bind failed: {source}")]
    Registry {
        #[from]
        source: RegistryError,
    },
    /// The local executor could not be configured.
    #[error("local executor configuration failed: {source}")]
    Executor {
        #[from]
        source: ExecutorError,
    },
    /// The node identity could not be assembled.
    #[error("node identity invalid: {source}")]
    Identity {
        #[from]
        source: IdentityError,
    },
    /// The transport endpoint could not be opened.
    #[error("transport open failed: {source}")]
    Transport {
        #[from]
        source: TransportError,
    },
    /// The runtime could not be bound atop the transport.
    #[error("runtime bind failed: {source}")]
    Runtime {
        #[from]
        source: RuntimeError,
    },
    /// An anchor failed to register; earlier anchors stay registered.
    #[error("anchor registration failed: {source}")]
    Register {
        #[from]
        source: RegistrationError,
    },
}

/// Everything a bootstrapped node owns, bound exactly once per process.
///
/// The node is the context object the rest of the process works through;
/// there is no mechanism to rebind or unbind a dependency while the process
/// runs. Dropping the node releases the runtime and clients but deliberately
/// not the work-directory lock file.
pub struct Node<C, R> {
    lock: Option<WorkDirLock>,
    anchors: C,
    durable: C,
    issue: C,
    executor: ProcessExecutor,
    runtime: R,
    port: u16,
    reachable_addr: String,
}

impl<C, R> Node<C, R> {
    /// Lock held by a worker; `None` for a foreground main.
    #[must_use]
    pub fn lock(&self) -> Option<&WorkDirLock> {
        self.lock.as_ref()
    }

    /// Client bound to the anchor namespace.
    pub fn anchors_mut(&mut self) -> &mut C {
        &mut self.anchors
    }

    /// Client bound to the durable-state namespace.
    pub fn durable_mut(&mut self) -> &mut C {
        &mut self.durable
    }

    /// Client bound to the issue-tracking namespace.
    pub fn issue_mut(&mut self) -> &mut C {
        &mut self.issue
    }

    /// The configured local executor.
    #[must_use]
    pub fn executor(&self) -> &ProcessExecutor {
        &self.executor
    }

    /// Handle to the bound runtime.
    #[must_use]
    pub fn runtime(&self) -> &R {
        &self.runtime
    }

    /// Actual listening port of the transport endpoint.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Address anchors were registered under.
    #[must_use]
    pub fn reachable_addr(&self) -> &str {
        self.reachable_addr.as_str()
    }
}

/// Runs the bootstrap sequence with the supplied collaborators.
///
/// Reports progress through `reporter`; any error has already been reported
/// when it is returned, so callers only decide process termination.
pub fn bootstrap_with<P, F, R>(
    mode: BootMode,
    config: &Config,
    registries: &P,
    transports: &F,
    runtimes: &R,
    reporter: &dyn BootReporter,
) -> Result<Node<P::Client, R::Runtime>, BootstrapError>
where
    P: RegistryProvider,
    F: TransportFactory,
    R: RuntimeBinder<F::Endpoint>,
{
    reporter.bootstrap_starting();
    match sequence(mode, config, registries, transports, runtimes, reporter) {
        Ok(node) => {
            reporter.bootstrap_succeeded(node.port(), node.reachable_addr());
            Ok(node)
        }
        Err(error) => {
            reporter.bootstrap_failed(&error);
            Err(error)
        }
    }
}

fn sequence<P, F, R>(
    mode: BootMode,
    config: &Config,
    registries: &P,
    transports: &F,
    runtimes: &R,
    reporter: &dyn BootReporter,
) -> Result<Node<P::Client, R::Runtime>, BootstrapError>
where
    P: RegistryProvider,
    F: TransportFactory,
    R: RuntimeBinder<F::Endpoint>,
{
    let lock = match mode {
        BootMode::Worker => {
            let paths = WorkPaths::from_config(config)?;
            let lock = WorkDirLock::acquire(&paths)?;
            reporter.lock_acquired(lock.path());
            Some(lock)
        }
        BootMode::Main => None,
    };

    let mut anchors = registries.connect(Namespace::Anchor, config)?;
    reporter.registry_bound(Namespace::Anchor);
    let durable = registries.connect(Namespace::Durable, config)?;
    reporter.registry_bound(Namespace::Durable);
    let issue = registries.connect(Namespace::Issue, config)?;
    reporter.registry_bound(Namespace::Issue);

    let executor = ProcessExecutor::configure(config.install_layout())?;

    let identity = config.node_identity()?;
    let endpoint = transports.open(&identity)?;
    let port = endpoint.port();
    let reachable_addr = endpoint.reachable_addr().to_owned();
    reporter.transport_open(port, &reachable_addr);

    let runtime = runtimes.bind(endpoint)?;

    for name in &config.anchors {
        anchors.register(name, &reachable_addr)?;
        reporter.anchor_registered(name);
    }

    Ok(Node {
        lock,
        anchors,
        durable,
        issue,
        executor,
        runtime,
        port,
        reachable_addr,
    })
}
