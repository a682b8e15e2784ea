//! Role dispatch and process lifecycle.
//!
//! `run` is the only place where errors become exit codes: everything below
//! it returns tagged errors. Role dispatch itself is a pure function over the
//! parsed configuration; the three role runners wire the production
//! collaborators and hand back results.

use std::ffi::OsString;
use std::io::{self, Write};
use std::process::ExitCode;
use std::thread;

use thiserror::Error;
use tracing::{error, info};

use lattice_cluster::{RegistryProvider, RuntimeBinder, TcpTransportFactory, TransportFactory};
use lattice_config::{Config, Role};

use crate::bootstrap::{self, BootMode, BootstrapError};
use crate::handshake::{HandshakeError, InheritedChannelSink, ReadinessReport, ReadySink};
use crate::launcher::{self, LaunchError};
use crate::placeholder::{IdleRuntimeBinder, LocalRegistryProvider};
use crate::report::{BootReporter, StructuredBootReporter};
use crate::telemetry;

const DISPATCH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::dispatch");

/// Seam for the worker's terminal state.
pub trait Parker {
    /// Blocks the calling thread; the production implementation never
    /// returns.
    fn park(&self);
}

/// Parks the bootstrap thread until process termination.
#[derive(Debug, Default, Clone, Copy)]
pub struct ForeverParker;

impl Parker for ForeverParker {
    fn park(&self) {
        info!(
            target: DISPATCH_TARGET,
            "bootstrap complete; parking until process termination"
        );
        // Intentional terminal state, not a forgotten receive: every further
        // action on this node belongs to the bound runtime's own threads.
        // Unparks without a corresponding shutdown are spurious wake-ups.
        loop {
            thread::park();
        }
    }
}

/// Errors a worker run can surface.
#[derive(Debug, Error)]
pub enum WorkerError {
    /// A bootstrap step failed; controlled exit 1.
    #[error(transparent)]
    Bootstrap(#[from] BootstrapError),
    /// The readiness send failed; the process aborts abnormally.
    #[error("readiness signal failed: {0}")]
    Handshake(#[from] HandshakeError),
}

/// Errors a daemonizer run can surface.
#[derive(Debug, Error)]
pub enum DaemonizerError {
    /// Detaching the worker or its handshake failed.
    #[error(transparent)]
    Launch(#[from] LaunchError),
    /// Writing the readiness banner failed.
    #[error("failed to report worker readiness: {source}")]
    Report {
        #[source]
        source: io::Error,
    },
}

/// Process entry point: loads configuration, brings telemetry up, and
/// dispatches on the configured role.
pub fn run(arguments: &[OsString]) -> ExitCode {
    let config = match Config::load_from_iter(arguments.iter().cloned()) {
        Ok(config) => config,
        Err(error) => return fail("configuration", error.as_ref()),
    };
    if let Err(error) = telemetry::initialise(&config) {
        return fail("telemetry", &error);
    }
    let role = match config.role() {
        Ok(role) => role,
        Err(error) => return fail("role selection", &error),
    };
    info!(target: DISPATCH_TARGET, role = %role, "node role selected");
    dispatch(role, &config, arguments)
}

/// Pure dispatch over the parsed role.
pub fn dispatch(role: Role, config: &Config, arguments: &[OsString]) -> ExitCode {
    match role {
        Role::Main => match run_main(config) {
            Ok(()) => ExitCode::SUCCESS,
            Err(error) => fail("bootstrap", &error),
        },
        Role::Worker => match run_worker(config) {
            // Reachable only with a returning parker; the production worker
            // parks forever.
            Ok(()) => ExitCode::SUCCESS,
            Err(WorkerError::Handshake(source)) => {
                error!(
                    target: DISPATCH_TARGET,
                    error = %source,
                    "readiness handshake failed; aborting"
                );
                std::process::abort();
            }
            Err(error) => fail("bootstrap", &error),
        },
        Role::Daemonizer => match run_daemonizer(arguments, &mut io::stdout()) {
            Ok(_) => ExitCode::SUCCESS,
            Err(error) => fail("worker launch", &error),
        },
    }
}

/// Foreground bootstrap. The node's foreground duty ends with bootstrap;
/// embedders would hold the returned node for the life of their runtime.
fn run_main(config: &Config) -> Result<(), BootstrapError> {
    let reporter = StructuredBootReporter::new();
    let node = bootstrap::bootstrap_with(
        BootMode::Main,
        config,
        &LocalRegistryProvider,
        &TcpTransportFactory::new(),
        &IdleRuntimeBinder,
        &reporter,
    )?;
    drop(node);
    Ok(())
}

fn run_worker(config: &Config) -> Result<(), WorkerError> {
    run_worker_with(
        config,
        &LocalRegistryProvider,
        &TcpTransportFactory::new(),
        &IdleRuntimeBinder,
        &StructuredBootReporter::new(),
        &InheritedChannelSink,
        &ForeverParker,
    )
}

/// Worker bootstrap with injected collaborators.
///
/// The readiness message goes out only after every anchor registered; the
/// park follows immediately after the send is acknowledged.
pub(crate) fn run_worker_with<P, F, R, S, K>(
    config: &Config,
    registries: &P,
    transports: &F,
    runtimes: &R,
    reporter: &dyn BootReporter,
    sink: &S,
    parker: &K,
) -> Result<(), WorkerError>
where
    P: RegistryProvider,
    F: TransportFactory,
    R: RuntimeBinder<F::Endpoint>,
    S: ReadySink,
    K: Parker,
{
    let node = bootstrap::bootstrap_with(
        BootMode::Worker,
        config,
        registries,
        transports,
        runtimes,
        reporter,
    )?;
    let report = ReadinessReport {
        pid: std::process::id(),
        port: node.port(),
    };
    sink.send(report)?;
    reporter.ready_signalled(report.pid, report.port);
    parker.park();
    drop(node);
    Ok(())
}

/// Detaches a worker and reports its readiness on `out`.
pub(crate) fn run_daemonizer<W: Write>(
    arguments: &[OsString],
    out: &mut W,
) -> Result<ReadinessReport, DaemonizerError> {
    let report = launcher::daemonize(arguments, None)?;
    writeln!(out, "worker {} ready on port {}", report.pid, report.port)
        .map_err(|source| DaemonizerError::Report { source })?;
    Ok(report)
}

fn fail(stage: &str, error: &dyn std::error::Error) -> ExitCode {
    eprintln!("latticed: {stage} failed: {error}");
    ExitCode::FAILURE
}
