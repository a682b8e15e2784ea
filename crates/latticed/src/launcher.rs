//! Worker detachment.
//!
//! The daemonizer role exists so an interactive session can start a worker
//! whose lifetime is not tied to that session: it re-invokes this binary with
//! the role forced to `worker`, wires descriptor 3 of the child to a private
//! pipe, blocks until the worker's readiness message arrives on that pipe,
//! and then exits, leaving the worker running. The launcher never waits for
//! the worker itself, only for the handshake.

use std::env;
use std::ffi::{OsStr, OsString};
use std::fs::File;
use std::io;
use std::os::fd::AsRawFd;
use std::os::unix::process::CommandExt;
use std::process::{Command, Stdio};

use nix::fcntl::OFlag;
use nix::unistd::{dup2, pipe2};
use thiserror::Error;
use tracing::info;

use crate::handshake::{self, HandshakeError, READY_CHANNEL_FD, ReadinessReport};

const LAUNCHER_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::launcher");

/// Environment override for the worker binary path.
pub const WORKER_BINARY_ENV: &str = "LATTICED_BIN";

/// Errors surfaced while detaching a worker.
#[derive(Debug, Error)]
pub enum LaunchError {
    /// Creating the readiness pipe failed.
    #[error("failed to create readiness channel: {source}")]
    Channel {
        #[source]
        source: io::Error,
    },
    /// Spawning the worker process failed.
    #[error("failed to spawn worker binary '{binary:?}': {source}")]
    Spawn {
        /// Binary the launcher attempted to run.
        binary: OsString,
        #[source]
        source: io::Error,
    },
    /// The worker never delivered a valid readiness message.
    #[error("worker readiness handshake failed: {source}")]
    Handshake {
        #[from]
        source: HandshakeError,
    },
}

/// Detaches a worker configured like this process and awaits its readiness.
///
/// `config_arguments` is the launcher's own argv; every flag except the role
/// selection is forwarded verbatim so the worker resolves an identical
/// configuration.
pub fn daemonize(
    config_arguments: &[OsString],
    binary_override: Option<&OsStr>,
) -> Result<ReadinessReport, LaunchError> {
    let binary = resolve_worker_binary(binary_override);
    let arguments = worker_arguments(config_arguments);
    let report = spawn_and_await(&binary, &arguments)?;
    info!(
        target: LAUNCHER_TARGET,
        pid = report.pid,
        port = report.port,
        "worker detached and ready"
    );
    Ok(report)
}

/// Spawns `binary` with descriptor 3 wired to a fresh pipe and reads the
/// readiness message from it.
fn spawn_and_await(binary: &OsStr, arguments: &[OsString]) -> Result<ReadinessReport, LaunchError> {
    // Both ends carry CLOEXEC: the worker keeps only the dup2 copy on fd 3,
    // so the launcher sees EOF as soon as the worker closes the channel or
    // dies, whichever comes first.
    let (read_end, write_end) =
        pipe2(OFlag::O_CLOEXEC).map_err(|errno| LaunchError::Channel {
            source: io::Error::from(errno),
        })?;

    let mut command = Command::new(binary);
    command.args(arguments);
    command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::inherit());
    let raw_write = write_end.as_raw_fd();
    // Runs in the child between fork and exec.
    unsafe {
        command.pre_exec(move || {
            dup2(raw_write, READY_CHANNEL_FD).map_err(io::Error::from)?;
            Ok(())
        });
    }

    let child = command.spawn().map_err(|source| LaunchError::Spawn {
        binary: binary.to_os_string(),
        source,
    })?;
    info!(
        target: LAUNCHER_TARGET,
        child = child.id(),
        binary = ?binary,
        "worker spawned; awaiting readiness"
    );

    // The launcher's copy of the write end must close before the read, or
    // EOF never arrives.
    drop(write_end);
    drop(child);

    let mut channel = File::from(read_end);
    Ok(handshake::read_report(&mut channel)?)
}

fn resolve_worker_binary(binary_override: Option<&OsStr>) -> OsString {
    binary_override
        .map(OsString::from)
        .or_else(|| env::var_os(WORKER_BINARY_ENV))
        .or_else(|| env::current_exe().ok().map(OsString::from))
        .unwrap_or_else(|| OsString::from("latticed"))
}

/// Forwards the launcher's argv to the worker, forcing `--role worker`.
fn worker_arguments(config_arguments: &[OsString]) -> Vec<OsString> {
    let mut arguments = Vec::new();
    let mut skip_value = false;
    // Skip argv[0]; the worker gets its own.
    for argument in config_arguments.iter().skip(1) {
        if skip_value {
            skip_value = false;
            continue;
        }
        let text = argument.to_string_lossy();
        if text == "--role" {
            skip_value = true;
            continue;
        }
        if text.starts_with("--role=") {
            continue;
        }
        arguments.push(argument.clone());
    }
    arguments.push(OsString::from("--role"));
    arguments.push(OsString::from("worker"));
    arguments
}
