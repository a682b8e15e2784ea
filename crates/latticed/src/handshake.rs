//! Launcher/worker readiness handshake.
//!
//! A worker launched by the daemonizer inherits descriptor 3 as a one-shot
//! channel back to its launcher. The worker writes its PID and transport
//! port as two newline-terminated decimal strings, in that order, and closes
//! the channel; the launcher reads until the channel closes and expects
//! exactly those two integers. Nothing else ever travels this channel.

use std::fs::File;
use std::io::{self, Read, Write};
use std::num::ParseIntError;
#[cfg(unix)]
use std::os::fd::{FromRawFd, RawFd};

use thiserror::Error;

/// Descriptor number the launcher wires the channel to in the worker.
#[cfg(unix)]
pub const READY_CHANNEL_FD: RawFd = 3;

/// The one-shot readiness message, worker to launcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadinessReport {
    /// Worker process id.
    pub pid: u32,
    /// Port the worker's transport endpoint listens on.
    pub port: u16,
}

/// Errors surfaced on either side of the handshake.
#[derive(Debug, Error)]
pub enum HandshakeError {
    /// Writing to the channel failed; unrecoverable on the worker side.
    #[error("failed to write readiness message: {source}")]
    Write {
        #[source]
        source: io::Error,
    },
    /// Reading from the channel failed.
    #[error("failed to read readiness message: {source}")]
    Read {
        #[source]
        source: io::Error,
    },
    /// A token on the channel was not a decimal integer.
    #[error("readiness message carried a malformed value '{token}': {source}")]
    Parse {
        /// Offending token.
        token: String,
        #[source]
        source: ParseIntError,
    },
    /// The channel closed before both values arrived.
    #[error("readiness channel closed after {found} of 2 values")]
    Truncated {
        /// Number of values that did arrive.
        found: usize,
    },
    /// The channel carried data beyond the two expected values.
    #[error("unexpected trailing data on readiness channel: '{token}'")]
    Trailing {
        /// First unexpected token.
        token: String,
    },
}

/// Worker-side sink the readiness message is sent through.
pub trait ReadySink {
    /// Transmits the report exactly once and closes the channel.
    fn send(&self, report: ReadinessReport) -> Result<(), HandshakeError>;
}

/// Sink writing to the descriptor inherited from the launcher.
#[derive(Debug, Default, Clone, Copy)]
pub struct InheritedChannelSink;

#[cfg(unix)]
impl ReadySink for InheritedChannelSink {
    fn send(&self, report: ReadinessReport) -> Result<(), HandshakeError> {
        // Takes ownership of the descriptor; dropping the file closes the
        // channel, which is the launcher's end-of-message signal.
        let mut channel = unsafe { File::from_raw_fd(READY_CHANNEL_FD) };
        write_report(&mut channel, report)
    }
}

/// Serialises the report onto `writer` in wire order: PID first, then port.
pub fn write_report<W: Write>(writer: &mut W, report: ReadinessReport) -> Result<(), HandshakeError> {
    writeln!(writer, "{}", report.pid).map_err(|source| HandshakeError::Write { source })?;
    writeln!(writer, "{}", report.port).map_err(|source| HandshakeError::Write { source })?;
    writer
        .flush()
        .map_err(|source| HandshakeError::Write { source })
}

/// Reads the channel to EOF and parses exactly two integers.
pub fn read_report<R: Read>(reader: &mut R) -> Result<ReadinessReport, HandshakeError> {
    let mut raw = String::new();
    reader
        .read_to_string(&mut raw)
        .map_err(|source| HandshakeError::Read { source })?;

    let mut tokens = raw.split_whitespace();
    let pid = parse_token(tokens.next(), 0)?;
    let port = parse_token(tokens.next(), 1)?;
    if let Some(extra) = tokens.next() {
        return Err(HandshakeError::Trailing {
            token: extra.to_owned(),
        });
    }
    Ok(ReadinessReport { pid, port })
}

fn parse_token<T: std::str::FromStr<Err = ParseIntError>>(
    token: Option<&str>,
    found: usize,
) -> Result<T, HandshakeError> {
    let token = token.ok_or(HandshakeError::Truncated { found })?;
    token.parse().map_err(|source| HandshakeError::Parse {
        token: token.to_owned(),
        source,
    })
}
