//! Work-directory occupancy lock.
//!
//! A worker claims its work directory by creating the fixed-name lock file
//! with exclusive-create semantics. The handle keeps the file open for the
//! life of the process and is never removed: release happens implicitly when
//! the process exits, and a file left behind by a crash deliberately keeps
//! the directory fenced until an operator removes it. There is no staleness
//! probing and no waiting.

use std::fs::{File, OpenOptions};
use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use thiserror::Error;
use tracing::info;

use lattice_config::WorkPaths;

const LOCK_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::lockfile");

/// Errors surfaced while claiming the work directory.
#[derive(Debug, Error)]
pub enum LockError {
    /// Another holder already owns the lock file.
    #[error("work directory already locked by '{path}'; remove the file if no worker is running")]
    AlreadyLocked {
        /// Existing lock file.
        path: Utf8PathBuf,
    },
    /// Creating the lock file failed.
    #[error("failed to create lock file '{path}': {source}")]
    Io {
        /// Lock file path.
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Exclusive ownership token over a worker's work directory.
#[derive(Debug)]
pub struct WorkDirLock {
    path: Utf8PathBuf,
    _file: File,
}

impl WorkDirLock {
    /// Claims the work directory by creating its lock file.
    pub fn acquire(paths: &WorkPaths) -> Result<Self, LockError> {
        let mut options = OpenOptions::new();
        options.write(true).create_new(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let path = paths.lock_path();
        match options.open(path.as_std_path()) {
            Ok(file) => {
                info!(
                    target: LOCK_TARGET,
                    file = %path,
                    "acquired work directory lock"
                );
                Ok(Self {
                    path: path.to_path_buf(),
                    _file: file,
                })
            }
            Err(error) if error.kind() == io::ErrorKind::AlreadyExists => {
                Err(LockError::AlreadyLocked {
                    path: path.to_path_buf(),
                })
            }
            Err(source) => Err(LockError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Path of the held lock file.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        self.path.as_path()
    }
}
