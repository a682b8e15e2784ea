//! Derives the on-disk artefacts a worker owns inside its work directory.
//!
//! A worker's work directory hosts exactly one runtime artefact: the lock
//! file guarding single occupancy. The daemon and its tests need to agree on
//! the file name, so the derivation lives here rather than in the daemon.

use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use thiserror::Error;

use crate::Config;

/// Fixed name of the occupancy lock inside a worker's work directory.
pub const LOCK_FILE_NAME: &str = "latticed.lock";

/// Canonical paths for the artefacts written under the work directory.
#[derive(Debug, Clone)]
pub struct WorkPaths {
    work_dir: Utf8PathBuf,
    lock_path: Utf8PathBuf,
}

impl WorkPaths {
    /// Derives work-directory paths from the shared configuration.
    ///
    /// Creates the work directory when it does not exist yet; the lock file
    /// itself is only ever created by the worker's exclusivity guard.
    pub fn from_config(config: &Config) -> Result<Self, WorkPathsError> {
        let work_dir = config.work_dir.clone();
        fs::create_dir_all(&work_dir).map_err(|source| WorkPathsError::WorkDirectory {
            path: work_dir.clone(),
            source,
        })?;
        Ok(Self {
            lock_path: work_dir.join(LOCK_FILE_NAME),
            work_dir,
        })
    }

    /// Directory the worker claims ownership of.
    #[must_use]
    pub fn work_dir(&self) -> &Utf8Path {
        self.work_dir.as_path()
    }

    /// Path to the occupancy lock file.
    #[must_use]
    pub fn lock_path(&self) -> &Utf8Path {
        self.lock_path.as_path()
    }
}

/// Errors raised while deriving work-directory paths.
#[derive(Debug, Error)]
pub enum WorkPathsError {
    /// Creating the work directory failed.
    #[error("failed to prepare work directory '{path}': {source}")]
    WorkDirectory {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
}
