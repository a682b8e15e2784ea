//! Node-local process executor.
//!
//! The executor is the client other parts of the runtime use to launch
//! sandboxed helper processes on this node. Bootstrap only configures it;
//! everything it is later asked to run belongs to the bound runtime.

use std::fs;
use std::io;

use camino::Utf8PathBuf;
use thiserror::Error;
use tracing::debug;

use lattice_config::InstallLayout;

const EXECUTOR_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::executor");

/// Errors surfaced while configuring the local executor.
#[derive(Debug, Error)]
pub enum ExecutorError {
    /// The sandbox directory could not be prepared.
    #[error("failed to prepare sandbox directory '{path}': {source}")]
    Sandbox {
        /// Directory that could not be created.
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Executor configured from the node's install layout.
#[derive(Debug, Clone)]
pub struct ProcessExecutor {
    layout: InstallLayout,
}

impl ProcessExecutor {
    /// Configures the executor, preparing the sandbox directory.
    pub fn configure(layout: InstallLayout) -> Result<Self, ExecutorError> {
        fs::create_dir_all(&layout.sandbox_dir).map_err(|source| ExecutorError::Sandbox {
            path: layout.sandbox_dir.clone(),
            source,
        })?;
        debug!(
            target: EXECUTOR_TARGET,
            lib = %layout.lib_path,
            binary = %layout.worker_binary,
            sandbox = %layout.sandbox_dir,
            "local executor configured"
        );
        Ok(Self { layout })
    }

    /// Install layout the executor was configured with.
    #[must_use]
    pub fn layout(&self) -> &InstallLayout {
        &self.layout
    }
}
