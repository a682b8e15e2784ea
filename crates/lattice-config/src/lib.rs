//! Shared configuration for lattice node processes.
//!
//! Every role reads the same configuration exactly once at process start:
//! layered from built-in defaults, an optional TOML file (`--config-path` or
//! `LATTICED_CONFIG_PATH`), `LATTICED_*` environment variables, and CLI
//! flags, in that order of precedence. The resolved [`Config`] is immutable
//! for the lifetime of the process; components receive it by reference.

mod logging;
mod node;
mod paths;
mod role;

use std::ffi::OsString;
use std::sync::Arc;

use camino::Utf8PathBuf;
use ortho_config::{OrthoConfig, OrthoError};
use serde::{Deserialize, Serialize};

pub use logging::{LogFormat, LogFormatParseError};
pub use node::{IdentityError, InstallLayout, NodeIdentity};
pub use paths::{LOCK_FILE_NAME, WorkPaths, WorkPathsError};
pub use role::{Role, RoleParseError};

/// Resolved node configuration.
///
/// Field semantics follow the bootstrap order: the role decides which
/// sequence runs, the registry and namespace fields feed the coordination
/// clients, the install fields configure the local executor, and the
/// bind/advertise pair shapes the transport endpoint whose address the
/// configured anchors are registered under.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "LATTICED")]
pub struct Config {
    /// Raw role value; parsed by [`Config::role`]. Empty selects `main`.
    #[ortho_config(default = String::new())]
    pub role: String,

    /// Registry (coordination service) addresses, tried in order.
    #[ortho_config(default = vec![String::from("127.0.0.1:2181")])]
    pub registry_hosts: Vec<String>,

    /// Registry namespace the anchor registrations live under.
    #[ortho_config(default = Utf8PathBuf::from("/lattice/anchor"))]
    pub anchor_dir: Utf8PathBuf,

    /// Registry namespace for durable node state.
    #[ortho_config(default = Utf8PathBuf::from("/lattice/durable"))]
    pub durable_dir: Utf8PathBuf,

    /// Registry namespace for the issue tracker.
    #[ortho_config(default = Utf8PathBuf::from("/lattice/issue"))]
    pub issue_dir: Utf8PathBuf,

    /// Directory holding the runtime's shared libraries.
    #[ortho_config(default = Utf8PathBuf::from("/usr/local/lib/lattice"))]
    pub lib_path: Utf8PathBuf,

    /// Worker binary the local executor launches.
    #[ortho_config(default = Utf8PathBuf::from("latticed"))]
    pub worker_binary: Utf8PathBuf,

    /// Directory spawned processes are confined to.
    #[ortho_config(default = Utf8PathBuf::from("sandbox"))]
    pub sandbox_dir: Utf8PathBuf,

    /// Address the transport binds; `ip:port`, port 0 for ephemeral.
    #[ortho_config(default = String::from("0.0.0.0:0"))]
    pub bind_addr: String,

    /// Host advertised to peers instead of the bound IP.
    pub advertise_host: Option<String>,

    /// Anchor names registered during bootstrap, in order.
    #[ortho_config(default = Vec::new())]
    pub anchors: Vec<String>,

    /// Directory a worker claims exclusive ownership of.
    #[ortho_config(default = Utf8PathBuf::from("."))]
    pub work_dir: Utf8PathBuf,

    /// Tracing filter expression.
    #[ortho_config(default = String::from("info"))]
    pub log_filter: String,

    /// Log output format.
    #[ortho_config(default = LogFormat::Json)]
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            role: String::new(),
            registry_hosts: vec![String::from("127.0.0.1:2181")],
            anchor_dir: Utf8PathBuf::from("/lattice/anchor"),
            durable_dir: Utf8PathBuf::from("/lattice/durable"),
            issue_dir: Utf8PathBuf::from("/lattice/issue"),
            lib_path: Utf8PathBuf::from("/usr/local/lib/lattice"),
            worker_binary: Utf8PathBuf::from("latticed"),
            sandbox_dir: Utf8PathBuf::from("sandbox"),
            bind_addr: String::from("0.0.0.0:0"),
            advertise_host: None,
            anchors: Vec::new(),
            work_dir: Utf8PathBuf::from("."),
            log_filter: String::from("info"),
            log_format: LogFormat::Json,
        }
    }
}

impl Config {
    /// Loads configuration from process arguments, the environment, and any
    /// configured file.
    pub fn load() -> Result<Self, Arc<OrthoError>> {
        <Self as OrthoConfig>::load()
    }

    /// Loads configuration from an explicit argument iterator; used by tests
    /// and by callers that pre-filter argv.
    pub fn load_from_iter<I, T>(args: I) -> Result<Self, Arc<OrthoError>>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        <Self as OrthoConfig>::load_from_iter(args)
    }

    /// Parses the configured role value.
    ///
    /// Unrecognised values surface a [`RoleParseError`] naming the value;
    /// role mistakes are configuration errors, never retried.
    pub fn role(&self) -> Result<Role, RoleParseError> {
        self.role.parse()
    }

    /// Returns the tracing filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        self.log_filter.as_str()
    }

    /// Returns the configured log output format.
    #[must_use]
    pub fn log_format(&self) -> LogFormat {
        self.log_format
    }
}
