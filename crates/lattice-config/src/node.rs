//! Typed views over the raw configuration consumed by the bootstrap steps.

use std::net::{AddrParseError, SocketAddr};

use camino::Utf8PathBuf;
use thiserror::Error;

use crate::Config;

/// Identity under which a node opens its transport endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeIdentity {
    /// Operating-system process id of this node.
    pub pid: u32,
    /// Address the transport binds; port 0 requests an ephemeral port.
    pub bind_addr: SocketAddr,
    /// Host other nodes should dial; falls back to the bound IP when unset.
    pub advertise_host: Option<String>,
}

/// Errors raised while assembling a [`NodeIdentity`].
#[derive(Debug, Error)]
pub enum IdentityError {
    /// The configured bind address did not parse as `ip:port`.
    #[error("invalid bind address '{value}': {source}")]
    BindAddr {
        value: String,
        #[source]
        source: AddrParseError,
    },
}

/// Install paths the node-local process executor is configured from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallLayout {
    /// Directory holding the runtime's shared libraries.
    pub lib_path: Utf8PathBuf,
    /// Worker binary launched for remote execution requests.
    pub worker_binary: Utf8PathBuf,
    /// Directory spawned processes are confined to.
    pub sandbox_dir: Utf8PathBuf,
}

impl Config {
    /// Builds the node identity from the bind/advertise configuration and the
    /// current process id.
    pub fn node_identity(&self) -> Result<NodeIdentity, IdentityError> {
        let bind_addr = self
            .bind_addr
            .parse::<SocketAddr>()
            .map_err(|source| IdentityError::BindAddr {
                value: self.bind_addr.clone(),
                source,
            })?;
        Ok(NodeIdentity {
            pid: std::process::id(),
            bind_addr,
            advertise_host: self.advertise_host.clone(),
        })
    }

    /// Collects the install paths for the node-local executor.
    #[must_use]
    pub fn install_layout(&self) -> InstallLayout {
        InstallLayout {
            lib_path: self.lib_path.clone(),
            worker_binary: self.worker_binary.clone(),
            sandbox_dir: self.sandbox_dir.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_uses_current_pid_and_parses_bind_addr() {
        let config = Config {
            bind_addr: "127.0.0.1:0".into(),
            advertise_host: Some("node-7.example".into()),
            ..Config::default()
        };
        let identity = config.node_identity().expect("identity should build");
        assert_eq!(identity.pid, std::process::id());
        assert_eq!(identity.bind_addr.port(), 0);
        assert_eq!(identity.advertise_host.as_deref(), Some("node-7.example"));
    }

    #[test]
    fn malformed_bind_addr_names_the_value() {
        let config = Config {
            bind_addr: "nowhere".into(),
            ..Config::default()
        };
        let error = config.node_identity().expect_err("identity should fail");
        assert!(error.to_string().contains("nowhere"));
    }
}
