//! Placeholder registry and runtime providers used while the real backends
//! are implemented.
//!
//! These keep every seam of the bootstrap sequence exercised end to end: a
//! node comes up, binds, registers, and signals readiness, with registration
//! accepted locally instead of written to a live registry.

use lattice_cluster::{
    Namespace, RegistrationError, RegistryClient, RegistryError, RegistryProvider, RuntimeBinder,
    RuntimeError, TcpTransport,
};
use lattice_config::Config;

const PLACEHOLDER_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::placeholder");

/// Registry provider that accepts every connect and registration locally.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct LocalRegistryProvider;

/// Client handed out by [`LocalRegistryProvider`].
#[derive(Debug)]
pub(crate) struct LocalRegistryClient {
    namespace: Namespace,
}

impl RegistryProvider for LocalRegistryProvider {
    type Client = LocalRegistryClient;

    fn connect(&self, namespace: Namespace, config: &Config) -> Result<Self::Client, RegistryError> {
        tracing::warn!(
            target: PLACEHOLDER_TARGET,
            namespace = %namespace,
            dir = %namespace.dir(config),
            hosts = ?config.registry_hosts,
            "registry backend not yet wired; accepting connect locally"
        );
        Ok(LocalRegistryClient { namespace })
    }
}

impl RegistryClient for LocalRegistryClient {
    fn register(&mut self, name: &str, address: &str) -> Result<(), RegistrationError> {
        tracing::warn!(
            target: PLACEHOLDER_TARGET,
            namespace = %self.namespace,
            anchor = name,
            address,
            "registry backend not yet wired; accepting registration locally"
        );
        Ok(())
    }
}

/// Runtime binder that parks the endpoint until a real runtime exists.
///
/// Holding the listener keeps the advertised address dialable, which is what
/// the readiness contract promises a launcher.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct IdleRuntimeBinder;

/// Runtime handle produced by [`IdleRuntimeBinder`].
#[derive(Debug)]
pub(crate) struct IdleRuntime {
    _listener: std::net::TcpListener,
}

impl RuntimeBinder<TcpTransport> for IdleRuntimeBinder {
    type Runtime = IdleRuntime;

    fn bind(&self, endpoint: TcpTransport) -> Result<Self::Runtime, RuntimeError> {
        tracing::warn!(
            target: PLACEHOLDER_TARGET,
            "execution runtime not yet wired; holding the endpoint idle"
        );
        Ok(IdleRuntime {
            _listener: endpoint.into_listener(),
        })
    }
}
