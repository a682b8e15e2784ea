//! Node transport endpoint.
//!
//! Bootstrap opens exactly one endpoint per process. The endpoint must be
//! live before any anchor advertises it, so opening reports both the actual
//! listening port (the bind may request an ephemeral one) and the address
//! peers should dial.

use std::io;
use std::net::{TcpListener, ToSocketAddrs};

use thiserror::Error;
use tracing::info;

use lattice_config::NodeIdentity;

const TRANSPORT_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::transport");

/// Surface the sequencer needs from an open endpoint.
pub trait Transport {
    /// Actual listening port.
    fn port(&self) -> u16;

    /// Address peers should dial, as `host:port`.
    fn reachable_addr(&self) -> &str;
}

/// Trait implemented by types capable of opening a transport endpoint.
pub trait TransportFactory {
    /// Endpoint type produced by a successful open.
    type Endpoint: Transport;

    /// Binds an endpoint for `identity`, returning it once it is live.
    fn open(&self, identity: &NodeIdentity) -> Result<Self::Endpoint, TransportError>;
}

/// Errors surfaced while opening a transport endpoint.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Binding the listener failed.
    #[error("failed to bind transport listener on {addr}: {source}")]
    Bind {
        /// Requested bind address.
        addr: String,
        #[source]
        source: io::Error,
    },
    /// The bound listener could not report its local address.
    #[error("failed to resolve bound transport address: {source}")]
    LocalAddr {
        #[source]
        source: io::Error,
    },
}

/// TCP endpoint backing the node's runtime traffic.
#[derive(Debug)]
pub struct TcpTransport {
    listener: TcpListener,
    port: u16,
    reachable_addr: String,
}

impl TcpTransport {
    /// Binds a listener for `identity` and resolves the reachable address.
    ///
    /// The advertised host takes precedence over the bound IP so nodes behind
    /// NAT or with a wildcard bind still publish a dialable address.
    pub fn open(identity: &NodeIdentity) -> Result<Self, TransportError> {
        let listener =
            TcpListener::bind(identity.bind_addr).map_err(|source| TransportError::Bind {
                addr: identity.bind_addr.to_string(),
                source,
            })?;
        let local = listener
            .local_addr()
            .map_err(|source| TransportError::LocalAddr { source })?;
        let host = identity
            .advertise_host
            .clone()
            .unwrap_or_else(|| local.ip().to_string());
        let reachable_addr = format!("{host}:{}", local.port());
        info!(
            target: TRANSPORT_TARGET,
            pid = identity.pid,
            bind = %identity.bind_addr,
            port = local.port(),
            reachable = %reachable_addr,
            "transport endpoint open"
        );
        Ok(Self {
            listener,
            port: local.port(),
            reachable_addr,
        })
    }

    /// Consumes the endpoint, yielding the listener for a runtime to drive.
    #[must_use]
    pub fn into_listener(self) -> TcpListener {
        self.listener
    }
}

impl Transport for TcpTransport {
    fn port(&self) -> u16 {
        self.port
    }

    fn reachable_addr(&self) -> &str {
        self.reachable_addr.as_str()
    }
}

/// Factory binding [`TcpTransport`] endpoints.
#[derive(Debug, Default, Clone, Copy)]
pub struct TcpTransportFactory;

impl TcpTransportFactory {
    /// Builds a new factory.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl TransportFactory for TcpTransportFactory {
    type Endpoint = TcpTransport;

    fn open(&self, identity: &NodeIdentity) -> Result<Self::Endpoint, TransportError> {
        TcpTransport::open(identity)
    }
}
