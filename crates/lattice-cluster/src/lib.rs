//! Collaborator seams bound by the lattice node bootstrap.
//!
//! The bootstrap sequence binds, in order: three registry clients (one per
//! namespace), the node-local process executor, a transport endpoint, and the
//! execution runtime that consumes the endpoint. This crate defines the
//! operations bootstrap invokes on each of those collaborators, the
//! production TCP transport, and the error types each seam may surface.
//! Registry and runtime implementations live with the services themselves;
//! the daemon injects them when wiring a node.

mod executor;
mod registry;
mod runtime;
mod transport;

pub use executor::{ExecutorError, ProcessExecutor};
pub use registry::{
    Namespace, NamespaceParseError, RegistrationError, RegistryClient, RegistryError,
    RegistryProvider,
};
pub use runtime::{RuntimeBinder, RuntimeError};
pub use transport::{TcpTransport, TcpTransportFactory, Transport, TransportError, TransportFactory};
