//! Registry (coordination service) client seams.
//!
//! The bootstrap sequence binds one registry client per namespace, in a fixed
//! order. The clients themselves are external collaborators; this module
//! defines the operations the sequencer invokes on them and the errors those
//! operations may surface. Connection, session handling, and retry policy all
//! belong to the provider implementations.

use std::fmt;
use std::str::FromStr;

use camino::Utf8Path;
use thiserror::Error;

use lattice_config::Config;

/// Registry namespaces a node binds during bootstrap, in bind order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// Discoverable name-to-address registrations.
    Anchor,
    /// Durable node state.
    Durable,
    /// Issue-tracking metadata.
    Issue,
}

impl Namespace {
    /// The three namespaces in the order bootstrap binds them.
    pub const BIND_ORDER: [Self; 3] = [Self::Anchor, Self::Durable, Self::Issue];

    /// Returns the configured registry path for this namespace.
    #[must_use]
    pub fn dir(self, config: &Config) -> &Utf8Path {
        match self {
            Self::Anchor => config.anchor_dir.as_path(),
            Self::Durable => config.durable_dir.as_path(),
            Self::Issue => config.issue_dir.as_path(),
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Anchor => "anchor",
            Self::Durable => "durable",
            Self::Issue => "issue",
        };
        formatter.write_str(label)
    }
}

/// Error returned when parsing a namespace name fails.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unsupported registry namespace: {0}")]
pub struct NamespaceParseError(String);

impl NamespaceParseError {
    /// Returns the offending value that could not be parsed.
    #[must_use]
    pub fn value(&self) -> &str {
        self.0.as_str()
    }
}

impl FromStr for Namespace {
    type Err = NamespaceParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "anchor" => Ok(Self::Anchor),
            "durable" => Ok(Self::Durable),
            "issue" => Ok(Self::Issue),
            other => Err(NamespaceParseError(other.to_owned())),
        }
    }
}

/// Errors surfaced while connecting a registry client.
#[derive(Debug, Error)]
#[error("registry connect for {namespace} namespace failed: {message}")]
pub struct RegistryError {
    /// Namespace whose client failed to connect.
    pub namespace: Namespace,
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl RegistryError {
    /// Builds an error without an underlying source.
    #[must_use]
    pub fn new(namespace: Namespace, message: impl Into<String>) -> Self {
        Self {
            namespace,
            message: message.into(),
            source: None,
        }
    }

    /// Builds an error that wraps an underlying source.
    #[must_use]
    pub fn with_source(
        namespace: Namespace,
        message: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self {
            namespace,
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Human-readable message describing the failure.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }
}

/// Errors surfaced while registering an anchor.
#[derive(Debug, Error)]
#[error("failed to register anchor '{anchor}': {message}")]
pub struct RegistrationError {
    /// Name of the anchor whose registration failed.
    pub anchor: String,
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl RegistrationError {
    /// Builds an error without an underlying source.
    #[must_use]
    pub fn new(anchor: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            anchor: anchor.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Builds an error that wraps an underlying source.
    #[must_use]
    pub fn with_source(
        anchor: impl Into<String>,
        message: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self {
            anchor: anchor.into(),
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Human-readable message describing the failure.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }
}

/// Operations the sequencer invokes on a bound registry client.
pub trait RegistryClient {
    /// Registers `name` as reachable at `address` under the client's
    /// namespace. Used only by the anchor-namespace client today; the durable
    /// and issue clients are bound for the rest of the process to use.
    fn register(&mut self, name: &str, address: &str) -> Result<(), RegistrationError>;
}

/// Trait implemented by types capable of connecting registry clients.
pub trait RegistryProvider {
    /// Client type produced by a successful connect.
    type Client: RegistryClient;

    /// Connects to the registry and scopes the session to `namespace`.
    ///
    /// Blocks until the connection is established or fails; the sequencer
    /// treats any error as fatal.
    fn connect(&self, namespace: Namespace, config: &Config) -> Result<Self::Client, RegistryError>;
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("anchor", Namespace::Anchor)]
    #[case("Durable", Namespace::Durable)]
    #[case(" issue ", Namespace::Issue)]
    fn namespace_names_parse(#[case] value: &str, #[case] expected: Namespace) {
        assert_eq!(value.parse::<Namespace>(), Ok(expected));
    }

    #[test]
    fn unknown_namespace_is_rejected() {
        let error = "ledger"
            .parse::<Namespace>()
            .expect_err("unknown namespace should fail");
        assert_eq!(error.value(), "ledger");
    }

    #[test]
    fn namespaces_resolve_their_configured_dirs() {
        let config = Config::default();
        assert_eq!(
            Namespace::Anchor.dir(&config),
            config.anchor_dir.as_path()
        );
        assert_eq!(Namespace::Issue.dir(&config), config.issue_dir.as_path());
    }

    #[test]
    fn registration_error_names_the_anchor() {
        let error = RegistrationError::new("svc/a", "namespace not writable");
        assert!(error.to_string().contains("svc/a"));
        assert_eq!(error.message(), "namespace not writable");
    }
}
