//! Execution-runtime binding seam.
//!
//! The runtime is opaque to bootstrap: it consumes the transport endpoint and
//! owns all traffic on it afterwards. Bootstrap's only obligations are to
//! bind it after the endpoint is live and before any anchor is registered.

use thiserror::Error;

/// Errors surfaced while binding the runtime atop the transport.
#[derive(Debug, Error)]
#[error("runtime bind failed: {message}")]
pub struct RuntimeError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl RuntimeError {
    /// Builds an error without an underlying source.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Builds an error that wraps an underlying source.
    #[must_use]
    pub fn with_source(
        message: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self {
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

/// Trait implemented by types capable of binding a runtime to an endpoint.
pub trait RuntimeBinder<T> {
    /// Handle to the bound runtime, held for the life of the process.
    type Runtime;

    /// Consumes the endpoint and brings the runtime up on it.
    fn bind(&self, endpoint: T) -> Result<Self::Runtime, RuntimeError>;
}
