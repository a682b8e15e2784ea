//! Node role selection.
//!
//! A lattice process runs in exactly one of three roles, chosen once at
//! startup from configuration. The empty string selects the default role so
//! an unconfigured node comes up as a foreground main.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Roles a node process can assume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Role {
    /// Foreground node: bootstraps and hands control back to the caller.
    #[default]
    Main,
    /// Background worker: bootstraps, signals readiness, then parks.
    Worker,
    /// Launcher: detaches a worker and relays its readiness.
    Daemonizer,
}

impl fmt::Display for Role {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Main => "main",
            Self::Worker => "worker",
            Self::Daemonizer => "daemonizer",
        };
        formatter.write_str(label)
    }
}

/// Error returned when a role value is not recognised.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unrecognized node role '{0}'")]
pub struct RoleParseError(String);

impl RoleParseError {
    /// Creates a parse error describing the unsupported value.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the offending value that could not be parsed.
    #[must_use]
    pub fn value(&self) -> &str {
        self.0.as_str()
    }
}

impl FromStr for Role {
    type Err = RoleParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "" | "main" => Ok(Self::Main),
            "worker" => Ok(Self::Worker),
            "daemonizer" => Ok(Self::Daemonizer),
            other => Err(RoleParseError::new(other)),
        }
    }
}
