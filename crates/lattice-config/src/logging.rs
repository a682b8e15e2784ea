//! Logging knobs shared by every role.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Output format for the node's structured log stream.
#[derive(
    Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum LogFormat {
    /// Machine-readable JSON lines.
    #[default]
    Json,
    /// Single-line human-readable output for interactive runs.
    Compact,
}

/// Errors encountered while parsing a [`LogFormat`] from text.
pub type LogFormatParseError = strum::ParseError;
