//! Error types for scriptcast.
//!
//! This module defines all error types used throughout the library.
//! Parsing, merging, and configuration each fail eagerly: a single bad line
//! invalidates an entire load, and a single un-convertible event invalidates
//! an entire save.

use std::path::PathBuf;

use thiserror::Error;

/// Structural errors in a cast file.
///
/// Event lines are numbered from 1; the header is line 0.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    /// The first line is not an object-shaped record.
    #[error("missing asciicast header")]
    MissingHeader,

    /// The header record did not decode into the expected fields.
    #[error("invalid asciicast header: {reason}")]
    InvalidHeader {
        /// What was wrong with the header record.
        reason: String,
    },

    /// The header declares a format version this library does not read.
    #[error("unsupported asciicast version {version} (expected 2)")]
    UnsupportedVersion {
        /// The version the file declared.
        version: i64,
    },

    /// An event line is not a 3-element record of the expected shape.
    #[error("invalid event on line {line}")]
    InvalidEvent {
        /// 1-based line number of the offending event.
        line: usize,
    },

    /// An event time is not a finite non-negative number.
    #[error("invalid event time on line {line}")]
    InvalidEventTime {
        /// 1-based line number of the offending event.
        line: usize,
    },

    /// An event kind tag is not one of `o`, `i`, `r`, `m`.
    #[error("invalid event kind {kind:?} on line {line}")]
    InvalidEventKind {
        /// The tag that was found.
        kind: String,
        /// 1-based line number of the offending event.
        line: usize,
    },

    /// A resize payload does not match `{cols}x{rows}`.
    #[error("invalid resize data {data:?} on line {line}")]
    InvalidResizeData {
        /// The payload that was found.
        data: String,
        /// 1-based line number of the offending event.
        line: usize,
    },
}

/// Violations of an API contract, as opposed to bad input data.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContractError {
    /// The batch of events handed to the merge was not sorted by time.
    #[error("events to insert must be sorted chronologically")]
    UnsortedInput,

    /// A comment event reached the serializer without being filtered.
    #[error("comment events must be converted to output before serializing")]
    SerializingComment,
}

/// Errors in script configuration data.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A filter descriptor names a kind this library does not provide.
    #[error("unknown filter kind {name:?}")]
    UnknownFilterKind {
        /// The `filter_id` tag that was found.
        name: String,
    },

    /// An action table names a kind this library does not provide.
    #[error("unknown action kind {name:?}")]
    UnknownActionKind {
        /// The `action_id` tag that was found.
        name: String,
    },

    /// A script file did not decode into the expected schema.
    #[error("invalid script: {reason}")]
    InvalidScript {
        /// What was wrong with the script data.
        reason: String,
    },

    /// The script format could not be determined from the file extension.
    #[error("unknown script format for {path}")]
    UnknownFormat {
        /// The path whose extension was not recognized.
        path: PathBuf,
    },
}

/// The main error type for scriptcast operations.
#[derive(Debug, Error)]
pub enum ScriptcastError {
    /// A cast file violated the wire format.
    #[error(transparent)]
    Format(#[from] FormatError),

    /// An API contract was violated by the caller.
    #[error(transparent)]
    Contract(#[from] ContractError),

    /// Script configuration data was invalid.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An I/O error occurred with additional context.
    #[error("{context}: {source}")]
    IoWithContext {
        /// What operation was being performed.
        context: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A replacement filter was given an invalid regex pattern.
    #[error("invalid regex pattern: {0}")]
    Regex(#[from] regex::Error),

    /// The recording session could not be driven to completion.
    #[error("session error: {reason}")]
    Session {
        /// What went wrong while driving the recording process.
        reason: String,
    },
}

/// Result type alias for scriptcast operations.
pub type Result<T> = std::result::Result<T, ScriptcastError>;

impl ScriptcastError {
    /// Create an I/O error with context.
    pub fn io_context(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::IoWithContext {
            context: context.into(),
            source,
        }
    }

    /// Create a session error.
    pub fn session(reason: impl Into<String>) -> Self {
        Self::Session {
            reason: reason.into(),
        }
    }

    /// Check if this is a cast format error.
    #[must_use]
    pub const fn is_format(&self) -> bool {
        matches!(self, Self::Format(_))
    }

    /// Check if this is a contract violation.
    #[must_use]
    pub const fn is_contract(&self) -> bool {
        matches!(self, Self::Contract(_))
    }

    /// The offending cast line number, if this error carries one.
    #[must_use]
    pub const fn line(&self) -> Option<usize> {
        match self {
            Self::Format(
                FormatError::InvalidEvent { line }
                | FormatError::InvalidEventTime { line }
                | FormatError::InvalidEventKind { line, .. }
                | FormatError::InvalidResizeData { line, .. },
            ) => Some(*line),
            _ => None,
        }
    }
}

impl FormatError {
    /// Create an invalid-header error from a decode failure.
    pub fn invalid_header(reason: impl Into<String>) -> Self {
        Self::InvalidHeader {
            reason: reason.into(),
        }
    }
}

impl ConfigError {
    /// Create an invalid-script error from a decode failure.
    pub fn invalid_script(reason: impl Into<String>) -> Self {
        Self::InvalidScript {
            reason: reason.into(),
        }
    }

    /// Create an unknown-filter-kind error.
    pub fn unknown_filter_kind(name: impl Into<String>) -> Self {
        Self::UnknownFilterKind { name: name.into() }
    }

    /// Create an unknown-action-kind error.
    pub fn unknown_action_kind(name: impl Into<String>) -> Self {
        Self::UnknownActionKind { name: name.into() }
    }
}
