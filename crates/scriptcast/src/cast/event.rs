//! Cast event model.

use crate::error::ContractError;

/// A single timestamped event in a cast stream.
///
/// The first four variants correspond one-to-one to wire record kinds.
/// `Comment` is internal only: it represents a pending status-bar
/// annotation and has no wire representation. It must be converted to an
/// `Output` event (see `CommentFilter`) before serialization.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Bytes written to the terminal by the recorded program (`o`).
    Output {
        /// Seconds since recording start.
        time: f64,
        /// Raw output text.
        data: String,
    },
    /// Bytes fed to the recorded program (`i`).
    Input {
        /// Seconds since recording start.
        time: f64,
        /// Raw input text.
        data: String,
    },
    /// A named bookmark with no rendering effect (`m`).
    Marker {
        /// Seconds since recording start.
        time: f64,
        /// Bookmark label.
        label: String,
    },
    /// A terminal geometry change (`r`).
    Resize {
        /// Seconds since recording start.
        time: f64,
        /// New width in columns.
        cols: u16,
        /// New height in rows.
        rows: u16,
    },
    /// A pending status-bar annotation. Not a wire kind.
    Comment {
        /// Seconds since recording start.
        time: f64,
        /// Render at the top of the screen rather than the bottom.
        top: bool,
        /// Annotation text.
        text: String,
    },
}

/// The wire shape of an event: time, one-character kind tag, payload.
#[derive(Debug, Clone, PartialEq)]
pub struct EventRecord {
    /// Seconds since recording start.
    pub time: f64,
    /// Wire kind tag (`o`, `i`, `r`, `m`).
    pub code: char,
    /// Kind-dependent payload.
    pub data: String,
}

impl Event {
    /// Create an output event.
    #[must_use]
    pub fn output(time: f64, data: impl Into<String>) -> Self {
        Self::Output {
            time,
            data: data.into(),
        }
    }

    /// Create an input event.
    #[must_use]
    pub fn input(time: f64, data: impl Into<String>) -> Self {
        Self::Input {
            time,
            data: data.into(),
        }
    }

    /// Create a marker event.
    #[must_use]
    pub fn marker(time: f64, label: impl Into<String>) -> Self {
        Self::Marker {
            time,
            label: label.into(),
        }
    }

    /// Create a resize event.
    #[must_use]
    pub fn resize(time: f64, cols: u16, rows: u16) -> Self {
        Self::Resize { time, cols, rows }
    }

    /// Create a comment event.
    #[must_use]
    pub fn comment(time: f64, top: bool, text: impl Into<String>) -> Self {
        Self::Comment {
            time,
            top,
            text: text.into(),
        }
    }

    /// The event time in seconds since recording start.
    #[must_use]
    pub const fn time(&self) -> f64 {
        match self {
            Self::Output { time, .. }
            | Self::Input { time, .. }
            | Self::Marker { time, .. }
            | Self::Resize { time, .. }
            | Self::Comment { time, .. } => *time,
        }
    }

    /// Whether this is a marker with the given label.
    #[must_use]
    pub fn is_marker_labeled(&self, wanted: &str) -> bool {
        matches!(self, Self::Marker { label, .. } if label == wanted)
    }

    /// Convert to the wire record shape.
    ///
    /// Comments have no wire representation; attempting to convert one is
    /// a contract violation, not a recoverable data error.
    pub fn to_record(&self) -> Result<EventRecord, ContractError> {
        match self {
            Self::Output { time, data } => Ok(EventRecord {
                time: *time,
                code: 'o',
                data: data.clone(),
            }),
            Self::Input { time, data } => Ok(EventRecord {
                time: *time,
                code: 'i',
                data: data.clone(),
            }),
            Self::Marker { time, label } => Ok(EventRecord {
                time: *time,
                code: 'm',
                data: label.clone(),
            }),
            Self::Resize { time, cols, rows } => Ok(EventRecord {
                time: *time,
                code: 'r',
                data: format!("{cols}x{rows}"),
            }),
            Self::Comment { .. } => Err(ContractError::SerializingComment),
        }
    }
}
