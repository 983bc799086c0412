//! Composable transformations over a cast event stream.
//!
//! A filter is a pure stage from one event stream to another; stages
//! compose by sequential application in declared order. Filters are
//! configured through tagged [`FilterSpec`] descriptors, which is how
//! script files name them.

use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::cast::{AsciiCast, Event, Header};
use crate::error::{ConfigError, Result};

/// A single transformation stage over an event stream.
pub trait EventFilter: fmt::Debug + Send + Sync {
    /// Transform the event stream. The header is read-only context
    /// (geometry for status-bar rendering).
    fn apply(&self, header: &Header, events: Vec<Event>) -> Vec<Event>;
}

/// Rewrites the payload of every output event with a regex substitution.
///
/// All other event kinds pass through unchanged. The replacement text uses
/// the regex crate's backreference syntax (`$1`, `${name}`).
#[derive(Debug)]
pub struct RegexReplacementFilter {
    pattern: Regex,
    replacement: String,
}

impl RegexReplacementFilter {
    /// Compile a replacement filter. Fails on an invalid pattern.
    pub fn new(pattern: &str, replacement: impl Into<String>) -> Result<Self> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            replacement: replacement.into(),
        })
    }
}

impl EventFilter for RegexReplacementFilter {
    fn apply(&self, _header: &Header, events: Vec<Event>) -> Vec<Event> {
        events
            .into_iter()
            .map(|event| match event {
                Event::Output { time, data } => {
                    let data = self
                        .pattern
                        .replace_all(&data, self.replacement.as_str())
                        .into_owned();
                    Event::Output { time, data }
                }
                other => other,
            })
            .collect()
    }
}

/// Drops all events up to and including the first marker with the given
/// label.
///
/// If no such marker exists the output is empty: nothing found means
/// nothing kept.
#[derive(Debug, Clone)]
pub struct StartMarkerFilter {
    label: String,
}

impl StartMarkerFilter {
    /// Create a start-marker filter for the given label.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

impl EventFilter for StartMarkerFilter {
    fn apply(&self, _header: &Header, events: Vec<Event>) -> Vec<Event> {
        let mut started = false;
        events
            .into_iter()
            .filter(|event| {
                if started {
                    true
                } else {
                    if event.is_marker_labeled(&self.label) {
                        started = true;
                    }
                    false
                }
            })
            .collect()
    }
}

/// Keeps all events strictly before the first marker with the given label.
///
/// If no such marker exists the input passes through unchanged. This is
/// deliberately asymmetric with [`StartMarkerFilter`].
#[derive(Debug, Clone)]
pub struct EndMarkerFilter {
    label: String,
}

impl EndMarkerFilter {
    /// Create an end-marker filter for the given label.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

impl EventFilter for EndMarkerFilter {
    fn apply(&self, _header: &Header, events: Vec<Event>) -> Vec<Event> {
        events
            .into_iter()
            .take_while(|event| !event.is_marker_labeled(&self.label))
            .collect()
    }
}

/// Converts every comment event into an output event that paints the
/// comment text onto a status line.
///
/// The synthesized sequence saves the cursor, jumps to column 1 of the
/// status row (row 1 for top placement, the last row otherwise), writes
/// the text centered across the full terminal width in reverse video, and
/// restores the cursor.
#[derive(Debug, Clone, Default)]
pub struct CommentFilter;

impl CommentFilter {
    /// Create a comment filter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn render(text: &str, width: usize, row: u16) -> String {
        format!("\u{1b}[s\u{1b}[{row};1H\u{1b}[7m{text:^width$}\u{1b}[m\u{1b}[u")
    }
}

impl EventFilter for CommentFilter {
    fn apply(&self, header: &Header, events: Vec<Event>) -> Vec<Event> {
        let width = usize::from(header.width);
        events
            .into_iter()
            .map(|event| match event {
                Event::Comment { time, top, text } => {
                    let row = if top { 1 } else { header.height };
                    Event::output(time, Self::render(&text, width, row))
                }
                other => other,
            })
            .collect()
    }
}

/// A tagged filter descriptor, as written in script files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "filter_id")]
pub enum FilterSpec {
    /// Regex substitution on output payloads.
    RegexReplacementFilter {
        /// Pattern to search for.
        regex: String,
        /// Replacement text, with `$n` backreferences.
        replacement: String,
    },
    /// Trim everything up to and including a marker.
    StartMarkerFilter {
        /// Label of the marker to start from.
        start_label: String,
    },
    /// Trim a marker and everything after it.
    EndMarkerFilter {
        /// Label of the marker to end at.
        end_label: String,
    },
    /// Render comments as status-line output.
    CommentFilter,
}

impl FilterSpec {
    /// Decode a descriptor from a generic configuration record.
    ///
    /// Unknown filter kinds are a configuration error surfaced to the
    /// caller, never silently ignored.
    pub fn from_value(value: &Value) -> Result<Self> {
        let table = value
            .as_object()
            .ok_or_else(|| ConfigError::invalid_script("filter must be a table"))?;
        let name = table
            .get("filter_id")
            .and_then(Value::as_str)
            .ok_or_else(|| ConfigError::invalid_script("filter is missing filter_id"))?;
        match name {
            "RegexReplacementFilter" | "StartMarkerFilter" | "EndMarkerFilter"
            | "CommentFilter" => serde_json::from_value(value.clone())
                .map_err(|e| ConfigError::invalid_script(e.to_string()).into()),
            other => Err(ConfigError::unknown_filter_kind(other).into()),
        }
    }

    /// Build the filter this descriptor names.
    ///
    /// Regex patterns are compiled eagerly, so a bad pattern fails here
    /// rather than mid-stream.
    pub fn build(&self) -> Result<Box<dyn EventFilter>> {
        match self {
            Self::RegexReplacementFilter { regex, replacement } => Ok(Box::new(
                RegexReplacementFilter::new(regex, replacement.clone())?,
            )),
            Self::StartMarkerFilter { start_label } => {
                Ok(Box::new(StartMarkerFilter::new(start_label.clone())))
            }
            Self::EndMarkerFilter { end_label } => {
                Ok(Box::new(EndMarkerFilter::new(end_label.clone())))
            }
            Self::CommentFilter => Ok(Box::new(CommentFilter::new())),
        }
    }
}

/// An ordered chain of filter stages.
#[derive(Debug, Default)]
pub struct FilterChain {
    stages: Vec<Box<dyn EventFilter>>,
}

impl FilterChain {
    /// Create an empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a chain from descriptors, in declared order.
    pub fn from_specs(specs: &[FilterSpec]) -> Result<Self> {
        let stages = specs.iter().map(FilterSpec::build).collect::<Result<_>>()?;
        Ok(Self { stages })
    }

    /// Append a stage.
    #[must_use]
    pub fn with_stage(mut self, stage: Box<dyn EventFilter>) -> Self {
        self.stages.push(stage);
        self
    }

    /// Number of stages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Whether the chain has no stages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Run every stage in order, each stage's output feeding the next.
    #[must_use]
    pub fn apply(&self, cast: AsciiCast) -> AsciiCast {
        let AsciiCast { header, mut events } = cast;
        for stage in &self.stages {
            events = stage.apply(&header, events);
        }
        AsciiCast::with_events(header, events)
    }
}
