//! Script actions.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ConfigError, Result};

/// One step of a scripted session.
///
/// In script files an action is either a bare string (a line to type with
/// the script's default delays) or a table tagged with `action_id`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Action {
    /// A line to type using the script-wide delay settings.
    Line(String),
    /// A tagged action table.
    Typed(TypedAction),
}

/// The tagged action kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action_id")]
pub enum TypedAction {
    /// A line to type with explicit newline delays.
    Input {
        /// Text to type, without the trailing newline.
        text: String,
        /// Seconds to wait before sending the newline.
        pre_nl_delay: f64,
        /// Seconds to wait after sending the newline.
        post_nl_delay: f64,
    },
    /// Record a named bookmark at the current point in the session.
    Marker {
        /// Bookmark label.
        label: String,
    },
    /// Show a status-bar annotation at the current point in the session.
    Comment {
        /// Annotation text.
        comment: String,
    },
}

impl Action {
    /// A plain line using the script-wide delays.
    #[must_use]
    pub fn line(text: impl Into<String>) -> Self {
        Self::Line(text.into())
    }

    /// A line with explicit newline delays.
    #[must_use]
    pub fn input(text: impl Into<String>, pre_nl_delay: f64, post_nl_delay: f64) -> Self {
        Self::Typed(TypedAction::Input {
            text: text.into(),
            pre_nl_delay,
            post_nl_delay,
        })
    }

    /// A marker bookmark.
    #[must_use]
    pub fn marker(label: impl Into<String>) -> Self {
        Self::Typed(TypedAction::Marker {
            label: label.into(),
        })
    }

    /// A status-bar comment.
    #[must_use]
    pub fn comment(text: impl Into<String>) -> Self {
        Self::Typed(TypedAction::Comment {
            comment: text.into(),
        })
    }

    /// Decode an action from a generic configuration record.
    ///
    /// Unknown action kinds are a configuration error surfaced to the
    /// caller, never silently ignored.
    pub fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::String(text) => Ok(Self::Line(text.clone())),
            Value::Object(table) => {
                let name = table
                    .get("action_id")
                    .and_then(Value::as_str)
                    .ok_or_else(|| ConfigError::invalid_script("action is missing action_id"))?;
                match name {
                    "Input" | "Marker" | "Comment" => serde_json::from_value(value.clone())
                        .map(Self::Typed)
                        .map_err(|e| ConfigError::invalid_script(e.to_string()).into()),
                    other => Err(ConfigError::unknown_action_kind(other).into()),
                }
            }
            _ => Err(ConfigError::invalid_script("action must be a string or a table").into()),
        }
    }
}
