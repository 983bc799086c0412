//! Asciicast v2 header model.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The format version this library reads and writes.
pub const FORMAT_VERSION: u32 = 2;

/// Terminal color theme carried in a cast header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Theme {
    /// Default foreground color.
    pub fg: String,
    /// Default background color.
    pub bg: String,
    /// 16- or 256-color palette.
    pub palette: Vec<String>,
}

/// Asciicast v2 header.
///
/// Optional fields are omitted from the wire record when absent, matching
/// the sparse-field convention of the format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Header {
    /// Format version.
    pub version: u32,
    /// Terminal width in character cells.
    pub width: u16,
    /// Terminal height in character cells.
    pub height: u16,
    /// Capture timestamp (Unix seconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<u64>,
    /// Total duration in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    /// Idle time limit in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idle_time_limit: Option<f64>,
    /// Originating command.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    /// Recording title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Captured environment variables.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env: Option<BTreeMap<String, String>>,
    /// Color theme.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
}

impl Default for Header {
    fn default() -> Self {
        Self::new(80, 24)
    }
}

impl Header {
    /// Create a header with the given geometry and no optional fields.
    #[must_use]
    pub const fn new(width: u16, height: u16) -> Self {
        Self {
            version: FORMAT_VERSION,
            width,
            height,
            timestamp: None,
            duration: None,
            idle_time_limit: None,
            command: None,
            title: None,
            env: None,
            theme: None,
        }
    }

    /// Set the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the originating command.
    #[must_use]
    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = Some(command.into());
        self
    }

    /// Convert to the wire record, omitting absent optional fields.
    #[must_use]
    pub fn to_record(&self) -> serde_json::Value {
        // Serialization of this struct cannot fail: all keys are strings
        // and all values are JSON-representable.
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_header_is_sparse() {
        let header = Header::new(80, 24);
        let record = header.to_record();
        let obj = record.as_object().unwrap();
        assert_eq!(obj.len(), 3);
        assert_eq!(obj["version"], 2);
        assert_eq!(obj["width"], 80);
        assert_eq!(obj["height"], 24);
    }

    #[test]
    fn optional_fields_present_when_set() {
        let header = Header::new(120, 40)
            .with_title("Demo")
            .with_command("/bin/zsh");
        let record = header.to_record();
        assert_eq!(record["title"], "Demo");
        assert_eq!(record["command"], "/bin/zsh");
        assert!(record.get("timestamp").is_none());
    }

    #[test]
    fn header_decodes_from_wire_record() {
        let line = r##"{"version": 2, "width": 80, "height": 24,
            "timestamp": 1704067200, "idle_time_limit": 2.5,
            "env": {"SHELL": "/bin/bash"},
            "theme": {"fg": "#d0d0d0", "bg": "#000000", "palette": ["#000000"]}}"##;
        let header: Header = serde_json::from_str(line).unwrap();
        assert_eq!(header.width, 80);
        assert_eq!(header.timestamp, Some(1704067200));
        assert_eq!(header.idle_time_limit, Some(2.5));
        assert_eq!(
            header.env.unwrap().get("SHELL").map(String::as_str),
            Some("/bin/bash")
        );
        assert_eq!(header.theme.unwrap().fg, "#d0d0d0");
    }

    #[test]
    fn unknown_header_field_is_rejected() {
        let line = r#"{"version": 2, "width": 80, "height": 24, "frobnicate": 1}"#;
        assert!(serde_json::from_str::<Header>(line).is_err());
    }

    #[test]
    fn missing_required_field_is_rejected() {
        let line = r#"{"version": 2, "width": 80}"#;
        assert!(serde_json::from_str::<Header>(line).is_err());
    }
}
