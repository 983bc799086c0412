//! The script schema and its defaults.

use std::path::PathBuf;

use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::action::Action;
use crate::error::{ConfigError, Result};
use crate::filter::FilterSpec;

/// A closed interval of seconds, sampled uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DelayRange(pub f64, pub f64);

impl DelayRange {
    /// A degenerate range that always yields the same delay.
    #[must_use]
    pub const fn fixed(seconds: f64) -> Self {
        Self(seconds, seconds)
    }

    /// Draw a delay from the range.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> f64 {
        if self.0 < self.1 {
            rng.random_range(self.0..=self.1)
        } else {
            self.0
        }
    }
}

/// A scripted recording session.
///
/// Holds everything the runner needs (actions and timing) and everything
/// the post-processing pipeline needs (the ordered filter list).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Script {
    /// Where the recording is written.
    pub output_file: PathBuf,
    /// Seconds to wait after the recorder starts.
    pub start_delay: f64,
    /// Seconds to wait after the last action.
    pub end_delay: f64,
    /// Per-character typing delay range.
    pub typing_delay: DelayRange,
    /// Delay range before each newline.
    pub pre_nl_delay: DelayRange,
    /// Delay range after each newline.
    pub post_nl_delay: DelayRange,
    /// Whether status-bar comments are rendered during recording.
    pub with_comments: bool,
    /// Whether the status bar sits at the top of the screen.
    pub comments_at_top: bool,
    /// Terminal width override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cols: Option<u16>,
    /// Terminal height override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<u16>,
    /// The session steps, in order.
    pub actions: Vec<Action>,
    /// Post-processing filter descriptors, in order.
    pub filters: Vec<FilterSpec>,
}

/// The raw on-disk shape: actions and filters stay generic until the
/// tagged decode can report unknown kinds precisely.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ScriptData {
    output_file: PathBuf,
    start_delay: f64,
    end_delay: f64,
    typing_delay: DelayRange,
    pre_nl_delay: DelayRange,
    post_nl_delay: DelayRange,
    with_comments: bool,
    comments_at_top: bool,
    #[serde(default)]
    cols: Option<u16>,
    #[serde(default)]
    rows: Option<u16>,
    actions: Vec<Value>,
    filters: Vec<Value>,
}

impl Script {
    /// Create a script with default timing and no actions or filters.
    #[must_use]
    pub fn new(output_file: impl Into<PathBuf>) -> Self {
        Self {
            output_file: output_file.into(),
            start_delay: 0.3,
            end_delay: 0.5,
            typing_delay: DelayRange(0.05, 0.1),
            pre_nl_delay: DelayRange(0.2, 0.2),
            post_nl_delay: DelayRange(0.8, 1.0),
            with_comments: false,
            comments_at_top: false,
            cols: None,
            rows: None,
            actions: Vec::new(),
            filters: Vec::new(),
        }
    }

    /// Replace the action list.
    #[must_use]
    pub fn with_actions(mut self, actions: impl Into<Vec<Action>>) -> Self {
        self.actions = actions.into();
        self
    }

    /// Replace the filter list.
    #[must_use]
    pub fn with_filters(mut self, filters: impl Into<Vec<FilterSpec>>) -> Self {
        self.filters = filters.into();
        self
    }

    /// Set the terminal geometry passed to the recorder.
    #[must_use]
    pub const fn with_geometry(mut self, cols: u16, rows: u16) -> Self {
        self.cols = Some(cols);
        self.rows = Some(rows);
        self
    }

    /// Set the per-character typing delay range.
    #[must_use]
    pub const fn with_typing_delay(mut self, range: DelayRange) -> Self {
        self.typing_delay = range;
        self
    }

    /// Enable status-bar comments.
    ///
    /// Comment actions only become real output if a `CommentFilter` runs,
    /// so one is appended to the filter list unless already present.
    #[must_use]
    pub fn with_comments_enabled(mut self, at_top: bool) -> Self {
        let has_comment_filter = self
            .filters
            .iter()
            .any(|spec| matches!(spec, FilterSpec::CommentFilter));
        if !has_comment_filter {
            self.filters.push(FilterSpec::CommentFilter);
        }
        self.with_comments = true;
        self.comments_at_top = at_top;
        self
    }

    /// Decode a script from a generic configuration record.
    pub fn from_value(value: Value) -> Result<Self> {
        let data: ScriptData = serde_json::from_value(value)
            .map_err(|e| ConfigError::invalid_script(e.to_string()))?;
        Self::from_data(data)
    }

    /// Parse a script from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let data: ScriptData =
            toml::from_str(content).map_err(|e| ConfigError::invalid_script(e.to_string()))?;
        Self::from_data(data)
    }

    /// Parse a script from JSON text.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let data: ScriptData = serde_json::from_str(content)
            .map_err(|e| ConfigError::invalid_script(e.to_string()))?;
        Self::from_data(data)
    }

    /// Parse a script from YAML text.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let data: ScriptData = serde_yaml::from_str(content)
            .map_err(|e| ConfigError::invalid_script(e.to_string()))?;
        Self::from_data(data)
    }

    /// Render the script as TOML text.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| ConfigError::invalid_script(e.to_string()).into())
    }

    /// Render the script as JSON text.
    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::invalid_script(e.to_string()).into())
    }

    /// Render the script as YAML text.
    pub fn to_yaml_string(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| ConfigError::invalid_script(e.to_string()).into())
    }

    fn from_data(data: ScriptData) -> Result<Self> {
        let actions = data
            .actions
            .iter()
            .map(Action::from_value)
            .collect::<Result<Vec<_>>>()?;
        let filters = data
            .filters
            .iter()
            .map(FilterSpec::from_value)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            output_file: data.output_file,
            start_delay: data.start_delay,
            end_delay: data.end_delay,
            typing_delay: data.typing_delay,
            pre_nl_delay: data.pre_nl_delay,
            post_nl_delay: data.post_nl_delay,
            with_comments: data.with_comments,
            comments_at_top: data.comments_at_top,
            cols: data.cols,
            rows: data.rows,
            actions,
            filters,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScriptcastError;

    /// A script exercising every action and filter kind.
    fn demo_script() -> Script {
        Script::new("demo_script.cast")
            .with_geometry(80, 24)
            .with_typing_delay(DelayRange(0.05, 0.25))
            .with_actions(vec![
                Action::comment("See what files are here"),
                Action::line("ls"),
                Action::input("du -h *", 1.0, 3.0),
                Action::marker("Sum disk usage of all files"),
                Action::line("# The end"),
                Action::marker("END"),
                Action::line("exit"),
            ])
            .with_filters(vec![FilterSpec::EndMarkerFilter {
                end_label: "END".to_string(),
            }])
            .with_comments_enabled(false)
    }

    #[test]
    fn defaults() {
        let script = Script::new("out.cast");
        assert_eq!(script.start_delay, 0.3);
        assert_eq!(script.end_delay, 0.5);
        assert_eq!(script.typing_delay, DelayRange(0.05, 0.1));
        assert_eq!(script.pre_nl_delay, DelayRange::fixed(0.2));
        assert_eq!(script.post_nl_delay, DelayRange(0.8, 1.0));
        assert!(!script.with_comments);
        assert!(script.actions.is_empty());
        assert!(script.filters.is_empty());
        assert_eq!(script.cols, None);
    }

    #[test]
    fn comments_enabled_appends_comment_filter_once() {
        let script = Script::new("out.cast").with_comments_enabled(true);
        assert!(script.with_comments);
        assert!(script.comments_at_top);
        assert_eq!(script.filters, vec![FilterSpec::CommentFilter]);

        let script = script.with_comments_enabled(false);
        assert_eq!(script.filters, vec![FilterSpec::CommentFilter]);
        assert!(!script.comments_at_top);
    }

    #[test]
    fn toml_round_trip() {
        let script = demo_script();
        let text = script.to_toml_string().unwrap();
        let reparsed = Script::from_toml_str(&text).unwrap();
        assert_eq!(reparsed, script);
    }

    #[test]
    fn json_round_trip() {
        let script = demo_script();
        let text = script.to_json_string().unwrap();
        let reparsed = Script::from_json_str(&text).unwrap();
        assert_eq!(reparsed, script);
    }

    #[test]
    fn yaml_round_trip() {
        let script = demo_script();
        let text = script.to_yaml_string().unwrap();
        let reparsed = Script::from_yaml_str(&text).unwrap();
        assert_eq!(reparsed, script);
    }

    #[test]
    fn toml_source_with_mixed_actions() {
        let content = r#"
            output_file = "demo.cast"
            start_delay = 0.3
            end_delay = 0.5
            typing_delay = [0.05, 0.1]
            pre_nl_delay = [0.2, 0.2]
            post_nl_delay = [0.8, 1.0]
            with_comments = true
            comments_at_top = false
            actions = [
                "ls",
                { action_id = "Comment", comment = "Hello" },
                { action_id = "Marker", label = "END" },
            ]
            filters = [
                { filter_id = "EndMarkerFilter", end_label = "END" },
                { filter_id = "CommentFilter" },
            ]
        "#;
        let script = Script::from_toml_str(content).unwrap();
        assert_eq!(script.actions.len(), 3);
        assert_eq!(script.actions[0], Action::line("ls"));
        assert_eq!(script.actions[2], Action::marker("END"));
        assert_eq!(script.filters.len(), 2);
        assert_eq!(script.cols, None);
    }

    #[test]
    fn from_generic_value() {
        let script = demo_script();
        let value = serde_json::to_value(&script).unwrap();
        assert_eq!(Script::from_value(value).unwrap(), script);
    }

    #[test]
    fn missing_required_field_is_invalid_script() {
        let err = Script::from_json_str(r#"{"output_file": "x.cast"}"#).unwrap_err();
        assert!(matches!(
            err,
            ScriptcastError::Config(ConfigError::InvalidScript { .. })
        ));
    }

    #[test]
    fn unknown_filter_kind_in_script_is_surfaced() {
        let content = r#"
            output_file = "demo.cast"
            start_delay = 0.3
            end_delay = 0.5
            typing_delay = [0.05, 0.1]
            pre_nl_delay = [0.2, 0.2]
            post_nl_delay = [0.8, 1.0]
            with_comments = false
            comments_at_top = false
            actions = []
            filters = [ { filter_id = "SpeedUpFilter" } ]
        "#;
        let err = Script::from_toml_str(content).unwrap_err();
        assert!(matches!(
            err,
            ScriptcastError::Config(ConfigError::UnknownFilterKind { ref name }) if name == "SpeedUpFilter"
        ));
    }

    #[test]
    fn delay_range_sampling() {
        let mut rng = rand::rng();
        let range = DelayRange(0.1, 0.2);
        for _ in 0..32 {
            let delay = range.sample(&mut rng);
            assert!((0.1..=0.2).contains(&delay));
        }
        assert_eq!(DelayRange::fixed(0.5).sample(&mut rng), 0.5);
    }
}
