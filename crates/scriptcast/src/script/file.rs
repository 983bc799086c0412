//! Script file loading and saving.

use std::fs;
use std::path::Path;

use super::definition::Script;
use crate::error::{ConfigError, Result, ScriptcastError};

/// Script file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptFormat {
    /// TOML format.
    Toml,
    /// JSON format.
    Json,
    /// YAML format.
    Yaml,
}

impl ScriptFormat {
    /// Detect format from a file extension.
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }

    /// Detect format from a path.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }
}

impl Script {
    /// Load a script, detecting the format from the file extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let format = ScriptFormat::from_path(path).ok_or_else(|| ConfigError::UnknownFormat {
            path: path.to_path_buf(),
        })?;
        Self::load_as(path, format)
    }

    /// Load a script in an explicitly given format.
    pub fn load_as(path: impl AsRef<Path>, format: ScriptFormat) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| ScriptcastError::io_context(format!("reading {}", path.display()), e))?;
        let script = match format {
            ScriptFormat::Toml => Self::from_toml_str(&content)?,
            ScriptFormat::Json => Self::from_json_str(&content)?,
            ScriptFormat::Yaml => Self::from_yaml_str(&content)?,
        };
        tracing::debug!(
            path = %path.display(),
            actions = script.actions.len(),
            filters = script.filters.len(),
            "loaded script"
        );
        Ok(script)
    }

    /// Save the script, detecting the format from the file extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let format = ScriptFormat::from_path(path).ok_or_else(|| ConfigError::UnknownFormat {
            path: path.to_path_buf(),
        })?;
        self.save_as(path, format)
    }

    /// Save the script in an explicitly given format.
    pub fn save_as(&self, path: impl AsRef<Path>, format: ScriptFormat) -> Result<()> {
        let path = path.as_ref();
        let content = match format {
            ScriptFormat::Toml => self.to_toml_string()?,
            ScriptFormat::Json => self.to_json_string()?,
            ScriptFormat::Yaml => self.to_yaml_string()?,
        };
        fs::write(path, content)
            .map_err(|e| ScriptcastError::io_context(format!("writing {}", path.display()), e))
    }
}
