//! The key-value configuration file.
//!
//! Converse reads a YAML file for its defaults. A missing file is
//! initialized from a commented template so a first run leaves something
//! to edit; an unreadable or invalid file is a startup error.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Template written when no configuration file exists yet.
const CONFIG_TEMPLATE: &str = r#"api-key: "INSERT API KEY HERE"
model: "gpt-3.5-turbo"
temperature: 1
#max_tokens: 500
markdown: true
"#;

fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_temperature() -> f64 {
    1.0
}

fn default_markdown() -> bool {
    true
}

/// Values supplied by the configuration file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FileConfig {
    /// API credential; overridable by environment and CLI flag.
    #[serde(rename = "api-key", default)]
    pub api_key: Option<String>,

    /// Model identifier.
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// Optional maximum-output-token bound.
    #[serde(default)]
    pub max_tokens: Option<u32>,

    /// Whether to seed the markdown formatting directive.
    #[serde(default = "default_markdown")]
    pub markdown: bool,

    /// Whether to use multiline input mode.
    #[serde(default)]
    pub multiline: bool,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: None,
            markdown: default_markdown(),
            multiline: false,
        }
    }
}

impl FileConfig {
    /// Loads the configuration from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|err| {
            Error::io(format!("failed to read config file {}", path.display()), err)
        })?;
        serde_yaml::from_str(&content).map_err(|err| {
            Error::config(format!("invalid config file {}: {err}", path.display()))
        })
    }

    /// Loads the configuration, writing the template first when the file
    /// does not exist. The returned flag reports whether a new file was
    /// initialized.
    pub fn load_or_init(path: &Path) -> Result<(Self, bool)> {
        if path.exists() {
            return Ok((Self::load(path)?, false));
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|err| {
                Error::io(
                    format!("failed to create config directory {}", parent.display()),
                    err,
                )
            })?;
        }
        std::fs::write(path, CONFIG_TEMPLATE).map_err(|err| {
            Error::io(
                format!("failed to initialize config file {}", path.display()),
                err,
            )
        })?;
        Ok((Self::load(path)?, true))
    }
}

/// Default location of the configuration file.
pub fn default_config_path() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join("converse").join("config.yaml"))
        .ok_or_else(|| Error::config("could not determine the user configuration directory"))
}

/// Default location of the input history file.
pub fn default_history_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("converse").join("history"))
}
