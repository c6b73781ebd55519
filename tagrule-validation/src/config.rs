// Validator configuration

use crate::{MessageTemplate, Result, TemplateTable, ValidatorError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Environment variable that turns on `zero_is_blank`.
pub const ENV_ZERO_IS_BLANK: &str = "TAGRULE_ZERO_IS_BLANK";

/// Environment variable naming a JSON or TOML message file.
pub const ENV_MESSAGES_FILE: &str = "TAGRULE_MESSAGES_FILE";

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "json" => Some(ConfigFormat::Json),
            "toml" => Some(ConfigFormat::Toml),
            _ => None,
        }
    }

    /// Detect the format of `path` from its extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .ok_or_else(|| ValidatorError::UnsupportedFormat(path.display().to_string()))?;

        Self::from_extension(ext).ok_or_else(|| ValidatorError::UnsupportedFormat(ext.to_string()))
    }
}

/// Validator settings.
///
/// ```toml
/// zero_is_blank = true
///
/// [messages]
/// email = "Please enter a valid email for :attribute."
///
/// [messages.min]
/// string = ":attribute needs :value characters or more."
/// int = ":attribute must be :value or more."
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Treat numeric zero as blank for `sometimes` fields
    pub zero_is_blank: bool,

    /// Message templates laid over the built-in ones, keyed by rule name
    pub messages: HashMap<String, MessageTemplate>,
}

impl ValidatorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load from a `.json` or `.toml` file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path)?;
        let content = fs::read_to_string(path)?;

        match format {
            ConfigFormat::Json => Self::from_json_str(&content),
            ConfigFormat::Toml => Self::from_toml_str(&content),
        }
    }

    /// Load from `TAGRULE_ZERO_IS_BLANK` and `TAGRULE_MESSAGES_FILE`.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load from a variable lookup, as [`from_env`](Self::from_env) does.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::new();

        if let Some(flag) = lookup(ENV_ZERO_IS_BLANK) {
            config.zero_is_blank = parse_flag(&flag);
        }

        if let Some(path) = lookup(ENV_MESSAGES_FILE).filter(|p| !p.trim().is_empty()) {
            config.messages = load_messages(Path::new(path.trim()))?;
        }

        Ok(config)
    }

    pub fn with_zero_is_blank(mut self, zero_is_blank: bool) -> Self {
        self.zero_is_blank = zero_is_blank;
        self
    }

    /// Set the template for one rule.
    pub fn with_message(
        mut self,
        rule: impl Into<String>,
        template: impl Into<MessageTemplate>,
    ) -> Self {
        self.messages.insert(rule.into(), template.into());
        self
    }

    /// The built-in templates with this config's messages applied.
    pub fn template_table(&self) -> Arc<TemplateTable> {
        if self.messages.is_empty() {
            return TemplateTable::builtin();
        }

        let mut table = (*TemplateTable::builtin()).clone();
        for (rule, template) in &self.messages {
            table.insert(rule, template.clone());
        }
        Arc::new(table)
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn load_messages(path: &Path) -> Result<HashMap<String, MessageTemplate>> {
    let format = ConfigFormat::from_path(path)?;
    let content = fs::read_to_string(path)?;

    match format {
        ConfigFormat::Json => Ok(serde_json::from_str(&content)?),
        ConfigFormat::Toml => Ok(toml::from_str(&content)?),
    }
}
