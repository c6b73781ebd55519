// Validation errors

use std::fmt;
use thiserror::Error;

/// Configuration errors raised while registering fields or loading settings.
///
/// These are fatal: they describe a misconfigured validator, not bad data.
#[derive(Debug, Error)]
pub enum ValidatorError {
    /// A field was registered with an empty rule expression
    #[error("Empty rule expression for field `{field}`")]
    EmptyRuleExpression { field: String },

    /// A rule segment has no name, e.g. `":8"`
    #[error("Malformed rule `{segment}` for field `{field}`")]
    MalformedRule { field: String, segment: String },

    /// A map rule spec lacks the declared type or the rule expression
    #[error(
        "Rule spec for field `{field}` needs a declared type and a rule expression, got {len} element(s)"
    )]
    MalformedRuleSpec { field: String, len: usize },

    /// Unknown configuration file format
    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parse error
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parse error
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Result type for registration and configuration.
pub type Result<T> = std::result::Result<T, ValidatorError>;

/// Why an error was recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A rule evaluated to false
    Failed,
    /// The field had no value to check
    Missing,
    /// Neither the catalog nor an override knows the rule
    Undefined,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Failed => "failed",
            ErrorKind::Missing => "missing",
            ErrorKind::Undefined => "undefined",
        }
    }
}

/// Validation error for a single field
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Field name that failed validation
    pub field: String,

    /// Rule that produced the error, `None` for missing-field errors
    pub rule: Option<String>,

    /// Error message
    pub message: String,

    /// Error category
    pub kind: ErrorKind,

    /// Rule argument as written (optional)
    pub argument: Option<String>,
}

impl ValidationError {
    /// Create a new validation failure
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            rule: None,
            message: message.into(),
            kind: ErrorKind::Failed,
            argument: None,
        }
    }

    /// Set the rule name
    pub fn with_rule(mut self, rule: impl Into<String>) -> Self {
        self.rule = Some(rule.into());
        self
    }

    /// Set the error category
    pub fn with_kind(mut self, kind: ErrorKind) -> Self {
        self.kind = kind;
        self
    }

    /// Set the rule argument
    pub fn with_argument(mut self, argument: impl Into<String>) -> Self {
        self.argument = Some(argument.into());
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Collection of validation errors
#[derive(Debug, Clone, Default)]
pub struct ValidationErrors {
    pub errors: Vec<ValidationError>,
}

impl ValidationErrors {
    /// Create a new validation errors collection
    pub fn new(errors: Vec<ValidationError>) -> Self {
        Self { errors }
    }

    /// Check if there are any errors
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Get the number of errors
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Add an error
    pub fn add(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Get errors for a specific field
    pub fn get_field_errors(&self, field: &str) -> Vec<&ValidationError> {
        self.errors.iter().filter(|e| e.field == field).collect()
    }

    /// Convert to JSON representation
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "errors": self.errors.iter().map(|e| {
                serde_json::json!({
                    "field": e.field,
                    "rule": e.rule,
                    "kind": e.kind.as_str(),
                    "message": e.message,
                    "argument": e.argument,
                })
            }).collect::<Vec<_>>()
        })
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for error in &self.errors {
            writeln!(f, "{}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl From<Vec<ValidationError>> for ValidationErrors {
    fn from(errors: Vec<ValidationError>) -> Self {
        Self::new(errors)
    }
}
