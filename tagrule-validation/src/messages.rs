//! Error message templates
//!
//! Templates are plain strings with `:attribute`, `:value` and `:func`
//! placeholders. A template can branch on the field's semantic type:
//!
//! ```json
//! {
//!   "email": "The :attribute must be a valid email address.",
//!   "min": {
//!     "string": "The :attribute must be at least :value characters.",
//!     "int": "The :attribute must be at least :value."
//!   }
//! }
//! ```

use crate::parser::canonical_rule_name;
use crate::{Result, SemanticType};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Template used when no rule-specific template exists.
pub const DEFAULT_TEMPLATE: &str = "default";

/// Template for rules neither the catalog nor an override knows.
pub const UNDEFINED_TEMPLATE: &str = "undefined";

/// Template for fields without a value.
pub const NULL_TEMPLATE: &str = "null";

/// Template for fields without a value that carry `required`.
pub const REQUIRED_TEMPLATE: &str = "required";

/// Last-resort message when even `default` is missing.
pub const FALLBACK_MESSAGE: &str = "The :attribute is invalid.";

/// A single template or one per semantic type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageTemplate {
    Single(String),
    /// Keyed by semantic type name: `string`, `int`, `float`, `array`,
    /// `map`, `channel` or `unknown`
    ByType(BTreeMap<String, String>),
}

impl MessageTemplate {
    /// Pick the template for `ty`, falling back to the `unknown` branch.
    pub fn select(&self, ty: SemanticType) -> Option<&str> {
        match self {
            MessageTemplate::Single(template) => Some(template),
            MessageTemplate::ByType(branches) => branches
                .get(ty.as_str())
                .or_else(|| branches.get(SemanticType::Unknown.as_str()))
                .map(String::as_str),
        }
    }
}

impl From<&str> for MessageTemplate {
    fn from(template: &str) -> Self {
        MessageTemplate::Single(template.to_string())
    }
}

impl From<String> for MessageTemplate {
    fn from(template: String) -> Self {
        MessageTemplate::Single(template)
    }
}

fn by_type(branches: &[(SemanticType, &str)]) -> MessageTemplate {
    MessageTemplate::ByType(
        branches
            .iter()
            .map(|(ty, template)| (ty.as_str().to_string(), template.to_string()))
            .collect(),
    )
}

static BUILTIN: Lazy<Arc<TemplateTable>> = Lazy::new(|| {
    let mut table = TemplateTable::empty();
    let single = [
        (DEFAULT_TEMPLATE, "The :attribute is invalid."),
        (UNDEFINED_TEMPLATE, "The :attribute uses an undefined rule :func."),
        (NULL_TEMPLATE, "The :attribute has no value."),
        (REQUIRED_TEMPLATE, "The :attribute field is required."),
        ("sometimes", "The :attribute is invalid."),
        ("in", "The selected :attribute must be one of :value."),
        ("numeric", "The :attribute may only contain digits."),
        ("email", "The :attribute must be a valid email address."),
        ("alpha", "The :attribute may only contain letters."),
        ("alphadash", "The :attribute may only contain letters, numbers, dashes and underscores."),
        ("alphanum", "The :attribute may only contain letters and numbers."),
        ("cnidcard", "The :attribute must be a valid resident identity card number."),
        ("cnmobile", "The :attribute must be a valid mobile phone number."),
        ("cntel", "The :attribute must be a valid telephone number."),
        ("ishexadecimal", "The :attribute must be a hexadecimal number."),
        ("ishexcolor", "The :attribute must be a hexadecimal color."),
        ("isrgbcolor", "The :attribute must be an rgb color."),
        ("islowercase", "The :attribute must be lowercase."),
        ("isuppercase", "The :attribute must be uppercase."),
        ("haslowercase", "The :attribute must contain a lowercase letter."),
        ("hasuppercase", "The :attribute must contain an uppercase letter."),
        ("isint", "The :attribute must be an integer."),
        ("isfloat", "The :attribute must be a floating point number."),
        ("isjson", "The :attribute must be a valid JSON string."),
        ("ismultibyte", "The :attribute must contain multibyte characters."),
        ("isascii", "The :attribute may only contain ASCII characters."),
        ("isprintableascii", "The :attribute may only contain printable ASCII characters."),
        ("isfullwidth", "The :attribute must contain full-width characters."),
        ("ishalfwidth", "The :attribute must contain half-width characters."),
        ("isvariablewidth", "The :attribute must mix full-width and half-width characters."),
        ("isbase64", "The :attribute must be base64 encoded."),
        ("isfilepath", "The :attribute must be a valid file path."),
        ("isdatauri", "The :attribute must be a base64 data URI."),
        ("ishash", "The :attribute must be a :value hash."),
        ("isssn", "The :attribute must be a valid social security number."),
        ("isdnsname", "The :attribute must be a valid DNS name."),
        ("isurl", "The :attribute must be a valid URL."),
        ("isip", "The :attribute must be a valid IP address."),
        ("isport", "The :attribute must be a valid port number."),
        ("isipv4", "The :attribute must be a valid IPv4 address."),
        ("isipv6", "The :attribute must be a valid IPv6 address."),
        ("ishost", "The :attribute must be a valid host."),
        ("ismac", "The :attribute must be a valid MAC address."),
        ("isuuid", "The :attribute must be a valid UUID."),
        ("isuuidv3", "The :attribute must be a valid version 3 UUID."),
        ("isuuidv4", "The :attribute must be a valid version 4 UUID."),
        ("isuuidv5", "The :attribute must be a valid version 5 UUID."),
    ];
    for (rule, template) in single {
        table.insert(rule, template);
    }

    table.insert(
        "range",
        by_type(&[
            (SemanticType::String, "The :attribute must be between [:value] characters."),
            (SemanticType::Int, "The :attribute must be within [:value]."),
            (SemanticType::Float, "The :attribute must be within [:value]."),
            (SemanticType::Array, "The :attribute must have between [:value] items."),
            (SemanticType::Map, "The :attribute must have between [:value] items."),
            (SemanticType::Channel, "The :attribute must hold between [:value] items."),
            (SemanticType::Unknown, "The :attribute must be within [:value]."),
        ]),
    );
    table.insert(
        "min",
        by_type(&[
            (SemanticType::String, "The :attribute must be at least :value characters."),
            (SemanticType::Int, "The :attribute must be at least :value."),
            (SemanticType::Float, "The :attribute must be at least :value."),
            (SemanticType::Array, "The :attribute must have at least :value items."),
            (SemanticType::Map, "The :attribute must have at least :value items."),
            (SemanticType::Channel, "The :attribute must hold at least :value items."),
            (SemanticType::Unknown, "The :attribute must be at least :value."),
        ]),
    );
    table.insert(
        "max",
        by_type(&[
            (SemanticType::String, "The :attribute may not be greater than :value characters."),
            (SemanticType::Int, "The :attribute may not be greater than :value."),
            (SemanticType::Float, "The :attribute may not be greater than :value."),
            (SemanticType::Array, "The :attribute may not have more than :value items."),
            (SemanticType::Map, "The :attribute may not have more than :value items."),
            (SemanticType::Channel, "The :attribute may not hold more than :value items."),
            (SemanticType::Unknown, "The :attribute may not be greater than :value."),
        ]),
    );

    Arc::new(table)
});

/// Rule-name-keyed message templates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateTable {
    templates: HashMap<String, MessageTemplate>,
}

impl TemplateTable {
    /// The shared built-in English table.
    pub fn builtin() -> Arc<TemplateTable> {
        Arc::clone(&BUILTIN)
    }

    /// Create an empty table.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load templates from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let data: HashMap<String, MessageTemplate> = serde_json::from_str(json)?;
        let mut table = Self::empty();
        for (rule, template) in data {
            table.insert(&rule, template);
        }
        Ok(table)
    }

    /// Load templates from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Add or replace the template for `rule`.
    pub fn insert(&mut self, rule: &str, template: impl Into<MessageTemplate>) {
        self.templates
            .insert(canonical_rule_name(rule), template.into());
    }

    pub fn get(&self, rule: &str) -> Option<&MessageTemplate> {
        self.templates.get(&canonical_rule_name(rule))
    }

    /// Overlay `other` onto this table; `other` wins on conflicts.
    pub fn merge(&mut self, other: &TemplateTable) {
        for (rule, template) in &other.templates {
            self.templates.insert(rule.clone(), template.clone());
        }
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Template text for `rule` on a field of type `ty`.
    ///
    /// Falls back to the `default` template, then to [`FALLBACK_MESSAGE`].
    pub fn resolve(&self, rule: &str, ty: SemanticType) -> &str {
        self.get(rule)
            .and_then(|template| template.select(ty))
            .or_else(|| {
                self.get(DEFAULT_TEMPLATE)
                    .and_then(|template| template.select(ty))
            })
            .unwrap_or(FALLBACK_MESSAGE)
    }
}

/// Substitute the placeholders of `template`.
///
/// `:attribute` is the field name, `:value` the rule argument and `:func`
/// the rule name.
/// Substituted text is copied as is and never scanned for placeholders.
pub fn render(template: &str, attribute: &str, value: &str, func: &str) -> String {
    let placeholders = [(":attribute", attribute), (":value", value), (":func", func)];
    let mut out = String::with_capacity(template.len() + attribute.len() + value.len());
    let mut rest = template;

    while let Some(at) = rest.find(':') {
        out.push_str(&rest[..at]);
        rest = &rest[at..];
        match placeholders
            .iter()
            .find(|(placeholder, _)| rest.starts_with(placeholder))
        {
            Some((placeholder, replacement)) => {
                out.push_str(replacement);
                rest = &rest[placeholder.len()..];
            }
            None => {
                out.push(':');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render() {
        let message = render(
            "The :attribute must be within [:value].",
            "age",
            "1,80",
            "range",
        );
        assert_eq!(message, "The age must be within [1,80].");
    }

    #[test]
    fn test_render_does_not_rescan_substitutions() {
        assert_eq!(
            render("The selected :attribute must be one of :value.", "lang", "en,:func", "in"),
            "The selected lang must be one of en,:func."
        );
        assert_eq!(
            render(":attribute (:func) got :value", "a:value", ":attribute", "b:func"),
            "a:value (b:func) got :attribute"
        );
        assert_eq!(render("ratio 1:2 :unknown:", "x", "y", "z"), "ratio 1:2 :unknown:");
    }

    #[test]
    fn test_resolve_by_type() {
        let table = TemplateTable::builtin();
        assert_eq!(
            table.resolve("min", SemanticType::String),
            "The :attribute must be at least :value characters."
        );
        assert_eq!(
            table.resolve("min", SemanticType::Int),
            "The :attribute must be at least :value."
        );
        assert_eq!(
            table.resolve("min", SemanticType::Channel),
            "The :attribute must hold at least :value items."
        );
        assert_eq!(
            table.resolve("max", SemanticType::Channel),
            "The :attribute may not hold more than :value items."
        );
        assert_eq!(
            table.resolve("min", SemanticType::Unknown),
            "The :attribute must be at least :value."
        );
    }

    #[test]
    fn test_resolve_falls_back_to_default() {
        let table = TemplateTable::builtin();
        assert_eq!(table.resolve("exp", SemanticType::String), "The :attribute is invalid.");

        let empty = TemplateTable::empty();
        assert_eq!(empty.resolve("exp", SemanticType::Int), FALLBACK_MESSAGE);
    }

    #[test]
    fn test_resolve_canonical_names() {
        let table = TemplateTable::builtin();
        assert_eq!(
            table.resolve("alpha_dash", SemanticType::String),
            table.resolve("alphaDash", SemanticType::String)
        );
    }

    #[test]
    fn test_by_type_without_unknown_branch() {
        let mut table = TemplateTable::empty();
        table.insert("size", by_type(&[(SemanticType::Int, "int only")]));
        table.insert(DEFAULT_TEMPLATE, "fallback :attribute");
        assert_eq!(table.resolve("size", SemanticType::Int), "int only");
        assert_eq!(table.resolve("size", SemanticType::String), "fallback :attribute");
    }

    #[test]
    fn test_from_json() {
        let table = TemplateTable::from_json(
            r#"{
                "email": "Bad email",
                "Min": { "string": "Too short", "unknown": "Too small" }
            }"#,
        )
        .unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.resolve("email", SemanticType::String), "Bad email");
        assert_eq!(table.resolve("min", SemanticType::String), "Too short");
        assert_eq!(table.resolve("min", SemanticType::Float), "Too small");
    }

    #[test]
    fn test_from_json_rejects_bad_shape() {
        assert!(TemplateTable::from_json(r#"{"email": 5}"#).is_err());
    }

    #[test]
    fn test_merge() {
        let mut table = (*TemplateTable::builtin()).clone();
        let mut custom = TemplateTable::empty();
        custom.insert("email", "Bad email");
        table.merge(&custom);

        assert_eq!(table.resolve("email", SemanticType::String), "Bad email");
        assert_eq!(
            table.resolve("isurl", SemanticType::String),
            "The :attribute must be a valid URL."
        );
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("messages.json");
        fs::write(&path, r#"{"required": "Need :attribute"}"#).unwrap();

        let table = TemplateTable::from_json_file(&path).unwrap();
        assert_eq!(table.resolve("required", SemanticType::Int), "Need :attribute");
    }
}
