// Field entries and the context handed to predicates

use crate::parser::{expression_has_rule, rule_key};
use crate::value::{FieldValue, SemanticType};

/// Argument recorded for rules written without one, e.g. `required`.
pub const NULL_ARGUMENT: &str = "null";

/// Marker that exempts a blank field from all of its rules.
pub const SOMETIMES: &str = "sometimes";

/// Marker that makes a missing map value a `required` error.
pub const REQUIRED: &str = "required";

/// One `(ruleName, ruleArgument)` pair of a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleBinding {
    /// Rule name as written
    pub name: String,
    /// Argument, or [`NULL_ARGUMENT`]
    pub argument: String,
}

impl RuleBinding {
    pub fn new(name: impl Into<String>, argument: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            argument: argument.into(),
        }
    }

    /// Lowercase rule name, used for de-duplication and error keys.
    pub fn key(&self) -> String {
        rule_key(&self.name)
    }
}

/// One field under validation.
#[derive(Debug, Clone)]
pub struct FieldEntry {
    pub name: String,
    pub declared_type: String,
    pub semantic_type: SemanticType,
    /// Raw pipe-delimited rule expression
    pub expression: String,
    pub bindings: Vec<RuleBinding>,
    pub value: FieldValue,
    pub error_override: Option<String>,
}

impl FieldEntry {
    /// Whether the raw expression names `rule` (case-insensitive).
    pub fn has_rule(&self, rule: &str) -> bool {
        expression_has_rule(&self.expression, rule)
    }

    /// Whether the field carries the `sometimes` marker.
    pub fn is_optional(&self) -> bool {
        self.has_rule(SOMETIMES)
    }

    /// Error key for one of this field's bindings: `field.rule`.
    pub fn error_key(&self, binding: &RuleBinding) -> String {
        format!("{}.{}", self.name, binding.key())
    }

    /// The override message, ignoring empty strings.
    pub fn override_message(&self) -> Option<&str> {
        self.error_override.as_deref().filter(|m| !m.is_empty())
    }
}

/// Caller-facing description of one field, for explicit registration.
#[derive(Debug, Clone, Default)]
pub struct FieldSpec {
    pub name: String,
    pub declared_type: String,
    pub rules: String,
    pub message: Option<String>,
    pub value: FieldValue,
}

impl FieldSpec {
    pub fn new(
        name: impl Into<String>,
        declared_type: impl Into<String>,
        rules: impl Into<String>,
        value: impl Into<FieldValue>,
    ) -> Self {
        Self {
            name: name.into(),
            declared_type: declared_type.into(),
            rules: rules.into(),
            message: None,
            value: value.into(),
        }
    }

    /// Set a message used verbatim when any rule of this field fails.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Everything a predicate may look at.
#[derive(Debug, Clone, Copy)]
pub struct FieldContext<'a> {
    pub field: &'a str,
    pub rule: &'a str,
    pub argument: &'a str,
    pub declared_type: &'a str,
    pub semantic_type: SemanticType,
    pub value: &'a FieldValue,
    pub expression: &'a str,
}

impl<'a> FieldContext<'a> {
    /// Context for one binding of `entry`.
    pub fn for_binding(entry: &'a FieldEntry, binding: &'a RuleBinding) -> Self {
        Self {
            field: &entry.name,
            rule: &binding.name,
            argument: &binding.argument,
            declared_type: &entry.declared_type,
            semantic_type: entry.semantic_type,
            value: &entry.value,
            expression: &entry.expression,
        }
    }

    /// Whether the rule was written without an argument.
    pub fn has_argument(&self) -> bool {
        self.argument != NULL_ARGUMENT
    }

    /// The value as a non-empty string, only for `string` fields.
    pub fn text(&self) -> Option<&'a str> {
        if self.semantic_type != SemanticType::String {
            return None;
        }
        self.value.as_str().filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(expression: &str, value: FieldValue) -> FieldEntry {
        FieldEntry {
            name: "Demo".to_string(),
            declared_type: "string".to_string(),
            semantic_type: SemanticType::String,
            expression: expression.to_string(),
            bindings: vec![RuleBinding::new("Exp", "xx")],
            value,
            error_override: None,
        }
    }

    #[test]
    fn test_optional_marker_anywhere() {
        assert!(entry("required|Sometimes", FieldValue::Absent).is_optional());
        assert!(entry(" sometimes : x |min:1", FieldValue::Absent).is_optional());
        assert!(!entry("required|sometimesX", FieldValue::Absent).is_optional());
    }

    #[test]
    fn test_error_key_is_lowercase() {
        let e = entry("Exp:xx", FieldValue::Absent);
        assert_eq!(e.error_key(&e.bindings[0]), "Demo.exp");
    }

    #[test]
    fn test_context_text() {
        let e = entry("Exp:xx", FieldValue::from("abc"));
        let ctx = FieldContext::for_binding(&e, &e.bindings[0]);
        assert_eq!(ctx.text(), Some("abc"));
        assert!(ctx.has_argument());

        let e = entry("Exp:xx", FieldValue::from(""));
        let ctx = FieldContext::for_binding(&e, &e.bindings[0]);
        assert_eq!(ctx.text(), None);
    }

    #[test]
    fn test_empty_override_ignored() {
        let mut e = entry("Exp", FieldValue::Absent);
        e.error_override = Some(String::new());
        assert_eq!(e.override_message(), None);
    }
}
