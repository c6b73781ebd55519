//! Rule dispatch engine
//!
//! Owns one validation session: the registered fields, the session's
//! override rules and the recorded errors.

use crate::entry::REQUIRED;
use crate::messages::{NULL_TEMPLATE, REQUIRED_TEMPLATE, UNDEFINED_TEMPLATE, render};
use crate::parser::{canonical_rule_name, merge_bindings};
use crate::{
    ErrorKind, FieldContext, FieldEntry, RuleBinding, RuleCatalog, SemanticType, TemplateTable,
    ValidationError, ValidatorConfig,
};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// A caller-supplied rule.
pub type RuleFn = Arc<dyn Fn(&FieldContext<'_>) -> bool + Send + Sync>;

/// Lifecycle of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Nothing registered
    #[default]
    Empty,
    /// Fields or errors registered, not validated yet
    Populated,
    /// `validate` has run; results are authoritative
    Validated,
}

/// Per-session dispatch state.
pub struct ValidationEngine {
    catalog: Arc<RuleCatalog>,
    templates: Arc<TemplateTable>,
    overrides: HashMap<String, RuleFn>,
    fields: Vec<FieldEntry>,
    index: HashMap<String, usize>,
    errors: BTreeMap<String, ValidationError>,
    has_errors: bool,
    state: SessionState,
    zero_is_blank: bool,
}

// Outcome of one binding, recorded after the dispatch pass.
enum Outcome {
    Passed,
    Skipped,
    Record(String, ValidationError),
}

impl ValidationEngine {
    /// Engine with the built-in catalog and templates.
    pub fn new() -> Self {
        Self {
            catalog: RuleCatalog::builtin(),
            templates: TemplateTable::builtin(),
            overrides: HashMap::new(),
            fields: Vec::new(),
            index: HashMap::new(),
            errors: BTreeMap::new(),
            has_errors: false,
            state: SessionState::Empty,
            zero_is_blank: false,
        }
    }

    pub fn with_config(config: &ValidatorConfig) -> Self {
        Self {
            templates: config.template_table(),
            zero_is_blank: config.zero_is_blank,
            ..Self::new()
        }
    }

    /// Replace the rule catalog.
    pub fn with_catalog(mut self, catalog: Arc<RuleCatalog>) -> Self {
        self.catalog = catalog;
        self
    }

    /// Replace the message templates.
    pub fn with_templates(mut self, templates: Arc<TemplateTable>) -> Self {
        self.templates = templates;
        self
    }

    /// Register a session rule. Catalog rules of the same name take
    /// precedence.
    pub fn register_override(&mut self, name: &str, rule: RuleFn) {
        let key = canonical_rule_name(name);
        if self.catalog.contains(&key) {
            warn!(
                "Rule '{}' is shadowed by the built-in rule of the same name",
                name
            );
        } else {
            debug!("Registered rule '{}'", name);
        }
        self.overrides.insert(key, rule);
    }

    /// Add a field, or merge it into the field of the same name.
    ///
    /// Merged bindings keep the first occurrence of each rule; the declared
    /// type, value and message of the newer registration win.
    pub fn insert_entry(&mut self, entry: FieldEntry) {
        self.state = SessionState::Populated;

        match self.index.get(&entry.name) {
            Some(&at) => {
                let existing = &mut self.fields[at];
                let added = merge_bindings(&mut existing.bindings, entry.bindings);
                existing.expression = format!("{}|{}", existing.expression, entry.expression);
                existing.declared_type = entry.declared_type;
                existing.semantic_type = entry.semantic_type;
                existing.value = entry.value;
                if entry.error_override.is_some() {
                    existing.error_override = entry.error_override;
                }
                debug!(
                    "Merged field '{}': {} new rule(s), {} total",
                    existing.name,
                    added,
                    existing.bindings.len()
                );
            }
            None => {
                debug!(
                    "Registered field '{}' ({} as {}) with {} rule(s)",
                    entry.name,
                    entry.declared_type,
                    entry.semantic_type,
                    entry.bindings.len()
                );
                self.index.insert(entry.name.clone(), self.fields.len());
                self.fields.push(entry);
            }
        }
    }

    /// Record an error for a field that has no value at all.
    ///
    /// The key is the plain field name. `required` selects the `required`
    /// template, otherwise the `null` template is used; `message` replaces
    /// either.
    pub fn record_missing(&mut self, field: &str, required: bool, message: Option<&str>) {
        let template = if required {
            REQUIRED_TEMPLATE
        } else {
            NULL_TEMPLATE
        };
        let text = match message.filter(|m| !m.is_empty()) {
            Some(custom) => custom.to_string(),
            None => render(
                self.templates.resolve(template, SemanticType::Unknown),
                field,
                "",
                template,
            ),
        };

        let mut error = ValidationError::new(field, text).with_kind(ErrorKind::Missing);
        if required {
            error = error.with_rule(REQUIRED);
        }

        if self.state == SessionState::Empty {
            self.state = SessionState::Populated;
        }
        self.record(field.to_string(), error);
    }

    /// Run every binding of every field and record failures.
    pub fn validate(&mut self) {
        let mut outcomes = Vec::new();
        for entry in &self.fields {
            let skip_blank = entry.is_optional() && entry.value.is_blank(self.zero_is_blank);
            for binding in &entry.bindings {
                let outcome = if skip_blank {
                    Outcome::Skipped
                } else {
                    self.dispatch(entry, binding)
                };
                outcomes.push(outcome);
            }
        }

        let mut failed = 0;
        let mut skipped = 0;
        let total = outcomes.len();
        for outcome in outcomes {
            match outcome {
                Outcome::Passed => {}
                Outcome::Skipped => skipped += 1,
                Outcome::Record(key, error) => {
                    failed += 1;
                    self.record(key, error);
                }
            }
        }

        self.state = SessionState::Validated;
        debug!(
            "Validated {} field(s), {} binding(s): {} failed, {} skipped, {} error(s) recorded",
            self.fields.len(),
            total,
            failed,
            skipped,
            self.errors.len()
        );
    }

    fn dispatch(&self, entry: &FieldEntry, binding: &RuleBinding) -> Outcome {
        let key = entry.error_key(binding);

        if entry.value.is_absent() {
            trace!("'{}' has no value", key);
            let template = if binding.key() == REQUIRED {
                REQUIRED_TEMPLATE
            } else {
                NULL_TEMPLATE
            };
            let error = self
                .failure(entry, binding, template)
                .with_kind(ErrorKind::Missing);
            return Outcome::Record(key, error);
        }

        let ctx = FieldContext::for_binding(entry, binding);
        let passed = if let Some(predicate) = self.catalog.get(&binding.name) {
            predicate(&ctx)
        } else if let Some(rule) = self.overrides.get(&canonical_rule_name(&binding.name)) {
            rule(&ctx)
        } else {
            warn!("Undefined rule '{}' on field '{}'", binding.name, entry.name);
            let message = render(
                self.templates
                    .resolve(UNDEFINED_TEMPLATE, entry.semantic_type),
                &entry.name,
                &binding.argument,
                &binding.name,
            );
            let error = ValidationError::new(&entry.name, message)
                .with_rule(binding.key())
                .with_kind(ErrorKind::Undefined);
            return Outcome::Record(key, error);
        };

        trace!(
            "'{}' = {} ({}): {}",
            key,
            entry.value.kind_name(),
            binding.argument,
            if passed { "passed" } else { "failed" }
        );

        if passed {
            Outcome::Passed
        } else {
            Outcome::Record(key, self.failure(entry, binding, &binding.name))
        }
    }

    fn failure(&self, entry: &FieldEntry, binding: &RuleBinding, template: &str) -> ValidationError {
        let message = match entry.override_message() {
            Some(custom) => custom.to_string(),
            None => render(
                self.templates.resolve(template, entry.semantic_type),
                &entry.name,
                &binding.argument,
                &binding.name,
            ),
        };

        let error = ValidationError::new(&entry.name, message).with_rule(binding.key());
        if binding.argument == crate::entry::NULL_ARGUMENT {
            error
        } else {
            error.with_argument(&binding.argument)
        }
    }

    // First write wins per key.
    fn record(&mut self, key: String, error: ValidationError) {
        self.has_errors = true;
        self.errors.entry(key).or_insert(error);
    }

    /// Drop all fields and errors. Session rules stay registered.
    pub fn reset(&mut self) {
        debug!(
            "Reset session: {} field(s), {} error(s) discarded",
            self.fields.len(),
            self.errors.len()
        );
        self.fields.clear();
        self.index.clear();
        self.errors.clear();
        self.has_errors = false;
        self.state = SessionState::Empty;
    }

    pub fn has_errors(&self) -> bool {
        self.has_errors
    }

    pub fn errors(&self) -> &BTreeMap<String, ValidationError> {
        &self.errors
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn fields(&self) -> &[FieldEntry] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldEntry> {
        self.index.get(name).map(|&at| &self.fields[at])
    }

    pub fn catalog(&self) -> &RuleCatalog {
        &self.catalog
    }

    pub fn templates(&self) -> &TemplateTable {
        &self.templates
    }

    pub fn zero_is_blank(&self) -> bool {
        self.zero_is_blank
    }
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ValidationEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut overrides: Vec<&str> = self.overrides.keys().map(String::as_str).collect();
        overrides.sort_unstable();

        f.debug_struct("ValidationEngine")
            .field("fields", &self.fields)
            .field("overrides", &overrides)
            .field("errors", &self.errors)
            .field("has_errors", &self.has_errors)
            .field("state", &self.state)
            .field("zero_is_blank", &self.zero_is_blank)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_expression;
    use crate::FieldValue;

    fn entry(name: &str, declared: &str, rules: &str, value: impl Into<FieldValue>) -> FieldEntry {
        FieldEntry {
            name: name.to_string(),
            declared_type: declared.to_string(),
            semantic_type: SemanticType::from_declared(declared),
            expression: rules.to_string(),
            bindings: parse_expression(name, rules).unwrap(),
            value: value.into(),
            error_override: None,
        }
    }

    #[test]
    fn test_failure_recorded_under_field_rule_key() {
        let mut engine = ValidationEngine::new();
        engine.insert_entry(entry("username", "string", "required|range:8,20", "ab"));
        engine.validate();

        assert!(engine.has_errors());
        assert_eq!(engine.errors().len(), 1);
        let error = &engine.errors()["username.range"];
        assert_eq!(error.message, "The username must be between [8,20] characters.");
        assert_eq!(error.kind, ErrorKind::Failed);
        assert_eq!(error.argument.as_deref(), Some("8,20"));
        assert_eq!(engine.state(), SessionState::Validated);
    }

    #[test]
    fn test_blank_optional_field_skipped() {
        let mut engine = ValidationEngine::new();
        engine.insert_entry(entry("nick", "string", "min:3|sometimes", "  "));
        engine.insert_entry(entry("age", "int", "sometimes|min:1", FieldValue::Absent));
        engine.validate();

        assert!(!engine.has_errors());
        assert!(engine.errors().is_empty());
    }

    #[test]
    fn test_zero_is_not_blank_by_default() {
        let mut engine = ValidationEngine::new();
        engine.insert_entry(entry("Age", "int", "sometimes|min:1", 0));
        engine.validate();
        assert!(engine.errors().contains_key("Age.min"));

        let config = ValidatorConfig::new().with_zero_is_blank(true);
        let mut engine = ValidationEngine::with_config(&config);
        engine.insert_entry(entry("Age", "int", "sometimes|min:1", 0));
        engine.validate();
        assert!(!engine.has_errors());
    }

    #[test]
    fn test_absent_value_is_missing_not_dispatched() {
        let mut engine = ValidationEngine::new();
        engine.insert_entry(entry("id", "int", "required|min:100", FieldValue::Absent));
        engine.validate();

        let required = &engine.errors()["id.required"];
        assert_eq!(required.kind, ErrorKind::Missing);
        assert_eq!(required.message, "The id field is required.");
        let min = &engine.errors()["id.min"];
        assert_eq!(min.message, "The id has no value.");
    }

    #[test]
    fn test_undefined_rule() {
        let mut engine = ValidationEngine::new();
        engine.insert_entry(entry("demo", "string", "nope:1", "x"));
        engine.validate();

        assert!(engine.has_errors());
        assert_eq!(engine.errors().len(), 1);
        let error = &engine.errors()["demo.nope"];
        assert_eq!(error.kind, ErrorKind::Undefined);
        assert_eq!(error.message, "The demo uses an undefined rule nope.");
    }

    #[test]
    fn test_override_called_after_catalog_miss() {
        let mut engine = ValidationEngine::new();
        engine.register_override(
            "exp",
            Arc::new(|ctx: &FieldContext<'_>| ctx.argument == "ok"),
        );
        engine.insert_entry(entry("a", "string", "exp:ok", "x"));
        engine.insert_entry(entry("b", "string", "Exp:no", "x"));
        engine.validate();

        assert!(!engine.errors().contains_key("a.exp"));
        assert_eq!(engine.errors()["b.exp"].message, "The b is invalid.");
    }

    #[test]
    fn test_catalog_wins_over_override() {
        let mut engine = ValidationEngine::new();
        engine.register_override("email", Arc::new(|_: &FieldContext<'_>| true));
        engine.insert_entry(entry("mail", "string", "email", "not-an-email"));
        engine.validate();

        assert!(engine.errors().contains_key("mail.email"));
    }

    #[test]
    fn test_error_override_message() {
        let mut engine = ValidationEngine::new();
        let mut e = entry("pwd", "string", "min:8|nope", "short");
        e.error_override = Some("Password too weak".to_string());
        engine.insert_entry(e);
        engine.validate();

        assert_eq!(engine.errors()["pwd.min"].message, "Password too weak");
        // undefined rules keep their own template
        assert_eq!(
            engine.errors()["pwd.nope"].message,
            "The pwd uses an undefined rule nope."
        );
    }

    #[test]
    fn test_first_failure_wins_across_runs() {
        let mut engine = ValidationEngine::new();
        engine.insert_entry(entry("n", "int", "max:5", 9));
        engine.validate();
        let first = engine.errors().clone();

        engine.validate();
        assert_eq!(engine.errors(), &first);
    }

    #[test]
    fn test_merge_on_reregistration() {
        let mut engine = ValidationEngine::new();
        engine.insert_entry(entry("n", "int", "min:1", 0));
        engine.insert_entry(entry("n", "int", "min:10|max:5", 7));

        let field = engine.field("n").unwrap();
        assert_eq!(field.bindings.len(), 2);
        assert_eq!(field.bindings[0].argument, "1");
        assert_eq!(field.value, FieldValue::Int(7));
        assert_eq!(engine.fields().len(), 1);

        engine.validate();
        assert!(!engine.errors().contains_key("n.min"));
        assert!(engine.errors().contains_key("n.max"));
    }

    #[test]
    fn test_record_missing() {
        let mut engine = ValidationEngine::new();
        engine.record_missing("Id", true, None);
        engine.record_missing("Name", false, Some("Name please"));

        assert!(engine.has_errors());
        assert_eq!(engine.errors()["Id"].message, "The Id field is required.");
        assert_eq!(engine.errors()["Id"].rule.as_deref(), Some("required"));
        assert_eq!(engine.errors()["Name"].message, "Name please");
        assert_eq!(engine.state(), SessionState::Populated);
    }

    #[test]
    fn test_reset_keeps_overrides() {
        let mut engine = ValidationEngine::new();
        engine.register_override("exp", Arc::new(|_: &FieldContext<'_>| false));
        engine.insert_entry(entry("a", "string", "exp", "x"));
        engine.validate();
        assert!(engine.has_errors());

        engine.reset();
        assert!(!engine.has_errors());
        assert!(engine.errors().is_empty());
        assert!(engine.fields().is_empty());
        assert_eq!(engine.state(), SessionState::Empty);

        engine.validate();
        assert!(!engine.has_errors());

        engine.insert_entry(entry("b", "string", "exp", "x"));
        engine.validate();
        assert_eq!(engine.errors()["b.exp"].kind, ErrorKind::Failed);
    }

    #[test]
    fn test_custom_catalog() {
        fn always(_: &FieldContext<'_>) -> bool {
            true
        }

        let mut engine =
            ValidationEngine::new().with_catalog(Arc::new(RuleCatalog::new().with("always", always)));
        engine.insert_entry(entry("x", "string", "always|email", "x"));
        engine.validate();

        assert_eq!(engine.errors().len(), 1);
        assert_eq!(engine.errors()["x.email"].kind, ErrorKind::Undefined);
    }
}
