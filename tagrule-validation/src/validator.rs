// Validator facade

use crate::entry::{REQUIRED, SOMETIMES};
use crate::parser::{expression_has_rule, parse_expression};
use crate::{
    FieldContext, FieldEntry, FieldSpec, FieldValue, Record, Result, RuleFn, SemanticType,
    SessionState, ValidationEngine, ValidationError, ValidationErrors, ValidatorConfig,
    ValidatorError,
};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::debug;

/// Registers fields, runs their rules and collects the error messages.
///
/// ```
/// use tagrule_validation::Validator;
///
/// let mut validator = Validator::new();
/// validator
///     .add_field("username", "string", "required|range:8,20", "ab")
///     .unwrap()
///     .add_field("email", "string", "required|email", "a@b.com")
///     .unwrap()
///     .validate();
///
/// assert!(validator.has_errors());
/// assert_eq!(
///     validator.error("username.range"),
///     Some("The username must be between [8,20] characters.")
/// );
/// ```
#[derive(Debug, Default)]
pub struct Validator {
    engine: ValidationEngine,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: &ValidatorConfig) -> Self {
        Self::from_engine(ValidationEngine::with_config(config))
    }

    /// Wrap a preconfigured engine, e.g. one with a custom catalog.
    pub fn from_engine(engine: ValidationEngine) -> Self {
        Self { engine }
    }

    /// Register one field.
    ///
    /// Fails when the rule expression is empty or has a nameless segment.
    pub fn add_field(
        &mut self,
        name: &str,
        declared_type: &str,
        rules: &str,
        value: impl Into<FieldValue>,
    ) -> Result<&mut Self> {
        self.add_spec(FieldSpec::new(name, declared_type, rules, value))
    }

    /// Register one field described by a [`FieldSpec`].
    pub fn add_spec(&mut self, spec: FieldSpec) -> Result<&mut Self> {
        let bindings = parse_expression(&spec.name, &spec.rules)?;
        self.engine.insert_entry(FieldEntry {
            semantic_type: SemanticType::from_declared(&spec.declared_type),
            name: spec.name,
            declared_type: spec.declared_type,
            expression: spec.rules,
            bindings,
            value: spec.value,
            error_override: spec.message,
        });
        Ok(self)
    }

    /// Register several fields; stops at the first malformed one.
    pub fn add_fields(&mut self, specs: impl IntoIterator<Item = FieldSpec>) -> Result<&mut Self> {
        for spec in specs {
            self.add_spec(spec)?;
        }
        Ok(self)
    }

    /// Register fields from a rule map and a data map.
    ///
    /// Each rule map value is `[declaredType, rules]` or
    /// `[declaredType, rules, message]`. Entries run in name order. A field
    /// with no value in `data` is reported under its plain name right away,
    /// unless its rules contain `sometimes`.
    ///
    /// ```
    /// use std::collections::HashMap;
    /// use tagrule_validation::{FieldValue, Validator};
    ///
    /// let rules = HashMap::from([("Id", vec!["int", "required|min:100"])]);
    /// let data: HashMap<String, FieldValue> = HashMap::new();
    ///
    /// let mut validator = Validator::new();
    /// validator.add_map_rules(&rules, &data).unwrap().validate();
    /// assert_eq!(validator.error("Id"), Some("The Id field is required."));
    /// ```
    pub fn add_map_rules<K, R, S, V>(
        &mut self,
        rules: &HashMap<K, R>,
        data: &HashMap<String, V>,
    ) -> Result<&mut Self>
    where
        K: AsRef<str>,
        R: AsRef<[S]>,
        S: AsRef<str>,
        V: Clone + Into<FieldValue>,
    {
        let mut specs: Vec<(&str, &[S])> = rules
            .iter()
            .map(|(name, spec)| (name.as_ref(), spec.as_ref()))
            .collect();
        specs.sort_by_key(|(name, _)| *name);

        for (name, spec) in specs {
            let value = data.get(name).cloned().map(Into::into);
            self.add_map_entry(name, spec, value)?;
        }

        Ok(self)
    }

    /// Like [`add_map_rules`](Self::add_map_rules), reading the data from a
    /// JSON object. `null` members count as missing; anything other than an
    /// object is an empty data map.
    pub fn add_json<K, R, S>(
        &mut self,
        rules: &HashMap<K, R>,
        data: &serde_json::Value,
    ) -> Result<&mut Self>
    where
        K: AsRef<str>,
        R: AsRef<[S]>,
        S: AsRef<str>,
    {
        let data: HashMap<String, FieldValue> = match data.as_object() {
            Some(object) => object
                .iter()
                .map(|(key, value)| (key.clone(), FieldValue::from(value.clone())))
                .collect(),
            None => HashMap::new(),
        };
        self.add_map_rules(rules, &data)
    }

    fn add_map_entry<S: AsRef<str>>(
        &mut self,
        name: &str,
        spec: &[S],
        value: Option<FieldValue>,
    ) -> Result<()> {
        let [declared_type, rules, rest @ ..] = spec else {
            return Err(ValidatorError::MalformedRuleSpec {
                field: name.to_string(),
                len: spec.len(),
            });
        };
        let (declared_type, rules) = (declared_type.as_ref(), rules.as_ref());
        let message: Option<&str> = rest.first().map(|m| m.as_ref());

        // Surface malformed expressions before looking at the data.
        parse_expression(name, rules)?;

        match value.filter(|v| !v.is_absent()) {
            Some(value) => {
                let mut field = FieldSpec::new(name, declared_type, rules, value);
                field.message = message.filter(|m| !m.is_empty()).map(str::to_string);
                self.add_spec(field)?;
            }
            None if expression_has_rule(rules, SOMETIMES) => {
                debug!("Skipping optional field '{}' without a value", name);
            }
            None => {
                let required = expression_has_rule(rules, REQUIRED);
                self.engine.record_missing(name, required, message);
            }
        }

        Ok(())
    }

    /// Register every field of `record` that carries rules, as
    /// `TypeName.field`.
    pub fn add_record<T: Record + ?Sized>(&mut self, record: &T) -> Result<&mut Self> {
        let type_name = record.type_name();
        for field in record.record_fields() {
            self.add_spec(FieldSpec {
                name: format!("{}.{}", type_name, field.name),
                declared_type: field.declared_type.to_string(),
                rules: field.rules.to_string(),
                message: field.message.map(str::to_string),
                value: field.value,
            })?;
        }
        Ok(self)
    }

    /// Register a rule for this session.
    ///
    /// Used when the built-in catalog has no rule of that name.
    ///
    /// ```
    /// use tagrule_validation::Validator;
    ///
    /// let mut validator = Validator::new();
    /// validator.add_rule_fn("even", |ctx| ctx.value.as_i64().is_some_and(|n| n % 2 == 0));
    /// validator.add_field("count", "int", "even", 3).unwrap().validate();
    /// assert!(validator.errors().contains_key("count.even"));
    /// ```
    pub fn add_rule_fn<F>(&mut self, name: &str, rule: F) -> &mut Self
    where
        F: Fn(&FieldContext<'_>) -> bool + Send + Sync + 'static,
    {
        self.add_rule(name, Arc::new(rule))
    }

    /// Register a shared rule for this session.
    pub fn add_rule(&mut self, name: &str, rule: RuleFn) -> &mut Self {
        self.engine.register_override(name, rule);
        self
    }

    /// Run every rule of every registered field.
    pub fn validate(&mut self) -> &mut Self {
        self.engine.validate();
        self
    }

    /// Drop all fields and errors. Registered rules stay.
    pub fn reset(&mut self) -> &mut Self {
        self.engine.reset();
        self
    }

    /// Whether any error has been recorded.
    pub fn has_errors(&self) -> bool {
        self.engine.has_errors()
    }

    /// Errors keyed by `field.rule`, or by the plain field name for fields
    /// without a value.
    pub fn errors(&self) -> &BTreeMap<String, ValidationError> {
        self.engine.errors()
    }

    /// Message recorded under `key`.
    pub fn error(&self, key: &str) -> Option<&str> {
        self.engine.errors().get(key).map(|e| e.message.as_str())
    }

    pub fn error_messages(&self) -> BTreeMap<String, String> {
        self.engine
            .errors()
            .iter()
            .map(|(key, error)| (key.clone(), error.message.clone()))
            .collect()
    }

    /// `Err` with every recorded error, sorted by key.
    pub fn report(&self) -> std::result::Result<(), ValidationErrors> {
        if !self.has_errors() {
            return Ok(());
        }
        Err(self.engine.errors().values().cloned().collect::<Vec<_>>().into())
    }

    pub fn state(&self) -> SessionState {
        self.engine.state()
    }

    pub fn fields(&self) -> &[FieldEntry] {
        self.engine.fields()
    }

    pub fn engine(&self) -> &ValidationEngine {
        &self.engine
    }
}
