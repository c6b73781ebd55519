// Built-in rule predicates
//
// Every predicate has the shape `fn(&FieldContext<'_>) -> bool` and is
// registered by name in the rule catalog.

pub(crate) mod network;
pub(crate) mod size;
pub(crate) mod text;

use std::str::FromStr;

/// Parse a `min,max` argument. Anything but exactly two values fails.
pub(crate) fn bounds<T: FromStr>(argument: &str) -> Option<(T, T)> {
    let (min, max) = argument.split_once(',')?;
    if max.contains(',') {
        return None;
    }
    Some((min.trim().parse().ok()?, max.trim().parse().ok()?))
}

/// Parse a single numeric argument.
pub(crate) fn limit<T: FromStr>(argument: &str) -> Option<T> {
    argument.trim().parse().ok()
}

/// Run `predicate` against a throwaway field.
#[cfg(test)]
pub(crate) fn check(
    predicate: crate::Predicate,
    declared_type: &str,
    argument: &str,
    value: impl Into<crate::FieldValue>,
) -> bool {
    use crate::{FieldContext, FieldEntry, RuleBinding, SemanticType};

    let entry = FieldEntry {
        name: "field".to_string(),
        declared_type: declared_type.to_string(),
        semantic_type: SemanticType::from_declared(declared_type),
        expression: String::new(),
        bindings: Vec::new(),
        value: value.into(),
        error_override: None,
    };
    let binding = RuleBinding::new("rule", argument);
    predicate(&FieldContext::for_binding(&entry, &binding))
}
