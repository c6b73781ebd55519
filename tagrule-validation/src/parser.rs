// Rule expression parsing
//
// `"required|range:8,20|email"` becomes
// `[("required", "null"), ("range", "8,20"), ("email", "null")]`.

use crate::entry::{NULL_ARGUMENT, RuleBinding};
use crate::{Result, ValidatorError};
use std::collections::HashSet;

/// Split a rule expression into ordered, de-duplicated bindings.
///
/// Rule names repeat at most once per field, compared case-insensitively;
/// the first occurrence wins. An expression without any rule is a fatal
/// configuration error.
pub fn parse_expression(field: &str, expression: &str) -> Result<Vec<RuleBinding>> {
    let mut bindings = Vec::new();
    let mut seen = HashSet::new();

    for segment in expression.split('|') {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }

        let (name, argument) = match segment.split_once(':') {
            Some((name, argument)) => (name.trim(), argument.trim()),
            None => (segment, ""),
        };

        if name.is_empty() {
            return Err(ValidatorError::MalformedRule {
                field: field.to_string(),
                segment: segment.to_string(),
            });
        }

        if !seen.insert(rule_key(name)) {
            continue;
        }

        let argument = if argument.is_empty() {
            NULL_ARGUMENT
        } else {
            argument
        };
        bindings.push(RuleBinding::new(name, argument));
    }

    if bindings.is_empty() {
        return Err(ValidatorError::EmptyRuleExpression {
            field: field.to_string(),
        });
    }

    Ok(bindings)
}

/// Append `incoming` bindings whose names are not already present.
///
/// Returns the number of bindings added.
pub fn merge_bindings(existing: &mut Vec<RuleBinding>, incoming: Vec<RuleBinding>) -> usize {
    let mut seen: HashSet<String> = existing.iter().map(RuleBinding::key).collect();
    let before = existing.len();

    for binding in incoming {
        if seen.insert(binding.key()) {
            existing.push(binding);
        }
    }

    existing.len() - before
}

/// Rule names of a raw expression, trimmed, duplicates included.
pub fn expression_names(expression: &str) -> impl Iterator<Item = &str> {
    expression
        .split('|')
        .map(|segment| segment.split(':').next().unwrap_or_default().trim())
        .filter(|name| !name.is_empty())
}

/// Whether a raw expression names `rule`, ignoring ASCII case.
pub fn expression_has_rule(expression: &str, rule: &str) -> bool {
    expression_names(expression).any(|name| name.eq_ignore_ascii_case(rule))
}

/// Lowercase rule name: the suffix of error keys and the de-duplication key.
pub fn rule_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Lookup name for catalogs, overrides and templates.
///
/// Lowercase with `_` and `-` removed, so `alpha_dash`, `alphaDash` and
/// `AlphaDash` resolve to the same rule.
pub fn canonical_rule_name(name: &str) -> String {
    name.trim()
        .chars()
        .filter(|c| *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}
