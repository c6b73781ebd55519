//! Built-in rule catalog
//!
//! Maps canonical rule names to predicates. The built-in table is created on
//! first use and shared read-only for the rest of the process.

use crate::parser::canonical_rule_name;
use crate::rules::{network, size, text};
use crate::FieldContext;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Arc;

/// A built-in rule check.
pub type Predicate = fn(&FieldContext<'_>) -> bool;

static BUILTIN: Lazy<Arc<RuleCatalog>> = Lazy::new(|| {
    let catalog = RuleCatalog::new()
        .with("required", size::required)
        .with("sometimes", size::sometimes)
        .with("range", size::range)
        .with("min", size::min)
        .with("max", size::max)
        .with("in", size::in_list)
        .with("numeric", text::numeric)
        .with("alpha", text::alpha)
        .with("alphadash", text::alpha_dash)
        .with("alphanum", text::alpha_num)
        .with("cnidcard", text::cn_id_card)
        .with("cnmobile", text::cn_mobile)
        .with("cntel", text::cn_tel)
        .with("ishexadecimal", text::is_hexadecimal)
        .with("ishexcolor", text::is_hex_color)
        .with("isrgbcolor", text::is_rgb_color)
        .with("islowercase", text::is_lower_case)
        .with("isuppercase", text::is_upper_case)
        .with("haslowercase", text::has_lower_case)
        .with("hasuppercase", text::has_upper_case)
        .with("isint", text::is_int)
        .with("isfloat", text::is_float)
        .with("isjson", text::is_json)
        .with("ismultibyte", text::is_multibyte)
        .with("isascii", text::is_ascii)
        .with("isprintableascii", text::is_printable_ascii)
        .with("isfullwidth", text::is_full_width)
        .with("ishalfwidth", text::is_half_width)
        .with("isvariablewidth", text::is_variable_width)
        .with("isbase64", text::is_base64)
        .with("isfilepath", text::is_file_path)
        .with("isdatauri", text::is_data_uri)
        .with("ishash", text::is_hash)
        .with("isssn", text::is_ssn)
        .with("email", network::email)
        .with("isdnsname", network::is_dns_name)
        .with("isurl", network::is_url)
        .with("isip", network::is_ip)
        .with("isport", network::is_port)
        .with("isipv4", network::is_ipv4)
        .with("isipv6", network::is_ipv6)
        .with("ishost", network::is_host)
        .with("ismac", network::is_mac)
        .with("isuuid", network::is_uuid)
        .with("isuuidv3", network::is_uuid_v3)
        .with("isuuidv4", network::is_uuid_v4)
        .with("isuuidv5", network::is_uuid_v5);

    Arc::new(catalog)
});

/// Name-keyed table of rule predicates.
#[derive(Clone, Default)]
pub struct RuleCatalog {
    rules: HashMap<String, Predicate>,
}

impl RuleCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// The shared built-in catalog.
    pub fn builtin() -> Arc<RuleCatalog> {
        Arc::clone(&BUILTIN)
    }

    /// Add a predicate under `name`.
    pub fn with(mut self, name: &str, predicate: Predicate) -> Self {
        self.rules.insert(canonical_rule_name(name), predicate);
        self
    }

    /// Look up a predicate; `alpha_dash`, `alphaDash` and `AlphaDash` are
    /// the same rule.
    pub fn get(&self, name: &str) -> Option<Predicate> {
        self.rules.get(&canonical_rule_name(name)).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Canonical rule names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.rules.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl std::fmt::Debug for RuleCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleCatalog")
            .field("rules", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_size() {
        let catalog = RuleCatalog::builtin();
        assert_eq!(catalog.len(), 47);
        assert!(!catalog.is_empty());
    }

    #[test]
    fn test_lookup_is_canonical() {
        let catalog = RuleCatalog::builtin();
        assert!(catalog.contains("alpha_dash"));
        assert!(catalog.contains("alphaDash"));
        assert!(catalog.contains("AlphaDash"));
        assert!(catalog.contains("isIPv6"));
        assert!(catalog.contains("isUUIDv4"));
        assert!(!catalog.contains("exp"));
    }

    #[test]
    fn test_builtin_is_shared() {
        assert!(Arc::ptr_eq(&RuleCatalog::builtin(), &RuleCatalog::builtin()));
    }

    #[test]
    fn test_custom_catalog() {
        fn never(_: &FieldContext<'_>) -> bool {
            false
        }

        let catalog = RuleCatalog::new().with("Never", never);
        assert_eq!(catalog.names(), vec!["never"]);
        assert!(catalog.get("NEVER").is_some());
    }
}
