//! Rule-expression validation engine for tagrule
//!
//! Fields are registered with a declared type and a pipe-delimited rule
//! expression such as `"required|range:8,20|email"`. Validation runs every
//! rule of every field and records one message per `field.rule` key.
//!
//! # Examples
//!
//! ## Explicit Fields
//!
//! ```
//! use tagrule_validation::Validator;
//!
//! let mut validator = Validator::new();
//! validator
//!     .add_field("username", "string", "required|range:8,20", "ab")?
//!     .add_field("age", "int", "sometimes|min:18", 21)?
//!     .validate();
//!
//! assert!(validator.has_errors());
//! assert!(validator.errors().contains_key("username.range"));
//! assert!(!validator.errors().contains_key("age.min"));
//! # Ok::<(), tagrule_validation::ValidatorError>(())
//! ```
//!
//! ## Rule and Data Maps
//!
//! ```
//! use std::collections::HashMap;
//! use tagrule_validation::Validator;
//!
//! let rules = HashMap::from([
//!     ("email", vec!["string", "required|email"]),
//!     ("port", vec!["int", "isPort", "Port out of range"]),
//! ]);
//! let data = HashMap::from([
//!     ("email".to_string(), serde_json::json!("jane@example.com")),
//!     ("port".to_string(), serde_json::json!(70000)),
//! ]);
//!
//! let mut validator = Validator::new();
//! validator.add_map_rules(&rules, &data)?.validate();
//!
//! assert_eq!(validator.error("port.isport"), Some("Port out of range"));
//! # Ok::<(), tagrule_validation::ValidatorError>(())
//! ```
//!
//! ## Session Rules
//!
//! ```
//! use tagrule_validation::Validator;
//!
//! let mut validator = Validator::new();
//! validator
//!     .add_rule_fn("prefix", |ctx| {
//!         ctx.text().is_some_and(|s| s.starts_with(ctx.argument))
//!     })
//!     .add_field("sku", "string", "prefix:SKU-", "ABC-1")?
//!     .validate();
//!
//! assert_eq!(validator.error("sku.prefix"), Some("The sku is invalid."));
//! # Ok::<(), tagrule_validation::ValidatorError>(())
//! ```

mod catalog;
mod config;
mod engine;
mod entry;
mod errors;
mod messages;
mod parser;
mod record;
mod rules;
mod validator;
mod value;

pub use catalog::*;
pub use config::*;
pub use engine::*;
pub use entry::*;
pub use errors::*;
pub use messages::*;
pub use parser::*;
pub use record::*;
pub use validator::*;
pub use value::*;
