// tagrule - declarative data validation driven by rule expressions
//
// Fields carry pipe-delimited rule expressions such as
// "required|range:8,20|email", attached with `#[valid(...)]`, through a
// rule map, or registered one by one.

// Re-export the validation engine
pub use tagrule_validation::*;

// Re-export the derive macro
#[cfg(feature = "derive")]
pub use tagrule_macro::Record;

// Prelude for common imports
// `Record` names both the trait and, with `derive`, the derive macro.
pub mod prelude {
    pub use crate::{
        FieldContext, FieldSpec, FieldValue, Record, SemanticType, ToFieldValue, ValidationError,
        ValidationErrors, Validator, ValidatorConfig, ValidatorError,
    };
}
