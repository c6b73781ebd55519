// Procedural macros for tagrule
// `#[derive(Record)]` lists a struct's rule-carrying fields for the validator

use proc_macro::TokenStream;

mod record;

/// Implements `tagrule::Record` for a struct with named fields.
///
/// Fields with `#[valid("rules")]` are registered as `TypeName.field`;
/// `#[err_msg("message")]` replaces every failure message of that field.
/// Other fields are left out. Field types must implement
/// `tagrule::ToFieldValue`.
#[proc_macro_derive(Record, attributes(valid, err_msg))]
pub fn record_derive(input: TokenStream) -> TokenStream {
    record::record_derive_impl(input)
}
