//! `#[derive(Record)]` expansion
//!
//! Rule expressions are checked at compile time for the mistakes the
//! runtime parser treats as fatal:
//! - The expression must name at least one rule
//! - Every `|` segment that is not blank needs a rule name before `:`

use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::{Attribute, Data, DeriveInput, Error, Fields, LitStr, parse_macro_input};

pub fn record_derive_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match expand(&input) {
        Ok(expanded) => TokenStream::from(expanded),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(input: &DeriveInput) -> Result<proc_macro2::TokenStream, Error> {
    let name = &input.ident;
    let type_name = name.to_string();

    let Data::Struct(data) = &input.data else {
        return Err(Error::new_spanned(
            name,
            "Record can only be derived for structs",
        ));
    };
    let Fields::Named(fields) = &data.fields else {
        return Err(Error::new_spanned(
            name,
            "Record can only be derived for structs with named fields",
        ));
    };

    let mut entries = Vec::new();
    for field in &fields.named {
        let Some(rules) = string_attr(&field.attrs, "valid")? else {
            continue;
        };
        validate_expression(&rules.value(), rules.span())?;

        let message = match string_attr(&field.attrs, "err_msg")? {
            Some(message) => quote! { ::core::option::Option::Some(#message) },
            None => quote! { ::core::option::Option::None },
        };

        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let field_name = ident.to_string();
        let field_name = field_name.trim_start_matches("r#");
        let ty = &field.ty;

        entries.push(quote! {
            ::tagrule::RecordField {
                name: #field_name,
                declared_type: <#ty as ::tagrule::ToFieldValue>::NATIVE_TYPE,
                rules: #rules,
                message: #message,
                value: ::tagrule::ToFieldValue::to_field_value(&self.#ident),
            }
        });
    }

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::tagrule::Record for #name #ty_generics #where_clause {
            fn type_name(&self) -> &'static str {
                #type_name
            }

            fn record_fields(&self) -> ::std::vec::Vec<::tagrule::RecordField> {
                ::std::vec![#(#entries),*]
            }
        }
    })
}

// Reads `#[name("...")]`.
fn string_attr(attrs: &[Attribute], name: &str) -> Result<Option<LitStr>, Error> {
    for attr in attrs {
        if attr.path().is_ident(name) {
            return attr.parse_args::<LitStr>().map(Some);
        }
    }
    Ok(None)
}

/// Validate a rule expression at compile time
pub fn validate_expression(expression: &str, span: Span) -> Result<(), Error> {
    let mut named = 0;

    for segment in expression.split('|') {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }

        let name = segment.split(':').next().unwrap_or_default().trim();
        if name.is_empty() {
            return Err(Error::new(
                span,
                format!(
                    "rule segment \"{}\" has no rule name\n\
                     hint: write it as \"name:{}\"",
                    segment,
                    segment.trim_start_matches(':')
                ),
            ));
        }
        named += 1;
    }

    if named == 0 {
        return Err(Error::new(
            span,
            "rule expression names no rule\n\
             hint: remove the attribute or add a rule such as \"required\"",
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validate(expression: &str) -> Result<(), String> {
        validate_expression(expression, Span::call_site()).map_err(|e| e.to_string())
    }

    #[test]
    fn test_valid_expressions() {
        assert!(validate("required").is_ok());
        assert!(validate("required|range:8,20|email").is_ok());
        assert!(validate("sometimes|in:a,b,c|").is_ok());
        assert!(validate(" min : 3 ").is_ok());
    }

    #[test]
    fn test_invalid_expressions() {
        assert!(validate("").is_err());
        assert!(validate(" | |").is_err());
        let err = validate("required|:8").unwrap_err();
        assert!(err.contains("\":8\""));
    }

    #[test]
    fn test_expand_lists_only_annotated_fields() {
        let input: DeriveInput = syn::parse_quote! {
            struct User {
                #[valid("required|range:3,20")]
                #[err_msg("Bad name")]
                name: String,
                internal: u64,
                #[valid("sometimes|min:18")]
                age: Option<u8>,
            }
        };

        let expanded = expand(&input).unwrap().to_string();
        assert!(expanded.contains("\"User\""));
        assert!(expanded.contains("\"required|range:3,20\""));
        assert!(expanded.contains("\"Bad name\""));
        assert!(expanded.contains("\"age\""));
        assert!(!expanded.contains("internal"));
    }

    #[test]
    fn test_expand_rejects_non_structs() {
        let input: DeriveInput = syn::parse_quote! {
            enum Choice { A, B }
        };
        assert!(expand(&input).is_err());

        let input: DeriveInput = syn::parse_quote! {
            struct Pair(#[valid("required")] String, u8);
        };
        assert!(expand(&input).is_err());
    }

    #[test]
    fn test_expand_rejects_empty_rules() {
        let input: DeriveInput = syn::parse_quote! {
            struct Bad {
                #[valid("")]
                name: String,
            }
        };
        assert!(expand(&input).is_err());
    }
}
