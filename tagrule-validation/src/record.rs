// Record traits

use crate::FieldValue;

/// One field of a record, as seen by the validator.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordField {
    /// Field name without the type prefix
    pub name: &'static str,
    /// Native type name, e.g. `i32` or `string`
    pub declared_type: &'static str,
    /// Rule expression from `#[valid("...")]`
    pub rules: &'static str,
    /// Message from `#[err_msg("...")]`
    pub message: Option<&'static str>,
    pub value: FieldValue,
}

/// Trait for types whose fields carry rule expressions.
///
/// Usually derived with `#[derive(Record)]`; fields without a `#[valid]`
/// attribute are not listed.
pub trait Record {
    /// Short type name, used as the field name prefix: `User.name`
    fn type_name(&self) -> &'static str;

    /// Fields that carry rules, in declaration order
    fn record_fields(&self) -> Vec<RecordField>;
}

impl<T: Record + ?Sized> Record for &T {
    fn type_name(&self) -> &'static str {
        (**self).type_name()
    }

    fn record_fields(&self) -> Vec<RecordField> {
        (**self).record_fields()
    }
}

impl<T: Record + ?Sized> Record for Box<T> {
    fn type_name(&self) -> &'static str {
        (**self).type_name()
    }

    fn record_fields(&self) -> Vec<RecordField> {
        (**self).record_fields()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ToFieldValue;

    struct Account {
        login: String,
        age: Option<u8>,
    }

    impl Record for Account {
        fn type_name(&self) -> &'static str {
            "Account"
        }

        fn record_fields(&self) -> Vec<RecordField> {
            vec![
                RecordField {
                    name: "login",
                    declared_type: <String as ToFieldValue>::NATIVE_TYPE,
                    rules: "required|alphaDash",
                    message: None,
                    value: self.login.to_field_value(),
                },
                RecordField {
                    name: "age",
                    declared_type: <Option<u8> as ToFieldValue>::NATIVE_TYPE,
                    rules: "sometimes|range:18,99",
                    message: Some("Adults only"),
                    value: self.age.to_field_value(),
                },
            ]
        }
    }

    #[test]
    fn test_manual_record() {
        let account = Account {
            login: "jane_doe".to_string(),
            age: None,
        };

        let fields = account.record_fields();
        assert_eq!(fields[0].declared_type, "string");
        assert_eq!(fields[0].value, FieldValue::from("jane_doe"));
        assert_eq!(fields[1].declared_type, "u8");
        assert_eq!(fields[1].value, FieldValue::Absent);
    }

    #[test]
    fn test_boxed_record() {
        let boxed: Box<dyn Record> = Box::new(Account {
            login: "x".to_string(),
            age: Some(30),
        });
        assert_eq!(boxed.type_name(), "Account");
        assert_eq!(boxed.record_fields()[1].value, FieldValue::Int(30));
    }
}
