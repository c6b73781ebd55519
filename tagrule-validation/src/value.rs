// Field values and semantic type tags

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// The collapsed type category predicates branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SemanticType {
    String,
    Int,
    Float,
    Array,
    Map,
    Channel,
    Unknown,
}

impl SemanticType {
    /// Collapse a declared (native) type name into its semantic tag.
    ///
    /// Unmapped names become [`SemanticType::Unknown`].
    pub fn from_declared(declared: &str) -> Self {
        match declared.trim().to_ascii_lowercase().as_str() {
            "string" | "str" | "&str" | "char" => SemanticType::String,
            "int" | "integer" | "int8" | "int16" | "int32" | "int64" | "uint" | "uint8"
            | "uint16" | "uint32" | "uint64" | "uintptr" | "byte" | "rune" | "i8" | "i16"
            | "i32" | "i64" | "i128" | "isize" | "u8" | "u16" | "u32" | "u64" | "u128"
            | "usize" => SemanticType::Int,
            "float" | "float32" | "float64" | "f32" | "f64" | "double" | "number" => {
                SemanticType::Float
            }
            "array" | "slice" | "vec" | "vecdeque" | "list" => SemanticType::Array,
            "map" | "hashmap" | "btreemap" | "object" => SemanticType::Map,
            "chan" | "channel" => SemanticType::Channel,
            _ => SemanticType::Unknown,
        }
    }

    /// Tag name, as used in per-type message templates.
    pub fn as_str(&self) -> &'static str {
        match self {
            SemanticType::String => "string",
            SemanticType::Int => "int",
            SemanticType::Float => "float",
            SemanticType::Array => "array",
            SemanticType::Map => "map",
            SemanticType::Channel => "channel",
            SemanticType::Unknown => "unknown",
        }
    }

    /// Types whose size is an element count.
    pub fn is_collection(&self) -> bool {
        matches!(
            self,
            SemanticType::Array | SemanticType::Map | SemanticType::Channel
        )
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A field's runtime value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FieldValue {
    /// No value was supplied
    #[default]
    Absent,
    Bool(bool),
    /// Every native integer width except `u128` above `i128::MAX`
    Int(i128),
    Float(f64),
    Str(String),
    List(Vec<FieldValue>),
    Map(BTreeMap<String, FieldValue>),
    /// A queue snapshot; only the number of queued items is observable
    Channel { queued: usize },
}

impl FieldValue {
    pub fn is_absent(&self) -> bool {
        matches!(self, FieldValue::Absent)
    }

    /// Whether the value counts as blank for the `sometimes` marker.
    ///
    /// Absent values and whitespace-only strings are blank. Numeric zero is
    /// blank only when `zero_is_blank` is set.
    pub fn is_blank(&self, zero_is_blank: bool) -> bool {
        match self {
            FieldValue::Absent => true,
            FieldValue::Str(s) => s.trim().is_empty(),
            FieldValue::Int(i) => zero_is_blank && *i == 0,
            FieldValue::Float(f) => zero_is_blank && *f == 0.0,
            _ => false,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Exact integer view; numeric strings and integral floats are
    /// accepted. Floats outside the `i128` range have no integer view.
    pub fn as_i128(&self) -> Option<i128> {
        match self {
            FieldValue::Int(i) => Some(*i),
            FieldValue::Float(f)
                if f.fract() == 0.0 && (i128::MIN as f64..i128::MAX as f64).contains(f) =>
            {
                Some(*f as i128)
            }
            FieldValue::Str(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Integer view narrowed to `i64`; `None` when the value does not fit.
    pub fn as_i64(&self) -> Option<i64> {
        self.as_i128().and_then(|i| i64::try_from(i).ok())
    }

    /// Float view; integers and numeric strings are accepted.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Int(i) => Some(*i as f64),
            FieldValue::Float(f) => Some(*f),
            FieldValue::Str(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Number of characters (not bytes) of a string value.
    pub fn char_count(&self) -> Option<usize> {
        self.as_str().map(|s| s.chars().count())
    }

    /// Element count of a list, map or channel value.
    pub fn element_count(&self) -> Option<usize> {
        match self {
            FieldValue::List(items) => Some(items.len()),
            FieldValue::Map(entries) => Some(entries.len()),
            FieldValue::Channel { queued } => Some(*queued),
            _ => None,
        }
    }

    /// Variant name for log output.
    pub fn kind_name(&self) -> &'static str {
        match self {
            FieldValue::Absent => "absent",
            FieldValue::Bool(_) => "bool",
            FieldValue::Int(_) => "int",
            FieldValue::Float(_) => "float",
            FieldValue::Str(_) => "string",
            FieldValue::List(_) => "list",
            FieldValue::Map(_) => "map",
            FieldValue::Channel { .. } => "channel",
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Str(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Str(value)
    }
}

impl From<&String> for FieldValue {
    fn from(value: &String) -> Self {
        FieldValue::Str(value.clone())
    }
}

impl From<char> for FieldValue {
    fn from(value: char) -> Self {
        FieldValue::Str(value.to_string())
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

macro_rules! from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for FieldValue {
                fn from(value: $t) -> Self {
                    FieldValue::Int(i128::from(value))
                }
            }
        )*
    };
}

from_int!(i8, i16, i32, i64, i128, u8, u16, u32, u64);

impl From<isize> for FieldValue {
    fn from(value: isize) -> Self {
        FieldValue::Int(value as i128)
    }
}

impl From<usize> for FieldValue {
    fn from(value: usize) -> Self {
        FieldValue::Int(value as i128)
    }
}

impl From<u128> for FieldValue {
    fn from(value: u128) -> Self {
        i128::try_from(value)
            .map(FieldValue::Int)
            .unwrap_or(FieldValue::Float(value as f64))
    }
}

impl From<f32> for FieldValue {
    fn from(value: f32) -> Self {
        FieldValue::Float(f64::from(value))
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FieldValue::Absent)
    }
}

impl<T: Into<FieldValue>> From<Vec<T>> for FieldValue {
    fn from(value: Vec<T>) -> Self {
        FieldValue::List(value.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<FieldValue>> From<HashMap<String, T>> for FieldValue {
    fn from(value: HashMap<String, T>) -> Self {
        FieldValue::Map(value.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}

impl<T: Into<FieldValue>> From<BTreeMap<String, T>> for FieldValue {
    fn from(value: BTreeMap<String, T>) -> Self {
        FieldValue::Map(value.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}

impl From<serde_json::Value> for FieldValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => FieldValue::Absent,
            Value::Bool(b) => FieldValue::Bool(b),
            Value::Number(n) => match (n.as_i64(), n.as_u64()) {
                (Some(i), _) => FieldValue::Int(i128::from(i)),
                (None, Some(u)) => FieldValue::Int(i128::from(u)),
                _ => n.as_f64().map(FieldValue::Float).unwrap_or_default(),
            },
            Value::String(s) => FieldValue::Str(s),
            Value::Array(items) => FieldValue::List(items.into_iter().map(Into::into).collect()),
            Value::Object(map) => {
                FieldValue::Map(map.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
        }
    }
}

/// Conversion used by record introspection: a field's native type name plus
/// its value.
pub trait ToFieldValue {
    /// Native type name, collapsed later by [`SemanticType::from_declared`].
    const NATIVE_TYPE: &'static str;

    fn to_field_value(&self) -> FieldValue;
}

macro_rules! native {
    ($($t:ty => $name:literal),* $(,)?) => {
        $(
            impl ToFieldValue for $t {
                const NATIVE_TYPE: &'static str = $name;

                fn to_field_value(&self) -> FieldValue {
                    FieldValue::from(*self)
                }
            }
        )*
    };
}

native!(
    bool => "bool",
    char => "char",
    i8 => "i8",
    i16 => "i16",
    i32 => "i32",
    i64 => "i64",
    i128 => "i128",
    isize => "isize",
    u8 => "u8",
    u16 => "u16",
    u32 => "u32",
    u64 => "u64",
    u128 => "u128",
    usize => "usize",
    f32 => "f32",
    f64 => "f64",
);

impl ToFieldValue for String {
    const NATIVE_TYPE: &'static str = "string";

    fn to_field_value(&self) -> FieldValue {
        FieldValue::Str(self.clone())
    }
}

impl ToFieldValue for &str {
    const NATIVE_TYPE: &'static str = "str";

    fn to_field_value(&self) -> FieldValue {
        FieldValue::Str((*self).to_string())
    }
}

impl<T: ToFieldValue> ToFieldValue for Option<T> {
    const NATIVE_TYPE: &'static str = T::NATIVE_TYPE;

    fn to_field_value(&self) -> FieldValue {
        self.as_ref()
            .map(ToFieldValue::to_field_value)
            .unwrap_or(FieldValue::Absent)
    }
}

impl<T: ToFieldValue> ToFieldValue for Box<T> {
    const NATIVE_TYPE: &'static str = T::NATIVE_TYPE;

    fn to_field_value(&self) -> FieldValue {
        (**self).to_field_value()
    }
}

impl<T: ToFieldValue> ToFieldValue for Vec<T> {
    const NATIVE_TYPE: &'static str = "vec";

    fn to_field_value(&self) -> FieldValue {
        FieldValue::List(self.iter().map(ToFieldValue::to_field_value).collect())
    }
}

impl<K: fmt::Display, V: ToFieldValue, S> ToFieldValue for HashMap<K, V, S> {
    const NATIVE_TYPE: &'static str = "hashmap";

    fn to_field_value(&self) -> FieldValue {
        FieldValue::Map(
            self.iter()
                .map(|(k, v)| (k.to_string(), v.to_field_value()))
                .collect(),
        )
    }
}

impl<K: fmt::Display, V: ToFieldValue> ToFieldValue for BTreeMap<K, V> {
    const NATIVE_TYPE: &'static str = "btreemap";

    fn to_field_value(&self) -> FieldValue {
        FieldValue::Map(
            self.iter()
                .map(|(k, v)| (k.to_string(), v.to_field_value()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_mapping() {
        assert_eq!(SemanticType::from_declared("string"), SemanticType::String);
        assert_eq!(SemanticType::from_declared("int64"), SemanticType::Int);
        assert_eq!(SemanticType::from_declared("u8"), SemanticType::Int);
        assert_eq!(SemanticType::from_declared("Float64"), SemanticType::Float);
        assert_eq!(SemanticType::from_declared("slice"), SemanticType::Array);
        assert_eq!(SemanticType::from_declared("HashMap"), SemanticType::Map);
        assert_eq!(SemanticType::from_declared("chan"), SemanticType::Channel);
        assert_eq!(SemanticType::from_declared("bool"), SemanticType::Unknown);
        assert_eq!(SemanticType::from_declared("struct"), SemanticType::Unknown);
    }

    #[test]
    fn test_blank_values() {
        assert!(FieldValue::Absent.is_blank(false));
        assert!(FieldValue::from("").is_blank(false));
        assert!(FieldValue::from("   ").is_blank(false));
        assert!(!FieldValue::from("a").is_blank(false));
        assert!(!FieldValue::Int(0).is_blank(false));
        assert!(FieldValue::Int(0).is_blank(true));
        assert!(FieldValue::Float(0.0).is_blank(true));
        assert!(!FieldValue::List(vec![]).is_blank(true));
    }

    #[test]
    fn test_numeric_views() {
        assert_eq!(FieldValue::from("42").as_i64(), Some(42));
        assert_eq!(FieldValue::Float(3.0).as_i64(), Some(3));
        assert_eq!(FieldValue::Float(3.5).as_i64(), None);
        assert_eq!(FieldValue::Int(7).as_f64(), Some(7.0));
        assert_eq!(FieldValue::Bool(true).as_i64(), None);
    }

    #[test]
    fn test_wide_integers_stay_exact() {
        assert_eq!(FieldValue::from(u64::MAX), FieldValue::Int(u64::MAX as i128));
        assert_eq!(FieldValue::from(u64::MAX).as_i64(), None);
        assert_eq!(FieldValue::from(u64::MAX).as_i128(), Some(u64::MAX as i128));
        assert_eq!(FieldValue::Float(1e30).as_i64(), None);
        assert_eq!(FieldValue::Float(1e40).as_i128(), None);
        assert_eq!(
            FieldValue::from(serde_json::json!(u64::MAX)),
            FieldValue::Int(u64::MAX as i128)
        );
    }

    #[test]
    fn test_counts() {
        assert_eq!(FieldValue::from("héllo").char_count(), Some(5));
        assert_eq!(FieldValue::from(vec![1, 2, 3]).element_count(), Some(3));
        assert_eq!(FieldValue::Channel { queued: 4 }.element_count(), Some(4));
        assert_eq!(FieldValue::Int(1).element_count(), None);
    }

    #[test]
    fn test_from_json() {
        let value = FieldValue::from(serde_json::json!({
            "id": 1,
            "score": 1.5,
            "name": "x",
            "tags": ["a"],
            "gone": null,
        }));

        let FieldValue::Map(map) = value else {
            panic!("expected a map");
        };
        assert_eq!(map["id"], FieldValue::Int(1));
        assert_eq!(map["score"], FieldValue::Float(1.5));
        assert_eq!(map["name"], FieldValue::from("x"));
        assert_eq!(map["tags"], FieldValue::List(vec![FieldValue::from("a")]));
        assert_eq!(map["gone"], FieldValue::Absent);
    }

    #[test]
    fn test_native_types() {
        assert_eq!(<Option<u16> as ToFieldValue>::NATIVE_TYPE, "u16");
        assert_eq!(<Vec<String> as ToFieldValue>::NATIVE_TYPE, "vec");
        assert_eq!(None::<i32>.to_field_value(), FieldValue::Absent);
        assert_eq!(Some(5i32).to_field_value(), FieldValue::Int(5));
        assert_eq!(u64::MAX.to_field_value(), FieldValue::Float(u64::MAX as f64));
    }
}
