// Presence, size and membership rules

use super::{bounds, limit};
use crate::{FieldContext, FieldValue, SemanticType};

/// `required`: blank strings and absent values fail.
pub(crate) fn required(ctx: &FieldContext<'_>) -> bool {
    match ctx.value {
        FieldValue::Absent => false,
        FieldValue::Str(s) => !s.trim().is_empty(),
        _ => true,
    }
}

/// `sometimes`: marks the field optional, always passes.
pub(crate) fn sometimes(_ctx: &FieldContext<'_>) -> bool {
    true
}

/// `range:min,max`, inclusive.
pub(crate) fn range(ctx: &FieldContext<'_>) -> bool {
    match ctx.semantic_type {
        SemanticType::String => within(ctx.value.char_count(), bounds(ctx.argument)),
        SemanticType::Int => within(ctx.value.as_i128(), bounds(ctx.argument)),
        SemanticType::Float => within(ctx.value.as_f64(), bounds(ctx.argument)),
        ty if ty.is_collection() => within(ctx.value.element_count(), bounds(ctx.argument)),
        _ => false,
    }
}

/// `min:n`, inclusive lower bound.
pub(crate) fn min(ctx: &FieldContext<'_>) -> bool {
    compare(ctx, |actual, limit| actual >= limit, |actual, limit| actual >= limit)
}

/// `max:n`, inclusive upper bound.
pub(crate) fn max(ctx: &FieldContext<'_>) -> bool {
    compare(ctx, |actual, limit| actual <= limit, |actual, limit| actual <= limit)
}

/// `in:a,b,c`: the value rendered as text must be one of the listed items.
pub(crate) fn in_list(ctx: &FieldContext<'_>) -> bool {
    let rendered = match ctx.semantic_type {
        SemanticType::String => ctx.value.as_str().map(str::to_string),
        SemanticType::Int => ctx.value.as_i128().map(|i| i.to_string()),
        SemanticType::Float => ctx.value.as_f64().map(|f| f.to_string()),
        _ => None,
    };

    match rendered {
        Some(text) if !text.is_empty() => ctx.argument.split(',').any(|item| item.trim() == text),
        _ => false,
    }
}

fn within<T: PartialOrd>(actual: Option<T>, bounds: Option<(T, T)>) -> bool {
    match (actual, bounds) {
        (Some(actual), Some((min, max))) => actual >= min && actual <= max,
        _ => false,
    }
}

// Lengths and integers share one comparison, floats get their own.
fn compare(
    ctx: &FieldContext<'_>,
    whole: fn(i128, i128) -> bool,
    real: fn(f64, f64) -> bool,
) -> bool {
    let whole_pair = |actual: Option<i128>| match (actual, limit::<i128>(ctx.argument)) {
        (Some(actual), Some(limit)) => whole(actual, limit),
        _ => false,
    };

    match ctx.semantic_type {
        SemanticType::String => whole_pair(ctx.value.char_count().map(|n| n as i128)),
        SemanticType::Int => whole_pair(ctx.value.as_i128()),
        SemanticType::Float => match (ctx.value.as_f64(), limit::<f64>(ctx.argument)) {
            (Some(actual), Some(limit)) => real(actual, limit),
            _ => false,
        },
        ty if ty.is_collection() => whole_pair(ctx.value.element_count().map(|n| n as i128)),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::check;
    use std::collections::HashMap;

    #[test]
    fn test_required() {
        assert!(check(required, "string", "null", "x"));
        assert!(!check(required, "string", "null", ""));
        assert!(!check(required, "string", "null", "  "));
        assert!(!check(required, "int", "null", FieldValue::Absent));
        assert!(check(required, "int", "null", 0));
    }

    #[test]
    fn test_range_counts_characters() {
        assert!(!check(range, "string", "8,20", "ab"));
        assert!(check(range, "string", "8,20", "abcdefgh"));
        // eight characters, more than eight bytes
        assert!(check(range, "string", "1,8", "ünïcödéé"));
        assert!(!check(range, "string", "1,7", "ünïcödéé"));
    }

    #[test]
    fn test_range_by_type() {
        assert!(check(range, "int", "1,80", 80));
        assert!(!check(range, "int", "1,80", 100));
        assert!(check(range, "float", "0.5,1.5", 1.0));
        assert!(!check(range, "float", "0.5,1.5", 1.6));
        assert!(check(range, "array", "1,3", vec![1, 2]));
        assert!(!check(range, "map", "1,3", HashMap::<String, i32>::new()));
        assert!(check(range, "chan", "1,3", FieldValue::Channel { queued: 3 }));
        assert!(!check(range, "bool", "0,1", true));
    }

    #[test]
    fn test_range_malformed_argument() {
        assert!(!check(range, "int", "80", 5));
        assert!(!check(range, "int", "a,b", 5));
        assert!(!check(range, "int", "null", 5));
    }

    #[test]
    fn test_min_max() {
        assert!(!check(min, "int", "100", 1));
        assert!(check(min, "int", "0", 0));
        assert!(!check(min, "int", "0", -1));
        assert!(!check(min, "string", "10", "zhangsan"));
        assert!(check(max, "int", "100", 26));
        assert!(!check(max, "float", "1.5", 1.75));
        assert!(check(max, "slice", "2", vec!["a", "b"]));
        assert!(!check(max, "slice", "1", vec!["a", "b"]));
        assert!(!check(min, "unknown", "1", 5));
    }

    #[test]
    fn test_numeric_strings_for_numeric_types() {
        assert!(check(min, "int", "18", "21"));
        assert!(!check(min, "int", "18", "abc"));
    }

    #[test]
    fn test_wide_integers_compare_exactly() {
        assert!(!check(max, "u64", "9223372036854775807", u64::MAX));
        assert!(check(max, "u64", "18446744073709551615", u64::MAX));
        assert!(check(min, "u128", "9223372036854775808", 1u128 << 63));
        assert!(!check(range, "usize", "0,9223372036854775807", u64::MAX));
        assert!(check(in_list, "u64", "18446744073709551615", u64::MAX));
    }

    #[test]
    fn test_in_list() {
        assert!(check(in_list, "string", "a,b,c", "a"));
        assert!(!check(in_list, "string", "cn,us,uk", "fr"));
        assert!(check(in_list, "int", "0,1", 1));
        assert!(check(in_list, "float", "1.5,2", 2.0));
        assert!(!check(in_list, "string", "a,,b", ""));
        assert!(!check(in_list, "array", "1", vec![1]));
    }

    #[test]
    fn test_sometimes_always_passes() {
        assert!(check(sometimes, "string", "null", ""));
    }
}
