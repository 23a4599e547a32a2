//! Path-targeted type coercion for converted JSON.
//!
//! The structural XML→JSON mapping cannot tell a one-element list from a
//! singleton, and every leaf comes out as text. The coercion lists of an
//! [`X2jPolicy`](crate::policy::X2jPolicy) fix this up after the fact by
//! addressing individual fields with pointer expressions.
//!
//! Only fields whose parent resolves to an object are touched. Everything
//! else is a soft miss: counted, logged at debug level, and skipped.

use crate::errors::ConverterError;
use crate::pointer::FieldPath;
use crate::policy::CoercionMode;
use crate::stats::CoercionStats;
use serde_json::{Map, Number, Value};

/// What a coercion list turns its targets into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoercionKind {
    Array,
    Boolean,
    Number,
}

/// Apply one coercion list to `root`, path by path in list order.
///
/// Fails on the first malformed path; the partially coerced tree is dropped.
pub fn coerce(
    mut root: Value,
    paths: &[String],
    kind: CoercionKind,
    mode: CoercionMode,
    stats: &CoercionStats,
) -> Result<Value, ConverterError> {
    for path in paths {
        let (parent, key) = match FieldPath::parse(path)? {
            FieldPath::Root => {
                // A wrapper around the root would have nowhere to live.
                stats.record_miss(path, "the document root cannot be coerced in place");
                continue;
            }
            FieldPath::Field { parent, key } => (parent, key),
        };

        match kind {
            CoercionKind::Array => coerce_array(&mut root, path, parent, key, mode, stats),
            CoercionKind::Boolean => coerce_boolean(&mut root, path, parent, key, stats),
            CoercionKind::Number => coerce_number(&mut root, path, parent, key, mode, stats),
        }
    }
    Ok(root)
}

fn parent_object<'v>(root: &'v mut Value, parent: &str) -> Option<&'v mut Map<String, Value>> {
    root.pointer_mut(parent).and_then(Value::as_object_mut)
}

fn coerce_array(
    root: &mut Value,
    path: &str,
    parent: &str,
    key: String,
    mode: CoercionMode,
    stats: &CoercionStats,
) {
    let snapshot = match mode {
        CoercionMode::Legacy => Some(root.clone()),
        CoercionMode::Corrected => None,
    };
    let Some(map) = parent_object(root, parent) else {
        stats.record_miss(path, "parent is missing or not an object");
        return;
    };

    match map.get_mut(&key) {
        Some(Value::Array(_)) => {}
        Some(target) => {
            let item = match snapshot {
                Some(whole_root) => whole_root,
                None => {
                    stats.record_corrected(path);
                    target.take()
                }
            };
            *target = Value::Array(vec![item]);
            stats.record_applied();
        }
        None => match snapshot {
            Some(whole_root) => {
                map.insert(key, Value::Array(vec![whole_root]));
                stats.record_applied();
            }
            None => stats.record_miss(path, "field not found"),
        },
    }
}

fn coerce_boolean(root: &mut Value, path: &str, parent: &str, key: String, stats: &CoercionStats) {
    let Some(map) = parent_object(root, parent) else {
        stats.record_miss(path, "parent is missing or not an object");
        return;
    };
    let Some(Value::String(text)) = map.get(&key) else {
        stats.record_miss(path, "field is missing or not text");
        return;
    };

    let flag = if text.eq_ignore_ascii_case("true") {
        true
    } else if text.eq_ignore_ascii_case("false") {
        false
    } else {
        stats.record_miss(path, "text is neither true nor false");
        return;
    };
    map.insert(key, Value::Bool(flag));
    stats.record_applied();
}

fn coerce_number(
    root: &mut Value,
    path: &str,
    parent: &str,
    key: String,
    mode: CoercionMode,
    stats: &CoercionStats,
) {
    let Some(map) = parent_object(root, parent) else {
        stats.record_miss(path, "parent is missing or not an object");
        return;
    };
    let Some(Value::String(text)) = map.get(&key) else {
        stats.record_miss(path, "field is missing or not text");
        return;
    };

    // The decimal point is always looked for in the field text.
    let fractional = text.contains('.');
    let source = match mode {
        CoercionMode::Corrected => text.as_str(),
        CoercionMode::Legacy => path,
    };
    let Some(number) = parse_number(source, fractional) else {
        stats.record_parse_failure(path, source);
        return;
    };
    if mode == CoercionMode::Corrected {
        stats.record_corrected(path);
    }
    map.insert(key, Value::Number(number));
    stats.record_applied();
}

fn parse_number(text: &str, fractional: bool) -> Option<Number> {
    if fractional {
        text.parse::<f64>().ok().and_then(Number::from_f64)
    } else {
        text.parse::<i64>().ok().map(Number::from)
    }
}
