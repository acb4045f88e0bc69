//! Policy result decoding.
//!
//! Query results are arbitrarily nested sets, arrays and objects. The walk
//! classifies every node as a sequence, a mapping or a leaf; a mapping with
//! a `message` key is a violation and is not descended into.

use regolint_core::types::{Fix, FixEdit, Position, Violation};
use serde_json::{Map, Value};

enum Shape<'v> {
    Sequence(&'v [Value]),
    Mapping(&'v Map<String, Value>),
    Leaf,
}

impl<'v> Shape<'v> {
    fn of(value: &'v Value) -> Self {
        match value {
            Value::Array(items) => Shape::Sequence(items),
            Value::Object(map) => Shape::Mapping(map),
            _ => Shape::Leaf,
        }
    }
}

/// Append every violation found in `value` to `out`, in walk order.
pub fn collect_violations(value: &Value, out: &mut Vec<Violation>) {
    match Shape::of(value) {
        Shape::Sequence(items) => {
            for item in items {
                collect_violations(item, out);
            }
        }
        Shape::Mapping(map) if map.contains_key("message") => out.push(decode_violation(map)),
        Shape::Mapping(map) => {
            for nested in map.values() {
                collect_violations(nested, out);
            }
        }
        Shape::Leaf => {}
    }
}

fn decode_violation(map: &Map<String, Value>) -> Violation {
    Violation {
        message: text(map.get("message")).unwrap_or_default(),
        rule: text(map.get("rule")).unwrap_or_default(),
        severity: text(map.get("severity")),
        position: map.get("position").map(decode_position).unwrap_or_default(),
        fix: map.get("fix").and_then(Value::as_object).map(decode_fix),
    }
}

fn decode_position(value: &Value) -> Position {
    let Some(map) = value.as_object() else {
        return Position::default();
    };
    Position {
        file: text(map.get("file")).unwrap_or_default(),
        line: number(map.get("line")),
        column: number(map.get("column")),
    }
}

fn decode_fix(map: &Map<String, Value>) -> Fix {
    let edits = map
        .get("edits")
        .and_then(Value::as_array)
        .map(|edits| {
            edits
                .iter()
                .filter_map(Value::as_object)
                .map(|edit| FixEdit {
                    position: edit.get("position").map(decode_position).unwrap_or_default(),
                    old_text: text(edit.get("old_text")).filter(|s| !s.is_empty()),
                    new_text: text(edit.get("new_text")).unwrap_or_default(),
                })
                .collect()
        })
        .unwrap_or_default();

    Fix {
        description: text(map.get("description")).unwrap_or_default(),
        edits,
    }
}

/// String members only; anything else reads as absent.
fn text(value: Option<&Value>) -> Option<String> {
    value.and_then(Value::as_str).map(str::to_string)
}

/// Integer, float (truncated) or numeric text; anything else is 0.
fn number(value: Option<&Value>) -> u32 {
    let n = match value {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        Some(Value::String(s)) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|f| f as i64))
                .unwrap_or(0)
        }
        _ => 0,
    };
    u32::try_from(n).unwrap_or(0)
}
