//! Encode values as text.
//!
//! `Format::Tcl` writes canonical Tcl list/dict text that parses back to the
//! same value under the shape it was read with. `Format::Json` writes
//! pretty-printed JSON. YAML, TOML, and CBOR are handled by the CLI tool
//! (bintclshape) using dedicated libraries.

use crate::Value;
use std::collections::HashMap;

/// Output format for encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Tcl list/dict text
    Tcl,
    /// JSON (standard)
    Json,
}

/// Encode a value to a string in the specified format.
pub fn encode(value: &Value, format: Format) -> String {
    match format {
        Format::Tcl => encode_tcl(value, 0),
        Format::Json => encode_json(value, 0),
    }
}

// =============================================================================
// Tcl Encoder
// =============================================================================

/// Encode the body of a value: the words of a list, the pairs of a dict, or
/// a single word for a leaf. Compound values are not wrapped in braces here;
/// `encode_tcl_word` does that when they are nested.
fn encode_tcl(value: &Value, indent: usize) -> String {
    let pad = "  ".repeat(indent);

    match value {
        Value::List(items) => {
            if can_inline(items.iter()) {
                let words: Vec<String> = items.iter().map(|v| encode_tcl_word(v, 0)).collect();
                words.join(" ")
            } else {
                let lines: Vec<String> = items
                    .iter()
                    .map(|v| format!("{}{}", pad, encode_tcl_word(v, indent)))
                    .collect();
                lines.join("\n")
            }
        }
        Value::Dict(map) => {
            let keys = sorted_keys(map);
            if can_inline(map.values()) {
                let pairs: Vec<String> = keys
                    .iter()
                    .map(|k| format!("{} {}", encode_tcl_string(k), encode_tcl_word(&map[*k], 0)))
                    .collect();
                pairs.join(" ")
            } else {
                let lines: Vec<String> = keys
                    .iter()
                    .map(|k| {
                        format!(
                            "{}{} {}",
                            pad,
                            encode_tcl_string(k),
                            encode_tcl_word(&map[*k], indent)
                        )
                    })
                    .collect();
                lines.join("\n")
            }
        }
        _ => encode_tcl_word(value, indent),
    }
}

/// Encode a value as a single word of its parent.
fn encode_tcl_word(value: &Value, indent: usize) -> String {
    match value {
        Value::Null => "{}".to_string(),
        Value::Integer(n) => n.to_string(),
        Value::String(s) => encode_tcl_string(s),
        Value::List(_) | Value::Dict(_) => {
            if is_empty_compound(value) {
                "{}".to_string()
            } else if is_inline_compound(value) {
                format!("{{{}}}", encode_tcl(value, 0))
            } else {
                format!(
                    "{{\n{}\n{}}}",
                    encode_tcl(value, indent + 1),
                    "  ".repeat(indent)
                )
            }
        }
    }
}

/// Quote a string so the tokenizer reads it back as one word with the same
/// text. Strings that neither braces nor quotes can hold exactly (unbalanced
/// braces plus an unescaped quote, or a trailing backslash) are braced as-is.
fn encode_tcl_string(s: &str) -> String {
    if is_bare_word(s) {
        s.to_string()
    } else if fits_in_braces(s) || !fits_in_quotes(s) {
        format!("{{{}}}", s)
    } else {
        format!("\"{}\"", s)
    }
}

fn is_bare_word(s: &str) -> bool {
    !s.is_empty()
        && !s
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '{' | '}' | '[' | ']' | '"' | ';' | '\\'))
}

/// Unescaped braces balance and never close early, and the text does not
/// end in an escaping backslash.
fn fits_in_braces(s: &str) -> bool {
    let mut depth = 0usize;
    let mut escaped = false;
    for c in s.chars() {
        let was_escaped = escaped;
        escaped = c == '\\' && !was_escaped;
        if was_escaped {
            continue;
        }
        match c {
            '{' => depth += 1,
            '}' => {
                if depth == 0 {
                    return false;
                }
                depth -= 1;
            }
            _ => {}
        }
    }
    depth == 0 && !escaped
}

fn fits_in_quotes(s: &str) -> bool {
    let mut escaped = false;
    for c in s.chars() {
        let was_escaped = escaped;
        escaped = c == '\\' && !was_escaped;
        if c == '"' && !was_escaped {
            return false;
        }
    }
    !escaped
}

fn can_inline<'a>(mut values: impl ExactSizeIterator<Item = &'a Value>) -> bool {
    values.len() <= 5 && values.all(is_simple_value)
}

fn is_simple_value(v: &Value) -> bool {
    !v.is_compound() || is_empty_compound(v)
}

fn is_empty_compound(v: &Value) -> bool {
    match v {
        Value::List(items) => items.is_empty(),
        Value::Dict(map) => map.is_empty(),
        _ => false,
    }
}

fn is_inline_compound(v: &Value) -> bool {
    match v {
        Value::List(items) => can_inline(items.iter()),
        Value::Dict(map) => can_inline(map.values()),
        _ => true,
    }
}

fn sorted_keys(map: &HashMap<String, Value>) -> Vec<&String> {
    let mut keys: Vec<&String> = map.keys().collect();
    keys.sort();
    keys
}

// =============================================================================
// JSON Encoder
// =============================================================================

fn encode_json(value: &Value, indent: usize) -> String {
    let pad = "  ".repeat(indent);
    let pad1 = "  ".repeat(indent + 1);

    match value {
        Value::Null => "null".to_string(),
        Value::Integer(n) => n.to_string(),
        Value::String(s) => encode_json_string(s),
        Value::List(items) => {
            if items.is_empty() {
                "[]".to_string()
            } else {
                let items: Vec<String> = items
                    .iter()
                    .map(|v| format!("{}{}", pad1, encode_json(v, indent + 1)))
                    .collect();
                format!("[\n{}\n{}]", items.join(",\n"), pad)
            }
        }
        Value::Dict(map) => {
            if map.is_empty() {
                "{}".to_string()
            } else {
                let items: Vec<String> = sorted_keys(map)
                    .into_iter()
                    .map(|k| {
                        format!(
                            "{}{}: {}",
                            pad1,
                            encode_json_string(k),
                            encode_json(&map[k], indent + 1)
                        )
                    })
                    .collect();
                format!("{{\n{}\n{}}}", items.join(",\n"), pad)
            }
        }
    }
}

fn encode_json_string(s: &str) -> String {
    let mut result = String::from("\"");
    for c in s.chars() {
        match c {
            '"' => result.push_str("\\\""),
            '\\' => result.push_str("\\\\"),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            '\x08' => result.push_str("\\b"),
            '\x0c' => result.push_str("\\f"),
            c if c.is_control() => {
                result.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => result.push(c),
        }
    }
    result.push('"');
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parse, Shape};

    fn dict(pairs: &[(&str, Value)]) -> Value {
        Value::Dict(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        )
    }

    #[test]
    fn test_encode_tcl_words() {
        assert_eq!(encode_tcl_string("plain"), "plain");
        assert_eq!(encode_tcl_string(""), "{}");
        assert_eq!(encode_tcl_string("two words"), "{two words}");
        assert_eq!(encode_tcl_string("a}b"), "\"a}b\"");
        assert_eq!(encode_tcl_string(r"a\{b"), r"{a\{b}");
        assert_eq!(encode_tcl_string("x;y"), "{x;y}");
    }

    #[test]
    fn test_encode_tcl_flat_dict() {
        let value = dict(&[
            ("b", Value::from("xyz")),
            ("a", Value::from(4711u64)),
            ("d", Value::Null),
        ]);
        assert_eq!(encode(&value, Format::Tcl), "a 4711 b xyz d {}");
    }

    #[test]
    fn test_encode_tcl_nested() {
        let value = dict(&[
            ("xs", Value::List(vec![Value::from(1u64), Value::from("a b")])),
            ("empty", Value::List(vec![])),
        ]);
        assert_eq!(encode(&value, Format::Tcl), "empty {}\nxs {1 {a b}}");
    }

    #[test]
    fn test_encode_tcl_round_trip() {
        let source = "name {Widget Pro} tags {red green} dims {w 10 h 0} notes {} \
                      blob \"a}b\"";
        let shape = Shape::from_tags(&["dict", "string"]).unwrap();
        let value = parse(source, &shape).unwrap();
        let text = encode(&value, Format::Tcl);
        assert_eq!(parse(&text, &shape).unwrap(), value);

        let shape = Shape::from_tags(&["dict", "list", "list", "string"]).unwrap();
        let source = "a {{1 2} {3 4} {} {x {y z}}} b {{q}} c {1 2 3 4 5 6 7}";
        let value = parse(source, &shape).unwrap();
        let text = encode(&value, Format::Tcl);
        assert_eq!(parse(&text, &shape).unwrap(), value);
    }

    #[test]
    fn test_encode_json() {
        let value = dict(&[
            ("a", Value::from(4711u64)),
            ("b", Value::List(vec![Value::Null, Value::from("x\"y")])),
        ]);
        assert_eq!(
            encode(&value, Format::Json),
            "{\n  \"a\": 4711,\n  \"b\": [\n    null,\n    \"x\\\"y\"\n  ]\n}"
        );
    }

    #[test]
    fn test_encode_json_empty() {
        assert_eq!(encode(&Value::List(vec![]), Format::Json), "[]");
        assert_eq!(encode(&dict(&[]), Format::Json), "{}");
        assert_eq!(encode(&Value::from("\u{1}"), Format::Json), "\"\\u0001\"");
    }
}
