//! CBOR transcoding: render parsed values as CBOR binary data.
//!
//! Mapping:
//!   - Value::Null    -> CBOR null (simple value 22)
//!   - Value::Integer -> CBOR unsigned integer (smallest encoding that fits)
//!   - Value::String  -> CBOR text string (determinate length)
//!   - Value::List    -> CBOR array (determinate length)
//!   - Value::Dict    -> CBOR map (determinate length, sorted text keys)
//!
//! Integers above 2^64-1 produce an error rather than using bignum tags.

use ciborium::value::{Integer, Value as CborValue};
use libtclshape::Value;
use num_traits::ToPrimitive;
use std::fmt::Write as FmtWrite;

// ---------------------------------------------------------------------------
// Encode
// ---------------------------------------------------------------------------

/// Encode a Value as CBOR bytes.
pub fn encode(value: &Value) -> Result<Vec<u8>, String> {
    let cbor_value = value_to_cbor(value)?;
    let mut buf = Vec::new();
    ciborium::ser::into_writer(&cbor_value, &mut buf)
        .map_err(|e| format!("CBOR encode error: {}", e))?;
    Ok(buf)
}

fn value_to_cbor(value: &Value) -> Result<CborValue, String> {
    match value {
        Value::Null => Ok(CborValue::Null),
        // Coerced integers are never negative, so u64 covers the native range.
        Value::Integer(n) => {
            let val = n.to_u64().ok_or_else(|| {
                format!("integer {} exceeds CBOR's native integer range (2^64-1)", n)
            })?;
            Ok(CborValue::Integer(Integer::from(val)))
        }
        Value::String(s) => Ok(CborValue::Text(s.clone())),
        Value::List(items) => items
            .iter()
            .map(value_to_cbor)
            .collect::<Result<Vec<_>, _>>()
            .map(CborValue::Array),
        Value::Dict(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let mut pairs = Vec::with_capacity(keys.len());
            for k in keys {
                pairs.push((CborValue::Text(k.clone()), value_to_cbor(&map[k])?));
            }
            Ok(CborValue::Map(pairs))
        }
    }
}

// ---------------------------------------------------------------------------
// Diagnostic Notation (RFC 8949 §8)
// ---------------------------------------------------------------------------

/// Render CBOR bytes as diagnostic notation.
///
/// Works from the encoded bytes rather than from the Value so the output
/// shows what actually went over the wire.
pub fn diagnostic(input: &[u8]) -> Result<String, String> {
    let cbor_value: CborValue =
        ciborium::de::from_reader(input).map_err(|e| format!("CBOR decode error: {}", e))?;
    let mut out = String::new();
    diag_value(&mut out, &cbor_value, 0).map_err(|e| e.to_string())?;
    out.push('\n');
    Ok(out)
}

fn diag_value(out: &mut String, val: &CborValue, indent: usize) -> std::fmt::Result {
    match val {
        CborValue::Null => out.push_str("null"),
        CborValue::Integer(i) => write!(out, "{}", i128::from(*i))?,
        CborValue::Text(s) => diag_text(out, s),
        CborValue::Array(items) => {
            if items.iter().all(|v| !is_container(v)) {
                out.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    diag_value(out, item, indent)?;
                }
                out.push(']');
            } else {
                diag_block(out, '[', ']', items.len(), indent, |out, i, child| {
                    diag_value(out, &items[i], child)
                })?;
            }
        }
        CborValue::Map(pairs) => {
            if pairs.is_empty() {
                out.push_str("{}");
            } else {
                diag_block(out, '{', '}', pairs.len(), indent, |out, i, child| {
                    let (k, v) = &pairs[i];
                    diag_value(out, k, child)?;
                    out.push_str(": ");
                    diag_value(out, v, child)
                })?;
            }
        }
        other => write!(out, "<?unknown {:?}>", other)?,
    }
    Ok(())
}

/// Write `count` entries one per line between `open` and `close`.
fn diag_block(
    out: &mut String,
    open: char,
    close: char,
    count: usize,
    indent: usize,
    mut entry: impl FnMut(&mut String, usize, usize) -> std::fmt::Result,
) -> std::fmt::Result {
    let child = indent + 2;
    out.push(open);
    out.push('\n');
    for i in 0..count {
        out.push_str(&" ".repeat(child));
        entry(out, i, child)?;
        if i + 1 < count {
            out.push(',');
        }
        out.push('\n');
    }
    out.push_str(&" ".repeat(indent));
    out.push(close);
    Ok(())
}

/// Write a text string in diagnostic notation, using JSON-style escapes.
fn diag_text(out: &mut String, s: &str) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

fn is_container(val: &CborValue) -> bool {
    matches!(val, CborValue::Array(_) | CborValue::Map(_))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_encode_scalars() {
        assert_eq!(encode(&Value::Null).unwrap(), vec![0xf6]);
        assert_eq!(encode(&Value::from(23u64)).unwrap(), vec![0x17]);
        assert_eq!(encode(&Value::from(4711u64)).unwrap(), vec![0x19, 0x12, 0x67]);
        assert_eq!(encode(&Value::from("ab")).unwrap(), vec![0x62, b'a', b'b']);
    }

    #[test]
    fn test_encode_out_of_range() {
        let big = Value::Integer("18446744073709551616".parse().unwrap());
        assert!(encode(&big).is_err());
    }

    #[test]
    fn test_diagnostic() {
        let mut map = HashMap::new();
        map.insert("b".to_string(), Value::List(vec![Value::from(1u64), Value::Null]));
        map.insert("a".to_string(), Value::from("x"));
        let bytes = encode(&Value::Dict(map)).unwrap();
        assert_eq!(
            diagnostic(&bytes).unwrap(),
            "{\n  \"a\": \"x\",\n  \"b\": [1, null]\n}\n"
        );
    }

    #[test]
    fn test_encode_nested_uses_sorted_keys() {
        let mut map = HashMap::new();
        map.insert("b".to_string(), Value::List(vec![Value::Null]));
        map.insert("a".to_string(), Value::from(1u64));
        assert_eq!(
            encode(&Value::Dict(map)).unwrap(),
            vec![0xa2, 0x61, b'a', 0x01, 0x61, b'b', 0x81, 0xf6]
        );
    }

    #[test]
    fn test_diagnostic_escapes_text() {
        let bytes = encode(&Value::from("a\u{1}b")).unwrap();
        assert_eq!(diagnostic(&bytes).unwrap(), "\"a\\u0001b\"\n");

        let bytes = encode(&Value::from("say \"hi\"\\\n\u{7f}")).unwrap();
        assert_eq!(
            diagnostic(&bytes).unwrap(),
            "\"say \\\"hi\\\"\\\\\\n\\u007f\"\n"
        );
    }
}
