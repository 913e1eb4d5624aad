//! Leaf value coercion.

use crate::value::Value;
use num_bigint::BigInt;

/// Coerce a leaf token into a value.
///
/// Empty tokens become `Null`, tokens of the form `[1-9][0-9]*` become
/// integers, and everything else is kept as the original string. A lone `0`
/// and zero-padded numbers stay strings.
pub fn coerce(token: &str) -> Value {
    if token.is_empty() {
        return Value::Null;
    }
    if is_integer_pattern(token) {
        if let Ok(n) = token.parse::<BigInt>() {
            return Value::Integer(n);
        }
    }
    Value::String(token.to_string())
}

fn is_integer_pattern(s: &str) -> bool {
    let bytes = s.as_bytes();
    matches!(bytes.first(), Some(b'1'..=b'9')) && bytes.iter().all(u8::is_ascii_digit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_empty() {
        assert_eq!(coerce(""), Value::Null);
    }

    #[test]
    fn test_coerce_integer() {
        assert_eq!(coerce("4711"), Value::Integer(4711.into()));
        assert_eq!(coerce("9"), Value::Integer(9.into()));
        let big = "123456789012345678901234567890";
        assert_eq!(coerce(big), Value::Integer(big.parse().unwrap()));
    }

    #[test]
    fn test_coerce_leading_zero_stays_string() {
        assert_eq!(coerce("0"), Value::String("0".into()));
        assert_eq!(coerce("007"), Value::String("007".into()));
    }

    #[test]
    fn test_coerce_non_digits() {
        assert_eq!(coerce("-5"), Value::String("-5".into()));
        assert_eq!(coerce("1.5"), Value::String("1.5".into()));
        assert_eq!(coerce("12ab"), Value::String("12ab".into()));
        assert_eq!(coerce("١٢"), Value::String("١٢".into()));
    }
}
