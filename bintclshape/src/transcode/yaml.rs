//! YAML transcoding: render parsed values as YAML text.
//!
//! Mapping:
//!   - Value::Null     -> YAML null
//!   - Value::Integer  -> YAML integer (as a string if it exceeds u64)
//!   - Value::String   -> YAML string
//!   - Value::List     -> YAML sequence
//!   - Value::Dict     -> YAML mapping (keys sorted)

use libtclshape::Value;
use num_traits::ToPrimitive;

/// Encode a Value as a YAML string.
pub fn encode(value: &Value) -> Result<String, String> {
    let yaml_value = value_to_yaml(value);
    serde_yaml::to_string(&yaml_value).map_err(|e| format!("YAML encode error: {}", e))
}

fn value_to_yaml(value: &Value) -> serde_yaml::Value {
    match value {
        Value::Null => serde_yaml::Value::Null,
        Value::Integer(n) => match n.to_u64() {
            Some(u) => serde_yaml::Value::Number(serde_yaml::Number::from(u)),
            // YAML has no arbitrary-precision integers
            None => serde_yaml::Value::String(n.to_string()),
        },
        Value::String(s) => serde_yaml::Value::String(s.clone()),
        Value::List(items) => serde_yaml::Value::Sequence(items.iter().map(value_to_yaml).collect()),
        Value::Dict(map) => {
            let mut mapping = serde_yaml::Mapping::new();
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            for k in keys {
                mapping.insert(serde_yaml::Value::String(k.clone()), value_to_yaml(&map[k]));
            }
            serde_yaml::Value::Mapping(mapping)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_encode_dict() {
        let mut map = HashMap::new();
        map.insert("b".to_string(), Value::Null);
        map.insert("a".to_string(), Value::from(4711u64));
        assert_eq!(encode(&Value::Dict(map)).unwrap(), "a: 4711\nb: null\n");
    }

    #[test]
    fn test_encode_big_integer_as_string() {
        let big: Value = Value::Integer("123456789012345678901234567890".parse().unwrap());
        assert_eq!(
            value_to_yaml(&big),
            serde_yaml::Value::String("123456789012345678901234567890".into())
        );
    }
}
