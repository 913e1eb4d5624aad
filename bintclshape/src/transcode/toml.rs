//! TOML transcoding: render parsed values as TOML text.
//!
//! Mapping:
//!   - Value::Integer  -> TOML integer (must fit in i64)
//!   - Value::String   -> TOML string
//!   - Value::List     -> TOML array
//!   - Value::Dict     -> TOML table
//!
//! Lossy edges:
//!   - TOML has no null type; null values (empty words) cause an error.
//!   - TOML integers are i64; larger integers cause an error.
//!   - TOML requires the top-level value to be a table, so only dict-shaped
//!     documents can be written.

use libtclshape::Value;
use num_traits::ToPrimitive;
use toml_edit::DocumentMut;

/// Encode a Value as a TOML string.
pub fn encode(value: &Value) -> Result<String, String> {
    match value {
        Value::Dict(_) => match value_to_toml(value)? {
            toml_edit::Item::Table(table) => {
                let mut doc = DocumentMut::new();
                for (key, item) in table.iter() {
                    doc[key] = item.clone();
                }
                Ok(doc.to_string())
            }
            _ => Err("Internal error: expected table".to_string()),
        },
        _ => Err("TOML requires the top-level value to be a dict".to_string()),
    }
}

fn value_to_toml(value: &Value) -> Result<toml_edit::Item, String> {
    match value {
        Value::Null => Err("TOML has no null type".to_string()),
        Value::Integer(n) => {
            let i = n
                .to_i64()
                .ok_or_else(|| format!("TOML integers must fit in i64; {} is too large", n))?;
            Ok(toml_edit::Item::Value(toml_edit::Value::Integer(
                toml_edit::Formatted::new(i),
            )))
        }
        Value::String(s) => Ok(toml_edit::Item::Value(toml_edit::Value::String(
            toml_edit::Formatted::new(s.clone()),
        ))),
        Value::List(items) => {
            let mut toml_arr = toml_edit::Array::new();
            for v in items {
                match value_to_toml(v)? {
                    toml_edit::Item::Value(val) => toml_arr.push(val),
                    toml_edit::Item::Table(t) => {
                        toml_arr.push(toml_edit::Value::InlineTable(t.into_inline_table()));
                    }
                    _ => return Err("Unexpected TOML item type in array".to_string()),
                }
            }
            Ok(toml_edit::Item::Value(toml_edit::Value::Array(toml_arr)))
        }
        Value::Dict(map) => {
            let mut table = toml_edit::Table::new();
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            for k in keys {
                table.insert(k, value_to_toml(&map[k])?);
            }
            Ok(toml_edit::Item::Table(table))
        }
    }
}
