//! Deterministic cache keys.

use serde::Serialize;
use serde_json::Value;

use crate::error::CacheResult;

/// Build `"{namespace}:{canonical json}"` for any serializable request.
///
/// Object keys are written in sorted order at every depth, so two values
/// with equal fields always produce the same key.
pub fn cache_key<T>(namespace: &str, request: &T) -> CacheResult<String>
where
    T: Serialize + ?Sized,
{
    let value = serde_json::to_value(request)?;
    let mut key = String::with_capacity(namespace.len() + 64);
    key.push_str(namespace);
    key.push(':');
    write_canonical(&value, &mut key);
    Ok(key)
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));

            out.push('{');
            for (index, (name, field)) in entries.into_iter().enumerate() {
                if index > 0 {
                    out.push(',');
                }
                // Value's Display escapes the string exactly as JSON does.
                out.push_str(&Value::String(name.clone()).to_string());
                out.push(':');
                write_canonical(field, out);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (index, item) in items.iter().enumerate() {
                if index > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}
