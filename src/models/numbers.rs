//! Lenient field decoding.
//!
//! Stored blobs were produced by hand-edited forms: numbers can arrive as
//! strings, as `null`, or be missing altogether. These helpers turn any of
//! those into a finite value instead of failing the whole record.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Coerce a JSON value to a finite number, 0 otherwise.
pub fn number_or_zero(value: &Value) -> f64 {
    let n = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) if s.trim().is_empty() => 0.0,
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        Value::Bool(true) => 1.0,
        _ => 0.0,
    };
    if n.is_finite() { n } else { 0.0 }
}

/// Coerce a JSON value to a number when one is present; blanks become `None`.
pub fn optional_number(value: &Value) -> Option<f64> {
    match value {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}

pub fn lenient_f64<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    let v = Value::deserialize(d)?;
    Ok(number_or_zero(&v))
}

pub fn lenient_opt_f64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    let v = Value::deserialize(d)?;
    Ok(optional_number(&v))
}

pub fn lenient_i64<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
    let v = Value::deserialize(d)?;
    Ok(number_or_zero(&v).trunc() as i64)
}

/// Strings stay strings, numbers are printed, anything else is empty.
pub fn lenient_string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    let v = Value::deserialize(d)?;
    Ok(match v {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    })
}

/// Decode enums that map every string (including unknown ones) to a variant.
pub fn lenient_from_string<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: From<String>,
{
    Ok(T::from(lenient_string(d)?))
}

/// Keep the well-formed elements of an array; anything else is an empty list.
pub fn lenient_vec<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let v = Value::deserialize(d)?;
    Ok(match v {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numbers_coerce_like_form_inputs() {
        assert_eq!(number_or_zero(&json!(12.5)), 12.5);
        assert_eq!(number_or_zero(&json!(" 7 ")), 7.0);
        assert_eq!(number_or_zero(&json!("abc")), 0.0);
        assert_eq!(number_or_zero(&json!(null)), 0.0);
        assert_eq!(number_or_zero(&json!("")), 0.0);
        assert_eq!(optional_number(&json!("")), None);
        assert_eq!(optional_number(&json!("3.5")), Some(3.5));
        assert_eq!(optional_number(&json!(null)), None);
    }

    #[test]
    fn vectors_drop_malformed_elements() {
        #[derive(Deserialize)]
        struct Wrapper {
            #[serde(deserialize_with = "lenient_vec")]
            items: Vec<u32>,
        }
        let w: Wrapper = serde_json::from_value(json!({"items": [1, "x", 3]})).unwrap();
        assert_eq!(w.items, vec![1, 3]);
        let w: Wrapper = serde_json::from_value(json!({"items": {"not": "a list"}})).unwrap();
        assert!(w.items.is_empty());
    }
}
