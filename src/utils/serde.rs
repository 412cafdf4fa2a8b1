/*!
 * Serde utilities for request payload patterns.
 *
 * Change sets and filters usually arrive as JSON produced by other languages,
 * where integer amounts are routinely encoded as floats (`100000.0`) or quoted
 * strings. These helpers accept those encodings consistently.
 */

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Deserialize an optional whole-number amount that may be represented as a
/// number or a string.
///
/// Accepts:
/// - Missing/null (returns None)
/// - Integer numbers
/// - Floating-point numbers (truncated toward zero)
/// - String representations of either
///
/// # Usage with serde
///
/// ```rust
/// use serde::Deserialize;
/// use jobtrack_core::utils::serde::deserialize_optional_amount;
///
/// #[derive(Deserialize)]
/// struct Payload {
///     #[serde(default, deserialize_with = "deserialize_optional_amount")]
///     salary_min: Option<i64>,
/// }
/// ```
pub fn deserialize_optional_amount<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    let value: Option<Value> = Option::deserialize(deserializer)?;
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => {
            if let Some(i) = n.as_i64() {
                Ok(Some(i))
            } else if let Some(f) = n.as_f64() {
                Ok(Some(f as i64))
            } else {
                Err(D::Error::custom(format!("Invalid numeric value: {n}")))
            }
        }
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            trimmed
                .parse::<i64>()
                .map(Some)
                .or_else(|_| trimmed.parse::<f64>().map(|f| Some(f as i64)))
                .map_err(|_| D::Error::custom(format!("Cannot parse '{s}' as numeric")))
        }
        Some(other) => Err(D::Error::custom(format!(
            "Expected numeric value, found: {other}"
        ))),
    }
}
