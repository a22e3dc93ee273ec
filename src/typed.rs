//! Typed parsing of resolved configuration strings.
//!
//! One entry point per target type. All functions operate on the
//! already-substituted string returned by `PropertyStore::get`; failures are
//! reported as [`ConfigError`](crate::ConfigError) naming the key and the
//! offending text, never a silent default.

use crate::error::{ConfigError, ConfigResult};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Exact base-10 machine integer parse.
pub fn parse_int(key: &str, raw: &str) -> ConfigResult<i32> {
    raw.parse()
        .map_err(|_| ConfigError::malformed(key, raw, "integer"))
}

/// Base-10 wide integer parse.
pub fn parse_long(key: &str, raw: &str) -> ConfigResult<i64> {
    raw.parse()
        .map_err(|_| ConfigError::malformed(key, raw, "long"))
}

/// Base-10 floating point parse.
pub fn parse_double(key: &str, raw: &str) -> ConfigResult<f64> {
    raw.parse()
        .map_err(|_| ConfigError::malformed(key, raw, "double"))
}

/// Base-10 floating point parse at single precision.
pub fn parse_float(key: &str, raw: &str) -> ConfigResult<f32> {
    raw.parse()
        .map_err(|_| ConfigError::malformed(key, raw, "float"))
}

/// Case-insensitive match against exactly `"true"` or `"false"`.
pub fn parse_boolean(key: &str, raw: &str) -> ConfigResult<bool> {
    if raw.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if raw.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(ConfigError::malformed(key, raw, "boolean"))
    }
}

/// Split on the caller-supplied delimiter into an ordered sequence.
///
/// No trimming or deduplication; an empty string yields one empty element.
pub fn parse_list(raw: &str, delimiter: &str) -> Vec<String> {
    raw.split(delimiter).map(str::to_string).collect()
}

/// Case-sensitive match of the string against one variant name of `T`.
///
/// `T` is any deserializable enum; the match uses serde's variant names, so
/// `#[serde(rename_all = ...)]` attributes on the enum are honored.
pub fn parse_enum<T: DeserializeOwned>(key: &str, raw: &str) -> ConfigResult<T> {
    serde_json::from_value(Value::String(raw.to_string()))
        .map_err(|_| ConfigError::malformed(key, raw, "enum variant"))
}

/// Byte-size quantity, widened to a wide integer.
pub fn parse_bytes(key: &str, raw: &str) -> ConfigResult<i64> {
    crate::bytes::parse_byte_size(raw).map_err(|e| e.into_config_error(key, raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorCode;
    use serde::Deserialize;

    const KEY: &str = "app.web.threads";

    #[test]
    fn test_parse_int() {
        assert_eq!(parse_int(KEY, "1").unwrap(), 1);
        assert_eq!(parse_int(KEY, "-7").unwrap(), -7);
        // Bigger than a machine integer is rejected by the exact parse.
        let err = parse_int(KEY, "9448367483758473854738").unwrap_err();
        assert_eq!(err.code, ErrorCode::MalformedValue);
    }

    #[test]
    fn test_parse_long() {
        assert_eq!(parse_long(KEY, "12345678910").unwrap(), 12345678910);
        let err = parse_long(KEY, "999999999999999999999999999999999999").unwrap_err();
        assert_eq!(err.code, ErrorCode::MalformedValue);
    }

    #[test]
    fn test_parse_floating() {
        assert!((parse_double(KEY, "1.1").unwrap() - 1.1).abs() < 1e-4);
        assert!((parse_float(KEY, "1.1").unwrap() - 1.1).abs() < 1e-4);
        assert!(parse_double(KEY, "1a").is_err());
        assert!(parse_float(KEY, "1a").is_err());
    }

    #[test]
    fn test_parse_boolean_any_casing() {
        for raw in ["true", "True", "tRuE", "TRUE"] {
            assert!(parse_boolean(KEY, raw).unwrap());
        }
        for raw in ["false", "False", "fAlSe", "FALSE"] {
            assert!(!parse_boolean(KEY, raw).unwrap());
        }
        assert!(parse_boolean(KEY, "x").is_err());
        assert!(parse_boolean(KEY, "1").is_err());
    }

    #[test]
    fn test_parse_list_keeps_order_and_empties() {
        assert_eq!(parse_list("a,b,c", ","), vec!["a", "b", "c"]);
        assert_eq!(parse_list("a,,c", ","), vec!["a", "", "c"]);
        assert_eq!(parse_list("", ","), vec![""]);
    }

    #[derive(Debug, Deserialize, PartialEq)]
    enum TestEnum {
        #[serde(rename = "VALUE")]
        Value,
    }

    #[test]
    fn test_parse_enum_exact_match_only() {
        assert_eq!(parse_enum::<TestEnum>(KEY, "VALUE").unwrap(), TestEnum::Value);
        assert!(parse_enum::<TestEnum>(KEY, "not_a_value").is_err());
        // Variant matching is case-sensitive.
        assert!(parse_enum::<TestEnum>(KEY, "value").is_err());
    }
}
