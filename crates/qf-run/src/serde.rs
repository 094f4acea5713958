use std::collections::BTreeMap;
use std::iter::FromIterator;

use qf_core::errors::{ErrorInfo, QfError};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

fn serde_error(code: &str, err: impl ToString) -> QfError {
    QfError::Serde(ErrorInfo::new(code, err.to_string()))
}

fn canonicalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let ordered = map
                .into_iter()
                .map(|(key, value)| (key, canonicalize(value)))
                .collect::<BTreeMap<_, _>>();
            Value::Object(Map::from_iter(ordered))
        }
        Value::Array(values) => Value::Array(values.into_iter().map(canonicalize).collect()),
        other => other,
    }
}

/// Serializes a value into JSON bytes with object keys sorted recursively.
pub fn to_canonical_json_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, QfError> {
    let value = serde_json::to_value(value).map_err(|err| serde_error("json-serialize", err))?;
    let mut bytes = Vec::new();
    serde_json::to_writer(&mut bytes, &canonicalize(value))
        .map_err(|err| serde_error("json-write", err))?;
    Ok(bytes)
}

/// Serializes a value into YAML.
pub fn to_yaml_string<T: Serialize>(value: &T) -> Result<String, QfError> {
    serde_yaml::to_string(value).map_err(|err| serde_error("yaml-serialize", err))
}

/// Deserializes a YAML document, reporting failures as configuration errors.
pub fn from_yaml_str<T: DeserializeOwned>(data: &str) -> Result<T, QfError> {
    serde_yaml::from_str(data).map_err(|err| {
        QfError::Config(
            ErrorInfo::new("yaml-parse", err.to_string())
                .with_hint("check the document against the documented configuration keys"),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_json_sorts_keys() {
        let value = serde_json::json!({ "b": 1, "a": { "d": 2, "c": 3 } });
        let bytes = to_canonical_json_bytes(&value).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            r#"{"a":{"c":3,"d":2},"b":1}"#
        );
    }

    #[test]
    fn malformed_yaml_is_a_config_error() {
        let err = from_yaml_str::<BTreeMap<String, f64>>("a: [").unwrap_err();
        assert_eq!(err.code(), "yaml-parse");
    }
}
