use crate::{
    codec,
    error::{Error, Result},
    kind::AttributeKind,
    value::{Number, Value},
};

use aws_sdk_dynamodb::{primitives::Blob, types};
use base64::{Engine, engine::general_purpose::STANDARD};

pub(super) fn encode_string(value: &Value) -> Result<types::AttributeValue> {
    match value {
        Value::String(text) => Ok(types::AttributeValue::S(text.clone())),
        other => Err(Error::type_mismatch("string", other.type_name())),
    }
}

pub(super) fn decode_string(value: types::AttributeValue, location: &str) -> Result<Value> {
    match value {
        types::AttributeValue::S(text) => Ok(Value::String(text)),
        other => Err(codec::unexpected(location, AttributeKind::String, &other)),
    }
}

pub(super) fn encode_number(value: &Value) -> Result<types::AttributeValue> {
    match value {
        Value::Number(number) => Ok(types::AttributeValue::N(number.to_string())),
        other => Err(Error::type_mismatch("number", other.type_name())),
    }
}

pub(super) fn decode_number(value: types::AttributeValue, location: &str) -> Result<Value> {
    match value {
        types::AttributeValue::N(text) => Ok(Value::Number(text.parse()?)),
        other => Err(codec::unexpected(location, AttributeKind::Number, &other)),
    }
}

pub(super) fn encode_version(value: &Value) -> Result<types::AttributeValue> {
    match value {
        Value::Number(number) if number.is_integer() => {
            Ok(types::AttributeValue::N(number.to_string()))
        }
        Value::Number(number) => Err(Error::type_mismatch("integer", number.to_string())),
        other => Err(Error::type_mismatch("integer", other.type_name())),
    }
}

pub(super) fn decode_version(value: types::AttributeValue, location: &str) -> Result<Value> {
    match value {
        types::AttributeValue::N(text) => {
            let number: Number = text.parse()?;
            if !number.is_integer() {
                return Err(Error::format(text, "integer"));
            }
            Ok(Value::Number(number))
        }
        other => Err(codec::unexpected(location, AttributeKind::Number, &other)),
    }
}

pub(super) fn encode_binary(value: &Value, legacy: bool) -> Result<types::AttributeValue> {
    match value {
        Value::Binary(bytes) => Ok(types::AttributeValue::B(encode_bytes(bytes, legacy))),
        other => Err(Error::type_mismatch("binary", other.type_name())),
    }
}

pub(super) fn decode_binary(
    value: types::AttributeValue,
    legacy: bool,
    location: &str,
) -> Result<Value> {
    match value {
        types::AttributeValue::B(blob) => Ok(Value::Binary(decode_bytes(blob, legacy))),
        other => Err(codec::unexpected(location, AttributeKind::Binary, &other)),
    }
}

pub(super) fn encode_bytes(bytes: &[u8], legacy: bool) -> Blob {
    if legacy {
        Blob::new(STANDARD.encode(bytes))
    } else {
        Blob::new(bytes)
    }
}

/// Legacy payloads may hold either the raw bytes or their base64 text; a
/// payload that happens to be valid base64 is always decoded once more.
pub(super) fn decode_bytes(blob: Blob, legacy: bool) -> Vec<u8> {
    let bytes = blob.into_inner();
    if !legacy {
        return bytes;
    }
    STANDARD.decode(&bytes).unwrap_or(bytes)
}

pub(super) fn encode_boolean(value: &Value, legacy: bool) -> Result<types::AttributeValue> {
    match value {
        Value::Bool(flag) if legacy => Ok(types::AttributeValue::N(
            if *flag { "1" } else { "0" }.to_string(),
        )),
        Value::Bool(flag) => Ok(types::AttributeValue::Bool(*flag)),
        other => Err(Error::type_mismatch("bool", other.type_name())),
    }
}

pub(super) fn decode_boolean(value: types::AttributeValue, location: &str) -> Result<Value> {
    match value {
        types::AttributeValue::Bool(flag) => Ok(Value::Bool(flag)),
        types::AttributeValue::N(text) => {
            let number: Number = text.parse()?;
            Ok(Value::Bool(number != Number::default()))
        }
        other => Err(codec::unexpected(location, AttributeKind::Boolean, &other)),
    }
}
