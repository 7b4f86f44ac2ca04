use crate::{
    codec,
    error::{Error, Result},
    kind::AttributeKind,
    value::Value,
};

use aws_sdk_dynamodb::types;

/// JSON null is the absence of a document and encodes to nothing.
pub(super) fn encode(value: &Value) -> Result<Option<types::AttributeValue>> {
    match value {
        Value::Json(serde_json::Value::Null) => Ok(None),
        Value::Json(document) => {
            let text = serde_json::to_string(document)?;
            Ok(Some(types::AttributeValue::S(text)))
        }
        other => Err(Error::type_mismatch("json", other.type_name())),
    }
}

pub(super) fn decode(value: types::AttributeValue, location: &str) -> Result<Value> {
    match value {
        types::AttributeValue::S(text) => Ok(Value::Json(serde_json::from_str(&text)?)),
        other => Err(codec::unexpected(location, AttributeKind::String, &other)),
    }
}
