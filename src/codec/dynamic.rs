use crate::{
    attribute::AttributeType,
    codec,
    error::Result,
    kind::AttributeKind,
    value::Value,
};

use aws_sdk_dynamodb::types;

/// The codec used for a child whose type is only known at runtime.
fn attribute_type(kind: AttributeKind) -> AttributeType {
    match kind {
        AttributeKind::String => AttributeType::String,
        AttributeKind::Number => AttributeType::Number,
        AttributeKind::Binary => AttributeType::Binary { legacy: false },
        AttributeKind::Boolean => AttributeType::Boolean { legacy: false },
        AttributeKind::Null => AttributeType::Null,
        AttributeKind::StringSet => AttributeType::StringSet,
        AttributeKind::NumberSet => AttributeType::NumberSet,
        AttributeKind::BinarySet => AttributeType::BinarySet { legacy: false },
        AttributeKind::List => AttributeType::List { of: None },
        AttributeKind::Map => AttributeType::raw_map(),
    }
}

pub(super) fn encode(value: &Value) -> Result<Option<types::AttributeValue>> {
    let kind = value.infer_kind()?;
    codec::encode_value(&attribute_type(kind), value)
}

pub(super) fn decode(value: types::AttributeValue, location: &str) -> Result<Value> {
    let kind = codec::kind_of(&value)?;
    codec::decode_value(&attribute_type(kind), value, location)
}
