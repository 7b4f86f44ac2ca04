//! Conversion between native values and wire values.
//!
//! Every [`AttributeType`] has a codec. Scalar codecs convert a single value,
//! set codecs wrap a scalar codec with set semantics, and the list and map
//! codecs recurse into their children, either through a declared type or by
//! inferring the wire kind of each child from its native shape.

mod datetime;
mod dynamic;
mod json;
mod list;
pub(crate) mod map;
mod scalar;
mod set;

use crate::{
    attribute::{Attribute, AttributeType},
    error::{Error, Result},
    kind::AttributeKind,
    value::Value,
};

use aws_sdk_dynamodb::types;
use std::collections;

/// Wire representation of a record: stored name to wire value.
pub type Item = collections::HashMap<String, types::AttributeValue>;

/// Encode the value of an attribute.
///
/// Returns `None` when the value encodes to nothing, such as an empty set;
/// the attribute is then omitted from the item. A null value encodes to the
/// explicit null if the attribute is nullable.
///
/// ```rust
/// use aws_sdk_dynamodb::types::AttributeValue;
/// use dynamodb_model::{attribute::{Attribute, AttributeType}, codec, value::Value};
///
/// let attribute = Attribute::new("flag", AttributeType::Boolean { legacy: true });
/// let encoded = codec::encode(&attribute, &Value::Bool(true)).unwrap();
/// assert_eq!(encoded, Some(AttributeValue::N("1".to_string())));
/// ```
pub fn encode(attribute: &Attribute, value: &Value) -> Result<Option<types::AttributeValue>> {
    if value.is_null() && !matches!(attribute.attribute_type, AttributeType::Null) {
        if !attribute.nullable {
            return Err(Error::RequiredValue(attribute.name.clone()));
        }
        return Ok(Some(types::AttributeValue::Null(true)));
    }
    encode_value(&attribute.attribute_type, value)
}

/// Decode the wire value of an attribute.
pub fn decode(attribute: &Attribute, value: types::AttributeValue) -> Result<Value> {
    decode_value(&attribute.attribute_type, value, &attribute.name)
}

pub(crate) fn encode_value(
    attribute_type: &AttributeType,
    value: &Value,
) -> Result<Option<types::AttributeValue>> {
    if let AttributeType::Null = attribute_type {
        return Ok(Some(types::AttributeValue::Null(true)));
    }
    if value.is_null() {
        return Ok(None);
    }
    let encoded = match attribute_type {
        AttributeType::String | AttributeType::Discriminator => scalar::encode_string(value)?,
        AttributeType::Number => scalar::encode_number(value)?,
        AttributeType::Version => scalar::encode_version(value)?,
        AttributeType::Binary { legacy } => scalar::encode_binary(value, *legacy)?,
        AttributeType::Boolean { legacy } => scalar::encode_boolean(value, *legacy)?,
        AttributeType::UtcDateTime => datetime::encode_utc(value)?,
        AttributeType::Ttl => datetime::encode_ttl(value)?,
        AttributeType::List { of } => list::encode(of.as_deref(), value)?,
        AttributeType::Map(structure) => map::encode(structure, value)?,
        AttributeType::StringSet | AttributeType::NumberSet | AttributeType::BinarySet { .. } => {
            return set::encode(attribute_type, value);
        }
        AttributeType::Json => return json::encode(value),
        AttributeType::Null => types::AttributeValue::Null(true),
    };
    Ok(Some(encoded))
}

pub(crate) fn decode_value(
    attribute_type: &AttributeType,
    value: types::AttributeValue,
    location: &str,
) -> Result<Value> {
    let kind = kind_of(&value)?;
    if kind == AttributeKind::Null {
        return Ok(if attribute_type.is_set() {
            set::empty(attribute_type)
        } else {
            Value::Null
        });
    }
    if !attribute_type.accepts(kind) {
        return Err(unexpected(location, attribute_type.kind(), &value));
    }
    match attribute_type {
        AttributeType::String | AttributeType::Discriminator => {
            scalar::decode_string(value, location)
        }
        AttributeType::Number => scalar::decode_number(value, location),
        AttributeType::Version => scalar::decode_version(value, location),
        AttributeType::Binary { legacy } => scalar::decode_binary(value, *legacy, location),
        AttributeType::Boolean { .. } => scalar::decode_boolean(value, location),
        AttributeType::UtcDateTime => datetime::decode_utc(value, location),
        AttributeType::Ttl => datetime::decode_ttl(value, location),
        AttributeType::Json => json::decode(value, location),
        AttributeType::List { of } => list::decode(of.as_deref(), value, location),
        AttributeType::Map(structure) => map::decode(structure, value, location),
        AttributeType::StringSet | AttributeType::NumberSet | AttributeType::BinarySet { .. } => {
            set::decode(attribute_type, value, location)
        }
        AttributeType::Null => Ok(Value::Null),
    }
}

/// Encode a value whose wire kind is inferred from its native shape.
pub(crate) fn encode_dynamic(value: &Value) -> Result<Option<types::AttributeValue>> {
    dynamic::encode(value)
}

/// Decode a value whose native shape is inferred from its wire kind.
pub(crate) fn decode_dynamic(value: types::AttributeValue, location: &str) -> Result<Value> {
    dynamic::decode(value, location)
}

pub(crate) fn kind_of(value: &types::AttributeValue) -> Result<AttributeKind> {
    AttributeKind::of(value)
        .ok_or_else(|| Error::type_mismatch("a known attribute value", format!("{value:?}")))
}

pub(crate) fn unexpected(
    location: &str,
    expected: AttributeKind,
    value: &types::AttributeValue,
) -> Error {
    match AttributeKind::of(value) {
        Some(found) => Error::UnexpectedTag {
            location: location.to_string(),
            expected,
            found,
        },
        None => Error::type_mismatch(expected.to_string(), format!("{value:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use aws_sdk_dynamodb::primitives::Blob;
    use rstest::rstest;

    #[rstest]
    #[case::string(AttributeType::String, Value::from("a"), types::AttributeValue::S("a".to_string()))]
    #[case::number(AttributeType::Number, Value::from(-3), types::AttributeValue::N("-3".to_string()))]
    #[case::binary(
        AttributeType::Binary { legacy: false },
        Value::from(vec![1u8, 2]),
        types::AttributeValue::B(Blob::new(vec![1u8, 2]))
    )]
    #[case::boolean(AttributeType::Boolean { legacy: false }, Value::from(true), types::AttributeValue::Bool(true))]
    #[case::null(AttributeType::Null, Value::Null, types::AttributeValue::Null(true))]
    #[case::discriminator(AttributeType::Discriminator, Value::from("cat"), types::AttributeValue::S("cat".to_string()))]
    fn test_round_trip(
        #[case] attribute_type: AttributeType,
        #[case] value: Value,
        #[case] expected: types::AttributeValue,
    ) {
        let attribute = Attribute::new("a", attribute_type);
        let encoded = encode(&attribute, &value).unwrap();
        assert_eq!(encoded, Some(expected.clone()));
        assert_eq!(decode(&attribute, expected).unwrap(), value);
    }

    #[test]
    fn test_encode_null_requires_nullable() {
        let attribute = Attribute::new("a", AttributeType::String);
        let error = encode(&attribute, &Value::Null).unwrap_err();
        assert_eq!(error.to_string(), "attribute 'a' cannot be None");
        let attribute = Attribute {
            nullable: true,
            ..attribute
        };
        assert_eq!(
            encode(&attribute, &Value::Null).unwrap(),
            Some(types::AttributeValue::Null(true))
        );
    }

    #[rstest]
    #[case::legacy_read_by_modern(false, types::AttributeValue::N("1".to_string()), Value::Bool(true))]
    #[case::legacy_false_read_by_modern(false, types::AttributeValue::N("0".to_string()), Value::Bool(false))]
    #[case::modern_read_by_legacy(true, types::AttributeValue::Bool(true), Value::Bool(true))]
    #[case::modern_false_read_by_legacy(true, types::AttributeValue::Bool(false), Value::Bool(false))]
    #[case::null_read_by_modern(false, types::AttributeValue::Null(true), Value::Null)]
    #[case::null_read_by_legacy(true, types::AttributeValue::Null(true), Value::Null)]
    fn test_boolean_cross_mode(
        #[case] legacy: bool,
        #[case] value: types::AttributeValue,
        #[case] expected: Value,
    ) {
        let attribute = Attribute::new("a", AttributeType::Boolean { legacy });
        assert_eq!(decode(&attribute, value).unwrap(), expected);
    }

    #[test]
    fn test_decode_unexpected_tag() {
        let attribute = Attribute::new("a", AttributeType::Number);
        let error = decode(&attribute, types::AttributeValue::S("1".to_string())).unwrap_err();
        assert_eq!(error.to_string(), "unexpected S value at a, expected N");
    }

    #[test]
    fn test_decode_null_set_is_empty() {
        let attribute = Attribute::new("a", AttributeType::StringSet);
        let decoded = decode(&attribute, types::AttributeValue::Null(true)).unwrap();
        assert_eq!(decoded, Value::StringSet(Default::default()));
    }
}
