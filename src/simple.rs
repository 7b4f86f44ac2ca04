//! JSON renderings of wire values.
//!
//! Two renderings are supported. The simple form drops the wire tags and
//! renders binaries as base64 text; reading it back needs the declared
//! attribute types, and content without one goes through `serde_dynamo`. The
//! wire form keeps the `{"<TAG>": <payload>}` envelope verbatim.
//!
//! `serde_json` is built with `arbitrary_precision`, so numbers keep their
//! decimal text in both directions.

use crate::{
    attribute::{AttributeType, Structure},
    codec::{self, Item},
    error::{Error, Result},
    kind::AttributeKind,
    schema::Schema,
};

use aws_sdk_dynamodb::{primitives::Blob, types};
use base64::{Engine, engine::general_purpose};
use serde_json::{Map, Value};
use std::sync::Arc;

const WIRE_FORMAT: &str = "{\"<TAG>\": <payload>}";

/// Render a wire value in the simple form.
pub(crate) fn to_json(value: &types::AttributeValue) -> Result<Value> {
    let json = match value {
        types::AttributeValue::S(text) => Value::String(text.clone()),
        types::AttributeValue::N(number) => number_to_json(number)?,
        types::AttributeValue::B(blob) => Value::String(encode_base64(blob)),
        types::AttributeValue::Bool(flag) => Value::Bool(*flag),
        types::AttributeValue::Null(_) => Value::Null,
        types::AttributeValue::Ss(elements) => {
            Value::Array(elements.iter().cloned().map(Value::String).collect())
        }
        types::AttributeValue::Ns(elements) => Value::Array(
            elements
                .iter()
                .map(|number| number_to_json(number))
                .collect::<Result<_>>()?,
        ),
        types::AttributeValue::Bs(elements) => Value::Array(
            elements
                .iter()
                .map(|blob| Value::String(encode_base64(blob)))
                .collect(),
        ),
        types::AttributeValue::L(elements) => {
            Value::Array(elements.iter().map(to_json).collect::<Result<_>>()?)
        }
        types::AttributeValue::M(children) => Value::Object(
            children
                .iter()
                .map(|(name, child)| Ok((name.clone(), to_json(child)?)))
                .collect::<Result<_>>()?,
        ),
        other => return Err(Error::type_mismatch("a known attribute value", format!("{other:?}"))),
    };
    Ok(json)
}

/// Read a value in the simple form, typed by `attribute_type` when known.
pub(crate) fn from_json(
    attribute_type: Option<&AttributeType>,
    json: Value,
) -> Result<types::AttributeValue> {
    let Some(attribute_type) = attribute_type else {
        return untyped_from_json(json);
    };
    if json.is_null() {
        return Ok(types::AttributeValue::Null(true));
    }
    let value = match (attribute_type, json) {
        (
            AttributeType::String
            | AttributeType::Discriminator
            | AttributeType::UtcDateTime
            | AttributeType::Json,
            Value::String(text),
        ) => types::AttributeValue::S(text),
        (
            AttributeType::Number
            | AttributeType::Version
            | AttributeType::Ttl
            | AttributeType::Boolean { legacy: true },
            Value::Number(number),
        ) => types::AttributeValue::N(number.to_string()),
        (AttributeType::Boolean { legacy: true }, Value::Bool(flag)) => {
            types::AttributeValue::N(if flag { "1" } else { "0" }.to_string())
        }
        (AttributeType::Boolean { legacy: false }, Value::Bool(flag)) => {
            types::AttributeValue::Bool(flag)
        }
        (AttributeType::Binary { .. }, Value::String(text)) => {
            types::AttributeValue::B(decode_base64(&text)?)
        }
        (AttributeType::Null, _) => types::AttributeValue::Null(true),
        (AttributeType::StringSet, Value::Array(elements)) => {
            types::AttributeValue::Ss(strings(elements, "string set")?)
        }
        (AttributeType::NumberSet, Value::Array(elements)) => types::AttributeValue::Ns(
            elements
                .into_iter()
                .map(|element| match element {
                    Value::Number(number) => Ok(number.to_string()),
                    other => Err(Error::type_mismatch("number", json_type_name(&other))),
                })
                .collect::<Result<_>>()?,
        ),
        (AttributeType::BinarySet { .. }, Value::Array(elements)) => types::AttributeValue::Bs(
            strings(elements, "binary set")?
                .iter()
                .map(|text| decode_base64(text))
                .collect::<Result<_>>()?,
        ),
        (AttributeType::List { of }, Value::Array(elements)) => types::AttributeValue::L(
            elements
                .into_iter()
                .map(|element| from_json(of.as_deref(), element))
                .collect::<Result<_>>()?,
        ),
        (AttributeType::Map(structure), Value::Object(children)) => {
            types::AttributeValue::M(item_from_json(structure, children)?)
        }
        (attribute_type, other) => {
            return Err(Error::type_mismatch(
                attribute_type.kind().to_string(),
                json_type_name(&other),
            ));
        }
    };
    Ok(value)
}

/// Read content without a declared type.
///
/// Numbers are carried as their decimal text, which `serde_dynamo` would
/// otherwise see as a private map under `arbitrary_precision`.
fn untyped_from_json(json: Value) -> Result<types::AttributeValue> {
    let value = match json {
        Value::Number(number) => types::AttributeValue::N(number.to_string()),
        Value::Array(elements) => types::AttributeValue::L(
            elements
                .into_iter()
                .map(untyped_from_json)
                .collect::<Result<_>>()?,
        ),
        Value::Object(children) => types::AttributeValue::M(
            children
                .into_iter()
                .map(|(name, child)| Ok((name, untyped_from_json(child)?)))
                .collect::<Result<_>>()?,
        ),
        other => serde_dynamo::to_attribute_value(other)?,
    };
    Ok(value)
}

/// Read a JSON object in the simple form as an item of `structure`.
pub(crate) fn item_from_json(structure: &Structure, object: Map<String, Value>) -> Result<Item> {
    let schema: Option<Arc<Schema>> = match structure {
        Structure::Raw => None,
        Structure::Schema(schema) => Some(schema.clone()),
        Structure::Discriminated { registry, declared } => {
            match object.get(registry.attribute().stored_name()) {
                Some(Value::String(marker)) => Some(registry.resolve_for_decode(marker)?.clone()),
                _ => Some(declared.clone()),
            }
        }
    };
    object
        .into_iter()
        .map(|(name, json)| {
            let attribute_type = schema
                .as_ref()
                .and_then(|schema| schema.attribute_by_stored_name(&name))
                .map(|attribute| &attribute.attribute_type);
            let value = from_json(attribute_type, json)?;
            Ok((name, value))
        })
        .collect()
}

/// Render a wire value as its `{"<TAG>": <payload>}` envelope.
pub(crate) fn to_wire_json(value: &types::AttributeValue) -> Result<Value> {
    let kind = codec::kind_of(value)?;
    let payload = match value {
        types::AttributeValue::S(text) | types::AttributeValue::N(text) => {
            Value::String(text.clone())
        }
        types::AttributeValue::B(blob) => Value::String(encode_base64(blob)),
        types::AttributeValue::Bool(flag) | types::AttributeValue::Null(flag) => Value::Bool(*flag),
        types::AttributeValue::Ss(elements) | types::AttributeValue::Ns(elements) => {
            Value::Array(elements.iter().cloned().map(Value::String).collect())
        }
        types::AttributeValue::Bs(elements) => Value::Array(
            elements
                .iter()
                .map(|blob| Value::String(encode_base64(blob)))
                .collect(),
        ),
        types::AttributeValue::L(elements) => {
            Value::Array(elements.iter().map(to_wire_json).collect::<Result<_>>()?)
        }
        types::AttributeValue::M(children) => Value::Object(item_to_wire_json(children)?),
        other => return Err(Error::type_mismatch("a known attribute value", format!("{other:?}"))),
    };
    Ok(Value::Object(Map::from_iter([(kind.to_string(), payload)])))
}

/// Read a `{"<TAG>": <payload>}` envelope.
pub(crate) fn from_wire_json(json: Value) -> Result<types::AttributeValue> {
    let envelope = match json {
        Value::Object(envelope) if envelope.len() == 1 => envelope,
        other => return Err(Error::format(other.to_string(), WIRE_FORMAT)),
    };
    let Some((tag, payload)) = envelope.into_iter().next() else {
        return Err(Error::format("{}", WIRE_FORMAT));
    };
    let kind = AttributeKind::from_tag(&tag).ok_or_else(|| Error::format(tag.as_str(), WIRE_FORMAT))?;
    let value = match (kind, payload) {
        (AttributeKind::String, Value::String(text)) => types::AttributeValue::S(text),
        (AttributeKind::Number, Value::String(text)) => types::AttributeValue::N(text),
        (AttributeKind::Binary, Value::String(text)) => types::AttributeValue::B(decode_base64(&text)?),
        (AttributeKind::Boolean, Value::Bool(flag)) => types::AttributeValue::Bool(flag),
        (AttributeKind::Null, Value::Bool(flag)) => types::AttributeValue::Null(flag),
        (AttributeKind::StringSet, Value::Array(elements)) => {
            types::AttributeValue::Ss(strings(elements, "string set")?)
        }
        (AttributeKind::NumberSet, Value::Array(elements)) => {
            types::AttributeValue::Ns(strings(elements, "number set")?)
        }
        (AttributeKind::BinarySet, Value::Array(elements)) => types::AttributeValue::Bs(
            strings(elements, "binary set")?
                .iter()
                .map(|text| decode_base64(text))
                .collect::<Result<_>>()?,
        ),
        (AttributeKind::List, Value::Array(elements)) => types::AttributeValue::L(
            elements
                .into_iter()
                .map(from_wire_json)
                .collect::<Result<_>>()?,
        ),
        (AttributeKind::Map, Value::Object(children)) => {
            types::AttributeValue::M(item_from_wire_json(children)?)
        }
        (kind, payload) => {
            return Err(Error::format(
                format!("{{\"{kind}\": {payload}}}"),
                WIRE_FORMAT,
            ));
        }
    };
    Ok(value)
}

pub(crate) fn item_to_wire_json(item: &Item) -> Result<Map<String, Value>> {
    item.iter()
        .map(|(name, value)| Ok((name.clone(), to_wire_json(value)?)))
        .collect()
}

pub(crate) fn item_from_wire_json(object: Map<String, Value>) -> Result<Item> {
    object
        .into_iter()
        .map(|(name, json)| Ok((name, from_wire_json(json)?)))
        .collect()
}

fn number_to_json(number: &str) -> Result<Value> {
    Ok(Value::Number(serde_json::from_str(number)?))
}

fn encode_base64(blob: &Blob) -> String {
    general_purpose::STANDARD.encode(blob.as_ref())
}

fn decode_base64(text: &str) -> Result<Blob> {
    general_purpose::STANDARD
        .decode(text)
        .map(Blob::new)
        .map_err(|_| Error::format(text, "base64"))
}

fn strings(elements: Vec<Value>, expected: &str) -> Result<Vec<String>> {
    elements
        .into_iter()
        .map(|element| match element {
            Value::String(text) => Ok(text),
            other => Err(Error::type_mismatch(
                format!("{expected} element"),
                json_type_name(&other),
            )),
        })
        .collect()
}

fn json_type_name(json: &Value) -> &'static str {
    match json {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;
    use serde_json::json;
    use std::collections;

    #[rstest]
    #[case::string(types::AttributeValue::S("a".to_string()), json!("a"))]
    #[case::number(types::AttributeValue::N("2.5".to_string()), json!(2.5))]
    #[case::binary(types::AttributeValue::B(Blob::new("hello")), json!("aGVsbG8="))]
    #[case::null(types::AttributeValue::Null(true), json!(null))]
    #[case::number_set(
        types::AttributeValue::Ns(vec!["1".to_string(), "2".to_string()]),
        json!([1, 2])
    )]
    #[case::map(
        types::AttributeValue::M(collections::HashMap::from([
            ("b".to_string(), types::AttributeValue::Bool(true)),
            ("a".to_string(), types::AttributeValue::L(vec![types::AttributeValue::S("x".to_string())])),
        ])),
        json!({"a": ["x"], "b": true})
    )]
    fn test_to_json(#[case] value: types::AttributeValue, #[case] expected: Value) {
        assert_eq!(to_json(&value).unwrap(), expected);
    }

    #[rstest]
    #[case::untyped_object(
        None,
        json!({"x": 1}),
        types::AttributeValue::M(collections::HashMap::from([
            ("x".to_string(), types::AttributeValue::N("1".to_string())),
        ]))
    )]
    #[case::binary(
        Some(AttributeType::Binary { legacy: false }),
        json!("aGVsbG8="),
        types::AttributeValue::B(Blob::new("hello"))
    )]
    #[case::legacy_boolean(
        Some(AttributeType::Boolean { legacy: true }),
        json!(true),
        types::AttributeValue::N("1".to_string())
    )]
    #[case::typed_list(
        Some(AttributeType::list_of(AttributeType::Number)),
        json!([1, null]),
        types::AttributeValue::L(vec![
            types::AttributeValue::N("1".to_string()),
            types::AttributeValue::Null(true),
        ])
    )]
    #[case::string_set(
        Some(AttributeType::StringSet),
        json!(["a", "b"]),
        types::AttributeValue::Ss(vec!["a".to_string(), "b".to_string()])
    )]
    fn test_from_json(
        #[case] attribute_type: Option<AttributeType>,
        #[case] json: Value,
        #[case] expected: types::AttributeValue,
    ) {
        assert_eq!(from_json(attribute_type.as_ref(), json).unwrap(), expected);
    }

    #[rstest]
    #[case::typed(Some(AttributeType::Number))]
    #[case::untyped(None)]
    fn test_big_number_keeps_precision(#[case] attribute_type: Option<AttributeType>) {
        let value = types::AttributeValue::N("12345678909876543211234234324234".to_string());
        let json = to_json(&value).unwrap();
        assert_eq!(
            serde_json::to_string(&json).unwrap(),
            "12345678909876543211234234324234"
        );
        assert_eq!(from_json(attribute_type.as_ref(), json).unwrap(), value);
    }

    #[test]
    fn test_untyped_scalars() {
        let json = json!({"list": [true, "a", null, 1.5]});
        let expected = types::AttributeValue::M(collections::HashMap::from([(
            "list".to_string(),
            types::AttributeValue::L(vec![
                types::AttributeValue::Bool(true),
                types::AttributeValue::S("a".to_string()),
                types::AttributeValue::Null(true),
                types::AttributeValue::N("1.5".to_string()),
            ]),
        )]));
        assert_eq!(from_json(None, json).unwrap(), expected);
    }

    #[test]
    fn test_from_json_mismatch() {
        let error = from_json(Some(&AttributeType::Number), json!("1")).unwrap_err();
        assert_eq!(error.to_string(), "type mismatch: expected N, found string");
    }

    #[rstest]
    #[case::string(types::AttributeValue::S("a".to_string()), json!({"S": "a"}))]
    #[case::number(types::AttributeValue::N("12345678909876543211234234324234".to_string()), json!({"N": "12345678909876543211234234324234"}))]
    #[case::binary(types::AttributeValue::B(Blob::new("hello")), json!({"B": "aGVsbG8="}))]
    #[case::null(types::AttributeValue::Null(true), json!({"NULL": true}))]
    #[case::list(
        types::AttributeValue::L(vec![types::AttributeValue::Bool(false)]),
        json!({"L": [{"BOOL": false}]})
    )]
    #[case::map(
        types::AttributeValue::M(collections::HashMap::from([
            ("a".to_string(), types::AttributeValue::Ss(vec!["x".to_string()])),
        ])),
        json!({"M": {"a": {"SS": ["x"]}}})
    )]
    fn test_wire_json(#[case] value: types::AttributeValue, #[case] expected: Value) {
        assert_eq!(to_wire_json(&value).unwrap(), expected.clone());
        assert_eq!(from_wire_json(expected).unwrap(), value);
    }

    #[rstest]
    #[case::not_an_object(json!("a"))]
    #[case::two_tags(json!({"S": "a", "N": "1"}))]
    #[case::unknown_tag(json!({"X": "a"}))]
    #[case::wrong_payload(json!({"BOOL": "true"}))]
    fn test_from_wire_json_rejects(#[case] json: Value) {
        let error = from_wire_json(json).unwrap_err();
        assert!(matches!(error, Error::Format { .. }));
    }
}
