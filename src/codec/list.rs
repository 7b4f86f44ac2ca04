use crate::{
    attribute::AttributeType,
    codec,
    error::{Error, Result},
    kind::AttributeKind,
    value::Value,
};

use aws_sdk_dynamodb::types;

/// Encode a list; an empty list stays an empty list.
///
/// Null elements, and elements that encode to nothing, keep their position
/// as an explicit null.
pub(super) fn encode(of: Option<&AttributeType>, value: &Value) -> Result<types::AttributeValue> {
    let Value::List(elements) = value else {
        return Err(Error::type_mismatch("list", value.type_name()));
    };
    let mut encoded = Vec::with_capacity(elements.len());
    for element in elements {
        let element = match of {
            Some(of) => codec::encode_value(of, element)?,
            None => codec::encode_dynamic(element)?,
        };
        encoded.push(element.unwrap_or(types::AttributeValue::Null(true)));
    }
    Ok(types::AttributeValue::L(encoded))
}

pub(super) fn decode(
    of: Option<&AttributeType>,
    value: types::AttributeValue,
    location: &str,
) -> Result<Value> {
    let elements = match value {
        types::AttributeValue::L(elements) => elements,
        other => return Err(codec::unexpected(location, AttributeKind::List, &other)),
    };
    let mut decoded = Vec::with_capacity(elements.len());
    for (index, element) in elements.into_iter().enumerate() {
        let location = format!("{location}[{index}]");
        let element = match of {
            Some(of) => codec::decode_value(of, element, &location)?,
            None => codec::decode_dynamic(element, &location)?,
        };
        decoded.push(element);
    }
    Ok(Value::List(decoded))
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case::empty(None, Value::List(vec![]), types::AttributeValue::L(vec![]))]
    #[case::declared_numbers(
        Some(AttributeType::Number),
        Value::List(vec![Value::from(1), Value::Null, Value::from(2)]),
        types::AttributeValue::L(vec![
            types::AttributeValue::N("1".to_string()),
            types::AttributeValue::Null(true),
            types::AttributeValue::N("2".to_string()),
        ])
    )]
    #[case::nested_lists(
        Some(AttributeType::List { of: None }),
        Value::List(vec![Value::List(vec![Value::from("a")])]),
        types::AttributeValue::L(vec![types::AttributeValue::L(vec![
            types::AttributeValue::S("a".to_string()),
        ])])
    )]
    fn test_round_trip(
        #[case] of: Option<AttributeType>,
        #[case] value: Value,
        #[case] expected: types::AttributeValue,
    ) {
        assert_eq!(encode(of.as_ref(), &value).unwrap(), expected.clone());
        assert_eq!(decode(of.as_ref(), expected, "a").unwrap(), value);
    }

    #[test]
    fn test_encode_wrong_element_type() {
        let value = Value::List(vec![Value::from("a"), Value::from(1)]);
        let error = encode(Some(&AttributeType::String), &value).unwrap_err();
        assert_eq!(error.to_string(), "type mismatch: expected string, found number");
    }

    #[test]
    fn test_decode_wrong_element_tag_names_index() {
        let value = types::AttributeValue::L(vec![
            types::AttributeValue::N("1".to_string()),
            types::AttributeValue::S("a".to_string()),
        ]);
        let error = decode(Some(&AttributeType::Number), value, "values").unwrap_err();
        assert_eq!(error.to_string(), "unexpected S value at values[1], expected N");
    }

    #[test]
    fn test_encode_not_a_list() {
        let error = encode(None, &Value::from("a")).unwrap_err();
        assert!(matches!(error, Error::TypeMismatch { .. }));
    }
}
