use crate::{
    attribute::AttributeType,
    codec::{self, scalar},
    error::{Error, Result},
    value::{Number, Value},
};

use aws_sdk_dynamodb::types;
use std::collections::BTreeSet;

/// Encode a set in its natural order; an empty set encodes to nothing.
pub(super) fn encode(
    attribute_type: &AttributeType,
    value: &Value,
) -> Result<Option<types::AttributeValue>> {
    let encoded = match (attribute_type, value) {
        (AttributeType::StringSet, Value::StringSet(set)) => {
            (!set.is_empty()).then(|| types::AttributeValue::Ss(set.iter().cloned().collect()))
        }
        (AttributeType::NumberSet, Value::NumberSet(set)) => (!set.is_empty())
            .then(|| types::AttributeValue::Ns(set.iter().map(Number::to_string).collect())),
        (AttributeType::BinarySet { legacy }, Value::BinarySet(set)) => {
            (!set.is_empty()).then(|| {
                types::AttributeValue::Bs(
                    set.iter()
                        .map(|bytes| scalar::encode_bytes(bytes, *legacy))
                        .collect(),
                )
            })
        }
        (attribute_type, other) => {
            return Err(Error::type_mismatch(
                format!("{} set", element_name(attribute_type)),
                other.type_name(),
            ));
        }
    };
    Ok(encoded)
}

pub(super) fn decode(
    attribute_type: &AttributeType,
    value: types::AttributeValue,
    location: &str,
) -> Result<Value> {
    let decoded = match (attribute_type, value) {
        (AttributeType::StringSet, types::AttributeValue::Ss(elements)) => {
            Value::StringSet(elements.into_iter().collect())
        }
        (AttributeType::NumberSet, types::AttributeValue::Ns(elements)) => Value::NumberSet(
            elements
                .iter()
                .map(|element| element.parse::<Number>())
                .collect::<Result<_>>()?,
        ),
        (AttributeType::BinarySet { legacy }, types::AttributeValue::Bs(elements)) => {
            Value::BinarySet(
                elements
                    .into_iter()
                    .map(|blob| scalar::decode_bytes(blob, *legacy))
                    .collect(),
            )
        }
        (attribute_type, other) => {
            return Err(codec::unexpected(location, attribute_type.kind(), &other));
        }
    };
    Ok(decoded)
}

/// The value a set attribute holds when nothing was stored.
pub(super) fn empty(attribute_type: &AttributeType) -> Value {
    match attribute_type {
        AttributeType::NumberSet => Value::NumberSet(BTreeSet::new()),
        AttributeType::BinarySet { .. } => Value::BinarySet(BTreeSet::new()),
        _ => Value::StringSet(BTreeSet::new()),
    }
}

fn element_name(attribute_type: &AttributeType) -> &'static str {
    match attribute_type {
        AttributeType::NumberSet => "number",
        AttributeType::BinarySet { .. } => "binary",
        _ => "string",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use aws_sdk_dynamodb::primitives::Blob;
    use rstest::rstest;

    #[rstest]
    #[case::strings(
        AttributeType::StringSet,
        Value::StringSet(BTreeSet::from(["b".to_string(), "a".to_string()])),
        Some(types::AttributeValue::Ss(vec!["a".to_string(), "b".to_string()]))
    )]
    #[case::numbers_in_numeric_order(
        AttributeType::NumberSet,
        Value::NumberSet(BTreeSet::from([Number::from(10), Number::from(9), "1.5".parse().unwrap()])),
        Some(types::AttributeValue::Ns(vec!["1.5".to_string(), "9".to_string(), "10".to_string()]))
    )]
    #[case::binaries(
        AttributeType::BinarySet { legacy: false },
        Value::BinarySet(BTreeSet::from([vec![2u8], vec![1u8]])),
        Some(types::AttributeValue::Bs(vec![Blob::new(vec![1u8]), Blob::new(vec![2u8])]))
    )]
    #[case::legacy_binaries(
        AttributeType::BinarySet { legacy: true },
        Value::BinarySet(BTreeSet::from([b"hello".to_vec()])),
        Some(types::AttributeValue::Bs(vec![Blob::new("aGVsbG8=")]))
    )]
    #[case::empty_strings(AttributeType::StringSet, Value::StringSet(BTreeSet::new()), None)]
    #[case::empty_numbers(AttributeType::NumberSet, Value::NumberSet(BTreeSet::new()), None)]
    fn test_encode(
        #[case] attribute_type: AttributeType,
        #[case] value: Value,
        #[case] expected: Option<types::AttributeValue>,
    ) {
        assert_eq!(encode(&attribute_type, &value).unwrap(), expected);
    }

    #[test]
    fn test_encode_is_deterministic() {
        let a = Value::set(["x", "y", "z"].map(Value::from)).unwrap();
        let b = Value::set(["z", "x", "y"].map(Value::from)).unwrap();
        assert_eq!(
            encode(&AttributeType::StringSet, &a).unwrap(),
            encode(&AttributeType::StringSet, &b).unwrap()
        );
    }

    #[test]
    fn test_encode_wrong_set_kind() {
        let value = Value::StringSet(BTreeSet::from(["a".to_string()]));
        let error = encode(&AttributeType::NumberSet, &value).unwrap_err();
        assert_eq!(
            error.to_string(),
            "type mismatch: expected number set, found string set"
        );
    }

    #[rstest]
    #[case::strings(
        AttributeType::StringSet,
        types::AttributeValue::Ss(vec!["a".to_string(), "a".to_string()]),
        Value::StringSet(BTreeSet::from(["a".to_string()]))
    )]
    #[case::numbers(
        AttributeType::NumberSet,
        types::AttributeValue::Ns(vec!["2".to_string(), "1.0".to_string()]),
        Value::NumberSet(BTreeSet::from([Number::from(1), Number::from(2)]))
    )]
    #[case::legacy_binaries(
        AttributeType::BinarySet { legacy: true },
        types::AttributeValue::Bs(vec![Blob::new("aGVsbG8=")]),
        Value::BinarySet(BTreeSet::from([b"hello".to_vec()]))
    )]
    fn test_decode(
        #[case] attribute_type: AttributeType,
        #[case] value: types::AttributeValue,
        #[case] expected: Value,
    ) {
        assert_eq!(decode(&attribute_type, value, "a").unwrap(), expected);
    }

    #[test]
    fn test_empty() {
        assert_eq!(
            empty(&AttributeType::NumberSet),
            Value::NumberSet(BTreeSet::new())
        );
    }
}
