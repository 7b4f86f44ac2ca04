use crate::{
    attribute::{AttributeType, Structure},
    codec::{self, Item},
    error::{Error, Result},
    kind::AttributeKind,
    schema::{Record, Schema},
    value::Value,
};

use aws_sdk_dynamodb::types;
use indexmap::IndexMap;
use std::sync::Arc;

pub(super) fn encode(structure: &Structure, value: &Value) -> Result<types::AttributeValue> {
    let children = match (structure, value) {
        (Structure::Raw, Value::Map(children)) => encode_children(children)?,
        (_, Value::Record(record)) => encode_structured(structure, record, true, false)?,
        (_, other) => {
            return Err(Error::type_mismatch(expected(structure), other.type_name()));
        }
    };
    Ok(types::AttributeValue::M(children))
}

pub(super) fn decode(
    structure: &Structure,
    value: types::AttributeValue,
    location: &str,
) -> Result<Value> {
    let children = match value {
        types::AttributeValue::M(children) => children,
        other => return Err(codec::unexpected(location, AttributeKind::Map, &other)),
    };
    match structure {
        Structure::Raw => Ok(Value::Map(decode_children(children, location)?)),
        _ => Ok(Value::Record(decode_item(structure, children)?)),
    }
}

/// Encode a record as a whole item.
///
/// With `null_check` a non-nullable attribute that is absent or null fails
/// the encoding; without it, such attributes are simply omitted.
pub(crate) fn encode_item(structure: &Structure, record: &Record, null_check: bool) -> Result<Item> {
    encode_structured(structure, record, null_check, true)
}

/// Explicit nulls are kept as `NULL` only in a top-level item; nested
/// records omit them like absent values.
fn encode_structured(
    structure: &Structure,
    record: &Record,
    null_check: bool,
    top_level: bool,
) -> Result<Item> {
    match structure {
        Structure::Raw => encode_record(record, null_check, top_level, None),
        Structure::Schema(declared) => {
            ensure_descends(record.schema(), declared)?;
            encode_record(record, null_check, top_level, None)
        }
        Structure::Discriminated { registry, declared } => {
            ensure_descends(record.schema(), declared)?;
            let marker = registry.resolve_for_encode(record.schema())?;
            encode_record(record, null_check, top_level, Some(marker))
        }
    }
}

/// Decode a whole item into a record.
pub(crate) fn decode_item(structure: &Structure, item: Item) -> Result<Record> {
    match structure {
        Structure::Raw => Err(Error::Configuration(
            "a raw map has no schema to build a record from".to_string(),
        )),
        Structure::Schema(schema) => {
            ensure_own_marker(schema, &item)?;
            decode_record(schema, item)
        }
        Structure::Discriminated { registry, declared } => {
            let stored_name = registry.attribute().stored_name();
            let schema = match item.get(stored_name) {
                None | Some(types::AttributeValue::Null(_)) => declared,
                Some(types::AttributeValue::S(marker)) => registry.resolve_for_decode(marker)?,
                Some(other) => {
                    return Err(codec::unexpected(stored_name, AttributeKind::String, other));
                }
            };
            ensure_descends(schema, declared)?;
            let schema = schema.clone();
            decode_record(&schema, item)
        }
    }
}

fn encode_record(
    record: &Record,
    null_check: bool,
    top_level: bool,
    marker: Option<&str>,
) -> Result<Item> {
    let schema = record.schema();
    let mut item = Item::new();
    for attribute in schema.attributes() {
        let stored_name = attribute.stored_name().to_string();
        if let (AttributeType::Discriminator, Some(marker)) = (&attribute.attribute_type, marker) {
            item.insert(stored_name, types::AttributeValue::S(marker.to_string()));
            continue;
        }
        match record.get(&attribute.name) {
            Some(value) if !value.is_null() => {
                if let Some(encoded) = codec::encode_value(&attribute.attribute_type, value)? {
                    item.insert(stored_name, encoded);
                }
            }
            value => {
                let optional = attribute.nullable
                    || matches!(
                        attribute.attribute_type,
                        AttributeType::Null | AttributeType::Discriminator
                    );
                if null_check && !optional {
                    return Err(Error::RequiredValue(attribute.name.clone()));
                }
                if top_level && value.is_some() {
                    item.insert(stored_name, types::AttributeValue::Null(true));
                }
            }
        }
    }
    if schema.is_dynamic() {
        for (name, value) in record.values() {
            if schema.attribute(name).is_some() {
                continue;
            }
            if let Some(encoded) = codec::encode_dynamic(value)? {
                item.insert(name.to_string(), encoded);
            }
        }
    }
    Ok(item)
}

fn decode_record(schema: &Arc<Schema>, mut item: Item) -> Result<Record> {
    let mut record = Record::loaded(schema);
    for attribute in schema.attributes() {
        match item.remove(attribute.stored_name()) {
            Some(value) => {
                let value = codec::decode_value(&attribute.attribute_type, value, &attribute.name)?;
                record.insert(attribute.name.clone(), value);
            }
            None if attribute.attribute_type.is_set() => {
                record.insert(attribute.name.clone(), codec::set::empty(&attribute.attribute_type));
            }
            None => {}
        }
    }
    if schema.is_dynamic() {
        let mut extras: Vec<_> = item.into_iter().collect();
        extras.sort_by(|(a, _), (b, _)| a.cmp(b));
        for (name, value) in extras {
            let value = codec::decode_dynamic(value, &name)?;
            record.insert(name, value);
        }
    } else {
        #[cfg(feature = "tracing")]
        for name in item.keys() {
            tracing::debug!(schema = schema.name(), attribute = %name, "dropping undeclared attribute");
        }
    }
    Ok(record)
}

fn encode_children(children: &IndexMap<String, Value>) -> Result<Item> {
    let mut item = Item::with_capacity(children.len());
    for (name, value) in children {
        if let Some(encoded) = codec::encode_dynamic(value)? {
            item.insert(name.clone(), encoded);
        }
    }
    Ok(item)
}

fn decode_children(children: Item, location: &str) -> Result<IndexMap<String, Value>> {
    let mut children: Vec<_> = children.into_iter().collect();
    children.sort_by(|(a, _), (b, _)| a.cmp(b));
    children
        .into_iter()
        .map(|(name, value)| {
            let value = codec::decode_dynamic(value, &format!("{location}.{name}"))?;
            Ok((name, value))
        })
        .collect()
}

/// A schema with its own markers only decodes items stored under one of them.
fn ensure_own_marker(schema: &Schema, item: &Item) -> Result<()> {
    let Some(attribute) = schema.discriminator() else {
        return Ok(());
    };
    if schema.markers().is_empty() {
        return Ok(());
    }
    match item.get(attribute.stored_name()) {
        Some(types::AttributeValue::S(marker))
            if !schema.markers().iter().any(|own| own == marker) =>
        {
            Err(Error::type_mismatch(
                format!("{} marker", schema.name()),
                marker.as_str(),
            ))
        }
        _ => Ok(()),
    }
}

fn ensure_descends(schema: &Schema, declared: &Schema) -> Result<()> {
    if !schema.descends_from(declared) {
        return Err(Error::type_mismatch(
            format!("{} or a subtype of it", declared.name()),
            schema.name(),
        ));
    }
    Ok(())
}

fn expected(structure: &Structure) -> String {
    match structure {
        Structure::Raw => "map".to_string(),
        Structure::Schema(schema) => format!("record of {}", schema.name()),
        Structure::Discriminated { declared, .. } => format!("record of {}", declared.name()),
    }
}
