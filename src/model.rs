//! Whole-item conversion for a table's records.

use crate::{
    attribute::Structure,
    codec::{self, Item, map},
    discriminator::Discriminator,
    error::{Error, Result},
    schema::{Record, Schema},
    simple,
};

use std::sync::Arc;

/// Converts records of one schema, or of a family of subtypes, to and from
/// items.
///
/// ```rust
/// use aws_sdk_dynamodb::types::AttributeValue;
/// use dynamodb_model::{
///     attribute::{Attribute, AttributeType},
///     model::Model,
///     schema::{Record, Schema},
/// };
///
/// let schema = Schema::builder("User")
///     .attribute(Attribute {
///         name: "id".to_string(),
///         hash_key: true,
///         ..Default::default()
///     })
///     .attribute(Attribute::new("age", AttributeType::Number))
///     .build()
///     .unwrap();
/// let model = Model::new(&schema);
///
/// let user = Record::new(&schema).with("id", "1").unwrap().with("age", 30).unwrap();
/// let item = model.serialize(&user, true).unwrap();
/// assert_eq!(item["age"], AttributeValue::N("30".to_string()));
/// assert_eq!(model.deserialize(item).unwrap(), user);
/// ```
#[derive(Clone, Debug)]
pub struct Model {
    declared: Arc<Schema>,
    structure: Structure,
}

impl Model {
    /// Model for records of `schema` and its subtypes.
    pub fn new(schema: &Arc<Schema>) -> Self {
        Self {
            declared: schema.clone(),
            structure: Structure::Schema(schema.clone()),
        }
    }

    /// Model for records of any subtype of `declared` registered in
    /// `registry`; the stored marker picks the schema on decode.
    pub fn polymorphic(registry: &Arc<Discriminator>, declared: &Arc<Schema>) -> Self {
        Self {
            declared: declared.clone(),
            structure: Structure::Discriminated {
                registry: registry.clone(),
                declared: declared.clone(),
            },
        }
    }

    /// The declared schema.
    pub fn schema(&self) -> &Arc<Schema> {
        &self.declared
    }

    /// Encode a record as an item.
    ///
    /// With `null_check`, a non-nullable attribute without a value fails the
    /// encoding.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "dynamodb_model.serialize", skip_all, err)
    )]
    pub fn serialize(&self, record: &Record, null_check: bool) -> Result<Item> {
        map::encode_item(&self.structure, record, null_check)
    }

    /// Decode an item into a record.
    ///
    /// Attributes the schema does not declare are dropped, unless the schema
    /// is dynamic.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "dynamodb_model.deserialize", skip_all, err)
    )]
    pub fn deserialize(&self, item: Item) -> Result<Record> {
        map::decode_item(&self.structure, item)
    }

    /// The key item of a record, as used by get and delete requests.
    pub fn key(&self, record: &Record) -> Result<Item> {
        let schema = record.schema();
        let hash_key = schema.hash_key().ok_or_else(|| {
            Error::Configuration(format!("schema '{}' has no hash key", schema.name()))
        })?;
        let mut key = Item::with_capacity(2);
        for attribute in [Some(hash_key), schema.range_key()].into_iter().flatten() {
            let value = record
                .get(&attribute.name)
                .ok_or_else(|| Error::RequiredValue(attribute.name.clone()))?;
            let encoded = codec::encode(attribute, value)?
                .ok_or_else(|| Error::RequiredValue(attribute.name.clone()))?;
            key.insert(attribute.stored_name().to_string(), encoded);
        }
        Ok(key)
    }

    /// Render a record as a plain JSON object with sorted keys.
    ///
    /// With `force`, missing non-nullable attributes are skipped instead of
    /// failing the conversion.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "dynamodb_model.to_simple_dict", skip_all, err)
    )]
    pub fn to_simple_dict(&self, record: &Record, force: bool) -> Result<serde_json::Value> {
        let item = self.serialize(record, !force)?;
        let object = item
            .iter()
            .map(|(name, value)| Ok((name.clone(), simple::to_json(value)?)))
            .collect::<Result<_>>()?;
        Ok(serde_json::Value::Object(object))
    }

    /// Read a record from a plain JSON object.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "dynamodb_model.from_simple_dict", skip_all, err)
    )]
    pub fn from_simple_dict(&self, json: serde_json::Value) -> Result<Record> {
        let object = match json {
            serde_json::Value::Object(object) => object,
            other => return Err(Error::type_mismatch("object", other.to_string())),
        };
        let item = simple::item_from_json(&self.structure, object)?;
        self.deserialize(item)
    }

    /// Render a record in the database's JSON format.
    pub fn to_dynamodb_json(&self, record: &Record) -> Result<String> {
        let item = self.serialize(record, true)?;
        let object = simple::item_to_wire_json(&item)?;
        Ok(serde_json::to_string(&object)?)
    }

    /// Read a record from the database's JSON format.
    pub fn from_dynamodb_json(&self, json: &str) -> Result<Record> {
        let object = serde_json::from_str(json)?;
        let item = simple::item_from_wire_json(object)?;
        self.deserialize(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::{
        attribute::{Attribute, AttributeType},
        value::Value,
    };
    use aws_sdk_dynamodb::types;
    use rstest::rstest;
    use serde_json::json;

    fn schema() -> Arc<Schema> {
        Schema::builder("Thread")
            .attribute(Attribute {
                name: "forum".to_string(),
                hash_key: true,
                ..Default::default()
            })
            .attribute(Attribute {
                name: "subject".to_string(),
                wire_name: Some("s".to_string()),
                range_key: true,
                ..Default::default()
            })
            .attribute(Attribute {
                name: "views".to_string(),
                attribute_type: AttributeType::Number,
                nullable: true,
                ..Default::default()
            })
            .attribute(Attribute {
                name: "data".to_string(),
                attribute_type: AttributeType::Binary { legacy: false },
                nullable: true,
                ..Default::default()
            })
            .build()
            .unwrap()
    }

    fn record() -> Record {
        Record::new(&schema())
            .with("forum", "rust")
            .unwrap()
            .with("subject", "ownership")
            .unwrap()
            .with("views", 3)
            .unwrap()
    }

    #[test]
    fn test_key() {
        let model = Model::new(&schema());
        assert_eq!(
            model.key(&record()).unwrap(),
            Item::from([
                ("forum".to_string(), types::AttributeValue::S("rust".to_string())),
                ("s".to_string(), types::AttributeValue::S("ownership".to_string())),
            ])
        );
    }

    #[rstest]
    #[case::missing_range_key(Record::new(&schema()).with("forum", "rust").unwrap())]
    #[case::null_hash_key(
        Record::new(&schema())
            .with("forum", Value::Null)
            .unwrap()
            .with("subject", "a")
            .unwrap()
    )]
    fn test_key_requires_values(#[case] record: Record) {
        let error = Model::new(&schema()).key(&record).unwrap_err();
        assert!(matches!(error, Error::RequiredValue(_)));
    }

    #[test]
    fn test_key_without_hash_key() {
        let schema = Schema::builder("Keyless").build().unwrap();
        let error = Model::new(&schema).key(&Record::new(&schema)).unwrap_err();
        assert!(matches!(error, Error::Configuration(_)));
    }

    #[test]
    fn test_simple_dict() {
        let model = Model::new(&schema());
        let record = record().with("data", vec![104u8, 105]).unwrap();
        let json = model.to_simple_dict(&record, false).unwrap();
        assert_eq!(
            json,
            json!({"data": "aGk=", "forum": "rust", "s": "ownership", "views": 3})
        );
        assert_eq!(model.from_simple_dict(json).unwrap(), record);
    }

    #[test]
    fn test_simple_dict_force() {
        let model = Model::new(&schema());
        let record = Record::new(&schema()).with("views", 1).unwrap();
        assert!(model.to_simple_dict(&record, false).is_err());
        assert_eq!(
            model.to_simple_dict(&record, true).unwrap(),
            json!({"views": 1})
        );
    }

    #[test]
    fn test_from_simple_dict_requires_object() {
        let error = Model::new(&schema()).from_simple_dict(json!([1])).unwrap_err();
        assert!(matches!(error, Error::TypeMismatch { .. }));
    }

    #[test]
    fn test_dynamodb_json() {
        let model = Model::new(&schema());
        let json = model.to_dynamodb_json(&record()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(
            parsed,
            json!({
                "forum": {"S": "rust"},
                "s": {"S": "ownership"},
                "views": {"N": "3"},
            })
        );
        assert_eq!(model.from_dynamodb_json(&json).unwrap(), record());
    }
}
