//! Schemas and the records that instantiate them.
//!
//! A [`Schema`] is an ordered table of [`Attribute`] descriptors built once
//! through [`SchemaBuilder`] and shared behind an `Arc`. Inheritance is
//! resolved at build time: the attributes of every parent are merged into the
//! child, so a built schema never looks at its parents again.
//!
//! A [`Record`] holds the values of one instance of a schema, keyed by native
//! attribute name.

use crate::{
    attribute::{Attribute, AttributeType},
    error::{Error, Result},
    value::Value,
};

use indexmap::IndexMap;
use std::{collections, sync::Arc};

/// Immutable, ordered set of attribute descriptors.
///
/// ```rust
/// use dynamodb_model::{
///     attribute::{Attribute, AttributeType},
///     schema::Schema,
/// };
///
/// let address = Schema::builder("Address")
///     .attribute(Attribute::new("street", AttributeType::String))
///     .build()
///     .unwrap();
/// let person = Schema::builder("Person")
///     .attribute(Attribute {
///         name: "id".to_string(),
///         hash_key: true,
///         ..Default::default()
///     })
///     .attribute(Attribute::new("home", AttributeType::map(&address)))
///     .build()
///     .unwrap();
/// assert_eq!(person.attributes().count(), 2);
/// ```
#[derive(Debug)]
pub struct Schema {
    name: String,
    attributes: IndexMap<String, Attribute>,
    dynamic: bool,
    markers: Vec<String>,
    lineage: Vec<String>,
}

impl Schema {
    /// Start defining a schema.
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            name: name.into(),
            ..Default::default()
        }
    }

    /// The schema name, unique among related schemas.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared attributes, inherited ones first.
    pub fn attributes(&self) -> impl Iterator<Item = &Attribute> {
        self.attributes.values()
    }

    /// The attribute with the given native name.
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    /// The attribute stored under the given wire name.
    pub fn attribute_by_stored_name(&self, stored_name: &str) -> Option<&Attribute> {
        self.attributes()
            .find(|attribute| attribute.stored_name() == stored_name)
    }

    /// Whether undeclared children are accepted and typed at runtime.
    pub fn is_dynamic(&self) -> bool {
        self.dynamic
    }

    /// Discriminator markers identifying this schema, canonical one first.
    pub fn markers(&self) -> &[String] {
        &self.markers
    }

    /// Names of this schema and of all its ancestors, most derived first.
    pub fn lineage(&self) -> &[String] {
        &self.lineage
    }

    /// Whether this schema is `other` or inherits from it.
    pub fn descends_from(&self, other: &Schema) -> bool {
        self.lineage.iter().any(|name| name == &other.name)
    }

    /// The discriminator attribute, if declared or inherited.
    pub fn discriminator(&self) -> Option<&Attribute> {
        self.find(|attribute| matches!(attribute.attribute_type, AttributeType::Discriminator))
    }

    /// The partition key attribute.
    pub fn hash_key(&self) -> Option<&Attribute> {
        self.find(|attribute| attribute.hash_key)
    }

    /// The sort key attribute.
    pub fn range_key(&self) -> Option<&Attribute> {
        self.find(|attribute| attribute.range_key)
    }

    fn find(&self, predicate: impl Fn(&Attribute) -> bool) -> Option<&Attribute> {
        self.attributes().find(|attribute| predicate(attribute))
    }
}

/// Builder for [`Schema`].
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    name: String,
    parents: Vec<Arc<Schema>>,
    attributes: Vec<Attribute>,
    dynamic: bool,
    markers: Vec<String>,
}

impl SchemaBuilder {
    /// Inherit the attributes of `parent`.
    ///
    /// With several parents, attributes of earlier parents take precedence
    /// over later ones; attributes declared on the builder override both.
    pub fn extends(mut self, parent: &Arc<Schema>) -> Self {
        self.parents.push(parent.clone());
        self
    }

    /// Declare an attribute.
    pub fn attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Accept undeclared children, typed by runtime inspection.
    pub fn dynamic(mut self) -> Self {
        self.dynamic = true;
        self
    }

    /// Add a discriminator marker; the first one is used when encoding.
    pub fn discriminator_value(mut self, marker: impl Into<String>) -> Self {
        self.markers.push(marker.into());
        self
    }

    /// Validate the definition and freeze it.
    pub fn build(self) -> Result<Arc<Schema>> {
        if self.name.is_empty() {
            return Err(Error::Configuration("schema name cannot be empty".to_string()));
        }
        let mut attributes = IndexMap::new();
        for parent in self.parents.iter().rev() {
            for attribute in parent.attributes() {
                attributes.insert(attribute.name.clone(), attribute.clone());
            }
        }
        let mut declared = collections::HashSet::with_capacity(self.attributes.len());
        for attribute in self.attributes {
            attribute.validate()?;
            if !declared.insert(attribute.name.clone()) {
                return Err(Error::Configuration(format!(
                    "attribute '{}' is declared twice on schema '{}'",
                    attribute.name, self.name
                )));
            }
            attributes.insert(attribute.name.clone(), attribute);
        }
        let mut stored_names = collections::HashSet::with_capacity(attributes.len());
        for attribute in attributes.values() {
            if !stored_names.insert(attribute.stored_name()) {
                return Err(Error::Configuration(format!(
                    "schema '{}' stores two attributes under '{}'",
                    self.name,
                    attribute.stored_name()
                )));
            }
        }
        let count = |predicate: fn(&Attribute) -> bool| {
            attributes.values().filter(|attribute| predicate(attribute)).count()
        };
        let discriminators =
            count(|attribute| matches!(attribute.attribute_type, AttributeType::Discriminator));
        if discriminators > 1 {
            return Err(Error::Configuration(format!(
                "schema '{}' has more than one discriminator attribute",
                self.name
            )));
        }
        if !self.markers.is_empty() && discriminators == 0 {
            return Err(Error::Configuration(format!(
                "schema '{}' declares a discriminator value without a discriminator attribute",
                self.name
            )));
        }
        if count(|attribute| attribute.hash_key) > 1 || count(|attribute| attribute.range_key) > 1
        {
            return Err(Error::Configuration(format!(
                "schema '{}' has more than one hash key or range key",
                self.name
            )));
        }
        let mut lineage = vec![self.name.clone()];
        for parent in &self.parents {
            for name in parent.lineage() {
                if !lineage.contains(name) {
                    lineage.push(name.clone());
                }
            }
        }
        let dynamic = self.dynamic || self.parents.iter().any(|parent| parent.dynamic);
        let schema = Schema {
            name: self.name,
            attributes,
            dynamic,
            markers: self.markers,
            lineage,
        };
        Ok(Arc::new(schema))
    }
}

/// Values of one instance of a schema.
///
/// An attribute that was never set is absent; one explicitly cleared holds
/// [`Value::Null`]. The two encode differently.
#[derive(Clone, Debug)]
pub struct Record {
    schema: Arc<Schema>,
    values: IndexMap<String, Value>,
}

impl Record {
    /// Construct a new record, applying `default_for_new` or `default`.
    ///
    /// If the schema declares discriminator markers, the discriminator
    /// attribute holds the canonical one.
    pub fn new(schema: &Arc<Schema>) -> Self {
        let mut record = Self::with_defaults(schema, true);
        if let (Some(attribute), Some(marker)) = (schema.discriminator(), schema.markers.first()) {
            record
                .values
                .insert(attribute.name.clone(), Value::String(marker.clone()));
        }
        record
    }

    /// Construct a record about to be filled from stored data.
    pub(crate) fn loaded(schema: &Arc<Schema>) -> Self {
        Self::with_defaults(schema, false)
    }

    fn with_defaults(schema: &Arc<Schema>, new: bool) -> Self {
        let mut values = IndexMap::new();
        for attribute in schema.attributes() {
            let default = match (&attribute.default_for_new, &attribute.default) {
                (Some(default), _) if new => Some(default),
                (_, default) => default.as_ref(),
            };
            if let Some(default) = default {
                let value = default.get();
                if !value.is_null() {
                    values.insert(attribute.name.clone(), value);
                }
            }
        }
        Self {
            schema: schema.clone(),
            values,
        }
    }

    /// The schema this record instantiates.
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// The value of an attribute, `None` if never set.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Set the value of an attribute.
    ///
    /// Undeclared names are rejected unless the schema is dynamic, and the
    /// discriminator attribute cannot be assigned.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        match self.schema.attribute(name) {
            Some(attribute)
                if matches!(attribute.attribute_type, AttributeType::Discriminator) =>
            {
                return Err(Error::Configuration(format!(
                    "discriminator attribute '{name}' cannot be assigned"
                )));
            }
            Some(_) => {}
            None if self.schema.dynamic => {}
            None => {
                return Err(Error::UnknownAttribute {
                    schema: self.schema.name.clone(),
                    name: name.to_string(),
                });
            }
        }
        self.values.insert(name.to_string(), value.into());
        Ok(())
    }

    /// Builder-style [`Record::set`].
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Result<Self> {
        self.set(name, value)?;
        Ok(self)
    }

    /// Remove a value, making the attribute absent again.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.values.shift_remove(name)
    }

    /// All values that are set, in insertion order.
    pub fn values(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub(crate) fn insert(&mut self, name: String, value: Value) {
        self.values.insert(name, value);
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.schema.name == other.schema.name && self.values == other.values
    }
}
