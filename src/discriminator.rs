//! Registry of subtypes sharing a discriminator attribute.
//!
//! A [`Discriminator`] binds marker strings to the schemas that inherit from
//! a base schema. Encoding writes the marker of the most derived registered
//! schema of a record; decoding reads the marker and picks the schema to
//! build the record from.

use crate::{
    attribute::Attribute,
    error::{Error, Result},
    schema::{Record, Schema},
    value::Value,
};

use indexmap::IndexMap;
use std::{collections, sync::Arc};

/// Marker to schema registry for one discriminator attribute.
///
/// ```rust
/// use dynamodb_model::{
///     attribute::{Attribute, AttributeType},
///     discriminator::Discriminator,
///     schema::Schema,
/// };
///
/// let animal = Schema::builder("Animal")
///     .attribute(Attribute::new("cls", AttributeType::Discriminator))
///     .build()
///     .unwrap();
/// let cat = Schema::builder("Cat")
///     .extends(&animal)
///     .discriminator_value("cat")
///     .build()
///     .unwrap();
/// let registry = Discriminator::builder(&animal)
///     .unwrap()
///     .register(&cat)
///     .unwrap()
///     .build();
/// assert_eq!(registry.resolve_for_encode(&cat).unwrap(), "cat");
/// assert_eq!(registry.resolve_for_decode("cat").unwrap().name(), "Cat");
/// ```
#[derive(Debug)]
pub struct Discriminator {
    base: Arc<Schema>,
    attribute: Attribute,
    subtypes: IndexMap<String, Arc<Schema>>,
    canonical: collections::HashMap<String, String>,
}

impl Discriminator {
    /// Start a registry for the subtypes of `base`.
    ///
    /// `base` must declare a discriminator attribute.
    pub fn builder(base: &Arc<Schema>) -> Result<DiscriminatorBuilder> {
        let attribute = base.discriminator().cloned().ok_or_else(|| {
            Error::Configuration(format!(
                "schema '{}' has no discriminator attribute",
                base.name()
            ))
        })?;
        Ok(DiscriminatorBuilder {
            registry: Self {
                base: base.clone(),
                attribute,
                subtypes: IndexMap::new(),
                canonical: collections::HashMap::new(),
            },
        })
    }

    /// The schema every registered subtype descends from.
    pub fn base(&self) -> &Arc<Schema> {
        &self.base
    }

    /// The discriminator attribute of the base schema.
    pub fn attribute(&self) -> &Attribute {
        &self.attribute
    }

    /// Registered markers in registration order.
    pub fn markers(&self) -> impl Iterator<Item = &str> {
        self.subtypes.keys().map(String::as_str)
    }

    /// Registered schemas in registration order, each once.
    pub fn subtypes(&self) -> impl Iterator<Item = &Arc<Schema>> {
        self.subtypes
            .iter()
            .filter(|(marker, schema)| {
                self.canonical.get(schema.name()).map(String::as_str) == Some(marker.as_str())
            })
            .map(|(_, schema)| schema)
    }

    /// The marker to store for a record of `schema`.
    ///
    /// The lineage of `schema` is searched most derived first, so an
    /// unregistered subtype is stored under its nearest registered ancestor.
    pub fn resolve_for_encode(&self, schema: &Schema) -> Result<&str> {
        self.ensure_registrations()?;
        schema
            .lineage()
            .iter()
            .find_map(|name| self.canonical.get(name))
            .map(String::as_str)
            .ok_or_else(|| {
                Error::Configuration(format!(
                    "schema '{}' is not registered for discriminator '{}'",
                    schema.name(),
                    self.attribute.name
                ))
            })
    }

    /// The schema bound to a stored marker.
    pub fn resolve_for_decode(&self, marker: &str) -> Result<&Arc<Schema>> {
        self.ensure_registrations()?;
        self.subtypes
            .get(marker)
            .ok_or_else(|| Error::UnknownDiscriminator(marker.to_string()))
    }

    /// Construct a record of `schema` holding its marker.
    pub fn instantiate(&self, schema: &Arc<Schema>) -> Result<Record> {
        let marker = self.resolve_for_encode(schema)?;
        let mut record = Record::new(schema);
        record.insert(
            self.attribute.name.clone(),
            Value::String(marker.to_string()),
        );
        Ok(record)
    }

    fn ensure_registrations(&self) -> Result<()> {
        if self.subtypes.is_empty() {
            return Err(Error::Configuration(format!(
                "discriminator '{}' of schema '{}' is not implemented by any registered schema",
                self.attribute.name,
                self.base.name()
            )));
        }
        Ok(())
    }
}

/// Builder for [`Discriminator`].
#[derive(Debug)]
pub struct DiscriminatorBuilder {
    registry: Discriminator,
}

impl DiscriminatorBuilder {
    /// Register `schema` under every marker it declares.
    pub fn register(self, schema: &Arc<Schema>) -> Result<Self> {
        if schema.markers().is_empty() {
            return Err(Error::Configuration(format!(
                "schema '{}' declares no discriminator value",
                schema.name()
            )));
        }
        schema
            .markers()
            .iter()
            .try_fold(self, |builder, marker| builder.register_as(schema, marker.clone()))
    }

    /// Register `schema` under `marker`.
    ///
    /// The first marker registered for a schema is the one it is stored
    /// under. Binding a marker already bound to another schema is an error.
    pub fn register_as(mut self, schema: &Arc<Schema>, marker: impl Into<String>) -> Result<Self> {
        let marker = marker.into();
        let registry = &mut self.registry;
        if !schema.descends_from(&registry.base) {
            return Err(Error::Configuration(format!(
                "schema '{}' does not inherit from '{}'",
                schema.name(),
                registry.base.name()
            )));
        }
        if let Some(existing) = registry.subtypes.get(&marker) {
            if existing.name() != schema.name() {
                return Err(Error::Configuration(format!(
                    "The discriminator value '{marker}' is already assigned to a schema: {}",
                    existing.name()
                )));
            }
            return Ok(self);
        }
        registry
            .canonical
            .entry(schema.name().to_string())
            .or_insert_with(|| marker.clone());
        registry.subtypes.insert(marker, schema.clone());
        Ok(self)
    }

    /// Freeze the registry.
    pub fn build(self) -> Arc<Discriminator> {
        Arc::new(self.registry)
    }
}
