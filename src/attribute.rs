//! Attribute descriptors.
//!
//! An [`Attribute`] names one slot of a schema and declares how its value is
//! carried on the wire. Descriptors are plain data: they are validated when
//! the owning [`Schema`](crate::schema::Schema) is built and never change
//! afterwards.

use crate::{
    discriminator::Discriminator,
    error::{Error, Result},
    kind::AttributeKind,
    schema::Schema,
    value::Value,
};

use std::{fmt, sync::Arc};

/// Declared type of an attribute.
#[derive(Clone, Debug, Default)]
pub enum AttributeType {
    /// Unicode string.
    #[default]
    String,
    /// Exact decimal number.
    Number,
    /// Raw bytes.
    ///
    /// With `legacy` the bytes are base64 encoded once more before they are
    /// handed to the wire. Only valid on top-level attributes.
    Binary {
        /// Use the legacy base64 encoding.
        legacy: bool,
    },
    /// Boolean.
    ///
    /// With `legacy` the value is stored as the number `1` or `0`.
    Boolean {
        /// Use the legacy numeric encoding.
        legacy: bool,
    },
    /// Always null.
    Null,
    /// Set of strings.
    StringSet,
    /// Set of numbers.
    NumberSet,
    /// Set of byte strings.
    BinarySet {
        /// Use the legacy base64 encoding for each element.
        legacy: bool,
    },
    /// Ordered sequence, optionally with a declared element type.
    List {
        /// Type every element must have; `None` infers each element.
        of: Option<Box<AttributeType>>,
    },
    /// Structured value.
    Map(Structure),
    /// UTC instant stored as a fixed-width string.
    UtcDateTime,
    /// Expiry instant stored as epoch seconds.
    Ttl,
    /// Arbitrary JSON document stored as text.
    Json,
    /// Integer counter.
    Version,
    /// Marker naming the subtype of a structured value.
    Discriminator,
}

impl AttributeType {
    /// List with elements of the given type.
    pub fn list_of(of: AttributeType) -> Self {
        Self::List {
            of: Some(Box::new(of)),
        }
    }

    /// Map whose children are all inferred at runtime.
    pub fn raw_map() -> Self {
        Self::Map(Structure::Raw)
    }

    /// Map following a declared schema.
    pub fn map(schema: &Arc<Schema>) -> Self {
        Self::Map(Structure::Schema(schema.clone()))
    }

    /// Map holding any subtype of `declared` registered in `registry`.
    pub fn polymorphic(registry: &Arc<Discriminator>, declared: &Arc<Schema>) -> Self {
        Self::Map(Structure::Discriminated {
            registry: registry.clone(),
            declared: declared.clone(),
        })
    }

    /// The wire kind the type encodes to.
    pub fn kind(&self) -> AttributeKind {
        match self {
            Self::String | Self::UtcDateTime | Self::Json | Self::Discriminator => {
                AttributeKind::String
            }
            Self::Number | Self::Ttl | Self::Version => AttributeKind::Number,
            Self::Binary { .. } => AttributeKind::Binary,
            Self::Boolean { legacy: true } => AttributeKind::Number,
            Self::Boolean { legacy: false } => AttributeKind::Boolean,
            Self::Null => AttributeKind::Null,
            Self::StringSet => AttributeKind::StringSet,
            Self::NumberSet => AttributeKind::NumberSet,
            Self::BinarySet { .. } => AttributeKind::BinarySet,
            Self::List { .. } => AttributeKind::List,
            Self::Map(_) => AttributeKind::Map,
        }
    }

    /// Whether a wire value of `kind` can be decoded by this type.
    pub(crate) fn accepts(&self, kind: AttributeKind) -> bool {
        match self {
            // booleans are readable in either encoding
            Self::Boolean { .. } => {
                matches!(kind, AttributeKind::Boolean | AttributeKind::Number)
            }
            _ => self.kind() == kind,
        }
    }

    fn uses_legacy_binary(&self) -> bool {
        match self {
            Self::Binary { legacy } | Self::BinarySet { legacy } => *legacy,
            Self::List { of: Some(of) } => of.uses_legacy_binary(),
            _ => false,
        }
    }

    /// Reject legacy binary anywhere inside a nested structure.
    pub(crate) fn validate_nested(&self, owner: &str) -> Result<()> {
        match self {
            Self::List { of: Some(of) } => of.validate_nested(owner),
            Self::Map(Structure::Schema(schema)) => validate_children(schema, owner),
            Self::Map(Structure::Discriminated { registry, declared }) => {
                validate_children(declared, owner)?;
                registry
                    .subtypes()
                    .try_for_each(|subtype| validate_children(subtype, owner))
            }
            _ => Ok(()),
        }
    }

    pub(crate) fn is_set(&self) -> bool {
        self.kind().is_set()
    }
}

fn validate_children(schema: &Schema, owner: &str) -> Result<()> {
    for attribute in schema.attributes() {
        if attribute.attribute_type.uses_legacy_binary() {
            return Err(Error::Configuration(format!(
                "legacy binary attribute '{}' is not supported inside map attribute '{owner}'",
                attribute.name
            )));
        }
        attribute.attribute_type.validate_nested(owner)?;
    }
    Ok(())
}

/// How the children of a map attribute are typed.
#[derive(Clone, Debug)]
pub enum Structure {
    /// Every child is typed by runtime inspection.
    Raw,
    /// Children follow the schema; the schema may allow dynamic extras.
    Schema(Arc<Schema>),
    /// Children follow the subtype named by the discriminator marker.
    Discriminated {
        /// Registry resolving markers to subtype schemas.
        registry: Arc<Discriminator>,
        /// Schema every decoded subtype must descend from.
        declared: Arc<Schema>,
    },
}

/// Default value of an attribute.
#[derive(Clone)]
pub enum DefaultValue {
    /// A fixed value; only scalars are accepted.
    Value(Value),
    /// A supplier evaluated on every construction.
    Supplier(Arc<dyn Fn() -> Value + Send + Sync>),
}

impl DefaultValue {
    /// Wrap a supplier function.
    pub fn supplier(supplier: impl Fn() -> Value + Send + Sync + 'static) -> Self {
        Self::Supplier(Arc::new(supplier))
    }

    pub(crate) fn get(&self) -> Value {
        match self {
            Self::Value(value) => value.clone(),
            Self::Supplier(supplier) => supplier(),
        }
    }

    fn validate(&self, name: &str) -> Result<()> {
        match self {
            Self::Value(
                value @ (Value::List(_)
                | Value::Map(_)
                | Value::Record(_)
                | Value::StringSet(_)
                | Value::NumberSet(_)
                | Value::BinarySet(_)
                | Value::Json(_)),
            ) => Err(Error::Configuration(format!(
                "default of '{name}' is a mutable {}; use a supplier instead",
                value.type_name()
            ))),
            _ => Ok(()),
        }
    }
}

impl fmt::Debug for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Self::Supplier(_) => f.write_str("Supplier(..)"),
        }
    }
}

/// Descriptor of a named attribute.
///
/// ```rust
/// use dynamodb_model::attribute::{Attribute, AttributeType};
///
/// let attribute = Attribute {
///     name: "id".to_string(),
///     wire_name: Some("pk".to_string()),
///     hash_key: true,
///     ..Default::default()
/// };
/// assert_eq!(attribute.stored_name(), "pk");
/// assert!(matches!(attribute.attribute_type, AttributeType::String));
/// ```
#[derive(Clone, Debug, Default)]
pub struct Attribute {
    /// Native name, used to read and write the value on a record.
    pub name: String,
    /// Name on the wire, when it differs from `name`.
    pub wire_name: Option<String>,
    /// Declared type.
    pub attribute_type: AttributeType,
    /// Whether the attribute may be absent or null.
    pub nullable: bool,
    /// Value set on every construction, including decoding.
    pub default: Option<DefaultValue>,
    /// Value set only on records constructed by the caller.
    pub default_for_new: Option<DefaultValue>,
    /// Whether the attribute is the partition key.
    pub hash_key: bool,
    /// Whether the attribute is the sort key.
    pub range_key: bool,
}

impl Attribute {
    /// Attribute with the given name and type and every other field defaulted.
    pub fn new(name: impl Into<String>, attribute_type: AttributeType) -> Self {
        Self {
            name: name.into(),
            attribute_type,
            ..Default::default()
        }
    }

    /// The name the attribute is stored under.
    pub fn stored_name(&self) -> &str {
        self.wire_name.as_deref().unwrap_or(&self.name)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(Error::Configuration(
                "attribute name cannot be empty".to_string(),
            ));
        }
        if self.default.is_some() && self.default_for_new.is_some() {
            return Err(Error::Configuration(format!(
                "attribute '{}' cannot declare both default and default_for_new",
                self.name
            )));
        }
        for default in [&self.default, &self.default_for_new].into_iter().flatten() {
            default.validate(&self.name)?;
        }
        if self.hash_key && self.range_key {
            return Err(Error::Configuration(format!(
                "attribute '{}' cannot be both hash key and range key",
                self.name
            )));
        }
        if (self.hash_key || self.range_key) && self.nullable {
            return Err(Error::Configuration(format!(
                "key attribute '{}' cannot be nullable",
                self.name
            )));
        }
        self.attribute_type.validate_nested(&self.name)
    }
}
