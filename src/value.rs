//! Native values held by records.
//!
//! [`Value`] is the closed set of shapes an attribute can hold before it is
//! encoded to, or after it is decoded from, the wire envelope.

mod number;

pub use number::Number;

use crate::{
    error::{Error, Result},
    kind::AttributeKind,
    schema::Record,
};

use chrono::{DateTime, NaiveDateTime, TimeDelta, Utc};
use indexmap::IndexMap;
use std::collections::BTreeSet;

/// A native attribute value.
///
/// Sets are `BTreeSet`s, so their iteration order is the natural order of
/// the elements and encoding them is deterministic.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// Explicit null, as opposed to an attribute that was never set.
    Null,
    /// Boolean.
    Bool(bool),
    /// Exact decimal number.
    Number(Number),
    /// Unicode string.
    String(String),
    /// Raw bytes.
    Binary(Vec<u8>),
    /// Set of strings.
    StringSet(BTreeSet<String>),
    /// Set of numbers.
    NumberSet(BTreeSet<Number>),
    /// Set of byte strings.
    BinarySet(BTreeSet<Vec<u8>>),
    /// Ordered, possibly heterogeneous sequence.
    List(Vec<Value>),
    /// Open map whose children are typed at runtime.
    Map(IndexMap<String, Value>),
    /// Instance of a declared schema.
    Record(Record),
    /// Timezone-aware instant.
    DateTime(DateTime<Utc>),
    /// Instant without timezone; accepted as UTC where that is unambiguous.
    NaiveDateTime(NaiveDateTime),
    /// Duration relative to the time of encoding.
    Duration(TimeDelta),
    /// Arbitrary JSON document.
    Json(serde_json::Value),
}

impl Value {
    /// Build a set, inferring its kind from the elements.
    ///
    /// All elements must be strings, numbers or binaries, and all of the
    /// same kind. An empty input has no kind to infer and is rejected.
    ///
    /// ```rust
    /// use dynamodb_model::value::Value;
    ///
    /// let set = Value::set(vec![Value::from("b"), Value::from("a")]).unwrap();
    /// assert!(matches!(set, Value::StringSet(_)));
    /// assert!(Value::set(vec![Value::from("a"), Value::from(1)]).is_err());
    /// ```
    pub fn set(elements: impl IntoIterator<Item = Value>) -> Result<Self> {
        let mut elements = elements.into_iter().peekable();
        let first = elements.peek().ok_or_else(|| {
            Error::Configuration("cannot infer the kind of an empty set".to_string())
        })?;
        let mut value = match first {
            Self::String(_) => Self::StringSet(BTreeSet::new()),
            Self::Number(_) => Self::NumberSet(BTreeSet::new()),
            Self::Binary(_) => Self::BinarySet(BTreeSet::new()),
            other => return Err(Error::type_mismatch("string, number or binary", other.type_name())),
        };
        for element in elements {
            match (&mut value, element) {
                (Self::StringSet(set), Self::String(element)) => {
                    set.insert(element);
                }
                (Self::NumberSet(set), Self::Number(element)) => {
                    set.insert(element);
                }
                (Self::BinarySet(set), Self::Binary(element)) => {
                    set.insert(element);
                }
                (set, element) => {
                    let expected = match set {
                        Self::StringSet(_) => "string",
                        Self::NumberSet(_) => "number",
                        _ => "binary",
                    };
                    return Err(Error::type_mismatch(
                        format!("set of {expected}"),
                        element.type_name(),
                    ));
                }
            }
        }
        Ok(value)
    }

    /// Name of the concrete shape, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Binary(_) => "binary",
            Self::StringSet(_) => "string set",
            Self::NumberSet(_) => "number set",
            Self::BinarySet(_) => "binary set",
            Self::List(_) => "list",
            Self::Map(_) => "map",
            Self::Record(_) => "record",
            Self::DateTime(_) => "datetime",
            Self::NaiveDateTime(_) => "naive datetime",
            Self::Duration(_) => "duration",
            Self::Json(_) => "json",
        }
    }

    /// Whether the value is [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// The wire kind this value takes when no attribute type is declared.
    pub fn infer_kind(&self) -> Result<AttributeKind> {
        let kind = match self {
            Self::Null => AttributeKind::Null,
            Self::Bool(_) => AttributeKind::Boolean,
            Self::Number(_) => AttributeKind::Number,
            Self::String(_) => AttributeKind::String,
            Self::Binary(_) => AttributeKind::Binary,
            Self::StringSet(_) => AttributeKind::StringSet,
            Self::NumberSet(_) => AttributeKind::NumberSet,
            Self::BinarySet(_) => AttributeKind::BinarySet,
            Self::List(_) => AttributeKind::List,
            Self::Map(_) | Self::Record(_) => AttributeKind::Map,
            other => {
                return Err(Error::type_mismatch(
                    "a value with a dynamic wire kind",
                    other.type_name(),
                ));
            }
        };
        Ok(kind)
    }

    /// The string, if this is [`Value::String`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }

    /// The number, if this is [`Value::Number`].
    pub fn as_number(&self) -> Option<&Number> {
        match self {
            Self::Number(value) => Some(value),
            _ => None,
        }
    }

    /// The record, if this is [`Value::Record`].
    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Self::Record(value) => Some(value),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Number> for Value {
    fn from(value: Number) -> Self {
        Self::Number(value)
    }
}

macro_rules! value_from_integer {
    ($($integer:ty),*) => {
        $(
            impl From<$integer> for Value {
                fn from(value: $integer) -> Self {
                    Self::Number(value.into())
                }
            }
        )*
    };
}

value_from_integer!(i32, i64, i128, u32, u64, u128, usize);

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Self::Binary(value)
    }
}

impl From<&[u8]> for Value {
    fn from(value: &[u8]) -> Self {
        Self::Binary(value.to_vec())
    }
}

impl From<BTreeSet<String>> for Value {
    fn from(value: BTreeSet<String>) -> Self {
        Self::StringSet(value)
    }
}

impl From<BTreeSet<Number>> for Value {
    fn from(value: BTreeSet<Number>) -> Self {
        Self::NumberSet(value)
    }
}

impl From<BTreeSet<Vec<u8>>> for Value {
    fn from(value: BTreeSet<Vec<u8>>) -> Self {
        Self::BinarySet(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Self::List(value)
    }
}

impl From<IndexMap<String, Value>> for Value {
    fn from(value: IndexMap<String, Value>) -> Self {
        Self::Map(value)
    }
}

impl From<Record> for Value {
    fn from(value: Record) -> Self {
        Self::Record(value)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Self::DateTime(value)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(value: NaiveDateTime) -> Self {
        Self::NaiveDateTime(value)
    }
}

impl From<TimeDelta> for Value {
    fn from(value: TimeDelta) -> Self {
        Self::Duration(value)
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        Self::Json(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}
