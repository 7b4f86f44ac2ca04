use aws_sdk_dynamodb::types;
use std::{fmt, ops};

/// Wire kind of an attribute value.
///
/// Each kind maps to exactly one tag of the DynamoDB typed-value envelope.
///
/// ```rust
/// use dynamodb_model::kind::AttributeKind;
///
/// assert_eq!(&*AttributeKind::StringSet, "SS");
/// assert_eq!(AttributeKind::from_tag("BOOL"), Some(AttributeKind::Boolean));
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum AttributeKind {
    /// Unicode string (`S`).
    String,
    /// Decimal number carried as a string (`N`).
    Number,
    /// Binary payload (`B`).
    Binary,
    /// Boolean (`BOOL`).
    Boolean,
    /// Explicit null (`NULL`).
    Null,
    /// Set of strings (`SS`).
    StringSet,
    /// Set of numbers (`NS`).
    NumberSet,
    /// Set of binary payloads (`BS`).
    BinarySet,
    /// Ordered list of tagged values (`L`).
    List,
    /// Map of names to tagged values (`M`).
    Map,
}

impl AttributeKind {
    const ALL: [Self; 10] = [
        Self::String,
        Self::Number,
        Self::Binary,
        Self::Boolean,
        Self::Null,
        Self::StringSet,
        Self::NumberSet,
        Self::BinarySet,
        Self::List,
        Self::Map,
    ];

    /// Look up a kind by its wire tag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| &**kind == tag)
    }

    /// The kind of a wire value, `None` for variants unknown to this crate.
    pub fn of(value: &types::AttributeValue) -> Option<Self> {
        let kind = match value {
            types::AttributeValue::S(_) => Self::String,
            types::AttributeValue::N(_) => Self::Number,
            types::AttributeValue::B(_) => Self::Binary,
            types::AttributeValue::Bool(_) => Self::Boolean,
            types::AttributeValue::Null(_) => Self::Null,
            types::AttributeValue::Ss(_) => Self::StringSet,
            types::AttributeValue::Ns(_) => Self::NumberSet,
            types::AttributeValue::Bs(_) => Self::BinarySet,
            types::AttributeValue::L(_) => Self::List,
            types::AttributeValue::M(_) => Self::Map,
            _ => return None,
        };
        Some(kind)
    }

    /// Whether the kind is one of the three set kinds.
    pub fn is_set(&self) -> bool {
        matches!(self, Self::StringSet | Self::NumberSet | Self::BinarySet)
    }
}

impl ops::Deref for AttributeKind {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        match self {
            Self::String => "S",
            Self::Number => "N",
            Self::Binary => "B",
            Self::Boolean => "BOOL",
            Self::Null => "NULL",
            Self::StringSet => "SS",
            Self::NumberSet => "NS",
            Self::BinarySet => "BS",
            Self::List => "L",
            Self::Map => "M",
        }
    }
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self)
    }
}
