use crate::kind::AttributeKind;

/// Errors raised while defining schemas or converting values.
///
/// None of these are transient: they describe either an invalid definition,
/// detected when the schema is built, or a value that does not fit its
/// declared attribute, detected while encoding or decoding.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The schema or attribute definition is invalid.
    #[error("configuration error: {0}")]
    Configuration(String),
    /// A non-nullable attribute has no value.
    #[error("attribute '{0}' cannot be None")]
    RequiredValue(String),
    /// A native value does not have the shape the attribute expects.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        /// The expected type.
        expected: String,
        /// The concrete type that was supplied.
        found: String,
    },
    /// A wire value carries a tag the attribute cannot decode.
    #[error("unexpected {found} value at {location}, expected {expected}")]
    UnexpectedTag {
        /// Where the value was found (attribute name or list index).
        location: String,
        /// The tag the declared attribute decodes.
        expected: AttributeKind,
        /// The tag found on the wire.
        found: AttributeKind,
    },
    /// A wire payload does not match its lexical format.
    #[error("'{value}' does not match the expected format '{expected}'")]
    Format {
        /// The offending payload.
        value: String,
        /// The expected pattern.
        expected: String,
    },
    /// A discriminator marker has no registered subtype.
    #[error("unknown discriminator value: {0}")]
    UnknownDiscriminator(String),
    /// A strict schema was addressed with an undeclared attribute name.
    #[error("schema '{schema}' has no attribute '{name}'")]
    UnknownAttribute {
        /// The schema name.
        schema: String,
        /// The undeclared attribute name.
        name: String,
    },
    /// Opaque JSON could not be encoded or decoded.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    /// A serde value could not be converted to a wire value.
    #[error(transparent)]
    Dynamo(#[from] serde_dynamo::Error),
}

impl Error {
    pub(crate) fn type_mismatch(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }

    pub(crate) fn format(value: impl Into<String>, expected: impl Into<String>) -> Self {
        Self::Format {
            value: value.into(),
            expected: expected.into(),
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;
