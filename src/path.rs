//! Addressing of nested attributes.
//!
//! An [`AttributePath`] is computed from the root schema of a record down to
//! a nested attribute. Every step resolves the native name against the schema
//! in scope and records its stored name, so wire name overrides are honored
//! at every level and the same sub-schema embedded under two parents yields
//! two distinct paths.

use crate::{
    attribute::{AttributeType, Structure},
    discriminator::Discriminator,
    error::{Error, Result},
    schema::Schema,
};

use std::{collections, fmt};

/// One step of an attribute path.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum PathElement {
    /// Stored name of a map child.
    Name(String),
    /// Position in a list.
    Index(usize),
}

/// Path of a nested attribute, from the root of a record.
///
/// ```rust
/// use dynamodb_model::{
///     attribute::{Attribute, AttributeType},
///     schema::Schema,
/// };
///
/// let address = Schema::builder("Address")
///     .attribute(Attribute {
///         name: "street".to_string(),
///         wire_name: Some("st".to_string()),
///         ..Default::default()
///     })
///     .build()
///     .unwrap();
/// let person = Schema::builder("Person")
///     .attribute(Attribute::new("home", AttributeType::map(&address)))
///     .attribute(Attribute::new("previous", AttributeType::list_of(AttributeType::map(&address))))
///     .build()
///     .unwrap();
///
/// let path = person.path("previous").unwrap().index(0).unwrap().child("street").unwrap();
/// assert_eq!(path.to_string(), "previous[0].st");
/// assert_eq!(person.resolve_path(&["home", "street"]).unwrap(), ["home", "st"]);
/// ```
#[derive(Clone, Debug)]
pub struct AttributePath {
    elements: Vec<PathElement>,
    attribute_type: Option<AttributeType>,
}

impl AttributePath {
    /// Step into the child `name` of the map at this path.
    ///
    /// Children of declared schemas are resolved by native name; children of
    /// raw maps and undeclared children of dynamic schemas are used as is.
    /// Under a polymorphic map, a child the declared schema lacks is looked
    /// up in the registered subtypes.
    pub fn child(mut self, name: &str) -> Result<Self> {
        let (stored_name, attribute_type) = match &self.attribute_type {
            Some(AttributeType::Map(Structure::Schema(schema))) => lookup(schema, name)?,
            Some(AttributeType::Map(Structure::Discriminated { registry, declared })) => {
                lookup_polymorphic(registry, declared, name)?
            }
            Some(AttributeType::Map(Structure::Raw)) | None => (name.to_string(), None),
            Some(other) => {
                return Err(Error::type_mismatch("map", other.kind().to_string()));
            }
        };
        self.elements.push(PathElement::Name(stored_name));
        self.attribute_type = attribute_type;
        Ok(self)
    }

    /// Step into the element `index` of the list at this path.
    pub fn index(mut self, index: usize) -> Result<Self> {
        self.attribute_type = match self.attribute_type {
            Some(AttributeType::List { of }) => of.map(|of| *of),
            None => None,
            Some(other) => {
                return Err(Error::type_mismatch("list", other.kind().to_string()));
            }
        };
        self.elements.push(PathElement::Index(index));
        Ok(self)
    }

    /// The steps of the path.
    pub fn elements(&self) -> &[PathElement] {
        &self.elements
    }

    /// Stored names along the path, without list positions.
    pub fn names(&self) -> Vec<&str> {
        self.elements
            .iter()
            .filter_map(|element| match element {
                PathElement::Name(name) => Some(name.as_str()),
                PathElement::Index(_) => None,
            })
            .collect()
    }

    /// Declared type of the attribute at the end of the path, if known.
    pub fn attribute_type(&self) -> Option<&AttributeType> {
        self.attribute_type.as_ref()
    }

    /// Render the path with name placeholders, for use in expressions.
    ///
    /// Returns the expression, such as `#home.#street` or `#tags[0]`, and the
    /// placeholder to name map.
    pub fn to_expression(&self) -> (String, collections::HashMap<String, String>) {
        let mut expression = String::new();
        let mut names = collections::HashMap::new();
        for element in &self.elements {
            match element {
                PathElement::Name(name) => {
                    let placeholder = format!("#{name}");
                    if !expression.is_empty() {
                        expression.push('.');
                    }
                    expression.push_str(&placeholder);
                    names.insert(placeholder, name.clone());
                }
                PathElement::Index(index) => {
                    expression.push_str(&format!("[{index}]"));
                }
            }
        }
        (expression, names)
    }
}

impl PartialEq for AttributePath {
    fn eq(&self, other: &Self) -> bool {
        self.elements == other.elements
    }
}

impl fmt::Display for AttributePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (position, element) in self.elements.iter().enumerate() {
            match element {
                PathElement::Name(name) if position == 0 => write!(f, "{name}")?,
                PathElement::Name(name) => write!(f, ".{name}")?,
                PathElement::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

impl Schema {
    /// Path of the top-level attribute `name`.
    pub fn path(&self, name: &str) -> Result<AttributePath> {
        let (stored_name, attribute_type) = lookup(self, name)?;
        Ok(AttributePath {
            elements: vec![PathElement::Name(stored_name)],
            attribute_type,
        })
    }

    /// Stored names of the attribute reached through the native `names`.
    pub fn resolve_path(&self, names: &[&str]) -> Result<Vec<String>> {
        let Some((first, rest)) = names.split_first() else {
            return Ok(Vec::new());
        };
        let path = rest
            .iter()
            .try_fold(self.path(first)?, |path, name| path.child(name))?;
        Ok(path.names().into_iter().map(str::to_string).collect())
    }
}

fn lookup(schema: &Schema, name: &str) -> Result<(String, Option<AttributeType>)> {
    match schema.attribute(name) {
        Some(attribute) => Ok((
            attribute.stored_name().to_string(),
            Some(attribute.attribute_type.clone()),
        )),
        None if schema.is_dynamic() => Ok((name.to_string(), None)),
        None => Err(Error::UnknownAttribute {
            schema: schema.name().to_string(),
            name: name.to_string(),
        }),
    }
}

fn lookup_polymorphic(
    registry: &Discriminator,
    declared: &Schema,
    name: &str,
) -> Result<(String, Option<AttributeType>)> {
    if declared.attribute(name).is_some() {
        return lookup(declared, name);
    }
    registry
        .subtypes()
        .filter(|subtype| subtype.descends_from(declared))
        .find(|subtype| subtype.attribute(name).is_some())
        .map_or_else(|| lookup(declared, name), |subtype| lookup(subtype, name))
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::attribute::Attribute;
    use rstest::rstest;
    use std::sync::Arc;

    fn person() -> Arc<Schema> {
        let location = Schema::builder("Location")
            .attribute(Attribute {
                name: "latitude".to_string(),
                wire_name: Some("lat".to_string()),
                attribute_type: AttributeType::Number,
                ..Default::default()
            })
            .build()
            .unwrap();
        let address = Schema::builder("Address")
            .attribute(Attribute::new("street", AttributeType::String))
            .attribute(Attribute::new("location", AttributeType::map(&location)))
            .build()
            .unwrap();
        let base = Schema::builder("Base")
            .attribute(Attribute {
                name: "home".to_string(),
                wire_name: Some("h".to_string()),
                attribute_type: AttributeType::map(&address),
                ..Default::default()
            })
            .build()
            .unwrap();
        Schema::builder("Person")
            .extends(&base)
            .attribute(Attribute::new("work", AttributeType::map(&address)))
            .attribute(Attribute::new("tags", AttributeType::list_of(AttributeType::String)))
            .attribute(Attribute::new("extra", AttributeType::raw_map()))
            .build()
            .unwrap()
    }

    #[rstest]
    #[case::top_level(&["work"], &["work"])]
    #[case::wire_name_override(&["home", "street"], &["h", "street"])]
    #[case::same_schema_other_parent(&["work", "street"], &["work", "street"])]
    #[case::nested_override(&["home", "location", "latitude"], &["h", "location", "lat"])]
    #[case::raw_map_child(&["extra", "anything"], &["extra", "anything"])]
    fn test_resolve_path(#[case] names: &[&str], #[case] expected: &[&str]) {
        assert_eq!(person().resolve_path(names).unwrap(), expected);
    }

    #[test]
    fn test_unknown_attribute() {
        let error = person().resolve_path(&["home", "city"]).unwrap_err();
        assert_eq!(error.to_string(), "schema 'Address' has no attribute 'city'");
    }

    #[test]
    fn test_subtype_attribute_through_polymorphic_slot() {
        let animal = Schema::builder("Animal")
            .attribute(Attribute::new("cls", AttributeType::Discriminator))
            .attribute(Attribute::new("name", AttributeType::String))
            .build()
            .unwrap();
        let cat = Schema::builder("Cat")
            .extends(&animal)
            .discriminator_value("cat")
            .attribute(Attribute {
                name: "lives".to_string(),
                wire_name: Some("l".to_string()),
                attribute_type: AttributeType::Number,
                ..Default::default()
            })
            .build()
            .unwrap();
        let registry = Discriminator::builder(&animal)
            .unwrap()
            .register(&cat)
            .unwrap()
            .build();
        let owner = Schema::builder("Owner")
            .attribute(Attribute::new(
                "pet",
                AttributeType::polymorphic(&registry, &animal),
            ))
            .build()
            .unwrap();
        assert_eq!(owner.resolve_path(&["pet", "name"]).unwrap(), ["pet", "name"]);
        assert_eq!(owner.resolve_path(&["pet", "lives"]).unwrap(), ["pet", "l"]);
        let error = owner.resolve_path(&["pet", "wings"]).unwrap_err();
        assert_eq!(error.to_string(), "schema 'Animal' has no attribute 'wings'");
    }

    #[test]
    fn test_index() {
        let path = person().path("tags").unwrap().index(3).unwrap();
        assert_eq!(path.to_string(), "tags[3]");
        assert!(matches!(path.attribute_type(), Some(AttributeType::String)));
        assert!(path.child("a").is_err());
    }

    #[test]
    fn test_index_not_a_list() {
        assert!(person().path("work").unwrap().index(0).is_err());
    }

    #[test]
    fn test_to_expression() {
        let path = person()
            .path("home")
            .unwrap()
            .child("location")
            .unwrap()
            .child("latitude")
            .unwrap();
        let (expression, names) = path.to_expression();
        assert_eq!(expression, "#h.#location.#lat");
        assert_eq!(
            names,
            collections::HashMap::from([
                ("#h".to_string(), "h".to_string()),
                ("#location".to_string(), "location".to_string()),
                ("#lat".to_string(), "lat".to_string()),
            ])
        );
        let (expression, _) = person().path("tags").unwrap().index(0).unwrap().to_expression();
        assert_eq!(expression, "#tags[0]");
    }
}
