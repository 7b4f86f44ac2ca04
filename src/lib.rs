#![deny(missing_docs)]
#![deny(warnings)]

//! # DynamoDB Model
//!
//! Typed attributes, schemas and item (de)serialization for Amazon DynamoDB.
//!
//! ## Overview
//!
//! This library converts between native records and the `AttributeValue`
//! envelopes DynamoDB reads and writes:
//! - Schemas are declared once through a builder, validated, and shared immutably
//! - Nested maps, lists and sets are encoded recursively, with empty sets omitted
//! - Polymorphic records are resolved through a discriminator registry
//! - Legacy boolean and binary encodings stay readable next to the modern ones
//! - Nested attributes are addressed by paths honoring wire name overrides
//!
//! ## Quick Example
//!
//! ```rust
//! use aws_sdk_dynamodb::types::AttributeValue;
//! use dynamodb_model::{
//!     attribute::{Attribute, AttributeType},
//!     model::Model,
//!     schema::{Record, Schema},
//!     value::Value,
//! };
//!
//! # fn example() -> Result<(), dynamodb_model::error::Error> {
//! let address = Schema::builder("Address")
//!     .attribute(Attribute::new("street", AttributeType::String))
//!     .build()?;
//! let user = Schema::builder("User")
//!     .attribute(Attribute {
//!         name: "id".to_string(),
//!         hash_key: true,
//!         ..Default::default()
//!     })
//!     .attribute(Attribute::new("tags", AttributeType::StringSet))
//!     .attribute(Attribute {
//!         name: "home".to_string(),
//!         wire_name: Some("h".to_string()),
//!         attribute_type: AttributeType::map(&address),
//!         nullable: true,
//!         ..Default::default()
//!     })
//!     .build()?;
//!
//! let home = Record::new(&address).with("street", "Main")?;
//! let record = Record::new(&user)
//!     .with("id", "1")?
//!     .with("tags", Value::set(["b", "a"].map(Value::from))?)?
//!     .with("home", home)?;
//!
//! let model = Model::new(&user);
//! let item = model.serialize(&record, true)?;
//! assert_eq!(
//!     item["tags"],
//!     AttributeValue::Ss(vec!["a".to_string(), "b".to_string()])
//! );
//! assert_eq!(model.deserialize(item)?, record);
//! assert_eq!(user.resolve_path(&["home", "street"])?, ["h", "street"]);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! ## Modules
//!
//! - [`mod@attribute`] - Attribute descriptors and declared types
//! - [`mod@codec`] - Per-attribute encoding and decoding
//! - [`mod@discriminator`] - Subtype registries
//! - [`mod@model`] - Whole-item conversion, keys and JSON renderings
//! - [`mod@path`] - Addressing of nested attributes
//! - [`mod@schema`] - Schemas and records

pub mod attribute;

pub mod codec;

pub mod discriminator;

/// Crate error type.
pub mod error;

/// Wire tags.
pub mod kind;

pub mod model;

pub mod path;

pub mod schema;

mod simple;

pub mod value;
