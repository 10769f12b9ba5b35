//! Typed property sets, polymorphic objects and XML persistence for model entities.
//!
//! Every simulatable entity of a musculoskeletal model (bodies, joints, speeds,
//! muscles, bones) is a bag of named, typed [`Property`] values owned by an
//! [`Object`]. Objects are copied polymorphically, compared by value and
//! persisted to and from XML, with the concrete type of each element resolved
//! at load time through a [`TypeRegistry`].
//!
//! # Features
//!
//! - Closed set of value kinds: bool, int, double, string, object, and an array of each
//! - Default-vs-explicit tracking: every property knows whether it still holds
//!   its built-in default
//! - Ordered, name-unique [`PropertySet`] with non-owning [`PropertyGroup`]s
//! - Runtime [`TypeRegistry`] with a two-phase (register, then freeze) lifecycle
//! - XML serialization tolerant of undeclared attributes and elements
//! - Model documents with a version marker ([`Document`])
//!
//! # Layer 0
//!
//! This is a Layer 0 crate with **zero Bevy dependencies**. It can be used in:
//!
//! - Model file converters and validators
//! - Headless simulation setup
//! - Analysis tools
//!
//! # Example
//!
//! ```
//! use sim_object::{GenericObject, Object, Property, TypeRegistry, deserialize_object};
//!
//! let mut registry = TypeRegistry::new();
//! registry
//!     .register(Box::new(
//!         GenericObject::new("Speed")
//!             .with_property(Property::double("default_value", 0.0))?
//!             .with_property(Property::int("index", 0))?
//!             .with_property(Property::string("coordinate", ""))?,
//!     ))?;
//! registry.freeze();
//!
//! let xml = r#"<Speed index="2" coordinate="knee_angle">
//!     <default_value>1.5</default_value>
//! </Speed>"#;
//!
//! let speed = deserialize_object(xml, &registry)?;
//! assert_eq!(speed.type_name(), "Speed");
//! assert_eq!(speed.properties().get("index")?.int_value()?, 2);
//! assert!(!speed.properties().get("coordinate")?.is_use_default());
//! # Ok::<(), sim_object::ObjectError>(())
//! ```
//!
//! # XML Format
//!
//! - Each object is one element tagged with its type name
//! - `name="..."` carries the instance name, `<notes>` its free-text notes
//! - Scalar properties are written as attributes and read from either an
//!   attribute or a child element of the same name; a property named `name`
//!   is always an element and one named `notes` always an attribute
//! - Array properties are child elements holding whitespace/comma separated text
//! - Object properties are child elements holding nested object elements
//! - Properties absent from the document keep their built-in default

#![doc(html_root_url = "https://docs.rs/sim-object/0.7.0")]
#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![allow(
    clippy::missing_const_for_fn,
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::redundant_closure_for_method_calls,
    clippy::should_implement_trait,
    clippy::needless_pass_by_value,
    clippy::doc_markdown,
    clippy::return_self_not_must_use,
    clippy::use_self
)]

mod config;
mod document;
mod error;
mod group;
mod object;
mod object_set;
mod parser;
mod property;
mod registry;
mod set;
mod writer;

pub use config::XmlConfig;
pub use document::{
    DOCUMENT_TAG, DOCUMENT_VERSION, Document, NAME_ATTRIBUTE, NOTES_ELEMENT, VERSION_ATTRIBUTE,
    load_document,
};
pub use error::{ObjectError, Result, XmlLocation};
pub use group::PropertyGroup;
pub use object::{GenericObject, Object, ObjectBase};
pub use object_set::{OBJECTS_PROPERTY, ObjectSet, SET_TYPE};
pub use parser::deserialize_object;
pub use property::{Property, PropertyKind, PropertyValue, format_double};
pub use registry::{
    TypeRegistry, create_instance, freeze_registry, global_registry, register_type, with_registry,
};
pub use set::PropertySet;
pub use writer::{serialize_object, write_object};
