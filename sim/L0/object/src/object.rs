//! The polymorphic object abstraction.
//!
//! Every model entity embeds an [`ObjectBase`] (type name, instance name,
//! notes and the owned [`PropertySet`]) and implements [`Object`]. The trait
//! supplies the polymorphic copy ([`Object::clone_object`]) that lets the
//! registry and nested object properties duplicate values whose concrete type
//! is only known at runtime.
//!
//! # Example
//!
//! ```
//! use sim_object::{GenericObject, Object, Property};
//!
//! let speed = GenericObject::new("Speed")
//!     .with_property(Property::double("default_value", 0.0))
//!     .and_then(|o| o.with_property(Property::int("index", 0)))
//!     .expect("unique names");
//!
//! let copy = speed.clone_object();
//! assert_eq!(copy.type_name(), "Speed");
//! assert!(copy.equals(&speed));
//! ```

use std::any::Any;
use std::fmt;

use crate::error::{ObjectError, Result};
use crate::property::Property;
use crate::set::PropertySet;

/// Identity fields and property storage shared by every object.
#[derive(Debug, Clone)]
pub struct ObjectBase {
    type_name: String,
    name: String,
    notes: String,
    properties: PropertySet,
}

impl ObjectBase {
    /// Create the base for a concrete type, stamping its type name.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            name: String::new(),
            notes: String::new(),
            properties: PropertySet::new(),
        }
    }

    /// Concrete type name.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Instance name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the instance name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Free-text notes.
    pub fn notes(&self) -> &str {
        &self.notes
    }

    /// Set the free-text notes.
    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.notes = notes.into();
    }

    /// Owned properties.
    pub fn properties(&self) -> &PropertySet {
        &self.properties
    }

    /// Owned properties, mutable.
    pub fn properties_mut(&mut self) -> &mut PropertySet {
        &mut self.properties
    }

    /// Declare a schema property; fails on a duplicate name.
    pub fn declare(&mut self, property: Property) -> Result<()> {
        self.properties.append(property)
    }

    /// Copy identity fields and properties from `other`; the type name is kept.
    pub fn assign_from(&mut self, other: &ObjectBase) {
        self.name.clone_from(&other.name);
        self.notes.clone_from(&other.notes);
        self.properties.clone_from(&other.properties);
    }
}

/// A polymorphic, serializable model entity.
///
/// Implementors provide access to their [`ObjectBase`] and a polymorphic copy;
/// identity, property access, equality and assignment come for free.
pub trait Object: fmt::Debug + Send + Sync + 'static {
    /// Shared identity and property storage.
    fn base(&self) -> &ObjectBase;

    /// Shared identity and property storage, mutable.
    fn base_mut(&mut self) -> &mut ObjectBase;

    /// Deep copy with the same concrete type as `self`.
    fn clone_object(&self) -> Box<dyn Object>;

    /// Upcast for downcasting to the concrete type.
    fn as_any(&self) -> &dyn Any;

    /// Mutable upcast for downcasting to the concrete type.
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Concrete type name, also used as the XML tag.
    fn type_name(&self) -> &str {
        self.base().type_name()
    }

    /// Instance name.
    fn name(&self) -> &str {
        self.base().name()
    }

    /// Set the instance name.
    fn set_name(&mut self, name: &str) {
        self.base_mut().set_name(name);
    }

    /// Free-text notes.
    fn notes(&self) -> &str {
        self.base().notes()
    }

    /// Set the free-text notes.
    fn set_notes(&mut self, notes: &str) {
        self.base_mut().set_notes(notes);
    }

    /// Owned properties.
    fn properties(&self) -> &PropertySet {
        self.base().properties()
    }

    /// Owned properties, mutable.
    fn properties_mut(&mut self) -> &mut PropertySet {
        self.base_mut().properties_mut()
    }

    /// Value equality: same concrete type and equal properties in order.
    ///
    /// Name and notes are metadata and do not participate.
    fn equals(&self, other: &dyn Object) -> bool {
        self.type_name() == other.type_name() && self.properties() == other.properties()
    }

    /// Assignment from another object of the same concrete type.
    ///
    /// Copies properties, name and notes. No setup hook is run.
    fn assign(&mut self, other: &dyn Object) -> Result<()> {
        if self.type_name() != other.type_name() {
            return Err(ObjectError::ObjectTypeMismatch {
                expected: self.type_name().to_string(),
                actual: other.type_name().to_string(),
            });
        }
        self.base_mut().assign_from(other.base());
        Ok(())
    }
}

impl Clone for Box<dyn Object> {
    fn clone(&self) -> Self {
        self.clone_object()
    }
}

impl PartialEq for dyn Object {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl dyn Object {
    /// Whether the concrete type is `T`.
    pub fn is<T: Object>(&self) -> bool {
        self.as_any().is::<T>()
    }

    /// Downcast to a concrete type.
    pub fn downcast_ref<T: Object>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    /// Downcast to a concrete type, mutable.
    pub fn downcast_mut<T: Object>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }
}

/// An object whose schema is supplied at construction rather than by a Rust type.
///
/// Registering a `GenericObject` prototype is enough to make a type name
/// loadable when no behavior beyond property storage is needed.
#[derive(Debug, Clone)]
pub struct GenericObject {
    base: ObjectBase,
}

impl GenericObject {
    /// Create an object of `type_name` with no properties.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            base: ObjectBase::new(type_name),
        }
    }

    /// Declare another property.
    pub fn with_property(mut self, property: Property) -> Result<Self> {
        self.base.declare(property)?;
        Ok(self)
    }
}

impl Object for GenericObject {
    fn base(&self) -> &ObjectBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ObjectBase {
        &mut self.base
    }

    fn clone_object(&self) -> Box<dyn Object> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;

    fn joint() -> GenericObject {
        GenericObject::new("Joint")
            .with_property(Property::double_array("range", vec![-1.0, 1.0]))
            .unwrap()
            .with_property(Property::bool("locked", false))
            .unwrap()
    }

    #[test]
    fn test_fresh_object_uses_defaults() {
        let j = joint();
        assert!(j.properties().iter().all(Property::is_use_default));
        assert_eq!(j.type_name(), "Joint");
        assert!(j.name().is_empty());
    }

    #[test]
    fn test_duplicate_declaration_fails() {
        let err = joint()
            .with_property(Property::int("locked", 1))
            .unwrap_err();
        assert!(matches!(err, ObjectError::DuplicateName(_)));
    }

    #[test]
    fn test_clone_object_keeps_concrete_type() {
        let j = joint();
        let boxed: Box<dyn Object> = Box::new(j);
        let copy = boxed.clone();
        assert!(copy.is::<GenericObject>());
        assert_eq!(copy.type_name(), "Joint");
        assert_eq!(&*copy, &*boxed);
    }

    #[test]
    fn test_clone_is_independent() {
        let original: Box<dyn Object> = Box::new(joint());
        let mut copy = original.clone();
        copy.properties_mut()
            .get_mut("locked")
            .unwrap()
            .set_bool(true)
            .unwrap();
        assert!(!original.properties().get("locked").unwrap().bool_value().unwrap());
        assert!(!copy.equals(&*original));
    }

    #[test]
    fn test_equality_excludes_name_and_notes() {
        let mut a = joint();
        let b = joint();
        a.set_name("knee");
        a.set_notes("left leg");
        assert!(a.equals(&b));

        let other = GenericObject::new("Body");
        assert!(!a.equals(&other));
    }

    #[test]
    fn test_assign_copies_values_and_identity() {
        let mut source = joint();
        source.set_name("hip");
        source
            .properties_mut()
            .get_mut("range")
            .unwrap()
            .set_double_array(vec![0.0, 2.0])
            .unwrap();

        let mut target = joint();
        target.assign(&source).unwrap();
        assert_eq!(target.name(), "hip");
        assert_eq!(
            target.properties().get("range").unwrap().double_array_value().unwrap(),
            &[0.0, 2.0]
        );
        assert_eq!(target.type_name(), "Joint");
    }

    #[test]
    fn test_assign_rejects_other_type() {
        let mut target = joint();
        let err = target.assign(&GenericObject::new("Body")).unwrap_err();
        assert!(matches!(err, ObjectError::ObjectTypeMismatch { .. }));
    }

    #[test]
    fn test_downcast() {
        let mut boxed: Box<dyn Object> = Box::new(joint());
        assert!(boxed.downcast_ref::<GenericObject>().is_some());
        boxed
            .downcast_mut::<GenericObject>()
            .unwrap()
            .set_name("ankle");
        assert_eq!(boxed.name(), "ankle");
    }
}
