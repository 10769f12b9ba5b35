//! A named collection of objects persisted as one object.
//!
//! Model files group entities such as bones, bodies or muscles into set
//! objects (`BoneSet`, `BodySet`, ...). Each is an [`ObjectSet`] stamped with
//! its own type name, storing members in the `objects` object-array property.

use std::any::Any;

use crate::error::{ObjectError, Result};
use crate::object::{Object, ObjectBase};
use crate::property::Property;

/// Name of the object-array property holding the members.
pub const OBJECTS_PROPERTY: &str = "objects";

/// Default type name of an unspecialized set.
pub const SET_TYPE: &str = "Set";

/// An ordered collection of polymorphic objects.
#[derive(Debug, Clone)]
pub struct ObjectSet {
    base: ObjectBase,
}

impl Default for ObjectSet {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectSet {
    /// Create an empty set of type `Set`.
    #[must_use]
    pub fn new() -> Self {
        Self::with_type(SET_TYPE)
    }

    /// Create an empty set stamped with `type_name` (e.g. `BoneSet`).
    pub fn with_type(type_name: impl Into<String>) -> Self {
        let mut base = ObjectBase::new(type_name);
        base.properties_mut()
            .push_declared(Property::object_array(OBJECTS_PROPERTY, Vec::new()));
        Self { base }
    }

    fn members(&self) -> Result<&[Box<dyn Object>]> {
        self.base
            .properties()
            .get(OBJECTS_PROPERTY)?
            .object_array_value()
    }

    fn members_property_mut(&mut self) -> Result<&mut Property> {
        self.base.properties_mut().get_mut(OBJECTS_PROPERTY)
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.members().map_or(0, <[_]>::len)
    }

    /// Whether the set has no members.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Member at `index`.
    pub fn get(&self, index: usize) -> Result<&dyn Object> {
        self.base
            .properties()
            .get(OBJECTS_PROPERTY)?
            .object_at(index)
    }

    /// Member at `index`, mutable.
    pub fn get_mut(&mut self, index: usize) -> Result<&mut dyn Object> {
        self.members_property_mut()?.object_at_mut(index)
    }

    /// Position of the first member named `name`.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.members().ok()?.iter().position(|o| o.name() == name)
    }

    /// First member named `name`.
    pub fn get_by_name(&self, name: &str) -> Result<&dyn Object> {
        let index = self
            .index_of(name)
            .ok_or_else(|| ObjectError::object_not_found(name))?;
        self.get(index)
    }

    /// Append a member.
    pub fn append(&mut self, object: Box<dyn Object>) -> Result<()> {
        self.members_property_mut()?.push_object(object)
    }

    /// Remove and return the member at `index`.
    pub fn remove(&mut self, index: usize) -> Result<Box<dyn Object>> {
        self.members_property_mut()?.remove_object_at(index)
    }

    /// Member names in order.
    pub fn names(&self) -> Vec<&str> {
        self.iter().map(|o| o.name()).collect()
    }

    /// Iterate members in order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Object> {
        self.members()
            .unwrap_or_default()
            .iter()
            .map(|o| &**o)
    }
}

impl Object for ObjectSet {
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
