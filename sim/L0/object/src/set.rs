//! The ordered property collection owned by one object.

use std::fmt;

use crate::error::{ObjectError, Result};
use crate::group::PropertyGroup;
use crate::property::Property;

/// Ordered, name-unique properties plus their display groups.
///
/// Declaration order is insertion order and is preserved through cloning and
/// through XML serialization. `Clone` is a deep copy: groups store positions,
/// so the cloned groups refer to the cloned properties.
#[derive(Debug, Clone, Default)]
pub struct PropertySet {
    properties: Vec<Property>,
    groups: Vec<PropertyGroup>,
}

impl PropertySet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of properties.
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Whether the set has no properties.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Iterate properties in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Property> {
        self.properties.iter()
    }

    /// Iterate properties mutably in declaration order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Property> {
        self.properties.iter_mut()
    }

    /// Position of the property named `name`.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.properties.iter().position(|p| p.name() == name)
    }

    /// Non-failing lookup by name.
    pub fn contains(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name() == name)
    }

    /// Non-failing mutable lookup by name.
    pub fn contains_mut(&mut self, name: &str) -> Option<&mut Property> {
        self.properties.iter_mut().find(|p| p.name() == name)
    }

    /// Look up a property by name.
    pub fn get(&self, name: &str) -> Result<&Property> {
        self.contains(name)
            .ok_or_else(|| ObjectError::property_not_found(name))
    }

    /// Look up a property by name for mutation.
    pub fn get_mut(&mut self, name: &str) -> Result<&mut Property> {
        self.contains_mut(name)
            .ok_or_else(|| ObjectError::property_not_found(name))
    }

    /// Look up a property by position.
    pub fn get_index(&self, index: usize) -> Result<&Property> {
        self.properties
            .get(index)
            .ok_or_else(|| ObjectError::index_out_of_range(index, self.len(), "property set"))
    }

    /// Look up a property by position for mutation.
    pub fn get_index_mut(&mut self, index: usize) -> Result<&mut Property> {
        let len = self.properties.len();
        self.properties
            .get_mut(index)
            .ok_or_else(|| ObjectError::index_out_of_range(index, len, "property set"))
    }

    /// Append a property at the end.
    pub fn append(&mut self, property: Property) -> Result<()> {
        if self.index_of(property.name()).is_some() {
            return Err(ObjectError::DuplicateName(property.name().to_string()));
        }
        self.properties.push(property);
        Ok(())
    }

    /// Append a schema property whose name is known to be unique.
    pub(crate) fn push_declared(&mut self, property: Property) {
        debug_assert!(self.index_of(property.name()).is_none());
        self.properties.push(property);
    }

    /// Append a property under a different name.
    pub fn append_as(&mut self, mut property: Property, name: impl Into<String>) -> Result<()> {
        property.rename(name);
        self.append(property)
    }

    /// Remove a property and purge it from every group.
    pub fn remove(&mut self, name: &str) -> Result<Property> {
        let index = self
            .index_of(name)
            .ok_or_else(|| ObjectError::property_not_found(name))?;
        for group in &mut self.groups {
            group.purge(index);
        }
        Ok(self.properties.remove(index))
    }

    /// Remove every property and group.
    pub fn clear(&mut self) {
        self.properties.clear();
        self.groups.clear();
    }

    /// All groups, in creation order.
    pub fn groups(&self) -> &[PropertyGroup] {
        &self.groups
    }

    /// Group named `name`, if it exists.
    pub fn group(&self, name: &str) -> Option<&PropertyGroup> {
        self.groups.iter().find(|g| g.name() == name)
    }

    /// Get or create the group named `name`.
    ///
    /// Membership only changes through the set, which checks positions.
    pub fn add_group(&mut self, name: &str) -> &PropertyGroup {
        self.group_entry(name)
    }

    fn group_entry(&mut self, name: &str) -> &mut PropertyGroup {
        let index = match self.groups.iter().position(|g| g.name() == name) {
            Some(index) => index,
            None => {
                self.groups.push(PropertyGroup::new(name));
                self.groups.len() - 1
            }
        };
        &mut self.groups[index]
    }

    /// Add the property named `property` to `group`, creating the group on first use.
    pub fn add_property_to_group(&mut self, group: &str, property: &str) -> Result<()> {
        let index = self
            .index_of(property)
            .ok_or_else(|| ObjectError::property_not_found(property))?;
        self.group_entry(group).add_property(index);
        Ok(())
    }

    /// Add the property at position `index` to `group`, creating the group on first use.
    pub fn add_index_to_group(&mut self, group: &str, index: usize) -> Result<()> {
        if index >= self.properties.len() {
            return Err(ObjectError::index_out_of_range(
                index,
                self.properties.len(),
                "property set",
            ));
        }
        self.group_entry(group).add_property(index);
        Ok(())
    }

    /// Drop the property named `property` from `group`. The property itself stays.
    ///
    /// Returns `false` if the group did not reference it.
    pub fn remove_property_from_group(&mut self, group: &str, property: &str) -> Result<bool> {
        let index = self
            .index_of(property)
            .ok_or_else(|| ObjectError::property_not_found(property))?;
        let entry = self
            .groups
            .iter_mut()
            .find(|g| g.name() == group)
            .ok_or_else(|| ObjectError::group_not_found(group))?;
        Ok(entry.remove_property(index))
    }

    /// First group referencing the property named `property`.
    pub fn group_containing(&self, property: &str) -> Option<&PropertyGroup> {
        self.group_index_containing(property)
            .map(|i| &self.groups[i])
    }

    /// Position of the first group referencing the property named `property`.
    pub fn group_index_containing(&self, property: &str) -> Option<usize> {
        let index = self.index_of(property)?;
        self.groups.iter().position(|g| g.contains(index))
    }

    /// Names of the properties in `group`.
    pub fn group_property_names(&self, group: &str) -> Result<Vec<&str>> {
        self.group(group)
            .map(|g| g.property_names(self))
            .ok_or_else(|| ObjectError::group_not_found(group))
    }
}

/// Value equality over properties in order; groups are presentation only.
impl PartialEq for PropertySet {
    fn eq(&self, other: &Self) -> bool {
        self.properties == other.properties
    }
}

impl fmt::Display for PropertySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Property Set:")?;
        for property in &self.properties {
            writeln!(f, "{property}")?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a PropertySet {
    type Item = &'a Property;
    type IntoIter = std::slice::Iter<'a, Property>;

    fn into_iter(self) -> Self::IntoIter {
        self.properties.iter()
    }
}
