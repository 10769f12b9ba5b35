//! Presentation groups over properties of a [`PropertySet`](crate::PropertySet).
//!
//! A group never owns properties. It records positions in the owning set's
//! property sequence, so a deep copy of the set carries groups that already
//! point at the copied properties. The set keeps the positions valid when
//! properties are removed.

/// A named, ordered list of non-owning property references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyGroup {
    name: String,
    members: Vec<usize>,
}

impl PropertyGroup {
    /// Create an empty group.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: Vec::new(),
        }
    }

    /// Group name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of referenced properties.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the group references nothing.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Referenced property positions, in insertion order.
    pub fn indices(&self) -> &[usize] {
        &self.members
    }

    /// Add a property position. Returns `false` if it was already present.
    pub(crate) fn add_property(&mut self, index: usize) -> bool {
        if self.members.contains(&index) {
            return false;
        }
        self.members.push(index);
        true
    }

    /// Whether the group references the property at `index`.
    pub fn contains(&self, index: usize) -> bool {
        self.members.contains(&index)
    }

    /// Drop the reference to the property at `index`, if any.
    pub(crate) fn remove_property(&mut self, index: usize) -> bool {
        let before = self.members.len();
        self.members.retain(|&i| i != index);
        self.members.len() != before
    }

    /// Purge `removed` and shift later positions down by one.
    pub(crate) fn purge(&mut self, removed: usize) {
        self.members.retain(|&i| i != removed);
        for i in &mut self.members {
            if *i > removed {
                *i -= 1;
            }
        }
    }

    /// Names of the referenced properties, resolved against `set`.
    pub fn property_names<'a>(&self, set: &'a crate::PropertySet) -> Vec<&'a str> {
        self.members
            .iter()
            .filter_map(|&i| set.get_index(i).ok())
            .map(crate::Property::name)
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_add_rejects_duplicates() {
        let mut group = PropertyGroup::new("kinematics");
        assert!(group.add_property(1));
        assert!(!group.add_property(1));
        assert_eq!(group.len(), 1);
        assert!(group.contains(1));
    }

    #[test]
    fn test_purge_shifts_positions() {
        let mut group = PropertyGroup::new("display");
        group.add_property(0);
        group.add_property(2);
        group.add_property(3);

        group.purge(2);
        assert_eq!(group.indices(), &[0, 2]);

        group.purge(0);
        assert_eq!(group.indices(), &[1]);
    }

    #[test]
    fn test_remove_property() {
        let mut group = PropertyGroup::new("display");
        group.add_property(4);
        assert!(group.remove_property(4));
        assert!(!group.remove_property(4));
        assert!(group.is_empty());
    }
}
