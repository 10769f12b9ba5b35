//! Concrete model types shared by the integration tests.

#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use std::any::Any;

use sim_object::{Object, ObjectBase, ObjectSet, Property, TypeRegistry};

/// A generalized speed bound to one coordinate.
#[derive(Debug, Clone)]
pub struct Speed {
    base: ObjectBase,
}

impl Speed {
    pub fn new() -> Self {
        let mut base = ObjectBase::new("Speed");
        base.declare(Property::double("default_value", 0.0)).unwrap();
        base.declare(Property::int("index", 0)).unwrap();
        base.declare(Property::string("coordinate", "")).unwrap();
        Self { base }
    }

    pub fn default_value(&self) -> f64 {
        self.properties()
            .get("default_value")
            .unwrap()
            .double_value()
            .unwrap()
    }

    pub fn index(&self) -> i32 {
        self.properties().get("index").unwrap().int_value().unwrap()
    }

    pub fn coordinate(&self) -> &str {
        self.properties()
            .get("coordinate")
            .unwrap()
            .string_value()
            .unwrap()
    }
}

impl Object for Speed {
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

/// A rigid bone segment.
#[derive(Debug, Clone)]
pub struct Bone {
    base: ObjectBase,
}

impl Bone {
    pub fn new() -> Self {
        let mut base = ObjectBase::new("Bone");
        base.declare(Property::double("mass", 1.0).with_comment("Mass in kg"))
            .unwrap();
        base.declare(Property::double_array("mass_center", vec![0.0; 3]))
            .unwrap();
        base.declare(Property::bool("locked", false)).unwrap();
        base.declare(Property::string_array("geometry", Vec::new()))
            .unwrap();
        Self { base }
    }

    pub fn named(name: &str) -> Self {
        let mut bone = Self::new();
        bone.set_name(name);
        bone
    }
}

impl Object for Bone {
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

pub fn bone_set() -> ObjectSet {
    ObjectSet::with_type("BoneSet")
}

/// Registry holding `Speed`, `Bone` and `BoneSet`, frozen.
pub fn registry() -> TypeRegistry {
    let mut registry = TypeRegistry::new();
    registry.register(Box::new(Speed::new())).unwrap();
    registry.register(Box::new(Bone::new())).unwrap();
    registry.register(Box::new(bone_set())).unwrap();
    registry.freeze();
    registry
}
