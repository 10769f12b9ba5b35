//! Typed, named property values.
//!
//! A [`Property`] is the atomic unit of persisted state. Its [`PropertyKind`]
//! is fixed at construction; only values of that kind may be stored in it, and
//! every typed accessor checks the kind before touching the value.
//!
//! Every constructor leaves the property flagged as holding its built-in
//! default (`is_use_default() == true`). Any successful typed setter, text
//! parse or resize clears the flag.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{ObjectError, Result};
use crate::object::Object;

/// The closed set of value kinds a property can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PropertyKind {
    /// Single boolean.
    Bool,
    /// Single 32-bit integer.
    Int,
    /// Single double.
    Dbl,
    /// Single string.
    Str,
    /// Single nested object.
    Obj,
    /// Ordered booleans.
    BoolArray,
    /// Ordered integers.
    IntArray,
    /// Ordered doubles.
    DblArray,
    /// Ordered strings.
    StrArray,
    /// Ordered nested objects.
    ObjArray,
}

impl PropertyKind {
    /// Whether this is one of the array kinds.
    #[must_use]
    pub fn is_array(self) -> bool {
        matches!(
            self,
            Self::BoolArray | Self::IntArray | Self::DblArray | Self::StrArray | Self::ObjArray
        )
    }

    /// Whether values of this kind are nested objects.
    #[must_use]
    pub fn is_object(self) -> bool {
        matches!(self, Self::Obj | Self::ObjArray)
    }

    /// The array kind with the same element type.
    #[must_use]
    pub fn as_array(self) -> Self {
        match self {
            Self::Bool => Self::BoolArray,
            Self::Int => Self::IntArray,
            Self::Dbl => Self::DblArray,
            Self::Str => Self::StrArray,
            Self::Obj => Self::ObjArray,
            array => array,
        }
    }

    /// Human-readable kind name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Dbl => "double",
            Self::Str => "string",
            Self::Obj => "object",
            Self::BoolArray => "bool array",
            Self::IntArray => "int array",
            Self::DblArray => "double array",
            Self::StrArray => "string array",
            Self::ObjArray => "object array",
        }
    }
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value of one [`PropertyKind`].
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i32),
    /// Double value.
    Dbl(f64),
    /// String value.
    Str(String),
    /// Nested object.
    Obj(Box<dyn Object>),
    /// Boolean array.
    BoolArray(Vec<bool>),
    /// Integer array.
    IntArray(Vec<i32>),
    /// Double array.
    DblArray(Vec<f64>),
    /// String array.
    StrArray(Vec<String>),
    /// Object array.
    ObjArray(Vec<Box<dyn Object>>),
}

impl PropertyValue {
    /// The kind tag of this value.
    #[must_use]
    pub fn kind(&self) -> PropertyKind {
        match self {
            Self::Bool(_) => PropertyKind::Bool,
            Self::Int(_) => PropertyKind::Int,
            Self::Dbl(_) => PropertyKind::Dbl,
            Self::Str(_) => PropertyKind::Str,
            Self::Obj(_) => PropertyKind::Obj,
            Self::BoolArray(_) => PropertyKind::BoolArray,
            Self::IntArray(_) => PropertyKind::IntArray,
            Self::DblArray(_) => PropertyKind::DblArray,
            Self::StrArray(_) => PropertyKind::StrArray,
            Self::ObjArray(_) => PropertyKind::ObjArray,
        }
    }
}

/// Format a double in the shortest form that parses back to the same bits.
///
/// Always uses `.` as the decimal point and never inserts grouping separators.
#[must_use]
pub fn format_double(value: f64) -> String {
    format!("{value:?}")
}

/// Parse a boolean token (`true`/`false`/`1`/`0`, case-insensitive).
fn parse_bool(token: &str) -> Option<bool> {
    if token.eq_ignore_ascii_case("true") || token == "1" {
        Some(true)
    } else if token.eq_ignore_ascii_case("false") || token == "0" {
        Some(false)
    } else {
        None
    }
}

/// Split array text on whitespace and commas.
fn array_tokens(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
}

fn parse_tokens<T>(text: &str, parse: impl Fn(&str) -> Option<T>) -> Option<Vec<T>> {
    array_tokens(text).map(parse).collect()
}

fn join<T>(values: &[T], render: impl Fn(&T) -> String) -> String {
    values.iter().map(render).collect::<Vec<_>>().join(" ")
}

/// A single named, typed value.
#[derive(Debug, Clone)]
pub struct Property {
    name: String,
    comment: String,
    use_default: bool,
    value: PropertyValue,
}

/// Generates the getter and setter pair for a `Copy` scalar kind.
macro_rules! scalar_accessors {
    ($variant:ident, $ty:ty, $get:ident, $set:ident) => {
        #[doc = concat!("Get the value of a `", stringify!($variant), "` property.")]
        pub fn $get(&self) -> Result<$ty> {
            match self.value {
                PropertyValue::$variant(v) => Ok(v),
                _ => Err(self.mismatch(PropertyKind::$variant)),
            }
        }

        #[doc = concat!("Set the value of a `", stringify!($variant), "` property.")]
        pub fn $set(&mut self, value: $ty) -> Result<()> {
            self.expect_kind(PropertyKind::$variant)?;
            self.value = PropertyValue::$variant(value);
            self.use_default = false;
            Ok(())
        }
    };
}

/// Generates whole-array and per-element accessors for a `Copy` array kind.
macro_rules! array_accessors {
    ($variant:ident, $ty:ty, $get:ident, $set:ident, $get_at:ident, $set_at:ident) => {
        #[doc = concat!("Get the elements of a `", stringify!($variant), "` property.")]
        pub fn $get(&self) -> Result<&[$ty]> {
            match &self.value {
                PropertyValue::$variant(v) => Ok(v.as_slice()),
                _ => Err(self.mismatch(PropertyKind::$variant)),
            }
        }

        #[doc = concat!("Replace the elements of a `", stringify!($variant), "` property.")]
        pub fn $set(&mut self, values: Vec<$ty>) -> Result<()> {
            self.expect_kind(PropertyKind::$variant)?;
            self.value = PropertyValue::$variant(values);
            self.use_default = false;
            Ok(())
        }

        #[doc = concat!("Get one element of a `", stringify!($variant), "` property.")]
        pub fn $get_at(&self, index: usize) -> Result<$ty> {
            let values = self.$get()?;
            values
                .get(index)
                .copied()
                .ok_or_else(|| ObjectError::index_out_of_range(index, values.len(), &self.name))
        }

        #[doc = concat!("Set one element of a `", stringify!($variant), "` property.")]
        pub fn $set_at(&mut self, index: usize, value: $ty) -> Result<()> {
            self.expect_kind(PropertyKind::$variant)?;
            if let PropertyValue::$variant(values) = &mut self.value {
                let len = values.len();
                let slot = values
                    .get_mut(index)
                    .ok_or_else(|| ObjectError::index_out_of_range(index, len, &self.name))?;
                *slot = value;
            }
            self.use_default = false;
            Ok(())
        }
    };
}

impl Property {
    /// Create a property holding `value` as its built-in default.
    pub fn new(name: impl Into<String>, value: PropertyValue) -> Self {
        Self {
            name: name.into(),
            comment: String::new(),
            use_default: true,
            value,
        }
    }

    /// Boolean property.
    pub fn bool(name: impl Into<String>, value: bool) -> Self {
        Self::new(name, PropertyValue::Bool(value))
    }

    /// Integer property.
    pub fn int(name: impl Into<String>, value: i32) -> Self {
        Self::new(name, PropertyValue::Int(value))
    }

    /// Double property.
    pub fn double(name: impl Into<String>, value: f64) -> Self {
        Self::new(name, PropertyValue::Dbl(value))
    }

    /// String property.
    pub fn string(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, PropertyValue::Str(value.into()))
    }

    /// Nested object property; `value` is the built-in default object.
    pub fn object(name: impl Into<String>, value: Box<dyn Object>) -> Self {
        Self::new(name, PropertyValue::Obj(value))
    }

    /// Boolean array property.
    pub fn bool_array(name: impl Into<String>, values: Vec<bool>) -> Self {
        Self::new(name, PropertyValue::BoolArray(values))
    }

    /// Integer array property.
    pub fn int_array(name: impl Into<String>, values: Vec<i32>) -> Self {
        Self::new(name, PropertyValue::IntArray(values))
    }

    /// Double array property.
    pub fn double_array(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self::new(name, PropertyValue::DblArray(values))
    }

    /// String array property.
    pub fn string_array(name: impl Into<String>, values: Vec<String>) -> Self {
        Self::new(name, PropertyValue::StrArray(values))
    }

    /// Object array property.
    pub fn object_array(name: impl Into<String>, values: Vec<Box<dyn Object>>) -> Self {
        Self::new(name, PropertyValue::ObjArray(values))
    }

    /// Attach a documentation comment.
    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    /// Property name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Documentation comment (may be empty).
    pub fn comment(&self) -> &str {
        &self.comment
    }

    /// Replace the documentation comment.
    pub fn set_comment(&mut self, comment: impl Into<String>) {
        self.comment = comment.into();
    }

    /// Kind tag, fixed at construction.
    pub fn kind(&self) -> PropertyKind {
        self.value.kind()
    }

    /// Whether the property holds an array kind.
    pub fn is_array(&self) -> bool {
        self.kind().is_array()
    }

    /// Read-only view of the stored value.
    pub fn value(&self) -> &PropertyValue {
        &self.value
    }

    /// True while the value is the built-in default.
    pub fn is_use_default(&self) -> bool {
        self.use_default
    }

    /// Override the default-tracking flag.
    pub fn set_use_default(&mut self, use_default: bool) {
        self.use_default = use_default;
    }

    fn mismatch(&self, expected: PropertyKind) -> ObjectError {
        ObjectError::type_mismatch(&self.name, expected, self.kind())
    }

    fn expect_kind(&self, expected: PropertyKind) -> Result<()> {
        if self.kind() == expected {
            Ok(())
        } else {
            Err(self.mismatch(expected))
        }
    }

    scalar_accessors!(Bool, bool, bool_value, set_bool);
    scalar_accessors!(Int, i32, int_value, set_int);
    scalar_accessors!(Dbl, f64, double_value, set_double);

    array_accessors!(BoolArray, bool, bool_array_value, set_bool_array, bool_at, set_bool_at);
    array_accessors!(IntArray, i32, int_array_value, set_int_array, int_at, set_int_at);
    array_accessors!(DblArray, f64, double_array_value, set_double_array, double_at, set_double_at);

    /// Get the value of a `Str` property.
    pub fn string_value(&self) -> Result<&str> {
        match &self.value {
            PropertyValue::Str(s) => Ok(s.as_str()),
            _ => Err(self.mismatch(PropertyKind::Str)),
        }
    }

    /// Set the value of a `Str` property.
    pub fn set_string(&mut self, value: impl Into<String>) -> Result<()> {
        self.expect_kind(PropertyKind::Str)?;
        self.value = PropertyValue::Str(value.into());
        self.use_default = false;
        Ok(())
    }

    /// Get the elements of a `StrArray` property.
    pub fn string_array_value(&self) -> Result<&[String]> {
        match &self.value {
            PropertyValue::StrArray(v) => Ok(v.as_slice()),
            _ => Err(self.mismatch(PropertyKind::StrArray)),
        }
    }

    /// Replace the elements of a `StrArray` property.
    ///
    /// XML stores the elements as one whitespace separated list, so elements
    /// that are empty or contain whitespace or commas are rejected when the
    /// owning object is serialized.
    pub fn set_string_array(&mut self, values: Vec<String>) -> Result<()> {
        self.expect_kind(PropertyKind::StrArray)?;
        self.value = PropertyValue::StrArray(values);
        self.use_default = false;
        Ok(())
    }

    /// Get one element of a `StrArray` property.
    pub fn string_at(&self, index: usize) -> Result<&str> {
        let values = self.string_array_value()?;
        values
            .get(index)
            .map(String::as_str)
            .ok_or_else(|| ObjectError::index_out_of_range(index, values.len(), &self.name))
    }

    /// Set one element of a `StrArray` property.
    pub fn set_string_at(&mut self, index: usize, value: impl Into<String>) -> Result<()> {
        self.expect_kind(PropertyKind::StrArray)?;
        if let PropertyValue::StrArray(values) = &mut self.value {
            let len = values.len();
            let slot = values
                .get_mut(index)
                .ok_or_else(|| ObjectError::index_out_of_range(index, len, &self.name))?;
            *slot = value.into();
        }
        self.use_default = false;
        Ok(())
    }

    /// Get the nested object of an `Obj` property.
    pub fn object_value(&self) -> Result<&dyn Object> {
        match &self.value {
            PropertyValue::Obj(obj) => Ok(&**obj),
            _ => Err(self.mismatch(PropertyKind::Obj)),
        }
    }

    /// Mutable access to the nested object of an `Obj` property.
    ///
    /// Does not touch the default flag.
    pub fn object_value_mut(&mut self) -> Result<&mut dyn Object> {
        let name = &self.name;
        match &mut self.value {
            PropertyValue::Obj(obj) => Ok(&mut **obj),
            other => Err(ObjectError::type_mismatch(name, PropertyKind::Obj, other.kind())),
        }
    }

    /// Replace the nested object of an `Obj` property.
    pub fn set_object(&mut self, value: Box<dyn Object>) -> Result<()> {
        self.expect_kind(PropertyKind::Obj)?;
        self.value = PropertyValue::Obj(value);
        self.use_default = false;
        Ok(())
    }

    /// Get the elements of an `ObjArray` property.
    pub fn object_array_value(&self) -> Result<&[Box<dyn Object>]> {
        match &self.value {
            PropertyValue::ObjArray(v) => Ok(v.as_slice()),
            _ => Err(self.mismatch(PropertyKind::ObjArray)),
        }
    }

    /// Replace the elements of an `ObjArray` property.
    pub fn set_object_array(&mut self, values: Vec<Box<dyn Object>>) -> Result<()> {
        self.expect_kind(PropertyKind::ObjArray)?;
        self.value = PropertyValue::ObjArray(values);
        self.use_default = false;
        Ok(())
    }

    /// Get one element of an `ObjArray` property.
    pub fn object_at(&self, index: usize) -> Result<&dyn Object> {
        let values = self.object_array_value()?;
        values
            .get(index)
            .map(|obj| &**obj)
            .ok_or_else(|| ObjectError::index_out_of_range(index, values.len(), &self.name))
    }

    /// Mutable access to one element of an `ObjArray` property.
    pub fn object_at_mut(&mut self, index: usize) -> Result<&mut dyn Object> {
        let name = &self.name;
        match &mut self.value {
            PropertyValue::ObjArray(values) => {
                let len = values.len();
                values
                    .get_mut(index)
                    .map(|obj| &mut **obj)
                    .ok_or_else(|| ObjectError::index_out_of_range(index, len, name))
            }
            other => Err(ObjectError::type_mismatch(
                name,
                PropertyKind::ObjArray,
                other.kind(),
            )),
        }
    }

    /// Replace one element of an `ObjArray` property.
    pub fn set_object_at(&mut self, index: usize, value: Box<dyn Object>) -> Result<()> {
        self.expect_kind(PropertyKind::ObjArray)?;
        if let PropertyValue::ObjArray(values) = &mut self.value {
            let len = values.len();
            let slot = values
                .get_mut(index)
                .ok_or_else(|| ObjectError::index_out_of_range(index, len, &self.name))?;
            *slot = value;
        }
        self.use_default = false;
        Ok(())
    }

    /// Append an element to an `ObjArray` property.
    pub fn push_object(&mut self, value: Box<dyn Object>) -> Result<()> {
        self.expect_kind(PropertyKind::ObjArray)?;
        if let PropertyValue::ObjArray(values) = &mut self.value {
            values.push(value);
        }
        self.use_default = false;
        Ok(())
    }

    /// Remove and return one element of an `ObjArray` property.
    pub fn remove_object_at(&mut self, index: usize) -> Result<Box<dyn Object>> {
        self.expect_kind(PropertyKind::ObjArray)?;
        match &mut self.value {
            PropertyValue::ObjArray(values) if index < values.len() => {
                let removed = values.remove(index);
                self.use_default = false;
                Ok(removed)
            }
            PropertyValue::ObjArray(values) => Err(ObjectError::index_out_of_range(
                index,
                values.len(),
                &self.name,
            )),
            other => Err(ObjectError::type_mismatch(
                &self.name,
                PropertyKind::ObjArray,
                other.kind(),
            )),
        }
    }

    /// Number of elements; scalar kinds report 1.
    pub fn size(&self) -> usize {
        match &self.value {
            PropertyValue::BoolArray(v) => v.len(),
            PropertyValue::IntArray(v) => v.len(),
            PropertyValue::DblArray(v) => v.len(),
            PropertyValue::StrArray(v) => v.len(),
            PropertyValue::ObjArray(v) => v.len(),
            _ => 1,
        }
    }

    /// Resize an array property, filling new slots with the element default.
    ///
    /// Object arrays may only shrink.
    pub fn resize(&mut self, len: usize) -> Result<()> {
        match &mut self.value {
            PropertyValue::BoolArray(v) => v.resize(len, false),
            PropertyValue::IntArray(v) => v.resize(len, 0),
            PropertyValue::DblArray(v) => v.resize(len, 0.0),
            PropertyValue::StrArray(v) => v.resize(len, String::new()),
            PropertyValue::ObjArray(v) => {
                if len > v.len() {
                    return Err(ObjectError::UnsupportedResize {
                        property: self.name.clone(),
                        len: v.len(),
                        requested: len,
                    });
                }
                v.truncate(len);
            }
            other => {
                let kind = other.kind();
                return Err(ObjectError::type_mismatch(&self.name, kind.as_array(), kind));
            }
        }
        self.use_default = false;
        Ok(())
    }

    /// Text rendering of the value, as written to XML for non-object kinds.
    pub fn value_text(&self) -> String {
        match &self.value {
            PropertyValue::Bool(v) => v.to_string(),
            PropertyValue::Int(v) => v.to_string(),
            PropertyValue::Dbl(v) => format_double(*v),
            PropertyValue::Str(v) => v.clone(),
            PropertyValue::Obj(obj) => format!("{}({})", obj.type_name(), obj.name()),
            PropertyValue::BoolArray(v) => join(v, ToString::to_string),
            PropertyValue::IntArray(v) => join(v, ToString::to_string),
            PropertyValue::DblArray(v) => join(v, |d| format_double(*d)),
            PropertyValue::StrArray(v) => v.join(" "),
            PropertyValue::ObjArray(v) => join(v, |obj| obj.type_name().to_string()),
        }
    }

    /// Parse `text` into this property's kind and store it.
    ///
    /// On failure the stored value is left unchanged.
    pub fn set_from_text(&mut self, text: &str) -> Result<()> {
        let kind = self.kind();
        let invalid = || ObjectError::invalid_value(&self.name, kind, text);
        let parsed = match kind {
            PropertyKind::Bool => PropertyValue::Bool(parse_bool(text.trim()).ok_or_else(invalid)?),
            PropertyKind::Int => PropertyValue::Int(text.trim().parse().map_err(|_| invalid())?),
            PropertyKind::Dbl => PropertyValue::Dbl(text.trim().parse().map_err(|_| invalid())?),
            PropertyKind::Str => PropertyValue::Str(text.to_string()),
            PropertyKind::BoolArray => {
                PropertyValue::BoolArray(parse_tokens(text, parse_bool).ok_or_else(invalid)?)
            }
            PropertyKind::IntArray => {
                PropertyValue::IntArray(parse_tokens(text, |t| t.parse().ok()).ok_or_else(invalid)?)
            }
            PropertyKind::DblArray => {
                PropertyValue::DblArray(parse_tokens(text, |t| t.parse().ok()).ok_or_else(invalid)?)
            }
            PropertyKind::StrArray => {
                PropertyValue::StrArray(array_tokens(text).map(str::to_string).collect())
            }
            PropertyKind::Obj | PropertyKind::ObjArray => return Err(invalid()),
        };
        self.value = parsed;
        self.use_default = false;
        Ok(())
    }
}

/// Equality compares name and value; comment and default flag are metadata.
impl PartialEq for Property {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.value == other.value
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.name, self.value_text())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_new_property_uses_default() {
        let p = Property::double("default_value", 0.0);
        assert!(p.is_use_default());
        assert_eq!(p.kind(), PropertyKind::Dbl);
        assert!(!p.is_array());
    }

    #[test]
    fn test_typed_setter_clears_default() {
        let mut p = Property::int("index", 0);
        p.set_int(2).unwrap();
        assert_eq!(p.int_value().unwrap(), 2);
        assert!(!p.is_use_default());
    }

    #[test]
    fn test_wrong_kind_setter_fails_and_preserves_value() {
        let mut p = Property::int("index", 7);
        let err = p.set_double(1.5).unwrap_err();
        assert!(err.is_type_mismatch());
        assert_eq!(p.int_value().unwrap(), 7);
        assert!(p.is_use_default());
    }

    #[test]
    fn test_wrong_kind_getter_fails() {
        let p = Property::string("coordinate", "knee_angle");
        assert!(p.bool_value().unwrap_err().is_type_mismatch());
        assert!(p.double_array_value().unwrap_err().is_type_mismatch());
        assert_eq!(p.string_value().unwrap(), "knee_angle");
    }

    #[test]
    fn test_array_element_access() {
        let mut p = Property::double_array("range", vec![-1.0, 1.0]);
        assert_eq!(p.size(), 2);
        p.set_double_at(1, 2.5).unwrap();
        assert_relative_eq!(p.double_at(1).unwrap(), 2.5);

        let err = p.double_at(2).unwrap_err();
        assert!(matches!(
            err,
            ObjectError::IndexOutOfRange { index: 2, len: 2, .. }
        ));
        assert!(p.set_double_at(5, 0.0).is_err());
    }

    #[test]
    fn test_resize_fills_defaults() {
        let mut p = Property::int_array("ids", vec![4]);
        p.resize(3).unwrap();
        assert_eq!(p.int_array_value().unwrap(), &[4, 0, 0]);
        p.resize(1).unwrap();
        assert_eq!(p.int_array_value().unwrap(), &[4]);
        assert!(!p.is_use_default());
    }

    #[test]
    fn test_resize_scalar_fails() {
        let mut p = Property::bool("visible", true);
        let err = p.resize(3).unwrap_err();
        assert!(matches!(
            err,
            ObjectError::TypeMismatch {
                expected: PropertyKind::BoolArray,
                actual: PropertyKind::Bool,
                ..
            }
        ));
    }

    #[test]
    fn test_string_array_access() {
        let mut p = Property::string_array("muscles", vec!["soleus".into(), "gastroc".into()]);
        assert_eq!(p.string_at(1).unwrap(), "gastroc");
        p.set_string_at(0, "tibant").unwrap();
        assert_eq!(p.value_text(), "tibant gastroc");
        assert!(p.string_at(2).is_err());
    }

    #[test]
    fn test_double_text_is_round_trippable() {
        for v in [1.5, -3.0, 0.1, 1e-12, 6.02e23, f64::MAX] {
            let text = format_double(v);
            assert!(!text.contains(','));
            assert_eq!(text.parse::<f64>().unwrap(), v);
        }
        assert_eq!(format_double(2.5), "2.5");
    }

    #[test]
    fn test_set_from_text_scalars() {
        let mut p = Property::bool("locked", false);
        p.set_from_text("TRUE").unwrap();
        assert!(p.bool_value().unwrap());

        let mut p = Property::int("index", 0);
        p.set_from_text(" 42 ").unwrap();
        assert_eq!(p.int_value().unwrap(), 42);

        let mut p = Property::double("default_value", 0.0);
        p.set_from_text("1.5").unwrap();
        assert_relative_eq!(p.double_value().unwrap(), 1.5);
        assert!(!p.is_use_default());
    }

    #[test]
    fn test_set_from_text_arrays_accept_commas() {
        let mut p = Property::double_array("range", Vec::new());
        p.set_from_text("1.0, 2.5\n-3.0").unwrap();
        assert_eq!(p.double_array_value().unwrap(), &[1.0, 2.5, -3.0]);

        let mut p = Property::bool_array("flags", Vec::new());
        p.set_from_text("true 0 false").unwrap();
        assert_eq!(p.bool_array_value().unwrap(), &[true, false, false]);
    }

    #[test]
    fn test_set_from_text_invalid_leaves_value() {
        let mut p = Property::int("index", 3);
        let err = p.set_from_text("three").unwrap_err();
        assert!(matches!(err, ObjectError::InvalidValue { .. }));
        assert_eq!(p.int_value().unwrap(), 3);
        assert!(p.is_use_default());

        let mut p = Property::double_array("range", vec![1.0]);
        assert!(p.set_from_text("1.0 abc").is_err());
        assert_eq!(p.double_array_value().unwrap(), &[1.0]);
    }

    #[test]
    fn test_equality_ignores_comment_and_flag() {
        let a = Property::double("mass", 1.0).with_comment("kg");
        let mut b = Property::double("mass", 0.0);
        b.set_double(1.0).unwrap();
        assert_eq!(a, b);

        let c = Property::double("inertia", 1.0);
        assert_ne!(a, c);
    }

    #[test]
    fn test_display() {
        let p = Property::int_array("ids", vec![1, 2, 3]);
        assert_eq!(p.to_string(), "ids = 1 2 3");
    }

    #[test]
    fn test_kind_helpers() {
        assert!(PropertyKind::ObjArray.is_array());
        assert!(PropertyKind::ObjArray.is_object());
        assert!(!PropertyKind::Str.is_object());
        assert_eq!(PropertyKind::Dbl.as_array(), PropertyKind::DblArray);
        assert_eq!(PropertyKind::DblArray.as_array(), PropertyKind::DblArray);
        assert_eq!(PropertyKind::StrArray.to_string(), "string array");
    }
}
