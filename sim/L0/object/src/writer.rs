//! Object graph to XML.
//!
//! An object becomes one element tagged with its type name. Scalar properties
//! become attributes; arrays, object-valued properties and multi-line strings
//! become child elements named after the property, in declaration order.

use std::io::Write;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::config::XmlConfig;
use crate::document::{NAME_ATTRIBUTE, NOTES_ELEMENT};
use crate::error::{ObjectError, Result};
use crate::object::Object;
use crate::property::{Property, PropertyKind, PropertyValue};

/// Serialize `object` to an XML string.
///
/// # Errors
///
/// Returns [`ObjectError::XmlWrite`] if the XML cannot be emitted, and
/// [`ObjectError::InvalidValue`] for a string array element that would not
/// read back as written.
pub fn serialize_object(object: &dyn Object, config: &XmlConfig) -> Result<String> {
    let mut buffer = Vec::new();
    write_object(&mut buffer, object, config)?;
    String::from_utf8(buffer)
        .map_err(|e| ObjectError::XmlWrite(format!("invalid UTF-8 output: {e}")))
}

/// Write `object` as XML to `sink`.
///
/// # Errors
///
/// Returns [`ObjectError::XmlWrite`] if writing fails, and
/// [`ObjectError::InvalidValue`] for a string array element that would not
/// read back as written.
pub fn write_object<W: Write>(sink: W, object: &dyn Object, config: &XmlConfig) -> Result<()> {
    let mut writer = new_writer(sink, config);
    if config.write_declaration {
        write_declaration(&mut writer)?;
    }
    emit_object(&mut writer, object, config)
}

pub(crate) fn new_writer<W: Write>(sink: W, config: &XmlConfig) -> Writer<W> {
    if config.indent == 0 {
        Writer::new(sink)
    } else {
        Writer::new_with_indent(sink, b' ', config.indent)
    }
}

pub(crate) fn write_event<W: Write>(writer: &mut Writer<W>, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| ObjectError::XmlWrite(format!("write error: {e}")))
}

pub(crate) fn write_declaration<W: Write>(writer: &mut Writer<W>) -> Result<()> {
    write_event(
        writer,
        Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)),
    )
}

/// Scalars other than multi-line strings fit in an attribute.
///
/// `name` and `notes` are reserved for the object's own name attribute and
/// notes element, so a property with either name takes the other form.
fn is_attribute(property: &Property) -> bool {
    let scalar = !property.kind().is_array() && !property.kind().is_object();
    match (property.name(), property.value()) {
        (NAME_ATTRIBUTE, _) => false,
        (NOTES_ELEMENT, _) => scalar,
        (_, PropertyValue::Str(s)) => !s.contains('\n'),
        _ => scalar,
    }
}

/// String array elements are written space separated and must read back as
/// the same tokens.
fn check_string_tokens(property: &Property) -> Result<()> {
    let PropertyValue::StrArray(values) = property.value() else {
        return Ok(());
    };
    match values
        .iter()
        .find(|v| v.is_empty() || v.contains(|c: char| c.is_whitespace() || c == ','))
    {
        Some(bad) => Err(ObjectError::invalid_value(
            property.name(),
            PropertyKind::StrArray,
            bad.as_str(),
        )),
        None => Ok(()),
    }
}

pub(crate) fn emit_object<W: Write>(
    writer: &mut Writer<W>,
    object: &dyn Object,
    config: &XmlConfig,
) -> Result<()> {
    let mut start = BytesStart::new(object.type_name());
    if !object.name().is_empty() {
        start.push_attribute((NAME_ATTRIBUTE, object.name()));
    }

    let mut children = Vec::new();
    for property in object.properties() {
        if property.is_use_default() && !config.write_defaults {
            continue;
        }
        if is_attribute(property) {
            start.push_attribute((property.name(), property.value_text().as_str()));
        } else {
            children.push(property);
        }
    }

    let notes = object.notes();
    if !notes.is_empty() && children.iter().any(|p| p.name() == NOTES_ELEMENT) {
        return Err(ObjectError::XmlWrite(format!(
            "{}: property '{NOTES_ELEMENT}' would collide with the object's notes",
            object.type_name()
        )));
    }
    if children.is_empty() && notes.is_empty() {
        return write_event(writer, Event::Empty(start));
    }

    write_event(writer, Event::Start(start))?;
    if !notes.is_empty() {
        write_text_element(writer, NOTES_ELEMENT, notes)?;
    }
    for property in children {
        emit_property(writer, property, config)?;
    }
    write_event(writer, Event::End(BytesEnd::new(object.type_name())))
}

fn emit_property<W: Write>(
    writer: &mut Writer<W>,
    property: &Property,
    config: &XmlConfig,
) -> Result<()> {
    if config.write_comments && !property.comment().is_empty() {
        let comment = property.comment().replace("--", "- -");
        write_event(writer, Event::Comment(BytesText::from_escaped(comment)))?;
    }

    match property.value() {
        PropertyValue::Obj(object) => {
            write_event(writer, Event::Start(BytesStart::new(property.name())))?;
            emit_object(writer, &**object, config)?;
            write_event(writer, Event::End(BytesEnd::new(property.name())))
        }
        PropertyValue::ObjArray(objects) if objects.is_empty() => {
            write_event(writer, Event::Empty(BytesStart::new(property.name())))
        }
        PropertyValue::ObjArray(objects) => {
            write_event(writer, Event::Start(BytesStart::new(property.name())))?;
            for object in objects {
                emit_object(writer, &**object, config)?;
            }
            write_event(writer, Event::End(BytesEnd::new(property.name())))
        }
        _ => {
            check_string_tokens(property)?;
            write_text_element(writer, property.name(), &property.value_text())
        }
    }
}

fn write_text_element<W: Write>(writer: &mut Writer<W>, name: &str, text: &str) -> Result<()> {
    if text.is_empty() {
        return write_event(writer, Event::Empty(BytesStart::new(name)));
    }
    write_event(writer, Event::Start(BytesStart::new(name)))?;
    write_event(writer, Event::Text(BytesText::new(text)))?;
    write_event(writer, Event::End(BytesEnd::new(name)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::object::GenericObject;
    use crate::object_set::ObjectSet;

    fn speed() -> GenericObject {
        GenericObject::new("Speed")
            .with_property(Property::double("default_value", 0.0))
            .unwrap()
            .with_property(Property::int("index", 0))
            .unwrap()
            .with_property(Property::double_array("range", vec![1.0, 2.5, -3.0]))
            .unwrap()
    }

    #[test]
    fn test_scalars_as_attributes_arrays_as_children() {
        let mut s = speed();
        s.set_name("knee_u");
        let xml = serialize_object(&s, &XmlConfig::compact()).unwrap();
        assert_eq!(
            xml,
            r#"<Speed name="knee_u" default_value="0.0" index="0"><range>1.0 2.5 -3.0</range></Speed>"#
        );
    }

    #[test]
    fn test_skip_defaults() {
        let mut s = speed();
        s.properties_mut()
            .get_mut("index")
            .unwrap()
            .set_int(7)
            .unwrap();
        let config = XmlConfig::compact().with_write_defaults(false);
        let xml = serialize_object(&s, &config).unwrap();
        assert_eq!(xml, r#"<Speed index="7"/>"#);
    }

    #[test]
    fn test_declaration_and_indent() {
        let xml = serialize_object(&speed(), &XmlConfig::default()).unwrap();
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("\n    <range>"));
    }

    #[test]
    fn test_notes_and_comments() {
        let mut s = GenericObject::new("Speed")
            .with_property(
                Property::string_array("tags", vec!["a".into()]).with_comment("labels -- free form"),
            )
            .unwrap();
        s.set_notes("flexion <positive>");
        let config = XmlConfig::compact().with_write_comments(true);
        let xml = serialize_object(&s, &config).unwrap();
        assert_eq!(
            xml,
            "<Speed><notes>flexion &lt;positive&gt;</notes><!--labels - - free form--><tags>a</tags></Speed>"
        );
    }

    #[test]
    fn test_nested_objects() {
        let mut set = ObjectSet::with_type("SpeedSet");
        let mut s = GenericObject::new("Speed");
        s.set_name("a");
        set.append(Box::new(s)).unwrap();
        let xml = serialize_object(&set, &XmlConfig::compact()).unwrap();
        assert_eq!(xml, r#"<SpeedSet><objects><Speed name="a"/></objects></SpeedSet>"#);

        let empty =
            serialize_object(&ObjectSet::with_type("SpeedSet"), &XmlConfig::compact()).unwrap();
        assert_eq!(empty, "<SpeedSet><objects/></SpeedSet>");
    }

    #[test]
    fn test_attribute_escaping() {
        let s = GenericObject::new("Marker")
            .with_property(Property::string("label", "a<b & \"c\""))
            .unwrap();
        let xml = serialize_object(&s, &XmlConfig::compact()).unwrap();
        assert_eq!(xml, r#"<Marker label="a&lt;b &amp; &quot;c&quot;"/>"#);
    }

    #[test]
    fn test_notes_property_written_as_attribute() {
        let mut m = GenericObject::new("Marker")
            .with_property(Property::string("notes", "placed by hand\nrecheck"))
            .unwrap();
        m.set_notes("identity");
        let xml = serialize_object(&m, &XmlConfig::compact()).unwrap();
        assert_eq!(
            xml,
            "<Marker notes=\"placed by hand\nrecheck\"><notes>identity</notes></Marker>"
        );
    }

    #[test]
    fn test_notes_array_property_collides_with_notes() {
        let mut m = GenericObject::new("Marker")
            .with_property(Property::string_array("notes", vec!["a".into()]))
            .unwrap();
        assert!(serialize_object(&m, &XmlConfig::compact()).is_ok());

        m.set_notes("identity");
        let err = serialize_object(&m, &XmlConfig::compact()).unwrap_err();
        assert!(matches!(err, ObjectError::XmlWrite(_)));
    }

    #[test]
    fn test_string_array_elements_must_be_tokens() {
        for bad in ["left knee", "", "a,b"] {
            let m = GenericObject::new("Marker")
                .with_property(Property::string_array("labels", vec!["hip".into(), bad.into()]))
                .unwrap();
            let err = serialize_object(&m, &XmlConfig::compact()).unwrap_err();
            assert!(
                matches!(err, ObjectError::InvalidValue { ref text, .. } if text == bad),
                "{bad:?}"
            );
        }
    }
}
