//! XML to object graph.
//!
//! Each element is resolved through the [`TypeRegistry`]: the tag names a
//! registered type, a fresh instance is created from its prototype, and the
//! instance's declared properties are populated from matching attributes and
//! child elements. Anything undeclared is skipped.

use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, BytesText, Event};

use crate::document::{DOCUMENT_TAG, NAME_ATTRIBUTE, NOTES_ELEMENT, VERSION_ATTRIBUTE};
use crate::error::{ObjectError, Result, XmlLocation};
use crate::object::Object;
use crate::property::{Property, PropertyKind};
use crate::registry::TypeRegistry;

/// Root object plus the version marker of its document wrapper, if any.
#[derive(Debug)]
pub(crate) struct ParsedDocument {
    pub version: Option<u32>,
    pub root: Box<dyn Object>,
}

/// Deserialize one object element (or a wrapped document) from XML text.
///
/// # Errors
///
/// Returns [`ObjectError::UnknownType`] if an element names an unregistered
/// type, and [`ObjectError::MalformedDocument`] if the XML is ill-formed or a
/// value cannot be parsed into its property's kind.
pub fn deserialize_object(xml: &str, registry: &TypeRegistry) -> Result<Box<dyn Object>> {
    Ok(parse_document(xml, registry, None)?.root)
}

/// Parse a document, recording `file` in error locations.
pub(crate) fn parse_document(
    xml: &str,
    registry: &TypeRegistry,
    file: Option<&Path>,
) -> Result<ParsedDocument> {
    // Text is read verbatim; string values keep their surrounding whitespace.
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);
    Parser {
        reader,
        source: xml,
        registry,
        file,
        path: Vec::new(),
    }
    .parse_document()
}

struct Parser<'a> {
    reader: Reader<&'a [u8]>,
    source: &'a str,
    registry: &'a TypeRegistry,
    file: Option<&'a Path>,
    path: Vec<String>,
}

impl<'a> Parser<'a> {
    fn location(&self) -> XmlLocation {
        let position = usize::try_from(self.reader.buffer_position()).unwrap_or(usize::MAX);
        let bytes = self.source.as_bytes();
        let consumed = bytes.get(..position).unwrap_or(bytes);
        let line = consumed.iter().filter(|&&b| b == b'\n').count() + 1;
        XmlLocation {
            file: self.file.map(Path::to_path_buf),
            line: Some(line),
            path: self.path.join("/"),
        }
    }

    fn malformed(&self, message: impl Into<String>) -> ObjectError {
        ObjectError::malformed(message, self.location())
    }

    fn next_event(&mut self) -> Result<Event<'a>> {
        match self.reader.read_event() {
            Ok(event) => Ok(event),
            Err(e) => Err(self.malformed(format!("XML syntax error: {e}"))),
        }
    }

    fn unexpected_eof(&self) -> ObjectError {
        self.malformed("unexpected end of document")
    }

    fn tag_name(&self, e: &BytesStart<'_>) -> Result<String> {
        std::str::from_utf8(e.name().as_ref())
            .map(str::to_string)
            .map_err(|_| self.malformed("element name is not valid UTF-8"))
    }

    fn parse_document(mut self) -> Result<ParsedDocument> {
        loop {
            match self.next_event()? {
                Event::Start(e) => {
                    if e.name().as_ref() == DOCUMENT_TAG.as_bytes() {
                        let version = self.document_version(&e)?;
                        let root = self.parse_wrapper()?;
                        return Ok(ParsedDocument { version, root });
                    }
                    let root = self.parse_object(&e, false)?;
                    return Ok(ParsedDocument {
                        version: None,
                        root,
                    });
                }
                Event::Empty(e) => {
                    if e.name().as_ref() == DOCUMENT_TAG.as_bytes() {
                        return Err(self.malformed("document contains no root object"));
                    }
                    let root = self.parse_object(&e, true)?;
                    return Ok(ParsedDocument {
                        version: None,
                        root,
                    });
                }
                Event::Eof => return Err(self.malformed("missing root element")),
                _ => {}
            }
        }
    }

    fn document_version(&self, e: &BytesStart<'_>) -> Result<Option<u32>> {
        for attr in e.attributes().flatten() {
            if attr.key.as_ref() == VERSION_ATTRIBUTE.as_bytes() {
                let text = attr
                    .unescape_value()
                    .map_err(|e| self.malformed(format!("invalid attribute value: {e}")))?;
                let version = text
                    .trim()
                    .parse()
                    .map_err(|_| self.malformed(format!("invalid document version: {text:?}")))?;
                return Ok(Some(version));
            }
        }
        tracing::warn!("document has no version marker");
        Ok(None)
    }

    /// Read the wrapper's content: the first element is the root object.
    fn parse_wrapper(&mut self) -> Result<Box<dyn Object>> {
        self.path.push(DOCUMENT_TAG.to_string());
        let mut root = None;
        loop {
            match self.next_event()? {
                Event::Start(e) if root.is_none() => root = Some(self.parse_object(&e, false)?),
                Event::Empty(e) if root.is_none() => root = Some(self.parse_object(&e, true)?),
                Event::Start(e) => {
                    tracing::debug!(
                        element = %String::from_utf8_lossy(e.name().as_ref()),
                        "ignoring extra element after root object"
                    );
                    self.skip_element()?;
                }
                Event::End(_) => break,
                Event::Eof => return Err(self.unexpected_eof()),
                _ => {}
            }
        }
        let root = root.ok_or_else(|| self.malformed("document contains no root object"))?;
        self.path.pop();
        Ok(root)
    }

    fn parse_object(&mut self, start: &BytesStart<'a>, empty: bool) -> Result<Box<dyn Object>> {
        let tag = self.tag_name(start)?;
        self.path.push(tag.clone());
        let mut object = self.registry.create_instance(&tag)?;
        self.apply_attributes(&mut *object, start)?;
        if !empty {
            self.parse_children(&mut *object)?;
        }
        self.path.pop();
        Ok(object)
    }

    fn apply_attributes(&mut self, object: &mut dyn Object, start: &BytesStart<'a>) -> Result<()> {
        for attr in start.attributes() {
            let attr = attr.map_err(|e| self.malformed(format!("invalid attribute: {e}")))?;
            let key = std::str::from_utf8(attr.key.as_ref())
                .map_err(|_| self.malformed("attribute name is not valid UTF-8"))?;
            let value = attr
                .unescape_value()
                .map_err(|e| self.malformed(format!("invalid value for attribute '{key}': {e}")))?;

            if key == NAME_ATTRIBUTE {
                object.set_name(&value);
                continue;
            }
            match object.properties_mut().contains_mut(key) {
                Some(property) if !property.kind().is_object() => {
                    self.path.push(key.to_string());
                    self.populate(property, &value)?;
                    self.path.pop();
                }
                Some(_) => {
                    tracing::debug!(
                        attribute = key,
                        "object-valued property given as attribute; ignored"
                    );
                }
                None => {
                    tracing::debug!(
                        attribute = key,
                        element = object.type_name(),
                        "ignoring undeclared attribute"
                    );
                }
            }
        }
        Ok(())
    }

    fn populate(&self, property: &mut Property, text: &str) -> Result<()> {
        property.set_from_text(text).map_err(|e| match e {
            ObjectError::InvalidValue { .. } => self.malformed(e.to_string()),
            other => other,
        })?;
        tracing::trace!(property = property.name(), "populated from XML");
        Ok(())
    }

    fn parse_children(&mut self, object: &mut dyn Object) -> Result<()> {
        loop {
            match self.next_event()? {
                Event::Start(e) => self.parse_child(object, &e, false)?,
                Event::Empty(e) => self.parse_child(object, &e, true)?,
                Event::End(_) => return Ok(()),
                Event::Eof => return Err(self.unexpected_eof()),
                Event::Text(t) if is_blank(&t) => {}
                Event::Text(_) | Event::CData(_) => {
                    tracing::debug!(
                        element = object.type_name(),
                        "ignoring text content of object element"
                    );
                }
                _ => {}
            }
        }
    }

    fn parse_child(
        &mut self,
        object: &mut dyn Object,
        e: &BytesStart<'a>,
        empty: bool,
    ) -> Result<()> {
        let tag = self.tag_name(e)?;
        self.path.push(tag.clone());

        let kind = object.properties().contains(&tag).map(Property::kind);
        // A scalar property named `notes` is always written as an attribute,
        // so the element carries the object's notes.
        let identity_notes =
            tag == NOTES_ELEMENT && kind.is_none_or(|k| !k.is_array() && !k.is_object());
        if identity_notes {
            let text = if empty { String::new() } else { self.read_text()? };
            object.set_notes(&text);
            self.path.pop();
            return Ok(());
        }

        match kind {
            Some(PropertyKind::Obj) => {
                let mut nested = if empty {
                    Vec::new()
                } else {
                    self.read_nested_objects()?
                };
                let count = nested.len();
                let value = match nested.pop() {
                    Some(value) if count == 1 => value,
                    _ => {
                        return Err(self.malformed(format!(
                            "object property '{tag}' must contain exactly one object, found {count}"
                        )))
                    }
                };
                object.properties_mut().get_mut(&tag)?.set_object(value)?;
            }
            Some(PropertyKind::ObjArray) => {
                let objects = if empty {
                    Vec::new()
                } else {
                    self.read_nested_objects()?
                };
                object
                    .properties_mut()
                    .get_mut(&tag)?
                    .set_object_array(objects)?;
            }
            Some(_) => {
                let text = if empty { String::new() } else { self.read_text()? };
                let property = object.properties_mut().get_mut(&tag)?;
                self.populate(property, &text)?;
            }
            None => {
                tracing::debug!(
                    element = %tag,
                    parent = object.type_name(),
                    "ignoring undeclared element"
                );
                if !empty {
                    self.skip_element()?;
                }
            }
        }

        self.path.pop();
        Ok(())
    }

    /// Collect the text of a value element up to its end tag.
    fn read_text(&mut self) -> Result<String> {
        let mut segments = Vec::new();
        loop {
            match self.next_event()? {
                Event::Text(t) => {
                    let text = t
                        .unescape()
                        .map_err(|e| self.malformed(format!("invalid text: {e}")))?;
                    segments.push(text.into_owned());
                }
                Event::CData(c) => segments.push(String::from_utf8_lossy(&c).into_owned()),
                Event::Start(_) | Event::Empty(_) => {
                    return Err(self.malformed("unexpected element inside a value"));
                }
                Event::End(_) => break,
                Event::Eof => return Err(self.unexpected_eof()),
                _ => {}
            }
        }
        Ok(segments.concat())
    }

    /// Parse every object element up to the enclosing end tag.
    fn read_nested_objects(&mut self) -> Result<Vec<Box<dyn Object>>> {
        let mut objects = Vec::new();
        loop {
            match self.next_event()? {
                Event::Start(e) => objects.push(self.parse_object(&e, false)?),
                Event::Empty(e) => objects.push(self.parse_object(&e, true)?),
                Event::End(_) => return Ok(objects),
                Event::Eof => return Err(self.unexpected_eof()),
                Event::Text(t) if is_blank(&t) => {}
                Event::Text(_) | Event::CData(_) => {
                    tracing::debug!("ignoring text between nested objects");
                }
                _ => {}
            }
        }
    }

    /// Skip to the end of the element whose start tag was just read.
    fn skip_element(&mut self) -> Result<()> {
        let mut depth = 1_usize;
        loop {
            match self.next_event()? {
                Event::Start(_) => depth += 1,
                Event::End(_) => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(());
                    }
                }
                Event::Eof => return Err(self.unexpected_eof()),
                _ => {}
            }
        }
    }
}

/// Whitespace between elements carries no content.
fn is_blank(text: &BytesText<'_>) -> bool {
    text.iter().all(u8::is_ascii_whitespace)
}
