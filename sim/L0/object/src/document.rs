//! Model documents and files.
//!
//! A saved document wraps the root object in an `<ObjectDocument>` element
//! carrying a `Version` marker:
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <ObjectDocument Version="30000">
//!     <BoneSet name="skeleton">
//!         <objects>
//!             <Bone name="femur"/>
//!         </objects>
//!     </BoneSet>
//! </ObjectDocument>
//! ```
//!
//! The version is recorded for callers and never enforced here. Loading also
//! accepts a bare object element as the document root.

use std::fs;
use std::path::Path;

use quick_xml::events::{BytesEnd, BytesStart, Event};

use crate::config::XmlConfig;
use crate::error::{ObjectError, Result};
use crate::object::Object;
use crate::parser::parse_document;
use crate::registry::{TypeRegistry, with_registry};
use crate::writer::{emit_object, new_writer, write_declaration, write_event};

/// Tag of the document wrapper element.
pub const DOCUMENT_TAG: &str = "ObjectDocument";

/// Version marker written on save unless configured otherwise.
pub const DOCUMENT_VERSION: u32 = 30000;

/// Attribute of the wrapper carrying the version marker.
pub const VERSION_ATTRIBUTE: &str = "Version";

/// Attribute carrying an object's instance name.
pub const NAME_ATTRIBUTE: &str = "name";

/// Child element carrying an object's notes.
pub const NOTES_ELEMENT: &str = "notes";

/// A root object together with its document version marker.
#[derive(Debug, Clone)]
pub struct Document {
    /// Version marker read from the wrapper, if present.
    pub version: Option<u32>,
    /// The root object.
    pub root: Box<dyn Object>,
}

impl Document {
    /// Wrap `root` in a new document with no version marker yet.
    pub fn new(root: Box<dyn Object>) -> Self {
        Self {
            version: None,
            root,
        }
    }

    /// Parse a document from XML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the XML is malformed or names an unregistered type.
    pub fn parse(xml: &str, registry: &TypeRegistry) -> Result<Self> {
        let parsed = parse_document(xml, registry, None)?;
        Ok(Self {
            version: parsed.version,
            root: parsed.root,
        })
    }

    /// Load a document from a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or its content cannot be
    /// parsed. Parse errors carry the file name in their location.
    pub fn load_file(path: impl AsRef<Path>, registry: &TypeRegistry) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let parsed = parse_document(&content, registry, Some(path))?;
        tracing::debug!(
            path = %path.display(),
            root = parsed.root.type_name(),
            "loaded document"
        );
        Ok(Self {
            version: parsed.version,
            root: parsed.root,
        })
    }

    /// Render the document, stamped with `config.document_version`.
    ///
    /// # Errors
    ///
    /// Returns an error if the XML cannot be emitted.
    pub fn to_xml_string(&self, config: &XmlConfig) -> Result<String> {
        let mut buffer = Vec::new();
        self.write(&mut buffer, config)?;
        String::from_utf8(buffer)
            .map_err(|e| ObjectError::XmlWrite(format!("invalid UTF-8 output: {e}")))
    }

    /// Save the document to a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the XML cannot be emitted or the file cannot be written.
    pub fn save_file(&self, path: impl AsRef<Path>, config: &XmlConfig) -> Result<()> {
        let path = path.as_ref();
        let xml = self.to_xml_string(config)?;
        fs::write(path, xml)?;
        tracing::debug!(path = %path.display(), "saved document");
        Ok(())
    }

    /// Take the root object.
    pub fn into_root(self) -> Box<dyn Object> {
        self.root
    }

    fn write<W: std::io::Write>(&self, sink: W, config: &XmlConfig) -> Result<()> {
        let mut writer = new_writer(sink, config);
        if config.write_declaration {
            write_declaration(&mut writer)?;
        }
        let mut wrapper = BytesStart::new(DOCUMENT_TAG);
        let version = config.document_version.to_string();
        wrapper.push_attribute((VERSION_ATTRIBUTE, version.as_str()));
        write_event(&mut writer, Event::Start(wrapper))?;
        emit_object(&mut writer, &*self.root, config)?;
        write_event(&mut writer, Event::End(BytesEnd::new(DOCUMENT_TAG)))
    }
}

/// Load a document using the process-wide registry.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_document(path: impl AsRef<Path>) -> Result<Document> {
    with_registry(|registry| Document::load_file(path, registry))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::object::GenericObject;
    use crate::property::Property;

    fn registry() -> TypeRegistry {
        let mut registry = TypeRegistry::new();
        registry
            .register(Box::new(
                GenericObject::new("Bone")
                    .with_property(Property::double("mass", 1.0))
                    .unwrap(),
            ))
            .unwrap();
        registry
    }

    fn bone(mass: f64) -> Box<dyn Object> {
        let mut bone = registry().create_instance("Bone").unwrap();
        bone.set_name("femur");
        bone.properties_mut()
            .get_mut("mass")
            .unwrap()
            .set_double(mass)
            .unwrap();
        bone
    }

    #[test]
    fn test_wrapped_output() {
        let doc = Document::new(bone(2.5));
        let xml = doc.to_xml_string(&XmlConfig::compact()).unwrap();
        assert_eq!(
            xml,
            r#"<ObjectDocument Version="30000"><Bone name="femur" mass="2.5"/></ObjectDocument>"#
        );
    }

    #[test]
    fn test_round_trip_keeps_version() {
        let config = XmlConfig::default().with_document_version(20302);
        let xml = Document::new(bone(2.5)).to_xml_string(&config).unwrap();
        let doc = Document::parse(&xml, &registry()).unwrap();
        assert_eq!(doc.version, Some(20302));
        assert_eq!(doc.root.name(), "femur");
        assert!(doc.root.equals(&*bone(2.5)));
    }

    #[test]
    fn test_bare_root_has_no_version() {
        let doc = Document::parse(r#"<Bone mass="3.0"/>"#, &registry()).unwrap();
        assert_eq!(doc.version, None);
        assert_eq!(doc.into_root().type_name(), "Bone");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Document::load_file(dir.path().join("absent.xml"), &registry()).unwrap_err();
        assert!(matches!(err, ObjectError::Io(_)));
    }
}
