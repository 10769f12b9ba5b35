//! Serialization settings.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::document::DOCUMENT_VERSION;

/// Options controlling how objects are written to XML.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct XmlConfig {
    /// Spaces per nesting level; 0 writes everything on one line (default: 4).
    pub indent: usize,
    /// Whether properties still holding their built-in default are written (default: true).
    pub write_defaults: bool,
    /// Whether property comments are written as XML comments (default: true).
    pub write_comments: bool,
    /// Version marker stamped on saved documents (default: [`DOCUMENT_VERSION`]).
    pub document_version: u32,
    /// Whether the `<?xml ...?>` declaration is written (default: true).
    pub write_declaration: bool,
}

impl Default for XmlConfig {
    fn default() -> Self {
        Self {
            indent: 4,
            write_defaults: true,
            write_comments: true,
            document_version: DOCUMENT_VERSION,
            write_declaration: true,
        }
    }
}

impl XmlConfig {
    /// Create a config with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Compact output: no indentation, no declaration, no comments.
    #[must_use]
    pub fn compact() -> Self {
        Self {
            indent: 0,
            write_comments: false,
            write_declaration: false,
            ..Self::default()
        }
    }

    /// Set the indentation width.
    #[must_use]
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Set whether default-valued properties are written.
    #[must_use]
    pub fn with_write_defaults(mut self, write_defaults: bool) -> Self {
        self.write_defaults = write_defaults;
        self
    }

    /// Set whether property comments are written.
    #[must_use]
    pub fn with_write_comments(mut self, write_comments: bool) -> Self {
        self.write_comments = write_comments;
        self
    }

    /// Set the document version marker.
    #[must_use]
    pub fn with_document_version(mut self, version: u32) -> Self {
        self.document_version = version;
        self
    }

    /// Set whether the XML declaration is written.
    #[must_use]
    pub fn with_declaration(mut self, write_declaration: bool) -> Self {
        self.write_declaration = write_declaration;
        self
    }
}
