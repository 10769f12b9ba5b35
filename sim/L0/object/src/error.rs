//! Error types for property access, registration and XML persistence.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::property::PropertyKind;

/// Where in an XML document a failure was detected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlLocation {
    /// File the document was read from, if any.
    pub file: Option<PathBuf>,
    /// 1-based line number, when known.
    pub line: Option<usize>,
    /// Slash-separated element path, e.g. `BoneSet/objects/Bone`.
    pub path: String,
}

impl XmlLocation {
    /// Create a location from an element path only.
    pub fn at_path(path: impl Into<String>) -> Self {
        Self {
            file: None,
            line: None,
            path: path.into(),
        }
    }
}

impl fmt::Display for XmlLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.file, self.line) {
            (Some(file), Some(line)) => write!(f, "{}:{line}", file.display())?,
            (Some(file), None) => write!(f, "{}", file.display())?,
            (None, Some(line)) => write!(f, "line {line}")?,
            (None, None) => write!(f, "<document>")?,
        }
        if !self.path.is_empty() {
            write!(f, " at {}", self.path)?;
        }
        Ok(())
    }
}

/// Errors raised by the object framework.
#[derive(Debug, Error)]
pub enum ObjectError {
    /// A typed accessor was used on a property of another kind.
    #[error("type mismatch on property '{property}': expected {expected}, found {actual}")]
    TypeMismatch {
        /// Property name.
        property: String,
        /// Kind the accessor requires.
        expected: PropertyKind,
        /// Kind the property actually holds.
        actual: PropertyKind,
    },

    /// Array or property-set index past the end.
    #[error("index {index} out of range for {context} (len {len})")]
    IndexOutOfRange {
        /// The offending index.
        index: usize,
        /// Number of elements available.
        len: usize,
        /// What was being indexed.
        context: String,
    },

    /// Required lookup by name failed.
    #[error("{what} not found: {name}")]
    NotFound {
        /// Kind of thing looked up ("property", "group", ...).
        what: &'static str,
        /// The missing name.
        name: String,
    },

    /// A property with this name already exists in the set.
    #[error("duplicate property name: {0}")]
    DuplicateName(String),

    /// A type with this name is already registered.
    #[error("type already registered: {0}")]
    DuplicateRegistration(String),

    /// Registration attempted after the registry was frozen.
    #[error("type registry is frozen; cannot register {0}")]
    RegistryFrozen(String),

    /// No prototype is registered under this name.
    #[error("unknown type: {0}")]
    UnknownType(String),

    /// Text could not be parsed into the property's kind.
    #[error("invalid {kind} value for property '{property}': {text:?}")]
    InvalidValue {
        /// Property name.
        property: String,
        /// Kind the text was parsed as.
        kind: PropertyKind,
        /// The offending text.
        text: String,
    },

    /// Assignment between objects of different concrete types.
    #[error("cannot assign object of type {actual} to object of type {expected}")]
    ObjectTypeMismatch {
        /// Concrete type of the target.
        expected: String,
        /// Concrete type of the source.
        actual: String,
    },

    /// Object arrays have no element default and cannot grow by resize.
    #[error("cannot grow object array '{property}' from {len} to {requested}")]
    UnsupportedResize {
        /// Property name.
        property: String,
        /// Current length.
        len: usize,
        /// Requested length.
        requested: usize,
    },

    /// Structurally invalid XML document.
    #[error("malformed document ({location}): {message}")]
    MalformedDocument {
        /// Description of the problem.
        message: String,
        /// Where it was found.
        location: XmlLocation,
    },

    /// Failure while emitting XML.
    #[error("XML write error: {0}")]
    XmlWrite(String),

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ObjectError {
    /// Create a type mismatch error.
    pub fn type_mismatch(
        property: impl Into<String>,
        expected: PropertyKind,
        actual: PropertyKind,
    ) -> Self {
        Self::TypeMismatch {
            property: property.into(),
            expected,
            actual,
        }
    }

    /// Create an index out of range error.
    pub fn index_out_of_range(index: usize, len: usize, context: impl Into<String>) -> Self {
        Self::IndexOutOfRange {
            index,
            len,
            context: context.into(),
        }
    }

    /// Create a property not found error.
    pub fn property_not_found(name: impl Into<String>) -> Self {
        Self::NotFound {
            what: "property",
            name: name.into(),
        }
    }

    /// Create a group not found error.
    pub fn group_not_found(name: impl Into<String>) -> Self {
        Self::NotFound {
            what: "group",
            name: name.into(),
        }
    }

    /// Create an object not found error.
    pub fn object_not_found(name: impl Into<String>) -> Self {
        Self::NotFound {
            what: "object",
            name: name.into(),
        }
    }

    /// Create an invalid value error.
    pub fn invalid_value(
        property: impl Into<String>,
        kind: PropertyKind,
        text: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            property: property.into(),
            kind,
            text: text.into(),
        }
    }

    /// Create a malformed document error.
    pub fn malformed(message: impl Into<String>, location: XmlLocation) -> Self {
        Self::MalformedDocument {
            message: message.into(),
            location,
        }
    }

    /// Check if this is a type mismatch.
    #[must_use]
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, Self::TypeMismatch { .. })
    }

    /// Check if this is a lookup failure.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a malformed document error.
    #[must_use]
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedDocument { .. })
    }
}

/// Result type for object framework operations.
pub type Result<T> = std::result::Result<T, ObjectError>;
