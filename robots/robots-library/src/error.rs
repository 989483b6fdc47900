//! Error types for loading mechanisms.

use std::path::PathBuf;

use robots_kinematics::{KinematicsError, Manufacturer, MechanismKind};
use thiserror::Error;

/// Errors that can occur while reading descriptions, geometry or libraries.
///
/// Any of these aborts loading; no partially built mechanism is returned.
#[derive(Debug, Error)]
pub enum LibraryError {
    /// XML parsing error.
    #[error("XML parse error: {0}")]
    XmlParse(String),

    /// Missing required element.
    #[error("missing required element: {element} in {context}")]
    MissingElement {
        /// The missing element name.
        element: &'static str,
        /// Where the element was expected.
        context: String,
    },

    /// Missing required attribute.
    #[error("missing required attribute: {attribute} on {element}")]
    MissingAttribute {
        /// The missing attribute name.
        attribute: &'static str,
        /// The element that should have the attribute.
        element: String,
    },

    /// Invalid attribute value.
    #[error("invalid value for {attribute} on {element}: {message}")]
    InvalidAttribute {
        /// The attribute with the invalid value.
        attribute: &'static str,
        /// The element containing the attribute.
        element: String,
        /// Description of why the value is invalid.
        message: String,
    },

    /// Unknown manufacturer name.
    #[error("unknown manufacturer: {0}")]
    UnknownManufacturer(String),

    /// Unknown joint type.
    #[error("unknown joint type: {0}")]
    UnknownJointType(String),

    /// No kinematic family is registered for this combination.
    #[error("no kinematics registered for {kind} by {manufacturer}")]
    UnsupportedMechanism {
        /// Mechanism type.
        kind: MechanismKind,
        /// Manufacturer.
        manufacturer: Manufacturer,
    },

    /// The geometry store has no entry for the model.
    #[error("model \"{model}\" is not in the geometry store")]
    AssetNotFound {
        /// Fully qualified model name.
        model: String,
    },

    /// The geometry store returned the wrong number of meshes.
    #[error("model {model} has {actual} meshes, expected {expected} (base + one per joint)")]
    MeshCountMismatch {
        /// Fully qualified model name.
        model: String,
        /// Joint count + 1.
        expected: usize,
        /// Meshes found.
        actual: usize,
    },

    /// A mesh file could not be decoded.
    #[error("invalid mesh: {message}")]
    InvalidMesh {
        /// Description of what was invalid.
        message: String,
    },

    /// Two entries claim the same model name.
    #[error("duplicate model name: {0}")]
    DuplicateModel(String),

    /// The library has no description for this name.
    #[error("no mechanism named {0} in the library")]
    UnknownModel(String),

    /// The configured library folder does not exist.
    #[error("library folder not found: {}", path.display())]
    LibraryNotFound {
        /// Configured path.
        path: PathBuf,
    },

    /// Building the mechanism failed.
    #[error(transparent)]
    Kinematics(#[from] KinematicsError),

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl LibraryError {
    /// Create a missing element error.
    pub fn missing_element(element: &'static str, context: impl Into<String>) -> Self {
        Self::MissingElement {
            element,
            context: context.into(),
        }
    }

    /// Create a missing attribute error.
    pub fn missing_attribute(attribute: &'static str, element: impl Into<String>) -> Self {
        Self::MissingAttribute {
            attribute,
            element: element.into(),
        }
    }

    /// Create an invalid attribute error.
    pub fn invalid_attribute(
        attribute: &'static str,
        element: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidAttribute {
            attribute,
            element: element.into(),
            message: message.into(),
        }
    }

    /// Create an invalid mesh error.
    pub fn invalid_mesh(message: impl Into<String>) -> Self {
        Self::InvalidMesh {
            message: message.into(),
        }
    }

    /// Create an asset not found error.
    pub fn asset_not_found(model: impl Into<String>) -> Self {
        Self::AssetNotFound {
            model: model.into(),
        }
    }

    /// Check if this error means the geometry is missing rather than broken.
    #[must_use]
    pub const fn is_asset_not_found(&self) -> bool {
        matches!(self, Self::AssetNotFound { .. })
    }
}

/// Result type for library operations.
pub type Result<T> = std::result::Result<T, LibraryError>;
