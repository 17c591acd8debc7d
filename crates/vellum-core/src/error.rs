//! Error handling for Vellum
//!
//! Provides error types for each layer of the editor:
//! - Geometry errors (invalid or non-finite stored geometry)
//! - Font errors (outline resolution)
//! - Import errors (embedded vector markup)
//! - Export errors (vector and raster output)
//! - Document errors (store, snapshot and command failures)
//!
//! Geometry queries themselves never fail; they report "pending" or "empty"
//! through [`crate::geometry::Extent`]. The types here cover the remaining
//! genuinely exceptional paths. All error types use `thiserror`.

use thiserror::Error;

/// Geometry error type
///
/// Raised when stored geometry cannot be accepted, for example when a
/// snapshot carries non-finite coordinates outside a pen gap marker.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// A coordinate or size is NaN or infinite
    #[error("Non-finite {field} on stroke {id}")]
    NonFinite {
        /// The stroke id.
        id: String,
        /// The offending field name.
        field: String,
    },

    /// A polygon was committed with too few vertices
    #[error("Polygon needs at least 3 vertices, got {count}")]
    TooFewVertices {
        /// Number of committed vertices.
        count: usize,
    },
}

/// Color error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ColorError {
    /// The value is not a recognised color notation
    #[error("Invalid color '{value}'")]
    Invalid {
        /// The rejected input.
        value: String,
    },
}

/// Font error type
///
/// Represents failures while resolving a font family to glyph outlines.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FontError {
    /// No source knows the requested family
    #[error("Font family '{family}' not found")]
    NotFound {
        /// The requested family name.
        family: String,
    },

    /// Font bytes were found but could not be parsed
    #[error("Failed to parse font '{family}': {reason}")]
    Parse {
        /// The family being loaded.
        family: String,
        /// Parser diagnostic.
        reason: String,
    },

    /// Reading the font file failed
    #[error("Failed to read font '{family}': {reason}")]
    Io {
        /// The family being loaded.
        family: String,
        /// The underlying I/O message.
        reason: String,
    },
}

/// Import error type
///
/// Represents embedded vector markup that cannot be used at all. Markup with
/// merely missing or malformed dimensions is accepted with default sizes.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ImportError {
    /// Input was empty after sanitizing
    #[error("Embedded markup is empty")]
    Empty,

    /// No `<svg>` root element present
    #[error("No <svg> root element found")]
    MissingRoot,
}

/// Export error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExportError {
    /// No visible stroke has finite bounds
    #[error("Nothing to export: no visible content with finite bounds")]
    NothingToExport,

    /// The raster surface could not be allocated
    #[error("Cannot allocate a {width}x{height} raster surface")]
    Surface {
        /// Requested width in pixels.
        width: u32,
        /// Requested height in pixels.
        height: u32,
    },

    /// Encoding the output failed
    #[error("Failed to encode output: {reason}")]
    Encode {
        /// Encoder diagnostic.
        reason: String,
    },
}

/// Document error type
///
/// Represents failures of document-level commands and snapshot restore.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DocumentError {
    /// No stroke with this id exists
    #[error("Unknown stroke {id}")]
    UnknownStroke {
        /// The missing id.
        id: String,
    },

    /// The stroke exists but has a different kind than the command needs
    #[error("Stroke {id} is not a {expected} stroke")]
    WrongKind {
        /// The stroke id.
        id: String,
        /// The expected kind name.
        expected: String,
    },

    /// Snapshot version is not understood
    #[error("Unsupported snapshot version {version}")]
    UnsupportedVersion {
        /// The version found in the snapshot.
        version: u32,
    },

    /// Snapshot ids are not unique
    #[error("Duplicate stroke id {id} in snapshot")]
    DuplicateId {
        /// The repeated id.
        id: String,
    },

    /// Snapshot (de)serialization failed
    #[error("Snapshot format error: {reason}")]
    Format {
        /// Serializer diagnostic.
        reason: String,
    },

    /// A persisted stroke carries unusable geometry
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

/// Main error type for Vellum
///
/// A unified error type that can represent any error from all layers.
/// This is the primary error type used in public APIs.
#[derive(Error, Debug)]
pub enum Error {
    /// Geometry error
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// Color error
    #[error(transparent)]
    Color(#[from] ColorError),

    /// Font error
    #[error(transparent)]
    Font(#[from] FontError),

    /// Import error
    #[error(transparent)]
    Import(#[from] ImportError),

    /// Export error
    #[error(transparent)]
    Export(#[from] ExportError),

    /// Document error
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is the "nothing to export" condition
    pub fn is_nothing_to_export(&self) -> bool {
        matches!(self, Error::Export(ExportError::NothingToExport))
    }

    /// Check if this is a font error
    pub fn is_font_error(&self) -> bool {
        matches!(self, Error::Font(_))
    }

    /// Check if this is a document error
    pub fn is_document_error(&self) -> bool {
        matches!(self, Error::Document(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
