//! Error types for the EAD library.

use thiserror::Error;

/// Errors that can occur when working with EAD data.
#[derive(Error, Debug)]
pub enum Error {
    /// XML parsing error
    #[error("XML parsing error: {0}")]
    XmlParse(#[from] quick_xml::Error),

    /// XML attribute parsing error
    #[error("XML attribute error: {0}")]
    XmlAttribute(#[from] quick_xml::events::attributes::AttrError),

    /// A rich-text fragment could not be decoded
    #[error("Unable to decode markup: {0}")]
    Decode(String),

    /// The document is not a well-formed XML tree
    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    /// Missing required field
    #[error("Missing required field: {0}")]
    MissingField(String),

    /// Unexpected XML element
    #[error("Unexpected XML element: {0}")]
    UnexpectedElement(String),

    /// Relator code with no authoritative label
    #[error("Unknown relator code \"{0}\"")]
    UnknownRelator(String),

    /// Unrecognized level value
    #[error("Invalid level value: {0}")]
    InvalidLevel(String),

    /// Schema validation could not be performed
    #[error("Validation error: {0}")]
    Validation(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// UTF-8 conversion error
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// JSON encoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for EAD operations.
pub type Result<T> = std::result::Result<T, Error>;
