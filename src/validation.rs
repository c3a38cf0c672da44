//! XSD validation for EAD documents.
//!
//! Checks a finding aid against the EAD 2002 XML Schema. Problems with the
//! document are returned as diagnostics; problems with the schema itself
//! (missing file, unparseable XSD) are returned as errors.
//!
//! # Requirements
//!
//! This module requires the `validation` feature to be enabled and depends on
//! libxml2 being installed on the system.
//!
//! **Ubuntu/Debian:**
//! ```bash
//! sudo apt-get install libxml2-dev
//! ```
//!
//! **macOS:**
//! ```bash
//! brew install libxml2
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use ead_rs::validation::validate_file;
//!
//! let diagnostics = validate_file("mc_100.xml", None)?;
//! for line in &diagnostics {
//!     eprintln!("{}", line);
//! }
//! ```

use std::path::Path;

use libxml::parser::Parser;
use libxml::schemas::{SchemaParserContext, SchemaValidationContext};
use tracing::debug;

use crate::error::{Error, Result};
use crate::export::PARSE_FAILURE;
use crate::rules::invalid_xml_message;

/// Default path to the EAD schema file (relative to the crate root).
pub const DEFAULT_SCHEMA_PATH: &str = "schema/ead.xsd";

/// Context line preceding schema errors.
pub const SCHEMA_FAILURE: &str = "schema validation failed";

/// Validates an EAD document held in memory.
///
/// Returns an empty list if the document is valid. Otherwise the list starts
/// with the invalid-XML message and a context line, followed by one entry
/// per parser or schema error.
pub fn validate_bytes(xml: &[u8], schema_path: Option<&str>) -> Result<Vec<String>> {
    let mut context = load_schema(schema_path.unwrap_or(DEFAULT_SCHEMA_PATH))?;

    let doc = match Parser::default().parse_string(xml) {
        Ok(doc) => doc,
        Err(err) => {
            return Ok(vec![
                invalid_xml_message(),
                PARSE_FAILURE.to_string(),
                format!("{:?}", err),
            ]);
        }
    };

    match context.validate_document(&doc) {
        Ok(()) => Ok(Vec::new()),
        Err(errors) => {
            debug!(errors = errors.len(), "schema validation failed");
            let mut diagnostics = vec![invalid_xml_message(), SCHEMA_FAILURE.to_string()];
            diagnostics.extend(
                errors
                    .iter()
                    .map(|e| e.message.clone().unwrap_or_default().trim_end().to_string()),
            );
            Ok(diagnostics)
        }
    }
}

/// Validates an EAD file against the schema.
pub fn validate_file<P: AsRef<Path>>(xml_path: P, schema_path: Option<&str>) -> Result<Vec<String>> {
    let xml = std::fs::read(xml_path.as_ref()).map_err(|err| {
        Error::Io(std::io::Error::new(
            err.kind(),
            format!("XML file not found: {}", xml_path.as_ref().display()),
        ))
    })?;
    validate_bytes(&xml, schema_path)
}

fn load_schema(schema_path: &str) -> Result<SchemaValidationContext> {
    if !Path::new(schema_path).exists() {
        return Err(Error::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Schema file not found: {}", schema_path),
        )));
    }

    let mut schema_parser = SchemaParserContext::from_file(schema_path);
    SchemaValidationContext::from_parser(&mut schema_parser).map_err(|errors| {
        let msg = errors
            .iter()
            .map(|e| e.message.clone().unwrap_or_default())
            .collect::<Vec<_>>()
            .join("; ");
        Error::Validation(format!("Failed to parse schema: {}", msg))
    })
}
