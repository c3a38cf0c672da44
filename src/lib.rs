//! Encoded Archival Description (EAD) library for Rust.
//!
//! This crate reads EAD 2002 finding aids into a typed description tree and
//! derives publication-ready records from it.
//!
//! # Features
//!
//! - **Core Types**: Finding aid headers, components, containers and digital
//!   objects with shared, mutable component nodes.
//! - **Reader**: Builds the typed model from a parsed document.
//! - **Markup Transcoding**: Flattens EAD rich text into HTML-like strings.
//! - **Output Records**: Serde records ready for JSON encoding, with optional
//!   grouping of consecutive item-level components.
//! - **Export Preparation**: Rewrites container hierarchies for discovery
//!   systems that expect them flat.
//! - **Publication Rules**: Business-rule checks with readable diagnostics.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use ead_rs::output::{JsonWriter, OutputConfig};
//! use ead_rs::reader::parse_file;
//!
//! let ead = parse_file("mc_100.xml").unwrap();
//! for component in ead.iter_components() {
//!     println!("{:?} {:?}", component.borrow().id, component.borrow().level);
//! }
//!
//! let writer = JsonWriter::with_config(OutputConfig::new().with_grouping(true));
//! println!("{}", writer.write_to_string(&ead).unwrap());
//! ```
//!
//! # Module Structure
//!
//! - [`objects`] - Core EAD data structures
//! - [`document`] - Mutable XML tree used by the reader and export
//! - [`reader`] - Typed model construction
//! - [`markup`] - Rich-text transcoding
//! - [`grouping`] - Presentation wrappers for item-level runs
//! - [`storage`] - Container hierarchy normalization
//! - [`census`] - Digital object census
//! - [`relators`] - MARC relator codes
//! - [`output`] - Output records and JSON encoding
//! - [`export`] - Export preparation
//! - [`rules`] - Publication rules
//! - [`error`] - Error types
//!
//! # Optional Features
//!
//! - `validation` - XSD validation through libxml2
//! - `cli` - Command-line tools

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod census;
pub mod document;
pub mod error;
pub mod export;
pub mod grouping;
pub mod markup;
pub mod objects;
pub mod output;
pub mod reader;
pub mod relators;
pub mod rules;
pub mod storage;

#[cfg(feature = "validation")]
pub mod validation;

// Re-export commonly used types at the crate root
pub use census::{census, DaoCensus};
pub use document::Document;
pub use error::{Error, Result};
pub use export::{prepare_for_export, prepare_xml_for_export};
pub use grouping::group_siblings;
pub use markup::{transcode, LineBreakMode};
pub use objects::{
    Component, ComponentRef, Container, DaoCategory, Did, DigitalObject, Ead, Level,
};
pub use output::{materialize, EadRecord, JsonWriter, OutputConfig};
pub use reader::{parse, parse_file, parse_str};
pub use rules::RuleSet;
pub use storage::{normalize, StorageNode};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
