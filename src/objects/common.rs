//! Common types shared across EAD objects.
//!
//! This module contains foundational types used throughout the model:
//! - [`Markup`] - Raw inner markup of a rich-text field
//! - [`Level`] - The level classification of a unit of description
//! - [`RunInfo`] and [`PubInfo`] - Processing metadata carried into output

use crate::error::{Error, Result};
use crate::markup::{plain_text, transcode, LineBreakMode};
use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// EAD Namespaces and Constants
// ============================================================================

/// EAD 2002 namespace
pub const XMLNS_EAD: &str = "urn:isbn:1-931666-22-9";

/// XLink namespace
pub const XMLNS_XLINK: &str = "http://www.w3.org/1999/xlink";

/// `unitid@type` marking the internal collection identifier
pub const INTERNAL_UNITID_TYPE: &str = "aspace_uri";

// ============================================================================
// Rich Text
// ============================================================================

/// The raw inner markup of a rich-text field.
///
/// The flattened form is produced on demand with [`Markup::flatten`]; the
/// model itself is never rewritten with derived values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Markup(String);

impl Markup {
    /// Wraps raw inner markup.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Returns the raw inner markup.
    pub fn raw(&self) -> &str {
        &self.0
    }

    /// Returns true if the markup holds nothing but whitespace.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Flattens the markup into annotated text.
    pub fn flatten(&self, mode: LineBreakMode) -> Result<String> {
        transcode(&self.0, mode)
    }

    /// Returns the character data with all markup removed.
    pub fn plain_text(&self) -> Result<String> {
        plain_text(&self.0)
    }
}

impl From<&str> for Markup {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for Markup {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

// ============================================================================
// Levels
// ============================================================================

/// The `level` attribute of `<archdesc>` and `<c>` elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    /// class
    Class,
    /// collection
    Collection,
    /// file
    File,
    /// fonds
    Fonds,
    /// item
    Item,
    /// otherlevel (see `otherlevel` attribute)
    OtherLevel,
    /// recordgrp
    RecordGrp,
    /// series
    Series,
    /// subfonds
    SubFonds,
    /// subgrp
    SubGrp,
    /// subseries
    SubSeries,
    /// Synthetic wrapper created for presentation grouping
    Presentation,
}

impl Level {
    /// Returns the attribute value for this level.
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Class => "class",
            Level::Collection => "collection",
            Level::File => "file",
            Level::Fonds => "fonds",
            Level::Item => "item",
            Level::OtherLevel => "otherlevel",
            Level::RecordGrp => "recordgrp",
            Level::Series => "series",
            Level::SubFonds => "subfonds",
            Level::SubGrp => "subgrp",
            Level::SubSeries => "subseries",
            Level::Presentation => "dl-presentation",
        }
    }
}

impl FromStr for Level {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "class" => Ok(Level::Class),
            "collection" => Ok(Level::Collection),
            "file" => Ok(Level::File),
            "fonds" => Ok(Level::Fonds),
            "item" => Ok(Level::Item),
            "otherlevel" => Ok(Level::OtherLevel),
            "recordgrp" => Ok(Level::RecordGrp),
            "series" => Ok(Level::Series),
            "subfonds" => Ok(Level::SubFonds),
            "subgrp" => Ok(Level::SubGrp),
            "subseries" => Ok(Level::SubSeries),
            "dl-presentation" => Ok(Level::Presentation),
            other => Err(Error::InvalidLevel(other.to_string())),
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Processing Metadata
// ============================================================================

/// Data about the parsing/output run that produced a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunInfo {
    /// Version of this library
    pub lib_version: String,
    /// When the run happened
    pub timestamp: DateTime<Utc>,
    /// The EAD file that was processed
    pub source_file: String,
}

impl RunInfo {
    /// Creates run info for the given library version, time and source.
    pub fn new(
        lib_version: impl Into<String>,
        timestamp: DateTime<Utc>,
        source_file: impl Into<String>,
    ) -> Self {
        Self {
            lib_version: lib_version.into(),
            timestamp,
            source_file: source_file.into(),
        }
    }

    /// Run info for this library version, stamped now.
    pub fn now(source_file: impl Into<String>) -> Self {
        Self::new(crate::VERSION, Utc::now(), source_file)
    }
}

/// Data used by the publication system.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PubInfo {
    /// Presentation theme identifier
    pub theme_id: String,
}

impl PubInfo {
    /// Creates publication info for a theme.
    pub fn new(theme_id: impl Into<String>) -> Self {
        Self {
            theme_id: theme_id.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_level_round_trip_names() {
        for name in ["collection", "series", "otherlevel", "dl-presentation", "file"] {
            let level: Level = name.parse().unwrap();
            assert_eq!(level.as_str(), name);
        }
        assert_eq!(" item ".parse::<Level>().unwrap(), Level::Item);
    }

    #[test]
    fn test_level_unknown() {
        let err = "volume".parse::<Level>().unwrap_err();
        assert!(err.to_string().contains("volume"));
    }

    #[test]
    fn test_markup_flatten() {
        let markup = Markup::new("Letters,\n   <emph render=\"italic\">1900</emph>");
        assert_eq!(
            markup.flatten(LineBreakMode::Prose).unwrap(),
            "Letters, <span class=\"ead-emph ead-emph-italic\">1900</span>"
        );
        assert!(!markup.is_blank());
        assert!(Markup::new(" \n ").is_blank());
    }

    #[test]
    fn test_run_info() {
        let when = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
        let info = RunInfo::new("0.1.0", when, "/a/very/fine/path/to/an/ead.xml");
        assert_eq!(info.lib_version, "0.1.0");
        assert_eq!(info.timestamp.to_rfc3339(), "2024-01-15T10:30:00+00:00");
        assert_eq!(info.source_file, "/a/very/fine/path/to/an/ead.xml");

        let now = RunInfo::now("x.xml");
        assert_eq!(now.lib_version, crate::VERSION);
    }

    #[test]
    fn test_pub_info() {
        let info = PubInfo::new("cdf80c84-2655-4a01-895d-fbf9a374c1df");
        assert_eq!(info.theme_id, "cdf80c84-2655-4a01-895d-fbf9a374c1df");
        assert_eq!(PubInfo::default().theme_id, "");
    }
}
