//! Mixed-content markup transcoding.
//!
//! Rich-text EAD fields (`<p>`, `<unittitle>`, `<abstract>`, ...) carry inline
//! presentation elements such as `<emph>`, `<lb/>` and `<extref>`. This module
//! flattens the inner markup of one such field into an annotated string that
//! downstream consumers can style without understanding EAD.
//!
//! # Example
//!
//! ```rust
//! use ead_rs::markup::{transcode, LineBreakMode};
//!
//! let flat = transcode(
//!     r#"A <emph render="italic">fine</emph> day"#,
//!     LineBreakMode::Prose,
//! ).unwrap();
//! assert_eq!(flat, r#"A <span class="ead-emph ead-emph-italic">fine</span> day"#);
//! ```

use crate::error::{Error, Result};
use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use regex::Regex;
use std::fmt;
use std::str;
use std::sync::LazyLock;

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r+|\n+|\t+|( )+").expect("valid whitespace regex"));
static BRACKETED_TEXT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[.+\]").expect("valid bracketed text regex"));

/// Line break element handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineBreakMode {
    /// `<lb/>` becomes a `<br>` marker with no closing annotation.
    #[default]
    Prose,
    /// `<lb/>` is kept as a generic annotation pair (used for titles).
    Literal,
}

/// The decode rule selected for an element by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkupRule {
    /// Generic `ead-{name}` span
    Default,
    /// `<emph>`: span classed by the `render` attribute
    Emphasis,
    /// `<lb>`: line break
    LineBreak,
    /// `<extent>`: span with the `unit` attribute appended before closing
    Extent,
    /// `<extref>`: hyperlink
    ExternalReference,
}

impl MarkupRule {
    /// Resolves the rule for a lowercase element local name.
    ///
    /// Unknown elements always resolve to [`MarkupRule::Default`].
    pub fn for_element(local_name: &str) -> Self {
        match local_name {
            "emph" => MarkupRule::Emphasis,
            "lb" => MarkupRule::LineBreak,
            "extent" => MarkupRule::Extent,
            "extref" => MarkupRule::ExternalReference,
            _ => MarkupRule::Default,
        }
    }
}

/// What an open element emits when its end tag is reached.
#[derive(Debug)]
enum Closing {
    Span,
    Suppressed,
    Hyperlink,
    Extent(Option<String>),
}

/// Flattens one rich-text fragment into annotated text.
///
/// The fragment is the inner markup of a field, so it may mix character
/// data and any number of top-level elements. Returns [`Error::Decode`] if
/// the fragment is not well-formed; no partial output is produced.
pub fn transcode(fragment: &str, mode: LineBreakMode) -> Result<String> {
    let mut reader = Reader::from_str(fragment);
    reader.config_mut().expand_empty_elements = true;

    let mut output = String::with_capacity(fragment.len());
    let mut open: Vec<Closing> = Vec::new();

    loop {
        match reader.read_event().map_err(decode_error)? {
            Event::Start(ref e) => {
                let closing = open_element(e, mode, &mut output)?;
                open.push(closing);
            }
            Event::Empty(ref e) => {
                let closing = open_element(e, mode, &mut output)?;
                close_element(closing, &mut output);
            }
            Event::End(ref e) => {
                let closing = open.pop().ok_or_else(|| {
                    Error::Decode(format!(
                        "closing tag </{}> has no matching start tag",
                        String::from_utf8_lossy(e.name().as_ref())
                    ))
                })?;
                close_element(closing, &mut output);
            }
            Event::Text(ref e) => {
                let text = e.unescape().map_err(decode_error)?;
                push_character_data(&mut output, &text);
            }
            Event::CData(ref e) => {
                let text = str::from_utf8(e.as_ref()).map_err(decode_error)?;
                push_character_data(&mut output, text);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !open.is_empty() {
        return Err(Error::Decode(format!(
            "{} element(s) left unclosed at end of fragment",
            open.len()
        )));
    }

    Ok(cleanup_whitespace(&output))
}

fn open_element(e: &BytesStart<'_>, mode: LineBreakMode, output: &mut String) -> Result<Closing> {
    let local_name = e.local_name();
    let name = str::from_utf8(local_name.as_ref())
        .map_err(decode_error)?
        .to_lowercase();

    let closing = match MarkupRule::for_element(&name) {
        MarkupRule::Emphasis => {
            let render = attribute(e, "render")?.unwrap_or_default();
            output.push_str("<span class=\"ead-emph ead-emph-");
            output.push_str(&escape(render.as_str()));
            output.push_str("\">");
            Closing::Span
        }
        MarkupRule::LineBreak if mode == LineBreakMode::Prose => {
            output.push_str("<br>");
            Closing::Suppressed
        }
        MarkupRule::Extent => {
            push_default_open(output, &name);
            let unit = attribute(e, "unit")?.filter(|unit| !unit.is_empty());
            Closing::Extent(unit)
        }
        MarkupRule::ExternalReference => {
            let href = attribute(e, "href")?.unwrap_or_default();
            output.push_str("<a href=\"");
            output.push_str(&escape(href.as_str()));
            output.push('"');
            if let Some(target) = attribute(e, "show")?.as_deref().and_then(target_window) {
                output.push_str(" target=\"");
                output.push_str(target);
                output.push('"');
            }
            output.push('>');
            Closing::Hyperlink
        }
        MarkupRule::LineBreak | MarkupRule::Default => {
            push_default_open(output, &name);
            Closing::Span
        }
    };

    Ok(closing)
}

fn close_element(closing: Closing, output: &mut String) {
    match closing {
        Closing::Span => output.push_str("</span>"),
        Closing::Suppressed => {}
        Closing::Hyperlink => output.push_str("</a>"),
        Closing::Extent(unit) => {
            if let Some(unit) = unit {
                output.push(' ');
                output.push_str(&escape(unit.as_str()));
            }
            output.push_str("</span>");
        }
    }
}

/// Reduces one rich-text fragment to its character data.
///
/// Elements are dropped, `<lb/>` becomes a space, and whitespace is
/// collapsed. Returns [`Error::Decode`] if the fragment is not well-formed.
pub fn plain_text(fragment: &str) -> Result<String> {
    let mut reader = Reader::from_str(fragment);
    let mut output = String::with_capacity(fragment.len());
    let mut depth = 0usize;

    loop {
        match reader.read_event().map_err(decode_error)? {
            Event::Start(_) => depth += 1,
            Event::End(_) => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| Error::Decode("closing tag has no matching start tag".to_string()))?;
            }
            Event::Empty(ref e) if e.local_name().as_ref() == b"lb" => output.push(' '),
            Event::Text(ref e) => output.push_str(&e.unescape().map_err(decode_error)?),
            Event::CData(ref e) => output.push_str(str::from_utf8(e.as_ref()).map_err(decode_error)?),
            Event::Eof => break,
            _ => {}
        }
    }

    if depth > 0 {
        return Err(Error::Decode(format!(
            "{} element(s) left unclosed at end of fragment",
            depth
        )));
    }

    Ok(cleanup_whitespace(&output))
}

fn push_default_open(output: &mut String, name: &str) {
    output.push_str("<span class=\"ead-");
    output.push_str(name);
    output.push_str("\">");
}

fn push_character_data(output: &mut String, text: &str) {
    output.push_str(&text.replace('\n', " "));
}

/// Maps an xlink `show` value to an HTML target window.
fn target_window(show: &str) -> Option<&'static str> {
    match show {
        "new" => Some("_blank"),
        "replace" => Some("_self"),
        _ => None,
    }
}

/// Returns the unescaped value of the attribute with the given local name.
fn attribute(e: &BytesStart<'_>, name: &str) -> Result<Option<String>> {
    for attr in e.attributes() {
        let attr = attr.map_err(decode_error)?;
        if attr.key.local_name().as_ref() == name.as_bytes() {
            let value = attr.unescape_value().map_err(decode_error)?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

fn decode_error(err: impl fmt::Display) -> Error {
    Error::Decode(err.to_string())
}

/// Collapses every run of carriage returns, line feeds, tabs or spaces to a
/// single space and trims the result.
///
/// Normalizing an already-normalized string is a no-op.
pub fn cleanup_whitespace(s: &str) -> String {
    let collapsed = WHITESPACE_RUN.replace_all(s, " ");
    // A second pass merges the spaces left behind by adjacent runs of
    // different characters ("\r\n" becomes "  " after the first pass).
    let collapsed = WHITESPACE_RUN.replace_all(&collapsed, " ");
    collapsed.trim().to_string()
}

/// Removes bracketed text such as barcodes from a label.
pub fn remove_bracketed_text(s: &str) -> String {
    BRACKETED_TEXT.replace_all(s, "").into_owned()
}
