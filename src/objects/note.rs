//! Formatted notes (`<scopecontent>`, `<bioghist>`, ...) and their content.
//!
//! A note keeps its children in document order. Each child is resolved by
//! element name through [`NoteChildKind::for_element`]; elements outside the
//! table are not part of the note's content.

use crate::objects::common::Markup;

/// Element names parsed as formatted notes.
pub const NOTE_ELEMENTS: &[&str] = &[
    "accessrestrict",
    "accruals",
    "acqinfo",
    "altformavail",
    "appraisal",
    "arrangement",
    "bibliography",
    "bioghist",
    "custodhist",
    "fileplan",
    "materialspec",
    "odd",
    "originalsloc",
    "otherfindaid",
    "phystech",
    "prefercite",
    "processinfo",
    "relatedmaterial",
    "scopecontent",
    "separatedmaterial",
    "userestrict",
];

/// The kind of a note child, selected by element name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteChildKind {
    /// `<head>`
    Head,
    /// `<p>`
    Paragraph,
    /// `<bibref>`
    BibRef,
    /// `<list>`
    List,
    /// `<chronlist>`
    ChronList,
    /// `<defitem>`
    DefItem,
    /// `<legalstatus>`
    LegalStatus,
    /// A nested formatted note
    Note,
}

impl NoteChildKind {
    /// Resolves the kind for an element local name, or `None` if the element
    /// is not note content.
    pub fn for_element(local_name: &str) -> Option<Self> {
        let kind = match local_name {
            "head" => NoteChildKind::Head,
            "p" => NoteChildKind::Paragraph,
            "bibref" => NoteChildKind::BibRef,
            "list" => NoteChildKind::List,
            "chronlist" => NoteChildKind::ChronList,
            "defitem" => NoteChildKind::DefItem,
            "legalstatus" => NoteChildKind::LegalStatus,
            name if NOTE_ELEMENTS.contains(&name) => NoteChildKind::Note,
            _ => return None,
        };
        Some(kind)
    }
}

/// A `<list>`.
///
/// `<defitem>` entries of a definition list are kept as items holding their
/// raw `<label>` and `<item>` markup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct List {
    /// `<head>`
    pub head: Option<Markup>,
    /// `<item>` (and `<defitem>`) entries in order
    pub items: Vec<Markup>,
}

/// One `<chronitem>`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChronItem {
    /// `<date>`
    pub date: Option<Markup>,
    /// `<event>` entries, including those of an `<eventgrp>`
    pub events: Vec<Markup>,
}

/// A `<chronlist>`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChronList {
    /// `<head>`
    pub head: Option<Markup>,
    /// Entries in order
    pub items: Vec<ChronItem>,
}

/// A `<defitem>`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefItem {
    /// `<label>`
    pub label: Option<Markup>,
    /// `<item>`
    pub item: Option<Markup>,
}

/// One piece of note content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteChild {
    /// `<head>`
    Head(Markup),
    /// `<p>`
    Paragraph(Markup),
    /// `<bibref>`
    BibRef(Markup),
    /// `<list>`
    List(List),
    /// `<chronlist>`
    ChronList(ChronList),
    /// `<defitem>`
    DefItem(DefItem),
    /// `<legalstatus>`
    LegalStatus(Markup),
    /// A nested formatted note
    Note(Note),
}

/// A formatted note such as `<scopecontent>` or `<bioghist>`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Note {
    /// Element name (e.g., "scopecontent")
    pub name: String,
    /// `@id`
    pub id: Option<String>,
    /// `@audience`
    pub audience: Option<String>,
    /// Content in document order
    pub children: Vec<NoteChild>,
}

impl Note {
    /// Creates an empty note for an element name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Appends a content child.
    pub fn push(&mut self, child: NoteChild) {
        self.children.push(child);
    }

    /// Appends a paragraph.
    pub fn with_paragraph(mut self, paragraph: impl Into<Markup>) -> Self {
        self.push(NoteChild::Paragraph(paragraph.into()));
        self
    }

    /// Returns the `<head>` children in order.
    pub fn heads(&self) -> impl Iterator<Item = &Markup> {
        self.children.iter().filter_map(|child| match child {
            NoteChild::Head(head) => Some(head),
            _ => None,
        })
    }

    /// Returns the `<p>` children in order.
    pub fn paragraphs(&self) -> impl Iterator<Item = &Markup> {
        self.children.iter().filter_map(|child| match child {
            NoteChild::Paragraph(p) => Some(p),
            _ => None,
        })
    }

    /// Returns true if the note has no content.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_kind_table() {
        assert_eq!(NoteChildKind::for_element("head"), Some(NoteChildKind::Head));
        assert_eq!(NoteChildKind::for_element("p"), Some(NoteChildKind::Paragraph));
        assert_eq!(NoteChildKind::for_element("list"), Some(NoteChildKind::List));
        assert_eq!(NoteChildKind::for_element("chronlist"), Some(NoteChildKind::ChronList));
        assert_eq!(NoteChildKind::for_element("defitem"), Some(NoteChildKind::DefItem));
        assert_eq!(NoteChildKind::for_element("legalstatus"), Some(NoteChildKind::LegalStatus));
        assert_eq!(NoteChildKind::for_element("bioghist"), Some(NoteChildKind::Note));
        assert_eq!(NoteChildKind::for_element("bibliography"), Some(NoteChildKind::Note));
        assert_eq!(NoteChildKind::for_element("c01"), None);
        assert_eq!(NoteChildKind::for_element("did"), None);
    }

    #[test]
    fn test_note_builder() {
        let mut note = Note::new("scopecontent").with_paragraph("First");
        note.push(NoteChild::Head(Markup::new("Scope")));
        note.push(NoteChild::List(List::default()));
        note = note.with_paragraph("Second");

        assert_eq!(note.name, "scopecontent");
        assert_eq!(note.children.len(), 4);
        let paragraphs: Vec<&str> = note.paragraphs().map(Markup::raw).collect();
        assert_eq!(paragraphs, ["First", "Second"]);
        assert_eq!(note.heads().count(), 1);
        assert!(!note.is_empty());
        assert!(Note::new("odd").is_empty());
    }
}
