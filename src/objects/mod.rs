//! EAD object types.
//!
//! This module contains the core data structures for representing an
//! Encoded Archival Description finding aid:
//!
//! - [`Ead`] - The root document container
//! - [`Component`] - A unit of description (`<archdesc>`, `<c>`)
//! - [`Did`] - Descriptive identification of a unit
//! - [`Container`] - A physical storage location
//! - [`DigitalObject`] - A link to a digital surrogate
//! - [`Note`] - A formatted note with ordered content
//!
//! Also provides common types:
//! - [`Markup`] - Raw rich-text content
//! - [`Level`] - Level of description

mod common;
mod component;
mod container;
mod dao;
mod did;
mod ead;
mod note;

pub use common::{
    Level, Markup, PubInfo, RunInfo, INTERNAL_UNITID_TYPE, XMLNS_EAD, XMLNS_XLINK,
};
pub use component::{
    descendants, AccessTerm, Component, ComponentRef, ACCESS_TERM_ELEMENTS,
};
pub use container::Container;
pub use dao::{DaoCategory, DaoRef, DigitalObject};
pub use did::{Did, Extent, NameEntry, NameKind, Origination, PhysDesc, UnitDate, UnitId};
pub use ead::{flatten_title_proper, Ead, EadHeader, EadId, TitleProper};
pub use note::{
    ChronItem, ChronList, DefItem, List, Note, NoteChild, NoteChildKind, NOTE_ELEMENTS,
};
