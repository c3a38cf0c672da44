//! EAD reader.
//!
//! Builds the typed [`Ead`] model from a parsed [`Document`]. This is the
//! first phase of processing: rich-text fields keep their raw inner markup
//! and nothing is flattened or derived yet.
//!
//! The reader is permissive. Elements it does not model are skipped, and an
//! unrecognized `level` value is logged and dropped rather than rejected.
//!
//! # Example
//!
//! ```rust
//! use ead_rs::reader::parse_str;
//!
//! let ead = parse_str(r#"<ead xmlns="urn:isbn:1-931666-22-9">
//!   <eadheader><eadid>mc_100</eadid></eadheader>
//!   <archdesc level="collection">
//!     <did><unittitle>Papers</unittitle></did>
//!     <dsc><c01 id="s1" level="series"/></dsc>
//!   </archdesc>
//! </ead>"#).unwrap();
//!
//! assert_eq!(ead.eadid(), Some("mc_100"));
//! assert_eq!(ead.component_count(), 1);
//! ```

use crate::document::{Document, NodeId, NodeKind};
use crate::error::{Error, Result};
use crate::objects::{
    AccessTerm, ChronItem, ChronList, Component, ComponentRef, Container, DefItem, Did,
    DigitalObject, Ead, EadHeader, EadId, Extent, List, Markup, NameEntry, NameKind, Note,
    NoteChild, NoteChildKind, Origination, PhysDesc, TitleProper, UnitDate, UnitId,
    ACCESS_TERM_ELEMENTS, NOTE_ELEMENTS,
};
use quick_xml::escape::unescape;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, warn};

/// Parses an EAD document from a buffered reader.
pub fn parse<R: BufRead>(reader: R) -> Result<Ead> {
    let doc = Document::parse(reader)?;
    from_document(&doc)
}

/// Parses an EAD document from a string.
pub fn parse_str(xml: &str) -> Result<Ead> {
    parse(xml.as_bytes())
}

/// Parses an EAD document from a file.
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Ead> {
    let file = File::open(path)?;
    parse(BufReader::new(file))
}

/// Builds the typed model from a parsed document.
pub fn from_document(doc: &Document) -> Result<Ead> {
    EadReader::new(doc).read()
}

/// Returns true for `<c>` and the numbered `<c01>` to `<c12>` elements.
pub fn is_component_element(local_name: &str) -> bool {
    match local_name.strip_prefix('c') {
        Some("") => true,
        Some(digits) if digits.len() == 2 => digits
            .parse::<u8>()
            .is_ok_and(|depth| (1..=12).contains(&depth)),
        _ => false,
    }
}

/// Walks a [`Document`] and builds the typed model.
pub struct EadReader<'a> {
    doc: &'a Document,
}

impl<'a> EadReader<'a> {
    /// Creates a reader over a parsed document.
    pub fn new(doc: &'a Document) -> Self {
        Self { doc }
    }

    /// Reads the whole finding aid.
    pub fn read(&self) -> Result<Ead> {
        let root = self.doc.root();
        let root_name = self.name(root);
        if root_name != "ead" {
            return Err(Error::UnexpectedElement(format!(
                "expected <ead> as the root element, found <{}>",
                root_name
            )));
        }

        let mut ead = Ead::new();
        for child in self.doc.child_elements(root) {
            match self.name(child) {
                "eadheader" => ead.header = self.read_header(child)?,
                "archdesc" => ead.archdesc = Some(self.read_component(child)?),
                _ => {}
            }
        }

        debug!(
            eadid = ead.eadid().unwrap_or_default(),
            components = ead.component_count(),
            "read finding aid"
        );
        Ok(ead)
    }

    fn read_header(&self, node: NodeId) -> Result<EadHeader> {
        let mut header = EadHeader::default();
        for child in self.doc.child_elements(node) {
            match self.name(child) {
                "eadid" => {
                    header.eadid = Some(EadId {
                        country_code: self.attr(child, "countrycode"),
                        main_agency_code: self.attr(child, "mainagencycode"),
                        url: self.attr(child, "url"),
                        value: self.doc.text_content(child)?,
                    });
                }
                "filedesc" => self.read_file_desc(child, &mut header)?,
                _ => {}
            }
        }
        Ok(header)
    }

    fn read_file_desc(&self, node: NodeId, header: &mut EadHeader) -> Result<()> {
        for stmt in self.doc.child_elements(node) {
            match self.name(stmt) {
                "titlestmt" => {
                    for child in self.doc.child_elements(stmt) {
                        match self.name(child) {
                            "titleproper" => header.title_proper.push(TitleProper {
                                title_type: self.attr(child, "type"),
                                value: self.markup(child)?,
                            }),
                            "author" => header.authors.push(self.doc.text_content(child)?),
                            _ => {}
                        }
                    }
                }
                "publicationstmt" => {
                    if let Some(publisher) = self.doc.first_child_named(stmt, "publisher") {
                        header.publisher = Some(self.doc.text_content(publisher)?);
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn read_component(&self, node: NodeId) -> Result<ComponentRef> {
        let mut component = Component::new();
        component.id = self.attr(node, "id");
        component.other_level = self.attr(node, "otherlevel");
        if let Some(level) = self.doc.element(node).and_then(|e| e.attribute("level")) {
            match level.parse() {
                Ok(level) => component.level = Some(level),
                Err(_) => warn!(
                    value = level,
                    id = component.id.as_deref().unwrap_or_default(),
                    "ignoring unrecognized level"
                ),
            }
        }

        for child in self.doc.child_elements(node) {
            let name = self.name(child);
            match name {
                "did" => component.did = self.read_did(child)?,
                "dsc" => {
                    let intro = self.read_note(child)?;
                    if !intro.is_empty() {
                        component.dsc = Some(intro);
                    }
                    for c in self.doc.child_elements(child) {
                        if is_component_element(self.name(c)) {
                            component.append_child(self.read_component(c)?);
                        }
                    }
                }
                "controlaccess" => self.read_control_access(child, &mut component.control_access)?,
                name if is_component_element(name) => {
                    component.append_child(self.read_component(child)?);
                }
                name if NOTE_ELEMENTS.contains(&name) => {
                    component.notes.push(self.read_note(child)?);
                }
                _ => {}
            }
        }

        Ok(component.into_ref())
    }

    fn read_did(&self, node: NodeId) -> Result<Did> {
        let mut did = Did::new();
        for child in self.doc.child_elements(node) {
            match self.name(child) {
                "unittitle" => did.unit_title.push(self.markup(child)?),
                "unitid" => did.unit_id.push(UnitId {
                    id_type: self.attr(child, "type"),
                    value: self.doc.text_content(child)?,
                }),
                "unitdate" => did.unit_date.push(UnitDate {
                    normal: self.attr(child, "normal"),
                    date_type: self.attr(child, "type"),
                    value: self.doc.text_content(child)?,
                }),
                "abstract" => did.abstracts.push(self.markup(child)?),
                "physdesc" => did.phys_desc.push(self.read_phys_desc(child)?),
                "container" => did.containers.push(Container {
                    id: self.attr(child, "id"),
                    parent: self.attr(child, "parent"),
                    container_type: self.attr(child, "type"),
                    label: self.attr(child, "label"),
                    alt_render: self.attr(child, "altrender"),
                    value: self.doc.text_content(child)?,
                }),
                "origination" => did.origination.push(Origination {
                    label: self.attr(child, "label"),
                    names: self.read_names(child)?,
                }),
                "physloc" => did.phys_loc.push(self.doc.text_content(child)?),
                "langmaterial" => did.lang_material.push(self.doc.text_content(child)?),
                "repository" => did.repository.extend(self.read_names(child)?),
                "dao" => {
                    did.append_dao(self.read_dao(child)?);
                }
                _ => {}
            }
        }
        Ok(did)
    }

    fn read_phys_desc(&self, node: NodeId) -> Result<PhysDesc> {
        let mut phys_desc = PhysDesc {
            value: self.direct_text(node)?,
            ..Default::default()
        };
        for extent in self.doc.child_elements_named(node, "extent") {
            phys_desc.extents.push(Extent {
                unit: self.attr(extent, "unit"),
                value: self.doc.text_content(extent)?,
            });
        }
        Ok(phys_desc)
    }

    fn read_names(&self, node: NodeId) -> Result<Vec<NameEntry>> {
        let mut names = Vec::new();
        for child in self.doc.child_elements(node) {
            if let Some(kind) = NameKind::from_element(self.name(child)) {
                names.push(NameEntry {
                    kind,
                    role: self.attr(child, "role"),
                    value: self.markup(child)?,
                });
            }
        }
        Ok(names)
    }

    fn read_dao(&self, node: NodeId) -> Result<DigitalObject> {
        let mut dao = DigitalObject::new();
        dao.href = self.attr(node, "href");
        dao.role = self.attr(node, "role");
        dao.title = self.attr(node, "title");
        dao.show = self.attr(node, "show");
        dao.actuate = self.attr(node, "actuate");
        if let Some(desc) = self.doc.first_child_named(node, "daodesc") {
            dao.description = Some(self.markup(desc)?);
        }
        Ok(dao)
    }

    fn read_note(&self, node: NodeId) -> Result<Note> {
        let mut note = Note::new(self.name(node));
        note.id = self.attr(node, "id");
        note.audience = self.attr(node, "audience");
        for child in self.doc.child_elements(node) {
            let Some(kind) = NoteChildKind::for_element(self.name(child)) else {
                continue;
            };
            note.push(match kind {
                NoteChildKind::Head => NoteChild::Head(self.markup(child)?),
                NoteChildKind::Paragraph => NoteChild::Paragraph(self.markup(child)?),
                NoteChildKind::BibRef => NoteChild::BibRef(self.markup(child)?),
                NoteChildKind::LegalStatus => NoteChild::LegalStatus(self.markup(child)?),
                NoteChildKind::List => NoteChild::List(self.read_list(child)?),
                NoteChildKind::ChronList => NoteChild::ChronList(self.read_chron_list(child)?),
                NoteChildKind::DefItem => NoteChild::DefItem(self.read_def_item(child)?),
                NoteChildKind::Note => NoteChild::Note(self.read_note(child)?),
            });
        }
        Ok(note)
    }

    fn read_list(&self, node: NodeId) -> Result<List> {
        let mut list = List {
            head: self.first_markup(node, "head")?,
            ..Default::default()
        };
        for child in self.doc.child_elements(node) {
            if matches!(self.name(child), "item" | "defitem") {
                list.items.push(self.markup(child)?);
            }
        }
        Ok(list)
    }

    fn read_chron_list(&self, node: NodeId) -> Result<ChronList> {
        let mut list = ChronList {
            head: self.first_markup(node, "head")?,
            ..Default::default()
        };
        for entry in self.doc.child_elements_named(node, "chronitem") {
            let mut item = ChronItem {
                date: self.first_markup(entry, "date")?,
                ..Default::default()
            };
            for child in self.doc.child_elements(entry) {
                match self.name(child) {
                    "event" => item.events.push(self.markup(child)?),
                    "eventgrp" => {
                        for event in self.doc.child_elements_named(child, "event") {
                            item.events.push(self.markup(event)?);
                        }
                    }
                    _ => {}
                }
            }
            list.items.push(item);
        }
        Ok(list)
    }

    fn read_def_item(&self, node: NodeId) -> Result<DefItem> {
        Ok(DefItem {
            label: self.first_markup(node, "label")?,
            item: self.first_markup(node, "item")?,
        })
    }

    fn read_control_access(&self, node: NodeId, terms: &mut Vec<AccessTerm>) -> Result<()> {
        for child in self.doc.child_elements(node) {
            let name = self.name(child);
            if name == "controlaccess" {
                self.read_control_access(child, terms)?;
            } else if ACCESS_TERM_ELEMENTS.contains(&name) {
                terms.push(AccessTerm {
                    kind: name.to_string(),
                    role: self.attr(child, "role"),
                    source: self.attr(child, "source"),
                    value: self.markup(child)?,
                });
            }
        }
        Ok(())
    }

    fn name(&self, node: NodeId) -> &'a str {
        self.doc.local_name(node).unwrap_or_default()
    }

    fn attr(&self, node: NodeId, name: &str) -> Option<String> {
        self.doc
            .element(node)
            .and_then(|e| e.attribute(name))
            .map(str::to_string)
    }

    fn markup(&self, node: NodeId) -> Result<Markup> {
        Ok(Markup::new(self.doc.inner_xml(node)?))
    }

    fn first_markup(&self, node: NodeId, local_name: &str) -> Result<Option<Markup>> {
        self.doc
            .first_child_named(node, local_name)
            .map(|child| self.markup(child))
            .transpose()
    }

    /// Character data directly inside `node`, excluding child elements.
    fn direct_text(&self, node: NodeId) -> Result<String> {
        let mut text = String::new();
        for child in self.doc.children(node) {
            match self.doc.kind(*child) {
                NodeKind::Text(raw) => {
                    let value =
                        unescape(raw).map_err(|err| Error::MalformedDocument(err.to_string()))?;
                    text.push_str(&value);
                }
                NodeKind::CData(data) => text.push_str(data),
                _ => {}
            }
        }
        Ok(text)
    }
}

/// A small but complete finding aid used by tests across the crate.
#[cfg(test)]
pub(crate) const SAMPLE_EAD: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ead xmlns="urn:isbn:1-931666-22-9" xmlns:xlink="http://www.w3.org/1999/xlink">
  <eadheader>
    <eadid countrycode="US" mainagencycode="US-NNU">mc_100</eadid>
    <filedesc>
      <titlestmt>
        <titleproper type="filing">Omega, Mos, Papers</titleproper>
        <titleproper>Guide to the <emph render="italic">Mos</emph> Omega Papers</titleproper>
        <author>Finding aid prepared by A. Archivist</author>
      </titlestmt>
      <publicationstmt>
        <publisher>Fales Library and Special Collections</publisher>
      </publicationstmt>
    </filedesc>
  </eadheader>
  <archdesc level="collection">
    <did>
      <repository>
        <corpname>Fales Library and Special Collections</corpname>
      </repository>
      <origination label="Creator">
        <persname role="cre">Omega, Mos</persname>
      </origination>
      <unittitle>Mos Omega Papers</unittitle>
      <unitid>MC.100</unitid>
      <unitid type="aspace_uri">/repositories/2/resources/1</unitid>
      <unitdate normal="1900/1950" type="inclusive">1900-1950</unitdate>
      <physdesc><extent unit="linear feet">2</extent></physdesc>
      <physdesc>
      </physdesc>
      <abstract>Letters,
        photographs and <emph render="bold">ephemera</emph>.</abstract>
      <langmaterial>English</langmaterial>
    </did>
    <scopecontent id="scope1">
      <head>Scope and Contents</head>
      <p>Correspondence<lb/>and diaries.</p>
    </scopecontent>
    <bioghist audience="internal">
      <p>Internal note.</p>
    </bioghist>
    <controlaccess>
      <subject source="lcsh">Poets</subject>
      <controlaccess>
        <corpname role="pht">Studio A</corpname>
      </controlaccess>
    </controlaccess>
    <dsc>
      <c01 id="s1" level="series">
        <did><unittitle>Correspondence</unittitle></did>
        <c02 id="f1" level="file">
          <did>
            <unittitle>Letters, 1900</unittitle>
            <container id="b1" type="Box" label="Mixed Materials [32101081442384]">1</container>
            <container id="f1c" parent="b1" type="Folder">2</container>
          </did>
        </c02>
        <c02 id="f2" level="file">
          <did>
            <unittitle>Photographs</unittitle>
            <dao xlink:href="https://hdl.handle.net/2333.1/abc" xlink:role="image-service" xlink:title="Photographs">
              <daodesc><p>Photographs, 1920</p></daodesc>
            </dao>
          </did>
        </c02>
        <c02 id="s1a" level="subseries">
          <did><unittitle>Drafts</unittitle></did>
        </c02>
      </c01>
      <c01 id="f3" level="file">
        <did><unittitle>Ephemera</unittitle></did>
      </c01>
      <c01 id="f4" level="volume">
        <did><unittitle>Scrapbook</unittitle></did>
      </c01>
    </dsc>
  </archdesc>
</ead>
"#;
