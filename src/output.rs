//! JSON output of finding aids.
//!
//! Output is the second processing phase. [`materialize`] turns the typed
//! model into an [`EadRecord`], flattening every rich-text field with the
//! markup transcoder, and [`JsonWriter`] encodes that record. The model
//! itself is never modified; grouped presentation wrappers, flattened text
//! and relator labels exist only in the record.
//!
//! # Example
//!
//! ```rust
//! use ead_rs::output::{JsonWriter, OutputConfig};
//! use ead_rs::reader::parse_str;
//!
//! let ead = parse_str(r#"<ead>
//!   <archdesc level="collection">
//!     <did><unittitle>Papers of <emph render="italic">Mos</emph></unittitle></did>
//!   </archdesc>
//! </ead>"#).unwrap();
//!
//! let writer = JsonWriter::with_config(OutputConfig::compact());
//! let json = writer.write_to_string(&ead).unwrap();
//! assert!(json.contains(r#"ead-emph ead-emph-italic"#));
//! ```

use crate::error::Result;
use crate::grouping::group_siblings;
use crate::markup::{cleanup_whitespace, LineBreakMode};
use crate::objects::{
    flatten_title_proper, AccessTerm, ComponentRef, Container, DaoRef, Did, Ead, EadHeader, Level,
    Markup, NameEntry, Note, NoteChild, PhysDesc, PubInfo, RunInfo,
};
use crate::relators::authoritative_label;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;
use tracing::debug;

/// Configuration options for JSON output.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Whether to pretty-print the JSON
    pub pretty: bool,
    /// Whether to wrap runs of file/item siblings in presentation groups
    pub group_components: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            pretty: true,
            group_components: false,
        }
    }
}

impl OutputConfig {
    /// Creates a new configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a compact configuration (single-line JSON).
    pub fn compact() -> Self {
        Self {
            pretty: false,
            ..Self::default()
        }
    }

    /// Sets whether to pretty-print.
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Sets whether to apply presentation grouping.
    pub fn with_grouping(mut self, group_components: bool) -> Self {
        self.group_components = group_components;
        self
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

// ============================================================================
// Output Records
// ============================================================================

/// A finding aid ready for encoding.
#[derive(Debug, Clone, Serialize)]
pub struct EadRecord {
    /// Header metadata
    #[serde(rename = "eadheader")]
    pub header: HeaderRecord,
    /// The archival description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archdesc: Option<ComponentRecord>,
    /// Processing run metadata
    #[serde(rename = "runinfo", skip_serializing_if = "Option::is_none")]
    pub run_info: Option<RunInfoRecord>,
    /// Publication metadata
    #[serde(rename = "pubinfo", skip_serializing_if = "Option::is_none")]
    pub pub_info: Option<PubInfoRecord>,
    /// Donor names
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub donors: Vec<String>,
}

/// `<eadheader>` output.
#[derive(Debug, Clone, Default, Serialize)]
pub struct HeaderRecord {
    /// Finding aid identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eadid: Option<EadIdRecord>,
    /// Display title (first non-filing title proper)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Every title proper
    #[serde(rename = "titleproper", skip_serializing_if = "Vec::is_empty")]
    pub title_proper: Vec<TitleRecord>,
    /// Authors
    #[serde(rename = "author", skip_serializing_if = "Vec::is_empty")]
    pub authors: Vec<String>,
    /// Publisher
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
}

/// `<eadid>` output.
#[derive(Debug, Clone, Serialize)]
pub struct EadIdRecord {
    /// `@countrycode`
    #[serde(rename = "countrycode", skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    /// `@mainagencycode`
    #[serde(rename = "mainagencycode", skip_serializing_if = "Option::is_none")]
    pub main_agency_code: Option<String>,
    /// `@url`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Identifier
    pub value: String,
}

/// `<titleproper>` output.
#[derive(Debug, Clone, Serialize)]
pub struct TitleRecord {
    /// `@type`
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub title_type: Option<String>,
    /// Flattened title
    pub value: String,
}

/// A unit of description.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ComponentRecord {
    /// `@id`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// `@level`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    /// `@otherlevel`
    #[serde(rename = "otherlevel", skip_serializing_if = "Option::is_none")]
    pub other_level: Option<String>,
    /// Descriptive identification
    pub did: DidRecord,
    /// Formatted notes
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<NoteRecord>,
    /// `<dsc>` heading and introduction
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dsc: Option<NoteRecord>,
    /// Controlled access terms
    #[serde(rename = "controlaccess", skip_serializing_if = "Vec::is_empty")]
    pub control_access: Vec<AccessTermRecord>,
    /// Child components
    #[serde(rename = "c", skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ComponentRecord>,
}

/// `<did>` output.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DidRecord {
    /// Flattened unit titles
    #[serde(rename = "unittitle", skip_serializing_if = "Vec::is_empty")]
    pub unit_title: Vec<String>,
    /// Unit identifiers
    #[serde(rename = "unitid", skip_serializing_if = "Vec::is_empty")]
    pub unit_id: Vec<UnitIdRecord>,
    /// Unit dates
    #[serde(rename = "unitdate", skip_serializing_if = "Vec::is_empty")]
    pub unit_date: Vec<UnitDateRecord>,
    /// Flattened abstracts
    #[serde(rename = "abstract", skip_serializing_if = "Vec::is_empty")]
    pub abstracts: Vec<String>,
    /// Non-empty physical descriptions
    #[serde(rename = "physdesc", skip_serializing_if = "Vec::is_empty")]
    pub phys_desc: Vec<PhysDescRecord>,
    /// Containers
    #[serde(rename = "container", skip_serializing_if = "Vec::is_empty")]
    pub containers: Vec<ContainerRecord>,
    /// Originations
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub origination: Vec<OriginationRecord>,
    /// Physical locations
    #[serde(rename = "physloc", skip_serializing_if = "Vec::is_empty")]
    pub phys_loc: Vec<String>,
    /// Language statements
    #[serde(rename = "langmaterial", skip_serializing_if = "Vec::is_empty")]
    pub lang_material: Vec<String>,
    /// Repository names
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub repository: Vec<NameRecord>,
    /// Digital objects
    #[serde(rename = "dao", skip_serializing_if = "Vec::is_empty")]
    pub daos: Vec<DaoRecord>,
}

/// `<unitid>` output.
#[derive(Debug, Clone, Serialize)]
pub struct UnitIdRecord {
    /// `@type`
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub id_type: Option<String>,
    /// Identifier
    pub value: String,
}

/// `<unitdate>` output.
#[derive(Debug, Clone, Serialize)]
pub struct UnitDateRecord {
    /// `@normal`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub normal: Option<String>,
    /// `@type`
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub date_type: Option<String>,
    /// Date text
    pub value: String,
}

/// `<physdesc>` output.
#[derive(Debug, Clone, Serialize)]
pub struct PhysDescRecord {
    /// Flattened extents, unit appended
    #[serde(rename = "extent", skip_serializing_if = "Vec::is_empty")]
    pub extents: Vec<String>,
    /// Direct text
    #[serde(skip_serializing_if = "String::is_empty")]
    pub value: String,
}

/// `<container>` output.
#[derive(Debug, Clone, Serialize)]
pub struct ContainerRecord {
    /// `@id`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// `@parent`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    /// `@type`
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub container_type: Option<String>,
    /// `@label` without bracketed text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// `@altrender`
    #[serde(rename = "altrender", skip_serializing_if = "Option::is_none")]
    pub alt_render: Option<String>,
    /// Indicator
    pub value: String,
}

/// `<origination>` output.
#[derive(Debug, Clone, Serialize)]
pub struct OriginationRecord {
    /// `@label`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Originator names
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub names: Vec<NameRecord>,
}

/// A name with its relator role resolved.
#[derive(Debug, Clone, Serialize)]
pub struct NameRecord {
    /// Element name
    #[serde(rename = "type")]
    pub kind: String,
    /// Relator code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Authoritative label of the relator code
    #[serde(rename = "rolelabel", skip_serializing_if = "Option::is_none")]
    pub role_label: Option<String>,
    /// Flattened name
    pub value: String,
}

/// `<dao>` output.
#[derive(Debug, Clone, Serialize)]
pub struct DaoRecord {
    /// `xlink:href`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    /// `xlink:role`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// `xlink:title`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// `xlink:show`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show: Option<String>,
    /// `xlink:actuate`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actuate: Option<String>,
    /// Flattened `<daodesc>`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Caller-supplied object type
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub do_type: Option<String>,
    /// Caller-supplied item count
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
}

/// A formatted note.
#[derive(Debug, Clone, Serialize)]
pub struct NoteRecord {
    /// Element name
    #[serde(rename = "type")]
    pub name: String,
    /// `@id`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// `@audience`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audience: Option<String>,
    /// Flattened headings
    #[serde(rename = "head", skip_serializing_if = "Vec::is_empty")]
    pub heads: Vec<String>,
    /// Remaining content in document order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NoteChildRecord>,
}

/// One piece of note content, tagged with its element name.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "name", content = "value", rename_all = "lowercase")]
pub enum NoteChildRecord {
    /// Flattened `<p>`
    #[serde(rename = "p")]
    Paragraph(String),
    /// Flattened `<bibref>`
    BibRef(String),
    /// `<list>`
    List(ListRecord),
    /// `<chronlist>`
    ChronList(ChronListRecord),
    /// `<defitem>`
    DefItem(DefItemRecord),
    /// Flattened `<legalstatus>`
    LegalStatus(String),
    /// A nested note
    Note(NoteRecord),
}

/// `<list>` output.
#[derive(Debug, Clone, Serialize)]
pub struct ListRecord {
    /// Flattened heading
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head: Option<String>,
    /// Flattened entries
    #[serde(rename = "item")]
    pub items: Vec<String>,
}

/// `<chronlist>` output.
#[derive(Debug, Clone, Serialize)]
pub struct ChronListRecord {
    /// Flattened heading
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head: Option<String>,
    /// Entries
    #[serde(rename = "chronitem")]
    pub items: Vec<ChronItemRecord>,
}

/// `<chronitem>` output.
#[derive(Debug, Clone, Serialize)]
pub struct ChronItemRecord {
    /// Flattened date
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// Flattened events
    #[serde(rename = "event")]
    pub events: Vec<String>,
}

/// `<defitem>` output.
#[derive(Debug, Clone, Serialize)]
pub struct DefItemRecord {
    /// Flattened label
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Flattened item
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<String>,
}

/// A controlled access term.
#[derive(Debug, Clone, Serialize)]
pub struct AccessTermRecord {
    /// Element name
    #[serde(rename = "type")]
    pub kind: String,
    /// Relator code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Authoritative label of the relator code
    #[serde(rename = "rolelabel", skip_serializing_if = "Option::is_none")]
    pub role_label: Option<String>,
    /// `@source`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Flattened term
    pub value: String,
}

/// Processing run output.
#[derive(Debug, Clone, Serialize)]
pub struct RunInfoRecord {
    /// Library version
    #[serde(rename = "libversion")]
    pub lib_version: String,
    /// Run time
    pub timestamp: DateTime<Utc>,
    /// Source file
    #[serde(rename = "sourcefile")]
    pub source_file: String,
}

/// Publication output.
#[derive(Debug, Clone, Serialize)]
pub struct PubInfoRecord {
    /// Theme identifier
    #[serde(rename = "themeid")]
    pub theme_id: String,
    /// Set when presentation grouping was applied
    #[serde(skip_serializing_if = "is_false")]
    pub grouped: bool,
}

// ============================================================================
// Materialization
// ============================================================================

/// Builds the output record for a finding aid.
///
/// Titles keep line breaks as annotations; every other rich-text field turns
/// them into `<br>` markers. Fails if any rich-text field is malformed or a
/// name carries an unknown relator code.
pub fn materialize(ead: &Ead, config: &OutputConfig) -> Result<EadRecord> {
    let archdesc = ead
        .archdesc
        .as_ref()
        .map(|archdesc| component_record(archdesc, config))
        .transpose()?;

    let record = EadRecord {
        header: header_record(&ead.header)?,
        archdesc,
        run_info: ead.run_info.as_ref().map(run_info_record),
        pub_info: ead
            .pub_info
            .as_ref()
            .map(|info| pub_info_record(info, config)),
        donors: ead
            .donors
            .iter()
            .map(|donor| cleanup_whitespace(donor))
            .filter(|donor| !donor.is_empty())
            .collect(),
    };

    debug!(
        eadid = ead.eadid().unwrap_or_default(),
        grouped = config.group_components,
        "materialized output record"
    );
    Ok(record)
}

fn header_record(header: &EadHeader) -> Result<HeaderRecord> {
    let title = if header.title_proper.iter().any(|t| !t.is_filing()) {
        Some(flatten_title_proper(&header.title_proper)?)
    } else {
        None
    };

    Ok(HeaderRecord {
        eadid: header.eadid.as_ref().map(|id| EadIdRecord {
            country_code: id.country_code.clone(),
            main_agency_code: id.main_agency_code.clone(),
            url: id.url.clone(),
            value: cleanup_whitespace(&id.value),
        }),
        title,
        title_proper: header
            .title_proper
            .iter()
            .map(|t| {
                Ok(TitleRecord {
                    title_type: t.title_type.clone(),
                    value: t.value.flatten(LineBreakMode::Literal)?,
                })
            })
            .collect::<Result<_>>()?,
        authors: header.authors.iter().map(|a| cleanup_whitespace(a)).collect(),
        publisher: header.publisher.as_deref().map(cleanup_whitespace),
    })
}

fn component_record(component: &ComponentRef, config: &OutputConfig) -> Result<ComponentRecord> {
    let component = component.borrow();
    // A presentation wrapper already holds exactly one run.
    let children = if config.group_components && component.level != Some(Level::Presentation) {
        group_siblings(component.children())
    } else {
        component.children().to_vec()
    };

    Ok(ComponentRecord {
        id: component.id.clone(),
        level: component.level.map(|level| level.as_str().to_string()),
        other_level: component.other_level.clone(),
        did: did_record(&component.did)?,
        notes: component.notes.iter().map(note_record).collect::<Result<_>>()?,
        dsc: component.dsc.as_ref().map(note_record).transpose()?,
        control_access: component
            .control_access
            .iter()
            .map(access_term_record)
            .collect::<Result<_>>()?,
        children: children
            .iter()
            .map(|child| component_record(child, config))
            .collect::<Result<_>>()?,
    })
}

fn did_record(did: &Did) -> Result<DidRecord> {
    Ok(DidRecord {
        unit_title: flatten_all(&did.unit_title, LineBreakMode::Literal)?,
        unit_id: did
            .unit_id
            .iter()
            .map(|id| UnitIdRecord {
                id_type: id.id_type.clone(),
                value: cleanup_whitespace(&id.value),
            })
            .collect(),
        unit_date: did
            .unit_date
            .iter()
            .map(|date| UnitDateRecord {
                normal: date.normal.clone(),
                date_type: date.date_type.clone(),
                value: cleanup_whitespace(&date.value),
            })
            .collect(),
        abstracts: flatten_all(&did.abstracts, LineBreakMode::Prose)?,
        phys_desc: did
            .phys_desc
            .iter()
            .filter(|pd| !pd.is_empty())
            .map(phys_desc_record)
            .collect(),
        containers: did.containers.iter().map(container_record).collect(),
        origination: did
            .origination
            .iter()
            .map(|origination| {
                Ok(OriginationRecord {
                    label: origination.label.clone(),
                    names: origination.names.iter().map(name_record).collect::<Result<_>>()?,
                })
            })
            .collect::<Result<_>>()?,
        phys_loc: did.phys_loc.iter().map(|s| cleanup_whitespace(s)).collect(),
        lang_material: did.lang_material.iter().map(|s| cleanup_whitespace(s)).collect(),
        repository: did.repository.iter().map(name_record).collect::<Result<_>>()?,
        daos: did.daos().iter().map(dao_record).collect::<Result<_>>()?,
    })
}

fn phys_desc_record(phys_desc: &PhysDesc) -> PhysDescRecord {
    PhysDescRecord {
        extents: phys_desc
            .extents
            .iter()
            .map(|extent| {
                let value = cleanup_whitespace(&extent.value);
                match extent.unit.as_deref().filter(|unit| !unit.is_empty()) {
                    Some(unit) => format!("{} {}", value, unit),
                    None => value,
                }
            })
            .collect(),
        value: cleanup_whitespace(&phys_desc.value),
    }
}

fn container_record(container: &Container) -> ContainerRecord {
    ContainerRecord {
        id: container.id.clone(),
        parent: container.parent.clone(),
        container_type: container.container_type.clone(),
        label: container.display_label(),
        alt_render: container.alt_render.clone(),
        value: cleanup_whitespace(&container.value),
    }
}

fn name_record(name: &NameEntry) -> Result<NameRecord> {
    Ok(NameRecord {
        kind: name.kind.as_str().to_string(),
        role: name.role.clone(),
        role_label: role_label(name.role.as_deref())?,
        value: name.value.flatten(LineBreakMode::Prose)?,
    })
}

fn access_term_record(term: &AccessTerm) -> Result<AccessTermRecord> {
    Ok(AccessTermRecord {
        kind: term.kind.clone(),
        role: term.role.clone(),
        role_label: role_label(term.role.as_deref())?,
        source: term.source.clone(),
        value: term.value.flatten(LineBreakMode::Prose)?,
    })
}

fn role_label(role: Option<&str>) -> Result<Option<String>> {
    match role.map(str::trim).filter(|role| !role.is_empty()) {
        Some(code) => Ok(Some(authoritative_label(code)?.to_string())),
        None => Ok(None),
    }
}

fn dao_record(dao: &DaoRef) -> Result<DaoRecord> {
    let dao = dao.borrow();
    Ok(DaoRecord {
        href: dao.href.clone(),
        role: dao.role.clone(),
        title: dao.title.clone(),
        show: dao.show.clone(),
        actuate: dao.actuate.clone(),
        description: dao
            .description
            .as_ref()
            .map(|desc| desc.flatten(LineBreakMode::Prose))
            .transpose()?,
        do_type: dao.do_type.clone(),
        count: dao.count,
    })
}

fn note_record(note: &Note) -> Result<NoteRecord> {
    let mut heads = Vec::new();
    let mut children = Vec::with_capacity(note.children.len());
    for child in &note.children {
        let record = match child {
            NoteChild::Head(head) => {
                heads.push(prose(head)?);
                continue;
            }
            NoteChild::Paragraph(p) => NoteChildRecord::Paragraph(prose(p)?),
            NoteChild::BibRef(bibref) => NoteChildRecord::BibRef(prose(bibref)?),
            NoteChild::LegalStatus(status) => NoteChildRecord::LegalStatus(prose(status)?),
            NoteChild::List(list) => NoteChildRecord::List(ListRecord {
                head: prose_opt(list.head.as_ref())?,
                items: flatten_all(&list.items, LineBreakMode::Prose)?,
            }),
            NoteChild::ChronList(list) => NoteChildRecord::ChronList(ChronListRecord {
                head: prose_opt(list.head.as_ref())?,
                items: list
                    .items
                    .iter()
                    .map(|item| {
                        Ok(ChronItemRecord {
                            date: prose_opt(item.date.as_ref())?,
                            events: flatten_all(&item.events, LineBreakMode::Prose)?,
                        })
                    })
                    .collect::<Result<_>>()?,
            }),
            NoteChild::DefItem(def) => NoteChildRecord::DefItem(DefItemRecord {
                label: prose_opt(def.label.as_ref())?,
                item: prose_opt(def.item.as_ref())?,
            }),
            NoteChild::Note(nested) => NoteChildRecord::Note(note_record(nested)?),
        };
        children.push(record);
    }

    Ok(NoteRecord {
        name: note.name.clone(),
        id: note.id.clone(),
        audience: note.audience.clone(),
        heads,
        children,
    })
}

fn prose(field: &Markup) -> Result<String> {
    field.flatten(LineBreakMode::Prose)
}

fn prose_opt(field: Option<&Markup>) -> Result<Option<String>> {
    field.map(prose).transpose()
}

fn run_info_record(info: &RunInfo) -> RunInfoRecord {
    RunInfoRecord {
        lib_version: info.lib_version.clone(),
        timestamp: info.timestamp,
        source_file: info.source_file.clone(),
    }
}

fn pub_info_record(info: &PubInfo, config: &OutputConfig) -> PubInfoRecord {
    PubInfoRecord {
        theme_id: info.theme_id.clone(),
        grouped: config.group_components,
    }
}

fn flatten_all(fields: &[Markup], mode: LineBreakMode) -> Result<Vec<String>> {
    fields.iter().map(|field| field.flatten(mode)).collect()
}

// ============================================================================
// Encoding
// ============================================================================

/// JSON writer for finding aids.
pub struct JsonWriter {
    config: OutputConfig,
}

impl JsonWriter {
    /// Creates a new writer with default configuration.
    pub fn new() -> Self {
        Self {
            config: OutputConfig::default(),
        }
    }

    /// Creates a new writer with the specified configuration.
    pub fn with_config(config: OutputConfig) -> Self {
        Self { config }
    }

    /// Writes a finding aid to a string.
    pub fn write_to_string(&self, ead: &Ead) -> Result<String> {
        let record = materialize(ead, &self.config)?;
        let json = if self.config.pretty {
            serde_json::to_string_pretty(&record)?
        } else {
            serde_json::to_string(&record)?
        };
        Ok(json)
    }

    /// Writes a finding aid to any `Write` implementation.
    pub fn write<W: Write>(&self, ead: &Ead, writer: W) -> Result<()> {
        let record = materialize(ead, &self.config)?;
        if self.config.pretty {
            serde_json::to_writer_pretty(writer, &record)?;
        } else {
            serde_json::to_writer(writer, &record)?;
        }
        Ok(())
    }
}

impl Default for JsonWriter {
    fn default() -> Self {
        Self::new()
    }
}
