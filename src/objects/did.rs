//! Did - the descriptive identification block of a unit of description.

use crate::objects::common::Markup;
use crate::objects::container::Container;
use crate::objects::dao::{DaoRef, DigitalObject};
use std::fmt;

/// `<unitid>`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnitId {
    /// `@type`
    pub id_type: Option<String>,
    /// Identifier text
    pub value: String,
}

/// `<unitdate>`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnitDate {
    /// Normalized date (`@normal`, e.g. "1900/1950")
    pub normal: Option<String>,
    /// `@type` ("inclusive", "bulk")
    pub date_type: Option<String>,
    /// Date text
    pub value: String,
}

/// `<extent>`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extent {
    /// `@unit`
    pub unit: Option<String>,
    /// Extent text
    pub value: String,
}

/// `<physdesc>`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhysDesc {
    /// Extent statements
    pub extents: Vec<Extent>,
    /// Direct character data
    pub value: String,
}

impl PhysDesc {
    /// Returns true if there are no extents and the text is whitespace only.
    pub fn is_empty(&self) -> bool {
        self.extents.is_empty() && self.value.trim().is_empty()
    }
}

/// The element a name was recorded with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NameKind {
    /// `<corpname>`
    CorpName,
    /// `<famname>`
    FamName,
    /// `<persname>`
    PersName,
}

impl NameKind {
    /// Returns the element name.
    pub fn as_str(&self) -> &'static str {
        match self {
            NameKind::CorpName => "corpname",
            NameKind::FamName => "famname",
            NameKind::PersName => "persname",
        }
    }

    /// Resolves an element local name.
    pub fn from_element(name: &str) -> Option<Self> {
        match name {
            "corpname" => Some(NameKind::CorpName),
            "famname" => Some(NameKind::FamName),
            "persname" => Some(NameKind::PersName),
            _ => None,
        }
    }
}

impl fmt::Display for NameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A corporate, family or personal name with an optional relator role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameEntry {
    /// The element the name came from
    pub kind: NameKind,
    /// MARC relator code (`@role`)
    pub role: Option<String>,
    /// Name content
    pub value: Markup,
}

impl NameEntry {
    /// Creates a name entry.
    pub fn new(kind: NameKind, value: impl Into<Markup>) -> Self {
        Self {
            kind,
            role: None,
            value: value.into(),
        }
    }

    /// Sets the relator role.
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }
}

/// `<origination>`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Origination {
    /// `@label` (e.g., "Creator")
    pub label: Option<String>,
    /// Names of the originators
    pub names: Vec<NameEntry>,
}

/// The descriptive identification (`<did>`) of a unit.
#[derive(Debug, Clone, Default)]
pub struct Did {
    /// `<unittitle>` fields
    pub unit_title: Vec<Markup>,
    /// `<unitid>` fields
    pub unit_id: Vec<UnitId>,
    /// `<unitdate>` fields
    pub unit_date: Vec<UnitDate>,
    /// `<abstract>` fields
    pub abstracts: Vec<Markup>,
    /// `<physdesc>` fields
    pub phys_desc: Vec<PhysDesc>,
    /// `<container>` fields
    pub containers: Vec<Container>,
    /// `<origination>` fields
    pub origination: Vec<Origination>,
    /// `<physloc>` text
    pub phys_loc: Vec<String>,
    /// `<langmaterial>` text
    pub lang_material: Vec<String>,
    /// Names under `<repository>`
    pub repository: Vec<NameEntry>,
    daos: Vec<DaoRef>,
}

impl Did {
    /// Creates an empty did.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a did with a single unit title.
    pub fn with_title(title: impl Into<Markup>) -> Self {
        Self {
            unit_title: vec![title.into()],
            ..Default::default()
        }
    }

    /// Appends a digital object, returning its shared handle.
    pub fn append_dao(&mut self, dao: DigitalObject) -> DaoRef {
        let dao = dao.into_ref();
        self.daos.push(dao.clone());
        dao
    }

    /// Returns the digital objects in document order.
    pub fn daos(&self) -> &[DaoRef] {
        &self.daos
    }

    /// Returns the first unit title.
    pub fn title(&self) -> Option<&Markup> {
        self.unit_title.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phys_desc_is_empty() {
        let mut pd = PhysDesc {
            value: "\n    \n    \n".to_string(),
            ..Default::default()
        };
        assert!(pd.is_empty());

        pd.extents.push(Extent {
            unit: Some("linear feet".to_string()),
            value: "2".to_string(),
        });
        assert!(!pd.is_empty());

        let pd = PhysDesc {
            value: "1 photograph".to_string(),
            ..Default::default()
        };
        assert!(!pd.is_empty());
    }

    #[test]
    fn test_append_dao() {
        let mut did = Did::with_title("Letters");
        let handle = did.append_dao(DigitalObject::with_role("https://example.org/1", "audio-service"));
        assert_eq!(did.daos().len(), 1);
        handle.borrow_mut().count = Some(3);
        assert_eq!(did.daos()[0].borrow().count, Some(3));
        assert_eq!(did.title().map(Markup::raw), Some("Letters"));
    }

    #[test]
    fn test_name_kind() {
        assert_eq!(NameKind::from_element("persname"), Some(NameKind::PersName));
        assert_eq!(NameKind::from_element("subject"), None);
        let name = NameEntry::new(NameKind::CorpName, "Columbia University").with_role("orz");
        assert_eq!(name.role.as_deref(), Some("orz"));
        assert_eq!(name.kind.to_string(), "corpname");
    }
}
