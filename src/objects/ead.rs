//! Ead - the root document container for an EAD finding aid.
//!
//! Holds the `<eadheader>` metadata and the archival description, whose
//! `<dsc>` components are the children of the `<archdesc>` component.

use crate::error::{Error, Result};
use crate::markup::LineBreakMode;
use crate::objects::common::{Markup, PubInfo, RunInfo};
use crate::objects::component::{descendants, ComponentRef};

/// `<eadid>`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EadId {
    /// `@countrycode`
    pub country_code: Option<String>,
    /// `@mainagencycode`
    pub main_agency_code: Option<String>,
    /// `@url`
    pub url: Option<String>,
    /// Identifier text
    pub value: String,
}

/// `<titleproper>`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TitleProper {
    /// `@type` ("filing" marks the sort title)
    pub title_type: Option<String>,
    /// Title content
    pub value: Markup,
}

impl TitleProper {
    /// Returns true for the filing (sort) title.
    pub fn is_filing(&self) -> bool {
        self.title_type.as_deref() == Some("filing")
    }
}

/// Finding aid metadata from `<eadheader>`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EadHeader {
    /// Finding aid identifier
    pub eadid: Option<EadId>,
    /// Title propers from `<titlestmt>`
    pub title_proper: Vec<TitleProper>,
    /// Authors from `<titlestmt>`
    pub authors: Vec<String>,
    /// Publisher from `<publicationstmt>`
    pub publisher: Option<String>,
}

/// Flattens the display title of a finding aid.
///
/// Uses the first title proper that is not the filing title; line breaks
/// stay visible as annotations.
pub fn flatten_title_proper(titles: &[TitleProper]) -> Result<String> {
    let title = titles
        .iter()
        .find(|title| !title.is_filing())
        .ok_or_else(|| Error::MissingField("non-filing <titleproper>".to_string()))?;
    title.value.flatten(LineBreakMode::Literal)
}

/// The root EAD document.
#[derive(Debug, Clone, Default)]
pub struct Ead {
    /// Header metadata
    pub header: EadHeader,
    /// The `<archdesc>` component; its children are the `<dsc>` components
    pub archdesc: Option<ComponentRef>,
    /// Processing run metadata
    pub run_info: Option<RunInfo>,
    /// Publication metadata
    pub pub_info: Option<PubInfo>,
    /// Donor names
    pub donors: Vec<String>,
}

impl Ead {
    /// Creates a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the trimmed finding aid identifier.
    pub fn eadid(&self) -> Option<&str> {
        self.header.eadid.as_ref().map(|id| id.value.trim())
    }

    /// Returns the collection title as plain text: the first `<unittitle>`
    /// of the `<archdesc>` with all markup removed.
    pub fn guide_title(&self) -> Result<Option<String>> {
        let Some(archdesc) = self.archdesc.as_ref() else {
            return Ok(None);
        };
        let archdesc = archdesc.borrow();
        let title = archdesc.did.title().map(Markup::plain_text).transpose()?;
        Ok(title)
    }

    /// Records the processing run.
    pub fn set_run_info(&mut self, run_info: RunInfo) {
        self.run_info = Some(run_info);
    }

    /// Records publication data.
    pub fn set_pub_info(&mut self, theme_id: impl Into<String>) {
        self.pub_info = Some(PubInfo::new(theme_id));
    }

    /// Returns every component, `<archdesc>` first, in document order.
    pub fn iter_components(&self) -> impl Iterator<Item = ComponentRef> {
        self.archdesc
            .as_ref()
            .map(descendants)
            .unwrap_or_default()
            .into_iter()
    }

    /// Returns the number of components below `<archdesc>`.
    pub fn component_count(&self) -> usize {
        self.iter_components().count().saturating_sub(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::common::Level;
    use crate::objects::component::Component;
    use crate::objects::did::Did;

    fn title(value: &str, title_type: Option<&str>) -> TitleProper {
        TitleProper {
            title_type: title_type.map(str::to_string),
            value: Markup::new(value),
        }
    }

    #[test]
    fn test_flatten_title_proper_skips_filing() {
        let titles = vec![
            title("Omega, Mos, Papers", Some("filing")),
            title("Guide to the <emph render=\"italic\">Mos</emph> Papers<lb/>1900", None),
        ];
        assert_eq!(
            flatten_title_proper(&titles).unwrap(),
            "Guide to the <span class=\"ead-emph ead-emph-italic\">Mos</span> Papers<span class=\"ead-lb\"></span>1900"
        );
    }

    #[test]
    fn test_flatten_title_proper_only_filing() {
        let titles = vec![title("Omega", Some("filing"))];
        assert!(matches!(
            flatten_title_proper(&titles),
            Err(Error::MissingField(_))
        ));
        assert!(flatten_title_proper(&[]).is_err());
    }

    #[test]
    fn test_component_count() {
        let mut ead = Ead::new();
        assert_eq!(ead.component_count(), 0);

        let mut archdesc = Component::with_level("collection", Level::Collection);
        archdesc.append_child(Component::with_level("s1", Level::Series).into_ref());
        archdesc.append_child(Component::with_level("s2", Level::Series).into_ref());
        ead.archdesc = Some(archdesc.into_ref());
        assert_eq!(ead.component_count(), 2);
    }

    #[test]
    fn test_guide_title() {
        let mut ead = Ead::new();
        assert_eq!(ead.guide_title().unwrap(), None);

        let mut archdesc = Component::with_level("collection", Level::Collection);
        archdesc.did = Did::with_title(
            "Megan O'Shea's <emph render=\"italic\">One</emph> Resource<lb/>to Rule Them All",
        );
        archdesc.did.unit_title.push(Markup::new("Second title"));
        ead.archdesc = Some(archdesc.into_ref());
        assert_eq!(
            ead.guide_title().unwrap().as_deref(),
            Some("Megan O'Shea's One Resource to Rule Them All")
        );
    }

    #[test]
    fn test_guide_title_malformed() {
        let mut archdesc = Component::with_level("collection", Level::Collection);
        archdesc.did = Did::with_title("<emph>Unclosed");
        let mut ead = Ead::new();
        ead.archdesc = Some(archdesc.into_ref());
        assert!(matches!(ead.guide_title(), Err(Error::Decode(_))));
    }

    #[test]
    fn test_eadid_trimmed() {
        let mut ead = Ead::new();
        ead.header.eadid = Some(EadId {
            value: "  mc_100 \n".to_string(),
            ..Default::default()
        });
        assert_eq!(ead.eadid(), Some("mc_100"));
    }
}
