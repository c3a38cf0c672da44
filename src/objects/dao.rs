//! DigitalObject - a `<dao>` reference to a digital surrogate.

use crate::objects::common::Markup;
use crate::objects::component::{Component, ComponentRef};
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

/// Shared handle to a digital object.
pub type DaoRef = Rc<RefCell<DigitalObject>>;

/// Presentation category of a digital object, selected by its role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DaoCategory {
    /// Streaming audio
    Audio,
    /// Streaming video
    Video,
    /// Image set
    Image,
    /// Link to an external resource
    ExternalLink,
    /// Electronic records available only in the reading room
    ElectronicRecordsReadingRoom,
    /// Audio available only in the reading room
    AudioReadingRoom,
    /// Video available only in the reading room
    VideoReadingRoom,
}

impl DaoCategory {
    /// Every category, in reporting order.
    pub const ALL: [DaoCategory; 7] = [
        DaoCategory::Audio,
        DaoCategory::Video,
        DaoCategory::Image,
        DaoCategory::ExternalLink,
        DaoCategory::ElectronicRecordsReadingRoom,
        DaoCategory::AudioReadingRoom,
        DaoCategory::VideoReadingRoom,
    ];

    /// Returns the role value that selects this category.
    pub fn as_str(&self) -> &'static str {
        match self {
            DaoCategory::Audio => "audio-service",
            DaoCategory::Video => "video-service",
            DaoCategory::Image => "image-service",
            DaoCategory::ExternalLink => "external-link",
            DaoCategory::ElectronicRecordsReadingRoom => "electronic-records-reading-room",
            DaoCategory::AudioReadingRoom => "audio-reading-room",
            DaoCategory::VideoReadingRoom => "video-reading-room",
        }
    }

    /// Classifies a role value.
    ///
    /// A blank or absent role is an external link. Returns `None` for a
    /// role that names no known category.
    pub fn from_role(role: Option<&str>) -> Option<Self> {
        let role = role.map(str::trim).unwrap_or_default();
        if role.is_empty() {
            return Some(DaoCategory::ExternalLink);
        }
        DaoCategory::ALL
            .into_iter()
            .find(|category| category.as_str() == role)
    }
}

impl fmt::Display for DaoCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A digital archival object.
///
/// The owning [`Component`] holds the object in its `<did>`; the object only
/// keeps a weak back-reference, populated by the census.
#[derive(Debug, Clone, Default)]
pub struct DigitalObject {
    /// Link to the surrogate (`xlink:href`)
    pub href: Option<String>,
    /// Role/category tag (`xlink:role`)
    pub role: Option<String>,
    /// Title (`xlink:title`)
    pub title: Option<String>,
    /// Show behavior (`xlink:show`)
    pub show: Option<String>,
    /// Actuate behavior (`xlink:actuate`)
    pub actuate: Option<String>,
    /// `<daodesc>` content
    pub description: Option<Markup>,
    /// Object type (e.g., "image_set"). Never read from the document; set
    /// by the caller when known.
    pub do_type: Option<String>,
    /// Item count. Never read from the document; set by the caller when
    /// known.
    pub count: Option<u32>,
    owner: Weak<RefCell<Component>>,
}

impl DigitalObject {
    /// Creates a new empty digital object.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a digital object with an href and role.
    pub fn with_role(href: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            href: Some(href.into()),
            role: Some(role.into()),
            ..Default::default()
        }
    }

    /// Wraps this object in a shared handle.
    pub fn into_ref(self) -> DaoRef {
        Rc::new(RefCell::new(self))
    }

    /// Returns the category selected by the role, if it is a known one.
    pub fn category(&self) -> Option<DaoCategory> {
        DaoCategory::from_role(self.role.as_deref())
    }

    /// Returns the owning component, if linked and still alive.
    pub fn owner(&self) -> Option<ComponentRef> {
        self.owner.upgrade()
    }

    /// Links this object to its owning component.
    pub fn set_owner(&mut self, owner: &ComponentRef) {
        self.owner = Rc::downgrade(owner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_role() {
        assert_eq!(DaoCategory::from_role(Some("audio-service")), Some(DaoCategory::Audio));
        assert_eq!(
            DaoCategory::from_role(Some("video-reading-room")),
            Some(DaoCategory::VideoReadingRoom)
        );
        assert_eq!(DaoCategory::from_role(None), Some(DaoCategory::ExternalLink));
        assert_eq!(DaoCategory::from_role(Some("  ")), Some(DaoCategory::ExternalLink));
        assert_eq!(DaoCategory::from_role(Some("hologram")), None);
    }

    #[test]
    fn test_owner_is_weak() {
        let dao = DigitalObject::with_role("https://hdl.handle.net/2333.1/xgxd28gq", "image-service");
        assert!(dao.owner().is_none());

        let mut dao = dao;
        {
            let component = Component::new().into_ref();
            dao.set_owner(&component);
            assert!(Rc::ptr_eq(&dao.owner().unwrap(), &component));
        }
        // The component was dropped; the back-reference does not keep it alive.
        assert!(dao.owner().is_none());
    }
}
