//! Container - a physical storage location (box, folder, ...) in EAD.
//!
//! Containers reference each other through `@id`/`@parent` to describe a
//! hierarchy such as Box --> Folder --> Item. A container without a parent
//! is the root of its hierarchy.

use crate::markup::{cleanup_whitespace, remove_bracketed_text};

/// A `<container>` element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Container {
    /// Identifier of this container
    pub id: Option<String>,
    /// Identifier of the parent container (absent for a hierarchy root)
    pub parent: Option<String>,
    /// Container type (e.g., "Box", "Folder")
    pub container_type: Option<String>,
    /// Display label, which may carry a bracketed barcode
    pub label: Option<String>,
    /// Alternate rendering hint
    pub alt_render: Option<String>,
    /// Container indicator (e.g., "1", "2-4")
    pub value: String,
}

impl Container {
    /// Creates a new empty container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a root container with an id, type and indicator.
    pub fn root(
        id: impl Into<String>,
        container_type: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            id: Some(id.into()),
            container_type: Some(container_type.into()),
            value: value.into(),
            ..Default::default()
        }
    }

    /// Creates a subcontainer declaring `parent` as its parent.
    pub fn child_of(
        id: impl Into<String>,
        parent: impl Into<String>,
        container_type: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            parent: Some(parent.into()),
            ..Self::root(id, container_type, value)
        }
    }

    /// Returns true if this container is the root of its hierarchy.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Returns the label with bracketed text removed and whitespace cleaned.
    pub fn display_label(&self) -> Option<String> {
        self.label
            .as_deref()
            .map(|label| cleanup_whitespace(&remove_bracketed_text(label)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_and_child() {
        let root = Container::root("b1", "Box", "1");
        assert!(root.is_root());
        assert_eq!(root.id.as_deref(), Some("b1"));

        let child = Container::child_of("f1", "b1", "Folder", "3");
        assert!(!child.is_root());
        assert_eq!(child.parent.as_deref(), Some("b1"));
        assert_eq!(child.container_type.as_deref(), Some("Folder"));
        assert_eq!(child.value, "3");
    }

    #[test]
    fn test_display_label() {
        let mut container = Container::root("b1", "Box", "1");
        assert_eq!(container.display_label(), None);

        container.label = Some("Mixed Materials [32101081442384]".to_string());
        assert_eq!(container.display_label().as_deref(), Some("Mixed Materials"));
    }
}
