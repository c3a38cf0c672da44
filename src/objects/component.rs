//! Component - a unit of archival description (`<archdesc>` or `<c>`).
//!
//! Components form the description tree. They are shared through
//! [`ComponentRef`] handles so that presentation grouping can re-parent them
//! without copying, and so that digital objects can point back at their
//! owner.

use crate::objects::common::{Level, Markup};
use crate::objects::did::Did;
use crate::objects::note::Note;
use std::cell::RefCell;
use std::rc::Rc;

/// Shared handle to a component.
pub type ComponentRef = Rc<RefCell<Component>>;

/// Element names parsed as access terms inside `<controlaccess>`.
pub const ACCESS_TERM_ELEMENTS: &[&str] = &[
    "corpname",
    "famname",
    "function",
    "genreform",
    "geogname",
    "occupation",
    "persname",
    "subject",
    "title",
];

/// A controlled access term (`<subject>`, `<persname>`, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessTerm {
    /// Element name
    pub kind: String,
    /// MARC relator code (`@role`), for names
    pub role: Option<String>,
    /// `@source` vocabulary
    pub source: Option<String>,
    /// Term content
    pub value: Markup,
}

/// A unit of description.
#[derive(Debug, Clone, Default)]
pub struct Component {
    /// `@id`; absent on synthetic components
    pub id: Option<String>,
    /// `@level`
    pub level: Option<Level>,
    /// `@otherlevel`
    pub other_level: Option<String>,
    /// Descriptive identification
    pub did: Did,
    /// Formatted notes in document order
    pub notes: Vec<Note>,
    /// `<head>` and introductory `<p>` of the `<dsc>`, if any
    pub dsc: Option<Note>,
    /// Controlled access terms
    pub control_access: Vec<AccessTerm>,
    children: Vec<ComponentRef>,
}

impl Component {
    /// Creates a new empty component.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a component with an id and level.
    pub fn with_level(id: impl Into<String>, level: Level) -> Self {
        Self {
            id: Some(id.into()),
            level: Some(level),
            ..Default::default()
        }
    }

    /// Wraps this component in a shared handle.
    pub fn into_ref(self) -> ComponentRef {
        Rc::new(RefCell::new(self))
    }

    /// Appends a child component.
    pub fn append_child(&mut self, child: ComponentRef) {
        self.children.push(child);
    }

    /// Returns the child components in order.
    pub fn children(&self) -> &[ComponentRef] {
        &self.children
    }

    /// Replaces the child list.
    pub fn set_children(&mut self, children: Vec<ComponentRef>) {
        self.children = children;
    }

    /// Returns the number of direct children.
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Returns the first unit title.
    pub fn title(&self) -> Option<&Markup> {
        self.did.title()
    }
}

/// Returns every component of the tree rooted at `root`, in document order.
pub fn descendants(root: &ComponentRef) -> Vec<ComponentRef> {
    let mut out = Vec::new();
    let mut stack = vec![Rc::clone(root)];
    while let Some(component) = stack.pop() {
        stack.extend(component.borrow().children().iter().rev().cloned());
        out.push(component);
    }
    out
}
