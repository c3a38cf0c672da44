//! Storage hierarchy normalization.
//!
//! Containers describe a physical hierarchy (box, folder, item) by chaining
//! `@parent` references to `@id`s. Some consumers only understand a flat
//! shape in which every subcontainer points directly at the root of its
//! hierarchy and carries no id of its own. [`normalize`] rewrites a group of
//! sibling containers into that shape.

use crate::document::Element;
use crate::objects::Container;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// A node of a storage hierarchy that can be rewritten in place.
pub trait StorageNode {
    /// Returns the node's identifier.
    fn id(&self) -> Option<&str>;

    /// Returns the identifier of the declared parent; `None` for a root.
    fn parent(&self) -> Option<&str>;

    /// Points the node at a new parent.
    fn set_parent(&mut self, parent: &str);

    /// Removes the node's identifier.
    fn remove_id(&mut self);
}

impl StorageNode for Container {
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    fn set_parent(&mut self, parent: &str) {
        self.parent = Some(parent.to_string());
    }

    fn remove_id(&mut self) {
        self.id = None;
    }
}

impl StorageNode for Element {
    fn id(&self) -> Option<&str> {
        self.attribute("id")
    }

    fn parent(&self) -> Option<&str> {
        self.attribute("parent")
    }

    fn set_parent(&mut self, parent: &str) {
        self.set_attribute("parent", parent);
    }

    fn remove_id(&mut self) {
        self.remove_attribute("id");
    }
}

impl<N: StorageNode + ?Sized> StorageNode for &mut N {
    fn id(&self) -> Option<&str> {
        (**self).id()
    }

    fn parent(&self) -> Option<&str> {
        (**self).parent()
    }

    fn set_parent(&mut self, parent: &str) {
        (**self).set_parent(parent);
    }

    fn remove_id(&mut self) {
        (**self).remove_id();
    }
}

/// One planned rewrite: point `node` at `root` and drop its id.
#[derive(Debug)]
struct Rewrite {
    node: usize,
    root: String,
}

/// Flattens every storage hierarchy in `nodes` onto its root.
///
/// For each root (a node with an id and no parent), every node reachable by
/// following parent references downward gets `parent` set to the root's id
/// and its own id removed. Roots keep their id.
///
/// The rewrite is planned in full before anything is changed. If any
/// problem is found (two nodes declaring the same parent, a subcontainer
/// without an id, or a cycle) the diagnostics are returned and no node is
/// modified. On success, returns the number of rewritten subcontainers.
pub fn normalize<N: StorageNode>(nodes: &mut [N]) -> Result<usize, Vec<String>> {
    let plan = plan(nodes)?;
    for rewrite in &plan {
        let node = &mut nodes[rewrite.node];
        node.set_parent(&rewrite.root);
        node.remove_id();
    }
    debug!(rewritten = plan.len(), "normalized storage hierarchy");
    Ok(plan.len())
}

fn plan<N: StorageNode>(nodes: &[N]) -> Result<Vec<Rewrite>, Vec<String>> {
    let mut errors = Vec::new();

    // Index each node by the parent it declares.
    let mut by_parent: HashMap<&str, usize> = HashMap::new();
    for (index, node) in nodes.iter().enumerate() {
        if let Some(parent) = node.parent() {
            if by_parent.insert(parent, index).is_some() {
                errors.push(format!("more than one container has parent {}", parent));
            }
        }
    }
    if !errors.is_empty() {
        return Err(errors);
    }

    let mut plan = Vec::new();
    for node in nodes.iter().filter(|node| node.parent().is_none()) {
        let Some(root_id) = node.id() else {
            continue;
        };

        let mut visited: HashSet<&str> = HashSet::from([root_id]);
        let mut current = root_id;
        while let Some(&child) = by_parent.get(current) {
            let Some(child_id) = nodes[child].id() else {
                // The chain ends here, but this node must still be rewritten.
                plan.push(Rewrite {
                    node: child,
                    root: root_id.to_string(),
                });
                errors.push(format!(
                    "subcontainer of {} under root {} has no id",
                    current, root_id
                ));
                break;
            };
            if !visited.insert(child_id) {
                errors.push(format!(
                    "container {} under root {} is part of a cycle",
                    child_id, root_id
                ));
                break;
            }
            plan.push(Rewrite {
                node: child,
                root: root_id.to_string(),
            });
            current = child_id;
        }
    }

    if errors.is_empty() {
        Ok(plan)
    } else {
        Err(errors)
    }
}
