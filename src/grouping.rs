//! Presentation grouping of sibling components.
//!
//! Finding aids often list long runs of files and items between series.
//! For presentation, each maximal run of such "groupable" siblings is wrapped
//! in one synthetic component so that viewers can collapse it. Series-like
//! levels are never grouped and always kept in place.
//!
//! # Example
//!
//! ```rust
//! use ead_rs::grouping::group_siblings;
//! use ead_rs::objects::{Component, Level};
//!
//! let siblings: Vec<_> = (1..=3)
//!     .map(|i| Component::with_level(format!("f{}", i), Level::File).into_ref())
//!     .collect();
//! let grouped = group_siblings(&siblings);
//! assert_eq!(grouped.len(), 1);
//! assert_eq!(grouped[0].borrow().id.as_deref(), Some("items001"));
//! ```

use crate::objects::{Component, ComponentRef, Did, Level};
use std::rc::Rc;
use tracing::debug;

/// Unit title given to every synthetic wrapper.
pub const PRESENTATION_TITLE: &str = "Items";

/// Prefix of generated wrapper ids.
pub const PRESENTATION_ID_PREFIX: &str = "items";

/// Levels that are always kept verbatim.
pub const PROTECTED_LEVELS: &[Level] = &[
    Level::Series,
    Level::SubSeries,
    Level::OtherLevel,
    Level::RecordGrp,
    Level::SubGrp,
    Level::Presentation,
];

/// Returns true if a component at this level may be wrapped.
pub fn is_groupable(level: Option<Level>) -> bool {
    match level {
        Some(level) => !PROTECTED_LEVELS.contains(&level),
        None => true,
    }
}

/// Regroups an ordered list of siblings.
///
/// Every maximal contiguous run of groupable siblings is replaced by one
/// wrapper whose children are exactly that run, in order. Protected siblings
/// are passed through. Wrapper ids (`items001`, `items002`, ...) are numbered
/// per call.
pub fn group_siblings(nodes: &[ComponentRef]) -> Vec<ComponentRef> {
    let mut output = Vec::with_capacity(nodes.len());
    let mut counter = 0usize;
    let mut run_start: Option<usize> = None;
    let mut kept_start = 0usize;

    for (index, node) in nodes.iter().enumerate() {
        let groupable = is_groupable(node.borrow().level);
        match (groupable, run_start) {
            (true, None) => {
                output.extend(nodes[kept_start..index].iter().cloned());
                run_start = Some(index);
            }
            (false, Some(start)) => {
                counter += 1;
                output.push(wrap(&nodes[start..index], counter));
                run_start = None;
                kept_start = index;
            }
            _ => {}
        }
    }

    match run_start {
        Some(start) => {
            counter += 1;
            output.push(wrap(&nodes[start..], counter));
        }
        None => output.extend(nodes[kept_start..].iter().cloned()),
    }

    if counter > 0 {
        debug!(
            siblings = nodes.len(),
            wrappers = counter,
            "grouped sibling runs"
        );
    }
    output
}

/// Builds a synthetic wrapper around a run of siblings.
fn wrap(run: &[ComponentRef], sequence: usize) -> ComponentRef {
    let mut wrapper = Component::with_level(
        format!("{}{:03}", PRESENTATION_ID_PREFIX, sequence),
        Level::Presentation,
    );
    wrapper.did = Did::with_title(PRESENTATION_TITLE);
    wrapper.set_children(run.iter().map(Rc::clone).collect());
    wrapper.into_ref()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, level: Level) -> ComponentRef {
        Component::with_level(id, level).into_ref()
    }

    fn ids(nodes: &[ComponentRef]) -> Vec<String> {
        nodes
            .iter()
            .map(|n| n.borrow().id.clone().unwrap_or_default())
            .collect()
    }

    #[test]
    fn test_all_groupable() {
        let input: Vec<_> = (1..=6).map(|i| node(&format!("f{}", i), Level::File)).collect();
        let output = group_siblings(&input);

        assert_eq!(output.len(), 1);
        let wrapper = output[0].borrow();
        assert_eq!(wrapper.id.as_deref(), Some("items001"));
        assert_eq!(wrapper.level, Some(Level::Presentation));
        assert_eq!(wrapper.title().map(|t| t.raw()), Some(PRESENTATION_TITLE));
        assert_eq!(wrapper.child_count(), 6);
        for (child, original) in wrapper.children().iter().zip(&input) {
            assert!(Rc::ptr_eq(child, original));
        }
    }

    #[test]
    fn test_run_between_kept_nodes() {
        let input = vec![
            node("s1", Level::Series),
            node("s2", Level::Series),
            node("f1", Level::File),
            node("f2", Level::Item),
            node("f3", Level::File),
            node("s3", Level::Series),
            node("s4", Level::OtherLevel),
        ];
        let output = group_siblings(&input);

        assert_eq!(ids(&output), ["s1", "s2", "items001", "s3", "s4"]);
        assert!(Rc::ptr_eq(&output[0], &input[0]));
        assert!(Rc::ptr_eq(&output[4], &input[6]));
        assert_eq!(ids(output[2].borrow().children()), ["f1", "f2", "f3"]);
    }

    #[test]
    fn test_multiple_runs_numbered_per_call() {
        let input = vec![
            node("f1", Level::File),
            node("s1", Level::Series),
            node("f2", Level::File),
            node("f3", Level::File),
            node("r1", Level::RecordGrp),
            node("i1", Level::Item),
        ];
        let output = group_siblings(&input);
        assert_eq!(ids(&output), ["items001", "s1", "items002", "r1", "items003"]);
        assert_eq!(ids(output[4].borrow().children()), ["i1"]);

        // A second call starts numbering again.
        let again = group_siblings(&input);
        assert_eq!(again[0].borrow().id.as_deref(), Some("items001"));
    }

    #[test]
    fn test_empty_input() {
        assert!(group_siblings(&[]).is_empty());
    }

    #[test]
    fn test_all_protected_unchanged() {
        let input = vec![
            node("s1", Level::Series),
            node("s2", Level::SubSeries),
            node("o1", Level::OtherLevel),
            node("g1", Level::SubGrp),
            node("p1", Level::Presentation),
        ];
        let output = group_siblings(&input);
        assert_eq!(output.len(), input.len());
        for (out, original) in output.iter().zip(&input) {
            assert!(Rc::ptr_eq(out, original));
        }
    }

    #[test]
    fn test_missing_level_is_groupable() {
        let input = vec![Component::new().into_ref(), node("s1", Level::Series)];
        let output = group_siblings(&input);
        assert_eq!(ids(&output), ["items001", "s1"]);
    }
}
