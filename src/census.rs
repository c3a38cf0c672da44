//! Digital object census.
//!
//! Walks a description tree, links every digital object back to the
//! component that holds it and sorts the objects into presentation
//! categories.

use crate::objects::{descendants, ComponentRef, DaoCategory, DaoRef};
use std::rc::Rc;
use tracing::{debug, warn};

/// An ordered collection of digital objects.
#[derive(Debug, Clone, Default)]
pub struct DaoBucket {
    daos: Vec<DaoRef>,
}

impl DaoBucket {
    /// Returns the number of objects in the bucket.
    pub fn count(&self) -> usize {
        self.daos.len()
    }

    /// Returns the objects in document order.
    pub fn daos(&self) -> &[DaoRef] {
        &self.daos
    }

    /// Returns true if the bucket is empty.
    pub fn is_empty(&self) -> bool {
        self.daos.is_empty()
    }

    fn push(&mut self, dao: DaoRef) {
        self.daos.push(dao);
    }

    fn clear(&mut self) {
        self.daos.clear();
    }
}

/// Digital objects of a tree, in total and by category.
#[derive(Debug, Clone, Default)]
pub struct DaoCensus {
    all: DaoBucket,
    by_category: [DaoBucket; DaoCategory::ALL.len()],
}

impl DaoCensus {
    /// Creates an empty census.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every digital object found.
    pub fn all(&self) -> &DaoBucket {
        &self.all
    }

    /// Returns the objects of one category.
    pub fn bucket(&self, category: DaoCategory) -> &DaoBucket {
        &self.by_category[category_index(category)]
    }

    /// Returns the total number of digital objects.
    pub fn total(&self) -> usize {
        self.all.count()
    }

    /// Empties every bucket.
    pub fn clear(&mut self) {
        self.all.clear();
        for bucket in &mut self.by_category {
            bucket.clear();
        }
    }

    fn record(&mut self, category: DaoCategory, dao: DaoRef) {
        self.all.push(Rc::clone(&dao));
        self.by_category[category_index(category)].push(dao);
    }
}

fn category_index(category: DaoCategory) -> usize {
    DaoCategory::ALL
        .iter()
        .position(|c| *c == category)
        .unwrap_or_default()
}

/// Takes a census of the digital objects in the tree rooted at `root`.
///
/// Each object's owner is set to the component that holds it. Objects with
/// a blank role, or a role naming no known category, are counted as
/// external links.
pub fn census(root: &ComponentRef) -> DaoCensus {
    let mut result = DaoCensus::new();

    for component in descendants(root) {
        let daos = component.borrow().did.daos().to_vec();
        for dao in daos {
            let category = {
                let mut object = dao.borrow_mut();
                object.set_owner(&component);
                object.category().unwrap_or_else(|| {
                    warn!(
                        role = object.role.as_deref().unwrap_or_default(),
                        component = component.borrow().id.as_deref().unwrap_or_default(),
                        "unrecognized digital object role, counting as external link"
                    );
                    DaoCategory::ExternalLink
                })
            };
            result.record(category, dao);
        }
    }

    debug!(total = result.total(), "digital object census complete");
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::{Component, DigitalObject, Level};

    fn with_daos(id: &str, level: Level, roles: &[&str]) -> Component {
        let mut component = Component::with_level(id, level);
        for (i, role) in roles.iter().enumerate() {
            let href = format!("https://example.org/{}/{}", id, i);
            component.did.append_dao(DigitalObject::with_role(href, *role));
        }
        component
    }

    fn sample_tree() -> ComponentRef {
        let mut series = with_daos("s1", Level::Series, &["audio-service", "video-service"]);
        series.append_child(
            with_daos(
                "f1",
                Level::File,
                &["audio-service", "image-service", "image-service", "external-link"],
            )
            .into_ref(),
        );
        series.append_child(
            with_daos(
                "f2",
                Level::File,
                &["electronic-records-reading-room", "audio-reading-room", "image-service"],
            )
            .into_ref(),
        );

        let mut root = with_daos("collection", Level::Collection, &["audio-service", "image-service"]);
        root.append_child(series.into_ref());
        root.append_child(
            with_daos("f3", Level::File, &["video-reading-room", "video-service", "external-link"])
                .into_ref(),
        );
        root.into_ref()
    }

    #[test]
    fn test_census_counts() {
        let root = sample_tree();
        let result = census(&root);

        assert_eq!(result.total(), 14);
        assert_eq!(result.bucket(DaoCategory::Audio).count(), 3);
        assert_eq!(result.bucket(DaoCategory::Video).count(), 2);
        assert_eq!(result.bucket(DaoCategory::Image).count(), 4);
        assert_eq!(result.bucket(DaoCategory::ExternalLink).count(), 2);
        assert_eq!(result.bucket(DaoCategory::ElectronicRecordsReadingRoom).count(), 1);
        assert_eq!(result.bucket(DaoCategory::AudioReadingRoom).count(), 1);
        assert_eq!(result.bucket(DaoCategory::VideoReadingRoom).count(), 1);

        let per_category: usize = DaoCategory::ALL
            .iter()
            .map(|c| result.bucket(*c).count())
            .sum();
        assert_eq!(per_category, result.total());
    }

    #[test]
    fn test_census_document_order_and_owners() {
        let root = sample_tree();
        let result = census(&root);

        let audio_owners: Vec<String> = result
            .bucket(DaoCategory::Audio)
            .daos()
            .iter()
            .map(|dao| dao.borrow().owner().unwrap().borrow().id.clone().unwrap())
            .collect();
        assert_eq!(audio_owners, ["collection", "s1", "f1"]);

        for dao in result.all().daos() {
            let owner = dao.borrow().owner().unwrap();
            let held = owner
                .borrow()
                .did
                .daos()
                .iter()
                .any(|held| Rc::ptr_eq(held, dao));
            assert!(held);
        }
    }

    #[test]
    fn test_blank_and_unknown_roles() {
        let mut component = Component::with_level("f1", Level::File);
        component.did.append_dao(DigitalObject::new());
        component.did.append_dao(DigitalObject::with_role("https://example.org/x", "hologram"));
        component.did.append_dao(DigitalObject::with_role("https://example.org/y", ""));
        let root = component.into_ref();

        let result = census(&root);
        assert_eq!(result.total(), 3);
        assert_eq!(result.bucket(DaoCategory::ExternalLink).count(), 3);
    }

    #[test]
    fn test_clear() {
        let root = sample_tree();
        let mut result = census(&root);
        result.clear();
        assert_eq!(result.total(), 0);
        assert!(result.all().is_empty());
        for category in DaoCategory::ALL {
            assert!(result.bucket(category).is_empty());
        }
    }

    #[test]
    fn test_tree_without_daos() {
        let root = Component::with_level("collection", Level::Collection).into_ref();
        let result = census(&root);
        assert_eq!(result.total(), 0);
    }
}
