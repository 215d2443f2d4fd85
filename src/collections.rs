//! Collection lifecycle: create, rename, delete, and batch membership
//! updates, delegating storage to the font source.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::error::CollectionError;
use crate::source::FontSource;

/// Manages named collections in the font source's store.
///
/// All methods return structured errors for callers that want them; the
/// registry facade logs failures and carries on, preserving the
/// best-effort contract of collection operations (a failed create simply
/// leaves the collection list unchanged on the next query).
pub struct CollectionManager {
    source: Arc<dyn FontSource>,
}

impl CollectionManager {
    pub fn new(source: Arc<dyn FontSource>) -> Self {
        Self { source }
    }

    /// Materializes a new, empty, user-visible collection.
    pub fn create(&self, name: &str) -> Result<(), CollectionError> {
        self.source.create_collection(name).inspect_err(|e| {
            log::warn!("Error creating collection '{}': {}", name, e);
        })
    }

    pub fn rename(&self, old: &str, new: &str) -> Result<(), CollectionError> {
        self.source.rename_collection(old, new).inspect_err(|e| {
            log::warn!("Error renaming collection '{}' to '{}': {}", old, new, e);
        })
    }

    pub fn delete(&self, name: &str) -> Result<(), CollectionError> {
        self.source.delete_collection(name).inspect_err(|e| {
            log::warn!("Error deleting collection '{}': {}", name, e);
        })
    }

    /// Adds one descriptor per distinct family to the collection as a
    /// single batch update.
    pub fn add_families(
        &self,
        collection: &str,
        families: &[String],
    ) -> Result<(), CollectionError> {
        let batch = dedupe(families);
        self.source
            .add_to_collection(collection, &batch)
            .inspect_err(|e| {
                log::warn!("Error updating collection '{}': {}", collection, e);
            })
    }

    /// Removes the families' descriptors from the collection as a single
    /// batch update.
    pub fn remove_families(
        &self,
        collection: &str,
        families: &[String],
    ) -> Result<(), CollectionError> {
        let batch = dedupe(families);
        self.source
            .remove_from_collection(collection, &batch)
            .inspect_err(|e| {
                log::warn!("Error updating collection '{}': {}", collection, e);
            })
    }
}

fn dedupe(families: &[String]) -> Vec<String> {
    let mut seen = BTreeSet::new();
    families
        .iter()
        .filter(|f| seen.insert(f.as_str()))
        .cloned()
        .collect()
}
