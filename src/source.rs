//! Font source adapter: system font enumeration, styled-face resolution,
//! and the named-collection store.
//!
//! Family enumeration and face lookup go through font-kit's
//! [`SystemSource`]. Collections are a store of family descriptors keyed by
//! collection name; member lists are always derived by resolving the
//! descriptors against the installed families at query time, never cached.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::RwLock;

use font_kit::properties::{Style, Weight};
use font_kit::source::SystemSource;
use serde::{Deserialize, Serialize};

use crate::error::CollectionError;
use crate::settings::{atomic_write_json, default_data_dir};

/// Symbolic style traits preserved across a font substitution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct FaceTraits {
    pub bold: bool,
    pub italic: bool,
}

impl FaceTraits {
    pub const PLAIN: FaceTraits = FaceTraits {
        bold: false,
        italic: false,
    };
}

/// A stored collection query matching every face of one family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyDescriptor {
    pub family: String,
}

/// Boundary to the OS font registry.
///
/// Implementations must be Send + Sync; methods take `&self` with interior
/// mutability so the source can sit behind an `Arc` shared by the registry,
/// the collection manager, and the switch engine.
pub trait FontSource: Send + Sync {
    /// Every installed family name. Order is the enumeration order of the
    /// underlying store.
    fn all_families(&self) -> Vec<String>;

    /// Every collection name in the store, including any OS-reserved names;
    /// the registry filters those before exposing them.
    fn collection_names(&self) -> Vec<String>;

    /// Resolves the collection's descriptors to installed family names, in
    /// descriptor order. Duplicates are possible (the registry's first-wins
    /// tie-break handles them); unresolvable descriptors are skipped. A
    /// failed query degrades to an empty list.
    fn collection_members(&self, name: &str) -> Vec<String>;

    fn create_collection(&self, name: &str) -> Result<(), CollectionError>;

    fn rename_collection(&self, old: &str, new: &str) -> Result<(), CollectionError>;

    fn delete_collection(&self, name: &str) -> Result<(), CollectionError>;

    /// Adds one descriptor per family to the collection in a single store
    /// update, so concurrent readers never observe a partially applied
    /// batch.
    fn add_to_collection(&self, name: &str, families: &[String])
        -> Result<(), CollectionError>;

    /// Removes the families' descriptors from the collection in a single
    /// store update.
    fn remove_from_collection(
        &self,
        name: &str,
        families: &[String],
    ) -> Result<(), CollectionError>;

    /// Resolves the family's face matching `traits`. `PLAIN` traits answer
    /// whether the family is installed at all (returning the family name
    /// itself); styled traits return the matching face name, or `None` when
    /// the family has no such face — callers fall back to the plain family.
    fn styled_face(&self, family: &str, traits: FaceTraits) -> Option<String>;
}

/// Font source backed by the system's installed fonts (via font-kit) and a
/// JSON collection store under the user's data directory.
pub struct SystemFontSource {
    store_path: PathBuf,
    collections: RwLock<BTreeMap<String, Vec<FamilyDescriptor>>>,
}

impl SystemFontSource {
    /// Opens the source with the collection store at its default location.
    pub fn new() -> Result<Self, CollectionError> {
        Self::with_store_path(default_data_dir().join("collections.json"))
    }

    /// Opens the source with the collection store at `path`.
    pub fn with_store_path(path: impl Into<PathBuf>) -> Result<Self, CollectionError> {
        let store_path = path.into();
        let collections = if store_path.exists() {
            let content = std::fs::read_to_string(&store_path)
                .map_err(|e| CollectionError::store_failed(e.to_string()))?;
            serde_json::from_str(&content)
                .map_err(|e| CollectionError::store_failed(e.to_string()))?
        } else {
            BTreeMap::new()
        };
        Ok(Self {
            store_path,
            collections: RwLock::new(collections),
        })
    }

    fn save(
        &self,
        collections: &BTreeMap<String, Vec<FamilyDescriptor>>,
    ) -> Result<(), CollectionError> {
        atomic_write_json(&self.store_path, collections)
            .map_err(|e| CollectionError::store_failed(e.to_string()))
    }

    /// Raw descriptor families for a collection, without resolving them
    /// against the installed fonts.
    pub(crate) fn descriptor_families(&self, name: &str) -> Option<Vec<String>> {
        let collections = self.collections.read().expect("collection lock poisoned");
        collections
            .get(name)
            .map(|ds| ds.iter().map(|d| d.family.clone()).collect())
    }

    fn family_installed(family: &str) -> bool {
        let source = SystemSource::new();
        match source.select_family_by_name(family) {
            Ok(handle) => !handle.fonts().is_empty(),
            Err(_) => false,
        }
    }
}

impl FontSource for SystemFontSource {
    fn all_families(&self) -> Vec<String> {
        let source = SystemSource::new();
        match source.all_families() {
            Ok(families) => families,
            Err(e) => {
                log::warn!("Font enumeration failed: {}", e);
                Vec::new()
            }
        }
    }

    fn collection_names(&self) -> Vec<String> {
        let collections = self.collections.read().expect("collection lock poisoned");
        collections.keys().cloned().collect()
    }

    fn collection_members(&self, name: &str) -> Vec<String> {
        let descriptors = {
            let collections = self.collections.read().expect("collection lock poisoned");
            match collections.get(name) {
                Some(ds) => ds.clone(),
                None => {
                    log::debug!("Collection '{}' not in store; treating as empty", name);
                    return Vec::new();
                }
            }
        };
        descriptors
            .into_iter()
            .filter(|d| Self::family_installed(&d.family))
            .map(|d| d.family)
            .collect()
    }

    fn create_collection(&self, name: &str) -> Result<(), CollectionError> {
        let mut collections = self.collections.write().expect("collection lock poisoned");
        if collections.contains_key(name) {
            return Err(CollectionError::already_exists(name));
        }
        collections.insert(name.to_owned(), Vec::new());
        self.save(&collections)
    }

    fn rename_collection(&self, old: &str, new: &str) -> Result<(), CollectionError> {
        let mut collections = self.collections.write().expect("collection lock poisoned");
        if collections.contains_key(new) {
            return Err(CollectionError::already_exists(new));
        }
        let descriptors = collections
            .remove(old)
            .ok_or_else(|| CollectionError::not_found(old))?;
        collections.insert(new.to_owned(), descriptors);
        self.save(&collections)
    }

    fn delete_collection(&self, name: &str) -> Result<(), CollectionError> {
        let mut collections = self.collections.write().expect("collection lock poisoned");
        collections
            .remove(name)
            .ok_or_else(|| CollectionError::not_found(name))?;
        self.save(&collections)
    }

    fn add_to_collection(
        &self,
        name: &str,
        families: &[String],
    ) -> Result<(), CollectionError> {
        let mut collections = self.collections.write().expect("collection lock poisoned");
        let descriptors = collections
            .get_mut(name)
            .ok_or_else(|| CollectionError::not_found(name))?;
        for family in families {
            if !descriptors.iter().any(|d| &d.family == family) {
                descriptors.push(FamilyDescriptor {
                    family: family.clone(),
                });
            }
        }
        self.save(&collections)
    }

    fn remove_from_collection(
        &self,
        name: &str,
        families: &[String],
    ) -> Result<(), CollectionError> {
        let mut collections = self.collections.write().expect("collection lock poisoned");
        let descriptors = collections
            .get_mut(name)
            .ok_or_else(|| CollectionError::not_found(name))?;
        descriptors.retain(|d| !families.contains(&d.family));
        self.save(&collections)
    }

    fn styled_face(&self, family: &str, traits: FaceTraits) -> Option<String> {
        let source = SystemSource::new();
        let handle = source.select_family_by_name(family).ok()?;
        if handle.fonts().is_empty() {
            return None;
        }
        if traits == FaceTraits::PLAIN {
            return Some(family.to_owned());
        }
        for font_handle in handle.fonts() {
            let Ok(font) = font_handle.load() else {
                continue;
            };
            let properties = font.properties();
            let bold = properties.weight.0 >= Weight::SEMIBOLD.0;
            let italic = properties.style != Style::Normal;
            if bold == traits.bold && italic == traits.italic {
                return Some(font.full_name());
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn open(dir: &tempfile::TempDir) -> SystemFontSource {
        SystemFontSource::with_store_path(dir.path().join("collections.json")).unwrap()
    }

    #[test]
    fn create_then_duplicate_create_fails() {
        let dir = tempdir().unwrap();
        let source = open(&dir);
        source.create_collection("Work").unwrap();
        assert!(source.create_collection("Work").is_err());
        assert_eq!(source.collection_names(), vec!["Work".to_string()]);
    }

    #[test]
    fn add_batch_dedupes_descriptors() {
        let dir = tempdir().unwrap();
        let source = open(&dir);
        source.create_collection("Work").unwrap();
        source
            .add_to_collection(
                "Work",
                &["Helvetica".into(), "Georgia".into(), "Helvetica".into()],
            )
            .unwrap();
        assert_eq!(
            source.descriptor_families("Work").unwrap(),
            vec!["Helvetica".to_string(), "Georgia".to_string()]
        );
    }

    #[test]
    fn remove_batch_drops_only_named_families() {
        let dir = tempdir().unwrap();
        let source = open(&dir);
        source.create_collection("Work").unwrap();
        source
            .add_to_collection("Work", &["Helvetica".into(), "Georgia".into()])
            .unwrap();
        source
            .remove_from_collection("Work", &["Helvetica".into()])
            .unwrap();
        assert_eq!(
            source.descriptor_families("Work").unwrap(),
            vec!["Georgia".to_string()]
        );
    }

    #[test]
    fn rename_preserves_descriptors_and_rejects_conflicts() {
        let dir = tempdir().unwrap();
        let source = open(&dir);
        source.create_collection("Work").unwrap();
        source
            .add_to_collection("Work", &["Helvetica".into()])
            .unwrap();
        source.create_collection("Play").unwrap();

        assert!(source.rename_collection("Work", "Play").is_err());
        source.rename_collection("Work", "Serious").unwrap();
        assert_eq!(
            source.descriptor_families("Serious").unwrap(),
            vec!["Helvetica".to_string()]
        );
        assert!(source.descriptor_families("Work").is_none());
    }

    #[test]
    fn delete_missing_collection_is_an_error() {
        let dir = tempdir().unwrap();
        let source = open(&dir);
        assert!(source.delete_collection("Nope").is_err());
    }

    #[test]
    fn members_of_missing_collection_degrade_to_empty() {
        let dir = tempdir().unwrap();
        let source = open(&dir);
        assert!(source.collection_members("Nope").is_empty());
    }

    #[test]
    fn store_survives_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("collections.json");
        {
            let source = SystemFontSource::with_store_path(&path).unwrap();
            source.create_collection("Work").unwrap();
            source
                .add_to_collection("Work", &["Helvetica".into()])
                .unwrap();
        }
        let reopened = SystemFontSource::with_store_path(&path).unwrap();
        assert_eq!(
            reopened.descriptor_families("Work").unwrap(),
            vec!["Helvetica".to_string()]
        );
    }
}
