//! The font registry: an authoritative, de-duplicated, visibility-filtered
//! view of installed fonts and their collection membership.
//!
//! The registry never updates incrementally. Every mutation triggers a full
//! recompute of the `{all_fonts, visible_fonts, collections}` snapshot from
//! the font source and the persisted hidden set; partial updates would risk
//! the registry and the OS store drifting apart. Refresh cost is
//! O(collections × fonts), which is fine because it only runs on user
//! actions.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::accessibility::AccessibilityGate;
use crate::collections::CollectionManager;
use crate::constants::{self, keys, RESERVED_COLLECTION_NAMESPACE};
use crate::settings::SettingsStore;
use crate::source::FontSource;
use crate::visibility::HiddenFontSet;

/// One installed font family as the panel sees it.
///
/// `name` is unique within a snapshot. `collections` lists the collections
/// this family belongs to in discovery order, deduplicated, and never
/// includes the panel's synthetic "All Fonts" entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontRecord {
    pub name: String,
    pub is_visible: bool,
    pub collections: Vec<String>,
}

/// The registry's consistent view, computed in one pass.
#[derive(Debug, Clone, Default)]
pub struct RegistrySnapshot {
    pub all_fonts: Vec<FontRecord>,
    pub visible_fonts: Vec<FontRecord>,
    pub collections: Vec<String>,
}

/// Owns the snapshot and the refresh/consistency logic. Created once at
/// process start and lives for the process lifetime; all methods take
/// `&self` so the registry can sit behind an `Arc` shared with the switch
/// engine and the panel layer.
pub struct FontRegistry {
    source: Arc<dyn FontSource>,
    manager: CollectionManager,
    hidden: HiddenFontSet,
    settings: Arc<dyn SettingsStore>,
    snapshot: RwLock<RegistrySnapshot>,
    generation: watch::Sender<u64>,
}

impl FontRegistry {
    /// Builds the registry and computes the initial snapshot.
    pub fn new(source: Arc<dyn FontSource>, settings: Arc<dyn SettingsStore>) -> Self {
        let (generation, _) = watch::channel(0);
        let registry = Self {
            manager: CollectionManager::new(source.clone()),
            hidden: HiddenFontSet::new(settings.clone()),
            source,
            settings,
            snapshot: RwLock::new(RegistrySnapshot::default()),
            generation,
        };
        registry.refresh();
        registry
    }

    /// Recomputes the full snapshot from the font source and the hidden
    /// set, then notifies subscribers.
    pub fn refresh(&self) {
        let families = self.source.all_families();
        let collections: Vec<String> = self
            .source
            .collection_names()
            .into_iter()
            .filter(|name| !name.contains(RESERVED_COLLECTION_NAMESPACE))
            .collect();
        let membership = self.membership_by_family(&collections);
        let hidden = self.hidden.set();

        let all_fonts: Vec<FontRecord> = families
            .iter()
            .map(|family| FontRecord {
                name: family.clone(),
                is_visible: !hidden.contains(family),
                collections: membership.get(family).cloned().unwrap_or_default(),
            })
            .collect();
        let visible_fonts = all_fonts.iter().filter(|r| r.is_visible).cloned().collect();

        {
            let mut snapshot = self.snapshot.write().expect("registry lock poisoned");
            *snapshot = RegistrySnapshot {
                all_fonts,
                visible_fonts,
                collections,
            };
        }
        self.generation.send_modify(|g| *g += 1);
    }

    /// Receiver of a generation counter bumped on every refresh. The panel
    /// layer awaits changes instead of polling.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.generation.subscribe()
    }

    /// Clone of the current snapshot.
    pub fn snapshot(&self) -> RegistrySnapshot {
        self.snapshot.read().expect("registry lock poisoned").clone()
    }

    pub fn all_fonts(&self) -> Vec<FontRecord> {
        self.snapshot().all_fonts
    }

    pub fn visible_fonts(&self) -> Vec<FontRecord> {
        self.snapshot().visible_fonts
    }

    /// User-visible collection names, reserved namespace filtered out.
    pub fn collections(&self) -> Vec<String> {
        self.snapshot().collections
    }

    /// Merges the families into the hidden set (set semantics), persists
    /// sorted, and refreshes.
    pub fn hide(&self, fonts: &[String]) {
        self.hidden.merge(fonts.iter().cloned());
        self.refresh();
    }

    /// Removes the families from the hidden set, persists, and refreshes.
    pub fn show(&self, fonts: &[String]) {
        self.hidden.remove(fonts.iter().map(String::as_str));
        self.refresh();
    }

    /// Fonts for the panel list. Without a collection this is the visible
    /// fonts from the snapshot. With one, the member list is re-derived
    /// directly from the source — the collection's descriptor query is
    /// itself the source of truth — skipping hidden families and duplicate
    /// resolutions (the first descriptor for a family wins).
    pub fn get_fonts(&self, in_collection: Option<&str>) -> Vec<FontRecord> {
        let Some(collection) = in_collection else {
            return self.visible_fonts();
        };
        let collections = self.collections();
        let membership = self.membership_by_family(&collections);
        let hidden = self.hidden.set();

        let mut records = Vec::new();
        let mut seen = BTreeSet::new();
        for family in self.source.collection_members(collection) {
            if !seen.insert(family.clone()) {
                continue;
            }
            if hidden.contains(&family) {
                continue;
            }
            records.push(FontRecord {
                collections: membership.get(&family).cloned().unwrap_or_default(),
                name: family,
                is_visible: true,
            });
        }
        records
    }

    /// Adds the families to a collection, then refreshes. Failures are
    /// logged by the collection manager; use [`FontRegistry::collection_manager`]
    /// for the structured result.
    pub fn add(&self, fonts: &[String], to_collection: &str) {
        let _ = self.manager.add_families(to_collection, fonts);
        self.refresh();
    }

    /// Removes the families from a collection, then refreshes.
    pub fn remove(&self, fonts: &[String], from_collection: &str) {
        let _ = self.manager.remove_families(from_collection, fonts);
        self.refresh();
    }

    /// Creates an empty user-visible collection, then refreshes.
    pub fn create_collection(&self, name: &str) {
        let _ = self.manager.create(name);
        self.refresh();
    }

    /// Renames a collection, then refreshes.
    pub fn rename_collection(&self, old: &str, new: &str) {
        let _ = self.manager.rename(old, new);
        self.refresh();
    }

    /// Deletes a collection, then refreshes.
    pub fn delete_collection(&self, name: &str) {
        let _ = self.manager.delete(name);
        self.refresh();
    }

    /// The collection manager, for callers that want structured errors
    /// instead of the logged best-effort facade.
    pub fn collection_manager(&self) -> &CollectionManager {
        &self.manager
    }

    /// The collection the user last picked in the panel. The core never
    /// writes this key.
    pub fn selected_collection(&self) -> Option<String> {
        self.settings.string(keys::SELECTED_COLLECTION)
    }

    /// Replaces the hidden set with the bundled pre-hidden families that
    /// are actually installed, sorted, then refreshes.
    pub fn hide_pre_hidden_fonts(&self) {
        let installed: BTreeSet<String> = self.source.all_families().into_iter().collect();
        let seeded: BTreeSet<String> = constants::default_hidden_fonts()
            .filter(|f| installed.contains(*f))
            .map(str::to_owned)
            .collect();
        self.hidden.replace(seeded);
        self.refresh();
    }

    /// One-time launch tasks, guarded by the persisted launch flag: seed
    /// the pre-hidden fonts and present the accessibility consent dialog.
    /// Subsequent launches are no-ops so the user's later show/hide choices
    /// survive.
    pub fn run_first_launch_tasks(&self, gate: &dyn AccessibilityGate) {
        if self.settings.bool_flag(keys::HAS_LAUNCHED_BEFORE) {
            return;
        }
        self.hide_pre_hidden_fonts();
        gate.request_trust();
        if let Err(e) = self.settings.set_bool_flag(keys::HAS_LAUNCHED_BEFORE, true) {
            log::warn!("Failed to persist launch flag: {}", e);
        }
    }

    /// Collection membership per family: for every known collection,
    /// resolve its descriptors and record containment in discovery order,
    /// deduplicated.
    fn membership_by_family(&self, collections: &[String]) -> HashMap<String, Vec<String>> {
        let mut membership: HashMap<String, Vec<String>> = HashMap::new();
        for collection in collections {
            for family in self.source.collection_members(collection) {
                let entry = membership.entry(family).or_default();
                if !entry.contains(collection) {
                    entry.push(collection.clone());
                }
            }
        }
        membership
    }
}
