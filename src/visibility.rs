//! Persisted set of hidden family names.
//!
//! Membership is set-semantics; the persisted form is sorted ascending so
//! the stored document is deterministic, and every mutation rewrites the
//! whole list.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::constants::keys;
use crate::settings::SettingsStore;

/// The hidden-font set backed by the settings store.
pub struct HiddenFontSet {
    store: Arc<dyn SettingsStore>,
}

impl HiddenFontSet {
    pub fn new(store: Arc<dyn SettingsStore>) -> Self {
        Self { store }
    }

    /// Current hidden family names, in persisted (sorted) order.
    pub fn names(&self) -> Vec<String> {
        self.store.string_list(keys::HIDDEN_FONTS)
    }

    /// Current hidden family names as a set.
    pub fn set(&self) -> BTreeSet<String> {
        self.names().into_iter().collect()
    }

    /// Merges `names` into the hidden set and persists. Already-hidden
    /// names are absorbed without effect.
    pub fn merge(&self, names: impl IntoIterator<Item = String>) {
        let mut hidden = self.set();
        hidden.extend(names);
        self.persist(hidden);
    }

    /// Removes `names` from the hidden set and persists. Names not in the
    /// set are ignored.
    pub fn remove<'a>(&self, names: impl IntoIterator<Item = &'a str>) {
        let mut hidden = self.set();
        for name in names {
            hidden.remove(name);
        }
        self.persist(hidden);
    }

    /// Replaces the entire hidden set. Used by the one-time pre-hidden
    /// seeding.
    pub fn replace(&self, names: impl IntoIterator<Item = String>) {
        self.persist(names.into_iter().collect());
    }

    fn persist(&self, hidden: BTreeSet<String>) {
        let sorted: Vec<String> = hidden.into_iter().collect();
        if let Err(e) = self.store.set_string_list(keys::HIDDEN_FONTS, &sorted) {
            log::warn!("Failed to persist hidden font list: {}", e);
        }
    }
}
