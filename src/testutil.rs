//! Shared fakes for the platform boundaries, used across the crate's unit
//! tests.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::accessibility::AccessibilityGate;
use crate::clipboard::{Clipboard, ClipboardArchive, RTF_TYPE};
use crate::error::{CollectionError, SwitchError};
use crate::input::{KeyChord, KeySynthesizer};
use crate::source::{FaceTraits, FontSource};

/// In-memory font source with a fixed family list, a scriptable styled-face
/// table, and a collection store of family descriptors.
pub struct FakeFontSource {
    families: Vec<String>,
    faces: Mutex<HashMap<(String, FaceTraits), String>>,
    collections: Mutex<BTreeMap<String, Vec<String>>>,
}

impl FakeFontSource {
    pub fn new(families: &[&str]) -> Self {
        Self {
            families: families.iter().map(|f| f.to_string()).collect(),
            faces: Mutex::new(HashMap::new()),
            collections: Mutex::new(BTreeMap::new()),
        }
    }

    /// Registers a styled face for a family, e.g. ("Georgia", bold) ->
    /// "Georgia Bold".
    pub fn with_face(self, family: &str, traits: FaceTraits, face: &str) -> Self {
        self.faces
            .lock()
            .unwrap()
            .insert((family.to_string(), traits), face.to_string());
        self
    }

    /// Seeds a collection's raw descriptor list, bypassing the batch-update
    /// API. Duplicates are preserved, letting tests exercise the registry's
    /// first-descriptor-wins tie-break.
    pub fn insert_collection(&self, name: &str, members: &[&str]) {
        self.collections
            .lock()
            .unwrap()
            .insert(name.to_string(), members.iter().map(|m| m.to_string()).collect());
    }
}

impl FontSource for FakeFontSource {
    fn all_families(&self) -> Vec<String> {
        self.families.clone()
    }

    fn collection_names(&self) -> Vec<String> {
        self.collections.lock().unwrap().keys().cloned().collect()
    }

    fn collection_members(&self, name: &str) -> Vec<String> {
        let collections = self.collections.lock().unwrap();
        collections
            .get(name)
            .map(|members| {
                members
                    .iter()
                    .filter(|m| self.families.contains(m))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    fn create_collection(&self, name: &str) -> Result<(), CollectionError> {
        let mut collections = self.collections.lock().unwrap();
        if collections.contains_key(name) {
            return Err(CollectionError::already_exists(name));
        }
        collections.insert(name.to_string(), Vec::new());
        Ok(())
    }

    fn rename_collection(&self, old: &str, new: &str) -> Result<(), CollectionError> {
        let mut collections = self.collections.lock().unwrap();
        if collections.contains_key(new) {
            return Err(CollectionError::already_exists(new));
        }
        let members = collections
            .remove(old)
            .ok_or_else(|| CollectionError::not_found(old))?;
        collections.insert(new.to_string(), members);
        Ok(())
    }

    fn delete_collection(&self, name: &str) -> Result<(), CollectionError> {
        self.collections
            .lock()
            .unwrap()
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| CollectionError::not_found(name))
    }

    fn add_to_collection(
        &self,
        name: &str,
        families: &[String],
    ) -> Result<(), CollectionError> {
        let mut collections = self.collections.lock().unwrap();
        let members = collections
            .get_mut(name)
            .ok_or_else(|| CollectionError::not_found(name))?;
        for family in families {
            if !members.contains(family) {
                members.push(family.clone());
            }
        }
        Ok(())
    }

    fn remove_from_collection(
        &self,
        name: &str,
        families: &[String],
    ) -> Result<(), CollectionError> {
        let mut collections = self.collections.lock().unwrap();
        let members = collections
            .get_mut(name)
            .ok_or_else(|| CollectionError::not_found(name))?;
        members.retain(|m| !families.contains(m));
        Ok(())
    }

    fn styled_face(&self, family: &str, traits: FaceTraits) -> Option<String> {
        if !self.families.iter().any(|f| f == family) {
            return None;
        }
        if traits == FaceTraits::PLAIN {
            return Some(family.to_string());
        }
        self.faces
            .lock()
            .unwrap()
            .get(&(family.to_string(), traits))
            .cloned()
    }
}

/// In-memory clipboard. `write` appends to the current items, so a
/// clear-then-write sequence behaves like the real pasteboard's
/// declare-and-set.
#[derive(Default)]
pub struct FakeClipboard {
    state: Mutex<ClipboardArchive>,
}

impl FakeClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_contents(&self, archive: ClipboardArchive) {
        *self.state.lock().unwrap() = archive;
    }

    pub fn contents(&self) -> ClipboardArchive {
        self.state.lock().unwrap().clone()
    }
}

impl Clipboard for FakeClipboard {
    fn snapshot(&self) -> Result<ClipboardArchive, SwitchError> {
        Ok(self.state.lock().unwrap().clone())
    }

    fn clear(&self) -> Result<(), SwitchError> {
        *self.state.lock().unwrap() = ClipboardArchive::default();
        Ok(())
    }

    fn write(&self, archive: &ClipboardArchive) -> Result<(), SwitchError> {
        let mut state = self.state.lock().unwrap();
        let mut items = state.items().to_vec();
        items.extend(archive.items().iter().cloned());
        *state = ClipboardArchive::new(items);
        Ok(())
    }

    fn read(&self, type_id: &str) -> Result<Option<Vec<u8>>, SwitchError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .items()
            .iter()
            .find_map(|item| item.data(type_id).map(|d| d.to_vec())))
    }
}

/// Stand-in for the focused foreign application: reacts to the synthesized
/// copy chord by placing its "selection" on the clipboard, and to the paste
/// chord by reading the clipboard's RTF into its document.
pub struct FakeForeignApp {
    clipboard: Arc<FakeClipboard>,
    selection_rtf: Mutex<Option<Vec<u8>>>,
    pasted: Mutex<Vec<Vec<u8>>>,
}

impl FakeForeignApp {
    pub fn new(clipboard: Arc<FakeClipboard>, selection_rtf: Option<Vec<u8>>) -> Self {
        Self {
            clipboard,
            selection_rtf: Mutex::new(selection_rtf),
            pasted: Mutex::new(Vec::new()),
        }
    }

    /// RTF payloads pasted into the foreign document, in order.
    pub fn pasted(&self) -> Vec<Vec<u8>> {
        self.pasted.lock().unwrap().clone()
    }
}

impl KeySynthesizer for FakeForeignApp {
    fn post_chord(&self, chord: KeyChord) -> Result<(), SwitchError> {
        if chord == KeyChord::COPY {
            if let Some(rtf) = self.selection_rtf.lock().unwrap().clone() {
                self.clipboard.clear()?;
                self.clipboard.write(&ClipboardArchive::rtf(rtf))?;
            }
        } else if chord == KeyChord::PASTE {
            if let Some(data) = self.clipboard.read(RTF_TYPE)? {
                self.pasted.lock().unwrap().push(data);
            }
        }
        Ok(())
    }
}

/// Accessibility gate with a settable trust state.
pub struct FakeGate {
    trusted: AtomicBool,
    prompted: AtomicBool,
}

impl FakeGate {
    pub fn trusted() -> Self {
        Self {
            trusted: AtomicBool::new(true),
            prompted: AtomicBool::new(false),
        }
    }

    pub fn untrusted() -> Self {
        Self {
            trusted: AtomicBool::new(false),
            prompted: AtomicBool::new(false),
        }
    }

    pub fn was_prompted(&self) -> bool {
        self.prompted.load(Ordering::SeqCst)
    }
}

impl AccessibilityGate for FakeGate {
    fn is_trusted(&self) -> bool {
        self.trusted.load(Ordering::SeqCst)
    }

    fn request_trust(&self) {
        self.prompted.store(true, Ordering::SeqCst);
    }
}
