//! fontswap — the font registry and switch engine behind a font picker
//! panel.
//!
//! Two halves:
//!
//! - The [`registry::FontRegistry`] keeps an authoritative, de-duplicated,
//!   visibility-filtered view of every installed font family and its
//!   membership in user-defined collections, recomputed in full on every
//!   mutation.
//! - The [`switch::SwitchEngine`] changes the font of the text currently
//!   selected in a foreign application via a clipboard-swap and synthetic
//!   ⌘C/⌘V protocol, with a guaranteed clipboard restore on every exit
//!   path.
//!
//! The OS seams — font store, pasteboard, input injection, accessibility
//! trust, persisted settings — are traits, with real implementations in
//! [`source`], [`settings`], and [`platform`]. The presentation layer
//! (panel, search, hotkeys, consent UI) lives outside this crate.

pub mod accessibility;
pub mod clipboard;
pub mod collections;
pub mod constants;
pub mod error;
pub mod input;
pub mod platform;
pub mod registry;
pub mod settings;
pub mod source;
pub mod switch;
pub mod visibility;

#[cfg(test)]
pub(crate) mod testutil;

pub use accessibility::AccessibilityGate;
pub use clipboard::{Clipboard, ClipboardArchive, ClipboardItem, RTF_TYPE};
pub use collections::CollectionManager;
pub use error::{CollectionError, StoreError, SwitchError};
pub use input::{KeyChord, KeySynthesizer};
pub use registry::{FontRecord, FontRegistry, RegistrySnapshot};
pub use settings::{JsonFileStore, MemoryStore, SettingsStore};
pub use source::{FaceTraits, FontSource, SystemFontSource};
pub use switch::{SwitchConfig, SwitchEngine};
pub use visibility::HiddenFontSet;
