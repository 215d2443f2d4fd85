//! Clipboard boundary.
//!
//! The switch engine owns the system clipboard exclusively for the duration
//! of one switch. It captures every item and every representation up front
//! so the user's clipboard can be restored byte-for-byte afterwards; losing
//! a representation would make the restore lossy.

use crate::error::SwitchError;

/// Uniform type identifier for rich text.
pub const RTF_TYPE: &str = "public.rtf";

/// One clipboard item: its representations as (type identifier, payload)
/// pairs in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClipboardItem {
    reps: Vec<(String, Vec<u8>)>,
}

impl ClipboardItem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a representation. Later additions of the same type shadow
    /// earlier ones on read.
    pub fn push(&mut self, type_id: impl Into<String>, payload: Vec<u8>) {
        self.reps.push((type_id.into(), payload));
    }

    /// Payload for a type, if this item carries it.
    pub fn data(&self, type_id: &str) -> Option<&[u8]> {
        self.reps
            .iter()
            .find(|(t, _)| t == type_id)
            .map(|(_, payload)| payload.as_slice())
    }

    /// All representations in declaration order.
    pub fn reps(&self) -> &[(String, Vec<u8>)] {
        &self.reps
    }
}

/// Full capture of the clipboard: every item with every representation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClipboardArchive {
    items: Vec<ClipboardItem>,
}

impl ClipboardArchive {
    pub fn new(items: Vec<ClipboardItem>) -> Self {
        Self { items }
    }

    /// An archive holding a single RTF item, used to publish the
    /// transformed text.
    pub fn rtf(payload: Vec<u8>) -> Self {
        let mut item = ClipboardItem::new();
        item.push(RTF_TYPE, payload);
        Self { items: vec![item] }
    }

    pub fn items(&self) -> &[ClipboardItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Boundary to the OS pasteboard service.
pub trait Clipboard: Send + Sync {
    /// Captures every current item across all of its types.
    fn snapshot(&self) -> Result<ClipboardArchive, SwitchError>;

    /// Removes all items.
    fn clear(&self) -> Result<(), SwitchError>;

    /// Declares and writes the archive's items.
    fn write(&self, archive: &ClipboardArchive) -> Result<(), SwitchError>;

    /// Reads the first item's payload for `type_id`, if present.
    fn read(&self, type_id: &str) -> Result<Option<Vec<u8>>, SwitchError>;

    /// Puts the clipboard back exactly as captured.
    fn restore(&self, archive: &ClipboardArchive) -> Result<(), SwitchError> {
        self.clear()?;
        self.write(archive)
    }
}
