//! Synthetic keyboard input boundary.

use crate::constants::{COPY_KEY_CODE, PASTE_KEY_CODE};
use crate::error::SwitchError;

/// A virtual key press, optionally with the command/meta modifier held.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyChord {
    pub key_code: u16,
    pub command: bool,
}

impl KeyChord {
    /// The platform copy shortcut (⌘C).
    pub const COPY: KeyChord = KeyChord {
        key_code: COPY_KEY_CODE,
        command: true,
    };

    /// The platform paste shortcut (⌘V).
    pub const PASTE: KeyChord = KeyChord {
        key_code: PASTE_KEY_CODE,
        command: true,
    };
}

/// Boundary to the OS input-injection service: posts a key-down/key-up pair
/// to the global input stream, reaching whatever application has keyboard
/// focus.
pub trait KeySynthesizer: Send + Sync {
    fn post_chord(&self, chord: KeyChord) -> Result<(), SwitchError>;
}
