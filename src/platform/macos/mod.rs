//! macOS implementations of the platform boundaries: the general
//! NSPasteboard, CGEvent keyboard synthesis, and the accessibility trust
//! check.

mod accessibility;
mod input;
mod pasteboard;

pub use accessibility::SystemAccessibilityGate;
pub use input::SystemKeySynthesizer;
pub use pasteboard::SystemPasteboard;
