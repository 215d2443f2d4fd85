//! Platform adapters for the clipboard, input-injection, and accessibility
//! boundaries. Other platforms supply their own implementations of the
//! boundary traits.

#[cfg(target_os = "macos")]
pub mod macos;
