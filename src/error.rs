use std::fmt;

use serde::Serialize;

/// Errors produced by the font switch engine.
///
/// Every variant except `PermissionDenied` can occur mid-protocol; the
/// engine guarantees the clipboard is restored to its captured state before
/// any of them is returned to the caller.
#[derive(Debug, thiserror::Error)]
pub enum SwitchError {
    /// The process is not trusted to synthesize input events. The switch
    /// was not attempted and the clipboard was not touched.
    #[error("accessibility trust not granted; input synthesis unavailable")]
    PermissionDenied,

    /// A clipboard read, write, or clear failed.
    #[error("clipboard: {0}")]
    Clipboard(String),

    /// The focused application put no RTF representation on the clipboard
    /// after the synthesized copy (no selection, non-rich-text field, or
    /// the settle delay elapsed before the write landed).
    #[error("no rich text on the clipboard after copy")]
    NoRichText,

    /// The clipboard's RTF payload could not be parsed.
    #[error("malformed rich text: {0}")]
    MalformedRichText(String),

    /// The target family is not installed on this system.
    #[error("unknown font family: {0}")]
    UnknownFamily(String),

    /// Posting a synthetic key event to the global input stream failed.
    #[error("input synthesis: {0}")]
    Input(String),
}

/// Errors from the persisted settings store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("settings I/O: {0}")]
    Io(#[from] std::io::Error),

    #[error("settings document: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Discriminant for collection-store errors, serialized for callers that
/// want programmatic handling rather than the registry's logged best-effort
/// behavior.
#[derive(Debug, Clone, Serialize)]
pub enum CollectionErrorCode {
    AlreadyExists,
    NotFound,
    StoreFailed,
}

/// Structured collection-store error with a machine-readable code.
#[derive(Debug, Clone, Serialize)]
pub struct CollectionError {
    pub code: CollectionErrorCode,
    pub message: String,
}

impl fmt::Display for CollectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl std::error::Error for CollectionError {}

impl CollectionError {
    /// A collection with this name already exists in the store.
    pub fn already_exists(name: &str) -> Self {
        Self {
            code: CollectionErrorCode::AlreadyExists,
            message: format!("collection '{}' already exists", name),
        }
    }

    /// No collection with this name exists in the store.
    pub fn not_found(name: &str) -> Self {
        Self {
            code: CollectionErrorCode::NotFound,
            message: format!("collection '{}' not found", name),
        }
    }

    /// The underlying store rejected the update (I/O or serialization).
    pub fn store_failed(msg: impl Into<String>) -> Self {
        Self {
            code: CollectionErrorCode::StoreFailed,
            message: msg.into(),
        }
    }
}
