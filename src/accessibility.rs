//! Accessibility capability boundary.
//!
//! Synthetic keystrokes only take effect when the process holds system
//! accessibility trust. The core consumes a boolean capability check; the
//! consent dialog itself belongs to the OS.

use std::time::Duration;

/// Boundary to the OS accessibility capability service.
pub trait AccessibilityGate: Send + Sync {
    /// Whether the process is currently trusted to synthesize input events
    /// system-wide.
    fn is_trusted(&self) -> bool;

    /// Asks the OS to present its consent dialog. Called at most once, on
    /// the first-launch path; granting typically requires an app restart to
    /// take effect, so the return value of `is_trusted` may lag.
    fn request_trust(&self);
}

/// Polls the gate until trust is granted. The panel layer uses this to
/// dismiss its "no access" screen once the user flips the toggle in system
/// settings.
pub async fn await_trust(gate: &dyn AccessibilityGate, interval: Duration) {
    loop {
        if gate.is_trusted() {
            return;
        }
        tokio::time::sleep(interval).await;
    }
}
