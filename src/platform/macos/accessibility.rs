//! Accessibility trust via the ApplicationServices AX API.

use std::ffi::c_void;

use core_foundation::base::TCFType;
use core_foundation::boolean::CFBoolean;
use core_foundation::dictionary::CFDictionary;
use core_foundation::string::CFString;

use crate::accessibility::AccessibilityGate;

#[link(name = "ApplicationServices", kind = "framework")]
extern "C" {
    fn AXIsProcessTrusted() -> bool;
    fn AXIsProcessTrustedWithOptions(options: *const c_void) -> bool;
}

// Key for prompting the user for accessibility permissions
const K_AX_TRUSTED_CHECK_OPTION_PROMPT: &str = "AXTrustedCheckOptionPrompt";

/// Gate backed by `AXIsProcessTrusted`. Granting trust typically requires
/// an app restart before the check flips.
pub struct SystemAccessibilityGate;

impl AccessibilityGate for SystemAccessibilityGate {
    fn is_trusted(&self) -> bool {
        unsafe { AXIsProcessTrusted() }
    }

    fn request_trust(&self) {
        let key = CFString::new(K_AX_TRUSTED_CHECK_OPTION_PROMPT);
        let value = CFBoolean::true_value();

        let pairs = [(key.as_CFType(), value.as_CFType())];
        let options = CFDictionary::from_CFType_pairs(&pairs);

        unsafe {
            AXIsProcessTrustedWithOptions(options.as_concrete_TypeRef().cast());
        }
    }
}
