//! Synthetic keyboard events via CGEvent, posted to the HID tap so they
//! reach whatever application has keyboard focus.

use core_graphics::event::{CGEvent, CGEventFlags, CGEventTapLocation};
use core_graphics::event_source::{CGEventSource, CGEventSourceStateID};

use crate::error::SwitchError;
use crate::input::{KeyChord, KeySynthesizer};

pub struct SystemKeySynthesizer;

impl KeySynthesizer for SystemKeySynthesizer {
    fn post_chord(&self, chord: KeyChord) -> Result<(), SwitchError> {
        let source = CGEventSource::new(CGEventSourceStateID::CombinedSessionState)
            .map_err(|_| SwitchError::Input("could not create event source".into()))?;

        let key_down = CGEvent::new_keyboard_event(source.clone(), chord.key_code, true)
            .map_err(|_| SwitchError::Input("could not create key-down event".into()))?;
        let key_up = CGEvent::new_keyboard_event(source, chord.key_code, false)
            .map_err(|_| SwitchError::Input("could not create key-up event".into()))?;

        if chord.command {
            key_down.set_flags(CGEventFlags::CGEventFlagCommand);
        }

        key_down.post(CGEventTapLocation::HID);
        key_up.post(CGEventTapLocation::HID);
        Ok(())
    }
}
