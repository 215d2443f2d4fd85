//! The font switch engine.
//!
//! Changes the font family of the text currently selected in whatever
//! foreign application has keyboard focus. No API exists for styling
//! another application's text directly, so the engine works through the
//! clipboard: capture the user's clipboard, synthesize a copy to lift the
//! selection, rewrite the RTF's fonts, synthesize a paste to put the
//! restyled text back, and restore the original clipboard.
//!
//! The clipboard is exclusively the engine's for the duration of one switch
//! (capture through restore); a single-flight mutex serializes concurrent
//! requests, which would otherwise corrupt the capture/restore pairing.

pub mod rtf;

use std::sync::Arc;
use std::time::Duration;

use crate::accessibility::AccessibilityGate;
use crate::clipboard::{Clipboard, ClipboardArchive, RTF_TYPE};
use crate::constants::SETTLE_DELAY;
use crate::error::SwitchError;
use crate::input::{KeyChord, KeySynthesizer};
use crate::registry::FontRegistry;
use crate::source::{FaceTraits, FontSource};

/// Tunable protocol parameters. The settle delay tolerates the foreign
/// application's asynchronous clipboard write, for which no completion
/// signal exists; tests shrink it to keep suites fast.
#[derive(Debug, Clone)]
pub struct SwitchConfig {
    pub settle_delay: Duration,
    pub copy_chord: KeyChord,
    pub paste_chord: KeyChord,
}

impl Default for SwitchConfig {
    fn default() -> Self {
        Self {
            settle_delay: SETTLE_DELAY,
            copy_chord: KeyChord::COPY,
            paste_chord: KeyChord::PASTE,
        }
    }
}

/// Executes the clipboard-swap protocol against the focused application.
pub struct SwitchEngine {
    clipboard: Arc<dyn Clipboard>,
    keys: Arc<dyn KeySynthesizer>,
    gate: Arc<dyn AccessibilityGate>,
    source: Arc<dyn FontSource>,
    registry: Arc<FontRegistry>,
    config: SwitchConfig,
    in_flight: tokio::sync::Mutex<()>,
}

impl SwitchEngine {
    pub fn new(
        clipboard: Arc<dyn Clipboard>,
        keys: Arc<dyn KeySynthesizer>,
        gate: Arc<dyn AccessibilityGate>,
        source: Arc<dyn FontSource>,
        registry: Arc<FontRegistry>,
        config: SwitchConfig,
    ) -> Self {
        Self {
            clipboard,
            keys,
            gate,
            source,
            registry,
            config,
            in_flight: tokio::sync::Mutex::new(()),
        }
    }

    /// Retargets the current selection's font to `family`.
    ///
    /// Without accessibility trust this returns immediately and the
    /// clipboard is never touched. Once the capture has happened, every
    /// exit path — success or abort — restores the captured clipboard, so
    /// the net effect on the clipboard is always zero. A request arriving
    /// while another switch is in flight queues behind it.
    pub async fn switch_font(&self, family: &str) -> Result<(), SwitchError> {
        if !self.gate.is_trusted() {
            return Err(SwitchError::PermissionDenied);
        }
        let _guard = self.in_flight.lock().await;

        let archive = self.clipboard.snapshot()?;
        let result = self.run_protocol(family).await;
        if let Err(e) = self.clipboard.restore(&archive) {
            log::error!("Failed to restore clipboard after switch: {}", e);
        }

        // Switching can change "last used" ordering in panel state.
        self.registry.refresh();

        if let Err(e) = &result {
            log::warn!("Font switch to '{}' aborted: {}", family, e);
        }
        result
    }

    /// Steps 2 through 6: copy, settle, transform, paste, settle. The
    /// caller holds the captured archive and restores it unconditionally.
    async fn run_protocol(&self, family: &str) -> Result<(), SwitchError> {
        self.clipboard.clear()?;
        self.keys.post_chord(self.config.copy_chord)?;
        tokio::time::sleep(self.config.settle_delay).await;

        let payload = self
            .clipboard
            .read(RTF_TYPE)?
            .ok_or(SwitchError::NoRichText)?;
        let rtf = String::from_utf8(payload)
            .map_err(|_| SwitchError::MalformedRichText("payload is not UTF-8".into()))?;

        if self.source.styled_face(family, FaceTraits::PLAIN).is_none() {
            return Err(SwitchError::UnknownFamily(family.to_owned()));
        }
        let transformed = rtf::substitute_family(&rtf, family, self.source.as_ref())?;

        self.clipboard.clear()?;
        self.clipboard
            .write(&ClipboardArchive::rtf(transformed.into_bytes()))?;
        self.keys.post_chord(self.config.paste_chord)?;
        tokio::time::sleep(self.config.settle_delay).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::ClipboardItem;
    use crate::settings::MemoryStore;
    use crate::testutil::{FakeClipboard, FakeFontSource, FakeForeignApp, FakeGate};

    const SELECTION: &str = "{\\rtf1\\ansi\
{\\fonttbl\\f0\\froman\\fcharset0 Helvetica-Bold;\\f1\\fswiss\\fcharset0 Helvetica;}\
\\f0\\b\\fs28 Hello \\f1\\b0\\fs24 world}";

    struct Rig {
        engine: SwitchEngine,
        clipboard: Arc<FakeClipboard>,
        foreign_app: Arc<FakeForeignApp>,
    }

    fn rig_with(selection: Option<&str>, gate: FakeGate) -> Rig {
        let _ = env_logger::builder().is_test(true).try_init();
        let clipboard = Arc::new(FakeClipboard::new());
        let foreign_app = Arc::new(FakeForeignApp::new(
            clipboard.clone(),
            selection.map(|s| s.as_bytes().to_vec()),
        ));
        let source = Arc::new(
            FakeFontSource::new(&["Georgia", "Helvetica"]).with_face(
                "Georgia",
                FaceTraits {
                    bold: true,
                    italic: false,
                },
                "Georgia Bold",
            ),
        );
        let registry = Arc::new(FontRegistry::new(
            source.clone(),
            Arc::new(MemoryStore::new()),
        ));
        let config = SwitchConfig {
            settle_delay: Duration::from_millis(1),
            ..SwitchConfig::default()
        };
        let engine = SwitchEngine::new(
            clipboard.clone(),
            foreign_app.clone(),
            Arc::new(gate),
            source,
            registry,
            config,
        );
        Rig {
            engine,
            clipboard,
            foreign_app,
        }
    }

    fn user_clipboard() -> ClipboardArchive {
        let mut item = ClipboardItem::new();
        item.push("public.utf8-plain-text", b"shopping list".to_vec());
        item.push("public.png", vec![0x89, 0x50, 0x4e, 0x47]);
        ClipboardArchive::new(vec![item])
    }

    #[tokio::test(start_paused = true)]
    async fn successful_switch_pastes_transformed_rtf() {
        let rig = rig_with(Some(SELECTION), FakeGate::trusted());
        rig.engine.switch_font("Georgia").await.unwrap();

        let pasted = rig.foreign_app.pasted();
        assert_eq!(pasted.len(), 1);
        let body = String::from_utf8(pasted[0].clone()).unwrap();
        assert!(body.contains("Georgia Bold;"));
        assert!(body.contains("\\fcharset0 Georgia;"));
        assert!(body.contains("\\f0\\b\\fs28 Hello "));
        assert!(!body.contains("Helvetica"));
    }

    #[tokio::test(start_paused = true)]
    async fn clipboard_is_restored_after_success() {
        let rig = rig_with(Some(SELECTION), FakeGate::trusted());
        rig.clipboard.set_contents(user_clipboard());

        rig.engine.switch_font("Georgia").await.unwrap();
        assert_eq!(rig.clipboard.contents(), user_clipboard());
    }

    #[tokio::test(start_paused = true)]
    async fn clipboard_is_restored_when_no_rich_text_appears() {
        // Foreign app has no selection, so no RTF lands after the copy.
        let rig = rig_with(None, FakeGate::trusted());
        rig.clipboard.set_contents(user_clipboard());

        let err = rig.engine.switch_font("Georgia").await.unwrap_err();
        assert!(matches!(err, SwitchError::NoRichText));
        assert_eq!(rig.clipboard.contents(), user_clipboard());
        assert!(rig.foreign_app.pasted().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn clipboard_is_restored_on_malformed_rtf() {
        let rig = rig_with(Some("{\\rtf1 no font table}"), FakeGate::trusted());
        rig.clipboard.set_contents(user_clipboard());

        let err = rig.engine.switch_font("Georgia").await.unwrap_err();
        assert!(matches!(err, SwitchError::MalformedRichText(_)));
        assert_eq!(rig.clipboard.contents(), user_clipboard());
    }

    #[tokio::test(start_paused = true)]
    async fn unknown_family_aborts_with_restore() {
        let rig = rig_with(Some(SELECTION), FakeGate::trusted());
        rig.clipboard.set_contents(user_clipboard());

        let err = rig.engine.switch_font("No Such Family").await.unwrap_err();
        assert!(matches!(err, SwitchError::UnknownFamily(_)));
        assert_eq!(rig.clipboard.contents(), user_clipboard());
        assert!(rig.foreign_app.pasted().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn untrusted_process_never_touches_the_clipboard() {
        let rig = rig_with(Some(SELECTION), FakeGate::untrusted());
        rig.clipboard.set_contents(user_clipboard());

        let err = rig.engine.switch_font("Georgia").await.unwrap_err();
        assert!(matches!(err, SwitchError::PermissionDenied));
        assert_eq!(rig.clipboard.contents(), user_clipboard());
        assert!(rig.foreign_app.pasted().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn sequential_switches_each_restore_the_latest_capture() {
        let rig = rig_with(Some(SELECTION), FakeGate::trusted());
        rig.clipboard.set_contents(user_clipboard());
        rig.engine.switch_font("Georgia").await.unwrap();

        // Second attempt starts from the restored clipboard and fails on an
        // unknown family; the net clipboard effect stays zero.
        let _ = rig.engine.switch_font("No Such Family").await;
        assert_eq!(rig.clipboard.contents(), user_clipboard());
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_requests_queue_behind_the_in_flight_switch() {
        let rig = rig_with(Some(SELECTION), FakeGate::trusted());
        let engine = Arc::new(rig.engine);

        let first = {
            let engine = engine.clone();
            tokio::spawn(async move { engine.switch_font("Georgia").await })
        };
        let second = {
            let engine = engine.clone();
            tokio::spawn(async move { engine.switch_font("Helvetica").await })
        };
        first.await.unwrap().unwrap();
        second.await.unwrap().unwrap();

        // Both completed and both pasted; interleaving would have corrupted
        // the capture/restore pairing and lost one paste.
        assert_eq!(rig.foreign_app.pasted().len(), 2);
    }
}
