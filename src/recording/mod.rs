// SPDX-License-Identifier: MPL-2.0
//! Recording controller.
//!
//! Drives a platform speech engine through a two-state toggle and keeps a
//! localized status line. The engine's language follows the resolver: it is
//! set when the controller is built, at every session start, and on every
//! locale change.

use crate::error::Result;
use crate::i18n::{I18n, Locale};
use unic_langid::LanguageIdentifier;

/// Platform speech-recognition capability.
pub trait SpeechEngine {
    fn set_language(&mut self, tag: &LanguageIdentifier);

    /// Begins capturing.
    ///
    /// # Errors
    ///
    /// Returns an error if capture cannot start (e.g. microphone permission denied).
    fn start(&mut self) -> Result<()>;

    fn stop(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordingState {
    #[default]
    Idle,
    Recording,
}

/// Text shown next to the recording buttons.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatusLine {
    pub message: String,
    /// Whether the line should be styled as "recording in progress".
    pub recording: bool,
}

pub struct RecordingController<E> {
    engine: Option<E>,
    state: RecordingState,
    status: StatusLine,
}

impl<E: SpeechEngine> RecordingController<E> {
    /// Builds a controller. `None` means the platform has no speech engine.
    pub fn new(mut engine: Option<E>, i18n: &I18n) -> Self {
        if let Some(engine) = engine.as_mut() {
            engine.set_language(&i18n.speech_language_tag());
        } else {
            tracing::info!("speech recognition not available");
        }

        Self {
            engine,
            state: RecordingState::Idle,
            status: StatusLine::default(),
        }
    }

    pub fn is_supported(&self) -> bool {
        self.engine.is_some()
    }

    pub fn state(&self) -> RecordingState {
        self.state
    }

    pub fn status(&self) -> &StatusLine {
        &self.status
    }

    pub fn engine(&self) -> Option<&E> {
        self.engine.as_ref()
    }

    /// Label for the start button when recording is impossible.
    pub fn unsupported_label(&self, i18n: &I18n) -> Option<String> {
        if self.is_supported() {
            None
        } else {
            Some(format!("⚠️ {}", i18n.tr("notSupported")))
        }
    }

    pub fn can_start(&self) -> bool {
        self.is_supported() && self.state == RecordingState::Idle
    }

    pub fn can_stop(&self) -> bool {
        self.state == RecordingState::Recording
    }

    /// Starts a session. Returns whether recording is now in progress.
    pub fn start(&mut self, i18n: &I18n) -> bool {
        if self.state == RecordingState::Recording {
            return true;
        }
        let Some(engine) = self.engine.as_mut() else {
            return false;
        };

        engine.set_language(&i18n.speech_language_tag());
        match engine.start() {
            Ok(()) => {
                self.state = RecordingState::Recording;
                self.set_status(i18n.tr("recording"), true);
                true
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to start recording");
                self.set_status(i18n.tr("startFailed"), false);
                false
            }
        }
    }

    /// Ends the session. No-op unless recording.
    pub fn stop(&mut self, i18n: &I18n) {
        if self.halt() {
            self.set_status(i18n.tr("recordingStopped"), false);
        }
    }

    /// Engine reported an error: end the session and show the error.
    ///
    /// The error line replaces the "stopped" status a plain [`stop`](Self::stop)
    /// would write, so the cause stays visible.
    pub fn on_error(&mut self, detail: &str, i18n: &I18n) {
        tracing::error!(detail, "speech recognition error");
        self.halt();
        self.set_status(format!("{}{}", i18n.tr("recordingError"), detail), false);
    }

    /// Pushes the new locale's speech tag to the engine.
    pub fn on_locale_change(&mut self, locale: Locale) {
        if let Some(engine) = self.engine.as_mut() {
            engine.set_language(&locale.speech_tag());
        }
    }

    fn halt(&mut self) -> bool {
        if self.state != RecordingState::Recording {
            return false;
        }
        if let Some(engine) = self.engine.as_mut() {
            engine.stop();
        }
        self.state = RecordingState::Idle;
        true
    }

    fn set_status(&mut self, message: String, recording: bool) {
        self.status = StatusLine { message, recording };
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::app::storage::MemoryStore;
    use crate::error::Error;
    use crate::ui::page::Page;

    /// Engine double recording every call.
    #[derive(Debug, Default)]
    pub(crate) struct FakeEngine {
        pub languages: Vec<String>,
        pub starts: usize,
        pub stops: usize,
        pub deny_start: bool,
    }

    impl SpeechEngine for FakeEngine {
        fn set_language(&mut self, tag: &LanguageIdentifier) {
            self.languages.push(tag.to_string());
        }

        fn start(&mut self) -> Result<()> {
            if self.deny_start {
                return Err(Error::Speech("not-allowed".to_string()));
            }
            self.starts += 1;
            Ok(())
        }

        fn stop(&mut self) {
            self.stops += 1;
        }
    }

    fn i18n(lang: &str) -> I18n {
        I18n::new(Some(lang), Box::new(MemoryStore::new()))
    }

    #[test]
    fn new_sets_engine_language() {
        let controller = RecordingController::new(Some(FakeEngine::default()), &i18n("fr"));
        assert_eq!(controller.engine().map(|e| e.languages.clone()), Some(vec!["fr-FR".to_string()]));
        assert!(controller.can_start());
        assert!(!controller.can_stop());
    }

    #[test]
    fn start_and_stop_cycle_updates_status() {
        let i18n = i18n("en");
        let mut controller = RecordingController::new(Some(FakeEngine::default()), &i18n);

        assert!(controller.start(&i18n));
        assert_eq!(controller.state(), RecordingState::Recording);
        assert_eq!(
            controller.status(),
            &StatusLine {
                message: "Recording...".to_string(),
                recording: true
            }
        );

        controller.stop(&i18n);
        assert_eq!(controller.state(), RecordingState::Idle);
        assert_eq!(controller.status().message, "Recording stopped");
        assert_eq!(controller.engine().map(|e| e.stops), Some(1));
    }

    #[test]
    fn start_queries_tag_per_session() {
        let mut i18n = i18n("en");
        let mut controller = RecordingController::new(Some(FakeEngine::default()), &i18n);
        controller.start(&i18n);
        controller.stop(&i18n);

        let mut page = Page::new();
        i18n.set_locale("zh", &mut page);
        controller.start(&i18n);

        let languages = controller.engine().map(|e| e.languages.clone()).unwrap_or_default();
        assert_eq!(languages.last().map(String::as_str), Some("zh-CN"));
        assert_eq!(controller.status().message, "正在录音...");
    }

    #[test]
    fn stop_when_idle_is_noop() {
        let i18n = i18n("en");
        let mut controller = RecordingController::new(Some(FakeEngine::default()), &i18n);
        controller.stop(&i18n);
        assert_eq!(controller.status(), &StatusLine::default());
        assert_eq!(controller.engine().map(|e| e.stops), Some(0));
    }

    #[test]
    fn denied_start_reports_failure() {
        let i18n = i18n("en");
        let engine = FakeEngine {
            deny_start: true,
            ..FakeEngine::default()
        };
        let mut controller = RecordingController::new(Some(engine), &i18n);

        assert!(!controller.start(&i18n));
        assert_eq!(controller.state(), RecordingState::Idle);
        assert_eq!(
            controller.status().message,
            "Failed to start recording, check microphone permission"
        );
    }

    #[test]
    fn engine_error_stops_and_keeps_detail() {
        let i18n = i18n("fr");
        let mut controller = RecordingController::new(Some(FakeEngine::default()), &i18n);
        controller.start(&i18n);

        controller.on_error("no-speech", &i18n);
        assert_eq!(controller.state(), RecordingState::Idle);
        assert_eq!(controller.status().message, "Erreur reconnaissance vocale: no-speech");
        assert!(!controller.status().recording);
        assert_eq!(controller.engine().map(|e| e.stops), Some(1));
    }

    #[test]
    fn engine_error_while_idle_only_reports() {
        let i18n = i18n("en");
        let mut controller = RecordingController::new(Some(FakeEngine::default()), &i18n);

        controller.on_error("network", &i18n);
        assert_eq!(controller.state(), RecordingState::Idle);
        assert_eq!(controller.status().message, "Speech recognition error: network");
        assert_eq!(controller.engine().map(|e| e.stops), Some(0));
    }

    #[test]
    fn unsupported_platform_cannot_record() {
        let i18n = i18n("zh");
        let mut controller: RecordingController<FakeEngine> = RecordingController::new(None, &i18n);
        assert!(!controller.can_start());
        assert!(!controller.start(&i18n));
        assert_eq!(
            controller.unsupported_label(&i18n),
            Some("⚠️ 浏览器不支持语音识别".to_string())
        );
    }

    #[test]
    fn locale_change_updates_engine_language() {
        let i18n = i18n("zh");
        let mut controller = RecordingController::new(Some(FakeEngine::default()), &i18n);
        controller.on_locale_change(Locale::En);

        assert_eq!(
            controller.engine().map(|e| e.languages.clone()),
            Some(vec!["zh-CN".to_string(), "en-US".to_string()])
        );
    }
}
