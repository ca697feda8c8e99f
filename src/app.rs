//! Application facade.
//!
//! [`ReaderApp`] ties the conversion workflow, the playback controller,
//! and the user settings into one session, so a frontend only forwards
//! user actions. Reset returns the whole session to its freshly-built
//! state, cancelling any in-flight extraction and active speech.

use std::path::Path;

use crate::error::Result;
use crate::export::text_artifact_name;
use crate::extract::{CancelToken, PageRange};
use crate::speech::{PlaybackController, PlaybackState, SpeechEngine, VoiceChoice, BASELINE_WPM};
use crate::status::StatusSink;
use crate::validate::Upload;
use crate::workflow::{Conversion, Phase};

/// User-adjustable playback settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    /// Speech rate in words per minute; 150 is baseline speed.
    pub wpm: u32,
    /// Reading voice choice.
    pub voice: VoiceChoice,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            wpm: BASELINE_WPM,
            voice: VoiceChoice::default(),
        }
    }
}

/// One user session: a conversion plus speech playback.
pub struct ReaderApp<E: SpeechEngine> {
    conversion: Conversion,
    playback: PlaybackController<E>,
    settings: Settings,
    cancel: CancelToken,
}

impl<E: SpeechEngine> ReaderApp<E> {
    pub fn new(engine: E) -> Self {
        Self {
            conversion: Conversion::new(),
            playback: PlaybackController::new(engine),
            settings: Settings::default(),
            cancel: CancelToken::new(),
        }
    }

    pub fn conversion(&self) -> &Conversion {
        &self.conversion
    }

    pub fn playback(&self) -> &PlaybackController<E> {
        &self.playback
    }

    pub fn playback_mut(&mut self) -> &mut PlaybackController<E> {
        &mut self.playback
    }

    pub fn settings(&self) -> Settings {
        self.settings
    }

    pub fn set_wpm(&mut self, wpm: u32) {
        self.settings.wpm = wpm;
    }

    pub fn set_voice(&mut self, voice: VoiceChoice) {
        self.settings.voice = voice;
    }

    /// Adjust the page range; self-corrects against the document bounds.
    pub fn set_range(&mut self, range: PageRange) -> Option<PageRange> {
        self.conversion.set_range(range)
    }

    /// Validate and load a file from disk.
    pub fn load_file(&mut self, path: impl AsRef<Path>, sink: &dyn StatusSink) -> Result<()> {
        self.conversion.load_file(path, sink)
    }

    /// Validate and load a document from bytes.
    pub fn load_bytes(&mut self, upload: &Upload, data: &[u8], sink: &dyn StatusSink) -> Result<()> {
        self.conversion.load_bytes(upload, data, sink)
    }

    /// Run the extraction over the configured page range.
    pub fn convert(&mut self, sink: &dyn StatusSink) -> Result<()> {
        self.cancel = CancelToken::new();
        self.conversion.convert(sink, &self.cancel)
    }

    /// A token that cancels the current (or next) extraction.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Read the extracted text aloud with the current settings.
    pub fn play(&mut self) -> Result<()> {
        self.playback
            .play(self.conversion.text(), self.settings.voice, self.settings.wpm)
    }

    pub fn pause(&mut self) {
        self.playback.pause();
    }

    pub fn resume(&mut self) {
        self.playback.resume();
    }

    pub fn stop(&mut self) {
        self.playback.stop();
    }

    /// Poll engine events into the playback state.
    pub fn pump(&mut self, sink: &dyn StatusSink) -> PlaybackState {
        self.playback.pump(sink)
    }

    /// Name for the downloadable text artifact of the loaded document.
    pub fn artifact_name(&self) -> String {
        text_artifact_name(self.conversion.file_name())
    }

    /// Whether the session currently has extracted text ready.
    pub fn is_ready(&self) -> bool {
        self.conversion.phase() == Phase::Ready
    }

    /// Return to the freshly-initialized state: cancels any in-flight
    /// extraction, stops speech, and clears the conversion. Settings are
    /// user preferences and survive the reset.
    pub fn reset(&mut self) {
        self.cancel.cancel();
        self.playback.stop();
        self.conversion.reset();
    }
}
