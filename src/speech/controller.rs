//! Playback control.
//!
//! The controller owns the engine and a [`PlaybackState`] that is a pure
//! fold over engine events: `Started` enters `Speaking`, `Ended` and
//! `Errored` return to `Idle`. Events are pulled by [`PlaybackController::pump`];
//! between pumps the state may lag the engine.

use crate::error::Result;
use crate::speech::{
    EngineEvent, NameHeuristicPicker, SpeechEngine, Utterance, VoiceChoice, VoicePicker,
    VoiceSelection,
};
use crate::status::{Severity, StatusSink};

/// Playback state as last observed from engine events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Idle,
    Speaking,
    Paused,
}

impl PlaybackState {
    /// Fold one engine event into the state.
    pub fn on_event(self, event: &EngineEvent) -> Self {
        match event {
            EngineEvent::Started => PlaybackState::Speaking,
            EngineEvent::Ended | EngineEvent::Errored(_) => PlaybackState::Idle,
        }
    }
}

/// Drives a [`SpeechEngine`] with play/pause/stop semantics and cached
/// voice selection.
pub struct PlaybackController<E: SpeechEngine> {
    engine: E,
    state: PlaybackState,
    selection: VoiceSelection,
}

impl<E: SpeechEngine> PlaybackController<E> {
    /// Wrap an engine, deriving the voice selection from its catalog with
    /// the default picker. An unreadable catalog degrades to the engine
    /// default voice.
    pub fn new(engine: E) -> Self {
        Self::with_picker(engine, &NameHeuristicPicker)
    }

    /// Wrap an engine with a custom voice-matching strategy.
    pub fn with_picker(engine: E, picker: &dyn VoicePicker) -> Self {
        let selection = match engine.voices() {
            Ok(catalog) => VoiceSelection::from_catalog(&catalog, picker),
            Err(e) => {
                log::warn!("voice catalog unavailable: {}", e);
                VoiceSelection::default()
            }
        };
        Self {
            engine,
            state: PlaybackState::Idle,
            selection,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn selection(&self) -> &VoiceSelection {
        &self.selection
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    /// Start reading `text` aloud, cancelling any current utterance.
    ///
    /// The state stays where it is until the engine signals start; a
    /// `Speaking` transition happens on the next [`pump`](Self::pump).
    /// Empty or whitespace-only text is a no-op.
    pub fn play(&mut self, text: &str, choice: VoiceChoice, wpm: u32) -> Result<()> {
        if text.trim().is_empty() {
            return Ok(());
        }

        self.engine.cancel();
        let voice = self.selection.voice_for(choice).cloned();
        let utterance = Utterance::new(text, voice, wpm);
        self.engine.speak(&utterance)
    }

    /// Suspend playback. Effective only while the engine reports it is
    /// speaking; otherwise a no-op.
    pub fn pause(&mut self) {
        if self.engine.is_speaking() {
            self.engine.pause();
            self.state = PlaybackState::Paused;
        }
    }

    /// Continue a paused utterance.
    pub fn resume(&mut self) {
        if self.state == PlaybackState::Paused {
            self.engine.resume();
            self.state = PlaybackState::Speaking;
        }
    }

    /// Cancel unconditionally and force `Idle`.
    pub fn stop(&mut self) {
        self.engine.cancel();
        self.state = PlaybackState::Idle;
    }

    /// Drain pending engine events into the state, surfacing engine errors
    /// through the sink. Returns the state after folding.
    pub fn pump(&mut self, sink: &dyn StatusSink) -> PlaybackState {
        while let Some(event) = self.engine.try_event() {
            if let EngineEvent::Errored(code) = &event {
                sink.status(
                    &format!("Speech synthesis failed: {}", code),
                    Severity::Error,
                );
            }
            self.state = self.state.on_event(&event);
        }
        self.state
    }
}
