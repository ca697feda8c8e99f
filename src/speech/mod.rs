//! Speech synthesis and playback.
//!
//! The [`SpeechEngine`] trait isolates the concrete engine; the bundled
//! stack synthesizes WAV through `espeak-ng` and plays it with rodio
//! (feature `playback`, on by default). [`PlaybackController`] drives an
//! engine with play/pause/stop semantics and cached voice selection.

mod controller;
mod engine;
#[cfg(feature = "playback")]
mod playback;
mod synth;
mod voice;

pub use controller::{PlaybackController, PlaybackState};
pub use engine::{rate_from_wpm, EngineEvent, SpeechEngine, Utterance, BASELINE_WPM};
#[cfg(feature = "playback")]
pub use playback::RodioEngine;
pub use synth::{EspeakSynthesizer, Synthesizer};
pub use voice::{NameHeuristicPicker, Voice, VoiceChoice, VoiceGender, VoicePicker, VoiceSelection};
