//! Speech engine abstraction.
//!
//! A [`SpeechEngine`] accepts one utterance at a time and reports its
//! lifecycle asynchronously through polled [`EngineEvent`]s; starting a new
//! utterance cancels the previous one.

use serde::Serialize;

use crate::error::Result;
use crate::speech::Voice;

/// Words-per-minute rate that maps to a relative rate of 1.0.
pub const BASELINE_WPM: u32 = 150;

/// Normalize a words-per-minute setting to a relative rate around 1.0.
pub fn rate_from_wpm(wpm: u32) -> f32 {
    wpm as f32 / BASELINE_WPM as f32
}

/// A single speech-synthesis request.
#[derive(Debug, Clone, Serialize)]
pub struct Utterance {
    /// The text to read aloud.
    pub text: String,
    /// Resolved voice; `None` means the engine default.
    pub voice: Option<Voice>,
    /// Relative speed, 1.0 = baseline (150 wpm).
    pub rate: f32,
    /// Fixed neutral pitch.
    pub pitch: f32,
    /// Fixed maximum volume.
    pub volume: f32,
}

impl Utterance {
    /// Build an utterance with neutral pitch and full volume.
    pub fn new(text: impl Into<String>, voice: Option<Voice>, wpm: u32) -> Self {
        Self {
            text: text.into(),
            voice,
            rate: rate_from_wpm(wpm),
            pitch: 1.0,
            volume: 1.0,
        }
    }

    /// The rate expressed back in words per minute.
    pub fn wpm(&self) -> u32 {
        (self.rate * BASELINE_WPM as f32).round() as u32
    }
}

/// Lifecycle notification from the engine.
///
/// The controller's state only moves on these, so its view can lag the
/// true engine state until the next poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// The engine actually started producing audio.
    Started,
    /// The utterance finished naturally.
    Ended,
    /// The engine failed; carries the engine-provided error code.
    Errored(String),
}

/// A speech synthesis engine.
///
/// Commands are engine-level: `pause`/`resume`/`cancel` act on whatever is
/// currently sounding, not on a queue.
pub trait SpeechEngine {
    /// Enumerate the engine's voice catalog.
    fn voices(&self) -> Result<Vec<Voice>>;

    /// Start speaking, replacing any current utterance.
    fn speak(&mut self, utterance: &Utterance) -> Result<()>;

    /// Suspend the current utterance.
    fn pause(&mut self);

    /// Continue a suspended utterance.
    fn resume(&mut self);

    /// Discard the current utterance.
    fn cancel(&mut self);

    /// Whether audio is currently sounding.
    fn is_speaking(&self) -> bool;

    /// Poll for the next pending lifecycle event.
    fn try_event(&mut self) -> Option<EngineEvent>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_normalization() {
        assert_eq!(rate_from_wpm(150), 1.0);
        assert_eq!(rate_from_wpm(300), 2.0);
        assert_eq!(rate_from_wpm(75), 0.5);
    }

    #[test]
    fn test_utterance_defaults() {
        let utt = Utterance::new("hello", None, 150);
        assert_eq!(utt.rate, 1.0);
        assert_eq!(utt.pitch, 1.0);
        assert_eq!(utt.volume, 1.0);
        assert_eq!(utt.wpm(), 150);
    }

    #[test]
    fn test_utterance_wpm_round_trip() {
        let utt = Utterance::new("hello", None, 210);
        assert_eq!(utt.wpm(), 210);
    }
}
