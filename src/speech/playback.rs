//! Audio playback engine over rodio.
//!
//! Couples a [`Synthesizer`] to a rodio sink: synthesis produces WAV bytes,
//! the sink provides real pause/resume/stop. Lifecycle events are polled;
//! `Ended` is detected when a sink that was sounding drains empty.

use std::collections::VecDeque;
use std::io::Cursor;

use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};

use crate::error::{Error, Result};
use crate::speech::{EngineEvent, SpeechEngine, Synthesizer, Utterance, Voice};

/// Speech engine that synthesizes to WAV and plays through the default
/// audio output device.
pub struct RodioEngine<S: Synthesizer> {
    synth: S,
    // The stream must stay alive as long as its handle is used.
    _stream: OutputStream,
    handle: OutputStreamHandle,
    sink: Option<Sink>,
    pending: VecDeque<EngineEvent>,
}

impl<S: Synthesizer> RodioEngine<S> {
    /// Open the default output device.
    pub fn new(synth: S) -> Result<Self> {
        let (stream, handle) =
            OutputStream::try_default().map_err(|e| Error::Speech(e.to_string()))?;
        Ok(Self {
            synth,
            _stream: stream,
            handle,
            sink: None,
            pending: VecDeque::new(),
        })
    }

    fn drop_sink(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
    }
}

impl<S: Synthesizer> SpeechEngine for RodioEngine<S> {
    fn voices(&self) -> Result<Vec<Voice>> {
        self.synth.voices()
    }

    fn speak(&mut self, utterance: &Utterance) -> Result<()> {
        self.drop_sink();
        self.pending.clear();

        let wav = self.synth.synthesize(utterance)?;
        let source =
            Decoder::new_wav(Cursor::new(wav)).map_err(|e| Error::Speech(e.to_string()))?;
        let sink = Sink::try_new(&self.handle).map_err(|e| Error::Speech(e.to_string()))?;
        sink.set_volume(utterance.volume);
        sink.append(source);

        // Audio is sounding once appended; report the start.
        self.pending.push_back(EngineEvent::Started);
        self.sink = Some(sink);
        Ok(())
    }

    fn pause(&mut self) {
        if let Some(sink) = &self.sink {
            sink.pause();
        }
    }

    fn resume(&mut self) {
        if let Some(sink) = &self.sink {
            sink.play();
        }
    }

    fn cancel(&mut self) {
        self.drop_sink();
        self.pending.clear();
    }

    fn is_speaking(&self) -> bool {
        self.sink
            .as_ref()
            .map(|sink| !sink.empty() && !sink.is_paused())
            .unwrap_or(false)
    }

    fn try_event(&mut self) -> Option<EngineEvent> {
        if let Some(event) = self.pending.pop_front() {
            return Some(event);
        }
        if let Some(sink) = &self.sink {
            if sink.empty() {
                self.sink = None;
                return Some(EngineEvent::Ended);
            }
        }
        None
    }
}
