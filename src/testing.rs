//! Shared test doubles for unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::error::{Error, Result};
use crate::pdf::{DocumentInfo, PdfSource};
use crate::speech::{EngineEvent, SpeechEngine, Utterance, Voice, VoiceGender};

/// In-memory PDF source: one fragment list per page.
pub(crate) struct FakeSource {
    pub pages: Vec<Vec<String>>,
}

impl FakeSource {
    pub fn new(pages: &[&[&str]]) -> Self {
        Self {
            pages: pages
                .iter()
                .map(|frags| frags.iter().map(|s| s.to_string()).collect())
                .collect(),
        }
    }
}

impl PdfSource for FakeSource {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn page_fragments(&self, page: u32) -> Result<Vec<String>> {
        self.pages
            .get((page - 1) as usize)
            .cloned()
            .ok_or(Error::PageOutOfRange(page, self.page_count()))
    }

    fn info(&self) -> DocumentInfo {
        DocumentInfo {
            page_count: self.page_count(),
            version: "1.7".to_string(),
            encrypted: false,
            title: None,
        }
    }
}

/// Scripted speech engine: records commands, replays queued events.
#[derive(Default)]
pub(crate) struct ScriptedEngine {
    pub catalog: Vec<Voice>,
    pub events: VecDeque<EngineEvent>,
    pub spoken: Arc<Mutex<Vec<Utterance>>>,
    pub cancels: usize,
    pub pauses: usize,
    pub resumes: usize,
    pub speaking: bool,
}

impl ScriptedEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_catalog(mut self, catalog: Vec<Voice>) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn push_event(&mut self, event: EngineEvent) {
        self.events.push_back(event);
    }

    pub fn last_utterance(&self) -> Option<Utterance> {
        self.spoken.lock().unwrap().last().cloned()
    }
}

impl SpeechEngine for ScriptedEngine {
    fn voices(&self) -> Result<Vec<Voice>> {
        Ok(self.catalog.clone())
    }

    fn speak(&mut self, utterance: &Utterance) -> Result<()> {
        self.spoken.lock().unwrap().push(utterance.clone());
        self.speaking = true;
        Ok(())
    }

    fn pause(&mut self) {
        self.pauses += 1;
        self.speaking = false;
    }

    fn resume(&mut self) {
        self.resumes += 1;
        self.speaking = true;
    }

    fn cancel(&mut self) {
        self.cancels += 1;
        self.speaking = false;
    }

    fn is_speaking(&self) -> bool {
        self.speaking
    }

    fn try_event(&mut self) -> Option<EngineEvent> {
        self.events.pop_front()
    }
}

/// A voice descriptor for tests.
pub(crate) fn voice(id: &str, name: &str, gender: Option<VoiceGender>) -> Voice {
    Voice {
        id: id.to_string(),
        name: name.to_string(),
        language: "en".to_string(),
        gender,
    }
}
