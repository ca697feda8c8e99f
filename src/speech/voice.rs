//! Voice catalog and selection.
//!
//! The engine exposes a flat catalog of voices; users pick between a
//! female and a male reading voice. Catalog matching is best-effort and
//! catalog-dependent, so it lives behind the [`VoicePicker`] strategy
//! trait; the default strategy matches on well-known voice names and the
//! engine-reported gender attribute.

use serde::Serialize;

/// A voice offered by the speech engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Voice {
    /// Engine identifier passed back when speaking (e.g. "en-gb").
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Language tag.
    pub language: String,
    /// Gender as reported by the engine, when known.
    pub gender: Option<VoiceGender>,
}

/// Engine-reported voice gender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VoiceGender {
    Female,
    Male,
}

/// The user's binary reading-voice choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VoiceChoice {
    #[default]
    Female,
    Male,
}

impl VoiceChoice {
    fn gender(self) -> VoiceGender {
        match self {
            VoiceChoice::Female => VoiceGender::Female,
            VoiceChoice::Male => VoiceGender::Male,
        }
    }
}

impl std::str::FromStr for VoiceChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "female" => Ok(VoiceChoice::Female),
            "male" => Ok(VoiceChoice::Male),
            other => Err(format!("unknown voice choice: {}", other)),
        }
    }
}

/// Strategy for matching a voice choice against a catalog.
pub trait VoicePicker {
    /// Return the best catalog match for `choice`, or `None` when the
    /// catalog carries nothing recognizable.
    fn pick(&self, catalog: &[Voice], choice: VoiceChoice) -> Option<Voice>;
}

/// Default picker: substring heuristics over voice names plus the
/// engine-reported gender attribute.
pub struct NameHeuristicPicker;

const FEMALE_HINTS: &[&str] = &["female", "zira", "susan", "samantha"];
const MALE_HINTS: &[&str] = &["male", "david", "mark", "alex"];

impl VoicePicker for NameHeuristicPicker {
    fn pick(&self, catalog: &[Voice], choice: VoiceChoice) -> Option<Voice> {
        let hints = match choice {
            VoiceChoice::Female => FEMALE_HINTS,
            VoiceChoice::Male => MALE_HINTS,
        };
        catalog
            .iter()
            .find(|voice| {
                let name = voice.name.to_lowercase();
                // "female" contains "male", so check the attribute and the
                // longer hints before bare substring matches collide.
                voice.gender == Some(choice.gender())
                    || hints.iter().any(|hint| match *hint {
                        "male" => name.contains("male") && !name.contains("female"),
                        h => name.contains(h),
                    })
            })
            .cloned()
    }
}

/// The two cached voice handles, derived once from the catalog.
///
/// Fallback when the picker finds nothing: the first catalog voice stands
/// in for female, the second for male, and the male slot falls back to the
/// female pick when the catalog has only one entry.
#[derive(Debug, Clone, Default)]
pub struct VoiceSelection {
    female: Option<Voice>,
    male: Option<Voice>,
}

impl VoiceSelection {
    pub fn from_catalog(catalog: &[Voice], picker: &dyn VoicePicker) -> Self {
        let female = picker
            .pick(catalog, VoiceChoice::Female)
            .or_else(|| catalog.first().cloned());
        let male = picker
            .pick(catalog, VoiceChoice::Male)
            .or_else(|| catalog.get(1).cloned())
            .or_else(|| female.clone());
        Self { female, male }
    }

    /// The cached voice for a choice; `None` means engine default.
    pub fn voice_for(&self, choice: VoiceChoice) -> Option<&Voice> {
        match choice {
            VoiceChoice::Female => self.female.as_ref(),
            VoiceChoice::Male => self.male.as_ref(),
        }
    }
}
