//! Speech synthesizers.
//!
//! A [`Synthesizer`] turns one utterance into WAV audio bytes and can
//! enumerate its voice catalog. The bundled implementation shells out to
//! `espeak-ng`.

use std::process::Command;

use crate::error::{Error, Result};
use crate::speech::{Utterance, Voice, VoiceGender, BASELINE_WPM};

/// Synthesis backend: utterance in, WAV bytes out.
pub trait Synthesizer {
    /// Render the utterance to WAV audio.
    fn synthesize(&self, utterance: &Utterance) -> Result<Vec<u8>>;

    /// List the voices installed for this backend.
    fn voices(&self) -> Result<Vec<Voice>>;
}

/// Synthesizer backed by the `espeak-ng` command-line program.
pub struct EspeakSynthesizer {
    program: String,
}

impl EspeakSynthesizer {
    pub fn new() -> Self {
        Self {
            program: "espeak-ng".to_string(),
        }
    }

    /// Use a different espeak-compatible binary (e.g. plain `espeak`).
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Map the utterance parameters to espeak arguments.
    ///
    /// espeak takes speed in words per minute (80..=450), pitch in 0..=99
    /// with 50 neutral, and amplitude in 0..=200 with 100 nominal.
    fn args_for(utterance: &Utterance) -> Vec<String> {
        let wpm = ((utterance.rate * BASELINE_WPM as f32).round() as u32).clamp(80, 450);
        let pitch = ((utterance.pitch * 50.0).round() as u32).min(99);
        let amplitude = ((utterance.volume * 100.0).round() as u32).min(200);

        let mut args = vec![
            "--stdout".to_string(),
            "-s".to_string(),
            wpm.to_string(),
            "-p".to_string(),
            pitch.to_string(),
            "-a".to_string(),
            amplitude.to_string(),
        ];
        if let Some(voice) = &utterance.voice {
            args.push("-v".to_string());
            args.push(voice.id.clone());
        }
        args.push("--".to_string());
        args.push(utterance.text.clone());
        args
    }
}

impl Default for EspeakSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Synthesizer for EspeakSynthesizer {
    fn synthesize(&self, utterance: &Utterance) -> Result<Vec<u8>> {
        let output = Command::new(&self.program)
            .args(Self::args_for(utterance))
            .output()
            .map_err(|e| Error::Speech(format!("{}: {}", self.program, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Speech(stderr.trim().to_string()));
        }
        if output.stdout.is_empty() {
            return Err(Error::Speech("no audio produced".to_string()));
        }
        Ok(output.stdout)
    }

    fn voices(&self) -> Result<Vec<Voice>> {
        let output = Command::new(&self.program)
            .arg("--voices")
            .output()
            .map_err(|e| Error::Speech(format!("{}: {}", self.program, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Speech(stderr.trim().to_string()));
        }

        Ok(parse_voice_listing(&String::from_utf8_lossy(
            &output.stdout,
        )))
    }
}

/// Parse `espeak-ng --voices` output.
///
/// Columns: `Pty Language Age/Gender VoiceName File Other Languages`; the
/// gender is the letter after the slash (`M`, `F`, or `-`).
fn parse_voice_listing(listing: &str) -> Vec<Voice> {
    let mut voices = Vec::new();
    for line in listing.lines().skip(1) {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 4 {
            log::debug!("skipping malformed voice line: {:?}", line);
            continue;
        }
        let language = fields[1].to_string();
        let gender = match fields[2].rsplit('/').next() {
            Some("F") => Some(VoiceGender::Female),
            Some("M") => Some(VoiceGender::Male),
            _ => None,
        };
        let name = fields[3].replace('_', " ");
        voices.push(Voice {
            id: language.clone(),
            name,
            language,
            gender,
        });
    }
    voices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_reflect_utterance() {
        let utt = Utterance::new("read this", None, 300);
        let args = EspeakSynthesizer::args_for(&utt);
        assert_eq!(
            args,
            vec!["--stdout", "-s", "300", "-p", "50", "-a", "100", "--", "read this"]
        );
    }

    #[test]
    fn test_args_include_voice_and_clamp_rate() {
        let voice = Voice {
            id: "en-gb".to_string(),
            name: "English (Great Britain)".to_string(),
            language: "en-gb".to_string(),
            gender: Some(VoiceGender::Male),
        };
        let utt = Utterance::new("hi", Some(voice), 20);
        let args = EspeakSynthesizer::args_for(&utt);
        // 20 wpm clamps up to espeak's floor of 80.
        assert!(args.windows(2).any(|w| w == ["-s", "80"]));
        assert!(args.windows(2).any(|w| w == ["-v", "en-gb"]));
    }

    #[test]
    fn test_parse_voice_listing() {
        let listing = "\
Pty Language       Age/Gender VoiceName          File                 Other Languages
 5  af              --/M      Afrikaans          gmw/af
 5  en-gb           --/M      English_(Great_Britain) gmw/en
 5  en-us           --/F      English_(America)  gmw/en-US
";
        let voices = parse_voice_listing(listing);
        assert_eq!(voices.len(), 3);
        assert_eq!(voices[1].id, "en-gb");
        assert_eq!(voices[1].name, "English (Great Britain)");
        assert_eq!(voices[1].gender, Some(VoiceGender::Male));
        assert_eq!(voices[2].gender, Some(VoiceGender::Female));
    }

    #[test]
    fn test_parse_voice_listing_skips_short_lines() {
        let voices = parse_voice_listing("header\ngarbage line\n");
        assert!(voices.is_empty());
    }
}
