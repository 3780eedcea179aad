//! Reduction of per-frame estimates to one pitch.

use serde::Serialize;
use std::fmt;

use crate::config::{DetectorConfig, PitchBand};
use crate::note::{midi_to_name, nearest_midi};

/// The pitch judgment for a whole clip.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pitch {
    /// Median of the accepted per-frame estimates, in Hz.
    pub frequency: f64,
    /// Nearest MIDI note number.
    pub midi: i32,
    /// Note name of `midi`, or `"--"` outside the MIDI range.
    pub note: String,
}

impl Pitch {
    pub fn from_frequency(frequency: f64) -> Self {
        let midi = nearest_midi(frequency);
        Pitch {
            frequency,
            midi,
            note: midi_to_name(midi),
        }
    }
}

/// Outcome of an analysis. Finding no pitch is a normal result, not an error: it
/// means the clip was too short, silent, or never periodic inside the pitch band.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PitchResult {
    Detected(Pitch),
    NoPitchFound,
}

impl PitchResult {
    pub fn pitch(&self) -> Option<&Pitch> {
        match self {
            PitchResult::Detected(pitch) => Some(pitch),
            PitchResult::NoPitchFound => None,
        }
    }

    pub fn is_detected(&self) -> bool {
        matches!(self, PitchResult::Detected(_))
    }

    /// Human-readable status line, naming the configured band when nothing was found.
    pub fn describe(&self, config: &DetectorConfig) -> String {
        match self {
            PitchResult::Detected(pitch) => pitch_line(pitch),
            PitchResult::NoPitchFound => format!(
                "No stable pitch in {}. Try a longer sample.",
                config.band()
            ),
        }
    }
}

/// Like [`PitchResult::describe`], but without the band, which the result does not know.
impl fmt::Display for PitchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PitchResult::Detected(pitch) => f.write_str(&pitch_line(pitch)),
            PitchResult::NoPitchFound => f.write_str("No stable pitch found. Try a longer sample."),
        }
    }
}

fn pitch_line(pitch: &Pitch) -> String {
    format!(
        "Estimated: {:.2} Hz   |   {} (MIDI {})",
        pitch.frequency, pitch.note, pitch.midi
    )
}

/// Median of `values` (mean of the two central values for an even count).
/// Returns `None` for an empty slice. NaNs sort last.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Reduce accepted per-frame frequencies to one result: their median, mapped to a note.
/// No band check happens here.
pub fn aggregate(accepted: &[f64]) -> PitchResult {
    match median(accepted) {
        Some(frequency) => PitchResult::Detected(Pitch::from_frequency(frequency)),
        None => PitchResult::NoPitchFound,
    }
}

/// Collects per-frame estimates, keeping those inside a [`PitchBand`].
#[derive(Debug, Clone)]
pub struct Aggregator {
    band: PitchBand,
    accepted: Vec<f64>,
    rejected: usize,
}

impl Aggregator {
    pub fn new(band: PitchBand) -> Self {
        Aggregator {
            band,
            accepted: Vec::new(),
            rejected: 0,
        }
    }

    pub fn from_config(config: &DetectorConfig) -> Self {
        Aggregator::new(config.band())
    }

    /// Offer one frame's estimate. Returns whether it was accepted; absent and
    /// out-of-band estimates are dropped silently.
    pub fn push(&mut self, estimate: Option<f64>) -> bool {
        match estimate {
            Some(f) if self.band.contains(f) => {
                self.accepted.push(f);
                true
            }
            _ => {
                self.rejected += 1;
                false
            }
        }
    }

    pub fn accepted(&self) -> &[f64] {
        &self.accepted
    }

    pub fn rejected(&self) -> usize {
        self.rejected
    }

    pub fn finish(self) -> PitchResult {
        aggregate(&self.accepted)
    }
}

impl Extend<Option<f64>> for Aggregator {
    fn extend<I: IntoIterator<Item = Option<f64>>>(&mut self, iter: I) {
        for estimate in iter {
            self.push(estimate);
        }
    }
}
