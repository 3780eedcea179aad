//! Analysis parameters.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::error::{Error, Result};

pub const DEFAULT_TARGET_SAMPLE_RATE: u32 = 48000;
pub const DEFAULT_FRAME_SIZE: usize = 4096;
pub const DEFAULT_HOP_SIZE: usize = 256;
pub const DEFAULT_MIN_PITCH_HZ: f64 = 30.0;
pub const DEFAULT_MAX_PITCH_HZ: f64 = 150.0;
pub const DEFAULT_LOWPASS_CUTOFF_HZ: f64 = 300.0;
/// The YIN paper's absolute threshold.
pub const DEFAULT_CMNDF_THRESHOLD: f64 = 0.1;

/// Inclusive range of frequencies a frame estimate must fall in to count.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PitchBand {
    pub min_hz: f64,
    pub max_hz: f64,
}

impl PitchBand {
    pub fn contains(&self, frequency: f64) -> bool {
        self.min_hz <= frequency && frequency <= self.max_hz
    }
}

impl fmt::Display for PitchBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.0}–{:.0} Hz", self.min_hz, self.max_hz)
    }
}

/// Every knob of the analysis. [`Default`] gives the values tuned for kick drums:
/// a 30–150 Hz search band over a signal low-passed at 300 Hz.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Input is resampled to this rate before analysis.
    pub target_sample_rate: u32,
    pub frame_size: usize,
    pub hop_size: usize,
    pub min_pitch_hz: f64,
    pub max_pitch_hz: f64,
    pub lowpass_cutoff_hz: f64,
    pub cmndf_threshold: f64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        DetectorConfig {
            target_sample_rate: DEFAULT_TARGET_SAMPLE_RATE,
            frame_size: DEFAULT_FRAME_SIZE,
            hop_size: DEFAULT_HOP_SIZE,
            min_pitch_hz: DEFAULT_MIN_PITCH_HZ,
            max_pitch_hz: DEFAULT_MAX_PITCH_HZ,
            lowpass_cutoff_hz: DEFAULT_LOWPASS_CUTOFF_HZ,
            cmndf_threshold: DEFAULT_CMNDF_THRESHOLD,
        }
    }
}

impl DetectorConfig {
    /// Parse a (possibly partial) JSON configuration. Missing fields keep their defaults.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: DetectorConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn band(&self) -> PitchBand {
        PitchBand {
            min_hz: self.min_pitch_hz,
            max_hz: self.max_pitch_hz,
        }
    }

    /// Whether `frequency` lies inside the configured pitch band (inclusive).
    pub fn in_band(&self, frequency: f64) -> bool {
        self.band().contains(frequency)
    }

    /// Check that the parameters describe a usable analysis.
    ///
    /// [`detect_pitch`](crate::detect_pitch) does not call this; a nonsensical
    /// configuration there simply finds no pitch.
    pub fn validate(&self) -> Result<()> {
        if self.target_sample_rate == 0 {
            return Err(Error::invalid_config(
                "target_sample_rate",
                "must be at least 1 Hz",
            ));
        }
        if self.frame_size == 0 {
            return Err(Error::invalid_config("frame_size", "must be at least 1"));
        }
        if self.hop_size == 0 {
            return Err(Error::invalid_config("hop_size", "must be at least 1"));
        }
        for (name, value) in [
            ("min_pitch_hz", self.min_pitch_hz),
            ("max_pitch_hz", self.max_pitch_hz),
            ("lowpass_cutoff_hz", self.lowpass_cutoff_hz),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::invalid_config(
                    name,
                    format!("must be a positive frequency, got {}", value),
                ));
            }
        }
        if self.min_pitch_hz >= self.max_pitch_hz {
            return Err(Error::invalid_config(
                "min_pitch_hz",
                format!(
                    "must be below max_pitch_hz ({} >= {})",
                    self.min_pitch_hz, self.max_pitch_hz
                ),
            ));
        }
        if !(self.cmndf_threshold > 0.0 && self.cmndf_threshold <= 1.0) {
            return Err(Error::invalid_config(
                "cmndf_threshold",
                format!("must be in (0, 1], got {}", self.cmndf_threshold),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = DetectorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.frame_size, 4096);
        assert_eq!(config.hop_size, 256);
        assert_eq!(config.target_sample_rate, 48000);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = DetectorConfig::from_json(r#"{ "max_pitch_hz": 120.0 }"#).unwrap();
        assert_eq!(config.max_pitch_hz, 120.0);
        assert_eq!(config.min_pitch_hz, DEFAULT_MIN_PITCH_HZ);
        assert_eq!(config.lowpass_cutoff_hz, DEFAULT_LOWPASS_CUTOFF_HZ);
    }

    #[test]
    fn inverted_band_is_rejected() {
        let config = DetectorConfig {
            min_pitch_hz: 150.0,
            max_pitch_hz: 30.0,
            ..Default::default()
        };
        match config.validate() {
            Err(Error::InvalidConfig { name, .. }) => assert_eq!(name, "min_pitch_hz"),
            other => panic!("expected InvalidConfig, got {:?}", other),
        }
    }

    #[test]
    fn zero_hop_is_rejected() {
        let config = DetectorConfig {
            hop_size: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn threshold_outside_unit_interval_is_rejected() {
        let config = DetectorConfig {
            cmndf_threshold: 1.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
        assert!(DetectorConfig::from_json(r#"{ "cmndf_threshold": 0.0 }"#).is_err());
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(
            DetectorConfig::from_json("{ not json"),
            Err(Error::Json(_))
        ));
    }

    #[test]
    fn band_is_inclusive() {
        let config = DetectorConfig::default();
        assert!(config.in_band(30.0));
        assert!(config.in_band(150.0));
        assert!(!config.in_band(150.01));
        assert!(!config.in_band(29.99));
    }

    #[test]
    fn band_follows_overrides() {
        let config = DetectorConfig::from_json(r#"{ "min_pitch_hz": 40.0, "max_pitch_hz": 90.5 }"#)
            .unwrap();
        let band = config.band();
        assert_eq!((band.min_hz, band.max_hz), (40.0, 90.5));
        assert!(band.contains(90.5));
        assert!(!config.in_band(100.0));
    }
}
