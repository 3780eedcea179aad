//! The YIN pitch detection algorithm is based on the algorithm from the paper
//! *[YIN, a fundamental frequency estimator for speech and music](http://recherche.ircam.fr/equipes/pcm/cheveign/ps/2002_JASA_YIN_proof.pdf)*.
//!
//! Let $S=(s_0,s_1,\ldots,s_{N-1})$ be one frame. The *square difference function* at lag $t$
//! is defined over the part of the frame that overlaps its shifted copy,
//! $$ d(t) = \sum_{i=0}^{N-t-1} (s_i-s_{i+t})^2. $$
//! This function is close to zero when the signal "lines up" with itself, but its scale depends on
//! volume. YIN therefore uses the *cumulative mean normalized difference function*,
//! $$ d\'(t) = \begin{cases}1&\text{if }t=0\\\\ d(t) / \left[ \tfrac{1}{t}\sum_{i=1}^t d(i) \right] & \text{otherwise}\end{cases}, $$
//! and looks for the first dip below an absolute threshold.
//!
//! ## Implementation
//! Each frame is Hann windowed and has its mean removed before the search, and all arithmetic
//! happens in `f64` regardless of the `f32` input. The difference function comes from an
//! [FFT](https://en.wikipedia.org/wiki/Fast_Fourier_transform) autocorrelation.
//!
//! The search scans every lag from 1 up to the longest period in the pitch band. The first dip
//! below the threshold is followed down to its local minimum. When nothing crosses the threshold
//! the global minimum inside the band is used, so a weakly periodic frame still produces a
//! candidate. No sub-sample interpolation is applied.

use crate::config::DetectorConfig;
use crate::detector::internals::{
    absolute_threshold, hann_window, remove_dc_offset, yin_normalize_square_error,
    DetectorInternals, TauSearch,
};

/// The period found in one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FramePitch {
    /// `sample_rate / tau`, in Hz.
    pub frequency: f64,
    /// Period in samples.
    pub tau: usize,
    /// Normalized difference at `tau`; lower means more clearly periodic.
    pub cmndf: f64,
    pub search: TauSearch,
}

/// Lag bounds for a pitch band: `min_tau = floor(sr / max_hz)` and
/// `max_tau = floor(sr / min_hz)`, clamped so that `min_tau >= 1` and
/// `max_tau >= min_tau + 1`. Frequencies below 1 Hz are treated as 1 Hz.
pub fn tau_bounds(sample_rate: u32, min_hz: f64, max_hz: f64) -> (usize, usize) {
    let sr = sample_rate as f64;
    let min_tau = ((sr / max_hz.max(1.0)).floor() as usize).max(1);
    let max_tau = ((sr / min_hz.max(1.0)).floor() as usize).max(min_tau + 1);
    (min_tau, max_tau)
}

/// Per-frame fundamental period search. Buffers are allocated once and reused for
/// every frame of the same size.
pub struct YINDetector {
    sample_rate: u32,
    min_tau: usize,
    max_tau: usize,
    threshold: f64,
    window: Vec<f64>,
    frame: Vec<f64>,
    cmndf: Vec<f64>,
    internals: DetectorInternals<f64>,
}

impl YINDetector {
    pub fn new(
        size: usize,
        sample_rate: u32,
        min_hz: f64,
        max_hz: f64,
        threshold: f64,
    ) -> Self {
        let (min_tau, max_tau) = tau_bounds(sample_rate, min_hz, max_hz);
        YINDetector {
            sample_rate,
            min_tau,
            max_tau,
            threshold,
            window: hann_window(size),
            frame: vec![0.0; size],
            cmndf: vec![0.0; max_tau + 1],
            internals: DetectorInternals::new(size),
        }
    }

    /// A detector for frames of `config.frame_size` samples recorded at `sample_rate`.
    pub fn from_config(config: &DetectorConfig, sample_rate: u32) -> Self {
        YINDetector::new(
            config.frame_size,
            sample_rate,
            config.min_pitch_hz,
            config.max_pitch_hz,
            config.cmndf_threshold,
        )
    }

    pub fn size(&self) -> usize {
        self.internals.size
    }

    /// The `(min_tau, max_tau)` lag range searched.
    pub fn tau_range(&self) -> (usize, usize) {
        (self.min_tau, self.max_tau)
    }

    /// Find the period of `signal`, which must be exactly [`size`](Self::size) samples long.
    ///
    /// Returns `None` when the frame carries no periodicity evidence at all, i.e. its
    /// difference function is zero at every lag (silence). The returned frequency is
    /// not checked against the pitch band.
    pub fn get_pitch(&mut self, signal: &[f32]) -> Option<FramePitch> {
        assert_eq!(signal.len(), self.internals.size);

        // STEP 1: Window and center the frame.
        self.frame
            .iter_mut()
            .zip(signal.iter().zip(self.window.iter()))
            .for_each(|(f, (&s, &w))| *f = s as f64 * w);
        remove_dc_offset(&mut self.frame);

        // STEP 2: Calculate the difference function, d_t.
        self.internals
            .square_difference(&self.frame, &mut self.cmndf);
        if self.cmndf[1..].iter().all(|&d| d == 0.0) {
            return None;
        }

        // STEP 3: Calculate the cumulative mean normalized difference function, d_t'.
        yin_normalize_square_error(&mut self.cmndf);

        // STEP 4: The absolute threshold, falling back to the in-band minimum.
        let (tau, search) =
            absolute_threshold(&self.cmndf, self.min_tau, self.max_tau, self.threshold)?;

        Some(FramePitch {
            frequency: self.sample_rate as f64 / tau as f64,
            tau,
            cmndf: self.cmndf[tau],
            search,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn sin_wave(freq: f64, size: usize, sample_rate: u32) -> Vec<f32> {
        (0..size)
            .map(|i| (2.0 * PI * freq * i as f64 / sample_rate as f64).sin() as f32)
            .collect()
    }

    #[test]
    fn default_band_bounds() {
        assert_eq!(tau_bounds(48000, 30.0, 150.0), (320, 1600));
    }

    #[test]
    fn bounds_are_clamped() {
        // A band above the sample rate still leaves a lag to search.
        assert_eq!(tau_bounds(100, 500.0, 1000.0), (1, 2));
        assert_eq!(tau_bounds(48000, 150.0, 150.0), (320, 321));
    }

    #[test]
    fn sine_in_band_is_found_by_threshold() {
        let mut detector = YINDetector::new(4096, 48000, 30.0, 150.0, 0.1);
        let pitch = detector.get_pitch(&sin_wave(130.0, 4096, 48000)).unwrap();
        assert_eq!(pitch.search, TauSearch::Threshold);
        assert!((pitch.frequency - 130.0).abs() < 1.0, "{:?}", pitch);
    }

    #[test]
    fn low_sine_falls_back_to_band_minimum() {
        // The window bias keeps a 60 Hz dip above 0.1, so the fallback branch decides.
        let mut detector = YINDetector::new(4096, 48000, 30.0, 150.0, 0.1);
        let pitch = detector.get_pitch(&sin_wave(60.0, 4096, 48000)).unwrap();
        assert_eq!(pitch.search, TauSearch::Fallback);
        let (min_tau, max_tau) = detector.tau_range();
        assert!(pitch.tau >= min_tau && pitch.tau <= max_tau);
        assert!((pitch.frequency - 60.0).abs() < 1.5, "{:?}", pitch);
    }

    #[test]
    fn sine_above_band_is_reported_outside_it() {
        let mut detector = YINDetector::new(4096, 48000, 30.0, 150.0, 0.1);
        let pitch = detector.get_pitch(&sin_wave(200.0, 4096, 48000)).unwrap();
        assert!((pitch.frequency - 200.0).abs() < 2.0, "{:?}", pitch);
    }

    #[test]
    fn silent_frame_has_no_pitch() {
        let mut detector = YINDetector::new(4096, 48000, 30.0, 150.0, 0.1);
        assert_eq!(detector.get_pitch(&vec![0.0; 4096]), None);
    }

    #[test]
    fn constant_frame_does_not_panic() {
        let mut detector = YINDetector::new(1024, 48000, 30.0, 150.0, 0.1);
        let pitch = detector.get_pitch(&vec![0.5; 1024]);
        if let Some(pitch) = pitch {
            assert!(pitch.frequency.is_finite());
        }
    }

    #[test]
    #[should_panic]
    fn wrong_frame_size_panics() {
        let mut detector = YINDetector::new(1024, 48000, 30.0, 150.0, 0.1);
        detector.get_pitch(&vec![0.0; 512]);
    }
}
