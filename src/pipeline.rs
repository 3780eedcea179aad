//! The full analysis: resample, low-pass, frame, estimate, aggregate.

use log::{debug, trace};

use crate::aggregate::{Aggregator, PitchResult};
use crate::config::DetectorConfig;
use crate::detector::YINDetector;
use crate::utils::buffer::SampleBuffer;
use crate::utils::filters::lowpass;
use crate::utils::frames::Frames;
use crate::utils::resample::resample;

/// Estimate the pitch of the mono clip `samples` recorded at `sample_rate`.
///
/// The clip is brought to `config.target_sample_rate`, low-passed at
/// `config.lowpass_cutoff_hz`, cut into overlapping frames and searched frame by frame.
/// Estimates inside the pitch band are reduced to their median.
///
/// This never fails. A zero sample rate, a clip shorter than one frame, silence, or a
/// clip that is never periodic inside the band all give [`PitchResult::NoPitchFound`].
pub fn detect_pitch(samples: &[f32], sample_rate: u32, config: &DetectorConfig) -> PitchResult {
    if sample_rate == 0 || config.target_sample_rate == 0 {
        debug!("invalid sample rate, nothing to analyse");
        return PitchResult::NoPitchFound;
    }

    let rate = config.target_sample_rate;
    let resampled = resample(samples, sample_rate, rate);
    if sample_rate != rate {
        debug!(
            "resampled {} samples at {} Hz to {} samples at {} Hz",
            samples.len(),
            sample_rate,
            resampled.len(),
            rate
        );
    }

    if resampled.len() < config.frame_size || config.frame_size == 0 {
        debug!(
            "{} samples is shorter than one {}-sample frame",
            resampled.len(),
            config.frame_size
        );
        return PitchResult::NoPitchFound;
    }

    let filtered = lowpass(&resampled, rate, config.lowpass_cutoff_hz);
    debug!("low-passed at {} Hz", config.lowpass_cutoff_hz);

    let mut detector = YINDetector::from_config(config, rate);
    let mut aggregator = Aggregator::from_config(config);
    for frame in Frames::new(&filtered, config.frame_size, config.hop_size) {
        let estimate = detector.get_pitch(frame.samples);
        let accepted = aggregator.push(estimate.map(|p| p.frequency));
        trace!(
            "frame at {}: {:?} ({})",
            frame.start,
            estimate,
            if accepted { "accepted" } else { "rejected" }
        );
    }

    debug!(
        "{} frames analysed, {} in band",
        aggregator.accepted().len() + aggregator.rejected(),
        aggregator.accepted().len()
    );
    aggregator.finish()
}

/// [`detect_pitch`] on a decoded buffer.
pub fn detect_buffer_pitch(buffer: &SampleBuffer, config: &DetectorConfig) -> PitchResult {
    detect_pitch(&buffer.samples, buffer.sample_rate, config)
}
