//! Linear-interpolation sample-rate conversion.
//!
//! Input and output are laid on the same normalized time axis `[0, 1)`: input
//! sample `i` sits at `i / len(input)` and output sample `j` at `j / len(output)`.
//! Each output sample interpolates between its two bracketing input samples.
//! Positions past the last input sample hold its value; nothing is extrapolated.

/// Number of samples `len` input samples occupy at `target_rate`.
pub fn resampled_len(len: usize, source_rate: u32, target_rate: u32) -> usize {
    if source_rate == 0 {
        return 0;
    }
    (len as f64 * target_rate as f64 / source_rate as f64).round() as usize
}

/// Convert `samples` from `source_rate` to `target_rate`.
///
/// Equal rates return an exact copy. A zero rate on either side yields an empty buffer.
pub fn resample(samples: &[f32], source_rate: u32, target_rate: u32) -> Vec<f32> {
    if source_rate == target_rate {
        return samples.to_vec();
    }
    let out_len = resampled_len(samples.len(), source_rate, target_rate);
    if samples.is_empty() || out_len == 0 {
        return Vec::new();
    }

    let last = samples.len() - 1;
    // Input index covered by one output step.
    let step = samples.len() as f64 / out_len as f64;

    (0..out_len)
        .map(|j| {
            let pos = j as f64 * step;
            let idx = pos.floor() as usize;
            if idx >= last {
                return samples[last];
            }
            let frac = pos - idx as f64;
            let a = samples[idx] as f64;
            let b = samples[idx + 1] as f64;
            (a + (b - a) * frac) as f32
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_rate_is_identity() {
        let signal: Vec<f32> = (0..1000).map(|i| (i as f32 * 0.37).sin() * 3.5).collect();
        for rate in [8000, 44100, 48000, 96000] {
            assert_eq!(resample(&signal, rate, rate), signal);
        }
    }

    #[test]
    fn output_length_follows_ratio() {
        let signal = vec![0.25f32; 44100];
        for (from, to) in [(44100, 48000), (48000, 44100), (22050, 48000), (96000, 48000)] {
            let expected = resampled_len(signal.len(), from, to) as i64;
            let got = resample(&signal, from, to).len() as i64;
            assert!((got - expected).abs() <= 1, "{} -> {}: {}", from, to, got);
        }
        assert_eq!(resample(&signal, 44100, 48000).len(), 48000);
    }

    #[test]
    fn upsampling_interpolates_between_neighbours() {
        let signal = [0.0f32, 1.0, 2.0, 3.0];
        let up = resample(&signal, 1, 2);
        assert_eq!(up, vec![0.0, 0.5, 1.0, 1.5, 2.0, 2.5, 3.0, 3.0]);
    }

    #[test]
    fn tail_is_clamped_not_extrapolated() {
        let signal = [1.0f32, -1.0];
        let up = resample(&signal, 10, 40);
        assert!(up.iter().all(|&s| (-1.0..=1.0).contains(&s)));
        assert_eq!(*up.last().unwrap(), -1.0);
    }

    #[test]
    fn degenerate_inputs_are_empty() {
        assert!(resample(&[], 44100, 48000).is_empty());
        assert!(resample(&[1.0, 2.0], 0, 48000).is_empty());
        assert!(resample(&[1.0, 2.0], 44100, 0).is_empty());
    }
}
