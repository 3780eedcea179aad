//! Whole-buffer spectral filtering.
//!
//! The buffer is transformed in one piece, the unwanted bins are cleared and the
//! result is transformed back. This is zero-phase and non-causal, which is fine
//! for a finished clip. No attempt is made to correct edge effects.
use realfft::RealFftPlanner;

/// Frequency in Hz of bin `bin` in a real FFT of `len` samples.
pub fn bin_frequency(bin: usize, len: usize, sample_rate: u32) -> f64 {
    bin as f64 * sample_rate as f64 / len as f64
}

/// Remove everything above `cutoff_hz` from `samples`.
///
/// Bins whose frequency is at most `cutoff_hz` are kept untouched, every other bin is
/// zeroed. The output always has the same length as the input.
pub fn lowpass(samples: &[f32], sample_rate: u32, cutoff_hz: f64) -> Vec<f32> {
    let len = samples.len();
    if len == 0 {
        return Vec::new();
    }

    let mut planner = RealFftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(len);
    let inv_fft = planner.plan_fft_inverse(len);

    let mut input: Vec<f64> = samples.iter().map(|&s| s as f64).collect();
    let mut spectrum = fft.make_output_vec();
    if let Err(e) = fft.process(&mut input, &mut spectrum) {
        log::warn!("low-pass forward transform failed, leaving signal unfiltered: {}", e);
        return samples.to_vec();
    }

    for (bin, value) in spectrum.iter_mut().enumerate() {
        if bin_frequency(bin, len, sample_rate) > cutoff_hz {
            value.re = 0.0;
            value.im = 0.0;
        }
    }
    // The inverse transform rejects imaginary parts on the purely real bins.
    spectrum[0].im = 0.0;
    if len % 2 == 0 {
        if let Some(nyquist) = spectrum.last_mut() {
            nyquist.im = 0.0;
        }
    }

    let mut output = inv_fft.make_output_vec();
    if let Err(e) = inv_fft.process(&mut spectrum, &mut output) {
        log::warn!("low-pass inverse transform failed, leaving signal unfiltered: {}", e);
        return samples.to_vec();
    }

    // realfft doesn't normalize, so forward -> inverse scales by `len`.
    let normalization_const = 1.0 / len as f64;
    output
        .into_iter()
        .map(|s| (s * normalization_const) as f32)
        .collect()
}
