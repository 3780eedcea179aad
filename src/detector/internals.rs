use std::sync::Arc;

use rustfft::num_complex::Complex;
use rustfft::num_traits::Zero;
use rustfft::{Fft, FftPlanner};

use crate::float::Float;
use crate::utils::buffer::{mean, square_sum};

/// Which branch of the period search produced a lag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TauSearch {
    /// The normalized difference dipped below the threshold; the lag is the bottom of that dip.
    Threshold,
    /// Nothing crossed the threshold; the lag is the global minimum inside the pitch band.
    Fallback,
}

/// FFT plans and scratch space for computing the difference function of frames of
/// one fixed size. Allocated once and reused for every frame.
pub struct DetectorInternals<T>
where
    T: Float,
{
    pub size: usize,
    fft: Arc<dyn Fft<T>>,
    inv_fft: Arc<dyn Fft<T>>,
    spectrum: Vec<Complex<T>>,
    scratch: Vec<Complex<T>>,
}

impl<T> DetectorInternals<T>
where
    T: Float,
{
    pub fn new(size: usize) -> Self {
        // Zero padding to at least 2 * size - 1 keeps the circular correlation from wrapping.
        let padded = (2 * size).max(1).next_power_of_two();
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(padded);
        let inv_fft = planner.plan_fft_inverse(padded);
        let scratch_len = fft
            .get_inplace_scratch_len()
            .max(inv_fft.get_inplace_scratch_len());

        DetectorInternals {
            size,
            fft,
            inv_fft,
            spectrum: vec![Complex::zero(); padded],
            scratch: vec![Complex::zero(); scratch_len],
        }
    }

    /// Compute the linear autocorrelation `r(t) = sum_i x_i * x_{i+t}` of `signal` into
    /// `result`. Lags at or beyond `signal.len()` are zero.
    pub fn autocorrelation(&mut self, signal: &[T], result: &mut [T]) {
        assert!(signal.len() <= self.size);
        let padded = self.spectrum.len();

        for (i, s) in self.spectrum.iter_mut().enumerate() {
            *s = match signal.get(i) {
                Some(&x) => Complex::new(x, T::zero()),
                None => Complex::zero(),
            };
        }
        self.fft
            .process_with_scratch(&mut self.spectrum, &mut self.scratch);
        modulus_squared(&mut self.spectrum);
        self.inv_fft
            .process_with_scratch(&mut self.spectrum, &mut self.scratch);

        // rustfft doesn't normalize, so forward -> inverse scales by the transform length.
        let normalization_const = T::one() / T::from_len(padded);
        for (lag, r) in result.iter_mut().enumerate() {
            *r = if lag < signal.len() {
                self.spectrum[lag].re * normalization_const
            } else {
                T::zero()
            };
        }
    }

    /// Compute the square difference function of `signal` into `result`:
    ///
    ///  > d(t) = sum_{i=0}^{N-t-1} (x_i - x_{i+t})^2
    ///
    /// for every lag `0 <= t < result.len()`, where `N` is the signal length. The sum
    /// runs over the overlapping region only, so it shrinks as the lag grows.
    pub fn square_difference(&mut self, signal: &[T], result: &mut [T]) {
        if result.is_empty() {
            return;
        }
        let two = T::one() + T::one();
        let n = signal.len();

        // Expanding the square gives d(t) = head(t) + tail(t) - 2 r(t), where head and tail are
        // the energies of x[..N-t] and x[t..].
        self.autocorrelation(signal, result);
        let total = square_sum(signal);
        let mut head = total;
        let mut tail = total;

        result[0] = T::zero();
        for tau in 1..result.len() {
            if tau >= n {
                result[tau] = T::zero();
                continue;
            }
            head = head - signal[n - tau] * signal[n - tau];
            tail = tail - signal[tau - 1] * signal[tau - 1];
            let d = head + tail - two * result[tau];
            // Rounding can push an exact zero slightly negative.
            result[tau] = if d > T::zero() { d } else { T::zero() };
        }
    }
}

/// Computes |x|^2 for each complex value x in `arr`. This function
/// modifies `arr` in place and leaves the complex component zero.
pub fn modulus_squared<T: Float>(arr: &mut [Complex<T>]) {
    for s in arr {
        s.re = s.re * s.re + s.im * s.im;
        s.im = T::zero();
    }
}

/// The Hann window `0.5 * (1 - cos(2 pi i / (N - 1)))` for `i` in `0..N`.
pub fn hann_window<T: Float>(size: usize) -> Vec<T> {
    if size <= 1 {
        return vec![T::one(); size];
    }
    let half = T::from_f64_lossy(0.5);
    let step = T::from_f64_lossy(2.0 * std::f64::consts::PI) / T::from_len(size - 1);
    (0..size)
        .map(|i| half * (T::one() - (step * T::from_len(i)).cos()))
        .collect()
}

/// Removes the DC offset from a signal by making its average value zero.
pub fn remove_dc_offset<T: Float>(signal: &mut [T]) {
    let avg = mean(signal);
    signal.iter_mut().for_each(|s| *s = *s - avg);
}

/// Calculate the "cumulative mean normalized difference function" as
/// specified in the YIN paper. If _d(t)_ is the square error function,
/// compute _d'(0) = 1_ and for _t > 0_
///
///  > d'(t) = d(t) / [ (1/t) * sum_{i=1}^t d(i) ]
///
/// While the running sum is still zero (a silent stretch) there is no evidence of
/// periodicity and _d'(t)_ is set to 1.
pub fn yin_normalize_square_error<T: Float>(square_error: &mut [T]) {
    let mut sum = T::zero();
    if let Some(first) = square_error.first_mut() {
        *first = T::one();
    }
    square_error
        .iter_mut()
        .enumerate()
        .skip(1)
        .for_each(|(tau, a)| {
            sum = sum + *a;
            *a = if sum > T::zero() {
                *a * T::from_len(tau) / sum
            } else {
                T::one()
            };
        });
}

/// Pick the period lag from a normalized difference function.
///
/// Scanning up from lag 1, the first value below `threshold` starts a dip; the lag
/// keeps advancing while the next value is strictly smaller and the bottom of the dip
/// is returned. If no value in `1..=max_tau` is below `threshold`, the smallest value
/// in `min_tau..=max_tau` is returned instead (the first one on ties).
pub fn absolute_threshold<T: Float>(
    cmndf: &[T],
    min_tau: usize,
    max_tau: usize,
    threshold: T,
) -> Option<(usize, TauSearch)> {
    let max_tau = max_tau.min(cmndf.len().checked_sub(1)?);

    if let Some(start) = (1..=max_tau).find(|&tau| cmndf[tau] < threshold) {
        let mut tau = start;
        while tau < max_tau && cmndf[tau + 1] < cmndf[tau] {
            tau += 1;
        }
        return Some((tau, TauSearch::Threshold));
    }

    let min_tau = min_tau.max(1);
    if min_tau > max_tau {
        return None;
    }
    let mut best = min_tau;
    for tau in min_tau + 1..=max_tau {
        if cmndf[tau] < cmndf[best] {
            best = tau;
        }
    }
    Some((best, TauSearch::Fallback))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn naive_square_difference(signal: &[f64], max_tau: usize) -> Vec<f64> {
        (0..=max_tau)
            .map(|tau| {
                signal
                    .iter()
                    .zip(signal.iter().skip(tau))
                    .map(|(a, b)| (a - b) * (a - b))
                    .sum()
            })
            .collect()
    }

    #[test]
    fn autocorrelation_test() {
        let signal: Vec<f64> = vec![0., 1., 2., 0., -1., -2.];
        let mut internals = DetectorInternals::new(signal.len());

        let expected: Vec<f64> = (0..signal.len())
            .map(|t| {
                signal
                    .iter()
                    .zip(signal[t..].iter())
                    .map(|(a, b)| a * b)
                    .sum()
            })
            .collect();

        let mut computed = vec![0.; signal.len()];
        internals.autocorrelation(&signal, &mut computed);
        // Using an FFT loses precision; we don't care that much, so round generously.
        computed.iter_mut().for_each(|x| *x = (*x * 100.).round() / 100.);

        assert_eq!(expected, computed);
    }

    #[test]
    fn square_difference_matches_direct_sum() {
        let signal: Vec<f64> = (0..300)
            .map(|i| (i as f64 * 0.21).sin() + 0.3 * (i as f64 * 0.05).cos())
            .collect();
        let max_tau = 320;
        let mut internals = DetectorInternals::new(signal.len());
        let mut computed = vec![0.; max_tau + 1];
        internals.square_difference(&signal, &mut computed);

        let expected = naive_square_difference(&signal, max_tau);
        for (tau, (a, b)) in expected.iter().zip(computed.iter()).enumerate() {
            assert!((a - b).abs() < 1e-8, "lag {}: {} vs {}", tau, a, b);
        }
    }

    #[test]
    fn square_difference_of_silence_is_zero() {
        let signal = vec![0.0f64; 64];
        let mut internals = DetectorInternals::new(signal.len());
        let mut computed = vec![1.0; 40];
        internals.square_difference(&signal, &mut computed);
        assert!(computed.iter().all(|&d| d == 0.0));
    }

    #[test]
    fn yin_normalized_square_error_test() {
        let signal: &mut Vec<f64> = &mut vec![0., 6., 14.];
        let result = vec![1., 1., 2. * 14. / (6. + 14.)];

        yin_normalize_square_error(signal);

        assert_eq!(result, *signal);
    }

    #[test]
    fn zero_running_sum_normalizes_to_one() {
        let signal: &mut Vec<f64> = &mut vec![0., 0., 0., 4.];
        yin_normalize_square_error(signal);
        assert_eq!(*signal, vec![1., 1., 1., 3.]);
    }

    #[test]
    fn hann_window_shape() {
        let window: Vec<f64> = hann_window(5);
        let expected = [0.0, 0.5, 1.0, 0.5, 0.0];
        for (a, b) in window.iter().zip(expected.iter()) {
            assert!((a - b).abs() < 1e-12);
        }
        assert_eq!(hann_window::<f64>(1), vec![1.0]);
        assert!(hann_window::<f64>(0).is_empty());
    }

    #[test]
    fn dc_offset_is_removed() {
        let mut signal = vec![1.0f64, 2.0, 3.0, 6.0];
        remove_dc_offset(&mut signal);
        assert_eq!(signal, vec![-2.0, -1.0, 0.0, 3.0]);
    }

    #[test]
    fn threshold_walks_to_bottom_of_first_dip() {
        let cmndf = [1.0, 0.9, 0.5, 0.09, 0.05, 0.02, 0.04, 0.01, 0.3];
        assert_eq!(
            absolute_threshold(&cmndf, 1, 8, 0.1),
            Some((5, TauSearch::Threshold))
        );
    }

    #[test]
    fn threshold_stops_on_equal_neighbour() {
        let cmndf = [1.0, 0.8, 0.05, 0.05, 0.01];
        assert_eq!(
            absolute_threshold(&cmndf, 1, 4, 0.1),
            Some((2, TauSearch::Threshold))
        );
    }

    #[test]
    fn threshold_scan_ignores_min_tau() {
        // A dip below the band is still taken by the threshold branch.
        let cmndf = [1.0, 0.5, 0.02, 0.5, 0.2, 0.3];
        assert_eq!(
            absolute_threshold(&cmndf, 3, 5, 0.1),
            Some((2, TauSearch::Threshold))
        );
    }

    #[test]
    fn fallback_takes_minimum_inside_band() {
        let cmndf = [1.0, 0.15, 0.6, 0.4, 0.3, 0.35];
        assert_eq!(
            absolute_threshold(&cmndf, 2, 5, 0.1),
            Some((4, TauSearch::Fallback))
        );
    }

    #[test]
    fn fallback_on_flat_function_picks_first_lag() {
        let cmndf = [1.0; 10];
        assert_eq!(
            absolute_threshold(&cmndf, 3, 9, 0.1),
            Some((3, TauSearch::Fallback))
        );
    }

    #[test]
    fn empty_range_has_no_period() {
        let cmndf: [f64; 1] = [1.0];
        assert_eq!(absolute_threshold(&cmndf, 1, 5, 0.1), None);
    }
}
