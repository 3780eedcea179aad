use crate::float::Float;

/// Decoded mono audio: samples plus the rate they were recorded at.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl SampleBuffer {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        SampleBuffer {
            samples,
            sample_rate,
        }
    }

    /// Build a mono buffer from interleaved samples by averaging the channels
    /// of each frame. A trailing incomplete frame is ignored.
    pub fn from_interleaved(interleaved: &[f32], channels: usize, sample_rate: u32) -> Self {
        SampleBuffer::new(downmix(interleaved, channels), sample_rate)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds; zero for a buffer without a valid rate.
    pub fn duration(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

pub fn new_real_buffer<T: Float>(size: usize) -> Vec<T> {
    vec![T::zero(); size]
}

/// Average interleaved channels down to one. One channel (or zero, treated as one)
/// is returned as a copy.
pub fn downmix(interleaved: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return interleaved.to_vec();
    }
    let scale = 1.0 / channels as f32;
    interleaved
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() * scale)
        .collect()
}

/// Compute the sum of the square of each element of `arr`.
pub fn square_sum<T>(arr: &[T]) -> T
where
    T: Float,
{
    arr.iter().map(|&s| s * s).sum::<T>()
}

/// Arithmetic mean of `arr`, zero when empty.
pub fn mean<T: Float>(arr: &[T]) -> T {
    if arr.is_empty() {
        return T::zero();
    }
    arr.iter().copied().sum::<T>() / T::from_len(arr.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stereo_is_averaged() {
        let interleaved = [1.0, 0.0, 0.5, 0.5, -1.0, 1.0];
        assert_eq!(downmix(&interleaved, 2), vec![0.5, 0.5, 0.0]);
    }

    #[test]
    fn incomplete_trailing_frame_is_dropped() {
        let interleaved = [0.3, 0.3, 0.3, 0.9];
        assert_eq!(downmix(&interleaved, 3).len(), 1);
    }

    #[test]
    fn mono_passes_through() {
        let buffer = SampleBuffer::from_interleaved(&[0.1, 0.2, 0.3], 1, 8000);
        assert_eq!(buffer.samples, vec![0.1, 0.2, 0.3]);
        assert_eq!(buffer.sample_rate, 8000);
    }

    #[test]
    fn duration_in_seconds() {
        let buffer = SampleBuffer::new(vec![0.0; 24000], 48000);
        assert_eq!(buffer.duration(), 0.5);
        assert_eq!(SampleBuffer::new(vec![0.0; 10], 0).duration(), 0.0);
    }

    #[test]
    fn mean_and_square_sum() {
        let arr: [f64; 4] = [1.0, -1.0, 2.0, 2.0];
        assert_eq!(mean(&arr), 1.0);
        assert_eq!(square_sum(&arr), 10.0);
        assert_eq!(mean::<f64>(&[]), 0.0);
    }
}
