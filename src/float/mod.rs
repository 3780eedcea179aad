//! Generic [Float] type which acts as a stand-in for `f32` or `f64`.
use rustfft::num_traits::float::FloatCore as NumFloatCore;
use rustfft::FftNum;
use std::fmt::{Debug, Display};

/// Difference functions are computed over arrays of [Float]s. A [Float] is normally `f32` or `f64`;
/// the pipeline itself always analyses frames as `f64`.
pub trait Float: Display + Debug + NumFloatCore + FftNum + std::iter::Sum {
    /// Convert an index or a length.
    fn from_len(n: usize) -> Self;
    /// Convert an `f64` constant, rounding if needed.
    fn from_f64_lossy(v: f64) -> Self;
    fn cos(self) -> Self;
}

impl Float for f64 {
    fn from_len(n: usize) -> Self {
        n as f64
    }
    fn from_f64_lossy(v: f64) -> Self {
        v
    }
    fn cos(self) -> Self {
        f64::cos(self)
    }
}

impl Float for f32 {
    fn from_len(n: usize) -> Self {
        n as f32
    }
    fn from_f64_lossy(v: f64) -> Self {
        v as f32
    }
    fn cos(self) -> Self {
        f32::cos(self)
    }
}
