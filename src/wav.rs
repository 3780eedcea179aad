//! Loading WAV files into mono [`SampleBuffer`]s.
//!
//! Integer PCM is scaled to roughly `[-1, 1)`; float WAVs are taken as they are.
//! Multi-channel files are averaged down to mono. The buffer keeps the file's own
//! sample rate, since [`detect_pitch`](crate::detect_pitch) resamples by itself.

use std::io::{Read, Seek};
use std::path::Path;

use hound::{SampleFormat, WavReader};
use log::debug;

use crate::error::{Error, Result};
use crate::utils::buffer::SampleBuffer;

/// Open and decode the WAV file at `path`.
pub fn load_wav(path: impl AsRef<Path>) -> Result<SampleBuffer> {
    let path = path.as_ref();
    let reader = WavReader::open(path)?;
    let buffer = decode(reader)?;
    debug!(
        "loaded {}: {} samples at {} Hz ({:.2} s)",
        path.display(),
        buffer.len(),
        buffer.sample_rate,
        buffer.duration()
    );
    Ok(buffer)
}

/// Decode WAV data from any seekable reader.
pub fn read_wav<R: Read + Seek>(source: R) -> Result<SampleBuffer> {
    decode(WavReader::new(source)?)
}

fn decode<R: Read>(mut reader: WavReader<R>) -> Result<SampleBuffer> {
    let spec = reader.spec();
    let channels = spec.channels as usize;
    if channels == 0 {
        return Err(Error::UnsupportedFormat("zero channels".to_string()));
    }

    let interleaved: Vec<f32> = match (spec.sample_format, spec.bits_per_sample) {
        (SampleFormat::Float, 32) => reader.samples::<f32>().collect::<hound::Result<_>>()?,
        (SampleFormat::Int, bits @ 1..=32) => {
            let scale = 1.0 / (1u64 << (bits - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|s| s as f32 * scale))
                .collect::<hound::Result<_>>()?
        }
        (format, bits) => {
            return Err(Error::UnsupportedFormat(format!(
                "{:?} samples with {} bits",
                format, bits
            )))
        }
    };

    if interleaved.is_empty() {
        return Err(Error::EmptyAudio);
    }
    Ok(SampleBuffer::from_interleaved(
        &interleaved,
        channels,
        spec.sample_rate,
    ))
}
