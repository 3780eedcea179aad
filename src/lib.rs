//! # Kick Pitch
//! *kick_pitch* estimates the fundamental frequency of a kick drum hit from a short,
//! complete recording and names the nearest note.
//!
//! # Pipeline
//! The analysis is a straight line of pure functions, each producing a new buffer:
//!
//!   * [resample][utils::resample] to a fixed rate (48 kHz by default),
//!   * [low-pass][utils::filters] at 300 Hz to keep only the sub content,
//!   * cut into [frames][utils::frames] of 4096 samples every 256 samples,
//!   * search each frame with the [YIN detector][detector::yin],
//!   * take the [median][aggregate] of the estimates inside 30–150 Hz,
//!   * map it to a [MIDI note][note].
//!
//! Nothing in the pipeline blocks, allocates shared state, or fails: a clip that is
//! too short, silent, or never periodic in the band gives [`PitchResult::NoPitchFound`].
//! Decoding is left to the caller; [`decode::decode`] reads WAV, AIFF, FLAC, MP3 and
//! Ogg Vorbis files.
//!
//! # Examples
//! ```
//! use kick_pitch::{detect_pitch, DetectorConfig};
//!
//! fn main() {
//!     const SAMPLE_RATE: u32 = 48000;
//!
//!     // Half a second of a 130 Hz tone, standing in for a decoded recording.
//!     let dt = 1.0 / SAMPLE_RATE as f64;
//!     let freq = 130.0;
//!     let signal: Vec<f32> = (0..SAMPLE_RATE as usize / 2)
//!         .map(|x| (2.0 * std::f64::consts::PI * x as f64 * dt * freq).sin() as f32)
//!         .collect();
//!
//!     let result = detect_pitch(&signal, SAMPLE_RATE, &DetectorConfig::default());
//!     let pitch = result.pitch().unwrap();
//!
//!     println!("Frequency: {:.2}, Note: {}", pitch.frequency, pitch.note);
//!     assert_eq!(pitch.note, "C3");
//! }
//! ```

pub use aggregate::{aggregate, Aggregator, Pitch, PitchResult};
pub use config::DetectorConfig;
pub use error::{Error, Result};
pub use pipeline::{detect_buffer_pitch, detect_pitch};
pub use utils::buffer::SampleBuffer;
pub use decode::decode;
pub use wav::load_wav;

pub mod aggregate;
pub mod config;
pub mod decode;
pub mod detector;
pub mod error;
pub mod float;
pub mod note;
pub mod pipeline;
pub mod utils;
pub mod wav;
