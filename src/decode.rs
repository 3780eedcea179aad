//! Decoding any supported audio file into a mono [`SampleBuffer`].
//!
//! WAV files go through [`hound`] first. Anything `hound` cannot read, and every
//! other container (AIFF, FLAC, MP3, Ogg Vorbis), is handed to `symphonia`.

use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;

use log::{debug, warn};
use symphonia::core::audio::SampleBuffer as PacketBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::error::{Error, Result};
use crate::utils::buffer::SampleBuffer;
use crate::wav::load_wav;

/// Decode the audio file at `path`, averaging its channels to mono.
pub fn decode(path: impl AsRef<Path>) -> Result<SampleBuffer> {
    let path = path.as_ref();
    if has_wav_extension(path) {
        match load_wav(path) {
            Ok(buffer) => return Ok(buffer),
            Err(Error::Wav(hound::Error::IoError(e))) => return Err(Error::Io(e)),
            Err(e @ Error::Io(_)) => return Err(e),
            Err(e) => debug!("hound could not read {}: {}", path.display(), e),
        }
    }
    load_with_symphonia(path)
}

fn has_wav_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| ext.eq_ignore_ascii_case("wav"))
}

fn load_with_symphonia(path: &Path) -> Result<SampleBuffer> {
    let file = File::open(path)?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|ext| ext.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe().format(
        &hint,
        mss,
        &FormatOptions::default(),
        &MetadataOptions::default(),
    )?;
    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| Error::UnsupportedFormat("no audio track".to_string()))?;
    let track_id = track.id;
    let mut sample_rate = track.codec_params.sample_rate;
    let mut channels = track.codec_params.channels.map(|c| c.count());

    let mut decoder =
        symphonia::default::get_codecs().make(&track.codec_params, &DecoderOptions::default())?;

    let mut interleaved: Vec<f32> = Vec::new();
    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == ErrorKind::UnexpectedEof => break,
            Err(e) => return Err(e.into()),
        };
        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                let spec = *decoded.spec();
                sample_rate = Some(spec.rate);
                channels = Some(spec.channels.count());
                let mut buf = PacketBuffer::<f32>::new(decoded.capacity() as u64, spec);
                buf.copy_interleaved_ref(decoded);
                interleaved.extend_from_slice(buf.samples());
            }
            Err(SymphoniaError::DecodeError(e)) => {
                warn!("{}: skipping corrupt packet: {}", path.display(), e);
            }
            Err(e) => return Err(e.into()),
        }
    }

    let (sample_rate, channels) = match (sample_rate, channels) {
        (Some(rate), Some(count)) if rate > 0 && count > 0 => (rate, count),
        _ => {
            return Err(Error::UnsupportedFormat(
                "unknown sample rate or channel count".to_string(),
            ))
        }
    };
    if interleaved.is_empty() {
        return Err(Error::EmptyAudio);
    }

    let buffer = SampleBuffer::from_interleaved(&interleaved, channels, sample_rate);
    debug!(
        "decoded {} with symphonia: {} samples at {} Hz ({:.2} s)",
        path.display(),
        buffer.len(),
        buffer.sample_rate,
        buffer.duration()
    );
    Ok(buffer)
}
