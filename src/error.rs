//! Error types for configuration and audio loading.
//!
//! The analysis pipeline itself never fails: unusable input degrades to
//! [`PitchResult::NoPitchFound`](crate::PitchResult::NoPitchFound). These errors
//! belong to the surfaces around it.

use thiserror::Error;

/// Result type for fallible operations in this crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A configuration field holds a value the detector cannot work with.
    #[error("invalid configuration '{name}': {message}")]
    InvalidConfig {
        /// Field name.
        name: &'static str,
        /// What is wrong with it.
        message: String,
    },

    /// The file uses a sample layout the loader does not handle.
    #[error("unsupported audio format: {0}")]
    UnsupportedFormat(String),

    /// The decoded file contained no samples.
    #[error("audio file contains no samples")]
    EmptyAudio,

    #[error("WAV decoding error: {0}")]
    Wav(#[from] hound::Error),

    /// Failure in the general-purpose decoder used for non-WAV containers.
    #[error("decoding error: {0}")]
    Decode(#[from] symphonia::core::errors::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON configuration.
    #[error("configuration parse error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn invalid_config(name: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            name,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_config_message_names_the_field() {
        let err = Error::invalid_config("hop_size", "must be at least 1");
        let text = err.to_string();
        assert!(text.contains("hop_size"));
        assert!(text.contains("must be at least 1"));
    }
}
