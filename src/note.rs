//! Frequency to MIDI note conversion, with A4 = 440 Hz = MIDI 69.

pub const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Name given to MIDI numbers outside `0..=127`.
pub const UNKNOWN_NOTE: &str = "--";

/// Fractional MIDI number of `frequency`: `69 + 12 * log2(frequency / 440)`.
pub fn hz_to_midi(frequency: f64) -> f64 {
    69.0 + 12.0 * (frequency / 440.0).log2()
}

/// Nearest MIDI note number to `frequency`.
pub fn nearest_midi(frequency: f64) -> i32 {
    hz_to_midi(frequency).round() as i32
}

/// Frequency of MIDI note `midi` in equal temperament.
pub fn midi_to_hz(midi: i32) -> f64 {
    440.0 * 2f64.powf((midi as f64 - 69.0) / 12.0)
}

/// Note name with octave, e.g. `"A4"` for 69 and `"C#-1"` for 1.
/// Numbers outside the MIDI range give [`UNKNOWN_NOTE`].
pub fn midi_to_name(midi: i32) -> String {
    if !(0..=127).contains(&midi) {
        return UNKNOWN_NOTE.to_string();
    }
    let pitch_class = (midi % 12) as usize;
    let octave = midi / 12 - 1;
    format!("{}{}", NOTE_NAMES[pitch_class], octave)
}
