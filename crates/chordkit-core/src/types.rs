//! Shared primitive types and note-name helpers.

/// Parameter identifier. Stable index into a plugin's parameter list.
pub type ParameterId = u32;

/// Plain parameter value as exchanged with a host.
pub type ParameterValue = f32;

/// Number of MIDI note numbers (0..=127).
pub const NOTE_COUNT: usize = 128;

/// Highest valid MIDI note number.
pub const MAX_NOTE: u8 = 127;

/// Semitones per octave.
pub const OCTAVE: u8 = 12;

/// Pitch-class names, sharps only.
pub const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Lowercase pitch-class names suitable for parameter symbols.
pub const NOTE_SYMBOLS: [&str; 12] = [
    "c", "cs", "d", "ds", "e", "f", "fs", "g", "gs", "a", "as", "b",
];

/// Pitch-class name of a note number (`60` -> `"C"`).
#[inline]
pub fn pitch_class_name(note: u8) -> &'static str {
    NOTE_NAMES[(note % OCTAVE) as usize]
}

/// Note name with octave, middle C being `C4` (`0` -> `"C-1"`).
pub fn note_name(note: u8) -> String {
    format!("{}{}", pitch_class_name(note), i32::from(note / OCTAVE) - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_name() {
        assert_eq!(note_name(0), "C-1");
        assert_eq!(note_name(60), "C4");
        assert_eq!(note_name(61), "C#4");
        assert_eq!(note_name(127), "G9");
    }
}
