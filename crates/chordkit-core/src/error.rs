//! Error types for chordkit plugins.
//!
//! Errors only arise while building chord tables, constructing processors or
//! loading presets. The per-block processing path never fails.

use thiserror::Error;

/// Errors raised while building a chord table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChordError {
    /// A chord definition lists more offsets than a chord may hold.
    #[error("chord `{name}` has {count} offsets, at most {max} are allowed")]
    TooManyOffsets {
        name: String,
        count: usize,
        max: usize,
    },
    /// A table was built without any chords.
    #[error("chord table is empty")]
    EmptyTable,
    /// A table has more chords than a chord id can address.
    #[error("chord table has {count} chords, at most {max} are addressable")]
    TableTooLarge { count: usize, max: usize },
}

/// Errors that can occur in chordkit plugins.
#[derive(Debug, Error)]
pub enum PluginError {
    /// Plugin initialization failed.
    #[error("initialization failed: {0}")]
    InitializationFailed(String),
    /// A built-in chord table was invalid.
    #[error(transparent)]
    Chord(#[from] ChordError),
    /// The requested preset does not exist.
    #[error("unknown preset {0}")]
    UnknownPreset(usize),
}

/// Result type for chordkit operations.
pub type PluginResult<T> = Result<T, PluginError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chord_error_converts() {
        let err: PluginError = ChordError::EmptyTable.into();
        assert!(matches!(err, PluginError::Chord(ChordError::EmptyTable)));
        assert_eq!(err.to_string(), "chord table is empty");
    }

    #[test]
    fn test_display() {
        let err = ChordError::TooManyOffsets {
            name: "Big".into(),
            count: 9,
            max: 8,
        };
        assert_eq!(err.to_string(), "chord `Big` has 9 offsets, at most 8 are allowed");
        assert_eq!(PluginError::UnknownPreset(4).to_string(), "unknown preset 4");
    }
}
