//! TonalChords - diatonic chords in a key chosen from the modifier zone.
//!
//! Each pitch class of the play zone is mapped to a chord built on the
//! scale degrees of C major (I, ii, V7, ...). A note in the octave below
//! the split point sets the tonic, which transposes every chord that
//! follows. Chords are anchored to the octave of the played note, so the
//! same pitch class always produces the same voicing within an octave.
//!
//! ```text
//! output = (note / 12) * 12 + tonic + offset
//! ```

use std::sync::Arc;

use chordkit::prelude::*;

// =============================================================================
// Plugin Configuration
// =============================================================================

/// Plugin metadata.
pub static CONFIG: PluginConfig = PluginConfig::new("Tonal Chord", 3)
    .with_description(
        "Plugin that creates different chords for each note of the octave based on tonal harmony",
    )
    .with_version(0, 1, 0);

// =============================================================================
// Chord Table
// =============================================================================

/// Diatonic chords of C major, offsets from the C of the played octave.
pub const CHORDS: &[(&str, &[u8])] = &[
    ("None", &[0]),
    ("I", &[0, 4, 7]),
    ("C Major Seventh", &[0, 4, 7, 11]),
    ("III", &[4, 7, 11]),
    ("D Minor Seventh", &[2, 5, 9, 12]),
    ("V", &[7, 11, 14]),
    ("VII", &[11, 14, 17]),
    ("E Minor Seventh", &[4, 7, 11, 14]),
    ("II", &[2, 5, 9]),
    ("F Major Seventh", &[5, 9, 12, 16]),
    ("IV", &[5, 9, 12]),
    ("G Dominant Seventh", &[7, 11, 14, 17]),
    ("VI", &[9, 12, 16]),
];

// =============================================================================
// Parameters
// =============================================================================

/// Id of the split point parameter.
pub const SPLIT_POINT: ParameterId = 12;

/// TonalChords parameters.
#[derive(Debug)]
pub struct TonalParameters {
    chords: [IntParameter; 12],
    split_point: IntParameter,
}

impl TonalParameters {
    pub fn new(table: &ChordTable) -> Self {
        let last = table.len().saturating_sub(1) as i64;
        let labels = Formatter::labels(1, table.names().into_iter().skip(1));
        Self {
            chords: std::array::from_fn(|pc| {
                IntParameter::new(format!("{} chord", NOTE_NAMES[pc]), pc as i64 + 1, 1..=last)
                    .with_id(pc as ParameterId)
                    .with_formatter(labels.clone())
            }),
            split_point: IntParameter::new("Split Point", 60, 12..=115)
                .with_id(SPLIT_POINT)
                .with_formatter(Formatter::NoteName),
        }
    }

    /// Chord played for pitch class `pc`.
    pub fn chord_for_pitch_class(&self, pc: u8) -> ChordId {
        self.chords
            .get(pc as usize)
            .map_or(BYPASS_CHORD, |p| ChordId::try_from(p.get()).unwrap_or(ChordId::MAX))
    }

    /// First note of the play zone.
    pub fn split_point(&self) -> MidiNote {
        MidiNote::try_from(self.split_point.get()).unwrap_or(60)
    }
}

impl ParameterStore for TonalParameters {
    fn count(&self) -> usize {
        13
    }

    fn parameter(&self, index: usize) -> Option<&dyn ParameterRef> {
        match index {
            0..=11 => Some(&self.chords[index]),
            12 => Some(&self.split_point),
            _ => None,
        }
    }
}

// =============================================================================
// Voicing
// =============================================================================

/// Maps pitch classes to diatonic chords, transposed by the tonic.
#[derive(Debug)]
pub struct TonalVoicing {
    table: ChordTable,
    parameters: Arc<TonalParameters>,
    tonic: u8,
}

impl TonalVoicing {
    pub fn new(table: ChordTable, parameters: Arc<TonalParameters>) -> Self {
        Self {
            table,
            parameters,
            tonic: 0,
        }
    }

    /// Semitones above C of the current key.
    pub fn tonic(&self) -> u8 {
        self.tonic
    }
}

impl Voicing for TonalVoicing {
    fn zones(&self) -> KeyZones {
        KeyZones::split(self.parameters.split_point())
    }

    // The tonic sticks until another modifier key is pressed.
    fn modifier(&mut self, _note: MidiNote, key: u8, pressed: bool) {
        if pressed {
            self.tonic = key;
        }
    }

    fn voice(&self, note: MidiNote, velocity: u8) -> Option<Chord> {
        let id = self.parameters.chord_for_pitch_class(note % OCTAVE);
        let definition = self.table.get(id)?;
        let base = (note / OCTAVE * OCTAVE).checked_add(self.tonic)?;
        let mut chord = Chord::from_table(id);
        for output in definition.notes_from(base) {
            chord.push(output, velocity);
        }
        Some(chord)
    }

    fn reset(&mut self) {
        self.tonic = 0;
    }
}

// =============================================================================
// Processor
// =============================================================================

/// TonalChords processor.
#[derive(Debug)]
pub struct TonalChords {
    parameters: Arc<TonalParameters>,
    engine: ChordEngine<TonalVoicing>,
}

impl TonalChords {
    /// Create a processor with the default engine configuration.
    pub fn new() -> PluginResult<Self> {
        Self::with_config(EngineConfig::default())
    }

    /// Create a processor with an explicit engine configuration.
    pub fn with_config(config: EngineConfig) -> PluginResult<Self> {
        let table = ChordTable::from_static(CHORDS)?;
        let parameters = Arc::new(TonalParameters::new(&table));
        let voicing = TonalVoicing::new(table, Arc::clone(&parameters));
        log::debug!("{} created", CONFIG.name);
        Ok(Self {
            parameters,
            engine: ChordEngine::new(voicing, config),
        })
    }

    /// Current tonic (0 = C).
    pub fn tonic(&self) -> u8 {
        self.engine.voicing().tonic()
    }
}

impl MidiProcessor for TonalChords {
    type Parameters = TonalParameters;

    fn config(&self) -> &'static PluginConfig {
        &CONFIG
    }

    fn parameters(&self) -> &Arc<TonalParameters> {
        &self.parameters
    }

    fn process(&mut self, input: &[MidiEvent], output: &mut MidiBuffer) {
        self.engine.process(input, output);
    }

    fn reset(&mut self, output: &mut MidiBuffer) {
        self.engine.release_all(0, output);
        self.engine.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notes(plugin: &mut TonalChords, input: &[MidiEvent]) -> Vec<(u8, u8)> {
        let mut output = MidiBuffer::with_capacity(64);
        plugin.process(input, &mut output);
        output.iter().map(|e| (e.status() & 0xF0, e.data[1])).collect()
    }

    #[test]
    fn test_default_mapping_in_c() {
        let mut plugin = TonalChords::new().unwrap();
        // C4 -> I
        let out = notes(&mut plugin, &[MidiEvent::note_on(0, 0, 60, 100)]);
        assert_eq!(out, vec![(0x90, 60), (0x90, 64), (0x90, 67)]);
        // D4 (pitch class 2) -> "III", anchored at C4.
        let out = notes(&mut plugin, &[MidiEvent::note_on(0, 0, 62, 100)]);
        assert_eq!(out, vec![(0x90, 64), (0x90, 67), (0x90, 71)]);
    }

    #[test]
    fn test_tonic_transposes() {
        let mut plugin = TonalChords::new().unwrap();
        // D below the split sets the tonic to 2.
        let out = notes(
            &mut plugin,
            &[
                MidiEvent::note_on(0, 0, 50, 100),
                MidiEvent::note_off(0, 0, 50, 0),
                MidiEvent::note_on(0, 0, 60, 100),
            ],
        );
        assert_eq!(plugin.tonic(), 2);
        assert_eq!(out, vec![(0x90, 62), (0x90, 66), (0x90, 69)]);
    }

    #[test]
    fn test_note_off_releases_sent_notes_after_tonic_change() {
        let mut plugin = TonalChords::new().unwrap();
        notes(&mut plugin, &[MidiEvent::note_on(0, 0, 60, 100)]);
        notes(&mut plugin, &[MidiEvent::note_on(0, 0, 55, 100)]);
        let out = notes(&mut plugin, &[MidiEvent::note_off(0, 0, 60, 0)]);
        assert_eq!(out, vec![(0x80, 60), (0x80, 64), (0x80, 67)]);
    }

    #[test]
    fn test_retrigger() {
        let mut plugin = TonalChords::new().unwrap();
        notes(&mut plugin, &[MidiEvent::note_on(0, 0, 60, 100)]);
        let out = notes(
            &mut plugin,
            &[
                MidiEvent::note_on(0, 0, 49, 100),
                MidiEvent::note_on(0, 0, 60, 100),
            ],
        );
        assert_eq!(
            out,
            vec![
                (0x80, 60),
                (0x80, 64),
                (0x80, 67),
                (0x90, 61),
                (0x90, 65),
                (0x90, 68),
            ]
        );
    }

    #[test]
    fn test_high_notes_skipped() {
        let mut plugin = TonalChords::new().unwrap();
        // F9: pitch class 5 -> "VII" {11, 14, 17} on base 120, all above 127.
        let out = notes(&mut plugin, &[MidiEvent::note_on(0, 0, 125, 100)]);
        assert!(out.is_empty());
        let out = notes(&mut plugin, &[MidiEvent::note_on(0, 0, 120, 100)]);
        assert_eq!(out, vec![(0x90, 120), (0x90, 124), (0x90, 127)]);
    }

    #[test]
    fn test_malformed_note_with_high_tonic() {
        let mut plugin = TonalChords::new().unwrap();
        // B below the split: tonic 11.
        notes(&mut plugin, &[MidiEvent::note_on(0, 0, 59, 100)]);
        assert_eq!(plugin.tonic(), 11);
        let raw = MidiEvent::new(0, [0x90, 0xFF, 100]);
        let mut output = MidiBuffer::with_capacity(8);
        plugin.process(&[raw], &mut output);
        assert_eq!(output.as_slice(), &[raw]);
        assert!(plugin.engine.voicing().voice(255, 100).is_none());
    }

    #[test]
    fn test_parameters() {
        let plugin = TonalChords::new().unwrap();
        let params = plugin.parameters();
        assert_eq!(params.count(), 13);
        assert_eq!(params.format(0, 1.0).as_deref(), Some("I"));
        assert_eq!(params.format(0, 12.0).as_deref(), Some("VI"));
        assert!(!plugin.set_parameter(0, 13.0));
        assert!(!plugin.set_parameter(SPLIT_POINT, 127.0));
        assert!(plugin.set_parameter(SPLIT_POINT, 48.0));
        assert_eq!(params.chord_for_pitch_class(0), 1);
    }
}
