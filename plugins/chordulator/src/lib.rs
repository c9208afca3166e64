//! Chordulator - plays a different chord for each note of the octave.
//!
//! The keyboard is split at the split point. The octave directly below it
//! is the modifier zone: each of its twelve keys selects a chord from the
//! table below, and the lowest held modifier key wins. Notes at or above
//! the split point are expanded into the selected chord. With no modifier
//! held the "None" chord plays the root note alone.
//!
//! # Parameters
//!
//! | id | name | range | default |
//! |----|------|-------|---------|
//! | 0-11 | "C chord" .. "B chord" | 1-21 | key + 1 |
//! | 12 | "Split Point" | 12-115 | 60 (C4) |
//! | 13 | "Latch" | off/on | off |
//!
//! With latch on, releasing the modifier keys keeps the last chord.

use std::sync::Arc;

use chordkit::prelude::*;

// =============================================================================
// Plugin Configuration
// =============================================================================

/// Plugin metadata.
pub static CONFIG: PluginConfig = PluginConfig::new("Chordulator", 2)
    .with_description(
        "Plugin that creates different chords for each note of the octave based on modulator notes",
    )
    .with_version(1, 0, 0);

// =============================================================================
// Chord Table
// =============================================================================

/// Chords selectable from the modifier zone. Id 0 plays the root only.
pub const CHORDS: &[(&str, &[u8])] = &[
    ("None", &[0]),
    ("Major", &[0, 4, 7]),
    ("Minor", &[0, 3, 7]),
    ("Diminished", &[0, 3, 6]),
    ("Augmented", &[0, 4, 8]),
    ("Major Seventh", &[0, 4, 7, 11]),
    ("Minor Seventh", &[0, 3, 7, 10]),
    ("Dominant Seventh", &[0, 4, 7, 10]),
    ("Diminished Seventh", &[0, 3, 6, 9]),
    ("Half-Diminished Seventh", &[0, 3, 6, 10]),
    ("Minor Major Seventh", &[0, 3, 7, 11]),
    ("Suspended Second", &[0, 2, 7]),
    ("Suspended Fourth", &[0, 5, 7]),
    ("Sixth", &[0, 4, 7, 9]),
    ("Minor Sixth", &[0, 3, 7, 9]),
    ("Ninth", &[0, 4, 7, 10, 14]),
    ("Minor Ninth", &[0, 3, 7, 10, 14]),
    ("Major Ninth", &[0, 4, 7, 11, 14]),
    ("Eleventh", &[0, 4, 7, 10, 14, 17]),
    ("Minor Eleventh", &[0, 3, 7, 10, 14, 17]),
    ("Thirteenth", &[0, 4, 7, 10, 14, 17, 21]),
    ("Minor Thirteenth", &[0, 3, 7, 10, 14, 17, 21]),
];

// =============================================================================
// Parameters
// =============================================================================

/// Id of the split point parameter.
pub const SPLIT_POINT: ParameterId = 12;

/// Id of the latch parameter.
pub const LATCH: ParameterId = 13;

/// Chordulator parameters.
#[derive(Debug)]
pub struct ChordulatorParameters {
    chords: [IntParameter; 12],
    split_point: IntParameter,
    latch: BoolParameter,
}

impl ChordulatorParameters {
    /// Build parameters whose chord choices cover `table` (excluding id 0).
    pub fn new(table: &ChordTable) -> Self {
        let last = table.len().saturating_sub(1) as i64;
        let labels = Formatter::labels(1, table.names().into_iter().skip(1));
        let chords = std::array::from_fn(|key| {
            IntParameter::new(format!("{} chord", NOTE_NAMES[key]), key as i64 + 1, 1..=last)
                .with_id(key as ParameterId)
                .with_formatter(labels.clone())
        });
        Self {
            chords,
            split_point: IntParameter::new("Split Point", 60, 12..=115)
                .with_id(SPLIT_POINT)
                .with_formatter(Formatter::NoteName),
            latch: BoolParameter::new("Latch", false).with_id(LATCH),
        }
    }

    /// Chord assigned to modifier key `key` (0 = lowest note of the zone).
    pub fn chord_for_key(&self, key: u8) -> ChordId {
        self.chords
            .get(key as usize)
            .map_or(BYPASS_CHORD, |p| ChordId::try_from(p.get()).unwrap_or(ChordId::MAX))
    }

    /// First note of the play zone.
    pub fn split_point(&self) -> MidiNote {
        MidiNote::try_from(self.split_point.get()).unwrap_or(60)
    }

    /// Returns true if released modifier keys keep their chord.
    pub fn latch(&self) -> bool {
        self.latch.get()
    }
}

impl ParameterStore for ChordulatorParameters {
    fn count(&self) -> usize {
        14
    }

    fn parameter(&self, index: usize) -> Option<&dyn ParameterRef> {
        match index {
            0..=11 => Some(&self.chords[index]),
            12 => Some(&self.split_point),
            13 => Some(&self.latch),
            _ => None,
        }
    }
}

// =============================================================================
// Voicing
// =============================================================================

/// Expands play notes with the chord selected in the modifier zone.
#[derive(Debug)]
pub struct ChordulatorVoicing {
    table: ChordTable,
    parameters: Arc<ChordulatorParameters>,
    state: ModifierState,
}

impl ChordulatorVoicing {
    pub fn new(table: ChordTable, parameters: Arc<ChordulatorParameters>) -> Self {
        Self {
            table,
            parameters,
            state: ModifierState::new(),
        }
    }

    /// Chord that the next play note will use.
    pub fn active_chord(&self) -> ChordId {
        self.state.active()
    }
}

impl Voicing for ChordulatorVoicing {
    fn zones(&self) -> KeyZones {
        KeyZones::split(self.parameters.split_point())
    }

    fn modifier(&mut self, note: MidiNote, _key: u8, pressed: bool) {
        let zones = self.zones();
        let parameters = &self.parameters;
        let assigned = |key| parameters.chord_for_key(key);
        if pressed {
            self.state.press(note, &zones, assigned);
        } else {
            self.state
                .release(note, &zones, assigned, parameters.latch());
        }
    }

    fn voice(&self, note: MidiNote, velocity: u8) -> Option<Chord> {
        let id = self.state.active();
        let definition = self.table.get(id)?;
        let mut chord = Chord::from_table(id);
        for output in definition.notes_from(note) {
            chord.push(output, velocity);
        }
        Some(chord)
    }

    fn reset(&mut self) {
        self.state.reset();
    }
}

// =============================================================================
// Processor
// =============================================================================

/// Chordulator processor.
#[derive(Debug)]
pub struct Chordulator {
    parameters: Arc<ChordulatorParameters>,
    engine: ChordEngine<ChordulatorVoicing>,
}

impl Chordulator {
    /// Create a processor with the default engine configuration.
    pub fn new() -> PluginResult<Self> {
        Self::with_config(EngineConfig::default())
    }

    /// Create a processor with an explicit engine configuration.
    pub fn with_config(config: EngineConfig) -> PluginResult<Self> {
        let table = ChordTable::from_static(CHORDS)?;
        let parameters = Arc::new(ChordulatorParameters::new(&table));
        let voicing = ChordulatorVoicing::new(table, Arc::clone(&parameters));
        log::debug!("{} created with {} chords", CONFIG.name, CHORDS.len());
        Ok(Self {
            parameters,
            engine: ChordEngine::new(voicing, config),
        })
    }

    /// Chord that the next play note will use.
    pub fn active_chord(&self) -> ChordId {
        self.engine.voicing().active_chord()
    }

    /// The engine, for inspecting held notes.
    pub fn engine(&self) -> &ChordEngine<ChordulatorVoicing> {
        &self.engine
    }
}

impl MidiProcessor for Chordulator {
    type Parameters = ChordulatorParameters;

    fn config(&self) -> &'static PluginConfig {
        &CONFIG
    }

    fn parameters(&self) -> &Arc<ChordulatorParameters> {
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
