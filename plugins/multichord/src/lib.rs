//! MultiChord - a different chord for each note of the octave.
//!
//! There is no split point: every note is expanded. Each pitch class owns
//! four voices, and each voice has a semitone offset (-12 to +12) and a
//! velocity factor (0.5x to 2.0x). Voice 1 always plays. Voices 2-4 only
//! play when their offset differs from voice 1, so a pitch class left at
//! the defaults passes through as a single note.
//!
//! Three presets are built in: "Default", "Major triad" and "Minor triad".
//!
//! # Parameter ids
//!
//! ```text
//! offset   of pitch class pc, voice v: pc * 4 + v        (0..48)
//! velocity of pitch class pc, voice v: 48 + pc * 4 + v   (48..96)
//! ```

use std::sync::Arc;

use chordkit::prelude::*;

// =============================================================================
// Plugin Configuration
// =============================================================================

/// Plugin metadata.
pub static CONFIG: PluginConfig = PluginConfig::new("MultiChord", 1)
    .with_description("Plugin that creates different chords for each note of the octave")
    .with_version(1, 0, 0);

/// Voices per pitch class.
pub const VOICES: usize = 4;

/// Number of offset (and of velocity) parameters.
pub const MATRIX_SIZE: usize = VOICES * 12;

/// Built-in preset names.
pub const PRESETS: [&str; 3] = ["Default", "Major triad", "Minor triad"];

/// Parameter id of the offset for `pitch_class` and `voice`.
pub const fn offset_id(pitch_class: u8, voice: usize) -> ParameterId {
    (pitch_class as usize * VOICES + voice) as ParameterId
}

/// Parameter id of the velocity factor for `pitch_class` and `voice`.
pub const fn velocity_id(pitch_class: u8, voice: usize) -> ParameterId {
    (MATRIX_SIZE + pitch_class as usize * VOICES + voice) as ParameterId
}

// =============================================================================
// Parameters
// =============================================================================

/// Offset and velocity matrices.
#[derive(Debug)]
pub struct MultiChordParameters {
    offsets: [IntParameter; MATRIX_SIZE],
    velocities: [FloatParameter; MATRIX_SIZE],
}

impl MultiChordParameters {
    pub fn new() -> Self {
        Self {
            offsets: std::array::from_fn(|i| {
                let pc = i / VOICES;
                IntParameter::new(
                    format!("Offset {}{}", NOTE_NAMES[pc], i % VOICES + 1),
                    0,
                    -12..=12,
                )
                .with_id(i as ParameterId)
                .with_group(pc as GroupId)
                .with_formatter(Formatter::Interval { root: pc as u8 })
            }),
            velocities: std::array::from_fn(|i| {
                let pc = i / VOICES;
                FloatParameter::multiplier(
                    format!("Velocity {}{}", NOTE_NAMES[pc], i % VOICES + 1),
                    1.0,
                    0.5..=2.0,
                )
                .with_id((MATRIX_SIZE + i) as ParameterId)
                .with_group((12 + pc) as GroupId)
            }),
        }
    }

    /// Semitone offset of `voice` for `pitch_class`.
    pub fn offset(&self, pitch_class: u8, voice: usize) -> i64 {
        self.offsets[pitch_class as usize % 12 * VOICES + voice % VOICES].get()
    }

    /// Velocity factor of `voice` for `pitch_class`.
    pub fn velocity(&self, pitch_class: u8, voice: usize) -> f32 {
        self.velocities[pitch_class as usize % 12 * VOICES + voice % VOICES].get()
    }

    /// Apply preset `index` to every pitch class.
    pub fn apply_preset(&self, index: usize) -> PluginResult<()> {
        let third = match index {
            0 => None,
            1 => Some(4),
            2 => Some(3),
            _ => return Err(PluginError::UnknownPreset(index)),
        };
        self.reset_all();
        if let Some(third) = third {
            for voices in self.offsets.chunks(VOICES) {
                voices[1].set(third);
                voices[2].set(7);
            }
        }
        log::debug!("{} loaded preset \"{}\"", CONFIG.name, PRESETS[index]);
        Ok(())
    }
}

impl Default for MultiChordParameters {
    fn default() -> Self {
        Self::new()
    }
}

impl ParameterStore for MultiChordParameters {
    fn count(&self) -> usize {
        2 * MATRIX_SIZE
    }

    fn parameter(&self, index: usize) -> Option<&dyn ParameterRef> {
        if index < MATRIX_SIZE {
            Some(&self.offsets[index])
        } else {
            self.velocities
                .get(index - MATRIX_SIZE)
                .map(|p| p as &dyn ParameterRef)
        }
    }

    fn group_count(&self) -> usize {
        24
    }

    fn group(&self, index: usize) -> Option<GroupInfo> {
        match index {
            0..=11 => Some(GroupInfo::new(index as GroupId, format!("Offset {}", NOTE_NAMES[index]))),
            12..=23 => Some(GroupInfo::new(
                index as GroupId,
                format!("Velocity {}", NOTE_NAMES[index - 12]),
            )),
            _ => None,
        }
    }
}

// =============================================================================
// Voicing
// =============================================================================

/// Expands every note through the offset and velocity matrices.
#[derive(Debug)]
pub struct MatrixVoicing {
    parameters: Arc<MultiChordParameters>,
}

impl MatrixVoicing {
    pub fn new(parameters: Arc<MultiChordParameters>) -> Self {
        Self { parameters }
    }
}

impl Voicing for MatrixVoicing {
    fn zones(&self) -> KeyZones {
        KeyZones::play_only()
    }

    fn modifier(&mut self, _note: MidiNote, _key: u8, _pressed: bool) {}

    fn voice(&self, note: MidiNote, velocity: u8) -> Option<Chord> {
        let pc = note % OCTAVE;
        let root = self.parameters.offset(pc, 0);
        let mut chord = Chord::untabled();
        for voice in 0..VOICES {
            let offset = self.parameters.offset(pc, voice);
            if voice > 0 && offset == root {
                continue;
            }
            let Ok(output) = MidiNote::try_from(i64::from(note) + offset) else {
                continue;
            };
            if output > MAX_NOTE {
                continue;
            }
            let scaled = (self.parameters.velocity(pc, voice) * f32::from(velocity)) as i32;
            if scaled < 1 {
                continue;
            }
            chord.push(output, scaled.min(127) as u8);
        }
        Some(chord)
    }
}

// =============================================================================
// Processor
// =============================================================================

/// MultiChord processor.
#[derive(Debug)]
pub struct MultiChord {
    parameters: Arc<MultiChordParameters>,
    engine: ChordEngine<MatrixVoicing>,
}

impl MultiChord {
    /// Create a processor with the default engine configuration.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Create a processor with an explicit engine configuration.
    pub fn with_config(config: EngineConfig) -> Self {
        let parameters = Arc::new(MultiChordParameters::new());
        let voicing = MatrixVoicing::new(Arc::clone(&parameters));
        log::debug!("{} created", CONFIG.name);
        Self {
            parameters,
            engine: ChordEngine::new(voicing, config),
        }
    }
}

impl Default for MultiChord {
    fn default() -> Self {
        Self::new()
    }
}

impl MidiProcessor for MultiChord {
    type Parameters = MultiChordParameters;

    fn config(&self) -> &'static PluginConfig {
        &CONFIG
    }

    fn parameters(&self) -> &Arc<MultiChordParameters> {
        &self.parameters
    }

    fn process(&mut self, input: &[MidiEvent], output: &mut MidiBuffer) {
        self.engine.process(input, output);
    }

    fn reset(&mut self, output: &mut MidiBuffer) {
        self.engine.release_all(0, output);
        self.engine.reset();
    }

    fn preset_count(&self) -> usize {
        PRESETS.len()
    }

    fn preset_name(&self, index: usize) -> Option<&'static str> {
        PRESETS.get(index).copied()
    }

    fn load_preset(&mut self, index: usize) -> PluginResult<()> {
        self.parameters.apply_preset(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn process(plugin: &mut MultiChord, input: &[MidiEvent]) -> Vec<[u8; 3]> {
        let mut output = MidiBuffer::with_capacity(64);
        plugin.process(input, &mut output);
        output.iter().map(|e| e.data).collect()
    }

    #[test]
    fn test_default_passes_root() {
        let mut plugin = MultiChord::new();
        let out = process(&mut plugin, &[MidiEvent::note_on(0, 0, 60, 100)]);
        assert_eq!(out, vec![[0x90, 60, 100]]);
        let out = process(&mut plugin, &[MidiEvent::note_off(0, 0, 60, 0)]);
        assert_eq!(out, vec![[0x80, 60, 0]]);
    }

    #[test]
    fn test_major_triad_preset() {
        let mut plugin = MultiChord::new();
        plugin.load_preset(1).unwrap();
        let out = process(&mut plugin, &[MidiEvent::note_on(0, 0, 62, 90)]);
        assert_eq!(out, vec![[0x90, 62, 90], [0x90, 66, 90], [0x90, 69, 90]]);
    }

    #[test]
    fn test_minor_triad_preset_and_back() {
        let mut plugin = MultiChord::new();
        plugin.load_preset(2).unwrap();
        assert_eq!(plugin.get_parameter(offset_id(9, 1)), Some(3.0));
        assert_eq!(plugin.get_parameter(offset_id(9, 3)), Some(0.0));
        plugin.load_preset(0).unwrap();
        assert_eq!(plugin.get_parameter(offset_id(9, 1)), Some(0.0));
    }

    #[test]
    fn test_unknown_preset() {
        let mut plugin = MultiChord::new();
        assert!(matches!(plugin.load_preset(3), Err(PluginError::UnknownPreset(3))));
        assert_eq!(plugin.preset_count(), 3);
        assert_eq!(plugin.preset_name(1), Some("Major triad"));
        assert_eq!(plugin.preset_name(3), None);
    }

    #[test]
    fn test_velocity_scaling() {
        let mut plugin = MultiChord::new();
        assert!(plugin.set_parameter(offset_id(0, 1), 12.0));
        assert!(plugin.set_parameter(offset_id(0, 2), -12.0));
        assert!(plugin.set_parameter(velocity_id(0, 0), 2.0));
        assert!(plugin.set_parameter(velocity_id(0, 1), 0.5));
        let out = process(&mut plugin, &[MidiEvent::note_on(0, 0, 60, 100)]);
        assert_eq!(out, vec![[0x90, 60, 127], [0x90, 72, 50], [0x90, 48, 100]]);
    }

    #[test]
    fn test_quiet_voices_are_skipped() {
        let mut plugin = MultiChord::new();
        plugin.load_preset(1).unwrap();
        assert!(plugin.set_parameter(velocity_id(0, 1), 0.5));
        let out = process(&mut plugin, &[MidiEvent::note_on(0, 0, 60, 1)]);
        assert_eq!(out, vec![[0x90, 60, 1], [0x90, 67, 1]]);
    }

    #[test]
    fn test_out_of_range_notes_skipped() {
        let mut plugin = MultiChord::new();
        assert!(plugin.set_parameter(offset_id(0, 0), -12.0));
        assert!(plugin.set_parameter(offset_id(0, 1), 4.0));
        assert!(plugin.set_parameter(offset_id(0, 2), -12.0));
        assert!(plugin.set_parameter(offset_id(0, 3), -12.0));
        let out = process(&mut plugin, &[MidiEvent::note_on(0, 0, 0, 100)]);
        assert_eq!(out, vec![[0x90, 4, 100]]);

        plugin.load_preset(1).unwrap();
        let out = process(&mut plugin, &[MidiEvent::note_on(0, 0, 125, 100)]);
        assert_eq!(out, vec![[0x90, 125, 100]]);
    }

    #[test]
    fn test_note_off_matches_after_matrix_change() {
        let mut plugin = MultiChord::new();
        plugin.load_preset(1).unwrap();
        process(&mut plugin, &[MidiEvent::note_on(0, 0, 60, 100)]);
        plugin.load_preset(2).unwrap();
        let out = process(&mut plugin, &[MidiEvent::note_off(0, 0, 60, 0)]);
        assert_eq!(out, vec![[0x80, 60, 0], [0x80, 64, 0], [0x80, 67, 0]]);
    }

    #[test]
    fn test_other_events_pass_through() {
        let mut plugin = MultiChord::new();
        let cc = MidiEvent::control_change(0, 0, cc::MOD_WHEEL, 10);
        let out = process(&mut plugin, &[cc]);
        assert_eq!(out, vec![cc.data]);
    }

    #[test]
    fn test_parameter_layout() {
        let plugin = MultiChord::new();
        let params = plugin.parameters();
        assert_eq!(params.count(), 96);
        assert_eq!(params.info(5).unwrap().name, "Offset C#2");
        assert_eq!(params.info(5).unwrap().symbol, "offset_cs2");
        assert_eq!(params.info(53).unwrap().name, "Velocity C#2");
        assert_eq!(params.format(offset_id(0, 1), 4.0).as_deref(), Some("+E"));
        assert_eq!(params.format(velocity_id(0, 0), 1.0).as_deref(), Some("1.00x"));
        assert_eq!(params.group_count(), 24);
        assert_eq!(params.find_group_by_name("Velocity D"), Some(14));
        assert!(!plugin.set_parameter(offset_id(0, 0), 13.0));
        assert!(!plugin.set_parameter(velocity_id(0, 0), 2.5));
        assert!(!plugin.set_parameter(96, 0.0));
    }
}
