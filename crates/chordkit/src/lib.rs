//! # chordkit
//!
//! MIDI chord plugins for Rust.
//!
//! chordkit is the shared framework behind CCSend, Chordulator, MultiChord
//! and TonalChords. It contains no host bindings: a wrapper feeds each
//! processor blocks of MIDI events and forwards parameter writes.
//!
//! ## Architecture
//!
//! ```text
//! Your Plugin (implements MidiProcessor)
//!        ↓
//! ChordEngine<V: Voicing> (zones, chord expansion, held notes)
//!        ↓
//! MidiBuffer (bounded output)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use chordkit::prelude::*;
//!
//! struct Octaver;
//!
//! impl Voicing for Octaver {
//!     fn zones(&self) -> KeyZones { KeyZones::play_only() }
//!     fn modifier(&mut self, _: MidiNote, _: u8, _: bool) {}
//!     fn voice(&self, note: MidiNote, velocity: u8) -> Option<Chord> {
//!         let mut chord = Chord::untabled();
//!         chord.push(note, velocity);
//!         if note <= 115 {
//!             chord.push(note + 12, velocity);
//!         }
//!         Some(chord)
//!     }
//! }
//!
//! let mut engine = ChordEngine::new(Octaver, EngineConfig::default());
//! let mut output = MidiBuffer::new();
//! engine.process(&[MidiEvent::note_on(0, 0, 60, 100)], &mut output);
//! ```

// Re-export sub-crates
pub use chordkit_core as core;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use chordkit::prelude::*;
/// ```
pub mod prelude {
    pub use chordkit_core::{
        // MIDI
        cc, status, MidiBuffer, MidiChannel, MidiEvent, MidiEventKind, MidiNote,
        // Chords and zones
        ChordDefinition, ChordId, ChordTable, KeyZones, ModifierState, Zone, BYPASS_CHORD,
        MAX_CHORD_NOTES,
        // Engine
        pass_through, Chord, ChordEngine, HeldNotes, Voice, Voicing,
        // Parameters
        BoolParameter, FloatParameter, Formatter, GroupId, GroupInfo, IntParameter, ParameterId,
        ParameterRef, ParameterStore, ParameterValue, ROOT_GROUP_ID,
        // Plugin
        EngineConfig, LowNotePolicy, MidiProcessor, PluginConfig,
        // Errors
        ChordError, PluginError, PluginResult,
        // Note helpers
        note_name, MAX_NOTE, NOTE_NAMES, NOTE_SYMBOLS, OCTAVE,
    };
}
