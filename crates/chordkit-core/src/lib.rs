//! # chordkit-core
//!
//! Core abstractions for the chordkit MIDI plugins.
//!
//! Every plugin in the collection consumes a block of timestamped MIDI
//! events and produces another. The chord plugins share one engine that
//! splits the keyboard into zones, expands play notes into chords and
//! remembers what it sent so that note-offs always match.
//!
//! ## Main Traits
//!
//! - [`MidiProcessor`] - Plugin processor driven by a host wrapper
//! - [`Voicing`] - Per-plugin strategy turning a play note into a chord
//! - [`ParameterStore`] - Parameter collection addressed by stable ids
//!
//! ## Types
//!
//! - [`MidiEvent`] / [`MidiBuffer`] - Raw MIDI events and bounded output
//! - [`ChordTable`] - Immutable chord definitions
//! - [`KeyZones`] / [`ModifierState`] - Split point and modifier keys
//! - [`HeldNotes`] - Per-note record of sent notes
//! - [`ChordEngine`] - Zone routing and chord expansion
//! - [`PluginConfig`] / [`EngineConfig`] - Metadata and behaviour switches
//! - [`PluginError`] / [`ChordError`] - Error types

pub mod chord;
pub mod config;
pub mod engine;
pub mod error;
pub mod held;
pub mod midi;
pub mod modifier;
pub mod parameter_format;
pub mod parameter_info;
pub mod parameter_store;
pub mod parameter_types;
pub mod plugin;
pub mod types;
pub mod zone;

// Re-exports for convenience
pub use chord::{ChordDefinition, ChordId, ChordTable, Offsets, BYPASS_CHORD, MAX_CHORD_NOTES};
pub use config::{EngineConfig, LowNotePolicy, PluginConfig};
pub use engine::{pass_through, Chord, ChordEngine, Voice, Voicing};
pub use error::{ChordError, PluginError, PluginResult};
pub use held::{HeldChord, HeldNotes};
pub use midi::{cc, status, MidiBuffer, MidiChannel, MidiEvent, MidiEventKind, MidiNote, MAX_MIDI_EVENTS};
pub use modifier::ModifierState;
pub use parameter_format::Formatter;
pub use parameter_info::{symbol_from_name, GroupId, GroupInfo, ParameterFlags, ParameterInfo, ROOT_GROUP_ID};
pub use parameter_store::ParameterStore;
pub use parameter_types::{BoolParameter, FloatParameter, IntParameter, ParameterRef};
pub use plugin::MidiProcessor;
pub use types::{
    note_name, pitch_class_name, ParameterId, ParameterValue, MAX_NOTE, NOTE_COUNT, NOTE_NAMES,
    NOTE_SYMBOLS, OCTAVE,
};
pub use zone::{KeyZones, ModifierSpan, Zone};
