//! Chord expansion engine.
//!
//! [`ChordEngine`] routes each input event by zone: modifier-zone notes go
//! to the [`Voicing`], play-zone notes are expanded into chords, and
//! everything else is forwarded. Every input event appends its output
//! events to the buffer before the next input event is looked at, so the
//! output keeps input order.
//!
//! ```text
//! input ──► classify ──► Modifier ──► Voicing::modifier (consumed)
//!                   ├──► Play ──────► Voicing::voice ──► note-offs (retrigger), note-ons
//!                   ├──► Below ─────► LowNotePolicy
//!                   └──► not a note ► forwarded
//! ```

use smallvec::SmallVec;

use crate::chord::{ChordId, MAX_CHORD_NOTES};
use crate::config::{EngineConfig, LowNotePolicy};
use crate::held::{HeldChord, HeldNotes};
use crate::midi::{MidiBuffer, MidiEvent, MidiEventKind, MidiNote};
use crate::zone::{KeyZones, Zone};

/// One synthesized note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Voice {
    pub note: MidiNote,
    pub velocity: u8,
}

impl Voice {
    pub const fn new(note: MidiNote, velocity: u8) -> Self {
        Self { note, velocity }
    }
}

/// Notes to play for one play-zone note-on, in emission order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Chord {
    /// Table id the voices came from, if the voicing uses a table.
    pub id: Option<ChordId>,
    /// Voices. Already limited to valid note numbers.
    pub voices: SmallVec<[Voice; MAX_CHORD_NOTES]>,
}

impl Chord {
    /// Chord from table `id`.
    pub fn from_table(id: ChordId) -> Self {
        Self {
            id: Some(id),
            voices: SmallVec::new(),
        }
    }

    /// Chord without a table id.
    pub fn untabled() -> Self {
        Self::default()
    }

    /// Append a voice.
    #[inline]
    pub fn push(&mut self, note: MidiNote, velocity: u8) {
        self.voices.push(Voice::new(note, velocity));
    }

    /// Output note numbers.
    pub fn notes(&self) -> SmallVec<[MidiNote; MAX_CHORD_NOTES]> {
        self.voices.iter().map(|v| v.note).collect()
    }
}

/// Strategy that turns play notes into chords.
///
/// Implementations read their parameters on every call, so changes take
/// effect from the next event.
pub trait Voicing: Send {
    /// Current key layout.
    fn zones(&self) -> KeyZones;

    /// Note on or off in the modifier zone. `key` counts up from the bottom
    /// of the zone (0-11).
    fn modifier(&mut self, note: MidiNote, key: u8, pressed: bool);

    /// Chord for a play-zone note-on, or `None` to suppress it.
    fn voice(&self, note: MidiNote, velocity: u8) -> Option<Chord>;

    /// Forget modifier state.
    fn reset(&mut self) {}
}

/// Per-instance chord expansion engine.
#[derive(Debug)]
pub struct ChordEngine<V: Voicing> {
    voicing: V,
    held: HeldNotes,
    config: EngineConfig,
}

impl<V: Voicing> ChordEngine<V> {
    /// Create an engine with nothing held.
    pub fn new(voicing: V, config: EngineConfig) -> Self {
        Self {
            voicing,
            held: HeldNotes::new(),
            config,
        }
    }

    /// The voicing strategy.
    pub fn voicing(&self) -> &V {
        &self.voicing
    }

    /// Mutable access to the voicing strategy.
    pub fn voicing_mut(&mut self) -> &mut V {
        &mut self.voicing
    }

    /// Held-note record.
    pub fn held(&self) -> &HeldNotes {
        &self.held
    }

    /// Engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Process one block of events in arrival order.
    pub fn process(&mut self, input: &[MidiEvent], output: &mut MidiBuffer) {
        for event in input {
            self.process_event(event, output);
        }
        if output.has_overflowed() {
            log::warn!(
                "MIDI output full ({} events), dropped {}",
                output.capacity(),
                output.dropped()
            );
        }
    }

    /// Route a single event.
    pub fn process_event(&mut self, event: &MidiEvent, output: &mut MidiBuffer) {
        let (note, velocity, pressed) = match event.kind() {
            MidiEventKind::NoteOn { note, velocity, .. } => (note, velocity, true),
            MidiEventKind::NoteOff { note, velocity, .. } => (note, velocity, false),
            _ => return self.on_other_event(event, output),
        };

        match self.voicing.zones().classify(note) {
            Zone::Play if pressed => self.on_note_on(event, note, velocity, output),
            Zone::Play => self.on_note_off(event, note, output),
            Zone::Modifier(key) => self.voicing.modifier(note, key, pressed),
            Zone::Below => match self.config.low_notes {
                LowNotePolicy::PassThrough => self.on_other_event(event, output),
                LowNotePolicy::Ignore => {}
            },
        }
    }

    /// Play-zone note-on.
    ///
    /// A note that is still held is released before the new chord starts.
    /// Suppressed notes leave the held record untouched.
    pub fn on_note_on(
        &mut self,
        event: &MidiEvent,
        note: MidiNote,
        velocity: u8,
        output: &mut MidiBuffer,
    ) {
        let Some(chord) = self.voicing.voice(note, velocity) else {
            return;
        };

        if let Some(previous) = self.held.release(note) {
            emit_release(event, &previous, output);
        }

        for voice in &chord.voices {
            output.push(event.with_note(voice.note, voice.velocity));
        }

        self.held
            .hold(note, HeldChord::new(chord.id, event.channel(), &chord.notes()));
    }

    /// Play-zone note-off. Without a held record nothing is sent.
    pub fn on_note_off(&mut self, event: &MidiEvent, note: MidiNote, output: &mut MidiBuffer) {
        if let Some(previous) = self.held.release(note) {
            emit_release(event, &previous, output);
        }
    }

    /// Any event the engine does not transform.
    #[inline]
    pub fn on_other_event(&mut self, event: &MidiEvent, output: &mut MidiBuffer) {
        output.push(*event);
    }

    /// Send note-offs for every held chord at `sample_offset` and clear the
    /// record. Each chord is released on the channel it was played on.
    pub fn release_all(&mut self, sample_offset: u32, output: &mut MidiBuffer) {
        let held = self.held.len();
        self.held.drain(|_, previous| {
            for &note in previous.notes() {
                output.push(MidiEvent::note_off(sample_offset, previous.channel(), note, 0));
            }
        });
        if held > 0 {
            log::debug!("released {held} held chords");
        }
    }

    /// Clear the held record and the voicing's modifier state without
    /// sending anything.
    pub fn reset(&mut self) {
        self.held = HeldNotes::new();
        self.voicing.reset();
    }
}

// Offs go out on the channel the chord was played on, at the time of the
// triggering event.
fn emit_release(event: &MidiEvent, previous: &HeldChord, output: &mut MidiBuffer) {
    for &note in previous.notes() {
        output.push(MidiEvent::note_off(
            event.sample_offset,
            previous.channel(),
            note,
            0,
        ));
    }
}

/// Forward a block unchanged.
pub fn pass_through(input: &[MidiEvent], output: &mut MidiBuffer) {
    for event in input {
        output.push(*event);
    }
}
