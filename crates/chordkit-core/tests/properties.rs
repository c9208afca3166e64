//! Property-based tests for the chord engine and parameter surface.
//!
//! Checks note-on/off balance, modifier resolution against a simple model,
//! pass-through ordering, parameter range rejection and retrigger order
//! using proptest for randomized event streams.

use std::collections::BTreeSet;

use chordkit_core::{
    BoolParameter, Chord, ChordEngine, ChordId, EngineConfig, FloatParameter, IntParameter,
    KeyZones, MidiBuffer, MidiEvent, MidiEventKind, MidiNote, ModifierState, ParameterRef,
    Voicing, BYPASS_CHORD, NOTE_COUNT,
};
use proptest::prelude::*;

/// Major triad on every play note, split at middle C.
struct Triad;

impl Voicing for Triad {
    fn zones(&self) -> KeyZones {
        KeyZones::split(60)
    }

    fn modifier(&mut self, _note: MidiNote, _key: u8, _pressed: bool) {}

    fn voice(&self, note: MidiNote, velocity: u8) -> Option<Chord> {
        let mut chord = Chord::untabled();
        for offset in [0u8, 4, 7] {
            if let Some(out) = note.checked_add(offset).filter(|&n| n <= 127) {
                chord.push(out, velocity);
            }
        }
        Some(chord)
    }
}

fn assigned(key: u8) -> ChordId {
    key + 1
}

/// Note event in the play zone: (note, velocity, channel). Velocity 0 is a
/// note-off.
fn play_event() -> impl Strategy<Value = MidiEvent> {
    (60u8..128, 0u8..128, 0u8..16, any::<bool>(), 0u32..256).prop_map(
        |(note, velocity, channel, on, offset)| {
            if on {
                MidiEvent::note_on(offset, channel, note, velocity)
            } else {
                MidiEvent::note_off(offset, channel, note, velocity)
            }
        },
    )
}

/// Event the engine never transforms.
fn other_event() -> impl Strategy<Value = MidiEvent> {
    (0u8..16, 0u8..128, 0u8..128, 0u32..256, 0usize..3).prop_map(
        |(channel, a, b, offset, kind)| match kind {
            0 => MidiEvent::control_change(offset, channel, a, b),
            1 => MidiEvent::program_change(offset, channel, a),
            _ => MidiEvent::new(offset, [0xE0 | channel, a, b]),
        },
    )
}

/// Note-ons minus note-offs per channel and note.
fn balance(output: &MidiBuffer) -> [[i32; NOTE_COUNT]; 16] {
    let mut counts = [[0i32; NOTE_COUNT]; 16];
    for event in output.iter() {
        match event.kind() {
            MidiEventKind::NoteOn { channel, note, .. } => {
                counts[channel as usize][note as usize] += 1
            }
            MidiEventKind::NoteOff { channel, note, .. } => {
                counts[channel as usize][note as usize] -= 1
            }
            _ => {}
        }
    }
    counts
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    /// Every note-on the engine sends is matched by exactly one note-off on
    /// the same channel once the held chords are released, even when
    /// note-offs arrive on a different channel than their note-on.
    #[test]
    fn note_on_off_symmetry(events in prop::collection::vec(play_event(), 0..64)) {
        let mut engine = ChordEngine::new(Triad, EngineConfig::default());
        let mut output = MidiBuffer::with_capacity(1024);
        engine.process(&events, &mut output);
        engine.release_all(0, &mut output);

        prop_assert!(!output.has_overflowed());
        prop_assert!(engine.held().is_empty());
        let counts = balance(&output);
        for (channel, notes) in counts.iter().enumerate() {
            for (note, count) in notes.iter().enumerate() {
                prop_assert_eq!(*count, 0, "channel {} note {} unbalanced", channel, note);
            }
        }
    }

    /// The active chord is the assignment of the lowest held modifier key.
    #[test]
    fn modifier_resolution_matches_model(
        presses in prop::collection::vec((0u8..12, any::<bool>()), 0..48),
        latch in any::<bool>(),
    ) {
        let zones = KeyZones::split(60);
        let mut state = ModifierState::new();
        let mut held = BTreeSet::new();
        let mut expected = BYPASS_CHORD;

        for (key, pressed) in presses {
            let note = 48 + key;
            if pressed {
                state.press(note, &zones, assigned);
                held.insert(key);
                expected = held.first().map_or(BYPASS_CHORD, |&k| assigned(k));
            } else {
                state.release(note, &zones, assigned, latch);
                held.remove(&key);
                if !latch {
                    expected = held.first().map_or(BYPASS_CHORD, |&k| assigned(k));
                }
            }
            prop_assert_eq!(state.active(), expected);
            prop_assert_eq!(state.is_held(note), pressed);
        }
    }

    /// Events that are not play-zone notes come out unchanged and in order.
    #[test]
    fn pass_through_keeps_order(events in prop::collection::vec(other_event(), 0..64)) {
        let mut engine = ChordEngine::new(Triad, EngineConfig::default());
        let mut output = MidiBuffer::with_capacity(64);
        engine.process(&events, &mut output);
        prop_assert_eq!(output.as_slice(), events.as_slice());

        let mut forwarded = MidiBuffer::with_capacity(64);
        chordkit_core::pass_through(&events, &mut forwarded);
        prop_assert_eq!(forwarded.as_slice(), events.as_slice());
    }

    /// Values outside the declared range and NaN are rejected and leave the
    /// parameter unchanged. Nothing is clamped.
    #[test]
    fn out_of_range_rejected(value in prop_oneof![any::<f32>(), -200.0f32..200.0f32]) {
        let split = IntParameter::new("Split Point", 60, 12..=115);
        let accepted = split.set_plain(value);
        prop_assert_eq!(accepted, (12.0..=115.0).contains(&value));
        if accepted {
            prop_assert_eq!(split.get(), value.trunc() as i64);
        } else {
            prop_assert_eq!(split.get(), 60);
        }

        let factor = FloatParameter::multiplier("Velocity", 1.0, 0.5..=2.0);
        let accepted = factor.set_plain(value);
        prop_assert_eq!(accepted, (0.5..=2.0).contains(&value));
        prop_assert_eq!(factor.get(), if accepted { value } else { 1.0 });

        let latch = BoolParameter::new("Latch", false);
        prop_assert_eq!(latch.set_plain(value), (0.0..=1.0).contains(&value));
    }

    /// A second note-on for a held note releases the previous chord before
    /// the new one starts.
    #[test]
    fn retrigger_releases_first(
        note in 60u8..128,
        first in 1u8..128,
        second in 1u8..128,
        channel in 0u8..16,
    ) {
        let mut engine = ChordEngine::new(Triad, EngineConfig::default());
        let mut output = MidiBuffer::with_capacity(32);
        engine.process(&[MidiEvent::note_on(0, channel, note, first)], &mut output);
        let sent: Vec<MidiNote> = output
            .iter()
            .map(|e| e.data[1])
            .collect();

        output.clear();
        engine.process(&[MidiEvent::note_on(5, channel, note, second)], &mut output);
        let events = output.as_slice();
        prop_assert_eq!(events.len(), 2 * sent.len());

        let (offs, ons) = events.split_at(sent.len());
        for (event, &expected) in offs.iter().zip(&sent) {
            prop_assert_eq!(event.data, [0x80 | channel, expected, 0]);
        }
        for (event, &expected) in ons.iter().zip(&sent) {
            prop_assert_eq!(event.data, [0x90 | channel, expected, second]);
            prop_assert_eq!(event.sample_offset, 5);
        }
        prop_assert_eq!(engine.held().get(note).map(|h| h.notes().len()), Some(sent.len()));
    }
}
