//! Per-note record of what was actually sent.
//!
//! Each play note that produced note-ons remembers the exact output notes,
//! so its note-off releases them byte-for-byte even if the chord table,
//! the active chord or a parameter changed in between.

use smallvec::SmallVec;

use crate::chord::{ChordId, MAX_CHORD_NOTES};
use crate::midi::{MidiChannel, MidiNote};
use crate::types::NOTE_COUNT;

/// Output notes sounding for one input note.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeldChord {
    chord: Option<ChordId>,
    channel: MidiChannel,
    notes: SmallVec<[MidiNote; MAX_CHORD_NOTES]>,
}

impl HeldChord {
    /// Record for `notes` sent on `channel`, produced by `chord` when the
    /// voicing has a chord id.
    pub fn new(chord: Option<ChordId>, channel: MidiChannel, notes: &[MidiNote]) -> Self {
        Self {
            chord,
            channel,
            notes: SmallVec::from_slice(notes),
        }
    }

    /// Chord id that produced the notes, if any.
    #[inline]
    pub fn chord(&self) -> Option<ChordId> {
        self.chord
    }

    /// Channel the note-ons went out on.
    #[inline]
    pub fn channel(&self) -> MidiChannel {
        self.channel
    }

    /// Notes in the order their note-ons were emitted.
    #[inline]
    pub fn notes(&self) -> &[MidiNote] {
        &self.notes
    }
}

/// Held-note record for all 128 note numbers.
#[derive(Debug, Clone)]
pub struct HeldNotes {
    records: [Option<HeldChord>; NOTE_COUNT],
    count: usize,
}

impl HeldNotes {
    /// Nothing held.
    pub fn new() -> Self {
        Self {
            records: std::array::from_fn(|_| None),
            count: 0,
        }
    }

    /// Returns true if `note` has a record.
    #[inline]
    pub fn is_held(&self, note: MidiNote) -> bool {
        self.get(note).is_some()
    }

    /// Record for `note`.
    #[inline]
    pub fn get(&self, note: MidiNote) -> Option<&HeldChord> {
        self.records.get(note as usize).and_then(Option::as_ref)
    }

    /// Store a record, returning the one it replaces.
    pub fn hold(&mut self, note: MidiNote, chord: HeldChord) -> Option<HeldChord> {
        let slot = self.records.get_mut(note as usize)?;
        let previous = slot.replace(chord);
        if previous.is_none() {
            self.count += 1;
        }
        previous
    }

    /// Take the record for `note`, leaving it unheld.
    pub fn release(&mut self, note: MidiNote) -> Option<HeldChord> {
        let taken = self.records.get_mut(note as usize)?.take();
        if taken.is_some() {
            self.count -= 1;
        }
        taken
    }

    /// Number of held input notes.
    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    /// Returns true if no note is held.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Iterate over held notes in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = (MidiNote, &HeldChord)> {
        self.records
            .iter()
            .enumerate()
            .filter_map(|(note, record)| record.as_ref().map(|r| (note as MidiNote, r)))
    }

    /// Take every record in ascending note order.
    pub fn drain(&mut self, mut f: impl FnMut(MidiNote, HeldChord)) {
        if self.count == 0 {
            return;
        }
        for (note, slot) in self.records.iter_mut().enumerate() {
            if let Some(record) = slot.take() {
                f(note as MidiNote, record);
            }
        }
        self.count = 0;
    }
}

impl Default for HeldNotes {
    fn default() -> Self {
        Self::new()
    }
}
