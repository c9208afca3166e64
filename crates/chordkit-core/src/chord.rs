//! Chord definitions and chord tables.
//!
//! A chord is an ordered list of semitone offsets applied to a root note.
//! Tables are built once when a processor is constructed and are read-only
//! afterwards. Lookups never index out of bounds: an unknown id yields no
//! chord and no offsets.

use std::borrow::Cow;

use smallvec::SmallVec;

use crate::error::ChordError;
use crate::midi::MidiNote;
use crate::types::MAX_NOTE;

/// Chord identifier, an index into a [`ChordTable`].
pub type ChordId = u8;

/// Conventional "no chord" identifier.
pub const BYPASS_CHORD: ChordId = 0;

/// Maximum number of notes in one chord.
pub const MAX_CHORD_NOTES: usize = 8;

/// Maximum number of chords in a table.
pub const MAX_CHORDS: usize = ChordId::MAX as usize + 1;

/// Semitone offsets of a chord, stored inline.
pub type Offsets = SmallVec<[u8; MAX_CHORD_NOTES]>;

/// A named chord.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChordDefinition {
    name: Cow<'static, str>,
    offsets: Offsets,
}

impl ChordDefinition {
    /// Create a chord definition.
    ///
    /// Fails if more than [`MAX_CHORD_NOTES`] offsets are given. An empty
    /// offset list is allowed and plays nothing.
    pub fn new(name: impl Into<Cow<'static, str>>, offsets: &[u8]) -> Result<Self, ChordError> {
        let name = name.into();
        if offsets.len() > MAX_CHORD_NOTES {
            return Err(ChordError::TooManyOffsets {
                name: name.into_owned(),
                count: offsets.len(),
                max: MAX_CHORD_NOTES,
            });
        }
        Ok(Self {
            name,
            offsets: Offsets::from_slice(offsets),
        })
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Offsets in emission order.
    pub fn offsets(&self) -> &[u8] {
        &self.offsets
    }

    /// Number of offsets.
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    /// Returns true if the chord plays nothing.
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Notes of this chord built on `root`, skipping any above 127.
    pub fn notes_from(&self, root: MidiNote) -> impl Iterator<Item = MidiNote> + '_ {
        self.offsets.iter().filter_map(move |&offset| {
            let note = u16::from(root) + u16::from(offset);
            (note <= u16::from(MAX_NOTE)).then_some(note as MidiNote)
        })
    }
}

/// Immutable, indexed collection of chords.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChordTable {
    chords: Vec<ChordDefinition>,
}

impl ChordTable {
    /// Build a table from chord definitions. Ids follow the given order.
    pub fn new(chords: Vec<ChordDefinition>) -> Result<Self, ChordError> {
        if chords.is_empty() {
            return Err(ChordError::EmptyTable);
        }
        if chords.len() > MAX_CHORDS {
            return Err(ChordError::TableTooLarge {
                count: chords.len(),
                max: MAX_CHORDS,
            });
        }
        Ok(Self { chords })
    }

    /// Build a table from static `(name, offsets)` pairs.
    pub fn from_static(entries: &[(&'static str, &[u8])]) -> Result<Self, ChordError> {
        let chords = entries
            .iter()
            .map(|&(name, offsets)| ChordDefinition::new(name, offsets))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(chords)
    }

    /// Chord for `id`, or `None` when out of range.
    #[inline]
    pub fn get(&self, id: ChordId) -> Option<&ChordDefinition> {
        self.chords.get(id as usize)
    }

    /// Offsets for `id`. Unknown ids have no offsets.
    #[inline]
    pub fn offsets(&self, id: ChordId) -> &[u8] {
        match self.get(id) {
            Some(chord) => chord.offsets(),
            None => &[],
        }
    }

    /// Returns true if `id` addresses a chord in this table.
    #[inline]
    pub fn contains(&self, id: ChordId) -> bool {
        (id as usize) < self.chords.len()
    }

    /// Number of chords.
    pub fn len(&self) -> usize {
        self.chords.len()
    }

    /// Always false for a constructed table.
    pub fn is_empty(&self) -> bool {
        self.chords.is_empty()
    }

    /// Iterate over `(id, chord)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (ChordId, &ChordDefinition)> {
        self.chords
            .iter()
            .enumerate()
            .map(|(id, chord)| (id as ChordId, chord))
    }

    /// Chord names in id order, used for parameter labels.
    pub fn names(&self) -> Vec<String> {
        self.chords.iter().map(|c| c.name().to_owned()).collect()
    }
}
