//! Keyboard split into modifier and play zones.

use std::ops::Range;

use crate::midi::MidiNote;
use crate::types::OCTAVE;

/// How far the modifier zone extends below the split point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModifierSpan {
    /// The twelve notes directly below the split point.
    Octave,
    /// Every note below the split point. Keys repeat per octave.
    Unbounded,
}

/// Where a note falls relative to the split point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    /// Below a bounded modifier zone.
    Below,
    /// Modifier key, `0..12` counted upwards from the bottom of the zone.
    Modifier(u8),
    /// At or above the split point.
    Play,
}

/// Key layout read by the engine for each note event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyZones {
    split_point: MidiNote,
    span: Option<ModifierSpan>,
}

impl KeyZones {
    /// One-octave modifier zone directly below `split_point`.
    pub const fn split(split_point: MidiNote) -> Self {
        Self {
            split_point,
            span: Some(ModifierSpan::Octave),
        }
    }

    /// Modifier zone covering every note below `split_point`.
    pub const fn unbounded(split_point: MidiNote) -> Self {
        Self {
            split_point,
            span: Some(ModifierSpan::Unbounded),
        }
    }

    /// Every note is a play note.
    pub const fn play_only() -> Self {
        Self {
            split_point: 0,
            span: None,
        }
    }

    /// First note of the play zone.
    #[inline]
    pub const fn split_point(&self) -> MidiNote {
        self.split_point
    }

    /// Modifier span, `None` for play-only layouts.
    #[inline]
    pub const fn span(&self) -> Option<ModifierSpan> {
        self.span
    }

    /// Classify a note.
    pub fn classify(&self, note: MidiNote) -> Zone {
        let Some(span) = self.span else {
            return Zone::Play;
        };
        if note >= self.split_point {
            return Zone::Play;
        }
        let below = self.split_point - note;
        match span {
            ModifierSpan::Octave if below > OCTAVE => Zone::Below,
            ModifierSpan::Octave => Zone::Modifier(OCTAVE - below),
            ModifierSpan::Unbounded => Zone::Modifier((OCTAVE - below % OCTAVE) % OCTAVE),
        }
    }

    /// Note numbers of the modifier zone, in ascending order.
    pub fn modifier_notes(&self) -> Range<MidiNote> {
        match self.span {
            None => 0..0,
            Some(ModifierSpan::Octave) => self.split_point.saturating_sub(OCTAVE)..self.split_point,
            Some(ModifierSpan::Unbounded) => 0..self.split_point,
        }
    }

    /// Returns true if `note` is inside the play zone.
    #[inline]
    pub fn is_play(&self, note: MidiNote) -> bool {
        self.classify(note) == Zone::Play
    }
}

impl Default for KeyZones {
    /// One-octave modifier zone below middle C.
    fn default() -> Self {
        Self::split(60)
    }
}
