//! Modifier-key tracking and active chord resolution.
//!
//! Held flags are stored per absolute note number. Resolution scans the
//! modifier zone of the layout passed in, lowest note first, so a split
//! point change is picked up on the next event without reconciling keys that
//! were pressed under the old layout.

use crate::chord::{ChordId, BYPASS_CHORD};
use crate::midi::MidiNote;
use crate::types::NOTE_COUNT;
use crate::zone::{KeyZones, Zone};

/// Per-instance modifier state.
#[derive(Debug, Clone)]
pub struct ModifierState {
    held: [bool; NOTE_COUNT],
    active: ChordId,
}

impl ModifierState {
    /// No key held, bypass active.
    pub fn new() -> Self {
        Self {
            held: [false; NOTE_COUNT],
            active: BYPASS_CHORD,
        }
    }

    /// Currently active chord.
    #[inline]
    pub fn active(&self) -> ChordId {
        self.active
    }

    /// Returns true if `note` is held as a modifier.
    #[inline]
    pub fn is_held(&self, note: MidiNote) -> bool {
        self.held.get(note as usize).copied().unwrap_or(false)
    }

    /// Modifier key pressed. `assigned` maps a zone key (0-11) to its chord.
    pub fn press(
        &mut self,
        note: MidiNote,
        zones: &KeyZones,
        assigned: impl Fn(u8) -> ChordId,
    ) -> ChordId {
        if let Some(flag) = self.held.get_mut(note as usize) {
            *flag = true;
        }
        self.active = self.resolve(zones, assigned);
        self.active
    }

    /// Modifier key released. With `latch` the active chord is kept.
    pub fn release(
        &mut self,
        note: MidiNote,
        zones: &KeyZones,
        assigned: impl Fn(u8) -> ChordId,
        latch: bool,
    ) -> ChordId {
        if let Some(flag) = self.held.get_mut(note as usize) {
            *flag = false;
        }
        if !latch {
            self.active = self.resolve(zones, assigned);
        }
        self.active
    }

    /// Chord of the lowest held key in the modifier zone, or bypass.
    pub fn resolve(&self, zones: &KeyZones, assigned: impl Fn(u8) -> ChordId) -> ChordId {
        zones
            .modifier_notes()
            .filter(|&note| self.held[note as usize])
            .find_map(|note| match zones.classify(note) {
                Zone::Modifier(key) => Some(assigned(key)),
                _ => None,
            })
            .unwrap_or(BYPASS_CHORD)
    }

    /// Release every key and fall back to bypass.
    pub fn reset(&mut self) {
        self.held = [false; NOTE_COUNT];
        self.active = BYPASS_CHORD;
    }
}

impl Default for ModifierState {
    fn default() -> Self {
        Self::new()
    }
}
