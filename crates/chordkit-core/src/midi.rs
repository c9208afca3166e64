//! MIDI event types and the bounded output buffer.
//!
//! Events are carried as raw MIDI 1.0 channel-voice bytes together with a
//! sample-accurate offset within the current block. [`MidiEvent::kind`]
//! decodes the bytes into a typed view for matching, while synthesized
//! events are built from an input event so that timing and channel travel
//! with them.

use std::fmt;

/// MIDI channel (0-15).
pub type MidiChannel = u8;

/// MIDI note number (0-127).
pub type MidiNote = u8;

// =============================================================================
// Status bytes
// =============================================================================

/// Channel-voice status nibbles (high four bits of the status byte).
pub mod status {
    /// Note Off (0x8n).
    pub const NOTE_OFF: u8 = 0x80;
    /// Note On (0x9n). Velocity 0 is treated as Note Off.
    pub const NOTE_ON: u8 = 0x90;
    /// Polyphonic Key Pressure (0xAn).
    pub const POLY_PRESSURE: u8 = 0xA0;
    /// Control Change (0xBn).
    pub const CONTROL_CHANGE: u8 = 0xB0;
    /// Program Change (0xCn).
    pub const PROGRAM_CHANGE: u8 = 0xC0;
    /// Channel Pressure (0xDn).
    pub const CHANNEL_PRESSURE: u8 = 0xD0;
    /// Pitch Bend (0xEn).
    pub const PITCH_BEND: u8 = 0xE0;
    /// Mask selecting the message type.
    pub const TYPE_MASK: u8 = 0xF0;
    /// Mask selecting the channel.
    pub const CHANNEL_MASK: u8 = 0x0F;
}

/// Common MIDI CC numbers.
pub mod cc {
    /// Bank Select MSB (CC0).
    pub const BANK_SELECT_MSB: u8 = 0;
    /// Modulation Wheel (CC1).
    pub const MOD_WHEEL: u8 = 1;
    /// Bank Select LSB (CC32).
    pub const BANK_SELECT_LSB: u8 = 32;
}

// =============================================================================
// MidiEvent
// =============================================================================

/// Decoded view of a [`MidiEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiEventKind {
    /// Note On with non-zero velocity.
    NoteOn {
        channel: MidiChannel,
        note: MidiNote,
        velocity: u8,
    },
    /// Note Off, or Note On with zero velocity.
    NoteOff {
        channel: MidiChannel,
        note: MidiNote,
        velocity: u8,
    },
    /// Control Change.
    ControlChange {
        channel: MidiChannel,
        controller: u8,
        value: u8,
    },
    /// Program Change.
    ProgramChange { channel: MidiChannel, program: u8 },
    /// Anything else, including truncated channel messages.
    Other,
}

/// A raw MIDI event with sample-accurate timing.
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct MidiEvent {
    /// Sample offset within the current processing block.
    pub sample_offset: u32,
    /// Number of valid bytes in `data` (1-3).
    pub size: u8,
    /// Status byte followed by up to two data bytes.
    pub data: [u8; 3],
}

impl MidiEvent {
    /// Create a three-byte event.
    pub const fn new(sample_offset: u32, data: [u8; 3]) -> Self {
        Self {
            sample_offset,
            size: 3,
            data,
        }
    }

    /// Create an event from up to three raw bytes.
    ///
    /// Returns `None` for an empty slice or one longer than three bytes.
    pub fn from_bytes(sample_offset: u32, bytes: &[u8]) -> Option<Self> {
        if bytes.is_empty() || bytes.len() > 3 {
            return None;
        }
        let mut data = [0u8; 3];
        data[..bytes.len()].copy_from_slice(bytes);
        Some(Self {
            sample_offset,
            size: bytes.len() as u8,
            data,
        })
    }

    /// Note On event.
    pub const fn note_on(sample_offset: u32, channel: MidiChannel, note: MidiNote, velocity: u8) -> Self {
        Self::new(
            sample_offset,
            [status::NOTE_ON | (channel & status::CHANNEL_MASK), note & 0x7F, velocity & 0x7F],
        )
    }

    /// Note Off event.
    pub const fn note_off(sample_offset: u32, channel: MidiChannel, note: MidiNote, velocity: u8) -> Self {
        Self::new(
            sample_offset,
            [status::NOTE_OFF | (channel & status::CHANNEL_MASK), note & 0x7F, velocity & 0x7F],
        )
    }

    /// Control Change event.
    pub const fn control_change(sample_offset: u32, channel: MidiChannel, controller: u8, value: u8) -> Self {
        Self::new(
            sample_offset,
            [status::CONTROL_CHANGE | (channel & status::CHANNEL_MASK), controller & 0x7F, value & 0x7F],
        )
    }

    /// Program Change event (two bytes).
    pub const fn program_change(sample_offset: u32, channel: MidiChannel, program: u8) -> Self {
        Self {
            sample_offset,
            size: 2,
            data: [status::PROGRAM_CHANGE | (channel & status::CHANNEL_MASK), program & 0x7F, 0],
        }
    }

    /// The valid bytes of this event.
    #[inline]
    pub fn bytes(&self) -> &[u8] {
        &self.data[..(self.size as usize).min(3)]
    }

    /// Status byte.
    #[inline]
    pub const fn status(&self) -> u8 {
        self.data[0]
    }

    /// Channel from the low nibble of the status byte.
    #[inline]
    pub const fn channel(&self) -> MidiChannel {
        self.data[0] & status::CHANNEL_MASK
    }

    /// Decode into a typed view.
    ///
    /// Channel messages whose data bytes have the high bit set are malformed
    /// and decode as [`MidiEventKind::Other`].
    pub fn kind(&self) -> MidiEventKind {
        let channel = self.channel();
        if self.bytes().iter().skip(1).any(|&b| b > 0x7F) {
            return MidiEventKind::Other;
        }
        match self.status() & status::TYPE_MASK {
            status::NOTE_ON if self.size > 2 && self.data[2] > 0 => MidiEventKind::NoteOn {
                channel,
                note: self.data[1],
                velocity: self.data[2],
            },
            status::NOTE_ON | status::NOTE_OFF if self.size > 2 => MidiEventKind::NoteOff {
                channel,
                note: self.data[1],
                velocity: self.data[2],
            },
            status::CONTROL_CHANGE if self.size > 2 => MidiEventKind::ControlChange {
                channel,
                controller: self.data[1],
                value: self.data[2],
            },
            status::PROGRAM_CHANGE if self.size > 1 => MidiEventKind::ProgramChange {
                channel,
                program: self.data[1],
            },
            _ => MidiEventKind::Other,
        }
    }

    /// Returns true for Note On and Note Off (including zero-velocity Note On).
    #[inline]
    pub fn is_note(&self) -> bool {
        matches!(
            self.kind(),
            MidiEventKind::NoteOn { .. } | MidiEventKind::NoteOff { .. }
        )
    }

    /// Copy of this event with a different note and velocity.
    ///
    /// Status byte and sample offset are kept, so a synthesized note-on
    /// shares the timing and channel of the event that triggered it.
    #[inline]
    pub const fn with_note(self, note: MidiNote, velocity: u8) -> Self {
        Self {
            sample_offset: self.sample_offset,
            size: 3,
            data: [self.data[0], note & 0x7F, velocity & 0x7F],
        }
    }
}

impl fmt::Debug for MidiEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MidiEvent(@{} [", self.sample_offset)?;
        for (i, byte) in self.bytes().iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{byte:02X}")?;
        }
        write!(f, "])")
    }
}

// =============================================================================
// MidiBuffer
// =============================================================================

/// Default output capacity for a processing block.
pub const MAX_MIDI_EVENTS: usize = 1024;

/// A bounded buffer for collecting MIDI events during processing.
///
/// Storage is allocated once up front and never grows. Pushing into a full
/// buffer drops the event, sets the overflow flag and counts the drop.
/// Events keep insertion order, which is the emission order of a block.
pub struct MidiBuffer {
    events: Vec<MidiEvent>,
    capacity: usize,
    overflowed: bool,
    dropped: usize,
}

impl MidiBuffer {
    /// Create a buffer holding up to [`MAX_MIDI_EVENTS`] events.
    pub fn new() -> Self {
        Self::with_capacity(MAX_MIDI_EVENTS)
    }

    /// Create a buffer holding up to `capacity` events.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: Vec::with_capacity(capacity),
            capacity,
            overflowed: false,
            dropped: 0,
        }
    }

    /// Clear all events and the overflow state.
    #[inline]
    pub fn clear(&mut self) {
        self.events.clear();
        self.overflowed = false;
        self.dropped = 0;
    }

    /// Number of events in the buffer.
    #[inline]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns true if the buffer is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Maximum number of events.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Free slots left.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.capacity - self.events.len()
    }

    /// Returns true if any push failed since the last clear.
    #[inline]
    pub fn has_overflowed(&self) -> bool {
        self.overflowed
    }

    /// Number of events dropped since the last clear.
    #[inline]
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Push an event to the buffer.
    ///
    /// Returns `true` if the event was added, `false` if the buffer is full.
    #[inline]
    pub fn push(&mut self, event: MidiEvent) -> bool {
        if self.events.len() < self.capacity {
            self.events.push(event);
            true
        } else {
            self.overflowed = true;
            self.dropped += 1;
            false
        }
    }

    /// Iterate over events in the buffer.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &MidiEvent> {
        self.events.iter()
    }

    /// Get the events as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[MidiEvent] {
        &self.events
    }
}

impl Default for MidiBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MidiBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MidiBuffer")
            .field("len", &self.events.len())
            .field("capacity", &self.capacity)
            .field("overflowed", &self.overflowed)
            .field("dropped", &self.dropped)
            .finish()
    }
}
