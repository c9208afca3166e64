//! CCSend - sends MIDI when a control is adjusted.
//!
//! Four "Send" controls each drive a configurable controller number. Moving
//! a control queues a control change carrying the new value. Bank select
//! and program controls queue bank (CC 0 / CC 32) and program change
//! messages. Queued messages go out at the start of the next block, ahead
//! of the input, which is forwarded unchanged.
//!
//! ```text
//! control thread: set(Send 2, 64) ──► pending[1] = true
//! process():      pending[1] ──► B0|ch  cc[1]  64 ──► forwarded input
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chordkit::prelude::*;

// =============================================================================
// Plugin Configuration
// =============================================================================

/// Plugin metadata.
pub static CONFIG: PluginConfig = PluginConfig::new("CCSend", 2)
    .with_description("Plugin that sends MIDI CC commands when a control is adjusted")
    .with_version(0, 1, 1);

// =============================================================================
// Parameters
// =============================================================================

/// Number of send controls.
pub const SENDS: usize = 4;

/// Id of the first "CC n" parameter.
pub const FIRST_CC: ParameterId = 4;
/// Id of the output channel parameter.
pub const CHANNEL: ParameterId = 8;
/// Id of the bank select MSB parameter.
pub const BANK_MSB: ParameterId = 9;
/// Id of the bank select LSB parameter.
pub const BANK_LSB: ParameterId = 10;
/// Id of the program parameter.
pub const PROGRAM: ParameterId = 11;

// Pending slots: one per send, then bank MSB, bank LSB, program.
const PENDING_BANK_MSB: usize = SENDS;
const PENDING_BANK_LSB: usize = SENDS + 1;
const PENDING_PROGRAM: usize = SENDS + 2;
const PENDING_SLOTS: usize = SENDS + 3;

/// CCSend parameters and the queue of messages waiting to be sent.
pub struct CcSendParameters {
    sends: [IntParameter; SENDS],
    controllers: [IntParameter; SENDS],
    channel: IntParameter,
    bank_msb: IntParameter,
    bank_lsb: IntParameter,
    program: IntParameter,
    pending: [AtomicBool; PENDING_SLOTS],
}

impl CcSendParameters {
    pub fn new() -> Self {
        Self {
            sends: std::array::from_fn(|i| {
                IntParameter::new(format!("Send {}", i + 1), 0, 0..=127)
                    .with_id(i as ParameterId)
                    .with_group(0)
            }),
            controllers: std::array::from_fn(|i| {
                IntParameter::new(format!("CC {}", i + 1), 101 + i as i64, 0..=127)
                    .with_id(FIRST_CC + i as ParameterId)
                    .with_group(1)
                    .non_automatable()
            }),
            channel: IntParameter::new("Channel", 0, 0..=15).with_id(CHANNEL),
            bank_msb: IntParameter::new("Bank MSB", 0, 0..=127)
                .with_id(BANK_MSB)
                .with_group(2),
            bank_lsb: IntParameter::new("Bank LSB", 0, 0..=127)
                .with_id(BANK_LSB)
                .with_group(2),
            program: IntParameter::new("Program", 0, 0..=127)
                .with_id(PROGRAM)
                .with_group(2),
            pending: std::array::from_fn(|_| AtomicBool::new(false)),
        }
    }

    /// Controller number driven by send `index`.
    pub fn controller(&self, index: usize) -> u8 {
        self.controllers
            .get(index)
            .map_or(0, |p| p.get().clamp(0, 127) as u8)
    }

    /// Output channel (0-15).
    pub fn channel(&self) -> MidiChannel {
        self.channel.get().clamp(0, 15) as MidiChannel
    }

    /// Whether any message is waiting to be sent.
    pub fn has_pending(&self) -> bool {
        self.pending.iter().any(|p| p.load(Ordering::Acquire))
    }

    /// Drop every queued message.
    pub fn clear_pending(&self) {
        for p in &self.pending {
            p.store(false, Ordering::Release);
        }
    }

    /// Append queued messages to `output` at sample offset 0 and clear the
    /// queue. Values are read when the message is built, so several writes
    /// between blocks send only the latest value.
    pub fn drain_pending(&self, output: &mut MidiBuffer) {
        let channel = self.channel();

        for (i, send) in self.sends.iter().enumerate() {
            if self.take(i) {
                output.push(MidiEvent::control_change(
                    0,
                    channel,
                    self.controller(i),
                    data_byte(send),
                ));
            }
        }
        if self.take(PENDING_BANK_MSB) {
            output.push(MidiEvent::control_change(
                0,
                channel,
                cc::BANK_SELECT_MSB,
                data_byte(&self.bank_msb),
            ));
        }
        if self.take(PENDING_BANK_LSB) {
            output.push(MidiEvent::control_change(
                0,
                channel,
                cc::BANK_SELECT_LSB,
                data_byte(&self.bank_lsb),
            ));
        }
        if self.take(PENDING_PROGRAM) {
            output.push(MidiEvent::program_change(0, channel, data_byte(&self.program)));
        }
    }

    fn take(&self, slot: usize) -> bool {
        self.pending[slot].swap(false, Ordering::AcqRel)
    }

    fn pending_slot(id: ParameterId) -> Option<usize> {
        match id {
            0..=3 => Some(id as usize),
            BANK_MSB => Some(PENDING_BANK_MSB),
            BANK_LSB => Some(PENDING_BANK_LSB),
            PROGRAM => Some(PENDING_PROGRAM),
            _ => None,
        }
    }
}

impl Default for CcSendParameters {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CcSendParameters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CcSendParameters")
            .field("sends", &self.sends.each_ref().map(IntParameter::get))
            .field("controllers", &self.controllers.each_ref().map(IntParameter::get))
            .field("channel", &self.channel.get())
            .field("has_pending", &self.has_pending())
            .finish()
    }
}

fn data_byte(parameter: &IntParameter) -> u8 {
    parameter.get().clamp(0, 127) as u8
}

impl ParameterStore for CcSendParameters {
    fn count(&self) -> usize {
        12
    }

    fn parameter(&self, index: usize) -> Option<&dyn ParameterRef> {
        match index {
            0..=3 => Some(&self.sends[index]),
            4..=7 => Some(&self.controllers[index - 4]),
            8 => Some(&self.channel),
            9 => Some(&self.bank_msb),
            10 => Some(&self.bank_lsb),
            11 => Some(&self.program),
            _ => None,
        }
    }

    fn group_count(&self) -> usize {
        3
    }

    fn group(&self, index: usize) -> Option<GroupInfo> {
        let name = match index {
            0 => "Send",
            1 => "CC",
            2 => "Program",
            _ => return None,
        };
        Some(GroupInfo::new(index as GroupId, name))
    }

    /// Sends queue a message when their value changes. Bank and program
    /// queue one on every accepted write.
    fn set(&self, id: ParameterId, value: ParameterValue) -> bool {
        let Some(parameter) = self.by_id(id) else {
            log::debug!("set on unknown parameter {id}");
            return false;
        };
        let previous = parameter.get_plain();
        if !parameter.set_plain(value) {
            return false;
        }
        if let Some(slot) = Self::pending_slot(id) {
            let is_send = slot < SENDS;
            if !is_send || parameter.get_plain() != previous {
                self.pending[slot].store(true, Ordering::Release);
            }
        }
        true
    }
}

// =============================================================================
// Processor
// =============================================================================

/// CCSend processor.
#[derive(Debug)]
pub struct CcSend {
    parameters: Arc<CcSendParameters>,
}

impl CcSend {
    pub fn new() -> Self {
        log::debug!("{} created", CONFIG.name);
        Self {
            parameters: Arc::new(CcSendParameters::new()),
        }
    }
}

impl Default for CcSend {
    fn default() -> Self {
        Self::new()
    }
}

impl MidiProcessor for CcSend {
    type Parameters = CcSendParameters;

    fn config(&self) -> &'static PluginConfig {
        &CONFIG
    }

    fn parameters(&self) -> &Arc<CcSendParameters> {
        &self.parameters
    }

    fn process(&mut self, input: &[MidiEvent], output: &mut MidiBuffer) {
        self.parameters.drain_pending(output);
        pass_through(input, output);
        if output.has_overflowed() {
            log::warn!(
                "MIDI output full ({} events), dropped {}",
                output.capacity(),
                output.dropped()
            );
        }
    }

    fn reset(&mut self, _output: &mut MidiBuffer) {
        self.parameters.clear_pending();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn process(plugin: &mut CcSend, input: &[MidiEvent]) -> Vec<[u8; 3]> {
        let mut output = MidiBuffer::with_capacity(32);
        plugin.process(input, &mut output);
        output.iter().map(|e| e.data).collect()
    }

    #[test]
    fn test_parameter_layout() {
        let plugin = CcSend::new();
        let params = plugin.parameters();
        assert_eq!(params.count(), 12);
        assert_eq!(params.info(0).unwrap().symbol, "send_1");
        assert_eq!(params.info(7).unwrap().symbol, "cc_4");
        assert_eq!(params.get(FIRST_CC), Some(101.0));
        assert_eq!(params.get(FIRST_CC + 3), Some(104.0));
        assert!(!params.info(FIRST_CC as usize).unwrap().flags.can_automate);
        assert_eq!(params.find_by_symbol("bank_msb"), Some(BANK_MSB));
        assert_eq!(params.find_group_by_name("Program"), Some(2));
        assert_eq!(params.group(3), None);
    }

    #[test]
    fn test_send_queues_new_value() {
        let mut plugin = CcSend::new();
        assert!(plugin.set_parameter(1, 64.0));
        let out = process(&mut plugin, &[]);
        assert_eq!(out, vec![[0xB0, 102, 64]]);
        // Queue is empty afterwards.
        assert!(process(&mut plugin, &[]).is_empty());
    }

    #[test]
    fn test_unchanged_or_rejected_writes_queue_nothing() {
        let mut plugin = CcSend::new();
        assert!(plugin.set_parameter(0, 0.0));
        assert!(!plugin.set_parameter(0, 128.0));
        assert!(!plugin.set_parameter(0, f32::NAN));
        assert!(!plugin.set_parameter(12, 1.0));
        assert!(!plugin.parameters().has_pending());
        assert!(process(&mut plugin, &[]).is_empty());
    }

    #[test]
    fn test_latest_value_wins() {
        let mut plugin = CcSend::new();
        assert!(plugin.set_parameter(0, 10.0));
        assert!(plugin.set_parameter(0, 20.5));
        let out = process(&mut plugin, &[]);
        assert_eq!(out, vec![[0xB0, 101, 20]]);
    }

    #[test]
    fn test_controller_and_channel() {
        let mut plugin = CcSend::new();
        assert!(plugin.set_parameter(FIRST_CC + 2, 7.0));
        assert!(plugin.set_parameter(CHANNEL, 9.0));
        // Changing the CC number or channel sends nothing by itself.
        assert!(process(&mut plugin, &[]).is_empty());
        assert!(plugin.set_parameter(2, 100.0));
        let out = process(&mut plugin, &[]);
        assert_eq!(out, vec![[0xB9, 7, 100]]);
    }

    #[test]
    fn test_bank_and_program_order() {
        let mut plugin = CcSend::new();
        assert!(plugin.set_parameter(PROGRAM, 5.0));
        assert!(plugin.set_parameter(BANK_LSB, 2.0));
        assert!(plugin.set_parameter(BANK_MSB, 1.0));
        assert!(plugin.set_parameter(3, 127.0));
        let mut output = MidiBuffer::with_capacity(8);
        plugin.process(&[], &mut output);
        let events: Vec<_> = output.iter().copied().collect();
        assert_eq!(events[0].data, [0xB0, 104, 127]);
        assert_eq!(events[1].data, [0xB0, cc::BANK_SELECT_MSB, 1]);
        assert_eq!(events[2].data, [0xB0, cc::BANK_SELECT_LSB, 2]);
        assert_eq!(events[3].bytes(), &[0xC0, 5]);
        assert!(events.iter().all(|e| e.sample_offset == 0));
    }

    #[test]
    fn test_program_resent_on_same_value() {
        let mut plugin = CcSend::new();
        assert!(plugin.set_parameter(PROGRAM, 0.0));
        let mut output = MidiBuffer::with_capacity(8);
        plugin.process(&[], &mut output);
        assert_eq!(output.len(), 1);
        assert_eq!(output.as_slice()[0].bytes(), &[0xC0, 0]);
    }

    #[test]
    fn test_input_forwarded_after_queue() {
        let mut plugin = CcSend::new();
        let input = [
            MidiEvent::note_on(3, 0, 60, 100),
            MidiEvent::control_change(7, 1, cc::MOD_WHEEL, 9),
            MidiEvent::note_off(12, 0, 60, 0),
        ];
        assert!(plugin.set_parameter(0, 1.0));
        let mut output = MidiBuffer::with_capacity(8);
        plugin.process(&input, &mut output);
        assert_eq!(output.len(), 4);
        assert_eq!(output.as_slice()[0].data, [0xB0, 101, 1]);
        assert_eq!(&output.as_slice()[1..], &input);
    }

    #[test]
    fn test_reset_drops_queue() {
        let mut plugin = CcSend::new();
        assert!(plugin.set_parameter(0, 1.0));
        let mut output = MidiBuffer::with_capacity(8);
        plugin.reset(&mut output);
        assert!(output.is_empty());
        assert!(process(&mut plugin, &[]).is_empty());
    }

    #[test]
    fn test_write_from_control_thread() {
        let mut plugin = CcSend::new();
        let params = Arc::clone(plugin.parameters());
        thread::spawn(move || {
            assert!(params.set(0, 42.0));
        })
        .join()
        .unwrap();
        let out = process(&mut plugin, &[]);
        assert_eq!(out, vec![[0xB0, 101, 42]]);
    }

    #[test]
    fn test_config() {
        let plugin = CcSend::new();
        assert_eq!(plugin.config().name, "CCSend");
        assert_eq!(plugin.config().version_string(), "0.1.1");
        assert_eq!(plugin.preset_count(), 0);
    }
}
