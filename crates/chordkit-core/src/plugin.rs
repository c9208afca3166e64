//! Plugin trait implemented by every chordkit processor.
//!
//! A host wrapper owns one processor per plugin instance, calls
//! [`process`](MidiProcessor::process) once per block from the processing
//! thread, and forwards parameter writes through
//! [`set_parameter`](MidiProcessor::set_parameter) from any thread.
//!
//! ```text
//! host block ──► process(input, output) ──► output buffer
//! host/UI ─────► set_parameter(id, value) ─► atomic parameter cells
//! ```

use std::sync::Arc;

use crate::config::PluginConfig;
use crate::error::{PluginError, PluginResult};
use crate::midi::{MidiBuffer, MidiEvent};
use crate::parameter_store::ParameterStore;
use crate::types::{ParameterId, ParameterValue};

/// A MIDI-in, MIDI-out processor.
pub trait MidiProcessor: Send {
    /// Parameter collection.
    type Parameters: ParameterStore + 'static;

    /// Static plugin metadata.
    fn config(&self) -> &'static PluginConfig;

    /// Parameters, shared with the control thread.
    fn parameters(&self) -> &Arc<Self::Parameters>;

    /// Process one block. Output events are appended in emission order.
    fn process(&mut self, input: &[MidiEvent], output: &mut MidiBuffer);

    /// Stop everything that is sounding and clear per-note state.
    fn reset(&mut self, _output: &mut MidiBuffer) {}

    /// Current value of parameter `id`.
    fn get_parameter(&self, id: ParameterId) -> Option<ParameterValue> {
        self.parameters().get(id)
    }

    /// Set parameter `id`. Returns `false` if the id is unknown or the value
    /// is outside the declared range.
    fn set_parameter(&self, id: ParameterId, value: ParameterValue) -> bool {
        self.parameters().set(id, value)
    }

    /// Number of built-in presets.
    fn preset_count(&self) -> usize {
        0
    }

    /// Name of preset `index`.
    fn preset_name(&self, _index: usize) -> Option<&'static str> {
        None
    }

    /// Apply preset `index` to the parameters.
    fn load_preset(&mut self, index: usize) -> PluginResult<()> {
        Err(PluginError::UnknownPreset(index))
    }
}
