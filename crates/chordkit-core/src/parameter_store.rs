//! Parameter collection trait.
//!
//! Parameters are addressed by a stable integer id that equals their index
//! in the collection. A plugin's parameter struct only has to list its
//! cells; lookups, range checks and formatting come from the defaults here.

use crate::parameter_info::{GroupId, GroupInfo, ParameterInfo};
use crate::parameter_types::ParameterRef;
use crate::types::{ParameterId, ParameterValue};

/// Collection of parameters shared between the control and processing
/// threads.
pub trait ParameterStore: Send + Sync {
    /// Number of parameters.
    fn count(&self) -> usize;

    /// Parameter at `index`.
    fn parameter(&self, index: usize) -> Option<&dyn ParameterRef>;

    /// Number of parameter groups.
    fn group_count(&self) -> usize {
        0
    }

    /// Group at `index`.
    fn group(&self, _index: usize) -> Option<GroupInfo> {
        None
    }

    /// Metadata of the parameter at `index`.
    fn info(&self, index: usize) -> Option<&ParameterInfo> {
        self.parameter(index).map(|p| p.info())
    }

    /// Parameter with id `id`.
    fn by_id(&self, id: ParameterId) -> Option<&dyn ParameterRef> {
        self.parameter(id as usize)
    }

    /// Current value of `id`, `None` for unknown ids.
    fn get(&self, id: ParameterId) -> Option<ParameterValue> {
        self.by_id(id).map(|p| p.get_plain())
    }

    /// Set `id` to `value`. Returns `false` for unknown ids and rejected values.
    fn set(&self, id: ParameterId, value: ParameterValue) -> bool {
        match self.by_id(id) {
            Some(parameter) => parameter.set_plain(value),
            None => {
                log::debug!("set on unknown parameter {id}");
                false
            }
        }
    }

    /// Display string for `value` as parameter `id` would show it.
    fn format(&self, id: ParameterId, value: ParameterValue) -> Option<String> {
        self.by_id(id)
            .map(|p| p.info().formatter.format(f64::from(value)))
    }

    /// Parse a display string for parameter `id`.
    fn parse(&self, id: ParameterId, text: &str) -> Option<ParameterValue> {
        self.by_id(id)
            .and_then(|p| p.info().formatter.parse(text))
            .map(|v| v as ParameterValue)
    }

    /// Find a parameter id by symbol (linear search).
    fn find_by_symbol(&self, symbol: &str) -> Option<ParameterId> {
        (0..self.count())
            .filter_map(|i| self.info(i))
            .find(|info| info.symbol == symbol)
            .map(|info| info.id)
    }

    /// Find a group id by name (linear search).
    fn find_group_by_name(&self, name: &str) -> Option<GroupId> {
        (0..self.group_count())
            .filter_map(|i| self.group(i))
            .find(|group| group.name == name)
            .map(|group| group.id)
    }

    /// Restore every parameter to its default.
    fn reset_all(&self) {
        for i in 0..self.count() {
            if let Some(parameter) = self.parameter(i) {
                parameter.reset();
            }
        }
    }
}
