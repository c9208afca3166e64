//! Parameter metadata types.
//!
//! - [`ParameterInfo`] - Complete parameter description (name, symbol, range, flags, etc.)
//! - [`ParameterFlags`] - Behavioral flags
//! - [`GroupInfo`] - Named parameter group

use crate::parameter_format::Formatter;
use crate::types::{ParameterId, ParameterValue};

/// Parameter group ID type.
pub type GroupId = i32;

/// Root group ID constant (parameters with no group).
pub const ROOT_GROUP_ID: GroupId = -1;

/// Information about a parameter group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupInfo {
    /// Unique group identifier.
    pub id: GroupId,
    /// Display name (e.g., "Offset C#").
    pub name: String,
    /// Machine-readable symbol (e.g., "offset_cs").
    pub symbol: String,
}

impl GroupInfo {
    /// Create a group, deriving the symbol from the name.
    pub fn new(id: GroupId, name: impl Into<String>) -> Self {
        let name = name.into();
        let symbol = symbol_from_name(&name);
        Self { id, name, symbol }
    }
}

/// Flags controlling parameter behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterFlags {
    /// Parameter can be automated by the host.
    pub can_automate: bool,
    /// Values are whole numbers.
    pub is_integer: bool,
    /// Parameter is an on/off switch.
    pub is_toggle: bool,
    /// Host should show a list of labels.
    pub is_list: bool,
}

impl Default for ParameterFlags {
    fn default() -> Self {
        Self {
            can_automate: true,
            is_integer: false,
            is_toggle: false,
            is_list: false,
        }
    }
}

/// Metadata describing a single parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterInfo {
    /// Stable parameter index.
    pub id: ParameterId,
    /// Display name (e.g., "Split Point").
    pub name: String,
    /// Machine-readable symbol (e.g., "split_point").
    pub symbol: String,
    /// Lowest accepted value.
    pub min: ParameterValue,
    /// Highest accepted value.
    pub max: ParameterValue,
    /// Initial value.
    pub default: ParameterValue,
    /// Behavioral flags.
    pub flags: ParameterFlags,
    /// Parameter group, [`ROOT_GROUP_ID`] if ungrouped.
    pub group_id: GroupId,
    /// Display formatter.
    pub formatter: Formatter,
}

impl ParameterInfo {
    /// Create a continuous parameter. The symbol is derived from the name.
    pub fn new(
        id: ParameterId,
        name: impl Into<String>,
        min: ParameterValue,
        max: ParameterValue,
        default: ParameterValue,
    ) -> Self {
        let name = name.into();
        Self {
            id,
            symbol: symbol_from_name(&name),
            name,
            min,
            max,
            default,
            flags: ParameterFlags::default(),
            group_id: ROOT_GROUP_ID,
            formatter: Formatter::default(),
        }
    }

    /// Set the symbol.
    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = symbol.into();
        self
    }

    /// Set parameter flags.
    pub fn with_flags(mut self, flags: ParameterFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Set the group ID.
    pub fn with_group(mut self, group_id: GroupId) -> Self {
        self.group_id = group_id;
        self
    }

    /// Set the formatter. Label formatters also mark the parameter as a list.
    pub fn with_formatter(mut self, formatter: Formatter) -> Self {
        self.flags.is_list = matches!(
            formatter,
            Formatter::Labels { .. } | Formatter::NoteName | Formatter::Interval { .. }
        );
        self.formatter = formatter;
        self
    }

    /// Returns true if `value` is inside the declared range.
    #[inline]
    pub fn accepts(&self, value: ParameterValue) -> bool {
        !value.is_nan() && value >= self.min && value <= self.max
    }

    /// Number of discrete steps: 0 = continuous, 1 = toggle.
    pub fn step_count(&self) -> u32 {
        if self.flags.is_integer || self.flags.is_toggle {
            (self.max - self.min) as u32
        } else {
            0
        }
    }
}

/// Lowercase symbol from a display name: `#` becomes `s`, spaces become `_`.
pub fn symbol_from_name(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| match c {
            '#' => 's',
            ' ' => '_',
            c => c.to_ascii_lowercase(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_from_name() {
        assert_eq!(symbol_from_name("C# chord"), "cs_chord");
        assert_eq!(symbol_from_name("Offset D#2"), "offset_ds2");
        assert_eq!(symbol_from_name("Split Point"), "split_point");
    }

    #[test]
    fn test_accepts() {
        let info = ParameterInfo::new(0, "Split Point", 12.0, 115.0, 60.0);
        assert!(info.accepts(12.0));
        assert!(info.accepts(115.0));
        assert!(!info.accepts(11.0));
        assert!(!info.accepts(116.0));
        assert!(!info.accepts(f32::NAN));
    }

    #[test]
    fn test_list_flag_follows_formatter() {
        let info = ParameterInfo::new(0, "Split Point", 12.0, 115.0, 60.0)
            .with_formatter(Formatter::NoteName);
        assert!(info.flags.is_list);
        assert_eq!(info.symbol, "split_point");
        assert_eq!(info.group_id, ROOT_GROUP_ID);
    }

    #[test]
    fn test_group_symbol() {
        let group = GroupInfo::new(3, "Offset D#");
        assert_eq!(group.symbol, "offset_ds");
    }
}
