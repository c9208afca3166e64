//! Atomic parameter cells.
//!
//! Each cell pairs a [`ParameterInfo`] with lock-free storage so a control
//! thread can write while the processing thread reads. Writes outside the
//! declared range are rejected and leave the stored value untouched.
//!
//! # Example
//!
//! ```ignore
//! use chordkit_core::parameter_types::IntParameter;
//!
//! let split = IntParameter::new("Split Point", 60, 12..=115).with_id(12);
//! assert!(split.set(48));
//! assert!(!split.set(120));
//! assert_eq!(split.get(), 48);
//! ```

use std::ops::RangeInclusive;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU32, Ordering};

use crate::parameter_format::Formatter;
use crate::parameter_info::{GroupId, ParameterFlags, ParameterInfo};
use crate::types::{ParameterId, ParameterValue};

/// Type-erased access to a parameter cell.
pub trait ParameterRef: Send + Sync {
    /// Parameter metadata.
    fn info(&self) -> &ParameterInfo;

    /// Current plain value.
    fn get_plain(&self) -> ParameterValue;

    /// Set the plain value. Returns `false` and keeps the current value if
    /// `value` is NaN or outside the declared range.
    fn set_plain(&self, value: ParameterValue) -> bool;

    /// Parameter id.
    fn id(&self) -> ParameterId {
        self.info().id
    }

    /// Restore the default value.
    fn reset(&self) {
        self.set_plain(self.info().default);
    }

    /// Format the current value for display.
    fn display(&self) -> String {
        self.info().formatter.format(f64::from(self.get_plain()))
    }
}

fn rejected(info: &ParameterInfo, value: ParameterValue) -> bool {
    log::debug!(
        "rejected {} = {} (range {}..={})",
        info.symbol,
        value,
        info.min,
        info.max
    );
    false
}

// =============================================================================
// IntParameter
// =============================================================================

/// Whole-number parameter.
pub struct IntParameter {
    info: ParameterInfo,
    value: AtomicI64,
    min: i64,
    max: i64,
}

impl IntParameter {
    /// Create an integer parameter.
    ///
    /// The id defaults to 0 and should be set with [`with_id`](Self::with_id).
    pub fn new(name: impl Into<String>, default: i64, range: RangeInclusive<i64>) -> Self {
        let (min, max) = range.into_inner();
        let default = default.clamp(min, max);
        let mut info = ParameterInfo::new(0, name, min as f32, max as f32, default as f32)
            .with_formatter(Formatter::Integer);
        info.flags.is_integer = true;
        Self {
            info,
            value: AtomicI64::new(default),
            min,
            max,
        }
    }

    /// Set the parameter id.
    pub fn with_id(mut self, id: ParameterId) -> Self {
        self.info.id = id;
        self
    }

    /// Set the symbol.
    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.info.symbol = symbol.into();
        self
    }

    /// Set the group.
    pub fn with_group(mut self, group_id: GroupId) -> Self {
        self.info.group_id = group_id;
        self
    }

    /// Set the display formatter.
    pub fn with_formatter(mut self, formatter: Formatter) -> Self {
        self.info = self.info.with_formatter(formatter);
        self
    }

    /// Disable automation for this parameter.
    pub fn non_automatable(mut self) -> Self {
        self.info.flags.can_automate = false;
        self
    }

    /// Current value.
    #[inline]
    pub fn get(&self) -> i64 {
        self.value.load(Ordering::Relaxed)
    }

    /// Set the value. Returns `false` if it is out of range.
    #[inline]
    pub fn set(&self, value: i64) -> bool {
        if value < self.min || value > self.max {
            return rejected(&self.info, value as f32);
        }
        self.value.store(value, Ordering::Relaxed);
        true
    }

    /// Declared range.
    pub fn range(&self) -> RangeInclusive<i64> {
        self.min..=self.max
    }
}

impl ParameterRef for IntParameter {
    fn info(&self) -> &ParameterInfo {
        &self.info
    }

    fn get_plain(&self) -> ParameterValue {
        self.get() as ParameterValue
    }

    fn set_plain(&self, value: ParameterValue) -> bool {
        if !self.info.accepts(value) {
            return rejected(&self.info, value);
        }
        self.set(value.trunc() as i64)
    }
}

impl std::fmt::Debug for IntParameter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntParameter")
            .field("id", &self.info.id)
            .field("symbol", &self.info.symbol)
            .field("value", &self.get())
            .finish()
    }
}

// =============================================================================
// FloatParameter
// =============================================================================

/// Continuous parameter, stored as `f32` bits.
pub struct FloatParameter {
    info: ParameterInfo,
    value: AtomicU32,
}

impl FloatParameter {
    /// Create a float parameter.
    pub fn new(name: impl Into<String>, default: f32, range: RangeInclusive<f32>) -> Self {
        let (min, max) = range.into_inner();
        let default = default.clamp(min, max);
        Self {
            info: ParameterInfo::new(0, name, min, max, default),
            value: AtomicU32::new(default.to_bits()),
        }
    }

    /// Velocity-style scale factor, displayed as "1.00x".
    pub fn multiplier(name: impl Into<String>, default: f32, range: RangeInclusive<f32>) -> Self {
        Self::new(name, default, range).with_formatter(Formatter::Multiplier)
    }

    /// Set the parameter id.
    pub fn with_id(mut self, id: ParameterId) -> Self {
        self.info.id = id;
        self
    }

    /// Set the symbol.
    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.info.symbol = symbol.into();
        self
    }

    /// Set the group.
    pub fn with_group(mut self, group_id: GroupId) -> Self {
        self.info.group_id = group_id;
        self
    }

    /// Set the display formatter.
    pub fn with_formatter(mut self, formatter: Formatter) -> Self {
        self.info = self.info.with_formatter(formatter);
        self
    }

    /// Current value.
    #[inline]
    pub fn get(&self) -> f32 {
        f32::from_bits(self.value.load(Ordering::Relaxed))
    }

    /// Set the value. Returns `false` if it is NaN or out of range.
    #[inline]
    pub fn set(&self, value: f32) -> bool {
        if !self.info.accepts(value) {
            return rejected(&self.info, value);
        }
        self.value.store(value.to_bits(), Ordering::Relaxed);
        true
    }
}

impl ParameterRef for FloatParameter {
    fn info(&self) -> &ParameterInfo {
        &self.info
    }

    fn get_plain(&self) -> ParameterValue {
        self.get()
    }

    fn set_plain(&self, value: ParameterValue) -> bool {
        self.set(value)
    }
}

impl std::fmt::Debug for FloatParameter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FloatParameter")
            .field("id", &self.info.id)
            .field("symbol", &self.info.symbol)
            .field("value", &self.get())
            .finish()
    }
}

// =============================================================================
// BoolParameter
// =============================================================================

/// On/off switch. Accepts plain values in `0.0..=1.0`, on above 0.5.
pub struct BoolParameter {
    info: ParameterInfo,
    value: AtomicBool,
}

impl BoolParameter {
    /// Create a switch.
    pub fn new(name: impl Into<String>, default: bool) -> Self {
        let default_plain = if default { 1.0 } else { 0.0 };
        let mut info =
            ParameterInfo::new(0, name, 0.0, 1.0, default_plain).with_formatter(Formatter::Boolean);
        info.flags = ParameterFlags {
            is_toggle: true,
            ..info.flags
        };
        Self {
            info,
            value: AtomicBool::new(default),
        }
    }

    /// Set the parameter id.
    pub fn with_id(mut self, id: ParameterId) -> Self {
        self.info.id = id;
        self
    }

    /// Set the group.
    pub fn with_group(mut self, group_id: GroupId) -> Self {
        self.info.group_id = group_id;
        self
    }

    /// Current value.
    #[inline]
    pub fn get(&self) -> bool {
        self.value.load(Ordering::Relaxed)
    }

    /// Set the value.
    #[inline]
    pub fn set(&self, value: bool) {
        self.value.store(value, Ordering::Relaxed);
    }
}

impl ParameterRef for BoolParameter {
    fn info(&self) -> &ParameterInfo {
        &self.info
    }

    fn get_plain(&self) -> ParameterValue {
        if self.get() {
            1.0
        } else {
            0.0
        }
    }

    fn set_plain(&self, value: ParameterValue) -> bool {
        if !self.info.accepts(value) {
            return rejected(&self.info, value);
        }
        self.set(value > 0.5);
        true
    }
}

impl std::fmt::Debug for BoolParameter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoolParameter")
            .field("id", &self.info.id)
            .field("value", &self.get())
            .finish()
    }
}
