//! Parameter value formatting and parsing.
//!
//! [`Formatter`] converts plain parameter values to display strings and
//! back. Enumerated parameters (chord selections, split point, offsets)
//! display labels instead of numbers.
//!
//! # Example
//!
//! ```ignore
//! use chordkit_core::parameter_format::Formatter;
//!
//! assert_eq!(Formatter::NoteName.format(60.0), "C4");
//! assert_eq!(Formatter::Interval { root: 0 }.format(4.0), "+E");
//! assert_eq!(Formatter::Multiplier.format(1.5), "1.50x");
//! ```

use std::sync::Arc;

use crate::types::{note_name, NOTE_NAMES, OCTAVE};

/// Parameter value formatter.
#[derive(Debug, Clone, PartialEq)]
pub enum Formatter {
    /// Whole number (e.g., "101").
    Integer,

    /// Generic float with configurable precision (e.g., "1.23").
    Float {
        /// Number of decimal places.
        precision: usize,
    },

    /// Velocity scale factor.
    ///
    /// Display: "0.50x", "2.00x"
    Multiplier,

    /// MIDI note number as a note name.
    ///
    /// Display: "C-1", "C4", "G9"
    NoteName,

    /// Semitone offset shown as the note it lands on, relative to a root
    /// pitch class.
    ///
    /// Display for root C: "-B", "C", "+E"
    Interval {
        /// Root pitch class (0 = C).
        root: u8,
    },

    /// Boolean: >0.5 = On, <=0.5 = Off.
    Boolean,

    /// One label per integer value starting at `first`.
    Labels {
        /// Value of the first label.
        first: i64,
        /// Labels in value order.
        labels: Arc<[String]>,
    },
}

impl Formatter {
    /// Label table for consecutive integer values starting at `first`.
    pub fn labels(first: i64, labels: impl IntoIterator<Item = String>) -> Self {
        Formatter::Labels {
            first,
            labels: labels.into_iter().collect(),
        }
    }

    /// Format a plain value for display.
    pub fn format(&self, value: f64) -> String {
        match self {
            Formatter::Integer => format!("{}", value.trunc() as i64),

            Formatter::Float { precision } => {
                format!("{:.prec$}", value, prec = *precision)
            }

            Formatter::Multiplier => format!("{value:.2}x"),

            Formatter::NoteName => {
                let note = value.trunc();
                if (0.0..=127.0).contains(&note) {
                    note_name(note as u8)
                } else {
                    format!("{}", note as i64)
                }
            }

            Formatter::Interval { root } => {
                let offset = value.trunc() as i64;
                let pitch_class = (i64::from(*root) + offset).rem_euclid(i64::from(OCTAVE));
                let name = NOTE_NAMES[pitch_class as usize];
                match offset {
                    o if o > 0 => format!("+{name}"),
                    o if o < 0 => format!("-{name}"),
                    _ => name.to_string(),
                }
            }

            Formatter::Boolean => {
                if value > 0.5 {
                    "On".to_string()
                } else {
                    "Off".to_string()
                }
            }

            Formatter::Labels { first, labels } => {
                let index = value.trunc() as i64 - first;
                usize::try_from(index)
                    .ok()
                    .and_then(|i| labels.get(i))
                    .cloned()
                    .unwrap_or_else(|| format!("{}", value.trunc() as i64))
            }
        }
    }

    /// Parse a display string to a plain value.
    ///
    /// Returns `None` if the string cannot be parsed. Numeric input is
    /// accepted by every formatter.
    pub fn parse(&self, s: &str) -> Option<f64> {
        let s = s.trim();
        if let Ok(value) = s.parse::<f64>() {
            return Some(value);
        }

        match self {
            Formatter::Integer | Formatter::Float { .. } => None,

            Formatter::Multiplier => s.trim_end_matches(['x', 'X']).trim().parse().ok(),

            Formatter::NoteName => (0..=127u8)
                .find(|&note| note_name(note).eq_ignore_ascii_case(s))
                .map(f64::from),

            Formatter::Interval { .. } => (-12..=12)
                .find(|&offset| self.format(f64::from(offset)).eq_ignore_ascii_case(s))
                .map(f64::from),

            Formatter::Boolean => match s.to_lowercase().as_str() {
                "on" | "true" | "yes" | "enabled" => Some(1.0),
                "off" | "false" | "no" | "disabled" => Some(0.0),
                _ => None,
            },

            Formatter::Labels { first, labels } => labels
                .iter()
                .position(|label| label.eq_ignore_ascii_case(s))
                .map(|i| (first + i as i64) as f64),
        }
    }
}

impl Default for Formatter {
    fn default() -> Self {
        Formatter::Float { precision: 2 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_name() {
        assert_eq!(Formatter::NoteName.format(60.0), "C4");
        assert_eq!(Formatter::NoteName.format(12.0), "C0");
        assert_eq!(Formatter::NoteName.parse("c#4"), Some(61.0));
        assert_eq!(Formatter::NoteName.parse("H2"), None);
    }

    #[test]
    fn test_interval() {
        let c = Formatter::Interval { root: 0 };
        assert_eq!(c.format(0.0), "C");
        assert_eq!(c.format(4.0), "+E");
        assert_eq!(c.format(-1.0), "-B");
        assert_eq!(c.format(12.0), "+C");

        let a = Formatter::Interval { root: 9 };
        assert_eq!(a.format(3.0), "+C");
        assert_eq!(a.parse("+C"), Some(3.0));
    }

    #[test]
    fn test_labels() {
        let f = Formatter::labels(1, ["Major".to_string(), "Minor".to_string()]);
        assert_eq!(f.format(1.0), "Major");
        assert_eq!(f.format(2.0), "Minor");
        assert_eq!(f.format(3.0), "3");
        assert_eq!(f.format(0.0), "0");
        assert_eq!(f.parse("minor"), Some(2.0));
        assert_eq!(f.parse("2"), Some(2.0));
    }

    #[test]
    fn test_multiplier_and_boolean() {
        assert_eq!(Formatter::Multiplier.format(1.5), "1.50x");
        assert_eq!(Formatter::Multiplier.parse("0.75x"), Some(0.75));
        assert_eq!(Formatter::Boolean.format(1.0), "On");
        assert_eq!(Formatter::Boolean.parse("off"), Some(0.0));
    }
}
