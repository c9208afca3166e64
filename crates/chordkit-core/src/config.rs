//! Plugin metadata and engine configuration.
//!
//! # Example
//!
//! ```ignore
//! use chordkit_core::PluginConfig;
//!
//! pub static CONFIG: PluginConfig = PluginConfig::new("Chordulator", 2)
//!     .with_description("Creates a chord for each note of the octave")
//!     .with_version(1, 0, 0);
//! ```

/// Static plugin metadata.
#[derive(Debug, Clone)]
pub struct PluginConfig {
    /// Plugin name displayed by the host.
    pub name: &'static str,

    /// One-line description.
    pub description: &'static str,

    /// Author name.
    pub maker: &'static str,

    /// Project homepage.
    pub homepage: &'static str,

    /// License name.
    pub license: &'static str,

    /// Version as `(major, minor, patch)`.
    pub version: (u8, u8, u8),

    /// Per-plugin index folded into [`unique_id`](Self::unique_id).
    pub index: u8,
}

impl PluginConfig {
    /// Create a configuration with the shared maker defaults.
    pub const fn new(name: &'static str, index: u8) -> Self {
        Self {
            name,
            description: "",
            maker: "riban",
            homepage: "https://github.com/riban-bw/lv2-plugins",
            license: "ISC",
            version: (1, 0, 0),
            index,
        }
    }

    /// Set the description.
    pub const fn with_description(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    /// Set the maker.
    pub const fn with_maker(mut self, maker: &'static str) -> Self {
        self.maker = maker;
        self
    }

    /// Set the homepage.
    pub const fn with_homepage(mut self, homepage: &'static str) -> Self {
        self.homepage = homepage;
        self
    }

    /// Set the license name.
    pub const fn with_license(mut self, license: &'static str) -> Self {
        self.license = license;
        self
    }

    /// Set the version.
    pub const fn with_version(mut self, major: u8, minor: u8, patch: u8) -> Self {
        self.version = (major, minor, patch);
        self
    }

    /// Version packed as `0x00MMmmpp`.
    pub const fn packed_version(&self) -> u32 {
        ((self.version.0 as u32) << 16) | ((self.version.1 as u32) << 8) | self.version.2 as u32
    }

    /// Version formatted as `major.minor.patch`.
    pub fn version_string(&self) -> String {
        format!("{}.{}.{}", self.version.0, self.version.1, self.version.2)
    }

    /// 64-bit id: the maker tag `riba` in the high word, `n` and the index below.
    pub const fn unique_id(&self) -> i64 {
        let maker = i64::from_be_bytes([0, 0, 0, 0, b'r', b'i', b'b', b'a']);
        (maker << 32) | ((b'n' as i64) << 24) | self.index as i64
    }
}

/// What to do with note events below a bounded modifier zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LowNotePolicy {
    /// Forward unchanged.
    #[default]
    PassThrough,
    /// Drop silently.
    Ignore,
}

/// Engine behaviour switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EngineConfig {
    /// Handling of notes below the modifier zone.
    pub low_notes: LowNotePolicy,
}

impl EngineConfig {
    /// Default configuration.
    pub const fn new() -> Self {
        Self {
            low_notes: LowNotePolicy::PassThrough,
        }
    }

    /// Set the low-note policy.
    pub const fn with_low_notes(mut self, low_notes: LowNotePolicy) -> Self {
        self.low_notes = low_notes;
        self
    }
}
