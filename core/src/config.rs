//! Build options (bonemesh.toml)
//!
//! Sphere tessellation and output switches for one build. Options are passed
//! by value into each build; nothing here is global.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;
use crate::geometry::{DEFAULT_KEY_DECIMALS, MAX_KEY_DECIMALS};

/// Valid range for sphere segments
pub const SEGMENTS_RANGE: (u32, u32) = (3, 64);

/// Valid range for sphere rings
pub const RINGS_RANGE: (u32, u32) = (2, 64);

/// Options for one bone mesh build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildOptions {
    /// Whether to produce one weight group per bone (default: true)
    #[serde(default = "default_true")]
    pub vertex_groups: bool,
    /// Decimals used to match joint positions (default: 5, range: 0-9)
    #[serde(default = "default_key_decimals")]
    pub key_decimals: u32,
    /// Joint sphere tessellation
    #[serde(default)]
    pub sphere: SphereConfig,
}

/// Joint sphere tessellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SphereConfig {
    /// Longitude steps (default: 8, range: 3-64)
    #[serde(default = "default_segments")]
    pub segments: u32,
    /// Latitude bands (default: 4, range: 2-64)
    #[serde(default = "default_rings")]
    pub rings: u32,
}

fn default_true() -> bool {
    true
}
fn default_key_decimals() -> u32 {
    DEFAULT_KEY_DECIMALS
}
fn default_segments() -> u32 {
    8
}
fn default_rings() -> u32 {
    4
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            vertex_groups: default_true(),
            key_decimals: default_key_decimals(),
            sphere: SphereConfig::default(),
        }
    }
}

impl Default for SphereConfig {
    fn default() -> Self {
        Self {
            segments: default_segments(),
            rings: default_rings(),
        }
    }
}

impl SphereConfig {
    /// Validated tessellation
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::OutOfRange` if either value is outside its range.
    pub fn new(segments: u32, rings: u32) -> Result<Self, ConfigError> {
        let config = Self { segments, rings };
        config.validate()?;
        Ok(config)
    }

    /// Tessellation clamped into the valid ranges
    pub fn clamped(segments: u32, rings: u32) -> Self {
        Self {
            segments: segments.clamp(SEGMENTS_RANGE.0, SEGMENTS_RANGE.1),
            rings: rings.clamp(RINGS_RANGE.0, RINGS_RANGE.1),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("segments", self.segments, SEGMENTS_RANGE)?;
        check_range("rings", self.rings, RINGS_RANGE)
    }
}

impl BuildOptions {
    /// Parse options from TOML, validating ranges.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let options: BuildOptions =
            toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    /// Load options from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, does not parse, or holds
    /// out-of-range values.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Read(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    /// Serialize to pretty TOML.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.sphere.validate()?;
        check_range("key_decimals", self.key_decimals, (0, MAX_KEY_DECIMALS))
    }
}

fn check_range(name: &'static str, value: u32, (min, max): (u32, u32)) -> Result<(), ConfigError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            name,
            value,
            min,
            max,
        })
    }
}
