//! Optional TOML settings file with `[generation]` and `[spawn]` tables.
//! Missing tables and keys fall back to the library defaults.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use delve_core::{GenerationConfig, SpawnConfig};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub generation: GenerationConfig,
    pub spawn: SpawnConfig,
}

/// Flag values that win over the file.
#[derive(Clone, Copy, Debug, Default)]
pub struct Overrides {
    pub seed: Option<u64>,
    pub level: Option<u32>,
    pub width: Option<usize>,
    pub height: Option<usize>,
}

impl FileConfig {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: Self = toml::from_str(&text)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        log::debug!("loaded settings from {}", path.display());
        Ok(config)
    }

    pub fn apply(mut self, overrides: Overrides) -> Result<Self> {
        if let Some(seed) = overrides.seed {
            self.generation.seed = seed;
        }
        if let Some(level) = overrides.level {
            self.generation.level_number = level;
        }
        if let Some(width) = overrides.width {
            self.generation.map_width = width;
        }
        if let Some(height) = overrides.height {
            self.generation.map_height = height;
        }
        self.generation.validate().context("invalid generation settings")?;
        Ok(self)
    }
}
