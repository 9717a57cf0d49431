//! Hunting configuration
//!
//! Loaded from TOML. Every field has a default, so an empty file is valid.
//!
//! ```toml
//! species_to_hunt = "Sneasel, Weavile"
//! search_for_ivs = [31, 31, 31, 31, 31, 31]
//!
//! [trainer]
//! tid = 12345
//! sid = 54321
//!
//! [static_alpha]
//! location = "obsidian"
//! shiny_rolls = 1
//! max_advances = 50
//! ```

use crate::app::hunt::{parse_species_list, HuntFilter};
use crate::constants::{DEFAULT_MAX_ADVANCES, DEFAULT_MAX_HITS, IV_COUNT, MAX_IV};
use crate::domain::individual::TrainerId;
use crate::domain::location::HisuiMap;
use crate::error::SpawnError;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

impl From<SpawnError> for ConfigError {
    fn from(e: SpawnError) -> Self {
        Self::Invalid(e.to_string())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StaticAlphaConfig {
    pub location: HisuiMap,
    pub shiny_rolls: u32,
    pub max_advances: u32,
    /// Spawner has not respawned since the area was loaded
    pub initial_spawn: bool,
    /// Spawns are the spawner's alpha
    pub static_alpha: bool,
}

impl Default for StaticAlphaConfig {
    fn default() -> Self {
        Self {
            location: HisuiMap::Obsidian,
            shiny_rolls: 1,
            max_advances: DEFAULT_MAX_ADVANCES,
            initial_spawn: true,
            static_alpha: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DistortionConfig {
    pub location: HisuiMap,
    pub shiny_rolls: u32,
    pub alpha_only: bool,
}

impl Default for DistortionConfig {
    fn default() -> Self {
        Self {
            location: HisuiMap::Obsidian,
            shiny_rolls: 1,
            alpha_only: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OutbreakConfig {
    /// PID rolls for standalone outbreaks
    pub outbreak_rolls: u32,
    /// PID rolls for massive outbreaks
    pub massive_rolls: u32,
    pub alpha_shiny_only: bool,
}

impl Default for OutbreakConfig {
    fn default() -> Self {
        Self {
            outbreak_rolls: 26,
            massive_rolls: 13,
            alpha_shiny_only: false,
        }
    }
}

/// Top-level hunting configuration
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HuntConfig {
    pub trainer: TrainerId,
    /// Species allow-list, comma or space separated; empty hunts everything
    pub species_to_hunt: String,
    /// Exact IV vector to search for; empty disables the IV filter
    pub search_for_ivs: Vec<u8>,
    pub max_hits: usize,
    pub static_alpha: StaticAlphaConfig,
    pub distortion: DistortionConfig,
    pub outbreak: OutbreakConfig,
}

impl Default for HuntConfig {
    fn default() -> Self {
        Self {
            trainer: TrainerId::default(),
            species_to_hunt: String::new(),
            search_for_ivs: Vec::new(),
            max_hits: DEFAULT_MAX_HITS,
            static_alpha: StaticAlphaConfig::default(),
            distortion: DistortionConfig::default(),
            outbreak: OutbreakConfig::default(),
        }
    }
}

impl HuntConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: HuntConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        log::info!("Loaded hunt config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let rolls = [
            ("static_alpha.shiny_rolls", self.static_alpha.shiny_rolls),
            ("distortion.shiny_rolls", self.distortion.shiny_rolls),
            ("outbreak.outbreak_rolls", self.outbreak.outbreak_rolls),
            ("outbreak.massive_rolls", self.outbreak.massive_rolls),
        ];
        if let Some((name, _)) = rolls.iter().find(|(_, r)| *r == 0) {
            return Err(ConfigError::Invalid(format!("{} must be at least 1", name)));
        }

        if self.max_hits == 0 {
            return Err(ConfigError::Invalid("max_hits must be at least 1".into()));
        }

        if !self.search_for_ivs.is_empty() {
            if self.search_for_ivs.len() != IV_COUNT {
                return Err(ConfigError::Invalid(format!(
                    "search_for_ivs needs {} values, got {}",
                    IV_COUNT,
                    self.search_for_ivs.len()
                )));
            }
            if let Some(iv) = self.search_for_ivs.iter().find(|&&iv| iv > MAX_IV) {
                return Err(ConfigError::Invalid(format!("IV {} is above {}", iv, MAX_IV)));
            }
        }

        parse_species_list(&self.species_to_hunt)?;
        Ok(())
    }

    /// Species allow-list as dex ids
    pub fn species(&self) -> Result<Vec<u16>, ConfigError> {
        Ok(parse_species_list(&self.species_to_hunt)?)
    }

    fn target_ivs(&self) -> Option<[u8; IV_COUNT]> {
        self.search_for_ivs.as_slice().try_into().ok()
    }

    fn base_filter(&self) -> Result<HuntFilter, ConfigError> {
        let mut filter = HuntFilter::shiny().with_species(self.species()?);
        filter.target_ivs = self.target_ivs();
        filter.max_hits = self.max_hits;
        Ok(filter)
    }

    /// Filter for static alpha scans
    pub fn static_alpha_filter(&self) -> Result<HuntFilter, ConfigError> {
        self.base_filter()
    }

    /// Filter for distortion scans
    pub fn distortion_filter(&self) -> Result<HuntFilter, ConfigError> {
        Ok(self.base_filter()?.alpha_only(self.distortion.alpha_only))
    }

    /// Filter for outbreak scans; IV targets do not apply
    pub fn outbreak_filter(&self) -> Result<HuntFilter, ConfigError> {
        let mut filter = self.base_filter()?.alpha_only(self.outbreak.alpha_shiny_only);
        filter.target_ivs = None;
        Ok(filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = HuntConfig::from_toml_str("").unwrap();
        assert_eq!(config, HuntConfig::default());
        assert_eq!(config.outbreak.outbreak_rolls, 26);
        assert_eq!(config.outbreak.massive_rolls, 13);
        assert_eq!(config.max_hits, 3);
    }

    #[test]
    fn test_full_config() {
        let config = HuntConfig::from_toml_str(
            r#"
            species_to_hunt = "Sneasel, Weavile"
            search_for_ivs = [31, 31, 31, 0, 31, 31]
            max_hits = 5

            [trainer]
            tid = 12345
            sid = 54321

            [static_alpha]
            location = "crimson"
            max_advances = 200
            initial_spawn = false

            [distortion]
            location = "alabaster"
            alpha_only = true
            "#,
        )
        .unwrap();

        assert_eq!(config.trainer, TrainerId::new(12345, 54321));
        assert_eq!(config.static_alpha.location, HisuiMap::Crimson);
        assert_eq!(config.static_alpha.max_advances, 200);
        assert!(!config.static_alpha.initial_spawn);
        assert_eq!(config.static_alpha.shiny_rolls, 1);
        assert_eq!(config.species().unwrap(), vec![215, 461]);

        let filter = config.distortion_filter().unwrap();
        assert!(filter.alpha_only);
        assert_eq!(filter.max_hits, 5);
        assert_eq!(filter.target_ivs, Some([31, 31, 31, 0, 31, 31]));
        assert_eq!(config.outbreak_filter().unwrap().target_ivs, None);
    }

    #[test]
    fn test_zero_rolls_rejected() {
        let err = HuntConfig::from_toml_str("[outbreak]\nmassive_rolls = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(msg) if msg.contains("massive_rolls")));
    }

    #[test]
    fn test_iv_above_31_rejected() {
        let err = HuntConfig::from_toml_str("search_for_ivs = [31, 31, 31, 31, 31, 32]").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_iv_vector_length() {
        assert!(HuntConfig::from_toml_str("search_for_ivs = [31, 31]").is_err());
    }

    #[test]
    fn test_unknown_species_rejected() {
        assert!(HuntConfig::from_toml_str("species_to_hunt = \"Agumon\"").is_err());
    }

    #[test]
    fn test_any_hisui_species_accepted() {
        let config = HuntConfig::from_toml_str("species_to_hunt = \"Bidoof, Starly Shinx\"").unwrap();
        assert_eq!(config.species().unwrap(), vec![399, 396, 403]);
    }

    #[test]
    fn test_unknown_location_rejected() {
        let err = HuntConfig::from_toml_str("[distortion]\nlocation = \"jubilife\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
