use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::{self, to_owned_list};
use crate::domain::ScopeSelector;
use crate::error::{BrandError, Result};
use crate::pipeline::processing::policy::MatchPolicy;

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub data: DataConfig,
    pub scope: ScopeConfig,
    pub matching: MatchingConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct DataConfig {
    pub relations_path: String,
    /// May contain `{source}` and `{country}` placeholders
    pub products_path: String,
    pub output_path: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            relations_path: constants::DEFAULT_RELATIONS_PATH.to_string(),
            products_path: constants::DEFAULT_PRODUCTS_PATH.to_string(),
            output_path: constants::DEFAULT_OUTPUT_PATH.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScopeConfig {
    pub source: String,
    pub country_code: String,
}

impl Default for ScopeConfig {
    fn default() -> Self {
        Self {
            source: constants::DEFAULT_SOURCE.to_string(),
            country_code: constants::DEFAULT_COUNTRY_CODE.to_string(),
        }
    }
}

impl ScopeConfig {
    pub fn selector(&self) -> ScopeSelector {
        ScopeSelector::new(self.source.clone(), self.country_code.clone())
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct MatchingConfig {
    pub ignored_brands: Vec<String>,
    pub front_only_brands: Vec<String>,
    pub front_or_second_brands: Vec<String>,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            ignored_brands: to_owned_list(constants::IGNORED_BRANDS),
            front_only_brands: to_owned_list(constants::FRONT_ONLY_BRANDS),
            front_or_second_brands: to_owned_list(constants::FRONT_OR_SECOND_BRANDS),
        }
    }
}

impl MatchingConfig {
    pub fn policy(&self) -> MatchPolicy {
        MatchPolicy::with_brand_lists(
            &self.ignored_brands,
            &self.front_only_brands,
            &self.front_or_second_brands,
        )
    }
}

impl Config {
    /// Path from `BRAND_RESOLVER_CONFIG`, falling back to `config.toml`.
    pub fn default_path() -> PathBuf {
        std::env::var(constants::CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(constants::DEFAULT_CONFIG_PATH))
    }

    /// Load the config file if there is one, otherwise use defaults.
    pub fn load() -> Result<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        let config_content = fs::read_to_string(config_path).map_err(|e| {
            BrandError::Config(format!(
                "Failed to read config file '{}': {}",
                config_path.display(),
                e
            ))
        })?;

        let config: Config = toml::from_str(&config_content)?;
        Ok(config)
    }
}
