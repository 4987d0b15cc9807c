//! Configuration management for FE-EKG tools.
//!
//! Configuration is loaded from (in priority order):
//! 1. Environment variables (FEKG_ prefix, `__` between sections)
//! 2. Config file (fekg.toml by default)
//! 3. Defaults

use serde::Deserialize;

use crate::error::{FekgError, Result};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FekgConfig {
    #[serde(default)]
    pub evolution: EvolutionConfig,

    #[serde(default)]
    pub links: LinkConfig,

    #[serde(default)]
    pub listing: ListingConfig,

    #[serde(default)]
    pub snapshot: SnapshotConfig,
}

/// Defaults applied when resolving evolution links around a focal event.
#[derive(Debug, Clone, Deserialize)]
pub struct EvolutionConfig {
    /// Links scoring below this are dropped from both views (default: 0.0).
    #[serde(default)]
    pub min_score: f64,

    /// Highest-scoring links first (default: true).
    #[serde(default = "default_true")]
    pub sort_descending: bool,
}

/// Defaults for link listing queries against a repository.
#[derive(Debug, Clone, Deserialize)]
pub struct LinkConfig {
    /// Minimum score the link listing asks for (default: 0.3).
    #[serde(default = "default_link_min_score")]
    pub default_min_score: f64,
}

/// Event listing page sizes.
#[derive(Debug, Clone, Deserialize)]
pub struct ListingConfig {
    #[serde(default = "default_page_size")]
    pub default_page_size: usize,

    /// Upper bound on a single page (default: 10000).
    #[serde(default = "default_max_page_size")]
    pub max_page_size: usize,
}

/// Where to read the event/link snapshot from when none is given explicitly.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SnapshotConfig {
    #[serde(default)]
    pub path: Option<String>,
}

fn default_true() -> bool {
    true
}

fn default_link_min_score() -> f64 {
    0.3
}

fn default_page_size() -> usize {
    100
}

fn default_max_page_size() -> usize {
    10_000
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            min_score: 0.0,
            sort_descending: default_true(),
        }
    }
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            default_min_score: default_link_min_score(),
        }
    }
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

impl ListingConfig {
    /// Clamp a requested page size into `[0, max_page_size]`, falling back
    /// to the default when none was requested.
    pub fn page_size(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.default_page_size)
            .min(self.max_page_size)
    }
}

impl FekgConfig {
    /// Load configuration from `<file_prefix>.{toml,yaml,json}` (optional)
    /// overlaid with `FEKG_*` environment variables.
    pub fn load(file_prefix: &str) -> Result<Self> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name(file_prefix).required(false))
            .add_source(
                config::Environment::with_prefix("FEKG")
                    .separator("__")
                    .try_parsing(true),
            );
        Self::from_builder(builder)
    }

    /// Parse configuration from TOML text without touching the environment.
    pub fn from_toml_str(toml: &str) -> Result<Self> {
        let builder = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml));
        Self::from_builder(builder)
    }

    fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self> {
        let cfg = builder
            .build()
            .map_err(|e| FekgError::Config(e.to_string()))?;
        let parsed: Self = cfg
            .try_deserialize()
            .map_err(|e| FekgError::Config(e.to_string()))?;
        parsed.validate()?;
        tracing::debug!(
            min_score = parsed.evolution.min_score,
            sort_descending = parsed.evolution.sort_descending,
            "Configuration loaded"
        );
        Ok(parsed)
    }

    fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("evolution.min_score", self.evolution.min_score),
            ("links.default_min_score", self.links.default_min_score),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(FekgError::Config(format!(
                    "{name} must be within [0, 1], got {value}"
                )));
            }
        }
        Ok(())
    }
}
