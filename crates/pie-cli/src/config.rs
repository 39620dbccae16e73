//! `pie.toml` loading.
//!
//! Resolution: `--config` flag > `PIE_CONFIG` env > `~/.config/pie/pie.toml`
//! when it exists > built-in defaults.

use std::path::{Path, PathBuf};
use std::{env, fs};

use anyhow::{Context, Result, bail};
use pie_core::{BlockCount, DEFAULT_MAX_DIVISIONS, DEFAULT_TOTAL_BLOCKS, MIN_DIVISIONS};
use serde::Deserialize;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Upper bound for the divide controls.
    pub max_divisions: u32,
    /// Default dividend for the block tools.
    pub total_blocks: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_divisions: DEFAULT_MAX_DIVISIONS,
            total_blocks: DEFAULT_TOTAL_BLOCKS,
        }
    }
}

impl Config {
    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).context("invalid config TOML")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.max_divisions < MIN_DIVISIONS {
            bail!("max_divisions must be at least {MIN_DIVISIONS}");
        }
        BlockCount::new(self.total_blocks)
            .map_err(|e| anyhow::anyhow!("total_blocks: {e}"))?;
        Ok(())
    }

    pub fn blocks(&self) -> pie_core::Result<BlockCount> {
        BlockCount::new(self.total_blocks)
    }
}

fn default_config_path() -> Option<PathBuf> {
    env::var("HOME")
        .or_else(|_| env::var("USERPROFILE"))
        .ok()
        .map(|home| PathBuf::from(home).join(".config").join("pie").join("pie.toml"))
}

/// The file to read, if any. Explicit sources must exist; the default
/// location is only used when present.
pub fn resolve_config_path(override_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = override_path {
        return Some(path.to_path_buf());
    }
    if let Ok(path) = env::var("PIE_CONFIG")
        && !path.is_empty()
    {
        return Some(PathBuf::from(path));
    }
    default_config_path().filter(|p| p.is_file())
}

pub fn load(override_path: Option<&Path>) -> Result<Config> {
    let Some(path) = resolve_config_path(override_path) else {
        tracing::debug!("no config file, using defaults");
        return Ok(Config::default());
    };
    let content = fs::read_to_string(&path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config =
        Config::parse(&content).with_context(|| format!("in config {}", path.display()))?;
    tracing::debug!(path = %path.display(), ?config, "loaded config");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.max_divisions, 12);
        assert_eq!(config.blocks().unwrap().get(), 40);
    }

    #[test]
    fn test_overrides() {
        let config = Config::parse("max_divisions = 24\ntotal_blocks = 60\n").unwrap();
        assert_eq!(config.max_divisions, 24);
        assert_eq!(config.total_blocks, 60);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(Config::parse("max_divisions = 0").is_err());
        assert!(Config::parse("total_blocks = 500").is_err());
        assert!(Config::parse("colour = \"red\"").is_err());
        assert!(Config::parse("max_divisions = \"twelve\"").is_err());
    }

    #[test]
    fn test_explicit_path_must_exist() {
        let missing = std::env::temp_dir().join("pie-config-test-missing.toml");
        assert!(load(Some(&missing)).is_err());
    }
}
