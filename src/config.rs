//! Manager configuration.
//!
//! Compile-time limits live in [`limits`]. Runtime knobs live in
//! [`ManagerConfig`], which is layered with figment: built-in defaults, then an
//! optional TOML file, then `PICO_*` environment variables.

pub mod limits;

use std::path::Path;

use anyhow::Context;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

use crate::AnyResult;

/// How the load scheduler picks the offset of a module it is about to place.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementStrategy {
    /// Recompute the running offset by replaying every placed entry in catalog
    /// order. Desynchronizes from the real layout once a placed module has been
    /// removed and later modules are loaded.
    Replay,
    /// Keep a bump cursor over the executable region and place new modules
    /// after it. Removed modules still leave their gap behind.
    #[default]
    HighWater,
}

/// Extra final padding granted to the executable region of a duplicated manager.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Headroom {
    /// `entry_count * inter_module_padding` of the source manager.
    #[default]
    PaddingPerEntry,
    /// A fixed number of bytes.
    Bytes(usize),
}

impl Headroom {
    /// Final padding for a manager holding `count` entries.
    pub fn final_padding(self, count: usize, inter_module_padding: usize) -> usize {
        match self {
            Headroom::PaddingPerEntry => count.saturating_mul(inter_module_padding),
            Headroom::Bytes(bytes) => bytes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagerConfig {
    #[serde(default = "default_capacity")]
    pub capacity: usize,
    #[serde(default)]
    pub inter_module_padding: usize,
    #[serde(default)]
    pub placement: PlacementStrategy,
    #[serde(default)]
    pub migration_headroom: Headroom,
}

fn default_capacity() -> usize {
    limits::DEFAULT_CAPACITY
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
            inter_module_padding: 0,
            placement: PlacementStrategy::default(),
            migration_headroom: Headroom::default(),
        }
    }
}

impl ManagerConfig {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }

    pub fn padding(mut self, inter_module_padding: usize) -> Self {
        self.inter_module_padding = inter_module_padding;
        self
    }

    pub fn placement(mut self, placement: PlacementStrategy) -> Self {
        self.placement = placement;
        self
    }

    pub fn headroom(mut self, headroom: Headroom) -> Self {
        self.migration_headroom = headroom;
        self
    }

    /// Figment stack: defaults, `path` (if it exists), then `PICO_*` variables.
    pub fn figment(path: impl AsRef<Path>) -> Figment {
        Figment::from(Serialized::defaults(ManagerConfig::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed("PICO_"))
    }

    /// Loads the configuration from `path` and the environment.
    pub fn load(path: impl AsRef<Path>) -> AnyResult<Self> {
        let path = path.as_ref();
        let config: ManagerConfig = Self::figment(path)
            .extract()
            .with_context(|| format!("Failed to load manager config from {}", path.display()))?;
        anyhow::ensure!(config.capacity > 0, "capacity must be positive");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn defaults_without_file() {
        Jail::expect_with(|_jail| {
            let config = ManagerConfig::load("missing.toml").map_err(|e| e.to_string())?;
            assert_eq!(config, ManagerConfig::default());
            assert_eq!(config.capacity, limits::DEFAULT_CAPACITY);
            Ok(())
        });
    }

    #[test]
    fn file_then_env_override() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "pico.toml",
                r#"
                capacity = 4
                inter_module_padding = 16
                placement = "replay"
                migration_headroom = { bytes = 4096 }
                "#,
            )?;
            jail.set_env("PICO_INTER_MODULE_PADDING", 32);

            let config = ManagerConfig::load("pico.toml").map_err(|e| e.to_string())?;
            assert_eq!(config.capacity, 4);
            assert_eq!(config.inter_module_padding, 32);
            assert_eq!(config.placement, PlacementStrategy::Replay);
            assert_eq!(config.migration_headroom, Headroom::Bytes(4096));
            Ok(())
        });
    }

    #[test]
    fn zero_capacity_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file("pico.toml", "capacity = 0")?;
            assert!(ManagerConfig::load("pico.toml").is_err());
            Ok(())
        });
    }

    #[test]
    fn headroom_budget() {
        assert_eq!(Headroom::PaddingPerEntry.final_padding(3, 16), 48);
        assert_eq!(Headroom::Bytes(100).final_padding(3, 16), 100);
    }
}
