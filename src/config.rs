use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::engine::categories::DEFAULT_CATEGORIES;

pub const MIN_TARGET_ROUNDS: u32 = 1;
pub const MAX_TARGET_ROUNDS: u32 = 20;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_target_rounds")]
    pub target_rounds: u32,
    #[serde(default = "default_finish_screen")]
    pub finish_screen: bool,
    #[serde(default = "default_categories")]
    pub categories: Vec<String>,
    #[serde(default = "default_hold_duration_ms")]
    pub hold_duration_ms: u64,
    #[serde(default = "default_hold_tick_ms")]
    pub hold_tick_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    #[serde(default = "default_theme")]
    pub theme: String,
}

fn default_target_rounds() -> u32 {
    5
}
fn default_finish_screen() -> bool {
    true
}
fn default_categories() -> Vec<String> {
    DEFAULT_CATEGORIES.iter().map(|s| s.to_string()).collect()
}
fn default_hold_duration_ms() -> u64 {
    600
}
fn default_hold_tick_ms() -> u64 {
    20
}
fn default_theme() -> String {
    "default".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target_rounds: default_target_rounds(),
            finish_screen: default_finish_screen(),
            categories: default_categories(),
            hold_duration_ms: default_hold_duration_ms(),
            hold_tick_ms: default_hold_tick_ms(),
            seed: None,
            theme: default_theme(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)?;
            let mut config: Config = toml::from_str(&content)?;
            config.normalize();
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("basta")
    }

    pub fn hold_duration(&self) -> Duration {
        Duration::from_millis(self.hold_duration_ms)
    }

    pub fn hold_tick(&self) -> Duration {
        Duration::from_millis(self.hold_tick_ms)
    }

    /// Repairs values a hand-edited file may have pushed out of range.
    pub fn normalize(&mut self) {
        let clamped = self.target_rounds.clamp(MIN_TARGET_ROUNDS, MAX_TARGET_ROUNDS);
        if clamped != self.target_rounds {
            warn!(from = self.target_rounds, to = clamped, "target_rounds out of range");
            self.target_rounds = clamped;
        }

        let mut categories: Vec<String> = Vec::with_capacity(self.categories.len());
        for label in &self.categories {
            let label = label.trim();
            if !label.is_empty() && !categories.iter().any(|c| c == label) {
                categories.push(label.to_string());
            }
        }
        if categories.is_empty() {
            warn!("no usable categories configured, using defaults");
            categories = default_categories();
        }
        self.categories = categories;

        if self.hold_tick_ms == 0 {
            self.hold_tick_ms = 1;
        }
        if self.hold_duration_ms < self.hold_tick_ms {
            warn!(
                duration_ms = self.hold_duration_ms,
                tick_ms = self.hold_tick_ms,
                "hold duration shorter than one tick"
            );
            self.hold_duration_ms = self.hold_tick_ms;
        }
    }
}
