//! Bot configuration.
//!
//! Every tunable threshold lives here. All fields have defaults, so an empty
//! TOML file (or no file at all) yields a working configuration.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::catalog::schedule::RoundId;

/// Errors that can occur while loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Delays, budgets and retry counts.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Planning time of an ordinary round.
    pub planning_budget_secs: u64,
    /// Planning time of a PvP round that opens with an augment pick.
    pub augment_pvp_budget_secs: u64,
    /// Time that must remain for movement and items in PvE rounds.
    pub pve_margin_secs: u64,
    pub pvp_margin_secs: u64,
    /// Delay between the pick-up and put-down clicks of a move.
    pub move_sync_ms: u64,
    pub unknown_sync_ms: u64,
    /// Settle time after a purchase before the bench is re-read.
    pub settle_ms: u64,
    pub buy_ms: u64,
    pub perception_retries: u32,
    pub perception_retry_ms: u64,
    pub loop_sleep_ms: u64,
    /// Polls of the alive check after health reads zero.
    pub death_polls: u32,
    pub death_poll_ms: u64,
    pub victory_wait_ms: u64,
    /// Leveling stops once the round is this old.
    pub level_up_stop_secs: u64,
    /// Waits for a blank shop during encounter animations.
    pub shop_empty_retries: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        TimingConfig {
            planning_budget_secs: 30,
            augment_pvp_budget_secs: 50,
            pve_margin_secs: 5,
            pvp_margin_secs: 3,
            move_sync_ms: 180,
            unknown_sync_ms: 100,
            settle_ms: 500,
            buy_ms: 200,
            perception_retries: 3,
            perception_retry_ms: 250,
            loop_sleep_ms: 500,
            death_polls: 15,
            death_poll_ms: 1000,
            victory_wait_ms: 8000,
            level_up_stop_secs: 10,
            shop_empty_retries: 15,
        }
    }
}

impl TimingConfig {
    pub fn planning_budget(&self, augment_pvp: bool) -> Duration {
        if augment_pvp {
            Duration::from_secs(self.augment_pvp_budget_secs)
        } else {
            Duration::from_secs(self.planning_budget_secs)
        }
    }
}

/// Thresholds of the roster and item policies.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Finished items below which two-component crafting is allowed.
    pub craft_slack: usize,
    /// Health at or below which rerolling switches to the low floor.
    pub spam_roll_health: i32,
    /// Health at or below which leftover inventory is dumped on the board.
    pub dump_health: i32,
    /// Inventory size that forces item placement outside placement rounds.
    pub item_flood: usize,
    pub max_rerolls: u32,
    pub gold_floor: u32,
    pub gold_floor_speedy: u32,
    pub gold_floor_spam: u32,
    pub xp_cost: u32,
    /// Carousel round from which final-composition swaps run.
    pub final_comp_round: RoundId,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        PolicyConfig {
            craft_slack: 3,
            spam_roll_health: 30,
            dump_health: 15,
            item_flood: 8,
            max_rerolls: 40,
            gold_floor: 52,
            gold_floor_speedy: 100,
            gold_floor_spam: 20,
            xp_cost: 4,
            final_comp_round: RoundId::new(3, 4),
        }
    }
}

/// Early surrender.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ForfeitConfig {
    pub enabled: bool,
    pub after_secs: u64,
    pub jitter_min_secs: u64,
    pub jitter_max_secs: u64,
}

impl Default for ForfeitConfig {
    fn default() -> Self {
        ForfeitConfig { enabled: false, after_secs: 600, jitter_min_secs: 50, jitter_max_secs: 150 }
    }
}

/// Augment and portal preferences shared by every composition.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ChoiceConfig {
    /// Backup augments tried after the composition's own list.
    pub augments: Vec<String>,
    pub avoid_augments: Vec<String>,
    pub portals: Vec<String>,
    pub avoid_portals: Vec<String>,
    /// Region portals that fill the bench with anvils on 1-3.
    pub anvil_portals: Vec<String>,
}

impl Default for ChoiceConfig {
    fn default() -> Self {
        let owned = |list: &[&str]| list.iter().map(|s| s.to_string()).collect();
        ChoiceConfig {
            augments: owned(&[
                "Component Grab Bag",
                "Pandora's Items",
                "Featherweights",
                "Rich Get Richer",
                "Jeweled Lotus",
                "Tiny Titans",
            ]),
            avoid_augments: owned(&["Blank Slate", "Cybernetic Implants", "Bastion Heart"]),
            portals: owned(&["Completed Anvil", "Component Anvils", "Treasure Trove"]),
            avoid_portals: owned(&["Scuttle Puddle", "Training Dummy"]),
            anvil_portals: owned(&[
                "Artifact Anvil",
                "Completed Anvil",
                "Component Anvils",
                "Support Anvil",
                "Tome of Traits",
            ]),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    /// Composition to play; the first catalog entry when unset.
    pub comp: Option<String>,
    pub timing: TimingConfig,
    pub policy: PolicyConfig,
    pub forfeit: ForfeitConfig,
    pub choices: ChoiceConfig,
}

impl BotConfig {
    /// Loads a configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let data = fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        Self::from_toml(&data)
    }

    pub fn from_toml(s: &str) -> Result<Self, ConfigError> {
        let config: BotConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.timing;
        if t.pve_margin_secs >= t.planning_budget_secs || t.pvp_margin_secs >= t.planning_budget_secs {
            return Err(ConfigError::Invalid(
                "safety margins must be shorter than the planning budget".to_string(),
            ));
        }
        if self.forfeit.jitter_min_secs > self.forfeit.jitter_max_secs {
            return Err(ConfigError::Invalid(format!(
                "forfeit jitter range {}..{} is empty",
                self.forfeit.jitter_min_secs, self.forfeit.jitter_max_secs
            )));
        }
        Ok(())
    }
}
