//! Ladder and simulation configuration.
//!
//! Plain serde structs so a driver can keep its grid of ladders in TOML:
//!
//! ```toml
//! [ladder]
//! rank_original = 4
//! win_for_rankup = 5
//! lose_for_rankdown = 3
//!
//! [simulation]
//! samples = 10001
//! match_ceiling = 5000
//! seed = 7
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{LadderError, Result};

/// Shape of the ladder: how many tiers to climb and the two streak thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LadderConfig {
    /// Starting tier; tier 0 is the target.
    pub rank_original: u32,
    /// Points needed, counting up from 0, to promote one tier.
    pub win_for_rankup: u32,
    /// Consecutive losses, counting down from 0, that demote one tier.
    pub lose_for_rankdown: u32,
}

impl LadderConfig {
    /// Five tiers, four points per promotion, three-loss demotion.
    pub fn diamond() -> Self {
        Self { rank_original: 5, win_for_rankup: 4, lose_for_rankdown: 3 }
    }

    /// Four tiers, five points per promotion, three-loss demotion.
    pub fn master() -> Self {
        Self { rank_original: 4, win_for_rankup: 5, lose_for_rankdown: 3 }
    }

    pub fn validate(&self) -> Result<()> {
        if self.win_for_rankup == 0 {
            return Err(LadderError::InvalidThreshold {
                name: "win_for_rankup",
                value: self.win_for_rankup,
            });
        }
        if self.lose_for_rankdown == 0 {
            return Err(LadderError::InvalidThreshold {
                name: "lose_for_rankdown",
                value: self.lose_for_rankdown,
            });
        }
        Ok(())
    }
}

impl Default for LadderConfig {
    fn default() -> Self {
        Self::diamond()
    }
}

/// Monte Carlo knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Independent runs to sample.
    pub samples: usize,
    /// Most matches a single run may play before it is right-censored.
    pub match_ceiling: u32,
    /// Master seed; run `i` draws from a stream derived from `(seed, i)`.
    pub seed: u64,
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<()> {
        if self.samples == 0 {
            return Err(LadderError::InvalidSampleCount { samples: self.samples });
        }
        if self.match_ceiling == 0 {
            return Err(LadderError::InvalidCeiling { ceiling: self.match_ceiling });
        }
        Ok(())
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self { samples: 10_001, match_ceiling: 5_000, seed: 42 }
    }
}

/// Both sections together, as read from a file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub ladder: LadderConfig,
    pub simulation: SimulationConfig,
}

impl Settings {
    /// Parse and validate. Missing sections fall back to their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let settings: Settings = toml::from_str(s)?;
        settings.ladder.validate()?;
        settings.simulation.validate()?;
        Ok(settings)
    }
}
