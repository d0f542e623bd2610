use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ConfigError;
use crate::workflows::quote::domain::Difficulty;

/// Adjustment applied when a tier has no configured entry.
pub const DEFAULT_DIFFICULTY_ADJUST: f64 = 2.0;

/// Static tunables for the fair-range computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeConfig {
    pub base_fee: f64,
    pub difficulty_adjust: BTreeMap<Difficulty, f64>,
    pub range_offset: f64,
    pub min_floor: f64,
}

impl FeeConfig {
    pub fn new(
        base_fee: f64,
        difficulty_adjust: BTreeMap<Difficulty, f64>,
        range_offset: f64,
        min_floor: f64,
    ) -> Result<Self, ConfigError> {
        if !range_offset.is_finite() || range_offset < 0.0 {
            return Err(ConfigError::InvalidRangeOffset(range_offset));
        }
        ensure_finite("baseFee", base_fee)?;
        ensure_finite("minFloor", min_floor)?;
        for (tier, adjust) in &difficulty_adjust {
            ensure_finite(&format!("difficultyAdjust.{tier}"), *adjust)?;
        }

        Ok(Self {
            base_fee,
            difficulty_adjust,
            range_offset,
            min_floor,
        })
    }

    pub fn standard() -> Self {
        Self {
            base_fee: 8.0,
            difficulty_adjust: BTreeMap::from([
                (Difficulty::Low, 0.0),
                (Difficulty::Medium, 2.0),
                (Difficulty::High, 4.0),
            ]),
            range_offset: 2.0,
            min_floor: 6.0,
        }
    }

    /// Adjustment for a tier, falling back to [`DEFAULT_DIFFICULTY_ADJUST`].
    pub fn adjustment_for(&self, difficulty: Option<Difficulty>) -> f64 {
        match difficulty.and_then(|tier| self.difficulty_adjust.get(&tier)) {
            Some(adjust) => *adjust,
            None => {
                debug!(?difficulty, "difficulty lookup missed; using fallback adjustment");
                DEFAULT_DIFFICULTY_ADJUST
            }
        }
    }
}

fn ensure_finite(name: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFiniteTunable {
            name: name.to_string(),
            value,
        })
    }
}

impl Default for FeeConfig {
    fn default() -> Self {
        Self::standard()
    }
}
