//! Data-driven game balance
//!
//! Everything a designer may want to tweak without touching the systems.
//! Per-type enemy and weapon stats live on their enums; this covers the rest.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading a tuning file
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse tuning: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning value `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Player starting stats
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    /// Full width/height of the player box (px)
    pub size: f32,
    /// Pixels per nominal frame
    pub speed: f32,
    pub max_health: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            size: 60.0,
            speed: 8.0,
            max_health: 100.0,
        }
    }
}

/// Enemy spawn schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnTuning {
    /// Interval at one spawn per second (ms)
    pub base_interval_ms: f32,
    /// Every this much game time (ms) the spawn rate steps up by one per second
    pub ramp_period_ms: f32,
    /// Spawn rate saturates here
    pub max_spawns_per_second: u32,
    /// How far outside the screen edge enemies appear (px)
    pub edge_offset: f32,
    /// Game time (ms) after which `fast` enemies may spawn
    pub fast_unlock_ms: f32,
    /// Game time (ms) after which `tank` enemies may spawn
    pub tank_unlock_ms: f32,
}

impl Default for SpawnTuning {
    fn default() -> Self {
        Self {
            base_interval_ms: 1000.0,
            ramp_period_ms: 10_000.0,
            max_spawns_per_second: 3,
            edge_offset: 100.0,
            fast_unlock_ms: 60_000.0,
            tank_unlock_ms: 120_000.0,
        }
    }
}

/// Complete balance sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub player: PlayerTuning,
    pub spawn: SpawnTuning,
    pub projectile_radius: f32,
    pub pickup_radius: f32,
    /// Extra reach added to the absorb check (px)
    pub pickup_absorb_bonus: f32,
    /// Max-health multiplier granted by the generic boost option
    pub health_boost_factor: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player: PlayerTuning::default(),
            spawn: SpawnTuning::default(),
            projectile_radius: 8.0,
            pickup_radius: 10.0,
            pickup_absorb_bonus: 20.0,
            health_boost_factor: 1.2,
        }
    }
}

impl Tuning {
    /// Parse and validate a JSON tuning document. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load a tuning file from disk
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Check every value the systems divide by or clamp against
    pub fn validate(&self) -> Result<(), TuningError> {
        let positive = [
            ("player.size", self.player.size),
            ("player.max_health", self.player.max_health),
            ("spawn.base_interval_ms", self.spawn.base_interval_ms),
            ("spawn.ramp_period_ms", self.spawn.ramp_period_ms),
            ("projectile_radius", self.projectile_radius),
            ("pickup_radius", self.pickup_radius),
        ];
        for (field, value) in positive {
            if value.is_nan() || value <= 0.0 {
                return Err(TuningError::Invalid {
                    field,
                    reason: "must be greater than zero",
                });
            }
        }
        if self.player.speed < 0.0 {
            return Err(TuningError::Invalid {
                field: "player.speed",
                reason: "must not be negative",
            });
        }
        if self.spawn.max_spawns_per_second == 0 {
            return Err(TuningError::Invalid {
                field: "spawn.max_spawns_per_second",
                reason: "must be at least one",
            });
        }
        if self.spawn.tank_unlock_ms < self.spawn.fast_unlock_ms {
            return Err(TuningError::Invalid {
                field: "spawn.tank_unlock_ms",
                reason: "tanks must unlock after fast enemies",
            });
        }
        if self.health_boost_factor < 1.0 {
            return Err(TuningError::Invalid {
                field: "health_boost_factor",
                reason: "must not shrink max health",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "player": { "speed": 12.0 } }"#).unwrap();
        assert_eq!(tuning.player.speed, 12.0);
        assert_eq!(tuning.player.size, 60.0);
        assert_eq!(tuning.spawn, SpawnTuning::default());
        assert_eq!(tuning.pickup_absorb_bonus, 20.0);
    }

    #[test]
    fn test_rejects_bad_values() {
        let err = Tuning::from_json(r#"{ "spawn": { "max_spawns_per_second": 0 } }"#).unwrap_err();
        assert!(matches!(
            err,
            TuningError::Invalid {
                field: "spawn.max_spawns_per_second",
                ..
            }
        ));

        let err = Tuning::from_json(r#"{ "player": { "size": -5.0 } }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { field: "player.size", .. }));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = Tuning::from_json("{ not json").unwrap_err();
        assert!(matches!(err, TuningError::Parse(_)));
    }
}
