//! Simulation configuration.
//!
//! All fields have defaults matching the reference skirmish: a 10-step
//! budget, Player at 3 HP, Enemy at 1 HP, 1 point of damage per attack and a
//! one-second pause between steps.
//!
//! # Example
//!
//! ```
//! use skirmish_core::config::SimulationConfig;
//!
//! let config = SimulationConfig::from_json_str(r#"{ "steps": 4, "pacing": false }"#).unwrap();
//! assert_eq!(config.steps, 4);
//! assert_eq!(config.player_hp, 3);
//! assert!(config.step_delay().is_none());
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::actor::ActorId;
use crate::error::ConfigError;

/// Configuration for a [`Simulation`](crate::simulation::Simulation).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Step budget.
    pub steps: u32,
    /// Player starting health.
    pub player_hp: i32,
    /// Enemy starting health.
    pub enemy_hp: i32,
    /// Damage dealt by every attack.
    pub attack_damage: i32,
    /// Pause between steps, in milliseconds.
    pub step_delay_ms: u64,
    /// Whether to pause between steps at all.
    pub pacing: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            steps: 10,
            player_hp: 3,
            enemy_hp: 1,
            attack_damage: 1,
            step_delay_ms: 1000,
            pacing: true,
        }
    }
}

impl SimulationConfig {
    /// Parses a JSON document; missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Parse`] on malformed JSON, or any validation error.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Default configuration with pacing disabled.
    #[must_use]
    pub fn unpaced() -> Self {
        Self {
            pacing: false,
            ..Default::default()
        }
    }

    /// Returns a copy with a different step budget.
    #[must_use]
    pub fn with_steps(mut self, steps: u32) -> Self {
        self.steps = steps;
        self
    }

    /// Returns a copy with different starting health.
    #[must_use]
    pub fn with_health(mut self, player_hp: i32, enemy_hp: i32) -> Self {
        self.player_hp = player_hp;
        self.enemy_hp = enemy_hp;
        self
    }

    /// Returns a copy with pacing switched on or off.
    #[must_use]
    pub fn with_pacing(mut self, pacing: bool) -> Self {
        self.pacing = pacing;
        self
    }

    /// Pause to take between steps, or `None` when pacing is off.
    #[must_use]
    pub fn step_delay(&self) -> Option<Duration> {
        (self.pacing && self.step_delay_ms > 0).then(|| Duration::from_millis(self.step_delay_ms))
    }

    /// Checks the configuration for values that make a run meaningless.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::ZeroSteps`] when `steps == 0`
    /// - [`ConfigError::NonPositiveHealth`] when a side starts defeated
    /// - [`ConfigError::NonPositiveDamage`] when attacks would not hurt
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.steps == 0 {
            return Err(ConfigError::ZeroSteps);
        }
        for (actor, hp) in [
            (ActorId::Player, self.player_hp),
            (ActorId::Enemy, self.enemy_hp),
        ] {
            if hp <= 0 {
                return Err(ConfigError::NonPositiveHealth { actor, hp });
            }
        }
        if self.attack_damage <= 0 {
            return Err(ConfigError::NonPositiveDamage(self.attack_damage));
        }
        Ok(())
    }
}
