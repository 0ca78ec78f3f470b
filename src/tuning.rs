//! Data-driven game balance
//!
//! Every knob defaults to the matching constant in [`crate::consts`]. A JSON
//! file may override any subset of fields.

use anyhow::{Result, ensure};
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Balance parameters consumed by the simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Player horizontal speed (pixels per frame)
    pub player_speed: f32,
    /// Hitbox inset applied to player and villain boxes
    pub collision_padding: f32,
    /// Catches needed per level-up
    pub eats_per_level: u64,
    /// Lives at session start
    pub initial_lives: i32,

    // === Population ===
    /// Villains on screen at level 0
    pub villain_count_base: usize,
    /// Levels per extra villain
    pub villain_count_step: u32,
    /// Hard cap on simultaneous villains
    pub villain_count_cap: usize,

    // === Villain parameters ===
    pub villain_base_size: f32,
    /// Size varies uniformly within +/- this amount
    pub villain_size_jitter: f32,
    pub villain_base_speed: f32,
    /// Added to base speed for every level
    pub villain_speed_per_level: f32,
    /// Upper bound of the random speed addend, per level
    pub villain_speed_variance_per_level: f32,
    /// Maximum extra distance above the top edge at spawn
    pub villain_spawn_stagger: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player_speed: PLAYER_SPEED,
            collision_padding: COLLISION_PADDING,
            eats_per_level: EATS_PER_LEVEL,
            initial_lives: INITIAL_LIVES,

            villain_count_base: 3,
            villain_count_step: 5,
            villain_count_cap: 15,

            villain_base_size: VILLAIN_BASE_SIZE,
            villain_size_jitter: VILLAIN_SIZE_JITTER,
            villain_base_speed: 3.0,
            villain_speed_per_level: 0.15,
            villain_speed_variance_per_level: 0.05,
            villain_spawn_stagger: VILLAIN_SPAWN_STAGGER,
        }
    }
}

impl Tuning {
    /// Parse tuning overrides from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values the spawner cannot sample from
    pub fn validate(&self) -> Result<()> {
        let finite = [
            ("player_speed", self.player_speed),
            ("collision_padding", self.collision_padding),
            ("villain_base_size", self.villain_base_size),
            ("villain_size_jitter", self.villain_size_jitter),
            ("villain_base_speed", self.villain_base_speed),
            ("villain_speed_per_level", self.villain_speed_per_level),
            ("villain_speed_variance_per_level", self.villain_speed_variance_per_level),
            ("villain_spawn_stagger", self.villain_spawn_stagger),
        ];
        for (name, value) in finite {
            ensure!(value.is_finite(), "{name} must be finite, got {value}");
            ensure!(value >= 0.0, "{name} must not be negative, got {value}");
        }

        ensure!(
            self.villain_base_size > 0.0 && self.villain_base_size <= CANVAS_WIDTH,
            "villain_base_size must be in (0, {CANVAS_WIDTH}], got {}",
            self.villain_base_size
        );
        ensure!(
            self.villain_size_jitter < self.villain_base_size,
            "villain_size_jitter ({}) must be smaller than villain_base_size ({})",
            self.villain_size_jitter,
            self.villain_base_size
        );
        ensure!(
            self.villain_base_size + self.villain_size_jitter <= CANVAS_WIDTH,
            "villains would be wider than the playfield"
        );
        ensure!(self.initial_lives >= 1, "initial_lives must be at least 1");
        Ok(())
    }

    /// Load tuning from a JSON file (native only)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: &std::path::Path) -> Result<Self> {
        use anyhow::Context;

        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let tuning = Self::from_json(&json)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        log::info!("Loaded tuning overrides from {}", path.display());
        Ok(tuning)
    }
}
