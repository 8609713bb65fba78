#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic wave manager responsible for spawn cadence and escalation.
//!
//! The manager never constructs enemies itself. Each successful spawn yields a
//! [`SpawnOrder`] carrying the wave-derived multipliers, and the world turns
//! that order into an enemy placed at the start of its path.

use tower_defense_core::WaveConfig;
use tracing::debug;

/// Stat multipliers the world applies to the next spawned enemy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnOrder {
    /// Wave the enemy belongs to.
    pub wave: u32,
    /// Factor applied to the base enemy speed.
    pub speed_multiplier: f32,
    /// Factor applied to the base enemy health and reward.
    pub health_multiplier: f32,
}

/// Tracks the active wave, how many enemies it still owes and when the next one spawns.
#[derive(Clone, Debug)]
pub struct WaveManager {
    wave: u32,
    enemies_per_wave: u32,
    remaining_to_spawn: u32,
    spawn_cooldown: u32,
    spawn_interval: u32,
    enemy_count_step: u32,
    speed_step: f32,
    health_step: f32,
}

impl WaveManager {
    /// Creates a manager positioned at the start of wave one.
    #[must_use]
    pub fn new(config: &WaveConfig) -> Self {
        Self {
            wave: 1,
            enemies_per_wave: config.initial_enemy_count,
            remaining_to_spawn: config.initial_enemy_count,
            spawn_cooldown: 0,
            spawn_interval: config.spawn_interval,
            enemy_count_step: config.enemy_count_step,
            speed_step: config.speed_step,
            health_step: config.health_step,
        }
    }

    /// Number of the active wave, starting at one.
    #[must_use]
    pub const fn wave(&self) -> u32 {
        self.wave
    }

    /// Enemies the active wave spawns in total.
    #[must_use]
    pub const fn enemies_per_wave(&self) -> u32 {
        self.enemies_per_wave
    }

    /// Enemies the active wave has yet to spawn.
    #[must_use]
    pub const fn remaining_to_spawn(&self) -> u32 {
        self.remaining_to_spawn
    }

    /// Ticks left before the next spawn is permitted.
    #[must_use]
    pub const fn spawn_cooldown(&self) -> u32 {
        self.spawn_cooldown
    }

    /// Counts the spawn cooldown down by one tick, stopping at zero.
    pub fn tick(&mut self) {
        self.spawn_cooldown = self.spawn_cooldown.saturating_sub(1);
    }

    /// Emits a spawn order when the wave still owes enemies and the cooldown elapsed.
    pub fn maybe_spawn(&mut self) -> Option<SpawnOrder> {
        if self.remaining_to_spawn == 0 || self.spawn_cooldown > 0 {
            return None;
        }

        self.spawn_cooldown = self.spawn_interval;
        self.remaining_to_spawn -= 1;
        Some(self.spawn_order())
    }

    /// Reports whether the wave is finished: nothing left to spawn and the field is empty.
    #[must_use]
    pub const fn is_wave_clear(&self, live_enemy_count: usize) -> bool {
        self.remaining_to_spawn == 0 && live_enemy_count == 0
    }

    /// Moves to the next wave, growing its enemy count.
    pub fn advance_wave(&mut self) {
        self.wave = self.wave.saturating_add(1);
        self.enemies_per_wave = self.enemies_per_wave.saturating_add(self.enemy_count_step);
        self.remaining_to_spawn = self.enemies_per_wave;
        debug!(
            wave = self.wave,
            enemies = self.enemies_per_wave,
            "wave advanced"
        );
    }

    fn spawn_order(&self) -> SpawnOrder {
        let waves_survived = self.wave.saturating_sub(1) as f32;
        SpawnOrder {
            wave: self.wave,
            speed_multiplier: 1.0 + waves_survived * self.speed_step,
            health_multiplier: 1.0 + waves_survived * self.health_step,
        }
    }
}
