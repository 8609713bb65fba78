//! Enemy state, movement along the path and the live-enemy roster.

use std::collections::BTreeMap;

use tower_defense_core::{EnemyConfig, EnemyId, EnemySnapshot, PixelPoint};
use tower_defense_system_spawning::SpawnOrder;

use crate::path::Path;

/// Single enemy walking the path.
#[derive(Clone, Debug)]
pub(crate) struct Enemy {
    id: EnemyId,
    position: PixelPoint,
    path_index: usize,
    final_index: usize,
    speed: f32,
    health: f32,
    max_health: f32,
    reward: u32,
}

impl Enemy {
    /// Builds an enemy on the entry cell with stats scaled by the spawn order.
    pub(crate) fn spawn(id: EnemyId, path: &Path, base: &EnemyConfig, order: SpawnOrder) -> Self {
        let max_health = base.health * order.health_multiplier;
        Self {
            id,
            position: path.start(),
            path_index: 0,
            final_index: path.final_index(),
            speed: base.speed * order.speed_multiplier,
            health: max_health,
            max_health,
            reward: (base.reward as f32 * order.health_multiplier).round() as u32,
        }
    }

    pub(crate) fn id(&self) -> EnemyId {
        self.id
    }

    pub(crate) fn position(&self) -> PixelPoint {
        self.position
    }

    pub(crate) fn reward(&self) -> u32 {
        self.reward
    }

    /// Moves one tick toward the next waypoint.
    ///
    /// When the waypoint is closer than one speed step the enemy snaps onto it
    /// and the leftover distance is dropped.
    pub(crate) fn advance(&mut self, path: &Path) {
        if self.has_reached_end() {
            return;
        }

        let Some(next) = path.waypoint(self.path_index + 1) else {
            return;
        };

        if self.position.distance_to(next) < self.speed {
            self.position = next;
            self.path_index += 1;
        } else {
            self.position = self.position.step_toward(next, self.speed);
        }
    }

    /// Subtracts damage; health may drop below zero.
    pub(crate) fn apply_damage(&mut self, amount: f32) {
        self.health -= amount;
    }

    pub(crate) fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    pub(crate) fn has_reached_end(&self) -> bool {
        self.path_index == self.final_index
    }

    pub(crate) fn health_ratio(&self) -> f32 {
        if self.max_health <= 0.0 {
            return 0.0;
        }
        (self.health / self.max_health).clamp(0.0, 1.0)
    }

    pub(crate) fn snapshot(&self) -> EnemySnapshot {
        EnemySnapshot {
            id: self.id,
            position: self.position,
            path_index: self.path_index,
            health: self.health,
            max_health: self.max_health,
            health_ratio: self.health_ratio(),
            speed: self.speed,
        }
    }
}

/// Live enemies keyed by identifier. Identifiers grow monotonically, so
/// iteration order is spawn order.
#[derive(Debug)]
pub(crate) struct EnemyRoster {
    entries: BTreeMap<EnemyId, Enemy>,
    next_enemy_id: EnemyId,
}

impl EnemyRoster {
    /// Creates an empty roster with a reset identifier counter.
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_enemy_id: EnemyId::new(0),
        }
    }

    /// Spawns an enemy from the order and returns a reference to it.
    pub(crate) fn spawn(&mut self, path: &Path, base: &EnemyConfig, order: SpawnOrder) -> &Enemy {
        let id = self.next_enemy_id;
        self.next_enemy_id = id.next();
        self.entries
            .entry(id)
            .or_insert_with(|| Enemy::spawn(id, path, base, order))
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn get(&self, id: EnemyId) -> Option<&Enemy> {
        self.entries.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: EnemyId) -> Option<&mut Enemy> {
        self.entries.get_mut(&id)
    }

    /// Iterates enemies in spawn order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &Enemy> {
        self.entries.values()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Enemy> {
        self.entries.values_mut()
    }

    /// Removes every enemy matching the predicate and returns them in spawn order.
    pub(crate) fn remove_where(&mut self, mut predicate: impl FnMut(&Enemy) -> bool) -> Vec<Enemy> {
        let doomed: Vec<EnemyId> = self
            .entries
            .values()
            .filter(|enemy| predicate(enemy))
            .map(Enemy::id)
            .collect();

        doomed
            .into_iter()
            .filter_map(|id| self.entries.remove(&id))
            .collect()
    }
}
