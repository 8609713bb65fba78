//! Authoritative tower state management utilities.

use std::collections::BTreeMap;

use tower_defense_core::{CellCoord, PixelPoint, ProjectileId, TowerConfig, TowerId, TowerSnapshot};

use crate::{enemies::Enemy, projectiles::Projectile};

/// Tower standing on a single grid cell.
#[derive(Clone, Debug)]
pub(crate) struct Tower {
    id: TowerId,
    cell: CellCoord,
    center: PixelPoint,
    level: u32,
    range: f32,
    damage: f32,
    fire_rate: u32,
    cooldown: u32,
}

impl Tower {
    /// Builds a level one tower ready to fire on its first tick.
    pub(crate) fn new(id: TowerId, cell: CellCoord, cell_size: f32, stats: &TowerConfig) -> Self {
        Self {
            id,
            cell,
            center: cell.center(cell_size),
            level: 1,
            range: stats.range,
            damage: stats.damage,
            fire_rate: stats.fire_rate,
            cooldown: 0,
        }
    }

    pub(crate) fn id(&self) -> TowerId {
        self.id
    }

    pub(crate) fn level(&self) -> u32 {
        self.level
    }

    pub(crate) fn is_at_cell(&self, cell: CellCoord) -> bool {
        self.cell == cell
    }

    /// Picks the first living enemy, in the order supplied, within range.
    ///
    /// This is deliberately not the nearest enemy.
    pub(crate) fn acquire_target<'a>(
        &self,
        enemies: impl IntoIterator<Item = &'a Enemy>,
    ) -> Option<&'a Enemy> {
        enemies.into_iter().find(|enemy| {
            enemy.is_alive() && self.center.distance_to(enemy.position()) <= self.range
        })
    }

    /// Fires at the target when the cooldown elapsed.
    pub(crate) fn try_fire(
        &mut self,
        projectile: ProjectileId,
        target: &Enemy,
        speed: f32,
    ) -> Option<Projectile> {
        if self.cooldown > 0 {
            return None;
        }

        self.cooldown = self.fire_rate;
        Some(Projectile::new(
            projectile,
            self.center,
            target.id(),
            speed,
            self.damage,
        ))
    }

    pub(crate) fn tick_cooldown(&mut self) {
        self.cooldown = self.cooldown.saturating_sub(1);
    }

    /// Raises the level by one, applying the per-level deltas. Fails at the cap.
    pub(crate) fn upgrade(&mut self, stats: &TowerConfig) -> bool {
        if self.level >= stats.max_level {
            return false;
        }

        self.level += 1;
        self.range += stats.range_step;
        self.damage += stats.damage_step;
        self.fire_rate = self
            .fire_rate
            .saturating_sub(stats.fire_rate_step)
            .max(stats.min_fire_rate);
        true
    }

    /// Money refunded when the tower is sold: half the base cost per level.
    pub(crate) fn sell_value(&self, tower_cost: u32) -> u32 {
        let value = u64::from(tower_cost) * u64::from(self.level) / 2;
        u32::try_from(value).unwrap_or(u32::MAX)
    }

    pub(crate) fn snapshot(&self, selected: bool) -> TowerSnapshot {
        TowerSnapshot {
            id: self.id,
            cell: self.cell,
            center: self.center,
            level: self.level,
            range: self.range,
            damage: self.damage,
            fire_rate: self.fire_rate,
            cooldown: self.cooldown,
            selected,
        }
    }
}

/// Registry that stores towers and manages identifier allocation.
#[derive(Debug)]
pub(crate) struct TowerRegistry {
    entries: BTreeMap<TowerId, Tower>,
    next_tower_id: TowerId,
}

impl TowerRegistry {
    /// Creates an empty tower registry with a reset identifier counter.
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_tower_id: TowerId::new(0),
        }
    }

    /// Constructs a level one tower on the cell and returns its identifier.
    pub(crate) fn insert(
        &mut self,
        cell: CellCoord,
        cell_size: f32,
        stats: &TowerConfig,
    ) -> TowerId {
        let id = self.next_tower_id;
        self.next_tower_id = id.next();
        let _ = self.entries.insert(id, Tower::new(id, cell, cell_size, stats));
        id
    }

    pub(crate) fn tower_at(&self, cell: CellCoord) -> Option<TowerId> {
        self.entries
            .values()
            .find(|tower| tower.is_at_cell(cell))
            .map(Tower::id)
    }

    pub(crate) fn get_mut(&mut self, id: TowerId) -> Option<&mut Tower> {
        self.entries.get_mut(&id)
    }

    pub(crate) fn remove(&mut self, id: TowerId) -> Option<Tower> {
        self.entries.remove(&id)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Tower> {
        self.entries.values()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Tower> {
        self.entries.values_mut()
    }
}
