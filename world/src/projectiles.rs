//! Homing projectiles and the in-flight collection.

use tower_defense_core::{EnemyId, PixelPoint, ProjectileId, ProjectileSnapshot};

use crate::enemies::EnemyRoster;

/// Result of moving a projectile for one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Flight {
    /// Still travelling.
    InFlight,
    /// Reached its target; damage is applied by the caller.
    Hit,
    /// The target vanished or died first; the projectile is dropped harmlessly.
    Miss,
}

/// Projectile homing on an enemy through a weak identifier handle.
#[derive(Clone, Debug)]
pub(crate) struct Projectile {
    id: ProjectileId,
    position: PixelPoint,
    target: EnemyId,
    speed: f32,
    damage: f32,
}

impl Projectile {
    pub(crate) fn new(
        id: ProjectileId,
        position: PixelPoint,
        target: EnemyId,
        speed: f32,
        damage: f32,
    ) -> Self {
        Self {
            id,
            position,
            target,
            speed,
            damage,
        }
    }

    pub(crate) fn id(&self) -> ProjectileId {
        self.id
    }

    pub(crate) fn target(&self) -> EnemyId {
        self.target
    }

    pub(crate) fn damage(&self) -> f32 {
        self.damage
    }

    /// Re-homes on the target's current position and moves one step.
    pub(crate) fn advance(&mut self, enemies: &EnemyRoster) -> Flight {
        let Some(target) = enemies.get(self.target).filter(|enemy| enemy.is_alive()) else {
            return Flight::Miss;
        };

        let destination = target.position();
        if self.position.distance_to(destination) < self.speed {
            return Flight::Hit;
        }

        self.position = self.position.step_toward(destination, self.speed);
        Flight::InFlight
    }

    pub(crate) fn snapshot(&self) -> ProjectileSnapshot {
        ProjectileSnapshot {
            id: self.id,
            position: self.position,
            target: self.target,
        }
    }
}

/// Projectiles in flight, kept in launch order.
#[derive(Debug)]
pub(crate) struct ProjectileSwarm {
    entries: Vec<Projectile>,
    next_projectile_id: ProjectileId,
}

impl ProjectileSwarm {
    pub(crate) fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_projectile_id: ProjectileId::new(0),
        }
    }

    /// Identifier the next launched projectile must carry.
    pub(crate) fn next_id(&self) -> ProjectileId {
        self.next_projectile_id
    }

    pub(crate) fn launch(&mut self, projectile: Projectile) {
        self.next_projectile_id = projectile.id().next();
        self.entries.push(projectile);
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Projectile> {
        self.entries.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Projectile> {
        self.entries.iter_mut()
    }

    /// Drops every projectile whose identifier appears in `spent`.
    pub(crate) fn discard(&mut self, spent: &[ProjectileId]) {
        if spent.is_empty() {
            return;
        }
        self.entries.retain(|projectile| !spent.contains(&projectile.id()));
    }
}
