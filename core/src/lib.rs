#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the tower defense simulation.
//!
//! This crate defines the message surface that connects shells, the
//! authoritative world, and pure systems. Shells submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then reports what happened as [`Event`] values.
//! Presentation layers read a [`Snapshot`] and never mutate state directly.

mod config;
mod error;

pub use config::{Config, EconomyConfig, EnemyConfig, GridConfig, TowerConfig, WaveConfig};
pub use error::{CommandError, ConfigError, PlacementError};

use serde::{Deserialize, Serialize};

/// Describes the lifecycle phase the simulation is in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayState {
    /// Grace period before the first wave, reserved for initial placement.
    Pregame,
    /// Waves spawn and every entity advances once per tick.
    Running,
    /// Time is frozen until the pause is toggled again.
    Paused,
    /// Lives ran out; only a restart resumes play.
    GameOver,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Command {
    /// Requests construction of a level one tower on the provided cell.
    PlaceTower {
        /// Grid cell that should host the tower.
        cell: CellCoord,
    },
    /// Selects the tower standing on the provided cell, clearing the selection otherwise.
    SelectTowerAt {
        /// Grid cell the player clicked.
        cell: CellCoord,
    },
    /// Drops the current selection, if any.
    ClearSelection,
    /// Spends the upgrade cost to raise the selected tower by one level.
    UpgradeSelected,
    /// Removes the selected tower and refunds part of its value.
    SellSelected,
    /// Freezes or resumes simulated time.
    TogglePause,
    /// Rebuilds the session from configuration while keeping the high score.
    Restart,
    /// Signals that the shell should stop driving the simulation.
    Quit,
    /// Advances the simulation by exactly one discrete step.
    Tick,
}

impl Command {
    /// Reports the payload-free kind of the command.
    #[must_use]
    pub const fn kind(&self) -> CommandKind {
        match self {
            Self::PlaceTower { .. } => CommandKind::PlaceTower,
            Self::SelectTowerAt { .. } => CommandKind::SelectTowerAt,
            Self::ClearSelection => CommandKind::ClearSelection,
            Self::UpgradeSelected => CommandKind::UpgradeSelected,
            Self::SellSelected => CommandKind::SellSelected,
            Self::TogglePause => CommandKind::TogglePause,
            Self::Restart => CommandKind::Restart,
            Self::Quit => CommandKind::Quit,
            Self::Tick => CommandKind::Tick,
        }
    }
}

/// Payload-free discriminant of a [`Command`], used when reporting rejections.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommandKind {
    /// See [`Command::PlaceTower`].
    PlaceTower,
    /// See [`Command::SelectTowerAt`].
    SelectTowerAt,
    /// See [`Command::ClearSelection`].
    ClearSelection,
    /// See [`Command::UpgradeSelected`].
    UpgradeSelected,
    /// See [`Command::SellSelected`].
    SellSelected,
    /// See [`Command::TogglePause`].
    TogglePause,
    /// See [`Command::Restart`].
    Restart,
    /// See [`Command::Quit`].
    Quit,
    /// See [`Command::Tick`].
    Tick,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// Indicates that the simulation advanced one tick.
    TimeAdvanced {
        /// Index of the tick that just completed.
        tick: u64,
    },
    /// Announces a transition of the play state machine.
    PlayStateChanged {
        /// State that was active before the transition.
        from: PlayState,
        /// State that is active after the transition.
        to: PlayState,
    },
    /// Announces that a new wave became active.
    WaveStarted {
        /// Number of the wave that started.
        wave: u32,
        /// Enemies the wave will spawn in total.
        enemy_count: u32,
    },
    /// Confirms that an enemy entered the path.
    EnemySpawned {
        /// Identifier assigned to the enemy.
        enemy: EnemyId,
        /// Wave the enemy belongs to.
        wave: u32,
        /// Movement speed in pixels per tick.
        speed: f32,
        /// Starting and maximum health.
        max_health: f32,
    },
    /// Reports that an enemy walked off the final path cell.
    EnemyReachedEnd {
        /// Identifier of the enemy that escaped.
        enemy: EnemyId,
    },
    /// Reports that the player lost a life.
    LifeLost {
        /// Lives left after the loss.
        lives_remaining: u32,
    },
    /// Reports that an enemy died and paid out its reward.
    EnemyKilled {
        /// Identifier of the enemy that died.
        enemy: EnemyId,
        /// Money credited for the kill.
        reward: u32,
        /// Score credited for the kill.
        points: u32,
    },
    /// Confirms that a tower launched a projectile.
    ProjectileFired {
        /// Identifier of the projectile.
        projectile: ProjectileId,
        /// Tower that fired.
        tower: TowerId,
        /// Enemy the projectile homes on.
        target: EnemyId,
    },
    /// Confirms that a projectile struck its target.
    ProjectileHit {
        /// Identifier of the projectile.
        projectile: ProjectileId,
        /// Enemy that was struck.
        target: EnemyId,
        /// Damage applied to the enemy.
        damage: f32,
    },
    /// Reports that a projectile lost its target and vanished without damage.
    ProjectileDiscarded {
        /// Identifier of the projectile.
        projectile: ProjectileId,
        /// Enemy the projectile was chasing.
        target: EnemyId,
    },
    /// Confirms that a tower was placed into the world.
    TowerPlaced {
        /// Identifier assigned to the tower by the world.
        tower: TowerId,
        /// Cell hosting the tower.
        cell: CellCoord,
        /// Money spent on construction.
        cost: u32,
    },
    /// Reports the outcome of a selection request.
    TowerSelected {
        /// Tower that is now selected, or `None` when nothing was found.
        tower: Option<TowerId>,
    },
    /// Confirms that a tower gained a level.
    TowerUpgraded {
        /// Identifier of the upgraded tower.
        tower: TowerId,
        /// Level reached after the upgrade.
        level: u32,
        /// Money spent on the upgrade.
        cost: u32,
    },
    /// Confirms that a tower was sold.
    TowerSold {
        /// Identifier of the removed tower.
        tower: TowerId,
        /// Money credited back to the player.
        refund: u32,
    },
    /// Reports that a command was rejected without mutating state.
    CommandRejected {
        /// Kind of command that was rejected.
        command: CommandKind,
        /// Specific reason the command failed.
        reason: CommandError,
    },
    /// Announces that the last life was lost.
    GameOver {
        /// Final score of the session.
        score: u32,
        /// Best score observed since the process started.
        high_score: u32,
    },
    /// Confirms that the session was rebuilt from configuration.
    Restarted,
    /// Confirms that the shell asked the simulation to stop.
    QuitRequested,
}

macro_rules! identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        pub struct $name(u32);

        impl $name {
            /// Creates a new identifier with the provided numeric value.
            #[must_use]
            pub const fn new(value: u32) -> Self {
                Self(value)
            }

            /// Retrieves the numeric representation of the identifier.
            #[must_use]
            pub const fn get(&self) -> u32 {
                self.0
            }

            /// Returns the identifier allocated after this one.
            #[must_use]
            pub const fn next(self) -> Self {
                Self(self.0.wrapping_add(1))
            }
        }
    };
}

identifier!(
    /// Unique identifier assigned to an enemy. Ordering matches spawn order.
    EnemyId
);

identifier!(
    /// Unique identifier assigned to a tower.
    TowerId
);

identifier!(
    /// Unique identifier assigned to a projectile.
    ProjectileId
);

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }

    /// Converts the cell into the pixel-space point at its center.
    #[must_use]
    pub fn center(self, cell_size: f32) -> PixelPoint {
        PixelPoint::new(
            (self.column as f32 + 0.5) * cell_size,
            (self.row as f32 + 0.5) * cell_size,
        )
    }
}

/// Continuous position in the simulation's pixel space.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PixelPoint {
    /// Horizontal coordinate, growing to the right.
    pub x: f32,
    /// Vertical coordinate, growing downwards.
    pub y: f32,
}

impl PixelPoint {
    /// Creates a point from its coordinates.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance between two points.
    #[must_use]
    pub fn distance_to(self, other: PixelPoint) -> f32 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Moves `step` pixels from `self` toward `target`.
    ///
    /// The result overshoots when `step` exceeds the remaining distance, so
    /// callers decide when to snap onto the target instead.
    #[must_use]
    pub fn step_toward(self, target: PixelPoint, step: f32) -> PixelPoint {
        let distance = self.distance_to(target);
        if distance <= f32::EPSILON {
            return target;
        }

        let scale = step / distance;
        PixelPoint::new(
            self.x + (target.x - self.x) * scale,
            self.y + (target.y - self.y) * scale,
        )
    }
}

/// Immutable representation of a single enemy's state used for queries.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// Current position in pixel space.
    pub position: PixelPoint,
    /// Index of the last path waypoint the enemy reached.
    pub path_index: usize,
    /// Remaining health, possibly negative for an enemy killed this tick.
    pub health: f32,
    /// Health the enemy spawned with.
    pub max_health: f32,
    /// Remaining health as a fraction in `0.0..=1.0`.
    pub health_ratio: f32,
    /// Movement speed in pixels per tick.
    pub speed: f32,
}

/// Immutable representation of a single tower's state used for queries.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TowerSnapshot {
    /// Identifier allocated to the tower by the world.
    pub id: TowerId,
    /// Grid cell hosting the tower.
    pub cell: CellCoord,
    /// Pixel-space center of the tower's cell.
    pub center: PixelPoint,
    /// Current level, starting at one.
    pub level: u32,
    /// Targeting radius in pixels.
    pub range: f32,
    /// Damage carried by each projectile.
    pub damage: f32,
    /// Ticks between consecutive shots.
    pub fire_rate: u32,
    /// Ticks left before the tower may fire again.
    pub cooldown: u32,
    /// Whether the tower is the current selection.
    pub selected: bool,
}

/// Immutable representation of a projectile in flight.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProjectileSnapshot {
    /// Identifier allocated to the projectile.
    pub id: ProjectileId,
    /// Current position in pixel space.
    pub position: PixelPoint,
    /// Enemy the projectile homes on.
    pub target: EnemyId,
}

/// Complete read-only picture of the simulation for presentation layers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Number of ticks simulated since the session started.
    pub tick: u64,
    /// Active phase of the play state machine.
    pub play_state: PlayState,
    /// Number of the active wave, starting at one.
    pub wave: u32,
    /// Money available for construction and upgrades.
    pub money: u32,
    /// Lives left before the game ends.
    pub lives: u32,
    /// Score of the current session.
    pub score: u32,
    /// Best score observed since the process started.
    pub high_score: u32,
    /// Whether time is frozen.
    pub paused: bool,
    /// Whether the session ended.
    pub game_over: bool,
    /// Live enemies in spawn order.
    pub enemies: Vec<EnemySnapshot>,
    /// Placed towers in identifier order.
    pub towers: Vec<TowerSnapshot>,
    /// Projectiles in flight in identifier order.
    pub projectiles: Vec<ProjectileSnapshot>,
}

#[cfg(test)]
mod tests {
    use super::{CellCoord, Command, CommandError, CommandKind, EnemyId, PixelPoint, PlacementError};
    use serde::{de::DeserializeOwned, Serialize};

    #[test]
    fn manhattan_distance_matches_expectation() {
        let origin = CellCoord::new(1, 1);
        let destination = CellCoord::new(4, 3);
        assert_eq!(origin.manhattan_distance(destination), 5);
        assert_eq!(destination.manhattan_distance(origin), 5);
    }

    #[test]
    fn cell_center_lies_in_the_middle_of_the_cell() {
        let center = CellCoord::new(2, 3).center(40.0);
        assert_eq!(center, PixelPoint::new(100.0, 140.0));
    }

    #[test]
    fn step_toward_moves_the_requested_distance() {
        let start = PixelPoint::new(0.0, 0.0);
        let moved = start.step_toward(PixelPoint::new(30.0, 40.0), 5.0);
        assert!((moved.x - 3.0).abs() < 1e-5);
        assert!((moved.y - 4.0).abs() < 1e-5);
        assert!((start.distance_to(moved) - 5.0).abs() < 1e-5);
    }

    #[test]
    fn step_toward_coincident_point_is_stable() {
        let point = PixelPoint::new(7.0, 7.0);
        assert_eq!(point.step_toward(point, 3.0), point);
    }

    #[test]
    fn identifiers_allocate_sequentially() {
        let first = EnemyId::new(0);
        assert_eq!(first.next(), EnemyId::new(1));
        assert!(first < first.next());
    }

    #[test]
    fn command_kind_strips_payload() {
        let command = Command::PlaceTower {
            cell: CellCoord::new(3, 4),
        };
        assert_eq!(command.kind(), CommandKind::PlaceTower);
        assert_eq!(Command::Tick.kind(), CommandKind::Tick);
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn command_error_round_trips_through_bincode() {
        assert_round_trip(&CommandError::InvalidPlacement(PlacementError::OnPath));
        assert_round_trip(&CommandError::InsufficientFunds {
            required: 50,
            available: 20,
        });
    }
}
