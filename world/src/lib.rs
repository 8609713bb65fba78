#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state for the tower defense simulation.
//!
//! The [`World`] exclusively owns every enemy, tower and projectile. Shells
//! mutate it only through [`apply`], which either executes a [`Command`] fully
//! or rejects it without side effects, and observe it through [`query`].
//!
//! A [`Command::Tick`] runs the stages of one simulation step in a fixed order:
//!
//! 1. the wave manager may spawn an enemy;
//! 2. enemies advance and those reaching the exit are removed, costing lives;
//! 3. towers cool down, pick a target and fire;
//! 4. projectiles home in and resolve hits;
//! 5. dead enemies pay out and are removed;
//! 6. a cleared wave gives way to the next one, and running out of lives ends
//!    the game.
//!
//! Later stages observe the results of earlier ones within the same tick.

mod enemies;
mod ledger;
mod path;
mod projectiles;
mod towers;

use tower_defense_core::{
    CellCoord, Command, CommandError, Config, ConfigError, EnemyId, Event, PlacementError,
    PlayState, ProjectileId, TowerId,
};
use tower_defense_system_spawning::WaveManager;
use tracing::{debug, info, trace};

use crate::{
    enemies::EnemyRoster,
    ledger::Ledger,
    path::Path,
    projectiles::{Flight, ProjectileSwarm},
    towers::TowerRegistry,
};

/// Represents the authoritative tower defense world state.
#[derive(Debug)]
pub struct World {
    config: Config,
    path: Path,
    play_state: PlayState,
    pregame_remaining: u32,
    tick_index: u64,
    enemies: EnemyRoster,
    towers: TowerRegistry,
    projectiles: ProjectileSwarm,
    waves: WaveManager,
    ledger: Ledger,
    selected: Option<TowerId>,
    quit_requested: bool,
}

impl World {
    /// Creates a world from the provided configuration after validating it.
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        validate(&config)?;
        let path = Path::new(&config.path, &config.grid)?;
        let ledger = Ledger::new(&config.economy, 0);

        Ok(Self {
            path,
            play_state: initial_play_state(&config),
            pregame_remaining: config.waves.pregame_ticks,
            tick_index: 0,
            enemies: EnemyRoster::new(),
            towers: TowerRegistry::new(),
            projectiles: ProjectileSwarm::new(),
            waves: WaveManager::new(&config.waves),
            ledger,
            selected: None,
            quit_requested: false,
            config,
        })
    }

    fn transition(&mut self, to: PlayState, out_events: &mut Vec<Event>) {
        let from = self.play_state;
        if from == to {
            return;
        }
        self.play_state = to;
        debug!(?from, ?to, "play state changed");
        out_events.push(Event::PlayStateChanged { from, to });
    }

    fn ensure_editable(&self) -> Result<(), CommandError> {
        match self.play_state {
            PlayState::Paused => Err(CommandError::Paused),
            PlayState::GameOver => Err(CommandError::GameOver),
            PlayState::Pregame | PlayState::Running => Ok(()),
        }
    }

    fn place_tower(
        &mut self,
        cell: CellCoord,
        out_events: &mut Vec<Event>,
    ) -> Result<(), CommandError> {
        self.ensure_editable()?;
        if !self.config.grid.contains(cell) {
            return Err(PlacementError::OutOfBounds.into());
        }
        if self.path.contains(cell) {
            return Err(PlacementError::OnPath.into());
        }
        if self.towers.tower_at(cell).is_some() {
            return Err(PlacementError::Occupied.into());
        }

        let cost = self.config.economy.tower_cost;
        self.ledger.charge(cost)?;
        let tower = self
            .towers
            .insert(cell, self.config.grid.cell_size, &self.config.tower);
        debug!(
            tower = tower.get(),
            column = cell.column(),
            row = cell.row(),
            "tower placed"
        );
        out_events.push(Event::TowerPlaced { tower, cell, cost });
        Ok(())
    }

    fn select_tower_at(
        &mut self,
        cell: CellCoord,
        out_events: &mut Vec<Event>,
    ) -> Result<(), CommandError> {
        if self.play_state == PlayState::GameOver {
            return Err(CommandError::GameOver);
        }
        self.selected = self.towers.tower_at(cell);
        out_events.push(Event::TowerSelected {
            tower: self.selected,
        });
        Ok(())
    }

    fn clear_selection(&mut self, out_events: &mut Vec<Event>) -> Result<(), CommandError> {
        if self.play_state == PlayState::GameOver {
            return Err(CommandError::GameOver);
        }
        self.selected = None;
        out_events.push(Event::TowerSelected { tower: None });
        Ok(())
    }

    fn upgrade_selected(&mut self, out_events: &mut Vec<Event>) -> Result<(), CommandError> {
        self.ensure_editable()?;
        let id = self.selected.ok_or(CommandError::NoSelection)?;
        let tower = self.towers.get_mut(id).ok_or(CommandError::NoSelection)?;
        if tower.level() >= self.config.tower.max_level {
            return Err(CommandError::MaxLevelReached);
        }

        let cost = self.config.economy.upgrade_cost;
        self.ledger.charge(cost)?;
        let upgraded = tower.upgrade(&self.config.tower);
        debug_assert!(upgraded, "level was checked before charging");
        let level = tower.level();
        debug!(tower = id.get(), level, "tower upgraded");
        out_events.push(Event::TowerUpgraded {
            tower: id,
            level,
            cost,
        });
        Ok(())
    }

    fn sell_selected(&mut self, out_events: &mut Vec<Event>) -> Result<(), CommandError> {
        self.ensure_editable()?;
        let id = self.selected.ok_or(CommandError::NoSelection)?;
        let tower = self.towers.remove(id).ok_or(CommandError::NoSelection)?;
        let refund = tower.sell_value(self.config.economy.tower_cost);
        self.ledger.credit(refund);
        self.selected = None;
        debug!(tower = id.get(), refund, "tower sold");
        out_events.push(Event::TowerSold { tower: id, refund });
        Ok(())
    }

    fn toggle_pause(&mut self, out_events: &mut Vec<Event>) -> Result<(), CommandError> {
        let next = match self.play_state {
            PlayState::GameOver => return Err(CommandError::GameOver),
            PlayState::Pregame | PlayState::Running => PlayState::Paused,
            PlayState::Paused if self.pregame_remaining > 0 => PlayState::Pregame,
            PlayState::Paused => PlayState::Running,
        };
        self.transition(next, out_events);
        Ok(())
    }

    fn restart(&mut self, out_events: &mut Vec<Event>) {
        let high_score = self.ledger.high_score();
        self.enemies = EnemyRoster::new();
        self.towers = TowerRegistry::new();
        self.projectiles = ProjectileSwarm::new();
        self.waves = WaveManager::new(&self.config.waves);
        self.ledger = Ledger::new(&self.config.economy, high_score);
        self.selected = None;
        self.tick_index = 0;
        self.pregame_remaining = self.config.waves.pregame_ticks;
        info!(high_score, "session restarted");
        out_events.push(Event::Restarted);
        self.transition(initial_play_state(&self.config), out_events);
    }

    fn tick(&mut self, out_events: &mut Vec<Event>) {
        match self.play_state {
            PlayState::Paused | PlayState::GameOver => return,
            PlayState::Pregame => {
                self.tick_index += 1;
                out_events.push(Event::TimeAdvanced {
                    tick: self.tick_index,
                });
                self.pregame_remaining = self.pregame_remaining.saturating_sub(1);
                if self.pregame_remaining == 0 {
                    info!(
                        wave = self.waves.wave(),
                        enemies = self.waves.enemies_per_wave(),
                        "grace period over"
                    );
                    self.transition(PlayState::Running, out_events);
                }
                return;
            }
            PlayState::Running => {}
        }

        self.tick_index += 1;
        out_events.push(Event::TimeAdvanced {
            tick: self.tick_index,
        });

        self.spawn_enemies(out_events);
        self.move_enemies(out_events);
        self.fire_towers(out_events);
        self.move_projectiles(out_events);
        self.collect_dead_enemies(out_events);

        if !self.ledger.is_game_over() && self.waves.is_wave_clear(self.enemies.len()) {
            self.waves.advance_wave();
            info!(
                wave = self.waves.wave(),
                enemies = self.waves.enemies_per_wave(),
                "wave started"
            );
            out_events.push(Event::WaveStarted {
                wave: self.waves.wave(),
                enemy_count: self.waves.enemies_per_wave(),
            });
        }

        if self.ledger.is_game_over() {
            info!(
                score = self.ledger.score(),
                high_score = self.ledger.high_score(),
                "game over"
            );
            if self.selected.take().is_some() {
                out_events.push(Event::TowerSelected { tower: None });
            }
            self.transition(PlayState::GameOver, out_events);
            out_events.push(Event::GameOver {
                score: self.ledger.score(),
                high_score: self.ledger.high_score(),
            });
        }
    }

    fn spawn_enemies(&mut self, out_events: &mut Vec<Event>) {
        self.waves.tick();
        let Some(order) = self.waves.maybe_spawn() else {
            return;
        };

        let enemy = self
            .enemies
            .spawn(&self.path, &self.config.enemy, order)
            .snapshot();
        debug!(enemy = enemy.id.get(), wave = order.wave, "enemy spawned");
        out_events.push(Event::EnemySpawned {
            enemy: enemy.id,
            wave: order.wave,
            speed: enemy.speed,
            max_health: enemy.max_health,
        });
    }

    fn move_enemies(&mut self, out_events: &mut Vec<Event>) {
        for enemy in self.enemies.iter_mut() {
            enemy.advance(&self.path);
        }

        let escaped = self.enemies.remove_where(|enemy| enemy.has_reached_end());
        for enemy in escaped {
            self.ledger.lose_life();
            debug!(
                enemy = enemy.id().get(),
                lives = self.ledger.lives(),
                "enemy reached the exit"
            );
            out_events.push(Event::EnemyReachedEnd { enemy: enemy.id() });
            out_events.push(Event::LifeLost {
                lives_remaining: self.ledger.lives(),
            });
        }
    }

    fn fire_towers(&mut self, out_events: &mut Vec<Event>) {
        let speed = self.config.tower.projectile_speed;
        for tower in self.towers.iter_mut() {
            tower.tick_cooldown();
            let Some(target) = tower.acquire_target(self.enemies.iter()) else {
                continue;
            };
            let Some(projectile) = tower.try_fire(self.projectiles.next_id(), target, speed) else {
                continue;
            };

            trace!(
                tower = tower.id().get(),
                target = target.id().get(),
                "projectile fired"
            );
            out_events.push(Event::ProjectileFired {
                projectile: projectile.id(),
                tower: tower.id(),
                target: target.id(),
            });
            self.projectiles.launch(projectile);
        }
    }

    fn move_projectiles(&mut self, out_events: &mut Vec<Event>) {
        let mut spent: Vec<ProjectileId> = Vec::new();
        for projectile in self.projectiles.iter_mut() {
            match projectile.advance(&self.enemies) {
                Flight::InFlight => continue,
                Flight::Hit => {
                    let struck = self
                        .enemies
                        .get_mut(projectile.target())
                        .filter(|enemy| enemy.is_alive());
                    match struck {
                        Some(enemy) => {
                            enemy.apply_damage(projectile.damage());
                            out_events.push(Event::ProjectileHit {
                                projectile: projectile.id(),
                                target: projectile.target(),
                                damage: projectile.damage(),
                            });
                        }
                        None => out_events.push(discarded(projectile.id(), projectile.target())),
                    }
                }
                Flight::Miss => out_events.push(discarded(projectile.id(), projectile.target())),
            }
            spent.push(projectile.id());
        }
        self.projectiles.discard(&spent);
    }

    fn collect_dead_enemies(&mut self, out_events: &mut Vec<Event>) {
        let fallen = self.enemies.remove_where(|enemy| !enemy.is_alive());
        for enemy in fallen {
            let reward = enemy.reward();
            let points = reward.saturating_mul(self.config.economy.score_per_reward);
            self.ledger.credit(reward);
            self.ledger.credit_score(points);
            debug!(enemy = enemy.id().get(), reward, points, "enemy killed");
            out_events.push(Event::EnemyKilled {
                enemy: enemy.id(),
                reward,
                points,
            });
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Rejected commands leave the world untouched and report
/// [`Event::CommandRejected`] instead.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    let outcome = match command {
        Command::PlaceTower { cell } => world.place_tower(cell, out_events),
        Command::SelectTowerAt { cell } => world.select_tower_at(cell, out_events),
        Command::ClearSelection => world.clear_selection(out_events),
        Command::UpgradeSelected => world.upgrade_selected(out_events),
        Command::SellSelected => world.sell_selected(out_events),
        Command::TogglePause => world.toggle_pause(out_events),
        Command::Restart => {
            world.restart(out_events);
            Ok(())
        }
        Command::Quit => {
            world.quit_requested = true;
            info!("quit requested");
            out_events.push(Event::QuitRequested);
            Ok(())
        }
        Command::Tick => {
            world.tick(out_events);
            Ok(())
        }
    };

    if let Err(reason) = outcome {
        debug!(command = ?command.kind(), %reason, "command rejected");
        out_events.push(Event::CommandRejected {
            command: command.kind(),
            reason,
        });
    }
}

fn discarded(projectile: ProjectileId, target: EnemyId) -> Event {
    Event::ProjectileDiscarded { projectile, target }
}

fn initial_play_state(config: &Config) -> PlayState {
    if config.waves.pregame_ticks == 0 {
        PlayState::Running
    } else {
        PlayState::Pregame
    }
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.grid.columns == 0 || config.grid.rows == 0 {
        return Err(ConfigError::ZeroGrid);
    }
    if config.grid.cell_size <= 0.0 || !config.grid.cell_size.is_finite() {
        return Err(ConfigError::NonPositiveCellSize(config.grid.cell_size));
    }
    if config.tower.max_level == 0 {
        return Err(ConfigError::ZeroMaxLevel);
    }
    if config.enemy.speed <= 0.0 || !config.enemy.speed.is_finite() {
        return Err(ConfigError::NonPositiveEnemySpeed(config.enemy.speed));
    }
    if config.enemy.health <= 0.0 || !config.enemy.health.is_finite() {
        return Err(ConfigError::NonPositiveEnemyHealth(config.enemy.health));
    }
    let projectile_speed = config.tower.projectile_speed;
    if projectile_speed <= 0.0 || !projectile_speed.is_finite() {
        return Err(ConfigError::NonPositiveProjectileSpeed(projectile_speed));
    }
    Ok(())
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::World;
    use tower_defense_core::{CellCoord, Config, PlayState, Snapshot, TowerId};

    /// Captures the complete presentation snapshot.
    ///
    /// Two calls without an intervening [`super::apply`] return identical data.
    #[must_use]
    pub fn snapshot(world: &World) -> Snapshot {
        Snapshot {
            tick: world.tick_index,
            play_state: world.play_state,
            wave: world.waves.wave(),
            money: world.ledger.money(),
            lives: world.ledger.lives(),
            score: world.ledger.score(),
            high_score: world.ledger.high_score(),
            paused: world.play_state == PlayState::Paused,
            game_over: world.play_state == PlayState::GameOver,
            enemies: world.enemies.iter().map(|enemy| enemy.snapshot()).collect(),
            towers: world
                .towers
                .iter()
                .map(|tower| tower.snapshot(world.selected == Some(tower.id())))
                .collect(),
            projectiles: world
                .projectiles
                .iter()
                .map(|projectile| projectile.snapshot())
                .collect(),
        }
    }

    /// Active phase of the play state machine.
    #[must_use]
    pub fn play_state(world: &World) -> PlayState {
        world.play_state
    }

    /// Configuration the world was built from.
    #[must_use]
    pub fn config(world: &World) -> &Config {
        &world.config
    }

    /// Ordered cells of the enemy path, entry first.
    #[must_use]
    pub fn path_cells(world: &World) -> &[CellCoord] {
        world.path.cells()
    }

    /// Tower standing on the provided cell, if any.
    #[must_use]
    pub fn tower_at(world: &World, cell: CellCoord) -> Option<TowerId> {
        world.towers.tower_at(cell)
    }

    /// Currently selected tower, if any.
    #[must_use]
    pub fn selected_tower(world: &World) -> Option<TowerId> {
        world.selected
    }

    /// Reports whether a shell asked the simulation to stop.
    #[must_use]
    pub fn quit_requested(world: &World) -> bool {
        world.quit_requested
    }

    /// Enemies the active wave has yet to spawn.
    #[must_use]
    pub fn remaining_to_spawn(world: &World) -> u32 {
        world.waves.remaining_to_spawn()
    }

    /// Grace ticks left before the first wave starts spawning.
    #[must_use]
    pub fn pregame_ticks_remaining(world: &World) -> u32 {
        world.pregame_remaining
    }
}
