use std::collections::BTreeMap;

use tower_defense_core::{CellCoord, Command, Config, EnemyId, Event, Snapshot};
use tower_defense_world::{self as world, query, World};

const SESSION_TICKS: usize = 4_000;

#[test]
fn deterministic_replay_produces_identical_sessions() {
    let first = replay(scripted_commands());
    let second = replay(scripted_commands());

    assert_eq!(first.snapshot, second.snapshot, "snapshots diverged");
    assert_eq!(first.events, second.events, "event logs diverged");
    assert!(
        first
            .events
            .iter()
            .any(|event| matches!(event, Event::EnemyKilled { .. })),
        "the scripted defence should score at least one kill"
    );
}

#[test]
fn entity_invariants_hold_across_a_session() {
    let mut world = World::new(Config::default()).expect("default config is valid");
    for command in opening_commands() {
        let mut events = Vec::new();
        world::apply(&mut world, command, &mut events);
    }

    let path_len = query::path_cells(&world).len();
    let mut previous = query::snapshot(&world);
    for _ in 0..SESSION_TICKS {
        let mut events = Vec::new();
        world::apply(&mut world, Command::Tick, &mut events);
        let current = query::snapshot(&world);
        check_transition(&previous, &current, &events, path_len);
        previous = current;
        if previous.game_over {
            break;
        }
    }
}

fn check_transition(previous: &Snapshot, current: &Snapshot, events: &[Event], path_len: usize) {
    let damaged: Vec<EnemyId> = events
        .iter()
        .filter_map(|event| match event {
            Event::ProjectileHit { target, .. } => Some(*target),
            _ => None,
        })
        .collect();

    let before: BTreeMap<EnemyId, _> = previous
        .enemies
        .iter()
        .map(|enemy| (enemy.id, enemy))
        .collect();
    for enemy in &current.enemies {
        assert!(enemy.health > 0.0, "dead enemies are removed within the tick");
        assert!(enemy.path_index < path_len);
        if let Some(old) = before.get(&enemy.id) {
            assert!(enemy.path_index >= old.path_index, "path index regressed");
            if !damaged.contains(&enemy.id) {
                assert_eq!(enemy.health, old.health, "health changed without a hit");
            }
            assert!(enemy.health <= old.health, "health increased");
        }
    }

    for tower in &current.towers {
        assert!(tower.cooldown <= tower.fire_rate);
    }
    assert!(current.lives <= previous.lives);
    assert!(current.score >= previous.score);
    assert!(current.high_score >= previous.high_score);
}

fn replay(commands: Vec<Command>) -> ReplayOutcome {
    let mut world = World::new(Config::default()).expect("default config is valid");
    let mut log = Vec::new();

    for command in commands {
        world::apply(&mut world, command, &mut log);
    }

    ReplayOutcome {
        snapshot: query::snapshot(&world),
        events: log,
    }
}

fn opening_commands() -> Vec<Command> {
    [(1, 6), (4, 6), (6, 3), (11, 8)]
        .into_iter()
        .map(|(column, row)| Command::PlaceTower {
            cell: CellCoord::new(column, row),
        })
        .collect()
}

fn scripted_commands() -> Vec<Command> {
    let mut commands = opening_commands();
    commands.extend(std::iter::repeat(Command::Tick).take(600));
    commands.push(Command::SelectTowerAt {
        cell: CellCoord::new(1, 6),
    });
    commands.push(Command::UpgradeSelected);
    commands.push(Command::TogglePause);
    commands.extend(std::iter::repeat(Command::Tick).take(50));
    commands.push(Command::TogglePause);
    commands.extend(std::iter::repeat(Command::Tick).take(SESSION_TICKS));
    commands
}

#[derive(Debug)]
struct ReplayOutcome {
    snapshot: Snapshot,
    events: Vec<Event>,
}
