//! Pure game-logic functions.
//!
//! Every public function that advances the game takes an immutable reference
//! to the current `GameState` (and, where needed, an RNG handle) and returns a
//! brand-new `GameState`.  Side effects are limited to the injected RNG.

use log::{debug, trace};
use rand::Rng;

use crate::entities::{
    EnemyPool, EnemyUnit, GameState, GridPosition, Player, PlayerIntent, Projectile,
    ENEMY_STEP_ODDS, HEIGHT, SPAWN_ATTEMPTS, SPAWN_CLEARANCE_ROW, SPAWN_ROW, WIDTH,
};

/// What happened during one tick.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickEvents {
    /// Projectile/enemy pairs destroyed.
    pub hits: u32,
    /// Enemies that reached the bottom border.
    pub breaches: u32,
    /// Projectiles that left through the top.
    pub expired_projectiles: u32,
    /// Enemies created to keep the population full.
    pub spawned: u32,
    /// `Fire` found no free projectile slot.
    pub fire_blocked: bool,
}

/// Result of choosing a spawn column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpawnPick {
    pub x: i32,
    /// Columns sampled, always in `1..=SPAWN_ATTEMPTS`.
    pub attempts: u32,
    /// The column still holds a near-top enemy (all attempts were exhausted).
    pub overlapping: bool,
}

// ── Constructors ─────────────────────────────────────────────────────────────

/// State with the player in place and both pools empty.
pub fn empty_state(name: impl Into<String>) -> GameState {
    GameState {
        player: Player::new(name),
        projectiles: Default::default(),
        enemies: Default::default(),
        frame: 0,
    }
}

/// Build the initial game state: fresh pools and a full enemy population.
pub fn init_state(name: impl Into<String>, rng: &mut impl Rng) -> GameState {
    fill_enemies(&empty_state(name), rng)
}

/// Spawn enemies until the pool is full.
pub fn fill_enemies(state: &GameState, rng: &mut impl Rng) -> GameState {
    let mut next = state.clone();
    refill_enemies(&mut next.enemies, rng);
    next
}

// ── Input-driven state transitions (pure) ───────────────────────────────────

pub fn move_player_left(state: &GameState) -> GameState {
    let mut next = state.clone();
    shift_player(&mut next.player, -1);
    next
}

pub fn move_player_right(state: &GameState) -> GameState {
    let mut next = state.clone();
    shift_player(&mut next.player, 1);
    next
}

/// Fire a projectile from just above the player.  A full pool makes this a
/// no-op.
pub fn player_shoot(state: &GameState) -> GameState {
    let mut next = state.clone();
    fire(&mut next);
    next
}

pub fn apply_intent(state: &GameState, intent: PlayerIntent) -> GameState {
    let mut next = state.clone();
    apply_intent_in_place(&mut next, intent);
    next
}

// ── Per-tick update (RNG injected) ──────────────────────────────────────────

/// Advance the simulation by one tick.  All randomness comes through `rng`
/// so callers control determinism (tests use a seeded or stepped RNG).
pub fn tick(state: &GameState, intent: PlayerIntent, rng: &mut impl Rng) -> GameState {
    tick_with_events(state, intent, rng).0
}

/// Same as [`tick`], also reporting what happened.
///
/// Phases run in a fixed order: intent, projectiles, enemies, population
/// refill, collisions.  Collisions see the positions after all movement of
/// this tick.
pub fn tick_with_events(
    state: &GameState,
    intent: PlayerIntent,
    rng: &mut impl Rng,
) -> (GameState, TickEvents) {
    let mut next = state.clone();
    let mut events = TickEvents::default();
    next.frame += 1;

    // ── 1. Player intent ─────────────────────────────────────────────────────
    events.fire_blocked = !apply_intent_in_place(&mut next, intent);

    // ── 2. Move projectiles ──────────────────────────────────────────────────
    events.expired_projectiles = advance_projectiles(&mut next);

    // ── 3. Move enemies, replacing any that reach the bottom ────────────────
    advance_enemies(&mut next, rng, &mut events);

    // ── 4. Keep the enemy population full ────────────────────────────────────
    events.spawned += refill_enemies(&mut next.enemies, rng);

    // ── 5. Collision: projectiles ↔ enemies ──────────────────────────────────
    resolve_collisions(&mut next, rng, &mut events);

    (next, events)
}

// ── Spawning ──────────────────────────────────────────────────────────────────

/// Choose a spawn column, re-rolling while a near-top enemy already holds it.
/// Best effort: after `SPAWN_ATTEMPTS` samples the last one is taken as is.
pub fn pick_spawn_x(enemies: &EnemyPool, rng: &mut impl Rng) -> SpawnPick {
    let mut attempts = 0;
    loop {
        let x = rng.gen_range(1..=WIDTH - 2);
        attempts += 1;
        let blocked = column_blocked(enemies, x);
        if !blocked || attempts >= SPAWN_ATTEMPTS {
            return SpawnPick {
                x,
                attempts,
                overlapping: blocked,
            };
        }
    }
}

/// Put one new enemy on the spawn row.  Returns its slot, or `None` when the
/// pool is already full.
pub fn spawn_enemy(enemies: &mut EnemyPool, rng: &mut impl Rng) -> Option<usize> {
    if enemies.is_full() {
        return None;
    }
    let pick = pick_spawn_x(enemies, rng);
    if pick.overlapping {
        trace!("spawn column {} still crowded after {} attempts", pick.x, pick.attempts);
    }
    enemies.allocate(EnemyUnit {
        pos: GridPosition::new(pick.x, SPAWN_ROW),
    })
}

fn column_blocked(enemies: &EnemyPool, x: i32) -> bool {
    enemies
        .iter_active()
        .any(|(_, e)| e.pos.x == x && e.pos.y <= SPAWN_CLEARANCE_ROW)
}

fn refill_enemies(enemies: &mut EnemyPool, rng: &mut impl Rng) -> u32 {
    let mut spawned = 0;
    while spawn_enemy(enemies, rng).is_some() {
        spawned += 1;
    }
    spawned
}

// ── Phase helpers (operate on the working copy) ──────────────────────────────

fn shift_player(player: &mut Player, dx: i32) {
    player.pos.x = (player.pos.x + dx).clamp(Player::MIN_X, Player::MAX_X);
}

/// Returns `false` only when a shot was requested but no slot was free.
fn fire(state: &mut GameState) -> bool {
    let origin = state.player.pos;
    let projectile = Projectile {
        pos: GridPosition::new(origin.x, origin.y - 1),
    };
    match state.projectiles.allocate(projectile) {
        Some(_) => true,
        None => {
            trace!("fire ignored: all {} projectile slots busy", state.projectiles.capacity());
            false
        }
    }
}

fn apply_intent_in_place(state: &mut GameState, intent: PlayerIntent) -> bool {
    match intent {
        PlayerIntent::MoveLeft => shift_player(&mut state.player, -1),
        PlayerIntent::MoveRight => shift_player(&mut state.player, 1),
        PlayerIntent::Fire => return fire(state),
        PlayerIntent::Noop | PlayerIntent::ReturnToMenu | PlayerIntent::Quit => {}
    }
    true
}

fn advance_projectiles(state: &mut GameState) -> u32 {
    let mut expired = 0;
    for i in state.projectiles.active_indices() {
        let Some(projectile) = state.projectiles.get_mut(i) else {
            continue;
        };
        projectile.pos.y -= 1;
        if projectile.pos.y <= 0 {
            state.projectiles.release(i);
            expired += 1;
        }
    }
    expired
}

fn advance_enemies(state: &mut GameState, rng: &mut impl Rng, events: &mut TickEvents) {
    // Only enemies alive when the phase starts move; replacements wait a tick.
    for i in state.enemies.active_indices() {
        if !rng.gen_ratio(1, ENEMY_STEP_ODDS) {
            continue;
        }
        let Some(enemy) = state.enemies.get_mut(i) else {
            continue;
        };
        enemy.pos.y += 1;
        if enemy.pos.y < HEIGHT - 1 {
            continue;
        }

        let x = enemy.pos.x;
        state.enemies.release(i);
        state.player.lives = state.player.lives.saturating_sub(1);
        events.breaches += 1;
        debug!(
            "enemy reached the bottom at column {x}; {} lives left",
            state.player.lives
        );
        if spawn_enemy(&mut state.enemies, rng).is_some() {
            events.spawned += 1;
        }
    }
}

fn resolve_collisions(state: &mut GameState, rng: &mut impl Rng, events: &mut TickEvents) {
    let mut hits = 0;
    for p in state.projectiles.active_indices() {
        let Some(pos) = state.projectiles.get(p).map(|proj| proj.pos) else {
            continue;
        };
        // Released enemies are no longer active, so nothing is matched twice.
        let target = state
            .enemies
            .iter_active()
            .find(|(_, e)| e.pos == pos)
            .map(|(i, _)| i);
        if let Some(e) = target {
            state.projectiles.release(p);
            state.enemies.release(e);
            state.player.score += 1;
            hits += 1;
            debug!("hit at ({}, {}); score {}", pos.x, pos.y, state.player.score);
        }
    }

    // Replacements appear after the pass so they cannot be hit this tick.
    for _ in 0..hits {
        if spawn_enemy(&mut state.enemies, rng).is_some() {
            events.spawned += 1;
        }
    }
    events.hits = hits;
}
