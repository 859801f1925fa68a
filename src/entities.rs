//! Game entity types and fixed game constants. Pure data, no logic.

use crate::pool::Pool;

// ── Grid & limits ─────────────────────────────────────────────────────────────

/// Board width in cells, border columns included.
pub const WIDTH: i32 = 30;
/// Board height in cells, border rows included.
pub const HEIGHT: i32 = 15;

pub const MAX_PROJECTILES: usize = 5;
pub const MAX_ENEMIES: usize = 6;

pub const STARTING_LIVES: u32 = 3;

/// Enemies step down one row with probability `1 / ENEMY_STEP_ODDS` per tick.
pub const ENEMY_STEP_ODDS: u32 = 15;
/// New enemies always appear on this row.
pub const SPAWN_ROW: i32 = 1;
/// Spawn columns are re-rolled at most this many times to dodge a crowded top.
pub const SPAWN_ATTEMPTS: u32 = 10;
/// An enemy at or above this row blocks its column for spawning.
pub const SPAWN_CLEARANCE_ROW: i32 = 2;

pub const MAX_PLAYER_NAME: usize = 19;
pub const DEFAULT_PLAYER_NAME: &str = "Player";

// ── Positions ─────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridPosition {
    pub x: i32,
    pub y: i32,
}

impl GridPosition {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn in_bounds(&self) -> bool {
        (0..WIDTH).contains(&self.x) && (0..HEIGHT).contains(&self.y)
    }

    /// The outermost ring of the board is impassable.
    pub fn is_border(&self) -> bool {
        self.x == 0 || self.x == WIDTH - 1 || self.y == 0 || self.y == HEIGHT - 1
    }
}

// ── Player & pooled entities ──────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub pos: GridPosition,
    pub lives: u32,
    pub score: u32,
    pub name: String,
}

impl Player {
    /// Player row is fixed one above the bottom border.
    pub const ROW: i32 = HEIGHT - 2;
    pub const MIN_X: i32 = 1;
    pub const MAX_X: i32 = WIDTH - 2;

    /// The name goes through [`sanitize_name`], so it is always a single
    /// storable token.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            pos: GridPosition::new(WIDTH / 2, Self::ROW),
            lives: STARTING_LIVES,
            score: 0,
            name: sanitize_name(&name.into()),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Projectile {
    pub pos: GridPosition,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EnemyUnit {
    pub pos: GridPosition,
}

pub type ProjectilePool = Pool<Projectile, MAX_PROJECTILES>;
pub type EnemyPool = Pool<EnemyUnit, MAX_ENEMIES>;

// ── Intents ───────────────────────────────────────────────────────────────────

/// One discrete player action, delivered once per tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerIntent {
    MoveLeft,
    MoveRight,
    Fire,
    Noop,
    ReturnToMenu,
    Quit,
}

// ── Master game state ─────────────────────────────────────────────────────────

/// The entire simulation state.  Cloneable so the pure update functions in
/// `compute` can return a new copy without mutating the original.
#[derive(Clone, Debug)]
pub struct GameState {
    pub player: Player,
    pub projectiles: ProjectilePool,
    pub enemies: EnemyPool,
    pub frame: u64,
}

/// What the renderer needs to draw one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    pub player: GridPosition,
    pub lives: u32,
    pub score: u32,
    pub name: String,
    pub projectiles: Vec<GridPosition>,
    pub enemies: Vec<GridPosition>,
    pub frame: u64,
}

impl From<&GameState> for Snapshot {
    fn from(state: &GameState) -> Self {
        Snapshot {
            player: state.player.pos,
            lives: state.player.lives,
            score: state.player.score,
            name: state.player.name.clone(),
            projectiles: state.projectiles.iter_active().map(|(_, p)| p.pos).collect(),
            enemies: state.enemies.iter_active().map(|(_, e)| e.pos).collect(),
            frame: state.frame,
        }
    }
}

// ── Names ─────────────────────────────────────────────────────────────────────

/// Turn whatever the player typed into a name the high-score file can hold:
/// a single whitespace-free token of at most `MAX_PLAYER_NAME` characters.
pub fn sanitize_name(raw: &str) -> String {
    let name: String = raw
        .trim()
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .take(MAX_PLAYER_NAME)
        .collect();
    if name.is_empty() {
        DEFAULT_PLAYER_NAME.to_string()
    } else {
        name
    }
}
