//! Grid Shooter - a character-cell arcade shooter
//!
//! Core modules:
//! - `entities`: pure data (grid, player, projectiles, enemies, intents)
//! - `pool`: fixed-capacity entity slot arrays
//! - `compute`: the per-tick simulation
//! - `session`: one play-through, from start to game over
//! - `leaderboard`: ranked high scores backed by a text file

pub mod compute;
pub mod entities;
pub mod error;
pub mod leaderboard;
pub mod pool;
pub mod session;

pub use error::LeaderboardError;
pub use leaderboard::{Leaderboard, LeaderboardEntry, RecordOutcome};
pub use session::{ExitReason, Session, SessionStatus};
