//! High score leaderboard
//!
//! Persisted to a plain text file, one `<name> <score>` record per line, and
//! holds at most one entry per player name (exact, case-sensitive match).

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::error::LeaderboardError;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// Default file name, relative to the working directory
pub const HIGH_SCORE_FILE: &str = "high_scores.txt";

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub name: String,
    pub score: u32,
}

impl LeaderboardEntry {
    pub fn new(name: impl Into<String>, score: u32) -> Self {
        Self {
            name: name.into(),
            score,
        }
    }
}

/// What [`Leaderboard::record_result`] did with a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    /// New player on the board, at this 1-indexed rank.
    Inserted { rank: usize },
    /// Known player beat their previous best.
    UpdatedHigher { old: u32, new: u32 },
    /// Known player did not beat their previous best.
    NoChange { existing: u32 },
    /// New player whose score does not make the board.
    NotQualifying,
}

impl RecordOutcome {
    /// Whether the board was mutated and needs saving.
    pub fn changed(&self) -> bool {
        matches!(
            self,
            RecordOutcome::Inserted { .. } | RecordOutcome::UpdatedHigher { .. }
        )
    }
}

/// Ranked high scores tied to one storage file.
///
/// Entries are always sorted descending by score; equal scores keep the order
/// in which they arrived.
#[derive(Debug, Clone)]
pub struct Leaderboard {
    path: PathBuf,
    entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    /// Create an empty leaderboard without touching storage.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: Vec::new(),
        }
    }

    /// Build a leaderboard from entries in any order, applying the ranking,
    /// one-entry-per-name and size rules.
    pub fn from_entries(path: impl Into<PathBuf>, mut entries: Vec<LeaderboardEntry>) -> Self {
        sort_by_rank(&mut entries);
        let mut seen = HashSet::new();
        entries.retain(|e| seen.insert(e.name.clone()));
        entries.truncate(MAX_HIGH_SCORES);
        Self {
            path: path.into(),
            entries,
        }
    }

    /// Load high scores from `path`.  A missing or unreadable file gives an
    /// empty board; a malformed line ends the load at that line.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match Self::try_load(&path) {
            Ok(board) => {
                info!("Loaded {} high scores from {}", board.len(), path.display());
                board
            }
            Err(err) if err.is_not_found() => {
                debug!("No high scores at {}, starting fresh", path.display());
                Self::new(path)
            }
            Err(err) => {
                warn!("{err}; starting with an empty leaderboard");
                Self::new(path)
            }
        }
    }

    /// Like [`Leaderboard::load`] but reports an unreadable file instead of
    /// falling back.
    pub fn try_load(path: &Path) -> Result<Self, LeaderboardError> {
        let text =
            fs::read_to_string(path).map_err(|source| LeaderboardError::StorageUnavailable {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self::from_entries(path, parse_records(&text)))
    }

    /// Overwrite the storage file with the current ranking.
    pub fn save(&self) -> Result<(), LeaderboardError> {
        let write_failed = |source| LeaderboardError::StorageWriteFailed {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_failed)?;
        }
        fs::write(&self.path, render_records(&self.entries)).map_err(write_failed)?;
        debug!(
            "High scores saved to {} ({} entries)",
            self.path.display(),
            self.entries.len()
        );
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    /// The best `n` entries (fewer if the board is shorter).
    pub fn top(&self, n: usize) -> &[LeaderboardEntry] {
        &self.entries[..n.min(self.entries.len())]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn best_score(&self) -> Option<u32> {
        self.entries.first().map(|e| e.score)
    }

    pub fn find(&self, name: &str) -> Option<&LeaderboardEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Check if a new player's score would make the board
    pub fn is_qualifying(&self, score: u32) -> bool {
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Fold a finished game into the ranking.  Does not touch storage.
    pub fn record_result(&mut self, name: &str, score: u32) -> RecordOutcome {
        if let Some(existing) = self.entries.iter_mut().find(|e| e.name == name) {
            if score <= existing.score {
                return RecordOutcome::NoChange {
                    existing: existing.score,
                };
            }
            let old = existing.score;
            existing.score = score;
            sort_by_rank(&mut self.entries);
            info!("{name} improved their best from {old} to {score}");
            return RecordOutcome::UpdatedHigher { old, new: score };
        }

        if !self.is_qualifying(score) {
            return RecordOutcome::NotQualifying;
        }

        // Equal scores rank ahead of the newcomer.
        let pos = self
            .entries
            .iter()
            .position(|e| score > e.score)
            .unwrap_or(self.entries.len());
        self.entries.insert(pos, LeaderboardEntry::new(name, score));
        if let Some(evicted) = self.entries.get(MAX_HIGH_SCORES) {
            info!("{} ({}) dropped off the leaderboard", evicted.name, evicted.score);
        }
        self.entries.truncate(MAX_HIGH_SCORES);

        let rank = pos + 1;
        info!("{name} entered the leaderboard at #{rank} with {score}");
        RecordOutcome::Inserted { rank }
    }

    /// Record a result and persist it straight away if the board changed.
    /// The outcome stands even when saving fails.
    pub fn record_and_save(
        &mut self,
        name: &str,
        score: u32,
    ) -> (RecordOutcome, Result<(), LeaderboardError>) {
        let outcome = self.record_result(name, score);
        let saved = if outcome.changed() { self.save() } else { Ok(()) };
        (outcome, saved)
    }
}

/// Stable, so equal scores keep their relative order.
fn sort_by_rank(entries: &mut [LeaderboardEntry]) {
    entries.sort_by(|a, b| b.score.cmp(&a.score));
}

// ── Storage format ────────────────────────────────────────────────────────────

/// Parse one `<name> <score>` line.  `line` is 1-indexed, for messages.
pub fn parse_record(text: &str, line: usize) -> Result<LeaderboardEntry, LeaderboardError> {
    let malformed = || LeaderboardError::MalformedRecord {
        line,
        text: text.to_string(),
    };
    let mut fields = text.split_whitespace();
    let (Some(name), Some(score), None) = (fields.next(), fields.next(), fields.next()) else {
        return Err(malformed());
    };
    let score = score.parse::<u32>().map_err(|_| malformed())?;
    Ok(LeaderboardEntry::new(name, score))
}

/// Read records in file order, stopping at the first malformed line or after
/// `MAX_HIGH_SCORES` records.  Blank lines are skipped.
pub fn parse_records(text: &str) -> Vec<LeaderboardEntry> {
    let mut entries = Vec::new();
    for (i, line) in text.lines().enumerate() {
        if entries.len() == MAX_HIGH_SCORES {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }
        match parse_record(line, i + 1) {
            Ok(entry) => entries.push(entry),
            Err(err) => {
                warn!("{err}; ignoring the rest of the file");
                break;
            }
        }
    }
    entries
}

pub fn render_records(entries: &[LeaderboardEntry]) -> String {
    entries
        .iter()
        .map(|e| format!("{} {}\n", e.name, e.score))
        .collect()
}
