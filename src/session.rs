//! One play-through, from the first tick to game over or an explicit exit.
//!
//! A `Session` owns the simulation state and its RNG, turns one
//! [`PlayerIntent`] per tick into a call to [`compute::tick_with_events`], and
//! hands the final score to the [`Leaderboard`] the moment lives run out.
//! Sessions are single-use: a new game builds a new `Session`.

use log::{info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::compute::{self, TickEvents};
use crate::entities::{sanitize_name, GameState, Player, PlayerIntent, Snapshot};
use crate::error::LeaderboardError;
use crate::leaderboard::{Leaderboard, RecordOutcome};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExitReason {
    ReturnToMenu,
    Quit,
}

/// Lifecycle: `NotStarted → Running → Over`, or `Running → Exited` when the
/// player leaves early.  `Over` and `Exited` are final.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionStatus {
    NotStarted,
    Running,
    Over(u32),
    Exited(ExitReason),
}

impl SessionStatus {
    pub fn is_finished(&self) -> bool {
        matches!(self, SessionStatus::Over(_) | SessionStatus::Exited(_))
    }
}

/// How the final score fared on the leaderboard.
#[derive(Debug)]
pub struct RecordReport {
    pub outcome: RecordOutcome,
    /// Set when the board changed but could not be written back.
    pub save_error: Option<LeaderboardError>,
}

#[derive(Debug)]
pub struct Session<R = StdRng> {
    state: GameState,
    status: SessionStatus,
    rng: R,
    last_events: TickEvents,
    record: Option<RecordReport>,
}

impl Session<StdRng> {
    /// Start a running session seeded from OS entropy.
    pub fn start(name: impl Into<String>) -> Self {
        Self::start_with_rng(name, StdRng::from_entropy())
    }
}

impl<R: Rng> Session<R> {
    /// A session that has not begun: pools are empty until the first tick
    /// or an explicit [`Session::begin`].
    pub fn new(name: impl Into<String>, rng: R) -> Self {
        Self {
            state: compute::empty_state(name),
            status: SessionStatus::NotStarted,
            rng,
            last_events: TickEvents::default(),
            record: None,
        }
    }

    pub fn start_with_rng(name: impl Into<String>, rng: R) -> Self {
        let mut session = Self::new(name, rng);
        session.begin();
        session
    }

    /// Resume from an existing state, e.g. a saved or hand-built one.  Missing
    /// enemies are spawned so the pool is full before the first tick.
    ///
    /// A state with no lives left is already `Over`.  Its score was never
    /// played by this session, so nothing is recorded for it.
    pub fn from_state(mut state: GameState, mut rng: R) -> Self {
        state.player.name = sanitize_name(&state.player.name);
        let status = if state.player.lives == 0 {
            SessionStatus::Over(state.player.score)
        } else {
            state = compute::fill_enemies(&state, &mut rng);
            SessionStatus::Running
        };
        Self {
            state,
            status,
            rng,
            last_events: TickEvents::default(),
            record: None,
        }
    }

    /// Populate the enemy pool and enter `Running`.  No-op once begun.
    pub fn begin(&mut self) {
        if self.status != SessionStatus::NotStarted {
            return;
        }
        self.state = compute::fill_enemies(&self.state, &mut self.rng);
        self.status = SessionStatus::Running;
        info!("Session started for {}", self.state.player.name);
    }

    /// Apply one intent and advance one tick.
    ///
    /// `ReturnToMenu` and `Quit` end the session without ticking and without
    /// touching the leaderboard.  When the tick leaves the player with no
    /// lives, the session is `Over` from this call on and the score has been
    /// recorded (and saved, if it changed the board).
    pub fn apply_intent_and_tick(
        &mut self,
        intent: PlayerIntent,
        leaderboard: &mut Leaderboard,
    ) -> SessionStatus {
        if self.status.is_finished() {
            return self.status;
        }
        self.begin();

        match intent {
            PlayerIntent::ReturnToMenu => return self.exit(ExitReason::ReturnToMenu),
            PlayerIntent::Quit => return self.exit(ExitReason::Quit),
            _ => {}
        }

        let (next, events) = compute::tick_with_events(&self.state, intent, &mut self.rng);
        self.state = next;
        self.last_events = events;

        if self.state.player.lives == 0 {
            self.finish(leaderboard);
        }
        self.status
    }

    fn exit(&mut self, reason: ExitReason) -> SessionStatus {
        info!(
            "Session for {} left early ({reason:?}) with score {}",
            self.state.player.name, self.state.player.score
        );
        self.status = SessionStatus::Exited(reason);
        self.status
    }

    fn finish(&mut self, leaderboard: &mut Leaderboard) {
        let player = &self.state.player;
        let final_score = player.score;
        self.status = SessionStatus::Over(final_score);
        info!("Game over for {} with score {final_score}", player.name);

        let (outcome, saved) = leaderboard.record_and_save(&player.name, final_score);
        let save_error = saved.err();
        if let Some(err) = &save_error {
            warn!("{err}; this result was not persisted");
        }
        self.record = Some(RecordReport {
            outcome,
            save_error,
        });
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn player(&self) -> &Player {
        &self.state.player
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Read-only view for the renderer, valid after each tick.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::from(&self.state)
    }

    /// What happened during the most recent tick.
    pub fn last_events(&self) -> &TickEvents {
        &self.last_events
    }

    /// Present once a tick of this session has ended the game.
    pub fn record(&self) -> Option<&RecordReport> {
        self.record.as_ref()
    }
}
