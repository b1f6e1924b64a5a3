//! Session lifecycle
//!
//! `Game` owns the running round, the schedule that drives it and the
//! leaderboard collaborator. Every session replacement stops the schedule
//! before the old state is torn down and starts it again only once the new
//! state exists, so no tick from one session ever lands on another.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::highscores::{HighScoreEntry, LeaderboardStore, SubmitOutcome};
use crate::settings::Settings;
use crate::sim::{
    Carry, Direction, GameEvent, GamePhase, GameState, LayoutPool, MapError, MoveOutcome,
    Schedule, Snapshot, TickKind, apply_move, tick,
};

/// Requests from the input collaborator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Move(Direction),
    NewGame,
    /// Answer to the game-over name prompt; `None` cancels
    SubmitName(Option<String>),
    ShowLeaderboard,
    Exit,
}

/// Output for the presentation collaborators
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Update {
    Frame(Snapshot),
    Status(String),
    Event(GameEvent),
    RoundStarted { round: u32, layout: usize },
    /// Game over; the session waits for a name (or a cancel)
    AwaitingName { score: u32 },
    Leaderboard(Vec<HighScoreEntry>),
    Notice(String),
}

/// The game: current session plus everything needed to replace it
pub struct Game<S> {
    settings: Settings,
    pool: LayoutPool,
    store: S,
    rng: Pcg32,
    seed: u64,
    state: GameState,
    schedule: Schedule,
    /// Score waiting on the name prompt
    pending_score: Option<u32>,
    last_status: String,
}

fn build_round(
    pool: &LayoutPool,
    rng: &mut Pcg32,
    seed: u64,
    round: u32,
    starting_health: u8,
    carry: Option<Carry>,
) -> Result<GameState, MapError> {
    let (index, layout) = pool.load_random(rng)?;
    log::info!("Round {} on layout {} (seed {})", round, index + 1, seed);
    Ok(GameState::from_layout(
        layout,
        seed,
        index,
        round,
        starting_health,
        carry,
    ))
}

impl<S: LeaderboardStore> Game<S> {
    /// Build the first session and start its schedule at `now_ms`
    pub fn new(
        settings: Settings,
        pool: LayoutPool,
        store: S,
        seed: u64,
        now_ms: u64,
    ) -> Result<Self, MapError> {
        let mut rng = Pcg32::seed_from_u64(seed);
        let state = build_round(
            &pool,
            &mut rng,
            seed,
            1,
            settings.effective_starting_health(),
            None,
        )?;
        let mut schedule = Schedule::new(settings.timing());
        schedule.start(now_ms);

        Ok(Self {
            settings,
            pool,
            store,
            rng,
            seed,
            state,
            schedule,
            pending_score: None,
            last_status: String::new(),
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn pending_score(&self) -> Option<u32> {
        self.pending_score
    }

    pub fn next_deadline(&self) -> Option<u64> {
        self.schedule.next_deadline()
    }

    /// Run every tick due at `now_ms`
    pub fn advance(&mut self, now_ms: u64) -> Vec<Update> {
        let mut updates = Vec::new();
        let generation = self.schedule.generation();

        for kind in self.schedule.due(now_ms) {
            // The session changed mid-pass; what is left belonged to the old one
            if self.schedule.generation() != generation || !self.schedule.is_running() {
                break;
            }
            tick(&mut self.state, kind, self.schedule.elapsed_ms(now_ms));
            match kind {
                TickKind::Patrol => updates.push(Update::Frame(self.state.snapshot())),
                TickKind::Display => self.push_status(&mut updates),
                TickKind::Collision => {}
            }
            self.settle(now_ms, &mut updates);
        }
        updates
    }

    /// Apply one command from the input collaborator
    pub fn handle(&mut self, command: Command, now_ms: u64) -> Vec<Update> {
        let mut updates = Vec::new();
        match command {
            Command::Move(direction) => {
                if apply_move(&mut self.state, direction) != MoveOutcome::Blocked {
                    updates.push(Update::Frame(self.state.snapshot()));
                }
                self.settle(now_ms, &mut updates);
            }
            Command::NewGame => self.new_game(now_ms, &mut updates),
            Command::SubmitName(name) => self.resolve_submission(name, now_ms, &mut updates),
            Command::ShowLeaderboard => match self.store.list() {
                Ok(entries) => updates.push(Update::Leaderboard(entries)),
                Err(e) => {
                    log::warn!("Could not read high scores: {e}");
                    updates.push(Update::Notice(format!("High scores unavailable: {e}")));
                }
            },
            Command::Exit => {}
        }
        updates
    }

    /// Start over with fresh score, health and clock
    fn new_game(&mut self, now_ms: u64, updates: &mut Vec<Update>) {
        if let Some(score) = self.pending_score.take() {
            log::info!("Score {score} discarded by new game");
        }
        self.replace_session(None, 1, now_ms, updates);
    }

    /// Forward events and react to phase changes
    fn settle(&mut self, now_ms: u64, updates: &mut Vec<Update>) {
        updates.extend(self.state.drain_events().into_iter().map(Update::Event));

        match self.state.phase {
            GamePhase::Active => {}
            GamePhase::RoundComplete => {
                log::info!(
                    "Round {} complete with score {}",
                    self.state.round,
                    self.state.player.score
                );
                let carry = self.state.carry();
                let round = self.state.round + 1;
                self.replace_session(Some(carry), round, now_ms, updates);
            }
            GamePhase::GameOver => {
                if self.schedule.is_running() {
                    self.schedule.stop();
                    let score = self.state.player.score;
                    log::info!("Game over with score {score}");
                    self.pending_score = Some(score);
                    updates.push(Update::Frame(self.state.snapshot()));
                    self.push_status(updates);
                    updates.push(Update::AwaitingName { score });
                }
            }
        }
    }

    /// Leave the pending-submission state: record the score if a name was
    /// given, then begin a fresh game
    fn resolve_submission(&mut self, name: Option<String>, now_ms: u64, updates: &mut Vec<Update>) {
        let Some(score) = self.pending_score.take() else {
            return;
        };

        let name = name.filter(|n| !n.trim().is_empty());
        if let Some(name) = name {
            match self.store.submit(&name, score) {
                Ok(SubmitOutcome::Inserted { rank }) | Ok(SubmitOutcome::Replaced { rank, .. }) => {
                    updates.push(Update::Notice(format!("{} placed #{rank} with {score}", name.trim())));
                }
                Ok(SubmitOutcome::Rejected) => {
                    updates.push(Update::Notice(format!("{score} did not make the high scores")));
                }
                Err(e) => {
                    log::warn!("Score not recorded: {e}");
                    updates.push(Update::Notice(format!("Score not recorded: {e}")));
                }
            }
        }

        self.replace_session(None, 1, now_ms, updates);
    }

    fn replace_session(
        &mut self,
        carry: Option<Carry>,
        round: u32,
        now_ms: u64,
        updates: &mut Vec<Update>,
    ) {
        self.schedule.stop();
        let health = self.settings.effective_starting_health();
        match build_round(&self.pool, &mut self.rng, self.seed, round, health, carry) {
            Ok(state) => {
                self.state = state;
                self.schedule.start(now_ms);
                self.last_status.clear();
                updates.push(Update::RoundStarted {
                    round,
                    layout: self.state.layout_index,
                });
                updates.push(Update::Frame(self.state.snapshot()));
                self.push_status(updates);
            }
            Err(e) => {
                log::error!("Could not start round {round}: {e}");
                updates.push(Update::Notice(format!("Could not start a new round: {e}")));
            }
        }
    }

    /// Status readout, only when it changed
    fn push_status(&mut self, updates: &mut Vec<Update>) {
        let status = self.state.status_line();
        if status != self.last_status {
            self.last_status.clone_from(&status);
            updates.push(Update::Status(status));
        }
    }
}
