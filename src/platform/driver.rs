//! Session driver
//!
//! The game lives on one dedicated thread. Commands arrive over a channel,
//! updates leave over another, and the thread sleeps on the command channel
//! until the schedule's next deadline. Nothing else ever touches the game,
//! so ticks, moves and session replacement are strictly serialized.
//!
//! Raw input lines are parsed on the driver thread too: whether a line is a
//! name for the game-over prompt or a string of keys depends on the session
//! state at the moment the line is handled.

use std::io;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, unbounded};

use super::input::parse_line;
use crate::game::{Command, Game, Update};
use crate::highscores::LeaderboardStore;

/// What the driver thread accepts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Command(Command),
    /// One line typed by the player, parsed against the current session
    Line(String),
}

/// Owner-side handle to a running driver
pub struct DriverHandle {
    inputs: Sender<Input>,
    /// One answer per line: whether the driver keeps running
    acks: Receiver<bool>,
    updates: Receiver<Update>,
    thread: Option<JoinHandle<()>>,
}

impl DriverHandle {
    /// Queue a command; false once the driver has stopped
    pub fn send(&self, command: Command) -> bool {
        self.inputs.send(Input::Command(command)).is_ok()
    }

    /// Hand over a typed line and wait until it has been applied.
    /// Returns false once the line asked to quit or the driver is gone.
    pub fn send_line(&self, line: &str) -> bool {
        if self.inputs.send(Input::Line(line.to_string())).is_err() {
            return false;
        }
        self.acks.recv().unwrap_or(false)
    }

    pub fn updates(&self) -> &Receiver<Update> {
        &self.updates
    }

    /// Ask the driver to exit and wait for it
    pub fn shutdown(mut self) {
        let _ = self.inputs.send(Input::Command(Command::Exit));
        self.join();
    }

    /// Wait for the driver thread to finish
    pub fn join(&mut self) {
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                log::error!("Session driver panicked");
            }
        }
    }
}

/// Move `game` onto its own thread. Times passed to the game are
/// milliseconds since `epoch`, so the game should have been created
/// against the same origin.
pub fn spawn_driver<S>(game: Game<S>, epoch: Instant) -> io::Result<DriverHandle>
where
    S: LeaderboardStore + Send + 'static,
{
    let (input_tx, input_rx) = unbounded();
    let (ack_tx, ack_rx) = unbounded();
    let (update_tx, update_rx) = unbounded();

    let thread = thread::Builder::new()
        .name("session-driver".to_string())
        .spawn(move || run(game, epoch, input_rx, ack_tx, update_tx))?;

    Ok(DriverHandle {
        inputs: input_tx,
        acks: ack_rx,
        updates: update_rx,
        thread: Some(thread),
    })
}

fn millis_since(epoch: Instant) -> u64 {
    epoch.elapsed().as_millis() as u64
}

fn run<S: LeaderboardStore>(
    mut game: Game<S>,
    epoch: Instant,
    inputs: Receiver<Input>,
    acks: Sender<bool>,
    updates: Sender<Update>,
) {
    log::info!("Session driver started (seed {})", game.seed());

    loop {
        let now = millis_since(epoch);
        if !forward(&updates, game.advance(now)) {
            break;
        }

        // Stopped schedule: nothing to wake for but a command
        let received = match game.next_deadline() {
            Some(deadline) => {
                let wait = deadline.saturating_sub(millis_since(epoch));
                inputs.recv_timeout(Duration::from_millis(wait))
            }
            None => inputs.recv().map_err(|_| RecvTimeoutError::Disconnected),
        };

        let keep_running = match received {
            Ok(Input::Command(command)) => apply(&mut game, command, epoch, &updates),
            Ok(Input::Line(line)) => {
                let awaiting_name = game.pending_score().is_some();
                let keep_running = parse_line(&line, awaiting_name)
                    .into_iter()
                    .all(|command| apply(&mut game, command, epoch, &updates));
                let _ = acks.send(keep_running);
                keep_running
            }
            Err(RecvTimeoutError::Timeout) => true,
            Err(RecvTimeoutError::Disconnected) => false,
        };
        if !keep_running {
            break;
        }
    }

    log::info!("Session driver stopped");
}

/// Run one command; false when the driver should stop
fn apply<S: LeaderboardStore>(
    game: &mut Game<S>,
    command: Command,
    epoch: Instant,
    updates: &Sender<Update>,
) -> bool {
    if command == Command::Exit {
        return false;
    }
    log::debug!("Command {command:?}");
    forward(updates, game.handle(command, millis_since(epoch)))
}

/// Send a batch; false once nobody is listening
fn forward(updates: &Sender<Update>, batch: Vec<Update>) -> bool {
    batch.into_iter().all(|update| updates.send(update).is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::HighScores;
    use crate::settings::Settings;
    use crate::sim::test_support::layout_text;
    use crate::sim::{Direction, LayoutPool};

    fn spawn_on(rows: &[&str]) -> DriverHandle {
        let pool = LayoutPool::from_texts(vec![layout_text(rows)]).unwrap();
        let epoch = Instant::now();
        let game = Game::new(Settings::default(), pool, HighScores::default(), 3, 0).unwrap();
        spawn_driver(game, epoch).unwrap()
    }

    fn wait_for(handle: &DriverHandle, matches: impl Fn(&Update) -> bool) -> bool {
        let deadline = Instant::now() + Duration::from_secs(5);
        while let Some(left) = deadline.checked_duration_since(Instant::now()) {
            match handle.updates().recv_timeout(left) {
                Ok(update) if matches(&update) => return true,
                Ok(_) => {}
                Err(_) => return false,
            }
        }
        false
    }

    #[test]
    fn test_move_completes_round_on_driver_thread() {
        let handle = spawn_on(&["yb"]);
        assert!(handle.send(Command::Move(Direction::Right)));
        assert!(wait_for(&handle, |u| matches!(
            u,
            Update::RoundStarted { round: 2, .. }
        )));
        handle.shutdown();
    }

    #[test]
    fn test_ticks_run_without_input() {
        let handle = spawn_on(&["yh", "", "b"]);
        // Adjacent patrol drains health on the collision cadence alone
        assert!(wait_for(&handle, |u| matches!(
            u,
            Update::AwaitingName { score: 0 }
        )));
        assert!(handle.send(Command::SubmitName(None)));
        assert!(wait_for(&handle, |u| matches!(
            u,
            Update::RoundStarted { round: 1, .. }
        )));
        handle.shutdown();
    }

    #[test]
    fn test_line_right_after_game_over_is_the_name() {
        let handle = spawn_on(&["yh", "", "b"]);
        assert!(wait_for(&handle, |u| matches!(u, Update::AwaitingName { .. })));

        // Keys and the quit letter are plain text while the prompt is up
        assert!(handle.send_line("q"));
        assert!(wait_for(&handle, |u| matches!(
            u,
            Update::Notice(n) if n.starts_with("q placed #1")
        )));
        handle.shutdown();
    }

    #[test]
    fn test_key_line_moves_the_player() {
        let handle = spawn_on(&["yb"]);
        assert!(handle.send_line("d"));
        assert!(wait_for(&handle, |u| matches!(
            u,
            Update::RoundStarted { round: 2, .. }
        )));
        handle.shutdown();
    }

    #[test]
    fn test_quit_line_stops_the_driver() {
        let mut handle = spawn_on(&["y.b"]);
        assert!(!handle.send_line("dq"));
        handle.join();
        assert!(!handle.send_line("d"));
    }

    #[test]
    fn test_exit_stops_the_thread() {
        let mut handle = spawn_on(&["y.b"]);
        assert!(handle.send(Command::Exit));
        handle.join();
        assert!(!handle.send(Command::NewGame));
    }
}
