//! Terminal input
//!
//! One line of input becomes zero or more commands. Keys:
//! `w`/`a`/`s`/`d` move, `n` new game, `l` leaderboard, `q` quit.
//! While the game-over prompt is up the whole line is the player's name,
//! and an empty line cancels the submission.

use crate::game::Command;
use crate::sim::Direction;

fn key_command(key: char) -> Option<Command> {
    if let Some(direction) = Direction::from_key(key) {
        return Some(Command::Move(direction));
    }
    match key.to_ascii_lowercase() {
        'n' => Some(Command::NewGame),
        'l' => Some(Command::ShowLeaderboard),
        'q' => Some(Command::Exit),
        _ => None,
    }
}

/// Commands for one line of input
pub fn parse_line(line: &str, awaiting_name: bool) -> Vec<Command> {
    if awaiting_name {
        let name = line.trim();
        return vec![Command::SubmitName(
            (!name.is_empty()).then(|| name.to_string()),
        )];
    }

    let mut commands = Vec::new();
    for key in line.chars().filter(|c| !c.is_whitespace()) {
        match key_command(key) {
            Some(Command::Exit) => {
                commands.push(Command::Exit);
                break;
            }
            Some(command) => commands.push(command),
            None => log::debug!("Ignoring key {key:?}"),
        }
    }
    commands
}
