//! Plain-text presentation

use glam::IVec2;

use crate::consts::GRID_SIZE;
use crate::game::Update;
use crate::highscores::{HighScoreEntry, format_date};
use crate::sim::{GameEvent, Snapshot};

/// Playfield as rows of space-separated glyphs
pub fn render_snapshot(snapshot: &Snapshot) -> String {
    let mut out = String::with_capacity((GRID_SIZE * GRID_SIZE * 2) as usize);
    for y in 0..GRID_SIZE {
        let row: Vec<String> = (0..GRID_SIZE)
            .filter_map(|x| snapshot.tile(IVec2::new(x, y)))
            .map(|tile| tile.glyph().to_string())
            .collect();
        out.push_str(&row.join(" "));
        out.push('\n');
    }
    out
}

/// Leaderboard table with relative dates against `now` (Unix ms)
pub fn render_leaderboard(entries: &[HighScoreEntry], now: u64) -> String {
    if entries.is_empty() {
        return "No high scores yet\n".to_string();
    }

    let mut out = String::from("HIGH SCORES\n");
    for (i, entry) in entries.iter().enumerate() {
        out.push_str(&format!(
            "{:>2}. {:<16} {:>5}  {}\n",
            i + 1,
            entry.name,
            entry.score,
            format_date(entry.timestamp, now)
        ));
    }
    out
}

/// Text for one update, if it has any
pub fn render_update(update: &Update, now: u64) -> Option<String> {
    match update {
        Update::Frame(snapshot) => Some(render_snapshot(snapshot)),
        Update::Status(status) => Some(status.clone()),
        Update::Event(GameEvent::PlayerHit { health_left, .. }) => {
            Some(format!("Caught by a ranger! Health left: {health_left}"))
        }
        Update::Event(_) => None,
        Update::RoundStarted { round, .. } => Some(format!("Round {round}")),
        Update::AwaitingName { score } => Some(format!(
            "Game over with {score}. Enter your name (empty line to skip):"
        )),
        Update::Leaderboard(entries) => Some(render_leaderboard(entries, now)),
        Update::Notice(notice) => Some(notice.clone()),
    }
}
