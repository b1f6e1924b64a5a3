//! Layout builders shared by the simulation tests.
//!
//! Rows are written compactly, one character per cell, and padded with
//! open ground out to a full 15x15 layout.

use super::map::{MapLayout, load};
use crate::consts::GRID_SIZE;

/// Pad compact rows to a full square of single-character cells
pub fn pad_rows(rows: &[&str]) -> Vec<String> {
    let size = GRID_SIZE as usize;
    let mut out: Vec<String> = rows
        .iter()
        .map(|r| {
            let mut row: String = r.chars().take(size).collect();
            while row.chars().count() < size {
                row.push('.');
            }
            row
        })
        .collect();
    while out.len() < size {
        out.push(".".repeat(size));
    }
    out
}

/// Layout file text for compact rows
pub fn layout_text(rows: &[&str]) -> String {
    pad_rows(rows)
        .iter()
        .map(|row| {
            let tokens: Vec<String> = row.chars().map(String::from).collect();
            tokens.join(" ") + "\n"
        })
        .collect()
}

/// Parse compact rows; panics on malformed input
pub fn layout_from_rows(rows: &[&str]) -> MapLayout {
    match load(&layout_text(rows)) {
        Ok(layout) => layout,
        Err(e) => panic!("test layout rejected: {e}"),
    }
}
