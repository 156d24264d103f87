//! Self-playing demo: a greedy player that lays one tile at a time next to
//! the words already on the board until it runs out of moves

use crate::game::board::{Coord, Word};
use crate::game::turn::{PlayOutcome, PlayRules, Progress, Session, TurnError};
use std::collections::BTreeSet;
use tracing::debug;

/// Seeds an opening word on the bottom row and stops after `goal` plays.
#[derive(Debug, Clone)]
pub struct Autoplay {
    opening: String,
    goal: usize,
    plays: Vec<String>,
}

impl Autoplay {
    pub fn new(opening: impl Into<String>, goal: usize) -> Self {
        Self {
            opening: opening.into(),
            goal,
            plays: Vec::new(),
        }
    }

    /// Words formed by each committed play, comma separated.
    pub fn plays(&self) -> &[String] {
        &self.plays
    }
}

impl PlayRules for Autoplay {
    fn game_will_start(&mut self, session: &mut Session) -> Result<(), TurnError> {
        let viewport = session.viewport();
        let (x, y) = (viewport.left_col(), viewport.bottom_row());
        session.seed_word(&self.opening, x, y)
    }

    fn play_did_commit(&mut self, session: &mut Session, words: &[Word]) -> Progress {
        let texts: Vec<&str> = words.iter().map(|w| w.text.as_str()).collect();
        self.plays.push(texts.join(", "));
        if session.viewport().have_reached_top(session.board()) {
            let half = (session.viewport().height() / 2).max(1) as i32;
            session.slide(0, half, true);
        }
        if self.plays.len() >= self.goal {
            Progress::Complete
        } else {
            Progress::Continue
        }
    }
}

/// Empty visible cells next to a committed tile, top to bottom.
fn open_cells(session: &Session) -> Vec<Coord> {
    let board = session.board();
    let viewport = session.viewport();
    let cells: BTreeSet<Coord> = board
        .tiles()
        .filter(|(_, tile)| !tile.is_pending())
        .flat_map(|((x, y), _)| {
            [
                x.checked_sub(1).map(|x| (x, y)),
                x.checked_add(1).map(|x| (x, y)),
                y.checked_sub(1).map(|y| (x, y)),
                y.checked_add(1).map(|y| (x, y)),
            ]
        })
        .flatten()
        .filter(|&(x, y)| viewport.contains(x, y) && board.tile_at(x, y).is_none())
        .map(|(x, y)| (y, x))
        .collect();
    cells.into_iter().map(|(y, x)| (x, y)).collect()
}

/// Try every rack letter on every open cell and play the first one the
/// dictionary accepts. `None` if nothing fits.
pub fn find_play<R: PlayRules + ?Sized>(
    session: &mut Session,
    rules: &mut R,
) -> Result<Option<Vec<Word>>, TurnError> {
    for (x, y) in open_cells(session) {
        let mut tried = BTreeSet::new();
        for slot in 0..session.rack().size() {
            let Some(letter) = session.rack().get(slot) else {
                continue;
            };
            if !tried.insert(letter) {
                continue;
            }
            session.stage(slot, x, y)?;
            match session.play(rules) {
                PlayOutcome::Committed { words } => return Ok(Some(words)),
                outcome => {
                    debug!(letter = %letter, x, y, reason = %outcome.message(), "no play");
                    session.unstage(x, y)?;
                }
            }
        }
    }
    Ok(None)
}

/// Start the game and keep playing until the rules call it complete or no
/// move is left. Returns the number of plays made.
pub fn run<R: PlayRules + ?Sized>(
    session: &mut Session,
    rules: &mut R,
) -> Result<usize, TurnError> {
    session.start(rules)?;
    let mut plays = 0;
    while session.progress() == Progress::Continue {
        if find_play(session, rules)?.is_none() {
            break;
        }
        plays += 1;
    }
    Ok(plays)
}

/// The visible part of the board, one line per row, `.` for empty cells
/// and lowercase for pending tiles.
pub fn render(session: &Session) -> String {
    let board = session.board();
    let rect = session.viewport().rect();
    let mut out = String::new();
    for y in (0..rect.height).filter_map(|dy| rect.top.checked_add_unsigned(dy)) {
        for x in (0..rect.width).filter_map(|dx| rect.left.checked_add_unsigned(dx)) {
            out.push(match board.tile(x, y) {
                Some(tile) if tile.is_pending() => tile.letter.to_ascii_lowercase(),
                Some(tile) => tile.letter,
                None => '.',
            });
        }
        out.push('\n');
    }
    out
}
