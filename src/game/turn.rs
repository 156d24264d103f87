//! Turn orchestration: stage tiles, validate, check words, commit
//!
//! A [`Session`] owns one game's board, bag and rack and runs the play
//! protocol the presentation layer drives:
//!
//! 1. stage letters from the rack onto the board (pending),
//! 2. [`Session::submit`]: reject the placement if it is not a connected
//!    straight line, reject it if any formed word is not in the dictionary,
//!    otherwise commit and refill the rack,
//! 3. hand the committed words to the puzzle's [`PlayRules`].
//!
//! Rejections are [`PlayOutcome`] values. [`TurnError`] is reserved for
//! calls that make no sense, like staging from an empty rack slot.

use super::bag::Bag;
use super::board::{Board, BoardError, Viewport, Word};
use super::dictionary::Dictionary;
use super::rack::{Rack, RackError};
use derive_more::{Display, Error};
use std::sync::Arc;
use tracing::{debug, info};

/// Errors from session calls the caller should not have made.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum TurnError {
    #[display("{_0}")]
    Board(BoardError),
    #[display("{_0}")]
    Rack(RackError),
    /// Target cell already holds a tile
    #[display("({x}, {y}) is already occupied")]
    Occupied { x: i32, y: i32 },
    /// Target cell holds no pending tile
    #[display("({x}, {y}) holds no pending tile")]
    NotPending { x: i32, y: i32 },
    /// Seeding would commit tiles staged for the current play
    #[display("cannot seed a word while tiles are pending")]
    PlayInProgress,
}

impl From<BoardError> for TurnError {
    fn from(e: BoardError) -> Self {
        TurnError::Board(e)
    }
}

impl From<RackError> for TurnError {
    fn from(e: RackError) -> Self {
        TurnError::Rack(e)
    }
}

/// Result of submitting the pending tiles
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayOutcome {
    /// Pending tiles are missing, scattered, gapped or unconnected
    InvalidPlacement,
    /// A formed word is not in the dictionary
    Rejected { word: String },
    /// Play accepted; the words it formed, in detection order
    Committed { words: Vec<Word> },
}

impl PlayOutcome {
    /// Returns true if the play was committed
    pub fn is_committed(&self) -> bool {
        matches!(self, PlayOutcome::Committed { .. })
    }

    /// Returns a user-friendly message
    pub fn message(&self) -> String {
        match self {
            PlayOutcome::InvalidPlacement => {
                "Tiles must form one line touching the board".to_string()
            }
            PlayOutcome::Rejected { word } => format!("Not in dictionary: {}", word),
            PlayOutcome::Committed { words } => {
                let texts: Vec<&str> = words.iter().map(|w| w.text.as_str()).collect();
                format!("Played {}", texts.join(", "))
            }
        }
    }
}

/// Where the game stands after a puzzle's rules have seen a play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Progress {
    #[default]
    Continue,
    Complete,
}

/// Per-puzzle rules, called by the session at the start of a game and after
/// every committed play. Scoring, win conditions and board shifting live
/// here.
pub trait PlayRules {
    /// Set up the board before the first play, usually by seeding an
    /// opening word with [`Session::seed_word`].
    fn game_will_start(&mut self, session: &mut Session) -> Result<(), TurnError>;

    /// React to a committed play.
    fn play_did_commit(&mut self, session: &mut Session, words: &[Word]) -> Progress;
}

/// One game: board, bag, rack and view, sharing a dictionary.
#[derive(Debug)]
pub struct Session {
    board: Board,
    bag: Bag,
    rack: Rack,
    viewport: Viewport,
    dictionary: Arc<Dictionary>,
    progress: Progress,
}

impl Session {
    /// Start a session and fill the rack from the bag.
    pub fn new(
        dictionary: Arc<Dictionary>,
        board: Board,
        mut bag: Bag,
        mut rack: Rack,
        viewport: Viewport,
    ) -> Self {
        rack.fill_from(&mut bag);
        Self {
            board,
            bag,
            rack,
            viewport,
            dictionary,
            progress: Progress::Continue,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn bag(&self) -> &Bag {
        &self.bag
    }

    pub fn rack(&self) -> &Rack {
        &self.rack
    }

    pub fn rack_mut(&mut self) -> &mut Rack {
        &mut self.rack
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn dictionary(&self) -> &Arc<Dictionary> {
        &self.dictionary
    }

    pub fn progress(&self) -> Progress {
        self.progress
    }

    /// Let the rules set up the board.
    pub fn start<R: PlayRules + ?Sized>(&mut self, rules: &mut R) -> Result<(), TurnError> {
        rules.game_will_start(self)
    }

    /// Place `word` left to right from (x, y) and commit it without any
    /// validation. This is how the first word of a game gets on the board.
    ///
    /// Nothing is placed if any letter would land outside a bounded board or
    /// past `i32::MAX` (reported as out of bounds at `i32::MAX`).
    pub fn seed_word(&mut self, word: &str, x: i32, y: i32) -> Result<(), TurnError> {
        if self.board.pending_count() > 0 {
            return Err(TurnError::PlayInProgress);
        }
        let mut cells = Vec::new();
        for (offset, letter) in (0..).zip(word.chars()) {
            let cx = x
                .checked_add(offset)
                .ok_or(BoardError::OutOfBounds { x: i32::MAX, y })?;
            if self.board.bounds().is_some_and(|b| !b.contains(cx, y)) {
                return Err(BoardError::OutOfBounds { x: cx, y }.into());
            }
            cells.push((cx, letter));
        }
        for (cx, letter) in cells {
            self.board.set_tile(cx, y, letter)?;
        }
        self.board.commit_pending();
        debug!(word, x, y, "seeded word");
        Ok(())
    }

    /// Move the letter in rack `slot` onto the board at (x, y) as a pending
    /// tile.
    pub fn stage(&mut self, slot: usize, x: i32, y: i32) -> Result<(), TurnError> {
        if self.board.tile_at(x, y).is_some() {
            return Err(TurnError::Occupied { x, y });
        }
        let letter = self.rack.get(slot).ok_or(if slot < self.rack.size() {
            RackError::EmptySlot { slot }
        } else {
            RackError::NoSuchSlot {
                slot,
                size: self.rack.size(),
            }
        })?;
        self.board.set_tile(x, y, letter)?;
        self.rack.take(slot)?;
        Ok(())
    }

    /// Move the pending tile at (x, y) back to the rack, returning the slot
    /// it landed in.
    pub fn unstage(&mut self, x: i32, y: i32) -> Result<usize, TurnError> {
        let Some(letter) = self.board.tile_at(x, y).filter(|_| self.board.is_pending(x, y)) else {
            return Err(TurnError::NotPending { x, y });
        };
        let slot = self.rack.put(letter)?;
        self.board.clear_tile(x, y)?;
        Ok(slot)
    }

    /// Move every pending tile back to the rack. Returns how many moved.
    pub fn return_to_rack(&mut self) -> Result<usize, TurnError> {
        if self.rack.unused_slots().len() < self.board.pending_count() {
            return Err(RackError::Full.into());
        }
        let taken = self.board.take_pending();
        for &(_, letter) in &taken {
            self.rack.put(letter)?;
        }
        Ok(taken.len())
    }

    /// Shift the board content on screen; see [`Viewport::slide`].
    pub fn slide(&mut self, dx: i32, dy: i32, destroy: bool) -> bool {
        self.viewport.slide(&mut self.board, dx, dy, destroy)
    }

    /// Validate and, if every formed word is in the dictionary, commit the
    /// pending tiles and refill the rack. Rejections leave everything as it
    /// was so the player can rearrange and try again.
    pub fn submit(&mut self) -> PlayOutcome {
        if !self.board.pending_valid() {
            debug!(pending = self.board.pending_count(), "invalid placement");
            return PlayOutcome::InvalidPlacement;
        }

        let words = self.board.pending_words();
        if let Some(bad) = words.iter().find(|w| !self.dictionary.check_word(&w.text)) {
            debug!(word = %bad, "word not in dictionary");
            return PlayOutcome::Rejected {
                word: bad.text.clone(),
            };
        }

        self.board.commit_pending();
        let drawn = self.rack.fill_from(&mut self.bag);
        info!(
            words = ?words.iter().map(|w| w.text.as_str()).collect::<Vec<_>>(),
            drawn,
            remain = self.bag.remain(),
            "play committed"
        );
        PlayOutcome::Committed { words }
    }

    /// Submit, then pass a committed play on to the rules.
    pub fn play<R: PlayRules + ?Sized>(&mut self, rules: &mut R) -> PlayOutcome {
        let outcome = self.submit();
        if let PlayOutcome::Committed { words } = &outcome {
            self.progress = rules.play_did_commit(self, words);
        }
        outcome
    }
}
