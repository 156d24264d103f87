//! Rules engine for word-grid puzzles: dictionary, tile bag, rack, board and
//! the turn protocol tying them together.

pub mod config;
pub mod demo;
pub mod game;

pub use config::{ConfigError, Settings};
pub use game::board::{Board, BoardError, Viewport, Word};
pub use game::dictionary::{Dictionary, DictionaryError};
pub use game::turn::{PlayOutcome, PlayRules, Progress, Session, TurnError};
