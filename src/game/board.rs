//! The logical board: a sparse, unbounded grid of letter tiles
//!
//! Every occupied coordinate is either committed (permanent) or pending
//! (staged this turn). The board answers two questions about the pending
//! tiles: is the placement legal, and which words did it form.
//!
//! Placement rule violations are plain `bool`s. Only caller mistakes, like
//! writing outside a bounded board, come back as [`BoardError`].

use derive_more::{Display, Error};
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

/// An (x, y) board coordinate. Origin and axis direction are up to the caller.
pub type Coord = (i32, i32);

/// Orthogonal neighbours: up, right, down, left.
const NEIGHBORS: [(i32, i32); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];

/// Errors for board operations the caller should never have made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum BoardError {
    /// Coordinate lies outside a bounded board
    #[display("({x}, {y}) is outside the board")]
    OutOfBounds { x: i32, y: i32 },
}

/// Whether a tile is part of the current move or already played.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileState {
    Committed,
    Pending,
}

/// A letter on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub letter: char,
    pub state: TileState,
}

impl Tile {
    pub fn is_pending(&self) -> bool {
        self.state == TileState::Pending
    }
}

/// A run of two or more letters formed by the pending tiles, with its
/// bounding box. A word is either horizontal or vertical, never both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word {
    pub text: String,
    pub min_x: i32,
    pub max_x: i32,
    pub min_y: i32,
    pub max_y: i32,
}

impl Word {
    pub fn is_horizontal(&self) -> bool {
        self.max_x > self.min_x
    }

    pub fn is_vertical(&self) -> bool {
        self.max_y > self.min_y
    }

    /// Whether (x, y) lies inside this word's bounding box.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        (self.min_x..=self.max_x).contains(&x) && (self.min_y..=self.max_y).contains(&y)
    }

    /// Number of letters.
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Coordinates covered by this word, first letter first.
    pub fn coords(&self) -> impl Iterator<Item = Coord> + '_ {
        (self.min_y..=self.max_y).flat_map(move |y| (self.min_x..=self.max_x).map(move |x| (x, y)))
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// An axis-aligned rectangle of coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(left: i32, top: i32, width: u32, height: u32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        let (x, y) = (i64::from(x), i64::from(y));
        let (left, top) = (i64::from(self.left), i64::from(self.top));
        x >= left
            && x < left + i64::from(self.width)
            && y >= top
            && y < top + i64::from(self.height)
    }
    /// Whether every cell of the rectangle has an i32 coordinate.
    fn fits(&self) -> bool {
        let max = i64::from(i32::MAX);
        i64::from(self.left) + i64::from(self.width) - 1 <= max
            && i64::from(self.top) + i64::from(self.height) - 1 <= max
    }
}

/// Step one cell from `coord`, or `None` if that would leave the i32 range.
fn step((x, y): Coord, dx: i32, dy: i32) -> Option<Coord> {
    Some((x.checked_add(dx)?, y.checked_add(dy)?))
}

/// Letter tiles keyed by coordinate.
#[derive(Debug, Clone, Default)]
pub struct Board {
    tiles: HashMap<Coord, Tile>,
    bounds: Option<Rect>,
}

impl Board {
    /// An empty, unbounded board.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty board that rejects writes outside `bounds`.
    pub fn bounded(bounds: Rect) -> Self {
        Self {
            tiles: HashMap::new(),
            bounds: Some(bounds),
        }
    }

    pub fn bounds(&self) -> Option<Rect> {
        self.bounds
    }

    fn check_bounds(&self, x: i32, y: i32) -> Result<(), BoardError> {
        match self.bounds {
            Some(bounds) if !bounds.contains(x, y) => Err(BoardError::OutOfBounds { x, y }),
            _ => Ok(()),
        }
    }

    /// The letter at (x, y), if any.
    pub fn tile_at(&self, x: i32, y: i32) -> Option<char> {
        self.tiles.get(&(x, y)).map(|tile| tile.letter)
    }

    pub fn tile(&self, x: i32, y: i32) -> Option<Tile> {
        self.tiles.get(&(x, y)).copied()
    }

    pub fn is_pending(&self, x: i32, y: i32) -> bool {
        self.tiles.get(&(x, y)).is_some_and(Tile::is_pending)
    }

    pub fn is_committed(&self, x: i32, y: i32) -> bool {
        self.tiles.get(&(x, y)).is_some_and(|tile| !tile.is_pending())
    }

    /// Number of occupied coordinates.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn pending_count(&self) -> usize {
        self.tiles.values().filter(|tile| tile.is_pending()).count()
    }

    /// All occupied coordinates in no particular order.
    pub fn tiles(&self) -> impl Iterator<Item = (Coord, Tile)> + '_ {
        self.tiles.iter().map(|(&coord, &tile)| (coord, tile))
    }

    /// Stage `letter` at (x, y). Replaces whatever was there, and marks the
    /// coordinate pending even if it held a committed tile.
    pub fn set_tile(&mut self, x: i32, y: i32, letter: char) -> Result<(), BoardError> {
        self.check_bounds(x, y)?;
        self.tiles.insert(
            (x, y),
            Tile {
                letter: letter.to_ascii_uppercase(),
                state: TileState::Pending,
            },
        );
        Ok(())
    }

    /// Remove the tile at (x, y). Clearing an empty cell does nothing.
    pub fn clear_tile(&mut self, x: i32, y: i32) -> Result<(), BoardError> {
        self.check_bounds(x, y)?;
        self.tiles.remove(&(x, y));
        Ok(())
    }

    /// Make every pending tile permanent.
    pub fn commit_pending(&mut self) {
        for tile in self.tiles.values_mut() {
            tile.state = TileState::Committed;
        }
    }

    /// Pending coordinates in row-major order (by y, then x).
    pub fn pending_coords(&self) -> Vec<Coord> {
        let mut coords: Vec<Coord> = self
            .tiles
            .iter()
            .filter(|(_, tile)| tile.is_pending())
            .map(|(&coord, _)| coord)
            .collect();
        coords.sort_by_key(|&(x, y)| (y, x));
        coords
    }

    /// Lift every pending tile off the board, returning their letters in
    /// row-major order.
    pub fn take_pending(&mut self) -> Vec<(Coord, char)> {
        self.pending_coords()
            .into_iter()
            .filter_map(|coord| self.tiles.remove(&coord).map(|tile| (coord, tile.letter)))
            .collect()
    }

    /// Whether the pending tiles form a legal placement:
    ///
    /// 1. at least one tile is pending,
    /// 2. they all share a row or a column,
    /// 3. the run between the outermost pending tiles has no holes, and
    /// 4. at least one of them touches a committed tile.
    ///
    /// The first word of a game has nothing to touch; it is placed and
    /// committed directly instead of going through this check.
    pub fn pending_valid(&self) -> bool {
        let pending = self.pending_coords();
        let Some(&(first_x, first_y)) = pending.first() else {
            return false;
        };

        let (mut min_x, mut max_x, mut min_y, mut max_y) = (first_x, first_x, first_y, first_y);
        for &(x, y) in &pending {
            min_x = min_x.min(x);
            max_x = max_x.max(x);
            min_y = min_y.min(y);
            max_y = max_y.max(y);
        }

        if max_x > min_x && max_y > min_y {
            return false;
        }

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                if self.tile_at(x, y).is_none() {
                    return false;
                }
            }
        }

        pending.iter().any(|&coord| {
            NEIGHBORS.iter().any(|&(dx, dy)| {
                step(coord, dx, dy).is_some_and(|(nx, ny)| self.is_committed(nx, ny))
            })
        })
    }

    /// Every word the pending tiles take part in: the full horizontal and
    /// vertical runs through each pending tile, two letters or longer, each
    /// reported once.
    pub fn pending_words(&self) -> Vec<Word> {
        let mut words: Vec<Word> = Vec::new();
        for (x, y) in self.pending_coords() {
            if !words.iter().any(|w| w.is_horizontal() && w.contains(x, y)) {
                if let Some(word) = self.run_through((x, y), (1, 0)) {
                    words.push(word);
                }
            }
            if !words.iter().any(|w| w.is_vertical() && w.contains(x, y)) {
                if let Some(word) = self.run_through((x, y), (0, 1)) {
                    words.push(word);
                }
            }
        }
        words
    }

    /// The maximal run through `start` along (dx, dy), or `None` if the tile
    /// stands alone on that axis.
    fn run_through(&self, start: Coord, (dx, dy): (i32, i32)) -> Option<Word> {
        let mut first = start;
        while let Some(prev) = step(first, -dx, -dy).filter(|c| self.tiles.contains_key(c)) {
            first = prev;
        }

        let mut text = String::new();
        let mut last = first;
        let mut cursor = Some(first);
        while let Some(coord) = cursor {
            let Some(tile) = self.tiles.get(&coord) else {
                break;
            };
            text.push(tile.letter);
            last = coord;
            cursor = step(coord, dx, dy);
        }

        if first == last {
            return None;
        }
        Some(Word {
            text,
            min_x: first.0,
            max_x: last.0,
            min_y: first.1,
            max_y: last.1,
        })
    }

    /// Whether any tile, pending or committed, sits on row `y`.
    pub fn have_tile_in(&self, y: i32) -> bool {
        self.tiles.keys().any(|&(_, ty)| ty == y)
    }
}

/// The visible window over the board.
///
/// Sliding the content moves the window the other way in board coordinates.
/// Tiles never change coordinates; they only go in and out of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    rect: Rect,
}

impl Viewport {
    /// A `width` x `height` window with its top-left corner at (0, 0).
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            rect: Rect::new(0, 0, width, height),
        }
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn top_row(&self) -> i32 {
        self.rect.top
    }

    pub fn left_col(&self) -> i32 {
        self.rect.left
    }

    pub fn bottom_row(&self) -> i32 {
        self.rect.top + self.rect.height as i32 - 1
    }

    pub fn width(&self) -> u32 {
        self.rect.width
    }

    pub fn height(&self) -> u32 {
        self.rect.height
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.rect.contains(x, y)
    }

    /// Whether the board has a tile on the top visible row.
    pub fn have_reached_top(&self, board: &Board) -> bool {
        board.have_tile_in(self.top_row())
    }

    /// Shift the board content by (dx, dy) cells on screen.
    ///
    /// If any tile would end up out of view, either refuse (`destroy ==
    /// false`, nothing changes) or clear those tiles and slide anyway. A
    /// bounded board has its bounds moved along with the window. A slide
    /// that would carry the window past the i32 coordinate range is refused.
    pub fn slide(&mut self, board: &mut Board, dx: i32, dy: i32, destroy: bool) -> bool {
        let (Some(left), Some(top)) =
            (self.rect.left.checked_sub(dx), self.rect.top.checked_sub(dy))
        else {
            return false;
        };
        let moved = Rect {
            left,
            top,
            ..self.rect
        };
        if !moved.fits() {
            return false;
        }

        let outside: Vec<Coord> = board
            .tiles
            .keys()
            .filter(|&&(x, y)| !moved.contains(x, y))
            .copied()
            .collect();
        if !outside.is_empty() {
            if !destroy {
                return false;
            }
            for coord in &outside {
                board.tiles.remove(coord);
            }
            debug!(dx, dy, destroyed = outside.len(), "slide cleared tiles");
        }

        if board.bounds.is_some() {
            board.bounds = Some(moved);
        }
        self.rect = moved;
        true
    }
}
