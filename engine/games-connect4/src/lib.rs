//! Connect 4 bitboard for the foursight evaluator
//!
//! Connect 4 is a two-player connection game where players drop discs into a
//! 7-column, 6-row vertically suspended grid. The first player to line up four
//! discs horizontally, vertically, or diagonally wins.
//!
//! # Board Layout
//!
//! Each player owns one `u64` bit-set. Cells are stored column-major with an
//! extra sentinel row on top of every column, so a cell lives at bit
//! `row + col * (ROWS + 1)`:
//! ```text
//! Row 6: [ 6][13][20][27][34][41][48]  <- Sentinel (always empty)
//! Row 5: [ 5][12][19][26][33][40][47]  <- Top
//! Row 4: [ 4][11][18][25][32][39][46]
//! Row 3: [ 3][10][17][24][31][38][45]
//! Row 2: [ 2][ 9][16][23][30][37][44]
//! Row 1: [ 1][ 8][15][22][29][36][43]
//! Row 0: [ 0][ 7][14][21][28][35][42]  <- Bottom
//!         Col 0  1   2   3   4   5   6
//! ```
//!
//! The sentinel row keeps shifted runs from spilling into the neighbouring
//! column, which is what makes the shift-AND win check exact.
//!
//! # Usage
//!
//! ```rust
//! use games_connect4::{Board, Player};
//!
//! let board = Board::new().apply_move(3).unwrap();
//! assert_eq!(board.column_height(3), 1);
//! assert_eq!(board.current_player(), Player::Two);
//! ```

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Board dimensions
pub const COLS: usize = 7;
pub const ROWS: usize = 6;
pub const BOARD_SIZE: usize = COLS * ROWS; // 42

/// Bits per column including the sentinel row.
pub const COLUMN_BITS: usize = ROWS + 1;

/// Shifts for the four line directions: vertical, horizontal, and both diagonals.
const DIRECTIONS: [usize; 4] = [1, COLUMN_BITS, COLUMN_BITS - 1, COLUMN_BITS + 1];

/// One of the two sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Player {
    /// Moves first
    One,
    Two,
}

impl Player {
    /// The opposing player.
    #[inline]
    pub fn other(self) -> Player {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// Index of this player's bit-set (0 or 1).
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Player::One => 0,
            Player::Two => 1,
        }
    }

    /// Single character used when rendering the board.
    pub fn symbol(self) -> char {
        match self {
            Player::One => 'X',
            Player::Two => 'O',
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player {}", self.index() + 1)
    }
}

/// How a finished game (or playout) ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Winner(Player),
    Draw,
}

/// Rejected move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("column {column} is full")]
    ColumnFull { column: u8 },

    #[error("column {column} is out of range (0-{})", COLS - 1)]
    ColumnOutOfRange { column: u8 },

    #[error("the game is already over")]
    GameOver,
}

/// Failure to parse a move string into a board.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseBoardError {
    #[error("invalid character {ch:?} at position {position}")]
    InvalidCharacter { ch: char, position: usize },

    #[error("illegal move at position {position}: {source}")]
    IllegalMove {
        position: usize,
        #[source]
        source: MoveError,
    },

    #[error("move at position {position} is played after the game ended")]
    GameOver { position: usize },
}

/// A Connect 4 position.
///
/// Boards are small `Copy` values. Applying a move produces a new board and
/// never touches the original, so hosts can keep a history of boards freely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    /// One bit-set per player, indexed by [`Player::index`]
    bits: [u64; 2],
    /// Number of discs in each column (0-6)
    heights: [u8; COLS],
    /// Player whose turn it is
    to_move: Player,
    /// Total discs on the board
    moves: u8,
}

impl Board {
    /// The empty starting position, player one to move.
    pub fn new() -> Self {
        Self {
            bits: [0; 2],
            heights: [0; COLS],
            to_move: Player::One,
            moves: 0,
        }
    }

    /// Replay a sequence of 0-based columns from the empty position.
    ///
    /// Unlike [`Board::play`], this rejects any move after the game has been
    /// decided, so the replayed board never hides an earlier win.
    pub fn from_moves(columns: &[u8]) -> Result<Self, MoveError> {
        let mut board = Self::new();
        for &column in columns {
            if board.winner().is_some() {
                return Err(MoveError::GameOver);
            }
            board.play(column)?;
        }
        Ok(board)
    }

    /// Bit index of a cell.
    #[inline]
    fn bit(col: usize, row: usize) -> u64 {
        1u64 << (row + col * COLUMN_BITS)
    }

    /// Return a copy of this board with a disc dropped into `column`.
    ///
    /// Fails without side effects when the column is full or out of range.
    pub fn apply_move(&self, column: u8) -> Result<Board, MoveError> {
        let mut next = *self;
        next.play(column)?;
        Ok(next)
    }

    /// Drop a disc into `column` in place. The board is left unchanged on error.
    pub fn play(&mut self, column: u8) -> Result<(), MoveError> {
        let col = column as usize;
        if col >= COLS {
            return Err(MoveError::ColumnOutOfRange { column });
        }
        let row = self.heights[col] as usize;
        if row >= ROWS {
            return Err(MoveError::ColumnFull { column });
        }

        self.bits[self.to_move.index()] |= Self::bit(col, row);
        self.heights[col] += 1;
        self.moves += 1;
        self.to_move = self.to_move.other();
        Ok(())
    }

    /// Whether the player who made the last move has four in a row.
    ///
    /// For every direction `y = b & (b >> s)` marks adjacent pairs, and
    /// `y & (y >> 2s)` marks two pairs back to back, i.e. four in a row.
    pub fn has_four_in_a_row(&self) -> bool {
        Self::has_run_of_four(self.bits[self.to_move.other().index()])
    }

    #[inline]
    fn has_run_of_four(b: u64) -> bool {
        DIRECTIONS.iter().any(|&shift| {
            let y = b & (b >> shift);
            y & (y >> (2 * shift)) != 0
        })
    }

    /// True iff the board is full and the last move did not complete a line.
    pub fn is_draw(&self) -> bool {
        self.moves as usize == BOARD_SIZE && !self.has_four_in_a_row()
    }

    /// Final result, or `None` while the game is still open.
    pub fn winner(&self) -> Option<Outcome> {
        if self.has_four_in_a_row() {
            Some(Outcome::Winner(self.to_move.other()))
        } else if self.moves as usize == BOARD_SIZE {
            Some(Outcome::Draw)
        } else {
            None
        }
    }

    /// Columns that still have room, in ascending order.
    pub fn legal_moves(&self) -> Vec<u8> {
        (0..COLS as u8)
            .filter(|&col| (self.heights[col as usize] as usize) < ROWS)
            .collect()
    }

    /// Bit-mask representation of legal moves.
    ///
    /// Bits 0-6 correspond to columns 0-6.
    pub fn legal_moves_mask(&self) -> u8 {
        self.heights
            .iter()
            .enumerate()
            .fold(0u8, |mask, (col, &height)| {
                if (height as usize) < ROWS {
                    mask | (1u8 << col)
                } else {
                    mask
                }
            })
    }

    /// Player whose turn it is.
    #[inline]
    pub fn current_player(&self) -> Player {
        self.to_move
    }

    /// Discs played so far (0-42).
    #[inline]
    pub fn move_count(&self) -> usize {
        self.moves as usize
    }

    /// Discs in `col`. Panics if `col >= COLS`.
    #[inline]
    pub fn column_height(&self, col: usize) -> usize {
        self.heights[col] as usize
    }

    /// Owner of the cell at (`col`, `row`), row 0 being the bottom.
    pub fn cell(&self, col: usize, row: usize) -> Option<Player> {
        if col >= COLS || row >= ROWS {
            return None;
        }
        let bit = Self::bit(col, row);
        if self.bits[Player::One.index()] & bit != 0 {
            Some(Player::One)
        } else if self.bits[Player::Two.index()] & bit != 0 {
            Some(Player::Two)
        } else {
            None
        }
    }

    /// Raw bit-set for `player`.
    #[inline]
    pub fn bitboard(&self, player: Player) -> u64 {
        self.bits[player.index()]
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for Board {
    type Err = ParseBoardError;

    /// Parse a digit string of 0-based columns, e.g. `"3342"`.
    /// Whitespace is ignored. Moves after a win or a full board are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut board = Board::new();
        for (position, ch) in s.chars().enumerate() {
            if ch.is_whitespace() {
                continue;
            }
            let column = ch
                .to_digit(10)
                .ok_or(ParseBoardError::InvalidCharacter { ch, position })?;
            if board.winner().is_some() {
                return Err(ParseBoardError::GameOver { position });
            }
            board
                .play(column as u8)
                .map_err(|source| ParseBoardError::IllegalMove { position, source })?;
        }
        Ok(board)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (0..ROWS).rev() {
            for col in 0..COLS {
                let ch = self.cell(col, row).map_or('.', Player::symbol);
                if col > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{}", ch)?;
            }
            writeln!(f)?;
        }
        let footer: Vec<String> = (0..COLS).map(|c| c.to_string()).collect();
        write!(f, "{}", footer.join(" "))
    }
}

#[cfg(test)]
mod tests;
