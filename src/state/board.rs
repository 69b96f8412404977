//! Board state.
//!
//! Owns the 15x15 grid of stones and the counters derived from it.
//! `BoardState::place` is the only way to change the grid.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::MoveError;

/// Board dimensions.
pub const ROWS: usize = 15;
pub const COLS: usize = 15;

/// Total number of cells.
pub const CELL_COUNT: usize = ROWS * COLS;

/// Player color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Black,
    White,
}

impl Color {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Black => "black",
            Self::White => "white",
        }
    }

    /// The other player's color.
    pub fn opposite(&self) -> Self {
        match self {
            Self::Black => Self::White,
            Self::White => Self::Black,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Black => write!(f, "Black"),
            Self::White => write!(f, "White"),
        }
    }
}

/// Contents of a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Stone {
    #[default]
    Empty,
    Black,
    White,
}

impl Stone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Black => "black",
            Self::White => "white",
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Color of the stone, if any.
    pub fn color(&self) -> Option<Color> {
        match self {
            Self::Empty => None,
            Self::Black => Some(Color::Black),
            Self::White => Some(Color::White),
        }
    }
}

impl From<Color> for Stone {
    fn from(color: Color) -> Self {
        match color {
            Color::Black => Self::Black,
            Color::White => Self::White,
        }
    }
}

/// Board position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Resolve signed coordinates, rejecting anything off the board.
    pub fn checked(row: i32, col: i32) -> Result<Self, MoveError> {
        match (usize::try_from(row), usize::try_from(col)) {
            (Ok(r), Ok(c)) if r < ROWS && c < COLS => Ok(Self::new(r, c)),
            _ => Err(MoveError::CellOutOfBounds { row, col }),
        }
    }

    /// Check if position is within board bounds.
    pub fn is_valid(&self) -> bool {
        self.row < ROWS && self.col < COLS
    }

    /// Step `distance` cells along `(d_row, d_col)`, or `None` past the edge.
    pub fn offset(&self, d_row: isize, d_col: isize, distance: usize) -> Option<Self> {
        let distance = isize::try_from(distance).ok()?;
        let row = self.row.checked_add_signed(d_row * distance)?;
        let col = self.col.checked_add_signed(d_col * distance)?;
        let pos = Self::new(row, col);
        pos.is_valid().then_some(pos)
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({"row": self.row, "col": self.col})
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// A stone placed at a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub position: Position,
    pub color: Color,
}

impl Move {
    pub fn new(position: Position, color: Color) -> Self {
        Self { position, color }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "row": self.position.row,
            "col": self.position.col,
            "color": self.color.as_str()
        })
    }
}

/// 15x15 grid of stones.
pub type Grid = [[Stone; COLS]; ROWS];

/// Stones on the board plus derived counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardState {
    grid: Grid,
    placed_count: usize,
    last_move: Option<Move>,
}

impl Default for BoardState {
    fn default() -> Self {
        Self::new()
    }
}

impl BoardState {
    /// Create an empty board.
    pub fn new() -> Self {
        Self {
            grid: [[Stone::Empty; COLS]; ROWS],
            placed_count: 0,
            last_move: None,
        }
    }

    /// Place a stone. Rejections leave the board untouched.
    pub fn place(&mut self, row: i32, col: i32, color: Color) -> Result<Move, MoveError> {
        let pos = Position::checked(row, col)?;
        let cell = &mut self.grid[pos.row][pos.col];
        if !cell.is_empty() {
            return Err(MoveError::CellOccupied { row, col });
        }

        *cell = Stone::from(color);
        self.placed_count += 1;
        let placed = Move::new(pos, color);
        self.last_move = Some(placed);
        Ok(placed)
    }

    /// True once every cell holds a stone.
    pub fn is_full(&self) -> bool {
        self.placed_count == CELL_COUNT
    }

    pub fn is_empty(&self) -> bool {
        self.placed_count == 0
    }

    /// Get the stone at a position.
    pub fn get(&self, pos: Position) -> Option<Stone> {
        if pos.is_valid() {
            Some(self.grid[pos.row][pos.col])
        } else {
            None
        }
    }

    /// Get the stone at signed coordinates, `None` when off the board.
    pub fn stone_at(&self, row: i32, col: i32) -> Option<Stone> {
        Position::checked(row, col).ok().and_then(|pos| self.get(pos))
    }

    pub fn placed_count(&self) -> usize {
        self.placed_count
    }

    pub fn last_move(&self) -> Option<Move> {
        self.last_move
    }

    /// Borrow the grid row by row.
    pub fn rows(&self) -> &Grid {
        &self.grid
    }

    /// Count stones of one color.
    pub fn count(&self, color: Color) -> usize {
        let stone = Stone::from(color);
        self.grid
            .iter()
            .flat_map(|row| row.iter())
            .filter(|s| **s == stone)
            .count()
    }

    /// Convert grid to JSON.
    pub fn to_json(&self) -> serde_json::Value {
        let rows: Vec<serde_json::Value> = self
            .grid
            .iter()
            .map(|row| {
                let cells: Vec<serde_json::Value> =
                    row.iter().map(|s| serde_json::json!(s.as_str())).collect();
                serde_json::Value::Array(cells)
            })
            .collect();
        serde_json::Value::Array(rows)
    }
}
