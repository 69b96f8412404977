//! Five-in-a-row detection.
//!
//! Scans the four axes through a just-placed stone, in a fixed order, and
//! reports the first run of five it finds. Only the new stone's lines are
//! examined, so the board must be scanned after every placement.

use super::board::{BoardState, Color, Position, Stone};

/// Stones in a row needed to win.
pub const WIN_LENGTH: usize = 5;

/// Line directions through a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Same row.
    Horizontal,
    /// Same column.
    Vertical,
    /// Top-left to bottom-right, `\`.
    Diagonal,
    /// Bottom-left to top-right, `/`.
    AntiDiagonal,
}

impl Axis {
    /// Scan order. The first axis that completes a line is the one reported.
    /// `Horizontal` varies the column, `Vertical` the row, and both
    /// diagonals vary row and column together.
    pub const ALL: [Axis; 4] = [
        Axis::Horizontal,
        Axis::Vertical,
        Axis::Diagonal,
        Axis::AntiDiagonal,
    ];

    /// The two unit steps along this axis, backward direction first.
    pub fn directions(&self) -> [(isize, isize); 2] {
        match self {
            Self::Horizontal => [(0, -1), (0, 1)],
            Self::Vertical => [(-1, 0), (1, 0)],
            Self::Diagonal => [(-1, -1), (1, 1)],
            Self::AntiDiagonal => [(1, -1), (-1, 1)],
        }
    }
}

/// The five cells of a completed line, origin first, then outward cells in
/// the order the scan reached them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WinLine {
    pub axis: Axis,
    pub cells: [Position; WIN_LENGTH],
}

impl WinLine {
    pub fn contains(&self, pos: Position) -> bool {
        self.cells.contains(&pos)
    }

    pub fn to_json(&self) -> serde_json::Value {
        let cells: Vec<serde_json::Value> = self.cells.iter().map(|p| p.to_json()).collect();
        serde_json::Value::Array(cells)
    }
}

/// Result of evaluating a placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Evaluation {
    Win(WinLine),
    Draw,
    Continue,
}

/// Evaluate the stone just placed at `pos`.
///
/// A completed line always wins, even when the placement also fills the
/// board.
pub fn evaluate(board: &BoardState, pos: Position, color: Color) -> Evaluation {
    if let Some(line) = find_line(board, pos, color) {
        Evaluation::Win(line)
    } else if board.is_full() {
        Evaluation::Draw
    } else {
        Evaluation::Continue
    }
}

/// Find the first line of five through `pos`, checking axes in
/// [`Axis::ALL`] order.
pub fn find_line(board: &BoardState, pos: Position, color: Color) -> Option<WinLine> {
    Axis::ALL
        .iter()
        .find_map(|axis| scan_axis(board, pos, color, *axis))
}

fn scan_axis(board: &BoardState, origin: Position, color: Color, axis: Axis) -> Option<WinLine> {
    let stone = Stone::from(color);
    let mut cells = [origin; WIN_LENGTH];
    let mut count = 1;

    for (d_row, d_col) in axis.directions() {
        for step in 1..WIN_LENGTH {
            let Some(next) = origin.offset(d_row, d_col, step) else {
                break;
            };
            if board.get(next) != Some(stone) {
                break;
            }

            cells[count] = next;
            count += 1;
            if count == WIN_LENGTH {
                return Some(WinLine { axis, cells });
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::board::{COLS, ROWS};
    use pretty_assertions::assert_eq;

    fn pos(row: usize, col: usize) -> Position {
        Position::new(row, col)
    }

    fn board_with(stones: &[(usize, usize, Color)]) -> BoardState {
        let mut board = BoardState::new();
        for (row, col, color) in stones {
            board.place(*row as i32, *col as i32, *color).unwrap();
        }
        board
    }

    #[test]
    fn test_horizontal_line_scan_order() {
        // Origin in the middle: backward cells found first, then forward
        let board = board_with(&[
            (7, 5, Color::Black),
            (7, 6, Color::Black),
            (7, 8, Color::Black),
            (7, 9, Color::Black),
            (7, 7, Color::Black),
        ]);

        let line = find_line(&board, pos(7, 7), Color::Black).unwrap();
        assert_eq!(line.axis, Axis::Horizontal);
        assert_eq!(
            line.cells,
            [pos(7, 7), pos(7, 6), pos(7, 5), pos(7, 8), pos(7, 9)]
        );
    }

    #[test]
    fn test_vertical_line() {
        let board = board_with(&[
            (0, 3, Color::White),
            (1, 3, Color::White),
            (2, 3, Color::White),
            (3, 3, Color::White),
            (4, 3, Color::White),
        ]);

        let line = find_line(&board, pos(0, 3), Color::White).unwrap();
        assert_eq!(line.axis, Axis::Vertical);
        assert_eq!(
            line.cells,
            [pos(0, 3), pos(1, 3), pos(2, 3), pos(3, 3), pos(4, 3)]
        );
    }

    #[test]
    fn test_diagonals() {
        let diag: Vec<_> = (10..15).map(|i| (i, i, Color::Black)).collect();
        let board = board_with(&diag);
        let line = find_line(&board, pos(14, 14), Color::Black).unwrap();
        assert_eq!(line.axis, Axis::Diagonal);

        let anti: Vec<_> = (0..5).map(|i| (4 - i, i, Color::White)).collect();
        let board = board_with(&anti);
        let line = find_line(&board, pos(2, 2), Color::White).unwrap();
        assert_eq!(line.axis, Axis::AntiDiagonal);
        assert!(line.contains(pos(4, 0)));
        assert!(line.contains(pos(0, 4)));
    }

    #[test]
    fn test_four_is_not_enough() {
        let board = board_with(&[
            (7, 7, Color::Black),
            (7, 8, Color::Black),
            (7, 9, Color::Black),
            (7, 10, Color::Black),
        ]);

        assert_eq!(evaluate(&board, pos(7, 10), Color::Black), Evaluation::Continue);
    }

    #[test]
    fn test_blocked_by_other_color() {
        let board = board_with(&[
            (7, 7, Color::Black),
            (7, 8, Color::Black),
            (7, 9, Color::White),
            (7, 10, Color::Black),
            (7, 11, Color::Black),
            (7, 12, Color::Black),
        ]);

        assert!(find_line(&board, pos(7, 10), Color::Black).is_none());
    }

    #[test]
    fn test_edge_stops_scan() {
        let board = board_with(&[
            (0, 0, Color::White),
            (0, 1, Color::White),
            (0, 2, Color::White),
            (0, 3, Color::White),
        ]);

        assert!(find_line(&board, pos(0, 0), Color::White).is_none());
    }

    #[test]
    fn test_overline_still_wins() {
        let stones: Vec<_> = (2..8).map(|c| (3, c, Color::Black)).collect();
        let board = board_with(&stones);

        let line = find_line(&board, pos(3, 4), Color::Black).unwrap();
        assert_eq!(line.cells.len(), WIN_LENGTH);
    }

    #[test]
    fn test_double_line_reports_first_axis() {
        // (7,7) completes both a row and a column
        let mut stones = Vec::new();
        for i in 3..7 {
            stones.push((7, i, Color::Black));
            stones.push((i, 7, Color::Black));
        }
        stones.push((7, 7, Color::Black));
        let board = board_with(&stones);

        match evaluate(&board, pos(7, 7), Color::Black) {
            Evaluation::Win(line) => assert_eq!(line.axis, Axis::Horizontal),
            other => panic!("expected a win, got {:?}", other),
        }
    }

    #[test]
    fn test_symmetry_under_rotation_and_mirror() {
        type Transform = fn(usize, usize) -> (usize, usize);
        let transforms: [Transform; 4] = [
            |r, c| (r, c),
            |r, c| (c, ROWS - 1 - r),
            |r, c| (ROWS - 1 - r, COLS - 1 - c),
            |r, c| (r, COLS - 1 - c),
        ];
        let lines: [[(usize, usize); 5]; 4] = [
            [(2, 3), (2, 4), (2, 5), (2, 6), (2, 7)],
            [(9, 1), (10, 1), (11, 1), (12, 1), (13, 1)],
            [(4, 4), (5, 5), (6, 6), (7, 7), (8, 8)],
            [(10, 0), (9, 1), (8, 2), (7, 3), (6, 4)],
        ];

        for line in lines {
            for transform in transforms {
                let cells: Vec<(usize, usize)> =
                    line.iter().map(|(r, c)| transform(*r, *c)).collect();
                let stones: Vec<_> =
                    cells.iter().map(|(r, c)| (*r, *c, Color::White)).collect();
                let board = board_with(&stones);

                for (r, c) in &cells {
                    let found = find_line(&board, pos(*r, *c), Color::White)
                        .unwrap_or_else(|| panic!("no line through ({}, {})", r, c));
                    let mut got: Vec<_> = found.cells.iter().map(|p| (p.row, p.col)).collect();
                    let mut want = cells.clone();
                    got.sort();
                    want.sort();
                    assert_eq!(got, want);
                }
            }
        }
    }

    #[test]
    fn test_win_on_last_cell_beats_draw() {
        let mut board = BoardState::new();
        for row in 0..ROWS {
            for col in 0..COLS {
                if row == 0 && col == 4 {
                    continue;
                }
                // Row 0 all black; the rest a pattern with no five
                let color = if row == 0 || ((col + 2 * row + row / 2) / 2) % 2 == 0 {
                    Color::Black
                } else {
                    Color::White
                };
                board.place(row as i32, col as i32, color).unwrap();
            }
        }
        board.place(0, 4, Color::Black).unwrap();

        assert!(board.is_full());
        assert!(matches!(
            evaluate(&board, pos(0, 4), Color::Black),
            Evaluation::Win(_)
        ));
    }
}
