use serde::{Deserialize, Serialize};

/// Side length of the board.
pub const GRID_SIZE: usize = 9;

/// Side length of a box (3x3 subgrid).
pub const BOX_SIZE: usize = 3;

/// Total number of cells on the board.
pub const CELL_COUNT: usize = GRID_SIZE * GRID_SIZE;

/// A cell coordinate on the 9x9 board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    /// Create a position. Panics on out-of-range coordinates.
    pub fn new(row: usize, col: usize) -> Self {
        assert!(row < GRID_SIZE && col < GRID_SIZE);
        Self { row, col }
    }

    /// Index of the 3x3 box containing this position (0..9, row-major).
    pub fn box_index(&self) -> usize {
        (self.row / BOX_SIZE) * BOX_SIZE + self.col / BOX_SIZE
    }

    /// All 81 positions in row-major order.
    pub fn all() -> impl Iterator<Item = Position> {
        (0..GRID_SIZE).flat_map(|row| (0..GRID_SIZE).map(move |col| Position { row, col }))
    }
}

/// A single player-facing cell.
///
/// A `prefilled` cell was revealed at puzzle start and is never mutated by
/// player operations. `is_error` is a display flag: set iff the cell holds a
/// player-entered value that differs from the solution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub value: Option<u8>,
    pub prefilled: bool,
    pub is_error: bool,
}

impl Cell {
    /// An empty, player-editable cell.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A cell revealed at puzzle start.
    pub fn given(value: u8) -> Self {
        Self {
            value: Some(value),
            prefilled: true,
            is_error: false,
        }
    }
}

/// The mutable, player-facing 9x9 board.
///
/// Plain value type: cloning produces a deep copy with no shared backing
/// storage, which is what the session's snapshot history relies on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    cells: [[Cell; GRID_SIZE]; GRID_SIZE],
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

impl Grid {
    /// An all-empty grid.
    pub fn new() -> Self {
        Self {
            cells: [[Cell::empty(); GRID_SIZE]; GRID_SIZE],
        }
    }

    pub fn cell(&self, pos: Position) -> &Cell {
        &self.cells[pos.row][pos.col]
    }

    pub fn cell_mut(&mut self, pos: Position) -> &mut Cell {
        &mut self.cells[pos.row][pos.col]
    }

    /// Value at a position, `None` when empty.
    pub fn value(&self, pos: Position) -> Option<u8> {
        self.cells[pos.row][pos.col].value
    }

    /// How many cells currently hold the given digit (prefilled included).
    pub fn count_of(&self, digit: u8) -> usize {
        Position::all()
            .filter(|&pos| self.value(pos) == Some(digit))
            .count()
    }

    /// Number of prefilled cells.
    pub fn prefilled_count(&self) -> usize {
        Position::all().filter(|&pos| self.cell(pos).prefilled).count()
    }

    /// True when no cell is empty.
    pub fn is_full(&self) -> bool {
        Position::all().all(|pos| self.value(pos).is_some())
    }
}

/// A complete, valid solution board. Immutable for the session's lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Solution {
    digits: [[u8; GRID_SIZE]; GRID_SIZE],
}

impl Solution {
    /// Build from a fully-filled working board. Panics if any cell is empty;
    /// the generator guarantees completeness before converting.
    pub(crate) fn from_cells(cells: &[[Option<u8>; GRID_SIZE]; GRID_SIZE]) -> Self {
        let mut digits = [[0u8; GRID_SIZE]; GRID_SIZE];
        for pos in Position::all() {
            digits[pos.row][pos.col] = cells[pos.row][pos.col]
                .unwrap_or_else(|| panic!("incomplete board at {:?}", pos));
        }
        Self { digits }
    }

    pub fn get(&self, pos: Position) -> u8 {
        self.digits[pos.row][pos.col]
    }

    pub fn rows(&self) -> &[[u8; GRID_SIZE]; GRID_SIZE] {
        &self.digits
    }

    /// Every row, column, and box is a permutation of 1..=9.
    pub fn is_valid(&self) -> bool {
        let permutation = |digits: [u8; GRID_SIZE]| {
            let mut seen = [false; GRID_SIZE + 1];
            digits.iter().all(|&d| {
                if !(1..=9).contains(&d) || seen[d as usize] {
                    return false;
                }
                seen[d as usize] = true;
                true
            })
        };

        for i in 0..GRID_SIZE {
            let row = self.digits[i];
            let col: [u8; GRID_SIZE] = std::array::from_fn(|r| self.digits[r][i]);
            let boxed: [u8; GRID_SIZE] = std::array::from_fn(|k| {
                self.digits[(i / 3) * 3 + k / 3][(i % 3) * 3 + k % 3]
            });
            if !permutation(row) || !permutation(col) || !permutation(boxed) {
                return false;
            }
        }
        true
    }
}
