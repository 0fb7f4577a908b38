use crate::{Cell, Difficulty, Grid, Position, Solution, BOX_SIZE, GRID_SIZE};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Maximum random offset added to a tier's base reveal count, so a beginner
/// puzzle shows anywhere from 36 to 40 cells.
pub const REVEAL_OFFSET_MAX: usize = 4;

type WorkBoard = [[Option<u8>; GRID_SIZE]; GRID_SIZE];

/// Produces solved boards and derives playable puzzles from them.
pub struct Generator {
    rng: StdRng,
}

impl Default for Generator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator {
    /// Create a generator seeded from OS entropy.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Create a generator with a fixed seed for reproducibility.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Generate a randomized, fully valid solution board.
    ///
    /// The three diagonal boxes share no row or column, so each is filled
    /// with an independent random permutation first; backtracking then
    /// completes the remaining 54 cells.
    pub fn generate_solution(&mut self) -> Solution {
        let mut cells: WorkBoard = [[None; GRID_SIZE]; GRID_SIZE];

        for start in (0..GRID_SIZE).step_by(BOX_SIZE) {
            self.fill_box(&mut cells, start, start);
        }

        if !Self::solve(&mut cells) {
            // A diagonal seed is always completable; getting here means the
            // search itself is broken.
            unreachable!("backtracking failed on a diagonal-seeded board");
        }

        Solution::from_cells(&cells)
    }

    /// Derive a playable puzzle by revealing `reveal_count + offset` cells of
    /// the solution at uniformly random positions. No uniqueness check is
    /// performed; the stored solution stays the only winning completion.
    pub fn derive_puzzle(&mut self, solution: &Solution, difficulty: Difficulty) -> Grid {
        let reveal = difficulty.reveal_count() + self.rng.gen_range(0..=REVEAL_OFFSET_MAX);

        let mut positions: Vec<Position> = Position::all().collect();
        positions.shuffle(&mut self.rng);

        let mut grid = Grid::new();
        for &pos in positions.iter().take(reveal) {
            *grid.cell_mut(pos) = Cell::given(solution.get(pos));
        }
        grid
    }

    /// Fill one 3x3 box with a random permutation of 1..=9.
    fn fill_box(&mut self, cells: &mut WorkBoard, start_row: usize, start_col: usize) {
        let mut digits: Vec<u8> = (1..=9).collect();
        digits.shuffle(&mut self.rng);

        let mut idx = 0;
        for row in start_row..start_row + BOX_SIZE {
            for col in start_col..start_col + BOX_SIZE {
                cells[row][col] = Some(digits[idx]);
                idx += 1;
            }
        }
    }

    /// Classic backtracking fill: first empty cell in row-major order,
    /// candidates ascending. Recursion depth is bounded by the number of
    /// empty cells (at most 54 after the diagonal seed).
    fn solve(cells: &mut WorkBoard) -> bool {
        let Some((row, col)) = Self::first_empty(cells) else {
            return true;
        };

        for digit in 1..=9 {
            if Self::is_safe(cells, row, col, digit) {
                cells[row][col] = Some(digit);
                if Self::solve(cells) {
                    return true;
                }
                cells[row][col] = None;
            }
        }

        false
    }

    fn first_empty(cells: &WorkBoard) -> Option<(usize, usize)> {
        for row in 0..GRID_SIZE {
            for col in 0..GRID_SIZE {
                if cells[row][col].is_none() {
                    return Some((row, col));
                }
            }
        }
        None
    }

    fn is_safe(cells: &WorkBoard, row: usize, col: usize, digit: u8) -> bool {
        !Self::used_in_row(cells, row, digit)
            && !Self::used_in_col(cells, col, digit)
            && !Self::used_in_box(cells, row - row % BOX_SIZE, col - col % BOX_SIZE, digit)
    }

    fn used_in_row(cells: &WorkBoard, row: usize, digit: u8) -> bool {
        cells[row].contains(&Some(digit))
    }

    fn used_in_col(cells: &WorkBoard, col: usize, digit: u8) -> bool {
        cells.iter().any(|row| row[col] == Some(digit))
    }

    fn used_in_box(cells: &WorkBoard, start_row: usize, start_col: usize, digit: u8) -> bool {
        cells[start_row..start_row + BOX_SIZE]
            .iter()
            .any(|row| row[start_col..start_col + BOX_SIZE].contains(&Some(digit)))
    }
}
