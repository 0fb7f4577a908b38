use crate::{Difficulty, Generator, Grid, Position, Solution, GRID_SIZE};
use serde::{Deserialize, Serialize};

/// Maximum number of hints per session.
pub const HINT_LIMIT: usize = 10;

/// Points awarded for a correct entry.
const CORRECT_REWARD: u32 = 10;
/// Points deducted for a wrong entry (floored at zero).
const WRONG_PENALTY: u32 = 2;
/// The k-th hint costs `HINT_BASE_COST + k` points.
const HINT_BASE_COST: u32 = 3;
/// Winning within this many seconds earns `ceiling - elapsed` bonus points.
const TIME_BONUS_CEILING: u64 = 500;

/// A cursor movement direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// An already-decoded player input. The frontend translates raw key events
/// into intents; the engine never sees keyboards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    /// Enter a digit 1..=9 at the selected cell.
    Digit(u8),
    /// Clear the selected cell.
    Clear,
    /// Move the selection, wrapping around the board edges.
    Move(Direction),
}

/// Point-in-time copy of the session-mutable fields, used for undo/redo.
/// Selection and win state are deliberately not captured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    grid: Grid,
    score: u32,
    hints_used: usize,
}

/// One game session: the live grid, its solution, and everything the player
/// can change. Created per new game and replaced wholesale by the next one.
///
/// Every mutating operation is a silent no-op when its preconditions fail
/// (cell prefilled, hint budget spent, game already won, ...); these are
/// ordinary UI races, not errors.
#[derive(Debug, Clone)]
pub struct Game {
    grid: Grid,
    solution: Solution,
    difficulty: Difficulty,
    selected: Option<Position>,
    score: u32,
    hints_used: usize,
    won: bool,
    past: Vec<Snapshot>,
    future: Vec<Snapshot>,
    elapsed_secs: u64,
    timer_running: bool,
}

impl Game {
    /// Start a new session with a freshly generated puzzle.
    pub fn new(difficulty: Difficulty) -> Self {
        Self::from_generator(Generator::new(), difficulty)
    }

    /// Start a new session from a fixed seed, for reproducible games.
    pub fn with_seed(difficulty: Difficulty, seed: u64) -> Self {
        Self::from_generator(Generator::with_seed(seed), difficulty)
    }

    fn from_generator(mut generator: Generator, difficulty: Difficulty) -> Self {
        let solution = generator.generate_solution();
        let grid = generator.derive_puzzle(&solution, difficulty);
        Self {
            grid,
            solution,
            difficulty,
            selected: None,
            score: 0,
            hints_used: 0,
            won: false,
            past: Vec::new(),
            future: Vec::new(),
            elapsed_secs: 0,
            timer_running: true,
        }
    }

    // ---- Observables ----

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// The stored solution, exposed for diagnostics and tests.
    pub fn solution(&self) -> &Solution {
        &self.solution
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn selected(&self) -> Option<Position> {
        self.selected
    }

    /// The digit shown at the selected cell, if any. Derived, never stored.
    pub fn selected_value(&self) -> Option<u8> {
        self.selected.and_then(|pos| self.grid.value(pos))
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn hints_used(&self) -> usize {
        self.hints_used
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }

    pub fn is_won(&self) -> bool {
        self.won
    }

    pub fn can_undo(&self) -> bool {
        !self.won && !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.won && !self.future.is_empty()
    }

    /// A digit may be entered only while fewer than nine instances of it are
    /// on the grid. Wrong placements count too, so a digit can be exhausted
    /// before its correct cell is ever filled; that quirk is intentional.
    pub fn is_digit_available(&self, digit: u8) -> bool {
        self.grid.count_of(digit) < GRID_SIZE
    }

    // ---- Player operations ----

    /// Move the selection cursor. Always succeeds; not undoable.
    pub fn select_cell(&mut self, pos: Position) {
        self.selected = Some(pos);
    }

    /// Enter a digit at the selected cell.
    ///
    /// Returns `Some(correct)` when a placement happened, `None` on a no-op.
    /// A correct entry awards points and may complete the game; a wrong one
    /// marks the cell as an error and deducts points (floored at zero).
    pub fn enter_digit(&mut self, digit: u8) -> Option<bool> {
        if self.won || !(1..=9).contains(&digit) {
            return None;
        }
        let pos = self.selected?;
        if self.grid.cell(pos).prefilled || !self.is_digit_available(digit) {
            return None;
        }

        self.push_snapshot();

        let correct = self.solution.get(pos) == digit;
        let cell = self.grid.cell_mut(pos);
        cell.value = Some(digit);
        cell.is_error = !correct;

        if correct {
            self.score += CORRECT_REWARD;
            if self.check_win() {
                self.handle_win();
            }
        } else {
            self.score = self.score.saturating_sub(WRONG_PENALTY);
        }

        Some(correct)
    }

    /// Reset the selected cell to empty. No-op on prefilled or empty cells.
    pub fn clear_cell(&mut self) -> bool {
        if self.won {
            return false;
        }
        let Some(pos) = self.selected else {
            return false;
        };
        let cell = *self.grid.cell(pos);
        if cell.prefilled || cell.value.is_none() {
            return false;
        }

        self.push_snapshot();
        *self.grid.cell_mut(pos) = crate::Cell::empty();
        true
    }

    /// Fill the selected cell with the solution digit, spending one hint.
    ///
    /// Each successive hint costs more than the last: the k-th hint deducts
    /// `3 + k` points (floored at zero). No-op once the budget of
    /// [`HINT_LIMIT`] is spent, or when the cell is prefilled or already
    /// correct.
    pub fn use_hint(&mut self) -> bool {
        if self.won || self.hints_used >= HINT_LIMIT {
            return false;
        }
        let Some(pos) = self.selected else {
            return false;
        };
        let cell = self.grid.cell(pos);
        if cell.prefilled || cell.value == Some(self.solution.get(pos)) {
            return false;
        }

        self.push_snapshot();

        let digit = self.solution.get(pos);
        let cell = self.grid.cell_mut(pos);
        cell.value = Some(digit);
        cell.is_error = false;

        self.hints_used += 1;
        self.score = self
            .score
            .saturating_sub(HINT_BASE_COST + self.hints_used as u32);

        if self.check_win() {
            self.handle_win();
        }
        true
    }

    /// Restore the most recent snapshot. Selection and win state are left
    /// untouched.
    pub fn undo(&mut self) -> bool {
        if self.won {
            return false;
        }
        let Some(previous) = self.past.pop() else {
            return false;
        };
        self.future.push(self.snapshot());
        self.restore(previous);
        true
    }

    /// Reapply the most recently undone snapshot.
    pub fn redo(&mut self) -> bool {
        if self.won {
            return false;
        }
        let Some(next) = self.future.pop() else {
            return false;
        };
        self.past.push(self.snapshot());
        self.restore(next);
        true
    }

    /// True iff the grid is completely filled and matches the stored
    /// solution cell-for-cell. An alternate valid completion that deviates
    /// from the stored solution does not win.
    pub fn check_win(&self) -> bool {
        Position::all().all(|pos| self.grid.value(pos) == Some(self.solution.get(pos)))
    }

    /// The one-way transition to the won state: stop the clock, award the
    /// time bonus, and drop the undo/redo history. Score submission is the
    /// caller's responsibility and never blocks this transition.
    pub fn handle_win(&mut self) {
        if self.won {
            return;
        }
        self.stop_timer();
        self.score += TIME_BONUS_CEILING.saturating_sub(self.elapsed_secs) as u32;
        self.past.clear();
        self.future.clear();
        self.won = true;
    }

    /// Dispatch an already-decoded input intent. Ignored once won.
    pub fn handle_input(&mut self, intent: Intent) {
        if self.won {
            return;
        }
        match intent {
            Intent::Digit(digit) => {
                self.enter_digit(digit);
            }
            Intent::Clear => {
                self.clear_cell();
            }
            Intent::Move(direction) => self.move_selection(direction),
        }
    }

    /// Advance the elapsed-time counter by one second. The engine has no
    /// timer of its own; the frontend delivers these ticks.
    pub fn tick_second(&mut self) {
        if self.timer_running && !self.won {
            self.elapsed_secs += 1;
        }
    }

    pub fn stop_timer(&mut self) {
        self.timer_running = false;
    }

    // ---- Internals ----

    fn move_selection(&mut self, direction: Direction) {
        let Some(pos) = self.selected else {
            return;
        };
        let next = match direction {
            Direction::Up => Position::new((pos.row + GRID_SIZE - 1) % GRID_SIZE, pos.col),
            Direction::Down => Position::new((pos.row + 1) % GRID_SIZE, pos.col),
            Direction::Left => Position::new(pos.row, (pos.col + GRID_SIZE - 1) % GRID_SIZE),
            Direction::Right => Position::new(pos.row, (pos.col + 1) % GRID_SIZE),
        };
        self.select_cell(next);
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            grid: self.grid.clone(),
            score: self.score,
            hints_used: self.hints_used,
        }
    }

    /// Record the pre-mutation state. Any new action forks history, so the
    /// redo stack is dropped.
    fn push_snapshot(&mut self) {
        let snapshot = self.snapshot();
        self.past.push(snapshot);
        self.future.clear();
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.grid = snapshot.grid;
        self.score = snapshot.score;
        self.hints_used = snapshot.hints_used;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Cell;

    fn beginner() -> Game {
        Game::with_seed(Difficulty::Beginner, 42)
    }

    /// First empty cell in row-major order.
    fn first_empty(game: &Game) -> Position {
        Position::all()
            .find(|&pos| game.grid().value(pos).is_none())
            .expect("puzzle has empty cells")
    }

    fn wrong_digit_at(game: &Game, pos: Position) -> u8 {
        let correct = game.solution().get(pos);
        if correct == 9 {
            1
        } else {
            correct + 1
        }
    }

    #[test]
    fn new_game_beginner_band() {
        let game = beginner();
        let shown = game.grid().prefilled_count();
        assert!((36..=40).contains(&shown), "prefilled count {shown}");
        assert_eq!(game.score(), 0);
        assert_eq!(game.hints_used(), 0);
        assert!(!game.is_won());
        assert!(!game.can_undo());
        assert!(!game.can_redo());
    }

    #[test]
    fn correct_entry_scores_ten() {
        let mut game = beginner();
        let pos = first_empty(&game);
        game.select_cell(pos);

        let correct = game.solution().get(pos);
        assert_eq!(game.enter_digit(correct), Some(true));
        assert_eq!(game.grid().value(pos), Some(correct));
        assert!(!game.grid().cell(pos).is_error);
        assert_eq!(game.score(), 10);
    }

    #[test]
    fn wrong_entry_marks_error_and_floors_score() {
        let mut game = beginner();
        let pos = first_empty(&game);
        game.select_cell(pos);

        // Score is 0, so the -2 penalty floors at 0.
        assert_eq!(game.enter_digit(wrong_digit_at(&game, pos)), Some(false));
        assert!(game.grid().cell(pos).is_error);
        assert_eq!(game.score(), 0);

        // With headroom the penalty is exactly 2.
        game.undo();
        let correct = game.solution().get(pos);
        game.enter_digit(correct);
        assert_eq!(game.score(), 10);

        let other = Position::all()
            .find(|&p| game.grid().value(p).is_none())
            .unwrap();
        game.select_cell(other);
        game.enter_digit(wrong_digit_at(&game, other));
        assert_eq!(game.score(), 8);
    }

    #[test]
    fn prefilled_cells_are_immutable() {
        let mut game = beginner();
        let pos = Position::all()
            .find(|&p| game.grid().cell(p).prefilled)
            .unwrap();
        let before = *game.grid().cell(pos);

        game.select_cell(pos);
        assert_eq!(game.enter_digit(wrong_digit_at(&game, pos)), None);
        assert!(!game.clear_cell());
        assert!(!game.use_hint());
        assert_eq!(*game.grid().cell(pos), before);
        assert!(!game.can_undo()); // no snapshot taken by the no-ops
    }

    #[test]
    fn undo_redo_round_trip() {
        let mut game = beginner();
        let pos = first_empty(&game);
        game.select_cell(pos);

        let before_grid = game.grid().clone();
        let correct = game.solution().get(pos);
        game.enter_digit(correct);
        let after_grid = game.grid().clone();

        assert!(game.undo());
        assert_eq!(*game.grid(), before_grid);
        assert_eq!(game.score(), 0);
        assert_eq!(game.selected(), Some(pos)); // selection not in snapshots

        assert!(game.redo());
        assert_eq!(*game.grid(), after_grid);
        assert_eq!(game.score(), 10);

        // Empty stacks are no-ops.
        assert!(game.undo());
        assert!(!game.undo());
    }

    #[test]
    fn new_action_clears_redo_stack() {
        let mut game = beginner();
        let pos = first_empty(&game);
        game.select_cell(pos);

        game.enter_digit(game.solution().get(pos));
        game.undo();
        assert!(game.can_redo());

        game.enter_digit(wrong_digit_at(&game, pos));
        assert!(!game.can_redo());
    }

    #[test]
    fn clear_cell_is_undoable() {
        let mut game = beginner();
        let pos = first_empty(&game);
        game.select_cell(pos);

        game.enter_digit(game.solution().get(pos));
        assert!(game.clear_cell());
        assert_eq!(*game.grid().cell(pos), Cell::empty());

        assert!(game.undo());
        assert_eq!(game.grid().value(pos), Some(game.solution().get(pos)));

        // Clearing an already-empty cell is a no-op.
        game.undo();
        assert!(!game.clear_cell());
    }

    #[test]
    fn hint_cost_grows_and_floors() {
        let mut game = beginner();
        let pos = first_empty(&game);
        game.select_cell(pos);
        game.enter_digit(game.solution().get(pos));
        assert_eq!(game.score(), 10);

        // Hint on an already-correct cell is a no-op.
        assert!(!game.use_hint());

        // 1st hint costs 4, 2nd costs 5, 3rd costs 6 (floored at 0).
        let empties: Vec<Position> = Position::all()
            .filter(|&p| game.grid().value(p).is_none())
            .collect();
        let expected = [6u32, 1, 0];
        for (&pos, want) in empties.iter().zip(expected) {
            game.select_cell(pos);
            assert!(game.use_hint());
            assert_eq!(game.score(), want);
            assert!(!game.grid().cell(pos).is_error);
        }
        assert_eq!(game.hints_used(), 3);
    }

    #[test]
    fn eleventh_hint_is_a_noop() {
        let mut game = beginner();
        let empties: Vec<Position> = Position::all()
            .filter(|&p| game.grid().value(p).is_none())
            .collect();
        assert!(empties.len() > HINT_LIMIT, "beginner leaves >10 empty cells");
        let mut empties = empties.into_iter();

        for _ in 0..HINT_LIMIT {
            let pos = empties.next().unwrap();
            game.select_cell(pos);
            assert!(game.use_hint());
        }
        assert_eq!(game.hints_used(), HINT_LIMIT);

        let pos = empties.next().unwrap();
        game.select_cell(pos);
        assert!(!game.use_hint());
        assert_eq!(game.hints_used(), HINT_LIMIT);
        assert_eq!(game.grid().value(pos), None);
    }

    #[test]
    fn digit_exhaustion_counts_wrong_placements() {
        let mut game = beginner();
        let digit = 5u8;

        // Keep placing 5s (right or wrong) until nine are on the board.
        let empties: Vec<Position> = Position::all()
            .filter(|&p| game.grid().value(p).is_none())
            .collect();
        let mut iter = empties.iter();
        while game.grid().count_of(digit) < GRID_SIZE {
            let &pos = iter.next().expect("enough empty cells to exhaust a digit");
            game.select_cell(pos);
            assert!(game.enter_digit(digit).is_some());
        }

        assert!(!game.is_digit_available(digit));

        // The guard rejects a tenth placement even on a cell whose correct
        // value is that digit.
        let pos = iter
            .find(|&&p| game.grid().value(p).is_none())
            .copied()
            .expect("an empty cell remains");
        game.select_cell(pos);
        assert_eq!(game.enter_digit(digit), None);
        assert_eq!(game.grid().value(pos), None);
    }

    #[test]
    fn movement_wraps_around_edges() {
        let mut game = beginner();

        game.select_cell(Position::new(0, 0));
        game.handle_input(Intent::Move(Direction::Up));
        assert_eq!(game.selected(), Some(Position::new(8, 0)));

        game.select_cell(Position::new(0, 0));
        game.handle_input(Intent::Move(Direction::Left));
        assert_eq!(game.selected(), Some(Position::new(0, 8)));

        game.select_cell(Position::new(8, 8));
        game.handle_input(Intent::Move(Direction::Down));
        assert_eq!(game.selected(), Some(Position::new(0, 8)));

        game.select_cell(Position::new(8, 8));
        game.handle_input(Intent::Move(Direction::Right));
        assert_eq!(game.selected(), Some(Position::new(8, 0)));

        // Movement without a selection is a no-op.
        let mut fresh = beginner();
        fresh.handle_input(Intent::Move(Direction::Down));
        assert_eq!(fresh.selected(), None);
    }

    #[test]
    fn selected_value_is_derived() {
        let mut game = beginner();
        let pos = first_empty(&game);
        game.select_cell(pos);
        assert_eq!(game.selected_value(), None);

        game.enter_digit(game.solution().get(pos));
        assert_eq!(game.selected_value(), Some(game.solution().get(pos)));
    }

    #[test]
    fn timer_only_advances_on_ticks() {
        let mut game = beginner();
        game.tick_second();
        game.tick_second();
        game.tick_second();
        assert_eq!(game.elapsed_secs(), 3);

        game.stop_timer();
        game.tick_second();
        assert_eq!(game.elapsed_secs(), 3);
    }

    /// Fill every empty cell with its solution digit through the normal
    /// entry path, which must end in the win sequence.
    #[test]
    fn completing_the_grid_wins() {
        let mut game = beginner();
        game.tick_second(); // 1 second elapsed -> bonus of 499

        let empties: Vec<Position> = Position::all()
            .filter(|&p| game.grid().value(p).is_none())
            .collect();
        let entries = empties.len() as u32;

        for pos in empties {
            game.select_cell(pos);
            assert_eq!(game.enter_digit(game.solution().get(pos)), Some(true));
        }

        assert!(game.check_win());
        assert!(game.is_won());
        assert_eq!(game.score(), entries * 10 + 499);

        // History is gone and the session is frozen.
        assert!(!game.can_undo());
        assert!(!game.can_redo());
        assert!(!game.undo());
        let pos = Position::new(0, 0);
        game.select_cell(pos);
        assert_eq!(game.enter_digit(1), None);
        assert!(!game.clear_cell());
        assert!(!game.use_hint());

        // Clock is stopped.
        game.tick_second();
        assert_eq!(game.elapsed_secs(), 1);
    }

    #[test]
    fn check_win_requires_exact_solution_match() {
        let mut game = beginner();
        let empties: Vec<Position> = Position::all()
            .filter(|&p| game.grid().value(p).is_none())
            .collect();

        // Fill all but the last correctly; the last one wrongly.
        let (&last, rest) = empties.split_last().unwrap();
        for &pos in rest {
            game.select_cell(pos);
            game.enter_digit(game.solution().get(pos));
        }
        game.select_cell(last);
        let wrong = wrong_digit_at(&game, last);
        // The wrong digit may already be exhausted; then the board simply
        // stays incomplete. Either way this is not a win.
        game.enter_digit(wrong);

        assert!(!game.check_win());
        assert!(!game.is_won());
    }

    #[test]
    fn handle_win_is_externally_invokable_and_idempotent() {
        let mut game = beginner();
        for _ in 0..30 {
            game.tick_second();
        }
        game.handle_win();
        assert!(game.is_won());
        assert_eq!(game.score(), 470);

        // A second invocation must not award the bonus again.
        game.handle_win();
        assert_eq!(game.score(), 470);
    }

    #[test]
    fn late_win_gets_no_bonus() {
        let mut game = beginner();
        for _ in 0..600 {
            game.tick_second();
        }
        game.handle_win();
        assert_eq!(game.score(), 0);
    }

    #[test]
    fn undo_restores_hints_used() {
        let mut game = beginner();
        let pos = first_empty(&game);
        game.select_cell(pos);
        assert!(game.use_hint());
        assert_eq!(game.hints_used(), 1);

        assert!(game.undo());
        assert_eq!(game.hints_used(), 0);
        assert!(game.redo());
        assert_eq!(game.hints_used(), 1);
    }
}
