use crate::app::{App, MenuState, ScreenState};
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    execute,
    style::{Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use rustdoku_core::{Difficulty, Position, HINT_LIMIT};
use std::io;

/// Left edge of the grid.
const GRID_LEFT: u16 = 2;
/// First terminal row of the grid frame.
const GRID_TOP: u16 = 3;
/// Column where overlays (menu) start, right of the grid.
const SIDE_LEFT: u16 = 32;

/// Format seconds as MM:SS.
pub fn format_time(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

pub fn render(stdout: &mut io::Stdout, app: &App) -> io::Result<()> {
    execute!(stdout, Hide, Clear(ClearType::All), ResetColor)?;

    match app.screen {
        ScreenState::Playing => render_game_screen(stdout, app)?,
        ScreenState::Leaderboard => render_leaderboard_screen(stdout, app)?,
    }

    execute!(stdout, Show)?;
    Ok(())
}

fn render_game_screen(stdout: &mut io::Stdout, app: &App) -> io::Result<()> {
    let theme = &app.theme;
    let game = &app.game;

    // Header
    execute!(
        stdout,
        MoveTo(GRID_LEFT, 0),
        SetForegroundColor(theme.fg),
        Print(format!("RUSTDOKU [{}]", game.difficulty())),
        MoveTo(GRID_LEFT, 1),
        SetForegroundColor(theme.info),
        Print(format!(
            "Score {:<5} Hints {}/{}   Time {}",
            game.score(),
            game.hints_used(),
            HINT_LIMIT,
            format_time(game.elapsed_secs()),
        )),
    )?;

    render_grid(stdout, app)?;

    // Digit availability: exhausted digits are dimmed out.
    execute!(stdout, MoveTo(GRID_LEFT, GRID_TOP + 14))?;
    for digit in 1..=9u8 {
        if game.is_digit_available(digit) {
            execute!(stdout, SetForegroundColor(theme.fg), Print(format!("{digit} ")))?;
        } else {
            execute!(stdout, SetForegroundColor(theme.border), Print("· "))?;
        }
    }

    if game.is_won() {
        execute!(
            stdout,
            MoveTo(GRID_LEFT, GRID_TOP + 16),
            SetForegroundColor(theme.success),
            Print(format!(
                "Solved in {}, final score {}",
                format_time(game.elapsed_secs()),
                game.score()
            )),
        )?;
    } else if let Some(ref message) = app.message {
        execute!(
            stdout,
            MoveTo(GRID_LEFT, GRID_TOP + 16),
            SetForegroundColor(theme.key),
            Print(message),
        )?;
    }

    // Key help
    execute!(
        stdout,
        MoveTo(GRID_LEFT, GRID_TOP + 18),
        SetForegroundColor(theme.info),
        Print("arrows/hjkl move   1-9 enter   0 clear   u undo   ^r redo"),
        MoveTo(GRID_LEFT, GRID_TOP + 19),
        Print("? hint   n new game   b scores   t theme   q quit"),
        ResetColor,
    )?;

    if app.menu == MenuState::NewGame {
        render_menu(stdout, app)?;
    }

    Ok(())
}

fn render_grid(stdout: &mut io::Stdout, app: &App) -> io::Result<()> {
    let theme = &app.theme;
    let game = &app.game;

    // Frame: 9 cell rows plus a border line above every band.
    execute!(stdout, SetForegroundColor(theme.border))?;
    for band in 0..4u16 {
        execute!(
            stdout,
            MoveTo(GRID_LEFT, GRID_TOP + band * 4),
            Print("+-------+-------+-------+"),
        )?;
    }
    for row in 0..9u16 {
        let y = GRID_TOP + 1 + row + row / 3;
        for x in [0u16, 8, 16, 24] {
            execute!(stdout, MoveTo(GRID_LEFT + x, y), Print("|"))?;
        }
    }

    let selected = game.selected();
    for pos in Position::all() {
        let cell = game.grid().cell(pos);
        let x = GRID_LEFT + (pos.col as u16 / 3) * 8 + 2 + 2 * (pos.col as u16 % 3);
        let y = GRID_TOP + 1 + pos.row as u16 + pos.row as u16 / 3;

        let is_selected = selected == Some(pos);
        let is_highlighted = selected.is_some_and(|s| {
            s.row == pos.row || s.col == pos.col || s.box_index() == pos.box_index()
        });

        if is_selected {
            execute!(stdout, SetBackgroundColor(theme.selected_bg))?;
        } else if is_highlighted {
            execute!(stdout, SetBackgroundColor(theme.highlight_bg))?;
        }

        let fg = if cell.is_error {
            theme.error
        } else if cell.prefilled {
            theme.given
        } else {
            theme.filled
        };
        let glyph = match cell.value {
            Some(digit) => char::from(b'0' + digit),
            None => ' ',
        };
        execute!(
            stdout,
            MoveTo(x.saturating_sub(1), y),
            SetForegroundColor(fg),
            Print(format!(" {glyph} ")),
            ResetColor,
        )?;
    }

    Ok(())
}

fn render_menu(stdout: &mut io::Stdout, app: &App) -> io::Result<()> {
    let theme = &app.theme;
    execute!(
        stdout,
        MoveTo(SIDE_LEFT, GRID_TOP),
        SetForegroundColor(theme.fg),
        Print("New game"),
    )?;

    for (idx, tier) in Difficulty::all().iter().enumerate() {
        let y = GRID_TOP + 2 + idx as u16;
        if idx == app.menu_selection {
            execute!(
                stdout,
                MoveTo(SIDE_LEFT, y),
                SetForegroundColor(theme.key),
                Print(format!("> {tier}")),
            )?;
        } else {
            execute!(
                stdout,
                MoveTo(SIDE_LEFT, y),
                SetForegroundColor(theme.info),
                Print(format!("  {tier}")),
            )?;
        }
    }

    execute!(
        stdout,
        MoveTo(SIDE_LEFT, GRID_TOP + 7),
        SetForegroundColor(theme.info),
        Print("enter select   esc cancel"),
        ResetColor,
    )?;
    Ok(())
}

fn render_leaderboard_screen(stdout: &mut io::Stdout, app: &App) -> io::Result<()> {
    let theme = &app.theme;

    execute!(
        stdout,
        MoveTo(GRID_LEFT, 0),
        SetForegroundColor(theme.fg),
        Print("TOP SCORES"),
        MoveTo(GRID_LEFT, 1),
        SetForegroundColor(theme.border),
        Print("----------------------------------------------------"),
    )?;

    if app.leaderboard.is_empty() {
        execute!(
            stdout,
            MoveTo(GRID_LEFT, 3),
            SetForegroundColor(theme.info),
            Print("No scores yet"),
        )?;
    }

    for (idx, entry) in app.leaderboard.iter().enumerate() {
        let y = 3 + idx as u16;
        execute!(
            stdout,
            MoveTo(GRID_LEFT, y),
            SetForegroundColor(theme.key),
            Print(format!("{:>2}.", idx + 1)),
            SetForegroundColor(theme.fg),
            Print(format!(" {:<24}", entry.player_name)),
            SetForegroundColor(theme.filled),
            Print(format!(" {:>5}", entry.score)),
            SetForegroundColor(theme.info),
            Print(format!(
                "  {}  {}",
                format_time(entry.game_time_secs),
                entry.difficulty
            )),
        )?;
    }

    execute!(
        stdout,
        MoveTo(GRID_LEFT, 15),
        SetForegroundColor(theme.info),
        Print("q back"),
        ResetColor,
    )?;
    Ok(())
}
