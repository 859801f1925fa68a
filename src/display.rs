//! Rendering layer. All terminal output lives here.
//!
//! Each function receives a mutable writer and an immutable view of what to
//! show.  No game logic is performed; this module only translates snapshots
//! and leaderboard entries into terminal commands.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use grid_shooter::entities::{GridPosition, Snapshot, HEIGHT, WIDTH};
use grid_shooter::leaderboard::LeaderboardEntry;
use grid_shooter::session::RecordReport;
use grid_shooter::RecordOutcome;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::Blue;
const C_PLAYER: Color = Color::Green;
const C_ENEMY: Color = Color::Red;
const C_PROJECTILE: Color = Color::Yellow;
const C_TITLE: Color = Color::Yellow;
const C_HEADING: Color = Color::Green;
const C_OPTION: Color = Color::Cyan;
const C_PROMPT: Color = Color::Magenta;
const C_HINT: Color = Color::Blue;

/// Top-left corner of the board on screen.
const BOARD_LEFT: u16 = 4;
const BOARD_TOP: u16 = 2;
/// Left margin for text screens.
const MARGIN: u16 = 4;

/// A line of text and its colour.
type Line = (String, Color);

fn line(text: impl Into<String>, color: Color) -> Line {
    (text.into(), color)
}

fn title_box(title: &str, color: Color) -> Vec<Line> {
    vec![
        line("╔═══════════════════════════════╗", color),
        line(format!("║{:^31}║", title), color),
        line("╚═══════════════════════════════╝", color),
        line("", Color::Reset),
    ]
}

/// Clear the screen and print `lines` top to bottom at the left margin.
fn draw_screen<W: Write>(out: &mut W, lines: &[Line]) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    for (i, (text, color)) in lines.iter().enumerate() {
        out.queue(cursor::MoveTo(MARGIN, BOARD_TOP + i as u16))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(text))?;
    }
    out.queue(style::ResetColor)?;
    out.flush()
}

// ── Game frame ────────────────────────────────────────────────────────────────

/// Render one complete frame of the board plus the status line.
pub fn render<W: Write>(out: &mut W, snapshot: &Snapshot) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out)?;
    for pos in &snapshot.projectiles {
        draw_cell(out, *pos, '*', C_PROJECTILE)?;
    }
    for pos in &snapshot.enemies {
        draw_cell(out, *pos, 'M', C_ENEMY)?;
    }
    draw_cell(out, snapshot.player, 'A', C_PLAYER)?;
    draw_hud(out, snapshot)?;

    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, BOARD_TOP + HEIGHT as u16 + 4))?;
    out.flush()
}

fn draw_cell<W: Write>(
    out: &mut W,
    pos: GridPosition,
    glyph: char,
    color: Color,
) -> std::io::Result<()> {
    if !pos.in_bounds() {
        return Ok(());
    }
    out.queue(cursor::MoveTo(
        BOARD_LEFT + pos.x as u16,
        BOARD_TOP + pos.y as u16,
    ))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(glyph))?;
    Ok(())
}

fn draw_border<W: Write>(out: &mut W) -> std::io::Result<()> {
    let full_row = "#".repeat(WIDTH as usize);
    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(BOARD_LEFT, BOARD_TOP))?;
    out.queue(Print(&full_row))?;
    out.queue(cursor::MoveTo(BOARD_LEFT, BOARD_TOP + HEIGHT as u16 - 1))?;
    out.queue(Print(&full_row))?;

    for row in 1..HEIGHT as u16 - 1 {
        out.queue(cursor::MoveTo(BOARD_LEFT, BOARD_TOP + row))?;
        out.queue(Print('#'))?;
        out.queue(cursor::MoveTo(BOARD_LEFT + WIDTH as u16 - 1, BOARD_TOP + row))?;
        out.queue(Print('#'))?;
    }
    Ok(())
}

fn draw_hud<W: Write>(out: &mut W, snapshot: &Snapshot) -> std::io::Result<()> {
    let row = BOARD_TOP + HEIGHT as u16 + 1;

    out.queue(cursor::MoveTo(BOARD_LEFT, row))?;
    out.queue(style::SetForegroundColor(C_HEADING))?;
    out.queue(Print(format!("Player: {}    Lives: ", snapshot.name)))?;
    out.queue(style::SetForegroundColor(Color::Red))?;
    out.queue(Print("♥ ".repeat(snapshot.lives as usize)))?;
    out.queue(style::SetForegroundColor(C_TITLE))?;
    out.queue(Print(format!("   Score: {}", snapshot.score)))?;

    out.queue(cursor::MoveTo(BOARD_LEFT, row + 2))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("Controls: A=Left D=Right F=Fire M=Menu Q=Quit"))?;
    Ok(())
}

// ── Text screens ──────────────────────────────────────────────────────────────

fn numbered_options(options: &[&str]) -> Vec<Line> {
    let mut lines: Vec<Line> = options
        .iter()
        .enumerate()
        .map(|(i, label)| line(format!("{}. {}", i + 1, label), C_OPTION))
        .collect();
    lines.push(line("", Color::Reset));
    lines.push(line(
        format!("Enter your choice (1-{}): ", options.len()),
        C_PROMPT,
    ));
    lines
}

pub fn draw_main_menu<W: Write>(out: &mut W) -> std::io::Result<()> {
    let mut lines = title_box("GRID SHOOTER", C_TITLE);
    lines.push(line("MAIN MENU:", C_HEADING));
    lines.push(line("", Color::Reset));
    lines.extend(numbered_options(&[
        "Start Game",
        "View High Scores",
        "About",
        "Quit",
    ]));
    draw_screen(out, &lines)
}

pub fn draw_game_over_menu<W: Write>(out: &mut W) -> std::io::Result<()> {
    let mut lines = title_box("GAME OVER", C_TITLE);
    lines.push(line("What would you like to do?", C_HEADING));
    lines.push(line("", Color::Reset));
    lines.extend(numbered_options(&[
        "Play Again",
        "View High Scores",
        "Return to Main Menu",
        "Quit",
    ]));
    draw_screen(out, &lines)
}

pub fn draw_invalid_choice<W: Write>(out: &mut W) -> std::io::Result<()> {
    let mut lines = title_box("INVALID INPUT", Color::Red);
    lines.push(line("Please press one of the listed numbers.", C_PROMPT));
    draw_screen(out, &lines)
}

/// Name entry; `typed` is what the player has entered so far.
pub fn draw_name_prompt<W: Write>(out: &mut W, typed: &str) -> std::io::Result<()> {
    let lines = [
        line("Enter your name: ", C_TITLE),
        line(format!("> {typed}_"), Color::White),
        line("", Color::Reset),
        line("(Enter to confirm, empty for \"Player\", Esc to go back)", Color::DarkGrey),
    ];
    draw_screen(out, &lines)
}

pub fn draw_controls<W: Write>(out: &mut W, name: &str) -> std::io::Result<()> {
    let lines = [
        line(format!("Welcome, {name}!"), C_HEADING),
        line("", Color::Reset),
        line("===== GAME CONTROLS =====", C_TITLE),
        line("", Color::Reset),
        line("A / ←      - Move Left", C_HEADING),
        line("D / →      - Move Right", C_HEADING),
        line("F / Space  - Fire", C_HEADING),
        line("M          - Return to Main Menu", C_HEADING),
        line("Q          - Quit Game", C_HEADING),
        line("", Color::Reset),
        line("Game Rules:", C_OPTION),
        line("- You have 3 lives", Color::White),
        line("- Destroy enemies to score points", Color::White),
        line("- Lose a life when an enemy reaches the bottom", Color::White),
        line("- Game ends when you lose all lives", Color::White),
        line("", Color::Reset),
        line("Press any key to start the game...", C_TITLE),
    ];
    draw_screen(out, &lines)
}

pub fn draw_game_over<W: Write>(
    out: &mut W,
    name: &str,
    final_score: u32,
    report: Option<&RecordReport>,
) -> std::io::Result<()> {
    let mut lines = title_box("GAME OVER", Color::Red);
    lines.push(line(format!("Player: {name}"), C_HEADING));
    lines.push(line(format!("Final Score: {final_score}"), C_TITLE));
    lines.push(line("", Color::Reset));

    if let Some(report) = report {
        let verdict = match report.outcome {
            RecordOutcome::Inserted { rank } => {
                line(format!("★ NEW HIGH SCORE! Ranked #{rank} ★"), C_PROMPT)
            }
            RecordOutcome::UpdatedHigher { old, .. } => line(
                format!("★ NEW PERSONAL BEST! (was {old}) ★"),
                C_PROMPT,
            ),
            RecordOutcome::NoChange { existing } => {
                line(format!("Your best score is still {existing}"), C_TITLE)
            }
            RecordOutcome::NotQualifying => {
                line("Not enough for the leaderboard this time", Color::DarkGrey)
            }
        };
        lines.push(verdict);
        if let Some(err) = &report.save_error {
            lines.push(line(format!("Warning: {err}"), Color::Red));
        }
        lines.push(line("", Color::Reset));
    }

    lines.push(line("Press any key to continue...", C_HEADING));
    draw_screen(out, &lines)
}

pub fn draw_high_scores<W: Write>(
    out: &mut W,
    top: &[LeaderboardEntry],
    total: usize,
) -> std::io::Result<()> {
    let mut lines = title_box(&format!("TOP {} SCORES", top.len().max(1)), C_TITLE);

    if top.is_empty() {
        lines.push(line("No high scores yet!", Color::Red));
        lines.push(line("", Color::Reset));
    } else {
        // Gold, silver, bronze for the podium
        let medal_colors = [Color::Yellow, Color::Cyan, Color::Red];
        for (i, entry) in top.iter().enumerate() {
            let color = medal_colors.get(i).copied().unwrap_or(Color::White);
            lines.push(line(
                format!("{}. {:<20} {}", i + 1, entry.name, entry.score),
                color,
            ));
        }
        lines.push(line("", Color::Reset));
        lines.push(line(
            format!("(Showing top {} of {} high scores)", top.len(), total),
            C_PROMPT,
        ));
        lines.push(line("", Color::Reset));
    }

    lines.push(line("Press any key to continue...", C_HEADING));
    draw_screen(out, &lines)
}

pub fn draw_about<W: Write>(out: &mut W) -> std::io::Result<()> {
    let mut lines = title_box("ABOUT", C_TITLE);
    lines.extend([
        line("A character-cell arcade shooter.", C_HEADING),
        line("", Color::Reset),
        line("Hold the line: enemies drift down the board at", Color::White),
        line("random, and every one that reaches the bottom", Color::White),
        line("costs a life. The best score per name is kept", Color::White),
        line("in high_scores.txt.", Color::White),
        line("", Color::Reset),
        line("Press any key to continue...", C_HEADING),
    ]);
    draw_screen(out, &lines)
}
