mod display;

use std::io::{self, stdout, BufWriter, Write};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal, ExecutableCommand,
};
use log::info;

use grid_shooter::entities::{sanitize_name, PlayerIntent, MAX_PLAYER_NAME};
use grid_shooter::leaderboard::{Leaderboard, HIGH_SCORE_FILE};
use grid_shooter::{ExitReason, Session, SessionStatus};

/// One simulation tick every 200 ms.
const TICK: Duration = Duration::from_millis(200);

/// How long the "invalid input" notice stays up before the menu returns.
const INVALID_CHOICE_PAUSE: Duration = Duration::from_secs(2);

/// Entries shown on the high-score screen.
const HIGH_SCORES_SHOWN: usize = 3;

// ── Input ─────────────────────────────────────────────────────────────────────

/// Map one key press to the intent it stands for during play.
fn intent_for_key(code: KeyCode, modifiers: KeyModifiers) -> PlayerIntent {
    match code {
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => PlayerIntent::Quit,
        KeyCode::Left => PlayerIntent::MoveLeft,
        KeyCode::Right => PlayerIntent::MoveRight,
        KeyCode::Esc => PlayerIntent::Quit,
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'a' => PlayerIntent::MoveLeft,
            'd' => PlayerIntent::MoveRight,
            'f' | ' ' => PlayerIntent::Fire,
            'm' => PlayerIntent::ReturnToMenu,
            'q' => PlayerIntent::Quit,
            _ => PlayerIntent::Noop,
        },
        _ => PlayerIntent::Noop,
    }
}

fn as_press(event: Event) -> Option<KeyEvent> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => Some(key),
        _ => None,
    }
}

/// Take at most one pending key press; later ones wait for the next tick.
fn next_intent(rx: &mpsc::Receiver<Event>) -> PlayerIntent {
    while let Ok(event) = rx.try_recv() {
        if let Some(key) = as_press(event) {
            return intent_for_key(key.code, key.modifiers);
        }
    }
    PlayerIntent::Noop
}

/// Block until the next key press.
fn wait_key(rx: &mpsc::Receiver<Event>) -> io::Result<KeyEvent> {
    loop {
        let event = rx
            .recv()
            .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "input thread stopped"))?;
        if let Some(key) = as_press(event) {
            return Ok(key);
        }
    }
}

/// Drop keys typed while nothing was listening.
fn drain(rx: &mpsc::Receiver<Event>) {
    while rx.try_recv().is_ok() {}
}

// ── Menus ─────────────────────────────────────────────────────────────────────

fn is_interrupt(key: &KeyEvent) -> bool {
    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
}

/// Menu option picked by `key`.  `q`, Esc and Ctrl-C count as the last
/// option; anything else is not a choice.
fn menu_choice(key: &KeyEvent) -> Option<u8> {
    if is_interrupt(key) {
        return Some(4);
    }
    match key.code {
        KeyCode::Char(c @ '1'..='4') => Some(c as u8 - b'0'),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(4),
        _ => None,
    }
}

/// Show a four-option menu until a valid choice is made.
fn choose<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    draw: fn(&mut W) -> io::Result<()>,
) -> io::Result<u8> {
    loop {
        draw(out)?;
        let key = wait_key(rx)?;
        if let Some(choice) = menu_choice(&key) {
            return Ok(choice);
        }
        display::draw_invalid_choice(out)?;
        thread::sleep(INVALID_CHOICE_PAUSE);
        drain(rx);
    }
}

#[derive(Debug, PartialEq, Eq)]
enum NameEdit {
    Editing,
    Done(String),
    Cancelled,
}

/// Apply one key to the name being typed.
fn edit_name(typed: &mut String, key: &KeyEvent) -> NameEdit {
    if is_interrupt(key) {
        return NameEdit::Cancelled;
    }
    match key.code {
        KeyCode::Enter => return NameEdit::Done(sanitize_name(typed)),
        KeyCode::Esc => return NameEdit::Cancelled,
        KeyCode::Backspace => {
            typed.pop();
        }
        KeyCode::Char(c)
            if !key.modifiers.contains(KeyModifiers::CONTROL)
                && typed.chars().count() < MAX_PLAYER_NAME =>
        {
            typed.push(c)
        }
        _ => {}
    }
    NameEdit::Editing
}

/// `None` when the player backs out with Esc or Ctrl-C.
fn prompt_name<W: Write>(out: &mut W, rx: &mpsc::Receiver<Event>) -> io::Result<Option<String>> {
    drain(rx);
    let mut typed = String::new();
    loop {
        display::draw_name_prompt(out, &typed)?;
        let key = wait_key(rx)?;
        match edit_name(&mut typed, &key) {
            NameEdit::Editing => {}
            NameEdit::Done(name) => return Ok(Some(name)),
            NameEdit::Cancelled => return Ok(None),
        }
    }
}

fn show_high_scores<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    leaderboard: &Leaderboard,
) -> io::Result<()> {
    display::draw_high_scores(out, leaderboard.top(HIGH_SCORES_SHOWN), leaderboard.len())?;
    wait_key(rx).map(|_| ())
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Drive one session tick by tick until it is over or the player leaves.
fn game_loop<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    session: &mut Session,
    leaderboard: &mut Leaderboard,
) -> io::Result<SessionStatus> {
    loop {
        let tick_start = Instant::now();

        let intent = next_intent(rx);
        let status = session.apply_intent_and_tick(intent, leaderboard);
        display::render(out, &session.snapshot())?;

        if status.is_finished() {
            return Ok(status);
        }

        let elapsed = tick_start.elapsed();
        if elapsed < TICK {
            thread::sleep(TICK - elapsed);
        }
    }
}

enum AfterPlay {
    MainMenu,
    Quit,
}

/// Name prompt, then games back to back until the player picks something
/// other than "Play Again".
fn play<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    leaderboard: &mut Leaderboard,
) -> io::Result<AfterPlay> {
    let Some(name) = prompt_name(out, rx)? else {
        return Ok(AfterPlay::MainMenu);
    };

    loop {
        display::draw_controls(out, &name)?;
        wait_key(rx)?;
        drain(rx);

        // A fresh session per game: new pools, new player, new seed.
        let mut session = Session::start(name.as_str());
        let final_score = match game_loop(out, rx, &mut session, leaderboard)? {
            SessionStatus::Over(score) => score,
            SessionStatus::Exited(ExitReason::Quit) => return Ok(AfterPlay::Quit),
            _ => return Ok(AfterPlay::MainMenu),
        };

        display::draw_game_over(out, &name, final_score, session.record())?;
        drain(rx);
        wait_key(rx)?;

        loop {
            match choose(out, rx, display::draw_game_over_menu)? {
                1 => break,
                2 => show_high_scores(out, rx, leaderboard)?,
                3 => return Ok(AfterPlay::MainMenu),
                _ => return Ok(AfterPlay::Quit),
            }
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> io::Result<()> {
    env_logger::init();

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(_) => break,
        }
    });

    let result = run(&mut out, &rx);

    // Always restore the terminal
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    if result.is_ok() {
        println!("Thanks for playing!");
    }
    result
}

fn run<W: Write>(out: &mut W, rx: &mpsc::Receiver<Event>) -> io::Result<()> {
    let mut leaderboard = Leaderboard::load(HIGH_SCORE_FILE);

    loop {
        match choose(out, rx, display::draw_main_menu)? {
            1 => match play(out, rx, &mut leaderboard)? {
                AfterPlay::MainMenu => {}
                AfterPlay::Quit => break,
            },
            2 => show_high_scores(out, rx, &leaderboard)?,
            3 => {
                display::draw_about(out)?;
                wait_key(rx)?;
            }
            _ => break,
        }
    }
    info!("Exiting with {} high scores on record", leaderboard.len());
    Ok(())
}
