mod display;

use std::io::{stdout, BufWriter, Write};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    style::{self, Color, Print},
    terminal,
    ExecutableCommand, QueueableCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

use fishy::compute::{init_state, status, steer_player, tick};
use fishy::entities::{Dir, GameState, GameStatus};

/// One tick of the simulation per frame, at the 0.1 s cadence the game is
/// balanced around.
const FRAME: Duration = Duration::from_millis(100);

/// The RNG behind spawning.  Setting FISHY_SEED makes a whole run
/// reproducible; otherwise every run is fresh.
fn rng_from_env() -> StdRng {
    match std::env::var("FISHY_SEED")
        .ok()
        .and_then(|s| s.trim().parse::<u64>().ok())
    {
        Some(seed) => {
            log::info!("seeding rng from FISHY_SEED={seed}");
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    }
}

fn dir_for(code: KeyCode) -> Option<Dir> {
    match code {
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Some(Dir::Up),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Some(Dir::Down),
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(Dir::Left),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(Dir::Right),
        _ => None,
    }
}

// ── Menu ──────────────────────────────────────────────────────────────────────

enum MenuResult {
    Start,
    Quit,
}

fn show_menu<W: Write>(out: &mut W, rx: &mpsc::Receiver<Event>) -> std::io::Result<MenuResult> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let (width, height) = terminal::size()?;
    let cx = width / 2;
    let cy = height / 2;

    let title = "～  F I S H Y  ～";
    out.queue(cursor::MoveTo(
        cx.saturating_sub(title.chars().count() as u16 / 2),
        cy.saturating_sub(5),
    ))?;
    out.queue(style::SetForegroundColor(Color::Cyan))?;
    out.queue(Print(title))?;

    let rules: &[&str] = &[
        "Eat fish your size or smaller to grow.",
        "Touch anything bigger and you are lunch.",
        "Reach level 6 to win.",
    ];
    for (i, line) in rules.iter().enumerate() {
        out.queue(cursor::MoveTo(
            cx.saturating_sub(line.chars().count() as u16 / 2),
            cy.saturating_sub(2) + i as u16,
        ))?;
        out.queue(style::SetForegroundColor(Color::White))?;
        out.queue(Print(*line))?;
    }

    let hint = "[ENTER] Play    [Q] Quit";
    out.queue(cursor::MoveTo(
        cx.saturating_sub(hint.chars().count() as u16 / 2),
        cy + 3,
    ))?;
    out.queue(style::SetForegroundColor(Color::DarkGrey))?;
    out.queue(Print(hint))?;

    out.queue(style::ResetColor)?;
    out.flush()?;

    // Block until the user makes a choice
    loop {
        if let Ok(Event::Key(KeyEvent { code, kind, .. })) = rx.recv() {
            if kind != KeyEventKind::Press {
                continue;
            }
            match code {
                KeyCode::Enter | KeyCode::Char(' ') => return Ok(MenuResult::Start),
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                    return Ok(MenuResult::Quit);
                }
                _ => {}
            }
        }
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Returns `true` → quit program,  `false` → back to menu.
///
/// Input model: each arrow/WASD press is one discrete steering nudge — no
/// hold or key-repeat semantics, so there is nothing to track between
/// frames.  Once the game reaches a terminal status the simulation stops
/// and the final scene stays frozen under the overlay until R or Q.
fn game_loop<W: Write>(
    out: &mut W,
    state: &mut GameState,
    rx: &mpsc::Receiver<Event>,
    rng: &mut StdRng,
) -> std::io::Result<bool> {
    let mut last_status = GameStatus::Playing;

    loop {
        let frame_start = Instant::now();

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(Event::Key(KeyEvent { code, kind, modifiers, .. })) = rx.try_recv() {
            if kind != KeyEventKind::Press {
                continue;
            }
            match code {
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                    return Ok(true);
                }
                KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                    return Ok(true);
                }
                KeyCode::Char('r') | KeyCode::Char('R')
                    if status(state) != GameStatus::Playing =>
                {
                    return Ok(false);
                }
                _ => {
                    if status(state) == GameStatus::Playing {
                        if let Some(dir) = dir_for(code) {
                            *state = steer_player(state, dir);
                        }
                    }
                }
            }
        }

        if status(state) == GameStatus::Playing {
            *state = tick(state, rng);
        }

        let game_status = status(state);
        if game_status != last_status {
            log::info!(
                "status {:?} → {:?} (level {}, score {})",
                last_status,
                game_status,
                state.player.level,
                state.player.score
            );
            last_status = game_status;
        }

        let (width, height) = terminal::size()?;
        display::render(out, state, game_status, width, height)?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> std::io::Result<()> {
    env_logger::init();

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        loop {
            match event::read() {
                Ok(ev) => {
                    if tx.send(ev).is_err() {
                        break; // receiver dropped → program exiting
                    }
                }
                Err(_) => break,
            }
        }
    });

    let result = run(&mut out, &rx);

    // Always restore the terminal
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}

fn run<W: Write>(out: &mut W, rx: &mpsc::Receiver<Event>) -> std::io::Result<()> {
    loop {
        match show_menu(out, rx)? {
            MenuResult::Quit => break,
            MenuResult::Start => {
                let mut rng = rng_from_env();
                let mut state = init_state();
                let quit = game_loop(out, &mut state, rx, &mut rng)?;
                log::info!(
                    "game ended: {:?}, level {}, score {}",
                    status(&state),
                    state.player.level,
                    state.player.score
                );
                if quit {
                    break;
                }
                // Otherwise loop back to the menu
            }
        }
    }
    Ok(())
}
