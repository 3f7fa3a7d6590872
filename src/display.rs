/// Rendering layer — all terminal I/O lives here.
///
/// Each function receives a mutable writer and an immutable view of the
/// game state.  No game logic is performed; this module only translates
/// state into terminal commands, scaling the 1000×1000 arena onto the
/// playfield cells between the borders.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use fishy::compute::{half_extents, ARENA_HEIGHT, ARENA_WIDTH, XP_PER_LEVEL};
use fishy::entities::{Facing, Fish, FishState, GameState, GameStatus};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_LEVEL: Color = Color::Cyan;
const C_PLAYER: Color = Color::White;
const C_PLAYER_DEAD: Color = Color::Red;
const C_PLAYER_WON: Color = Color::Green;
const C_HINT: Color = Color::DarkGrey;

/// Enemy colour by level — a danger scale, so edibility can be judged at
/// a glance against the HUD level.
const C_ENEMY_BY_LEVEL: [Color; 5] = [
    Color::Green,
    Color::Cyan,
    Color::Yellow,
    Color::Magenta,
    Color::Red,
];

/// The 3×5 checkerboard fish sprite, facing left.  `true` cells are solid
/// in the fish's colour, `false` cells stay transparent.  Facing right
/// mirrors the columns.
const SPRITE: [[bool; 5]; 3] = [
    [true, true, true, false, true],
    [true, false, true, true, false],
    [true, true, true, false, true],
];

// ── Arena-to-cell mapping ─────────────────────────────────────────────────────

/// Playfield cell bounds (inclusive) and the arena-unit scaling onto them.
struct Grid {
    left: i32,
    right: i32,
    top: i32,
    bottom: i32,
}

impl Grid {
    fn new(width: u16, height: u16) -> Self {
        Grid {
            left: 1,
            right: width as i32 - 2,
            top: 2,
            bottom: height as i32 - 3,
        }
    }

    fn col(&self, x: i32) -> i32 {
        let span = (self.right - self.left + 1).max(1);
        self.left + x * span / ARENA_WIDTH
    }

    fn row(&self, y: i32) -> i32 {
        let span = (self.bottom - self.top + 1).max(1);
        self.top + y * span / ARENA_HEIGHT
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(
    out: &mut W,
    state: &GameState,
    game_status: GameStatus,
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let grid = Grid::new(width, height);

    draw_border(out, width, height)?;
    draw_hud(out, state, width)?;

    for enemy in state.enemies.iter() {
        draw_fish(out, enemy, enemy_color(enemy), &grid)?;
    }
    draw_fish(out, &state.player, player_color(&state.player, game_status), &grid)?;

    draw_controls_hint(out, height)?;

    match game_status {
        GameStatus::Won => draw_victory(out, state, width, height)?,
        GameStatus::Lost => draw_game_over(out, state, width, height)?,
        GameStatus::Playing => {}
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

fn enemy_color(enemy: &Fish) -> Color {
    let idx = (enemy.level.saturating_sub(1)).min(4) as usize;
    C_ENEMY_BY_LEVEL[idx]
}

fn player_color(player: &Fish, game_status: GameStatus) -> Color {
    match game_status {
        GameStatus::Won => C_PLAYER_WON,
        _ if player.state == FishState::Dead => C_PLAYER_DEAD,
        _ => C_PLAYER,
    }
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, width: u16, height: u16) -> std::io::Result<()> {
    let w = width as usize;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    // Row 1 — top bar
    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    // Row h-2 — bottom bar
    out.queue(cursor::MoveTo(0, height.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    // Side walls
    for row in 2..height.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(width.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, state: &GameState, width: u16) -> std::io::Result<()> {
    let player = &state.player;

    // Score — left
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("Score:{:>6}", player.score)))?;

    // Level and experience progress — centre
    let level_str = format!(
        "Lv {}  XP {:>3}/{}",
        player.level,
        player.experience,
        player.level * XP_PER_LEVEL
    );
    let lx = (width / 2).saturating_sub(level_str.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(lx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_LEVEL))?;
    out.queue(Print(&level_str))?;

    Ok(())
}

// ── Fish sprites ──────────────────────────────────────────────────────────────

/// Draw one fish: its level-scaled hitbox is mapped onto playfield cells
/// and filled with the checkerboard pattern, mirrored by facing.  Cells
/// outside the playfield are skipped, so fish slide cleanly through the
/// borders while wrapping or drifting off-screen.
fn draw_fish<W: Write>(out: &mut W, fish: &Fish, color: Color, grid: &Grid) -> std::io::Result<()> {
    let (hw, hh) = half_extents(fish);
    let c0 = grid.col(fish.pos.x - hw);
    let c1 = grid.col(fish.pos.x + hw);
    let r0 = grid.row(fish.pos.y - hh);
    let r1 = grid.row(fish.pos.y + hh);
    let cols = (c1 - c0 + 1).max(1);
    let rows = (r1 - r0 + 1).max(1);

    out.queue(style::SetForegroundColor(color))?;
    for row in r0..=r1 {
        if row < grid.top || row > grid.bottom {
            continue;
        }
        let sprite_row = ((row - r0) * 3 / rows).min(2) as usize;
        for col in c0..=c1 {
            if col < grid.left || col > grid.right {
                continue;
            }
            let mut sprite_col = ((col - c0) * 5 / cols).min(4) as usize;
            if fish.facing == Facing::Right {
                sprite_col = 4 - sprite_col;
            }
            if SPRITE[sprite_row][sprite_col] {
                out.queue(cursor::MoveTo(col as u16, row as u16))?;
                out.queue(Print("█"))?;
            }
        }
    }
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, height: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("← ↑ ↓ → / W A S D : Swim   Q : Quit"))?;
    Ok(())
}

// ── Terminal overlays ─────────────────────────────────────────────────────────

fn draw_overlay_box<W: Write>(
    out: &mut W,
    lines: &[&str],
    box_color: Color,
    score: u32,
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    let score_line = format!("Final Score: {:>6}", score);
    let hint = "R - Play Again  Q - Quit";

    let cx = width / 2;
    let total_rows = lines.len() + 2;
    let start_row = (height / 2).saturating_sub(total_rows as u16 / 2);

    for (i, msg) in lines.iter().enumerate() {
        let row = start_row + i as u16;
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(box_color))?;
        out.queue(Print(*msg))?;
    }

    let score_row = start_row + lines.len() as u16;
    let col = cx.saturating_sub(score_line.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, score_row))?;
    out.queue(style::SetForegroundColor(Color::Yellow))?;
    out.queue(Print(&score_line))?;

    let hint_row = score_row + 1;
    let col = cx.saturating_sub(hint.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, hint_row))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print(hint))?;

    Ok(())
}

fn draw_victory<W: Write>(
    out: &mut W,
    state: &GameState,
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    let lines: &[&str] = &[
        "╔════════════════════╗",
        "║     YOU  WIN!      ║",
        "╚════════════════════╝",
    ];
    draw_overlay_box(out, lines, C_PLAYER_WON, state.player.score, width, height)
}

fn draw_game_over<W: Write>(
    out: &mut W,
    state: &GameState,
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    let lines: &[&str] = &[
        "╔════════════════════╗",
        "║    GAME  OVER      ║",
        "╚════════════════════╝",
    ];
    draw_overlay_box(out, lines, C_PLAYER_DEAD, state.player.score, width, height)
}
