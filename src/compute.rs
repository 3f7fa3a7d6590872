/// Pure game-logic functions.
///
/// Every public function takes an immutable reference to the current
/// `GameState` (and, where needed, an RNG handle) and returns a brand-new
/// `GameState`.  Side effects are limited to the injected RNG; `advance`
/// is the fully deterministic core with the spawn decision already made,
/// `tick` the thin wrapper that draws it.

use rand::Rng;

use crate::entities::{Dir, Facing, Fish, FishState, GameState, GameStatus, Vec2};
use crate::seq::Seq;

// ── Arena & balance constants ────────────────────────────────────────────────

/// Logical arena size, in arena units (not pixels or cells).
pub const ARENA_WIDTH: i32 = 1000;
pub const ARENA_HEIGHT: i32 = 1000;

/// Hitbox half-extents per level: a level-n fish occupies 50n × 30n units.
pub const HALF_WIDTH_PER_LEVEL: i32 = 25;
pub const HALF_HEIGHT_PER_LEVEL: i32 = 15;

/// Clearing level n takes `n * XP_PER_LEVEL` experience; overflow carries
/// into the next bucket.
pub const XP_PER_LEVEL: u32 = 100;

/// Reaching this level wins the game.
pub const WIN_LEVEL: u32 = 6;

/// Velocity granted by one key press, before level scaling.
pub const KEY_STEP: i32 = 60;

/// Horizontal speed budget for spawned enemies, divided by their level.
pub const SPAWN_SPEED: i32 = 60;
pub const SPAWN_MAX_LEVEL: u32 = 5;
/// A fresh enemy is worth `level * SPAWN_XP_PER_LEVEL` experience.
pub const SPAWN_XP_PER_LEVEL: u32 = 10;

/// Hitbox half-extents for a fish, scaled by its level.
pub fn half_extents(fish: &Fish) -> (i32, i32) {
    (
        HALF_WIDTH_PER_LEVEL * fish.level as i32,
        HALF_HEIGHT_PER_LEVEL * fish.level as i32,
    )
}

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build the initial game state: a level-1 player resting at the arena
/// center, no enemies.
pub fn init_state() -> GameState {
    GameState {
        player: Fish {
            pos: Vec2::new(ARENA_WIDTH / 2, ARENA_HEIGHT / 2),
            vel: Vec2::new(0, 0),
            level: 1,
            experience: 0,
            score: 0,
            facing: Facing::Left,
            state: FishState::Normal,
        },
        enemies: Seq::new(),
    }
}

// ── Fish operations ──────────────────────────────────────────────────────────

/// Closed-interval AABB overlap on level-scaled half-extents.  Symmetric;
/// edge contact counts as a collision.
pub fn collides(a: &Fish, b: &Fish) -> bool {
    let (aw, ah) = half_extents(a);
    let (bw, bh) = half_extents(b);
    a.pos.x - aw <= b.pos.x + bw
        && a.pos.x + aw >= b.pos.x - bw
        && a.pos.y - ah <= b.pos.y + bh
        && a.pos.y + ah >= b.pos.y - bh
}

pub fn can_eat(eater: &Fish, prey: &Fish) -> bool {
    eater.level >= prey.level
}

/// Consume `prey`'s experience.  Crossing `level * XP_PER_LEVEL` raises the
/// level by exactly one and carries the remainder; the score grows by the
/// prey's experience either way.  Velocity, facing and state are untouched.
pub fn eat(eater: &Fish, prey: &Fish) -> Fish {
    let total = eater.experience + prey.experience;
    let threshold = eater.level * XP_PER_LEVEL;
    if total >= threshold {
        Fish {
            level: eater.level + 1,
            experience: total - threshold,
            score: eater.score + prey.experience,
            ..eater.clone()
        }
    } else {
        Fish {
            experience: total,
            score: eater.score + prey.experience,
            ..eater.clone()
        }
    }
}

/// Advance the player by its velocity: horizontal wraparound one hitbox
/// beyond either edge, vertical clamping to the arena.  The branches are
/// checked in fixed priority order (right wrap, left wrap, bottom clamp,
/// top clamp) and at most one adjustment is applied per tick.
pub fn move_player(fish: &Fish) -> Fish {
    let next = fish.pos + fish.vel;
    let (hw, hh) = half_extents(fish);
    let pos = if next.x >= ARENA_WIDTH + hw {
        Vec2::new(-hw, next.y)
    } else if next.x <= -hw {
        Vec2::new(ARENA_WIDTH + hw, next.y)
    } else if next.y >= ARENA_HEIGHT - hh {
        Vec2::new(next.x, ARENA_HEIGHT - hh)
    } else if next.y <= hh {
        Vec2::new(next.x, hh)
    } else {
        next
    };
    Fish { pos, ..fish.clone() }
}

/// Advance a free-swimming enemy: vertical clamping only.  The x coordinate
/// runs free so enemies drift off-screen and get culled.
pub fn move_free(fish: &Fish) -> Fish {
    let next = fish.pos + fish.vel;
    let (_, hh) = half_extents(fish);
    let pos = if next.y >= ARENA_HEIGHT - hh {
        Vec2::new(next.x, ARENA_HEIGHT - hh)
    } else if next.y <= hh {
        Vec2::new(next.x, hh)
    } else {
        next
    };
    Fish { pos, ..fish.clone() }
}

/// Horizontal-only off-screen test, one hitbox of margin scaled by the
/// fish's own level.  Vertical never goes off-screen thanks to clamping.
pub fn is_offscreen(fish: &Fish) -> bool {
    let (hw, _) = half_extents(fish);
    fish.pos.x < -hw || fish.pos.x > ARENA_WIDTH + hw
}

/// Replace the velocity with `(dx, dy)` scaled down by the level (bigger
/// fish answer the helm more slowly).  Facing only changes on horizontal
/// steering.
pub fn steer(fish: &Fish, dx: i32, dy: i32, dir: Dir) -> Fish {
    let level = fish.level as i32;
    let facing = match dir {
        Dir::Left => Facing::Left,
        Dir::Right => Facing::Right,
        Dir::Up | Dir::Down => fish.facing,
    };
    Fish {
        vel: Vec2::new(dx / level, dy / level),
        facing,
        ..fish.clone()
    }
}

// ── Input-driven state transition (pure) ─────────────────────────────────────

/// One discrete steering nudge on the player.  No key-repeat semantics:
/// every call is a single velocity change.
pub fn steer_player(state: &GameState, dir: Dir) -> GameState {
    let (dx, dy) = match dir {
        Dir::Up => (0, -KEY_STEP),
        Dir::Down => (0, KEY_STEP),
        Dir::Left => (-KEY_STEP, 0),
        Dir::Right => (KEY_STEP, 0),
    };
    GameState {
        player: steer(&state.player, dx, dy, dir),
        enemies: state.enemies.clone(),
    }
}

// ── Spawning ─────────────────────────────────────────────────────────────────

/// Roll a fresh enemy: uniform level in 1..=5, uniform side, uniform y,
/// placed one hitbox outside the chosen edge and swimming toward the arena
/// at `SPAWN_SPEED / level`.  Draw order is level, side, y.
pub fn spawn_enemy(rng: &mut impl Rng) -> Fish {
    let level = rng.gen_range(1..=SPAWN_MAX_LEVEL);
    let hw = HALF_WIDTH_PER_LEVEL * level as i32;
    let from_right = rng.gen_bool(0.5);
    let y = rng.gen_range(0..ARENA_HEIGHT);
    let (x, vx, facing) = if from_right {
        (ARENA_WIDTH + hw, -(SPAWN_SPEED / level as i32), Facing::Left)
    } else {
        (-hw, SPAWN_SPEED / level as i32, Facing::Right)
    };
    Fish {
        pos: Vec2::new(x, y),
        vel: Vec2::new(vx, 0),
        level,
        experience: level * SPAWN_XP_PER_LEVEL,
        score: 0,
        facing,
        state: FishState::Normal,
    }
}

// ── Per-tick transition ──────────────────────────────────────────────────────

/// Advance the simulation by one tick with the spawn decision already made.
/// Fully deterministic — tests drive this directly and control `hatched`.
pub fn advance(state: &GameState, hatched: Option<Fish>) -> GameState {
    let player = &state.player;
    let eats = |p: &Fish, e: &Fish| collides(p, e) && can_eat(p, e);

    // ── 1. Resolve the player against the school ─────────────────────────────
    // Eat the first overlapped enemy the player outranks (sequence order
    // breaks ties).  Touching only bigger fish is fatal.
    let prey = state.enemies.filter_with(&eats, player);
    let (player, enemies) = if let Some(meal) = prey.first() {
        let survivors = state.enemies.filter(|e| !eats(player, e));
        (eat(player, meal), survivors)
    } else if state.enemies.any_with(|p, e| collides(p, e), player) {
        let caught = Fish {
            state: FishState::Dead,
            ..player.clone()
        };
        (caught, state.enemies.clone())
    } else {
        (player.clone(), state.enemies.clone())
    };

    // ── 2. Admit the hatched enemy, if any ───────────────────────────────────
    let enemies = match hatched {
        Some(enemy) => enemies.cons(enemy),
        None => enemies,
    };

    // ── 3. Move everyone, cull enemies that drifted off-screen ───────────────
    GameState {
        player: move_player(&player),
        enemies: enemies.map(move_free).filter(|e| !is_offscreen(e)),
    }
}

/// Advance the simulation by one tick.  All randomness comes through `rng`
/// so callers control determinism: a 1-in-10 chance of hatching one enemy,
/// whose parameters are drawn by `spawn_enemy`.
pub fn tick(state: &GameState, rng: &mut impl Rng) -> GameState {
    let hatched = if rng.gen_ratio(1, 10) {
        Some(spawn_enemy(rng))
    } else {
        None
    };
    advance(state, hatched)
}

/// Terminal check, derived from the player alone.  The win is checked
/// first, so eating up to `WIN_LEVEL` on the same tick a bigger fish is
/// touched still wins.
pub fn status(state: &GameState) -> GameStatus {
    if state.player.level >= WIN_LEVEL {
        GameStatus::Won
    } else if state.player.state == FishState::Dead {
        GameStatus::Lost
    } else {
        GameStatus::Playing
    }
}
