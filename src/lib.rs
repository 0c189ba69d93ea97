//! Star Cruiser - a frame-stepped grid arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (cast, script, collisions, stage spawning)
//! - `tuning`: Data-driven game balance (enemy table, layouts, stages, upgrades)
//! - `platform`: Input and video collaborator interfaces
//! - `audio`: Audio collaborator interface and sound ids
//! - `highscores`: In-memory highscore board
//! - `persistence`: Highscore storage backends

pub mod audio;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod sim;
pub mod tuning;

pub use highscores::HighScores;
pub use tuning::Tuning;

/// Default game configuration constants
pub mod consts {
    /// Playfield grid
    pub const COLUMNS: i32 = 40;
    pub const ROWS: i32 = 60;
    pub const CELL_SIZE: i32 = 15;

    /// Screen size in pixels (MAX_X = COLUMNS * CELL_SIZE)
    pub const MAX_X: i32 = 600;
    pub const MAX_Y: i32 = 705;

    /// Fixed simulation rate. Deliberately low so grid steps stay readable.
    pub const FRAME_RATE: u32 = 15;
    pub const FONT_SIZE: u32 = 15;

    /// Rows above the visible top edge where enemies are spawned
    pub const SPAWN_TOP_ROW: i32 = -5;
    /// Placement retries before accepting an overlapping spawn cell
    pub const SPAWN_PLACEMENT_ATTEMPTS: u32 = 10;

    /// Ticks between the ship exploding and the highscore hand-off (5 s at 15 Hz)
    pub const GAME_OVER_DELAY_TICKS: u32 = 75;
}

/// Well-known cast group names.
///
/// The cast accepts any group name; these are the ones the core itself reads.
pub mod groups {
    pub const SHIPS: &str = "ships";
    pub const ASTEROIDS: &str = "asteroids";
    pub const UFOS: &str = "ufos";
    pub const LASERS: &str = "lasers";
    pub const ENEMY_LASERS: &str = "enemy lasers";
    pub const EXPLOSIONS: &str = "explosions";
    pub const SPARKS: &str = "sparks";
    pub const UPGRADES: &str = "upgrades";
    pub const SCORES: &str = "scores";
    pub const SHIELDS: &str = "shields";
    pub const MESSAGES: &str = "messages";
    pub const STAGE_MESSAGES: &str = "stage messages";
    pub const MENUS: &str = "menus";
    pub const HIGHSCORES: &str = "highscores";

    /// Groups holding damageable enemies, in collision scan order
    pub const ENEMIES: [&str; 2] = [ASTEROIDS, UFOS];
}

/// Wrap a horizontal pixel coordinate into [0, max_x)
#[inline]
pub fn wrap_x(x: i32, max_x: i32) -> i32 {
    x.rem_euclid(max_x)
}

/// Convert a duration in seconds to whole simulation ticks
#[inline]
pub fn seconds_to_ticks(seconds: f32, frame_rate: u32) -> u32 {
    (seconds * frame_rate as f32).round().max(0.0) as u32
}
