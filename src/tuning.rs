//! Game balance configuration
//!
//! Everything the simulation treats as data (grid geometry, the enemy type table, structure
//! layouts, the stage table, weapons and upgrades) lives in one immutable [`Tuning`] value.
//! It is built once, validated, and handed explicitly to the actions that need it.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::seconds_to_ticks;
use crate::sim::actor::Color;
use crate::sim::structure::LayoutCell;

/// Stage enemy type that spawns a UFO instead of an asteroid
pub const UFO_KIND: &str = "ufo";

/// Errors raised while loading or validating a tuning table
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid tuning JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("grid needs at least two columns, positive sizes and max_x = columns * cell_size")]
    InvalidGrid,
    #[error("frame rate must be positive")]
    ZeroFrameRate,
    #[error("stage table is empty")]
    NoStages,
    #[error("stage {stage} references unknown enemy type `{name}`")]
    UnknownEnemyType { stage: usize, name: String },
    #[error("`{owner}` references unknown layout `{layout}`")]
    UnknownLayout { owner: String, layout: String },
    #[error("`{owner}` splits into unknown enemy type `{kind}`")]
    UnknownSplit { owner: String, kind: String },
    #[error("enemy type `{name}` has no move-wait choices")]
    EmptyMoveWait { name: String },
}

/// Playfield geometry in pixels and cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    pub cell_size: i32,
    pub columns: i32,
    pub rows: i32,
    pub max_x: i32,
    pub max_y: i32,
}

impl Default for Grid {
    fn default() -> Self {
        Self {
            cell_size: CELL_SIZE,
            columns: COLUMNS,
            rows: ROWS,
            max_x: MAX_X,
            max_y: MAX_Y,
        }
    }
}

/// Discrete distribution of move-wait values, sampled once per spawned enemy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveWait {
    pub choices: Vec<u32>,
}

impl MoveWait {
    pub fn of(choices: &[u32]) -> Self {
        Self {
            choices: choices.to_vec(),
        }
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        self.choices.choose(rng).copied().unwrap_or(0)
    }
}

/// Offspring spawned when an enemy is destroyed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Split {
    /// Enemy type name of each offspring
    pub kind: String,
    pub count: u32,
}

/// One row of the enemy type table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyType {
    pub name: String,
    pub glyph: String,
    /// Shield points taken from the ship on contact
    pub damage: i32,
    /// Laser damage needed to destroy it
    pub health: i32,
    /// Score credited for a weapon kill
    pub points: u32,
    pub move_wait: MoveWait,
    pub color: Color,
    #[serde(default)]
    pub hit_sound: Option<String>,
    pub destroy_sound: String,
    /// Named structure layout; `None` means a single-cell enemy
    #[serde(default)]
    pub layout: Option<String>,
    /// Spawns with a random left/right velocity component
    #[serde(default)]
    pub drifts_sideways: bool,
    #[serde(default)]
    pub splits_into: Option<Split>,
}

/// One record of the stage table.
///
/// A stage with `display` set is a message-only stage; otherwise it spawns one of each
/// `enemy_types` entry every `wait_spawn` seconds once `delay_start` has passed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageSpec {
    pub delay_start: f32,
    pub duration: f32,
    #[serde(default)]
    pub enemy_types: Vec<String>,
    #[serde(default)]
    pub wait_spawn: f32,
    #[serde(default)]
    pub y_randomness: i32,
    #[serde(default)]
    pub display: Option<String>,
}

impl StageSpec {
    pub fn display(delay_start: f32, duration: f32, text: &str) -> Self {
        Self {
            delay_start,
            duration,
            enemy_types: Vec::new(),
            wait_spawn: 0.0,
            y_randomness: 0,
            display: Some(text.to_string()),
        }
    }

    pub fn spawn(
        delay_start: f32,
        duration: f32,
        enemy_types: Vec<String>,
        wait_spawn: f32,
        y_randomness: i32,
    ) -> Self {
        Self {
            delay_start,
            duration,
            enemy_types,
            wait_spawn,
            y_randomness,
            display: None,
        }
    }

    pub fn is_display(&self) -> bool {
        self.display.is_some()
    }
}

/// UFO attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UfoSpec {
    pub glyph: String,
    pub color: Color,
    pub health: i32,
    pub damage: i32,
    pub points: u32,
    pub hit_sound: String,
    pub destroy_sound: String,
    pub layout: String,
    pub palette: Vec<Color>,
    pub laser_glyph: String,
    pub laser_color: Color,
    pub laser_damage: i32,
    /// Ticks between shots
    pub shoot_cooldown: u32,
    /// Fires when the ship is closer than this many columns
    pub shoot_range: i32,
    /// Per-tick probability of reversing horizontal direction
    pub reverse_chance: f64,
    /// Per-tick probability of stepping one row down
    pub descend_chance: f64,
}

impl Default for UfoSpec {
    fn default() -> Self {
        Self {
            glyph: "H".to_string(),
            color: Color::YELLOW,
            health: 3,
            damage: 2,
            points: 8,
            hit_sound: "ast-hit".to_string(),
            destroy_sound: "ufo-exp".to_string(),
            layout: "ufo".to_string(),
            palette: vec![Color::YELLOW, Color::AQUA],
            laser_glyph: "|".to_string(),
            laser_color: Color::RED,
            laser_damage: 3,
            shoot_cooldown: 2,
            shoot_range: 3,
            reverse_chance: 0.07,
            descend_chance: 0.2,
        }
    }
}

/// Ship weapon modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GunMode {
    #[default]
    Single,
    Rapid,
    Shotgun,
}

/// Weapon behaviour for one gun mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GunSpec {
    /// Ticks before the fire key is accepted again
    pub cooldown_ticks: u32,
    /// Shots before reverting to the single gun (`None` = unlimited)
    #[serde(default)]
    pub max_shots: Option<u32>,
    pub glyph: String,
    pub color: Color,
    pub damage: i32,
    /// Adds a laser one cell to each side of the nose
    #[serde(default)]
    pub spread: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Guns {
    pub single: GunSpec,
    pub rapid: GunSpec,
    pub shotgun: GunSpec,
}

impl Guns {
    pub fn get(&self, mode: GunMode) -> &GunSpec {
        match mode {
            GunMode::Single => &self.single,
            GunMode::Rapid => &self.rapid,
            GunMode::Shotgun => &self.shotgun,
        }
    }
}

impl Default for Guns {
    fn default() -> Self {
        Self {
            single: GunSpec {
                cooldown_ticks: 6,
                max_shots: None,
                glyph: "^".to_string(),
                color: Color::GREEN,
                damage: 1,
                spread: false,
            },
            rapid: GunSpec {
                cooldown_ticks: 2,
                max_shots: Some(50),
                glyph: "|".to_string(),
                color: Color::RED,
                damage: 1,
                spread: false,
            },
            shotgun: GunSpec {
                cooldown_ticks: 8,
                max_shots: Some(30),
                glyph: "!".to_string(),
                color: Color::PURPLE,
                damage: 2,
                spread: true,
            },
        }
    }
}

/// What a pickup does when collected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpgradeKind {
    Shield,
    Gun(GunMode),
}

/// A pickup released when the score first reaches `threshold`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradeSpec {
    pub threshold: u32,
    pub kind: UpgradeKind,
}

/// Player ship structure and animation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipSpec {
    pub layout: Vec<LayoutCell>,
    pub palette: Vec<Color>,
    /// Layout index of the animated thrust part
    pub thrust_part: usize,
    pub thrust_frames: [(String, Color); 2],
    /// Length of the post-hit grace period
    pub hurt_ticks: u32,
    pub flash_colors: [Color; 2],
    /// Origin row, counted up from the bottom edge
    pub rows_from_bottom: i32,
}

impl Default for ShipSpec {
    fn default() -> Self {
        Self {
            layout: vec![
                LayoutCell::new("+", 0, 0, 0),
                LayoutCell::new("A", 0, 1, 0),
                LayoutCell::new("H", 0, 2, 1),
                LayoutCell::new("=", -1, 2, 0),
                LayoutCell::new("=", 1, 2, 0),
                LayoutCell::new("_", -2, 2, 0),
                LayoutCell::new("_", 2, 2, 0),
                LayoutCell::new("*", 0, 3, 2),
            ],
            palette: vec![Color::BLUE, Color::WHITE, Color::RED],
            thrust_part: 7,
            thrust_frames: [
                ("*".to_string(), Color::RED),
                ("'".to_string(), Color::ORANGE),
            ],
            hurt_ticks: 10,
            flash_colors: [Color::AQUA, Color::PINK],
            rows_from_bottom: 8,
        }
    }
}

/// Complete game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub grid: Grid,
    pub frame_rate: u32,
    pub font_size: u32,
    pub ship: ShipSpec,
    pub start_shields: i32,
    pub max_shields: i32,
    /// Shield level below which the low-shields cue plays
    pub low_shields: i32,
    pub shield_upgrade_points: i32,
    pub guns: Guns,
    pub upgrades: Vec<UpgradeSpec>,
    /// Ticks a falling pickup waits between steps
    pub upgrade_wait: u32,
    pub enemy_types: Vec<EnemyType>,
    pub layouts: BTreeMap<String, Vec<LayoutCell>>,
    pub ufo: UfoSpec,
    pub stages: Vec<StageSpec>,
    pub game_over_delay_ticks: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            grid: Grid::default(),
            frame_rate: FRAME_RATE,
            font_size: FONT_SIZE,
            ship: ShipSpec::default(),
            start_shields: 20,
            max_shields: 40,
            low_shields: 5,
            shield_upgrade_points: 10,
            guns: Guns::default(),
            upgrades: default_upgrades(),
            upgrade_wait: 4,
            enemy_types: default_enemy_types(),
            layouts: default_layouts(),
            ufo: UfoSpec::default(),
            stages: default_stages(),
            game_over_delay_ticks: GAME_OVER_DELAY_TICKS,
        }
    }
}

impl Tuning {
    /// Parse and validate a tuning table. Missing top-level fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Check cross-references between tables
    pub fn validate(&self) -> Result<(), TuningError> {
        let g = &self.grid;
        if g.cell_size <= 0 || g.columns < 2 || g.rows <= 0 || g.max_y <= 0 {
            return Err(TuningError::InvalidGrid);
        }
        // spawn columns are drawn from 1..columns and x wraps at max_x
        if g.max_x != g.columns * g.cell_size {
            return Err(TuningError::InvalidGrid);
        }
        if self.frame_rate == 0 {
            return Err(TuningError::ZeroFrameRate);
        }
        if self.stages.is_empty() {
            return Err(TuningError::NoStages);
        }

        let names: BTreeSet<&str> = self.enemy_types.iter().map(|e| e.name.as_str()).collect();
        for enemy in &self.enemy_types {
            if enemy.move_wait.choices.is_empty() {
                return Err(TuningError::EmptyMoveWait {
                    name: enemy.name.clone(),
                });
            }
            if let Some(layout) = &enemy.layout
                && !self.layouts.contains_key(layout)
            {
                return Err(TuningError::UnknownLayout {
                    owner: enemy.name.clone(),
                    layout: layout.clone(),
                });
            }
            if let Some(split) = &enemy.splits_into
                && !names.contains(split.kind.as_str())
            {
                return Err(TuningError::UnknownSplit {
                    owner: enemy.name.clone(),
                    kind: split.kind.clone(),
                });
            }
        }
        if !self.layouts.contains_key(&self.ufo.layout) {
            return Err(TuningError::UnknownLayout {
                owner: UFO_KIND.to_string(),
                layout: self.ufo.layout.clone(),
            });
        }

        for (index, stage) in self.stages.iter().enumerate() {
            for name in &stage.enemy_types {
                if name != UFO_KIND && !names.contains(name.as_str()) {
                    return Err(TuningError::UnknownEnemyType {
                        stage: index,
                        name: name.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn enemy_type(&self, name: &str) -> Option<&EnemyType> {
        self.enemy_types.iter().find(|e| e.name == name)
    }

    pub fn layout(&self, name: &str) -> &[LayoutCell] {
        self.layouts.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Convert seconds to ticks at the configured frame rate
    pub fn ticks(&self, seconds: f32) -> u32 {
        seconds_to_ticks(seconds, self.frame_rate)
    }
}

fn default_upgrades() -> Vec<UpgradeSpec> {
    use UpgradeKind::*;
    [
        (100, Shield),
        (200, Gun(GunMode::Rapid)),
        (300, Shield),
        (400, Gun(GunMode::Rapid)),
        (500, Shield),
    ]
    .into_iter()
    .map(|(threshold, kind)| UpgradeSpec { threshold, kind })
    .collect()
}

#[allow(clippy::too_many_arguments)]
fn enemy(
    name: &str,
    glyph: &str,
    damage: i32,
    health: i32,
    points: u32,
    move_wait: &[u32],
    color: Color,
    hit_sound: Option<&str>,
    destroy_sound: &str,
) -> EnemyType {
    EnemyType {
        name: name.to_string(),
        glyph: glyph.to_string(),
        damage,
        health,
        points,
        move_wait: MoveWait::of(move_wait),
        color,
        hit_sound: hit_sound.map(str::to_string),
        destroy_sound: destroy_sound.to_string(),
        layout: None,
        drifts_sideways: false,
        splits_into: None,
    }
}

fn default_enemy_types() -> Vec<EnemyType> {
    let small = enemy("asteroid-small", "°", 1, 1, 1, &[2, 3, 4], Color::YELLOW, None, "ast-hit");
    let medium = enemy("asteroid-medium", "*", 2, 1, 1, &[3, 4], Color::ORANGE, None, "ast-hit-sml");
    let large = enemy(
        "asteroid-large",
        "@",
        2,
        2,
        2,
        &[4, 5],
        Color::BROWN,
        Some("ast-hit"),
        "ast-hit-lrg",
    );
    let xmove = EnemyType {
        drifts_sideways: true,
        ..enemy("asteroid-small-xmove", "¤", 2, 1, 3, &[2, 3], Color::PURPLE, None, "ast-hit-lrg")
    };
    let huge = EnemyType {
        layout: Some("huge".to_string()),
        splits_into: Some(Split {
            kind: "asteroid-large".to_string(),
            count: 3,
        }),
        ..enemy(
            "asteroid-huge",
            "@",
            4,
            3,
            4,
            &[4, 5, 6],
            Color::RED,
            Some("ast-hit-giant"),
            "ast-exp-huge",
        )
    };
    let giant = EnemyType {
        layout: Some("giant".to_string()),
        splits_into: Some(Split {
            kind: "asteroid-huge".to_string(),
            count: 2,
        }),
        ..enemy(
            "asteroid-giant",
            "★",
            6,
            5,
            6,
            &[5, 6],
            Color::BROWN,
            Some("ast-hit-giant"),
            "ast-exp-giant",
        )
    };
    vec![small, medium, large, xmove, huge, giant]
}

fn cells(glyph: &str, offsets: &[(i32, i32)]) -> Vec<LayoutCell> {
    offsets
        .iter()
        .map(|&(dx, dy)| LayoutCell::new(glyph, dx, dy, 0))
        .collect()
}

#[rustfmt::skip]
fn default_layouts() -> BTreeMap<String, Vec<LayoutCell>> {
    // Diamond of radius 2
    let huge = [
        (0, 0), (1, 0), (-1, 0), (0, 1), (0, -1),
        (-1, -1), (1, -1), (-1, 1), (1, 1),
        (-2, 0), (0, -2), (2, 0), (0, 2),
    ];
    // Rounded block of radius 3
    let giant = [
        (0, 0), (1, 0), (-1, 0), (0, 1), (0, -1),
        (-1, -1), (1, -1), (-1, 1), (1, 1),
        (-2, 0), (0, -2), (2, 0), (0, 2),
        (-2, -2), (2, -2), (-2, 2), (2, 2),
        (-2, -1), (-2, 1), (2, 1), (2, -1),
        (-1, 2), (1, 2), (1, -2), (-1, -2),
        (-3, -1), (-3, 1), (3, 1), (3, -1),
        (-1, 3), (1, 3), (1, -3), (-1, -3),
        (0, 3), (0, -3), (-3, 0), (3, 0),
    ];
    let ufo = vec![
        LayoutCell::new("<", -1, 0, 0),
        LayoutCell::new(">", 1, 0, 0),
        LayoutCell::new("o", 0, -1, 1),
    ];

    let mut layouts = BTreeMap::new();
    layouts.insert("huge".to_string(), cells("@", &huge));
    layouts.insert("giant".to_string(), cells("★", &giant));
    layouts.insert("ufo".to_string(), ufo);
    layouts
}

/// Build an enemy list from `(name, count)` runs, preserving order
fn wave(runs: &[(&str, usize)]) -> Vec<String> {
    runs.iter()
        .flat_map(|&(name, count)| std::iter::repeat_n(name.to_string(), count))
        .collect()
}

fn default_stages() -> Vec<StageSpec> {
    const SML: &str = "asteroid-small";
    const MED: &str = "asteroid-medium";
    const LRG: &str = "asteroid-large";
    const XMV: &str = "asteroid-small-xmove";
    const HUGE: &str = "asteroid-huge";
    const GIANT: &str = "asteroid-giant";
    use StageSpec as S;

    vec![
        S::display(1.0, 2.0, "Stage One"),
        S::spawn(0.0, 10.0, wave(&[(SML, 1)]), 0.8, 5),
        S::spawn(0.0, 10.0, wave(&[(MED, 1)]), 0.7, 5),
        S::spawn(0.0, 10.0, wave(&[(LRG, 2)]), 1.0, 8),
        S::display(1.0, 2.0, "Stage Two"),
        S::spawn(0.0, 6.0, wave(&[(XMV, 1), (SML, 1)]), 1.0, 2),
        S::spawn(5.0, 5.0, wave(&[(LRG, 14), (XMV, 1)]), 2.0, 0),
        S::spawn(6.0, 6.0, wave(&[(SML, 3)]), 0.2, 2),
        S::display(1.0, 2.0, "Stage Three"),
        S::spawn(0.0, 6.0, wave(&[(LRG, 4), (XMV, 1)]), 1.0, 10),
        S::spawn(4.0, 12.0, wave(&[(HUGE, 1)]), 1.0, 4),
        S::spawn(5.0, 10.0, wave(&[(GIANT, 1)]), 2.0, 5),
        S::display(1.0, 2.0, "Stage Four"),
        S::spawn(0.0, 10.0, wave(&[(LRG, 2), (XMV, 1), (HUGE, 1), (XMV, 1)]), 1.3, 10),
        S::spawn(1.0, 4.0, wave(&[(HUGE, 1)]), 1.0, 4),
        S::spawn(2.0, 4.0, wave(&[(LRG, 18), (XMV, 1)]), 3.5, 0),
        S::spawn(2.0, 10.0, wave(&[(SML, 3)]), 0.4, 2),
        S::spawn(5.0, 10.0, wave(&[(GIANT, 1), (LRG, 3)]), 2.0, 5),
        S::display(1.0, 2.0, "Stage Five"),
        S::spawn(
            0.0,
            25.0,
            wave(&[(GIANT, 2), (LRG, 1), (SML, 1), (MED, 1), (XMV, 8)]),
            5.0,
            5,
        ),
        S::spawn(2.0, 5.0, wave(&[(SML, 6)]), 0.1, 2),
        S::display(1.0, 2.0, "Stage Six"),
        S::spawn(1.0, 1.0, wave(&[(XMV, 1)]), 0.2, 2),
        S::spawn(1.0, 1.0, wave(&[(LRG, 4)]), 0.2, 0),
        S::spawn(1.0, 3.0, wave(&[(GIANT, 4)]), 2.0, 0),
        S::spawn(1.0, 3.0, wave(&[(HUGE, 3)]), 2.0, 0),
        S::spawn(1.0, 3.0, wave(&[(MED, 1)]), 0.7, 5),
        S::display(1.0, 2.0, "Stage Seven"),
        S::spawn(0.0, 10.0, wave(&[(SML, 1)]), 0.4, 5),
        S::spawn(0.0, 10.0, wave(&[(MED, 1)]), 0.4, 5),
        S::spawn(0.0, 10.0, wave(&[(LRG, 2)]), 0.5, 8),
        S::spawn(0.0, 1.0, wave(&[(LRG, 6)]), 0.3, 0),
        S::spawn(0.0, 1.0, wave(&[(MED, 6)]), 0.2, 0),
        S::spawn(0.0, 1.0, wave(&[(SML, 6)]), 0.2, 0),
        S::spawn(0.0, 1.0, wave(&[(LRG, 6)]), 0.3, 0),
        S::spawn(0.0, 1.0, wave(&[(HUGE, 6)]), 0.5, 0),
        S::spawn(2.0, 6.0, wave(&[(UFO_KIND, 1)]), 3.0, 0),
        S::display(0.0, 3.0, "You beat the game! (So far)"),
        S::spawn(0.0, 100.0, wave(&[(XMV, 1), (GIANT, 1)]), 0.8, 5),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_default_tuning_is_valid() {
        let tuning = Tuning::default();
        assert!(tuning.validate().is_ok());
        assert_eq!(tuning.stages.len(), 39);
        assert_eq!(tuning.layout("huge").len(), 13);
        assert_eq!(tuning.layout("giant").len(), 37);
    }

    #[test]
    fn test_stage_waves_expand_runs() {
        let tuning = Tuning::default();
        let stage = &tuning.stages[6];
        assert_eq!(stage.enemy_types.len(), 15);
        assert_eq!(stage.enemy_types[14], "asteroid-small-xmove");
        assert!(tuning.stages[0].is_display());
        assert!(!tuning.stages[1].is_display());
    }

    #[test]
    fn test_move_wait_samples_from_choices() {
        let wait = MoveWait::of(&[4, 5, 6]);
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..100 {
            assert!(wait.choices.contains(&wait.sample(&mut rng)));
        }
        assert_eq!(MoveWait::of(&[]).sample(&mut rng), 0);
    }

    #[test]
    fn test_ticks_round_to_frame_rate() {
        let tuning = Tuning::default();
        assert_eq!(tuning.ticks(2.0), 30);
        assert_eq!(tuning.ticks(0.8), 12);
        assert_eq!(tuning.ticks(0.1), 2);
    }

    #[test]
    fn test_from_json_overrides_fields() {
        let json = r#"{ "start_shields": 5, "frame_rate": 10 }"#;
        let tuning = Tuning::from_json(json).expect("valid tuning");
        assert_eq!(tuning.start_shields, 5);
        assert_eq!(tuning.frame_rate, 10);
        assert_eq!(tuning.max_shields, 40);
    }

    #[test]
    fn test_unknown_stage_enemy_rejected() {
        let mut tuning = Tuning::default();
        tuning.stages[1].enemy_types.push("comet".to_string());
        match tuning.validate() {
            Err(TuningError::UnknownEnemyType { stage, name }) => {
                assert_eq!(stage, 1);
                assert_eq!(name, "comet");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_zero_frame_rate_rejected() {
        let json = r#"{ "frame_rate": 0 }"#;
        assert!(matches!(Tuning::from_json(json), Err(TuningError::ZeroFrameRate)));
    }

    #[test]
    fn test_single_column_grid_rejected() {
        let json = r#"{ "grid": { "cell_size": 15, "columns": 1, "rows": 60, "max_x": 15, "max_y": 705 } }"#;
        assert!(matches!(Tuning::from_json(json), Err(TuningError::InvalidGrid)));
    }

    #[test]
    fn test_grid_width_must_match_columns() {
        let mut tuning = Tuning::default();
        tuning.grid.max_x += 7;
        assert!(matches!(tuning.validate(), Err(TuningError::InvalidGrid)));

        let json = r#"{ "grid": { "cell_size": 15, "columns": 2, "rows": 60, "max_x": 30, "max_y": 705 } }"#;
        assert!(Tuning::from_json(json).is_ok());
    }

    #[test]
    fn test_roundtrip_through_json() {
        let tuning = Tuning::default();
        let json = serde_json::to_string(&tuning).expect("serialize");
        let back = Tuning::from_json(&json).expect("deserialize");
        assert_eq!(back, tuning);
    }
}
