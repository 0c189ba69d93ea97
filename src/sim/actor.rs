//! Base entity data: positions, colors and the default per-tick motion rule

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::consts::FONT_SIZE;
use crate::wrap_x;

/// Grid-scaled 2D point used for positions and velocities (pixels, multiples of the cell size)
pub type Point = IVec2;

/// 24-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::new(255, 255, 255);
    pub const BLACK: Color = Color::new(0, 0, 0);
    pub const RED: Color = Color::new(255, 0, 0);
    pub const YELLOW: Color = Color::new(255, 255, 0);
    pub const GREEN: Color = Color::new(0, 255, 0);
    pub const BROWN: Color = Color::new(145, 20, 22);
    pub const BLUE: Color = Color::new(5, 90, 255);
    pub const ORANGE: Color = Color::new(255, 190, 0);
    pub const AQUA: Color = Color::new(100, 255, 255);
    pub const PINK: Color = Color::new(255, 150, 150);
    pub const PURPLE: Color = Color::new(255, 0, 150);

    /// Hidden HUD elements are drawn in the background color
    pub const BACKGROUND: Color = Color::BLACK;

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Uniform gray of the given brightness
    pub const fn gray(level: u8) -> Self {
        Self::new(level, level, level)
    }
}

/// A drawable, movable cell on the playfield
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    pub position: Point,
    pub velocity: Point,
    pub glyph: String,
    pub color: Color,
    pub font_size: u32,
}

impl Default for Actor {
    fn default() -> Self {
        Self {
            position: Point::ZERO,
            velocity: Point::ZERO,
            glyph: String::new(),
            color: Color::WHITE,
            font_size: FONT_SIZE,
        }
    }
}

impl Actor {
    pub fn new(glyph: impl Into<String>, position: Point, color: Color) -> Self {
        Self {
            glyph: glyph.into(),
            position,
            color,
            ..Default::default()
        }
    }

    pub fn with_velocity(mut self, velocity: Point) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_font_size(mut self, font_size: u32) -> Self {
        self.font_size = font_size;
        self
    }

    /// Default motion: x wraps around the screen, y is unbounded
    pub fn move_next(&mut self, max_x: i32) {
        let next = self.position + self.velocity;
        self.position = Point::new(wrap_x(next.x, max_x), next.y);
    }
}

/// Frame-count throttle: an entity moves on the ticks where the timer has run out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Throttle {
    /// Ticks to skip between moves
    pub wait: u32,
    /// Ticks left before the next move
    pub timer: u32,
}

impl Throttle {
    /// A throttle that moves on its first tick, then every `wait + 1` ticks
    pub fn new(wait: u32) -> Self {
        Self { wait, timer: 0 }
    }

    /// Advance one tick. Returns true when the entity should move this tick.
    pub fn ready(&mut self) -> bool {
        if self.timer == 0 {
            self.timer = self.wait;
            true
        } else {
            self.timer -= 1;
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{CELL_SIZE, MAX_X};
    use proptest::prelude::*;

    #[test]
    fn test_move_wraps_right_edge() {
        let mut actor = Actor::new("o", Point::new(MAX_X - 1, 30), Color::WHITE)
            .with_velocity(Point::new(CELL_SIZE, CELL_SIZE));
        actor.move_next(MAX_X);
        assert_eq!(actor.position, Point::new(CELL_SIZE - 1, 30 + CELL_SIZE));
    }

    #[test]
    fn test_move_wraps_left_edge() {
        let mut actor =
            Actor::new("o", Point::new(0, 0), Color::WHITE).with_velocity(Point::new(-CELL_SIZE, 0));
        actor.move_next(MAX_X);
        assert_eq!(actor.position.x, MAX_X - CELL_SIZE);
    }

    #[test]
    fn test_y_is_not_clamped() {
        let mut actor =
            Actor::new("o", Point::new(0, -75), Color::WHITE).with_velocity(Point::new(0, -CELL_SIZE));
        actor.move_next(MAX_X);
        assert_eq!(actor.position.y, -90);
    }

    #[test]
    fn test_throttle_cadence() {
        let mut throttle = Throttle::new(2);
        let moves: Vec<bool> = (0..7).map(|_| throttle.ready()).collect();
        assert_eq!(moves, [true, false, false, true, false, false, true]);
    }

    proptest! {
        #[test]
        fn prop_wrapped_x_stays_on_screen(
            start in 0i32..MAX_X,
            steps in -3i32..=3,
            ticks in 1usize..200,
        ) {
            let mut actor = Actor::new("o", Point::new(start, 0), Color::WHITE)
                .with_velocity(Point::new(steps * CELL_SIZE, CELL_SIZE));
            for _ in 0..ticks {
                actor.move_next(MAX_X);
                prop_assert!(actor.position.x >= 0 && actor.position.x < MAX_X);
            }
        }
    }
}
