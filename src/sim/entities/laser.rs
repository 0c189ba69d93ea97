use crate::sim::actor::{Actor, Color, Point};
use crate::sim::movement::Fate;
use crate::tuning::Grid;
use crate::wrap_x;

/// A straight-flying shot, fired up by the ship or down by a UFO
#[derive(Debug, Clone)]
pub struct Laser {
    pub actor: Actor,
    pub damage: i32,
}

impl Laser {
    pub fn new(glyph: String, position: Point, velocity: Point, color: Color, damage: i32) -> Self {
        Self {
            actor: Actor::new(glyph, position, color).with_velocity(velocity),
            damage,
        }
    }

    /// Leaves the cast instead of stepping onto the top or bottom edge
    pub fn advance(&mut self, grid: &Grid) -> Fate {
        let next = self.actor.position + self.actor.velocity;
        if next.y <= 0 || next.y >= grid.max_y {
            return Fate::Despawn;
        }
        self.actor.position = Point::new(wrap_x(next.x, grid.max_x), next.y);
        Fate::Live
    }
}
