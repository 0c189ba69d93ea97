//! Explosion and spark particles

use glam::Vec2;
use rand::Rng;
use rand::seq::IndexedRandom;

use crate::sim::actor::{Actor, Color, Point};
use crate::sim::movement::Fate;
use crate::tuning::Grid;

const EXPLOSION_FRAMES: [&str; 5] = [".", "*", "@", "0", "()"];
const EXPLOSION_COLOR_INDEX: [usize; 5] = [0, 1, 2, 3, 3];
const EXPLOSION_COLORS: [Color; 4] = [Color::WHITE, Color::YELLOW, Color::ORANGE, Color::RED];

const SPARK_DIM_SPEEDS: [i32; 3] = [5, 8, 12];

/// Short animated blast that drifts while it plays
#[derive(Debug, Clone)]
pub struct Explosion {
    pub actor: Actor,
    frame: f32,
    animate_speed: f32,
}

impl Explosion {
    pub fn new(position: Point, velocity: Point, animate_speed: f32) -> Self {
        Self {
            actor: Actor::new(".", position, Color::WHITE).with_velocity(velocity),
            frame: 0.0,
            animate_speed,
        }
    }

    pub fn advance(&mut self, grid: &Grid) -> Fate {
        let index = self.frame.floor() as usize;
        if index >= EXPLOSION_FRAMES.len() {
            return Fate::Despawn;
        }
        self.actor.glyph = EXPLOSION_FRAMES[index].to_string();
        self.actor.color = EXPLOSION_COLORS[EXPLOSION_COLOR_INDEX[index]];
        self.frame += self.animate_speed;

        let next = self.actor.position + self.actor.velocity;
        self.actor.position = Point::new(next.x.rem_euclid(grid.max_x), next.y.rem_euclid(grid.max_y));
        Fate::Live
    }
}

/// A fading particle flying at a fixed speed and heading
#[derive(Debug, Clone)]
pub struct Spark {
    pub actor: Actor,
    pub bright: i32,
    dim_speed: i32,
    speed: f32,
    /// Heading in radians
    direction: f32,
}

impl Spark {
    pub fn new<R: Rng + ?Sized>(position: Point, speed: f32, degrees: f32, rng: &mut R) -> Self {
        Self {
            actor: Actor::new(".", position, Color::WHITE),
            bright: 255,
            dim_speed: SPARK_DIM_SPEEDS.choose(rng).copied().unwrap_or(8),
            speed,
            direction: degrees.to_radians(),
        }
    }

    pub fn advance(&mut self, grid: &Grid) -> Fate {
        let p = self.actor.position;
        if p.x <= 0 || p.x >= grid.max_x || p.y <= 0 || p.y >= grid.max_y || self.bright <= 0 {
            return Fate::Despawn;
        }
        let velocity = Vec2::from_angle(self.direction) * self.speed;
        self.actor.position = (p.as_vec2() + velocity).round().as_ivec2();
        self.bright = (self.bright - self.dim_speed).max(0);
        self.actor.color = Color::gray(self.bright as u8);
        Fate::Live
    }
}

/// `count` sparks with speed in `[min_speed, max_speed)` heading `degrees ± spread / 2`
pub fn spark_burst<R: Rng + ?Sized>(
    position: Point,
    count: usize,
    min_speed: f32,
    max_speed: f32,
    degrees: f32,
    spread: f32,
    rng: &mut R,
) -> Vec<Spark> {
    (0..count)
        .map(|_| {
            let speed = min_speed + rng.random::<f32>() * (max_speed - min_speed);
            let heading = degrees + (rng.random::<f32>() - 0.5) * spread;
            Spark::new(position, speed, heading, rng)
        })
        .collect()
}
