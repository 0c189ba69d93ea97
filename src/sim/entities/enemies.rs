//! Asteroids and UFOs

use rand::Rng;

use super::Laser;
use crate::audio::sounds;
use crate::groups;
use crate::sim::actor::{Actor, Point, Throttle};
use crate::sim::cast::Body;
use crate::sim::damage::Hostile;
use crate::sim::movement::{Fate, Motion};
use crate::sim::structure::generate_structure;
use crate::tuning::{EnemyType, Grid, Split, Tuning, UfoSpec};
use crate::wrap_x;

/// Move every part by `velocity`, wrapping horizontally
fn shift_parts(parts: &mut [Actor], velocity: Point, max_x: i32) {
    for part in parts {
        part.velocity = velocity;
        part.move_next(max_x);
    }
}

/// A falling asteroid; large kinds are composites whose core is the last part
#[derive(Debug, Clone)]
pub struct Asteroid {
    pub kind: String,
    pub parts: Vec<Actor>,
    pub velocity: Point,
    pub health: i32,
    pub damage: i32,
    pub points: u32,
    pub throttle: Throttle,
    hit_sound: Option<String>,
    destroy_sound: String,
    splits_into: Option<Split>,
}

impl Asteroid {
    /// Build an asteroid of the given type. Sideways drifters replace `velocity` with a
    /// random diagonal.
    pub fn new<R: Rng + ?Sized>(
        spec: &EnemyType,
        tuning: &Tuning,
        position: Point,
        velocity: Point,
        rng: &mut R,
    ) -> Self {
        let cell = tuning.grid.cell_size;
        let throttle = Throttle::new(spec.move_wait.sample(rng));
        let velocity = if spec.drifts_sideways {
            let dx = if rng.random_bool(0.5) { -cell } else { cell };
            Point::new(dx, cell)
        } else {
            velocity
        };

        let core = Actor::new(spec.glyph.clone(), position, spec.color)
            .with_velocity(velocity)
            .with_font_size(tuning.font_size);
        let mut parts = match &spec.layout {
            Some(layout) => generate_structure(
                position,
                velocity,
                tuning.layout(layout),
                &[spec.color],
                cell,
            ),
            None => Vec::new(),
        };
        parts.push(core);

        Self {
            kind: spec.name.clone(),
            parts,
            velocity,
            health: spec.health,
            damage: spec.damage,
            points: spec.points,
            throttle,
            hit_sound: spec.hit_sound.clone(),
            destroy_sound: spec.destroy_sound.clone(),
            splits_into: spec.splits_into.clone(),
        }
    }

    pub fn core(&self) -> Option<&Actor> {
        self.parts.last()
    }

    /// Throttled fall; leaves the cast once the core nears the bottom edge
    pub fn advance(&mut self, grid: &Grid) -> Fate {
        if !self.throttle.ready() {
            return Fate::Live;
        }
        let bottom = grid.max_y - grid.cell_size * 2;
        match self.core() {
            Some(core) if core.position.y < bottom => {
                shift_parts(&mut self.parts, self.velocity, grid.max_x);
                Fate::Live
            }
            _ => Fate::Despawn,
        }
    }
}

impl Hostile for Asteroid {
    fn parts(&self) -> &[Actor] {
        &self.parts
    }

    fn health_mut(&mut self) -> &mut i32 {
        &mut self.health
    }

    fn health(&self) -> i32 {
        self.health
    }

    fn contact_damage(&self) -> i32 {
        self.damage
    }

    fn points(&self) -> u32 {
        self.points
    }

    fn hit_sound(&self) -> Option<&str> {
        self.hit_sound.as_deref()
    }

    fn destroy_sound(&self) -> &str {
        &self.destroy_sound
    }

    fn splits_into(&self) -> Option<&Split> {
        self.splits_into.as_ref()
    }
}

/// A wandering saucer that fires down at the ship
#[derive(Debug, Clone)]
pub struct Ufo {
    pub parts: Vec<Actor>,
    pub velocity: Point,
    pub health: i32,
    pub shoot_wait: u32,
    spec: UfoSpec,
}

impl Ufo {
    pub fn new(tuning: &Tuning, position: Point, velocity: Point) -> Self {
        let spec = tuning.ufo.clone();
        let core = Actor::new(spec.glyph.clone(), position, spec.color)
            .with_velocity(velocity)
            .with_font_size(tuning.font_size);
        let mut parts = generate_structure(
            position,
            velocity,
            tuning.layout(&spec.layout),
            &spec.palette,
            tuning.grid.cell_size,
        );
        parts.push(core);
        Self {
            parts,
            velocity,
            health: spec.health,
            shoot_wait: 0,
            spec,
        }
    }

    pub fn core(&self) -> Option<&Actor> {
        self.parts.last()
    }

    pub fn advance(&mut self, motion: &mut Motion<'_>) -> Fate {
        let grid = motion.tuning.grid;
        let Some(core) = self.core() else {
            return Fate::Despawn;
        };
        if core.position.y >= grid.max_y {
            return Fate::Despawn;
        }

        motion.audio.set_loop_sound(sounds::UFO_FLY);
        if motion.rng.random_bool(self.spec.reverse_chance) {
            self.velocity.x = -self.velocity.x;
        }
        self.velocity.y = if motion.rng.random_bool(self.spec.descend_chance) {
            grid.cell_size
        } else {
            0
        };
        shift_parts(&mut self.parts, self.velocity, grid.max_x);

        if self.shoot_wait > 0 {
            self.shoot_wait -= 1;
        } else if let (Some(ship_x), Some(core)) = (motion.ship_x, self.parts.last()) {
            let dx = wrap_x(ship_x - core.position.x + grid.max_x / 2, grid.max_x) - grid.max_x / 2;
            if dx.abs() < self.spec.shoot_range * grid.cell_size {
                let laser = Laser::new(
                    self.spec.laser_glyph.clone(),
                    core.position + Point::new(0, grid.cell_size),
                    Point::new(0, grid.cell_size),
                    self.spec.laser_color,
                    self.spec.laser_damage,
                );
                motion.spawned.push((groups::ENEMY_LASERS, Body::Laser(laser)));
                self.shoot_wait = self.spec.shoot_cooldown;
                motion.audio.play_sound(sounds::UFO_LASER);
            }
        }
        Fate::Live
    }
}

impl Hostile for Ufo {
    fn parts(&self) -> &[Actor] {
        &self.parts
    }

    fn health_mut(&mut self) -> &mut i32 {
        &mut self.health
    }

    fn health(&self) -> i32 {
        self.health
    }

    fn contact_damage(&self) -> i32 {
        self.spec.damage
    }

    fn points(&self) -> u32 {
        self.spec.points
    }

    fn hit_sound(&self) -> Option<&str> {
        Some(&self.spec.hit_sound)
    }

    fn destroy_sound(&self) -> &str {
        &self.spec.destroy_sound
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::AudioLog;
    use crate::sim::SimRng;
    use rand::SeedableRng;

    fn spec<'a>(tuning: &'a Tuning, name: &str) -> &'a EnemyType {
        tuning.enemy_type(name).expect("known enemy type")
    }

    #[test]
    fn test_small_asteroid_is_single_part() {
        let tuning = Tuning::default();
        let mut rng = SimRng::seed_from_u64(3);
        let asteroid = Asteroid::new(
            spec(&tuning, "asteroid-small"),
            &tuning,
            Point::new(150, -75),
            Point::new(0, 15),
            &mut rng,
        );
        assert_eq!(asteroid.parts.len(), 1);
        assert_eq!(asteroid.health, 1);
        assert!([2, 3, 4].contains(&asteroid.throttle.wait));
    }

    #[test]
    fn test_giant_asteroid_has_core_last() {
        let tuning = Tuning::default();
        let mut rng = SimRng::seed_from_u64(3);
        let origin = Point::new(300, -75);
        let asteroid = Asteroid::new(
            spec(&tuning, "asteroid-giant"),
            &tuning,
            origin,
            Point::new(0, 15),
            &mut rng,
        );
        assert_eq!(asteroid.parts.len(), 38);
        assert_eq!(asteroid.core().map(|c| c.position), Some(origin));
        assert!(asteroid.parts.iter().all(|p| p.velocity == Point::new(0, 15)));
    }

    #[test]
    fn test_xmove_asteroid_drifts() {
        let tuning = Tuning::default();
        let mut rng = SimRng::seed_from_u64(11);
        let asteroid = Asteroid::new(
            spec(&tuning, "asteroid-small-xmove"),
            &tuning,
            Point::new(150, -75),
            Point::new(0, 15),
            &mut rng,
        );
        assert_eq!(asteroid.velocity.x.abs(), 15);
        assert_eq!(asteroid.velocity.y, 15);
    }

    #[test]
    fn test_asteroid_moves_on_throttle_and_despawns_at_bottom() {
        let tuning = Tuning::default();
        let grid = tuning.grid;
        let mut rng = SimRng::seed_from_u64(5);
        let mut asteroid = Asteroid::new(
            spec(&tuning, "asteroid-medium"),
            &tuning,
            Point::new(150, 600),
            Point::new(0, 15),
            &mut rng,
        );
        asteroid.throttle = Throttle::new(1);

        assert_eq!(asteroid.advance(&grid), Fate::Live);
        assert_eq!(asteroid.parts[0].position.y, 615);
        assert_eq!(asteroid.advance(&grid), Fate::Live);
        assert_eq!(asteroid.parts[0].position.y, 615);

        asteroid.parts[0].position.y = grid.max_y - grid.cell_size * 2;
        assert_eq!(asteroid.advance(&grid), Fate::Despawn);
    }

    #[test]
    fn test_ufo_fires_when_ship_below() {
        let tuning = Tuning::default();
        let mut ufo = Ufo::new(&tuning, Point::new(300, 0), Point::new(15, 0));
        let mut rng = SimRng::seed_from_u64(9);
        let mut audio = AudioLog::default();
        let mut motion = Motion {
            tuning: &tuning,
            rng: &mut rng,
            audio: &mut audio,
            ship_x: Some(300),
            spawned: Vec::new(),
        };

        assert_eq!(ufo.advance(&mut motion), Fate::Live);
        assert_eq!(motion.spawned.len(), 1);
        assert_eq!(motion.spawned[0].0, groups::ENEMY_LASERS);
        assert_eq!(ufo.shoot_wait, 2);

        ufo.advance(&mut motion);
        assert_eq!(motion.spawned.len(), 1);
        assert!(audio.sounds().any(|s| s == sounds::UFO_LASER));
    }

    #[test]
    fn test_ufo_holds_fire_when_ship_far() {
        let tuning = Tuning::default();
        let mut ufo = Ufo::new(&tuning, Point::new(60, 0), Point::new(15, 0));
        let mut rng = SimRng::seed_from_u64(9);
        let mut audio = AudioLog::default();
        let mut motion = Motion {
            tuning: &tuning,
            rng: &mut rng,
            audio: &mut audio,
            ship_x: Some(400),
            spawned: Vec::new(),
        };
        ufo.advance(&mut motion);
        assert!(motion.spawned.is_empty());
    }
}
