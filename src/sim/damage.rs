//! Enemy damage and destruction
//!
//! Weapon hits credit score on a kill; ramming the ship destroys an enemy without credit.

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use super::SimRng;
use super::actor::{Actor, Point};
use super::cast::{Body, Cast, CastError, EntityId};
use super::entities::{Asteroid, Explosion, Spark, Upgrade};
use crate::groups;
use crate::tuning::{Split, Tuning};

/// Cause of damage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Damage {
    /// Laser hit for the given amount
    Weapon(i32),
    /// Collision with the ship; always fatal, never scored
    Ram,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    Damaged,
    /// Health just dropped to zero or below
    Destroyed { credited: bool },
}

/// Capability shared by everything the ship can shoot or ram
pub trait Hostile {
    fn parts(&self) -> &[Actor];
    fn health(&self) -> i32;
    fn health_mut(&mut self) -> &mut i32;
    /// Shield points taken from the ship on contact
    fn contact_damage(&self) -> i32;
    fn points(&self) -> u32;
    fn hit_sound(&self) -> Option<&str>;
    fn destroy_sound(&self) -> &str;

    fn splits_into(&self) -> Option<&Split> {
        None
    }

    /// Apply damage. Health never increases, and `Destroyed` is reported only on the
    /// transition from alive to dead.
    fn apply(&mut self, damage: Damage) -> HitOutcome {
        let health = self.health_mut();
        let was_alive = *health > 0;
        match damage {
            Damage::Weapon(amount) => *health -= amount.max(0),
            Damage::Ram => *health = (*health).min(0),
        }
        if was_alive && *health <= 0 {
            HitOutcome::Destroyed {
                credited: matches!(damage, Damage::Weapon(_)),
            }
        } else {
            HitOutcome::Damaged
        }
    }
}

/// Result of striking an enemy, for picking the cue to play
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Strike {
    pub destroyed: bool,
    pub sound: Option<String>,
}

/// What is left of a destroyed enemy
#[derive(Debug, Clone)]
struct Wreck {
    parts: Vec<Point>,
    origin: Point,
    points: u32,
    split: Option<Split>,
    sound: String,
}

impl Wreck {
    fn of(hostile: &dyn Hostile, credited: bool) -> Self {
        let parts: Vec<Point> = hostile.parts().iter().map(|p| p.position).collect();
        Self {
            origin: parts.last().copied().unwrap_or_default(),
            parts,
            points: if credited { hostile.points() } else { 0 },
            split: hostile.splits_into().cloned(),
            sound: hostile.destroy_sound().to_string(),
        }
    }

    /// Score, pickups, debris and offspring
    fn scatter(self, cast: &mut Cast, tuning: &Tuning, rng: &mut SimRng) -> Result<(), CastError> {
        if self.points > 0 {
            let unlocked = cast.score_mut()?.add_points(self.points, &tuning.upgrades);
            for kind in unlocked {
                log::debug!("score threshold crossed, dropping {kind:?}");
                cast.add(groups::UPGRADES, Body::Upgrade(Upgrade::spawn(kind, tuning, rng)));
            }
        }

        for &position in &self.parts {
            let velocity = Point::new(rng.random_range(-1..=1), rng.random_range(0..=2));
            let speed = 0.3 + rng.random::<f32>() * 0.7;
            cast.add(
                groups::EXPLOSIONS,
                Body::Explosion(Explosion::new(position, velocity, speed)),
            );
            for _ in 0..3 {
                let speed = [5.0, 8.0, 9.0, 10.0].choose(rng).copied().unwrap_or(8.0);
                let heading = rng.random::<f32>() * 360.0;
                cast.add(
                    groups::SPARKS,
                    Body::Spark(Spark::new(position, speed, heading, rng)),
                );
            }
        }

        if let Some(split) = &self.split {
            let Some(spec) = tuning.enemy_type(&split.kind) else {
                log::warn!("unknown offspring type `{}`", split.kind);
                return Ok(());
            };
            let cell = tuning.grid.cell_size;
            for _ in 0..split.count {
                let jitter = Point::new(rng.random_range(-1..=1), rng.random_range(-1..=0));
                let velocity = Point::new(rng.random_range(-1..=1) * cell, cell);
                let child = Asteroid::new(spec, tuning, self.origin + jitter * cell, velocity, rng);
                cast.add(groups::ASTEROIDS, Body::Asteroid(child));
            }
        }
        Ok(())
    }
}

/// Damage the enemy `id` in `group`. On destruction it is removed from the cast and its wreck
/// scattered. Returns `None` when the enemy is no longer present.
pub fn strike(
    cast: &mut Cast,
    group: &str,
    id: EntityId,
    damage: Damage,
    tuning: &Tuning,
    rng: &mut SimRng,
) -> Result<Option<Strike>, CastError> {
    let Some(entity) = cast.find_mut(group, id) else {
        return Ok(None);
    };
    let Some(hostile) = entity.body.as_hostile_mut() else {
        return Err(CastError::WrongKind {
            group: group.to_string(),
            expected: "hostile",
        });
    };

    match hostile.apply(damage) {
        HitOutcome::Damaged => Ok(Some(Strike {
            destroyed: false,
            sound: hostile.hit_sound().map(str::to_string),
        })),
        HitOutcome::Destroyed { credited } => {
            let wreck = Wreck::of(hostile, credited);
            let sound = wreck.sound.clone();
            log::debug!("{group} {id:?} destroyed ({} pts)", wreck.points);
            cast.remove(group, id);
            wreck.scatter(cast, tuning, rng)?;
            Ok(Some(Strike {
                destroyed: true,
                sound: Some(sound),
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::actor::Color;
    use crate::sim::entities::Score;
    use proptest::prelude::*;
    use rand::SeedableRng;

    fn setup(kind: &str) -> (Cast, Tuning, SimRng, EntityId) {
        let tuning = Tuning::default();
        let mut rng = SimRng::seed_from_u64(42);
        let mut cast = Cast::new();
        cast.add(groups::SCORES, Body::Score(Score::new(&tuning.grid, Color::WHITE)));
        let spec = tuning.enemy_type(kind).expect("known type").clone();
        let asteroid = Asteroid::new(&spec, &tuning, Point::new(300, 150), Point::new(0, 15), &mut rng);
        let id = cast.add(groups::ASTEROIDS, Body::Asteroid(asteroid));
        (cast, tuning, rng, id)
    }

    #[test]
    fn test_weapon_kill_credits_points() {
        let (mut cast, tuning, mut rng, id) = setup("asteroid-large");
        let hit = strike(&mut cast, groups::ASTEROIDS, id, Damage::Weapon(1), &tuning, &mut rng)
            .expect("strike")
            .expect("present");
        assert!(!hit.destroyed);
        assert_eq!(hit.sound.as_deref(), Some("ast-hit"));
        assert_eq!(cast.score().expect("score").points(), 0);

        let kill = strike(&mut cast, groups::ASTEROIDS, id, Damage::Weapon(1), &tuning, &mut rng)
            .expect("strike")
            .expect("present");
        assert!(kill.destroyed);
        assert_eq!(kill.sound.as_deref(), Some("ast-hit-lrg"));
        assert_eq!(cast.score().expect("score").points(), 2);
        assert!(cast.is_empty(groups::ASTEROIDS));
        assert_eq!(cast.get(groups::EXPLOSIONS).len(), 1);
        assert_eq!(cast.get(groups::SPARKS).len(), 3);
    }

    #[test]
    fn test_ram_kill_awards_nothing() {
        let (mut cast, tuning, mut rng, id) = setup("asteroid-large");
        let kill = strike(&mut cast, groups::ASTEROIDS, id, Damage::Ram, &tuning, &mut rng)
            .expect("strike")
            .expect("present");
        assert!(kill.destroyed);
        assert_eq!(cast.score().expect("score").points(), 0);
    }

    #[test]
    fn test_giant_splits_into_huge() {
        let (mut cast, tuning, mut rng, id) = setup("asteroid-giant");
        strike(&mut cast, groups::ASTEROIDS, id, Damage::Weapon(5), &tuning, &mut rng)
            .expect("strike");
        let kids: Vec<&str> = cast
            .get(groups::ASTEROIDS)
            .iter()
            .filter_map(|e| match &e.body {
                Body::Asteroid(a) => Some(a.kind.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(kids, ["asteroid-huge", "asteroid-huge"]);
        // one explosion and three sparks per part of the 38-part giant
        assert_eq!(cast.get(groups::EXPLOSIONS).len(), 38);
        assert_eq!(cast.get(groups::SPARKS).len(), 114);
        for entity in cast.get(groups::ASTEROIDS) {
            let core = entity.body.parts().last().expect("core").position;
            assert!((285..=315).contains(&core.x));
            assert!((135..=150).contains(&core.y));
        }
    }

    #[test]
    fn test_strike_missing_enemy_is_none() {
        let (mut cast, tuning, mut rng, id) = setup("asteroid-small");
        cast.remove(groups::ASTEROIDS, id);
        let result = strike(&mut cast, groups::ASTEROIDS, id, Damage::Weapon(1), &tuning, &mut rng);
        assert_eq!(result, Ok(None));
    }

    proptest! {
        #[test]
        fn prop_health_never_increases_and_dies_once(
            start in 1i32..10,
            hits in proptest::collection::vec(prop_oneof![
                (-3i32..5).prop_map(Damage::Weapon),
                Just(Damage::Ram),
            ], 1..20),
        ) {
            let tuning = Tuning::default();
            let mut rng = SimRng::seed_from_u64(1);
            let spec = tuning.enemy_type("asteroid-small").expect("known").clone();
            let mut asteroid = Asteroid::new(&spec, &tuning, Point::ZERO, Point::ZERO, &mut rng);
            asteroid.health = start;

            let mut deaths = 0;
            let mut last = asteroid.health;
            for damage in hits {
                if let HitOutcome::Destroyed { .. } = asteroid.apply(damage) {
                    deaths += 1;
                }
                prop_assert!(asteroid.health <= last);
                last = asteroid.health;
            }
            prop_assert!(deaths <= 1);
            prop_assert_eq!(deaths == 1, asteroid.health <= 0);
        }
    }
}
