//! Input action: steering and firing

use std::sync::Arc;

use super::actor::Point;
use super::cast::{Body, Cast, CastError};
use super::entities::Laser;
use super::script::{Action, TickContext};
use crate::audio::sounds;
use crate::groups;
use crate::platform::Key;
use crate::tuning::Tuning;

pub struct ControlActorsAction {
    tuning: Arc<Tuning>,
    /// Set after a shot until the gun's cooldown has run out
    fire_held: bool,
    fire_timer: u32,
}

impl ControlActorsAction {
    pub fn new(tuning: Arc<Tuning>) -> Self {
        Self {
            tuning,
            fire_held: false,
            fire_timer: 0,
        }
    }
}

impl Action for ControlActorsAction {
    fn execute(&mut self, cast: &mut Cast, ctx: &mut TickContext<'_>) -> Result<(), CastError> {
        let cell = self.tuning.grid.cell_size;
        let mut direction = Point::ZERO;
        if ctx.input.is_key_down(Key::Left) {
            direction = Point::new(-cell, 0);
        }
        if ctx.input.is_key_down(Key::Right) {
            direction = Point::new(cell, 0);
        }

        let ship = cast.ship_mut()?;
        ship.velocity = direction;

        if !ship.is_dead()
            && !ship.is_hurt()
            && !self.fire_held
            && ctx.input.is_key_down(Key::Space)
        {
            ctx.audio.play_sound(sounds::LASER);
            self.fire_held = true;
            self.fire_timer = ship.register_shot(&self.tuning.guns);

            let gun = self.tuning.guns.get(ship.gun);
            if let Some(nose) = ship.nose() {
                let velocity = Point::new(0, -cell);
                let mut shots = vec![nose - Point::new(0, cell)];
                if gun.spread {
                    shots.push(nose - Point::new(cell, 0));
                    shots.push(nose + Point::new(cell, 0));
                }
                for position in shots {
                    let laser = Laser::new(gun.glyph.clone(), position, velocity, gun.color, gun.damage);
                    cast.add(groups::LASERS, Body::Laser(laser));
                }
            }
        }

        if self.fire_held {
            if self.fire_timer == 0 {
                self.fire_held = false;
            } else {
                self.fire_timer -= 1;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::AudioLog;
    use crate::platform::{TextCanvas, TickInput};
    use crate::sim::SimRng;
    use crate::sim::entities::Ship;
    use crate::sim::script::PlayFlags;
    use crate::tuning::GunMode;
    use rand::SeedableRng;

    struct Rig {
        cast: Cast,
        action: ControlActorsAction,
        audio: AudioLog,
    }

    impl Rig {
        fn new() -> Self {
            let tuning = Arc::new(Tuning::default());
            let mut cast = Cast::new();
            cast.add(groups::SHIPS, Body::Ship(Ship::new(&tuning)));
            Self {
                cast,
                action: ControlActorsAction::new(tuning),
                audio: AudioLog::default(),
            }
        }

        fn step(&mut self, keys: &[Key]) {
            let input = TickInput::pressing(keys);
            let mut video = TextCanvas::new(40, 60, 15);
            let mut rng = SimRng::seed_from_u64(0);
            let mut flags = PlayFlags::default();
            let mut events = Vec::new();
            let mut ctx = TickContext {
                input: &input,
                audio: &mut self.audio,
                video: &mut video,
                rng: &mut rng,
                flags: &mut flags,
                events: &mut events,
            };
            self.action
                .execute(&mut self.cast, &mut ctx)
                .expect("control");
        }
    }

    #[test]
    fn test_steering_sets_velocity() {
        let mut rig = Rig::new();
        rig.step(&[Key::Left]);
        assert_eq!(rig.cast.ship().expect("ship").velocity, Point::new(-15, 0));
        rig.step(&[]);
        assert_eq!(rig.cast.ship().expect("ship").velocity, Point::ZERO);
    }

    #[test]
    fn test_single_gun_cooldown() {
        let mut rig = Rig::new();
        // holding fire: one shot, then six cooldown ticks and the release tick
        for _ in 0..7 {
            rig.step(&[Key::Space]);
        }
        assert_eq!(rig.cast.get(groups::LASERS).len(), 1);
        rig.step(&[Key::Space]);
        assert_eq!(rig.cast.get(groups::LASERS).len(), 2);
        assert_eq!(rig.audio.sounds().filter(|s| *s == sounds::LASER).count(), 2);

        let laser = &rig.cast.get(groups::LASERS)[0].body.parts()[0];
        assert_eq!(laser.position, Point::new(300, 585 - 15));
        assert_eq!(laser.glyph, "^");
    }

    #[test]
    fn test_shotgun_fires_three() {
        let mut rig = Rig::new();
        rig.cast.ship_mut().expect("ship").set_gun(GunMode::Shotgun);
        rig.step(&[Key::Space]);
        let lasers = rig.cast.get(groups::LASERS);
        assert_eq!(lasers.len(), 3);
        assert!(lasers.iter().all(|l| matches!(&l.body, Body::Laser(laser) if laser.damage == 2)));
    }

    #[test]
    fn test_no_fire_while_hurt() {
        let mut rig = Rig::new();
        rig.cast.ship_mut().expect("ship").set_hurt();
        rig.step(&[Key::Space]);
        assert!(rig.cast.is_empty(groups::LASERS));
    }
}
