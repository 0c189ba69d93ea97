//! Collision detection and response
//!
//! Four interaction classes run in a fixed order every tick:
//! 1. ship lasers against enemy parts
//! 2. ship parts against enemy parts (skipped during the post-hit grace period)
//! 3. ship parts against enemy lasers
//! 4. ship parts against falling pickups
//!
//! Each class resolves at most one hit per laser, ship or pickup. Once shields go negative the
//! game-over sequence runs a single time and later classes stop.

use std::sync::Arc;

use rand::Rng;

use super::actor::{Actor, Color, Point};
use super::cast::{Body, Cast, CastError, EntityId};
use super::damage::{Damage, strike};
use super::entities::{Explosion, set_hud_color, spark_burst};
use super::script::{Action, GameEvent, TickContext};
use crate::audio::{MusicTrack, sounds};
use crate::groups;
use crate::tuning::{Tuning, UpgradeKind};
use crate::wrap_x;

pub struct HandleCollisionsAction {
    tuning: Arc<Tuning>,
    game_over: bool,
    game_over_ticks: u32,
    handed_off: bool,
}

impl HandleCollisionsAction {
    pub fn new(tuning: Arc<Tuning>) -> Self {
        Self {
            tuning,
            game_over: false,
            game_over_ticks: 0,
            handed_off: false,
        }
    }

    /// First enemy (in scan order) with a part on `cells`, also matching each part's previous column
    fn find_target(&self, cast: &Cast, cells: [Point; 2]) -> Option<(&'static str, EntityId)> {
        let max_x = self.tuning.grid.max_x;
        for group in groups::ENEMIES {
            for entity in cast.get(group) {
                let Some(enemy) = entity.body.as_hostile() else {
                    continue;
                };
                let hit = enemy.parts().iter().any(|part| {
                    let previous = Point::new(
                        wrap_x(part.position.x - part.velocity.x, max_x),
                        part.position.y,
                    );
                    cells.iter().any(|&c| c == part.position || c == previous)
                });
                if hit {
                    return Some((group, entity.id));
                }
            }
        }
        None
    }

    fn lasers_vs_enemies(&mut self, cast: &mut Cast, ctx: &mut TickContext<'_>) -> Result<(), CastError> {
        let cell = self.tuning.grid.cell_size;
        let lasers: Vec<(EntityId, Point, i32)> = cast
            .get(groups::LASERS)
            .iter()
            .filter_map(|e| match &e.body {
                Body::Laser(laser) => Some((e.id, laser.actor.position, laser.damage)),
                _ => None,
            })
            .collect();

        for (laser_id, position, damage) in lasers {
            // the cell the laser just left covers enemies it crossed this tick
            let cells = [position, position + Point::new(0, cell)];
            let Some((group, enemy_id)) = self.find_target(cast, cells) else {
                continue;
            };

            let speed = 0.1 + ctx.rng.random::<f32>() * 0.8;
            cast.add(
                groups::EXPLOSIONS,
                Body::Explosion(Explosion::new(position, Point::new(0, 1), speed)),
            );
            if let Some(hit) = strike(cast, group, enemy_id, Damage::Weapon(damage), &self.tuning, ctx.rng)?
                && let Some(sound) = hit.sound.filter(|s| !s.is_empty())
            {
                ctx.audio.play_sound(&sound);
            }
            cast.remove(groups::LASERS, laser_id);
        }
        Ok(())
    }

    fn ship_vs_enemies(&mut self, cast: &mut Cast, ctx: &mut TickContext<'_>) -> Result<(), CastError> {
        let ship = cast.ship()?;
        if ship.is_hurt() {
            return Ok(());
        }

        let contact = ship.parts.iter().find_map(|part| {
            groups::ENEMIES.iter().find_map(|&group| {
                cast.get(group).iter().find_map(|entity| {
                    let enemy = entity.body.as_hostile()?;
                    enemy
                        .parts()
                        .iter()
                        .any(|p| p.position == part.position)
                        .then(|| (part.position, group, entity.id, enemy.contact_damage()))
                })
            })
        });
        let Some((at, group, enemy_id, damage)) = contact else {
            return Ok(());
        };

        log::debug!("ship rammed by {group} {enemy_id:?} for {damage}");
        let remaining = self.damage_shields(cast, ctx, at, damage)?;
        strike(cast, group, enemy_id, Damage::Ram, &self.tuning, ctx.rng)?;
        self.resolve_ship_hit(cast, ctx, remaining)
    }

    fn ship_vs_enemy_lasers(&mut self, cast: &mut Cast, ctx: &mut TickContext<'_>) -> Result<(), CastError> {
        let ship = cast.ship()?;
        if ship.is_hurt() {
            return Ok(());
        }

        let contact = ship.parts.iter().find_map(|part| {
            cast.get(groups::ENEMY_LASERS)
                .iter()
                .find_map(|entity| match &entity.body {
                    Body::Laser(laser) if laser.actor.position == part.position => {
                        Some((part.position, entity.id, laser.damage))
                    }
                    _ => None,
                })
        });
        let Some((at, laser_id, damage)) = contact else {
            return Ok(());
        };

        log::debug!("ship shot for {damage}");
        let remaining = self.damage_shields(cast, ctx, at, damage)?;
        cast.remove(groups::ENEMY_LASERS, laser_id);
        self.resolve_ship_hit(cast, ctx, remaining)
    }

    fn ship_vs_upgrades(&mut self, cast: &mut Cast, ctx: &mut TickContext<'_>) -> Result<(), CastError> {
        let cell = self.tuning.grid.cell_size;
        let parts: Vec<Point> = cast.ship()?.parts.iter().map(|p| p.position).collect();
        let collected: Vec<(EntityId, UpgradeKind)> = cast
            .get(groups::UPGRADES)
            .iter()
            .filter_map(|entity| match &entity.body {
                Body::Upgrade(upgrade) => {
                    let u = upgrade.actor.position;
                    parts
                        .iter()
                        .any(|p| p.x == u.x && (p.y - u.y).abs() < cell)
                        .then_some((entity.id, upgrade.kind))
                }
                _ => None,
            })
            .collect();

        for (id, kind) in collected {
            match kind {
                UpgradeKind::Shield => cast
                    .shields_mut()?
                    .recharge(self.tuning.shield_upgrade_points, self.tuning.max_shields),
                UpgradeKind::Gun(mode) => cast.ship_mut()?.set_gun(mode),
            }
            log::debug!("picked up {kind:?}");
            cast.remove(groups::UPGRADES, id);
            ctx.audio.play_sound(sounds::UPGRADE);
        }
        Ok(())
    }

    /// Take shield points and throw sparks away from the impact. Returns the shields left.
    fn damage_shields(
        &mut self,
        cast: &mut Cast,
        ctx: &mut TickContext<'_>,
        at: Point,
        damage: i32,
    ) -> Result<i32, CastError> {
        let shields = cast.shields_mut()?;
        shields.add_points(-damage);
        let remaining = shields.points();

        let drift = cast.ship()?.velocity.x;
        let mut sparks = spark_burst(at, 20, 5.0, 13.0, 270.0, 40.0, ctx.rng);
        if drift > 0 {
            sparks.extend(spark_burst(at, 20, 10.0, 23.0, 350.0, 40.0, ctx.rng));
        } else if drift < 0 {
            sparks.extend(spark_burst(at, 20, 10.0, 23.0, 190.0, 40.0, ctx.rng));
        }
        for spark in sparks {
            cast.add(groups::SPARKS, Body::Spark(spark));
        }
        Ok(remaining)
    }

    fn resolve_ship_hit(
        &mut self,
        cast: &mut Cast,
        ctx: &mut TickContext<'_>,
        remaining: i32,
    ) -> Result<(), CastError> {
        let ship = cast.ship_mut()?;
        if remaining < 0 {
            ship.set_dead();
            self.game_over = true;
            ctx.flags.game_over = true;
        } else {
            ship.set_hurt();
            ctx.audio.play_sound(sounds::SHIP_HIT);
            if remaining < self.tuning.low_shields {
                ctx.audio.play_sound(sounds::LOW_SHIELDS);
            }
        }
        Ok(())
    }

    fn begin_game_over(&mut self, cast: &mut Cast, ctx: &mut TickContext<'_>) -> Result<(), CastError> {
        let grid = self.tuning.grid;
        let score = cast.score()?.points();
        log::info!("game over with score {score}");
        ctx.events.push(GameEvent::GameOver { score });

        ctx.audio.set_music(MusicTrack::Silence);
        ctx.audio.play_sound(sounds::GAME_OVER);
        ctx.audio.play_sound(sounds::SHIP_EXPLOSION);

        set_hud_color(cast, Color::BACKGROUND);
        let center = Point::new(grid.max_x / 2, grid.max_y / 2);
        cast.add(
            groups::MESSAGES,
            Body::Message(Actor::new("Game Over!", center, Color::WHITE)),
        );

        let wreck: Vec<Point> = cast.ship()?.parts.iter().map(|p| p.position).collect();
        for position in wreck {
            let speed = 0.1 + ctx.rng.random::<f32>() * 0.8;
            cast.add(
                groups::EXPLOSIONS,
                Body::Explosion(Explosion::new(position, Point::new(0, 1), speed)),
            );
            for spark in spark_burst(position, 3, 5.0, 13.0, 0.0, 360.0, ctx.rng) {
                cast.add(groups::SPARKS, Body::Spark(spark));
            }
        }
        cast.ship_mut()?.clear_parts();

        for group in [groups::ASTEROIDS, groups::LASERS, groups::UFOS, groups::ENEMY_LASERS] {
            cast.remove_all(group);
        }
        Ok(())
    }

    /// Count down to the highscore hand-off
    fn wait_for_hand_off(&mut self, cast: &mut Cast, ctx: &mut TickContext<'_>) -> Result<(), CastError> {
        if self.game_over_ticks < self.tuning.game_over_delay_ticks {
            self.game_over_ticks += 1;
            return Ok(());
        }
        if !self.handed_off {
            self.handed_off = true;
            let score = cast.score()?.points();
            log::info!("handing off to highscores");
            ctx.events.push(GameEvent::ShowHighscores { score });
            if let Ok(message) = cast.get_first(groups::MESSAGES) {
                let id = message.id;
                cast.remove(groups::MESSAGES, id);
            }
        }
        Ok(())
    }
}

impl Action for HandleCollisionsAction {
    fn execute(&mut self, cast: &mut Cast, ctx: &mut TickContext<'_>) -> Result<(), CastError> {
        if self.game_over {
            return self.wait_for_hand_off(cast, ctx);
        }

        self.lasers_vs_enemies(cast, ctx)?;
        self.ship_vs_enemies(cast, ctx)?;
        if !self.game_over {
            self.ship_vs_enemy_lasers(cast, ctx)?;
        }
        if !self.game_over {
            self.ship_vs_upgrades(cast, ctx)?;
        }
        if self.game_over {
            self.begin_game_over(cast, ctx)?;
        }
        Ok(())
    }
}
