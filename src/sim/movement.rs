//! Movement action
//!
//! Advances every entity in every group once per tick. Each kind applies its own throttle and
//! off-screen policy and reports whether it stays in the cast.

use std::sync::Arc;

use super::SimRng;
use super::cast::{Body, Cast, CastError, EntityId};
use super::script::{Action, TickContext};
use crate::audio::AudioService;
use crate::tuning::Tuning;

/// Whether an entity survives its tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fate {
    Live,
    Despawn,
}

/// What an entity's per-tick rule may read or produce
pub struct Motion<'a> {
    pub tuning: &'a Tuning,
    pub rng: &'a mut SimRng,
    pub audio: &'a mut dyn AudioService,
    /// Horizontal position of the ship's nose, if the ship is alive
    pub ship_x: Option<i32>,
    /// Entities created during the pass, added once it finishes
    pub spawned: Vec<(&'static str, Body)>,
}

pub struct MoveActorsAction {
    tuning: Arc<Tuning>,
}

impl MoveActorsAction {
    pub fn new(tuning: Arc<Tuning>) -> Self {
        Self { tuning }
    }
}

impl Action for MoveActorsAction {
    fn execute(&mut self, cast: &mut Cast, ctx: &mut TickContext<'_>) -> Result<(), CastError> {
        let ship_x = cast.ship().ok().and_then(|ship| ship.nose()).map(|p| p.x);
        let mut motion = Motion {
            tuning: &self.tuning,
            rng: &mut *ctx.rng,
            audio: &mut *ctx.audio,
            ship_x,
            spawned: Vec::new(),
        };

        let mut gone: Vec<(String, EntityId)> = Vec::new();
        for (group, entities) in cast.groups_mut() {
            for entity in entities.iter_mut() {
                if entity.body.advance(&mut motion) == Fate::Despawn {
                    gone.push((group.clone(), entity.id));
                }
            }
        }

        for (group, id) in gone {
            cast.remove(&group, id);
        }
        for (group, body) in motion.spawned {
            cast.add(group, body);
        }
        Ok(())
    }
}
