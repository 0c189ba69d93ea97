//! Output action: paints the cast in layer order

use super::cast::{Cast, CastError};
use super::script::{Action, TickContext};
use crate::groups;

/// Gameplay layers, back to front. Text layers are drawn centered.
const LAYERS: [(&str, bool); 13] = [
    (groups::SCORES, false),
    (groups::SHIELDS, false),
    (groups::MESSAGES, true),
    (groups::STAGE_MESSAGES, true),
    (groups::SHIPS, false),
    (groups::LASERS, false),
    (groups::ENEMY_LASERS, false),
    (groups::ASTEROIDS, false),
    (groups::UFOS, false),
    (groups::EXPLOSIONS, false),
    (groups::SPARKS, false),
    (groups::UPGRADES, false),
    (groups::MENUS, true),
];

#[derive(Debug, Default)]
pub struct DrawActorsAction;

impl DrawActorsAction {
    pub fn new() -> Self {
        Self
    }
}

impl Action for DrawActorsAction {
    fn execute(&mut self, cast: &mut Cast, ctx: &mut TickContext<'_>) -> Result<(), CastError> {
        ctx.video.clear_buffer();
        for entity in cast.get(groups::HIGHSCORES) {
            ctx.video.draw_actors(entity.body.parts(), false);
        }
        for (group, centered) in LAYERS {
            if !ctx.flags.started && group != groups::MENUS {
                continue;
            }
            for entity in cast.get(group) {
                ctx.video.draw_actors(entity.body.parts(), centered);
            }
        }
        ctx.video.flush_buffer();
        Ok(())
    }
}
