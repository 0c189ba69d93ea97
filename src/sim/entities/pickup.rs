use rand::Rng;

use crate::sim::actor::{Actor, Color, Point, Throttle};
use crate::sim::movement::Fate;
use crate::tuning::{Grid, Tuning, UpgradeKind};

/// A falling pickup released by score thresholds
#[derive(Debug, Clone)]
pub struct Upgrade {
    pub actor: Actor,
    pub kind: UpgradeKind,
    throttle: Throttle,
}

impl Upgrade {
    /// Drop a pickup from a random column at the top of the screen
    pub fn spawn<R: Rng + ?Sized>(kind: UpgradeKind, tuning: &Tuning, rng: &mut R) -> Self {
        let grid = &tuning.grid;
        let x = rng.random_range(0..grid.columns) * grid.cell_size;
        Self::new(kind, Point::new(x, 0), tuning)
    }

    pub fn new(kind: UpgradeKind, position: Point, tuning: &Tuning) -> Self {
        let (glyph, color) = match kind {
            UpgradeKind::Shield => ("+".to_string(), Color::YELLOW),
            UpgradeKind::Gun(mode) => {
                let gun = tuning.guns.get(mode);
                (gun.glyph.clone(), gun.color)
            }
        };
        let actor = Actor::new(glyph, position, color)
            .with_velocity(Point::new(0, tuning.grid.cell_size));
        Self {
            actor,
            kind,
            throttle: Throttle {
                wait: tuning.upgrade_wait,
                timer: tuning.upgrade_wait,
            },
        }
    }

    pub fn advance(&mut self, grid: &Grid) -> Fate {
        let p = self.actor.position;
        if p.x > grid.max_x || p.x < 0 || p.y < 0 || p.y > grid.max_y {
            return Fate::Despawn;
        }
        if self.throttle.ready() {
            self.actor.position = p + self.actor.velocity;
        }
        Fate::Live
    }
}
