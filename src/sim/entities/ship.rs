//! Player ship

use crate::sim::actor::{Actor, Color, Point};
use crate::sim::structure::generate_structure;
use crate::tuning::{GunMode, Guns, ShipSpec, Tuning};

/// Composite player ship. `parts[0]` is the nose.
#[derive(Debug, Clone)]
pub struct Ship {
    pub parts: Vec<Actor>,
    /// Steering velocity, copied onto every part each tick
    pub velocity: Point,
    pub gun: GunMode,
    pub upgrade_shots: u32,
    hurt: bool,
    hurt_timer: u32,
    dead: bool,
    flash: usize,
    base_colors: Vec<Color>,
    spec: ShipSpec,
}

impl Ship {
    pub fn new(tuning: &Tuning) -> Self {
        let grid = &tuning.grid;
        let spec = tuning.ship.clone();
        let origin = Point::new(
            grid.max_x / 2,
            grid.max_y - grid.cell_size * spec.rows_from_bottom,
        );
        let parts = generate_structure(
            origin,
            Point::ZERO,
            &spec.layout,
            &spec.palette,
            grid.cell_size,
        );
        let base_colors = parts.iter().map(|p| p.color).collect();
        Self {
            parts,
            velocity: Point::ZERO,
            gun: GunMode::Single,
            upgrade_shots: 0,
            hurt: false,
            hurt_timer: 0,
            dead: false,
            flash: 0,
            base_colors,
            spec,
        }
    }

    pub fn nose(&self) -> Option<Point> {
        self.parts.first().map(|p| p.position)
    }

    pub fn is_hurt(&self) -> bool {
        self.hurt
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    /// Start the post-hit grace period
    pub fn set_hurt(&mut self) {
        self.hurt = true;
        self.hurt_timer = self.spec.hurt_ticks;
    }

    pub fn set_dead(&mut self) {
        self.dead = true;
        self.hurt = false;
    }

    pub fn clear_parts(&mut self) {
        self.parts.clear();
    }

    /// Switch weapons; the new gun starts with a full shot budget
    pub fn set_gun(&mut self, mode: GunMode) {
        self.gun = mode;
        self.upgrade_shots = 0;
    }

    /// Count a shot against the current gun and return its fire cooldown.
    ///
    /// Limited guns revert to [`GunMode::Single`] once their budget is spent.
    pub fn register_shot(&mut self, guns: &Guns) -> u32 {
        let spec = guns.get(self.gun);
        if let Some(max_shots) = spec.max_shots {
            if self.upgrade_shots < max_shots {
                self.upgrade_shots += 1;
            } else {
                self.upgrade_shots = 0;
                self.gun = GunMode::Single;
            }
        }
        spec.cooldown_ticks
    }

    pub fn advance(&mut self, max_x: i32) {
        if self.parts.is_empty() {
            return;
        }
        for part in &mut self.parts {
            part.velocity = self.velocity;
            part.move_next(max_x);
        }

        let [(lit_glyph, lit_color), (dim_glyph, dim_color)] = &self.spec.thrust_frames;
        if let Some(thrust) = self.parts.get_mut(self.spec.thrust_part) {
            if thrust.glyph == *lit_glyph {
                thrust.glyph = dim_glyph.clone();
                thrust.color = *dim_color;
            } else {
                thrust.glyph = lit_glyph.clone();
                thrust.color = *lit_color;
            }
        }

        if self.hurt_timer > 0 {
            self.hurt_timer -= 1;
            if self.hurt_timer % 2 == 0 {
                self.flash = 1 - self.flash;
                let color = self.spec.flash_colors[self.flash];
                let body = self.parts.len() - 1;
                for part in &mut self.parts[..body] {
                    part.color = color;
                }
            }
        } else if self.hurt {
            self.hurt = false;
            for (part, color) in self.parts.iter_mut().zip(&self.base_colors) {
                part.color = *color;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ship_starts_centered_above_bottom() {
        let tuning = Tuning::default();
        let ship = Ship::new(&tuning);
        assert_eq!(ship.parts.len(), 8);
        assert_eq!(ship.nose(), Some(Point::new(300, 705 - 120)));
        assert_eq!(ship.parts[7].position, Point::new(300, 630));
    }

    #[test]
    fn test_steering_moves_every_part() {
        let tuning = Tuning::default();
        let mut ship = Ship::new(&tuning);
        let before: Vec<Point> = ship.parts.iter().map(|p| p.position).collect();
        ship.velocity = Point::new(15, 0);
        ship.advance(600);
        for (part, old) in ship.parts.iter().zip(before) {
            assert_eq!(part.position, old + Point::new(15, 0));
        }
    }

    #[test]
    fn test_thrust_flickers() {
        let tuning = Tuning::default();
        let mut ship = Ship::new(&tuning);
        ship.advance(600);
        assert_eq!(ship.parts[7].glyph, "'");
        assert_eq!(ship.parts[7].color, Color::ORANGE);
        ship.advance(600);
        assert_eq!(ship.parts[7].glyph, "*");
    }

    #[test]
    fn test_hurt_flash_then_restore() {
        let tuning = Tuning::default();
        let mut ship = Ship::new(&tuning);
        ship.set_hurt();
        for _ in 0..2 {
            ship.advance(600);
        }
        assert!(ship.is_hurt());
        assert!(ship.parts[0].color == Color::PINK || ship.parts[0].color == Color::AQUA);

        for _ in 0..9 {
            ship.advance(600);
        }
        assert!(!ship.is_hurt());
        assert_eq!(ship.parts[0].color, Color::BLUE);
        assert_eq!(ship.parts[2].color, Color::WHITE);
    }

    #[test]
    fn test_rapid_gun_budget_reverts_to_single() {
        let tuning = Tuning::default();
        let mut ship = Ship::new(&tuning);
        ship.set_gun(GunMode::Rapid);
        for _ in 0..50 {
            assert_eq!(ship.register_shot(&tuning.guns), 2);
            assert_eq!(ship.gun, GunMode::Rapid);
        }
        ship.register_shot(&tuning.guns);
        assert_eq!(ship.gun, GunMode::Single);
        assert_eq!(ship.register_shot(&tuning.guns), 6);
    }
}
