//! Score and shield counters

use crate::groups;
use crate::sim::actor::{Actor, Color, Point};
use crate::sim::cast::{Body, Cast};
use crate::tuning::{Grid, UpgradeKind, UpgradeSpec};

const SHIELD_FLASH_TICKS: u32 = 15;
const SHIELD_FLASH_PERIOD: i32 = 2;

/// Remaining shield points; flashes red and white after taking damage
#[derive(Debug, Clone)]
pub struct Shields {
    pub actor: Actor,
    points: i32,
    flash_timer: u32,
    wait_flash: i32,
    lit: bool,
}

impl Shields {
    pub fn new(points: i32, grid: &Grid, color: Color) -> Self {
        let position = Point::new(grid.cell_size * 28, grid.cell_size * 2);
        let mut shields = Self {
            actor: Actor::new("", position, color),
            points,
            flash_timer: 0,
            wait_flash: 0,
            lit: false,
        };
        shields.refresh_text();
        shields
    }

    pub fn points(&self) -> i32 {
        self.points
    }

    fn refresh_text(&mut self) {
        self.actor.glyph = format!("Shields Remaining: {}", self.points);
    }

    /// Adjust shields; any loss starts the flash
    pub fn add_points(&mut self, delta: i32) {
        self.points += delta;
        self.refresh_text();
        if delta < 0 {
            self.flash_timer = SHIELD_FLASH_TICKS;
        }
    }

    /// Add up to `amount`, never exceeding `max`
    pub fn recharge(&mut self, amount: i32, max: i32) {
        let gain = amount.min(max - self.points);
        if gain > 0 {
            self.add_points(gain);
        }
    }

    pub fn advance(&mut self) {
        if self.actor.color == Color::BACKGROUND {
            return;
        }
        if self.flash_timer > 0 {
            self.flash_timer -= 1;
            self.wait_flash -= 1;
            if self.wait_flash <= 0 {
                self.wait_flash = SHIELD_FLASH_PERIOD;
                self.lit = !self.lit;
                self.actor.color = if self.lit { Color::RED } else { Color::WHITE };
            }
        } else if self.actor.color != Color::WHITE {
            self.actor.color = Color::WHITE;
        }
    }
}

/// Player score
#[derive(Debug, Clone)]
pub struct Score {
    pub actor: Actor,
    points: u32,
}

impl Score {
    pub fn new(grid: &Grid, color: Color) -> Self {
        let position = Point::new(grid.cell_size * 2, grid.cell_size * 2);
        let mut score = Self {
            actor: Actor::new("", position, color),
            points: 0,
        };
        score.add_points(0, &[]);
        score
    }

    pub fn points(&self) -> u32 {
        self.points
    }

    /// Credit points and return the upgrades whose thresholds were crossed
    pub fn add_points(&mut self, points: u32, upgrades: &[UpgradeSpec]) -> Vec<UpgradeKind> {
        let before = self.points;
        self.points += points;
        self.actor.glyph = format!("Score: {}", self.points);
        upgrades
            .iter()
            .filter(|u| before < u.threshold && u.threshold <= self.points)
            .map(|u| u.kind)
            .collect()
    }
}

/// Show or hide the score and shield displays
pub fn set_hud_color(cast: &mut Cast, color: Color) {
    for group in [groups::SCORES, groups::SHIELDS] {
        for entity in cast.get_mut(group) {
            match &mut entity.body {
                Body::Score(score) => score.actor.color = color,
                Body::Shields(shields) => shields.actor.color = color,
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::{GunMode, Tuning};

    #[test]
    fn test_shield_loss_flashes_then_settles_white() {
        let mut shields = Shields::new(20, &Grid::default(), Color::WHITE);
        shields.add_points(-6);
        assert_eq!(shields.points(), 14);
        assert_eq!(shields.actor.glyph, "Shields Remaining: 14");

        shields.advance();
        assert_eq!(shields.actor.color, Color::RED);
        for _ in 0..20 {
            shields.advance();
        }
        assert_eq!(shields.actor.color, Color::WHITE);
    }

    #[test]
    fn test_hidden_shields_stay_hidden() {
        let mut shields = Shields::new(20, &Grid::default(), Color::BACKGROUND);
        shields.add_points(-1);
        shields.advance();
        assert_eq!(shields.actor.color, Color::BACKGROUND);
    }

    #[test]
    fn test_recharge_caps_at_max() {
        let mut shields = Shields::new(35, &Grid::default(), Color::WHITE);
        shields.recharge(10, 40);
        assert_eq!(shields.points(), 40);
        shields.recharge(10, 40);
        assert_eq!(shields.points(), 40);
    }

    #[test]
    fn test_score_crossing_thresholds() {
        let tuning = Tuning::default();
        let mut score = Score::new(&tuning.grid, Color::WHITE);
        assert_eq!(score.actor.glyph, "Score: 0");
        assert!(score.add_points(99, &tuning.upgrades).is_empty());
        assert_eq!(score.add_points(1, &tuning.upgrades), [UpgradeKind::Shield]);
        assert!(score.add_points(50, &tuning.upgrades).is_empty());
        assert_eq!(
            score.add_points(300, &tuning.upgrades),
            [
                UpgradeKind::Gun(GunMode::Rapid),
                UpgradeKind::Shield,
                UpgradeKind::Gun(GunMode::Rapid)
            ]
        );
        assert_eq!(score.points(), 450);
    }
}
