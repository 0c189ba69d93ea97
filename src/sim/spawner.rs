//! Stage progression and enemy spawning
//!
//! Walks the stage table in order. Display stages wait for the asteroid field to clear, then
//! post their banner; spawn stages create one enemy per listed type every `wait_spawn`. Every
//! stage ends on elapsed time. The last stage repeats for as long as the game runs.

use std::sync::Arc;

use rand::Rng;

use super::actor::{Actor, Color, Point};
use super::cast::{Body, Cast, CastError};
use super::entities::{Asteroid, Ufo, set_hud_color};
use super::script::{Action, GameEvent, TickContext};
use crate::audio::sounds;
use crate::consts::{SPAWN_PLACEMENT_ATTEMPTS, SPAWN_TOP_ROW};
use crate::groups;
use crate::tuning::{StageSpec, Tuning, UFO_KIND};

pub struct HandleEnemyCreation {
    tuning: Arc<Tuning>,
    stage_index: usize,
    /// Stage whose timers are live; differs from `stage_index` for one tick after advancing
    entered: Option<usize>,
    stage_ticks: u32,
    wait_spawn: u32,
    /// Banner text last posted by a display stage
    banner: Option<String>,
    hud_shown: bool,
    /// Cells used by the current wave
    last_spawn: Vec<Point>,
}

impl HandleEnemyCreation {
    pub fn new(tuning: Arc<Tuning>) -> Self {
        Self {
            tuning,
            stage_index: 0,
            entered: None,
            stage_ticks: 0,
            wait_spawn: 0,
            banner: None,
            hud_shown: false,
            last_spawn: Vec::new(),
        }
    }

    pub fn stage_index(&self) -> usize {
        self.stage_index
    }

    fn spawn_stage(
        &mut self,
        stage: &StageSpec,
        cast: &mut Cast,
        ctx: &mut TickContext<'_>,
    ) -> Result<(), CastError> {
        self.stage_ticks += 1;
        if self.stage_ticks > self.tuning.ticks(stage.delay_start) {
            if self.wait_spawn == 0 {
                self.wait_spawn = self.tuning.ticks(stage.wait_spawn);
                self.spawn_wave(stage, cast, ctx);
            } else {
                self.wait_spawn -= 1;
            }
        }

        if !self.hud_shown {
            self.hud_shown = true;
            self.banner = None;
            cast.remove_all(groups::STAGE_MESSAGES);
            set_hud_color(cast, Color::WHITE);
        }
        Ok(())
    }

    fn display_stage(
        &mut self,
        stage: &StageSpec,
        text: &str,
        cast: &mut Cast,
        ctx: &mut TickContext<'_>,
    ) -> Result<(), CastError> {
        self.wait_spawn = 0;
        // only asteroids hold the banner back
        if !cast.is_empty(groups::ASTEROIDS) {
            return Ok(());
        }

        self.stage_ticks += 1;
        if self.stage_ticks > self.tuning.ticks(stage.delay_start)
            && self.banner.as_deref() != Some(text)
        {
            self.banner = Some(text.to_string());
            self.hud_shown = false;
            set_hud_color(cast, Color::BACKGROUND);

            let grid = &self.tuning.grid;
            let center = Point::new(grid.max_x / 2, grid.max_y / 2);
            cast.add(
                groups::STAGE_MESSAGES,
                Body::Message(Actor::new(text, center, Color::WHITE)),
            );
            ctx.audio.play_sound(sounds::NEW_STAGE);
        }
        Ok(())
    }

    fn spawn_wave(&mut self, stage: &StageSpec, cast: &mut Cast, ctx: &mut TickContext<'_>) {
        log::debug!(
            "stage {}: spawning {} enemies",
            self.stage_index,
            stage.enemy_types.len()
        );
        self.last_spawn.clear();
        for kind in &stage.enemy_types {
            if kind == UFO_KIND {
                let ufo = self.make_ufo(ctx.rng);
                cast.add(groups::UFOS, Body::Ufo(ufo));
                continue;
            }
            let Some(spec) = self.tuning.enemy_type(kind) else {
                log::warn!("stage {} lists unknown enemy `{kind}`", self.stage_index);
                continue;
            };
            let position = self.spawn_position(ctx.rng, stage.y_randomness);
            let velocity = Point::new(0, self.tuning.grid.cell_size);
            let asteroid = Asteroid::new(spec, &self.tuning, position, velocity, ctx.rng);
            self.last_spawn.push(position);
            cast.add(groups::ASTEROIDS, Body::Asteroid(asteroid));
        }
    }

    /// Random cell above the screen, avoiding cells already used by this wave
    fn spawn_position<R: Rng + ?Sized>(&self, rng: &mut R, y_randomness: i32) -> Point {
        let grid = &self.tuning.grid;
        let mut sample = || {
            let x = rng.random_range(1..=grid.columns - 1);
            let y = rng.random_range(SPAWN_TOP_ROW - y_randomness.max(0)..=SPAWN_TOP_ROW);
            Point::new(x, y) * grid.cell_size
        };

        let mut position = sample();
        for attempt in 1..=SPAWN_PLACEMENT_ATTEMPTS {
            if !self.last_spawn.contains(&position) {
                return position;
            }
            if attempt < SPAWN_PLACEMENT_ATTEMPTS {
                position = sample();
            }
        }
        log::warn!("no free spawn cell after {SPAWN_PLACEMENT_ATTEMPTS} attempts, stacking at {position}");
        position
    }

    fn make_ufo<R: Rng + ?Sized>(&self, rng: &mut R) -> Ufo {
        let cell = self.tuning.grid.cell_size;
        let columns = self.tuning.grid.columns;
        let x = rng.random_range(5..=(columns - 5).max(5));
        let dx = if rng.random_bool(0.5) { -cell } else { cell };
        Ufo::new(&self.tuning, Point::new(x * cell, 0), Point::new(dx, 0))
    }
}

impl Action for HandleEnemyCreation {
    fn execute(&mut self, cast: &mut Cast, ctx: &mut TickContext<'_>) -> Result<(), CastError> {
        if ctx.flags.game_over {
            return Ok(());
        }
        if ctx.flags.paused {
            cast.remove_all(groups::STAGE_MESSAGES);
            return Ok(());
        }

        let tuning = Arc::clone(&self.tuning);
        let Some(stage) = tuning.stages.get(self.stage_index) else {
            return Ok(());
        };

        if self.entered != Some(self.stage_index) {
            self.entered = Some(self.stage_index);
            self.stage_ticks = 0;
            log::info!(
                "entering stage {} ({})",
                self.stage_index,
                stage.display.as_deref().unwrap_or("spawn")
            );
            ctx.events.push(GameEvent::StageEntered {
                index: self.stage_index,
                display: stage.display.clone(),
            });
        }

        match &stage.display {
            Some(text) => self.display_stage(stage, text, cast, ctx)?,
            None => self.spawn_stage(stage, cast, ctx)?,
        }

        let limit = tuning.ticks(stage.delay_start) + tuning.ticks(stage.duration);
        if self.stage_ticks > limit {
            self.stage_ticks = 0;
            if self.stage_index + 1 < tuning.stages.len() {
                self.stage_index += 1;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimRng;
    use crate::sim::entities::{Score, Shields};
    use crate::sim::harness::Harness;
    use crate::tuning::Grid;
    use proptest::prelude::*;
    use rand::SeedableRng;

    fn tuning_with(stages: Vec<StageSpec>) -> Arc<Tuning> {
        Arc::new(Tuning {
            stages,
            ..Tuning::default()
        })
    }

    fn hud_cast(tuning: &Tuning) -> Cast {
        let mut cast = Cast::new();
        cast.add(
            groups::SCORES,
            Body::Score(Score::new(&tuning.grid, Color::BACKGROUND)),
        );
        cast.add(
            groups::SHIELDS,
            Body::Shields(Shields::new(20, &tuning.grid, Color::BACKGROUND)),
        );
        cast
    }

    fn entered(harness: &Harness) -> Vec<usize> {
        harness
            .events
            .iter()
            .filter_map(|e| match e {
                GameEvent::StageEntered { index, .. } => Some(*index),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_spawn_count_over_stage() {
        let tuning = tuning_with(vec![
            StageSpec::spawn(0.0, 10.0, vec!["asteroid-small".into()], 2.0, 0),
            StageSpec::spawn(0.0, 100.0, Vec::new(), 1.0, 0),
        ]);
        let mut cast = hud_cast(&tuning);
        let mut action = HandleEnemyCreation::new(Arc::clone(&tuning));
        let mut harness = Harness::new(3);

        for _ in 0..200 {
            harness.run(&mut action, &mut cast);
        }
        assert_eq!(cast.get(groups::ASTEROIDS).len(), 5);
        assert_eq!(action.stage_index(), 1);
        assert_eq!(entered(&harness), [0, 1]);
    }

    #[test]
    fn test_display_stage_posts_banner_then_spawn_stage_restores_hud() {
        let tuning = Arc::new(Tuning::default());
        let mut cast = hud_cast(&tuning);
        let mut action = HandleEnemyCreation::new(Arc::clone(&tuning));
        let mut harness = Harness::new(3);

        for _ in 0..15 {
            harness.run(&mut action, &mut cast);
        }
        assert!(cast.is_empty(groups::STAGE_MESSAGES));

        harness.run(&mut action, &mut cast);
        let banner = &cast.get(groups::STAGE_MESSAGES)[0].body.parts()[0];
        assert_eq!(banner.glyph, "Stage One");
        assert_eq!(banner.position, Point::new(300, 352));
        assert!(harness.audio.sounds().any(|s| s == sounds::NEW_STAGE));

        // stage one ends on tick 46; the spawn stage starts on the next
        for _ in 0..30 {
            harness.run(&mut action, &mut cast);
        }
        assert_eq!(action.stage_index(), 1);
        assert!(cast.is_empty(groups::ASTEROIDS));
        harness.run(&mut action, &mut cast);
        assert_eq!(cast.get(groups::ASTEROIDS).len(), 1);
        assert!(cast.is_empty(groups::STAGE_MESSAGES));
        assert_eq!(cast.score().expect("score").actor.color, Color::WHITE);
        assert_eq!(cast.shields().expect("shields").actor.color, Color::WHITE);
        assert_eq!(entered(&harness), [0, 1]);
    }

    #[test]
    fn test_display_stage_waits_for_asteroids() {
        let tuning = Arc::new(Tuning::default());
        let mut cast = hud_cast(&tuning);
        let spec = tuning.enemy_type("asteroid-small").expect("known").clone();
        let mut rng = SimRng::seed_from_u64(0);
        let blocker = cast.add(
            groups::ASTEROIDS,
            Body::Asteroid(Asteroid::new(&spec, &tuning, Point::new(150, 150), Point::ZERO, &mut rng)),
        );
        // other enemy groups do not gate the banner
        cast.add(
            groups::UFOS,
            Body::Ufo(Ufo::new(&tuning, Point::new(150, 0), Point::new(15, 0))),
        );
        let mut action = HandleEnemyCreation::new(Arc::clone(&tuning));
        let mut harness = Harness::new(3);

        for _ in 0..200 {
            harness.run(&mut action, &mut cast);
        }
        assert_eq!(action.stage_index(), 0);
        assert!(cast.is_empty(groups::STAGE_MESSAGES));

        cast.remove(groups::ASTEROIDS, blocker);
        for _ in 0..16 {
            harness.run(&mut action, &mut cast);
        }
        assert_eq!(cast.get(groups::STAGE_MESSAGES).len(), 1);
    }

    #[test]
    fn test_stages_visited_in_table_order() {
        let tuning = tuning_with(vec![
            StageSpec::display(0.0, 0.2, "One"),
            StageSpec::spawn(0.0, 0.2, Vec::new(), 1.0, 0),
            StageSpec::display(0.0, 0.2, "Two"),
            StageSpec::spawn(0.0, 0.2, Vec::new(), 1.0, 0),
        ]);
        let mut cast = hud_cast(&tuning);
        let mut action = HandleEnemyCreation::new(Arc::clone(&tuning));
        let mut harness = Harness::new(3);

        for _ in 0..40 {
            harness.run(&mut action, &mut cast);
        }
        assert_eq!(entered(&harness), [0, 1, 2, 3]);
        // the last stage repeats without being re-entered
        assert_eq!(action.stage_index(), 3);
        let banners: Vec<Option<String>> = harness
            .events
            .iter()
            .filter_map(|e| match e {
                GameEvent::StageEntered { display, .. } => Some(display.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(banners, [Some("One".into()), None, Some("Two".into()), None]);
    }

    #[test]
    fn test_pause_clears_stage_messages_and_freezes_timer() {
        let tuning = Arc::new(Tuning::default());
        let mut cast = hud_cast(&tuning);
        let mut action = HandleEnemyCreation::new(Arc::clone(&tuning));
        let mut harness = Harness::new(3);
        for _ in 0..20 {
            harness.run(&mut action, &mut cast);
        }
        assert_eq!(cast.get(groups::STAGE_MESSAGES).len(), 1);

        harness.flags.paused = true;
        for _ in 0..100 {
            harness.run(&mut action, &mut cast);
        }
        assert!(cast.is_empty(groups::STAGE_MESSAGES));
        assert_eq!(action.stage_index(), 0);
    }

    #[test]
    fn test_nothing_happens_after_game_over() {
        let tuning = Arc::new(Tuning::default());
        let mut cast = hud_cast(&tuning);
        let mut action = HandleEnemyCreation::new(tuning);
        let mut harness = Harness::new(3);
        harness.flags.game_over = true;
        harness.run(&mut action, &mut cast);
        assert!(harness.events.is_empty());
    }

    #[test]
    fn test_wave_cells_are_distinct() {
        let tuning = tuning_with(vec![StageSpec::spawn(
            0.0,
            100.0,
            vec!["asteroid-large".into(); 15],
            5.0,
            0,
        )]);
        let mut cast = hud_cast(&tuning);
        let mut action = HandleEnemyCreation::new(Arc::clone(&tuning));
        let mut harness = Harness::new(11);
        harness.run(&mut action, &mut cast);

        let mut cells: Vec<Point> = cast
            .get(groups::ASTEROIDS)
            .iter()
            .filter_map(|e| e.body.parts().last().map(|p| p.position))
            .collect();
        assert_eq!(cells.len(), 15);
        cells.sort_by_key(|p| (p.x, p.y));
        cells.dedup();
        assert_eq!(cells.len(), 15);
    }

    #[test]
    fn test_crowded_wave_stacks_on_last_sample() {
        let tuning = Arc::new(Tuning {
            grid: Grid {
                columns: 2,
                max_x: 30,
                ..Grid::default()
            },
            stages: vec![StageSpec::spawn(
                0.0,
                100.0,
                vec!["asteroid-small".into(); 3],
                5.0,
                0,
            )],
            ..Tuning::default()
        });
        assert!(tuning.validate().is_ok());
        let mut cast = hud_cast(&tuning);
        let mut action = HandleEnemyCreation::new(Arc::clone(&tuning));
        let mut harness = Harness::new(11);
        harness.run(&mut action, &mut cast);

        let cells: Vec<Point> = cast
            .get(groups::ASTEROIDS)
            .iter()
            .filter_map(|e| e.body.parts().last().map(|p| p.position))
            .collect();
        assert_eq!(cells, [Point::new(15, -75); 3]);
    }

    #[test]
    fn test_ufo_spawns_on_top_row() {
        let tuning = tuning_with(vec![StageSpec::spawn(0.0, 100.0, vec![UFO_KIND.into()], 5.0, 0)]);
        let mut cast = hud_cast(&tuning);
        let mut action = HandleEnemyCreation::new(Arc::clone(&tuning));
        let mut harness = Harness::new(5);
        harness.run(&mut action, &mut cast);

        let ufos = cast.get(groups::UFOS);
        assert_eq!(ufos.len(), 1);
        let core = ufos[0].body.parts().last().expect("core");
        assert_eq!(core.position.y, 0);
        assert!((75..=525).contains(&core.position.x));
        assert_eq!(core.velocity.x.abs(), 15);
    }

    proptest! {
        #[test]
        fn prop_spawn_cells_stay_in_band(seed in any::<u64>(), y_randomness in 0i32..12) {
            let tuning = Arc::new(Tuning::default());
            let action = HandleEnemyCreation::new(Arc::clone(&tuning));
            let mut rng = SimRng::seed_from_u64(seed);
            for _ in 0..20 {
                let p = action.spawn_position(&mut rng, y_randomness);
                prop_assert!(p.x >= 15 && p.x <= 39 * 15);
                prop_assert!(p.y >= (-5 - y_randomness) * 15 && p.y <= -75);
                prop_assert_eq!(p % 15, Point::ZERO);
            }
        }
    }
}
