//! Fixed-rate game session
//!
//! Owns the cast, the script and the seeded RNG, and advances everything one tick at a time.
//! Given the same tuning, seed and inputs, two sessions produce identical frames.

use std::sync::Arc;

use rand::SeedableRng;

use super::SimRng;
use super::actor::{Actor, Color, Point};
use super::cast::{Body, Cast, CastError};
use super::collision::HandleCollisionsAction;
use super::control::ControlActorsAction;
use super::draw::DrawActorsAction;
use super::entities::{Score, Shields, Ship};
use super::movement::MoveActorsAction;
use super::script::{Action, ActionId, GameEvent, Phase, PlayFlags, Script, TickContext};
use super::spawner::HandleEnemyCreation;
use crate::audio::{AudioService, MusicTrack, sounds};
use crate::groups;
use crate::platform::{InputService, VideoService};
use crate::tuning::Tuning;

/// Groups emptied when a finished game hands over to the highscore screen
const GAMEPLAY_GROUPS: [&str; 13] = [
    groups::SHIPS,
    groups::SCORES,
    groups::SHIELDS,
    groups::ASTEROIDS,
    groups::UFOS,
    groups::LASERS,
    groups::ENEMY_LASERS,
    groups::EXPLOSIONS,
    groups::SPARKS,
    groups::UPGRADES,
    groups::MESSAGES,
    groups::STAGE_MESSAGES,
    groups::MENUS,
];

/// Script handles of the running game's actions
#[derive(Debug, Clone, Copy)]
struct Gameplay {
    control: ActionId,
    movement: ActionId,
    collisions: ActionId,
    spawner: ActionId,
}

pub struct GameSession {
    tuning: Arc<Tuning>,
    cast: Cast,
    script: Script,
    rng: SimRng,
    flags: PlayFlags,
    ticks: u64,
    gameplay: Option<Gameplay>,
    /// Actions lifted out of the script while paused
    suspended: Vec<(Phase, Box<dyn Action>)>,
    final_score: Option<u32>,
}

impl GameSession {
    pub fn new(tuning: Arc<Tuning>, seed: u64) -> Self {
        let mut script = Script::new();
        script.add(Phase::Output, Box::new(DrawActorsAction::new()));
        Self {
            tuning,
            cast: Cast::new(),
            script,
            rng: SimRng::seed_from_u64(seed),
            flags: PlayFlags::default(),
            ticks: 0,
            gameplay: None,
            suspended: Vec::new(),
            final_score: None,
        }
    }

    pub fn cast(&self) -> &Cast {
        &self.cast
    }

    /// Direct cast access for hosts that stage their own scenes
    pub fn cast_mut(&mut self) -> &mut Cast {
        &mut self.cast
    }

    pub fn script(&self) -> &Script {
        &self.script
    }

    pub fn flags(&self) -> PlayFlags {
        self.flags
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn tick_count(&self) -> u64 {
        self.ticks
    }

    /// Score of the last finished game
    pub fn final_score(&self) -> Option<u32> {
        self.final_score
    }

    /// Spawn the ship and HUD and schedule the gameplay actions
    pub fn start(&mut self, audio: &mut dyn AudioService) {
        if self.flags.started {
            log::warn!("start requested while a game is running");
            return;
        }
        let tuning = &self.tuning;
        // the HUD stays hidden until the first spawn stage
        self.cast.add(groups::SHIPS, Body::Ship(Ship::new(tuning)));
        self.cast.add(
            groups::SCORES,
            Body::Score(Score::new(&tuning.grid, Color::BACKGROUND)),
        );
        self.cast.add(
            groups::SHIELDS,
            Body::Shields(Shields::new(tuning.start_shields, &tuning.grid, Color::BACKGROUND)),
        );

        let control = self.script.add(
            Phase::Input,
            Box::new(ControlActorsAction::new(Arc::clone(tuning))),
        );
        let movement = self.script.add(
            Phase::Update,
            Box::new(MoveActorsAction::new(Arc::clone(tuning))),
        );
        let collisions = self.script.add(
            Phase::Update,
            Box::new(HandleCollisionsAction::new(Arc::clone(tuning))),
        );
        let spawner = self.script.add(
            Phase::Update,
            Box::new(HandleEnemyCreation::new(Arc::clone(tuning))),
        );
        self.gameplay = Some(Gameplay {
            control,
            movement,
            collisions,
            spawner,
        });

        self.flags = PlayFlags {
            started: true,
            ..PlayFlags::default()
        };
        self.final_score = None;
        audio.set_music(MusicTrack::Game);
        log::info!("game started");
    }

    /// Suspend or resume play. Ignored before start and after game over.
    pub fn toggle_pause(&mut self, audio: &mut dyn AudioService) {
        let Some(gameplay) = self.gameplay else {
            return;
        };
        if self.flags.game_over {
            return;
        }
        audio.play_sound(sounds::MENU_SELECT);

        if self.flags.paused {
            self.resume(gameplay);
        } else {
            self.pause(gameplay);
        }
    }

    fn pause(&mut self, gameplay: Gameplay) {
        for (phase, id) in [
            (Phase::Input, gameplay.control),
            (Phase::Update, gameplay.movement),
            (Phase::Update, gameplay.collisions),
        ] {
            if let Some(action) = self.script.remove(phase, id) {
                self.suspended.push((phase, action));
            }
        }
        self.flags.paused = true;

        let grid = &self.tuning.grid;
        let position = Point::new(grid.max_x / 2, (grid.max_y as f32 * 0.45) as i32);
        self.cast.add(
            groups::MENUS,
            Body::Message(Actor::new("paused", position, Color::YELLOW)),
        );
        log::info!("paused at tick {}", self.ticks);
    }

    fn resume(&mut self, mut gameplay: Gameplay) {
        let mut restored = Vec::new();
        for (phase, action) in self.suspended.drain(..) {
            let id = match phase {
                Phase::Update => self.script.add_before(phase, gameplay.spawner, action),
                _ => self.script.add(phase, action),
            };
            restored.push(id);
        }
        if let [control, movement, collisions] = restored[..] {
            gameplay.control = control;
            gameplay.movement = movement;
            gameplay.collisions = collisions;
        }
        self.gameplay = Some(gameplay);
        self.flags.paused = false;
        self.cast.remove_all(groups::MENUS);
        log::info!("resumed at tick {}", self.ticks);
    }

    /// Drop the finished game's actions and actors
    fn reset(&mut self) {
        if let Some(gameplay) = self.gameplay.take() {
            self.script.remove(Phase::Input, gameplay.control);
            self.script.remove(Phase::Update, gameplay.movement);
            self.script.remove(Phase::Update, gameplay.collisions);
            self.script.remove(Phase::Update, gameplay.spawner);
        }
        self.suspended.clear();
        for group in GAMEPLAY_GROUPS {
            self.cast.remove_all(group);
        }
        self.flags = PlayFlags::default();
    }

    /// Run every scheduled action once and return what happened
    pub fn tick(
        &mut self,
        input: &dyn InputService,
        audio: &mut dyn AudioService,
        video: &mut dyn VideoService,
    ) -> Result<Vec<GameEvent>, CastError> {
        let mut events = Vec::new();
        let mut ctx = TickContext {
            input,
            audio,
            video,
            rng: &mut self.rng,
            flags: &mut self.flags,
            events: &mut events,
        };
        self.script.run_tick(&mut self.cast, &mut ctx)?;
        self.ticks += 1;

        let hand_off = events.iter().find_map(|event| match event {
            GameEvent::ShowHighscores { score } => Some(*score),
            _ => None,
        });
        if let Some(score) = hand_off {
            log::info!("game finished with {score} points after {} ticks", self.ticks);
            self.final_score = Some(score);
            self.reset();
        }
        Ok(events)
    }
}
