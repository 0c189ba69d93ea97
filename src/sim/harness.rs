//! Collaborator doubles for driving actions in tests

use rand::SeedableRng;

use super::SimRng;
use super::cast::Cast;
use super::script::{Action, GameEvent, PlayFlags, TickContext};
use crate::audio::AudioLog;
use crate::consts::{CELL_SIZE, COLUMNS, ROWS};
use crate::platform::{TextCanvas, TickInput};

pub struct Harness {
    pub input: TickInput,
    pub audio: AudioLog,
    pub video: TextCanvas,
    pub rng: SimRng,
    pub flags: PlayFlags,
    pub events: Vec<GameEvent>,
}

impl Harness {
    pub fn new(seed: u64) -> Self {
        Self {
            input: TickInput::default(),
            audio: AudioLog::default(),
            video: TextCanvas::new(COLUMNS, ROWS, CELL_SIZE),
            rng: SimRng::seed_from_u64(seed),
            flags: PlayFlags {
                started: true,
                ..Default::default()
            },
            events: Vec::new(),
        }
    }

    /// Run one action once against `cast`
    pub fn run(&mut self, action: &mut dyn Action, cast: &mut Cast) {
        let mut ctx = TickContext {
            input: &self.input,
            audio: &mut self.audio,
            video: &mut self.video,
            rng: &mut self.rng,
            flags: &mut self.flags,
            events: &mut self.events,
        };
        action.execute(cast, &mut ctx).expect("action runs");
    }
}
