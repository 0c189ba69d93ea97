//! Per-tick action scheduler
//!
//! Actions run once per tick: every input action, then every update action, then every
//! output action, each phase in insertion order.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::SimRng;
use super::cast::{Cast, CastError};
use crate::audio::AudioService;
use crate::platform::{InputService, VideoService};

/// Script phases, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Phase {
    Input,
    Update,
    Output,
}

/// Session-wide play state shared with actions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayFlags {
    pub started: bool,
    pub paused: bool,
    pub game_over: bool,
}

/// Notable things that happened during a tick
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A new stage became active
    StageEntered {
        index: usize,
        display: Option<String>,
    },
    /// Shields dropped below zero
    GameOver { score: u32 },
    /// The game-over delay elapsed; the highscore screen takes over
    ShowHighscores { score: u32 },
}

/// Collaborators and shared state an action may touch while it runs
pub struct TickContext<'a> {
    pub input: &'a dyn InputService,
    pub audio: &'a mut dyn AudioService,
    pub video: &'a mut dyn VideoService,
    pub rng: &'a mut SimRng,
    pub flags: &'a mut PlayFlags,
    pub events: &'a mut Vec<GameEvent>,
}

/// A stateful per-tick callback
pub trait Action {
    fn execute(&mut self, cast: &mut Cast, ctx: &mut TickContext<'_>) -> Result<(), CastError>;
}

/// Handle used to remove or re-anchor an action
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ActionId(u64);

#[derive(Default)]
pub struct Script {
    phases: BTreeMap<Phase, Vec<(ActionId, Box<dyn Action>)>>,
    next_id: u64,
}

impl Script {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self) -> ActionId {
        self.next_id += 1;
        ActionId(self.next_id)
    }

    pub fn add(&mut self, phase: Phase, action: Box<dyn Action>) -> ActionId {
        let id = self.next_id();
        self.phases.entry(phase).or_default().push((id, action));
        id
    }

    /// Insert ahead of `anchor`, or at the end of the phase when the anchor is absent
    pub fn add_before(&mut self, phase: Phase, anchor: ActionId, action: Box<dyn Action>) -> ActionId {
        let id = self.next_id();
        let actions = self.phases.entry(phase).or_default();
        let index = actions
            .iter()
            .position(|(existing, _)| *existing == anchor)
            .unwrap_or(actions.len());
        actions.insert(index, (id, action));
        id
    }

    /// Remove by identity, handing the action back. Unknown ids are ignored.
    pub fn remove(&mut self, phase: Phase, id: ActionId) -> Option<Box<dyn Action>> {
        let actions = self.phases.get_mut(&phase)?;
        let index = actions.iter().position(|(existing, _)| *existing == id)?;
        Some(actions.remove(index).1)
    }

    pub fn contains(&self, phase: Phase, id: ActionId) -> bool {
        self.ids(phase).contains(&id)
    }

    /// Action ids of a phase, in execution order
    pub fn ids(&self, phase: Phase) -> Vec<ActionId> {
        self.phases
            .get(&phase)
            .map(|actions| actions.iter().map(|(id, _)| *id).collect())
            .unwrap_or_default()
    }

    /// Run every action once, phase by phase
    pub fn run_tick(&mut self, cast: &mut Cast, ctx: &mut TickContext<'_>) -> Result<(), CastError> {
        for actions in self.phases.values_mut() {
            for (_, action) in actions.iter_mut() {
                action.execute(cast, ctx)?;
            }
        }
        Ok(())
    }
}
