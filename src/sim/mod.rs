//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed tick rate, all timers counted in ticks
//! - Seeded RNG only
//! - Stable iteration order (group name, then insertion order)
//! - Collaborators (input, audio, video) reached only through traits

pub mod actor;
pub mod cast;
pub mod collision;
pub mod control;
pub mod damage;
pub mod draw;
pub mod entities;
pub mod movement;
pub mod script;
pub mod spawner;
pub mod structure;
pub mod tick;

#[cfg(test)]
pub(crate) mod harness;

/// Simulation random number generator
pub type SimRng = rand_pcg::Pcg32;

pub use actor::{Actor, Color, Point, Throttle};
pub use cast::{Body, Cast, CastError, Entity, EntityId};
pub use collision::HandleCollisionsAction;
pub use control::ControlActorsAction;
pub use damage::{Damage, Hostile, Strike, strike};
pub use draw::DrawActorsAction;
pub use movement::{Fate, Motion, MoveActorsAction};
pub use script::{Action, ActionId, GameEvent, Phase, PlayFlags, Script, TickContext};
pub use spawner::HandleEnemyCreation;
pub use structure::{LayoutCell, generate_structure};
pub use tick::GameSession;
