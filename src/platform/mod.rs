//! Platform abstraction layer
//!
//! The simulation reaches the outside world only through these traits:
//! - Input: keyboard state polled once per tick
//! - Video: an immediate-mode text grid, cleared and flushed every frame
//!
//! Headless implementations live here too: [`TickInput`] replays scripted key state and
//! [`TextCanvas`] renders frames into plain text.

mod canvas;
mod input;

pub use canvas::TextCanvas;
pub use input::{InputService, Key, TickInput};

use crate::sim::Actor;

/// Frame sink for drawable actors
pub trait VideoService {
    fn clear_buffer(&mut self);

    /// Draw one actor's glyph (or text) at its position. Centered text is shifted left by
    /// half its width.
    fn draw_actor(&mut self, actor: &Actor, centered: bool);

    fn draw_actors(&mut self, actors: &[Actor], centered: bool) {
        for actor in actors {
            self.draw_actor(actor, centered);
        }
    }

    fn flush_buffer(&mut self);
}
