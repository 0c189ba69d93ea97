//! Audio collaborator
//!
//! The simulation names sound cues by id and leaves playback to the host. Failures on the
//! host side are never reported back.

use serde::{Deserialize, Serialize};

/// Background music selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MusicTrack {
    Menu,
    Game,
    Silence,
}

/// Sound cue ids used by the core. Enemy hit and destroy cues come from the tuning table.
pub mod sounds {
    pub const LASER: &str = "laser";
    pub const SHIP_HIT: &str = "ship-hit";
    pub const SHIP_EXPLOSION: &str = "ship-exp";
    pub const LOW_SHIELDS: &str = "low-shields";
    pub const GAME_OVER: &str = "game-over";
    pub const NEW_STAGE: &str = "new-stage";
    pub const UPGRADE: &str = "upgrade";
    pub const UFO_FLY: &str = "ufo-fly";
    pub const UFO_LASER: &str = "ufo-laser";
    pub const MENU_SELECT: &str = "menu-select";
}

pub trait AudioService {
    fn play_sound(&mut self, id: &str);

    fn set_music(&mut self, track: MusicTrack);

    /// Keep a looping cue alive for this tick
    fn set_loop_sound(&mut self, _id: &str) {}
}

/// Something the audio collaborator was asked to do
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AudioCue {
    Sound(String),
    Loop(String),
    Music(MusicTrack),
}

/// Records every request; used headless and in tests
#[derive(Debug, Clone, Default)]
pub struct AudioLog {
    pub cues: Vec<AudioCue>,
}

impl AudioLog {
    /// One-shot sounds in request order
    pub fn sounds(&self) -> impl Iterator<Item = &str> {
        self.cues.iter().filter_map(|cue| match cue {
            AudioCue::Sound(id) => Some(id.as_str()),
            _ => None,
        })
    }

    pub fn music(&self) -> Option<MusicTrack> {
        self.cues.iter().rev().find_map(|cue| match cue {
            AudioCue::Music(track) => Some(*track),
            _ => None,
        })
    }

    pub fn clear(&mut self) {
        self.cues.clear();
    }
}

impl AudioService for AudioLog {
    fn play_sound(&mut self, id: &str) {
        self.cues.push(AudioCue::Sound(id.to_string()));
    }

    fn set_music(&mut self, track: MusicTrack) {
        self.cues.push(AudioCue::Music(track));
    }

    fn set_loop_sound(&mut self, id: &str) {
        // a loop is requested every tick; keep one entry per run
        if self.cues.last() != Some(&AudioCue::Loop(id.to_string())) {
            self.cues.push(AudioCue::Loop(id.to_string()));
        }
    }
}
