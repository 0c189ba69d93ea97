//! Star Cruiser headless demo
//!
//! Plays one seeded game with a simple autopilot and prints the final frame and score.
//!
//! Usage: `star-cruiser [seed] [tuning.json] [highscores.json]`

use std::error::Error;
use std::sync::Arc;

use star_cruiser::audio::AudioLog;
use star_cruiser::groups;
use star_cruiser::persistence::{HighScoreStore, JsonFileStore, MemoryStore};
use star_cruiser::platform::{Key, TextCanvas, TickInput};
use star_cruiser::sim::{Cast, GameEvent, GameSession};
use star_cruiser::{HighScores, Tuning};

/// Give up after ten minutes of game time
const MAX_TICKS: u64 = 15 * 60 * 10;

/// Steer under the lowest enemy and keep firing
fn autopilot(cast: &Cast) -> TickInput {
    let Some(nose) = cast.ship().ok().and_then(|ship| ship.nose()) else {
        return TickInput::default();
    };
    let target = groups::ENEMIES
        .iter()
        .flat_map(|&group| cast.get(group))
        .filter_map(|entity| entity.body.parts().last())
        .filter(|core| core.position.y < nose.y)
        .max_by_key(|core| core.position.y);

    let mut keys = vec![Key::Space];
    if let Some(core) = target {
        if core.position.x < nose.x {
            keys.push(Key::Left);
        } else if core.position.x > nose.x {
            keys.push(Key::Right);
        }
    }
    TickInput::pressing(&keys)
}

fn run() -> Result<(), Box<dyn Error>> {
    let mut args = std::env::args().skip(1);
    let seed = match args.next() {
        Some(seed) => seed.parse()?,
        None => 12345,
    };
    let tuning = match args.next() {
        Some(path) => Tuning::from_json_file(path)?,
        None => Tuning::default(),
    };
    let mut store: Box<dyn HighScoreStore> = match args.next() {
        Some(path) => Box::new(JsonFileStore::new(path)),
        None => Box::new(MemoryStore::new()),
    };

    let grid = tuning.grid;
    let mut session = GameSession::new(Arc::new(tuning), seed);
    let mut audio = AudioLog::default();
    let mut video = TextCanvas::new(grid.columns, grid.max_y / grid.cell_size, grid.cell_size);

    log::info!("Star Cruiser (headless) starting with seed {seed}");
    session.start(&mut audio);

    let mut last_frame = String::new();
    while session.final_score().is_none() && session.tick_count() < MAX_TICKS {
        let input = autopilot(session.cast());
        for event in session.tick(&input, &mut audio, &mut video)? {
            match event {
                GameEvent::StageEntered { index, display } => {
                    println!(
                        "[{:>5}] stage {index}{}",
                        session.tick_count(),
                        display.map(|d| format!(": {d}")).unwrap_or_default()
                    );
                }
                GameEvent::GameOver { score } => {
                    println!("[{:>5}] game over, score {score}", session.tick_count());
                    last_frame = video.frame();
                }
                GameEvent::ShowHighscores { .. } => {}
            }
        }
        audio.clear();
    }
    if last_frame.is_empty() {
        last_frame = video.frame();
    }
    println!("{last_frame}");

    let score = match session.final_score() {
        Some(score) => score,
        None => session.cast().score().map(|s| s.points()).unwrap_or(0),
    };
    println!("final score: {score} after {} ticks", session.tick_count());

    let mut scores: HighScores = store.load()?;
    if let Some(rank) = scores.add_score("CPU", score) {
        println!("new high score, rank {rank}");
        store.save(&scores)?;
    }
    for line in scores.lines() {
        println!("  {line}");
    }
    Ok(())
}

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        log::error!("{err}");
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
