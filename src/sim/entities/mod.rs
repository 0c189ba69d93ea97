//! Domain entities layered on [`Actor`](super::actor::Actor)

mod effects;
mod enemies;
mod hud;
mod laser;
mod pickup;
mod ship;

pub use effects::{Explosion, Spark, spark_burst};
pub use enemies::{Asteroid, Ufo};
pub use hud::{Score, Shields, set_hud_color};
pub use laser::Laser;
pub use pickup::Upgrade;
pub use ship::Ship;
