//! Entity registry
//!
//! The cast maps open-ended group names to ordered lists of live entities. Insertion order is
//! draw and iteration order within a group; groups iterate in name order.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::actor::Actor;
use super::damage::Hostile;
use super::entities::{
    Asteroid, Explosion, Laser, Score, Shields, Ship, Spark, Ufo, Upgrade,
};
use super::movement::{Fate, Motion};
use crate::groups;

/// Stable identity of an entity within a cast
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u64);

/// Invariant violations raised by cast lookups
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CastError {
    #[error("cast group `{group}` is empty")]
    NotFound { group: String },
    #[error("first entity of group `{group}` is not a {expected}")]
    WrongKind { group: String, expected: &'static str },
}

/// Every kind of entity the game knows about
#[derive(Debug, Clone)]
pub enum Body {
    Ship(Ship),
    Asteroid(Asteroid),
    Ufo(Ufo),
    Laser(Laser),
    Explosion(Explosion),
    Spark(Spark),
    Upgrade(Upgrade),
    Shields(Shields),
    Score(Score),
    Message(Actor),
}

impl Body {
    /// Drawable, collidable cells of this entity. Composite kinds list their core last.
    pub fn parts(&self) -> &[Actor] {
        match self {
            Body::Ship(ship) => &ship.parts,
            Body::Asteroid(asteroid) => &asteroid.parts,
            Body::Ufo(ufo) => &ufo.parts,
            Body::Laser(laser) => std::slice::from_ref(&laser.actor),
            Body::Explosion(explosion) => std::slice::from_ref(&explosion.actor),
            Body::Spark(spark) => std::slice::from_ref(&spark.actor),
            Body::Upgrade(upgrade) => std::slice::from_ref(&upgrade.actor),
            Body::Shields(shields) => std::slice::from_ref(&shields.actor),
            Body::Score(score) => std::slice::from_ref(&score.actor),
            Body::Message(actor) => std::slice::from_ref(actor),
        }
    }

    /// Run this entity's per-tick rule, including its off-screen policy
    pub fn advance(&mut self, motion: &mut Motion<'_>) -> Fate {
        let grid = motion.tuning.grid;
        match self {
            Body::Ship(ship) => {
                ship.advance(grid.max_x);
                Fate::Live
            }
            Body::Asteroid(asteroid) => asteroid.advance(&grid),
            Body::Ufo(ufo) => ufo.advance(motion),
            Body::Laser(laser) => laser.advance(&grid),
            Body::Explosion(explosion) => explosion.advance(&grid),
            Body::Spark(spark) => spark.advance(&grid),
            Body::Upgrade(upgrade) => upgrade.advance(&grid),
            Body::Shields(shields) => {
                shields.advance();
                Fate::Live
            }
            Body::Score(_) => Fate::Live,
            Body::Message(actor) => {
                actor.move_next(grid.max_x);
                Fate::Live
            }
        }
    }

    pub fn as_hostile(&self) -> Option<&dyn Hostile> {
        match self {
            Body::Asteroid(asteroid) => Some(asteroid),
            Body::Ufo(ufo) => Some(ufo),
            _ => None,
        }
    }

    pub fn as_hostile_mut(&mut self) -> Option<&mut dyn Hostile> {
        match self {
            Body::Asteroid(asteroid) => Some(asteroid),
            Body::Ufo(ufo) => Some(ufo),
            _ => None,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Body::Ship(_) => "ship",
            Body::Asteroid(_) => "asteroid",
            Body::Ufo(_) => "ufo",
            Body::Laser(_) => "laser",
            Body::Explosion(_) => "explosion",
            Body::Spark(_) => "spark",
            Body::Upgrade(_) => "upgrade",
            Body::Shields(_) => "shields",
            Body::Score(_) => "score",
            Body::Message(_) => "message",
        }
    }
}

/// A live entity and its identity
#[derive(Debug, Clone)]
pub struct Entity {
    pub id: EntityId,
    pub body: Body,
}

/// Named-group container of live entities
#[derive(Debug, Clone, Default)]
pub struct Cast {
    groups: BTreeMap<String, Vec<Entity>>,
    next_id: u64,
}

impl Cast {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entity to a group, creating the group on first use
    pub fn add(&mut self, group: &str, body: Body) -> EntityId {
        self.next_id += 1;
        let id = EntityId(self.next_id);
        self.groups
            .entry(group.to_string())
            .or_default()
            .push(Entity { id, body });
        id
    }

    /// Remove by identity. Absent groups or ids are ignored.
    pub fn remove(&mut self, group: &str, id: EntityId) -> Option<Body> {
        let entities = self.groups.get_mut(group)?;
        let index = entities.iter().position(|e| e.id == id)?;
        Some(entities.remove(index).body)
    }

    /// Empty a group without deleting it
    pub fn remove_all(&mut self, group: &str) {
        if let Some(entities) = self.groups.get_mut(group) {
            entities.clear();
        }
    }

    pub fn get(&self, group: &str) -> &[Entity] {
        self.groups.get(group).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn get_mut(&mut self, group: &str) -> &mut [Entity] {
        self.groups
            .get_mut(group)
            .map(Vec::as_mut_slice)
            .unwrap_or(&mut [])
    }

    pub fn get_first(&self, group: &str) -> Result<&Entity, CastError> {
        self.get(group).first().ok_or_else(|| CastError::NotFound {
            group: group.to_string(),
        })
    }

    pub fn get_first_mut(&mut self, group: &str) -> Result<&mut Entity, CastError> {
        self.groups
            .get_mut(group)
            .and_then(|entities| entities.first_mut())
            .ok_or_else(|| CastError::NotFound {
                group: group.to_string(),
            })
    }

    pub fn find(&self, group: &str, id: EntityId) -> Option<&Entity> {
        self.get(group).iter().find(|e| e.id == id)
    }

    pub fn find_mut(&mut self, group: &str, id: EntityId) -> Option<&mut Entity> {
        self.get_mut(group).iter_mut().find(|e| e.id == id)
    }

    pub fn is_empty(&self, group: &str) -> bool {
        self.get(group).is_empty()
    }

    pub fn group_names(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    pub(crate) fn groups_mut(&mut self) -> impl Iterator<Item = (&String, &mut Vec<Entity>)> {
        self.groups.iter_mut()
    }

    /// Total entities across all groups
    pub fn len(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    pub fn ship(&self) -> Result<&Ship, CastError> {
        match &self.get_first(groups::SHIPS)?.body {
            Body::Ship(ship) => Ok(ship),
            _ => Err(wrong_kind(groups::SHIPS, "ship")),
        }
    }

    pub fn ship_mut(&mut self) -> Result<&mut Ship, CastError> {
        match &mut self.get_first_mut(groups::SHIPS)?.body {
            Body::Ship(ship) => Ok(ship),
            _ => Err(wrong_kind(groups::SHIPS, "ship")),
        }
    }

    pub fn shields(&self) -> Result<&Shields, CastError> {
        match &self.get_first(groups::SHIELDS)?.body {
            Body::Shields(shields) => Ok(shields),
            _ => Err(wrong_kind(groups::SHIELDS, "shields")),
        }
    }

    pub fn shields_mut(&mut self) -> Result<&mut Shields, CastError> {
        match &mut self.get_first_mut(groups::SHIELDS)?.body {
            Body::Shields(shields) => Ok(shields),
            _ => Err(wrong_kind(groups::SHIELDS, "shields")),
        }
    }

    pub fn score(&self) -> Result<&Score, CastError> {
        match &self.get_first(groups::SCORES)?.body {
            Body::Score(score) => Ok(score),
            _ => Err(wrong_kind(groups::SCORES, "score")),
        }
    }

    pub fn score_mut(&mut self) -> Result<&mut Score, CastError> {
        match &mut self.get_first_mut(groups::SCORES)?.body {
            Body::Score(score) => Ok(score),
            _ => Err(wrong_kind(groups::SCORES, "score")),
        }
    }
}

fn wrong_kind(group: &str, expected: &'static str) -> CastError {
    CastError::WrongKind {
        group: group.to_string(),
        expected,
    }
}
