//! Actors: everything on the field that is not static terrain
//!
//! One `Entity` struct carries the shared geometry. What differs between a
//! coin, a fireball and the player is captured by two small closed enums:
//! `EntityKind` (what it is, for contacts and rendering) and `Behavior`
//! (how it moves each tick).

use std::f32::consts::TAU;
use std::sync::atomic::{AtomicU64, Ordering};

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::level::Level;
use super::vector::{Vector, VectorExt};
use crate::consts::*;
use crate::error::SimError;

static NEXT_ENTITY_ID: AtomicU64 = AtomicU64::new(1);

/// Stable identity of an actor
///
/// Clones share the id of their source, so a copy of the player taken for a
/// query is still recognised as the player. Ids read back from serialized
/// state are reserved, so later fresh ids never collide with them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "u64", into = "u64")]
pub struct EntityId(u64);

impl EntityId {
    /// Allocate an id no other live entity has
    pub fn fresh() -> Self {
        Self(NEXT_ENTITY_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for EntityId {
    /// Adopt a stored id and bump the allocator past it
    fn from(id: u64) -> Self {
        NEXT_ENTITY_ID.fetch_max(id.saturating_add(1), Ordering::Relaxed);
        Self(id)
    }
}

impl From<EntityId> for u64 {
    fn from(id: EntityId) -> Self {
        id.0
    }
}

/// What an actor is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    #[default]
    Actor,
    Player,
    Coin,
    Fireball,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Actor => "actor",
            EntityKind::Player => "player",
            EntityKind::Coin => "coin",
            EntityKind::Fireball => "fireball",
        }
    }
}

/// How an actor moves each tick
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum Behavior {
    /// Never moves on its own (generic actors, the player)
    #[default]
    Idle,
    /// Constant velocity, reverses on hitting terrain
    Bounce,
    /// Constant velocity, jumps back to `origin` on hitting terrain
    Respawn { origin: Vector },
    /// Vertical sine bob around `origin`
    Bob { origin: Vector, phase: f32 },
}

/// A moving (or at least queryable) object on the field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "EntityRecord", into = "EntityRecord")]
pub struct Entity {
    id: EntityId,
    pub position: Vector,
    size: Vector,
    pub velocity: Vector,
    kind: EntityKind,
    behavior: Behavior,
}

/// Wire form of an [`Entity`]; geometry is re-validated on the way in
#[derive(Serialize, Deserialize)]
struct EntityRecord {
    id: EntityId,
    position: Vector,
    size: Vector,
    velocity: Vector,
    kind: EntityKind,
    behavior: Behavior,
}

impl TryFrom<EntityRecord> for Entity {
    type Error = SimError;

    fn try_from(record: EntityRecord) -> Result<Self, Self::Error> {
        validate(record.position, record.size, record.velocity)?;
        Ok(Self {
            id: record.id,
            position: record.position,
            size: record.size,
            velocity: record.velocity,
            kind: record.kind,
            behavior: record.behavior,
        })
    }
}

impl From<Entity> for EntityRecord {
    fn from(entity: Entity) -> Self {
        Self {
            id: entity.id,
            position: entity.position,
            size: entity.size,
            velocity: entity.velocity,
            kind: entity.kind,
            behavior: entity.behavior,
        }
    }
}

/// Size must be positive on both axes and every component finite
fn validate(position: Vector, size: Vector, velocity: Vector) -> Result<(), SimError> {
    if !position.is_finite() {
        return Err(SimError::NonFinite { field: "position" });
    }
    if !velocity.is_finite() {
        return Err(SimError::NonFinite { field: "velocity" });
    }
    if !size.is_finite() || size.x <= 0.0 || size.y <= 0.0 {
        return Err(SimError::InvalidSize {
            x: size.x,
            y: size.y,
        });
    }
    Ok(())
}

impl Default for Entity {
    fn default() -> Self {
        Self::raw(Vector::ZERO, Vector::ONE, Vector::ZERO, EntityKind::Actor, Behavior::Idle)
    }
}

impl Entity {
    /// Create a generic actor
    ///
    /// Size must be positive on both axes and every component finite.
    pub fn new(position: Vector, size: Vector, velocity: Vector) -> Result<Self, SimError> {
        validate(position, size, velocity)?;
        Ok(Self::raw(position, size, velocity, EntityKind::Actor, Behavior::Idle))
    }

    fn raw(
        position: Vector,
        size: Vector,
        velocity: Vector,
        kind: EntityKind,
        behavior: Behavior,
    ) -> Self {
        Self {
            id: EntityId::fresh(),
            position,
            size,
            velocity,
            kind,
            behavior,
        }
    }

    /// A one-cell fireball that bounces off terrain
    pub fn projectile(position: Vector, velocity: Vector) -> Self {
        Self::raw(position, FIREBALL_SIZE, velocity, EntityKind::Fireball, Behavior::Bounce)
    }

    pub fn horizontal_fireball(position: Vector) -> Self {
        Self::projectile(position, HORIZONTAL_FIREBALL_VELOCITY)
    }

    pub fn vertical_fireball(position: Vector) -> Self {
        Self::projectile(position, VERTICAL_FIREBALL_VELOCITY)
    }

    /// Falling fireball that restarts from its spawn cell when it lands
    pub fn fire_rain(position: Vector) -> Self {
        Self::raw(
            position,
            FIREBALL_SIZE,
            FIRE_RAIN_VELOCITY,
            EntityKind::Fireball,
            Behavior::Respawn { origin: position },
        )
    }

    /// A coin placed in the cell at `cell`, starting at a random bob phase
    pub fn coin<R: Rng>(cell: Vector, rng: &mut R) -> Self {
        let origin = cell.plus(COIN_OFFSET);
        let phase = rng.random_range(0.0..TAU);
        Self::raw(
            origin,
            COIN_SIZE,
            Vector::ZERO,
            EntityKind::Coin,
            Behavior::Bob { origin, phase },
        )
    }

    /// The player, standing with its feet on the bottom of `cell`
    pub fn player(cell: Vector) -> Self {
        Self::raw(
            cell.plus(PLAYER_OFFSET),
            PLAYER_SIZE,
            Vector::ZERO,
            EntityKind::Player,
            Behavior::Idle,
        )
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn size(&self) -> Vector {
        self.size
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn behavior(&self) -> Behavior {
        self.behavior
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.position.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.position.y
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.position.x + self.size.x
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.position.y + self.size.y
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.position, self.size)
    }

    /// True if the two boxes overlap. An entity never intersects itself.
    pub fn is_intersecting(&self, other: &Entity) -> bool {
        if self.id == other.id {
            return false;
        }
        self.bounds().overlaps(&other.bounds())
    }

    /// Where constant-velocity motion would put this entity after `dt`
    pub fn next_position(&self, dt: f32) -> Vector {
        self.position.plus(self.velocity.times(dt))
    }

    /// React to terrain blocking the next step
    pub fn on_obstacle(&mut self) {
        match self.behavior {
            Behavior::Bounce => self.velocity = self.velocity.times(-1.0),
            Behavior::Respawn { origin } => self.position = origin,
            Behavior::Idle | Behavior::Bob { .. } => {}
        }
    }

    /// Advance this entity by `dt` seconds against the current level
    pub fn act(&mut self, dt: f32, level: &Level) {
        match self.behavior {
            Behavior::Idle => {}
            Behavior::Bounce | Behavior::Respawn { .. } => {
                let next = self.next_position(dt);
                if level.terrain_at(next, self.size).is_some() {
                    self.on_obstacle();
                } else {
                    self.position = next;
                }
            }
            Behavior::Bob { origin, phase } => {
                let phase = phase + COIN_SPRING_SPEED * dt;
                self.behavior = Behavior::Bob { origin, phase };
                self.position = origin.plus(Vector::new(0.0, phase.sin() * COIN_SPRING_DIST));
            }
        }
    }
}
