//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - Caller-supplied timestep only
//! - Seeded RNG only (coin phases)
//! - Stable iteration order (plan scan order)
//! - No rendering, input or platform dependencies

pub mod collision;
pub mod entity;
pub mod level;
pub mod parser;
pub mod tick;
pub mod vector;

pub use collision::{Aabb, CellSpan};
pub use entity::{Behavior, Entity, EntityId, EntityKind};
pub use level::{ContactKind, GridRow, Level, Status, Terrain};
pub use parser::{LevelParser, Plan, SpawnKind, SymbolTable, parse_level_pack, standard_symbols};
pub use tick::tick;
pub use vector::{Vector, VectorExt};
