//! Level plan parsing
//!
//! A plan is a list of text rows, one character per cell. Terrain symbols are
//! fixed (`x` wall, `!` lava); actor symbols come from a caller-supplied table
//! mapping each character to a [`SpawnKind`].

use std::collections::HashMap;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::entity::Entity;
use super::level::{GridRow, Level, Terrain};
use super::vector::Vector;
use crate::error::SimError;

/// One level description, top row first
pub type Plan = Vec<String>;

/// Which actor a plan symbol spawns
#[derive(Debug, Clone, Copy)]
pub enum SpawnKind {
    /// Generic one-cell actor with no behavior
    Actor,
    Player,
    Coin,
    HorizontalFireball,
    VerticalFireball,
    FireRain,
    /// Caller-registered constructor; `None` means "nothing to place here"
    Custom(fn(Vector) -> Option<Entity>),
}

impl SpawnKind {
    fn spawn<R: Rng>(self, cell: Vector, rng: &mut R) -> Option<Entity> {
        match self {
            SpawnKind::Actor => Entity::new(cell, Vector::ONE, Vector::ZERO).ok(),
            SpawnKind::Player => Some(Entity::player(cell)),
            SpawnKind::Coin => Some(Entity::coin(cell, rng)),
            SpawnKind::HorizontalFireball => Some(Entity::horizontal_fireball(cell)),
            SpawnKind::VerticalFireball => Some(Entity::vertical_fireball(cell)),
            SpawnKind::FireRain => Some(Entity::fire_rain(cell)),
            SpawnKind::Custom(build) => build(cell),
        }
    }
}

/// Symbol to actor mapping
pub type SymbolTable = HashMap<char, SpawnKind>;

/// The conventional actor symbols
pub fn standard_symbols() -> SymbolTable {
    HashMap::from([
        ('@', SpawnKind::Player),
        ('o', SpawnKind::Coin),
        ('=', SpawnKind::HorizontalFireball),
        ('|', SpawnKind::VerticalFireball),
        ('v', SpawnKind::FireRain),
    ])
}

/// Turns plans into levels
#[derive(Debug, Clone)]
pub struct LevelParser {
    symbols: SymbolTable,
    /// Source of coin bob phases
    rng: Pcg32,
}

impl LevelParser {
    /// Create a parser over a copy of `symbols`, seeded from the thread RNG
    pub fn new(symbols: &SymbolTable) -> Self {
        Self::with_seed(symbols, rand::rng().random())
    }

    /// Create a parser whose coin phases are reproducible
    pub fn with_seed(symbols: &SymbolTable, seed: u64) -> Self {
        Self {
            symbols: symbols.clone(),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Parser over [`standard_symbols`]
    pub fn standard() -> Self {
        Self::new(&standard_symbols())
    }

    /// Spawn kind registered for a single-character symbol
    pub fn entity_constructor_for(&self, symbol: &str) -> Option<SpawnKind> {
        let mut chars = symbol.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => self.symbols.get(&c).copied(),
            _ => None,
        }
    }

    /// Static terrain for a plan symbol
    pub fn terrain_kind_for(symbol: char) -> Option<Terrain> {
        match symbol {
            'x' => Some(Terrain::Wall),
            '!' => Some(Terrain::Lava),
            _ => None,
        }
    }

    /// Terrain grid, one row per plan row (rows keep their own length)
    pub fn build_grid<S: AsRef<str>>(&self, plan: &[S]) -> Vec<GridRow> {
        plan.iter()
            .map(|row| row.as_ref().chars().map(Self::terrain_kind_for).collect())
            .collect()
    }

    /// Actors in row-major plan order
    pub fn build_entities<S: AsRef<str>>(&mut self, plan: &[S]) -> Vec<Entity> {
        let mut entities = Vec::new();
        for (y, row) in plan.iter().enumerate() {
            for (x, symbol) in row.as_ref().chars().enumerate() {
                let Some(kind) = self.symbols.get(&symbol).copied() else {
                    continue;
                };
                let cell = Vector::new(x as f32, y as f32);
                match kind.spawn(cell, &mut self.rng) {
                    Some(entity) => entities.push(entity),
                    None => log::debug!("Symbol {:?} at ({}, {}) spawned nothing", symbol, x, y),
                }
            }
        }
        entities
    }

    pub fn parse<S: AsRef<str>>(&mut self, plan: &[S]) -> Level {
        let level = Level::new(self.build_grid(plan), self.build_entities(plan));
        log::debug!(
            "Parsed {}x{} level with {} actors",
            level.width(),
            level.height(),
            level.entities().len()
        );
        level
    }
}

/// Decode a JSON array of plans (`[["row", ...], ...]`)
pub fn parse_level_pack(json: &str) -> Result<Vec<Plan>, SimError> {
    let plans: Vec<Plan> = serde_json::from_str(json).map_err(SimError::LevelPack)?;
    log::info!("Loaded {} level plans", plans.len());
    Ok(plans)
}
