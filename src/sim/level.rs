//! Level state: static terrain grid, live actors, win/lose status
//!
//! The field is walled on the left, top and right; below the last row is a
//! bottomless lava pit.

use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::entity::{Entity, EntityId, EntityKind};
use super::vector::Vector;
use crate::consts::FINISH_DELAY;

/// Static terrain occupying a grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Terrain {
    Wall,
    Lava,
}

/// One grid row; `None` is open space
pub type GridRow = Vec<Option<Terrain>>;

/// Outcome of the level so far
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Still playing
    #[default]
    None,
    Won,
    Lost,
}

impl Status {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Status::None)
    }
}

/// Whatever the player touched this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactKind {
    Wall,
    Lava,
    Actor,
    Player,
    Coin,
    Fireball,
}

impl From<Terrain> for ContactKind {
    fn from(terrain: Terrain) -> Self {
        match terrain {
            Terrain::Wall => ContactKind::Wall,
            Terrain::Lava => ContactKind::Lava,
        }
    }
}

impl From<EntityKind> for ContactKind {
    fn from(kind: EntityKind) -> Self {
        match kind {
            EntityKind::Actor => ContactKind::Actor,
            EntityKind::Player => ContactKind::Player,
            EntityKind::Coin => ContactKind::Coin,
            EntityKind::Fireball => ContactKind::Fireball,
        }
    }
}

/// A playable level
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "LevelRecord", into = "LevelRecord")]
pub struct Level {
    grid: Vec<GridRow>,
    /// Live actors, in plan scan order
    entities: Vec<Entity>,
    /// The first player-kind actor present at construction
    player: Option<EntityId>,
    width: usize,
    height: usize,
    status: Status,
    finish_delay: f32,
}

/// Wire form of a [`Level`]; size and player are re-derived on the way in
#[derive(Serialize, Deserialize)]
struct LevelRecord {
    grid: Vec<GridRow>,
    entities: Vec<Entity>,
    status: Status,
    finish_delay: f32,
}

impl From<LevelRecord> for Level {
    fn from(record: LevelRecord) -> Self {
        let mut level = Level::new(record.grid, record.entities);
        level.status = record.status;
        level.finish_delay = record.finish_delay;
        level
    }
}

impl From<Level> for LevelRecord {
    fn from(level: Level) -> Self {
        Self {
            grid: level.grid,
            entities: level.entities,
            status: level.status,
            finish_delay: level.finish_delay,
        }
    }
}

impl Level {
    /// Build a level from a (possibly ragged) grid and its actors
    pub fn new(grid: Vec<GridRow>, entities: Vec<Entity>) -> Self {
        let player = entities
            .iter()
            .find(|e| e.kind() == EntityKind::Player)
            .map(Entity::id);
        let width = grid.iter().map(Vec::len).max().unwrap_or(0);
        let height = grid.len();
        Self {
            grid,
            entities,
            player,
            width,
            height,
            status: Status::None,
            finish_delay: FINISH_DELAY,
        }
    }

    /// Override the post-outcome grace period
    pub fn with_finish_delay(mut self, finish_delay: f32) -> Self {
        self.finish_delay = finish_delay;
        self
    }

    pub fn grid(&self) -> &[GridRow] {
        &self.grid
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub(crate) fn entities_mut(&mut self) -> &mut [Entity] {
        &mut self.entities
    }

    /// Widest row length
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn finish_delay(&self) -> f32 {
        self.finish_delay
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id() == id)
    }

    /// The player, if it is still on the field
    pub fn player(&self) -> Option<&Entity> {
        self.player.and_then(|id| self.entity(id))
    }

    /// Mutable access for the input layer
    pub fn player_mut(&mut self) -> Option<&mut Entity> {
        let id = self.player?;
        self.entities.iter_mut().find(|e| e.id() == id)
    }

    /// True once the outcome is decided and the grace period has run out
    pub fn is_finished(&self) -> bool {
        self.status.is_terminal() && self.finish_delay < 0.0
    }

    /// First actor (in list order) overlapping `entity`, never `entity` itself
    pub fn entity_at(&self, entity: &Entity) -> Option<&Entity> {
        self.entities.iter().find(|e| e.is_intersecting(entity))
    }

    /// Terrain under the box at `position` with extent `size`
    ///
    /// Anything poking out left, right or above the field is a wall; anything
    /// poking out below is lava. Out-of-bounds checks win over grid contents.
    pub fn terrain_at(&self, position: Vector, size: Vector) -> Option<Terrain> {
        let span = Aabb::new(position, size).cells();

        if span.left < 0 || span.right > self.width as i32 || span.top < 0 {
            return Some(Terrain::Wall);
        }
        if span.bottom > self.height as i32 {
            return Some(Terrain::Lava);
        }

        span.iter().find_map(|(x, y)| self.cell(x as usize, y as usize))
    }

    /// Terrain at a single cell; cells past the end of a short row are open
    fn cell(&self, x: usize, y: usize) -> Option<Terrain> {
        self.grid.get(y).and_then(|row| row.get(x)).copied().flatten()
    }

    /// Remove an actor by id. Returns it if it was present.
    pub fn remove_entity(&mut self, id: EntityId) -> Option<Entity> {
        let index = self.entities.iter().position(|e| e.id() == id)?;
        Some(self.entities.remove(index))
    }

    /// True if no remaining actor has the given kind
    pub fn none_of_kind(&self, kind: EntityKind) -> bool {
        !self.entities.iter().any(|e| e.kind() == kind)
    }

    /// Feed one player contact into the win/lose state machine
    ///
    /// Lava or a fireball loses the level. Touching a coin collects it, and
    /// collecting the last coin wins. Once won or lost, nothing changes.
    pub fn apply_contact(&mut self, contact: ContactKind, entity: &Entity) {
        if self.status.is_terminal() {
            return;
        }

        match contact {
            ContactKind::Lava | ContactKind::Fireball => {
                self.status = Status::Lost;
                log::info!("Level lost ({:?})", contact);
            }
            ContactKind::Coin if entity.kind() == EntityKind::Coin => {
                self.remove_entity(entity.id());
                log::debug!("Coin {} collected", entity.id().get());
                if self.none_of_kind(EntityKind::Coin) {
                    self.status = Status::Won;
                    log::info!("Level won");
                }
            }
            _ => {}
        }
    }

    /// Check the player's box against terrain and other actors
    pub fn resolve_player_contacts(&mut self) {
        let Some(player) = self.player().cloned() else {
            return;
        };

        if let Some(terrain) = self.terrain_at(player.position, player.size()) {
            self.apply_contact(terrain.into(), &player);
        }

        if let Some(other) = self.entity_at(&player).cloned() {
            self.apply_contact(other.kind().into(), &other);
        }
    }

    /// Run the post-outcome grace period down
    pub fn count_down(&mut self, dt: f32) {
        if self.status.is_terminal() {
            self.finish_delay -= dt;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_grid(width: usize, height: usize) -> Vec<GridRow> {
        vec![vec![None; width]; height]
    }

    fn actor_at(x: f32, y: f32) -> Entity {
        Entity::new(Vector::new(x, y), Vector::ONE, Vector::ZERO).unwrap()
    }

    #[test]
    fn test_dimensions_from_ragged_grid() {
        let grid = vec![vec![None; 2], vec![None; 5], Vec::new()];
        let level = Level::new(grid, Vec::new());
        assert_eq!(level.width(), 5);
        assert_eq!(level.height(), 3);
    }

    #[test]
    fn test_empty_level() {
        let level = Level::new(Vec::new(), Vec::new());
        assert_eq!(level.width(), 0);
        assert_eq!(level.height(), 0);
        assert_eq!(level.status(), Status::None);
        assert!(level.player().is_none());
        assert!(!level.is_finished());
    }

    #[test]
    fn test_player_is_first_player_kind() {
        let first = Entity::player(Vector::new(1.0, 1.0));
        let second = Entity::player(Vector::new(2.0, 1.0));
        let first_id = first.id();
        let level = Level::new(open_grid(4, 3), vec![actor_at(0.0, 0.0), first, second]);
        assert_eq!(level.player().map(Entity::id), Some(first_id));
    }

    #[test]
    fn test_is_finished_needs_status_and_expired_delay() {
        let mut level = Level::new(open_grid(3, 3), Vec::new());
        level.count_down(5.0);
        // No outcome yet, so the delay does not run
        assert_eq!(level.finish_delay(), FINISH_DELAY);
        assert!(!level.is_finished());

        level.apply_contact(ContactKind::Lava, &Entity::default());
        assert!(!level.is_finished());
        level.count_down(0.5);
        assert!(!level.is_finished());
        level.count_down(0.6);
        assert!(level.is_finished());
    }

    #[test]
    fn test_entity_at_skips_self_and_keeps_list_order() {
        let probe = actor_at(1.0, 1.0);
        let a = actor_at(1.5, 1.0);
        let b = actor_at(0.5, 1.0);
        let a_id = a.id();
        let level = Level::new(open_grid(4, 4), vec![probe.clone(), a, b]);

        assert_eq!(level.entity_at(&probe).map(Entity::id), Some(a_id));

        let far = actor_at(3.0, 3.0);
        assert!(level.entity_at(&far).is_none());
    }

    #[test]
    fn test_terrain_at_walls_outside_left_top_right() {
        let level = Level::new(open_grid(5, 5), Vec::new());
        let one = Vector::ONE;
        assert_eq!(level.terrain_at(Vector::new(-3.0, 1.0), one), Some(Terrain::Wall));
        assert_eq!(level.terrain_at(Vector::new(-0.5, 1.0), one), Some(Terrain::Wall));
        assert_eq!(level.terrain_at(Vector::new(1.0, -0.1), one), Some(Terrain::Wall));
        assert_eq!(level.terrain_at(Vector::new(4.5, 1.0), one), Some(Terrain::Wall));
    }

    #[test]
    fn test_terrain_at_lava_below() {
        let level = Level::new(open_grid(5, 5), Vec::new());
        assert_eq!(
            level.terrain_at(Vector::new(1.0, 4.5), Vector::ONE),
            Some(Terrain::Lava)
        );
    }

    #[test]
    fn test_terrain_at_wall_beats_lava_and_grid() {
        let mut grid = open_grid(3, 3);
        grid[2][0] = Some(Terrain::Lava);
        let level = Level::new(grid, Vec::new());
        // Out on the left and below at once
        assert_eq!(
            level.terrain_at(Vector::new(-0.5, 2.5), Vector::ONE),
            Some(Terrain::Wall)
        );
    }

    #[test]
    fn test_terrain_at_inside_bounds() {
        let mut grid = open_grid(4, 3);
        grid[1][2] = Some(Terrain::Lava);
        grid[1][3] = Some(Terrain::Wall);
        let level = Level::new(grid, Vec::new());

        assert_eq!(level.terrain_at(Vector::new(0.0, 0.0), Vector::ONE), None);
        // Box touching a terrain cell only at its edge sees open space
        assert_eq!(level.terrain_at(Vector::new(1.0, 1.0), Vector::ONE), None);
        // Row-major scan finds lava before the wall to its right
        assert_eq!(
            level.terrain_at(Vector::new(1.5, 1.0), Vector::new(2.0, 1.0)),
            Some(Terrain::Lava)
        );
        assert_eq!(
            level.terrain_at(Vector::new(3.0, 1.0), Vector::ONE),
            Some(Terrain::Wall)
        );
    }

    #[test]
    fn test_terrain_at_ragged_row_is_open() {
        let grid = vec![vec![None; 4], vec![Some(Terrain::Wall)], vec![None; 4]];
        let level = Level::new(grid, Vec::new());
        assert_eq!(level.terrain_at(Vector::new(2.0, 1.0), Vector::ONE), None);
        assert_eq!(
            level.terrain_at(Vector::new(0.0, 1.0), Vector::ONE),
            Some(Terrain::Wall)
        );
    }

    #[test]
    fn test_remove_entity() {
        let a = actor_at(0.0, 0.0);
        let b = actor_at(1.0, 0.0);
        let (a_id, b_id) = (a.id(), b.id());
        let mut level = Level::new(open_grid(3, 3), vec![a, b]);

        assert_eq!(level.remove_entity(a_id).map(|e| e.id()), Some(a_id));
        assert_eq!(level.entities().len(), 1);
        // Second removal is a no-op
        assert!(level.remove_entity(a_id).is_none());
        assert_eq!(level.entities()[0].id(), b_id);
    }

    #[test]
    fn test_none_of_kind() {
        let level = Level::new(
            open_grid(3, 3),
            vec![Entity::horizontal_fireball(Vector::ZERO)],
        );
        assert!(level.none_of_kind(EntityKind::Coin));
        assert!(!level.none_of_kind(EntityKind::Fireball));
    }

    #[test]
    fn test_lava_then_coin_stays_lost() {
        let coin = Entity::coin(Vector::ONE, &mut rand::rng());
        let mut level = Level::new(open_grid(3, 3), vec![coin.clone()]);

        level.apply_contact(ContactKind::Lava, &Entity::default());
        assert_eq!(level.status(), Status::Lost);

        level.apply_contact(ContactKind::Coin, &coin);
        assert_eq!(level.status(), Status::Lost);
        assert_eq!(level.entities().len(), 1);
    }

    #[test]
    fn test_won_stays_won() {
        let coin = Entity::coin(Vector::ONE, &mut rand::rng());
        let mut level = Level::new(open_grid(3, 3), vec![coin.clone()]);

        level.apply_contact(ContactKind::Coin, &coin);
        assert_eq!(level.status(), Status::Won);

        level.apply_contact(ContactKind::Fireball, &Entity::vertical_fireball(Vector::ZERO));
        assert_eq!(level.status(), Status::Won);
        level.apply_contact(ContactKind::Lava, &Entity::default());
        assert_eq!(level.status(), Status::Won);
    }

    #[test]
    fn test_json_round_trip_rederives_level_shape() {
        let mut grid = open_grid(2, 2);
        grid.push(vec![Some(Terrain::Wall); 4]);
        let player = Entity::player(Vector::new(1.0, 1.0));
        let player_id = player.id();
        let mut level = Level::new(grid, vec![actor_at(0.0, 0.0), player]);
        level.apply_contact(ContactKind::Lava, &Entity::default());

        let json = serde_json::to_string(&level).unwrap();
        let back: Level = serde_json::from_str(&json).unwrap();
        assert_eq!(back.width(), 4);
        assert_eq!(back.height(), 3);
        assert_eq!(back.status(), Status::Lost);
        assert_eq!(back.finish_delay(), FINISH_DELAY);
        assert_eq!(back.player().map(Entity::id), Some(player_id));
        assert_eq!(back.entities(), level.entities());
    }

    #[test]
    fn test_json_level_with_bad_entity_is_rejected() {
        let json = r#"{"grid":[[null]],"entities":[{"id":11,"position":[0.0,0.0],"size":[-1.0,1.0],"velocity":[0.0,0.0],"kind":"actor","behavior":"Idle"}],"status":"none","finish_delay":1.0}"#;
        assert!(serde_json::from_str::<Level>(json).is_err());
    }

    #[test]
    fn test_fireball_contact_loses() {
        let mut level = Level::new(open_grid(3, 3), Vec::new());
        let fireball = Entity::vertical_fireball(Vector::ZERO);
        level.apply_contact(ContactKind::Fireball, &fireball);
        assert_eq!(level.status(), Status::Lost);
    }

    #[test]
    fn test_last_coin_wins() {
        let mut rng = rand::rng();
        let first = Entity::coin(Vector::new(0.0, 0.0), &mut rng);
        let last = Entity::coin(Vector::new(2.0, 0.0), &mut rng);
        let mut level = Level::new(open_grid(3, 3), vec![first.clone(), last.clone()]);

        level.apply_contact(ContactKind::Coin, &first);
        assert_eq!(level.status(), Status::None);
        assert_eq!(level.entities().len(), 1);

        level.apply_contact(ContactKind::Coin, &last);
        assert_eq!(level.status(), Status::Won);
        assert!(level.entities().is_empty());
    }

    #[test]
    fn test_coin_contact_requires_coin_entity() {
        let coin = Entity::coin(Vector::ONE, &mut rand::rng());
        let other = actor_at(0.0, 0.0);
        let mut level = Level::new(open_grid(3, 3), vec![coin, other.clone()]);

        level.apply_contact(ContactKind::Coin, &other);
        assert_eq!(level.status(), Status::None);
        assert_eq!(level.entities().len(), 2);
    }

    #[test]
    fn test_wall_and_actor_contacts_are_ignored() {
        let mut level = Level::new(open_grid(3, 3), Vec::new());
        level.apply_contact(ContactKind::Wall, &Entity::default());
        level.apply_contact(ContactKind::Actor, &Entity::default());
        assert_eq!(level.status(), Status::None);
    }

    #[test]
    fn test_player_contact_with_lava_cell() {
        let mut grid = open_grid(3, 3);
        grid[1][1] = Some(Terrain::Lava);
        let player = Entity::player(Vector::new(1.0, 1.0));
        let mut level = Level::new(grid, vec![player]);

        level.resolve_player_contacts();
        assert_eq!(level.status(), Status::Lost);
    }

    #[test]
    fn test_player_collects_overlapping_coin() {
        let player = Entity::player(Vector::new(1.0, 1.0));
        let coin = Entity::coin(Vector::new(1.0, 1.0), &mut rand::rng());
        let mut level = Level::new(open_grid(3, 3), vec![player, coin]);

        level.resolve_player_contacts();
        assert_eq!(level.status(), Status::Won);
        assert_eq!(level.entities().len(), 1);
        assert!(level.player().is_some());
    }

    #[test]
    fn test_player_reference_survives_removals() {
        let rock = actor_at(0.0, 0.0);
        let rock_id = rock.id();
        let player = Entity::player(Vector::new(2.0, 2.0));
        let player_id = player.id();
        let mut level = Level::new(open_grid(4, 4), vec![rock, player]);

        level.remove_entity(rock_id);
        assert_eq!(level.player().map(Entity::id), Some(player_id));

        level.player_mut().unwrap().position = Vector::new(0.5, 0.5);
        assert_eq!(level.player().unwrap().position, Vector::new(0.5, 0.5));
    }
}
