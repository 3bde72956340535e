//! Single simulation step
//!
//! Order matters: every actor moves first, then the player's new box is
//! checked for contacts, then the finish countdown runs.

use super::level::Level;

/// Advance the level by one timestep
pub fn tick(level: &mut Level, dt: f32) {
    if level.is_finished() {
        return;
    }

    // Each actor sees the level as it stands after the actors before it moved
    for index in 0..level.entities().len() {
        let mut entity = level.entities()[index].clone();
        entity.act(dt, level);
        level.entities_mut()[index] = entity;
    }

    level.resolve_player_contacts();
    level.count_down(dt);
}
