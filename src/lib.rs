//! Lava Run - A tile-based platformer simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (vectors, actors, level state, plan parsing)
//! - `settings`: Runtime configuration
//! - `error`: Crate error type
//!
//! Rendering, keyboard input and the per-frame loop live outside this crate.
//! A driver parses a plan, then calls [`sim::tick`] once per frame until
//! [`sim::Level::is_finished`] reports true.

pub mod error;
pub mod settings;
pub mod sim;

pub use error::SimError;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    use glam::Vec2;

    /// Default simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Tick cap for headless runs (one minute of game time)
    pub const MAX_TICKS: u32 = 60 * 60;

    /// Grace period after a win/loss before the level reports finished (seconds)
    pub const FINISH_DELAY: f32 = 1.0;

    /// Player box, anchored so the plan symbol marks the feet
    pub const PLAYER_SIZE: Vec2 = Vec2::new(0.8, 1.5);
    pub const PLAYER_OFFSET: Vec2 = Vec2::new(0.0, -0.5);

    /// Coin box, centered inside its cell
    pub const COIN_SIZE: Vec2 = Vec2::new(0.6, 0.6);
    pub const COIN_OFFSET: Vec2 = Vec2::new(0.2, 0.1);
    /// Coin bob angular speed (radians/s)
    pub const COIN_SPRING_SPEED: f32 = 8.0;
    /// Coin bob amplitude (cells)
    pub const COIN_SPRING_DIST: f32 = 0.07;

    /// Fireballs occupy exactly one cell
    pub const FIREBALL_SIZE: Vec2 = Vec2::ONE;
    pub const HORIZONTAL_FIREBALL_VELOCITY: Vec2 = Vec2::new(2.0, 0.0);
    pub const VERTICAL_FIREBALL_VELOCITY: Vec2 = Vec2::new(0.0, 2.0);
    pub const FIRE_RAIN_VELOCITY: Vec2 = Vec2::new(0.0, 3.0);
}
