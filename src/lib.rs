//! Algapuri - A falling-villain catcher arcade game
//!
//! Core modules:
//! - `sim`: Frame-stepped simulation (entities, spawning, collisions, scoring)
//! - `renderer`: Draw list generation (and 2D canvas drawing on the web)
//! - `platform`: Browser/native platform abstraction
//! - `tuning`: Data-driven game balance

pub mod assets;
pub mod audio;
pub mod best_score;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use best_score::BestScore;
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Logical playfield dimensions (independent of the display size)
    pub const CANVAS_WIDTH: f32 = 480.0;
    pub const CANVAS_HEIGHT: f32 = 800.0;

    /// Player defaults - square sprite resting above the bottom edge
    pub const PLAYER_SIZE: f32 = 80.0;
    pub const PLAYER_BOTTOM_MARGIN: f32 = 40.0;
    /// Horizontal speed in logical pixels per frame
    pub const PLAYER_SPEED: f32 = 10.0;

    /// Villain defaults
    pub const VILLAIN_BASE_SIZE: f32 = 60.0;
    pub const VILLAIN_SIZE_JITTER: f32 = 5.0;
    /// Extra random height above the top edge so villains enter staggered
    pub const VILLAIN_SPAWN_STAGGER: f32 = 200.0;

    /// Inset applied to both boxes before the overlap test
    pub const COLLISION_PADDING: f32 = 10.0;

    pub const INITIAL_LIVES: i32 = 3;
    pub const EATS_PER_LEVEL: u64 = 10;
}

/// Convert a horizontal display coordinate into the logical playfield space.
///
/// `display_x` is relative to the left edge of the drawn playfield and
/// `display_width` is its on-screen width.
#[inline]
pub fn display_to_logical_x(display_x: f32, display_width: f32) -> f32 {
    if display_width <= 0.0 {
        return 0.0;
    }
    display_x * (consts::CANVAS_WIDTH / display_width)
}
