//! Frame-stepped simulation module
//!
//! All gameplay logic lives here:
//! - One `tick` per display frame, no wall-clock time
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod collision;
pub mod rect;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::padded_overlap;
pub use rect::Rect;
pub use spawn::{fill_population, spawn_villain, target_villain_count};
pub use state::{GamePhase, GameState, Player, Session, Villain};
pub use tick::{GameEvent, TickInput, autopilot_input, tick};
