//! Game state and core simulation types

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::consts::*;
use crate::tuning::Tuning;

/// Current phase of the game.
///
/// Only [`GamePhase::Playing`] lets the simulation mutate anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Assets still loading
    #[default]
    Loading,
    /// Title screen
    Menu,
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Run ended
    GameOver,
}

/// The player's catcher sprite
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub rect: Rect,
    /// Horizontal speed (pixels per frame)
    pub speed: f32,
}

impl Player {
    pub fn new(speed: f32) -> Self {
        Self {
            rect: Rect::new(
                Self::centered_x(),
                CANVAS_HEIGHT - PLAYER_SIZE - PLAYER_BOTTOM_MARGIN,
                PLAYER_SIZE,
                PLAYER_SIZE,
            ),
            speed,
        }
    }

    fn centered_x() -> f32 {
        CANVAS_WIDTH / 2.0 - PLAYER_SIZE / 2.0
    }

    /// Move back to the horizontal center
    pub fn recenter(&mut self) {
        self.rect.pos.x = Self::centered_x();
    }

    /// Largest x that keeps the sprite inside the playfield
    pub fn max_x(&self) -> f32 {
        (CANVAS_WIDTH - self.rect.width()).max(0.0)
    }

    /// Clamp horizontal position to the playfield
    pub fn clamp_to_playfield(&mut self) {
        self.rect.pos.x = self.rect.pos.x.clamp(0.0, self.max_x());
    }

    /// Center the sprite under a logical pointer x. Non-finite readings are ignored.
    pub fn follow_pointer(&mut self, pointer_x: f32) {
        if !pointer_x.is_finite() {
            return;
        }
        self.rect.pos.x = pointer_x - self.rect.width() / 2.0;
    }
}

/// A falling villain
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Villain {
    pub id: u32,
    pub rect: Rect,
    /// Downward speed (pixels per frame)
    pub speed: f32,
    /// Index into the host's villain sprite list (cosmetic only)
    pub sprite: usize,
}

impl Villain {
    /// Move straight down by one frame's worth of speed
    pub fn advance(&mut self) {
        self.rect.pos.y += self.speed;
    }

    /// True once the top edge has passed the bottom of the playfield
    pub fn is_past_bottom(&self) -> bool {
        self.rect.top() > CANVAS_HEIGHT
    }
}

/// Session counters read by the HUD after every frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub score: u64,
    pub level: u32,
    pub lives: i32,
    /// Set once the game-over event has been emitted
    pub terminated: bool,
}

impl Session {
    pub fn new(initial_lives: i32) -> Self {
        Self {
            score: 0,
            level: 1,
            lives: initial_lives,
            terminated: false,
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(INITIAL_LIVES)
    }
}

/// Complete game state owned by the host and passed into each tick
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the RNG was last reset with
    pub seed: u64,
    /// Spawn randomness
    pub rng: Pcg32,
    /// Current phase (the simulation gate)
    pub phase: GamePhase,
    /// Score, level and lives
    pub session: Session,
    pub player: Player,
    /// Active villains
    pub villains: Vec<Villain>,
    /// Number of villain sprites the host supplied
    pub sprite_count: usize,
    /// Frames simulated in the current session
    pub frame: u64,
    pub tuning: Tuning,
    /// Next villain ID
    next_id: u32,
}

impl GameState {
    /// Create a new game state with the given seed and default tuning
    pub fn new(seed: u64, sprite_count: usize) -> Self {
        Self::with_tuning(seed, sprite_count, Tuning::default())
    }

    pub fn with_tuning(seed: u64, sprite_count: usize, tuning: Tuning) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Menu,
            session: Session::new(tuning.initial_lives),
            player: Player::new(tuning.player_speed),
            villains: Vec::new(),
            sprite_count: sprite_count.max(1),
            frame: 0,
            tuning,
            next_id: 1,
        }
    }

    /// Allocate a new villain ID
    pub fn next_villain_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    /// Whether the simulation gate is open
    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    /// Reset counters, clear villains, recenter the player and open the gate
    pub fn start_session(&mut self) {
        self.session = Session::new(self.tuning.initial_lives);
        self.villains.clear();
        self.player.speed = self.tuning.player_speed;
        self.player.recenter();
        self.frame = 0;
        self.next_id = 1;
        self.phase = GamePhase::Playing;
        log::info!(
            "Session started (lives={}, target villains={})",
            self.session.lives,
            super::spawn::target_villain_count(self.session.level, &self.tuning)
        );
    }

    /// Like [`GameState::start_session`], reseeding spawn randomness first
    pub fn restart(&mut self, seed: u64) {
        self.seed = seed;
        self.rng = Pcg32::seed_from_u64(seed);
        self.start_session();
    }

    /// Toggle between playing and paused; ignored in other phases
    pub fn toggle_pause(&mut self) {
        self.phase = match self.phase {
            GamePhase::Playing => GamePhase::Paused,
            GamePhase::Paused => GamePhase::Playing,
            other => other,
        };
    }
}
