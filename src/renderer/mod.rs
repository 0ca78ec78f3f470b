//! Rendering module
//!
//! The simulation never draws. Each frame the host asks for a draw list (a
//! pure read of the game state) and paints it; on the web that happens on a
//! 2D canvas.

#[cfg(target_arch = "wasm32")]
pub mod canvas;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;

use crate::consts::{CANVAS_HEIGHT, CANVAS_WIDTH};
use crate::sim::{GamePhase, GameState, Rect};

/// Which sprite a draw command refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sprite {
    Background,
    /// Full-screen art behind the menu and game-over overlays
    MenuBackground,
    Hero,
    /// Index into the host's villain sprite list
    Villain(usize),
}

/// One sprite placed at a logical rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCommand {
    pub sprite: Sprite,
    pub rect: Rect,
}

/// Canvas backing-store size for a displayed size and device pixel ratio.
///
/// A bogus ratio counts as 1 and neither side drops below one pixel.
pub fn backing_size(client_width: f64, client_height: f64, device_pixel_ratio: f64) -> (u32, u32) {
    let dpr = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
        device_pixel_ratio
    } else {
        1.0
    };
    let side = |client: f64| {
        let px = (client.max(0.0) * dpr).round();
        if px.is_finite() { (px as u32).max(1) } else { 1 }
    };
    (side(client_width), side(client_height))
}

/// Build the draw list for the current frame, back to front
pub fn draw_list(state: &GameState) -> Vec<DrawCommand> {
    let mut commands = Vec::with_capacity(state.villains.len() + 2);

    let background = match state.phase {
        GamePhase::Menu | GamePhase::GameOver => Sprite::MenuBackground,
        _ => Sprite::Background,
    };
    commands.push(DrawCommand {
        sprite: background,
        rect: Rect::new(0.0, 0.0, CANVAS_WIDTH, CANVAS_HEIGHT),
    });

    // Hero stays visible while a session is on screen (paused shows the frozen frame)
    if matches!(state.phase, GamePhase::Playing | GamePhase::Paused) {
        commands.push(DrawCommand {
            sprite: Sprite::Hero,
            rect: state.player.rect,
        });
    }

    commands.extend(state.villains.iter().map(|v| DrawCommand {
        sprite: Sprite::Villain(v.sprite),
        rect: v.rect,
    }));

    commands
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{TickInput, tick};

    #[test]
    fn test_menu_draws_menu_background_only() {
        let state = GameState::new(3, 3);
        let list = draw_list(&state);
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].sprite, Sprite::MenuBackground);
        assert_eq!(list[0].rect, Rect::new(0.0, 0.0, 480.0, 800.0));
    }

    #[test]
    fn test_background_follows_phase() {
        let mut state = GameState::new(3, 3);
        state.start_session();
        assert_eq!(draw_list(&state)[0].sprite, Sprite::Background);

        state.toggle_pause();
        assert_eq!(draw_list(&state)[0].sprite, Sprite::Background);

        state.phase = GamePhase::GameOver;
        assert_eq!(draw_list(&state)[0].sprite, Sprite::MenuBackground);
    }

    #[test]
    fn test_playing_draws_hero_then_villains() {
        let mut state = GameState::new(3, 3);
        state.start_session();
        tick(&mut state, &TickInput::default());

        let list = draw_list(&state);
        assert_eq!(list.len(), 2 + state.villains.len());
        assert_eq!(list[1].sprite, Sprite::Hero);
        assert_eq!(list[1].rect, state.player.rect);
        for (cmd, villain) in list[2..].iter().zip(&state.villains) {
            assert_eq!(cmd.sprite, Sprite::Villain(villain.sprite));
            assert_eq!(cmd.rect, villain.rect);
        }
    }

    #[test]
    fn test_draw_list_does_not_mutate() {
        let mut state = GameState::new(3, 3);
        state.start_session();
        tick(&mut state, &TickInput::default());
        let frame = state.frame;
        let tops: Vec<f32> = state.villains.iter().map(|v| v.rect.top()).collect();

        let _ = draw_list(&state);
        let _ = draw_list(&state);

        assert_eq!(state.frame, frame);
        let after: Vec<f32> = state.villains.iter().map(|v| v.rect.top()).collect();
        assert_eq!(tops, after);
    }

    #[test]
    fn test_backing_size_follows_display_and_dpr() {
        assert_eq!(backing_size(480.0, 800.0, 1.0), (480, 800));
        assert_eq!(backing_size(360.0, 600.0, 2.0), (720, 1200));
        assert_eq!(backing_size(300.5, 500.0, 1.5), (451, 750));
        assert_eq!(backing_size(240.0, 400.0, f64::NAN), (240, 400));
        assert_eq!(backing_size(240.0, 400.0, 0.0), (240, 400));
        assert_eq!(backing_size(0.0, -5.0, 2.0), (1, 1));
    }

    #[test]
    fn test_game_over_hides_hero() {
        let mut state = GameState::new(3, 3);
        state.start_session();
        state.phase = GamePhase::GameOver;
        assert!(draw_list(&state).iter().all(|c| c.sprite != Sprite::Hero));
    }
}
