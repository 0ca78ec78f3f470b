//! Per-frame simulation step
//!
//! Core game loop: one call per display refresh while the gate is open.

use serde::{Deserialize, Serialize};

use super::collision::padded_overlap;
use super::spawn::{fill_population, spawn_into};
use super::state::{GamePhase, GameState};

/// Input for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Move-left key held
    pub left: bool,
    /// Move-right key held
    pub right: bool,
    /// Drag/touch position in logical coordinates (overrides keys)
    pub pointer_x: Option<f32>,
    /// Demo mode - the player steers itself
    pub autopilot: bool,
}

/// Side effects produced by a frame, consumed by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A villain was caught (play the eat sound)
    Eat { villain_id: u32 },
    /// Catch count crossed a level threshold
    LevelUp { level: u32 },
    /// A villain reached the bottom
    LifeLost { lives: i32 },
    /// Out of lives; fired once per session
    GameOver { score: u64, level: u32 },
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput) -> Vec<GameEvent> {
    let mut events = Vec::new();

    // Gate closed: nothing mutates, the host keeps ticking
    if state.phase != GamePhase::Playing || state.session.terminated {
        return events;
    }

    state.frame += 1;

    let steered;
    let input = if input.autopilot {
        steered = autopilot_input(state);
        &steered
    } else {
        input
    };

    // Player movement
    if let Some(pointer_x) = input.pointer_x {
        state.player.follow_pointer(pointer_x);
    } else {
        if input.left {
            state.player.rect.pos.x -= state.player.speed;
        }
        if input.right {
            state.player.rect.pos.x += state.player.speed;
        }
    }
    state.player.clamp_to_playfield();

    fill_population(state);

    for villain in &mut state.villains {
        villain.advance();
    }

    resolve(state, &mut events);

    // A level-up may have raised the target
    fill_population(state);

    events
}

/// Resolve catches and misses, replacing every removed villain
fn resolve(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let player = state.player.rect;
    let padding = state.tuning.collision_padding;
    let eats_per_level = state.tuning.eats_per_level;

    let villains = std::mem::take(&mut state.villains);
    let mut survivors = Vec::with_capacity(villains.len());

    for villain in villains {
        if state.session.terminated {
            survivors.push(villain);
            continue;
        }

        if padded_overlap(&player, &villain.rect, padding) {
            events.push(GameEvent::Eat {
                villain_id: villain.id,
            });
            state.session.score += 1;
            if eats_per_level > 0 && state.session.score % eats_per_level == 0 {
                state.session.level += 1;
                log::info!(
                    "Level up: {} (score {})",
                    state.session.level,
                    state.session.score
                );
                events.push(GameEvent::LevelUp {
                    level: state.session.level,
                });
            }
            survivors.push(spawn_into(state));
        } else if villain.is_past_bottom() {
            state.session.lives -= 1;
            events.push(GameEvent::LifeLost {
                lives: state.session.lives,
            });
            survivors.push(spawn_into(state));

            if state.session.lives <= 0 {
                state.session.terminated = true;
                state.phase = GamePhase::GameOver;
                log::info!(
                    "Game over: score={} level={} frames={}",
                    state.session.score,
                    state.session.level,
                    state.frame
                );
                events.push(GameEvent::GameOver {
                    score: state.session.score,
                    level: state.session.level,
                });
            }
        } else {
            survivors.push(villain);
        }
    }

    state.villains = survivors;
}

/// Steer toward the most urgent villain: the lowest one the player can still catch
pub fn autopilot_input(state: &GameState) -> TickInput {
    let player = state.player.rect;

    let target = state
        .villains
        .iter()
        .filter(|v| v.rect.top() < player.bottom())
        .max_by(|a, b| {
            a.rect
                .bottom()
                .partial_cmp(&b.rect.bottom())
                .unwrap_or(std::cmp::Ordering::Equal)
        });

    TickInput {
        pointer_x: target.map(|v| v.rect.center().x),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::rect::Rect;
    use crate::sim::spawn::target_villain_count;
    use crate::sim::state::Villain;
    use crate::tuning::Tuning;
    use proptest::prelude::*;

    fn playing_state() -> GameState {
        let mut state = GameState::new(12345, 3);
        state.start_session();
        state
    }

    /// Villain positioned so that after one advance it sits on the player
    fn villain_on_player(state: &mut GameState) -> Villain {
        let id = state.next_villain_id();
        let p = state.player.rect;
        Villain {
            id,
            rect: Rect::new(p.left() + 10.0, p.top() - 3.0, 60.0, 60.0),
            speed: 3.0,
            sprite: 0,
        }
    }

    /// Villain that crosses the bottom edge on the next advance
    fn villain_about_to_miss(state: &mut GameState) -> Villain {
        let id = state.next_villain_id();
        Villain {
            id,
            rect: Rect::new(0.0, CANVAS_HEIGHT - 1.0, 60.0, 60.0),
            speed: 5.0,
            sprite: 0,
        }
    }

    /// Villain parked far above the playfield so it cannot interfere
    fn idle_villain(state: &mut GameState) -> Villain {
        let id = state.next_villain_id();
        Villain {
            id,
            rect: Rect::new(0.0, -10_000.0, 60.0, 60.0),
            speed: 0.0,
            sprite: 0,
        }
    }

    #[test]
    fn test_first_frame_spawns_three() {
        let mut state = playing_state();
        assert!(state.villains.is_empty());
        let events = tick(&mut state, &TickInput::default());
        assert_eq!(state.villains.len(), 3);
        assert!(events.is_empty());
    }

    #[test]
    fn test_not_playing_is_frozen() {
        let mut state = GameState::new(1, 3);
        assert_eq!(state.phase, GamePhase::Menu);
        let input = TickInput {
            right: true,
            ..Default::default()
        };
        let x = state.player.rect.left();
        let events = tick(&mut state, &input);
        assert!(events.is_empty());
        assert!(state.villains.is_empty());
        assert_eq!(state.player.rect.left(), x);
        assert_eq!(state.frame, 0);

        state.start_session();
        tick(&mut state, &TickInput::default());
        let snapshot: Vec<f32> = state.villains.iter().map(|v| v.rect.top()).collect();
        state.toggle_pause();
        tick(&mut state, &input);
        let after: Vec<f32> = state.villains.iter().map(|v| v.rect.top()).collect();
        assert_eq!(snapshot, after);
    }

    #[test]
    fn test_keys_move_by_speed_and_clamp() {
        let mut state = playing_state();
        let right = TickInput {
            right: true,
            ..Default::default()
        };
        tick(&mut state, &right);
        assert_eq!(state.player.rect.left(), 210.0);

        for _ in 0..100 {
            tick(&mut state, &right);
        }
        assert_eq!(state.player.rect.left(), CANVAS_WIDTH - PLAYER_SIZE);

        let left = TickInput {
            left: true,
            ..Default::default()
        };
        for _ in 0..100 {
            tick(&mut state, &left);
        }
        assert_eq!(state.player.rect.left(), 0.0);
    }

    #[test]
    fn test_pointer_centers_player() {
        let mut state = playing_state();
        let input = TickInput {
            pointer_x: Some(100.0),
            left: true,
            ..Default::default()
        };
        tick(&mut state, &input);
        assert_eq!(state.player.rect.left(), 60.0);

        let input = TickInput {
            pointer_x: Some(470.0),
            ..Default::default()
        };
        tick(&mut state, &input);
        assert_eq!(state.player.rect.left(), 400.0);
    }

    #[test]
    fn test_non_finite_pointer_keeps_position() {
        let mut state = playing_state();
        for x in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY] {
            let input = TickInput {
                pointer_x: Some(x),
                ..Default::default()
            };
            tick(&mut state, &input);
            assert_eq!(state.player.rect.left(), 200.0);
        }
    }

    #[test]
    fn test_keys_steer_again_after_pointer_release() {
        let mut state = playing_state();
        let drag = TickInput {
            pointer_x: Some(100.0),
            ..Default::default()
        };
        tick(&mut state, &drag);
        assert_eq!(state.player.rect.left(), 60.0);

        let released = TickInput {
            right: true,
            pointer_x: None,
            ..Default::default()
        };
        tick(&mut state, &released);
        assert_eq!(state.player.rect.left(), 70.0);
    }

    #[test]
    fn test_extreme_tuning_does_not_panic() {
        let tuning = Tuning {
            villain_size_jitter: 3e38,
            villain_spawn_stagger: 3e38,
            villain_speed_variance_per_level: 3e38,
            ..Tuning::default()
        };
        let mut state = GameState::with_tuning(8, 3, tuning);
        state.start_session();
        for _ in 0..10 {
            tick(&mut state, &TickInput::default());
        }
        assert!(!state.villains.is_empty());
        for v in &state.villains {
            assert!(v.rect.width().is_finite());
            assert!(v.rect.left() >= 0.0);
        }
    }

    #[test]
    fn test_catch_at_nine_levels_up() {
        let mut state = playing_state();
        state.session.score = 9;
        let catchable = villain_on_player(&mut state);
        let caught_id = catchable.id;
        state.villains.push(catchable);
        let a = idle_villain(&mut state);
        let b = idle_villain(&mut state);
        state.villains.push(a);
        state.villains.push(b);

        let events = tick(&mut state, &TickInput::default());

        assert_eq!(state.session.score, 10);
        assert_eq!(state.session.level, 2);
        assert_eq!(state.session.lives, 3);
        assert_eq!(state.villains.len(), 3);
        assert!(state.villains.iter().all(|v| v.id != caught_id));
        assert_eq!(
            events,
            vec![
                GameEvent::Eat {
                    villain_id: caught_id
                },
                GameEvent::LevelUp { level: 2 },
            ]
        );
    }

    #[test]
    fn test_catch_off_threshold_keeps_level() {
        let mut state = playing_state();
        state.session.score = 15;
        state.session.level = 2;
        let v = villain_on_player(&mut state);
        state.villains.push(v);

        let events = tick(&mut state, &TickInput::default());

        assert_eq!(state.session.score, 16);
        assert_eq!(state.session.level, 2);
        assert!(!events.iter().any(|e| matches!(e, GameEvent::LevelUp { .. })));
    }

    #[test]
    fn test_miss_costs_a_life() {
        let mut state = playing_state();
        let v = villain_about_to_miss(&mut state);
        state.villains.push(v);

        let events = tick(&mut state, &TickInput::default());

        assert_eq!(state.session.lives, 2);
        assert_eq!(state.session.score, 0);
        assert_eq!(state.villains.len(), 3);
        assert_eq!(events, vec![GameEvent::LifeLost { lives: 2 }]);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_last_life_ends_game_once() {
        let mut state = playing_state();
        state.session.lives = 1;
        state.session.score = 42;
        state.session.level = 5;
        let a = villain_about_to_miss(&mut state);
        let b = villain_about_to_miss(&mut state);
        state.villains.push(a);
        state.villains.push(b);

        let events = tick(&mut state, &TickInput::default());

        assert_eq!(state.session.lives, 0);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.session.terminated);
        let game_overs: Vec<_> = events
            .iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .collect();
        assert_eq!(game_overs, vec![&GameEvent::GameOver { score: 42, level: 5 }]);

        // Host forces the gate back open without a restart: still frozen
        state.phase = GamePhase::Playing;
        for _ in 0..500 {
            assert!(tick(&mut state, &TickInput::default()).is_empty());
        }
        assert_eq!(state.session.lives, 0);
        assert_eq!(state.session.score, 42);
        assert_eq!(state.session.level, 5);
    }

    #[test]
    fn test_restart_after_game_over() {
        let mut state = playing_state();
        state.session.lives = 1;
        let v = villain_about_to_miss(&mut state);
        state.villains.push(v);
        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::GameOver);

        state.restart(777);
        assert_eq!(state.session.score, 0);
        assert_eq!(state.session.level, 1);
        assert_eq!(state.session.lives, 3);
        assert!(state.villains.is_empty());
        assert_eq!(state.player.rect.left(), 200.0);

        tick(&mut state, &TickInput::default());
        assert_eq!(state.villains.len(), 3);
    }

    #[test]
    fn test_level_up_tops_up_population() {
        let mut state = playing_state();
        state.session.score = 49;
        state.session.level = 4;
        let v = villain_on_player(&mut state);
        state.villains.push(v);

        tick(&mut state, &TickInput::default());

        assert_eq!(state.session.level, 5);
        assert_eq!(state.villains.len(), target_villain_count(5, &state.tuning));
        assert_eq!(state.villains.len(), 4);
    }

    #[test]
    fn test_autopilot_tracks_lowest_villain() {
        let mut state = playing_state();
        let id = state.next_villain_id();
        state.villains.push(Villain {
            id,
            rect: Rect::new(20.0, 500.0, 60.0, 60.0),
            speed: 3.0,
            sprite: 0,
        });
        let id = state.next_villain_id();
        state.villains.push(Villain {
            id,
            rect: Rect::new(380.0, 100.0, 60.0, 60.0),
            speed: 3.0,
            sprite: 0,
        });

        let input = autopilot_input(&state);
        assert_eq!(input.pointer_x, Some(50.0));
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let mut state1 = playing_state();
        let mut state2 = playing_state();
        let inputs = [
            TickInput {
                left: true,
                ..Default::default()
            },
            TickInput {
                pointer_x: Some(300.0),
                ..Default::default()
            },
            TickInput::default(),
        ];
        for _ in 0..200 {
            for input in &inputs {
                tick(&mut state1, input);
                tick(&mut state2, input);
            }
        }
        assert_eq!(state1.session, state2.session);
        assert_eq!(state1.villains.len(), state2.villains.len());
        for (a, b) in state1.villains.iter().zip(&state2.villains) {
            assert_eq!(a.id, b.id);
            assert_eq!(a.rect, b.rect);
        }
    }

    #[derive(Debug, Clone)]
    enum Action {
        Left,
        Right,
        Pointer(f32),
        Idle,
        Auto,
    }

    fn action() -> impl Strategy<Value = Action> {
        prop_oneof![
            Just(Action::Left),
            Just(Action::Right),
            (-1000.0f32..1500.0).prop_map(Action::Pointer),
            Just(Action::Idle),
            Just(Action::Auto),
        ]
    }

    fn to_input(action: &Action) -> TickInput {
        match action {
            Action::Left => TickInput {
                left: true,
                ..Default::default()
            },
            Action::Right => TickInput {
                right: true,
                ..Default::default()
            },
            Action::Pointer(x) => TickInput {
                pointer_x: Some(*x),
                ..Default::default()
            },
            Action::Idle => TickInput::default(),
            Action::Auto => TickInput {
                autopilot: true,
                ..Default::default()
            },
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_frame_invariants(seed in any::<u64>(), actions in prop::collection::vec(action(), 1..400)) {
            let mut state = GameState::new(seed, 3);
            state.start_session();
            let mut game_overs = 0;

            for action in &actions {
                let before = state.session;
                let was_playing = state.phase == GamePhase::Playing;
                let events = tick(&mut state, &to_input(action));

                let eats = events.iter().filter(|e| matches!(e, GameEvent::Eat { .. })).count() as u64;
                let misses = events.iter().filter(|e| matches!(e, GameEvent::LifeLost { .. })).count() as i32;
                let level_ups = events.iter().filter(|e| matches!(e, GameEvent::LevelUp { .. })).count() as u32;
                game_overs += events.iter().filter(|e| matches!(e, GameEvent::GameOver { .. })).count();

                prop_assert!(state.player.rect.left() >= 0.0);
                prop_assert!(state.player.rect.left() <= CANVAS_WIDTH - PLAYER_SIZE);
                prop_assert_eq!(state.session.score, before.score + eats);
                prop_assert_eq!(state.session.lives, before.lives - misses);
                prop_assert_eq!(state.session.level, before.level + level_ups);

                if was_playing {
                    prop_assert_eq!(
                        state.villains.len(),
                        target_villain_count(state.session.level, &state.tuning)
                    );
                }
            }

            prop_assert!(game_overs <= 1);
            if state.session.lives <= 0 {
                prop_assert_eq!(game_overs, 1);
                prop_assert_eq!(state.phase, GamePhase::GameOver);
            }
        }
    }
}
