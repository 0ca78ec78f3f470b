//! Algapuri entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, HtmlImageElement, KeyboardEvent, MouseEvent, TouchEvent};

    use algapuri::assets::{AssetManifest, Assets, load_assets};
    use algapuri::audio::AudioManager;
    use algapuri::platform::{LocalStorage, MemoryStorage, PointerDrag, Storage};
    use algapuri::renderer::{CanvasRenderer, backing_size, draw_list};
    use algapuri::sim::{GameEvent, GamePhase, GameState, TickInput, tick};
    use algapuri::{BestScore, Settings, display_to_logical_x};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        renderer: Option<CanvasRenderer>,
        assets: Option<Assets<HtmlImageElement>>,
        input: TickInput,
        drag: PointerDrag,
        storage: Box<dyn Storage>,
        settings: Settings,
        best: BestScore,
        audio: AudioManager,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        fn new(seed: u64, manifest: &AssetManifest) -> Self {
            let storage: Box<dyn Storage> = match LocalStorage::open() {
                Some(storage) => Box::new(storage),
                None => {
                    log::warn!("LocalStorage unavailable - progress will not persist");
                    Box::new(MemoryStorage::new())
                }
            };
            let settings = Settings::load(storage.as_ref());
            let best = BestScore::load(storage.as_ref());

            let mut state = GameState::new(seed, manifest.villains.len());
            state.phase = GamePhase::Loading;

            Self {
                state,
                renderer: None,
                assets: None,
                input: TickInput::default(),
                drag: PointerDrag::new(),
                storage,
                settings,
                best,
                audio: AudioManager::new(manifest),
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        /// Assets resolved - size the session to the sprites we actually have
        fn assets_ready(&mut self, assets: Assets<HtmlImageElement>) {
            self.state.sprite_count = assets.villain_count();
            self.assets = Some(assets);
            self.state.phase = GamePhase::Menu;
            log::info!("Assets ready, showing menu");
        }

        fn start(&mut self) {
            if !matches!(self.state.phase, GamePhase::Menu | GamePhase::GameOver) {
                return;
            }
            let seed = js_sys::Date::now() as u64;
            self.state.restart(seed);
            self.input = TickInput {
                autopilot: self.input.autopilot,
                ..Default::default()
            };
            self.drag.release();
            log::info!("Started new game with seed: {}", seed);
        }

        /// Run one simulation frame and react to its events
        fn update(&mut self, time: f64) {
            self.input.pointer_x = self.drag.pointer_x();
            let events = tick(&mut self.state, &self.input);

            for event in events {
                match event {
                    GameEvent::Eat { .. } => self.audio.play_eat(&self.settings),
                    GameEvent::GameOver { score, level } => {
                        log::info!("Final score {} at level {}", score, level);
                        if self.best.record(score) {
                            self.best.save(self.storage.as_mut());
                        }
                    }
                    GameEvent::LevelUp { .. } | GameEvent::LifeLost { .. } => {}
                }
            }

            self.audio.sync(self.state.phase, &self.settings);

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;
            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }
        }

        /// Render the current frame
        fn render(&self) {
            if let (Some(renderer), Some(assets)) = (&self.renderer, &self.assets) {
                renderer.render(&draw_list(&self.state), assets);
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let session = &self.state.session;

            set_text(&document, "hud-score", &session.score.to_string());
            set_text(&document, "hud-level", &session.level.to_string());
            set_text(&document, "hud-lives", &session.lives.max(0).to_string());
            set_text(&document, "hud-best", &self.best.score.to_string());
            set_visible(&document, "hud-fps", self.settings.show_fps);
            if self.settings.show_fps {
                set_text(&document, "hud-fps", &format!("{} FPS", self.fps));
            }

            let phase = self.state.phase;
            set_visible(&document, "loading", phase == GamePhase::Loading);
            set_visible(&document, "menu", phase == GamePhase::Menu);
            set_visible(&document, "hud", matches!(phase, GamePhase::Playing | GamePhase::Paused));
            set_visible(&document, "pause-menu", phase == GamePhase::Paused);
            set_visible(&document, "game-over", phase == GamePhase::GameOver);
            if phase == GamePhase::GameOver {
                set_text(&document, "final-score", &session.score.to_string());
                set_text(&document, "final-level", &session.level.to_string());
            }

            set_text(
                &document,
                "music-btn",
                if self.settings.music_enabled { "Music: On" } else { "Music: Off" },
            );
            set_text(
                &document,
                "sfx-btn",
                if self.settings.sfx_enabled { "SFX: On" } else { "SFX: Off" },
            );
        }
    }

    fn set_text(document: &web_sys::Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            if el.text_content().as_deref() != Some(text) {
                el.set_text_content(Some(text));
            }
        }
    }

    fn set_visible(document: &web_sys::Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&JsValue::from_str(&format!("Failed to init logger: {e}")));
        }

        log::info!("Algapuri starting...");

        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };
        let Some(canvas) = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No #canvas element");
            return;
        };

        fit_canvas(&window, &canvas);

        let manifest = AssetManifest::default();
        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, &manifest)));
        game.borrow_mut().renderer = CanvasRenderer::new(&canvas);

        setup_resize(&canvas, game.clone());
        setup_input_handlers(&canvas, game.clone());
        setup_buttons(game.clone());
        setup_auto_pause(game.clone());

        // Loop runs while assets load so the loading screen stays live
        request_animation_frame(game.clone());

        match load_assets(&manifest).await {
            Some(assets) => game.borrow_mut().assets_ready(assets),
            None => log::error!("No villain sprites could be loaded"),
        }

        log::info!("Algapuri running!");
    }

    /// Backing store follows the displayed size times DPR
    fn fit_canvas(window: &web_sys::Window, canvas: &HtmlCanvasElement) -> (u32, u32) {
        let (width, height) = backing_size(
            canvas.client_width() as f64,
            canvas.client_height() as f64,
            window.device_pixel_ratio(),
        );
        canvas.set_width(width);
        canvas.set_height(height);
        (width, height)
    }

    fn setup_resize(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let canvas = canvas.clone();
        let window_clone = window.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let (width, height) = fit_canvas(&window_clone, &canvas);
            if let Some(renderer) = game.borrow_mut().renderer.as_mut() {
                renderer.resize(width, height);
            }
            log::debug!("Canvas resized to {}x{}", width, height);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Pointer x relative to the canvas, in logical coordinates
    fn logical_x(canvas: &HtmlCanvasElement, client_x: f64) -> f32 {
        let rect = canvas.get_bounding_client_rect();
        display_to_logical_x((client_x - rect.left()) as f32, rect.width() as f32)
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Keyboard down
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowLeft" => g.input.left = true,
                    "ArrowRight" => g.input.right = true,
                    " " | "Enter" => g.start(),
                    "p" | "P" | "Escape" => g.state.toggle_pause(),
                    "i" | "I" => {
                        g.input.autopilot = !g.input.autopilot;
                        log::info!("Autopilot: {}", g.input.autopilot);
                    }
                    "f" | "F" => {
                        let g = &mut *g;
                        g.settings.toggle_fps();
                        g.settings.save(g.storage.as_mut());
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard up
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowLeft" => g.input.left = false,
                    "ArrowRight" => g.input.right = false,
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch drag
        for event_name in ["touchstart", "touchmove"] {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                let mut g = game.borrow_mut();
                if !g.state.is_playing() {
                    return;
                }
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let x = logical_x(&canvas_clone, touch.client_x() as f64);
                    if event.type_() == "touchstart" {
                        g.drag.press(x);
                    } else {
                        g.drag.drag(x);
                    }
                }
            });
            let _ = canvas
                .add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse drag (primary button held)
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                if event.button() == 0 && g.state.is_playing() {
                    g.drag.press(logical_x(&canvas_clone, event.client_x() as f64));
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                if event.buttons() & 1 == 1 {
                    g.drag.drag(logical_x(&canvas_clone, event.client_x() as f64));
                } else {
                    g.drag.release();
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Any release hands control back to the keys
        for event_name in ["touchend", "touchcancel", "mouseup", "mouseleave"] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow_mut().drag.release();
            });
            let _ = canvas
                .add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
        // The button may come up outside the canvas
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow_mut().drag.release();
            });
            let _ = window
                .add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn on_click(document: &web_sys::Document, id: &str, handler: impl FnMut(MouseEvent) + 'static) {
        if let Some(btn) = document.get_element_by_id(id) {
            let closure = Closure::<dyn FnMut(MouseEvent)>::new(handler);
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        for id in ["start-btn", "restart-btn"] {
            let game = game.clone();
            on_click(&document, id, move |_| game.borrow_mut().start());
        }

        {
            let game = game.clone();
            on_click(&document, "resume-btn", move |_| game.borrow_mut().state.toggle_pause());
        }

        {
            let game = game.clone();
            on_click(&document, "music-btn", move |_| {
                let mut g = game.borrow_mut();
                let g = &mut *g;
                g.settings.toggle_music();
                g.settings.save(g.storage.as_mut());
            });
        }

        on_click(&document, "sfx-btn", move |_| {
            let mut g = game.borrow_mut();
            let g = &mut *g;
            g.settings.toggle_sfx();
            g.settings.save(g.storage.as_mut());
        });
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        // Visibility change (tab switch, minimize)
        let document_clone = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                let mut g = game.borrow_mut();
                if g.state.phase == GamePhase::Playing {
                    g.state.toggle_pause();
                    log::info!("Auto-paused (tab hidden)");
                }
                if g.settings.mute_on_blur {
                    g.audio.pause_all();
                }
            }
        });
        let _ = document
            .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            g.update(time);
            g.render();
            g.update_hud();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;

    use anyhow::{Context, Result, bail};

    use algapuri::assets::AssetManifest;
    use algapuri::platform::FileStorage;
    use algapuri::sim::{GameEvent, GameState, TickInput, tick};
    use algapuri::{BestScore, Tuning};

    const USAGE: &str = "algapuri [--seed N] [--frames N] [--tuning FILE] [--store FILE]";

    /// Five minutes at 60 Hz
    const DEFAULT_FRAMES: u64 = 5 * 60 * 60;

    struct Options {
        seed: u64,
        frames: u64,
        tuning: Option<PathBuf>,
        store: PathBuf,
    }

    fn parse_args() -> Result<Options> {
        let mut opts = Options {
            seed: 0x5eed,
            frames: DEFAULT_FRAMES,
            tuning: None,
            store: PathBuf::from("algapuri-store.json"),
        };

        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            let value = args.next().with_context(|| format!("{arg} needs a value\n\n{USAGE}"));
            match arg.as_str() {
                "--seed" => opts.seed = value?.parse().context("--seed must be an integer")?,
                "--frames" => {
                    opts.frames = value?.parse().context("--frames must be an integer")?
                }
                "--tuning" => opts.tuning = Some(PathBuf::from(value?)),
                "--store" => opts.store = PathBuf::from(value?),
                _ => bail!("Unknown argument {arg}\n\nUsage:\n  {USAGE}"),
            }
        }
        Ok(opts)
    }

    /// Play one autopilot session without a display
    pub fn run() -> Result<()> {
        let opts = parse_args()?;

        let tuning = match &opts.tuning {
            Some(path) => Tuning::load(path)?,
            None => Tuning::default(),
        };
        let mut storage = FileStorage::open(&opts.store)?;
        let mut best = BestScore::load(&storage);

        let sprites = AssetManifest::default().villains.len();
        let mut state = GameState::with_tuning(opts.seed, sprites, tuning);
        state.start_session();

        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        let mut misses = 0u32;
        let mut finished = false;

        while state.frame < opts.frames && !finished {
            for event in tick(&mut state, &input) {
                match event {
                    GameEvent::LifeLost { lives } => {
                        misses += 1;
                        log::info!("Missed a villain, {} lives left", lives.max(0));
                    }
                    GameEvent::GameOver { .. } => finished = true,
                    GameEvent::Eat { .. } | GameEvent::LevelUp { .. } => {}
                }
            }
        }

        let session = state.session;
        let new_best = best.record(session.score);
        if new_best {
            best.save(&mut storage);
        }

        println!(
            "{} after {} frames: score {}, level {}, lives {}, misses {}",
            if finished { "Game over" } else { "Stopped" },
            state.frame,
            session.score,
            session.level,
            session.lives.max(0),
            misses
        );
        println!(
            "Best score: {}{}",
            best.score,
            if new_best { " (new!)" } else { "" }
        );
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Algapuri (native) starting - headless autopilot run");

    if let Err(e) = headless::run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
