//! Audio: looping music per phase plus the eat sound effect
//!
//! Track selection is platform independent; playback uses HTML audio
//! elements on the web.

use crate::sim::GamePhase;

/// Background music tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Track {
    Menu,
    Game,
}

/// Which track should be playing in a phase (`None` = silence)
pub fn music_for_phase(phase: GamePhase) -> Option<Track> {
    match phase {
        GamePhase::Menu | GamePhase::GameOver => Some(Track::Menu),
        GamePhase::Playing => Some(Track::Game),
        GamePhase::Loading | GamePhase::Paused => None,
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::HtmlAudioElement;

    use super::{Track, music_for_phase};
    use crate::assets::AssetManifest;
    use crate::settings::Settings;
    use crate::sim::GamePhase;

    /// Audio manager for the game
    pub struct AudioManager {
        menu_music: Option<HtmlAudioElement>,
        game_music: Option<HtmlAudioElement>,
        eat_sfx: Option<HtmlAudioElement>,
        current: Option<Track>,
    }

    fn looping(src: &str) -> Option<HtmlAudioElement> {
        let el = HtmlAudioElement::new_with_src(src).ok()?;
        el.set_loop(true);
        Some(el)
    }

    /// Start playback; browsers reject autoplay before a user gesture
    fn play(el: &HtmlAudioElement) {
        match el.play() {
            Ok(promise) => {
                wasm_bindgen_futures::spawn_local(async move {
                    if let Err(e) = wasm_bindgen_futures::JsFuture::from(promise).await {
                        log::debug!("Audio playback rejected: {:?}", e);
                    }
                });
            }
            Err(e) => log::warn!("Audio play failed: {:?}", e),
        }
    }

    impl AudioManager {
        pub fn new(manifest: &AssetManifest) -> Self {
            let eat_sfx = HtmlAudioElement::new_with_src(&manifest.sfx_eat).ok();
            let menu_music = looping(&manifest.music_menu);
            let game_music = looping(&manifest.music_game);
            if eat_sfx.is_none() || menu_music.is_none() || game_music.is_none() {
                log::warn!("Some audio elements could not be created - running partly silent");
            }
            Self {
                menu_music,
                game_music,
                eat_sfx,
                current: None,
            }
        }

        fn element(&self, track: Track) -> Option<&HtmlAudioElement> {
            match track {
                Track::Menu => self.menu_music.as_ref(),
                Track::Game => self.game_music.as_ref(),
            }
        }

        /// Switch music to match the phase and settings
        pub fn sync(&mut self, phase: GamePhase, settings: &Settings) {
            let wanted = if settings.music_enabled {
                music_for_phase(phase)
            } else {
                None
            };

            for track in [Track::Menu, Track::Game] {
                if let Some(el) = self.element(track) {
                    el.set_volume(settings.effective_music_volume() as f64);
                    if Some(track) != wanted {
                        let _ = el.pause();
                    }
                }
            }

            if wanted != self.current {
                if let Some(el) = wanted.and_then(|t| self.element(t)) {
                    play(el);
                }
                self.current = wanted;
            }
        }

        /// Stop all music (tab hidden)
        pub fn pause_all(&mut self) {
            for el in [&self.menu_music, &self.game_music].into_iter().flatten() {
                let _ = el.pause();
            }
            self.current = None;
        }

        /// Play the eat effect from the start
        pub fn play_eat(&self, settings: &Settings) {
            if !settings.sfx_enabled {
                return;
            }
            if let Some(el) = &self.eat_sfx {
                el.set_volume(settings.effective_sfx_volume() as f64);
                el.set_current_time(0.0);
                play(el);
            }
        }
    }
}
