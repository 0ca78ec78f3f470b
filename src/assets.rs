//! Sprite manifest and loaded asset handles
//!
//! Every image has a bundled path and a remote fallback. On the web the loader
//! walks path -> fallback -> 1x1 solid pixel, so the simulation always gets a
//! usable handle for every sprite.

use serde::{Deserialize, Serialize};

use crate::renderer::Sprite;

/// Primary location plus fallback for one image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSource {
    pub path: String,
    pub fallback: String,
}

impl ImageSource {
    pub fn new(path: &str, fallback: &str) -> Self {
        Self {
            path: path.to_string(),
            fallback: fallback.to_string(),
        }
    }

    /// Sources to try in order
    pub fn candidates(&self) -> [&str; 2] {
        [&self.path, &self.fallback]
    }
}

/// Where every image and sound lives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetManifest {
    pub hero: ImageSource,
    pub background: ImageSource,
    pub menu_background: ImageSource,
    /// Villain sprites, selected by index
    pub villains: Vec<ImageSource>,
    pub music_menu: String,
    pub music_game: String,
    pub sfx_eat: String,
}

impl Default for AssetManifest {
    fn default() -> Self {
        Self {
            hero: ImageSource::new("assets/hero.png", "https://picsum.photos/seed/hero/100/100"),
            background: ImageSource::new(
                "assets/bg.png",
                "https://picsum.photos/seed/algapuri-bg/800/600",
            ),
            menu_background: ImageSource::new(
                "assets/mainmm.png",
                "https://images.unsplash.com/photo-1614850523296-d8c1af93d400?auto=format&fit=crop&q=80&w=800",
            ),
            villains: vec![
                ImageSource::new("assets/villain1.png", "https://picsum.photos/seed/v1/80/80"),
                ImageSource::new("assets/villain2.png", "https://picsum.photos/seed/v2/80/80"),
                ImageSource::new("assets/villain3.png", "https://picsum.photos/seed/v3/80/80"),
            ],
            music_menu: "assets/game-music.mp3".to_string(),
            music_game: "assets/game-music.mp3".to_string(),
            sfx_eat: "assets/eat.mp3".to_string(),
        }
    }
}

/// Loaded sprite handles, generic over the host's image type
#[derive(Debug, Clone)]
pub struct Assets<T> {
    pub hero: T,
    /// `None` paints a solid fill instead
    pub background: Option<T>,
    pub menu_background: Option<T>,
    villains: Vec<T>,
}

impl<T> Assets<T> {
    /// Bundle handles; `None` when no villain sprite is available
    pub fn new(
        hero: T,
        background: Option<T>,
        menu_background: Option<T>,
        villains: Vec<T>,
    ) -> Option<Self> {
        if villains.is_empty() {
            return None;
        }
        Some(Self {
            hero,
            background,
            menu_background,
            villains,
        })
    }

    pub fn villain(&self, index: usize) -> Option<&T> {
        self.villains.get(index)
    }

    /// Number of villain sprites; always at least one
    pub fn villain_count(&self) -> usize {
        self.villains.len()
    }

    /// Image for a draw-list sprite. The menu art falls back to the in-game background.
    pub fn image(&self, sprite: Sprite) -> Option<&T> {
        match sprite {
            Sprite::Background => self.background.as_ref(),
            Sprite::MenuBackground => self
                .menu_background
                .as_ref()
                .or(self.background.as_ref()),
            Sprite::Hero => Some(&self.hero),
            Sprite::Villain(index) => self.villain(index),
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::load_assets;

#[cfg(target_arch = "wasm32")]
mod web {
    use wasm_bindgen::{JsCast, JsValue};
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

    use super::{AssetManifest, Assets, ImageSource};

    const FALLBACK_PIXEL: &str = "#1e293b";

    async fn try_load(src: &str) -> Result<HtmlImageElement, JsValue> {
        let img = HtmlImageElement::new()?;
        img.set_cross_origin(Some("anonymous"));
        img.set_src(src);
        JsFuture::from(img.decode()).await?;
        Ok(img)
    }

    /// A 1x1 solid pixel, used when both sources fail
    async fn fallback_pixel() -> Result<HtmlImageElement, JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let canvas: HtmlCanvasElement = document.create_element("canvas")?.dyn_into()?;
        canvas.set_width(1);
        canvas.set_height(1);
        if let Some(ctx) = canvas.get_context("2d")? {
            let ctx: CanvasRenderingContext2d = ctx.dyn_into()?;
            ctx.set_fill_style_str(FALLBACK_PIXEL);
            ctx.fill_rect(0.0, 0.0, 1.0, 1.0);
        }
        try_load(&canvas.to_data_url()?).await
    }

    async fn load_image(source: &ImageSource) -> Option<HtmlImageElement> {
        for src in source.candidates() {
            match try_load(src).await {
                Ok(img) => return Some(img),
                Err(e) => log::warn!("Failed to load {}: {:?}", src, e),
            }
        }
        match fallback_pixel().await {
            Ok(img) => Some(img),
            Err(e) => {
                log::error!("Fallback pixel failed for {}: {:?}", source.path, e);
                None
            }
        }
    }

    /// Load every image in the manifest, falling back as needed
    pub async fn load_assets(manifest: &AssetManifest) -> Option<Assets<HtmlImageElement>> {
        let hero = load_image(&manifest.hero).await?;
        let background = load_image(&manifest.background).await;
        let menu_background = load_image(&manifest.menu_background).await;

        let mut villains = Vec::with_capacity(manifest.villains.len());
        for source in &manifest.villains {
            if let Some(img) = load_image(source).await {
                villains.push(img);
            }
        }

        log::info!("Loaded {} villain sprites", villains.len());
        Assets::new(hero, background, menu_background, villains)
    }
}
