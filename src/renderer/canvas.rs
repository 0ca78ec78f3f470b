//! 2D canvas painter for the web build
//!
//! Scales the logical 480x800 playfield to the canvas backing size.

use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use super::{DrawCommand, Sprite};
use crate::assets::Assets;
use crate::consts::{CANVAS_HEIGHT, CANVAS_WIDTH};

/// Solid color used when no background image is available
const BACKGROUND_FILL: &str = "#1e293b";

pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
    /// Canvas backing size in device pixels
    pub size: (u32, u32),
}

impl CanvasRenderer {
    pub fn new(canvas: &HtmlCanvasElement) -> Option<Self> {
        use wasm_bindgen::JsCast;

        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        ctx.set_image_smoothing_enabled(true);

        Some(Self {
            ctx,
            size: (canvas.width(), canvas.height()),
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.size = (width, height);
    }

    fn scale(&self) -> (f64, f64) {
        (
            self.size.0 as f64 / CANVAS_WIDTH as f64,
            self.size.1 as f64 / CANVAS_HEIGHT as f64,
        )
    }

    /// Paint a draw list
    pub fn render(&self, commands: &[DrawCommand], assets: &Assets<HtmlImageElement>) {
        let (sx, sy) = self.scale();
        self.ctx
            .clear_rect(0.0, 0.0, self.size.0 as f64, self.size.1 as f64);

        for cmd in commands {
            let x = cmd.rect.left() as f64 * sx;
            let y = cmd.rect.top() as f64 * sy;
            let w = cmd.rect.width() as f64 * sx;
            let h = cmd.rect.height() as f64 * sy;

            match (assets.image(cmd.sprite), cmd.sprite) {
                (Some(img), _) => {
                    if let Err(e) = self
                        .ctx
                        .draw_image_with_html_image_element_and_dw_and_dh(img, x, y, w, h)
                    {
                        log::warn!("draw_image failed for {:?}: {:?}", cmd.sprite, e);
                    }
                }
                (None, Sprite::Background | Sprite::MenuBackground) => {
                    self.ctx.set_fill_style_str(BACKGROUND_FILL);
                    self.ctx.fill_rect(x, y, w, h);
                }
                // Missing villain sprite: skip rather than draw a placeholder
                (None, _) => {}
            }
        }
    }
}
