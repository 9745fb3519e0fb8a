//! Sprite and audio capabilities for the game drivers.
//!
//! Images load asynchronously by path; a draw before the image has finished
//! loading is a silent no-op, so a tick can always run regardless of asset
//! state. Audio playback is fire-and-forget: the returned promise is dropped
//! and completion is never tracked, because gameplay never depends on it.

use rand::Rng;
use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlAudioElement, HtmlImageElement};

/// A single image drawn at a fixed on-canvas size.
pub struct Sprite {
    img: HtmlImageElement,
    pub w: f64,
    pub h: f64,
}

impl Sprite {
    pub fn load(path: &str, w: f64, h: f64) -> Result<Sprite, JsValue> {
        let img = HtmlImageElement::new()?;
        img.set_src(path);
        Ok(Sprite { img, w, h })
    }

    /// Draw at `(x, y)` top-left. No-op until the image has loaded.
    pub fn draw(&self, ctx: &CanvasRenderingContext2d, x: f64, y: f64) {
        if !self.img.complete() {
            return;
        }
        ctx.draw_image_with_html_image_element_and_dw_and_dh(&self.img, x, y, self.w, self.h)
            .ok();
    }
}

/// A horizontal strip of equally sized animation frames.
pub struct SpriteSheet {
    img: HtmlImageElement,
    frame_w: f64,
    frame_h: f64,
    pub frames: u32,
}

impl SpriteSheet {
    pub fn load(path: &str, frame_w: f64, frame_h: f64, frames: u32) -> Result<SpriteSheet, JsValue> {
        let img = HtmlImageElement::new()?;
        img.set_src(path);
        Ok(SpriteSheet {
            img,
            frame_w,
            frame_h,
            frames,
        })
    }

    /// Draw frame `frame % self.frames` centered on `(cx, cy)` scaled to
    /// `dw`×`dh`. No-op until the image has loaded.
    pub fn draw_frame(
        &self,
        ctx: &CanvasRenderingContext2d,
        frame: u32,
        cx: f64,
        cy: f64,
        dw: f64,
        dh: f64,
    ) {
        if !self.img.complete() || self.frames == 0 {
            return;
        }
        let sx = (frame % self.frames) as f64 * self.frame_w;
        ctx.draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
            &self.img,
            sx,
            0.0,
            self.frame_w,
            self.frame_h,
            cx - dw / 2.0,
            cy - dh / 2.0,
            dw,
            dh,
        )
        .ok();
    }
}

/// A small fixed set of one-shot sound cues.
pub struct SoundBank {
    clips: Vec<HtmlAudioElement>,
}

impl SoundBank {
    pub fn load(paths: &[&str]) -> Result<SoundBank, JsValue> {
        let mut clips = Vec::with_capacity(paths.len());
        for path in paths {
            clips.push(HtmlAudioElement::new_with_src(path)?);
        }
        Ok(SoundBank { clips })
    }

    /// Play one randomly chosen clip from the bank, restarting it if it is
    /// already playing. Errors (autoplay policy, decode failure) are ignored.
    pub fn play_random(&self, rng: &mut impl Rng) {
        if self.clips.is_empty() {
            return;
        }
        let clip = &self.clips[rng.gen_range(0..self.clips.len())];
        clip.set_current_time(0.0);
        let _ = clip.play();
    }
}
