//! Lamoland arcade crate.
//!
//! The two canvas mini-games of the pet site: "Jump Jump Jackaloaf" (vertical
//! jumper) and "Feeding Time" (pointer-chase feeding game). Each game is a
//! pure simulation (`jumper::JumperSim`, `feeding::FeedingSim`) driven by a
//! per-frame web loop; the page attaches a game to a canvas via `start_*` and
//! can read the live score or request a restart through the exported getters.

use wasm_bindgen::prelude::*;

pub mod assets;
pub mod feeding;
pub mod geom;
pub mod jumper;

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Session state of a frame driver. Terminal once `GameOver`; only an
/// explicit restart input returns to `Running`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Running,
    GameOver,
}

/// Which sprite variant an entity is drawn with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Facing {
    Left,
    Right,
}

// -----------------------------------------------------------------------------
// Page-facing entry points
// -----------------------------------------------------------------------------

/// Attach the jumper to the canvas with the given element id.
#[wasm_bindgen]
pub fn start_jumper(canvas_id: &str) -> Result<(), JsValue> {
    jumper::start(canvas_id)
}

/// Attach the feeding game to the canvas with the given element id.
#[wasm_bindgen]
pub fn start_feeding(canvas_id: &str) -> Result<(), JsValue> {
    feeding::start(canvas_id)
}

/// Current jumper score, 0 if no session is running.
#[wasm_bindgen]
pub fn jumper_score() -> u32 {
    jumper::current_score()
}

/// Lamocoins banked by the running jumper session.
#[wasm_bindgen]
pub fn jumper_coins() -> u32 {
    jumper::current_coins()
}

/// Current feeding-game score, 0 if no session is running.
#[wasm_bindgen]
pub fn feeding_score() -> u32 {
    feeding::current_score()
}

/// Restart the jumper session (same effect as the in-game restart key).
#[wasm_bindgen]
pub fn restart_jumper() {
    jumper::restart();
}

/// Restart the feeding session (same effect as the in-game restart key).
#[wasm_bindgen]
pub fn restart_feeding() {
    feeding::restart();
}
