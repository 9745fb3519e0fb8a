//! "Jump Jump Jackaloaf" — the vertical jumper.
//!
//! The jackaloaf falls under gravity and bounces off clouds; while it ascends
//! above the upper band of the canvas the clouds slide down instead, which
//! reads as the player climbing. Horizontal exits wrap to the opposite edge.
//! Scoring is ratcheted: an internal watermark rises while ascending and
//! falls while descending, and the displayed score only ever rises to meet
//! the watermark. Falling below the canvas ends the session; Space restarts.
//!
//! `JumperSim` is pure (no web types) so it runs under host `cargo test`;
//! the driver half of this module owns the canvas, the keyboard listener and
//! the `requestAnimationFrame` loop.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, window};

use crate::assets::Sprite;
use crate::geom::Aabb;
use crate::{Facing, Phase};

// --- Tuning constants --------------------------------------------------------

pub const CANVAS_W: f64 = 700.0;
pub const CANVAS_H: f64 = 500.0;

pub const PLAYER_W: f64 = 90.0;
pub const PLAYER_H: f64 = 135.0;
pub const GRAVITY: f64 = 0.7;
pub const JUMP_VELOCITY: f64 = -12.0;
pub const RUN_SPEED: f64 = 4.0;
/// Re-entry x after exiting past the right edge.
pub const WRAP_REENTRY_X: f64 = -80.0;

pub const CLOUD_W: f64 = 194.0;
pub const CLOUD_H: f64 = 108.0;
/// Clouds slide down this much per tick while the player is climbing.
const CLOUD_SCROLL: f64 = -JUMP_VELOCITY;
/// The player must be above this fraction of the canvas height to scroll clouds.
const CLIMB_BAND: f64 = 0.75;
/// Clouds stacked above the starting cloud at session start.
const START_CLOUDS: usize = 6;

/// Random score points drawn per tick lie in `[0, MAX_TICK_POINTS)`.
pub const MAX_TICK_POINTS: u32 = 50;
/// Site currency conversion shown on the game-over overlay.
const COINS_PER_SCORE: u32 = 20;

// --- Simulation --------------------------------------------------------------

#[derive(Clone, Copy, Debug)]
pub struct Player {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub facing: Facing,
}

impl Player {
    fn spawn() -> Self {
        Player {
            x: CANVAS_W / 2.0 - PLAYER_W / 2.0,
            y: CANVAS_H / 2.0 - PLAYER_H / 2.0,
            vx: 0.0,
            vy: JUMP_VELOCITY,
            facing: Facing::Right,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.x, self.y, PLAYER_W, PLAYER_H)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cloud {
    pub x: f64,
    pub y: f64,
}

impl Cloud {
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.x, self.y, CLOUD_W, CLOUD_H)
    }

    /// A replacement cloud just above the top edge at a random x.
    fn spawn_top(rng: &mut impl Rng) -> Cloud {
        Cloud {
            x: rng.gen_range(0.0..CANVAS_W * 0.75),
            y: -CLOUD_H,
        }
    }
}

/// One jumper session. Owned by the frame driver; input handlers only touch
/// the player-intent fields and the restart transition.
pub struct JumperSim {
    pub player: Player,
    /// Active clouds, front = oldest spawn.
    pub clouds: Vec<Cloud>,
    /// Displayed score. Never decreases within a session.
    pub score: u32,
    watermark: i64,
    pub phase: Phase,
}

impl JumperSim {
    pub fn new(rng: &mut impl Rng) -> Self {
        JumperSim {
            player: Player::spawn(),
            clouds: Self::initial_clouds(rng),
            score: 0,
            watermark: 0,
            phase: Phase::Running,
        }
    }

    /// Starting layout: one cloud directly under the player plus a stack
    /// climbing off the top of the canvas at random lateral positions.
    fn initial_clouds(rng: &mut impl Rng) -> Vec<Cloud> {
        let mut clouds = Vec::with_capacity(1 + START_CLOUDS);
        clouds.push(Cloud {
            x: CANVAS_W / 2.0,
            y: CANVAS_H - 120.0,
        });
        for i in 0..START_CLOUDS {
            clouds.push(Cloud {
                x: rng.gen_range(0.0..CANVAS_W * 0.75),
                y: CANVAS_H - 190.0 * i as f64 - 300.0,
            });
        }
        clouds
    }

    /// Full reinit: initial score, player position/velocity and cloud set.
    pub fn reset(&mut self, rng: &mut impl Rng) {
        *self = JumperSim::new(rng);
    }

    /// One frame of simulation. A no-op once the session has ended.
    pub fn tick(&mut self, rng: &mut impl Rng) {
        if self.phase == Phase::GameOver {
            return;
        }
        self.advance_player();
        self.update_clouds();
        self.retire_clouds(rng);
        self.apply_points(rng.gen_range(0..MAX_TICK_POINTS));
    }

    fn advance_player(&mut self) {
        let p = &mut self.player;
        p.x += p.vx;
        // Exits wrap to the opposite edge, never clamp.
        if p.x > CANVAS_W {
            p.x = WRAP_REENTRY_X;
        } else if p.x + PLAYER_W < 0.0 {
            p.x = CANVAS_W;
        }
        p.vy += GRAVITY;
        p.y += p.vy;
        if p.y > CANVAS_H {
            self.phase = Phase::GameOver;
        }
    }

    fn update_clouds(&mut self) {
        // Scroll decision is made once per tick from the post-gravity velocity.
        let climbing = self.player.vy < 0.0 && self.player.y < CANVAS_H * CLIMB_BAND;
        let falling = self.player.vy >= 0.0;
        let player_box = self.player.bounds();
        let mut bounce = false;
        for cloud in &mut self.clouds {
            if climbing {
                cloud.y += CLOUD_SCROLL;
            }
            if falling && player_box.overlaps(&cloud.bounds()) {
                bounce = true;
            }
        }
        if bounce {
            self.player.vy = JUMP_VELOCITY;
        }
    }

    /// Remove every cloud that has fully scrolled past the bottom edge and
    /// spawn one replacement per removal, so no stale cloud survives into the
    /// next tick's collision pass.
    fn retire_clouds(&mut self, rng: &mut impl Rng) {
        let before = self.clouds.len();
        self.clouds.retain(|c| c.y < CANVAS_H);
        for _ in self.clouds.len()..before {
            self.clouds.push(Cloud::spawn_top(rng));
        }
    }

    /// Ratchet scoring: points raise the watermark while ascending and lower
    /// it while descending; the displayed score only rises to meet it.
    pub fn apply_points(&mut self, points: u32) {
        if self.player.vy < 0.0 {
            self.watermark += i64::from(points);
            if self.watermark > i64::from(self.score) {
                self.score = self.watermark as u32;
            }
        } else {
            self.watermark -= i64::from(points);
        }
    }

    pub fn watermark(&self) -> i64 {
        self.watermark
    }

    /// Lamocoins earned so far, as shown on the game-over overlay.
    pub fn coins(&self) -> u32 {
        self.score / COINS_PER_SCORE
    }

    /// Keyboard input, `KeyboardEvent.code` names. Arrows / WASD steer;
    /// Space restarts once the session has ended.
    pub fn handle_key(&mut self, code: &str, rng: &mut impl Rng) {
        match code {
            "ArrowRight" | "KeyD" => {
                self.player.vx = RUN_SPEED;
                self.player.facing = Facing::Right;
            }
            "ArrowLeft" | "KeyA" => {
                self.player.vx = -RUN_SPEED;
                self.player.facing = Facing::Left;
            }
            "Space" if self.phase == Phase::GameOver => self.reset(rng),
            _ => {}
        }
    }
}

// --- Web driver --------------------------------------------------------------

struct JumperSprites {
    loaf_right: Sprite,
    loaf_left: Sprite,
    cloud: Sprite,
}

impl JumperSprites {
    fn load() -> Result<JumperSprites, JsValue> {
        Ok(JumperSprites {
            loaf_right: Sprite::load(
                "/static/assets/sprite-sheets/jackaloaf-right.png",
                PLAYER_W,
                PLAYER_H,
            )?,
            loaf_left: Sprite::load(
                "/static/assets/sprite-sheets/jackaloaf-left.png",
                PLAYER_W,
                PLAYER_H,
            )?,
            cloud: Sprite::load("/static/assets/sprite-sheets/cloud.png", CLOUD_W, CLOUD_H)?,
        })
    }
}

struct JumperGame {
    ctx: CanvasRenderingContext2d,
    sim: JumperSim,
    rng: SmallRng,
    sprites: JumperSprites,
}

thread_local! {
    static JUMPER_STATE: std::cell::RefCell<Option<JumperGame>> = std::cell::RefCell::new(None);
}

type FrameCallback = std::rc::Rc<std::cell::RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// Attach the jumper to the canvas with the given id and start its frame
/// loop. Fails if the canvas or its 2d context is missing.
pub fn start(canvas_id: &str) -> Result<(), JsValue> {
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let canvas: HtmlCanvasElement = doc
        .get_element_by_id(canvas_id)
        .ok_or_else(|| JsValue::from_str("jumper canvas not found"))?
        .dyn_into()?;
    canvas.set_width(CANVAS_W as u32);
    canvas.set_height(CANVAS_H as u32);
    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("no 2d context"))?
        .dyn_into()?;

    let seed = win.performance().map(|p| p.now() as u64).unwrap_or(0);
    let mut rng = SmallRng::seed_from_u64(seed);
    let sim = JumperSim::new(&mut rng);
    let sprites = JumperSprites::load()?;

    JUMPER_STATE.with(|cell| {
        cell.replace(Some(JumperGame {
            ctx,
            sim,
            rng,
            sprites,
        }))
    });

    // Keyboard listener: steering + restart. Runs between ticks only.
    {
        let closure = Closure::wrap(Box::new(move |evt: web_sys::KeyboardEvent| {
            JUMPER_STATE.with(|cell| {
                if let Some(game) = cell.borrow_mut().as_mut() {
                    let code = evt.code();
                    game.sim.handle_key(&code, &mut game.rng);
                }
            });
        }) as Box<dyn FnMut(_)>);
        doc.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    start_loop();
    Ok(())
}

fn start_loop() {
    let f: FrameCallback = std::rc::Rc::new(std::cell::RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |_ts: f64| {
        JUMPER_STATE.with(|cell| {
            if let Some(game) = cell.borrow_mut().as_mut() {
                game.sim.tick(&mut game.rng);
                render(game);
            }
        });
        if let Some(w) = window() {
            let _ = w.request_animation_frame(f.borrow().as_ref().unwrap().as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut(f64)>));
    if let Some(w) = window() {
        let _ = w.request_animation_frame(g.borrow().as_ref().unwrap().as_ref().unchecked_ref());
    }
}

fn render(game: &JumperGame) {
    let ctx = &game.ctx;
    let sim = &game.sim;
    ctx.clear_rect(0.0, 0.0, CANVAS_W, CANVAS_H);

    for cloud in &sim.clouds {
        game.sprites.cloud.draw(ctx, cloud.x, cloud.y);
    }
    let loaf = match sim.player.facing {
        Facing::Right => &game.sprites.loaf_right,
        Facing::Left => &game.sprites.loaf_left,
    };
    loaf.draw(ctx, sim.player.x, sim.player.y);

    ctx.set_fill_style_str("black");
    ctx.set_font("50px Trebuchet MS");
    ctx.fill_text(&format!("Score: {}", sim.score), 10.0, 45.0).ok();

    if sim.phase == Phase::GameOver {
        ctx.set_font("35px Trebuchet MS");
        ctx.fill_text(
            &format!("You've gained {} Lamocoins!", sim.coins()),
            125.0,
            400.0,
        )
        .ok();
        ctx.set_font("31px Trebuchet MS");
        ctx.fill_text("Press 'Space' to Restart!", 190.0, 450.0).ok();
    }
}

/// Score of the live session, for the surrounding page.
pub(crate) fn current_score() -> u32 {
    JUMPER_STATE.with(|cell| cell.borrow().as_ref().map(|g| g.sim.score).unwrap_or(0))
}

/// Lamocoins banked by the live session, for the surrounding page.
pub(crate) fn current_coins() -> u32 {
    JUMPER_STATE.with(|cell| cell.borrow().as_ref().map(|g| g.sim.coins()).unwrap_or(0))
}

/// External restart notification (same effect as the Space key).
pub(crate) fn restart() {
    JUMPER_STATE.with(|cell| {
        if let Some(game) = cell.borrow_mut().as_mut() {
            game.sim.reset(&mut game.rng);
        }
    });
}
