//! "Feeding Time" — the pointer-chase feeding game.
//!
//! The player's pet glides toward the last pointer position (fixed-fraction
//! easing, delta/30 per tick) and eats the baby fish that drift across the
//! tank. Each baby fish eaten scores one point and plays a random chomp cue;
//! touching a piranha ends the session on the spot. Space restarts.
//!
//! As with the jumper, `FeedingSim` is free of web types and runs under host
//! `cargo test`; the driver half owns the canvas, the pointer and keyboard
//! listeners and the `requestAnimationFrame` loop.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, window};

use crate::assets::{SoundBank, SpriteSheet};
use crate::geom::{circles_overlap, ease_toward};
use crate::{Facing, Phase};

// --- Tuning constants --------------------------------------------------------

pub const CANVAS_W: f64 = 800.0;
pub const CANVAS_H: f64 = 500.0;

pub const PLAYER_RADIUS: f64 = 50.0;
/// Easing divisor: the pet covers 1/30 of the remaining distance per tick.
pub const EASE_DIVISOR: f64 = 30.0;
/// Animation frames advance every this many ticks.
const ANIM_PERIOD: u64 = 15;
const SHEET_FRAMES: u32 = 4;

pub const BABY_RADIUS: f64 = 25.0;
pub const PIRANHA_RADIUS: f64 = 30.0;
/// Spawn cadences, in ticks.
pub const BABY_SPAWN_PERIOD: u64 = 50;
pub const PIRANHA_SPAWN_PERIOD: u64 = 250;
const SPEED_MIN: f64 = 2.0;
const SPEED_MAX: f64 = 4.0;
/// Fish enter this far past the side edges and retire once this far out.
const SPAWN_PAD: f64 = 60.0;
const RETIRE_PAD: f64 = 100.0;
/// Vertical band fish may spawn in, inset from the tank edges.
const EDGE_PAD: f64 = 40.0;

/// Lifetime of the transient bite splash, in ticks.
const BITE_TICKS: u32 = 10;

// --- Simulation --------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FishKind {
    Baby,
    Piranha,
}

impl FishKind {
    pub fn radius(self) -> f64 {
        match self {
            FishKind::Baby => BABY_RADIUS,
            FishKind::Piranha => PIRANHA_RADIUS,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fish {
    pub kind: FishKind,
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub facing: Facing,
    pub frame: u32,
    /// Set when a baby fish has been eaten; a counted fish is never matched
    /// again and is retired at the end of the tick.
    pub counted: bool,
}

impl Fish {
    /// Spawn off-screen on a random side; the side picks the facing variant
    /// and the swim direction. Speed is uniform in `[SPEED_MIN, SPEED_MAX)`.
    fn spawn(kind: FishKind, rng: &mut impl Rng) -> Fish {
        let speed = rng.gen_range(SPEED_MIN..SPEED_MAX);
        let from_left = rng.gen_bool(0.5);
        let (x, vx, facing) = if from_left {
            (-SPAWN_PAD, speed, Facing::Right)
        } else {
            (CANVAS_W + SPAWN_PAD, -speed, Facing::Left)
        };
        Fish {
            kind,
            x,
            y: rng.gen_range(EDGE_PAD..CANVAS_H - EDGE_PAD),
            vx,
            facing,
            frame: 0,
            counted: false,
        }
    }

    fn offscreen(&self) -> bool {
        self.x < -RETIRE_PAD || self.x > CANVAS_W + RETIRE_PAD
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Player {
    pub x: f64,
    pub y: f64,
    pub frame: u32,
    pub facing: Facing,
}

impl Player {
    fn spawn() -> Self {
        Player {
            x: CANVAS_W / 2.0,
            y: CANVAS_H / 2.0,
            frame: 0,
            facing: Facing::Left,
        }
    }
}

/// Short-lived splash drawn where a baby fish was eaten.
#[derive(Clone, Copy, Debug)]
pub struct Bite {
    pub x: f64,
    pub y: f64,
    pub ticks_left: u32,
}

/// One feeding session. Owned by the frame driver; input handlers only touch
/// the pointer-intent fields and the restart transition.
pub struct FeedingSim {
    pub player: Player,
    pub target: (f64, f64),
    pub pointer_down: bool,
    pub fish: Vec<Fish>,
    pub score: u32,
    pub ticks: u64,
    pub phase: Phase,
    pub bites: Vec<Bite>,
}

impl FeedingSim {
    pub fn new() -> Self {
        let player = Player::spawn();
        FeedingSim {
            target: (player.x, player.y),
            player,
            pointer_down: false,
            fish: Vec::new(),
            score: 0,
            ticks: 0,
            phase: Phase::Running,
            bites: Vec::new(),
        }
    }

    /// Full reinit: score 0, centered pet, empty tank.
    pub fn reset(&mut self) {
        *self = FeedingSim::new();
    }

    /// One frame of simulation. Returns how many baby fish were eaten this
    /// tick so the driver can fire audio cues. A no-op once the session has
    /// ended, which also guarantees a piranha hit fires exactly once.
    pub fn tick(&mut self, rng: &mut impl Rng) -> u32 {
        if self.phase == Phase::GameOver {
            return 0;
        }
        self.ticks += 1;
        self.advance_player();
        self.spawn_fish(rng);
        self.advance_fish();
        let eaten = self.resolve_collisions();
        self.retire_fish();
        self.bites.retain_mut(|b| {
            b.ticks_left -= 1;
            b.ticks_left > 0
        });
        eaten
    }

    fn advance_player(&mut self) {
        let (tx, ty) = self.target;
        let p = &mut self.player;
        if tx < p.x - 1.0 {
            p.facing = Facing::Left;
        } else if tx > p.x + 1.0 {
            p.facing = Facing::Right;
        }
        p.x = ease_toward(p.x, tx, EASE_DIVISOR);
        p.y = ease_toward(p.y, ty, EASE_DIVISOR);
        if self.ticks % ANIM_PERIOD == 0 {
            p.frame = (p.frame + 1) % SHEET_FRAMES;
        }
    }

    fn spawn_fish(&mut self, rng: &mut impl Rng) {
        if self.ticks % BABY_SPAWN_PERIOD == 0 {
            self.fish.push(Fish::spawn(FishKind::Baby, rng));
        }
        if self.ticks % PIRANHA_SPAWN_PERIOD == 0 {
            self.fish.push(Fish::spawn(FishKind::Piranha, rng));
        }
    }

    fn advance_fish(&mut self) {
        let animate = self.ticks % ANIM_PERIOD == 0;
        for fish in &mut self.fish {
            fish.x += fish.vx;
            if animate {
                fish.frame = (fish.frame + 1) % SHEET_FRAMES;
            }
        }
    }

    /// Player-vs-fish pass. A baby fish scores exactly once and is flagged
    /// for retirement; the first piranha contact ends the session and the
    /// rest of the pass is abandoned.
    fn resolve_collisions(&mut self) -> u32 {
        let mut eaten = 0;
        let (px, py) = (self.player.x, self.player.y);
        for fish in &mut self.fish {
            if fish.counted {
                continue;
            }
            if !circles_overlap(px, py, PLAYER_RADIUS, fish.x, fish.y, fish.kind.radius()) {
                continue;
            }
            match fish.kind {
                FishKind::Baby => {
                    fish.counted = true;
                    self.score += 1;
                    eaten += 1;
                    self.bites.push(Bite {
                        x: fish.x,
                        y: fish.y,
                        ticks_left: BITE_TICKS,
                    });
                }
                FishKind::Piranha => {
                    self.phase = Phase::GameOver;
                    break;
                }
            }
        }
        eaten
    }

    /// Drop eaten and fully off-screen fish so neither survives into the
    /// next tick's collision pass.
    fn retire_fish(&mut self) {
        self.fish.retain(|f| !f.counted && !f.offscreen());
    }

    pub fn pointer_press(&mut self, x: f64, y: f64) {
        self.pointer_down = true;
        self.target = (x, y);
    }

    /// Pointer drag: the target follows only while the button is held.
    pub fn pointer_move(&mut self, x: f64, y: f64) {
        if self.pointer_down {
            self.target = (x, y);
        }
    }

    pub fn pointer_release(&mut self) {
        self.pointer_down = false;
    }

    /// Keyboard input, `KeyboardEvent.code` names. Space restarts once the
    /// session has ended.
    pub fn handle_key(&mut self, code: &str) {
        if code == "Space" && self.phase == Phase::GameOver {
            self.reset();
        }
    }
}

impl Default for FeedingSim {
    fn default() -> Self {
        FeedingSim::new()
    }
}

// --- Web driver --------------------------------------------------------------

struct FeedingSprites {
    pet_left: SpriteSheet,
    pet_right: SpriteSheet,
    baby_left: SpriteSheet,
    baby_right: SpriteSheet,
    piranha_left: SpriteSheet,
    piranha_right: SpriteSheet,
}

impl FeedingSprites {
    fn load() -> Result<FeedingSprites, JsValue> {
        let sheet = |path| SpriteSheet::load(path, 498.0, 327.0, SHEET_FRAMES);
        Ok(FeedingSprites {
            pet_left: sheet("/static/assets/sprite-sheets/lamo-swim-left.png")?,
            pet_right: sheet("/static/assets/sprite-sheets/lamo-swim-right.png")?,
            baby_left: sheet("/static/assets/sprite-sheets/baby-fish-left.png")?,
            baby_right: sheet("/static/assets/sprite-sheets/baby-fish-right.png")?,
            piranha_left: sheet("/static/assets/sprite-sheets/piranha-left.png")?,
            piranha_right: sheet("/static/assets/sprite-sheets/piranha-right.png")?,
        })
    }
}

struct FeedingGame {
    ctx: CanvasRenderingContext2d,
    sim: FeedingSim,
    rng: SmallRng,
    sprites: FeedingSprites,
    sounds: SoundBank,
}

thread_local! {
    static FEEDING_STATE: std::cell::RefCell<Option<FeedingGame>> = std::cell::RefCell::new(None);
}

type FrameCallback = std::rc::Rc<std::cell::RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// Attach the feeding game to the canvas with the given id and start its
/// frame loop. Fails if the canvas or its 2d context is missing.
pub fn start(canvas_id: &str) -> Result<(), JsValue> {
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let canvas: HtmlCanvasElement = doc
        .get_element_by_id(canvas_id)
        .ok_or_else(|| JsValue::from_str("feeding canvas not found"))?
        .dyn_into()?;
    canvas.set_width(CANVAS_W as u32);
    canvas.set_height(CANVAS_H as u32);
    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("no 2d context"))?
        .dyn_into()?;

    let seed = win.performance().map(|p| p.now() as u64).unwrap_or(0);
    FEEDING_STATE.with(|cell| {
        cell.replace(Some(FeedingGame {
            ctx,
            sim: FeedingSim::new(),
            rng: SmallRng::seed_from_u64(seed),
            sprites: FeedingSprites::load()?,
            sounds: SoundBank::load(&[
                "/static/assets/audio/chomp1.ogg",
                "/static/assets/audio/chomp2.ogg",
                "/static/assets/audio/chomp3.ogg",
            ])?,
        }));
        Ok::<(), JsValue>(())
    })?;

    // Pointer listeners: offset coordinates are canvas-local already.
    {
        let closure = Closure::wrap(Box::new(move |evt: web_sys::MouseEvent| {
            FEEDING_STATE.with(|cell| {
                if let Some(game) = cell.borrow_mut().as_mut() {
                    game.sim
                        .pointer_press(evt.offset_x() as f64, evt.offset_y() as f64);
                }
            });
        }) as Box<dyn FnMut(_)>);
        canvas.add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    {
        let closure = Closure::wrap(Box::new(move |evt: web_sys::MouseEvent| {
            FEEDING_STATE.with(|cell| {
                if let Some(game) = cell.borrow_mut().as_mut() {
                    game.sim
                        .pointer_move(evt.offset_x() as f64, evt.offset_y() as f64);
                }
            });
        }) as Box<dyn FnMut(_)>);
        canvas.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    {
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::MouseEvent| {
            FEEDING_STATE.with(|cell| {
                if let Some(game) = cell.borrow_mut().as_mut() {
                    game.sim.pointer_release();
                }
            });
        }) as Box<dyn FnMut(_)>);
        canvas.add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    // Keyboard listener for the restart key.
    {
        let closure = Closure::wrap(Box::new(move |evt: web_sys::KeyboardEvent| {
            FEEDING_STATE.with(|cell| {
                if let Some(game) = cell.borrow_mut().as_mut() {
                    let code = evt.code();
                    game.sim.handle_key(&code);
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
        FEEDING_STATE.with(|cell| {
            if let Some(game) = cell.borrow_mut().as_mut() {
                let eaten = game.sim.tick(&mut game.rng);
                for _ in 0..eaten {
                    game.sounds.play_random(&mut game.rng);
                }
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

fn render(game: &FeedingGame) {
    let ctx = &game.ctx;
    let sim = &game.sim;
    ctx.clear_rect(0.0, 0.0, CANVAS_W, CANVAS_H);

    // Guide line while the pointer is held.
    if sim.pointer_down {
        ctx.set_line_width(0.2);
        ctx.begin_path();
        ctx.move_to(sim.player.x, sim.player.y);
        ctx.line_to(sim.target.0, sim.target.1);
        ctx.stroke();
    }

    for fish in &sim.fish {
        let sheet = match (fish.kind, fish.facing) {
            (FishKind::Baby, Facing::Left) => &game.sprites.baby_left,
            (FishKind::Baby, Facing::Right) => &game.sprites.baby_right,
            (FishKind::Piranha, Facing::Left) => &game.sprites.piranha_left,
            (FishKind::Piranha, Facing::Right) => &game.sprites.piranha_right,
        };
        let d = fish.kind.radius() * 2.0;
        sheet.draw_frame(ctx, fish.frame, fish.x, fish.y, d, d);
    }

    let pet = match sim.player.facing {
        Facing::Left => &game.sprites.pet_left,
        Facing::Right => &game.sprites.pet_right,
    };
    pet.draw_frame(
        ctx,
        sim.player.frame,
        sim.player.x,
        sim.player.y,
        PLAYER_RADIUS * 2.0,
        PLAYER_RADIUS * 2.0,
    );

    // Bite splashes fade with remaining ticks.
    for bite in &sim.bites {
        let alpha = bite.ticks_left as f64 / BITE_TICKS as f64;
        ctx.set_stroke_style_str(&format!("rgba(255,255,255,{alpha:.2})"));
        ctx.set_line_width(3.0);
        ctx.begin_path();
        let r = BABY_RADIUS + (BITE_TICKS - bite.ticks_left) as f64 * 2.0;
        ctx.arc(bite.x, bite.y, r, 0.0, std::f64::consts::TAU).ok();
        ctx.stroke();
    }

    ctx.set_fill_style_str("black");
    ctx.set_font("50px Georgia");
    ctx.fill_text(&format!("Score: {}", sim.score), 10.0, 50.0).ok();

    if sim.phase == Phase::GameOver {
        ctx.set_fill_style_str("rgba(0,0,0,0.55)");
        ctx.fill_rect(0.0, 0.0, CANVAS_W, CANVAS_H);
        ctx.set_fill_style_str("white");
        ctx.set_font("50px Georgia");
        ctx.fill_text("GAME OVER", 250.0, 220.0).ok();
        ctx.set_font("31px Georgia");
        ctx.fill_text(
            &format!("You fed {} baby fish!", sim.score),
            280.0,
            280.0,
        )
        .ok();
        ctx.fill_text("Press 'Space' to Restart!", 255.0, 330.0).ok();
    }
}

/// Score of the live session, for the surrounding page.
pub(crate) fn current_score() -> u32 {
    FEEDING_STATE.with(|cell| cell.borrow().as_ref().map(|g| g.sim.score).unwrap_or(0))
}

/// External restart notification (same effect as the Space key).
pub(crate) fn restart() {
    FEEDING_STATE.with(|cell| {
        if let Some(game) = cell.borrow_mut().as_mut() {
            game.sim.reset();
        }
    });
}
