//! Collision primitives shared by both mini-games.
//!
//! The jumper uses axis-aligned bounding boxes; the feeding game uses
//! circle-vs-circle tests. Both predicates are pure, symmetric and strict
//! (touching edges do not count as overlap).

/// Axis-aligned bounding box. `x`/`y` is the top-left corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Aabb {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// Strict AABB overlap: true iff the interiors intersect.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.x < other.x + other.w
            && self.x + self.w > other.x
            && self.y < other.y + other.h
            && self.y + self.h > other.y
    }
}

/// Strict circle overlap: true iff center distance is below the radius sum.
/// Compared squared to avoid the sqrt.
pub fn circles_overlap(ax: f64, ay: f64, ar: f64, bx: f64, by: f64, br: f64) -> bool {
    let dx = ax - bx;
    let dy = ay - by;
    let reach = ar + br;
    dx * dx + dy * dy < reach * reach
}

/// One easing step toward `target`: move by a fixed fraction of the remaining
/// delta. Tied to the assumed constant frame rate, not a normalized spring.
pub fn ease_toward(current: f64, target: f64, divisor: f64) -> f64 {
    current + (target - current) / divisor
}
