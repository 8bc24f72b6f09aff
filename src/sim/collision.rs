//! Collision detection and response for axis-aligned boxes
//!
//! The ball is approximated by its bounding box everywhere. Brick hits pick
//! the reflection axis by overlap minimization: the side with the shallowest
//! penetration is the side that was struck.

use glam::Vec2;

use super::state::{Ball, Brick, Paddle};

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    /// Box from top-left corner and size
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self {
            min,
            max: min + size,
        }
    }

    /// Bounding box of a circle
    pub fn from_circle(center: Vec2, radius: f32) -> Self {
        Self {
            min: center - Vec2::splat(radius),
            max: center + Vec2::splat(radius),
        }
    }

    /// Strict overlap (touching edges do not count)
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }
}

/// Which velocity component a collision inverts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Side hit: invert dx
    Horizontal,
    /// Top/bottom hit: invert dy
    Vertical,
}

/// Penetration depth of `mover` into `target` from each side of `target`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Overlap {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Overlap {
    pub fn between(mover: &Aabb, target: &Aabb) -> Self {
        Self {
            left: mover.max.x - target.min.x,
            right: target.max.x - mover.min.x,
            top: mover.max.y - target.min.y,
            bottom: target.max.y - mover.min.y,
        }
    }

    /// Axis of the shallowest side. Ties go to the horizontal branch.
    pub fn axis(&self) -> Axis {
        let horizontal = self.left.min(self.right);
        let vertical = self.top.min(self.bottom);
        if horizontal <= vertical {
            Axis::Horizontal
        } else {
            Axis::Vertical
        }
    }
}

/// Result of the wall check for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WallHit {
    /// Left or right wall crossed
    pub side: bool,
    /// Top wall crossed
    pub top: bool,
}

impl WallHit {
    pub fn any(&self) -> bool {
        self.side || self.top
    }
}

/// Bounce off the left, right and top walls. There is no bottom wall.
///
/// A wall only reflects a ball heading out through it, so a ball that starts
/// past a wall travels back in instead of flipping every tick.
pub fn resolve_walls(ball: &mut Ball, field_width: f32) -> WallHit {
    let mut hit = WallHit::default();

    let past_right = ball.pos.x + ball.radius > field_width && ball.vel.x > 0.0;
    let past_left = ball.pos.x - ball.radius < 0.0 && ball.vel.x < 0.0;
    if past_right || past_left {
        ball.vel.x = -ball.vel.x;
        hit.side = true;
    }
    if ball.pos.y - ball.radius < 0.0 && ball.vel.y < 0.0 {
        ball.vel.y = -ball.vel.y;
        hit.top = true;
    }

    hit
}

/// Ball center within the paddle span and bottom edge past the paddle's top
pub fn ball_hits_paddle(ball: &Ball, paddle: &Paddle) -> bool {
    paddle.visible
        && ball.pos.x >= paddle.pos.x
        && ball.pos.x <= paddle.pos.x + paddle.width
        && ball.bottom() > paddle.pos.y
}

/// Send the ball upward at configured speed if it touches the paddle
///
/// Sets dy rather than negating it, so a ball already inside the paddle can't
/// be flipped back down on the next tick.
pub fn resolve_paddle(ball: &mut Ball, paddle: &Paddle) -> bool {
    if ball_hits_paddle(ball, paddle) {
        ball.vel.y = -ball.speed;
        true
    } else {
        false
    }
}

/// First visible brick (in grid order) overlapping the ball, with its axis
pub fn find_brick_hit(ball: &Ball, bricks: &[Brick]) -> Option<(usize, Axis)> {
    let ball_box = ball.aabb();
    bricks
        .iter()
        .enumerate()
        .filter(|(_, brick)| brick.visible)
        .find_map(|(i, brick)| {
            let brick_box = brick.aabb();
            ball_box
                .intersects(&brick_box)
                .then(|| (i, Overlap::between(&ball_box, &brick_box).axis()))
        })
}

/// Reflect the ball along `axis`
pub fn reflect(ball: &mut Ball, axis: Axis) {
    match axis {
        Axis::Horizontal => ball.vel.x = -ball.vel.x,
        Axis::Vertical => ball.vel.y = -ball.vel.y,
    }
}
