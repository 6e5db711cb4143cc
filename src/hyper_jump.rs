// Copyright (c) 2026 rezky_nightky

use glam::DVec2;
use rand::Rng;

use crate::canvas::{Canvas, DrawCtx, Rect, Size};
use crate::clock::Pulse;
use crate::element::{uniform, uniform_below, Element};
use crate::palette::Rgba;

const SPEED_MIN: f64 = 2.0;
const SPEED_MAX: f64 = 5.0;
const OVERSCAN: f64 = 200.0;
const TRAIL_WEIGHT: f64 = 5.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HyperJumpStyle {
    Line,
    Circle,
}

/// A star racing away from the canvas center.
///
/// Every tick the speed drops by `speed_change` and is clamped back into
/// `[min_speed, max_speed]`, so it settles on one of the bounds. The heading is
/// re-derived from the center each tick, and the star respawns somewhere on
/// the canvas once it is more than [`OVERSCAN`] units outside.
#[derive(Clone, Debug, PartialEq)]
pub struct HyperJump {
    position: DVec2,
    radius: f64,
    speed: f64,
    max_speed: f64,
    min_speed: f64,
    speed_change: f64,
    color: Rgba,
    style: HyperJumpStyle,
}

impl HyperJump {
    pub fn random<R: Rng>(space: Size, style: HyperJumpStyle, color: Rgba, rng: &mut R) -> Self {
        let position = DVec2::new(
            uniform(rng, 0.0, space.width),
            uniform(rng, 0.0, space.height),
        );
        let radius = 2.0 + uniform_below(rng, 0.0, 1.0);
        let speed = uniform(rng, SPEED_MIN, SPEED_MAX);
        let a = uniform(rng, SPEED_MIN, SPEED_MAX);
        let b = uniform(rng, SPEED_MIN, SPEED_MAX);
        let speed_change = uniform(rng, SPEED_MIN, SPEED_MAX);
        Self {
            position,
            radius,
            speed,
            max_speed: a.max(b),
            min_speed: a.min(b),
            speed_change,
            color,
            style,
        }
    }

    #[cfg(test)]
    pub fn position(&self) -> DVec2 {
        self.position
    }

    #[cfg(test)]
    pub fn speed(&self) -> f64 {
        self.speed
    }

    #[cfg(test)]
    pub fn speed_bounds(&self) -> (f64, f64) {
        (self.min_speed, self.max_speed)
    }

    /// Tail end for line mode: a 5:1 blend of position and center.
    pub fn trail_point(&self, space: Size) -> DVec2 {
        (self.position * TRAIL_WEIGHT + space.center()) / (TRAIL_WEIGHT + 1.0)
    }

    fn is_lost(&self, space: Size) -> bool {
        let p = self.position;
        !p.is_finite()
            || p.x > space.width + OVERSCAN
            || p.x < -OVERSCAN
            || p.y < -OVERSCAN
            || p.y > space.height + OVERSCAN
    }
}

impl Element for HyperJump {
    fn advance<R: Rng>(&mut self, space: Size, _pulse: Pulse, rng: &mut R) {
        self.speed = (self.speed - self.speed_change).clamp(self.min_speed, self.max_speed);

        let from_center = self.position - space.center();
        let angle = from_center.y.atan2(from_center.x);
        self.position += DVec2::new(angle.cos(), angle.sin()) * self.speed;

        if self.is_lost(space) {
            self.position = DVec2::new(
                uniform_below(rng, 0.0, space.width),
                uniform_below(rng, 0.0, space.height),
            );
        }
    }

    fn render<C: Canvas>(&self, space: Size, _pulse: Pulse, ctx: &mut DrawCtx<'_, C>) {
        match self.style {
            HyperJumpStyle::Line => {
                ctx.canvas
                    .stroke_line(self.position, self.trail_point(space), self.color);
            }
            HyperJumpStyle::Circle => {
                let rect = Rect::new(self.position.x, self.position.y, self.radius, self.radius);
                ctx.canvas.fill_ellipse(rect, self.color);
            }
        }
    }
}
