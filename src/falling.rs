// Copyright (c) 2026 rezky_nightky

use glam::DVec2;
use rand::Rng;

use crate::canvas::{Canvas, DrawCtx, Rect, Size};
use crate::clock::Pulse;
use crate::element::{uniform, Element};
use crate::palette::Rgba;

const VELOCITY_MIN: f64 = 2.0;
const VELOCITY_MAX: f64 = 5.0;
const STAR_DIAMETER: f64 = 2.0;

/// A star sliding straight down. Speed is in units per tick, not per second.
#[derive(Clone, Debug, PartialEq)]
pub struct FallingStar {
    position: DVec2,
    velocity: f64,
    color: Rgba,
}

impl FallingStar {
    pub fn new(position: DVec2, velocity: f64, color: Rgba) -> Self {
        Self {
            position,
            velocity,
            color,
        }
    }

    pub fn random<R: Rng>(space: Size, color: Rgba, rng: &mut R) -> Self {
        let position = DVec2::new(
            uniform(rng, 0.0, space.width),
            uniform(rng, 0.0, space.height),
        );
        let velocity = uniform(rng, VELOCITY_MIN, VELOCITY_MAX);
        Self::new(position, velocity, color)
    }

    #[cfg(test)]
    pub fn position(&self) -> DVec2 {
        self.position
    }

    #[cfg(test)]
    pub fn velocity(&self) -> f64 {
        self.velocity
    }
}

impl Element for FallingStar {
    fn advance<R: Rng>(&mut self, space: Size, _pulse: Pulse, rng: &mut R) {
        self.position.y += self.velocity;
        if self.position.y > space.height || !self.position.y.is_finite() {
            self.position = DVec2::new(uniform(rng, 0.0, space.width), 0.0);
        }
    }

    fn render<C: Canvas>(&self, _space: Size, _pulse: Pulse, ctx: &mut DrawCtx<'_, C>) {
        let rect = Rect::new(
            self.position.x,
            self.position.y,
            STAR_DIAMETER,
            STAR_DIAMETER,
        );
        ctx.canvas.fill_ellipse(rect, self.color);
    }
}
