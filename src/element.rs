// Copyright (c) 2026 rezky_nightky

use rand::Rng;

use crate::canvas::{Canvas, DrawCtx, Size};
use crate::clock::Pulse;
use crate::falling::FallingStar;
use crate::flying::FlyingParticle;
use crate::hyper_jump::HyperJump;
use crate::rain::RainColumn;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CreationInput {
    pub id: usize,
    pub space: Size,
}

/// One animated thing. `advance` moves it a tick forward; `render` describes
/// its current state and must leave it untouched.
pub trait Element {
    fn advance<R: Rng>(&mut self, space: Size, pulse: Pulse, rng: &mut R);
    fn render<C: Canvas>(&self, space: Size, pulse: Pulse, ctx: &mut DrawCtx<'_, C>);
}

#[derive(Clone, Debug)]
pub enum Effect {
    Falling(FallingStar),
    HyperJump(HyperJump),
    Flying(FlyingParticle),
    Rain(RainColumn),
}

impl Element for Effect {
    fn advance<R: Rng>(&mut self, space: Size, pulse: Pulse, rng: &mut R) {
        match self {
            Effect::Falling(e) => e.advance(space, pulse, rng),
            Effect::HyperJump(e) => e.advance(space, pulse, rng),
            Effect::Flying(e) => e.advance(space, pulse, rng),
            Effect::Rain(e) => e.advance(space, pulse, rng),
        }
    }

    fn render<C: Canvas>(&self, space: Size, pulse: Pulse, ctx: &mut DrawCtx<'_, C>) {
        match self {
            Effect::Falling(e) => e.render(space, pulse, ctx),
            Effect::HyperJump(e) => e.render(space, pulse, ctx),
            Effect::Flying(e) => e.render(space, pulse, ctx),
            Effect::Rain(e) => e.render(space, pulse, ctx),
        }
    }
}

/// Uniform sample from `[low, high]`. Collapses to `low` on an empty or
/// non-finite span instead of panicking, which keeps zero-sized canvases safe.
pub(crate) fn uniform<R: Rng>(rng: &mut R, low: f64, high: f64) -> f64 {
    if !low.is_finite() {
        return 0.0;
    }
    if !high.is_finite() || high <= low {
        return low;
    }
    rng.random_range(low..=high)
}

pub(crate) fn uniform_below<R: Rng>(rng: &mut R, low: f64, high: f64) -> f64 {
    if !low.is_finite() {
        return 0.0;
    }
    if !high.is_finite() || high <= low {
        return low;
    }
    rng.random_range(low..high)
}
