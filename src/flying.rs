// Copyright (c) 2026 rezky_nightky

use std::f64::consts::FRAC_PI_2;

use glam::DVec2;
use rand::Rng;

use crate::canvas::{Canvas, DrawCtx, Rect, Size};
use crate::clock::Pulse;
use crate::element::{uniform, Element};
use crate::palette::Rgba;
use crate::symbols::SymbolKey;

const CENTER: DVec2 = DVec2::new(0.5, 0.5);
const SPEED_MIN: f64 = 0.1;
const SPEED_MAX: f64 = 0.4;
const SIZE_MIN: f64 = 8.0;
const SIZE_MAX: f64 = 10.0;
const FADE_IN_UNTIL: f64 = 0.3;
/// Respawn band half-width around the center lines.
const BAND: f64 = 0.05;
/// Shorter trajectories count as degenerate.
const MIN_TRAVEL: f64 = 1e-9;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Edge {
    Leading,
    Trailing,
    Top,
    Bottom,
}

impl Edge {
    const ALL: [Edge; 4] = [Edge::Leading, Edge::Trailing, Edge::Top, Edge::Bottom];

    fn sample_start<R: Rng>(self, rng: &mut R) -> DVec2 {
        let (lo, mid, hi) = (0.5 - BAND, 0.5, 0.5 + BAND);
        match self {
            Edge::Leading => DVec2::new(uniform(rng, lo, mid), uniform(rng, lo, hi)),
            Edge::Trailing => DVec2::new(uniform(rng, mid, hi), uniform(rng, lo, hi)),
            Edge::Top => DVec2::new(uniform(rng, lo, hi), uniform(rng, lo, mid)),
            Edge::Bottom => DVec2::new(uniform(rng, lo, hi), uniform(rng, mid, hi)),
        }
    }
}

/// A glyph drifting from near the center out to the unit-square edge, fading
/// in over the first stretch and out over the rest, on a gently curved path.
/// Lives in `[0, 1]²`; scaled to the canvas only when drawn.
#[derive(Clone, Debug, PartialEq)]
pub struct FlyingParticle {
    start: DVec2,
    end: DVec2,
    position: DVec2,
    speed: f64,
    opacity: f64,
    tag: SymbolKey,
    color: Rgba,
    size: f64,
}

impl FlyingParticle {
    /// First spawn: anywhere in the unit square.
    pub fn spawn<R: Rng>(tag: SymbolKey, color: Rgba, rng: &mut R) -> Self {
        let start = DVec2::new(uniform(rng, 0.0, 1.0), uniform(rng, 0.0, 1.0));
        Self::from_start(start, tag, color, rng)
    }

    /// Later spawns: inside the band of a random edge around the center.
    pub fn reborn<R: Rng>(tag: SymbolKey, color: Rgba, rng: &mut R) -> Self {
        let edge = Edge::ALL[rng.random_range(0..Edge::ALL.len())];
        let start = edge.sample_start(rng);
        Self::from_start(start, tag, color, rng)
    }

    fn from_start<R: Rng>(start: DVec2, tag: SymbolKey, color: Rgba, rng: &mut R) -> Self {
        Self {
            start,
            end: end_position(start),
            position: start,
            speed: uniform(rng, SPEED_MIN, SPEED_MAX),
            opacity: 0.0,
            tag,
            color,
            size: uniform(rng, SIZE_MIN, SIZE_MAX),
        }
    }

    #[cfg(test)]
    pub fn start(&self) -> DVec2 {
        self.start
    }

    #[cfg(test)]
    pub fn end(&self) -> DVec2 {
        self.end
    }

    #[cfg(test)]
    pub fn position(&self) -> DVec2 {
        self.position
    }

    #[cfg(test)]
    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    #[cfg(test)]
    pub fn tag(&self) -> &SymbolKey {
        &self.tag
    }

    #[cfg(test)]
    pub fn color(&self) -> Rgba {
        self.color
    }

    /// Fraction of the start-to-end distance covered. `None` when start and
    /// end coincide.
    pub fn progress(&self) -> Option<f64> {
        let total = self.start.distance(self.end);
        if !(total > MIN_TRAVEL) {
            return None;
        }
        Some(self.start.distance(self.position) / total)
    }

    fn respawn<R: Rng>(&mut self, rng: &mut R) {
        let tag = std::mem::replace(&mut self.tag, SymbolKey::Index(0));
        *self = Self::reborn(tag, self.color, rng);
    }

    fn escaped(&self) -> bool {
        let p = self.position;
        !p.is_finite() || p.x < 0.0 || p.x > 1.0 || p.y < 0.0 || p.y > 1.0
    }
}

pub fn opacity_for(progress: f64) -> f64 {
    if progress <= FADE_IN_UNTIL {
        3.0 * progress
    } else {
        1.0 - progress + FADE_IN_UNTIL
    }
}

/// Pushes `start` away from the center onto the unit-square boundary, keeping
/// its direction. The axis that deviates more from the center is pinned to
/// 0 or 1; an exact tie pins both.
pub fn end_position(start: DVec2) -> DVec2 {
    let dx = (0.5 - start.x).abs();
    let dy = (0.5 - start.y).abs();
    let pin = |v: f64| if v < 0.5 { 0.0 } else { 1.0 };

    if dx == dy {
        DVec2::new(pin(start.x), pin(start.y))
    } else if dx < dy {
        let l = 0.5 * dx / dy;
        let x = if start.x < 0.5 { 0.5 - l } else { 0.5 + l };
        DVec2::new(x, pin(start.y))
    } else {
        let l = 0.5 * dy / dx;
        let y = if start.y < 0.5 { 0.5 - l } else { 0.5 + l };
        DVec2::new(pin(start.x), y)
    }
}

impl Element for FlyingParticle {
    fn advance<R: Rng>(&mut self, _space: Size, pulse: Pulse, rng: &mut R) {
        let Some(progress) = self.progress() else {
            self.respawn(rng);
            return;
        };
        self.opacity = opacity_for(progress);

        let trajectory = self.end - CENTER;
        let angle = progress * FRAC_PI_2;
        let mut offset = DVec2::new(angle.sin(), angle.cos());
        if trajectory.x < 0.0 {
            offset.x = -offset.x;
        }
        if trajectory.y < 0.0 {
            offset.y = -offset.y;
        }
        self.position += (trajectory + offset * self.speed) * pulse.delta * self.speed;

        if self.escaped() {
            self.respawn(rng);
        }
    }

    fn render<C: Canvas>(&self, space: Size, _pulse: Pulse, ctx: &mut DrawCtx<'_, C>) {
        let Some(symbol) = ctx.symbols.get(&self.tag) else {
            return;
        };
        let at = self.position * space.to_vec();
        ctx.canvas.save();
        ctx.canvas.set_color_multiply(self.color);
        ctx.canvas.set_opacity(self.opacity);
        ctx.canvas
            .draw_symbol(symbol, Rect::new(at.x, at.y, self.size, self.size));
        ctx.canvas.restore();
    }
}
