// Copyright (c) 2026 rezky_nightky

//! The drawing sink elements render into, plus the little bits of geometry
//! they need to describe what to draw.

use glam::DVec2;

use crate::palette::Rgba;
use crate::symbols::SymbolTable;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn center(self) -> DVec2 {
        DVec2::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn to_vec(self) -> DVec2 {
        DVec2::new(self.width, self.height)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub origin: DVec2,
    pub size: Size,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            origin: DVec2::new(x, y),
            size: Size::new(width, height),
        }
    }

    pub fn max(&self) -> DVec2 {
        self.origin + self.size.to_vec()
    }

    pub fn center(&self) -> DVec2 {
        self.origin + self.size.to_vec() * 0.5
    }

    /// Half-open on the far edges, so tiled strips never share a point.
    pub fn contains(&self, p: DVec2) -> bool {
        let max = self.max();
        p.x >= self.origin.x && p.y >= self.origin.y && p.x < max.x && p.y < max.y
    }

    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let lo = self.origin.max(other.origin);
        let hi = self.max().min(other.max());
        if hi.x <= lo.x || hi.y <= lo.y {
            return None;
        }
        Some(Rect::new(lo.x, lo.y, hi.x - lo.x, hi.y - lo.y))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum BlendMode {
    #[default]
    Normal,
    /// Paint only where something has already been drawn.
    SourceAtop,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Paint {
    #[allow(dead_code)]
    Solid(Rgba),
    LinearGradient {
        from: Rgba,
        to: Rgba,
        start: DVec2,
        end: DVec2,
    },
}

impl Paint {
    pub fn color_at(&self, p: DVec2) -> Rgba {
        match *self {
            Paint::Solid(c) => c,
            Paint::LinearGradient {
                from,
                to,
                start,
                end,
            } => {
                let axis = end - start;
                let len2 = axis.length_squared();
                if !(len2 > f64::EPSILON) {
                    return from;
                }
                let t = ((p - start).dot(axis) / len2).clamp(0.0, 1.0);
                from.lerp(to, t as f32)
            }
        }
    }
}

/// Primitive drawing operations. Implementations own the graphics state
/// (opacity, color filter, blend mode, clip) and scope it with `save`/`restore`.
pub trait Canvas {
    type Symbol;

    fn fill_ellipse(&mut self, rect: Rect, color: Rgba);
    fn stroke_line(&mut self, from: DVec2, to: DVec2, color: Rgba);
    fn fill_rect(&mut self, rect: Rect, paint: &Paint);
    fn draw_symbol(&mut self, symbol: &Self::Symbol, rect: Rect);

    fn save(&mut self);
    fn restore(&mut self);
    fn set_opacity(&mut self, opacity: f64);
    fn set_color_multiply(&mut self, color: Rgba);
    fn set_blend_mode(&mut self, mode: BlendMode);
    fn clip_to(&mut self, rect: Rect);
}

pub struct DrawCtx<'a, C: Canvas> {
    pub canvas: &'a mut C,
    pub symbols: &'a SymbolTable<C::Symbol>,
}

impl<'a, C: Canvas> DrawCtx<'a, C> {
    pub fn new(canvas: &'a mut C, symbols: &'a SymbolTable<C::Symbol>) -> Self {
        Self { canvas, symbols }
    }
}

#[cfg(test)]
pub mod recording {
    use glam::DVec2;

    use super::{BlendMode, Canvas, Paint, Rect};
    use crate::palette::Rgba;

    #[derive(Clone, Debug, PartialEq)]
    pub enum DrawOp {
        Ellipse(Rect, Rgba),
        Line(DVec2, DVec2, Rgba),
        FillRect(Rect, Paint),
        Symbol(char, Rect),
        Save,
        Restore,
        Opacity(f64),
        Multiply(Rgba),
        Blend(BlendMode),
        Clip(Rect),
    }

    #[derive(Default)]
    pub struct RecordingCanvas {
        pub ops: Vec<DrawOp>,
    }

    impl Canvas for RecordingCanvas {
        type Symbol = char;

        fn fill_ellipse(&mut self, rect: Rect, color: Rgba) {
            self.ops.push(DrawOp::Ellipse(rect, color));
        }
        fn stroke_line(&mut self, from: DVec2, to: DVec2, color: Rgba) {
            self.ops.push(DrawOp::Line(from, to, color));
        }
        fn fill_rect(&mut self, rect: Rect, paint: &Paint) {
            self.ops.push(DrawOp::FillRect(rect, *paint));
        }
        fn draw_symbol(&mut self, symbol: &char, rect: Rect) {
            self.ops.push(DrawOp::Symbol(*symbol, rect));
        }
        fn save(&mut self) {
            self.ops.push(DrawOp::Save);
        }
        fn restore(&mut self) {
            self.ops.push(DrawOp::Restore);
        }
        fn set_opacity(&mut self, opacity: f64) {
            self.ops.push(DrawOp::Opacity(opacity));
        }
        fn set_color_multiply(&mut self, color: Rgba) {
            self.ops.push(DrawOp::Multiply(color));
        }
        fn set_blend_mode(&mut self, mode: BlendMode) {
            self.ops.push(DrawOp::Blend(mode));
        }
        fn clip_to(&mut self, rect: Rect) {
            self.ops.push(DrawOp::Clip(rect));
        }
    }
}
